use std::{future::Future, io, net::SocketAddr, pin::Pin, sync::Arc};

use hyper::server::conn::http1::Builder;
use hyper_util::rt::TokioIo;
use tokio::{
    net::{TcpListener, TcpSocket},
    sync::{watch, Semaphore},
};
use tracing::{debug, info, warn};

use crate::{
    config::ServerConfig,
    service::{HtmlRenderer, Render, Spserve},
    sync::{Notification, Notifier},
};

/// Listening socket plus everything needed to answer the requests that
/// arrive through it.
pub struct Server {
    state: watch::Sender<State>,
    listener: TcpListener,
    config: Arc<ServerConfig>,
    renderer: Arc<dyn Render>,
    address: SocketAddr,
    notifier: Notifier,
    shutdown: Pin<Box<dyn Future<Output = ()> + Send>>,
    connections: Arc<Semaphore>,
}

/// Represents the current state of the server.
#[derive(Debug, PartialEq, Eq)]
pub enum State {
    Starting,
    Listening,
    MaxConnectionsReached(usize),
    ShuttingDown(ShutdownState),
}

/// Represents a state in the graceful shutdown process.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ShutdownState {
    PendingConnections(usize),
    Done,
}

impl Server {
    /// Binds the socket described by `config`. Nothing is accepted until
    /// [`Server::run`] is awaited.
    pub fn init(config: Arc<ServerConfig>) -> Result<Self, io::Error> {
        let (state, _) = watch::channel(State::Starting);
        let listen = config.listen_address();

        let socket = if listen.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };

        #[cfg(not(windows))]
        socket.set_reuseaddr(true)?;

        socket.bind(listen)?;
        let listener = socket.listen(1024)?;
        let address = listener.local_addr()?;
        let connections = Arc::new(Semaphore::new(config.max_connections.get()));

        Ok(Self {
            state,
            listener,
            config,
            renderer: Arc::new(HtmlRenderer),
            address,
            notifier: Notifier::new(),
            shutdown: Box::pin(std::future::pending()),
            connections,
        })
    }

    /// Replaces the default [`HtmlRenderer`].
    pub fn with_renderer(mut self, renderer: Arc<dyn Render>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Sets a termination future for server shutdown.
    pub fn shutdown_on(mut self, future: impl Future + Send + 'static) -> Self {
        self.shutdown = Box::pin(async move {
            future.await;
        });
        self
    }

    /// Gets the socket address of the listener.
    pub fn socket_address(&self) -> SocketAddr {
        self.address
    }

    /// Subscribes to server state updates.
    pub fn subscribe(&self) -> watch::Receiver<State> {
        self.state.subscribe()
    }

    /// Begins accepting connections and running the server.
    pub async fn run(self) -> Result<(), crate::Error> {
        let Self {
            config,
            renderer,
            state,
            listener,
            notifier,
            shutdown,
            address,
            connections,
        } = self;

        let log_name = address.to_string();

        state.send_replace(State::Listening);
        info!(
            "Serving \"{}\" in {}:{}",
            config.root.display(),
            config.advertised,
            address.port()
        );
        debug!("{log_name} => Listening for requests");

        let listener = Listener {
            listener,
            service: Spserve::new(Arc::clone(&config), renderer),
            max_connections: config.max_connections.get(),
            log_name: &log_name,
            notifier: &notifier,
            state: &state,
            connections,
        };

        tokio::select! {
            result = listener.listen() => {
                if let Err(err) = result {
                    warn!("{log_name} => Error while accepting connections: {err}");
                }
            }
            _ = shutdown => {
                info!("{log_name} => Received shutdown signal");
            }
        }

        drop(listener);

        if let Ok(num_tasks) = notifier.send(Notification::Shutdown) {
            info!("{log_name} => Can't shutdown yet, {num_tasks} pending connections");
            state.send_replace(State::ShuttingDown(ShutdownState::PendingConnections(
                num_tasks,
            )));
            notifier.collect_acknowledgements().await;
        }

        state.send_replace(State::ShuttingDown(ShutdownState::Done));
        info!("{log_name} => Shutdown complete");

        Ok(())
    }
}

struct Listener<'a> {
    listener: TcpListener,
    service: Spserve,
    max_connections: usize,
    log_name: &'a str,
    notifier: &'a Notifier,
    state: &'a watch::Sender<State>,
    connections: Arc<Semaphore>,
}

impl Listener<'_> {
    async fn listen(&self) -> Result<(), crate::Error> {
        loop {
            let mut notify_listening_again = false;

            if self.connections.available_permits() == 0 {
                warn!(
                    "{} => Reached max connections: {}",
                    self.log_name, self.max_connections
                );
                self.state
                    .send_replace(State::MaxConnectionsReached(self.max_connections));
                notify_listening_again = true;
            }

            // The semaphore is never closed.
            let Ok(permit) = Arc::clone(&self.connections).acquire_owned().await else {
                return Ok(());
            };

            if notify_listening_again {
                info!("{} => Accepting connections again", self.log_name);
                self.state.send_replace(State::Listening);
            }

            let (stream, client_addr) = self.listener.accept().await?;
            let mut subscription = self.notifier.subscribe();
            let service = self.service.clone();

            debug!("{} => Connection from {client_addr}", self.log_name);

            tokio::task::spawn(async move {
                let connection = Builder::new()
                    .preserve_header_case(true)
                    .title_case_headers(true)
                    .serve_connection(TokioIo::new(stream), service);
                tokio::pin!(connection);

                let mut shutting_down = false;

                loop {
                    tokio::select! {
                        result = connection.as_mut() => {
                            if let Err(err) = result {
                                debug!("Failed to serve connection from {client_addr}: {err}");
                            }
                            break;
                        }
                        Some(Notification::Shutdown) = subscription.receive_notification(), if !shutting_down => {
                            // Finish the request in flight, then close.
                            connection.as_mut().graceful_shutdown();
                            shutting_down = true;
                        }
                    }
                }

                if shutting_down {
                    subscription.acknowledge_notification().await;
                }

                drop(permit);
            });
        }
    }
}
