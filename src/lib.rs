pub mod config;
pub mod discovery;
pub mod server;
pub mod service;
pub mod sync;

use std::{io, path::PathBuf};

pub use config::{resolve_root, Config, ServerConfig};
pub use discovery::{advertised_address, select_advertised_address, InterfaceAddr};
pub use server::{Server, ShutdownState, State};
pub use service::{
    resolve, BoxBodyResponse, Breadcrumb, DirectoryListing, Entry, ErrorResponse, HtmlRenderer,
    LocalResponse, Render, Resolution, ResolveError, Spserve,
};
pub use sync::{Notification, Notifier, Subscription};

/// spserve version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Top level error to use for return types in the public API and main function.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Mostly related to reading or writing on sockets.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// An error while deserializing the config file.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// No up, non-loopback interface carries an IPv4 address.
    #[error("no usable IPv4 address found on any network interface")]
    NoAddressFound,

    /// The root directory could not be stat'ed.
    #[error("couldn't read root path '{}': {source}", .path.display())]
    PathUnreadable { path: PathBuf, source: io::Error },

    /// The root path exists but is not a directory.
    #[error("given path '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),
}

/// Value of the `Server` header attached to every response.
pub const SERVER_HEADER: &str = concat!("spserve/", env!("CARGO_PKG_VERSION"));
