use std::{net::IpAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spserve::{Config, Server, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "spserve")]
#[command(about = "Serve files to current network with ease")]
#[command(version)]
struct Cli {
    /// Directory to serve
    root: PathBuf,

    /// Port for the server to listen on [default: 8080]
    #[arg(short, long, env = "SPSERVE_PORT")]
    port: Option<u16>,

    /// Address to bind to [default: 0.0.0.0]
    #[arg(short, long, env = "SPSERVE_BIND")]
    bind: Option<IpAddr>,

    /// Config file path (optional)
    #[arg(short, long, env = "SPSERVE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, env = "SPSERVE_VERBOSE")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "spserve=debug"
    } else {
        "spserve=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("Couldn't load config file {}", path.display()))?,
        None => Config::default(),
    }
    .with_overrides(cli.port, cli.bind);

    let root = spserve::resolve_root(&cli.root).context("Couldn't set root path")?;
    let advertised =
        spserve::advertised_address().context("Couldn't get network interface address")?;

    let config = Arc::new(ServerConfig::new(config, root, advertised));

    Server::init(config)
        .context("Couldn't start server")?
        .shutdown_on(tokio::signal::ctrl_c())
        .run()
        .await?;

    Ok(())
}
