//! This module contains the configuration structures used for deserializing
//! the optional TOML configuration file, and the resolved per-process
//! [`ServerConfig`].

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use serde::Deserialize;

/// Settings that can be written in the configuration file. Every field is
/// optional in the file, command line flags override whatever is read here.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default::port")]
    pub port: u16,
    #[serde(default = "default::bind")]
    pub bind: IpAddr,
    /// Zero is rejected while parsing.
    #[serde(default = "default::max_connections")]
    pub max_connections: NonZeroUsize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default::port(),
            bind: default::bind(),
            max_connections: default::max_connections(),
        }
    }
}

impl Config {
    /// Reads and parses a TOML configuration file.
    pub async fn from_file(path: &Path) -> Result<Self, crate::Error> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(toml::from_str(&content)?)
    }

    /// Replaces file values with the ones given on the command line.
    pub fn with_overrides(mut self, port: Option<u16>, bind: Option<IpAddr>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(bind) = bind {
            self.bind = bind;
        }
        self
    }
}

/// Everything a running server needs to know. Built once at startup and
/// shared read-only between all connections.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Absolute directory exposed at `/`.
    pub root: PathBuf,
    pub bind: IpAddr,
    pub port: u16,
    /// Address shown to the operator, does not influence binding.
    pub advertised: Ipv4Addr,
    pub max_connections: NonZeroUsize,
}

impl ServerConfig {
    pub fn new(config: Config, root: PathBuf, advertised: Ipv4Addr) -> Self {
        let Config {
            port,
            bind,
            max_connections,
        } = config;

        Self {
            root,
            bind,
            port,
            advertised,
            max_connections,
        }
    }

    pub fn listen_address(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

mod default {
    //! Default values for some configuration options.

    use std::{
        net::{IpAddr, Ipv4Addr},
        num::NonZeroUsize,
    };

    pub fn port() -> u16 {
        8080
    }

    pub fn bind() -> IpAddr {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    }

    pub fn max_connections() -> NonZeroUsize {
        const { NonZeroUsize::new(1024).unwrap() }
    }
}
