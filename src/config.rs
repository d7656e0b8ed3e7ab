//! Configuration of a server instance: the optional TOML file, the root
//! directory and the immutable [`ServerConfig`] built from them at startup.

mod config;
mod root;

pub use config::{Config, ServerConfig};
pub use root::resolve_root;
