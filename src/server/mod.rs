//! This module defines the server architecture: one listening socket and one
//! Tokio task per accepted connection.

mod server;

pub use server::{Server, ShutdownState, State};
