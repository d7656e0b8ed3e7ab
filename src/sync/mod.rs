//! Synchronization primitives shared by the listener and its connections.

mod notify;

pub use notify::{Notification, Notifier, Subscription};
