//! Message passing abstractions for sending notifications to Tokio tasks and
//! awaiting their acknowledgement, which is used for graceful shutdowns.

use tokio::sync::{broadcast, mpsc};

/// Message that can be sent as a notification to Tokio tasks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notification {
    Shutdown,
}

/// Notifier object that can send messages to its subscribers.
pub struct Notifier {
    /// Sender half of the notifications channel.
    notification_sender: broadcast::Sender<Notification>,
    /// Receiver part of the acknowledgements channel.
    acknowledge_receiver: mpsc::Receiver<()>,
    /// Sender part of the acknowledgements channel.
    acknowledge_sender: mpsc::Sender<()>,
}

/// Used by subscribers to obtain a notification from a [`Notifier`] and
/// acknowledge receipt when possible.
pub struct Subscription {
    /// Receiver half of the notifications channel.
    notification_receiver: broadcast::Receiver<Notification>,
    /// Sender half of the acknowledgements channel.
    acknowledge_sender: mpsc::Sender<()>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    /// Creates a new [`Notifier`] with all the channels set up.
    pub fn new() -> Self {
        let (notification_sender, _) = broadcast::channel(1);
        let (acknowledge_sender, acknowledge_receiver) = mpsc::channel(1);

        Self {
            notification_sender,
            acknowledge_sender,
            acknowledge_receiver,
        }
    }

    /// By subscribing to this [`Notifier`] the caller obtains a
    /// [`Subscription`] object that can be used to receive a [`Notification`].
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            notification_receiver: self.notification_sender.subscribe(),
            acknowledge_sender: self.acknowledge_sender.clone(),
        }
    }

    /// Sends a [`Notification`] to all subscribers, returning how many of
    /// them are still alive.
    pub fn send(
        &self,
        notification: Notification,
    ) -> Result<usize, broadcast::error::SendError<Notification>> {
        self.notification_sender.send(notification)
    }

    /// Waits until every [`Subscription`] has acknowledged the last
    /// [`Notification`] or has been dropped.
    pub async fn collect_acknowledgements(self) {
        let Self {
            notification_sender,
            mut acknowledge_receiver,
            acknowledge_sender,
        } = self;

        // Only subscriptions hold senders from now on, the channel closes
        // when the last one is gone.
        drop(acknowledge_sender);

        while acknowledge_receiver.recv().await.is_some() {}

        drop(notification_sender);
    }
}

impl Subscription {
    /// Waits for the next notification. Returns `None` once the
    /// [`Notifier`] is gone.
    pub async fn receive_notification(&mut self) -> Option<Notification> {
        loop {
            match self.notification_receiver.recv().await {
                Ok(notification) => return Some(notification),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Sends an acknowledgment on the acknowledgements channel.
    pub async fn acknowledge_notification(&self) {
        // The notifier may have stopped waiting already.
        let _ = self.acknowledge_sender.send(()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn send_without_subscribers_fails() {
        let notifier = Notifier::new();
        assert!(notifier.send(Notification::Shutdown).is_err());
    }

    #[tokio::test]
    async fn waits_for_all_subscribers() {
        let notifier = Notifier::new();
        let (done_sender, mut done_receiver) = mpsc::channel(2);

        for _ in 0..2 {
            let mut subscription = notifier.subscribe();
            let done = done_sender.clone();
            tokio::spawn(async move {
                assert_eq!(
                    subscription.receive_notification().await,
                    Some(Notification::Shutdown)
                );
                tokio::time::sleep(Duration::from_millis(10)).await;
                done.send(()).await.unwrap();
                subscription.acknowledge_notification().await;
            });
        }
        drop(done_sender);

        assert_eq!(notifier.send(Notification::Shutdown).unwrap(), 2);
        notifier.collect_acknowledgements().await;

        // Both tasks finished their work before the acknowledgements were collected.
        assert!(done_receiver.recv().await.is_some());
        assert!(done_receiver.recv().await.is_some());
    }
}
