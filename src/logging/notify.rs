//! Warning/error notification
//!
//! Every warning or error fires the notifier, whether or not the message
//! passes the level filter. Observers run synchronously on the logging
//! thread; UI layers that live elsewhere subscribe to the broadcast channel.

use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;

/// Default number of messages a lagging subscriber can fall behind
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

/// Receiver half of the notification channel
pub type AlertReceiver = broadcast::Receiver<String>;

type Observer = Arc<dyn Fn(&str) + Send + Sync>;

/// Fans warning/error messages out to observers and subscribers
pub struct Notifier {
    observers: RwLock<Vec<Observer>>,
    sender: broadcast::Sender<String>,
}

impl Notifier {
    /// Create a notifier whose channel buffers `buffer` messages
    pub fn new(buffer: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer.max(1));
        Self {
            observers: RwLock::new(Vec::new()),
            sender,
        }
    }

    /// Register a callback invoked with the message text of every warning/error
    pub fn add_observer<F>(&self, observer: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        if let Ok(mut observers) = self.observers.write() {
            observers.push(Arc::new(observer));
        }
    }

    /// Subscribe to the notification channel
    pub fn subscribe(&self) -> AlertReceiver {
        self.sender.subscribe()
    }

    /// Fire the notification
    pub fn notify(&self, message: &str) {
        // Snapshot so observers may log (and re-enter) without holding the lock
        let observers: Vec<Observer> = self
            .observers
            .read()
            .map(|o| o.clone())
            .unwrap_or_default();

        for observer in observers {
            (*observer)(message);
        }

        // No subscribers is not an error
        let _ = self.sender.send(message.to_string());
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_BUFFER)
    }
}
