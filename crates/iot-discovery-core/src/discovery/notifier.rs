//! Roster change signal.

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

/// Payload-free broadcast fired whenever the roster changes.
///
/// Observers re-read the roster after each signal; no diff is carried. A
/// receiver that falls behind sees `RecvError::Lagged`, which still means
/// "something changed".
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<()>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }

    /// Fire once. Having no subscribers is fine.
    pub fn notify(&self) {
        let _ = self.sender.send(());
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}
