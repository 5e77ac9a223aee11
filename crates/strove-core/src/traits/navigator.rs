//! Navigation command sink.

use tokio::sync::mpsc;
use tracing::debug;

/// Receives hard navigation commands issued outside the UI flow.
///
/// The transport uses this to send the user back to the login route after
/// the server rejects the session. Implementations must not block.
pub trait Navigator: Send + Sync {
    /// Abandon the current flow and go to `path`.
    fn navigate(&self, path: &str);
}

/// A [`Navigator`] that forwards every command on an unbounded channel.
///
/// Hosts with an event loop drain the receiver and perform the actual route
/// change there.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNavigator {
    /// Create a navigator and the receiver that observes its commands.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, path: &str) {
        if self.tx.send(path.to_string()).is_err() {
            debug!(path, "navigation receiver dropped");
        }
    }
}
