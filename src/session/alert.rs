//! Alerts sent to a running session from other tasks and threads.

use tokio::sync::mpsc;

use crate::error::ShellError;
use crate::Result;

/// Cloneable sender for alerts.
///
/// Obtained from [`ShellApi::alerter`](crate::ShellApi::alerter). The
/// session prints queued alerts while it waits for input and redraws the
/// prompt afterwards; alerts sent while a command runs appear before the
/// next prompt.
#[derive(Debug, Clone)]
pub struct AlertHandle {
    tx: mpsc::UnboundedSender<String>,
}

impl AlertHandle {
    pub(crate) fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }

    /// Queue an alert for the session.
    ///
    /// Fails once the session has been dropped.
    pub fn send(&self, message: impl Into<String>) -> Result<()> {
        self.tx
            .send(message.into())
            .map_err(|_| ShellError::ChannelClosed("alert"))
    }

    /// Whether the session is gone.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
