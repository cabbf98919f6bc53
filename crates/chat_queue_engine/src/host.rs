use std::fmt;

use chat_queue_core::Attachment;
use thiserror::Error;
use tokio::sync::broadcast;

/// The host input surfaces a dispatch touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Attachment,
    Text,
    Submit,
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Attachment => write!(f, "attachment input"),
            Surface::Text => write!(f, "text input"),
            Surface::Submit => write!(f, "submit control"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("{0} not found")]
    SurfaceMissing(Surface),
    #[error("submit control is unavailable")]
    SubmitUnavailable,
    #[error("host rejected input: {0}")]
    Rejected(String),
}

/// Capabilities the send loop needs from the chat application it drives.
#[async_trait::async_trait]
pub trait HostAdapter: Send + Sync {
    /// Places a file into the attachment surface.
    async fn attach(&self, attachment: &Attachment) -> Result<(), HostError>;

    /// Replaces the contents of the text surface.
    async fn set_text(&self, text: &str) -> Result<(), HostError>;

    /// Triggers the submit control.
    async fn submit(&self) -> Result<(), HostError>;

    /// Whether the host is currently generating a response.
    fn is_busy(&self) -> bool;

    /// A stream that yields once each time the host finishes generating.
    ///
    /// Hosts without such a signal return `None` and are polled instead.
    fn idle_events(&self) -> Option<broadcast::Receiver<()>> {
        None
    }
}
