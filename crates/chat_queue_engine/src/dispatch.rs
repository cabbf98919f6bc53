use std::time::Duration;

use chat_queue_core::QueueItem;
use queue_logging::queue_debug;
use tokio::time::sleep;

use crate::{HostAdapter, HostError};

/// Pauses that give the host UI time to react to each input before the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    pub attach_settle: Duration,
    pub text_settle: Duration,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            attach_settle: Duration::from_millis(800),
            text_settle: Duration::from_millis(300),
        }
    }
}

/// Populates the host surfaces with `item` and submits it.
pub async fn dispatch(
    host: &dyn HostAdapter,
    item: &QueueItem,
    settings: &DispatchSettings,
) -> Result<(), HostError> {
    if let Some(attachment) = item.attachment() {
        host.attach(attachment).await?;
        sleep(settings.attach_settle).await;
        queue_debug!("Attached {} for item {}", attachment.name, item.id());
    }

    host.set_text(item.text()).await?;
    sleep(settings.text_settle).await;
    queue_debug!("Text set for item {} ({} chars)", item.id(), item.text().len());

    host.submit().await
}
