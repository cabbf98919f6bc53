use thiserror::Error;

use crate::ItemId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("no queued item with id {0}")]
    UnknownItem(ItemId),
}
