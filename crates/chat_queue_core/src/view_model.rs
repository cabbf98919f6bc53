use serde::Serialize;

use crate::{AttachmentKind, ItemId, ItemStatus, QueueItem};

/// Read-only picture of the queue for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct QueueSnapshot {
    pub items: Vec<ItemRow>,
    pub running: bool,
    pub active_index: Option<usize>,
    pub pending_count: usize,
    pub done_count: usize,
    pub error_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRow {
    pub id: ItemId,
    pub display_name: String,
    pub status: ItemStatus,
    pub error: Option<String>,
    /// `None` for text-only items.
    pub kind: Option<AttachmentKind>,
}

impl ItemRow {
    pub(crate) fn from_item(item: &QueueItem) -> Self {
        Self {
            id: item.id().clone(),
            display_name: display_name(item),
            status: item.status(),
            error: item.error().map(ToOwned::to_owned),
            kind: item.attachment().map(|attachment| attachment.kind()),
        }
    }
}

impl QueueSnapshot {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn statuses(&self) -> Vec<ItemStatus> {
        self.items.iter().map(|row| row.status).collect()
    }
}

fn display_name(item: &QueueItem) -> String {
    let text = if item.text().is_empty() {
        "(empty text)"
    } else {
        item.text()
    };
    match item.attachment() {
        Some(attachment) => format!("{} + {}", text, attachment.name),
        None => text.to_string(),
    }
}
