use crate::view_model::{ItemRow, QueueSnapshot};
use crate::{Attachment, ControllerSettings, ItemId, ItemPatch, ItemStatus, QueueError, QueueItem};

/// The queue store: ordered items, the running flag and the active pointer.
///
/// All mutation goes through `&mut self`, so a single owner serialises every
/// change. The send loop's transitions live in [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueueState {
    items: Vec<QueueItem>,
    running: bool,
    active_index: Option<usize>,
    /// Item whose dispatch or completion wait is still outstanding.
    in_flight: Option<ItemId>,
    last_stamp: u64,
    settings: ControllerSettings,
    dirty: bool,
}

impl QueueState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ControllerSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn items(&self) -> &[QueueItem] {
        &self.items
    }

    pub fn item(&self, id: &ItemId) -> Option<&QueueItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn in_flight(&self) -> Option<&ItemId> {
        self.in_flight.as_ref()
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn count(&self, status: ItemStatus) -> usize {
        self.items
            .iter()
            .filter(|item| item.status() == status)
            .count()
    }

    pub fn first_pending(&self) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.status() == ItemStatus::Pending)
    }

    /// Appends one pending item per file, in input order.
    pub fn enqueue_files(&mut self, files: Vec<Attachment>, at_millis: u64) -> Vec<ItemId> {
        if files.is_empty() {
            return Vec::new();
        }
        let stamp = self.next_stamp(at_millis);
        let mut ids = Vec::with_capacity(files.len());
        for (index, file) in files.into_iter().enumerate() {
            let id = ItemId::new(format!("{stamp}-{index}-{}", file.name));
            self.items.push(QueueItem::new(id.clone(), String::new(), Some(file)));
            ids.push(id);
        }
        self.dirty = true;
        ids
    }

    /// Appends one pending item without an attachment.
    pub fn enqueue_text(&mut self, text: impl Into<String>, at_millis: u64) -> ItemId {
        let stamp = self.next_stamp(at_millis);
        let id = ItemId::new(format!("{stamp}-text"));
        self.items.push(QueueItem::new(id.clone(), text.into(), None));
        self.dirty = true;
        id
    }

    /// Replaces content on an item and makes it eligible for sending again.
    pub fn update_item(&mut self, id: &ItemId, patch: ItemPatch) -> Result<(), QueueError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| QueueError::UnknownItem(id.clone()))?;
        item.apply(patch);
        self.dirty = true;
        Ok(())
    }

    pub fn remove(&mut self, id: &ItemId) -> Result<QueueItem, QueueError> {
        let index = self
            .position(id)
            .ok_or_else(|| QueueError::UnknownItem(id.clone()))?;
        let removed = self.items.remove(index);

        self.active_index = match self.active_index {
            _ if self.items.is_empty() => None,
            Some(active) if index < active => Some(active - 1),
            Some(active) if index == active => Some(active.min(self.items.len() - 1)),
            other => other,
        };
        self.dirty = true;
        Ok(removed)
    }

    /// Moves `source` to the position currently held by `target`.
    ///
    /// The active pointer keeps referencing the same item across the move.
    pub fn reorder(&mut self, source: &ItemId, target: &ItemId) -> Result<(), QueueError> {
        let from = self
            .position(source)
            .ok_or_else(|| QueueError::UnknownItem(source.clone()))?;
        let to = self
            .position(target)
            .ok_or_else(|| QueueError::UnknownItem(target.clone()))?;
        if from == to {
            return Ok(());
        }

        let moved = self.items.remove(from);
        self.items.insert(to, moved);

        if let Some(active) = self.active_index {
            self.active_index = Some(if active == from {
                to
            } else if from < active && to >= active {
                active - 1
            } else if from > active && to <= active {
                active + 1
            } else {
                active
            });
        }
        self.dirty = true;
        Ok(())
    }

    /// Empties the queue and stops the loop.
    ///
    /// An outstanding dispatch keeps its in-flight marker: the host is still
    /// busy with it, and its completion is what frees the loop again.
    pub fn clear(&mut self) {
        self.items.clear();
        self.running = false;
        self.active_index = None;
        self.dirty = true;
    }

    pub fn view(&self) -> QueueSnapshot {
        QueueSnapshot {
            items: self.items.iter().map(ItemRow::from_item).collect(),
            running: self.running,
            active_index: self.active_index,
            pending_count: self.count(ItemStatus::Pending),
            done_count: self.count(ItemStatus::Done),
            error_count: self.count(ItemStatus::Error),
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_running(&mut self, running: bool) {
        if self.running != running {
            self.running = running;
            self.dirty = true;
        }
    }

    /// Marks the item at `index` as sending and records it as in flight.
    pub(crate) fn begin_sending(&mut self, index: usize) -> QueueItem {
        let item = &mut self.items[index];
        item.set_status(ItemStatus::Sending);
        self.active_index = Some(index);
        self.in_flight = Some(item.id().clone());
        self.dirty = true;
        item.clone()
    }

    /// Clears the in-flight marker if it belongs to `id`.
    pub(crate) fn land(&mut self, id: &ItemId) -> bool {
        if self.in_flight.as_ref() == Some(id) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    /// Sets the status of `id` if it is still sending; returns its position.
    pub(crate) fn settle(&mut self, id: &ItemId, status: ItemStatus) -> Option<usize> {
        let index = self.position(id)?;
        let item = &mut self.items[index];
        if item.status() != ItemStatus::Sending {
            return None;
        }
        item.set_status(status);
        self.active_index = Some(index);
        self.dirty = true;
        Some(index)
    }

    pub(crate) fn fail(&mut self, id: &ItemId, message: String) -> Option<usize> {
        let index = self.position(id)?;
        let item = &mut self.items[index];
        if item.status() != ItemStatus::Sending {
            return None;
        }
        item.fail(message);
        self.active_index = Some(index);
        self.dirty = true;
        Some(index)
    }

    /// Sending items left behind by a pause whose completion already arrived.
    pub(crate) fn orphaned_sending(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|item| item.status() == ItemStatus::Sending)
            .filter(|item| self.in_flight.as_ref() != Some(item.id()))
            .map(|item| item.id().clone())
            .collect()
    }

    fn next_stamp(&mut self, at_millis: u64) -> u64 {
        let stamp = at_millis.max(self.last_stamp.saturating_add(1));
        self.last_stamp = stamp;
        stamp
    }
}
