use crate::{Attachment, ItemId, ItemPatch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User added one or more files; one item per file.
    FilesAdded {
        files: Vec<Attachment>,
        at_millis: u64,
    },
    /// User added a text-only item.
    TextAdded { text: String, at_millis: u64 },
    /// User replaced the text and/or attachment of an item.
    ItemEdited { id: ItemId, patch: ItemPatch },
    /// User removed an item.
    ItemRemoved { id: ItemId },
    /// User dragged `source` onto `target`.
    ItemMoved { source: ItemId, target: ItemId },
    /// User clicked Clear.
    ClearClicked,
    /// User clicked Start/Resume.
    StartClicked,
    /// User clicked Pause.
    PauseClicked,
    /// A scheduled cooldown elapsed.
    Tick,
    /// Populating or submitting the host surfaces failed.
    DispatchFailed { id: ItemId, error: String },
    /// The host finished generating the response to `id`, or the wait gave up.
    GenerationEnded { id: ItemId, completion: Completion },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Finished,
    TimedOut,
}
