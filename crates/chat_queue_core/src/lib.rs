//! Chat queue core: the queue store and the pure send-loop state machine.
mod effect;
mod error;
mod item;
mod msg;
mod settings;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, NoticeLevel};
pub use error::QueueError;
pub use item::{Attachment, AttachmentKind, ItemId, ItemPatch, ItemStatus, QueueItem};
pub use msg::{Completion, Msg};
pub use settings::{ControllerSettings, FailurePolicy};
pub use state::QueueState;
pub use update::update;
pub use view_model::{ItemRow, QueueSnapshot};
