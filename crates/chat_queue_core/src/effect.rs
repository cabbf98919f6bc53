use std::time::Duration;

use crate::QueueItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Populate the host surfaces with this item and submit it, then wait for
    /// the host to finish generating.
    Dispatch { item: QueueItem },
    /// Deliver `Msg::Tick` after `delay` unless cancelled first.
    ScheduleTick { delay: Duration },
    /// Drop any tick that has been scheduled but not yet delivered.
    CancelScheduled,
    /// User-visible notification.
    Notify { level: NoticeLevel, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

impl Effect {
    pub(crate) fn info(message: impl Into<String>) -> Self {
        Effect::Notify {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub(crate) fn success(message: impl Into<String>) -> Self {
        Effect::Notify {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub(crate) fn error(message: impl Into<String>) -> Self {
        Effect::Notify {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}
