use std::time::Duration;

/// What the send loop does after an item fails to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Mark the item as failed and move on to the next pending item after
    /// `error_cooldown`.
    #[default]
    Continue,
    /// Mark the item as failed and stop the loop.
    Halt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Delay between a finished item and the next dispatch.
    pub done_cooldown: Duration,
    /// Delay between a failed item and the next dispatch (Continue policy only).
    pub error_cooldown: Duration,
    pub failure_policy: FailurePolicy,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            done_cooldown: Duration::from_millis(1000),
            error_cooldown: Duration::from_millis(2000),
            failure_policy: FailurePolicy::Continue,
        }
    }
}
