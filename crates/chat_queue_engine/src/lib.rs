//! Chat queue engine: host automation and the single-owner send loop.
mod completion;
mod dispatch;
mod host;
mod runner;

pub use completion::{ArmedWait, CompletionSettings, CompletionStrategy};
pub use dispatch::{dispatch, DispatchSettings};
pub use host::{HostAdapter, HostError, Surface};
pub use runner::{Notice, QueueHandle, RunnerSettings};
