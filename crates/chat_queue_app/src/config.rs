use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chat_queue_core::{ControllerSettings, FailurePolicy};
use chat_queue_engine::{CompletionSettings, CompletionStrategy, DispatchSettings, RunnerSettings};
use log::LevelFilter;
use queue_logging::LogDestination;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("unknown log level {0:?}")]
    LogLevel(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum OnFailure {
    Continue,
    Halt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum WaitFor {
    Event,
    Poll,
}

/// Settings read from the RON file. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub done_cooldown_ms: u64,
    pub error_cooldown_ms: u64,
    pub on_failure: OnFailure,
    pub attach_settle_ms: u64,
    pub text_settle_ms: u64,
    pub wait_for: WaitFor,
    pub poll_interval_ms: u64,
    pub start_grace_ms: u64,
    pub completion_timeout_ms: u64,
    /// How long the simulated host takes to "generate" a reply.
    pub reply_delay_ms: u64,
    /// Whether the simulated host emits idle events.
    pub host_events: bool,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let runner = RunnerSettings::default();
        Self {
            done_cooldown_ms: millis(runner.controller.done_cooldown),
            error_cooldown_ms: millis(runner.controller.error_cooldown),
            on_failure: OnFailure::Continue,
            attach_settle_ms: millis(runner.dispatch.attach_settle),
            text_settle_ms: millis(runner.dispatch.text_settle),
            wait_for: WaitFor::Event,
            poll_interval_ms: millis(runner.completion.poll_interval),
            start_grace_ms: millis(runner.completion.start_grace),
            completion_timeout_ms: millis(runner.completion.timeout),
            reply_delay_ms: 1500,
            host_events: true,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(content)?)
    }

    pub fn runner_settings(&self) -> RunnerSettings {
        RunnerSettings {
            controller: ControllerSettings {
                done_cooldown: Duration::from_millis(self.done_cooldown_ms),
                error_cooldown: Duration::from_millis(self.error_cooldown_ms),
                failure_policy: match self.on_failure {
                    OnFailure::Continue => FailurePolicy::Continue,
                    OnFailure::Halt => FailurePolicy::Halt,
                },
            },
            dispatch: DispatchSettings {
                attach_settle: Duration::from_millis(self.attach_settle_ms),
                text_settle: Duration::from_millis(self.text_settle_ms),
            },
            completion: CompletionSettings {
                strategy: match self.wait_for {
                    WaitFor::Event => CompletionStrategy::Event,
                    WaitFor::Poll => CompletionStrategy::Poll,
                },
                poll_interval: Duration::from_millis(self.poll_interval_ms),
                start_grace: Duration::from_millis(self.start_grace_ms),
                timeout: Duration::from_millis(self.completion_timeout_ms),
            },
        }
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    pub fn log_destination(&self) -> LogDestination {
        match &self.log_file {
            Some(path) => LogDestination::Both(path.clone()),
            None => LogDestination::Terminal,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
