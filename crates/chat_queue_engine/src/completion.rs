use std::time::Duration;

use chat_queue_core::Completion;
use queue_logging::{queue_debug, queue_warn};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{sleep, timeout, Instant};

use crate::HostAdapter;

/// How the runner learns that the host finished generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionStrategy {
    /// Wait for the host's idle event.
    #[default]
    Event,
    /// Sample `HostAdapter::is_busy` at a fixed interval.
    Poll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSettings {
    pub strategy: CompletionStrategy,
    pub poll_interval: Duration,
    /// How long polling waits for the host to start generating before
    /// accepting an idle host as finished.
    pub start_grace: Duration,
    /// Upper bound on any wait; expiry advances the queue anyway.
    pub timeout: Duration,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            strategy: CompletionStrategy::Event,
            poll_interval: Duration::from_millis(500),
            start_grace: Duration::from_secs(5),
            timeout: Duration::from_secs(300),
        }
    }
}

impl CompletionSettings {
    /// Settles the strategy for `host` once: a host without idle events is
    /// always polled.
    pub fn resolved_for(mut self, host: &dyn HostAdapter) -> Self {
        if self.strategy == CompletionStrategy::Event && host.idle_events().is_none() {
            queue_warn!("Host offers no idle events; polling its busy state instead");
            self.strategy = CompletionStrategy::Poll;
        }
        self
    }
}

/// A completion wait prepared before the dispatch it observes.
///
/// Subscribing first means an idle event fired right after submit is not lost.
pub enum ArmedWait {
    Event(broadcast::Receiver<()>),
    Poll,
}

impl ArmedWait {
    pub fn arm(host: &dyn HostAdapter, settings: &CompletionSettings) -> Self {
        match settings.strategy {
            CompletionStrategy::Poll => ArmedWait::Poll,
            CompletionStrategy::Event => match host.idle_events() {
                Some(rx) => ArmedWait::Event(rx),
                None => {
                    queue_debug!("Idle events unavailable for this dispatch; polling");
                    ArmedWait::Poll
                }
            },
        }
    }

    pub async fn wait(self, host: &dyn HostAdapter, settings: &CompletionSettings) -> Completion {
        let completion = match self {
            ArmedWait::Event(rx) => wait_for_event(rx, settings.timeout).await,
            ArmedWait::Poll => poll_until_idle(host, settings).await,
        };
        if completion == Completion::TimedOut {
            queue_warn!(
                "No completion signal within {:?}; treating generation as finished",
                settings.timeout
            );
        }
        completion
    }
}

async fn wait_for_event(mut rx: broadcast::Receiver<()>, limit: Duration) -> Completion {
    let received = timeout(limit, async move {
        loop {
            match rx.recv().await {
                Ok(()) => return true,
                // Missed events still mean at least one generation ended.
                Err(RecvError::Lagged(skipped)) => {
                    queue_debug!("Idle event receiver lagged by {}", skipped);
                    return true;
                }
                Err(RecvError::Closed) => return false,
            }
        }
    })
    .await;

    match received {
        Ok(true) => Completion::Finished,
        Ok(false) => {
            queue_warn!("Host idle event stream closed");
            Completion::TimedOut
        }
        Err(_) => Completion::TimedOut,
    }
}

async fn poll_until_idle(host: &dyn HostAdapter, settings: &CompletionSettings) -> Completion {
    let started = Instant::now();
    let mut seen_busy = false;

    loop {
        sleep(settings.poll_interval).await;
        let elapsed = started.elapsed();

        if host.is_busy() {
            seen_busy = true;
        } else if seen_busy || elapsed >= settings.start_grace {
            return Completion::Finished;
        }

        if elapsed >= settings.timeout {
            return Completion::TimedOut;
        }
    }
}
