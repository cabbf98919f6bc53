use std::sync::Arc;
use std::time::Duration;

use chat_queue_core::{
    update, Attachment, ControllerSettings, Effect, ItemId, ItemPatch, Msg, NoticeLevel,
    QueueItem, QueueSnapshot, QueueState,
};
use queue_logging::{queue_debug, queue_error, queue_info, queue_trace, queue_warn};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::completion::{ArmedWait, CompletionSettings};
use crate::dispatch::{dispatch, DispatchSettings};
use crate::HostAdapter;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunnerSettings {
    pub controller: ControllerSettings,
    pub dispatch: DispatchSettings,
    pub completion: CompletionSettings,
}

/// A user-facing notification raised by the send loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

enum RunnerCommand {
    Apply(Msg),
    Shutdown,
}

/// Cloneable front door to a running queue.
///
/// Every call is turned into a message for the runner task, which is the only
/// owner of the queue state; calls from one handle are applied in order.
#[derive(Clone)]
pub struct QueueHandle {
    cmd_tx: mpsc::UnboundedSender<RunnerCommand>,
    snapshot_rx: watch::Receiver<QueueSnapshot>,
    notice_tx: broadcast::Sender<Notice>,
}

impl QueueHandle {
    /// Starts the runner task on the current tokio runtime.
    ///
    /// The task ends after [`QueueHandle::shutdown`], or once every handle has
    /// been dropped and no dispatch or timer is outstanding.
    pub fn spawn(host: Arc<dyn HostAdapter>, mut settings: RunnerSettings) -> (Self, JoinHandle<()>) {
        settings.completion = settings.completion.resolved_for(host.as_ref());
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let state = QueueState::with_settings(settings.controller.clone());
        let (snapshot_tx, snapshot_rx) = watch::channel(state.view());
        let (notice_tx, _) = broadcast::channel(64);

        let runner = Runner {
            state,
            host,
            settings,
            cmd_tx: cmd_tx.downgrade(),
            snapshot_tx,
            notice_tx: notice_tx.clone(),
            timers: CancellationToken::new(),
        };
        let join = tokio::spawn(runner.run(cmd_rx));

        let handle = Self {
            cmd_tx,
            snapshot_rx,
            notice_tx,
        };
        (handle, join)
    }

    pub fn enqueue_files(&self, files: Vec<Attachment>) {
        self.send(Msg::FilesAdded {
            files,
            at_millis: now_millis(),
        });
    }

    pub fn enqueue_text(&self, text: impl Into<String>) {
        self.send(Msg::TextAdded {
            text: text.into(),
            at_millis: now_millis(),
        });
    }

    pub fn update_item(&self, id: ItemId, patch: ItemPatch) {
        self.send(Msg::ItemEdited { id, patch });
    }

    pub fn remove(&self, id: ItemId) {
        self.send(Msg::ItemRemoved { id });
    }

    pub fn reorder(&self, source: ItemId, target: ItemId) {
        self.send(Msg::ItemMoved { source, target });
    }

    pub fn clear(&self) {
        self.send(Msg::ClearClicked);
    }

    pub fn start(&self) {
        self.send(Msg::StartClicked);
    }

    pub fn pause(&self) {
        self.send(Msg::PauseClicked);
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> QueueSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// A receiver that is notified whenever a new snapshot is published.
    pub fn watch(&self) -> watch::Receiver<QueueSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Notices raised after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notice_tx.subscribe()
    }

    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(RunnerCommand::Shutdown);
    }

    fn send(&self, msg: Msg) {
        if self.cmd_tx.send(RunnerCommand::Apply(msg)).is_err() {
            queue_warn!("Queue runner has stopped; request dropped");
        }
    }
}

struct Runner {
    state: QueueState,
    host: Arc<dyn HostAdapter>,
    settings: RunnerSettings,
    cmd_tx: mpsc::WeakUnboundedSender<RunnerCommand>,
    snapshot_tx: watch::Sender<QueueSnapshot>,
    notice_tx: broadcast::Sender<Notice>,
    /// Parent token of every pending tick; replaced after each cancellation.
    timers: CancellationToken,
}

impl Runner {
    async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<RunnerCommand>) {
        queue_info!("Queue runner started");
        while let Some(command) = cmd_rx.recv().await {
            match command {
                RunnerCommand::Apply(msg) => self.apply(msg),
                RunnerCommand::Shutdown => break,
            }
        }
        self.timers.cancel();
        queue_info!("Queue runner stopped");
    }

    fn apply(&mut self, msg: Msg) {
        queue_trace!("Applying {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        let notices: Vec<Notice> = effects
            .into_iter()
            .filter_map(|effect| self.execute(effect))
            .collect();

        // Whoever reacts to a notice must already see the state that raised it.
        if self.state.consume_dirty() {
            self.snapshot_tx.send_replace(self.state.view());
        }
        for notice in notices {
            self.announce(notice);
        }
    }

    /// Runs one effect; notifications are handed back for [`Runner::announce`].
    fn execute(&mut self, effect: Effect) -> Option<Notice> {
        match effect {
            Effect::Dispatch { item } => self.launch(item),
            Effect::ScheduleTick { delay } => self.schedule_tick(delay),
            Effect::CancelScheduled => {
                self.timers.cancel();
                self.timers = CancellationToken::new();
            }
            Effect::Notify { level, message } => return Some(Notice { level, message }),
        }
        None
    }

    fn announce(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => queue_error!("{}", notice.message),
            NoticeLevel::Info | NoticeLevel::Success => queue_info!("{}", notice.message),
        }
        // Nobody listening is fine.
        let _ = self.notice_tx.send(notice);
    }

    fn launch(&self, item: QueueItem) {
        let Some(tx) = self.cmd_tx.upgrade() else {
            return;
        };
        let host = Arc::clone(&self.host);
        let dispatch_settings = self.settings.dispatch.clone();
        let completion_settings = self.settings.completion.clone();

        tokio::spawn(async move {
            let msg = fly(
                host.as_ref(),
                &item,
                &dispatch_settings,
                &completion_settings,
            )
            .await;
            let _ = tx.send(RunnerCommand::Apply(msg));
        });
    }

    fn schedule_tick(&self, delay: Duration) {
        let Some(tx) = self.cmd_tx.upgrade() else {
            return;
        };
        let token = self.timers.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    queue_debug!("Scheduled tick cancelled");
                }
                _ = sleep(delay) => {
                    let _ = tx.send(RunnerCommand::Apply(Msg::Tick));
                }
            }
        });
    }
}

/// Dispatches one item and waits for the host to answer it.
async fn fly(
    host: &dyn HostAdapter,
    item: &QueueItem,
    dispatch_settings: &DispatchSettings,
    completion_settings: &CompletionSettings,
) -> Msg {
    let id = item.id().clone();
    queue_info!("Dispatching item {}", id);

    let armed = ArmedWait::arm(host, completion_settings);
    if let Err(err) = dispatch(host, item, dispatch_settings).await {
        return Msg::DispatchFailed {
            id,
            error: err.to_string(),
        };
    }

    let completion = armed.wait(host, completion_settings).await;
    queue_debug!("Item {} answered ({:?})", id, completion);
    Msg::GenerationEnded { id, completion }
}

fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}
