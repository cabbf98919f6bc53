use chat_queue_core::{ItemStatus, NoticeLevel, QueueSnapshot};
use chat_queue_engine::QueueHandle;
use queue_logging::queue_warn;
use tokio::sync::broadcast::error::RecvError;

use crate::cli::QueuedInput;
use crate::render;
use crate::sim_host::attachment_for;

/// Queues the inputs in order. Consecutive files go in as one batch.
pub fn enqueue_inputs(queue: &QueueHandle, inputs: Vec<QueuedInput>) {
    let mut batch = Vec::new();
    for input in inputs {
        match input {
            QueuedInput::File(path) => batch.push(attachment_for(&path)),
            QueuedInput::Text(text) => {
                if !batch.is_empty() {
                    queue.enqueue_files(std::mem::take(&mut batch));
                }
                queue.enqueue_text(text);
            }
        }
    }
    if !batch.is_empty() {
        queue.enqueue_files(batch);
    }
}

/// Starts the loop and renders progress until it finishes or halts.
pub async fn run_to_completion(queue: &QueueHandle) -> QueueSnapshot {
    let mut notices = queue.subscribe();
    let mut snapshots = queue.watch();
    queue.start();

    loop {
        tokio::select! {
            notice = notices.recv() => match notice {
                Ok(notice) => {
                    println!("[{}] {}", level_tag(notice.level), notice.message);
                    if notice.level != NoticeLevel::Error {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    queue_warn!("Missed {} notices", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                println!("{}", render::status_line(&snapshot));
                if halted(&snapshot) {
                    break;
                }
            }
        }
    }

    let snapshot = queue.snapshot();
    for line in render::item_lines(&snapshot) {
        println!("{line}");
    }
    snapshot
}

/// Stopped after a failure with nothing left in flight.
fn halted(snapshot: &QueueSnapshot) -> bool {
    !snapshot.running
        && snapshot.error_count > 0
        && !snapshot
            .items
            .iter()
            .any(|row| row.status == ItemStatus::Sending)
}

fn level_tag(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "info",
        NoticeLevel::Success => "done",
        NoticeLevel::Error => "error",
    }
}
