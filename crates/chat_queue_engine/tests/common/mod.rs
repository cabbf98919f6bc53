#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use chat_queue_core::Attachment;
use chat_queue_engine::{HostAdapter, HostError, Surface};
use tokio::sync::broadcast;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(queue_logging::initialize_for_tests);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Attach(String),
    SetText(String),
    Submit,
}

/// Scripted stand-in for a chat application.
///
/// Submitting makes the host busy for `reply_after`, then idle again with one
/// idle event.
pub struct FakeHost {
    calls: Mutex<Vec<HostCall>>,
    current_text: Mutex<String>,
    busy: Arc<AtomicBool>,
    idle_tx: broadcast::Sender<()>,
    reply_after: Duration,
    with_events: bool,
    has_attachment_surface: bool,
    rejected_texts: HashSet<String>,
}

impl FakeHost {
    pub fn new(reply_after: Duration) -> Self {
        let (idle_tx, _) = broadcast::channel(16);
        Self {
            calls: Mutex::new(Vec::new()),
            current_text: Mutex::new(String::new()),
            busy: Arc::new(AtomicBool::new(false)),
            idle_tx,
            reply_after,
            with_events: true,
            has_attachment_surface: true,
            rejected_texts: HashSet::new(),
        }
    }

    pub fn without_events(mut self) -> Self {
        self.with_events = false;
        self
    }

    pub fn without_attachment_surface(mut self) -> Self {
        self.has_attachment_surface = false;
        self
    }

    /// Submitting while the text surface holds `text` fails.
    pub fn rejecting(mut self, text: &str) -> Self {
        self.rejected_texts.insert(text.to_string());
        self
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn submitted_texts(&self) -> Vec<String> {
        let mut texts = Vec::new();
        let mut last_text = String::new();
        for call in self.calls() {
            match call {
                HostCall::SetText(text) => last_text = text,
                HostCall::Submit => texts.push(last_text.clone()),
                HostCall::Attach(_) => {}
            }
        }
        texts
    }
}

#[async_trait::async_trait]
impl HostAdapter for FakeHost {
    async fn attach(&self, attachment: &Attachment) -> Result<(), HostError> {
        if !self.has_attachment_surface {
            return Err(HostError::SurfaceMissing(Surface::Attachment));
        }
        self.calls
            .lock()
            .unwrap()
            .push(HostCall::Attach(attachment.name.clone()));
        Ok(())
    }

    async fn set_text(&self, text: &str) -> Result<(), HostError> {
        *self.current_text.lock().unwrap() = text.to_string();
        self.calls
            .lock()
            .unwrap()
            .push(HostCall::SetText(text.to_string()));
        Ok(())
    }

    async fn submit(&self) -> Result<(), HostError> {
        let text = self.current_text.lock().unwrap().clone();
        self.calls.lock().unwrap().push(HostCall::Submit);
        if self.rejected_texts.contains(&text) {
            return Err(HostError::SubmitUnavailable);
        }

        self.busy.store(true, Ordering::SeqCst);
        let busy = Arc::clone(&self.busy);
        let idle_tx = self.idle_tx.clone();
        let reply_after = self.reply_after;
        tokio::spawn(async move {
            tokio::time::sleep(reply_after).await;
            busy.store(false, Ordering::SeqCst);
            let _ = idle_tx.send(());
        });
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    fn idle_events(&self) -> Option<broadcast::Receiver<()>> {
        self.with_events.then(|| self.idle_tx.subscribe())
    }
}
