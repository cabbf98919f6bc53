//! A stand-in chat host that prints what it receives and "replies" after a delay.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chat_queue_core::Attachment;
use chat_queue_engine::{HostAdapter, HostError};
use queue_logging::queue_debug;
use tokio::sync::broadcast;

#[derive(Debug, Default)]
struct Composer {
    text: String,
    attachment: Option<String>,
}

pub struct SimulatedHost {
    composer: Mutex<Composer>,
    busy: Arc<AtomicBool>,
    idle_tx: broadcast::Sender<()>,
    reply_delay: Duration,
    with_events: bool,
}

impl SimulatedHost {
    pub fn new(reply_delay: Duration, with_events: bool) -> Self {
        let (idle_tx, _) = broadcast::channel(16);
        Self {
            composer: Mutex::new(Composer::default()),
            busy: Arc::new(AtomicBool::new(false)),
            idle_tx,
            reply_delay,
            with_events,
        }
    }

    fn composer(&self) -> Result<std::sync::MutexGuard<'_, Composer>, HostError> {
        self.composer
            .lock()
            .map_err(|_| HostError::Rejected("composer state poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl HostAdapter for SimulatedHost {
    async fn attach(&self, attachment: &Attachment) -> Result<(), HostError> {
        let readable = tokio::fs::metadata(&attachment.path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if !readable {
            return Err(HostError::Rejected(format!(
                "{} is not a readable file",
                attachment.path.display()
            )));
        }
        self.composer()?.attachment = Some(attachment.name.clone());
        Ok(())
    }

    async fn set_text(&self, text: &str) -> Result<(), HostError> {
        self.composer()?.text = text.to_string();
        Ok(())
    }

    async fn submit(&self) -> Result<(), HostError> {
        if self.is_busy() {
            return Err(HostError::SubmitUnavailable);
        }
        let sent = std::mem::take(&mut *self.composer()?);
        match &sent.attachment {
            Some(name) => println!("> {} [{}]", sent.text, name),
            None => println!("> {}", sent.text),
        }

        self.busy.store(true, Ordering::SeqCst);
        let busy = Arc::clone(&self.busy);
        let idle_tx = self.idle_tx.clone();
        let reply_delay = self.reply_delay;
        tokio::spawn(async move {
            tokio::time::sleep(reply_delay).await;
            println!("< (reply after {:?})", reply_delay);
            busy.store(false, Ordering::SeqCst);
            let _ = idle_tx.send(());
        });
        queue_debug!("Simulated host generating for {:?}", reply_delay);
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    fn idle_events(&self) -> Option<broadcast::Receiver<()>> {
        self.with_events.then(|| self.idle_tx.subscribe())
    }
}

/// Builds an attachment for `path`, guessing the media type from its extension.
pub fn attachment_for(path: &Path) -> Attachment {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let attachment = Attachment::new(name, PathBuf::from(path));
    match media_type(path) {
        Some(media_type) => attachment.with_media_type(media_type),
        None => attachment,
    }
}

fn media_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let media_type = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "json" => "application/json",
        "txt" | "md" | "log" => "text/plain",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        _ => return None,
    };
    Some(media_type)
}

#[cfg(test)]
mod tests {
    use chat_queue_core::AttachmentKind;

    use super::*;

    #[test]
    fn media_type_follows_the_extension() {
        assert_eq!(attachment_for(Path::new("a/b/pic.PNG")).kind(), AttachmentKind::Image);
        assert_eq!(attachment_for(Path::new("doc.pdf")).kind(), AttachmentKind::Pdf);
        assert_eq!(attachment_for(Path::new("notes.md")).kind(), AttachmentKind::Text);
        assert_eq!(attachment_for(Path::new("archive.zip")).kind(), AttachmentKind::Other);
        assert_eq!(attachment_for(Path::new("a/b/pic.PNG")).name, "pic.PNG");
    }

    #[tokio::test]
    async fn missing_files_are_rejected() {
        let host = SimulatedHost::new(Duration::from_millis(1), true);
        let err = host
            .attach(&attachment_for(Path::new("/definitely/not/here.png")))
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::Rejected(_)));
    }

    #[tokio::test]
    async fn submit_is_refused_while_generating() {
        let host = SimulatedHost::new(Duration::from_secs(60), true);
        let file = tempfile::NamedTempFile::new().unwrap();
        host.attach(&attachment_for(file.path())).await.unwrap();
        host.set_text("hi").await.unwrap();
        host.submit().await.unwrap();
        assert!(host.is_busy());
        assert_eq!(host.submit().await, Err(HostError::SubmitUnavailable));
    }
}
