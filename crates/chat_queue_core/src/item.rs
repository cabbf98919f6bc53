use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Opaque, immutable identifier of a queued item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// A file reference handed to the host's attachment surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub name: String,
    pub path: PathBuf,
    pub media_type: Option<String>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            media_type: None,
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn kind(&self) -> AttachmentKind {
        match self.media_type.as_deref() {
            Some(mt) if mt.starts_with("image/") => AttachmentKind::Image,
            Some("application/pdf") => AttachmentKind::Pdf,
            Some(mt) if mt.starts_with("text/") || mt == "application/json" => {
                AttachmentKind::Text
            }
            _ => AttachmentKind::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Image,
    Pdf,
    Text,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Pending,
    Sending,
    Done,
    Error,
}

impl ItemStatus {
    pub fn label(self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Sending => "sending",
            ItemStatus::Done => "done",
            ItemStatus::Error => "error",
        }
    }
}

/// One queued unit of work: text and at most one attachment.
///
/// Status and error are only changed through [`crate::QueueState`], which keeps
/// `error` present exactly when the status is [`ItemStatus::Error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueItem {
    id: ItemId,
    text: String,
    attachment: Option<Attachment>,
    status: ItemStatus,
    error: Option<String>,
}

impl QueueItem {
    pub(crate) fn new(id: ItemId, text: String, attachment: Option<Attachment>) -> Self {
        Self {
            id,
            text,
            attachment,
            status: ItemStatus::Pending,
            error: None,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn set_status(&mut self, status: ItemStatus) {
        self.status = status;
        if status != ItemStatus::Error {
            self.error = None;
        }
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.status = ItemStatus::Error;
        self.error = Some(message);
    }

    pub(crate) fn apply(&mut self, patch: ItemPatch) {
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(attachment) = patch.attachment {
            self.attachment = attachment;
        }
        self.set_status(ItemStatus::Pending);
    }
}

/// Replacement content for an existing item.
///
/// `None` fields are left untouched; `attachment: Some(None)` drops the file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemPatch {
    pub text: Option<String>,
    pub attachment: Option<Option<Attachment>>,
}

impl ItemPatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            attachment: None,
        }
    }

    pub fn attachment(attachment: Option<Attachment>) -> Self {
        Self {
            text: None,
            attachment: Some(attachment),
        }
    }
}
