use chat_queue_core::{AttachmentKind, ItemRow, ItemStatus, QueueSnapshot};

/// One-line summary of where the queue stands.
pub fn status_line(view: &QueueSnapshot) -> String {
    let total = view.items.len();
    if total == 0 {
        return "Queue is empty".to_string();
    }
    if !view.running {
        return format!(
            "{} items queued ({} done, {} failed, {} pending), paused",
            total, view.done_count, view.error_count, view.pending_count
        );
    }
    match view.active_index {
        Some(index) => format!("Processing item {} / {}", index + 1, total),
        None => format!("Running, {} items queued", total),
    }
}

/// One line per item, in send order.
pub fn item_lines(view: &QueueSnapshot) -> Vec<String> {
    view.items
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let marker = if view.active_index == Some(index) {
                '>'
            } else {
                ' '
            };
            format!(
                "{marker} {:>2}. [{}] {} {}",
                index + 1,
                kind_tag(row),
                row.display_name,
                status_label(row)
            )
        })
        .collect()
}

fn kind_tag(row: &ItemRow) -> &'static str {
    match row.kind {
        None => "text",
        Some(AttachmentKind::Image) => "image",
        Some(AttachmentKind::Pdf) => "pdf",
        Some(AttachmentKind::Text) => "file",
        Some(AttachmentKind::Other) => "file",
    }
}

fn status_label(row: &ItemRow) -> String {
    match (&row.status, &row.error) {
        (ItemStatus::Error, Some(error)) => format!("(error: {error})"),
        (status, _) => format!("({})", status.label()),
    }
}
