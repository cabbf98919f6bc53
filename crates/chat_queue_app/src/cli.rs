use std::path::PathBuf;

use clap::Parser;

/// Queue chat messages and submit them one after another, waiting for each
/// reply before sending the next.
#[derive(Debug, Parser)]
#[command(name = "chat-queue", version)]
pub struct Cli {
    /// Items to queue, in order. `@path` queues a file; anything else is text.
    #[arg(required = true, value_name = "ITEM")]
    pub items: Vec<String>,

    /// RON configuration file; missing fields keep their defaults.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the final queue state as JSON.
    #[arg(long)]
    pub json: bool,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueuedInput {
    Text(String),
    File(PathBuf),
}

impl Cli {
    pub fn inputs(&self) -> Vec<QueuedInput> {
        self.items.iter().map(|raw| parse_item(raw)).collect()
    }
}

fn parse_item(raw: &str) -> QueuedInput {
    match raw.strip_prefix('@') {
        Some(path) if !path.is_empty() => QueuedInput::File(PathBuf::from(path)),
        _ => QueuedInput::Text(raw.to_string()),
    }
}
