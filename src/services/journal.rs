use async_trait::async_trait;
use chrono::Local;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

#[derive(thiserror::Error, Debug)]
pub enum JournalError {
    #[error("journal io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Append-only log of timestamped text entries (notes, reminders).
#[async_trait]
pub trait Journal: Send + Sync {
    async fn append(&self, text: &str) -> Result<(), JournalError>;
    /// Whole log verbatim; `None` when nothing has ever been written.
    async fn read_all(&self) -> Result<Option<String>, JournalError>;
}

fn entry_line(text: &str) -> String {
    format!("{}: {}\n", Local::now().format("%Y-%m-%d %H:%M:%S"), text)
}

/// One line per entry, appended to a plain text file.
pub struct FileJournal {
    path: PathBuf,
}

impl FileJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Journal for FileJournal {
    async fn append(&self, text: &str) -> Result<(), JournalError> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(entry_line(text).as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn read_all(&self) -> Result<Option<String>, JournalError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Volatile journal for tests and dry runs.
#[derive(Default)]
pub struct MemoryJournal {
    content: Mutex<Option<String>>,
}

impl MemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<String> {
        self.content
            .lock()
            .await
            .as_deref()
            .map(|c| c.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Journal for MemoryJournal {
    async fn append(&self, text: &str) -> Result<(), JournalError> {
        self.content
            .lock()
            .await
            .get_or_insert_with(String::new)
            .push_str(&entry_line(text));
        Ok(())
    }

    async fn read_all(&self) -> Result<Option<String>, JournalError> {
        Ok(self.content.lock().await.clone())
    }
}
