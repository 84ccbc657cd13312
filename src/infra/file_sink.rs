use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::app::ports::LeadSinkPort;
use crate::domain::LeadRecord;
use crate::error::SinkError;

/// Appends one JSON line per lead to an NDJSON file.
pub struct FileSink {
    path: PathBuf,
    // Serializes appends so concurrent requests never interleave lines
    write_lock: Mutex<()>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        info!("Lead file sink writing to {}", path.display());
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn unavailable(e: std::io::Error) -> SinkError {
    SinkError::Unavailable(e.to_string())
}

#[async_trait]
impl LeadSinkPort for FileSink {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn record(&self, record: &LeadRecord) -> Result<(), SinkError> {
        // Build the whole line before touching the file
        let mut line = serde_json::to_string(record).map_err(|e| SinkError::Rejected(e.to_string()))?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(unavailable)?;
        let len_before = file.metadata().await.map_err(unavailable)?.len();

        let written = match file.write_all(line.as_bytes()).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            // Roll back a torn line so the file only ever holds whole records
            let _ = file.set_len(len_before).await;
            return Err(unavailable(e));
        }

        debug!("Appended lead {} to {}", record.id, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LeadSubmission;
    use chrono::Utc;
    use tempfile::tempdir;
    use uuid::Uuid;

    fn record(name: &str) -> LeadRecord {
        LeadRecord {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            dedup_key: format!("key-{name}"),
            lead: LeadSubmission::new(name.into(), "Acme".into(), "jane@acme.org".into(), "line one\nline two".into()),
        }
    }

    #[tokio::test]
    async fn test_appends_one_line_per_record() {
        let dir = tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("nested/leads.ndjson")).unwrap();

        sink.record(&record("Jane")).await.unwrap();
        sink.record(&record("John")).await.unwrap();

        let content = std::fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["name"], "Jane");
        assert_eq!(first["fundingGoals"], "line one\nline two");
        assert_eq!(first["dedupKey"], "key-Jane");
    }

    #[tokio::test]
    async fn test_unwritable_path_is_unavailable() {
        let dir = tempdir().unwrap();
        // A directory where the file should be
        let sink = FileSink::new(dir.path()).unwrap();

        let err = sink.record(&record("Jane")).await.unwrap_err();
        assert!(matches!(err, SinkError::Unavailable(_)));
    }
}
