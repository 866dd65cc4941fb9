//! Command dispatch
//!
//! Every remote or local operation is a [`Command`]. The [`Dispatcher`] runs
//! each one on its own task and sends exactly one [`CommandResult`] back on
//! the results channel, so the event loop never waits on I/O.

pub mod stats;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::mpsc;

use s4_core::path::base_name;
use s4_core::{Entry, LocalEntry, LocalFs, ObjectStore, RemotePath};

pub use stats::{DirStats, StatsDeadlines};

/// One server-side copy performed by a paste
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyJob {
    pub source: String,
    pub destination: String,
}

/// A unit of work for the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the immediate children of a directory key
    List { dir: String },
    /// Fetch an object for the preview pane
    Preview { key: String },
    /// Save an object into the download directory
    Download { key: String },
    /// Upload a local file to `key`
    Upload { source: PathBuf, key: String },
    /// Delete an object
    Delete { key: String },
    /// Copy every marked object, reporting once for the whole batch
    Paste { jobs: Vec<CopyJob> },
    /// Copy `from` to `to`, then delete `from`
    Rename { from: String, to: String },
    /// List a local directory for the upload picker
    ListLocal { path: PathBuf },
    /// Compute size and date stats for a directory key
    DirStats { key: String },
}

/// Outcome of a paste batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasteReport {
    /// Destination names that were written
    pub copied: Vec<String>,
    /// Source names that failed, with the reason
    pub failed: Vec<(String, String)>,
}

impl PasteReport {
    /// Single-line summary for the status bar
    pub fn summary(&self) -> String {
        if self.failed.is_empty() {
            return format!(
                "Copied {} file(s): {}",
                self.copied.len(),
                self.copied.join(", ")
            );
        }

        let reasons: Vec<String> = self
            .failed
            .iter()
            .map(|(name, reason)| format!("{name}: {reason}"))
            .collect();
        let mut message = format!(
            "Failed to copy {} file(s): {}",
            self.failed.len(),
            reasons.join(", ")
        );
        if !self.copied.is_empty() {
            message.push_str(&format!(
                ". Successfully copied: {}",
                self.copied.join(", ")
            ));
        }
        message
    }
}

/// Result event for one command; errors are carried as display text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Listed {
        dir: String,
        result: Result<Vec<Entry>, String>,
    },
    Previewed {
        key: String,
        result: Result<Vec<u8>, String>,
    },
    Downloaded {
        key: String,
        result: Result<PathBuf, String>,
    },
    Uploaded {
        key: String,
        result: Result<(), String>,
    },
    Deleted {
        key: String,
        result: Result<(), String>,
    },
    Pasted(PasteReport),
    Renamed {
        from: String,
        to: String,
        result: Result<(), String>,
    },
    LocalListed {
        path: PathBuf,
        result: Result<Vec<LocalEntry>, String>,
    },
    DirStats {
        key: String,
        stats: DirStats,
    },
}

/// Runs commands on background tasks
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<dyn ObjectStore>,
    local: Arc<dyn LocalFs>,
    bucket: String,
    download_dir: PathBuf,
    deadlines: StatsDeadlines,
    results: mpsc::UnboundedSender<CommandResult>,
}

impl Dispatcher {
    /// Create a dispatcher for one bucket
    pub fn new(
        store: Arc<dyn ObjectStore>,
        local: Arc<dyn LocalFs>,
        bucket: impl Into<String>,
        results: mpsc::UnboundedSender<CommandResult>,
    ) -> Self {
        Self {
            store,
            local,
            bucket: bucket.into(),
            download_dir: PathBuf::from("."),
            deadlines: StatsDeadlines::default(),
            results,
        }
    }

    /// Write downloads into `dir`
    pub fn with_download_dir(mut self, dir: PathBuf) -> Self {
        self.download_dir = dir;
        self
    }

    /// Override the stat deadlines
    pub fn with_deadlines(mut self, deadlines: StatsDeadlines) -> Self {
        self.deadlines = deadlines;
        self
    }

    /// Run a command in the background; its result arrives on the channel
    pub fn dispatch(&self, command: Command) {
        tracing::debug!(?command, "dispatching");
        let this = self.clone();
        tokio::spawn(async move {
            let result = this.execute(command).await;
            if this.results.send(result).is_err() {
                tracing::debug!("result receiver dropped");
            }
        });
    }

    /// Run a command to completion and return its result
    pub async fn execute(&self, command: Command) -> CommandResult {
        match command {
            Command::List { dir } => {
                let result = self
                    .store
                    .list_entries(&self.remote(&dir))
                    .await
                    .map_err(|e| e.to_string());
                CommandResult::Listed { dir, result }
            }
            Command::Preview { key } => {
                let result = self
                    .store
                    .get_object(&self.remote(&key))
                    .await
                    .map_err(|e| e.to_string());
                CommandResult::Previewed { key, result }
            }
            Command::Download { key } => {
                let result = self.download(&key).await;
                CommandResult::Downloaded { key, result }
            }
            Command::Upload { source, key } => {
                let result = self.upload(&source, &key).await;
                CommandResult::Uploaded { key, result }
            }
            Command::Delete { key } => {
                let result = self
                    .store
                    .delete_object(&self.remote(&key))
                    .await
                    .map_err(|e| e.to_string());
                CommandResult::Deleted { key, result }
            }
            Command::Paste { jobs } => CommandResult::Pasted(self.paste(jobs).await),
            Command::Rename { from, to } => {
                let result = self.rename(&from, &to).await;
                CommandResult::Renamed { from, to, result }
            }
            Command::ListLocal { path } => match self.local.resolve_dir(&path).await {
                Ok(resolved) => {
                    let result = self
                        .local
                        .list_entries(&resolved)
                        .await
                        .map_err(|e| e.to_string());
                    CommandResult::LocalListed {
                        path: resolved,
                        result,
                    }
                }
                Err(e) => CommandResult::LocalListed {
                    path,
                    result: Err(e.to_string()),
                },
            },
            Command::DirStats { key } => {
                let stats =
                    stats::aggregate(Arc::clone(&self.store), self.remote(&key), self.deadlines)
                        .await;
                CommandResult::DirStats { key, stats }
            }
        }
    }

    fn remote(&self, key: &str) -> RemotePath {
        RemotePath::new(self.bucket.clone(), key)
    }

    async fn download(&self, key: &str) -> Result<PathBuf, String> {
        let data = self
            .store
            .get_object(&self.remote(key))
            .await
            .map_err(|e| e.to_string())?;

        let target = self.download_dir.join(base_name(key));
        self.local
            .write_file(&target, &data)
            .await
            .map_err(|e| format!("failed to write file '{}': {e}", target.display()))?;

        tracing::debug!(key, target = %target.display(), bytes = data.len(), "downloaded");
        Ok(target)
    }

    async fn upload(&self, source: &Path, key: &str) -> Result<(), String> {
        let data = self
            .local
            .read_file(source)
            .await
            .map_err(|e| format!("failed to read file '{}': {e}", source.display()))?;

        let content_type = mime_guess::from_path(source)
            .first_raw()
            .map(str::to_string);
        self.store
            .put_object(&self.remote(key), data, content_type)
            .await
            .map_err(|e| e.to_string())
    }

    async fn paste(&self, jobs: Vec<CopyJob>) -> PasteReport {
        let copies = jobs.iter().map(|job| async move {
            let outcome = self
                .store
                .copy_object(&self.remote(&job.source), &self.remote(&job.destination))
                .await;
            (job, outcome)
        });

        let mut report = PasteReport::default();
        for (job, outcome) in join_all(copies).await {
            match outcome {
                Ok(()) => report.copied.push(base_name(&job.destination).to_string()),
                Err(e) => {
                    tracing::warn!(source = %job.source, "copy failed: {e}");
                    report
                        .failed
                        .push((base_name(&job.source).to_string(), e.to_string()));
                }
            }
        }
        report
    }

    /// Copy then delete; a failed delete leaves the copy in place
    async fn rename(&self, from: &str, to: &str) -> Result<(), String> {
        self.store
            .copy_object(&self.remote(from), &self.remote(to))
            .await
            .map_err(|e| format!("failed to copy object during rename: {e}"))?;

        self.store
            .delete_object(&self.remote(from))
            .await
            .map_err(|e| format!("failed to delete original object during rename: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::eq;
    use s4_core::{DiskFs, Error, Result};
    use tempfile::TempDir;

    mock! {
        Store {}

        #[async_trait]
        impl ObjectStore for Store {
            async fn list_entries(&self, dir: &RemotePath) -> Result<Vec<Entry>>;
            async fn list_descendants(&self, dir: &RemotePath) -> Result<Vec<Entry>>;
            async fn get_object(&self, path: &RemotePath) -> Result<Vec<u8>>;
            async fn put_object(
                &self,
                path: &RemotePath,
                data: Vec<u8>,
                content_type: Option<String>,
            ) -> Result<()>;
            async fn delete_object(&self, path: &RemotePath) -> Result<()>;
            async fn copy_object(&self, src: &RemotePath, dst: &RemotePath) -> Result<()>;
            async fn bucket_accessible(&self, bucket: &str) -> Result<()>;
        }
    }

    fn path(key: &str) -> RemotePath {
        RemotePath::new("bucket", key)
    }

    fn dispatcher(store: MockStore) -> (Dispatcher, mpsc::UnboundedReceiver<CommandResult>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Dispatcher::new(Arc::new(store), Arc::new(DiskFs), "bucket", tx);
        (dispatcher, rx)
    }

    #[tokio::test]
    async fn test_rename_copies_then_deletes() {
        let mut store = MockStore::new();
        let mut seq = mockall::Sequence::new();
        store
            .expect_copy_object()
            .with(eq(path("docs/a.txt")), eq(path("docs/b.txt")))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        store
            .expect_delete_object()
            .with(eq(path("docs/a.txt")))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let (dispatcher, _rx) = dispatcher(store);
        let result = dispatcher
            .execute(Command::Rename {
                from: "docs/a.txt".into(),
                to: "docs/b.txt".into(),
            })
            .await;

        assert_eq!(
            result,
            CommandResult::Renamed {
                from: "docs/a.txt".into(),
                to: "docs/b.txt".into(),
                result: Ok(()),
            }
        );
    }

    #[tokio::test]
    async fn test_rename_copy_failure_skips_delete() {
        let mut store = MockStore::new();
        store
            .expect_copy_object()
            .returning(|_, _| Err(Error::Auth("denied".into())));
        store.expect_delete_object().never();

        let (dispatcher, _rx) = dispatcher(store);
        let result = dispatcher
            .execute(Command::Rename {
                from: "a.txt".into(),
                to: "b.txt".into(),
            })
            .await;

        let CommandResult::Renamed { result, .. } = result else {
            panic!("expected rename result");
        };
        let err = result.unwrap_err();
        assert!(err.starts_with("failed to copy object during rename"));
    }

    #[tokio::test]
    async fn test_rename_delete_failure_reported() {
        let mut store = MockStore::new();
        store.expect_copy_object().returning(|_, _| Ok(()));
        store
            .expect_delete_object()
            .returning(|_| Err(Error::Network("timeout".into())));

        let (dispatcher, _rx) = dispatcher(store);
        let result = dispatcher
            .execute(Command::Rename {
                from: "a.txt".into(),
                to: "b.txt".into(),
            })
            .await;

        let CommandResult::Renamed { result, .. } = result else {
            panic!("expected rename result");
        };
        assert!(result
            .unwrap_err()
            .starts_with("failed to delete original object during rename"));
    }

    #[tokio::test]
    async fn test_paste_attempts_every_job() {
        let mut store = MockStore::new();
        store.expect_copy_object().times(3).returning(|src, _| {
            if src.key == "src/bad.txt" {
                Err(Error::NotFound(src.to_string()))
            } else {
                Ok(())
            }
        });

        let (dispatcher, _rx) = dispatcher(store);
        let jobs = vec![
            CopyJob {
                source: "src/a.txt".into(),
                destination: "dst/a_copy_1.txt".into(),
            },
            CopyJob {
                source: "src/bad.txt".into(),
                destination: "dst/bad.txt".into(),
            },
            CopyJob {
                source: "src/b.txt".into(),
                destination: "dst/b.txt".into(),
            },
        ];

        let CommandResult::Pasted(report) = dispatcher.execute(Command::Paste { jobs }).await
        else {
            panic!("expected paste result");
        };
        assert_eq!(report.copied, vec!["a_copy_1.txt", "b.txt"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "bad.txt");

        let summary = report.summary();
        assert!(summary.starts_with("Failed to copy 1 file(s): bad.txt"));
        assert!(summary.ends_with("Successfully copied: a_copy_1.txt, b.txt"));
    }

    #[test]
    fn test_paste_summary_all_copied() {
        let report = PasteReport {
            copied: vec!["a_copy_1.txt".into(), "b.txt".into()],
            failed: Vec::new(),
        };
        assert_eq!(report.summary(), "Copied 2 file(s): a_copy_1.txt, b.txt");
    }

    #[tokio::test]
    async fn test_download_writes_into_download_dir() {
        let mut store = MockStore::new();
        store
            .expect_get_object()
            .with(eq(path("reports/q1.csv")))
            .returning(|_| Ok(b"a,b\n1,2\n".to_vec()));

        let temp = TempDir::new().unwrap();
        let (dispatcher, _rx) = dispatcher(store);
        let dispatcher = dispatcher.with_download_dir(temp.path().to_path_buf());

        let result = dispatcher
            .execute(Command::Download {
                key: "reports/q1.csv".into(),
            })
            .await;

        let expected = temp.path().join("q1.csv");
        assert_eq!(
            result,
            CommandResult::Downloaded {
                key: "reports/q1.csv".into(),
                result: Ok(expected.clone()),
            }
        );
        assert_eq!(std::fs::read(expected).unwrap(), b"a,b\n1,2\n");
    }

    #[tokio::test]
    async fn test_upload_guesses_content_type() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("page.html");
        std::fs::write(&source, b"<html></html>").unwrap();

        let mut store = MockStore::new();
        store
            .expect_put_object()
            .withf(|path, data, content_type| {
                path.key == "site/page.html"
                    && data == b"<html></html>"
                    && content_type.as_deref() == Some("text/html")
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let (dispatcher, _rx) = dispatcher(store);
        let result = dispatcher
            .execute(Command::Upload {
                source,
                key: "site/page.html".into(),
            })
            .await;

        assert!(matches!(result, CommandResult::Uploaded { result: Ok(()), .. }));
    }

    #[tokio::test]
    async fn test_upload_missing_file_reports_read_error() {
        let mut store = MockStore::new();
        store.expect_put_object().never();

        let (dispatcher, _rx) = dispatcher(store);
        let result = dispatcher
            .execute(Command::Upload {
                source: PathBuf::from("/definitely/not/here.txt"),
                key: "here.txt".into(),
            })
            .await;

        let CommandResult::Uploaded { result, .. } = result else {
            panic!("expected upload result");
        };
        assert!(result.unwrap_err().starts_with("failed to read file"));
    }

    #[tokio::test]
    async fn test_list_error_is_carried_as_text() {
        let mut store = MockStore::new();
        store
            .expect_list_entries()
            .returning(|_| Err(Error::Network("connection refused".into())));

        let (dispatcher, _rx) = dispatcher(store);
        let result = dispatcher.execute(Command::List { dir: "".into() }).await;

        assert_eq!(
            result,
            CommandResult::Listed {
                dir: String::new(),
                result: Err("Network error: connection refused".into()),
            }
        );
    }

    #[tokio::test]
    async fn test_list_local_resolves_path() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("notes.md"), b"# notes").unwrap();

        let (dispatcher, _rx) = dispatcher(MockStore::new());
        let result = dispatcher
            .execute(Command::ListLocal {
                path: temp.path().join("."),
            })
            .await;

        let CommandResult::LocalListed { path, result } = result else {
            panic!("expected local listing");
        };
        assert_eq!(path, std::fs::canonicalize(temp.path()).unwrap());
        let names: Vec<String> = result.unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["..", "notes.md"]);
    }

    #[tokio::test]
    async fn test_dispatch_sends_exactly_one_result() {
        let mut store = MockStore::new();
        store
            .expect_delete_object()
            .times(1)
            .returning(|_| Ok(()));

        let (dispatcher, mut rx) = dispatcher(store);
        dispatcher.dispatch(Command::Delete {
            key: "old.log".into(),
        });

        let result = rx.recv().await.unwrap();
        assert_eq!(
            result,
            CommandResult::Deleted {
                key: "old.log".into(),
                result: Ok(()),
            }
        );

        drop(dispatcher);
        assert!(rx.recv().await.is_none());
    }
}
