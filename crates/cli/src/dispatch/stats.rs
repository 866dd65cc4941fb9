//! Directory statistics with per-dimension deadlines
//!
//! Size and latest modification date are computed by two independent tasks.
//! Each task races its own deadline; the first to settle decides that
//! dimension. A task that misses its deadline is detached, not cancelled, and
//! whatever it eventually returns is discarded.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;
use tokio::task::JoinHandle;

use s4_core::{Entry, ObjectStore, RemotePath, Result};

/// Aggregate for one directory, always stored with both dimensions settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirStats {
    /// Total bytes below the directory (0 when timed out)
    pub size: u64,
    /// The size dimension failed or missed its deadline
    pub size_timed_out: bool,
    /// Newest modification time below the directory
    pub last_modified: Option<Timestamp>,
    /// The date dimension failed or missed its deadline
    pub date_timed_out: bool,
}

/// Deadlines for the two stat dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsDeadlines {
    pub size: Duration,
    pub date: Duration,
}

impl Default for StatsDeadlines {
    fn default() -> Self {
        Self {
            size: Duration::from_millis(s4_core::config::DEFAULT_SIZE_TIMEOUT_MS),
            date: Duration::from_millis(s4_core::config::DEFAULT_DATE_TIMEOUT_MS),
        }
    }
}

/// Compute stats for `dir`, never taking longer than the larger deadline
pub async fn aggregate(
    store: Arc<dyn ObjectStore>,
    dir: RemotePath,
    deadlines: StatsDeadlines,
) -> DirStats {
    let size_task = spawn_dimension(&store, &dir, |entries| {
        entries.iter().filter(|e| !e.is_dir).map(|e| e.size).sum::<u64>()
    });
    let date_task = spawn_dimension(&store, &dir, |entries| {
        entries.iter().filter_map(|e| e.last_modified).max()
    });

    let (size, date) = tokio::join!(
        settle(size_task, deadlines.size, &dir, "size"),
        settle(date_task, deadlines.date, &dir, "date"),
    );

    DirStats {
        size: size.unwrap_or(0),
        size_timed_out: size.is_none(),
        last_modified: date.flatten(),
        date_timed_out: date.is_none(),
    }
}

fn spawn_dimension<T, F>(
    store: &Arc<dyn ObjectStore>,
    dir: &RemotePath,
    reduce: F,
) -> JoinHandle<Result<T>>
where
    T: Send + 'static,
    F: FnOnce(&[Entry]) -> T + Send + 'static,
{
    let store = Arc::clone(store);
    let dir = dir.clone();
    tokio::spawn(async move {
        let entries = store.list_descendants(&dir).await?;
        Ok(reduce(entries.as_slice()))
    })
}

/// Wait for a dimension up to its deadline; `None` means failed or late
async fn settle<T>(
    task: impl Future<Output = std::result::Result<Result<T>, tokio::task::JoinError>>,
    deadline: Duration,
    dir: &RemotePath,
    dimension: &str,
) -> Option<T> {
    match tokio::time::timeout(deadline, task).await {
        Ok(Ok(Ok(value))) => Some(value),
        Ok(Ok(Err(e))) => {
            tracing::warn!(dir = %dir, dimension, "stat computation failed: {e}");
            None
        }
        Ok(Err(e)) => {
            tracing::warn!(dir = %dir, dimension, "stat task aborted: {e}");
            None
        }
        Err(_) => {
            tracing::warn!(dir = %dir, dimension, ?deadline, "stat computation timed out");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use s4_core::Error;

    /// Store whose descendant listing takes a fixed time (or never finishes)
    struct SlowStore {
        delay: Option<Duration>,
        entries: Vec<Entry>,
        fail: bool,
    }

    #[async_trait]
    impl ObjectStore for SlowStore {
        async fn list_entries(&self, _dir: &RemotePath) -> Result<Vec<Entry>> {
            Ok(Vec::new())
        }

        async fn list_descendants(&self, _dir: &RemotePath) -> Result<Vec<Entry>> {
            match self.delay {
                Some(delay) => tokio::time::sleep(delay).await,
                None => std::future::pending::<()>().await,
            }
            if self.fail {
                return Err(Error::Network("connection reset".into()));
            }
            Ok(self.entries.clone())
        }

        async fn get_object(&self, _path: &RemotePath) -> Result<Vec<u8>> {
            unreachable!()
        }

        async fn put_object(
            &self,
            _path: &RemotePath,
            _data: Vec<u8>,
            _content_type: Option<String>,
        ) -> Result<()> {
            unreachable!()
        }

        async fn delete_object(&self, _path: &RemotePath) -> Result<()> {
            unreachable!()
        }

        async fn copy_object(&self, _src: &RemotePath, _dst: &RemotePath) -> Result<()> {
            unreachable!()
        }

        async fn bucket_accessible(&self, _bucket: &str) -> Result<()> {
            Ok(())
        }
    }

    fn ts(secs: i64) -> Timestamp {
        Timestamp::from_second(secs).unwrap()
    }

    fn sample_entries() -> Vec<Entry> {
        vec![
            Entry::file("logs/a.log", 100).modified_at(ts(1_000)),
            Entry::file("logs/2024/b.log", 250).modified_at(ts(3_000)),
            Entry::file("logs/2024/c.log", 50).modified_at(ts(2_000)),
        ]
    }

    fn dir() -> RemotePath {
        RemotePath::new("bucket", "logs")
    }

    #[tokio::test(start_paused = true)]
    async fn test_both_dimensions_resolve() {
        let store = Arc::new(SlowStore {
            delay: Some(Duration::from_millis(10)),
            entries: sample_entries(),
            fail: false,
        });

        let stats = aggregate(store, dir(), StatsDeadlines::default()).await;
        assert_eq!(
            stats,
            DirStats {
                size: 400,
                size_timed_out: false,
                last_modified: Some(ts(3_000)),
                date_timed_out: false,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_size_times_out_date_resolves() {
        let store = Arc::new(SlowStore {
            delay: Some(Duration::from_millis(1500)),
            entries: sample_entries(),
            fail: false,
        });

        let stats = aggregate(store, dir(), StatsDeadlines::default()).await;
        assert!(stats.size_timed_out);
        assert_eq!(stats.size, 0);
        assert!(!stats.date_timed_out);
        assert_eq!(stats.last_modified, Some(ts(3_000)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_store_times_out_both() {
        let store = Arc::new(SlowStore {
            delay: None,
            entries: Vec::new(),
            fail: false,
        });

        let started = tokio::time::Instant::now();
        let stats = aggregate(store, dir(), StatsDeadlines::default()).await;

        assert!(stats.size_timed_out);
        assert!(stats.date_timed_out);
        assert!(started.elapsed() < Duration::from_millis(2100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_marks_dimension_timed_out() {
        let store = Arc::new(SlowStore {
            delay: Some(Duration::from_millis(1)),
            entries: sample_entries(),
            fail: true,
        });

        let stats = aggregate(store, dir(), StatsDeadlines::default()).await;
        assert!(stats.size_timed_out);
        assert!(stats.date_timed_out);
        assert!(stats.last_modified.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_directory() {
        let store = Arc::new(SlowStore {
            delay: Some(Duration::from_millis(1)),
            entries: Vec::new(),
            fail: false,
        });

        let stats = aggregate(store, dir(), StatsDeadlines::default()).await;
        assert_eq!(stats.size, 0);
        assert!(!stats.size_timed_out);
        assert!(stats.last_modified.is_none());
        assert!(!stats.date_timed_out);
    }
}
