//! Tiered response cache.
//!
//! Fetched payloads are cached in two tiers: an in-process memory map keyed
//! by URL, and a disk directory with one file per URL named by the SHA-256
//! of the URL. Disk entries survive process restarts; memory entries do not.
//!
//! Reads never reject on age - a stale disk entry is still a hit until it is
//! explicitly swept with [`TieredCache::clear_old`]. Each sweep persists a
//! small `cache_stats.json` sidecar recording when it ran and what it freed.
//!
//! Disk failures are never fatal: a failed write degrades that entry to
//! memory-only caching, and a failed read falls through to the fetch.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::error::RiotError;

/// Name of the sidecar file holding the last-cleanup record.
const STATS_FILE: &str = "cache_stats.json";

/// Persisted record of the most recent cleanup sweep.
///
/// Overwritten in full on every sweep.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanupRecord {
    /// When the last sweep ran, if any.
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub last_cleanup: Option<OffsetDateTime>,
    /// Files removed by the last sweep.
    pub files_removed: u64,
    /// Bytes freed by the last sweep.
    pub space_cleared: u64,
}

/// Current cache statistics: live disk usage plus the persisted
/// last-cleanup record.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Total size of cached files on disk, in bytes.
    pub disk_bytes: u64,
    /// Number of cached files on disk.
    pub disk_files: u64,
    /// The last-cleanup record from the sidecar file.
    pub last_cleanup: CleanupRecord,
}

/// Memory + disk cache for fetched payloads.
pub struct TieredCache {
    dir: PathBuf,
    memory: Mutex<HashMap<String, Arc<Vec<u8>>>>,
    /// Per-URL flight locks so concurrent requests for one URL do a single
    /// fetch. Grows with the memory tier and is cleared with it.
    flights: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl TieredCache {
    /// Open a cache rooted at `dir`, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, RiotError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            memory: Mutex::new(HashMap::new()),
            flights: Mutex::new(HashMap::new()),
        })
    }

    /// The stable disk file name for a URL.
    pub fn key_for(url: &str) -> String {
        format!("{:x}", Sha256::digest(url.as_bytes()))
    }

    fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(Self::key_for(url))
    }

    /// Get the payload for `url`, fetching it at most once.
    ///
    /// Checks the memory tier, then the disk tier, then runs `fetch` and
    /// writes through both tiers. Concurrent calls for the same URL are
    /// serialized so only one of them runs the fetch.
    pub async fn get_or_fetch<F, Fut>(&self, url: &str, fetch: F) -> Result<Arc<Vec<u8>>, RiotError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<u8>, RiotError>>,
    {
        let flight = {
            let mut flights = self.flights.lock().await;
            Arc::clone(flights.entry(url.to_string()).or_default())
        };
        let _guard = flight.lock().await;

        if let Some(bytes) = self.memory.lock().await.get(url) {
            tracing::trace!(url, "cache hit (memory)");
            return Ok(Arc::clone(bytes));
        }

        let path = self.path_for(url);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                tracing::trace!(url, "cache hit (disk)");
                let bytes = Arc::new(bytes);
                self.memory
                    .lock()
                    .await
                    .insert(url.to_string(), Arc::clone(&bytes));
                return Ok(bytes);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                // Unreadable disk entry: fall through to the network.
                tracing::warn!(url, error = %e, "cache disk read failed");
            }
        }

        let bytes = Arc::new(fetch().await?);

        if let Err(e) = tokio::fs::write(&path, bytes.as_slice()).await {
            tracing::warn!(url, error = %e, "cache disk write failed, keeping entry memory-only");
        }
        self.memory
            .lock()
            .await
            .insert(url.to_string(), Arc::clone(&bytes));

        Ok(bytes)
    }

    /// Remove disk entries whose modification time is at least `max_age`
    /// old, persist the cleanup record, and return `(files_removed,
    /// bytes_freed)`.
    ///
    /// Eviction only ever happens through this call; the cache grows
    /// unbounded between sweeps. Matching memory entries are dropped so a
    /// swept URL is refetched rather than served stale from memory.
    pub async fn clear_old(&self, max_age: Duration) -> Result<(u64, u64), RiotError> {
        let mut files_removed = 0u64;
        let mut space_cleared = 0u64;
        let mut removed_keys = Vec::new();

        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.file_name().is_some_and(|n| n == STATS_FILE) {
                continue;
            }
            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            let age = metadata
                .modified()
                .ok()
                .and_then(|mtime| mtime.elapsed().ok())
                .unwrap_or_default();
            if age < max_age {
                continue;
            }
            let size = metadata.len();
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    files_removed += 1;
                    space_cleared += size;
                    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                        removed_keys.push(name.to_string());
                    }
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "cache sweep failed to remove file"),
            }
        }

        // Drop memory entries and flight locks whose disk file was just
        // swept. A request holding a swept lock keeps its own Arc; the
        // next request for that URL starts from a fresh one.
        if !removed_keys.is_empty() {
            let mut memory = self.memory.lock().await;
            memory.retain(|url, _| !removed_keys.contains(&Self::key_for(url)));
            drop(memory);
            let mut flights = self.flights.lock().await;
            flights.retain(|url, _| !removed_keys.contains(&Self::key_for(url)));
        }

        let record = CleanupRecord {
            last_cleanup: Some(OffsetDateTime::now_utc()),
            files_removed,
            space_cleared,
        };
        self.write_record(&record).await;

        tracing::debug!(files_removed, space_cleared, "cache sweep complete");
        Ok((files_removed, space_cleared))
    }

    /// Current disk usage plus the persisted last-cleanup record.
    pub async fn stats(&self) -> Result<CacheStats, RiotError> {
        let mut disk_bytes = 0u64;
        let mut disk_files = 0u64;

        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.path().file_name().is_some_and(|n| n == STATS_FILE) {
                continue;
            }
            if let Ok(metadata) = entry.metadata().await {
                if metadata.is_file() {
                    disk_bytes += metadata.len();
                    disk_files += 1;
                }
            }
        }

        Ok(CacheStats {
            disk_bytes,
            disk_files,
            last_cleanup: self.read_record().await,
        })
    }

    async fn read_record(&self) -> CleanupRecord {
        match tokio::fs::read(self.dir.join(STATS_FILE)).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "cache stats sidecar unreadable, starting fresh");
                CleanupRecord::default()
            }),
            Err(_) => CleanupRecord::default(),
        }
    }

    async fn write_record(&self, record: &CleanupRecord) {
        let path = self.dir.join(STATS_FILE);
        match serde_json::to_vec(record) {
            Ok(bytes) => {
                if let Err(e) = tokio::fs::write(&path, bytes).await {
                    tracing::warn!(error = %e, "failed to persist cache stats sidecar");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize cache stats sidecar"),
        }
    }

    /// The directory this cache stores files in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[cfg(test)]
    async fn flight_count(&self) -> usize {
        self.flights.lock().await.len()
    }
}

impl std::fmt::Debug for TieredCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredCache")
            .field("dir", &self.dir)
            .finish()
    }
}
