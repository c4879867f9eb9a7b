use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;
use tracing::warn;

use crate::Result;
use crate::SnapshotCodec;
use crate::StorageError;
use crate::Value;

/// Durable storage for one preference set's snapshot.
///
/// Writes follow a two-file backup-swap protocol: before a new snapshot is
/// written, the current main file is renamed to the backup path, and the
/// backup is only deleted once the new main file is fully written. At any
/// point, including a crash mid-write, at least one of the two files holds a
/// complete valid snapshot, and [`load`](Self::load) recovers the most recent
/// one.
///
/// `disk_lock` serializes every touch of the file pair; it is deliberately
/// separate from the in-memory entries lock so a write in progress does not
/// stall concurrent reads.
pub struct PersistenceEngine {
    name: String,
    file: PathBuf,
    backup: PathBuf,
    codec: Arc<dyn SnapshotCodec>,
    disk_lock: Mutex<()>,
}

impl PersistenceEngine {
    pub(crate) fn new(
        name: String,
        file: PathBuf,
        backup: PathBuf,
        codec: Arc<dyn SnapshotCodec>,
    ) -> Self {
        Self {
            name,
            file,
            backup,
            codec,
            disk_lock: Mutex::new(()),
        }
    }

    /// Reads the persisted snapshot, recovering from an interrupted write if
    /// a backup file is present.
    ///
    /// Never fails: a missing file means a fresh set, and an unreadable or
    /// malformed file is logged and treated as empty rather than blocking
    /// startup.
    pub async fn load(&self) -> HashMap<String, Value> {
        let _guard = self.disk_lock.lock().await;

        // A leftover backup means the last write cycle never confirmed; the
        // backup is the last known-good state, so it wins over any partial
        // main file.
        if fs::try_exists(&self.backup).await.unwrap_or(false) {
            let _ = fs::remove_file(&self.file).await;
            if let Err(e) = fs::rename(&self.backup, &self.file).await {
                warn!(
                    "failed to promote backup file for preference set {}: {:?}",
                    self.name, e
                );
            }
        }

        match fs::read(&self.file).await {
            Ok(bytes) => match self.codec.decode(&bytes) {
                Ok(entries) => {
                    debug!(
                        "loaded {} entries for preference set {}",
                        entries.len(),
                        self.name
                    );
                    entries
                }
                Err(e) => {
                    warn!("failed to decode preference set {}: {:?}", self.name, e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no backing file for preference set {}; starting fresh", self.name);
                HashMap::new()
            }
            Err(e) => {
                warn!("failed to read preference set {}: {:?}", self.name, e);
                HashMap::new()
            }
        }
    }

    /// Durably writes a full snapshot using the backup-swap protocol.
    ///
    /// On failure the partially written main file is removed and the backup
    /// is left in place, so the last committed snapshot stays recoverable.
    pub async fn save(
        &self,
        snapshot: &HashMap<String, Value>,
    ) -> Result<()> {
        let _guard = self.disk_lock.lock().await;

        if fs::try_exists(&self.file).await.unwrap_or(false) {
            if fs::try_exists(&self.backup).await.unwrap_or(false) {
                // The backup already holds the last-good state; the stale
                // main file can simply go.
                fs::remove_file(&self.file).await.map_err(|e| StorageError::Path {
                    path: self.file.clone(),
                    source: e,
                })?;
            } else {
                fs::rename(&self.file, &self.backup).await.map_err(|e| StorageError::Path {
                    path: self.backup.clone(),
                    source: e,
                })?;
            }
        }

        let bytes = match self.codec.encode(snapshot) {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = fs::remove_file(&self.file).await;
                return Err(e);
            }
        };

        if let Err(e) = fs::write(&self.file, &bytes).await {
            let _ = fs::remove_file(&self.file).await;
            return Err(StorageError::Path {
                path: self.file.clone(),
                source: e,
            }
            .into());
        }

        // Write confirmed; the backup is no longer the recovery point.
        let _ = fs::remove_file(&self.backup).await;
        debug!(
            "persisted {} entries for preference set {}",
            snapshot.len(),
            self.name
        );
        Ok(())
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }
}
