use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::JsonCodec;
use crate::PersistenceEngine;
use crate::PrefPathManager;
use crate::PreferenceSet;
use crate::Result;
use crate::SnapshotCodec;
use crate::StorageError;
use crate::StoreConfig;
use crate::TypeRegistry;
use crate::WriteQueue;

/// Process-wide owner of every named preference set.
///
/// Construct one at process start and pass it by reference to consumers;
/// there is no hidden global. `get_or_create` is idempotent: concurrent first
/// calls for one name race on the shard entry and resolve to the same
/// instance. Sets are never destroyed while the process runs.
///
/// Construction must happen inside a tokio runtime, because the registry
/// spawns the background write worker and each set's initial load task.
pub struct Registry {
    paths: PrefPathManager,
    codec: Arc<dyn SnapshotCodec>,
    sets: DashMap<String, Arc<PreferenceSet>>,
    write_queue: WriteQueue,
}

impl Registry {
    /// Creates a registry with the default JSON codec, validating the
    /// configuration and creating the base directory.
    pub fn new(
        config: StoreConfig,
        types: TypeRegistry,
    ) -> Result<Self> {
        Self::with_codec(config, Arc::new(JsonCodec::new(types)))
    }

    /// Creates a registry with a caller-supplied snapshot codec.
    pub fn with_codec(
        config: StoreConfig,
        codec: Arc<dyn SnapshotCodec>,
    ) -> Result<Self> {
        config.validate()?;
        std::fs::create_dir_all(&config.base_path).map_err(|e| StorageError::Path {
            path: config.base_path.clone(),
            source: e,
        })?;
        Ok(Self {
            paths: PrefPathManager::new(config.base_path),
            codec,
            sets: DashMap::new(),
            write_queue: WriteQueue::spawn(),
        })
    }

    /// Gets the preference set for `name`, creating it on first access.
    ///
    /// Creation marks the set's load barrier pending and launches the
    /// initial load asynchronously; this call never blocks on disk.
    pub fn get_or_create(
        &self,
        name: &str,
    ) -> Arc<PreferenceSet> {
        self.sets
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!("creating preference set {}", name);
                let engine = Arc::new(PersistenceEngine::new(
                    name.to_string(),
                    self.paths.file_path(name),
                    self.paths.backup_path(name),
                    self.codec.clone(),
                ));
                PreferenceSet::spawn_loaded(name.to_string(), engine, self.write_queue.clone())
            })
            .clone()
    }

    /// Waits until every background write queued so far has completed.
    ///
    /// Useful on shutdown paths that need `apply`-based commits durable
    /// before the process exits.
    pub async fn flush_writes(&self) {
        self.write_queue.flush().await;
    }
}
