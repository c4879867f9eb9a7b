use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::sync::RwLock;
use tracing::debug;

use crate::Editor;
use crate::FromValue;
use crate::ListenerSet;
use crate::PersistenceEngine;
use crate::PrefListener;
use crate::Value;
use crate::WriteQueue;

/// A named, independently persisted mapping from string keys to typed values.
///
/// The in-memory map is the source of truth; disk state trails it and is
/// never observably ahead. A set is created at most once per name by the
/// [`Registry`](crate::Registry) and lives for the life of the process.
///
/// All reads wait on the load barrier: nothing observes `entries` before the
/// initial asynchronous load from disk has completed.
pub struct PreferenceSet {
    pub(crate) name: String,
    pub(crate) entries: RwLock<HashMap<String, Value>>,
    loaded: watch::Receiver<bool>,
    pub(crate) listeners: ListenerSet,
    pub(crate) engine: Arc<PersistenceEngine>,
    pub(crate) write_queue: WriteQueue,
}

impl PreferenceSet {
    /// Constructs the set and kicks off the initial load in the background.
    ///
    /// The caller gets the instance immediately; the first read or edit
    /// suspends until the load task flips the barrier.
    pub(crate) fn spawn_loaded(
        name: String,
        engine: Arc<PersistenceEngine>,
        write_queue: WriteQueue,
    ) -> Arc<Self> {
        let (loaded_tx, loaded_rx) = watch::channel(false);
        let set = Arc::new(Self {
            name,
            entries: RwLock::new(HashMap::new()),
            loaded: loaded_rx,
            listeners: ListenerSet::default(),
            engine,
            write_queue,
        });

        let load_target = set.clone();
        tokio::spawn(async move {
            let entries = load_target.engine.load().await;
            *load_target.entries.write().await = entries;
            let _ = loaded_tx.send(true);
            debug!("initial load completed for preference set {}", load_target.name);
        });

        set
    }

    /// One-shot gate: resolves once the initial disk load has completed.
    pub(crate) async fn wait_loaded(&self) {
        let mut loaded = self.loaded.clone();
        let _ = loaded.wait_for(|done| *done).await;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a key exists in this preference set.
    pub async fn contains(
        &self,
        key: &str,
    ) -> bool {
        self.wait_loaded().await;
        self.entries.read().await.contains_key(key)
    }

    /// Typed read. Returns `default` when the key is absent or the stored
    /// value has a different kind; neither case is an error.
    pub async fn get<T: FromValue>(
        &self,
        key: &str,
        default: T,
    ) -> T {
        self.wait_loaded().await;
        self.entries
            .read()
            .await
            .get(key)
            .and_then(T::from_value)
            .unwrap_or(default)
    }

    /// Untyped read of any value kind, object values included.
    pub async fn get_object(
        &self,
        key: &str,
        default: Value,
    ) -> Value {
        self.wait_loaded().await;
        self.entries.read().await.get(key).cloned().unwrap_or(default)
    }

    /// Registers a channel for change notifications. Idempotent.
    ///
    /// Notifications are best-effort: when the channel's buffer is full the
    /// key is dropped for that listener. Close the channel only after
    /// [`unregister_listener`](Self::unregister_listener) returns.
    pub fn register_listener(
        &self,
        listener: PrefListener,
    ) {
        self.listeners.register(listener);
    }

    /// Removes a previously registered channel; a no-op for unknown ones.
    pub fn unregister_listener(
        &self,
        listener: &PrefListener,
    ) {
        self.listeners.unregister(listener);
    }

    /// Creates an editor for a batch of mutations against this set.
    pub fn edit(self: &Arc<Self>) -> Editor {
        Editor::new(self.clone())
    }
}
