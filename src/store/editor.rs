use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use crate::PreferenceSet;
use crate::Value;
use crate::WriteTask;

/// A batch of pending mutations against one [`PreferenceSet`].
///
/// Mutations accumulate locally and hit the set only on [`apply`](Self::apply)
/// or [`commit`](Self::commit). A removal is recorded as a tombstone (`None`)
/// in the pending map; tombstones never reach the set's entries. Each commit
/// pass re-diffs the pending mutations against the current entries, so only
/// keys whose value actually changes are written and notified.
///
/// An editor is meant for a single logical transaction and is discarded after
/// one apply/commit; reuse is legal but each pass diffs against the then
/// current state.
pub struct Editor {
    pref: Arc<PreferenceSet>,
    state: Mutex<EditorState>,
}

#[derive(Default)]
struct EditorState {
    /// Pending key mutations; `None` is a tombstone.
    modifications: HashMap<String, Option<Value>>,
    /// Expand to tombstones-for-every-current-key at commit time.
    cleared: bool,
}

impl Editor {
    pub(crate) fn new(pref: Arc<PreferenceSet>) -> Self {
        Self {
            pref,
            state: Mutex::new(EditorState::default()),
        }
    }

    /// Stages a value for a key.
    pub fn put(
        &self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> &Self {
        self.state.lock().modifications.insert(key.into(), Some(value.into()));
        self
    }

    /// Stages removal of a key.
    pub fn remove(
        &self,
        key: impl Into<String>,
    ) -> &Self {
        self.state.lock().modifications.insert(key.into(), None);
        self
    }

    /// Stages removal of every key. Puts staged in the same transaction
    /// survive the clear.
    pub fn clear(&self) -> &Self {
        self.state.lock().cleared = true;
        self
    }

    /// Commits to memory synchronously and queues the disk write.
    ///
    /// Returns once the in-memory state is updated and listeners are
    /// notified; durability follows in the background with no failure signal
    /// back to this caller (failures are logged).
    pub async fn apply(&self) {
        self.pref.wait_loaded().await;
        let mut entries = self.pref.entries.write().await;
        let changed_keys = self.commit_to_memory(&mut entries);
        if changed_keys.is_empty() {
            return;
        }
        // Submitting while the entries lock is held keeps queued writes in
        // the same order as memory commits.
        self.pref.write_queue.submit(WriteTask::Persist {
            engine: self.pref.engine.clone(),
            snapshot: entries.clone(),
        });
        drop(entries);
        self.pref.listeners.notify(&changed_keys);
    }

    /// Commits to memory and disk synchronously.
    ///
    /// Returns whether the disk write succeeded. On failure the in-memory
    /// update stands and the previous on-disk snapshot remains recoverable.
    pub async fn commit(&self) -> bool {
        self.pref.wait_loaded().await;
        let mut entries = self.pref.entries.write().await;
        let changed_keys = self.commit_to_memory(&mut entries);
        if changed_keys.is_empty() {
            return true;
        }
        let result = self.pref.engine.save(&entries).await;
        drop(entries);
        if let Err(e) = &result {
            warn!(
                "synchronous commit for preference set {} failed to persist: {:?}",
                self.pref.name, e
            );
        }
        self.pref.listeners.notify(&changed_keys);
        result.is_ok()
    }

    /// Applies pending mutations to `entries`, returning the keys whose
    /// values actually changed, in encounter order.
    fn commit_to_memory(
        &self,
        entries: &mut HashMap<String, Value>,
    ) -> Vec<String> {
        let mut state = self.state.lock();
        if state.cleared {
            // Re-seed the pending map with a tombstone for every current key,
            // then overlay the explicit mutations so same-transaction puts
            // survive the clear.
            let staged = std::mem::take(&mut state.modifications);
            let mut expanded: HashMap<String, Option<Value>> =
                entries.keys().map(|k| (k.clone(), None)).collect();
            expanded.extend(staged);
            state.modifications = expanded;
        }

        let mut changed_keys = Vec::new();
        for (key, pending) in state.modifications.iter() {
            match pending {
                None => {
                    if entries.remove(key).is_some() {
                        changed_keys.push(key.clone());
                    }
                }
                Some(value) => {
                    // Deep structural equality; an unchanged value produces
                    // no write and no notification.
                    if entries.get(key) != Some(value) {
                        entries.insert(key.clone(), value.clone());
                        changed_keys.push(key.clone());
                    }
                }
            }
        }
        changed_keys
    }
}
