use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::trace;

/// Change-notification channel registered by a listener.
///
/// The channel's capacity is the caller-tuned bound between backlog and drop:
/// notifications to a full channel are dropped, never queued or retried.
pub type PrefListener = mpsc::Sender<String>;

/// Registered listener channels for one preference set.
///
/// Fan-out is best-effort and non-blocking: a slow listener loses
/// notifications rather than stalling the committing writer. The set only
/// ever sends to channels; closing them is the owning caller's job, after
/// unregistering.
#[derive(Default)]
pub(crate) struct ListenerSet {
    listeners: Mutex<Vec<PrefListener>>,
}

impl ListenerSet {
    /// Adds a listener channel. Registering the same channel twice has no
    /// additional effect.
    pub(crate) fn register(
        &self,
        listener: PrefListener,
    ) {
        let mut listeners = self.listeners.lock();
        if !listeners.iter().any(|l| l.same_channel(&listener)) {
            listeners.push(listener);
        }
    }

    /// Removes a listener channel; unknown channels are a no-op.
    pub(crate) fn unregister(
        &self,
        listener: &PrefListener,
    ) {
        self.listeners.lock().retain(|l| !l.same_channel(listener));
    }

    /// Best-effort fan-out of changed keys to every registered channel.
    pub(crate) fn notify(
        &self,
        changed_keys: &[String],
    ) {
        let listeners = self.listeners.lock();
        for key in changed_keys {
            for listener in listeners.iter() {
                match listener.try_send(key.clone()) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        trace!("listener buffer full; dropping notification for key {}", key);
                    }
                    // The caller closed its channel without unregistering;
                    // skip it until it is removed.
                    Err(TrySendError::Closed(_)) => {}
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.listeners.lock().len()
    }
}
