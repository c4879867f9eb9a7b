use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tracing::debug;
use tracing::error;

use crate::PersistenceEngine;
use crate::Value;

pub(crate) enum WriteTask {
    /// Persist a full snapshot of one preference set.
    Persist {
        engine: Arc<PersistenceEngine>,
        snapshot: HashMap<String, Value>,
    },
    /// Acknowledge once every previously submitted task has completed.
    Flush(oneshot::Sender<()>),
}

/// Strictly ordered single-worker executor for background disk writes.
///
/// Tasks run one at a time in submission order. Commits submit under the
/// entries lock, which totally orders commits per preference set, so disk
/// writes land in the same relative order as the memory commits they mirror.
/// Writes for different sets share the queue and may interleave with each
/// other, never within one set.
///
/// A failed background write is logged and otherwise dropped; there is no
/// return path to the caller that triggered it.
#[derive(Clone)]
pub struct WriteQueue {
    tx: mpsc::UnboundedSender<WriteTask>,
}

impl WriteQueue {
    /// Spawns the worker task. Must be called from within a tokio runtime.
    pub(crate) fn spawn() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<WriteTask>();
        tokio::spawn(async move {
            while let Some(task) = rx.recv().await {
                match task {
                    WriteTask::Persist { engine, snapshot } => {
                        if let Err(e) = engine.save(&snapshot).await {
                            error!(
                                "background write for preference set {} failed: {:?}",
                                engine.name(),
                                e
                            );
                        }
                    }
                    WriteTask::Flush(ack) => {
                        let _ = ack.send(());
                    }
                }
            }
            debug!("write queue worker stopped");
        });
        Self { tx }
    }

    /// Non-blocking submission; legal while holding the entries lock.
    pub(crate) fn submit(
        &self,
        task: WriteTask,
    ) {
        if self.tx.send(task).is_err() {
            error!("write queue worker is gone; dropping disk write");
        }
    }

    /// Resolves once every write submitted before this call has completed.
    pub(crate) async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.submit(WriteTask::Flush(ack_tx));
        let _ = ack_rx.await;
    }
}
