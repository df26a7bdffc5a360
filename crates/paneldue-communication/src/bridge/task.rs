use super::{BridgeStats, PanelBridge};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const READ_CHUNK: usize = 4096;

/// A bridge running on its own tokio task.
///
/// The task owns the bridge exclusively. Each loop iteration:
/// 1. reads once from the panel and queues validated commands,
/// 2. relays interpreter acknowledgements that arrived between drains,
/// 3. yields, then runs the scheduled drain activation to completion,
/// 4. sleeps for the poll interval.
pub struct BridgeHandle {
    task: Option<JoinHandle<()>>,
    shutdown: Option<mpsc::Sender<()>>,
    stats: Arc<RwLock<BridgeStats>>,
}

impl BridgeHandle {
    /// Spawn `bridge` on the current tokio runtime
    pub fn spawn(mut bridge: PanelBridge, poll_interval: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let stats = bridge.stats_handle();

        let task = tokio::spawn(async move {
            tracing::info!("PanelDue bridge running on {}", bridge.link_name());
            let mut buf = [0u8; READ_CHUNK];

            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                bridge.poll_read(&mut buf);

                bridge.relay_acknowledgements();

                if bridge.has_pending_drain() {
                    tokio::task::yield_now().await;
                    bridge.run_scheduled_drain();
                }

                tokio::time::sleep(poll_interval).await;
            }

            // queued commands are never cancelled
            bridge.run_scheduled_drain();
            bridge.close();
            tracing::info!("PanelDue bridge stopped: {:?}", bridge.stats());
        });

        Self {
            task: Some(task),
            shutdown: Some(shutdown_tx),
            stats,
        }
    }

    /// Snapshot of the bridge counters
    pub fn stats(&self) -> BridgeStats {
        *self.stats.read()
    }

    /// Check if the bridge task is still running
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the bridge and wait for its task to close the link
    pub async fn stop(mut self) -> anyhow::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.try_send(());
        }

        if let Some(task) = self.task.take() {
            task.await?;
        }

        Ok(())
    }
}

impl Drop for BridgeHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
