//! Interrupt handling and graceful shutdown.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Spawns a task that cancels `interrupt` on Ctrl-C.
///
/// The task exits without touching `interrupt` once `cancel` fires.
pub fn spawn_interrupt_watcher(
    interrupt: CancellationToken,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => match result {
                Ok(()) => {
                    log::warn!("Interrupt received, finishing queued work before exit");
                    interrupt.cancel();
                }
                Err(e) => log::warn!("Cannot listen for Ctrl-C: {e}"),
            },
            _ = cancel.cancelled() => {}
        }
    })
}

/// Stops background tasks and waits for them to exit.
pub async fn shutdown_gracefully(cancel: CancellationToken, watcher: Option<JoinHandle<()>>) {
    cancel.cancel();
    if let Some(watcher) = watcher {
        if let Err(e) = watcher.await {
            log::warn!("Interrupt watcher terminated abnormally: {e}");
        }
    }
}
