//! Single-flight task handles shared by the ingest and bibliography actors.

use tokio::task::JoinHandle;

/// The in-flight run, if any. `Some` means the gate is held.
pub(super) type Flight = Option<JoinHandle<()>>;

/// Wait for the in-flight run (pends forever if there is none).
///
/// The handle stays in place when this future is dropped, so losing a
/// `select!` race never loses track of the run. The caller clears the
/// slot once this returns.
pub(super) async fn wait_task(task: &mut Flight) {
    match task.as_mut() {
        Some(handle) => {
            if let Err(e) = handle.await
                && e.is_panic()
            {
                crate::log!("error"; "conversion task panicked");
            }
        }
        None => std::future::pending().await,
    }
}

/// Abort the in-flight run on shutdown.
pub(super) fn abort_task(task: &mut Flight) {
    if let Some(handle) = task.take() {
        handle.abort();
    }
}

/// Aborts the wrapped task when dropped.
pub(super) struct AbortOnDrop(pub(super) JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}
