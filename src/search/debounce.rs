//! Single-slot cancellable timer

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Runs at most one delayed task at a time
///
/// Scheduling a new task aborts the pending one, so only the most recent
/// schedule ever runs. Dropping the debouncer cancels whatever is pending.
/// Must be used from within a tokio runtime.
#[derive(Debug, Default)]
pub struct Debouncer {
    slot: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    /// Debouncer with nothing scheduled
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay`, replacing any pending task
    pub fn schedule<F>(&self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });

        let previous = self.slot().replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Drop the pending task, if any; returns whether one was still waiting
    pub fn cancel(&self) -> bool {
        match self.slot().take() {
            Some(handle) => {
                let pending = !handle.is_finished();
                handle.abort();
                pending
            }
            None => false,
        }
    }

    /// Whether a scheduled task has not run to completion yet
    pub fn is_pending(&self) -> bool {
        self.slot()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.slot.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
