//! Background task bookkeeping for components.
//!
//! Components that start async work (a navigation waiting on a view load, a timer) keep the
//! handles in a [`TaskTracker`] so the work dies with the component.

use tokio::task::AbortHandle;

/// A handle to a spawned task that can be aborted.
#[derive(Debug)]
pub struct TaskHandle {
    abort_handle: AbortHandle,
}

impl TaskHandle {
    pub fn new(abort_handle: AbortHandle) -> Self {
        Self { abort_handle }
    }

    /// Abort the task at its next await point.
    pub fn abort(&self) {
        self.abort_handle.abort();
    }

    /// True once the task completed or was aborted.
    pub fn is_finished(&self) -> bool {
        self.abort_handle.is_finished()
    }
}

/// Labelled task handles that are aborted together, at the latest when the tracker drops.
#[derive(Debug, Default)]
pub struct TaskTracker {
    handles: Vec<(String, TaskHandle)>,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a task under a label used in logs.
    pub fn track(&mut self, label: impl Into<String>, handle: TaskHandle) {
        self.prune();
        self.handles.push((label.into(), handle));
    }

    /// Forget tasks that already finished.
    pub fn prune(&mut self) {
        self.handles.retain(|(_, h)| !h.is_finished());
    }

    /// Abort every tracked task. Returns how many were still running.
    pub fn abort_all(&mut self) -> usize {
        let mut aborted = 0;
        for (label, handle) in self.handles.drain(..) {
            if !handle.is_finished() {
                tracing::debug!(task = %label, "Aborting task");
                aborted += 1;
            }
            handle.abort();
        }
        aborted
    }

    /// Labels of tasks still running.
    pub fn active(&self) -> Vec<&str> {
        self.handles
            .iter()
            .filter(|(_, h)| !h.is_finished())
            .map(|(label, _)| label.as_str())
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.handles.iter().filter(|(_, h)| !h.is_finished()).count()
    }
}

impl Drop for TaskTracker {
    fn drop(&mut self) {
        self.abort_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn forever() -> TaskHandle {
        let handle = tokio::spawn(async {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        });
        TaskHandle::new(handle.abort_handle())
    }

    #[tokio::test]
    async fn test_task_handle_abort() {
        let task = forever();
        assert!(!task.is_finished());
        task.abort();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(task.is_finished());
    }

    #[tokio::test]
    async fn test_tracker_aborts_all() {
        let mut tracker = TaskTracker::new();
        tracker.track("navigate /", forever());
        tracker.track("navigate /games", forever());
        assert_eq!(tracker.active(), vec!["navigate /", "navigate /games"]);

        assert_eq!(tracker.abort_all(), 2);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(tracker.active_count(), 0);
    }

    #[tokio::test]
    async fn test_finished_tasks_are_pruned() {
        let mut tracker = TaskTracker::new();
        let done = tokio::spawn(async {});
        let abort = done.abort_handle();
        done.await.unwrap();

        tracker.track("done", TaskHandle::new(abort));
        tracker.prune();
        assert_eq!(tracker.active_count(), 0);
        assert_eq!(tracker.abort_all(), 0);
    }
}
