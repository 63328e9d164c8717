//! UI task queue for deferred callbacks.
//!
//! Widgets post user-facing notifications here instead of calling them from
//! inside an event handler, so a callback that mutates widget state never runs
//! while that widget is mid-gesture.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// A deferred unit of work.
pub struct UiTask {
    label: &'static str,
    run: Box<dyn FnOnce()>,
}

impl UiTask {
    /// Name given when the task was posted.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }
}

impl fmt::Debug for UiTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiTask").field("label", &self.label).finish()
    }
}

/// FIFO queue of [`UiTask`]s shared between widgets and the host.
///
/// Clones share the same queue.
#[derive(Clone, Default)]
pub struct TaskQueue {
    inner: Rc<RefCell<VecDeque<UiTask>>>,
}

impl TaskQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task. Posting order is execution order.
    pub fn post(&self, label: &'static str, run: impl FnOnce() + 'static) {
        trace!(label, "task posted");
        self.inner.borrow_mut().push_back(UiTask {
            label,
            run: Box::new(run),
        });
    }

    /// Number of tasks waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Whether no tasks are waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Labels of waiting tasks, oldest first.
    #[must_use]
    pub fn pending_labels(&self) -> Vec<&'static str> {
        self.inner.borrow().iter().map(UiTask::label).collect()
    }

    /// Run every task that was queued when the call started.
    ///
    /// Tasks posted by a running task wait for the next call. Returns the
    /// number of tasks run.
    pub fn run_pending(&self) -> usize {
        let count = self.len();
        for _ in 0..count {
            // Release the borrow before running so the task may post.
            let task = self.inner.borrow_mut().pop_front();
            let Some(task) = task else { break };
            trace!(label = task.label, "task run");
            (task.run)();
        }
        count
    }
}

impl fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.pending_labels())
            .finish()
    }
}
