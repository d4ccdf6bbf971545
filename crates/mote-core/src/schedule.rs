//! Cooperative task queue
//!
//! Deferred work runs on a single-thread scheduler. A turn drains the
//! tasks that were queued when the turn started; tasks queued while the
//! turn is running wait for the next one.

use std::collections::VecDeque;

use mote_dom::NodeId;

use crate::bind::ArgExpr;
use crate::instance::InstanceId;

/// A unit of deferred work
pub enum Task {
    /// Dispatch a bound event handler on a controller
    InvokeHandler {
        instance: InstanceId,
        method: String,
        args: Vec<ArgExpr>,
        target: NodeId,
        event: String,
    },
    /// Run an instance's post-render hook
    PostRender { instance: InstanceId },
    /// Promote a deferred image to its real source
    LazyImage { node: NodeId, src: String },
}

/// FIFO queue of deferred tasks
#[derive(Default)]
pub struct Scheduler {
    queue: VecDeque<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: Task) {
        self.queue.push_back(task);
    }

    /// Take the tasks queued so far, leaving later arrivals in place
    pub fn take_turn(&mut self) -> Vec<Task> {
        let count = self.queue.len();
        self.queue.drain(..count).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_is_a_snapshot() {
        let mut sched = Scheduler::new();
        sched.push(Task::LazyImage {
            node: NodeId::ROOT,
            src: "a.png".into(),
        });
        sched.push(Task::LazyImage {
            node: NodeId::ROOT,
            src: "b.png".into(),
        });

        let turn = sched.take_turn();
        assert_eq!(turn.len(), 2);
        assert!(sched.is_empty());
    }
}
