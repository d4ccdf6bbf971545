//! DOM Events
//!
//! Notification records emitted by the framework (container load/change,
//! input, click). The runtime queues them; the host drains the queue.

use crate::NodeId;

/// Event kinds the framework emits or reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomEventKind {
    /// Container finished its initial mount
    Load,
    /// Container finished a render cycle
    Change,
    /// Form control value changed
    Input,
    /// Pointer activation
    Click,
}

/// A dispatched event record
#[derive(Debug, Clone)]
pub struct DomEvent {
    pub kind: DomEventKind,
    pub target: NodeId,
}

impl DomEvent {
    pub fn new(kind: DomEventKind, target: NodeId) -> Self {
        Self { kind, target }
    }
}

/// FIFO queue of emitted events
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<DomEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event
    pub fn emit(&mut self, kind: DomEventKind, target: NodeId) {
        self.events.push(DomEvent::new(kind, target));
    }

    /// Take all queued events
    pub fn take(&mut self) -> Vec<DomEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_order() {
        let mut q = EventQueue::new();
        q.emit(DomEventKind::Load, NodeId::ROOT);
        q.emit(DomEventKind::Change, NodeId::ROOT);

        let events = q.take();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, DomEventKind::Load);
        assert_eq!(events[1].kind, DomEventKind::Change);
        assert!(q.is_empty());
    }
}
