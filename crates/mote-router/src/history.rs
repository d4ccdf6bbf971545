//! Navigation history
//!
//! Back/forward stacks over logical paths, bounded so long sessions do
//! not grow without limit.

use std::collections::VecDeque;

const MAX_ENTRIES: usize = 100;

/// Back/forward navigation stacks
#[derive(Debug, Default)]
pub struct History {
    back: VecDeque<String>,
    forward: Vec<String>,
    current: Option<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visit a new path: current moves to the back stack and the
    /// forward stack is cleared
    pub fn visit(&mut self, path: &str) {
        if let Some(current) = self.current.take() {
            self.back.push_back(current);
            while self.back.len() > MAX_ENTRIES {
                self.back.pop_front();
            }
        }
        self.forward.clear();
        self.current = Some(path.to_string());
    }

    /// Step back, returning the path now current
    pub fn back(&mut self) -> Option<String> {
        let previous = self.back.pop_back()?;
        if let Some(current) = self.current.take() {
            self.forward.push(current);
        }
        self.current = Some(previous.clone());
        Some(previous)
    }

    /// Step forward, returning the path now current
    pub fn forward(&mut self) -> Option<String> {
        let next = self.forward.pop()?;
        if let Some(current) = self.current.take() {
            self.back.push_back(current);
        }
        self.current = Some(next.clone());
        Some(next)
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn can_back(&self) -> bool {
        !self.back.is_empty()
    }

    pub fn can_forward(&self) -> bool {
        !self.forward.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_and_forward() {
        let mut history = History::new();
        history.visit("/");
        history.visit("/users");
        history.visit("/users/1");

        assert_eq!(history.back(), Some("/users".to_string()));
        assert_eq!(history.back(), Some("/".to_string()));
        assert!(!history.can_back());

        assert_eq!(history.forward(), Some("/users".to_string()));
        assert_eq!(history.current(), Some("/users"));
    }

    #[test]
    fn test_visit_clears_forward() {
        let mut history = History::new();
        history.visit("/a");
        history.visit("/b");
        history.back();
        history.visit("/c");
        assert!(!history.can_forward());
        assert_eq!(history.current(), Some("/c"));
    }

    #[test]
    fn test_back_on_empty() {
        let mut history = History::new();
        assert_eq!(history.back(), None);
        history.visit("/only");
        assert_eq!(history.back(), None);
        assert_eq!(history.current(), Some("/only"));
    }
}
