//! In-process session history
//!
//! A back/forward stack used when navigation runs in the same context as
//! the recognizer. It answers capability lookups and performs direct
//! navigation.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::capability::CapabilityProvider;
use crate::error::{Result, SwipeError};
use crate::navigation::DirectNavigator;
use crate::types::{Capability, NavDirection};

/// Back/forward stack of visited URLs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionHistory {
    entries: Vec<String>,
    index: usize,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history positioned at `index`
    pub fn with_entries(entries: Vec<String>, index: usize) -> Result<Self> {
        let max = entries.len().max(1);
        if index >= max {
            return Err(SwipeError::InvalidArguments(format!(
                "history position {} out of range (0..{})",
                index, max
            )));
        }
        Ok(Self { entries, index })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.index).map(String::as_str)
    }

    /// Visit a new URL, discarding any forward entries
    pub fn push(&mut self, url: impl Into<String>) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(url.into());
        self.index = self.entries.len() - 1;
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn go_back(&mut self) -> Option<&str> {
        if !self.can_go_back() {
            return None;
        }
        self.index -= 1;
        self.current()
    }

    pub fn go_forward(&mut self) -> Option<&str> {
        if !self.can_go_forward() {
            return None;
        }
        self.index += 1;
        self.current()
    }

    /// Step once in `direction`, returning the new current URL
    pub fn step(&mut self, direction: NavDirection) -> Result<String> {
        let target = match direction {
            NavDirection::Back => self.go_back(),
            NavDirection::Forward => self.go_forward(),
        };
        target
            .map(str::to_string)
            .ok_or_else(|| SwipeError::NavigationFailed(format!("no {} entry", direction)))
    }
}

impl CapabilityProvider for SessionHistory {
    fn can_navigate(&self, direction: NavDirection) -> Capability {
        if self.entries.is_empty() {
            return Capability::Unknown;
        }
        match direction {
            NavDirection::Back => self.can_go_back().into(),
            NavDirection::Forward => self.can_go_forward().into(),
        }
    }
}

/// History shared between the recognizer's capability lookups and a
/// navigator that may run on another thread
#[derive(Debug, Clone, Default)]
pub struct SharedHistory {
    inner: Arc<Mutex<SessionHistory>>,
}

impl SharedHistory {
    pub fn new(history: SessionHistory) -> Self {
        Self {
            inner: Arc::new(Mutex::new(history)),
        }
    }

    /// Lock the history; a poisoned lock still yields the data
    pub fn lock(&self) -> MutexGuard<'_, SessionHistory> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> SessionHistory {
        self.lock().clone()
    }
}

impl CapabilityProvider for SharedHistory {
    fn can_navigate(&self, direction: NavDirection) -> Capability {
        self.lock().can_navigate(direction)
    }
}

impl DirectNavigator for SharedHistory {
    fn navigate(&self, direction: NavDirection) -> Result<()> {
        let url = self.lock().step(direction)?;
        tracing::debug!(%direction, %url, "navigated in-process");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn history(entries: &[&str], index: usize) -> SessionHistory {
        SessionHistory::with_entries(entries.iter().map(|s| s.to_string()).collect(), index)
            .expect("valid history")
    }

    #[test]
    fn with_entries_rejects_out_of_range_position() {
        let result = SessionHistory::with_entries(vec!["a".to_string()], 1);
        assert!(matches!(result, Err(SwipeError::InvalidArguments(_))));
    }

    #[test]
    fn back_and_forward_move_the_cursor() {
        let mut h = history(&["a", "b", "c"], 1);
        assert_eq!(h.go_back(), Some("a"));
        assert_eq!(h.go_back(), None);
        assert_eq!(h.go_forward(), Some("b"));
        assert_eq!(h.go_forward(), Some("c"));
        assert_eq!(h.go_forward(), None);
    }

    #[test]
    fn push_discards_forward_entries() {
        let mut h = history(&["a", "b", "c"], 0);
        h.push("d");
        assert_eq!(h.current(), Some("d"));
        assert!(!h.can_go_forward());
        assert_eq!(h.go_back(), Some("a"));
    }

    #[test]
    fn capability_reflects_position() {
        let h = history(&["a", "b"], 1);
        assert_eq!(h.can_navigate(NavDirection::Back), Capability::Possible);
        assert_eq!(h.can_navigate(NavDirection::Forward), Capability::Impossible);
    }

    #[test]
    fn empty_history_capability_is_unknown() {
        let h = SessionHistory::new();
        assert_eq!(h.can_navigate(NavDirection::Forward), Capability::Unknown);
    }

    #[test]
    fn step_without_entry_fails() {
        let mut h = history(&["a"], 0);
        assert!(matches!(
            h.step(NavDirection::Back),
            Err(SwipeError::NavigationFailed(_))
        ));
    }

    #[test]
    fn shared_history_navigates_in_place() {
        let shared = SharedHistory::new(history(&["a", "b"], 1));
        shared.navigate(NavDirection::Back).expect("navigate back");
        assert_eq!(shared.snapshot().current(), Some("a"));
        assert_eq!(shared.can_navigate(NavDirection::Forward), Capability::Possible);
    }
}
