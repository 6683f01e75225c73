//! Test doubles for the recognizer's collaborators

use std::cell::{Cell, RefCell};

use crate::capability::CapabilityProvider;
use crate::indicator::IndicatorRenderer;
use crate::navigation::NavigationExecutor;
use crate::types::{Capability, IndicatorRequest, NavDirection};

/// Answers every lookup with a fixed capability and counts the calls
#[derive(Debug)]
pub struct FixedCapability {
    answer: Capability,
    calls: Cell<usize>,
    last_asked: RefCell<Option<NavDirection>>,
}

impl FixedCapability {
    pub fn new(answer: Capability) -> Self {
        Self {
            answer,
            calls: Cell::new(0),
            last_asked: RefCell::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn last_asked(&self) -> Option<NavDirection> {
        *self.last_asked.borrow()
    }
}

impl CapabilityProvider for FixedCapability {
    fn can_navigate(&self, direction: NavDirection) -> Capability {
        self.calls.set(self.calls.get() + 1);
        *self.last_asked.borrow_mut() = Some(direction);
        self.answer
    }
}

/// Records every indicator request in order
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub requests: Vec<IndicatorRequest>,
}

impl IndicatorRenderer for RecordingRenderer {
    fn show(&mut self, kind: NavDirection) {
        self.requests.push(IndicatorRequest::Show { kind });
    }

    fn update_offset(&mut self, offset: f64, armed: bool) {
        self.requests
            .push(IndicatorRequest::UpdateOffset { offset, armed });
    }

    fn remove_with_retreat(&mut self) {
        self.requests.push(IndicatorRequest::RemoveWithRetreat);
    }

    fn remove_immediate(&mut self) {
        self.requests.push(IndicatorRequest::RemoveImmediate);
    }
}

/// Records navigation intents without acting on them
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub navigations: Vec<NavDirection>,
}

impl NavigationExecutor for RecordingExecutor {
    fn request_navigation(&mut self, direction: NavDirection) {
        self.navigations.push(direction);
    }
}
