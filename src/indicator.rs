//! Visual indicator rendering
//!
//! The recognizer only issues requests through `IndicatorRenderer`; the
//! renderer owns the indicator's lifetime. `IndicatorOverlay` is a
//! platform-neutral model of the overlay: it keeps at most one indicator
//! alive and times the retreat animation.

use std::time::{Duration, Instant};
use tracing::trace;

use crate::types::{IndicatorRequest, NavDirection};

/// How long the retreat-to-edge animation runs before the indicator is removed
pub const RETREAT_DURATION: Duration = Duration::from_millis(200);

/// Receives indicator requests from the recognizer
///
/// Removal must be idempotent: removing a missing indicator is harmless.
pub trait IndicatorRenderer {
    fn show(&mut self, kind: NavDirection);
    fn update_offset(&mut self, offset: f64, armed: bool);
    fn remove_with_retreat(&mut self);
    fn remove_immediate(&mut self);

    /// Apply a request value
    fn apply(&mut self, request: IndicatorRequest) {
        match request {
            IndicatorRequest::Show { kind } => self.show(kind),
            IndicatorRequest::UpdateOffset { offset, armed } => self.update_offset(offset, armed),
            IndicatorRequest::RemoveWithRetreat => self.remove_with_retreat(),
            IndicatorRequest::RemoveImmediate => self.remove_immediate(),
        }
    }
}

// =============================================================================
// Overlay Model
// =============================================================================

/// Current overlay state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayState {
    Hidden,
    Shown {
        kind: NavDirection,
        offset: f64,
        armed: bool,
    },
    Retreating {
        kind: NavDirection,
        offset: f64,
        started: Instant,
    },
}

/// Single-indicator overlay with a timed retreat
#[derive(Debug, Clone)]
pub struct IndicatorOverlay {
    state: OverlayState,
    retreat_duration: Duration,
}

impl Default for IndicatorOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorOverlay {
    pub fn new() -> Self {
        Self {
            state: OverlayState::Hidden,
            retreat_duration: RETREAT_DURATION,
        }
    }

    pub fn with_retreat_duration(mut self, duration: Duration) -> Self {
        self.retreat_duration = duration;
        self
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self.state, OverlayState::Hidden)
    }

    /// Offset drawn at `now`; a retreating indicator eases back to zero
    pub fn offset_at(&self, now: Instant) -> f64 {
        match self.state {
            OverlayState::Hidden => 0.0,
            OverlayState::Shown { offset, .. } => offset,
            OverlayState::Retreating {
                offset, started, ..
            } => {
                let elapsed = now.saturating_duration_since(started);
                if self.retreat_duration.is_zero() || elapsed >= self.retreat_duration {
                    return 0.0;
                }
                let progress = elapsed.as_secs_f64() / self.retreat_duration.as_secs_f64();
                offset * (1.0 - progress)
            }
        }
    }

    /// Advance animations; returns true when a retreat completed
    pub fn tick(&mut self, now: Instant) -> bool {
        if let OverlayState::Retreating { started, .. } = self.state {
            if now.saturating_duration_since(started) >= self.retreat_duration {
                trace!("retreat finished");
                self.state = OverlayState::Hidden;
                return true;
            }
        }
        false
    }
}

impl IndicatorRenderer for IndicatorOverlay {
    fn show(&mut self, kind: NavDirection) {
        match self.state {
            OverlayState::Shown { .. } => {}
            // A leftover retreat is cut short so only one indicator exists
            OverlayState::Retreating { .. } | OverlayState::Hidden => {
                self.state = OverlayState::Shown {
                    kind,
                    offset: 0.0,
                    armed: false,
                };
            }
        }
    }

    fn update_offset(&mut self, offset: f64, armed: bool) {
        if let OverlayState::Shown { kind, .. } = self.state {
            self.state = OverlayState::Shown {
                kind,
                offset,
                armed,
            };
        }
    }

    fn remove_with_retreat(&mut self) {
        if let OverlayState::Shown { kind, offset, .. } = self.state {
            self.state = OverlayState::Retreating {
                kind,
                offset,
                started: Instant::now(),
            };
        }
    }

    fn remove_immediate(&mut self) {
        self.state = OverlayState::Hidden;
    }
}

/// Wraps a renderer and keeps a log of every request passed through
#[derive(Debug, Default)]
pub struct RequestLog<R> {
    inner: R,
    requests: Vec<IndicatorRequest>,
}

impl<R: IndicatorRenderer> RequestLog<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            requests: Vec::new(),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn requests(&self) -> &[IndicatorRequest] {
        &self.requests
    }

    fn record(&mut self, request: IndicatorRequest) {
        trace!(?request, "indicator request");
        self.requests.push(request);
    }
}

impl<R: IndicatorRenderer> IndicatorRenderer for RequestLog<R> {
    fn show(&mut self, kind: NavDirection) {
        self.record(IndicatorRequest::Show { kind });
        self.inner.show(kind);
    }

    fn update_offset(&mut self, offset: f64, armed: bool) {
        self.record(IndicatorRequest::UpdateOffset { offset, armed });
        self.inner.update_offset(offset, armed);
    }

    fn remove_with_retreat(&mut self) {
        self.record(IndicatorRequest::RemoveWithRetreat);
        self.inner.remove_with_retreat();
    }

    fn remove_immediate(&mut self) {
        self.record(IndicatorRequest::RemoveImmediate);
        self.inner.remove_immediate();
    }
}

// =============================================================================
// Tests
// =============================================================================
