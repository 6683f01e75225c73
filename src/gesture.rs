//! Edge-swipe gesture recognizer
//!
//! Consumes raw touch events and decides, move by move, whether the touch is
//! a navigation swipe. Each tracked sequence ends in exactly one of:
//! nothing, a cancel with a retreat animation, or a committed navigation.
//!
//! ```text
//! idle --edge start--> tracking --armed end--> committed
//!                         |
//!                         +--vertical / short end / cancel / 2nd finger--> cancelled
//! ```

use tracing::{debug, trace};

use crate::capability::{CapabilityProvider, permits};
use crate::config::GestureConfig;
use crate::indicator::IndicatorRenderer;
use crate::navigation::NavigationExecutor;
use crate::session::{GestureSession, Viewport};
use crate::types::{
    Axis, CancelReason, Disposition, Edge, NavDirection, Outcome, Phase, TouchKind, TouchSample,
};

/// Stateful classifier for one touch sequence at a time
pub struct Recognizer<P, R, N> {
    config: GestureConfig,
    viewport: Viewport,
    capability: P,
    renderer: R,
    executor: N,
    session: Option<GestureSession>,
    retreat_pending: bool,
    last_outcome: Option<Outcome>,
}

impl<P, R, N> Recognizer<P, R, N>
where
    P: CapabilityProvider,
    R: IndicatorRenderer,
    N: NavigationExecutor,
{
    pub fn new(
        config: GestureConfig,
        viewport: Viewport,
        capability: P,
        renderer: R,
        executor: N,
    ) -> Self {
        Self {
            config,
            viewport,
            capability,
            renderer,
            executor,
            session: None,
            retreat_pending: false,
            last_outcome: None,
        }
    }

    /// Dispatch a raw sample to the matching handler
    ///
    /// A start or move reporting more than one contact aborts the session.
    pub fn handle(&mut self, sample: TouchSample) -> Disposition {
        match sample.kind {
            TouchKind::Start | TouchKind::Move if sample.touches > 1 => {
                self.cancel(CancelReason::MultiTouch);
                Disposition::PassThrough
            }
            TouchKind::Start => self.on_touch_start(sample.x, sample.y),
            TouchKind::Move => self.on_touch_move(sample.x, sample.y),
            TouchKind::End => self.on_touch_end(),
            TouchKind::Cancel => {
                self.on_touch_cancel();
                Disposition::PassThrough
            }
        }
    }

    pub fn on_touch_start(&mut self, x: f64, y: f64) -> Disposition {
        if self.retreat_pending {
            self.renderer.remove_immediate();
            self.retreat_pending = false;
        }

        // A start without a preceding end: drop the stale session outright
        if let Some(mut stale) = self.session.take() {
            debug!("touch start superseded a live session");
            stale.finish(Phase::Cancelled);
            self.renderer.remove_immediate();
            self.last_outcome = Some(Outcome::Cancelled(CancelReason::Interrupted));
        }

        let edge = self.viewport.classify(x, self.config.edge_margin);
        let Some(kind) = edge.navigation() else {
            trace!(x, y, "touch start away from edges");
            return Disposition::PassThrough;
        };

        let capability_snapshot = match edge {
            Edge::Trailing => permits(self.capability.can_navigate(NavDirection::Forward)),
            _ => true,
        };
        if !capability_snapshot {
            debug!(x, "forward navigation impossible, not tracking");
            return Disposition::PassThrough;
        }

        debug!(x, y, ?edge, "tracking edge swipe");
        self.session = Some(GestureSession::begin(
            x,
            y,
            edge,
            &self.viewport,
            capability_snapshot,
        ));
        self.renderer.show(kind);
        Disposition::PassThrough
    }

    pub fn on_touch_move(&mut self, x: f64, y: f64) -> Disposition {
        let Some(session) = self.session.as_mut() else {
            return Disposition::PassThrough;
        };

        let was_undetermined = session.direction() == Axis::Undetermined;
        match session.observe(x, y, &self.config) {
            Axis::Undetermined => Disposition::PassThrough,
            Axis::Vertical => {
                debug!(dy = y - session.origin().1, "vertical motion, abandoning swipe");
                self.cancel(CancelReason::Vertical);
                Disposition::PassThrough
            }
            Axis::Horizontal => {
                if was_undetermined {
                    debug!(dx = session.displacement(), "locked horizontal");
                }
                let offset = session.clamped_offset(&self.config);
                let armed = session.is_armed();
                trace!(offset, armed, "indicator update");
                self.renderer.update_offset(offset, armed);
                Disposition::Claim
            }
        }
    }

    pub fn on_touch_end(&mut self) -> Disposition {
        let Some(mut session) = self.session.take() else {
            return Disposition::PassThrough;
        };

        match session.navigation() {
            Some(direction) if session.is_armed() => {
                session.finish(Phase::Committed);
                debug!(%direction, "swipe committed");
                self.renderer.remove_immediate();
                self.last_outcome = Some(Outcome::Committed(direction));
                self.executor.request_navigation(direction);
                Disposition::Claim
            }
            _ => {
                self.session = Some(session);
                self.cancel(CancelReason::BelowThreshold);
                Disposition::PassThrough
            }
        }
    }

    /// Platform cancel; safe to call at any time, any number of times
    pub fn on_touch_cancel(&mut self) {
        self.cancel(CancelReason::Interrupted);
    }

    /// The renderer finished a retreat animation on its own
    pub fn retreat_finished(&mut self) {
        self.retreat_pending = false;
    }

    fn cancel(&mut self, reason: CancelReason) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        session.finish(Phase::Cancelled);
        debug!(?reason, "swipe cancelled");
        self.renderer.remove_with_retreat();
        self.retreat_pending = true;
        self.last_outcome = Some(Outcome::Cancelled(reason));
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Phase of the live session, `Idle` when none is tracked
    pub fn phase(&self) -> Phase {
        self.session
            .as_ref()
            .map(GestureSession::phase)
            .unwrap_or(Phase::Idle)
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    /// Outcome of the most recently finished session, cleared once read
    pub fn take_outcome(&mut self) -> Option<Outcome> {
        self.last_outcome.take()
    }

    pub fn retreat_pending(&self) -> bool {
        self.retreat_pending
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn executor(&self) -> &N {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut N {
        &mut self.executor
    }

    pub fn into_parts(self) -> (P, R, N) {
        (self.capability, self.renderer, self.executor)
    }
}

// =============================================================================
// Tests
// =============================================================================
