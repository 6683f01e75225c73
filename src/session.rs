//! Per-touch-sequence gesture state
//!
//! A `GestureSession` holds everything the recognizer knows about the
//! touch currently in progress. It is created on a qualifying touch-start
//! and dropped when the sequence ends.

use crate::config::GestureConfig;
use crate::types::{Axis, Edge, NavDirection, Phase};

// =============================================================================
// Viewport
// =============================================================================

/// Reading direction of the page; decides which physical side is leading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Visible area the touches are reported in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub layout: LayoutDirection,
}

impl Viewport {
    pub fn new(width: f64) -> Self {
        Self {
            width,
            layout: LayoutDirection::Ltr,
        }
    }

    pub fn rtl(width: f64) -> Self {
        Self {
            width,
            layout: LayoutDirection::Rtl,
        }
    }

    /// Classify which edge, if any, `x` lies within `margin` of
    pub fn classify(&self, x: f64, margin: f64) -> Edge {
        let near_left = x < margin;
        let near_right = x > self.width - margin;

        match (self.layout, near_left, near_right) {
            // A viewport narrower than two margins: the nearer side wins
            (layout, true, true) => {
                let left = x <= self.width / 2.0;
                physical_to_logical(layout, left)
            }
            (layout, true, false) => physical_to_logical(layout, true),
            (layout, false, true) => physical_to_logical(layout, false),
            (_, false, false) => Edge::None,
        }
    }

    /// +1 when swiping rightwards moves away from `edge`, -1 otherwise
    fn inward_sign(&self, edge: Edge) -> f64 {
        let leading_is_left = self.layout == LayoutDirection::Ltr;
        match edge {
            Edge::Leading if leading_is_left => 1.0,
            Edge::Leading => -1.0,
            Edge::Trailing if leading_is_left => -1.0,
            Edge::Trailing => 1.0,
            Edge::None => 0.0,
        }
    }
}

fn physical_to_logical(layout: LayoutDirection, left: bool) -> Edge {
    match (layout, left) {
        (LayoutDirection::Ltr, true) | (LayoutDirection::Rtl, false) => Edge::Leading,
        (LayoutDirection::Ltr, false) | (LayoutDirection::Rtl, true) => Edge::Trailing,
    }
}

// =============================================================================
// Gesture Session
// =============================================================================

/// State of one tracked touch sequence
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    origin_x: f64,
    origin_y: f64,
    edge: Edge,
    inward_sign: f64,
    direction: Axis,
    displacement: f64,
    armed: bool,
    phase: Phase,
    capability_snapshot: bool,
}

impl GestureSession {
    /// Start tracking a touch that began at an edge
    pub fn begin(
        origin_x: f64,
        origin_y: f64,
        edge: Edge,
        viewport: &Viewport,
        capability_snapshot: bool,
    ) -> Self {
        Self {
            origin_x,
            origin_y,
            edge,
            inward_sign: viewport.inward_sign(edge),
            direction: Axis::Undetermined,
            displacement: 0.0,
            armed: false,
            phase: Phase::Tracking,
            capability_snapshot,
        }
    }

    pub fn origin(&self) -> (f64, f64) {
        (self.origin_x, self.origin_y)
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    pub fn direction(&self) -> Axis {
        self.direction
    }

    pub fn displacement(&self) -> f64 {
        self.displacement
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn capability_snapshot(&self) -> bool {
        self.capability_snapshot
    }

    pub fn navigation(&self) -> Option<NavDirection> {
        self.edge.navigation()
    }

    /// Record a move and lock the axis once motion is unambiguous.
    ///
    /// Returns the axis after this move.
    pub fn observe(&mut self, x: f64, y: f64, config: &GestureConfig) -> Axis {
        let dx = x - self.origin_x;
        let dy = y - self.origin_y;
        self.displacement = dx;

        if self.direction == Axis::Undetermined {
            if dy.abs() > dx.abs() && dy.abs() > config.confirm_threshold {
                self.direction = Axis::Vertical;
            } else if dx.abs() >= config.confirm_threshold && dx.abs() > dy.abs() {
                self.direction = Axis::Horizontal;
            }
        }

        if self.direction == Axis::Horizontal {
            self.armed = self.inward_travel() > config.swipe_minimum;
        }

        self.direction
    }

    /// Signed indicator offset, clamped between the edge and the arming distance
    pub fn clamped_offset(&self, config: &GestureConfig) -> f64 {
        let inward = self.inward_travel().clamp(0.0, config.swipe_minimum);
        inward * self.inward_sign
    }

    fn inward_travel(&self) -> f64 {
        self.displacement * self.inward_sign
    }

    /// Move to a terminal phase; terminal phases never change again
    pub fn finish(&mut self, phase: Phase) {
        debug_assert!(matches!(phase, Phase::Committed | Phase::Cancelled));
        if self.phase == Phase::Tracking {
            self.phase = phase;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GestureConfig {
        GestureConfig::default()
    }

    fn leading_session(y: f64) -> GestureSession {
        GestureSession::begin(3.0, y, Edge::Leading, &Viewport::new(400.0), true)
    }

    #[test]
    fn classify_ltr_edges() {
        let viewport = Viewport::new(400.0);
        assert_eq!(viewport.classify(5.0, 20.0), Edge::Leading);
        assert_eq!(viewport.classify(395.0, 20.0), Edge::Trailing);
        assert_eq!(viewport.classify(200.0, 20.0), Edge::None);
    }

    #[test]
    fn classify_margin_boundaries_are_not_edges() {
        let viewport = Viewport::new(400.0);
        assert_eq!(viewport.classify(20.0, 20.0), Edge::None);
        assert_eq!(viewport.classify(380.0, 20.0), Edge::None);
    }

    #[test]
    fn classify_rtl_swaps_sides() {
        let viewport = Viewport::rtl(400.0);
        assert_eq!(viewport.classify(5.0, 20.0), Edge::Trailing);
        assert_eq!(viewport.classify(395.0, 20.0), Edge::Leading);
    }

    #[test]
    fn classify_tiny_viewport_picks_nearer_side() {
        let viewport = Viewport::new(30.0);
        assert_eq!(viewport.classify(2.0, 20.0), Edge::Leading);
        assert_eq!(viewport.classify(28.0, 20.0), Edge::Trailing);
    }

    #[test]
    fn begin_starts_tracking_undetermined() {
        let session = leading_session(100.0);
        assert_eq!(session.phase(), Phase::Tracking);
        assert_eq!(session.direction(), Axis::Undetermined);
        assert_eq!(session.origin(), (3.0, 100.0));
        assert_eq!(session.navigation(), Some(NavDirection::Back));
    }

    #[test]
    fn small_motion_leaves_axis_undetermined() {
        let mut session = leading_session(100.0);
        assert_eq!(session.observe(8.0, 104.0, &config()), Axis::Undetermined);
    }

    #[test]
    fn vertical_lock_is_permanent() {
        let mut session = leading_session(100.0);
        assert_eq!(session.observe(8.0, 150.0, &config()), Axis::Vertical);
        assert_eq!(session.observe(200.0, 150.0, &config()), Axis::Vertical);
        assert!(!session.is_armed());
    }

    #[test]
    fn horizontal_lock_is_permanent_and_arms() {
        let mut session = leading_session(100.0);
        assert_eq!(session.observe(15.0, 101.0, &config()), Axis::Horizontal);
        assert_eq!(session.observe(20.0, 300.0, &config()), Axis::Horizontal);
        assert!(!session.is_armed());
        session.observe(3.0 + 81.0, 300.0, &config());
        assert!(session.is_armed());
    }

    #[test]
    fn offset_is_clamped_towards_the_inside() {
        let viewport = Viewport::new(400.0);
        let mut back = GestureSession::begin(3.0, 0.0, Edge::Leading, &viewport, true);
        back.observe(203.0, 0.0, &config());
        assert_eq!(back.clamped_offset(&config()), 80.0);
        back.observe(-10.0, 0.0, &config());
        assert_eq!(back.clamped_offset(&config()), 0.0);

        let mut forward = GestureSession::begin(395.0, 0.0, Edge::Trailing, &viewport, true);
        forward.observe(345.0, 0.0, &config());
        assert_eq!(forward.clamped_offset(&config()), -50.0);
        forward.observe(100.0, 0.0, &config());
        assert_eq!(forward.clamped_offset(&config()), -80.0);
        assert!(forward.is_armed());
    }

    #[test]
    fn finish_never_regresses() {
        let mut session = leading_session(0.0);
        session.finish(Phase::Cancelled);
        session.finish(Phase::Committed);
        assert_eq!(session.phase(), Phase::Cancelled);
    }
}
