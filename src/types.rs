//! Type definitions shared by the recognizer, its collaborators and the relay
//!
//! Touch and indicator types are what the recognizer consumes and emits.
//! The relay types mirror the privileged context's IPC protocol
//! (newline-delimited JSON).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SwipeError;

// =============================================================================
// Touch Input
// =============================================================================

/// Kind of a raw touch event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchKind {
    Start,
    Move,
    End,
    Cancel,
}

/// One raw touch event as delivered by the platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchSample {
    pub kind: TouchKind,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    /// Number of simultaneous contact points
    #[serde(default = "single_touch")]
    pub touches: u32,
}

fn single_touch() -> u32 {
    1
}

impl TouchSample {
    pub fn start(x: f64, y: f64) -> Self {
        Self {
            kind: TouchKind::Start,
            x,
            y,
            touches: 1,
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self {
            kind: TouchKind::Move,
            x,
            y,
            touches: 1,
        }
    }

    pub fn end() -> Self {
        Self {
            kind: TouchKind::End,
            x: 0.0,
            y: 0.0,
            touches: 0,
        }
    }

    pub fn cancel() -> Self {
        Self {
            kind: TouchKind::Cancel,
            x: 0.0,
            y: 0.0,
            touches: 0,
        }
    }

    pub fn with_touches(mut self, touches: u32) -> Self {
        self.touches = touches;
        self
    }
}

// =============================================================================
// Gesture Classification
// =============================================================================

/// History navigation direction; also names the indicator type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavDirection {
    Back,
    Forward,
}

impl NavDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavDirection::Back => "back",
            NavDirection::Forward => "forward",
        }
    }
}

impl fmt::Display for NavDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NavDirection {
    type Err = SwipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "back" => Ok(NavDirection::Back),
            "forward" => Ok(NavDirection::Forward),
            other => Err(SwipeError::InvalidArguments(format!(
                "unknown navigation direction '{}'",
                other
            ))),
        }
    }
}

/// Screen edge a touch originated at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    None,
    Leading,
    Trailing,
}

impl Edge {
    /// Navigation implied by swiping in from this edge
    pub fn navigation(&self) -> Option<NavDirection> {
        match self {
            Edge::None => None,
            Edge::Leading => Some(NavDirection::Back),
            Edge::Trailing => Some(NavDirection::Forward),
        }
    }
}

/// Axis the gesture has locked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Undetermined,
    Horizontal,
    Vertical,
}

/// Lifecycle phase of one touch sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Tracking,
    Committed,
    Cancelled,
}

/// Answer of a capability lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Possible,
    Impossible,
    Unknown,
}

impl From<bool> for Capability {
    fn from(value: bool) -> Self {
        if value {
            Capability::Possible
        } else {
            Capability::Impossible
        }
    }
}

impl From<Option<bool>> for Capability {
    fn from(value: Option<bool>) -> Self {
        value.map(Capability::from).unwrap_or(Capability::Unknown)
    }
}

/// Whether the platform's default handling of an event should go ahead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Let the platform scroll/pan as usual
    #[default]
    PassThrough,
    /// The recognizer owns this input stream; suppress default behavior
    Claim,
}

/// Why a tracked session ended without navigating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// Motion locked to the vertical axis
    Vertical,
    /// Released before the swipe was armed
    BelowThreshold,
    /// Platform cancelled the touch
    Interrupted,
    /// A second contact point appeared
    MultiTouch,
}

/// Terminal result of a tracked session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "detail")]
pub enum Outcome {
    Committed(NavDirection),
    Cancelled(CancelReason),
}

/// A request issued to the indicator renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "request")]
pub enum IndicatorRequest {
    Show { kind: NavDirection },
    UpdateOffset { offset: f64, armed: bool },
    RemoveWithRetreat,
    RemoveImmediate,
}

// =============================================================================
// Relay Protocol
// =============================================================================

/// Message type carried in a navigation request
pub const SWIPE_NAVIGATE: &str = "swipe-navigate";

/// Message types for IPC communication
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpcMessageType {
    Command,
    Response,
    Ping,
    Pong,
}

/// IPC message envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcMessage {
    #[serde(rename = "type")]
    pub message_type: IpcMessageType,
    pub payload: Option<serde_json::Value>,
}

/// Navigation request relayed to the privileged context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigateRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub direction: NavDirection,
    pub timestamp: String, // ISO 8601 format
}

/// Reply from the privileged context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayResponse {
    pub id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// =============================================================================
// Tests
// =============================================================================
