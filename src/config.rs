//! Configuration for swipe navigation
//!
//! Handles configuration loading from environment variables and defaults.

use std::path::PathBuf;
use tracing::warn;

// =============================================================================
// Constants
// =============================================================================

/// Default distance from a viewport edge, in pixels, that counts as an edge touch
pub const DEFAULT_EDGE_MARGIN: f64 = 20.0;

/// Default inward travel, in pixels, before a swipe is armed
pub const DEFAULT_SWIPE_MINIMUM: f64 = 80.0;

/// Default travel, in pixels, before the gesture axis is locked
pub const DEFAULT_CONFIRM_THRESHOLD: f64 = 10.0;

/// Environment variable for the edge margin
pub const ENV_EDGE_MARGIN: &str = "SWIPE_NAV_EDGE_MARGIN";

/// Environment variable for the swipe minimum
pub const ENV_SWIPE_MINIMUM: &str = "SWIPE_NAV_SWIPE_MINIMUM";

/// Environment variable for the confirmation threshold
pub const ENV_CONFIRM_THRESHOLD: &str = "SWIPE_NAV_CONFIRM_THRESHOLD";

/// Environment variable for the relay socket path
pub const ENV_RELAY_SOCKET_PATH: &str = "SWIPE_NAV_RELAY_SOCKET";

// =============================================================================
// Config Structs
// =============================================================================

/// Gesture tunables, in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    pub edge_margin: f64,
    pub swipe_minimum: f64,
    pub confirm_threshold: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            edge_margin: DEFAULT_EDGE_MARGIN,
            swipe_minimum: DEFAULT_SWIPE_MINIMUM,
            confirm_threshold: DEFAULT_CONFIRM_THRESHOLD,
        }
    }
}

/// Full runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gesture: GestureConfig,

    /// Path to the relay socket; `None` means navigate in-process only
    pub relay_socket_path: Option<PathBuf>,

    /// Connection timeout in milliseconds
    pub connection_timeout_ms: u64,

    /// Relay round-trip timeout in milliseconds
    pub command_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gesture: GestureConfig::default(),
            relay_socket_path: None,
            connection_timeout_ms: 500,
            command_timeout_ms: 2000,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = pixels(&lookup, ENV_EDGE_MARGIN) {
            config.gesture.edge_margin = value;
        }
        if let Some(value) = pixels(&lookup, ENV_SWIPE_MINIMUM) {
            config.gesture.swipe_minimum = value;
        }
        if let Some(value) = pixels(&lookup, ENV_CONFIRM_THRESHOLD) {
            config.gesture.confirm_threshold = value;
        }

        if let Some(path) = lookup(ENV_RELAY_SOCKET_PATH).filter(|p| !p.trim().is_empty()) {
            config.relay_socket_path = Some(PathBuf::from(path));
        }

        config
    }
}

fn pixels<F>(lookup: &F, key: &str) -> Option<f64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Some(value),
        _ => {
            warn!(key, value = %raw, "ignoring invalid pixel value");
            None
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Load the global configuration
pub fn load_config() -> Config {
    Config::from_env()
}

// =============================================================================
// Tests
// =============================================================================
