//! swipe-nav library
//!
//! Edge-swipe history navigation: a gesture recognizer that turns raw
//! single-finger touch events into back/forward navigation, plus the
//! collaborators it drives (indicator renderer, capability lookups,
//! navigation executors with a privileged relay).

pub mod capability;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod gesture;
pub mod history;
pub mod indicator;
pub mod ipc;
pub mod navigation;
pub mod output;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenience
pub use capability::CapabilityProvider;
pub use cli::{Cli, Commands};
pub use config::{Config, GestureConfig};
pub use error::{Result, SwipeError};
pub use gesture::Recognizer;
pub use indicator::{IndicatorOverlay, IndicatorRenderer};
pub use ipc::{RelayClient, RelayFailure};
pub use navigation::{DirectNavigator, NavigationExecutor, RelayExecutor};
pub use output::OutputFormatter;
pub use session::{GestureSession, Viewport};

use commands::{CommandContext, Execute};
use session::LayoutDirection;

// =============================================================================
// Main Entry Point
// =============================================================================

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    // 1. Load configuration, flags override environment
    let mut config = config::load_config();
    if let Some(relay) = cli.relay {
        config.relay_socket_path = Some(relay);
    }

    // 2. Build and execute the command
    let report = match cli.command {
        Commands::Replay(args) => {
            if let Some(value) = args.edge_margin {
                config.gesture.edge_margin = positive(value, "--edge-margin")?;
            }
            if let Some(value) = args.swipe_minimum {
                config.gesture.swipe_minimum = positive(value, "--swipe-minimum")?;
            }
            if let Some(value) = args.confirm_threshold {
                config.gesture.confirm_threshold = positive(value, "--confirm-threshold")?;
            }
            let width = positive(args.width, "--width")?;
            let viewport = Viewport {
                width,
                layout: if args.rtl {
                    LayoutDirection::Rtl
                } else {
                    LayoutDirection::Ltr
                },
            };

            let ctx = CommandContext::new(config);
            commands::ReplayCommand::new(args.trace, viewport, args.history, args.at)
                .execute(&ctx)?
        }
        Commands::Ping => commands::PingCommand::default().execute(&CommandContext::new(config))?,
    };

    // 3. Format and print output
    let formatter = OutputFormatter::new(cli.output);
    formatter.print_report(&report)
}

fn positive(value: f64, flag: &str) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SwipeError::InvalidArguments(format!(
            "{} must be a positive number, got {}",
            flag, value
        )))
    }
}
