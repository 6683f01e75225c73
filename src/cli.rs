//! CLI argument parsing using clap
//!
//! Defines all commands and their arguments.

use crate::output::OutputFormat;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// swipe-nav - edge-swipe history navigation
#[derive(Debug, Parser)]
#[command(name = "swipe-nav")]
#[command(
    author,
    version,
    about = "swipe-nav - recognize edge swipes and turn them into back/forward navigation",
    long_about = None,
    after_help = "QUICK START:\n  swipe-nav replay trace.jsonl\n  swipe-nav replay trace.jsonl --history https://a.test --history https://b.test\n  swipe-nav --relay /tmp/swipe-relay.sock ping\n\nTRACE FORMAT:\n  One touch sample per line, e.g.\n    {\"kind\":\"start\",\"x\":4,\"y\":300}\n    {\"kind\":\"move\",\"x\":96,\"y\":302}\n    {\"kind\":\"end\"}\n  Optional \"touches\" gives the number of contacts (default 1).\n  Blank lines and lines starting with # are skipped.\n\nENVIRONMENT VARIABLES:\n  SWIPE_NAV_EDGE_MARGIN        Edge margin in pixels (default 20)\n  SWIPE_NAV_SWIPE_MINIMUM      Travel before a swipe is armed (default 80)\n  SWIPE_NAV_CONFIRM_THRESHOLD  Travel before the axis locks (default 10)\n  SWIPE_NAV_RELAY_SOCKET       Relay socket for privileged navigation\n  RUST_LOG                     Log filter (overrides -v)"
)]
pub struct Cli {
    /// Relay socket path (overrides SWIPE_NAV_RELAY_SOCKET)
    #[arg(long, global = true)]
    pub relay: Option<PathBuf>,

    /// Output format: human (plain text), json (pretty JSON), quiet (errors only)
    #[arg(short, long, global = true, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a recorded touch trace through the recognizer
    #[command(
        about = "Replay a recorded touch trace",
        long_about = "Replay a recorded touch trace through the gesture recognizer and report indicator requests, swipe outcomes and navigations.\n\nUSAGE:\n  swipe-nav replay [OPTIONS] <TRACE>\n\nARGUMENTS:\n  <TRACE>  JSON-lines trace file, or - for stdin\n\nEXAMPLES:\n  swipe-nav replay swipe-back.jsonl\n  swipe-nav replay --width 800 --rtl trace.jsonl\n  swipe-nav replay --history https://a.test --history https://b.test --at 1 trace.jsonl"
    )]
    Replay(ReplayArgs),

    /// Check if the relay is running
    #[command(
        about = "Check if the relay is running",
        long_about = "Check if the navigation relay answers on its socket.\n\nUSAGE:\n  swipe-nav [--relay <SOCKET>] ping\n\nEXAMPLES:\n  swipe-nav --relay /tmp/swipe-relay.sock ping"
    )]
    Ping,
}

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Trace file (JSON lines), or - for stdin
    pub trace: PathBuf,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 412.0)]
    pub width: f64,

    /// Right-to-left page layout (back swipes start at the right edge)
    #[arg(long)]
    pub rtl: bool,

    /// History entry; repeat in visiting order
    #[arg(long = "history", value_name = "URL")]
    pub history: Vec<String>,

    /// Index of the current history entry (default: the last one)
    #[arg(long, value_name = "INDEX")]
    pub at: Option<usize>,

    /// Edge margin in pixels
    #[arg(long)]
    pub edge_margin: Option<f64>,

    /// Inward travel in pixels before a swipe is armed
    #[arg(long)]
    pub swipe_minimum: Option<f64>,

    /// Travel in pixels before the gesture axis locks
    #[arg(long)]
    pub confirm_threshold: Option<f64>,
}

// =============================================================================
// Parse Functions
// =============================================================================

/// Parse command line arguments
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parse command line arguments from iterator (for testing)
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}
