//! Output formatting for the swipe-nav CLI
//!
//! Handles formatting command reports for terminal display.
//! Supports both human-readable and JSON output formats.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::Result;
use crate::navigation::{NavigationReport, NavigationRoute};
use crate::types::{CancelReason, IndicatorRequest, Outcome};

// =============================================================================
// Output Format
// =============================================================================

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

// =============================================================================
// Reports
// =============================================================================

/// Result of replaying a touch trace
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayReport {
    pub samples: usize,
    /// Moves whose default scrolling the recognizer claimed
    pub claimed: usize,
    pub requests: Vec<IndicatorRequest>,
    pub outcomes: Vec<Outcome>,
    pub navigations: Vec<NavigationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_url: Option<String>,
}

/// Result of pinging the relay
#[derive(Debug, Clone, Serialize)]
pub struct PingReport {
    pub relay: PathBuf,
    pub running: bool,
}

/// Anything a command can print
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Report {
    Replay(ReplayReport),
    Ping(PingReport),
}

// =============================================================================
// Output Formatter
// =============================================================================

/// Formats command reports for display
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    /// Create a new formatter with the given format
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format and print a report
    pub fn print_report(&self, report: &Report) -> Result<()> {
        let output = self.format_report(report)?;
        if !output.is_empty() {
            print_success(&output);
        }
        Ok(())
    }

    fn format_report(&self, report: &Report) -> Result<String> {
        let output = match self.format {
            OutputFormat::Human => match report {
                Report::Replay(replay) => format_replay(replay),
                Report::Ping(ping) => format_ping(ping),
            },
            OutputFormat::Json => serde_json::to_string_pretty(report)?,
            OutputFormat::Quiet => String::new(),
        };
        Ok(output)
    }
}

// =============================================================================
// Specialized Formatters
// =============================================================================

/// Format a replay report for human-readable output
pub fn format_replay(report: &ReplayReport) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Replayed {} samples, {} indicator requests, {} claimed moves\n",
        report.samples,
        report.requests.len(),
        report.claimed
    ));

    if report.outcomes.is_empty() {
        output.push_str("\nNo edge swipes tracked\n");
    } else {
        output.push_str("\nSwipes:\n");
        for (index, outcome) in report.outcomes.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", index + 1, describe_outcome(outcome)));
        }
    }

    if !report.navigations.is_empty() {
        output.push_str("\nNavigations:\n");
        for nav in &report.navigations {
            output.push_str(&format!("  {} via {}", nav.direction, describe_route(nav.route)));
            if let Some(error) = &nav.error {
                output.push_str(&format!(" ({})", error));
            }
            output.push('\n');
        }
    }

    if let Some(url) = &report.current_url {
        output.push_str(&format!("\nCurrent page: {}\n", url));
    }

    output
}

/// Format a ping report for human-readable output
pub fn format_ping(report: &PingReport) -> String {
    if report.running {
        format!("Relay is running at {}", report.relay.display())
    } else {
        format!("Relay at {} did not answer", report.relay.display())
    }
}

fn describe_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Committed(direction) => format!("committed {}", direction),
        Outcome::Cancelled(reason) => {
            let why = match reason {
                CancelReason::Vertical => "vertical motion",
                CancelReason::BelowThreshold => "released before armed",
                CancelReason::Interrupted => "interrupted",
                CancelReason::MultiTouch => "second finger",
            };
            format!("cancelled ({})", why)
        }
    }
}

fn describe_route(route: NavigationRoute) -> &'static str {
    match route {
        NavigationRoute::Relay => "relay",
        NavigationRoute::Direct => "direct",
        NavigationRoute::Unconfirmed => "relay (unconfirmed)",
        NavigationRoute::Failed => "nothing",
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Print a success message to stdout
pub fn print_success(message: &str) {
    println!("{}", message);
}

/// Print an error message to stderr
pub fn print_error(message: &str) {
    eprintln!("{}", message);
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NavDirection;

    fn sample_report() -> ReplayReport {
        ReplayReport {
            samples: 12,
            claimed: 7,
            requests: vec![IndicatorRequest::Show {
                kind: NavDirection::Back,
            }],
            outcomes: vec![
                Outcome::Cancelled(CancelReason::Vertical),
                Outcome::Committed(NavDirection::Back),
            ],
            navigations: vec![NavigationReport {
                direction: NavDirection::Back,
                route: NavigationRoute::Direct,
                error: None,
            }],
            current_url: Some("https://example.com/a".to_string()),
        }
    }

    #[test]
    fn output_formatter_new_stores_format() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        assert_eq!(formatter.format, OutputFormat::Json);
    }

    #[test]
    fn format_replay_lists_swipes_and_navigations() {
        let output = format_replay(&sample_report());
        assert!(output.contains("Replayed 12 samples, 1 indicator requests, 7 claimed moves"));
        assert!(output.contains("1. cancelled (vertical motion)"));
        assert!(output.contains("2. committed back"));
        assert!(output.contains("back via direct"));
        assert!(output.contains("Current page: https://example.com/a"));
    }

    #[test]
    fn format_replay_without_swipes() {
        let output = format_replay(&ReplayReport::default());
        assert!(output.contains("No edge swipes tracked"));
        assert!(!output.contains("Navigations"));
    }

    #[test]
    fn format_replay_shows_navigation_errors() {
        let mut report = sample_report();
        report.navigations[0].route = NavigationRoute::Failed;
        report.navigations[0].error = Some("navigation failed: no back entry".to_string());
        let output = format_replay(&report);
        assert!(output.contains("back via nothing (navigation failed: no back entry)"));
    }

    #[test]
    fn json_format_serializes_report() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter
            .format_report(&Report::Replay(sample_report()))
            .expect("format");
        let value: serde_json::Value = serde_json::from_str(&output).expect("parse");
        assert_eq!(value["samples"], 12);
        assert_eq!(value["outcomes"][1]["outcome"], "committed");
        assert_eq!(value["navigations"][0]["route"], "direct");
    }

    #[test]
    fn quiet_format_prints_nothing() {
        let formatter = OutputFormatter::new(OutputFormat::Quiet);
        let output = formatter
            .format_report(&Report::Ping(PingReport {
                relay: PathBuf::from("/tmp/relay.sock"),
                running: true,
            }))
            .expect("format");
        assert_eq!(output, "");
    }

    #[test]
    fn format_ping_human() {
        let report = PingReport {
            relay: PathBuf::from("/tmp/relay.sock"),
            running: true,
        };
        assert_eq!(format_ping(&report), "Relay is running at /tmp/relay.sock");
    }
}
