//! Replay command implementation
//!
//! Feeds a recorded touch trace through the recognizer, as the platform
//! adapter would, and reports what the recognizer asked for.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::commands::{CommandContext, Execute};
use crate::config::Config;
use crate::error::{Result, SwipeError};
use crate::gesture::Recognizer;
use crate::history::{SessionHistory, SharedHistory};
use crate::indicator::{IndicatorOverlay, RequestLog};
use crate::ipc::RelayClient;
use crate::navigation::RelayExecutor;
use crate::output::{ReplayReport, Report};
use crate::session::Viewport;
use crate::types::{Disposition, TouchSample};

pub struct ReplayCommand {
    pub trace: PathBuf,
    pub viewport: Viewport,
    pub history: Vec<String>,
    pub at: Option<usize>,
}

impl ReplayCommand {
    pub fn new(
        trace: PathBuf,
        viewport: Viewport,
        history: Vec<String>,
        at: Option<usize>,
    ) -> Self {
        Self {
            trace,
            viewport,
            history,
            at,
        }
    }
}

impl Execute for ReplayCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<Report> {
        let samples = load_trace(&self.trace)?;
        let history = build_history(&self.history, self.at)?;
        let report = replay(&samples, &ctx.config, self.viewport, history);
        Ok(Report::Replay(report))
    }
}

/// Build the in-process history, positioned at `at` or the last entry
pub fn build_history(entries: &[String], at: Option<usize>) -> Result<SharedHistory> {
    let index = at.unwrap_or_else(|| entries.len().saturating_sub(1));
    let history = SessionHistory::with_entries(entries.to_vec(), index)?;
    Ok(SharedHistory::new(history))
}

/// Run `samples` through a recognizer wired to the overlay and executors
pub fn replay(
    samples: &[TouchSample],
    config: &Config,
    viewport: Viewport,
    history: SharedHistory,
) -> ReplayReport {
    let executor = RelayExecutor::new(RelayClient::from_config(config), Arc::new(history.clone()));
    let mut recognizer = Recognizer::new(
        config.gesture,
        viewport,
        history.clone(),
        RequestLog::new(IndicatorOverlay::new()),
        executor,
    );

    let mut report = ReplayReport {
        samples: samples.len(),
        ..Default::default()
    };

    for sample in samples {
        if recognizer.handle(*sample) == Disposition::Claim {
            report.claimed += 1;
        }
        if let Some(outcome) = recognizer.take_outcome() {
            report.outcomes.push(outcome);
        }
        if recognizer.renderer_mut().inner_mut().tick(Instant::now()) {
            recognizer.retreat_finished();
        }
    }

    report.requests = recognizer.renderer().requests().to_vec();
    report.navigations = recognizer.executor_mut().wait_idle();
    report.current_url = history.lock().current().map(str::to_string);
    debug!(
        samples = report.samples,
        swipes = report.outcomes.len(),
        "replay finished"
    );
    report
}

/// Read a JSON-lines trace from a file, or stdin for `-`
pub fn load_trace(path: &Path) -> Result<Vec<TouchSample>> {
    if path == Path::new("-") {
        return parse_trace(io::stdin().lock());
    }
    let file = File::open(path).map_err(|err| {
        SwipeError::InvalidArguments(format!("cannot open trace {}: {}", path.display(), err))
    })?;
    parse_trace(BufReader::new(file))
}

/// Parse one touch sample per line; blank lines and `#` comments are skipped
pub fn parse_trace<R: BufRead>(reader: R) -> Result<Vec<TouchSample>> {
    let mut samples = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let sample = serde_json::from_str(trimmed).map_err(|err| SwipeError::InvalidTrace {
            line: index + 1,
            message: err.to_string(),
        })?;
        samples.push(sample);
    }
    Ok(samples)
}
