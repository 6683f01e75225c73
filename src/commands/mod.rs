//! Command implementations for the swipe-nav CLI
//!
//! Each command module handles:
//! - Wiring the recognizer or relay client from configuration
//! - Running the command
//! - Returning a report for the output formatter

pub mod ping;
pub mod replay;

pub use ping::PingCommand;
pub use replay::ReplayCommand;

use crate::config::Config;
use crate::error::Result;
use crate::output::Report;

pub trait Execute {
    fn execute(&self, ctx: &CommandContext) -> Result<Report>;
}

pub struct CommandContext {
    pub config: Config,
}

impl CommandContext {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}
