use crate::commands::{CommandContext, Execute};
use crate::error::{Result, SwipeError};
use crate::ipc::RelayClient;
use crate::output::{PingReport, Report};

#[derive(Default)]
pub struct PingCommand {}

impl Execute for PingCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<Report> {
        let client = RelayClient::from_config(&ctx.config).ok_or_else(|| {
            SwipeError::InvalidArguments("no relay socket configured".to_string())
        })?;

        if !client.ping()? {
            return Err(SwipeError::RelayUnavailable(
                "relay is not responding".to_string(),
            ));
        }

        Ok(Report::Ping(PingReport {
            relay: client.socket_path().to_path_buf(),
            running: true,
        }))
    }
}
