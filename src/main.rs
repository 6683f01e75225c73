use std::process::ExitCode;

use swipe_nav::{cli, output};
use tracing_subscriber::{EnvFilter, fmt};

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = cli::parse();
    init_tracing(cli.verbose);

    match swipe_nav::run(cli) {
        Ok(()) => ExitCode::from(0_u8),
        Err(e) => {
            output::print_error(&format!("Error: {}", e));
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
