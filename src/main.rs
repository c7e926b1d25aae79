use std::process::ExitCode;

use holiday_planner::cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // RUST_LOG takes precedence, fallback to info
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let code = cli::run_with_args(std::env::args_os()).await;
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
