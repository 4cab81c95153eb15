//! admitgate host
//!
//! Loads a behavior config, then reads operation identifiers from stdin (one
//! per line) and prints how the guard pipeline treats each. Metrics are
//! printed at end of input.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

use admitgate_core::error::{AdmitError, Result};
use admitgate_host::{app_state::AppState, config, dispatch::Dispatcher};

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "admitgate.yaml".to_string());
    let cfg = config::load_from_file(&path)?;
    let state = AppState::new(cfg, Dispatcher::new())?;
    let pipeline = state.pipeline();

    tracing::info!(%path, behaviors = pipeline.guards().len(), "admitgate-host starting");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| AdmitError::Internal(format!("read stdin failed: {e}")))?
    {
        let operation = line.trim();
        if operation.is_empty() {
            continue;
        }
        match pipeline.admit(operation) {
            Ok(ctx) => {
                let deadline = ctx
                    .deadline
                    .map(|d| format!("{}ms", d.as_millis()))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{operation}\tadmit\tmarks=[{}]\tdeadline={deadline}",
                    ctx.marks.join(",")
                );
            }
            Err(e) => println!("{operation}\t{}\t{e}", e.client_code().as_str()),
        }
    }

    print!("{}", state.metrics().render());
    Ok(())
}
