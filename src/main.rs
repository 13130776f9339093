use std::error::Error;
use std::io;
use std::sync::Arc;

use converter_client::terminal::{LineAction, TerminalPage};
use converter_client::{build_handler, ClientConfig, SubmitEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cfg = ClientConfig::from_env()?;
    let page = Arc::new(TerminalPage::new(io::stdout()));
    let handler = build_handler(&cfg, page.clone())?;
    info!(origin = %cfg.origin, mode = %handler.failure_mode(), "converter client ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight = JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        match page.accept_line(&line) {
            LineAction::Acknowledged => continue,
            LineAction::Submit => {
                in_flight.spawn(handler.on_submit(&mut SubmitEvent::new()));
            }
        }

        // Reap whatever has already settled so the set stays small.
        while let Some(joined) = in_flight.try_join_next() {
            if let Err(err) = joined {
                warn!(error = %err, "submission task failed");
            }
        }
    }

    while let Some(joined) = in_flight.join_next().await {
        if let Err(err) = joined {
            warn!(error = %err, "submission task failed");
        }
    }

    Ok(())
}
