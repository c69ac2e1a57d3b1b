use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use shelfline_auth::{FileTokenStore, Session};
use shelfline_client::{ClientConfig, ClientError, Dashboard, NoopNavigator};
use shelfline_observability::LogFormat;

mod args;
mod commands;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::from_env()
    };
    shelfline_observability::init_with(format, if cli.verbose { "debug" } else { "warn" });

    let config = ClientConfig::from_env();
    let tokens = FileTokenStore::default_location().context("locating token storage")?;
    tracing::debug!(path = %tokens.path().display(), "using token store");

    let session = Arc::new(Session::new(Arc::new(tokens)));
    let dashboard = Dashboard::new(&config, session, Arc::new(NoopNavigator))
        .context("building http client")?;

    let outcome = commands::run(cli.command, &dashboard).await;
    dashboard.settle().await;

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            let message = match err.downcast_ref::<ClientError>() {
                Some(client) => client.user_message(),
                None => format!("{err:#}"),
            };
            tracing::debug!(error = ?err, "command failed");
            eprintln!("error: {message}");
            Ok(ExitCode::FAILURE)
        }
    }
}
