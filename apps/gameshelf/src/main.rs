//! Gameshelf command-line entry point.

mod cli;
mod commands;
mod config;
mod render;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use gameshelf_client::Client;
use gameshelf_feedback::{NoticeKind, NoticeQueue};
use gameshelf_library::LibraryView;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    let config = match config::GameshelfConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load config, using defaults");
            config::GameshelfConfig::default()
        }
    };
    let server_url = cli.server.unwrap_or_else(|| config.server_url.clone());

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        server = %server_url,
        "starting gameshelf"
    );

    let client = Client::new(&server_url, config.request_timeout())
        .with_context(|| format!("cannot use server URL {server_url:?}"))?;
    let mut view = LibraryView::new(Arc::new(client)).with_sort(config.default_sort);
    let mut notices = NoticeQueue::new();

    {
        let mut stdout = std::io::stdout().lock();
        commands::run(cli.command, &mut view, &mut notices, &mut stdout).await?;
    }

    let failed = notices.has_errors();
    for notice in notices.drain() {
        if notice.kind == NoticeKind::Error {
            eprintln!("{}", render::notice(&notice));
        } else {
            println!("{}", render::notice(&notice));
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
