// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Client --> Resolve --> Walk --> Report
//!
//! Exit codes: 0 success, 1 any error, 130 interrupted
//! ```

use std::process::ExitCode;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use gls::cli::{self, Cli};
use gls::client::GitLabClient;
use gls::error::GlsError;
use gls::op::OpContext;
use gls::recurse::Walker;
use gls::report::{Reporter, exit_code};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let _log_guard = match gls::logging::init_logging(&cli.global.to_log_config()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli).await {
        Ok(code) => ExitCode::from(code),
        Err(GlsError::Interrupted) => {
            info!("Interrupted by user");
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<u8, GlsError> {
    let token = cli.global.require_token()?;
    let client = GitLabClient::new(cli.global.effective_gitlab_url(), token)?
        .with_max_retries(cli.global.max_retries);

    let operation = cli.command.to_operation()?;

    let cancel = CancellationToken::new();
    let walker = Walker::new(operation, cli.global.filter.as_deref(), cancel.clone())?;
    spawn_interrupt_handler(cancel.clone());

    info!("Resolving target: {}", cli.command.target_url());
    let target = client.resolve_target(cli.command.target_url()).await?;
    info!(
        "Resolved: {} '{}' (id={})",
        target.kind.as_str(),
        target.path,
        target.id
    );

    if cli.global.dry_run {
        info!("DRY-RUN MODE - no changes will be made");
    }

    let ctx = OpContext::new(&client, cli.global.dry_run);
    let outcomes = walker.walk(&ctx, &target).await?;

    Reporter::stderr(cli.global.json).report(&outcomes, cli.global.dry_run)?;
    Ok(exit_code(&outcomes))
}

/// Flips the cancellation token on Ctrl-C; the walker observes it between
/// nodes and unwinds with `Interrupted`.
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
}
