#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

use std::env;
use std::process;

use anyhow::Error;
use anyhow::Result;
use domain::models::Action;
use domain::models::Event;
use infrastructure::backends::gemini::Gemini;
use tokio::sync::mpsc;
use tokio::task;
use tracing_appender::non_blocking::WorkerGuard;
use yansi::Paint;

use crate::application::cli;
use crate::application::ui;
use crate::configuration::log_dir;
use crate::domain::services::actions::ActionsService;

/// Debug logging is written only when `RUST_LOG` names this crate.
fn debug_logging_enabled(rust_log: &str) -> bool {
    return rust_log.split(',').any(|directive| {
        return directive.trim().starts_with("aok");
    });
}

fn init_logging() -> Option<WorkerGuard> {
    let rust_log = env::var("RUST_LOG").unwrap_or_default();
    if !debug_logging_enabled(&rust_log) {
        return None;
    }

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir(), "debug.log"));
    tracing_subscriber::fmt()
        .json()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(writer)
        .init();

    return Some(guard);
}

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        Paint::red(format!(
            "AOK {} ({}) stopped: {err}",
            env!("CARGO_PKG_VERSION"),
            env!("VERGEN_GIT_DESCRIBE"),
        ))
    );
    eprintln!(
        "Set RUST_LOG=aok for a debug log at {}",
        log_dir().join("debug.log").to_string_lossy()
    );

    process::exit(1);
}

async fn run() -> Result<()> {
    if !cli::parse().await? {
        return Ok(());
    }

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let mut actions = task::JoinSet::new();
    actions.spawn(async move {
        return ActionsService::start(Box::<Gemini>::default(), event_tx, &mut action_rx).await;
    });

    let res = tokio::select!(
        joined = actions.join_next() => match joined {
            Some(Ok(res)) => res,
            Some(Err(join_err)) => Err(join_err.into()),
            None => Ok(()),
        },
        res = ui::start(action_tx, event_rx) => res,
    );

    if res.is_err() {
        ui::destruct_terminal_for_panic();
    }
    return res;
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        ui::destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let _guard = init_logging();

    if let Err(err) = run().await {
        handle_error(err);
    }

    process::exit(0);
}
