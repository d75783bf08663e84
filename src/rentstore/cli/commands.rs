//! Context wiring and per-command handlers.
//!
//! Each `handle_*` calls one `RentalApi` method and hands the result to
//! `render`. Handlers return whether the command finished without an
//! error-level message, which `main` turns into the exit status.

use super::render::{print_copies, print_history, print_messages, print_report};
use super::setup::{Cli, Commands};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use rentstore::api::RentalApi;
use rentstore::commands::search::SearchField;
use rentstore::commands::CmdResult;
use rentstore::config::{resolve_data_dir, StoreConfig};
use rentstore::model::parse_date;
use rentstore::store::fs_backend::FsBackend;
use std::fs;
use tracing::debug;
use tracing_subscriber::EnvFilter;

struct AppContext {
    api: RentalApi<FsBackend>,
}

pub fn run() -> Result<bool> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let ctx = init_context(&cli)?;

    let result = match cli.command {
        Commands::Rent {
            copy_id,
            renter_id,
            on,
        } => handle_rent(&ctx, &copy_id, &renter_id, on.as_deref())?,
        Commands::Return { copy_id, on } => handle_return(&ctx, &copy_id, on.as_deref())?,
        Commands::Prune { copy_id, history } => ctx.api.prune(&copy_id, history)?,
        Commands::Search { term, by } => handle_search(&ctx, &term, by.into())?,
        Commands::Show { copy_id } => handle_show(&ctx, &copy_id)?,
        Commands::Feedback {
            copy_id,
            rating,
            comment,
        } => ctx.api.add_feedback(&copy_id, rating, &comment)?,
        Commands::Report { on } => handle_report(&ctx, on.as_deref())?,
    };

    print_messages(&result.messages);
    Ok(!result.has_errors())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed when run from tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli.data_dir.clone())?;
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;
    let config = StoreConfig::load(&data_dir)?;
    debug!(data_dir = %data_dir.display(), ?config, "loaded configuration");

    Ok(AppContext {
        api: RentalApi::open(&data_dir, &config),
    })
}

fn date_or_today(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(raw) => parse_date("--on", raw)
            .map_err(|reason| anyhow::anyhow!("{} (expected YYYY-MM-DD)", reason)),
        None => Ok(Local::now().date_naive()),
    }
}

fn handle_rent(
    ctx: &AppContext,
    copy_id: &str,
    renter_id: &str,
    on: Option<&str>,
) -> Result<CmdResult> {
    Ok(ctx.api.rent(copy_id, renter_id, date_or_today(on)?)?)
}

fn handle_return(ctx: &AppContext, copy_id: &str, on: Option<&str>) -> Result<CmdResult> {
    Ok(ctx.api.return_copy(copy_id, date_or_today(on)?)?)
}

fn handle_search(
    ctx: &AppContext,
    term: &str,
    field: SearchField,
) -> Result<CmdResult> {
    let result = ctx.api.search(field, term)?;
    print_copies(&result.listed_copies);
    Ok(result)
}

fn handle_show(ctx: &AppContext, copy_id: &str) -> Result<CmdResult> {
    let result = ctx.api.show(copy_id)?;
    print_copies(&result.listed_copies);
    print_history(&result.history);
    Ok(result)
}

fn handle_report(ctx: &AppContext, on: Option<&str>) -> Result<CmdResult> {
    let result = ctx.api.report(date_or_today(on)?)?;
    if let Some(report) = &result.report {
        print_report(report);
    }
    Ok(result)
}
