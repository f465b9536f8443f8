//! # CLI Layer
//!
//! This module is **one possible UI client** for medlog. It is the only place
//! that reads arguments, touches stdout/stderr or knows about the local time
//! zone. Everything else goes through [`MedlogApi`].
//!
//! - `run()`: parses arguments, sets up logging and dispatches
//! - `init_context()`: resolves the data directory and opens the API
//! - `handle_*()`: one per subcommand, calls the API and prints the result

use super::print::{print_calendar, print_config, print_history, print_medicines, print_messages};
use super::setup::{Cli, Commands};
use chrono::{Datelike, Local};
use clap::Parser;
use directories::ProjectDirs;
use medlog::api::{ConfigAction, MedlogApi};
use medlog::config::MedlogConfig;
use medlog::error::{MedlogError, Result};
use medlog::history;
use medlog::store::fs_backend::FsBackend;
use std::collections::BTreeSet;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Overrides the platform data directory. `--data-dir` overrides this.
const DATA_DIR_ENV: &str = "MEDLOG_DATA_DIR";

struct AppContext {
    api: MedlogApi<FsBackend>,
    config: MedlogConfig,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut ctx = init_context(&cli)?;
    // Keep stdout clean for piping the export document
    if !matches!(cli.command, Some(Commands::Export { stdout: true, .. })) {
        print_messages(ctx.api.load_warnings());
    }

    match cli.command {
        Some(Commands::List) | None => handle_list(&ctx),
        Some(Commands::Add { name }) => handle_add(&mut ctx, name),
        Some(Commands::Remove { medicines }) => handle_remove(&mut ctx, medicines),
        Some(Commands::Move { from, to }) => handle_move(&mut ctx, from, to),
        Some(Commands::Order { medicines }) => handle_order(&mut ctx, medicines),
        Some(Commands::Take {
            medicine,
            date,
            time,
            details,
        }) => handle_take(&mut ctx, medicine, date, time, details),
        Some(Commands::History { day }) => handle_history(&ctx, day),
        Some(Commands::Calendar { month }) => handle_calendar(&ctx, month),
        Some(Commands::Forget { records }) => handle_forget(&mut ctx, records),
        Some(Commands::Export { output, stdout }) => handle_export(&ctx, output, stdout),
        Some(Commands::Import { path }) => handle_import(&mut ctx, path),
        Some(Commands::Clear { yes }) => handle_clear(&mut ctx, yes),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("medlog=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("medlog=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "medlog", "medlog")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| MedlogError::Config("Could not determine data directory".to_string()))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli)?;
    tracing::debug!("Using data directory {}", data_dir.display());

    let api = MedlogApi::open(FsBackend::new(data_dir.clone()), data_dir);
    let config = api.load_config();
    Ok(AppContext { api, config })
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    print_medicines(ctx.api.medicines());
    Ok(())
}

fn handle_add(ctx: &mut AppContext, name: Vec<String>) -> Result<()> {
    let result = ctx.api.add_medicine(&name.join(" "));
    print_messages(&result.messages);
    Ok(())
}

fn handle_remove(ctx: &mut AppContext, medicines: Vec<String>) -> Result<()> {
    let result = ctx.api.delete_medicines(&medicines)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_move(ctx: &mut AppContext, from: usize, to: usize) -> Result<()> {
    let result = ctx.api.move_medicine(from, to)?;
    print_messages(&result.messages);
    print_medicines(ctx.api.medicines());
    Ok(())
}

fn handle_order(ctx: &mut AppContext, medicines: Vec<String>) -> Result<()> {
    let result = ctx.api.order_medicines(&medicines)?;
    print_messages(&result.messages);
    print_medicines(ctx.api.medicines());
    Ok(())
}

fn handle_take(
    ctx: &mut AppContext,
    medicine: Vec<String>,
    date: Option<String>,
    time: Option<String>,
    details: Option<String>,
) -> Result<()> {
    let now = Local::now();
    let date = match date {
        Some(d) => history::parse_date(&d)?,
        None => now.date_naive(),
    };
    let time = match time {
        Some(t) => history::parse_time(&t)?,
        None => now.time(),
    };
    let timestamp = history::local_timestamp(date, time, &Local)?;

    let result = ctx
        .api
        .record_intake(&medicine, timestamp, details.as_deref())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_history(ctx: &AppContext, day: Option<String>) -> Result<()> {
    let records = ctx.api.intake_records();
    let groups = match day {
        Some(d) => {
            let day = history::parse_date(&d)?;
            history::day_group(records, day, &Local)
                .into_iter()
                .collect()
        }
        None => history::group_by_day(records, &Local),
    };
    print_history(&groups, Local::now().date_naive(), ctx.config.clock);
    Ok(())
}

fn handle_calendar(ctx: &AppContext, month: Option<String>) -> Result<()> {
    let today = Local::now().date_naive();
    let (year, month) = match month {
        Some(m) => history::parse_month(&m)?,
        None => (today.year(), today.month()),
    };
    let marked: BTreeSet<_> = history::days_in_month(ctx.api.intake_records(), year, month, &Local)
        .into_iter()
        .collect();
    print_calendar(year, month, &marked, today);
    Ok(())
}

fn handle_forget(ctx: &mut AppContext, records: Vec<String>) -> Result<()> {
    let result = ctx.api.delete_intake_records(&records)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &AppContext, output: Option<PathBuf>, stdout: bool) -> Result<()> {
    if stdout {
        println!("{}", ctx.api.export_json()?);
        return Ok(());
    }
    let path = output.unwrap_or_else(|| PathBuf::from(&ctx.config.export_filename));
    let result = ctx.api.export_to_file(&path)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_import(ctx: &mut AppContext, path: PathBuf) -> Result<()> {
    let result = ctx.api.import_file(&path)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_clear(ctx: &mut AppContext, yes: bool) -> Result<()> {
    if !yes && !confirm("Delete all medicines and intake records?")? {
        println!("Nothing was deleted.");
        return Ok(());
    }
    let result = ctx.api.clear_all_data();
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key.clone(), value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action)?;
    if let (None, Some(config)) = (&key, &result.config) {
        print_config(config);
    }
    print_messages(&result.messages);
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush().map_err(MedlogError::Io)?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(MedlogError::Io)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
