//! `healthlog` binary: dashboard plus one-shot record commands.

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command, Output, execute};
use healthlog_rs::core::{FileSlotStorage, RecordStore, TimestampIdGenerator};
use healthlog_rs::tui::{self, TuiConfig};
use log::{debug, info};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::process::ExitCode;

/// Log file written next to the records while the dashboard owns the terminal.
const TUI_LOG_FILE: &str = "healthlog.log";

/// Entry point for the Healthlog CLI.
fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Command::Tui));
    if !interactive {
        healthlog_rs::init_logging();
    }

    let cwd = std::env::current_dir().context("cwd")?;
    let config = cli.load_config(&cwd)?;
    let root = cli.storage_root(&config, &cwd);
    if interactive {
        init_file_logging(&root)?;
    }
    info!(
        "starting healthlog (interactive={}, config_set={}, root={})",
        interactive,
        cli.config.is_some(),
        root.display()
    );

    let storage = FileSlotStorage::new(&root, config.storage.slot.clone())
        .context("failed to open record storage")?;
    let slot_path = storage.slot_path();
    let mut store = RecordStore::open(storage, TimestampIdGenerator::new());
    debug!("record store opened (records={})", store.len());

    match cli.command {
        None | Some(Command::Tui) => {
            let tui_config = TuiConfig {
                user: config.user.clone(),
                form: config.form.clone(),
                storage_label: slot_path.display().to_string(),
            };
            tui::run(store, tui_config)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(command) => {
            let mut stdout = io::stdout().lock();
            let mut stderr = io::stderr().lock();
            execute(
                command,
                &mut store,
                &config,
                Output {
                    out: &mut stdout,
                    err: &mut stderr,
                },
            )
        }
    }
}

/// Route logs to a file under `root` so they never draw over the dashboard.
fn init_file_logging(root: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(root)
        .with_context(|| format!("failed to create {}", root.display()))?;
    let path = root.join(TUI_LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
    Ok(())
}
