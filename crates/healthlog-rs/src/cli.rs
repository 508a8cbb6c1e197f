//! Command-line surface for the `healthlog` binary.

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use healthlog_rs::config::{HealthlogConfig, LayeredConfigOptions};
use healthlog_rs::core::{
    Category, HealthRecord, IdGenerator, RecordFilter, RecordForm, RecordId, RecordStorage,
    RecordStore, TrendSeries, ValidationErrors,
};
use log::{debug, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Command-line options for the Healthlog CLI.
#[derive(Debug, Parser)]
#[command(name = "healthlog", version)]
#[command(about = "Keep, search and chart personal health records")]
pub struct Cli {
    /// Optional path to a healthlog.json5 applied over the layered config
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Directory holding the records slot, overriding storage.path
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a new record; unset fields take the configured defaults
    Add(RecordArgs),
    /// Update an existing record; unset fields keep their current value
    Update {
        id: String,
        #[command(flatten)]
        record: RecordArgs,
    },
    /// Delete a record by id
    Delete { id: String },
    /// List records, optionally filtered
    List {
        /// Substring matched against every field
        #[arg(long)]
        search: Option<String>,
        /// Category to include; repeat to select several
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Print the matching records as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Summarize temperature and heart rate trends
    Trend,
    /// Open the interactive dashboard (default)
    Tui,
}

/// Raw record fields as given on the command line.
#[derive(Debug, Clone, Default, Args)]
pub struct RecordArgs {
    /// Date of the observation (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
    /// One of General, Exercise, Illness, Medication, Other
    #[arg(long)]
    pub category: Option<String>,
    /// Body temperature in °C
    #[arg(long)]
    pub temperature: Option<String>,
    /// Blood pressure as systolic/diastolic
    #[arg(long)]
    pub blood_pressure: Option<String>,
    /// Heart rate in bpm
    #[arg(long)]
    pub heart_rate: Option<String>,
}

impl RecordArgs {
    /// Overlay the given fields onto a prefilled form.
    pub fn apply_to(self, mut form: RecordForm) -> RecordForm {
        if let Some(date) = self.date {
            form.date = date;
        }
        if let Some(category) = self.category {
            form.category = category;
        }
        if let Some(temperature) = self.temperature {
            form.temperature = temperature;
        }
        if let Some(blood_pressure) = self.blood_pressure {
            form.blood_pressure = blood_pressure;
        }
        if let Some(heart_rate) = self.heart_rate {
            form.heart_rate = heart_rate;
        }
        form
    }
}

impl Cli {
    /// Load the layered config, with `--config` applied as a runtime layer.
    pub fn load_config(&self, cwd: &Path) -> anyhow::Result<HealthlogConfig> {
        let mut options = LayeredConfigOptions::new(cwd);
        if let Some(path) = self.config.as_ref() {
            info!("applying runtime config: {}", path.display());
            options = options.with_runtime_path(path);
        }
        let layered = HealthlogConfig::load_layered_with_options(options)
            .context("failed to load config")?;
        debug!("layered config loaded (layers={})", layered.layers.len());
        Ok(layered.config)
    }

    /// Directory holding the records slot.
    pub fn storage_root(&self, config: &HealthlogConfig, cwd: &Path) -> PathBuf {
        match self.data_dir.as_ref() {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => cwd.join(dir),
            None => config.storage.resolve_root(cwd),
        }
    }
}

/// Output sinks for one command run.
pub struct Output<'a> {
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
}

/// Run a non-interactive command against an opened store.
///
/// Validation failures and unknown ids are reported on `err` and yield a
/// failing exit code; persistence and I/O failures are returned as errors.
pub fn execute<S: RecordStorage, G: IdGenerator>(
    command: Command,
    store: &mut RecordStore<S, G>,
    config: &HealthlogConfig,
    output: Output<'_>,
) -> anyhow::Result<ExitCode> {
    let Output { out, err } = output;
    match command {
        Command::Add(args) => {
            let form = args.apply_to(RecordForm::from_new(&config.form.blank_record()));
            let record = match form.submit() {
                Ok(record) => record,
                Err(errors) => return report_invalid(err, &errors),
            };
            let added = store.add(record).context("failed to save records")?;
            writeln!(out, "added record {}", added.id)?;
        }
        Command::Update { id, record } => {
            let id = RecordId::new(id);
            let Some(existing) = store.get(&id) else {
                writeln!(err, "no record with id {id}")?;
                return Ok(ExitCode::FAILURE);
            };
            let form = record.apply_to(RecordForm::from_record(existing));
            let updated = match form.submit() {
                Ok(record) => record.with_id(id.clone()),
                Err(errors) => return report_invalid(err, &errors),
            };
            store.update(updated).context("failed to save records")?;
            writeln!(out, "updated record {id}")?;
        }
        Command::Delete { id } => {
            let id = RecordId::new(id);
            if !store.delete(&id).context("failed to save records")? {
                writeln!(err, "no record with id {id}")?;
                return Ok(ExitCode::FAILURE);
            }
            writeln!(out, "deleted record {id}")?;
        }
        Command::List {
            search,
            categories,
            json,
        } => {
            let mut filter = RecordFilter::new().with_search(search.unwrap_or_default());
            for name in &categories {
                let category = name.parse::<Category>()?;
                filter = filter.with_category(category);
            }
            let visible = filter.apply(store.list());
            if json {
                serde_json::to_writer_pretty(&mut *out, &visible)?;
                writeln!(out)?;
            } else {
                write_table(out, &visible)?;
            }
        }
        Command::Trend => write_trend(out, &TrendSeries::from_records(store.list()))?,
        Command::Tui => bail!("the dashboard needs an interactive terminal"),
    }
    Ok(ExitCode::SUCCESS)
}

fn report_invalid(err: &mut dyn Write, errors: &ValidationErrors) -> anyhow::Result<ExitCode> {
    for (field, message) in errors.iter() {
        writeln!(err, "{field}: {message}")?;
    }
    Ok(ExitCode::FAILURE)
}

fn write_table(out: &mut dyn Write, records: &[&HealthRecord]) -> anyhow::Result<()> {
    if records.is_empty() {
        writeln!(out, "No records found")?;
        return Ok(());
    }
    writeln!(
        out,
        "{:<16} {:<10} {:<10} {:>8} {:>8} {:>6}",
        "ID", "DATE", "CATEGORY", "TEMP", "BP", "HR"
    )?;
    for record in records {
        writeln!(
            out,
            "{:<16} {:<10} {:<10} {:>8} {:>8} {:>6}",
            record.id,
            record.date,
            record.category,
            record.temperature,
            record.blood_pressure,
            record.heart_rate
        )?;
    }
    Ok(())
}

fn write_trend(out: &mut dyn Write, trend: &TrendSeries) -> anyhow::Result<()> {
    writeln!(out, "records: {}", trend.len())?;
    let (Some(temperature), Some(heart_rate)) =
        (trend.temperature_summary(), trend.heart_rate_summary())
    else {
        return Ok(());
    };
    if let (Some(first), Some(last)) = (trend.labels.first(), trend.labels.last()) {
        writeln!(out, "range: {first} .. {last}")?;
    }
    writeln!(
        out,
        "temperature (°C): min {:.1}  max {:.1}  avg {:.1}",
        temperature.min, temperature.max, temperature.mean
    )?;
    writeln!(
        out,
        "heart rate (bpm): min {:.0}  max {:.0}  avg {:.0}",
        heart_rate.min, heart_rate.max, heart_rate.mean
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, Output, execute};
    use clap::Parser;
    use healthlog_rs::config::HealthlogConfig;
    use healthlog_rs::core::{
        Category, HealthRecord, MemoryStorage, RecordStore, SequentialIdGenerator,
    };
    use healthlog_rs_test_utils::new_record;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use std::process::ExitCode;

    struct Run {
        code: ExitCode,
        out: String,
        err: String,
    }

    fn store() -> RecordStore<MemoryStorage, SequentialIdGenerator> {
        let mut store = RecordStore::open(MemoryStorage::new(), SequentialIdGenerator::default());
        store.add(new_record("2024-01-01")).expect("add");
        let mut run = new_record("2024-01-02");
        run.category = Category::Exercise;
        run.heart_rate = 150;
        store.add(run).expect("add");
        store
    }

    fn run(
        args: &[&str],
        store: &mut RecordStore<MemoryStorage, SequentialIdGenerator>,
    ) -> Run {
        let cli = Cli::try_parse_from(args).expect("args");
        let command = cli.command.expect("command");
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = execute(
            command,
            store,
            &HealthlogConfig::default(),
            Output {
                out: &mut out,
                err: &mut err,
            },
        )
        .expect("execute");
        Run {
            code,
            out: String::from_utf8(out).expect("utf8"),
            err: String::from_utf8(err).expect("utf8"),
        }
    }

    #[test]
    fn no_subcommand_means_dashboard() {
        let cli = Cli::try_parse_from(["healthlog", "--data-dir", "records"]).expect("args");
        assert!(cli.command.is_none());
        assert_eq!(
            cli.storage_root(&HealthlogConfig::default(), Path::new("/work")),
            Path::new("/work/records")
        );
        let cli = Cli::try_parse_from(["healthlog", "tui"]).expect("args");
        assert!(matches!(cli.command, Some(Command::Tui)));
    }

    #[test]
    fn runtime_config_overrides_layers() {
        let temp = tempfile::tempdir().expect("tempdir");
        let runtime = temp.path().join("override.json5");
        std::fs::write(
            &runtime,
            r#"{ storage: { path: "data", slot: "vitals" }, form: { heart_rate: 80 } }"#,
        )
        .expect("write");
        let runtime_arg = runtime.display().to_string();
        let cli = Cli::try_parse_from(["healthlog", "list", "--config", runtime_arg.as_str()])
            .expect("args");

        let config = cli.load_config(temp.path()).expect("config");

        assert_eq!(config.storage.slot, "vitals");
        assert_eq!(config.form.heart_rate, 80);
        assert_eq!(
            cli.storage_root(&config, Path::new("/work")),
            Path::new("/work/data")
        );
    }

    #[test]
    fn add_uses_form_defaults_for_unset_fields() {
        let mut store = store();
        let result = run(
            &[
                "healthlog",
                "add",
                "--date",
                "2024-02-01",
                "--blood-pressure",
                "118/75",
            ],
            &mut store,
        );
        assert_eq!(result.code, ExitCode::SUCCESS);
        assert_eq!(result.out, "added record 3\n");
        let added = &store.list()[2];
        assert_eq!(added.temperature, 36.5);
        assert_eq!(added.heart_rate, 70);
        assert_eq!(added.category, Category::General);
    }

    #[test]
    fn add_reports_each_invalid_field() {
        let mut store = store();
        let result = run(
            &[
                "healthlog",
                "add",
                "--date",
                "2024-02-01",
                "--temperature",
                "50",
                "--blood-pressure",
                "5/80",
            ],
            &mut store,
        );
        assert_eq!(result.code, ExitCode::FAILURE);
        assert_eq!(result.err.lines().count(), 2);
        assert!(result.err.contains("temperature: "));
        assert!(result.err.contains("bloodPressure: "));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn update_keeps_unset_fields() {
        let mut store = store();
        let result = run(&["healthlog", "update", "2", "--temperature", "37.9"], &mut store);
        assert_eq!(result.code, ExitCode::SUCCESS);
        let updated = &store.list()[1];
        assert_eq!(updated.temperature, 37.9);
        assert_eq!(updated.heart_rate, 150);
        assert_eq!(updated.category, Category::Exercise);
    }

    #[test]
    fn unknown_ids_fail() {
        let mut store = store();
        let update = run(&["healthlog", "update", "9", "--date", "2024-01-01"], &mut store);
        assert_eq!(update.code, ExitCode::FAILURE);
        assert_eq!(update.err, "no record with id 9\n");

        let delete = run(&["healthlog", "delete", "9"], &mut store);
        assert_eq!(delete.code, ExitCode::FAILURE);

        let delete = run(&["healthlog", "delete", "1"], &mut store);
        assert_eq!(delete.code, ExitCode::SUCCESS);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn list_filters_by_category_and_search() {
        let mut store = store();
        let result = run(
            &["healthlog", "list", "--category", "exercise", "--json"],
            &mut store,
        );
        let records: Vec<HealthRecord> = serde_json::from_str(&result.out).expect("json");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, "2024-01-02");

        let result = run(&["healthlog", "list", "--search", "2024-01-01"], &mut store);
        assert_eq!(result.out.lines().count(), 2);

        let result = run(&["healthlog", "list", "--search", "nothing"], &mut store);
        assert_eq!(result.out, "No records found\n");
    }

    #[test]
    fn list_rejects_unknown_category() {
        let mut store = store();
        let cli = Cli::try_parse_from(["healthlog", "list", "--category", "Sleep"]).expect("args");
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = execute(
            cli.command.expect("command"),
            &mut store,
            &HealthlogConfig::default(),
            Output {
                out: &mut out,
                err: &mut err,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn trend_summarizes_collection() {
        let mut store = store();
        let result = run(&["healthlog", "trend"], &mut store);
        assert_eq!(
            result.out,
            "records: 2\n\
             range: 2024-01-01 .. 2024-01-02\n\
             temperature (°C): min 36.5  max 36.5  avg 36.5\n\
             heart rate (bpm): min 70  max 150  avg 110\n"
        );
    }
}
