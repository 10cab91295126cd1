#![forbid(unsafe_code)]

mod config;
mod constants;
mod document;
mod persistence;
mod preset;
mod session;
mod store;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use config::Settings;
use session::{SaveReport, Session};
use store::Upsert;

#[derive(Debug, Parser)]
#[command(name = "ini-preset-editor", version, about = "Edit sectioned INI settings and apply presets")]
struct Cli {
    /// Import preset JSON with a strict parser instead of the lenient scanner
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print entries, optionally only those matching a search query
    Show {
        file: PathBuf,
        #[arg(long)]
        filter: Option<String>,
    },
    /// Print the canonical serialization without writing anything
    Format { file: PathBuf },
    /// Set a value (inserting it if missing) and save
    Set {
        file: PathBuf,
        section: String,
        key: String,
        value: String,
    },
    /// Append a new row without merging into an existing one, then save
    Add {
        file: PathBuf,
        section: String,
        key: String,
        #[arg(default_value = "")]
        value: String,
    },
    /// Append a copy of the first matching entry and save
    Duplicate {
        file: PathBuf,
        section: String,
        key: String,
    },
    /// Remove the first matching entry and save
    Remove {
        file: PathBuf,
        section: String,
        key: String,
    },
    /// Trim fields, drop duplicate section/key pairs and save
    Normalize {
        file: PathBuf,
        #[arg(long)]
        dry_run: bool,
    },
    /// Apply a built-in or JSON preset and save
    Apply {
        file: PathBuf,
        #[command(flatten)]
        source: PresetSource,
    },
    /// Write the document's entries as preset JSON
    Export {
        file: PathBuf,
        #[arg(default_value = constants::preset::DEFAULT_EXPORT_NAME)]
        out: PathBuf,
    },
    /// Create a timestamped backup copy
    Backup { file: PathBuf },
    /// List built-in presets
    Presets,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct PresetSource {
    /// Built-in preset name (see `presets`)
    #[arg(long)]
    preset: Option<String>,
    /// Preset JSON file
    #[arg(long)]
    json: Option<PathBuf>,
}

fn init_logging(settings: &Settings) -> Result<()> {
    // Parse log level from environment variable, falling back to settings
    let log_level = match std::env::var(constants::config::LOG_LEVEL_ENV)
        .unwrap_or_else(|_| settings.log_level.clone())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")
}

fn path_arg(path: &std::path::Path) -> Result<&str> {
    path.to_str()
        .with_context(|| format!("Path is not valid UTF-8: {}", path.display()))
}

/// Open `file`, or start empty when it does not exist yet
fn open_or_new(session: &mut Session, file: &std::path::Path) -> Result<()> {
    if file.is_file() {
        let count = session.open(path_arg(file)?)?;
        info!(path = ?session.loaded_path(), entries = count, "Loaded entries from file");
    } else {
        warn!(path = %file.display(), "File does not exist yet, starting empty");
    }
    Ok(())
}

fn save(session: &mut Session, file: &std::path::Path, settings: &mut Settings) -> Result<SaveReport> {
    let report = session.save(path_arg(file)?)?;
    match &report.backup {
        Some(backup) => println!(
            "Saved {} entries. Backup: {}",
            report.entries,
            backup.file_name().unwrap_or_default().to_string_lossy()
        ),
        None => println!("Saved {} entries.", report.entries),
    }

    settings.last_path = Some(report.path.clone());
    if let Err(e) = settings.save() {
        warn!(error = %e, "Failed to remember last path");
    }
    Ok(report)
}

fn run(cli: Cli, mut settings: Settings) -> Result<()> {
    let mut session = Session::new();
    session.strict_presets = cli.strict || settings.strict_presets;

    match cli.command {
        Command::Show { file, filter } => {
            session.open(path_arg(&file)?)?;
            if session.store.is_empty() {
                println!("No entries.");
                return Ok(());
            }
            let visible = session.store.filter(filter.as_deref().unwrap_or_default());
            let rows = session.store.rows();
            for &i in &visible {
                let entry = &rows[i];
                println!("{:>4}  [{}] {} = {}", i + 1, entry.section, entry.key, entry.value);
            }
            println!("{} of {} entries", visible.len(), session.store.len());
        }
        Command::Format { file } => {
            session.open(path_arg(&file)?)?;
            print!("{}", session.render());
        }
        Command::Set {
            file,
            section,
            key,
            value,
        } => {
            if section.trim().is_empty() || key.trim().is_empty() {
                bail!("Section and key must not be empty");
            }
            open_or_new(&mut session, &file)?;
            match session.store.upsert(section.trim(), key.trim(), &value) {
                Upsert::Updated(i) => println!("Updated row {}.", i + 1),
                Upsert::Inserted(i) => println!("Inserted row {}.", i + 1),
            }
            save(&mut session, &file, &mut settings)?;
        }
        Command::Add {
            file,
            section,
            key,
            value,
        } => {
            if section.trim().is_empty() || key.trim().is_empty() {
                bail!("Section and key must not be empty");
            }
            open_or_new(&mut session, &file)?;
            let draft = session.store.draft_mut();
            draft.section = section;
            draft.key = key;
            draft.value = value;
            let added = session.store.commit_draft().and_then(|i| Some((i, session.store.get(i)?)));
            if let Some((index, entry)) = added {
                println!("Added row {}: [{}] {}", index + 1, entry.section, entry.key);
            }
            save(&mut session, &file, &mut settings)?;
        }
        Command::Duplicate { file, section, key } => {
            session.open(path_arg(&file)?)?;
            let copied = session
                .store
                .find(section.trim(), key.trim())
                .and_then(|i| session.store.duplicate(i));
            let Some(index) = copied else {
                bail!("No entry [{}] {}", section.trim(), key.trim());
            };
            println!("Duplicated as row {}.", index + 1);
            save(&mut session, &file, &mut settings)?;
        }
        Command::Remove { file, section, key } => {
            session.open(path_arg(&file)?)?;
            let Some(index) = session.store.find(section.trim(), key.trim()) else {
                bail!("No entry [{}] {}", section.trim(), key.trim());
            };
            session.store.remove(index);
            save(&mut session, &file, &mut settings)?;
        }
        Command::Normalize { file, dry_run } => {
            session.open(path_arg(&file)?)?;
            let removed = session.store.normalize();
            println!("Normalized. Removed {removed} duplicate rows.");
            if !dry_run {
                save(&mut session, &file, &mut settings)?;
            }
        }
        Command::Apply { file, source } => {
            open_or_new(&mut session, &file)?;
            let applied = match (source.preset, source.json) {
                (Some(name), _) => {
                    let preset = preset::builtin::find(&name)
                        .with_context(|| format!("Unknown preset: {name}"))?;
                    session.apply_preset(&preset.entries)
                }
                (None, Some(json)) => session.import_preset(&json)?,
                (None, None) => bail!("Choose --preset or --json"),
            };
            if applied == 0 {
                println!("No entries found in JSON.");
                return Ok(());
            }
            println!("Applied {applied} entries.");
            save(&mut session, &file, &mut settings)?;
        }
        Command::Export { file, out } => {
            session.open(path_arg(&file)?)?;
            let count = session.export_preset(&out)?;
            println!("Exported {count} entries to {}", out.display());
        }
        Command::Backup { file } => {
            session.open(path_arg(&file)?)?;
            let backup = session.backup()?;
            println!(
                "Backup created: {}",
                backup.file_name().unwrap_or_default().to_string_lossy()
            );
        }
        Command::Presets => {
            for preset in preset::builtin::all() {
                println!("{:<38} {}", preset.name, preset.description);
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = Settings::load();

    if let Err(e) = init_logging(&settings) {
        eprintln!("warning: {e:#}");
    }

    match run(cli, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "Command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
