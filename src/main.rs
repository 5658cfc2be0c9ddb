#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{TimeDelta, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::FmtSubscriber;

use dtf_tester::cli_support::{
    config_from_args, format_previews, initial_state, option_actions, options_catalogue,
    previews_json,
};
use dtf_tester::codec;
use dtf_tester::config::{Overrides, SettingsContext, SystemEnv, discover_settings};
use dtf_tester::form::{Action, update};
use dtf_tester::{
    BuiltinFormatter, FileStorage, FormatConfig, PresetStore, RenderMode, render_locales,
};

#[derive(Parser, Debug)]
#[command(
    name = "dtf-tester",
    version,
    about = "Preview Intl.DateTimeFormat options and manage option presets"
)]
struct Cli {
    /// Path to settings file (yaml)
    #[arg(short = 'c', long = "config-file", value_name = "FILE", global = true)]
    config_file: Option<PathBuf>,

    /// Inline settings data (yaml)
    #[arg(short = 'd', long = "config-data", value_name = "YAML", global = true)]
    config_data: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the options for each preview locale
    Preview(PreviewArgs),
    /// Manage stored presets
    #[command(subcommand)]
    Presets(PresetsCommand),
    /// Print the option catalogue
    Options,
    /// Print the JSON schema of the stored preset document
    Schema,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Start date (YYYY-MM-DD), defaults to today
    #[arg(long, value_name = "DATE")]
    date: Option<String>,

    /// Start time (HH:MM:SS), defaults to now
    #[arg(long, value_name = "TIME")]
    time: Option<String>,

    /// End date for range mode, defaults to tomorrow
    #[arg(long = "end-date", value_name = "DATE")]
    end_date: Option<String>,

    /// End time for range mode
    #[arg(long = "end-time", value_name = "TIME")]
    end_time: Option<String>,

    /// Format the span between the start and end instants
    #[arg(long, default_value_t = false)]
    range: bool,

    /// Load the options of a stored preset first
    #[arg(long, value_name = "NAME")]
    preset: Option<String>,

    /// Option as FIELD=VALUE; repeatable, empty VALUE clears
    #[arg(short = 'o', long = "option", value_name = "FIELD=VALUE")]
    options: Vec<String>,

    /// Locale to render; repeatable, defaults to the configured locales
    #[arg(short = 'l', long = "locale", value_name = "LOCALE")]
    locales: Vec<String>,

    /// Print previews as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum PresetsCommand {
    /// List preset names in order
    List,
    /// Print a preset as YAML
    Show { name: String },
    /// Save options under a new name
    Add {
        name: String,
        #[arg(short = 'o', long = "option", value_name = "FIELD=VALUE")]
        options: Vec<String>,
    },
    /// Create or overwrite a preset
    Update {
        name: String,
        #[arg(short = 'o', long = "option", value_name = "FIELD=VALUE")]
        options: Vec<String>,
    },
    /// Rename a preset in place
    Rename { old: String, new: String },
    /// Delete presets
    Delete {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Move a contiguous block of presets one position up
    MoveUp {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Move a contiguous block of presets one position down
    MoveDown {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Replace all presets with the ones in a YAML file
    Import { file: PathBuf },
    /// Write all presets to a YAML file in DIR (default: current directory)
    Export { dir: Option<PathBuf> },
    /// Restore the built-in presets
    Reset,
}

fn init_logging() -> Result<(), SetGlobalDefaultError> {
    let level = match std::env::var("DTF_TESTER_LOG")
        .unwrap_or_else(|_| "warn".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

fn open_store(ctx: &SettingsContext) -> PresetStore<FileStorage> {
    PresetStore::load(FileStorage::new(ctx.storage_dir(&SystemEnv)))
}

fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("failed to set up logging: {e}");
    }
    let cli = Cli::parse();

    let ctx = match discover_settings(&Overrides {
        config_file: cli.config_file.clone(),
        config_data: cli.config_data.clone(),
    }) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    match cli.command {
        Command::Preview(args) => run_preview(&ctx, &args),
        Command::Presets(command) => run_presets(&ctx, command),
        Command::Options => {
            print!("{}", options_catalogue());
            ExitCode::SUCCESS
        }
        Command::Schema => {
            let schema = schemars::schema_for!(BTreeMap<String, FormatConfig>);
            match serde_json::to_string_pretty(&schema) {
                Ok(text) => {
                    println!("{text}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{e}");
                    ExitCode::from(1)
                }
            }
        }
    }
}

fn run_preview(ctx: &SettingsContext, args: &PreviewArgs) -> ExitCode {
    let formatter = match BuiltinFormatter::with_host_zone(ctx.settings.time_zone()) {
        Ok(formatter) => formatter,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };
    let now = Utc::now().naive_utc()
        + TimeDelta::minutes(i64::from(formatter.host_zone().offset_minutes()));

    let state = match initial_state(
        now,
        args.date.as_deref(),
        args.time.as_deref(),
        args.end_date.as_deref(),
        args.end_time.as_deref(),
    ) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    let mut store = None;
    let mut state = state;
    if let Some(name) = &args.preset {
        let loaded = store.insert(open_store(ctx));
        match loaded.activate(name) {
            Ok(config) => match update(&state, Action::Load(config.clone())) {
                Ok(next) => state = next,
                Err(e) => {
                    eprintln!("{e}");
                    return ExitCode::from(1);
                }
            },
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::from(1);
            }
        }
    }

    let actions = match option_actions(&args.options) {
        Ok(actions) => actions,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };
    for action in actions {
        match update(&state, action) {
            Ok(next) => state = next,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::from(2);
            }
        }
    }
    if args.range {
        match update(&state, Action::SetMode(RenderMode::Range)) {
            Ok(next) => state = next,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::from(2);
            }
        }
    }

    if let Some(store) = &store
        && store.is_edited(&state.options())
    {
        eprintln!("preset '{}' edited", store.active().unwrap_or_default());
    }

    // Instants were validated by initial_state.
    let (Ok(start), Ok(end)) = (state.start(), state.end()) else {
        return ExitCode::from(2);
    };
    let locales: Vec<String> = if args.locales.is_empty() {
        ctx.settings.locales().to_vec()
    } else {
        args.locales.clone()
    };
    let previews = render_locales(
        &formatter,
        &state.options,
        &locales,
        start,
        state.mode,
        Some(end),
    );

    if args.json {
        println!("{}", previews_json(&previews));
    } else {
        print!("{}", format_previews(&previews));
    }
    if previews.iter().any(|preview| preview.result.is_err()) {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn run_presets(ctx: &SettingsContext, command: PresetsCommand) -> ExitCode {
    let mut store = open_store(ctx);
    let outcome: Result<(), String> = match command {
        PresetsCommand::List => {
            for name in store.names() {
                println!("{name}");
            }
            Ok(())
        }
        PresetsCommand::Show { name } => store.get(&name).map_or_else(
            || Err(format!("no preset named '{name}'")),
            |config| {
                print!("{}", codec::encode_config(config));
                Ok(())
            },
        ),
        PresetsCommand::Add { name, options } => config_from_args(FormatConfig::new(), &options)
            .and_then(|config| store.add(&name, &config).map_err(|e| e.to_string()))
            .map(|stored| println!("added '{stored}'")),
        PresetsCommand::Update { name, options } => {
            let base = store.get(name.trim()).cloned().unwrap_or_default();
            config_from_args(base, &options)
                .and_then(|config| store.upsert(&name, &config).map_err(|e| e.to_string()))
                .map(|replaced| {
                    let verb = if replaced { "updated" } else { "added" };
                    println!("{verb} '{}'", name.trim());
                })
        }
        PresetsCommand::Rename { old, new } => store
            .rename(&old, &new)
            .map(|renamed| {
                if !renamed {
                    println!("nothing to rename");
                }
            })
            .map_err(|e| e.to_string()),
        PresetsCommand::Delete { names } => store
            .delete(names.iter().map(String::as_str))
            .map(|removed| println!("deleted {removed}"))
            .map_err(|e| e.to_string()),
        PresetsCommand::MoveUp { names } => {
            store.select(names.iter().map(String::as_str));
            move_selection(store.can_move_up(), || store.move_up())
        }
        PresetsCommand::MoveDown { names } => {
            store.select(names.iter().map(String::as_str));
            move_selection(store.can_move_down(), || store.move_down())
        }
        PresetsCommand::Import { file } => store
            .import_file(&file)
            .map(|count| println!("imported {count}"))
            .map_err(|e| e.to_string()),
        PresetsCommand::Export { dir } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from("."));
            store
                .export_to()
                .write_into(&dir)
                .map(|path| println!("{}", path.display()))
                .map_err(|e| e.to_string())
        }
        PresetsCommand::Reset => store
            .restore_defaults()
            .map(|()| println!("restored {} presets", store.len()))
            .map_err(|e| e.to_string()),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(1)
        }
    }
}

fn move_selection(
    allowed: bool,
    mv: impl FnOnce() -> Result<bool, dtf_tester::StoreError>,
) -> Result<(), String> {
    if !allowed {
        return Err("selection must be contiguous and not at the edge".to_string());
    }
    mv().map(|_| ()).map_err(|e| e.to_string())
}
