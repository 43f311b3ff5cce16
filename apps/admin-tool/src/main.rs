use std::path::{Path, PathBuf};
use std::process::ExitCode;

use admin_core::config::AdminConfig;
use admin_core::i18n::Localizer;
use admin_core::registry::TableRegistry;
use admin_core::render::{build_form, format_cell, CellPayload, FormMode, HookRegistry, RenderContext};
use admin_core::schema::load_schema_from_path;
use admin_core::submit::FormState;
use admin_core::table::order_columns;
use admin_core::Record;
use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Schema file describing the tables
    #[arg(short, long, global = true, default_value = "schema.json")]
    schema: PathBuf,

    /// Dictionary file used for labels
    #[arg(long, global = true)]
    lang: Option<PathBuf>,

    /// Language to render labels in
    #[arg(long, global = true, default_value = "en")]
    language: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the schema and check its cross references
    Validate,
    /// Print a table's columns in render order
    Order { table: String },
    /// Print the form markup for a table
    Form {
        table: String,
        #[arg(long, value_enum, default_value_t = Mode::Create)]
        mode: Mode,
        /// Record JSON to prefill the form with
        #[arg(long)]
        record: Option<String>,
    },
    /// Fill a create form and print the encoded submission
    Submit {
        table: String,
        /// Control values as `name=value`
        values: Vec<String>,
    },
    /// Print the grid markup of one cell
    Cell {
        table: String,
        member: String,
        /// Cell value as JSON; bare text is taken as a string
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Create,
    Update,
    QuickUpdate,
}

impl From<Mode> for FormMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Create => FormMode::Create,
            Mode::Update => FormMode::Update,
            Mode::QuickUpdate => FormMode::QuickUpdate,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    let registry = load_registry(&cli.schema)?;
    let localizer = match &cli.lang {
        Some(path) => Localizer::load(&cli.language, path)
            .with_context(|| format!("loading dictionaries {}", path.display()))?,
        None => Localizer::new(&cli.language),
    };
    let config = AdminConfig {
        default_language: cli.language.clone(),
        ..AdminConfig::default()
    };
    let hooks = HookRegistry::new();
    let ctx = RenderContext::new(&config, &localizer, &hooks);

    match &cli.command {
        Command::Validate => Ok(format!(
            "{}: {} tables ok ({})",
            cli.schema.display(),
            registry.len(),
            registry.table_names().join(", ")
        )),
        Command::Order { table } => {
            let table = registry.get(table)?;
            let names: Vec<_> = order_columns(table).iter().map(|f| f.name.as_str()).collect();
            Ok(names.join("\n"))
        }
        Command::Form { table, mode, record } => {
            let table = registry.get(table)?;
            let record = record.as_deref().map(parse_record).transpose()?;
            let form = build_form(&ctx, table, record.as_ref(), (*mode).into())?;
            Ok(form.to_html(&ctx))
        }
        Command::Submit { table, values } => {
            let table = registry.get(table)?;
            let form = build_form(&ctx, table, None, FormMode::Create)?;
            let mut state = FormState::new(&form);
            for assignment in values {
                let (name, value) = parse_assignment(assignment)?;
                state.set(name, value);
            }
            match state.prepare_submission() {
                Ok(body) => Ok(body),
                Err(e) => {
                    let detail: Vec<_> = e
                        .errors()
                        .iter()
                        .map(|f| format!("  {}: {:?}", f.field, f.violation))
                        .collect();
                    bail!("{}\n{}", e, detail.join("\n"))
                }
            }
        }
        Command::Cell { table, member, value } => {
            let value = serde_json::from_str(value)
                .unwrap_or_else(|_| serde_json::Value::String(value.clone()));
            let payload = CellPayload::new(table.as_str(), member.as_str(), value);
            Ok(format_cell(&ctx, &registry, &payload)?)
        }
    }
}

fn load_registry(path: &Path) -> anyhow::Result<TableRegistry> {
    let registry = load_schema_from_path(path)
        .with_context(|| format!("loading schema {}", path.display()))?;
    registry.validate()?;
    tracing::debug!("Loaded {} tables from {}", registry.len(), path.display());
    Ok(registry)
}

fn parse_record(json: &str) -> anyhow::Result<Record> {
    serde_json::from_str(json).context("record must be a JSON object")
}

fn parse_assignment(assignment: &str) -> anyhow::Result<(&str, &str)> {
    match assignment.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name, value)),
        _ => bail!("expected name=value, got '{}'", assignment),
    }
}
