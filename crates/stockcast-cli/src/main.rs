//! stockcast CLI - record market sales and forecast the next stock order

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use stockcast::{BackendKind, Pipeline, StockcastConfig, DEFAULT_CONFIG_FILE};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stockcast")]
#[command(
    author,
    version,
    about = "Record market sales, derive surplus and forecast the next stock order"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: ./stockcast.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Table store to use, overriding the config file
    #[arg(long, value_enum, global = true)]
    backend: Option<Backend>,

    /// Directory of CSV tables (csv backend)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Service-account key file (sheets backend)
    #[arg(long, global = true)]
    credentials: Option<PathBuf>,

    /// Spreadsheet ID, instead of looking the spreadsheet up by name
    #[arg(long, global = true)]
    spreadsheet_id: Option<String>,

    /// More log output on stderr (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Less log output on stderr (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    quiet: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Prompt for sales data and update every table (default)
    Run,

    /// Create empty CSV tables with a header row of product names
    Init,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    /// Google Sheets spreadsheet
    Sheets,
    /// Directory of CSV files
    Csv,
}

impl From<Backend> for BackendKind {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Sheets => BackendKind::Sheets,
            Backend::Csv => BackendKind::Csv,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(&config),
        Commands::Init => init_tables(&config),
    }
}

/// Log to stderr so stdout stays the operator conversation
fn init_logging(verbose: u8, quiet: u8) {
    let level = match i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=-2 => "off",
        -1 => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<StockcastConfig> {
    let mut config = match &cli.config {
        Some(path) => StockcastConfig::load(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => StockcastConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE))
            .context("Failed to load config")?,
    };

    if let Some(backend) = cli.backend {
        config.backend = backend.into();
    }
    if let Some(dir) = &cli.data_dir {
        config.csv.data_dir = dir.clone();
    }
    if let Some(path) = &cli.credentials {
        config.sheets.credentials = path.clone();
    }
    if let Some(id) = &cli.spreadsheet_id {
        config.sheets.spreadsheet_id = Some(id.clone());
    }

    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

fn run(config: &StockcastConfig) -> Result<()> {
    let store = config.open_store().context("Failed to open table store")?;
    let pipeline = Pipeline::from_config(store, config);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    writeln!(output, "Welcome to Love Sandwiches Data Automation\n")?;
    pipeline
        .run(&mut input, &mut output)
        .context("Sales run failed")?;
    output.flush().context("Failed to write to stdout")?;

    Ok(())
}

fn init_tables(config: &StockcastConfig) -> Result<()> {
    if config.backend != BackendKind::Csv {
        bail!("`init` only creates CSV tables; pass --backend csv or set backend = \"csv\"");
    }

    let store = config.csv_store();
    for table in config.tables.all() {
        if store.has_table(table)? {
            eprintln!("Table '{}' already exists, leaving it alone", table);
            continue;
        }
        store
            .create_table(table, &config.products)
            .with_context(|| format!("Failed to create table '{}'", table))?;
        println!("Created {}", store.table_path(table)?.display());
    }

    Ok(())
}
