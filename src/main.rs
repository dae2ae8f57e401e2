//! CLI entry point for the cricsheet ETL.
//!
//! Provides subcommands for downloading the archives, running the ETL into
//! SQLite, printing the summary reports and exporting tables to CSV.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use cricsheet_etl::config::Config;
use cricsheet_etl::fetch::{BasicClient, FetchOutcome, fetch_format};
use cricsheet_etl::format::MatchFormat;
use cricsheet_etl::output::{export_csv, print_json, write_csv};
use cricsheet_etl::pipeline::run_all;
use cricsheet_etl::queries::run_all_reports;
use cricsheet_etl::reader::{MatchFilter, Reader};
use cricsheet_etl::store::Store;
use cricsheet_etl::transform::NoResultPolicy;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "cricsheet_etl")]
#[command(about = "Load cricsheet match archives into SQLite and report on them", long_about = None)]
struct Cli {
    /// SQLite database file (overrides CRICSHEET_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Folder holding one sub-folder per format (overrides CRICSHEET_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download and unpack the JSON archives that are not already present
    Fetch {
        /// Formats to fetch (defaults to all)
        #[arg(short, long = "format", value_name = "FORMAT")]
        formats: Vec<MatchFormat>,
    },
    /// Transform the match documents and replace the per-format tables
    Etl {
        /// Formats to process (defaults to all)
        #[arg(short, long = "format", value_name = "FORMAT")]
        formats: Vec<MatchFormat>,

        /// How matches without a winner count in team results: loss or exclude
        #[arg(long, default_value_t = NoResultPolicy::CountAsLoss)]
        no_result_policy: NoResultPolicy,
    },
    /// Print the summary reports
    Report,
    /// List the tables in the database
    Tables,
    /// Export a table to CSV
    Export {
        /// Table to export (e.g. odi_matches, batting_stats_t20)
        #[arg(short, long)]
        table: String,

        /// CSV file to write
        #[arg(short, long)]
        output: PathBuf,

        /// First season to keep (matches tables only)
        #[arg(long)]
        from_year: Option<i32>,

        /// Last season to keep (matches tables only)
        #[arg(long)]
        to_year: Option<i32>,

        /// Keep only matches this team played (matches tables only)
        #[arg(long)]
        team: Option<String>,

        /// Gzip compress the CSV file
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
}

fn init_logging(log_file_path: &Path) -> Result<WorkerGuard> {
    let log_dir = log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new("cricsheet_etl.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(guard)
}

fn selected(formats: Vec<MatchFormat>) -> Vec<MatchFormat> {
    if formats.is_empty() {
        MatchFormat::ALL.to_vec()
    } else {
        formats
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();
    let config = Config::from_env().with_overrides(cli.db, cli.data_dir);
    let _log_guard = init_logging(&config.log_file_path)?;

    match cli.command {
        Commands::Fetch { formats } => {
            let client = BasicClient::new()?;
            for format in selected(formats) {
                match fetch_format(&client, &config.data_dir, format).await? {
                    FetchOutcome::AlreadyPresent => {}
                    FetchOutcome::Downloaded { entries } => {
                        info!(%format, entries, "Fetched");
                    }
                }
            }
        }
        Commands::Etl {
            formats,
            no_result_policy,
        } => {
            let mut store = Store::open(&config.db_path)?;
            let summaries = run_all(
                &mut store,
                &config.data_dir,
                &selected(formats),
                no_result_policy,
            )?;
            print_json(&summaries)?;
        }
        Commands::Report => {
            let store = Store::open(&config.db_path)?;
            let mut reader = Reader::new(&store);
            for output in run_all_reports(&mut reader)? {
                println!("== {} ==", output.name);
                match output.table {
                    Some(table) => write_csv(io::stdout().lock(), &table)?,
                    None => println!("no data"),
                }
                println!();
            }
        }
        Commands::Tables => {
            let store = Store::open(&config.db_path)?;
            for table in store.list_tables()? {
                println!("{table}");
            }
        }
        Commands::Export {
            table,
            output,
            from_year,
            to_year,
            team,
            gzip,
        } => {
            let store = Store::open(&config.db_path)?;
            let mut reader = Reader::new(&store);
            let Some(mut data) = reader.read_table(&table)? else {
                bail!("table '{table}' does not exist in {}", config.db_path.display());
            };

            let filter = MatchFilter {
                from_year,
                to_year,
                team,
            };
            if !filter.is_empty() {
                if table.ends_with("_matches") {
                    filter.apply(&mut data);
                } else {
                    warn!(table, "Filters only apply to matches tables, ignoring");
                }
            }
            export_csv(&output, &data, gzip)?;
        }
    }

    Ok(())
}
