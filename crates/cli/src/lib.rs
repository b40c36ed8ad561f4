pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use assortment_core::config::{AppConfig, LogFormat, LoadOptions};
use assortment_core::SourcePaths;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "assortment",
    about = "College store assortment operator CLI",
    long_about = "Score vendor catalogs against campus data, explain the top picks, and refine them with planner feedback.",
    after_help = "Examples:\n  assortment run --vendor vendor.csv --sales sales.csv --profile profile.json\n  assortment feedback --session outputs/UCLA-01_session.json \"remove the desk lamp\"\n  assortment show --session outputs/UCLA-01_session.json\n  assortment doctor --json"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to assortment.toml (defaults to ./assortment.toml)")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct SourceArgs {
    #[arg(long, help = "Vendor catalog CSV")]
    vendor: Option<PathBuf>,
    #[arg(long, help = "Sales history CSV")]
    sales: Option<PathBuf>,
    #[arg(long, help = "Survey sentiment summary JSON")]
    survey: Option<PathBuf>,
    #[arg(long, help = "Social trend summary JSON")]
    trend: Option<PathBuf>,
    #[arg(long, help = "College profile JSON")]
    profile: Option<PathBuf>,
    #[arg(long, help = "Competitor pricing CSV")]
    competitor: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Ingest sources, score the catalog, and write the session and export")]
    Run {
        #[command(flatten)]
        sources: SourceArgs,
        #[arg(long, help = "Store id to use instead of the profile's")]
        store_id: Option<String>,
        #[arg(long, help = "Directory for the session snapshot and CSV export")]
        output_dir: Option<PathBuf>,
        #[arg(long, help = "Number of ranked products to keep")]
        top_k: Option<usize>,
    },
    #[command(about = "Apply planner feedback to a saved session through the configured LLM")]
    Feedback {
        #[arg(long, help = "Session snapshot written by `run`")]
        session: PathBuf,
        #[arg(help = "Free-text question or change request")]
        instruction: String,
        #[arg(long, help = "Directory for the refreshed CSV export (defaults to the session's directory)")]
        output_dir: Option<PathBuf>,
    },
    #[command(about = "Rewrite the CSV export from a saved session")]
    Export {
        #[arg(long)]
        session: PathBuf,
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    #[command(about = "Print the current products and rationale of a saved session")]
    Show {
        #[arg(long)]
        session: PathBuf,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, output directory, and LLM settings")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.config.clone());

    let result = match cli.command {
        Command::Run { sources, store_id, output_dir, top_k } => {
            commands::run::run(commands::run::RunArgs {
                sources: SourcePaths {
                    vendor: sources.vendor,
                    sales: sources.sales,
                    survey: sources.survey,
                    trend: sources.trend,
                    profile: sources.profile,
                    competitor: sources.competitor,
                },
                store_id,
                output_dir,
                top_k,
                config_path: cli.config,
            })
        }
        Command::Feedback { session, instruction, output_dir } => {
            commands::feedback::run(session, &instruction, output_dir, cli.config)
        }
        Command::Export { session, output_dir } => {
            commands::export::run(session, output_dir, cli.config)
        }
        Command::Show { session } => commands::show::run(&session),
        Command::Config => commands::config::run(cli.config),
        Command::Doctor { json } => commands::doctor::run(json, cli.config),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout carries only the command payload. A config
/// that fails to load still gets logging at the defaults; the command itself
/// reports the failure.
fn init_logging(config_path: Option<PathBuf>) {
    use tracing::Level;

    let config = AppConfig::load(LoadOptions { config_path, ..LoadOptions::default() })
        .unwrap_or_default();
    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
