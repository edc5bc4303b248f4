//! `logboot` command line.
//!
//! Bootstraps logging from a configuration directory the same way a host
//! process would, then inspects or exercises the result.
//!
//! ```text
//! logboot --dir /etc/myapp --config logging.json show
//! logboot --dir /etc/myapp emit --level error --message "disk low" -f free_mb=12
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

use logboot::config::{load_config, validate_config};
use logboot::{Error, Fields, Severity};

#[derive(Parser)]
#[command(name = "logboot")]
#[command(about = "Bootstrap process logging from a JSON configuration", long_about = None)]
struct Cli {
    /// Directory holding the logging configuration.
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Configuration file name inside the directory.
    #[arg(short, long, default_value = "logging.json")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start logging and print the effective configuration
    Show,
    /// Load and validate the configuration without building sinks
    Check,
    /// Start logging and emit a single record
    Emit {
        #[arg(short, long, default_value = "warn")]
        level: Severity,

        #[arg(short, long)]
        message: String,

        /// Structured field as NAME=VALUE; VALUE is parsed as JSON when possible
        #[arg(short = 'f', long = "field", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Bootstrap diagnostics go to stderr, separate from the configured sinks.
    let diagnostics = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "logboot=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    match cli.command {
        Commands::Check => {
            let config = tracing::subscriber::with_default(diagnostics, || {
                load_config(&cli.dir, &cli.config)
            })?;
            validate_config(&config).map_err(Error::Validation)?;
            println!("{}: ok", cli.dir.join(&cli.config).display());
        }
        Commands::Show => {
            let handle = tracing::subscriber::with_default(diagnostics, || {
                logboot::start(&cli.dir, &cli.config)
            })?;
            println!("{}", serde_json::to_string_pretty(handle.config())?);
            match handle.log_file_path() {
                Some(path) => eprintln!("level: {}, log file: {}", handle.level(), path.display()),
                None => eprintln!("level: {}, file logging disabled", handle.level()),
            }
        }
        Commands::Emit {
            level,
            message,
            fields,
        } => {
            let handle = tracing::subscriber::with_default(diagnostics, || {
                logboot::start(&cli.dir, &cli.config)
            })?;
            if !handle.enabled(level) {
                eprintln!("{} is below the configured level {}", level, handle.level());
            }
            let fields: Fields = fields.into_iter().collect();
            handle.emit(level, &fields, &message);
        }
    }

    Ok(())
}

fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    if name.is_empty() {
        return Err(format!("field name is empty in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}
