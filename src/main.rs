//! gdrive_provider CLI - drive the `gdrive_file` lifecycle from JSON
//! declarations and state files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use gdrive_provider::data_source_file::lookup_id;
use gdrive_provider::resource_file::plan_replacement;
use gdrive_provider::schema::provider_schemas;
use gdrive_provider::{
    extract_id, FileConfig, FileDataSource, FileResource, FileState, ProviderConfig,
};

const DEFAULT_LOG_FILTER: &str = "gdrive_provider=info";

/// Manage Google Drive files, folders and shortcuts declaratively.
#[derive(Parser)]
#[command(name = "gdrive_provider")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to service account JSON credentials file.
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS", global = true)]
    credentials: Option<PathBuf>,

    /// OAuth2 access token; takes precedence over --credentials.
    #[arg(long, env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true, global = true)]
    access_token: Option<String>,

    /// Override the Drive API base URL.
    #[arg(long, env = "GDRIVE_API_BASE", global = true)]
    api_base: Option<String>,

    /// Override the Drive upload base URL.
    #[arg(long, env = "GDRIVE_UPLOAD_BASE", global = true)]
    upload_base: Option<String>,

    /// Log debug output to stderr.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resource and data source schemas.
    Schema,

    /// Check a resource declaration without contacting Drive.
    Validate {
        /// Resource declaration (JSON object).
        #[arg(long, short = 'c')]
        config: PathBuf,
    },

    /// Show whether a declaration requires replacing the recorded item.
    Plan {
        #[arg(long, short = 'c')]
        config: PathBuf,

        #[arg(long, short = 's')]
        state: PathBuf,
    },

    /// Create the declared item and write its state.
    Create {
        #[arg(long, short = 'c')]
        config: PathBuf,

        /// Where to write the resulting state (stdout when omitted).
        #[arg(long, short = 's')]
        state: Option<PathBuf>,
    },

    /// Refresh a state file from Drive.
    Read {
        #[arg(long, short = 's')]
        state: PathBuf,
    },

    /// Delete the item recorded in a state file.
    Delete {
        #[arg(long, short = 's')]
        state: PathBuf,
    },

    /// Look up an existing item by URL or ID.
    Lookup {
        /// Item URL or ID.
        item: String,
    },
}

impl Cli {
    fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            credentials: self.credentials.clone(),
            access_token: self.access_token.clone(),
            api_base: self.api_base.clone(),
            upload_base: self.upload_base.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Schema => print_json(&provider_schemas())?,

        Commands::Validate { config } => {
            read_config(config)?;
            println!("Declaration is valid.");
        }

        Commands::Plan { config, state } => {
            let declared = read_config(config)?;
            let prior: FileState = read_json(state)?;

            let replace = plan_replacement(&prior, &declared);
            if replace.is_empty() {
                println!("No changes.");
            } else {
                println!("{} must be replaced:", prior.id);
                for attribute in replace {
                    println!("  ~ {} (forces replacement)", attribute);
                }
            }
        }

        Commands::Create { config, state } => {
            let declared = read_config(config)?;
            let client = cli.provider_config().configure()?;

            let created = match FileResource::new(&client).create(&declared).await {
                Ok(created) => created,
                Err(err) => {
                    // The item exists remotely; keep tracking it.
                    if let Some(partial) = err.created_state() {
                        emit_state(state.as_deref(), partial)?;
                    }
                    return Err(err).context("Failed to create drive item");
                }
            };
            emit_state(state.as_deref(), &created)?;
        }

        Commands::Read { state } => {
            let mut current: FileState = read_json(state)?;
            let client = cli.provider_config().configure()?;

            FileResource::new(&client)
                .read(&mut current)
                .await
                .with_context(|| format!("Failed to read drive item: {}", current.id))?;

            write_json(state, &current)?;
            print_json(&current)?;
        }

        Commands::Delete { state } => {
            let current: FileState = read_json(state)?;
            let client = cli.provider_config().configure()?;

            FileResource::new(&client)
                .delete(&current)
                .await
                .with_context(|| format!("Failed to delete drive item: {}", current.id))?;

            fs::remove_file(state)
                .with_context(|| format!("Failed to remove state file: {:?}", state))?;
            println!("Deleted {}.", current.id);
        }

        Commands::Lookup { item } => {
            let id = extract_id(item).with_context(|| format!("Invalid URL or ID: {}", item))?;
            let id = lookup_id(&serde_json::json!({ "id": id }))?;
            let client = cli.provider_config().configure()?;

            let found = FileDataSource::new(&client)
                .read(&id)
                .await
                .with_context(|| format!("Failed to look up drive item: {}", id))?;
            print_json(&found)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("gdrive_provider=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {:?}", path))
}

fn read_config(path: &Path) -> Result<FileConfig> {
    let raw: Value = read_json(path)?;
    debug!(path = %path.display(), "validating declaration");
    FileConfig::from_value(&raw).with_context(|| format!("Invalid declaration in {:?}", path))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))
}

/// Write state to `path`, or print it when no path is given.
fn emit_state(path: Option<&Path>, state: &FileState) -> Result<()> {
    match path {
        Some(path) => write_json(path, state),
        None => print_json(state),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
