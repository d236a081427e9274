use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fanout_config::{CredentialsDef, RunDef};
use fanout_engine::FanoutEngine;
use fanout_http::ReqwestClient;
use fanout_normalizer::{normalize, resolve_policy};

/// Fanout - call many webhooks in parallel and collect the results
#[derive(Parser)]
#[command(name = "fanout")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.fanout)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the calls described by a run file
  Run {
    /// Path to the run file (JSON)
    run_file: PathBuf,

    /// Path to a credentials file (default: <data-dir>/credentials.json)
    #[arg(long)]
    credentials: Option<PathBuf>,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing();

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".fanout"),
  };

  match cli.command {
    Some(Commands::Run {
      run_file,
      credentials,
    }) => {
      let rt = tokio::runtime::Runtime::new()?;
      rt.block_on(async { run_async(run_file, credentials, data_dir).await })?;
    }
    None => {
      println!("fanout - use --help to see available commands");
    }
  }

  Ok(())
}

/// Log to stderr so stdout carries only the result. `RUST_LOG` overrides the default level.
fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .init();
}

async fn run_async(
  run_file: PathBuf,
  credentials_file: Option<PathBuf>,
  data_dir: PathBuf,
) -> Result<()> {
  let run_content = tokio::fs::read_to_string(&run_file)
    .await
    .with_context(|| format!("failed to read run file: {}", run_file.display()))?;

  let run_def: RunDef = serde_json::from_str(&run_content)
    .with_context(|| format!("failed to parse run file: {}", run_file.display()))?;

  let credentials = load_credentials(credentials_file, &data_dir).await?;
  let items = read_items_from_stdin()?;

  let specs = normalize(&run_def.source, &items, credentials.as_ref())
    .context("invalid call configuration")?;
  let policy = resolve_policy(&run_def.options);
  info!(calls = specs.len(), "loaded run file");

  let cancel = CancellationToken::new();
  let on_interrupt = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      warn!("interrupted, cancelling run");
      on_interrupt.cancel();
    }
  });

  let engine = FanoutEngine::new(Arc::new(ReqwestClient::new()));
  let result = engine
    .execute(specs, &policy, cancel)
    .await
    .context("run failed")?;

  let records = serde_json::Value::Array(result.into_records());
  println!("{}", serde_json::to_string_pretty(&records)?);

  Ok(())
}

/// Load credentials from an explicit file, or from the data directory if present.
async fn load_credentials(
  explicit: Option<PathBuf>,
  data_dir: &Path,
) -> Result<Option<CredentialsDef>> {
  let path = match explicit {
    Some(path) => path,
    None => {
      let default = data_dir.join("credentials.json");
      if !tokio::fs::try_exists(&default).await.unwrap_or(false) {
        return Ok(None);
      }
      default
    }
  };

  let content = tokio::fs::read_to_string(&path)
    .await
    .with_context(|| format!("failed to read credentials file: {}", path.display()))?;
  let credentials = serde_json::from_str(&content)
    .with_context(|| format!("failed to parse credentials file: {}", path.display()))?;

  Ok(Some(credentials))
}

/// Read trigger items from stdin. An array is the item list, anything else a single item.
fn read_items_from_stdin() -> Result<Vec<serde_json::Value>> {
  use std::io::IsTerminal;

  let payload = if io::stdin().is_terminal() {
    // No stdin pipe, use empty object
    serde_json::json!({})
  } else {
    let mut input = String::new();
    io::stdin()
      .read_to_string(&mut input)
      .context("failed to read payload from stdin")?;

    if input.trim().is_empty() {
      serde_json::json!({})
    } else {
      serde_json::from_str(&input).context("failed to parse payload JSON from stdin")?
    }
  };

  Ok(match payload {
    serde_json::Value::Array(items) => items,
    item => vec![item],
  })
}
