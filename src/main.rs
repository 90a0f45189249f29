use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fuzzplate_executor::{Executor, InMemoryClient};
use fuzzplate_template::{TemplateCatalog, TemplateRegistry, TemplateRequest, describe};

/// Fuzzplate - render fuzzing job templates into job and task configurations
#[derive(Parser)]
#[command(name = "fuzzplate")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.fuzzplate)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// Log at debug level regardless of RUST_LOG
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// List available templates
  List,

  /// Show the fields and containers a template needs
  Describe {
    /// Template name
    template: String,
  },

  /// Render a template request and print the result
  Render {
    /// Path to the request file (JSON); reads stdin when omitted
    request_file: Option<PathBuf>,
  },

  /// Render a template request and submit it
  Execute {
    /// Path to the request file (JSON); reads stdin when omitted
    request_file: Option<PathBuf>,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".fuzzplate"),
  };

  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async {
    let catalog = load_catalog(&data_dir).await?;

    match cli.command {
      Some(Commands::List) => {
        for name in catalog.names() {
          println!("{}", name);
        }
      }
      Some(Commands::Describe { template }) => {
        let template = catalog
          .get(&template)
          .with_context(|| format!("template '{}' not found", template))?;
        println!("{}", serde_json::to_string_pretty(&describe(template))?);
      }
      Some(Commands::Render { request_file }) => {
        let request = read_request(request_file.as_ref()).await?;
        let rendered = catalog.render(&request).context("failed to render template")?;
        println!("{}", serde_json::to_string_pretty(&rendered)?);
      }
      Some(Commands::Execute { request_file }) => {
        let request = read_request(request_file.as_ref()).await?;
        execute(&catalog, request).await?;
      }
      None => {
        println!("fuzzplate - use --help to see available commands");
      }
    }

    Ok::<(), anyhow::Error>(())
  })
}

fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .init();
}

/// Built-in templates plus any under `{data_dir}/templates`.
async fn load_catalog(data_dir: &std::path::Path) -> Result<TemplateCatalog> {
  let mut catalog = TemplateCatalog::builtin().context("failed to load built-in templates")?;

  let templates_dir = data_dir.join("templates");
  let loaded = catalog
    .load_dir(&templates_dir)
    .await
    .with_context(|| format!("failed to load templates from {}", templates_dir.display()))?;

  info!(templates = catalog.len(), from_data_dir = loaded, "catalog loaded");
  Ok(catalog)
}

async fn execute(catalog: &TemplateCatalog, request: TemplateRequest) -> Result<()> {
  let rendered = catalog.render(&request).context("failed to render template")?;

  let cancel = CancellationToken::new();
  let on_interrupt = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      warn!("interrupt received, cancelling");
      on_interrupt.cancel();
    }
  });

  let executor = Executor::new(Arc::new(InMemoryClient::new()));
  let execution = executor
    .execute(&request, rendered, cancel)
    .await
    .context("template execution failed")?;

  eprintln!("Created job: {}", execution.job_id);
  eprintln!("Tasks created: {}", execution.task_ids.len());

  println!("{}", serde_json::to_string_pretty(&execution)?);

  Ok(())
}

async fn read_request(request_file: Option<&PathBuf>) -> Result<TemplateRequest> {
  let content = match request_file {
    Some(path) => tokio::fs::read_to_string(path)
      .await
      .with_context(|| format!("failed to read request file: {}", path.display()))?,
    None => {
      let mut input = String::new();
      io::stdin()
        .read_to_string(&mut input)
        .context("failed to read request from stdin")?;
      input
    }
  };

  serde_json::from_str(&content).context("failed to parse template request")
}
