/* src/cli/core/src/main.rs */

mod check;
mod config;
mod inspect;
mod serve;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use marquee_server::marquee_engine::Locale;
use tracing_subscriber::EnvFilter;

use config::{MarqueeConfig, find_marquee_config, load_marquee_config};

#[derive(Parser)]
#[command(name = "marquee", about = "Marquee site visibility CLI")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Start the HTTP server (visibility guard + admin endpoints)
  Serve {
    /// Path to marquee.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override server.port
    #[arg(short, long)]
    port: Option<u16>,
  },
  /// Report the repairs a stored visibility document needs
  Check {
    /// Visibility JSON document
    file: PathBuf,
    /// Exit non-zero when anything had to be defaulted
    #[arg(long)]
    strict: bool,
  },
  /// Print the all-visible default config as JSON
  Default,
  /// Show which registry page a request path maps to
  Resolve {
    /// Request path, e.g. /en/products/gable-tent
    path: String,
  },
  /// List registry pages and sections
  Registry {
    /// Label locale (zh-CN, zh-TW, en)
    #[arg(short, long, default_value = "zh-CN")]
    locale: Locale,
  },
}

/// Resolve config (explicit, auto-detected, or built-in defaults) plus its base dir.
fn resolve_config(explicit: Option<PathBuf>) -> Result<(PathBuf, MarqueeConfig)> {
  let cwd = std::env::current_dir().context("failed to get cwd")?;
  let path = match explicit {
    Some(p) => p,
    None => match find_marquee_config(&cwd) {
      Ok(p) => p,
      Err(_) => {
        ui::warn("marquee.toml not found, using defaults");
        return Ok((cwd, MarqueeConfig::default()));
      }
    },
  };
  let config = load_marquee_config(&path)?;
  let base_dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
  Ok((base_dir, config))
}

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  match cli.command {
    Command::Serve { config, port } => {
      init_tracing();
      let (base_dir, mut marquee_config) = resolve_config(config)?;
      marquee_config.apply_env_overrides(|k| std::env::var(k).ok())?;
      if let Some(port) = port {
        marquee_config.server.port = port;
      }
      serve::run_serve(&marquee_config, &base_dir).await?;
    }
    Command::Check { file, strict } => {
      check::run_check(&file, strict)?;
    }
    Command::Default => {
      println!("{}", inspect::default_config_json()?);
    }
    Command::Resolve { path } => {
      inspect::print_resolve(&path);
    }
    Command::Registry { locale } => {
      inspect::print_registry(locale);
    }
  }

  Ok(())
}
