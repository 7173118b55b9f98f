/* src/cli/core/src/config/loader.rs */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::MarqueeConfig;

/// Walk upward from `start` to find `marquee.toml`, like Cargo.toml discovery
pub fn find_marquee_config(start: &Path) -> Result<PathBuf> {
  let mut dir =
    start.canonicalize().with_context(|| format!("failed to canonicalize {}", start.display()))?;
  loop {
    let candidate = dir.join("marquee.toml");
    if candidate.is_file() {
      return Ok(candidate);
    }
    if !dir.pop() {
      bail!("marquee.toml not found (searched upward from {})", start.display());
    }
  }
}

pub fn load_marquee_config(path: &Path) -> Result<MarqueeConfig> {
  let content =
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  let config: MarqueeConfig =
    toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
  config.i18n.validate().with_context(|| format!("invalid [i18n] in {}", path.display()))?;
  Ok(config)
}

/// Resolve a config-relative path against the directory holding marquee.toml.
pub fn resolve_relative(base_dir: &Path, value: &str) -> PathBuf {
  let p = Path::new(value);
  if p.is_absolute() { p.to_path_buf() } else { base_dir.join(p) }
}
