/* src/cli/core/src/check.rs */

use std::path::Path;

use anyhow::{Context, Result, bail};
use marquee_server::marquee_engine::{Normalized, parse_visibility};

use crate::ui::{self, BOLD, RESET};

/// Parse a stored visibility document and report every repair normalization applies.
pub fn run_check(file: &Path, strict: bool) -> Result<Normalized> {
  let content =
    std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
  let raw: serde_json::Value =
    serde_json::from_str(&content).with_context(|| format!("{} is not JSON", file.display()))?;

  ui::banner("check");
  ui::arrow(&format!("reading {}", file.display()));

  let normalized = parse_visibility(&raw);
  let config = normalized.config();
  let hidden: Vec<&str> =
    config.pages.iter().filter(|(_, p)| p.hidden).map(|(k, _)| k.as_str()).collect();

  if normalized.is_valid() {
    ui::ok("config is well-formed");
  } else {
    ui::warn(&format!("{BOLD}{}{RESET} repairs needed", normalized.reasons().len()));
    for reason in normalized.reasons() {
      ui::detail(&reason.to_string());
    }
  }
  if hidden.is_empty() {
    ui::ok("no hidden pages");
  } else {
    ui::arrow(&format!("hidden pages: {}", hidden.join(", ")));
  }

  if strict && !normalized.is_valid() {
    ui::fail("strict mode: repairs are errors");
    bail!("{} needs repair (--strict)", file.display());
  }
  Ok(normalized)
}
