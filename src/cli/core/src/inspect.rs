/* src/cli/core/src/inspect.rs */

//! Read-only views of the built-in registry and defaults.

use anyhow::{Context, Result};
use marquee_server::marquee_engine::{
  Locale, REGISTRY, RouteMatch, create_default, resolve_in, split_locale_prefix,
};

use crate::ui::{self, CYAN, DIM, RESET};

pub fn default_config_json() -> Result<String> {
  serde_json::to_string_pretty(&create_default()).context("failed to serialize default config")
}

/// Page key and locale prefix for a request path, both optional.
pub fn resolve_path(path: &str) -> (Option<Locale>, Option<&'static str>) {
  let (locale, rest) = split_locale_prefix(path);
  (locale, resolve_in(REGISTRY, rest).map(|p| p.key))
}

pub fn print_resolve(path: &str) {
  let (locale, page) = resolve_path(path);
  if let Some(locale) = locale {
    ui::arrow(&format!("locale prefix {CYAN}{locale}{RESET}"));
  }
  match page {
    Some(key) => ui::ok(&format!("{path} -> {CYAN}{key}{RESET}")),
    None => ui::warn(&format!("{path} is not visibility-controlled")),
  }
}

pub fn print_registry(locale: Locale) {
  ui::banner("registry");
  for page in REGISTRY {
    let route = match page.route {
      RouteMatch::Exact(r) => r.to_string(),
      RouteMatch::Prefix(p) => format!("{p}*"),
    };
    let depth = page.segment_depth.map(|d| format!(" depth={d}")).unwrap_or_default();
    ui::arrow(&format!(
      "{CYAN}{}{RESET} {} {DIM}{route}{depth}{RESET}",
      page.key,
      page.label.get(locale)
    ));
    for section in page.sections {
      ui::detail(&format!("{} {DIM}{}{RESET}", section.key, section.label.get(locale)));
    }
  }
  ui::blank();
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resolve_with_locale_prefix() {
    assert_eq!(resolve_path("/en/products/gable-tent"), (Some(Locale::En), Some("productDetail")));
    assert_eq!(resolve_path("/cases/"), (None, None));
    assert_eq!(resolve_path("/zh-TW"), (Some(Locale::ZhTw), Some("home")));
  }

  #[test]
  fn default_json_covers_registry() {
    let value: serde_json::Value = serde_json::from_str(&default_config_json().unwrap()).unwrap();
    let pages = value["pages"].as_object().unwrap();
    assert_eq!(pages.len(), REGISTRY.len());
    assert_eq!(value["pages"]["home"]["hidden"], false);
  }
}
