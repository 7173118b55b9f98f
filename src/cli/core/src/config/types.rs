/* src/cli/core/src/config/types.rs */

use anyhow::{Result, bail};
use marquee_server::marquee_engine::{Locale, SUPPORTED_LOCALES};
use marquee_server::{
  ResolveStrategy, from_accept_language, from_cookie, from_url_prefix, from_url_query,
};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarqueeConfig {
  #[serde(default)]
  pub site: SiteSection,
  #[serde(default)]
  pub server: ServerSection,
  #[serde(default)]
  pub store: StoreSection,
  #[serde(default)]
  pub i18n: I18nSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteSection {
  #[serde(default = "default_site_name")]
  pub name: String,
}

impl Default for SiteSection {
  fn default() -> Self {
    Self { name: default_site_name() }
  }
}

fn default_site_name() -> String {
  "marquee".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
  #[serde(default = "default_host")]
  pub host: String,
  #[serde(default = "default_port")]
  pub port: u16,
  /// Bearer token for `/_marquee` admin endpoints. Unset leaves them open.
  pub admin_token: Option<String>,
  /// Path of the admin editor, recorded in saved configs.
  pub admin_path: Option<String>,
}

impl Default for ServerSection {
  fn default() -> Self {
    Self { host: default_host(), port: default_port(), admin_token: None, admin_path: None }
  }
}

fn default_host() -> String {
  "0.0.0.0".to_string()
}

fn default_port() -> u16 {
  3000
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
  /// Directory of JSON documents, relative to marquee.toml.
  #[serde(default = "default_store_dir")]
  pub dir: String,
}

impl Default for StoreSection {
  fn default() -> Self {
    Self { dir: default_store_dir() }
  }
}

fn default_store_dir() -> String {
  ".marquee/store".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct I18nSection {
  /// Locales the site serves.
  #[serde(default = "default_locales")]
  pub locales: Vec<String>,
  #[serde(default = "default_locale")]
  pub default: String,
  /// Ordered locale resolution chain.
  #[serde(default = "default_strategies")]
  pub strategies: Vec<String>,
  #[serde(default = "default_cookie")]
  pub cookie: String,
  #[serde(default = "default_query_param")]
  pub query_param: String,
}

impl Default for I18nSection {
  fn default() -> Self {
    Self {
      locales: default_locales(),
      default: default_locale(),
      strategies: default_strategies(),
      cookie: default_cookie(),
      query_param: default_query_param(),
    }
  }
}

fn default_locales() -> Vec<String> {
  SUPPORTED_LOCALES.iter().map(|l| l.as_str().to_string()).collect()
}

fn default_locale() -> String {
  Locale::ZhCn.as_str().to_string()
}

fn default_strategies() -> Vec<String> {
  ["url_prefix", "cookie", "accept_language"].map(String::from).to_vec()
}

fn default_cookie() -> String {
  "marquee-locale".to_string()
}

fn default_query_param() -> String {
  "lang".to_string()
}

impl I18nSection {
  pub fn validate(&self) -> Result<()> {
    let locales = self.enabled_locales()?;
    let default = self.default_locale()?;
    if !locales.contains(&default) {
      bail!("i18n.default \"{}\" is not listed in i18n.locales", self.default);
    }
    self.build_strategies()?;
    Ok(())
  }

  pub fn enabled_locales(&self) -> Result<Vec<Locale>> {
    if self.locales.is_empty() {
      bail!("i18n.locales must not be empty");
    }
    self
      .locales
      .iter()
      .map(|raw| match Locale::parse(raw) {
        Some(locale) => Ok(locale),
        None => bail!("i18n.locales entry \"{raw}\" is not a supported locale"),
      })
      .collect()
  }

  pub fn default_locale(&self) -> Result<Locale> {
    match Locale::parse(&self.default) {
      Some(locale) => Ok(locale),
      None => bail!("i18n.default \"{}\" is not a supported locale", self.default),
    }
  }

  pub fn build_strategies(&self) -> Result<Vec<Box<dyn ResolveStrategy>>> {
    if self.strategies.is_empty() {
      bail!("i18n.strategies must not be empty");
    }
    self
      .strategies
      .iter()
      .map(|name| {
        Ok(match name.as_str() {
          "url_prefix" => from_url_prefix(),
          "url_query" => from_url_query(&self.query_param),
          "cookie" => from_cookie(&self.cookie),
          "accept_language" => from_accept_language(),
          other => bail!("unknown i18n strategy \"{other}\""),
        })
      })
      .collect()
  }
}

impl MarqueeConfig {
  /// Apply `MARQUEE_*` overrides through `lookup` (normally `std::env::var`).
  pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
    if let Some(port) = lookup("MARQUEE_PORT") {
      self.server.port = match port.parse() {
        Ok(p) => p,
        Err(_) => bail!("MARQUEE_PORT \"{port}\" is not a valid port"),
      };
    }
    if let Some(dir) = lookup("MARQUEE_STORE_DIR") {
      self.store.dir = dir;
    }
    if let Some(token) = lookup("MARQUEE_ADMIN_TOKEN") {
      self.server.admin_token = Some(token);
    }
    Ok(())
  }
}
