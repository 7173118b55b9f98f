/* src/server/core/rust/src/server.rs */

use std::sync::Arc;

use marquee_engine::{Locale, SUPPORTED_LOCALES};

use crate::resolve::ResolveStrategy;
use crate::service::VisibilityService;
use crate::store::{ConfigStore, MemoryStore};

/// Framework-agnostic parts extracted from `MarqueeServer`.
/// Adapter crates consume this to build framework-specific routers.
pub struct MarqueeParts {
  pub visibility: VisibilityService,
  pub default_locale: Locale,
  /// Enabled locales; always contains `default_locale`.
  pub locales: Vec<Locale>,
  pub strategies: Vec<Box<dyn ResolveStrategy>>,
  /// Bearer token required by admin endpoints. `None` leaves them open.
  pub admin_token: Option<String>,
}

impl MarqueeParts {
  pub fn has_url_prefix(&self) -> bool {
    self.strategies.iter().any(|s| s.kind() == "url_prefix")
  }
}

pub struct MarqueeServer {
  store: Arc<dyn ConfigStore>,
  default_locale: Locale,
  locales: Vec<Locale>,
  strategies: Vec<Box<dyn ResolveStrategy>>,
  admin_token: Option<String>,
  admin_path: Option<String>,
}

impl MarqueeServer {
  pub fn new() -> Self {
    Self {
      store: Arc::new(MemoryStore::new()),
      default_locale: Locale::default(),
      locales: Vec::new(),
      strategies: Vec::new(),
      admin_token: None,
      admin_path: None,
    }
  }

  pub fn store(mut self, store: Arc<dyn ConfigStore>) -> Self {
    self.store = store;
    self
  }

  pub fn default_locale(mut self, locale: Locale) -> Self {
    self.default_locale = locale;
    self
  }

  /// Restrict locale resolution to `locales`. Empty enables every supported locale.
  pub fn locales(mut self, locales: Vec<Locale>) -> Self {
    self.locales = locales;
    self
  }

  pub fn resolve_strategies(mut self, strategies: Vec<Box<dyn ResolveStrategy>>) -> Self {
    self.strategies = strategies;
    self
  }

  pub fn admin_token(mut self, token: impl Into<String>) -> Self {
    self.admin_token = Some(token.into());
    self
  }

  pub fn admin_path(mut self, path: impl Into<String>) -> Self {
    self.admin_path = Some(path.into());
    self
  }

  /// Consume the builder. Empty strategy lists fall back to the default chain.
  pub fn into_parts(self) -> MarqueeParts {
    let mut visibility = VisibilityService::new(self.store);
    if let Some(path) = self.admin_path {
      visibility = visibility.with_admin_path(path);
    }
    let strategies = if self.strategies.is_empty() {
      crate::resolve::default_strategies()
    } else {
      self.strategies
    };
    let mut locales = if self.locales.is_empty() { SUPPORTED_LOCALES.to_vec() } else { self.locales };
    if !locales.contains(&self.default_locale) {
      locales.insert(0, self.default_locale);
    }
    MarqueeParts {
      visibility,
      default_locale: self.default_locale,
      locales,
      strategies,
      admin_token: self.admin_token,
    }
  }
}

impl Default for MarqueeServer {
  fn default() -> Self {
    Self::new()
  }
}
