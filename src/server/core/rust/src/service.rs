/* src/server/core/rust/src/service.rs */

//! Per-request read API over the persisted visibility config, plus the admin save path.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use marquee_engine::visibility::{META_ADMIN_PATH, META_SCHEMA, META_UPDATED_AT, SCHEMA_ID};
use marquee_engine::{
  DefaultReason, Locale, Normalized, VisibilityConfig, create_default, find_page, hidden_sections,
  parse_visibility, resolve_page_key_from_path,
};
use serde::Serialize;
use serde_json::Value;

use crate::errors::MarqueeError;
use crate::store::{ConfigStore, StoreError, VISIBILITY_CONFIG_KEY};

/// What a page template needs to decide what to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
  pub page: &'static str,
  pub locale: Locale,
  pub hidden_sections: BTreeMap<String, bool>,
  pub hidden_fields: Vec<String>,
}

#[derive(Clone)]
pub struct VisibilityService {
  store: Arc<dyn ConfigStore>,
  admin_path: Option<String>,
}

impl VisibilityService {
  pub fn new(store: Arc<dyn ConfigStore>) -> Self {
    Self { store, admin_path: None }
  }

  /// Recorded in `_meta.adminPath` on every save.
  pub fn with_admin_path(mut self, path: impl Into<String>) -> Self {
    self.admin_path = Some(path.into());
    self
  }

  /// Load and normalize. Absent records yield the default config; corrupt ones
  /// yield it as `Defaulted` with `DefaultReason::Unreadable`.
  pub async fn load_normalized(&self) -> Result<Normalized, MarqueeError> {
    let raw = match self.store.load(VISIBILITY_CONFIG_KEY).await {
      Ok(Some(raw)) => raw,
      Ok(None) => return Ok(Normalized::Valid(create_default())),
      Err(StoreError::Corrupt { key, source }) => {
        tracing::warn!(%key, error = %source, "stored visibility config is corrupt, using defaults");
        return Ok(Normalized::Defaulted(create_default(), vec![DefaultReason::Unreadable]));
      }
      Err(err) => return Err(err.into()),
    };
    let normalized = parse_visibility(&raw);
    if !normalized.is_valid() {
      tracing::warn!(
        key = VISIBILITY_CONFIG_KEY,
        repairs = normalized.reasons().len(),
        "stored visibility config needed repair"
      );
      for reason in normalized.reasons() {
        tracing::debug!(%reason, "visibility repair");
      }
    }
    Ok(normalized)
  }

  pub async fn load(&self) -> Result<VisibilityConfig, MarqueeError> {
    Ok(self.load_normalized().await?.into_config())
  }

  /// Fails with `PAGE_HIDDEN` when the config hides `page_key`.
  /// Keys outside the registry are not visibility-controlled and always pass.
  pub async fn ensure_page_visible(&self, page_key: &str) -> Result<VisibilityConfig, MarqueeError> {
    let config = self.load().await?;
    if find_page(page_key).is_some() && config.is_page_hidden(page_key) {
      return Err(MarqueeError::page_hidden(page_key));
    }
    Ok(config)
  }

  /// Resolve `path` to a page and gather its render context.
  /// `Ok(None)` means the path is not visibility-controlled.
  pub async fn page_context(
    &self,
    path: &str,
    locale: Locale,
  ) -> Result<Option<PageContext>, MarqueeError> {
    let Some(page) = resolve_page_key_from_path(path) else {
      return Ok(None);
    };
    let config = self.ensure_page_visible(page).await?;
    Ok(Some(PageContext {
      page,
      locale,
      hidden_sections: hidden_sections(&config, page),
      hidden_fields: config.hidden_fields(page),
    }))
  }

  /// Normalize `raw`, stamp metadata and persist it. Returns what was stored.
  pub async fn save(&self, raw: &Value) -> Result<Normalized, MarqueeError> {
    let normalized = parse_visibility(raw);
    let reasons = normalized.reasons().to_vec();
    let mut config = normalized.into_config();

    config.meta.insert(META_SCHEMA.into(), Value::String(SCHEMA_ID.into()));
    config.meta.insert(
      META_UPDATED_AT.into(),
      Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
    );
    if let Some(ref admin_path) = self.admin_path {
      config.meta.insert(META_ADMIN_PATH.into(), Value::String(admin_path.clone()));
    }

    let value =
      serde_json::to_value(&config).map_err(|e| MarqueeError::internal(e.to_string()))?;
    self.store.save(VISIBILITY_CONFIG_KEY, value).await?;

    let hidden_pages = config.pages.values().filter(|p| p.hidden).count();
    tracing::info!(key = VISIBILITY_CONFIG_KEY, hidden_pages, repairs = reasons.len(), "visibility config saved");

    Ok(if reasons.is_empty() {
      Normalized::Valid(config)
    } else {
      Normalized::Defaulted(config, reasons)
    })
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::store::{BoxFuture, FileStore, MemoryStore};

  struct DownStore;

  impl ConfigStore for DownStore {
    fn load<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>, StoreError>> {
      Box::pin(async move {
        Err(StoreError::Io { key: key.to_string(), source: std::io::Error::other("offline") })
      })
    }

    fn save<'a>(&'a self, key: &'a str, _value: Value) -> BoxFuture<'a, Result<(), StoreError>> {
      Box::pin(async move {
        Err(StoreError::Io { key: key.to_string(), source: std::io::Error::other("offline") })
      })
    }
  }

  fn service_with(raw: Value) -> VisibilityService {
    VisibilityService::new(Arc::new(MemoryStore::with_value(VISIBILITY_CONFIG_KEY, raw)))
  }

  #[tokio::test]
  async fn empty_store_yields_default() {
    let service = VisibilityService::new(Arc::new(MemoryStore::new()));
    assert_eq!(service.load().await.unwrap(), create_default());
  }

  #[tokio::test]
  async fn hidden_page_is_rejected() {
    let service = service_with(json!({"pages": {"news": {"hidden": true}}}));
    let err = service.ensure_page_visible("news").await.unwrap_err();
    assert!(err.is_page_hidden());
    assert!(service.ensure_page_visible("home").await.is_ok());
  }

  #[tokio::test]
  async fn unknown_page_key_passes() {
    let service = service_with(json!({"pages": {"legacy": {"hidden": true}}}));
    assert!(service.ensure_page_visible("legacy").await.is_ok());
  }

  #[tokio::test]
  async fn malformed_record_fails_open() {
    let service = service_with(json!("garbage"));
    let config = service.ensure_page_visible("products").await.unwrap();
    assert_eq!(config, create_default());
  }

  #[tokio::test]
  async fn unreadable_record_is_reported_as_repair() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("site.visibility.json"), "{\"pages\": ").unwrap();
    let service = VisibilityService::new(Arc::new(FileStore::new(dir.path())));
    let normalized = service.load_normalized().await.unwrap();
    assert_eq!(normalized.reasons(), [DefaultReason::Unreadable]);
    assert_eq!(normalized.config(), &create_default());
    assert!(service.ensure_page_visible("news").await.is_ok());
  }

  #[tokio::test]
  async fn store_outage_propagates() {
    let service = VisibilityService::new(Arc::new(DownStore));
    let err = service.ensure_page_visible("home").await.unwrap_err();
    assert_eq!(err.code(), "STORE_UNAVAILABLE");
    assert_eq!(err.status(), 503);
  }

  #[tokio::test]
  async fn page_context_for_detail_path() {
    let service = service_with(json!({
      "pages": {"productDetail": {"sections": {"downloads": true}, "fields": {"specs.price": true}}}
    }));
    let ctx = service.page_context("/products/gable-tent", Locale::En).await.unwrap().unwrap();
    assert_eq!(ctx.page, "productDetail");
    assert_eq!(ctx.hidden_sections.get("downloads"), Some(&true));
    assert_eq!(ctx.hidden_sections.get("gallery"), Some(&false));
    assert_eq!(ctx.hidden_fields, vec!["specs.price".to_string()]);
  }

  #[tokio::test]
  async fn page_context_unknown_path() {
    let service = service_with(json!({}));
    assert!(service.page_context("/unknown/path", Locale::En).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn save_normalizes_and_stamps_meta() {
    let store = Arc::new(MemoryStore::new());
    let service = VisibilityService::new(store.clone()).with_admin_path("/admin/visibility");
    let saved = service
      .save(&json!({"pages": {"about": {"hidden": true, "sections": {"gone": true}}}}))
      .await
      .unwrap();
    assert!(!saved.is_valid());

    let stored = store.load(VISIBILITY_CONFIG_KEY).await.unwrap().unwrap();
    assert_eq!(stored["_meta"]["schema"], SCHEMA_ID);
    assert_eq!(stored["_meta"]["adminPath"], "/admin/visibility");
    assert!(stored["_meta"]["updatedAt"].is_string());
    assert!(stored["pages"]["about"]["sections"].get("gone").is_none());

    // What was stored reads back without further repair.
    let reloaded = service.load_normalized().await.unwrap();
    assert!(reloaded.is_valid());
    assert!(reloaded.config().is_page_hidden("about"));
  }

  #[tokio::test]
  async fn save_propagates_store_failure() {
    let service = VisibilityService::new(Arc::new(DownStore));
    let err = service.save(&json!({})).await.unwrap_err();
    assert!(err.is_transient());
  }
}
