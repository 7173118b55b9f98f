/* src/cli/core/src/serve.rs */

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use marquee_server::{FileStore, MarqueeServer};
use marquee_server_axum::{IntoAxumRouter, RequestContext};

use crate::config::{MarqueeConfig, resolve_relative};
use crate::ui;

/// Stand-in for the page renderer: echoes the guard's request context.
async fn page_stub(req: Request) -> Response {
  let ctx = req.extensions().get::<RequestContext>().copied();
  match ctx {
    Some(RequestContext { page: Some(page), locale }) => axum::Json(serde_json::json!({
      "ok": true,
      "data": { "page": page, "locale": locale.active },
    }))
    .into_response(),
    _ => StatusCode::NOT_FOUND.into_response(),
  }
}

pub fn build_server(config: &MarqueeConfig, base_dir: &Path) -> Result<MarqueeServer> {
  let store_dir = resolve_relative(base_dir, &config.store.dir);
  let mut server = MarqueeServer::new()
    .store(Arc::new(FileStore::new(&store_dir)))
    .default_locale(config.i18n.default_locale()?)
    .locales(config.i18n.enabled_locales()?)
    .resolve_strategies(config.i18n.build_strategies()?);
  if let Some(ref token) = config.server.admin_token {
    server = server.admin_token(token.clone());
  }
  if let Some(ref path) = config.server.admin_path {
    server = server.admin_path(path.clone());
  }
  tracing::info!(store = %store_dir.display(), "using file store");
  Ok(server)
}

pub async fn run_serve(config: &MarqueeConfig, base_dir: &Path) -> Result<()> {
  ui::banner("serve");
  ui::arrow(&format!("site {}", config.site.name));
  if config.server.admin_token.is_none() {
    ui::warn("server.admin_token is unset -- admin endpoints are open");
  }

  let server = build_server(config, base_dir)?;
  let site = Router::new().fallback(page_stub);
  let addr = format!("{}:{}", config.server.host, config.server.port);
  server
    .serve(&addr, site)
    .await
    .map_err(|e| anyhow::anyhow!("{e}"))
    .with_context(|| format!("server on {addr} failed"))
}

#[cfg(test)]
mod tests {
  use axum::body::Body;
  use http_body_util::BodyExt;
  use tower::ServiceExt;

  use super::*;

  fn app(base: &Path) -> Router {
    let config = MarqueeConfig::default();
    build_server(&config, base).unwrap().wrap_site(Router::new().fallback(page_stub))
  }

  async fn get(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = router.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
  }

  #[tokio::test]
  async fn file_store_drives_guard() {
    let tmp = tempfile::tempdir().unwrap();
    let store_dir = tmp.path().join(".marquee/store");
    std::fs::create_dir_all(&store_dir).unwrap();
    std::fs::write(
      store_dir.join("site.visibility.json"),
      r#"{"pages": {"news": {"hidden": true}}}"#,
    )
    .unwrap();

    let (status, body) = get(app(tmp.path()), "/news").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "PAGE_HIDDEN");

    let (status, body) = get(app(tmp.path()), "/en/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["page"], "products");
    assert_eq!(body["data"]["locale"], "en");
  }

  #[tokio::test]
  async fn unmatched_path_is_404() {
    let tmp = tempfile::tempdir().unwrap();
    let (status, _) = get(app(tmp.path()), "/unknown/path").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
