/* src/server/adapter/axum/src/tests.rs */

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::Extension;
use axum::http::{Request, StatusCode, header};
use axum::routing::get;
use http_body_util::BodyExt;
use marquee_server::marquee_engine::Locale;
use marquee_server::{
  BoxFuture, ConfigStore, MarqueeServer, MemoryStore, StoreError, VISIBILITY_CONFIG_KEY,
};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::*;

fn site() -> Router {
  Router::new()
    .route("/", get(|| async { "home" }))
    .route("/news", get(|| async { "news" }))
    .route(
      "/products/{slug}",
      get(|Extension(ctx): Extension<RequestContext>| async move {
        format!("{}:{}", ctx.page.unwrap_or("-"), ctx.locale.active)
      }),
    )
}

/// Store whose backend is unreachable.
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

fn router_with(raw: Value) -> Router {
  let store = Arc::new(MemoryStore::with_value(VISIBILITY_CONFIG_KEY, raw));
  MarqueeServer::new().store(store).wrap_site(site())
}

async fn send(router: Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
  let resp = router.oneshot(req).await.unwrap();
  let status = resp.status();
  let body = resp.into_body().collect().await.unwrap().to_bytes().to_vec();
  (status, body)
}

fn get_req(uri: &str) -> Request<Body> {
  Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[test]
fn into_axum_router_builds_without_panic() {
  let _router = MarqueeServer::new().into_axum_router();
}

#[tokio::test]
async fn visible_page_reaches_site() {
  let (status, body) = send(router_with(json!({})), get_req("/news")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, b"news");
}

#[tokio::test]
async fn hidden_page_is_404_envelope() {
  let router = router_with(json!({"pages": {"news": {"hidden": true}}}));
  let (status, body) = send(router, get_req("/news")).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let parsed: Value = serde_json::from_slice(&body).unwrap();
  assert_eq!(parsed["ok"], false);
  assert_eq!(parsed["error"]["code"], "PAGE_HIDDEN");
  assert_eq!(parsed["error"]["transient"], false);
}

#[tokio::test]
async fn hidden_page_rejects_head() {
  let router = router_with(json!({"pages": {"news": {"hidden": true}}}));
  let req = Request::builder().method("HEAD").uri("/news").body(Body::empty()).unwrap();
  let (status, _) = send(router.clone(), req).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let req = Request::builder().method("HEAD").uri("/").body(Body::empty()).unwrap();
  let (status, _) = send(router, req).await;
  assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn store_outage_serves_site_but_fails_page_context() {
  let router = MarqueeServer::new().store(Arc::new(DownStore)).wrap_site(site());
  let (status, body) = send(router.clone(), get_req("/news")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, b"news");

  let (status, body) = send(router, get_req("/_marquee/page/news")).await;
  assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
  let parsed: Value = serde_json::from_slice(&body).unwrap();
  assert_eq!(parsed["ok"], false);
  assert_eq!(parsed["error"]["code"], "STORE_UNAVAILABLE");
  assert_eq!(parsed["error"]["transient"], true);
}

#[tokio::test]
async fn disabled_locale_is_not_resolved() {
  let router = MarqueeServer::new()
    .store(Arc::new(MemoryStore::new()))
    .locales(vec![Locale::ZhCn, Locale::ZhTw])
    .wrap_site(site());
  let req = Request::builder()
    .uri("/products/gable-tent")
    .header(header::ACCEPT_LANGUAGE, "en-US,zh-TW;q=0.5")
    .body(Body::empty())
    .unwrap();
  let (status, body) = send(router, req).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(String::from_utf8(body).unwrap(), "productDetail:zh-TW");
}

#[tokio::test]
async fn guard_exposes_request_context() {
  let req = Request::builder()
    .uri("/products/gable-tent")
    .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
    .body(Body::empty())
    .unwrap();
  let (status, body) = send(router_with(json!({})), req).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(String::from_utf8(body).unwrap(), "productDetail:en");
}

#[tokio::test]
async fn page_context_endpoint() {
  let router = router_with(json!({"pages": {"casesDetail": {"sections": {"sidebar": true}}}}));
  let (status, body) =
    send(router, get_req("/_marquee/page/zh-TW/cases/sports-events/hangzhou-2023")).await;
  assert_eq!(status, StatusCode::OK);
  let parsed: Value = serde_json::from_slice(&body).unwrap();
  assert_eq!(parsed["data"]["page"], "casesDetail");
  assert_eq!(parsed["data"]["locale"], "zh-TW");
  assert_eq!(parsed["data"]["hiddenSections"]["sidebar"], true);
  assert_eq!(parsed["data"]["hiddenSections"]["gallery"], false);
}

#[tokio::test]
async fn page_context_root_and_unknown() {
  let (status, body) = send(router_with(json!({})), get_req("/_marquee/page")).await;
  assert_eq!(status, StatusCode::OK);
  let parsed: Value = serde_json::from_slice(&body).unwrap();
  assert_eq!(parsed["data"]["page"], "home");
  assert_eq!(parsed["data"]["locale"], Locale::ZhCn.as_str());

  let (status, _) = send(router_with(json!({})), get_req("/_marquee/page/unknown/path")).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_visibility_saves_normalized() {
  let store = Arc::new(MemoryStore::new());
  let router = MarqueeServer::new().store(store.clone()).into_axum_router();
  let req = Request::builder()
    .method("PUT")
    .uri("/_marquee/visibility")
    .body(Body::from(r#"{"pages":{"about":{"hidden":true,"sections":{"old":true}}}}"#))
    .unwrap();
  let (status, body) = send(router, req).await;
  assert_eq!(status, StatusCode::OK);
  let parsed: Value = serde_json::from_slice(&body).unwrap();
  assert_eq!(parsed["data"]["pages"]["about"]["hidden"], true);
  assert!(!parsed["repairs"].as_array().unwrap().is_empty());

  let stored = store.load(VISIBILITY_CONFIG_KEY).await.unwrap().unwrap();
  assert_eq!(stored["pages"]["about"]["hidden"], true);
  assert!(stored["pages"]["about"]["sections"].get("old").is_none());
}

#[tokio::test]
async fn put_visibility_rejects_invalid_json() {
  let router = MarqueeServer::new().into_axum_router();
  let req =
    Request::builder().method("PUT").uri("/_marquee/visibility").body(Body::from("{")).unwrap();
  let (status, body) = send(router, req).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  let parsed: Value = serde_json::from_slice(&body).unwrap();
  assert_eq!(parsed["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn admin_token_enforced() {
  let router = MarqueeServer::new().admin_token("s3cret").into_axum_router();
  let (status, _) = send(router.clone(), get_req("/_marquee/visibility")).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);

  let req = Request::builder()
    .uri("/_marquee/visibility")
    .header(header::AUTHORIZATION, "Bearer s3cret")
    .body(Body::empty())
    .unwrap();
  let (status, body) = send(router, req).await;
  assert_eq!(status, StatusCode::OK);
  let parsed: Value = serde_json::from_slice(&body).unwrap();
  assert_eq!(parsed["data"]["pages"]["home"]["hidden"], false);
}

#[tokio::test]
async fn registry_labels_follow_locale() {
  let router = MarqueeServer::new().into_axum_router();
  let (status, body) = send(router.clone(), get_req("/_marquee/registry?locale=en")).await;
  assert_eq!(status, StatusCode::OK);
  let parsed: Value = serde_json::from_slice(&body).unwrap();
  let pages = parsed["data"]["pages"].as_array().unwrap();
  assert_eq!(pages[0]["key"], "home");
  assert_eq!(pages[0]["label"], "Home");
  let detail = pages.iter().find(|p| p["key"] == "casesDetail").unwrap();
  assert_eq!(detail["routePrefix"], "/cases/");
  assert_eq!(detail["segmentDepth"], 3);

  let (status, _) = send(router, get_req("/_marquee/registry?locale=fr")).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}
