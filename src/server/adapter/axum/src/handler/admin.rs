/* src/server/adapter/axum/src/handler/admin.rs */

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use marquee_server::MarqueeError;
use marquee_server::marquee_engine::{Locale, Normalized, REGISTRY, RouteMatch};
use serde::Serialize;

use super::AppState;
use crate::error::AxumError;

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), MarqueeError> {
  let Some(ref expected) = state.admin_token else {
    return Ok(());
  };
  let presented = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "));
  match presented {
    Some(token) if token == expected.as_str() => Ok(()),
    _ => Err(MarqueeError::unauthorized("admin token required")),
  }
}

fn visibility_body(normalized: &Normalized) -> serde_json::Value {
  let repairs: Vec<String> = normalized.reasons().iter().map(ToString::to_string).collect();
  serde_json::json!({"ok": true, "data": normalized.config(), "repairs": repairs})
}

pub(super) async fn handle_get_visibility(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
) -> Result<Response, AxumError> {
  authorize(&state, &headers)?;
  let normalized = state.visibility.load_normalized().await?;
  Ok(axum::Json(visibility_body(&normalized)).into_response())
}

pub(super) async fn handle_put_visibility(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  body: axum::body::Bytes,
) -> Result<Response, AxumError> {
  authorize(&state, &headers)?;
  let raw: serde_json::Value =
    serde_json::from_slice(&body).map_err(|e| MarqueeError::validation(e.to_string()))?;
  let saved = state.visibility.save(&raw).await?;
  Ok(axum::Json(visibility_body(&saved)).into_response())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionEntry {
  key: &'static str,
  label: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageEntry {
  key: &'static str,
  label: &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  route: Option<&'static str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  route_prefix: Option<&'static str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  segment_depth: Option<usize>,
  sections: Vec<SectionEntry>,
}

/// Registry listing for the admin editor, labels in `?locale=` (default locale otherwise).
pub(super) async fn handle_registry(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  Query(query): Query<HashMap<String, String>>,
) -> Result<Response, AxumError> {
  authorize(&state, &headers)?;
  let locale = match query.get("locale") {
    Some(raw) => Locale::parse(raw)
      .ok_or_else(|| MarqueeError::validation(format!("unsupported locale \"{raw}\"")))?,
    None => state.default_locale,
  };

  let pages: Vec<PageEntry> = REGISTRY
    .iter()
    .map(|p| {
      let (route, route_prefix) = match p.route {
        RouteMatch::Exact(r) => (Some(r), None),
        RouteMatch::Prefix(r) => (None, Some(r)),
      };
      PageEntry {
        key: p.key,
        label: p.label.get(locale),
        route,
        route_prefix,
        segment_depth: p.segment_depth,
        sections: p
          .sections
          .iter()
          .map(|s| SectionEntry { key: s.key, label: s.label.get(locale) })
          .collect(),
      }
    })
    .collect();

  Ok(axum::Json(serde_json::json!({"ok": true, "data": {"locale": locale, "pages": pages}}))
    .into_response())
}
