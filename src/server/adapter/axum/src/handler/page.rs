/* src/server/adapter/axum/src/handler/page.rs */

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, Uri};
use axum::response::{IntoResponse, Response};
use marquee_server::MarqueeError;
use marquee_server::marquee_engine::split_locale_prefix;

use super::AppState;
use crate::error::AxumError;

async fn page_context(
  state: &AppState,
  raw_path: &str,
  uri: &Uri,
  headers: &HeaderMap,
) -> Result<Response, AxumError> {
  let (path_locale, path) = split_locale_prefix(raw_path);
  let locale = state.locale_context(path_locale, uri, headers);
  let ctx = state
    .visibility
    .page_context(path, locale.active)
    .await?
    .ok_or_else(|| MarqueeError::not_found(format!("no page matches \"{path}\"")))?;
  Ok(axum::Json(serde_json::json!({"ok": true, "data": ctx})).into_response())
}

/// `/_marquee/page/{*path}`: render context for the site path after the prefix.
pub(super) async fn handle_page_context(
  State(state): State<Arc<AppState>>,
  Path(path): Path<String>,
  uri: Uri,
  headers: HeaderMap,
) -> Result<Response, AxumError> {
  page_context(&state, &format!("/{path}"), &uri, &headers).await
}

/// `/_marquee/page`: render context for the site root.
pub(super) async fn handle_root_context(
  State(state): State<Arc<AppState>>,
  uri: Uri,
  headers: HeaderMap,
) -> Result<Response, AxumError> {
  page_context(&state, "/", &uri, &headers).await
}
