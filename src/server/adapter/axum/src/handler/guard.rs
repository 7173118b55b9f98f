/* src/server/adapter/axum/src/handler/guard.rs */

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use marquee_server::marquee_engine::{LocaleContext, resolve_page_key_from_path, split_locale_prefix};

use super::{API_PREFIX, AppState};
use crate::error::AxumError;

/// Inserted into request extensions for site handlers behind the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
  /// Registry page the path resolved to, if any.
  pub page: Option<&'static str>,
  pub locale: LocaleContext,
}

/// Reject GET and HEAD requests for hidden pages before they reach the site router.
///
/// A failing store does not block rendering here: the request proceeds as if
/// everything were visible and the failure is logged.
pub(super) async fn visibility_guard(
  State(state): State<Arc<AppState>>,
  mut req: Request,
  next: Next,
) -> Result<Response, AxumError> {
  let uri_path = req.uri().path();
  if !matches!(*req.method(), Method::GET | Method::HEAD) || uri_path.starts_with(API_PREFIX) {
    return Ok(next.run(req).await);
  }

  let (path_locale, path) = split_locale_prefix(uri_path);
  let page = resolve_page_key_from_path(path);
  let locale = state.locale_context(path_locale, req.uri(), req.headers());

  if let Some(page) = page {
    match state.visibility.ensure_page_visible(page).await {
      Ok(_) => tracing::debug!(page, locale = %locale.active, "page visible"),
      Err(err) if err.is_page_hidden() => {
        tracing::debug!(page, "page hidden, rejecting");
        return Err(err.into());
      }
      Err(err) => tracing::warn!(page, error = %err, "visibility check failed, serving page"),
    }
  }

  req.extensions_mut().insert(RequestContext { page, locale });
  Ok(next.run(req).await)
}
