/* src/server/adapter/axum/src/handler/mod.rs */

mod admin;
mod guard;
mod page;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderMap, Uri, header};
use axum::routing::get;
use marquee_server::marquee_engine::{Locale, LocaleContext};
use marquee_server::{MarqueeParts, ResolveData, ResolveStrategy, VisibilityService};

pub use guard::RequestContext;

/// Reserved prefix for Marquee's own endpoints; the guard never applies below it.
pub(crate) const API_PREFIX: &str = "/_marquee";

pub(crate) struct AppState {
  pub visibility: VisibilityService,
  pub default_locale: Locale,
  pub locales: Vec<Locale>,
  pub strategies: Vec<Box<dyn ResolveStrategy>>,
  pub admin_token: Option<String>,
}

impl AppState {
  /// Resolve the request locale with the configured strategy chain.
  pub(crate) fn locale_context(
    &self,
    path_locale: Option<Locale>,
    uri: &Uri,
    headers: &HeaderMap,
  ) -> LocaleContext {
    let url = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("");
    let data = ResolveData {
      url,
      path_locale,
      cookie_header: headers.get(header::COOKIE).and_then(|v| v.to_str().ok()),
      accept_language: headers.get(header::ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok()),
      default_locale: self.default_locale,
      locales: &self.locales,
    };
    let active = marquee_server::resolve_chain(&self.strategies, &data);
    LocaleContext::new(active, self.default_locale)
  }
}

pub(crate) fn build_router(parts: MarqueeParts, site: Router) -> Router {
  let state = Arc::new(AppState {
    visibility: parts.visibility,
    default_locale: parts.default_locale,
    locales: parts.locales,
    strategies: parts.strategies,
    admin_token: parts.admin_token,
  });

  let api = Router::new()
    .route(
      &format!("{API_PREFIX}/visibility"),
      get(admin::handle_get_visibility).put(admin::handle_put_visibility),
    )
    .route(&format!("{API_PREFIX}/registry"), get(admin::handle_registry))
    .route(&format!("{API_PREFIX}/page"), get(page::handle_root_context))
    .route(&format!("{API_PREFIX}/page/{{*path}}"), get(page::handle_page_context))
    .with_state(state.clone());

  site.merge(api).layer(axum::middleware::from_fn_with_state(state, guard::visibility_guard))
}
