/* src/server/engine/rust/src/path.rs */

//! Request path -> registry page key.
//!
//! Prefix pages are tried first; among them the longest matching prefix wins,
//! and equal prefixes keep declaration order. Exact routes are tried second.

use crate::locale::Locale;
use crate::registry::{PageDefinition, REGISTRY, RouteMatch};

/// Reduce a request target to its pathname: drops query and fragment, then a
/// leading `scheme://authority` when the target is an absolute URL.
pub fn normalize_path(raw: &str) -> &str {
  let mut path = raw.trim();
  if let Some(idx) = path.find(['?', '#']) {
    path = &path[..idx];
  }
  if let Some(after) = strip_scheme(path) {
    path = after.find('/').map_or("", |slash| &after[slash..]);
  }
  if path.is_empty() { "/" } else { path }
}

/// `scheme://rest` -> `rest`, with scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ).
fn strip_scheme(target: &str) -> Option<&str> {
  let (scheme, rest) = target.split_once("://")?;
  let mut chars = scheme.chars();
  let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
    && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
  valid.then_some(rest)
}

pub fn segment_count(path: &str) -> usize {
  path.split('/').filter(|s| !s.is_empty()).count()
}

fn depth_matches(page: &PageDefinition, segments: usize) -> bool {
  page.segment_depth.is_none_or(|d| d == segments)
}

pub fn resolve_page_key_from_path(path: &str) -> Option<&'static str> {
  resolve_in(REGISTRY, path).map(|p| p.key)
}

/// Resolve against an explicit registry slice.
pub fn resolve_in<'r>(registry: &'r [PageDefinition], path: &str) -> Option<&'r PageDefinition> {
  let path = normalize_path(path);
  let segments = segment_count(path);

  let mut best: Option<(&PageDefinition, usize)> = None;
  for page in registry {
    let RouteMatch::Prefix(prefix) = page.route else { continue };
    if !path.starts_with(prefix) || path == prefix || !depth_matches(page, segments) {
      continue;
    }
    // Strictly longer replaces, so ties keep the earlier declaration.
    if best.is_none_or(|(_, len)| prefix.len() > len) {
      best = Some((page, prefix.len()));
    }
  }
  if let Some((page, _)) = best {
    return Some(page);
  }

  registry.iter().find(|page| match page.route {
    RouteMatch::Exact(route) => route == path && depth_matches(page, segments),
    RouteMatch::Prefix(_) => false,
  })
}

/// Split a leading locale segment off a path: `/en/products` -> (`en`, `/products`).
pub fn split_locale_prefix(path: &str) -> (Option<Locale>, &str) {
  let trimmed = path.strip_prefix('/').unwrap_or(path);
  let (first, rest) = match trimmed.find('/') {
    Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
    None => (trimmed, ""),
  };
  // Only exact canonical tags count, so slugs like "en-route" are left alone.
  match crate::locale::SUPPORTED_LOCALES.iter().find(|l| l.as_str().eq_ignore_ascii_case(first)) {
    Some(locale) => (Some(*locale), if rest.is_empty() { "/" } else { rest }),
    None => (None, path),
  }
}
