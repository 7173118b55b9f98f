/* src/server/core/rust/src/resolve.rs */

//! Request locale resolution as an ordered strategy chain.

use marquee_engine::Locale;

/// Request facts a strategy may inspect.
pub struct ResolveData<'a> {
  /// Path and query of the request URI.
  pub url: &'a str,
  pub path_locale: Option<Locale>,
  pub cookie_header: Option<&'a str>,
  pub accept_language: Option<&'a str>,
  pub default_locale: Locale,
  /// Locales the site serves; a strategy answer outside this set is skipped.
  pub locales: &'a [Locale],
}

pub trait ResolveStrategy: Send + Sync {
  fn kind(&self) -> &'static str;
  fn resolve(&self, data: &ResolveData<'_>) -> Option<Locale>;
}

/// First strategy that yields an enabled locale wins; otherwise the default locale.
pub fn resolve_chain(strategies: &[Box<dyn ResolveStrategy>], data: &ResolveData<'_>) -> Locale {
  strategies
    .iter()
    .find_map(|s| s.resolve(data).filter(|l| data.locales.contains(l)))
    .unwrap_or(data.default_locale)
}

/// url prefix -> cookie("marquee-locale") -> Accept-Language
pub fn default_strategies() -> Vec<Box<dyn ResolveStrategy>> {
  vec![from_url_prefix(), from_cookie("marquee-locale"), from_accept_language()]
}

struct UrlPrefix;

impl ResolveStrategy for UrlPrefix {
  fn kind(&self) -> &'static str {
    "url_prefix"
  }

  fn resolve(&self, data: &ResolveData<'_>) -> Option<Locale> {
    data.path_locale
  }
}

pub fn from_url_prefix() -> Box<dyn ResolveStrategy> {
  Box::new(UrlPrefix)
}

struct UrlQuery {
  param: String,
}

impl ResolveStrategy for UrlQuery {
  fn kind(&self) -> &'static str {
    "url_query"
  }

  fn resolve(&self, data: &ResolveData<'_>) -> Option<Locale> {
    let (_, query) = data.url.split_once('?')?;
    let query = query.split('#').next().unwrap_or("");
    query.split('&').find_map(|pair| {
      let (k, v) = pair.split_once('=')?;
      if k == self.param { Locale::parse(v) } else { None }
    })
  }
}

pub fn from_url_query(param: &str) -> Box<dyn ResolveStrategy> {
  Box::new(UrlQuery { param: param.to_string() })
}

struct Cookie {
  name: String,
}

impl ResolveStrategy for Cookie {
  fn kind(&self) -> &'static str {
    "cookie"
  }

  fn resolve(&self, data: &ResolveData<'_>) -> Option<Locale> {
    parse_cookie_locale(data.cookie_header?, &self.name)
  }
}

pub fn from_cookie(name: &str) -> Box<dyn ResolveStrategy> {
  Box::new(Cookie { name: name.to_string() })
}

struct AcceptLanguage;

impl ResolveStrategy for AcceptLanguage {
  fn kind(&self) -> &'static str {
    "accept_language"
  }

  fn resolve(&self, data: &ResolveData<'_>) -> Option<Locale> {
    parse_accept_language(data.accept_language?, data.locales)
  }
}

pub fn from_accept_language() -> Box<dyn ResolveStrategy> {
  Box::new(AcceptLanguage)
}

fn parse_cookie_locale(header: &str, name: &str) -> Option<Locale> {
  header.split(';').find_map(|pair| {
    let (k, v) = pair.trim().split_once('=')?;
    if k.trim() == name { Locale::parse(v) } else { None }
  })
}

/// Highest-weighted entry that maps to one of `enabled`.
fn parse_accept_language(header: &str, enabled: &[Locale]) -> Option<Locale> {
  let mut entries: Vec<(&str, f64)> = Vec::new();
  for part in header.split(',') {
    let part = part.trim();
    if part.is_empty() {
      continue;
    }
    let mut segments = part.split(';');
    let lang = segments.next().unwrap_or("").trim();
    let mut q = 1.0_f64;
    for s in segments {
      if let Some(val) = s.trim().strip_prefix("q=")
        && let Ok(v) = val.parse::<f64>()
      {
        q = v;
      }
    }
    if q > 0.0 {
      entries.push((lang, q));
    }
  }

  // Stable sort keeps header order among equal weights.
  entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
  entries.into_iter().find_map(|(lang, _)| Locale::parse(lang).filter(|l| enabled.contains(l)))
}
