/* src/server/engine/rust/src/locale.rs */

//! Supported locales and localized-field fallback resolution.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Locale {
  #[default]
  ZhCn,
  ZhTw,
  En,
}

pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::ZhCn, Locale::ZhTw, Locale::En];

impl Locale {
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::ZhCn => "zh-CN",
      Self::ZhTw => "zh-TW",
      Self::En => "en",
    }
  }

  /// Parse a locale tag, tolerant of case, `_` separators, region and script subtags.
  pub fn parse(value: &str) -> Option<Self> {
    let normalized = value.trim().replace('_', "-").to_ascii_lowercase();
    if normalized.is_empty() {
      return None;
    }
    let mut parts = normalized.split('-');
    let lang = parts.next().unwrap_or("");
    match lang {
      "en" => Some(Self::En),
      "zh" => {
        let traditional = parts.any(|p| matches!(p, "tw" | "hk" | "mo" | "hant"));
        Some(if traditional { Self::ZhTw } else { Self::ZhCn })
      }
      _ => None,
    }
  }
}

impl fmt::Display for Locale {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLocale(pub String);

impl fmt::Display for UnknownLocale {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "unsupported locale \"{}\"", self.0)
  }
}

impl std::error::Error for UnknownLocale {}

impl FromStr for Locale {
  type Err = UnknownLocale;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s).ok_or_else(|| UnknownLocale(s.to_string()))
  }
}

impl Serialize for Locale {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for Locale {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
  }
}

/// Locale pair threaded through every text resolution call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocaleContext {
  pub active: Locale,
  pub default: Locale,
}

impl LocaleContext {
  pub fn new(active: Locale, default: Locale) -> Self {
    Self { active, default }
  }
}

/// Translatable content: locale code -> text, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedField(pub IndexMap<String, String>);

impl LocalizedField {
  pub fn get(&self, locale: Locale) -> Option<&str> {
    self.0.get(locale.as_str()).map(String::as_str).filter(|s| !s.is_empty())
  }

  /// Active locale, then default locale, then the first non-empty entry.
  pub fn resolve(&self, ctx: &LocaleContext) -> Option<&str> {
    self
      .get(ctx.active)
      .or_else(|| self.get(ctx.default))
      .or_else(|| self.0.values().map(String::as_str).find(|s| !s.is_empty()))
  }

  pub fn resolve_or<'a>(&'a self, ctx: &LocaleContext, fallback: &'a str) -> &'a str {
    self.resolve(ctx).unwrap_or(fallback)
  }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocalizedField {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}

fn non_empty_str<'a>(obj: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a str> {
  obj.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Resolve untyped content (plain string or locale map) to display text.
///
/// Plain strings are returned unchanged. For maps the chain is active locale,
/// default locale, first non-empty value in key order, then `fallback`.
pub fn resolve_localized_text(value: &Value, ctx: &LocaleContext, fallback: &str) -> String {
  match value {
    Value::String(s) => s.clone(),
    Value::Object(obj) => non_empty_str(obj, ctx.active.as_str())
      .or_else(|| non_empty_str(obj, ctx.default.as_str()))
      .or_else(|| obj.values().filter_map(Value::as_str).find(|s| !s.is_empty()))
      .unwrap_or(fallback)
      .to_string(),
    _ => fallback.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn ctx(active: Locale) -> LocaleContext {
    LocaleContext::new(active, Locale::ZhCn)
  }

  #[test]
  fn parse_canonical_tags() {
    assert_eq!(Locale::parse("zh-CN"), Some(Locale::ZhCn));
    assert_eq!(Locale::parse("zh-TW"), Some(Locale::ZhTw));
    assert_eq!(Locale::parse("en"), Some(Locale::En));
  }

  #[test]
  fn parse_tolerant_variants() {
    assert_eq!(Locale::parse("ZH_tw"), Some(Locale::ZhTw));
    assert_eq!(Locale::parse("zh-Hant-HK"), Some(Locale::ZhTw));
    assert_eq!(Locale::parse("zh-hans"), Some(Locale::ZhCn));
    assert_eq!(Locale::parse("zh"), Some(Locale::ZhCn));
    assert_eq!(Locale::parse("en-GB"), Some(Locale::En));
    assert_eq!(Locale::parse(" "), None);
    assert_eq!(Locale::parse("fr"), None);
  }

  #[test]
  fn serde_uses_tag() {
    assert_eq!(serde_json::to_value(Locale::ZhTw).unwrap(), json!("zh-TW"));
    let parsed: Locale = serde_json::from_value(json!("en-US")).unwrap();
    assert_eq!(parsed, Locale::En);
    assert!(serde_json::from_value::<Locale>(json!("de")).is_err());
  }

  #[test]
  fn active_locale_wins() {
    let v = json!({"zh-CN": "帐篷", "en": "Tent"});
    assert_eq!(resolve_localized_text(&v, &ctx(Locale::En), ""), "Tent");
  }

  #[test]
  fn falls_back_to_default_locale() {
    let v = json!({"zh-CN": "你好"});
    assert_eq!(resolve_localized_text(&v, &ctx(Locale::En), ""), "你好");
  }

  #[test]
  fn falls_back_to_first_non_empty() {
    let v = json!({"en": "", "zh-TW": "帳篷"});
    assert_eq!(resolve_localized_text(&v, &ctx(Locale::En), ""), "帳篷");
  }

  #[test]
  fn empty_string_treated_as_missing() {
    let v = json!({"en": ""});
    assert_eq!(resolve_localized_text(&v, &ctx(Locale::En), "fallback"), "fallback");
  }

  #[test]
  fn plain_string_unchanged() {
    let v = json!("plain string");
    assert_eq!(resolve_localized_text(&v, &ctx(Locale::En), "x"), "plain string");
    assert_eq!(resolve_localized_text(&v, &ctx(Locale::ZhTw), "x"), "plain string");
  }

  #[test]
  fn non_text_values_use_fallback() {
    assert_eq!(resolve_localized_text(&json!(null), &ctx(Locale::En), "fb"), "fb");
    assert_eq!(resolve_localized_text(&json!({"en": 3}), &ctx(Locale::En), "fb"), "fb");
  }

  #[test]
  fn typed_field_follows_same_chain() {
    let field: LocalizedField = [("zh-TW", "帳篷"), ("en", "")].into_iter().collect();
    assert_eq!(field.resolve(&ctx(Locale::En)), Some("帳篷"));
    assert_eq!(field.resolve(&ctx(Locale::ZhTw)), Some("帳篷"));
    assert_eq!(LocalizedField::default().resolve_or(&ctx(Locale::En), "none"), "none");
  }

  #[test]
  fn typed_field_round_trips_as_plain_map() {
    let field: LocalizedField = serde_json::from_value(json!({"en": "Tent"})).unwrap();
    assert_eq!(serde_json::to_value(&field).unwrap(), json!({"en": "Tent"}));
  }
}
