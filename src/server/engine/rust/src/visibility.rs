/* src/server/engine/rust/src/visibility.rs */

//! Visibility configuration model plus the defaulting and merge engine.
//!
//! Persisted data is never trusted raw: every read goes through
//! [`parse_visibility`], which yields a config covering exactly the registry's
//! pages and declared sections. Anything absent is visible.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::registry::{PageDefinition, REGISTRY};

pub const SCHEMA_ID: &str = "marquee.visibility/v1";
pub const META_SCHEMA: &str = "schema";
pub const META_ADMIN_PATH: &str = "adminPath";
pub const META_UPDATED_AT: &str = "updatedAt";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityPageState {
  #[serde(default)]
  pub hidden: bool,
  /// Section key -> hidden.
  #[serde(default)]
  pub sections: BTreeMap<String, bool>,
  /// Field path -> hidden.
  #[serde(default)]
  pub fields: BTreeMap<String, bool>,
}

impl VisibilityPageState {
  fn default_for(page: &PageDefinition) -> Self {
    Self {
      hidden: false,
      sections: page.section_keys().map(|k| (k.to_string(), false)).collect(),
      fields: BTreeMap::new(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisibilityConfig {
  #[serde(default)]
  pub pages: BTreeMap<String, VisibilityPageState>,
  #[serde(rename = "_meta", default)]
  pub meta: Map<String, Value>,
}

impl VisibilityConfig {
  pub fn page(&self, key: &str) -> Option<&VisibilityPageState> {
    self.pages.get(key)
  }

  pub fn is_page_hidden(&self, key: &str) -> bool {
    self.page(key).is_some_and(|p| p.hidden)
  }

  pub fn is_section_hidden(&self, page: &str, section: &str) -> bool {
    self.page(page).and_then(|p| p.sections.get(section)).copied().unwrap_or(false)
  }

  pub fn is_field_hidden(&self, page: &str, field: &str) -> bool {
    self.page(page).and_then(|p| p.fields.get(field)).copied().unwrap_or(false)
  }

  /// Field paths marked hidden for a page.
  pub fn hidden_fields(&self, page: &str) -> Vec<String> {
    self
      .page(page)
      .map(|p| p.fields.iter().filter(|(_, h)| **h).map(|(k, _)| k.clone()).collect())
      .unwrap_or_default()
  }
}

/// One repair applied while normalizing untrusted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultReason {
  NotAnObject,
  MissingPages,
  InvalidPages,
  MissingPage(String),
  InvalidPage(String),
  UnknownPage(String),
  NonBooleanHidden(String),
  InvalidSections(String),
  MissingSection { page: String, section: String },
  NonBooleanSection { page: String, section: String },
  UnknownSection { page: String, section: String },
  InvalidFields(String),
  NonBooleanField { page: String, field: String },
  InvalidMeta,
  /// Stored bytes could not be decoded at all.
  Unreadable,
}

impl fmt::Display for DefaultReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NotAnObject => write!(f, "config is not an object, using defaults"),
      Self::MissingPages => write!(f, "config has no \"pages\", using defaults"),
      Self::InvalidPages => write!(f, "\"pages\" is not an object, using defaults"),
      Self::MissingPage(p) => write!(f, "page \"{p}\" missing, shown by default"),
      Self::InvalidPage(p) => write!(f, "page \"{p}\" is not an object, shown by default"),
      Self::UnknownPage(p) => write!(f, "page \"{p}\" is not in the registry, dropped"),
      Self::NonBooleanHidden(p) => write!(f, "page \"{p}\" has non-boolean \"hidden\", shown"),
      Self::InvalidSections(p) => write!(f, "page \"{p}\" sections is not an object, all shown"),
      Self::MissingSection { page, section } => {
        write!(f, "section \"{page}.{section}\" missing, shown by default")
      }
      Self::NonBooleanSection { page, section } => {
        write!(f, "section \"{page}.{section}\" is not a boolean, shown")
      }
      Self::UnknownSection { page, section } => {
        write!(f, "section \"{page}.{section}\" is not in the registry, dropped")
      }
      Self::InvalidFields(p) => write!(f, "page \"{p}\" fields is not an object, cleared"),
      Self::NonBooleanField { page, field } => {
        write!(f, "field \"{page}:{field}\" is not a boolean, shown")
      }
      Self::InvalidMeta => write!(f, "\"_meta\" is not an object, cleared"),
      Self::Unreadable => write!(f, "stored config is unreadable, using defaults"),
    }
  }
}

/// Outcome of the validating boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
  /// Input already had the canonical shape.
  Valid(VisibilityConfig),
  /// Input was repaired; reasons list every repair in registry order.
  Defaulted(VisibilityConfig, Vec<DefaultReason>),
}

impl Normalized {
  pub fn config(&self) -> &VisibilityConfig {
    match self {
      Self::Valid(c) | Self::Defaulted(c, _) => c,
    }
  }

  pub fn into_config(self) -> VisibilityConfig {
    match self {
      Self::Valid(c) | Self::Defaulted(c, _) => c,
    }
  }

  pub fn reasons(&self) -> &[DefaultReason] {
    match self {
      Self::Valid(_) => &[],
      Self::Defaulted(_, r) => r,
    }
  }

  pub fn is_valid(&self) -> bool {
    matches!(self, Self::Valid(_))
  }

  fn from_parts(config: VisibilityConfig, reasons: Vec<DefaultReason>) -> Self {
    if reasons.is_empty() { Self::Valid(config) } else { Self::Defaulted(config, reasons) }
  }
}

pub fn create_default() -> VisibilityConfig {
  create_default_in(REGISTRY)
}

/// All-visible config for an arbitrary registry slice.
pub fn create_default_in(registry: &[PageDefinition]) -> VisibilityConfig {
  VisibilityConfig {
    pages: registry
      .iter()
      .map(|p| (p.key.to_string(), VisibilityPageState::default_for(p)))
      .collect(),
    meta: Map::new(),
  }
}

pub fn normalize(raw: &Value) -> VisibilityConfig {
  parse_visibility(raw).into_config()
}

pub fn parse_visibility(raw: &Value) -> Normalized {
  parse_visibility_in(REGISTRY, raw)
}

pub fn parse_visibility_in(registry: &[PageDefinition], raw: &Value) -> Normalized {
  let Some(obj) = raw.as_object() else {
    return Normalized::Defaulted(create_default_in(registry), vec![DefaultReason::NotAnObject]);
  };

  let mut reasons = Vec::new();

  let meta = match obj.get("_meta") {
    None => Map::new(),
    Some(Value::Object(m)) => m.clone(),
    Some(_) => {
      reasons.push(DefaultReason::InvalidMeta);
      Map::new()
    }
  };

  let raw_pages = match obj.get("pages") {
    Some(Value::Object(p)) => Some(p),
    Some(_) => {
      reasons.push(DefaultReason::InvalidPages);
      None
    }
    None => {
      reasons.push(DefaultReason::MissingPages);
      None
    }
  };

  let Some(raw_pages) = raw_pages else {
    let mut config = create_default_in(registry);
    config.meta = meta;
    return Normalized::Defaulted(config, reasons);
  };

  let mut pages = BTreeMap::new();
  for def in registry {
    let state = match raw_pages.get(def.key) {
      None => {
        reasons.push(DefaultReason::MissingPage(def.key.to_string()));
        VisibilityPageState::default_for(def)
      }
      Some(Value::Object(entry)) => parse_page(def, entry, &mut reasons),
      Some(_) => {
        reasons.push(DefaultReason::InvalidPage(def.key.to_string()));
        VisibilityPageState::default_for(def)
      }
    };
    pages.insert(def.key.to_string(), state);
  }

  for key in raw_pages.keys() {
    if !registry.iter().any(|p| p.key == key) {
      reasons.push(DefaultReason::UnknownPage(key.clone()));
    }
  }

  Normalized::from_parts(VisibilityConfig { pages, meta }, reasons)
}

fn parse_page(
  def: &PageDefinition,
  entry: &Map<String, Value>,
  reasons: &mut Vec<DefaultReason>,
) -> VisibilityPageState {
  let page = def.key.to_string();

  let hidden = match entry.get("hidden") {
    None => false,
    Some(Value::Bool(b)) => *b,
    Some(_) => {
      reasons.push(DefaultReason::NonBooleanHidden(page.clone()));
      false
    }
  };

  let raw_sections = match entry.get("sections") {
    None => None,
    Some(Value::Object(s)) => Some(s),
    Some(_) => {
      reasons.push(DefaultReason::InvalidSections(page.clone()));
      None
    }
  };

  let mut sections = BTreeMap::new();
  for key in def.section_keys() {
    let value = match raw_sections.map(|s| s.get(key)) {
      Some(Some(Value::Bool(b))) => *b,
      Some(Some(_)) => {
        reasons.push(DefaultReason::NonBooleanSection {
          page: page.clone(),
          section: key.to_string(),
        });
        false
      }
      Some(None) => {
        reasons
          .push(DefaultReason::MissingSection { page: page.clone(), section: key.to_string() });
        false
      }
      // Whole sections object absent: nothing was declared, all visible.
      None => false,
    };
    sections.insert(key.to_string(), value);
  }
  if let Some(raw_sections) = raw_sections {
    for key in raw_sections.keys().filter(|k| !def.has_section(k)) {
      reasons.push(DefaultReason::UnknownSection { page: page.clone(), section: key.clone() });
    }
  }

  let mut fields = BTreeMap::new();
  match entry.get("fields") {
    None => {}
    Some(Value::Object(raw_fields)) => {
      for (field, value) in raw_fields {
        let hidden = match value {
          Value::Bool(b) => *b,
          _ => {
            reasons
              .push(DefaultReason::NonBooleanField { page: page.clone(), field: field.clone() });
            false
          }
        };
        fields.insert(field.clone(), hidden);
      }
    }
    Some(_) => reasons.push(DefaultReason::InvalidFields(page)),
  }

  VisibilityPageState { hidden, sections, fields }
}

/// Re-apply registry coverage to a typed config saved under an older registry.
pub fn merge_with_default(config: &VisibilityConfig) -> VisibilityConfig {
  merge_with_default_in(REGISTRY, config)
}

pub fn merge_with_default_in(
  registry: &[PageDefinition],
  config: &VisibilityConfig,
) -> VisibilityConfig {
  let pages = registry
    .iter()
    .map(|def| {
      let state = match config.pages.get(def.key) {
        Some(existing) => VisibilityPageState {
          hidden: existing.hidden,
          sections: def
            .section_keys()
            .map(|k| (k.to_string(), existing.sections.get(k).copied().unwrap_or(false)))
            .collect(),
          fields: existing.fields.clone(),
        },
        None => VisibilityPageState::default_for(def),
      };
      (def.key.to_string(), state)
    })
    .collect();
  VisibilityConfig { pages, meta: config.meta.clone() }
}

/// Every declared section of `page_key` mapped to its hidden flag.
/// Unknown page keys yield an empty map.
pub fn hidden_sections(config: &VisibilityConfig, page_key: &str) -> BTreeMap<String, bool> {
  hidden_sections_in(REGISTRY, config, page_key)
}

pub fn hidden_sections_in(
  registry: &[PageDefinition],
  config: &VisibilityConfig,
  page_key: &str,
) -> BTreeMap<String, bool> {
  let Some(def) = registry.iter().find(|p| p.key == page_key) else {
    return BTreeMap::new();
  };
  def
    .section_keys()
    .map(|k| (k.to_string(), config.is_section_hidden(page_key, k)))
    .collect()
}
