/* src/server/engine/rust/src/lib.rs */

pub mod locale;
pub mod path;
pub mod registry;
pub mod visibility;

// Public API re-exports
pub use locale::{
  Locale, LocaleContext, LocalizedField, SUPPORTED_LOCALES, UnknownLocale, resolve_localized_text,
};
pub use path::{normalize_path, resolve_in, resolve_page_key_from_path, split_locale_prefix};
pub use registry::{
  PageDefinition, REGISTRY, RegistryError, RouteMatch, SectionDefinition, StaticLabel, find_page,
  validate_registry,
};
pub use visibility::{
  DefaultReason, Normalized, VisibilityConfig, VisibilityPageState, create_default,
  hidden_sections, merge_with_default, normalize, parse_visibility,
};
