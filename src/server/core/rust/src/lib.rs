/* src/server/core/rust/src/lib.rs */

pub mod errors;
pub mod resolve;
pub mod server;
pub mod service;
pub mod store;

// Re-exports for ergonomic use
pub use errors::MarqueeError;
pub use marquee_engine;
pub use resolve::{
  ResolveData, ResolveStrategy, default_strategies, from_accept_language, from_cookie,
  from_url_prefix, from_url_query, resolve_chain,
};
pub use server::{MarqueeParts, MarqueeServer};
pub use service::{PageContext, VisibilityService};
pub use store::{BoxFuture, ConfigStore, FileStore, MemoryStore, StoreError, VISIBILITY_CONFIG_KEY};
