/* src/cli/core/src/config/mod.rs */

mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use loader::{find_marquee_config, load_marquee_config, resolve_relative};
pub use types::MarqueeConfig;
