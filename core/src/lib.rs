//! # utilkit core
//!
//! Rectangle geometry and CPU texture color-space conversion.

pub mod math;
pub mod texture;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn init() {
    log::info!("utilkit core v{} initialized", VERSION);
}
