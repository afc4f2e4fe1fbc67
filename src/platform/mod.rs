//! Platform abstraction layer
//!
//! The simulation never touches the platform. Hosts supply:
//! - Time: elapsed milliseconds per display refresh
//! - Input: jump and pointer/touch selections in logical coordinates
//! - Storage: a `HighScoreStore` (LocalStorage on web, a JSON file natively)

#[cfg(target_arch = "wasm32")]
pub mod web;
