pub mod catalog;
pub mod config;
pub mod cursor;
pub mod diagnostics;
pub mod filters;
pub mod gates;
pub mod hero;
pub mod lazy_media;
pub mod media;
pub mod nav;
pub mod notify;
pub mod parallax;
pub mod schedule;
pub mod strip;
pub mod theme;
pub mod viewer;

#[cfg(target_arch = "wasm32")]
pub mod frontend;
