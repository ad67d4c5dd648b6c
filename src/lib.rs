//! translate-map: custom translation overrides and per-language CSS for a
//! multilingual site.

pub mod config;
pub mod css;
pub mod db;
pub mod error;
pub mod frontend;
pub mod language;
pub mod overrides;
pub mod sanitize;
pub mod security;
pub mod server;
pub mod settings;
pub mod styles;
pub mod transfer;
