//! Shared building blocks of dzmap: tile coordinates, map layers, URL templates, the on-disk
//! pyramid layout, configuration types and the outbound HTTP client.

pub mod config;
pub mod geo;
pub mod io;
pub mod types;

pub use config::*;
pub use types::*;
