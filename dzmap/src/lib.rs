//! The dzmap tile server.
//!
//! Serves pyramids built by `dzmap load` from disk, resolves map aliases and falls back to the
//! other layer or a transparent placeholder when a tile is missing.

pub mod server;
