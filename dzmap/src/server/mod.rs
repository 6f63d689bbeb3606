//! server implementation

mod context;
mod file;
mod handlers;
mod logger;
mod routes;
mod tile_server;

pub use context::*;
pub use routes::build_router;
pub use tile_server::*;
