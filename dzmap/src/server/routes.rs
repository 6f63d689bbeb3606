//! Router composition.

use super::{
	ServerContext,
	handlers::{serve_favicon, serve_index, serve_map, serve_maps_list},
	logger::log_request,
};
use axum::{Router, middleware, routing::get};
use std::sync::Arc;

pub fn build_router(context: Arc<ServerContext>) -> Router {
	Router::new()
		.route("/", get(serve_index))
		.route("/favicon.ico", get(serve_favicon))
		.route("/api/maps", get(serve_maps_list))
		.route("/maps/{*path}", get(serve_map))
		.fallback(get(serve_index))
		.with_state(context)
		.layer(middleware::from_fn(log_request))
}
