//! HTTP handlers.
//!
//! - `serve_map` answers `/maps/{name}/...`: location files and tiles with layer fallback.
//! - `serve_index` and `serve_favicon` serve the embedded web app.
//! - `serve_maps_list` returns the validated map list.

use super::{
	FAVICON, INDEX_HTML, ServerContext,
	file::{REVALIDATE, is_not_modified, not_modified, serve_file},
};
use axum::{
	extract::{Path, State},
	http::{
		HeaderMap, StatusCode, Uri,
		header::{CACHE_CONTROL, CONTENT_TYPE, ETAG},
	},
	response::{IntoResponse, Response},
};
use dzmap_core::{LOCATIONS_FILENAME, MapLayer, TILE_EXTENSION, TileCoord};
use std::sync::Arc;

const CONTENT_TYPE_GEOJSON: &str = "application/geo+json";
const CONTENT_TYPE_WEBP: &str = "image/webp";
const PLACEHOLDER_CACHE: &str = "public, max-age=3600";
const FAVICON_CACHE: &str = "public, max-age=86400";

/// `/maps/{name}/locations.geojson` and `/maps/{name}/{layer}/{z}/{x}/{y}.webp`.
pub async fn serve_map(
	Path(path): Path<String>,
	headers: HeaderMap,
	State(context): State<Arc<ServerContext>>,
) -> Response {
	log::debug!("handle map request: {path}");

	let Some((requested, rest)) = path.split_once('/') else {
		return error_404();
	};
	let Some(name) = context.resolve(requested) else {
		log::debug!("unknown map '{requested}'");
		return error_404();
	};

	if rest == LOCATIONS_FILENAME {
		let file = context.layout().locations_path(name);
		return serve_file(&file, CONTENT_TYPE_GEOJSON, &headers)
			.await
			.unwrap_or_else(error_404);
	}

	let Some((layer, coord)) = parse_tile_path(rest) else {
		return error_404();
	};

	for layer in [layer, layer.other()] {
		let file = context.layout().tile_path(name, layer, &coord);
		if let Some(response) = serve_file(&file, CONTENT_TYPE_WEBP, &headers).await {
			return response;
		}
	}

	log::trace!("no tile for {name}/{coord}, sending placeholder");
	(
		[(CONTENT_TYPE, CONTENT_TYPE_WEBP), (CACHE_CONTROL, PLACEHOLDER_CACHE)],
		context.placeholder().to_vec(),
	)
		.into_response()
}

/// Parse `{layer}/{z}/{x}/{y}.webp`. Unknown layers and coordinates outside the grid are rejected.
fn parse_tile_path(rest: &str) -> Option<(MapLayer, TileCoord)> {
	let parts: Vec<&str> = rest.split('/').collect();
	let [layer, z, x, file] = parts.as_slice() else {
		return None;
	};

	let layer = MapLayer::try_from(*layer).ok()?;
	let y = file.strip_suffix(TILE_EXTENSION)?.strip_suffix('.')?;
	let coord = TileCoord::new(parse_index(z)?, parse_index(x)?, parse_index(y)?).ok()?;
	Some((layer, coord))
}

/// A canonical decimal number: ASCII digits only, no sign and no leading zeros.
fn parse_index<T: std::str::FromStr>(text: &str) -> Option<T> {
	let canonical = !text.is_empty()
		&& text.bytes().all(|b| b.is_ascii_digit())
		&& (text == "0" || !text.starts_with('0'));
	if canonical { text.parse().ok() } else { None }
}

/// The web app. Every path without a file extension gets it, so client-side routes work on reload.
pub async fn serve_index(uri: Uri, headers: HeaderMap) -> Response {
	if uri.path() != "/" && uri.path().contains('.') {
		return error_404();
	}

	let etag = format!("\"{:x}\"", INDEX_HTML.len());
	if is_not_modified(&headers, &etag) {
		return not_modified(&etag);
	}

	(
		[
			(CONTENT_TYPE, "text/html; charset=utf-8"),
			(ETAG, etag.as_str()),
			(CACHE_CONTROL, REVALIDATE),
		],
		INDEX_HTML,
	)
		.into_response()
}

pub async fn serve_favicon() -> Response {
	(
		[(CONTENT_TYPE, "image/x-icon"), (CACHE_CONTROL, FAVICON_CACHE)],
		FAVICON,
	)
		.into_response()
}

pub async fn serve_maps_list(State(context): State<Arc<ServerContext>>) -> Response {
	(
		[(CONTENT_TYPE, "application/json")],
		context.maps_json().to_owned(),
	)
		.into_response()
}

pub fn error_404() -> Response {
	(
		StatusCode::NOT_FOUND,
		[(CONTENT_TYPE, "text/plain; charset=utf-8")],
		"Not Found",
	)
		.into_response()
}
