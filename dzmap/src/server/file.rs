//! Conditional responses for files on disk.
//!
//! The ETag of a file is `"<size>-<mtime nanos>"`, both hex encoded. It changes whenever a tile is
//! rewritten, so clients revalidate with `If-None-Match` and get a `304` while nothing changed.

use axum::{
	http::{
		HeaderMap, StatusCode,
		header::{CACHE_CONTROL, CONTENT_TYPE, ETAG, IF_NONE_MATCH},
	},
	response::{IntoResponse, Response},
};
use std::{fs::Metadata, path::Path, time::UNIX_EPOCH};

pub const REVALIDATE: &str = "public, no-cache";

/// Serve the file at `path`, or `None` if there is no readable file.
pub async fn serve_file(path: &Path, content_type: &str, headers: &HeaderMap) -> Option<Response> {
	let meta = tokio::fs::metadata(path).await.ok()?;
	if !meta.is_file() {
		return None;
	}

	let etag = file_etag(&meta);
	if is_not_modified(headers, &etag) {
		return Some(not_modified(&etag));
	}

	let body = match tokio::fs::read(path).await {
		Ok(body) => body,
		Err(err) => {
			log::warn!("failed to read {path:?}: {err}");
			return None;
		}
	};

	Some(
		(
			[
				(CONTENT_TYPE, content_type),
				(ETAG, etag.as_str()),
				(CACHE_CONTROL, REVALIDATE),
			],
			body,
		)
			.into_response(),
	)
}

pub fn file_etag(meta: &Metadata) -> String {
	let nanos = meta
		.modified()
		.ok()
		.and_then(|time| time.duration_since(UNIX_EPOCH).ok())
		.map_or(0, |duration| duration.as_nanos());
	format!("\"{:x}-{:x}\"", meta.len(), nanos)
}

/// Whether the request's `If-None-Match` equals `etag`.
pub fn is_not_modified(headers: &HeaderMap, etag: &str) -> bool {
	headers
		.get(IF_NONE_MATCH)
		.is_some_and(|value| value.as_bytes() == etag.as_bytes())
}

pub fn not_modified(etag: &str) -> Response {
	(StatusCode::NOT_MODIFIED, [(ETAG, etag)]).into_response()
}
