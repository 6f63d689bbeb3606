use axum::{extract::ConnectInfo, extract::Request, middleware::Next, response::Response};
use std::{net::SocketAddr, time::Instant};

/// Log method, path, status, client address and duration of every request.
pub async fn log_request(request: Request, next: Next) -> Response {
	let start = Instant::now();
	let method = request.method().clone();
	let path = request.uri().path().to_owned();
	let client = request
		.extensions()
		.get::<ConnectInfo<SocketAddr>>()
		.map(|ConnectInfo(addr)| addr.to_string())
		.unwrap_or_default();

	let response = next.run(request).await;

	log::info!(
		"{method} {path} {} {client} {:?}",
		response.status().as_u16(),
		start.elapsed()
	);
	response
}
