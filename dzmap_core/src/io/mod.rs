//! Outbound HTTP.
//!
//! All upstream requests (tile downloads, probes, source image downloads) share one client with a
//! fixed per-request timeout. There are no retries: a failed request is reported to the caller,
//! which decides whether the failure is fatal.

use anyhow::{Result, bail};
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Build the shared HTTP client.
pub fn build_http_client() -> Result<Client> {
	Ok(Client::builder()
		.timeout(REQUEST_TIMEOUT)
		.pool_max_idle_per_host(100)
		.tcp_keepalive(Duration::from_secs(600))
		.build()?)
}

/// Result of a single GET request.
#[derive(Debug)]
pub enum HttpFetch {
	/// 200 with the complete body.
	Ok(Vec<u8>),
	/// 404.
	NotFound,
	/// Any other status.
	Status(StatusCode),
}

/// GET `url` and read the whole body on success.
///
/// Transport errors and timeouts are returned as `Err`.
pub async fn http_get(client: &Client, url: &str) -> Result<HttpFetch> {
	let response = client.get(url).send().await?;
	Ok(match response.status() {
		StatusCode::OK => HttpFetch::Ok(response.bytes().await?.to_vec()),
		StatusCode::NOT_FOUND => HttpFetch::NotFound,
		status => HttpFetch::Status(status),
	})
}

/// GET `url` and fail unless the response is 200.
pub async fn http_download(client: &Client, url: &str) -> Result<Vec<u8>> {
	match http_get(client, url).await? {
		HttpFetch::Ok(body) => Ok(body),
		HttpFetch::NotFound => bail!("download of '{url}' failed: 404 Not Found"),
		HttpFetch::Status(status) => bail!("download of '{url}' failed: {status}"),
	}
}
