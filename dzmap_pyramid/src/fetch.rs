//! Single-tile operations against an upstream pyramid: fetch-and-store and probe.

use crate::FetchJob;
use anyhow::{Context, Result, anyhow, bail};
use dzmap_core::io::{HttpFetch, http_get};
use dzmap_image::{FETCH_QUALITY, decode, encode_webp, is_real_tile};
use image::DynamicImage;
use reqwest::Client;
use std::path::Path;
use tokio::task::spawn_blocking;

/// Fetch the tile of `job`, re-encode it as WebP and store it.
///
/// Returns `Ok(true)` when a usable tile exists at the destination afterwards, `Ok(false)` when
/// upstream has no usable tile (404, undecodable body, 1px sentinel). Other statuses, transport
/// errors and write failures are returned as `Err`.
pub async fn fetch_tile(client: &Client, job: &FetchJob, force: bool) -> Result<bool> {
	let path = job.tile_path();
	if !force && has_tile(&path).await {
		return Ok(true);
	}

	let url = job.url();
	let Some(image) = get_real_tile(client, &url).await? else {
		return Ok(false);
	};

	let blob = spawn_blocking(move || encode_webp(&image, FETCH_QUALITY))
		.await
		.map_err(|e| anyhow!("encoding task failed: {e}"))??;

	if let Some(parent) = path.parent() {
		tokio::fs::create_dir_all(parent)
			.await
			.with_context(|| format!("creating directory {parent:?}"))?;
	}
	tokio::fs::write(&path, blob)
		.await
		.with_context(|| format!("writing tile {path:?}"))?;

	Ok(true)
}

/// Check whether `url` serves a real tile without storing anything.
///
/// Any failure counts as "no tile".
pub async fn probe_tile(client: &Client, url: &str) -> bool {
	match get_real_tile(client, url).await {
		Ok(image) => image.is_some(),
		Err(err) => {
			log::trace!("probe of {url} failed: {err:#}");
			false
		}
	}
}

/// GET `url` and decode the body. `None` for 404, undecodable bodies and sentinel images.
async fn get_real_tile(client: &Client, url: &str) -> Result<Option<DynamicImage>> {
	let body = match http_get(client, url).await? {
		HttpFetch::Ok(body) => body,
		HttpFetch::NotFound => return Ok(None),
		HttpFetch::Status(status) => bail!("unexpected status {status} for {url}"),
	};

	let image = spawn_blocking(move || decode(&body).ok())
		.await
		.map_err(|e| anyhow!("decoding task failed: {e}"))?;

	Ok(image.filter(is_real_tile))
}

pub(crate) async fn has_tile(path: &Path) -> bool {
	tokio::fs::metadata(path)
		.await
		.is_ok_and(|meta| meta.is_file() && meta.len() > 0)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{Upstream, UpstreamTile};
	use assert_fs::TempDir;
	use dzmap_core::{TileCoord, UrlTemplate};
	use dzmap_image::{decode, helper::create_image_rgb};
	use std::sync::Arc;

	fn job(upstream: &Upstream, dir: &TempDir, level: u8, x: u32, y: u32) -> FetchJob {
		FetchJob::new(
			TileCoord::new(level, x, y).unwrap(),
			Arc::new(upstream.template()),
			Arc::from(dir.path()),
		)
	}

	#[tokio::test]
	async fn stores_real_tile_as_webp() {
		let upstream = Upstream::start([("0/0/0", UpstreamTile::png(&create_image_rgb(256, 256)))]).await;
		let dir = TempDir::new().unwrap();
		let job = job(&upstream, &dir, 0, 0, 0);

		assert!(fetch_tile(&upstream.client(), &job, false).await.unwrap());

		let blob = std::fs::read(job.tile_path()).unwrap();
		assert_eq!(&blob[8..12], b"WEBP");
		assert_eq!(decode(&blob).unwrap().width(), 256);
	}

	#[tokio::test]
	async fn absence_is_not_an_error() {
		let upstream = Upstream::start([
			("1/0/0", UpstreamTile::png(&create_image_rgb(1, 1))),
			("1/1/0", UpstreamTile::Raw(b"<html>not a tile</html>".to_vec())),
		])
		.await;
		let dir = TempDir::new().unwrap();
		let client = upstream.client();

		for (x, y) in [(0, 0), (1, 0), (0, 1)] {
			let job = job(&upstream, &dir, 1, x, y);
			assert!(!fetch_tile(&client, &job, false).await.unwrap());
			assert!(!job.tile_path().exists());
		}
	}

	#[tokio::test]
	async fn server_error_is_reported() {
		let upstream = Upstream::start([("0/0/0", UpstreamTile::Status(500))]).await;
		let dir = TempDir::new().unwrap();
		let job = job(&upstream, &dir, 0, 0, 0);

		let err = fetch_tile(&upstream.client(), &job, false).await.unwrap_err();
		assert!(err.to_string().starts_with("unexpected status 500"), "{err}");
		assert!(!job.tile_path().exists());
	}

	#[tokio::test]
	async fn existing_tile_skips_network_unless_forced() {
		let upstream = Upstream::start([("0/0/0", UpstreamTile::png(&create_image_rgb(64, 64)))]).await;
		let dir = TempDir::new().unwrap();
		let job = job(&upstream, &dir, 0, 0, 0);
		std::fs::create_dir_all(job.tile_path().parent().unwrap()).unwrap();
		std::fs::write(job.tile_path(), b"cached").unwrap();

		let client = upstream.client();
		assert!(fetch_tile(&client, &job, false).await.unwrap());
		assert_eq!(upstream.hits(), 0);
		assert_eq!(std::fs::read(job.tile_path()).unwrap(), b"cached");

		assert!(fetch_tile(&client, &job, true).await.unwrap());
		assert_eq!(upstream.hits(), 1);
		assert_eq!(&std::fs::read(job.tile_path()).unwrap()[8..12], b"WEBP");
	}

	#[tokio::test]
	async fn empty_file_is_refetched() {
		let upstream = Upstream::start([("0/0/0", UpstreamTile::png(&create_image_rgb(64, 64)))]).await;
		let dir = TempDir::new().unwrap();
		let job = job(&upstream, &dir, 0, 0, 0);
		std::fs::create_dir_all(job.tile_path().parent().unwrap()).unwrap();
		std::fs::write(job.tile_path(), b"").unwrap();

		assert!(fetch_tile(&upstream.client(), &job, false).await.unwrap());
		assert_eq!(upstream.hits(), 1);
	}

	#[tokio::test]
	async fn probe_does_not_write() {
		let upstream = Upstream::start([
			("2/1/1", UpstreamTile::png(&create_image_rgb(32, 32))),
			("2/2/2", UpstreamTile::png(&create_image_rgb(1, 1))),
		])
		.await;
		let client = upstream.client();
		let template = UrlTemplate::new(&format!("{}/{{z}}/{{x}}/{{y}}.png", upstream.base_url()));

		assert!(probe_tile(&client, &template.render(&TileCoord::new(2, 1, 1).unwrap())).await);
		assert!(!probe_tile(&client, &template.render(&TileCoord::new(2, 2, 2).unwrap())).await);
		assert!(!probe_tile(&client, &template.render(&TileCoord::new(2, 3, 3).unwrap())).await);
		assert!(!probe_tile(&client, "http://127.0.0.1:1/unreachable.png").await);
	}
}
