//! A fixed-size pool of fetch workers.
//!
//! Coordinates are queued on a bounded channel and drained by exactly `concurrency` tasks. Every
//! worker reports a [`FetchResult`] to a shared results channel; [`FetchPool::run`] returns once
//! all workers have finished, which is the level barrier of the pyramid builder.

use crate::{FetchJob, FetchResult, fetch_tile};
use dzmap_core::{TileCoord, UrlTemplate};
use reqwest::Client;
use std::{path::Path, sync::Arc};
use tokio::{
	sync::{Mutex, mpsc},
	task::JoinSet,
};

/// Default number of concurrent fetch workers.
pub const DEFAULT_CONCURRENCY: usize = 50;

#[derive(Clone)]
pub struct FetchPool {
	client: Client,
	concurrency: usize,
	force: bool,
}

impl FetchPool {
	pub fn new(client: Client, concurrency: usize, force: bool) -> FetchPool {
		FetchPool {
			client,
			concurrency: concurrency.max(1),
			force,
		}
	}

	pub fn client(&self) -> &Client {
		&self.client
	}

	pub fn concurrency(&self) -> usize {
		self.concurrency
	}

	/// Fetch every coordinate in `coords` from `template` into `dest_dir`.
	///
	/// Returns the coordinates with a valid tile on disk, in no particular order. Failed jobs are
	/// logged and dropped; there are no retries.
	pub async fn run(&self, coords: &[TileCoord], template: &UrlTemplate, dest_dir: &Path) -> Vec<TileCoord> {
		if coords.is_empty() {
			return Vec::new();
		}

		let template = Arc::new(template.clone());
		let dest_dir: Arc<Path> = Arc::from(dest_dir);

		let (job_tx, job_rx) = mpsc::channel::<FetchJob>(self.concurrency * 2);
		let job_rx = Arc::new(Mutex::new(job_rx));
		let (result_tx, mut result_rx) = mpsc::unbounded_channel::<FetchResult>();

		let mut workers = JoinSet::new();
		for _ in 0..self.concurrency.min(coords.len()) {
			let job_rx = Arc::clone(&job_rx);
			let result_tx = result_tx.clone();
			let client = self.client.clone();
			let force = self.force;
			workers.spawn(async move {
				loop {
					let job = job_rx.lock().await.recv().await;
					let Some(job) = job else { break };
					let valid = match fetch_tile(&client, &job, force).await {
						Ok(valid) => valid,
						Err(err) => {
							log::trace!("failed to fetch tile {}: {err:#}", job.url());
							false
						}
					};
					if result_tx.send(FetchResult { coord: job.coord, valid }).is_err() {
						break;
					}
				}
			});
		}
		drop(result_tx);

		for coord in coords {
			let job = FetchJob::new(*coord, Arc::clone(&template), Arc::clone(&dest_dir));
			if job_tx.send(job).await.is_err() {
				break;
			}
		}
		drop(job_tx);

		while let Some(joined) = workers.join_next().await {
			if let Err(err) = joined {
				log::error!("fetch worker failed: {err}");
			}
		}

		let mut valid = Vec::new();
		while let Some(result) = result_rx.recv().await {
			if result.valid {
				valid.push(result.coord);
			}
		}
		valid
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{Upstream, UpstreamTile};
	use assert_fs::TempDir;
	use dzmap_image::helper::create_image_rgb;
	use pretty_assertions::assert_eq;
	use rstest::rstest;
	use std::time::Duration;

	#[rstest]
	#[case::single_worker(1)]
	#[case::few_workers(3)]
	#[case::more_workers_than_jobs(64)]
	#[tokio::test]
	async fn returns_only_valid_coordinates(#[case] concurrency: usize) {
		let tile = UpstreamTile::png(&create_image_rgb(16, 16));
		let upstream = Upstream::start([
			("2/0/0", tile.clone()),
			("2/1/0", UpstreamTile::png(&create_image_rgb(1, 1))),
			("2/2/0", UpstreamTile::Status(500)),
			("2/3/0", UpstreamTile::Raw(b"garbage".to_vec())),
			("2/0/1", tile.clone()),
			("2/3/3", tile),
		])
		.await;
		let dir = TempDir::new().unwrap();
		let pool = FetchPool::new(upstream.client(), concurrency, false);

		let coords: Vec<TileCoord> = (0..4)
			.flat_map(|y| (0..4).map(move |x| TileCoord::new(2, x, y).unwrap()))
			.collect();
		let mut valid = pool.run(&coords, &upstream.template(), dir.path()).await;
		valid.sort();

		assert_eq!(
			valid,
			vec![
				TileCoord::new(2, 0, 0).unwrap(),
				TileCoord::new(2, 0, 1).unwrap(),
				TileCoord::new(2, 3, 3).unwrap(),
			]
		);
		assert_eq!(upstream.hits(), 16);
		assert!(dir.path().join("2/0/0.webp").is_file());
		assert!(!dir.path().join("2/1/0.webp").exists());
		assert!(!dir.path().join("2/2/0.webp").exists());
	}

	#[rstest]
	#[case::one(1)]
	#[case::five(5)]
	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn never_exceeds_worker_count(#[case] concurrency: usize) {
		let upstream = Upstream::start_slow(Vec::<(&str, UpstreamTile)>::new(), Duration::from_millis(20)).await;
		let dir = TempDir::new().unwrap();
		let pool = FetchPool::new(upstream.client(), concurrency, false);

		let coords: Vec<TileCoord> = (0..8)
			.flat_map(|y| (0..8).map(move |x| TileCoord::new(3, x, y).unwrap()))
			.collect();
		let valid = pool.run(&coords, &upstream.template(), dir.path()).await;

		assert!(valid.is_empty());
		assert_eq!(upstream.hits(), 64);
		let peak = upstream.peak_in_flight();
		assert!(peak <= concurrency, "{peak} requests in flight with {concurrency} workers");
		assert!(peak >= 1);
	}

	#[tokio::test]
	async fn empty_batch_does_nothing() {
		let upstream = Upstream::empty().await;
		let dir = TempDir::new().unwrap();
		let pool = FetchPool::new(upstream.client(), 4, false);
		assert!(pool.run(&[], &upstream.template(), dir.path()).await.is_empty());
		assert_eq!(upstream.hits(), 0);
	}

	#[test]
	fn concurrency_is_at_least_one() {
		let pool = FetchPool::new(Client::new(), 0, false);
		assert_eq!(pool.concurrency(), 1);
	}
}
