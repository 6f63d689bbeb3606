use anyhow::{Context, Result};
use image::{DynamicImage, ImageReader};
use std::io::Cursor;

/// Decode an image of any supported format (PNG, JPEG, WebP, BMP, TIFF) from memory.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
	image::load_from_memory(bytes).context("decoding image")
}

/// Decode a large source raster without the default allocation limits.
///
/// Single-image map sources are routinely larger than what [`decode`] accepts.
pub fn decode_source(bytes: &[u8]) -> Result<DynamicImage> {
	let mut reader = ImageReader::new(Cursor::new(bytes))
		.with_guessed_format()
		.context("detecting image format")?;
	reader.no_limits();
	reader.decode().context("decoding source image")
}

/// Whether `image` is real imagery rather than the 1px "empty area" sentinel some tile servers
/// return instead of a 404.
pub fn is_real_tile(image: &DynamicImage) -> bool {
	image.width() > 1
}
