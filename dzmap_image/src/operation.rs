//! Resampling and slicing of large source images.
//!
//! A source raster is resampled once per zoom level to `(2^z * tile_size)` pixels per edge and then
//! cut into `tile_size` squares. Resampling always starts from the original image, never from the
//! previous level.

use anyhow::{Result, ensure};
use fast_image_resize::{FilterType, ResizeAlg, ResizeOptions, Resizer};
use image::DynamicImage;

/// Resample `image` to exactly `width × height` with a Catmull-Rom kernel.
pub fn resize_exact(image: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage> {
	ensure!(width > 0 && height > 0, "target size {width}x{height} must not be empty");

	let mut dst_image = DynamicImage::new(width, height, image.color());
	Resizer::new().resize(
		image,
		&mut dst_image,
		&ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::CatmullRom)),
	)?;
	Ok(dst_image)
}

/// Cut the tile at grid position `(x, y)` out of a level canvas.
pub fn crop_tile(canvas: &DynamicImage, x: u32, y: u32, tile_size: u32) -> DynamicImage {
	canvas.crop_imm(x * tile_size, y * tile_size, tile_size, tile_size)
}

/// Normalize a decoded source image to 8-bit RGB or RGBA so it can be resampled and encoded.
pub fn into_rgb_or_rgba8(image: DynamicImage) -> DynamicImage {
	match image {
		DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => image,
		other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
		other => DynamicImage::ImageRgb8(other.to_rgb8()),
	}
}
