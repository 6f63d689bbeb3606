use crate::format::webp::encode_lossless;
use anyhow::Result;
use image::{DynamicImage, RgbaImage};

/// A fully transparent square WebP tile, returned for coordinates without imagery.
pub fn transparent_tile(size: u32) -> Result<Vec<u8>> {
	encode_lossless(&DynamicImage::ImageRgba8(RgbaImage::new(size, size)))
}
