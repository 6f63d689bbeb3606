use anyhow::{Result, anyhow, bail};
use image::{DynamicImage, ExtendedColorType, codecs::webp::WebPEncoder};

/// Quality used for tiles downloaded from an upstream pyramid.
pub const FETCH_QUALITY: f32 = 80.0;
/// Quality used for tiles sliced from a single source image.
pub const SLICE_QUALITY: f32 = 85.0;

/// Encode `image` as lossy WebP with the given `quality` (0-100).
///
/// Images that are neither RGB8 nor RGBA8 are converted to RGBA8 first.
pub fn encode(image: &DynamicImage, quality: f32) -> Result<Vec<u8>> {
	let (width, height) = (image.width(), image.height());
	if width == 0 || height == 0 {
		bail!("cannot encode an empty {width}x{height} image as webp");
	}

	let memory = match image {
		DynamicImage::ImageRgb8(rgb) => webp::Encoder::from_rgb(rgb.as_raw(), width, height).encode_simple(false, quality),
		DynamicImage::ImageRgba8(rgba) => {
			webp::Encoder::from_rgba(rgba.as_raw(), width, height).encode_simple(false, quality)
		}
		other => {
			let rgba = other.to_rgba8();
			webp::Encoder::from_rgba(rgba.as_raw(), width, height).encode_simple(false, quality)
		}
	}
	.map_err(|e| anyhow!("webp encoding failed: {e:?}"))?;

	Ok(memory.to_vec())
}

/// Encode `image` as lossless WebP.
pub fn encode_lossless(image: &DynamicImage) -> Result<Vec<u8>> {
	let rgba = image.to_rgba8();
	let mut result: Vec<u8> = Vec::new();
	WebPEncoder::new_lossless(&mut result).encode(
		rgba.as_raw(),
		rgba.width(),
		rgba.height(),
		ExtendedColorType::Rgba8,
	)?;
	Ok(result)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		decode,
		helper::{create_image_grey, create_image_rgb, create_image_rgba},
	};
	use rstest::rstest;

	#[rstest]
	#[case::rgb(create_image_rgb(256, 256))]
	#[case::rgba(create_image_rgba(256, 256))]
	#[case::grey(create_image_grey(256, 256))]
	fn lossy_output_is_decodable_webp(#[case] img: DynamicImage) {
		let blob = encode(&img, FETCH_QUALITY).unwrap();
		assert_eq!(&blob[0..4], b"RIFF");
		assert_eq!(&blob[8..12], b"WEBP");

		let decoded = decode(&blob).unwrap();
		assert_eq!((decoded.width(), decoded.height()), (256, 256));
	}

	#[test]
	fn higher_quality_is_not_smaller() {
		let img = create_image_rgb(256, 256);
		let low = encode(&img, 10.0).unwrap();
		let high = encode(&img, 95.0).unwrap();
		assert!(high.len() >= low.len());
	}

	#[test]
	fn lossless_keeps_pixels() {
		let img = create_image_rgba(64, 32);
		let decoded = decode(&encode_lossless(&img).unwrap()).unwrap();
		assert_eq!(decoded.to_rgba8().as_raw(), img.to_rgba8().as_raw());
	}

	#[test]
	fn empty_image_is_rejected() {
		let err = encode(&DynamicImage::new_rgba8(0, 0), FETCH_QUALITY).unwrap_err();
		assert_eq!(err.to_string(), "cannot encode an empty 0x0 image as webp");
	}
}
