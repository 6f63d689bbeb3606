//! Synthetic images for tests.

use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

/// Generate an RGBA gradient of the given size.
pub fn create_image_rgba(width: u32, height: u32) -> DynamicImage {
	DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| -> Rgba<u8> {
		Rgba([x as u8, (255 - x % 256) as u8, y as u8, (255 - y % 256) as u8])
	}))
}

/// Generate an RGB gradient of the given size.
pub fn create_image_rgb(width: u32, height: u32) -> DynamicImage {
	DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| -> Rgb<u8> {
		Rgb([x as u8, (255 - x % 256) as u8, y as u8])
	}))
}

/// Generate a grayscale gradient of the given size.
pub fn create_image_grey(width: u32, height: u32) -> DynamicImage {
	DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, _y| -> Luma<u8> { Luma([x as u8]) }))
}

/// Encode `image` as PNG, the way most upstream tile servers deliver tiles.
pub fn image2png(image: &DynamicImage) -> Vec<u8> {
	let mut buffer = Cursor::new(Vec::new());
	image
		.write_to(&mut buffer, ImageFormat::Png)
		.expect("png encoding of a test image");
	buffer.into_inner()
}
