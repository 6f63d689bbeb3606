//! Output codecs. Tiles are always stored as WebP.

pub mod webp;
