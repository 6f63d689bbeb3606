//! Image handling for tile pyramids: decoding upstream imagery, WebP encoding, resampling of
//! large source rasters and the transparent placeholder tile.

mod decode;
pub mod format;
pub mod helper;
mod operation;
mod placeholder;

pub use decode::*;
pub use format::webp::{FETCH_QUALITY, SLICE_QUALITY, encode as encode_webp};
pub use operation::*;
pub use placeholder::*;
