//! Building tile pyramids on disk.
//!
//! Two modes produce the same `<layer>/<z>/<x>/<y>.webp` layout:
//!
//! - **remote**: [`PyramidBuilder`] walks an upstream XYZ/TMS pyramid level by level through a
//!   bounded [`FetchPool`], expanding only tiles that exist.
//! - **single image**: [`ImageSlicer`] resamples one large raster for every level and cuts it into
//!   tiles.
//!
//! [`MapLoader`] decides per map and layer which mode applies.

mod builder;
mod fetch;
mod job;
mod pool;
mod process;
mod slicer;
#[cfg(test)]
mod testing;

pub use builder::*;
pub use fetch::{fetch_tile, probe_tile};
pub use job::*;
pub use pool::*;
pub use process::*;
pub use slicer::*;
