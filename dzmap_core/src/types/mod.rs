mod layer_source;
mod map_layer;
mod pyramid_layout;
mod tile_coord;
mod url_template;

pub use layer_source::*;
pub use map_layer::*;
pub use pyramid_layout::*;
pub use tile_coord::*;
pub use url_template::*;
