//! Application module: the front-end model layered over the playback controller.

mod model;

pub use model::*;
