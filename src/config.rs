//! Settings for the player: schema types plus the file/environment loader.

mod load;
mod schema;

pub use load::{default_config_path, resolve_config_path};
pub use schema::*;
