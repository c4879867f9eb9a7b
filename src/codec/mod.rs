mod json;
mod snapshot_codec;


pub use json::*;
pub use snapshot_codec::*;
