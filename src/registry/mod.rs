#[allow(clippy::module_inception)]
mod registry;


pub use registry::*;
