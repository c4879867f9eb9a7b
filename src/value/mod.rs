mod type_registry;
#[allow(clippy::module_inception)]
mod value;


pub use type_registry::*;
pub use value::*;
