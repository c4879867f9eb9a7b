mod engine;
mod path_manager;


pub use engine::*;
pub(crate) use path_manager::*;
