mod codec;
mod config;
mod errors;
mod executor;
mod persistence;
mod registry;
mod store;
mod value;

pub use codec::*;
pub use config::*;
pub use errors::*;
pub use executor::*;
pub use persistence::*;
pub use registry::*;
pub use store::*;
pub use value::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
