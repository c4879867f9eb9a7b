//! Shared helpers for unit tests: logger setup, temp-dir registries and a
//! sample custom object type.
mod common;

pub use common::*;
