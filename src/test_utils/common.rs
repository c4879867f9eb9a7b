use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use tempfile::TempDir;

use crate::PrefObject;
use crate::Registry;
use crate::StoreConfig;
use crate::TypeRegistry;

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
    println!("setup logger for unit test.");
}

/// Sample custom object type used across codec and store tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleProfile {
    pub greeting: String,
    pub count: i32,
}

impl PrefObject for SampleProfile {
    const TYPE_ID: &'static str = "test.sample_profile";
}

pub fn sample_profile() -> SampleProfile {
    SampleProfile {
        greeting: "hello".to_string(),
        count: 42,
    }
}

/// Type registry with [`SampleProfile`] pre-registered.
pub fn test_type_registry() -> TypeRegistry {
    let mut types = TypeRegistry::new();
    types.register::<SampleProfile>();
    types
}

pub fn test_config(base: &Path) -> StoreConfig {
    StoreConfig {
        base_path: base.to_path_buf(),
    }
}

/// Registry rooted in a fresh temp dir; keep the [`TempDir`] alive for the
/// duration of the test.
pub fn test_registry() -> (Registry, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let registry =
        Registry::new(test_config(dir.path()), test_type_registry()).expect("registry");
    (registry, dir)
}
