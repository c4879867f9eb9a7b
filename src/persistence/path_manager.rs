use std::path::PathBuf;

/// Centralized manager for preference file path construction.
///
/// Encapsulates the naming convention so that the main/backup pair stays
/// consistent everywhere: `<base>/<name>` for the live snapshot and
/// `<base>/<name>_bak` for the crash-recovery copy.
#[derive(Debug, Clone)]
pub(crate) struct PrefPathManager {
    /// Base directory where preference files are stored
    pub(crate) base_dir: PathBuf,
    /// Suffix appended to the main file name for the backup copy
    pub(crate) backup_suffix: String,
}

impl PrefPathManager {
    /// Creates a new path manager with the default backup suffix
    pub(crate) fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            backup_suffix: "_bak".to_string(),
        }
    }

    /// Path of the live snapshot file for a preference set
    pub(crate) fn file_path(
        &self,
        name: &str,
    ) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Path of the transient backup file for a preference set
    pub(crate) fn backup_path(
        &self,
        name: &str,
    ) -> PathBuf {
        self.base_dir.join(format!("{}{}", name, self.backup_suffix))
    }
}
