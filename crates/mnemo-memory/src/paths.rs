//! Path resolution for the memory directory.
//!
//! Every path is derived from the base directory plus a role or date; no
//! derivation touches the filesystem. [`MemoryPaths::ensure_directories`] is
//! the only place that does I/O.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::types::{DAILY_DIR, Document, Target, daily_file_name};

const APP_DIR: &str = "mnemo";
const MEMORY_DIR: &str = "memory";

/// Platform default base directory, under the user's configuration area.
///
/// Falls back to a relative `.` home when no home directory is known, so this
/// always produces a path.
pub fn resolve_base_directory() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    base_directory_under(&home)
}

fn base_directory_under(home: &Path) -> PathBuf {
    if cfg!(windows) {
        home.join("AppData")
            .join("Roaming")
            .join(APP_DIR)
            .join(MEMORY_DIR)
    } else {
        home.join(".config").join(APP_DIR).join(MEMORY_DIR)
    }
}

/// Canonical locations of every document inside one base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryPaths {
    base: PathBuf,
    daily: PathBuf,
}

impl MemoryPaths {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        let daily = base.join(DAILY_DIR);
        Self { base, daily }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn daily_dir(&self) -> &Path {
        &self.daily
    }

    pub fn document(&self, doc: Document) -> PathBuf {
        self.base.join(doc.file_name())
    }

    pub fn daily(&self, date: NaiveDate) -> PathBuf {
        self.daily.join(daily_file_name(date))
    }

    pub fn target(&self, target: Target) -> PathBuf {
        match target {
            Target::Daily(date) => self.daily(date),
            Target::Memory => self.document(Document::Memory),
            Target::Identity => self.document(Document::Identity),
            Target::User => self.document(Document::User),
        }
    }

    /// Create the base and `daily/` directories. Safe to call repeatedly and
    /// from concurrent processes; an existing directory is not an error.
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.base, &self.daily] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory {}", dir.display()))?;
        }
        debug!(base = %self.base.display(), "memory directories ready");
        Ok(())
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::parse_daily_date;

    #[test]
    fn derivation_is_pure() {
        let a = MemoryPaths::new("/data/mem");
        let b = MemoryPaths::new("/data/mem");
        for doc in Document::ALL {
            assert_eq!(a.document(doc), b.document(doc));
        }
        assert_eq!(a.document(Document::Memory), Path::new("/data/mem/MEMORY.md"));
        assert_eq!(
            a.document(Document::Bootstrap),
            Path::new("/data/mem/BOOTSTRAP.md")
        );
    }

    #[test]
    fn daily_paths_live_under_daily_dir() {
        let paths = MemoryPaths::new("/data/mem");
        let date = parse_daily_date("2024-03-05").unwrap();
        assert_eq!(paths.daily(date), Path::new("/data/mem/daily/2024-03-05.md"));
        assert_eq!(paths.target(Target::Daily(date)), paths.daily(date));
        assert_eq!(paths.target(Target::User), Path::new("/data/mem/USER.md"));
    }

    #[test]
    fn default_base_is_under_config_area() {
        let base = base_directory_under(Path::new("/home/alice"));
        assert!(base.starts_with("/home/alice"));
        assert!(base.ends_with(Path::new("mnemo").join("memory")));
        assert!(!resolve_base_directory().as_os_str().is_empty());
    }

    #[test]
    fn ensure_directories_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let paths = MemoryPaths::new(dir.path().join("nested").join("mem"));

        for _ in 0..3 {
            paths.ensure_directories().unwrap();
        }

        assert!(paths.base().is_dir());
        assert!(paths.daily_dir().is_dir());
        let entries: Vec<_> = std::fs::read_dir(paths.base()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn ensure_directories_fails_when_base_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("mem");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = MemoryPaths::new(&blocker).ensure_directories().unwrap_err();
        assert!(err.to_string().contains("failed to create directory"));
    }
}
