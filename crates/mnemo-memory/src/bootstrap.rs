//! First-run lifecycle.
//!
//! `BOOTSTRAP.md` existing is the only "not yet set up" flag. The store seeds
//! it on a fresh directory and never removes it; the agent deletes it once
//! the setup conversation is done.

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use crate::file::write_ops::atomic_write;
use crate::paths::MemoryPaths;
use crate::templates::{IDENTITY_MD, MEMORY_MD, USER_MD, bootstrap_md};
use crate::types::Document;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// A fresh directory; these files were written.
    Seeded(Vec<PathBuf>),
    /// `MEMORY.md` already existed, nothing was touched.
    AlreadyInitialized,
}

/// Ensure directories exist and, when `MEMORY.md` is absent, write the
/// bootstrap instructions plus the three templates.
///
/// `MEMORY.md` is written last: an interrupted seed leaves it missing, so the
/// next startup seeds again.
pub fn seed_if_uninitialized(paths: &MemoryPaths) -> Result<SeedOutcome> {
    paths.ensure_directories()?;

    if paths.document(Document::Memory).exists() {
        return Ok(SeedOutcome::AlreadyInitialized);
    }

    let bootstrap_path = paths.document(Document::Bootstrap);
    let files = [
        (bootstrap_path.clone(), bootstrap_md(&bootstrap_path)),
        (paths.document(Document::Identity), IDENTITY_MD.to_owned()),
        (paths.document(Document::User), USER_MD.to_owned()),
        (paths.document(Document::Memory), MEMORY_MD.to_owned()),
    ];

    let mut created = Vec::with_capacity(files.len());
    for (path, content) in files {
        atomic_write(&path, &content)?;
        created.push(path);
    }

    info!(base = %paths.base().display(), files = created.len(), "seeded memory directory");
    Ok(SeedOutcome::Seeded(created))
}

/// True while `BOOTSTRAP.md` exists. Probes the filesystem on every call.
pub fn needs_bootstrap(paths: &MemoryPaths) -> bool {
    paths.document(Document::Bootstrap).exists()
}
