mod query;
pub(crate) mod write_ops;


use anyhow::{Context, Result};
use chrono::NaiveDate;
use mnemo_core::{Clock, SystemClock};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::bootstrap::{self, SeedOutcome};
use crate::context::{self, ContextSource};
use crate::paths::MemoryPaths;
use crate::traits::MemoryStore;
use crate::types::{ContextFile, Document, ListResult, SearchHit, Target, WriteMode};

/// Filesystem-backed memory store.
#[derive(Debug, Clone)]
pub struct FileMemory {
    paths: MemoryPaths,
    clock: Arc<dyn Clock>,
}

impl FileMemory {
    pub fn new(paths: MemoryPaths, clock: Arc<dyn Clock>) -> Self {
        Self { paths, clock }
    }

    /// Open `base` with the system clock and run the first-run seed.
    pub fn open(base: impl Into<PathBuf>) -> Result<Self> {
        let memory = Self::new(MemoryPaths::new(base), Arc::new(SystemClock));
        memory.initialize()?;
        Ok(memory)
    }

    /// Ensure directories and seed templates on a fresh directory.
    pub fn initialize(&self) -> Result<SeedOutcome> {
        bootstrap::seed_if_uninitialized(&self.paths)
    }

    pub fn paths(&self) -> &MemoryPaths {
        &self.paths
    }

    fn read_path(path: &Path) -> Result<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    /// Raw content for append; unlike `read_path`, blank files are kept as-is.
    fn read_existing(path: &Path) -> Result<String> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    /// Reads for context never fail the turn; problems are logged and the
    /// document is treated as absent.
    fn read_for_context(&self, doc: Document) -> Option<String> {
        let path = self.paths.document(doc);
        match Self::read_path(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable document");
                None
            }
        }
    }
}

impl MemoryStore for FileMemory {
    fn ensure_directories(&self) -> Result<()> {
        self.paths.ensure_directories()
    }

    fn today(&self) -> NaiveDate {
        self.clock.now().date_naive()
    }

    fn needs_bootstrap(&self) -> bool {
        bootstrap::needs_bootstrap(&self.paths)
    }

    #[instrument(skip(self))]
    fn read(&self, target: Target) -> Result<Option<String>> {
        let content = Self::read_path(&self.paths.target(target))?;
        debug!(found = content.is_some(), "memory read complete");
        Ok(content)
    }

    #[instrument(skip(self, content), fields(bytes = content.len()))]
    fn write(&self, target: Target, content: &str, mode: WriteMode) -> Result<()> {
        let path = self.paths.target(target);
        let now = self.clock.now();
        let next = match mode {
            WriteMode::Overwrite => write_ops::compose_overwrite(now, content),
            WriteMode::Append => {
                let existing = Self::read_existing(&path)?;
                write_ops::compose_append(&existing, now, content)
            }
        };
        write_ops::atomic_write(&path, &next)?;
        debug!(path = %path.display(), "memory write complete");
        Ok(())
    }

    #[instrument(skip(self))]
    fn search(&self, query: &str, max_results: usize) -> Vec<SearchHit> {
        query::search(&self.paths, query, max_results)
    }

    fn list(&self) -> ListResult {
        query::list(&self.paths)
    }

    fn context_files(&self) -> Vec<ContextFile> {
        Document::CONTEXT
            .into_iter()
            .filter_map(|doc| {
                self.read_for_context(doc).map(|content| ContextFile {
                    name: doc.file_name().to_owned(),
                    content: content.trim().to_owned(),
                })
            })
            .collect()
    }

    fn build_context(&self) -> String {
        let source = if self.needs_bootstrap() {
            ContextSource::Bootstrap(
                self.read_for_context(Document::Bootstrap)
                    .unwrap_or_default(),
            )
        } else {
            ContextSource::Documents(self.context_files())
        };
        context::render(&source)
    }
}
