use anyhow::Result;
use chrono::NaiveDate;

use crate::types::{ContextFile, ListResult, SearchHit, Target, WriteMode};

/// The capability set a host adapter drives.
///
/// Calls are synchronous and run to completion; the store holds no state
/// besides the filesystem, so two stores over one directory see each other's
/// writes immediately.
pub trait MemoryStore: Send + Sync {
    /// Create the base and daily directories if missing.
    fn ensure_directories(&self) -> Result<()>;

    /// Date used for `daily` when the caller gives none.
    fn today(&self) -> NaiveDate;

    /// Whether first-run setup is still pending.
    fn needs_bootstrap(&self) -> bool;

    /// Document content, or `None` when the file is absent or blank.
    fn read(&self, target: Target) -> Result<Option<String>>;

    /// Persist `content` with a timestamp marker. Failures always surface.
    fn write(&self, target: Target, content: &str, mode: WriteMode) -> Result<()>;

    /// Case-insensitive line search, capped at `max_results`. Never fails.
    fn search(&self, query: &str, max_results: usize) -> Vec<SearchHit>;

    /// Root documents and daily logs. Never fails.
    fn list(&self) -> ListResult;

    /// Non-empty documents to surface once setup is finished.
    fn context_files(&self) -> Vec<ContextFile>;

    /// The per-turn context block; empty when there is nothing to inject.
    fn build_context(&self) -> String;
}
