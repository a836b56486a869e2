//! Markdown-backed memory for a conversational agent.
//!
//! A handful of role-keyed documents (`MEMORY.md`, `IDENTITY.md`, `USER.md`,
//! `BOOTSTRAP.md`) plus date-keyed logs under `daily/` live in one base
//! directory. [`FileMemory`] reads, appends, overwrites, searches and lists
//! them, and assembles the per-turn context block.

pub mod bootstrap;
pub mod context;
pub mod file;
pub mod paths;
mod templates;
pub mod traits;
pub mod types;

pub use bootstrap::{SeedOutcome, seed_if_uninitialized};
pub use file::FileMemory;
pub use paths::{MemoryPaths, resolve_base_directory};
pub use traits::MemoryStore;
pub use types::*;
