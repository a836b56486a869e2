use std::path::Path;
use tracing::debug;

use crate::paths::MemoryPaths;
use crate::types::{DAILY_DIR, Document, ListResult, SearchHit};

/// Sorted `*.md` file names in `dir`. An unreadable or missing directory
/// contributes nothing.
fn markdown_files(dir: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
            return Vec::new();
        }
    };

    let mut names = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".md"))
        .collect::<Vec<_>>();
    names.sort();
    names
}

fn is_bootstrap(name: &str) -> bool {
    name == Document::Bootstrap.file_name()
}

/// Scan root documents, then daily logs, line by line. Stops as soon as
/// `max_results` hits are collected. Per-file read errors are skipped.
pub(crate) fn search(paths: &MemoryPaths, query: &str, max_results: usize) -> Vec<SearchHit> {
    let needle = query.to_lowercase();
    let mut hits = Vec::new();
    let locations = [(paths.base(), None), (paths.daily_dir(), Some(DAILY_DIR))];

    'scan: for (dir, prefix) in locations {
        for name in markdown_files(dir) {
            if is_bootstrap(&name) {
                continue;
            }
            if hits.len() >= max_results {
                break 'scan;
            }

            let path = dir.join(&name);
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "skipping unreadable file");
                    continue;
                }
            };

            let label = match prefix {
                Some(prefix) => format!("{prefix}/{name}"),
                None => name,
            };

            for (idx, line) in content.split('\n').enumerate() {
                if hits.len() >= max_results {
                    break 'scan;
                }
                if line.to_lowercase().contains(&needle) {
                    hits.push(SearchHit {
                        file: label.clone(),
                        line: idx + 1,
                        text: line.trim_end().to_owned(),
                    });
                }
            }
        }
    }

    debug!(query, count = hits.len(), max_results, "memory search complete");
    hits
}

pub(crate) fn list(paths: &MemoryPaths) -> ListResult {
    let root = markdown_files(paths.base())
        .into_iter()
        .filter(|name| !is_bootstrap(name))
        .collect();

    let mut daily = markdown_files(paths.daily_dir());
    daily.reverse();

    ListResult { root, daily }
}
