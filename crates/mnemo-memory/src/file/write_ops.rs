use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use mnemo_core::format_marker_timestamp;
use std::fs::Permissions;
use std::io::Write;
use std::path::Path;

/// Replace `path` with `content` via a temp file in the same directory and a
/// rename, so readers see either the old file or the new one.
///
/// The temp name does not end in `.md`, so a leftover from a crash is never
/// picked up by search or list. The replacement keeps the target's existing
/// permissions; a new file gets `0644` on unix.
pub(crate) fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::Builder::new()
        .prefix(".mnemo-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    tmp.write_all(content.as_bytes())
        .with_context(|| format!("failed to write temp file for {}", path.display()))?;
    if let Some(permissions) = target_permissions(path) {
        tmp.as_file()
            .set_permissions(permissions)
            .with_context(|| format!("failed to set permissions for {}", path.display()))?;
    }
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("failed to sync temp file for {}", path.display()))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

/// Permissions the replacement should carry; the temp file itself starts out
/// owner-only.
fn target_permissions(path: &Path) -> Option<Permissions> {
    if let Ok(meta) = std::fs::metadata(path) {
        return Some(meta.permissions());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        Some(Permissions::from_mode(0o644))
    }
    #[cfg(not(unix))]
    {
        None
    }
}

/// Whole-file body for an overwrite: a single header line, then the content.
pub(crate) fn compose_overwrite(at: DateTime<Utc>, content: &str) -> String {
    format!(
        "<!-- last updated: {} -->\n{content}",
        format_marker_timestamp(at)
    )
}

/// Existing text, a blank line when it has content, then the stamped entry.
/// Earlier markers are left exactly as they were.
pub(crate) fn compose_append(existing: &str, at: DateTime<Utc>, content: &str) -> String {
    let separator = if existing.trim().is_empty() { "" } else { "\n\n" };
    format!(
        "{existing}{separator}<!-- {} -->\n{content}",
        format_marker_timestamp(at)
    )
}
