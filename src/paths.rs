//! Path helpers for the server layout
//!
//! This module handles:
//! - Relative paths between the server root and the mods directory
//! - Lowercase renames for case-sensitive filesystems
//! - Reading the timestamp an installed item is aged by

use chrono::{DateTime, Utc};
use std::path::{Component, Path, PathBuf};

/// Compute `path` relative to `base`, like a `relpath` call.
///
/// Both paths should be absolute (or both relative). Returns `None` when no
/// relative path exists, e.g. a relative `path` under an absolute `base`.
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    if path.is_absolute() != base.is_absolute() {
        return None;
    }

    let path_parts: Vec<Component> = path.components().filter(|c| *c != Component::CurDir).collect();
    let base_parts: Vec<Component> = base.components().filter(|c| *c != Component::CurDir).collect();

    let common = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for part in &base_parts[common..] {
        match part {
            Component::Normal(_) => rel.push(".."),
            _ => return None,
        }
    }
    for part in &path_parts[common..] {
        rel.push(part.as_os_str());
    }

    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    Some(rel)
}

/// The lowercase sibling of `path`, or `None` if its name is already lowercase
pub fn lowercase_target(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let lower = name.to_lowercase();
    if lower == name {
        return None;
    }
    Some(path.with_file_name(lower))
}

/// Whether two paths refer to the same filesystem entry (not following symlinks)
#[cfg(unix)]
pub fn same_entry(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (std::fs::symlink_metadata(a), std::fs::symlink_metadata(b)) {
        (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
pub fn same_entry(a: &Path, b: &Path) -> bool {
    a.to_string_lossy().eq_ignore_ascii_case(&b.to_string_lossy())
}

/// Timestamp an installed item is aged by.
///
/// Inode change time on Unix (what a fresh SteamCMD download resets), birth
/// time elsewhere.
pub fn install_time(path: &Path) -> std::io::Result<DateTime<Utc>> {
    let metadata = std::fs::metadata(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        let secs = metadata.ctime();
        let nanos = metadata.ctime_nsec().clamp(0, 999_999_999) as u32;
        DateTime::from_timestamp(secs, nanos)
            .ok_or_else(|| std::io::Error::other(format!("ctime out of range: {}", secs)))
    }

    #[cfg(not(unix))]
    {
        Ok(DateTime::<Utc>::from(metadata.created()?))
    }
}

/// Create parent directories for a path if they don't exist
pub fn ensure_parent_dirs(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
