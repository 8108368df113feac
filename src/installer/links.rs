//! Mods directory symlinks
//!
//! The server loads mods by name from its mods directory; each entry is a
//! symlink into the workshop download root.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use crate::installer::config::UpdateConfig;
use crate::modlist::Item;

/// What happened for one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    Created,
    /// Something already exists at the link path; left untouched
    Exists,
    /// The item is not installed
    Missing,
}

/// Totals for a linking pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkStats {
    pub created: usize,
    pub existing: usize,
    pub missing: usize,
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

/// Link `link_path` to `install_path` unless the link path is taken.
pub fn link_item(item: &Item, install_path: &Path, link_path: &Path) -> Result<LinkOutcome> {
    if !install_path.is_dir() {
        println!("Mod '{}' does not exist! ({})", item.name, install_path.display());
        return Ok(LinkOutcome::Missing);
    }

    if link_path.symlink_metadata().is_ok() {
        debug!("{} already present", link_path.display());
        return Ok(LinkOutcome::Exists);
    }

    symlink_dir(install_path, link_path).with_context(|| {
        format!(
            "Failed to link {} -> {}",
            link_path.display(),
            install_path.display()
        )
    })?;
    println!("Creating symlink '{}'...", link_path.display());

    Ok(LinkOutcome::Created)
}

/// Create a mods-directory symlink for every configured item
pub fn create_mod_links(config: &UpdateConfig) -> Result<LinkStats> {
    std::fs::create_dir_all(&config.mods_dir)
        .with_context(|| format!("Failed to create mods directory: {}", config.mods_dir.display()))?;

    let mut stats = LinkStats::default();

    for item in &config.mods {
        match link_item(item, &config.item_path(item), &config.link_path(item))? {
            LinkOutcome::Created => stats.created += 1,
            LinkOutcome::Exists => stats.existing += 1,
            LinkOutcome::Missing => stats.missing += 1,
        }
    }

    Ok(stats)
}
