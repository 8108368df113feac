//! Lowercase every name under the workshop download root
//!
//! The server resolves mod content case-sensitively and expects lowercase
//! names, while workshop uploads come from Windows with arbitrary case.

use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::paths;

/// Rename every file and directory below `root` to its lowercase name.
///
/// Entries are renamed deepest first, so renaming a directory never
/// invalidates a child path collected earlier. Failed renames are skipped.
/// Returns the number of entries renamed.
pub fn lowercase_tree(root: &Path) -> usize {
    if !root.is_dir() {
        debug!("Nothing to normalize, {} does not exist", root.display());
        return 0;
    }

    let entries: Vec<_> = WalkDir::new(root)
        .min_depth(1)
        .contents_first(true)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .collect();

    let mut renamed = 0;

    for entry in entries {
        let source = entry.path();
        let Some(target) = paths::lowercase_target(source) else {
            continue;
        };

        if target.symlink_metadata().is_ok() && !paths::same_entry(source, &target) {
            warn!(
                "Not renaming {}: {} already exists",
                source.display(),
                target.display()
            );
            continue;
        }

        match std::fs::rename(source, &target) {
            Ok(()) => renamed += 1,
            Err(e) => debug!("Rename {} failed: {}", source.display(), e),
        }
    }

    renamed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = WalkDir::new(dir)
            .min_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.path().strip_prefix(dir).unwrap().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_lowercases_nested_tree() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("123/Content/Maps")).unwrap();
        std::fs::write(root.join("123/Content/Maps/Cagny.UMAP"), "").unwrap();
        std::fs::write(root.join("123/ReadMe.TXT"), "").unwrap();

        let renamed = lowercase_tree(root);

        assert_eq!(renamed, 4);
        assert_eq!(
            names(root),
            vec![
                "123",
                "123/content",
                "123/content/maps",
                "123/content/maps/cagny.umap",
                "123/readme.txt",
            ]
        );
    }

    #[test]
    fn test_second_pass_renames_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("456/Data")).unwrap();
        std::fs::write(root.join("456/Data/File.pak"), "").unwrap();

        assert_eq!(lowercase_tree(root), 2);
        let after_first = names(root);

        assert_eq!(lowercase_tree(root), 0);
        assert_eq!(names(root), after_first);
    }

    #[test]
    fn test_does_not_clobber_existing_lowercase_entry() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("789")).unwrap();
        std::fs::write(root.join("789/Config.ini"), "upper").unwrap();
        std::fs::write(root.join("789/config.ini"), "lower").unwrap();

        // On case-insensitive filesystems both writes hit one file
        let distinct = !paths::same_entry(&root.join("789/Config.ini"), &root.join("789/config.ini"));

        lowercase_tree(root);

        assert_eq!(std::fs::read_to_string(root.join("789/config.ini")).unwrap(), "lower");
        if distinct {
            assert!(root.join("789/Config.ini").exists());
        }
    }

    #[test]
    fn test_missing_root_is_noop() {
        let temp = tempfile::tempdir().unwrap();
        assert_eq!(lowercase_tree(&temp.path().join("missing")), 0);
    }

    #[test]
    fn test_root_itself_is_not_renamed() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("Content");
        std::fs::create_dir_all(&root).unwrap();

        assert_eq!(lowercase_tree(&root), 0);
        assert!(root.is_dir());
    }
}
