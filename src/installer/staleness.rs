//! Update detection for installed workshop items
//!
//! An installed item is stale when the newest changelog entry on its
//! workshop page is at or after the time the item landed on disk. This is a
//! heuristic: anything that touches the directory's inode resets its age.

use anyhow::Result;
use std::path::Path;
use tracing::debug;

use crate::modlist::Item;
use crate::paths;
use crate::workshop::{extract_updated_at, WorkshopPages};

/// Decides whether an installed item needs a fresh download
pub trait StalenessCheck {
    /// Missing installations are never stale; absence is handled by the download loop.
    fn is_stale(&self, item: &Item, local_path: &Path) -> Result<bool>;
}

/// Compares the workshop changelog against the install time on disk
pub struct ChangelogCheck<'a, P: WorkshopPages> {
    pages: &'a P,
}

impl<'a, P: WorkshopPages> ChangelogCheck<'a, P> {
    pub fn new(pages: &'a P) -> Self {
        Self { pages }
    }
}

impl<P: WorkshopPages> StalenessCheck for ChangelogCheck<'_, P> {
    fn is_stale(&self, item: &Item, local_path: &Path) -> Result<bool> {
        if !local_path.is_dir() {
            return Ok(false);
        }

        let html = self.pages.changelog(&item.id)?;
        let Some(updated_at) = extract_updated_at(&html) else {
            debug!("No changelog timestamp found for {}", item.label());
            return Ok(false);
        };

        let installed_at = paths::install_time(local_path)?;
        debug!(
            "{}: updated {} / installed {}",
            item.label(),
            updated_at,
            installed_at
        );

        Ok(updated_at >= installed_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakePages {
        changelog: String,
        requests: Cell<usize>,
    }

    impl FakePages {
        fn with_timestamp(ts: i64) -> Self {
            Self {
                changelog: format!(
                    "<div class=\"workshopAnnouncement\"><p id=\"{}\">notes</p></div>",
                    ts
                ),
                requests: Cell::new(0),
            }
        }
    }

    impl WorkshopPages for FakePages {
        fn changelog(&self, _item_id: &str) -> Result<String> {
            self.requests.set(self.requests.get() + 1);
            Ok(self.changelog.clone())
        }

        fn details(&self, _item_id: &str) -> Result<String> {
            unreachable!("details not used by the staleness check")
        }

        fn details_url(&self, item_id: &str) -> String {
            format!("http://example.invalid/?id={}", item_id)
        }
    }

    #[test]
    fn test_missing_path_is_not_stale_and_skips_request() {
        let temp = tempfile::tempdir().unwrap();
        let pages = FakePages::with_timestamp(i64::MAX / 2);
        let check = ChangelogCheck::new(&pages);

        let stale = check
            .is_stale(&Item::new("cagny", "123"), &temp.path().join("123"))
            .unwrap();
        assert!(!stale);
        assert_eq!(pages.requests.get(), 0);
    }

    #[test]
    fn test_newer_changelog_is_stale() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("123");
        std::fs::create_dir(&dir).unwrap();

        let future = chrono::Utc::now().timestamp() + 3600;
        let pages = FakePages::with_timestamp(future);
        let check = ChangelogCheck::new(&pages);

        assert!(check.is_stale(&Item::new("cagny", "123"), &dir).unwrap());
        assert_eq!(pages.requests.get(), 1);
    }

    #[test]
    fn test_older_changelog_is_fresh() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("123");
        std::fs::create_dir(&dir).unwrap();

        let pages = FakePages::with_timestamp(1_000_000_000);
        let check = ChangelogCheck::new(&pages);

        assert!(!check.is_stale(&Item::new("cagny", "123"), &dir).unwrap());
    }

    #[test]
    fn test_unparsable_page_is_fresh() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("123");
        std::fs::create_dir(&dir).unwrap();

        let pages = FakePages {
            changelog: "<html>maintenance</html>".to_string(),
            requests: Cell::new(0),
        };
        let check = ChangelogCheck::new(&pages);

        assert!(!check.is_stale(&Item::new("cagny", "123"), &dir).unwrap());
        assert_eq!(pages.requests.get(), 1);
    }
}
