//! Modpack HTML report
//!
//! Lists the server's mods with their workshop titles and links, in three
//! tables: required, optional, and DLC. The file is rewritten from scratch on
//! every run.

mod template;

pub use template::render;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::games::GameType;
use crate::installer::config::UpdateConfig;
use crate::modlist::{DlcEntry, ItemRole, ModTable};
use crate::paths;
use crate::workshop::{extract_title, WorkshopPages};

/// Which table an entry is listed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Required,
    Optional,
    Dlc,
}

/// One row of the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub display_title: String,
    pub remote_url: String,
    pub category: Category,
}

/// Everything the template needs
#[derive(Debug, Clone)]
pub struct Report {
    pub modpack_name: String,
    pub game: GameType,
    pub required: Vec<ReportEntry>,
    pub optional: Vec<ReportEntry>,
    pub dlc: Vec<ReportEntry>,
}

impl Report {
    pub fn row_count(&self) -> usize {
        self.required.len() + self.optional.len() + self.dlc.len()
    }
}

/// Look up workshop titles for every item with `role`.
///
/// Items whose page has no title are left out. Request failures are errors.
fn workshop_entries<P: WorkshopPages>(
    pages: &P,
    mods: &ModTable,
    role: ItemRole,
    category: Category,
) -> Result<Vec<ReportEntry>> {
    let mut entries = Vec::new();

    for item in mods.with_role(role) {
        let html = pages.details(&item.id)?;
        match extract_title(&html) {
            Some(title) => entries.push(ReportEntry {
                display_title: title,
                remote_url: pages.details_url(&item.id),
                category,
            }),
            None => debug!("No workshop title found for {}, omitting", item.label()),
        }
    }

    Ok(entries)
}

fn dlc_entries(dlc: &[DlcEntry], store_base_url: &str) -> Vec<ReportEntry> {
    dlc.iter()
        .map(|entry| ReportEntry {
            display_title: entry.name.clone(),
            remote_url: format!("{}/{}", store_base_url.trim_end_matches('/'), entry.app_id),
            category: Category::Dlc,
        })
        .collect()
}

/// Collect report rows. Server-only items are not listed.
pub fn build_report<P: WorkshopPages>(config: &UpdateConfig, pages: &P) -> Result<Report> {
    Ok(Report {
        modpack_name: config.modpack_name.clone(),
        game: config.game,
        required: workshop_entries(pages, &config.mods, ItemRole::Required, Category::Required)?,
        optional: workshop_entries(pages, &config.mods, ItemRole::Optional, Category::Optional)?,
        dlc: dlc_entries(&config.dlc, &config.store_base_url),
    })
}

/// Render and write the report, replacing any previous file
pub fn write_report(report: &Report, path: &Path) -> Result<()> {
    paths::ensure_parent_dirs(path)
        .with_context(|| format!("Failed to create directory for {}", path.display()))?;
    std::fs::write(path, render(report))
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    info!("Wrote {} report rows to {}", report.row_count(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::config::Settings;
    use crate::modlist::Item;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves a fixed title per item ID; IDs without one get a page with no title
    struct FakePages {
        titles: HashMap<&'static str, &'static str>,
        requested: RefCell<Vec<String>>,
    }

    impl FakePages {
        fn new(titles: &[(&'static str, &'static str)]) -> Self {
            Self {
                titles: titles.iter().copied().collect(),
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl WorkshopPages for FakePages {
        fn changelog(&self, _item_id: &str) -> Result<String> {
            unreachable!("report does not read changelogs")
        }

        fn details(&self, item_id: &str) -> Result<String> {
            self.requested.borrow_mut().push(item_id.to_string());
            Ok(match self.titles.get(item_id) {
                Some(title) => format!("<div class=\"workshopItemTitle\">{}</div>", title),
                None => "<html>Item not found</html>".to_string(),
            })
        }

        fn details_url(&self, item_id: &str) -> String {
            format!("http://steamcommunity.com/sharedfiles/filedetails/?id={}", item_id)
        }
    }

    fn config(items: Vec<Item>, dlc: Vec<DlcEntry>) -> UpdateConfig {
        Settings {
            items,
            dlc,
            ..Settings::default()
        }
        .into_config()
        .unwrap()
    }

    #[test]
    fn test_categories_and_missing_titles() {
        let config = config(
            vec![
                Item::new("cagny", "1"),
                Item::new("creully", "2"),
                Item::new("ramelle", "3").with_role(ItemRole::Optional),
                Item::new("ne_core", "4").with_role(ItemRole::ServerOnly),
            ],
            vec![DlcEntry {
                name: "Armoured Might".to_string(),
                app_id: "1043590".to_string(),
            }],
        );
        let pages = FakePages::new(&[("1", "Cagny"), ("3", "Ramelle"), ("4", "NE Core")]);

        let report = build_report(&config, &pages).unwrap();

        assert_eq!(report.required.len(), 1);
        assert_eq!(report.required[0].display_title, "Cagny");
        assert_eq!(
            report.required[0].remote_url,
            "http://steamcommunity.com/sharedfiles/filedetails/?id=1"
        );
        assert_eq!(report.optional.len(), 1);
        assert_eq!(report.optional[0].category, Category::Optional);
        assert_eq!(report.dlc.len(), 1);
        assert_eq!(report.dlc[0].remote_url, "https://store.steampowered.com/app/1043590");
        assert_eq!(report.row_count(), 3);

        // Server-only items are never looked up
        assert_eq!(*pages.requested.borrow(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_required_rows_match_titled_items() {
        let config = config(
            (1..=5).map(|i| Item::new(format!("map{}", i), i.to_string())).collect(),
            Vec::new(),
        );
        let pages = FakePages::new(&[("2", "Two"), ("4", "Four")]);

        let report = build_report(&config, &pages).unwrap();
        let titles: Vec<_> = report.required.iter().map(|e| e.display_title.as_str()).collect();
        assert_eq!(titles, vec!["Two", "Four"]);
    }

    #[test]
    fn test_write_report_replaces_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("out").join("modlist.html");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "old contents").unwrap();

        let config = config(vec![Item::new("cagny", "1")], Vec::new());
        let report = build_report(&config, &FakePages::new(&[("1", "Cagny")])).unwrap();
        write_report(&report, &path).unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(!html.contains("old contents"));
        assert!(html.contains("Cagny"));
    }
}
