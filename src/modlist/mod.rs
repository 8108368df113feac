//! Workshop modlist
//!
//! This module handles:
//! - The ordered, validated table of workshop items
//! - The built-in item table used when no config file lists one

mod types;

pub use types::*;

use std::collections::HashSet;

use crate::installer::config::ConfigError;

/// Ordered list of workshop items with unique names.
///
/// Items are processed in table order by every step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModTable {
    items: Vec<Item>,
}

impl ModTable {
    /// Build a table, rejecting empty fields and duplicate names.
    ///
    /// Two names may share a workshop ID (e.g. a map pack linked twice).
    pub fn new(items: Vec<Item>) -> Result<Self, ConfigError> {
        let mut seen: HashSet<&str> = HashSet::new();

        for item in &items {
            if item.name.trim().is_empty() {
                return Err(ConfigError::EmptyItemName(item.id.clone()));
            }
            if item.id.trim().is_empty() {
                return Err(ConfigError::EmptyItemId(item.name.clone()));
            }
            if !item.id.chars().all(|c| c.is_ascii_digit()) {
                return Err(ConfigError::InvalidItemId {
                    name: item.name.clone(),
                    id: item.id.clone(),
                });
            }
            if !seen.insert(item.name.as_str()) {
                return Err(ConfigError::DuplicateItem(item.name.clone()));
            }
        }

        Ok(Self { items })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items with the given role, in table order
    pub fn with_role(&self, role: ItemRole) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(move |item| item.role == role)
    }
}

impl<'a> IntoIterator for &'a ModTable {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// The server's stock modlist.
pub fn default_items() -> Vec<Item> {
    [
        ("vehicle_armor_training", "2329787052"),
        ("psrm", "2329787052"),
        ("psrm_custom_maps", "2832715076"),
        ("project_variety", "2724056597"),
        ("longues_sur_mer", "2477584168"),
        ("ge_siegfried_line", "2766698808"),
        ("ge_battle_of_overloon", "2529532049"),
        ("creully", "2825158852"),
        ("cagny", "2684041969"),
        ("etreham", "2617682055"),
        ("targnon_363vd", "2723033451"),
        ("ob_mont_pincon", "2313344943"),
        ("sainte_marie_du_mont", "2412134525"),
        ("simonskall", "2382579481"),
        ("gh: bastogne", "2886181766"),
        ("gh: dunkirk", "2827466692"),
        ("houlgate", "2646717496"),
        ("saint-lo", "2845368691"),
        ("villersbocage", "2569424945"),
        ("cr_op_deadstick", "2576634813"),
        ("ne_core", "2455406986"),
        ("ramelle", "2387944294"),
    ]
    .into_iter()
    .map(|(name, id)| Item::new(name, id))
    .collect()
}
