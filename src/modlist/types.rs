//! Workshop modlist types
//!
//! Serde definitions for the item table in the config file.

use serde::{Deserialize, Serialize};

/// How an item is treated by the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemRole {
    /// Clients need it to join the server
    #[default]
    Required,
    /// Listed separately in the report
    Optional,
    /// Only loaded by the server; left out of the report
    ServerOnly,
}

/// A single workshop item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Logical name, used as the symlink name in the mods directory
    pub name: String,
    /// Workshop file ID
    pub id: String,
    #[serde(default)]
    pub role: ItemRole,
}

impl Item {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            role: ItemRole::Required,
        }
    }

    pub fn with_role(mut self, role: ItemRole) -> Self {
        self.role = role;
        self
    }

    /// Human-readable label used in log lines: `"name" (id)`
    pub fn label(&self) -> String {
        format!("\"{}\" ({})", self.name, self.id)
    }
}

/// Downloadable content entry shown in the report's DLC table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DlcEntry {
    pub name: String,
    pub app_id: String,
}
