//! Updater configuration
//!
//! `Settings` is the on-disk form, stored as JSON in
//! `~/.config/workshop-sync/config.json`. Every field falls back to the
//! compiled-in server layout, so a missing file means "use the defaults".
//! `UpdateConfig` is the validated form the updater runs with.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::games::{self, GameType};
use crate::installer::retry::RetryPolicy;
use crate::modlist::{default_items, DlcEntry, Item, ModTable};

pub const DEFAULT_CHANGELOG_URL: &str = "https://steamcommunity.com/sharedfiles/filedetails/changelog";
pub const DEFAULT_DETAIL_URL: &str = "http://steamcommunity.com/sharedfiles/filedetails/";
pub const DEFAULT_STORE_URL: &str = "https://store.steampowered.com/app";

/// User settings for the updater
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Which dedicated server is being maintained
    pub game: GameType,

    /// Server install root (SteamCMD `force_install_dir`)
    pub server_dir: PathBuf,

    /// Directory symlinks are created in. Defaults to the game's mods folder under `server_dir`.
    pub mods_dir: Option<PathBuf>,

    /// Path to steamcmd.sh
    pub steamcmd_path: PathBuf,

    /// Steam account used for downloads
    pub steam_user: String,

    /// Title shown in the generated report
    pub modpack_name: String,

    /// Where the HTML report is written
    pub report_path: PathBuf,

    pub changelog_base_url: String,
    pub detail_base_url: String,
    pub store_base_url: String,

    /// Download attempts per item before giving up
    pub max_attempts: u32,

    /// Pause after each download attempt, in seconds
    pub retry_delay_secs: u64,

    /// Overall timeout for page requests. None waits forever.
    pub http_timeout_secs: Option<u64>,

    /// Appended after every entry of the launch parameter string
    pub launch_separator: String,

    /// Workshop items, in processing order
    pub items: Vec<Item>,

    /// DLC listed in the report
    pub dlc: Vec<DlcEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game: GameType::PostScriptum,
            server_dir: PathBuf::from("/home/psserver/serverfiles"),
            mods_dir: None,
            steamcmd_path: PathBuf::from("/home/psserver/.steam/steamcmd/steamcmd.sh"),
            steam_user: "anonymous".to_string(),
            modpack_name: "[Pibbz] Post Scriptum Server Modlist".to_string(),
            report_path: PathBuf::from("/home/psserver/Pibbz Post Scriptum Server Modlist.html"),
            changelog_base_url: DEFAULT_CHANGELOG_URL.to_string(),
            detail_base_url: DEFAULT_DETAIL_URL.to_string(),
            store_base_url: DEFAULT_STORE_URL.to_string(),
            max_attempts: 10,
            retry_delay_secs: 5,
            http_timeout_secs: None,
            launch_separator: "\\;".to_string(),
            items: default_items(),
            dlc: Vec::new(),
        }
    }
}

impl Settings {
    /// Get the config directory path (~/.config/workshop-sync)
    fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("workshop-sync");

        Ok(config_dir)
    }

    /// Get the default settings file path
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load settings.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// tried and a missing file yields the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::default_path()?;
                if !path.exists() {
                    tracing::debug!("No config at {:?}, using built-in defaults", path);
                    return Ok(Self::default());
                }
                Self::load_from(&path)
            }
        }
    }

    /// Read and parse a settings file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

        let settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;

        tracing::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to disk, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;

        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Validate the settings and resolve derived paths
    pub fn into_config(self) -> Result<UpdateConfig, ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.steam_user.trim().is_empty() {
            return Err(ConfigError::MissingSteamUser);
        }

        let mods = ModTable::new(self.items)?;
        let workshop_dir = games::workshop_content_dir(&self.server_dir, self.game);
        let mods_dir = self
            .mods_dir
            .unwrap_or_else(|| self.server_dir.join(self.game.mods_subdir()));

        Ok(UpdateConfig {
            game: self.game,
            server_dir: self.server_dir,
            workshop_dir,
            mods_dir,
            steamcmd_path: self.steamcmd_path,
            steam_user: self.steam_user,
            modpack_name: self.modpack_name,
            report_path: self.report_path,
            changelog_base_url: self.changelog_base_url,
            detail_base_url: self.detail_base_url,
            store_base_url: self.store_base_url,
            retry: RetryPolicy {
                max_attempts: self.max_attempts,
                delay: Duration::from_secs(self.retry_delay_secs),
            },
            http_timeout: self.http_timeout_secs.map(Duration::from_secs),
            launch_separator: self.launch_separator,
            mods,
            dlc: self.dlc,
        })
    }
}

/// Validated configuration for an update run
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    pub game: GameType,
    pub server_dir: PathBuf,
    /// `<server_dir>/steamapps/workshop/content/<workshop_app_id>`
    pub workshop_dir: PathBuf,
    pub mods_dir: PathBuf,
    pub steamcmd_path: PathBuf,
    pub steam_user: String,
    pub modpack_name: String,
    pub report_path: PathBuf,
    pub changelog_base_url: String,
    pub detail_base_url: String,
    pub store_base_url: String,
    pub retry: RetryPolicy,
    pub http_timeout: Option<Duration>,
    pub launch_separator: String,
    pub mods: ModTable,
    pub dlc: Vec<DlcEntry>,
}

impl UpdateConfig {
    /// Where SteamCMD puts a workshop item
    pub fn item_path(&self, item: &Item) -> PathBuf {
        self.workshop_dir.join(&item.id)
    }

    /// Symlink location for an item in the mods directory
    pub fn link_path(&self, item: &Item) -> PathBuf {
        self.mods_dir.join(&item.name)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Duplicate mod name in item table: {0}")]
    DuplicateItem(String),

    #[error("Item with ID {0} has an empty name")]
    EmptyItemName(String),

    #[error("Item '{0}' has an empty workshop ID")]
    EmptyItemId(String),

    #[error("Item '{name}' has a non-numeric workshop ID: {id}")]
    InvalidItemId { name: String, id: String },

    #[error("max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("Steam user is required (use \"anonymous\" for public items)")]
    MissingSteamUser,
}
