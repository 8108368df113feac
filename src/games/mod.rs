//! Game type definitions.
//!
//! This module defines supported dedicated servers and the Steam IDs and
//! paths they are installed under.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported game servers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    /// Post Scriptum dedicated server
    #[default]
    PostScriptum,
}

impl GameType {
    /// Returns the display name for this game.
    pub fn name(&self) -> &'static str {
        match self {
            GameType::PostScriptum => "Post Scriptum",
        }
    }

    /// Returns the Steam App ID of the dedicated server.
    pub fn server_app_id(&self) -> u32 {
        match self {
            GameType::PostScriptum => 746200,
        }
    }

    /// Returns the Steam App ID workshop items are published under.
    pub fn workshop_app_id(&self) -> u32 {
        match self {
            GameType::PostScriptum => 736220,
        }
    }

    /// Returns the mods directory relative to the server root.
    pub fn mods_subdir(&self) -> &'static str {
        match self {
            GameType::PostScriptum => "PostScriptum/Plugins/Mods",
        }
    }
}

impl std::fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Workshop content directory SteamCMD downloads items into.
///
/// `<server_dir>/steamapps/workshop/content/<workshop_app_id>`
pub fn workshop_content_dir(server_dir: &Path, game_type: GameType) -> std::path::PathBuf {
    server_dir
        .join("steamapps")
        .join("workshop")
        .join("content")
        .join(game_type.workshop_app_id().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_game_type_properties() {
        let game = GameType::PostScriptum;
        assert_eq!(game.name(), "Post Scriptum");
        assert_eq!(game.server_app_id(), 746200);
        assert_eq!(game.workshop_app_id(), 736220);
        assert_eq!(game.mods_subdir(), "PostScriptum/Plugins/Mods");
    }

    #[test]
    fn test_game_type_display() {
        assert_eq!(GameType::PostScriptum.to_string(), "Post Scriptum");
    }

    #[test]
    fn test_default_game() {
        assert_eq!(GameType::default(), GameType::PostScriptum);
    }

    #[test]
    fn test_serde_name() {
        let json = serde_json::to_string(&GameType::PostScriptum).unwrap();
        assert_eq!(json, "\"post_scriptum\"");
    }

    #[test]
    fn test_workshop_content_dir() {
        let dir = workshop_content_dir(Path::new("/srv/ps"), GameType::PostScriptum);
        assert_eq!(
            dir,
            PathBuf::from("/srv/ps/steamapps/workshop/content/736220")
        );
    }
}
