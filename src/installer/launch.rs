//! Server launch parameter string
//!
//! Mods are passed to the server as paths relative to its install root.

use crate::installer::config::UpdateConfig;
use crate::paths;

pub const LAUNCH_PARAMS_PREFIX: &str = "Copy this for launch params:  ";

/// `<rel>/<name><sep>` for every item, in table order
pub fn launch_params(config: &UpdateConfig) -> String {
    let mods_dir = paths::relative_to(&config.mods_dir, &config.server_dir)
        .unwrap_or_else(|| config.mods_dir.clone());
    let mods_dir = mods_dir.to_string_lossy();

    config
        .mods
        .iter()
        .map(|item| format!("{}/{}{}", mods_dir, item.name, config.launch_separator))
        .collect()
}

/// Print the launch parameters for copy-paste
pub fn print_launch_params(config: &UpdateConfig) {
    println!("{}{}", LAUNCH_PARAMS_PREFIX, launch_params(config));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::config::Settings;
    use crate::modlist::Item;
    use std::path::PathBuf;

    #[test]
    fn test_default_layout() {
        let config = Settings {
            items: vec![Item::new("cagny", "1"), Item::new("gh: dunkirk", "2")],
            ..Settings::default()
        }
        .into_config()
        .unwrap();

        assert_eq!(
            launch_params(&config),
            "PostScriptum/Plugins/Mods/cagny\\;PostScriptum/Plugins/Mods/gh: dunkirk\\;"
        );
    }

    #[test]
    fn test_custom_separator_and_outside_mods_dir() {
        let config = Settings {
            server_dir: PathBuf::from("/srv/ps"),
            mods_dir: Some(PathBuf::from("/srv/mods")),
            launch_separator: ";".to_string(),
            items: vec![Item::new("cagny", "1")],
            ..Settings::default()
        }
        .into_config()
        .unwrap();

        assert_eq!(launch_params(&config), "../mods/cagny;");
    }

    #[test]
    fn test_empty_table() {
        let config = Settings {
            items: Vec::new(),
            ..Settings::default()
        }
        .into_config()
        .unwrap();

        assert_eq!(launch_params(&config), "");
    }
}
