//! SteamCMD detection
//!
//! Falls back to the usual install locations when the configured path is missing.

use std::path::{Path, PathBuf};

/// Well-known SteamCMD locations under a home directory
pub fn steamcmd_candidates(home: &Path) -> Vec<PathBuf> {
    vec![
        home.join(".steam/steamcmd/steamcmd.sh"),
        home.join("steamcmd/steamcmd.sh"),
        home.join(".local/share/Steam/steamcmd/steamcmd.sh"),
        home.join("Steam/steamcmd.sh"),
        PathBuf::from("/usr/games/steamcmd"),
    ]
}

/// Resolve the SteamCMD executable.
///
/// Order: the configured path, the well-known locations, then `steamcmd` on PATH.
pub fn find_steamcmd(configured: &Path) -> Option<PathBuf> {
    if configured.is_file() {
        return Some(configured.to_path_buf());
    }

    let home = dirs::home_dir();
    let candidates = home.as_deref().map(steamcmd_candidates).unwrap_or_default();
    if let Some(found) = candidates.into_iter().find(|p| p.is_file()) {
        tracing::info!("Using SteamCMD at {}", found.display());
        return Some(found);
    }

    which::which("steamcmd").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_path_wins() {
        let temp = tempfile::tempdir().unwrap();
        let exe = temp.path().join("steamcmd.sh");
        std::fs::write(&exe, "#!/bin/sh\n").unwrap();

        assert_eq!(find_steamcmd(&exe), Some(exe));
    }

    #[test]
    fn test_candidates_are_under_home() {
        let candidates = steamcmd_candidates(Path::new("/home/psserver"));
        assert_eq!(candidates[0], PathBuf::from("/home/psserver/.steam/steamcmd/steamcmd.sh"));
        assert!(candidates.iter().any(|p| p.ends_with("steamcmd/steamcmd.sh")));
    }
}
