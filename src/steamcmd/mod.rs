//! SteamCMD integration
//!
//! Runs SteamCMD as a blocking subprocess to update the dedicated server and
//! download workshop items. SteamCMD's exit status is not a reliable signal
//! that an item landed on disk, so callers treat the returned `ToolOutcome`
//! as advisory and check the filesystem themselves.

mod finder;

pub use finder::{find_steamcmd, steamcmd_candidates};

use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, warn};

/// What the external tool reported for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolOutcome {
    /// Exited with status 0
    Success,
    /// Exited with a non-zero status
    Failure(i32),
    /// Could not be started, or was killed by a signal
    Unknown,
}

impl ToolOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success)
    }
}

impl std::fmt::Display for ToolOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolOutcome::Success => write!(f, "success"),
            ToolOutcome::Failure(code) => write!(f, "exit code {}", code),
            ToolOutcome::Unknown => write!(f, "unknown"),
        }
    }
}

/// Content-distribution tool capability
pub trait ContentTool {
    /// Install or update a Steam application (the dedicated server)
    fn update_app(&self, app_id: u32) -> ToolOutcome;

    /// Download (and validate) one workshop item
    fn download_item(&self, workshop_app_id: u32, item_id: &str) -> ToolOutcome;
}

/// SteamCMD runner bound to one install directory and login
#[derive(Debug, Clone)]
pub struct SteamCmd {
    executable: PathBuf,
    install_dir: PathBuf,
    login: String,
}

impl SteamCmd {
    pub fn new(executable: impl Into<PathBuf>, install_dir: impl Into<PathBuf>, login: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            install_dir: install_dir.into(),
            login: login.into(),
        }
    }

    /// Full argument list: install dir, login, the action, then quit.
    pub fn build_args(&self, action: &[String]) -> Vec<String> {
        let mut args = vec![
            "+force_install_dir".to_string(),
            self.install_dir.to_string_lossy().to_string(),
            "+login".to_string(),
            self.login.clone(),
        ];
        args.extend(action.iter().cloned());
        args.push("+quit".to_string());
        args
    }

    /// Arguments for `+app_update <app_id>`
    pub fn app_update_args(&self, app_id: u32) -> Vec<String> {
        self.build_args(&["+app_update".to_string(), app_id.to_string()])
    }

    /// Arguments for `+workshop_download_item <app_id> <item_id> validate`
    pub fn workshop_download_args(&self, workshop_app_id: u32, item_id: &str) -> Vec<String> {
        self.build_args(&[
            "+workshop_download_item".to_string(),
            workshop_app_id.to_string(),
            item_id.to_string(),
            "validate".to_string(),
        ])
    }

    /// Printable command line, for logs
    pub fn command_line(&self, args: &[String]) -> String {
        let mut line = self.executable.display().to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Run SteamCMD with inherited stdio and wait for it to exit
    fn run(&self, args: &[String]) -> ToolOutcome {
        debug!("Running: {}", self.command_line(args));

        let status = Command::new(&self.executable).args(args).status();

        // SteamCMD leaves the cursor mid-line
        println!();

        match status {
            Ok(status) => match status.code() {
                Some(0) => ToolOutcome::Success,
                Some(code) => {
                    debug!("SteamCMD exited with code {}", code);
                    ToolOutcome::Failure(code)
                }
                None => {
                    warn!("SteamCMD terminated by signal");
                    ToolOutcome::Unknown
                }
            },
            Err(e) => {
                warn!("Failed to run {}: {}", self.executable.display(), e);
                ToolOutcome::Unknown
            }
        }
    }
}

impl ContentTool for SteamCmd {
    fn update_app(&self, app_id: u32) -> ToolOutcome {
        self.run(&self.app_update_args(app_id))
    }

    fn download_item(&self, workshop_app_id: u32, item_id: &str) -> ToolOutcome {
        self.run(&self.workshop_download_args(workshop_app_id, item_id))
    }
}
