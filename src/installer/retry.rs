//! Workshop item download with bounded retries
//!
//! SteamCMD regularly exits without having written the item (timeouts,
//! partial downloads, rate limits), and its exit code cannot be trusted
//! either way. The only signal used here is whether the item directory
//! exists after an attempt:
//!
//! ```text
//! Absent -> Downloading -> Present
//!                       -> Failed   (budget exhausted)
//! ```
//!
//! A stale installation is deleted before downloading so that "directory
//! exists" keeps meaning "download complete".

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::console;
use crate::installer::staleness::StalenessCheck;
use crate::modlist::Item;
use crate::steamcmd::ContentTool;

/// Retry budget for one item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Download attempts before the item is marked failed
    pub max_attempts: u32,
    /// Pause after every attempt, leaving a window to Ctrl-C between SteamCMD runs
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_secs(5),
        }
    }
}

/// Download state of one item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Absent,
    Downloading,
    Present,
    Failed,
}

/// Per-item attempt counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryState {
    pub attempts_made: u32,
    pub succeeded: bool,
}

/// Result of processing one item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Installed and no newer changelog entry
    UpToDate,
    /// Directory appeared after `attempts` tries
    Downloaded { attempts: u32, replaced: bool },
    /// Directory still missing after the whole budget
    Failed { attempts: u32, replaced: bool },
}

impl FetchOutcome {
    pub fn state(&self) -> FetchState {
        match self {
            FetchOutcome::UpToDate | FetchOutcome::Downloaded { .. } => FetchState::Present,
            FetchOutcome::Failed { .. } => FetchState::Failed,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            FetchOutcome::UpToDate => 0,
            FetchOutcome::Downloaded { attempts, .. } | FetchOutcome::Failed { attempts, .. } => *attempts,
        }
    }
}

/// Banner text printed before every attempt
pub fn attempt_message(item: &Item, attempt: u32) -> String {
    format!("Updating {} | {}", item.label(), attempt)
}

/// Banner text printed when the budget runs out
pub fn failure_message(item: &Item, attempts: u32) -> String {
    format!("!! Updating {} failed after {} tries !!", item.name, attempts)
}

/// Drives one item at a time through the download state machine
pub struct ItemFetcher<'a, T: ContentTool, S: StalenessCheck> {
    tool: &'a T,
    staleness: &'a S,
    policy: RetryPolicy,
    workshop_app_id: u32,
}

impl<'a, T: ContentTool, S: StalenessCheck> ItemFetcher<'a, T, S> {
    pub fn new(tool: &'a T, staleness: &'a S, policy: RetryPolicy, workshop_app_id: u32) -> Self {
        Self {
            tool,
            staleness,
            policy,
            workshop_app_id,
        }
    }

    /// Make sure `item` is installed at `path` and current.
    ///
    /// Errors only come from the staleness check or from deleting a stale
    /// copy. A download that never materializes is `FetchOutcome::Failed`.
    pub fn fetch(&self, item: &Item, path: &Path) -> Result<FetchOutcome> {
        self.fetch_to(item, path, &mut std::io::stdout())
    }

    /// Like [`fetch`](Self::fetch), writing progress banners to `out`.
    pub fn fetch_to<W: Write + ?Sized>(&self, item: &Item, path: &Path, out: &mut W) -> Result<FetchOutcome> {
        let mut replaced = false;

        if path.is_dir() {
            if !self.staleness.is_stale(item, path)? {
                writeln!(out, "No update required for {}... SKIPPING", item.label())?;
                return Ok(FetchOutcome::UpToDate);
            }

            info!("{} has a newer workshop version, removing {}", item.label(), path.display());
            std::fs::remove_dir_all(path)
                .with_context(|| format!("Failed to remove stale install: {}", path.display()))?;
            replaced = true;
        }

        let mut retry = RetryState::default();
        debug!("{} is {:?}", item.label(), FetchState::Absent);

        while !path.is_dir() && retry.attempts_made < self.policy.max_attempts {
            debug!("{} is {:?}", item.label(), FetchState::Downloading);
            console::write_banner(out, &attempt_message(item, retry.attempts_made + 1))?;
            out.flush()?;

            let outcome = self.tool.download_item(self.workshop_app_id, &item.id);
            debug!("SteamCMD reported {} for {}", outcome, item.label());

            std::thread::sleep(self.policy.delay);
            retry.attempts_made += 1;
        }

        retry.succeeded = path.is_dir();
        let state = if retry.succeeded { FetchState::Present } else { FetchState::Failed };
        debug!("{} finished in state {:?} after {} attempts", item.label(), state, retry.attempts_made);

        if !retry.succeeded {
            console::write_banner(out, &failure_message(item, retry.attempts_made))?;
            warn!("{} not downloaded after {} attempts", item.label(), retry.attempts_made);
            return Ok(FetchOutcome::Failed {
                attempts: retry.attempts_made,
                replaced,
            });
        }

        Ok(FetchOutcome::Downloaded {
            attempts: retry.attempts_made,
            replaced,
        })
    }
}
