//! Update orchestrator
//!
//! Runs the phases of a server update in order:
//! 1. Server: SteamCMD `app_update` for the dedicated server
//! 2. Mods: check, delete stale, download with retries
//! 3. Normalize: lowercase the workshop download tree
//! 4. Link: symlink each item into the mods directory
//! 5. Report: write the modpack HTML page
//! 6. Launch: print the launch parameter string
//!
//! A mod that fails to download is reported and skipped. Network and
//! filesystem errors outside the retry loop abort the run.

pub mod config;
pub mod launch;
pub mod links;
pub mod normalize;
pub mod retry;
pub mod staleness;

pub use config::{ConfigError, Settings, UpdateConfig};
pub use links::LinkStats;
pub use retry::{FetchOutcome, FetchState, ItemFetcher, RetryPolicy, RetryState};
pub use staleness::{ChangelogCheck, StalenessCheck};

use anyhow::{Context, Result};
use std::time::Instant;
use tracing::{info, warn};

use crate::console::print_banner;
use crate::report;
use crate::steamcmd::{find_steamcmd, ContentTool, SteamCmd, ToolOutcome};
use crate::workshop::{WorkshopClient, WorkshopPages};

fn log_phase_metrics(phase: &str, started: Instant) {
    info!(
        "Phase done: phase='{}' elapsed_ms={}",
        phase,
        started.elapsed().as_millis()
    );
}

/// Mod download statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ModUpdateStats {
    pub up_to_date: usize,
    pub downloaded: usize,
    /// Downloads that replaced a stale install
    pub replaced: usize,
    pub failed: usize,
    /// Names of mods that never appeared on disk
    pub failed_mods: Vec<String>,
}

/// Run statistics
#[derive(Debug, Default, Clone)]
pub struct RunStats {
    pub server_update: Option<ToolOutcome>,
    pub mods: ModUpdateStats,
    pub renamed: usize,
    pub links: LinkStats,
    pub report_rows: usize,
}

/// Main update orchestrator
pub struct Updater<T: ContentTool, P: WorkshopPages> {
    config: UpdateConfig,
    tool: T,
    pages: P,
}

impl Updater<SteamCmd, WorkshopClient> {
    /// Updater backed by the real SteamCMD and Steam Community pages
    pub fn from_config(config: UpdateConfig) -> Result<Self> {
        let steamcmd_path = match find_steamcmd(&config.steamcmd_path) {
            Some(path) => path,
            None => {
                warn!(
                    "SteamCMD not found at {}, downloads will fail",
                    config.steamcmd_path.display()
                );
                config.steamcmd_path.clone()
            }
        };

        let tool = SteamCmd::new(steamcmd_path, &config.server_dir, &config.steam_user);
        let pages = WorkshopClient::new(
            &config.changelog_base_url,
            &config.detail_base_url,
            config.http_timeout,
        )?;

        Ok(Self::new(config, tool, pages))
    }
}

impl<T: ContentTool, P: WorkshopPages> Updater<T, P> {
    pub fn new(config: UpdateConfig, tool: T, pages: P) -> Self {
        Self { config, tool, pages }
    }

    pub fn config(&self) -> &UpdateConfig {
        &self.config
    }

    /// Install or update the dedicated server itself
    pub fn update_server(&self) -> ToolOutcome {
        let started = Instant::now();
        print_banner(&format!(
            "Updating {} server ({})",
            self.config.game,
            self.config.game.server_app_id()
        ));

        let outcome = self.tool.update_app(self.config.game.server_app_id());
        if !outcome.is_success() {
            warn!("Server update finished with {}", outcome);
        }

        log_phase_metrics("Server", started);
        outcome
    }

    /// Bring every mod up to date, in table order
    pub fn update_mods(&self) -> Result<ModUpdateStats> {
        let started = Instant::now();
        print_banner("Updating mods");

        let staleness = ChangelogCheck::new(&self.pages);
        let fetcher = ItemFetcher::new(
            &self.tool,
            &staleness,
            self.config.retry,
            self.config.game.workshop_app_id(),
        );

        let mut stats = ModUpdateStats::default();

        for item in &self.config.mods {
            let path = self.config.item_path(item);
            let outcome = fetcher
                .fetch(item, &path)
                .with_context(|| format!("Failed to update {}", item.label()))?;

            match outcome {
                FetchOutcome::UpToDate => stats.up_to_date += 1,
                FetchOutcome::Downloaded { replaced, .. } => {
                    stats.downloaded += 1;
                    if replaced {
                        stats.replaced += 1;
                    }
                }
                FetchOutcome::Failed { .. } => {
                    stats.failed += 1;
                    stats.failed_mods.push(item.name.clone());
                }
            }
        }

        log_phase_metrics("Mods", started);
        Ok(stats)
    }

    /// Lowercase the workshop download tree
    pub fn normalize(&self) -> usize {
        let started = Instant::now();
        print_banner("Converting uppercase files/folders to lowercase...");

        let renamed = normalize::lowercase_tree(&self.config.workshop_dir);
        info!("Renamed {} entries under {}", renamed, self.config.workshop_dir.display());

        log_phase_metrics("Normalize", started);
        renamed
    }

    /// Symlink installed mods into the mods directory
    pub fn link(&self) -> Result<LinkStats> {
        let started = Instant::now();
        print_banner("Creating symlinks...");

        let stats = links::create_mod_links(&self.config)?;

        log_phase_metrics("Link", started);
        Ok(stats)
    }

    /// Write the modpack report; returns the number of rows
    pub fn generate_report(&self) -> Result<usize> {
        let started = Instant::now();
        print_banner("Generating modpack .html file...");

        let report = report::build_report(&self.config, &self.pages)?;
        report::write_report(&report, &self.config.report_path)?;

        log_phase_metrics("Report", started);
        Ok(report.row_count())
    }

    pub fn print_launch_params(&self) {
        print_banner("Printing launch params...");
        launch::print_launch_params(&self.config);
    }

    /// Run every phase in order
    pub fn run(&self) -> Result<RunStats> {
        let mut stats = RunStats {
            server_update: Some(self.update_server()),
            ..RunStats::default()
        };

        stats.mods = self.update_mods()?;
        stats.renamed = self.normalize();
        stats.links = self.link()?;
        stats.report_rows = self.generate_report()?;
        self.print_launch_params();

        print_banner("Done!");
        Ok(stats)
    }
}
