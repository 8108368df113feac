//! workshop-sync - dedicated server and workshop mod updater

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use workshop_sync::installer::{RunStats, Settings, UpdateConfig, Updater};
use workshop_sync::modlist::ItemRole;

#[derive(Parser)]
#[command(name = "workshop-sync")]
#[command(version)]
#[command(about = "Updates a dedicated server and its workshop mods through SteamCMD")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: ~/.config/workshop-sync/config.json)
    #[arg(short, long, global = true, env = "WORKSHOP_SYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging (use RUST_LOG=debug for more detail)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every step: server, mods, lowercase, symlinks, report, launch params
    Run,

    /// Update the dedicated server only
    UpdateServer,

    /// Check and download workshop mods only
    UpdateMods,

    /// Lowercase all names under the workshop download directory
    Normalize,

    /// Symlink installed mods into the server's mods directory
    Link,

    /// Write the modpack HTML report
    Report,

    /// Print the server launch parameter string
    LaunchParams,

    /// List configured mods and whether they are installed
    List,

    /// Write a config file with the built-in defaults
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Console logging goes to stderr; a daily log file is kept when a data dir exists.
fn init_logging(verbose: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let console_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("workshop_sync=debug")
    } else {
        EnvFilter::new("workshop_sync=warn")
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let log_dir = dirs::data_local_dir().map(|d| d.join("workshop-sync").join("logs"));
    let (file_layer, guard) = match log_dir {
        Some(dir) if std::fs::create_dir_all(&dir).is_ok() => {
            let appender = tracing_appender::rolling::daily(&dir, "workshop-sync.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new("workshop_sync=info"));
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

fn print_summary(stats: &RunStats) {
    println!("\n=== Update Summary ===");
    if let Some(outcome) = stats.server_update {
        println!("Server:   {}", outcome);
    }
    println!(
        "Mods:     {} up to date, {} downloaded ({} replaced), {} failed",
        stats.mods.up_to_date, stats.mods.downloaded, stats.mods.replaced, stats.mods.failed
    );
    println!("Renamed:  {} entries", stats.renamed);
    println!(
        "Links:    {} created, {} existing, {} missing",
        stats.links.created, stats.links.existing, stats.links.missing
    );
    println!("Report:   {} rows", stats.report_rows);

    if !stats.mods.failed_mods.is_empty() {
        println!("\nFailed to download: {}", stats.mods.failed_mods.join(", "));
        println!("Run again to retry.");
    }
}

fn list_mods(config: &UpdateConfig) {
    println!("{:<28} {:>12}  {:<11} STATUS", "NAME", "ID", "ROLE");
    for item in &config.mods {
        let role = match item.role {
            ItemRole::Required => "required",
            ItemRole::Optional => "optional",
            ItemRole::ServerOnly => "server-only",
        };
        let status = if config.item_path(item).is_dir() {
            "installed"
        } else {
            "missing"
        };
        println!("{:<28} {:>12}  {:<11} {}", item.name, item.id, role, status);
    }
    println!("\nTotal: {} mods", config.mods.len());
}

fn init_config(explicit: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match explicit {
        Some(path) => path,
        None => Settings::default_path()?,
    };

    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    Settings::default().save(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Run);

    if let Commands::InitConfig { force } = command {
        return init_config(cli.config, force);
    }

    let config = Settings::load(cli.config.as_deref())?.into_config()?;
    tracing::info!(
        "Server: {} ({} mods configured)",
        config.server_dir.display(),
        config.mods.len()
    );

    if let Commands::List = command {
        list_mods(&config);
        return Ok(());
    }

    let updater = Updater::from_config(config)?;

    match command {
        Commands::Run => {
            let stats = updater.run()?;
            print_summary(&stats);
        }
        Commands::UpdateServer => {
            let outcome = updater.update_server();
            println!("Server update: {}", outcome);
        }
        Commands::UpdateMods => {
            let mods = updater.update_mods()?;
            print_summary(&RunStats {
                mods,
                ..RunStats::default()
            });
        }
        Commands::Normalize => {
            let renamed = updater.normalize();
            println!("Renamed {} entries", renamed);
        }
        Commands::Link => {
            let links = updater.link()?;
            println!(
                "{} created, {} existing, {} missing",
                links.created, links.existing, links.missing
            );
        }
        Commands::Report => {
            let rows = updater.generate_report()?;
            println!("Wrote {} rows to {}", rows, updater.config().report_path.display());
        }
        Commands::LaunchParams => updater.print_launch_params(),
        Commands::List | Commands::InitConfig { .. } => unreachable!("handled above"),
    }

    Ok(())
}
