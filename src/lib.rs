//! workshop-sync - dedicated server and workshop mod updater
//!
//! Drives SteamCMD to keep a dedicated server and its workshop mods current,
//! then lays the mods out for the server and writes a modpack report.

pub mod console;
pub mod games;
pub mod installer;
pub mod modlist;
pub mod paths;
pub mod report;
pub mod steamcmd;
pub mod workshop;
