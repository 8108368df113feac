//! Steam Workshop page scraping
//!
//! Two pages are read per item:
//! - the changelog page, for the most recent update timestamp
//! - the file details page, for the display title
//!
//! Both are plain HTML with no API contract, so extraction is a single
//! regex each and a miss is reported as `None` rather than an error.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use tracing::debug;

/// First announcement block on the changelog page, newest first
static UPDATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)workshopAnnouncement.*?<p id="(\d+)">"#).expect("valid update pattern")
});

static TITLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<div class="workshopItemTitle">(.*?)</div>"#).expect("valid title pattern")
});

/// Remote workshop pages
pub trait WorkshopPages {
    /// HTML of the item's changelog page
    fn changelog(&self, item_id: &str) -> Result<String>;

    /// HTML of the item's file details page
    fn details(&self, item_id: &str) -> Result<String>;

    /// Public URL of the details page, used for report links
    fn details_url(&self, item_id: &str) -> String;
}

/// `{base}/{id}`
pub fn changelog_url(base: &str, item_id: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), item_id)
}

/// `{base}?id={id}`
pub fn details_url(base: &str, item_id: &str) -> String {
    format!("{}?id={}", base, item_id)
}

/// Timestamp of the newest changelog entry
pub fn extract_updated_at(html: &str) -> Option<DateTime<Utc>> {
    let caps = UPDATE_PATTERN.captures(html)?;
    let secs: i64 = caps.get(1)?.as_str().parse().ok()?;
    DateTime::from_timestamp(secs, 0)
}

/// Display title from the details page
pub fn extract_title(html: &str) -> Option<String> {
    let caps = TITLE_PATTERN.captures(html)?;
    Some(caps.get(1)?.as_str().to_string())
}

/// Blocking HTTP client for the workshop pages
pub struct WorkshopClient {
    client: reqwest::blocking::Client,
    changelog_base: String,
    detail_base: String,
}

impl WorkshopClient {
    /// `timeout` of None waits on slow pages indefinitely
    pub fn new(changelog_base: &str, detail_base: &str, timeout: Option<Duration>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("workshop-sync/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            changelog_base: changelog_base.to_string(),
            detail_base: detail_base.to_string(),
        })
    }

    fn get_text(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Request to {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Request to {} failed", url))?;

        response
            .text()
            .with_context(|| format!("Failed to read response from {}", url))
    }
}

impl WorkshopPages for WorkshopClient {
    fn changelog(&self, item_id: &str) -> Result<String> {
        self.get_text(&changelog_url(&self.changelog_base, item_id))
    }

    fn details(&self, item_id: &str) -> Result<String> {
        self.get_text(&self.details_url(item_id))
    }

    fn details_url(&self, item_id: &str) -> String {
        details_url(&self.detail_base, item_id)
    }
}
