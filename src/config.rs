//! # Bot Configuration Module
//!
//! This module defines the runtime configuration of the bot: the Telegram
//! token, the location of the static content, and the search backends.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

// Defaults matching the production container layout
pub const DEFAULT_FILES_DIR: &str = "/app/files";
pub const DEFAULT_SITE_SEARCH_URL: &str = "https://parkinnov.ru/";
pub const DEFAULT_GROUP_SEARCH_PYTHON: &str = "/app/venv/bin/python";
pub const DEFAULT_GROUP_SEARCH_SCRIPT: &str = "/app/search_script.py";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Locations of the static documents and photo albums
#[derive(Debug, Clone, PartialEq)]
pub struct ContentPaths {
    /// Directory holding the price list photos
    pub sales_photos: PathBuf,
    /// Directory holding the attraction price photos
    pub attraction_photos: PathBuf,
    /// Application form template sent as a document
    pub application_form: PathBuf,
}

impl ContentPaths {
    /// Derive the content layout from the root files directory
    pub fn under(files_dir: impl Into<PathBuf>) -> Self {
        let root = files_dir.into();
        Self {
            sales_photos: root.join("sales").join("photo"),
            attraction_photos: root.join("attr").join("photo"),
            application_form: root.join("sales").join("SHABLON.doc"),
        }
    }
}

impl Default for ContentPaths {
    fn default() -> Self {
        Self::under(DEFAULT_FILES_DIR)
    }
}

/// Site search backend settings
#[derive(Debug, Clone, PartialEq)]
pub struct SiteSearchConfig {
    /// Base URL receiving the `?s=` query
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for SiteSearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SITE_SEARCH_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

/// Group search script settings
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSearchConfig {
    pub python: PathBuf,
    pub script: PathBuf,
}

impl Default for GroupSearchConfig {
    fn default() -> Self {
        Self {
            python: PathBuf::from(DEFAULT_GROUP_SEARCH_PYTHON),
            script: PathBuf::from(DEFAULT_GROUP_SEARCH_SCRIPT),
        }
    }
}

/// Complete bot configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub content: ContentPaths,
    pub site_search: SiteSearchConfig,
    pub group_search: GroupSearchConfig,
}

impl BotConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    ///
    /// Only `BOT_TOKEN` is required; every other setting falls back to the
    /// production defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("BOT_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .context("BOT_TOKEN must be set")?;

        let files_dir = lookup("FILES_DIR").unwrap_or_else(|| DEFAULT_FILES_DIR.to_string());

        let timeout_secs = match lookup("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("HTTP_TIMEOUT_SECS is not a number: {raw}"))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            bot_token,
            content: ContentPaths::under(files_dir),
            site_search: SiteSearchConfig {
                base_url: lookup("SITE_SEARCH_URL")
                    .unwrap_or_else(|| DEFAULT_SITE_SEARCH_URL.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
            group_search: GroupSearchConfig {
                python: lookup("GROUP_SEARCH_PYTHON")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_GROUP_SEARCH_PYTHON)),
                script: lookup("GROUP_SEARCH_SCRIPT")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_GROUP_SEARCH_SCRIPT)),
            },
        })
    }
}
