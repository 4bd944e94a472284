//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section has defaults, so a partial file (or none at all) still
//! yields a runnable configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::engine::ScoringConfig;
use crate::feed::winwin;
use crate::types::{BingoError, MAX_NUMBER};

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub feed: FeedConfig,
    pub scoring: ScoringConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeedConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Offset used to decide what "today" is for the feed.
    pub utc_offset_hours: i32,
    /// Append the previous day's draws when today has few.
    pub merge_previous_day: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: winwin::DEFAULT_BASE_URL.into(),
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into(),
            utc_offset_hours: 8,
            merge_previous_day: false,
        }
    }
}

impl FeedConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config = Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to built-in defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            info!(path, "No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parse and validate TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), BingoError> {
        if self.feed.timeout_secs == 0 {
            return Err(BingoError::Config("feed.timeout_secs must be positive".into()));
        }
        if !self.scoring.drag_weight.is_finite() || self.scoring.drag_weight < 0.0 {
            return Err(BingoError::Config(format!(
                "scoring.drag_weight must be a non-negative number, got {}",
                self.scoring.drag_weight
            )));
        }
        if let Some(plan) = self
            .scoring
            .squads
            .iter()
            .find(|p| p.count == 0 || p.count > MAX_NUMBER as usize)
        {
            return Err(BingoError::Config(format!(
                "squad plan '{}' must request between 1 and {MAX_NUMBER} squads, got {}",
                plan.name, plan.count
            )));
        }
        Ok(())
    }
}
