//! WinWin Bingo draw-history feed.
//!
//! API: `GET {base}/Bingo/GetBingoData?date=YYYY-MM-DD`
//! Auth: None, but the endpoint only answers requests that look like the
//! site's own XHR calls (browser User-Agent, Referer, X-Requested-With).
//! Response: JSON array, newest draw first. Each record carries the drawn
//! numbers as a comma-separated string in `BigShowOrder`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::DrawSource;
use crate::types::{Draw, BingoError};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub const DEFAULT_BASE_URL: &str = "https://winwin.tw";
const SOURCE_NAME: &str = "winwin";

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

/// One draw record. Only the numbers are needed.
#[derive(Debug, Deserialize)]
struct WinWinRecord {
    #[serde(rename = "BigShowOrder", default)]
    big_show_order: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct WinWinClient {
    http: Client,
    base_url: String,
}

impl WinWinClient {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        let referer = HeaderValue::from_str(&format!("{base_url}/Bingo"))
            .context("Invalid feed base URL for Referer header")?;
        headers.insert(REFERER, referer);
        headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client for WinWin")?;

        Ok(Self { http, base_url })
    }

    fn draws_url(&self, date: NaiveDate) -> String {
        format!(
            "{}/Bingo/GetBingoData?date={}",
            self.base_url,
            date.format("%Y-%m-%d")
        )
    }

    /// Turn a response body into draws, skipping records that are not a
    /// valid 20-number draw.
    fn parse_body(body: serde_json::Value) -> Result<Vec<Draw>, BingoError> {
        let records: Vec<WinWinRecord> = match body {
            serde_json::Value::Array(_) => {
                serde_json::from_value(body).map_err(|e| BingoError::Feed {
                    source_name: SOURCE_NAME.into(),
                    message: format!("unexpected record shape: {e}"),
                })?
            }
            serde_json::Value::Null => Vec::new(),
            other => {
                return Err(BingoError::Feed {
                    source_name: SOURCE_NAME.into(),
                    message: format!("expected a JSON array, got {}", json_kind(&other)),
                })
            }
        };

        let mut draws = Vec::with_capacity(records.len());
        for (idx, record) in records.into_iter().enumerate() {
            let Some(order) = record.big_show_order.filter(|s| !s.trim().is_empty()) else {
                continue;
            };
            let numbers: Vec<u32> = order
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty() && t.chars().all(|c| c.is_ascii_digit()))
                .filter_map(|t| t.parse().ok())
                .collect();

            match Draw::new(&numbers) {
                Ok(draw) => draws.push(draw),
                Err(e) => warn!(record = idx, error = %e, "Skipping malformed draw record"),
            }
        }

        Ok(draws)
    }
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[async_trait]
impl DrawSource for WinWinClient {
    async fn fetch_draws(&self, date: NaiveDate) -> Result<Vec<Draw>> {
        let url = self.draws_url(date);
        debug!(url = %url, "Fetching WinWin draws");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("WinWin request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("WinWin API error {status}: {body}");
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .context("Failed to parse WinWin response")?;

        let draws = Self::parse_body(body)?;
        debug!(%date, draws = draws.len(), "WinWin draws parsed");
        Ok(draws)
    }

    fn name(&self) -> &'static str {
        SOURCE_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
