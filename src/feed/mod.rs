//! Draw-history feeds.
//!
//! Defines the `DrawSource` trait, the date helpers used to pick a target
//! day, and the single-fallback fetch policy used by the dashboard.

pub mod winwin;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::types::Draw;

/// A full day has a little over 200 draws; below this the previous day is
/// worth merging in when merging is enabled.
pub const MERGE_TARGET: usize = 100;

/// Abstraction over draw-history providers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DrawSource: Send + Sync {
    /// Fetch every draw of `date`, newest-first.
    async fn fetch_draws(&self, date: NaiveDate) -> Result<Vec<Draw>>;

    /// Source name for logging.
    fn name(&self) -> &'static str;
}

/// The current calendar date at a fixed UTC offset.
pub fn today_at(offset_hours: i32) -> NaiveDate {
    let now = Utc::now();
    match FixedOffset::east_opt(offset_hours * 3600) {
        Some(offset) => now.with_timezone(&offset).date_naive(),
        None => {
            warn!(offset_hours, "Invalid UTC offset, using UTC");
            now.date_naive()
        }
    }
}

/// Fetch `date`, falling back once to the previous day.
///
/// The previous day is fetched when `date` fails or is empty, or, with
/// `merge_previous_day`, when `date` has fewer than [`MERGE_TARGET`] draws;
/// in that case its draws are appended after the target day's.
/// Failures degrade to an empty list.
pub async fn fetch_with_fallback(
    source: &dyn DrawSource,
    date: NaiveDate,
    merge_previous_day: bool,
) -> Vec<Draw> {
    let primary = fetch_logged(source, date).await;

    let short = merge_previous_day && primary.len() < MERGE_TARGET;
    if !primary.is_empty() && !short {
        return primary;
    }

    let Some(prior) = date.pred_opt() else {
        return primary;
    };

    let older = fetch_logged(source, prior).await;

    if primary.is_empty() {
        info!(
            source = source.name(),
            %date,
            fallback = %prior,
            draws = older.len(),
            "No draws for target date, using previous day"
        );
        return older;
    }

    debug!(
        source = source.name(),
        today = primary.len(),
        previous = older.len(),
        "Merging previous day"
    );
    let mut merged = primary;
    merged.extend(older);
    merged
}

async fn fetch_logged(source: &dyn DrawSource, date: NaiveDate) -> Vec<Draw> {
    match source.fetch_draws(date).await {
        Ok(draws) => {
            debug!(source = source.name(), %date, draws = draws.len(), "Draws fetched");
            draws
        }
        Err(e) => {
            warn!(source = source.name(), %date, error = %e, "Draw fetch failed");
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
