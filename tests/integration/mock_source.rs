//! Mock draw source for integration testing.
//!
//! Provides a deterministic `DrawSource` that serves canned draws per
//! date, records every requested date, and can be forced to fail, all
//! in-memory with no network access.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bingo_scout::feed::DrawSource;
use bingo_scout::types::Draw;

#[derive(Clone, Default)]
pub struct MockSource {
    days: Arc<Mutex<HashMap<NaiveDate, Vec<Draw>>>>,
    requests: Arc<Mutex<Vec<NaiveDate>>>,
    /// If set, every fetch returns this error.
    force_error: Arc<Mutex<Option<String>>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `draws` (newest-first) for `date`.
    pub fn with_day(self, date: NaiveDate, draws: Vec<Draw>) -> Self {
        self.days.lock().unwrap().insert(date, draws);
        self
    }

    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    /// Dates requested so far, in call order.
    pub fn requests(&self) -> Vec<NaiveDate> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DrawSource for MockSource {
    async fn fetch_draws(&self, date: NaiveDate) -> Result<Vec<Draw>> {
        self.requests.lock().unwrap().push(date);
        if let Some(msg) = self.force_error.lock().unwrap().clone() {
            return Err(anyhow!(msg));
        }
        Ok(self.days.lock().unwrap().get(&date).cloned().unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// A deterministic history of `len` draws: draw `i` holds 20 numbers
/// spaced by 4, rotated by `i * step`.
pub fn history(len: usize, step: u32) -> Vec<Draw> {
    (0..len)
        .map(|i| {
            let nums: Vec<u32> = (0..20u32)
                .map(|k| ((i as u32 * step + k * 4) % 80) + 1)
                .collect();
            Draw::new(&nums).unwrap()
        })
        .collect()
}

pub fn draw_of(nums: impl IntoIterator<Item = u32>) -> Draw {
    Draw::new(&nums.into_iter().collect::<Vec<_>>()).unwrap()
}
