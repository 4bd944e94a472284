//! Scoring engine — draw history in, per-number scores and squads out.
//!
//! A pure function of its input: no I/O, no hidden state, no randomness.
//! The composite score for number `n` is
//!
//! ```text
//! (base + streak_bonus + exhaustion_penalty + drag) × parity_weight × size_weight + heat_penalty
//! ```
//!
//! rounded to one decimal, where `drag = drag_weight × Σ synergy(n, m)`
//! over the members `m` of the latest draw. A `drag_weight` of zero gives
//! the drag-free formula.

pub mod features;
pub mod squads;
pub mod synergy;
pub mod ticket;

use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::types::{Analysis, Draw, InvalidDrawError, NumberStat, SquadPlan, SquadSet, SquadSize, MAX_NUMBER};
use features::{EnvironmentWeights, NumberFeatures};
use synergy::CoOccurrenceMatrix;

/// Co-occurrence window.
pub const SYNERGY_WINDOW: usize = 100;

// ---------------------------------------------------------------------------
// Configuration (defaults — overridden by config.toml at runtime)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight of co-occurrence with the latest draw in the score.
    pub drag_weight: f64,
    /// Squad sets to generate for every analysis.
    pub squads: Vec<SquadPlan>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            drag_weight: 0.3,
            squads: vec![
                SquadPlan::new("6-star exclusive", SquadSize::Six, 10, true),
                SquadPlan::new("3-star", SquadSize::Three, 10, false),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score every number and build the configured squads.
    ///
    /// `draws` must be newest-first. An empty list yields
    /// [`Analysis::no_data`] rather than an error.
    pub fn analyze(&self, draws: &[Draw]) -> Analysis {
        let Some(latest) = draws.first() else {
            debug!("No draws supplied, returning empty analysis");
            return Analysis::no_data();
        };

        let matrix = CoOccurrenceMatrix::from_draws(draws, SYNERGY_WINDOW);
        let scores = self.score_numbers(draws, &matrix);

        let squad_sets: Vec<SquadSet> = self
            .config
            .squads
            .iter()
            .map(|plan| SquadSet {
                plan: plan.clone(),
                squads: squads::generate_squads(&scores, &matrix, plan),
            })
            .collect();

        info!(
            draws = draws.len(),
            synergy_draws = matrix.draws_considered(),
            squad_sets = squad_sets.len(),
            latest = %latest,
            "Analysis complete"
        );

        Analysis {
            draws_analyzed: draws.len(),
            latest_draw: Some(latest.clone()),
            scores,
            squad_sets,
        }
    }

    /// Validate raw number lists at the boundary, then analyze.
    pub fn analyze_raw(&self, raw: &[Vec<u32>]) -> Result<Analysis, InvalidDrawError> {
        let draws = raw
            .iter()
            .map(|nums| Draw::new(nums))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.analyze(&draws))
    }

    /// Per-number statistics for 1..=80. Empty when `draws` is empty.
    pub fn score_numbers(
        &self,
        draws: &[Draw],
        matrix: &CoOccurrenceMatrix,
    ) -> BTreeMap<u8, NumberStat> {
        let Some(latest) = draws.first() else {
            return BTreeMap::new();
        };
        let env = EnvironmentWeights::from_draws(draws);

        debug!(
            odd = env.odd_count,
            even = env.even_count(),
            small = env.small_count,
            big = env.big_count(),
            "Environment balance"
        );

        (1..=MAX_NUMBER)
            .map(|n| {
                let f = NumberFeatures::compute(n, draws);
                let drag = self.config.drag_weight * matrix.total_with(n, latest) as f64;

                let raw = (f.base as f64 + f.streak_bonus() + f.exhaustion_penalty() + drag)
                    * env.parity_weight(n)
                    * env.size_weight(n)
                    + f.heat_penalty();

                let stat = NumberStat {
                    number: n,
                    score: round1(raw),
                    omission: f.omission,
                    streak: f.streak,
                    base: f.base,
                    heat: f.heat,
                    drag: round1(drag),
                };
                (n, stat)
            })
            .collect()
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
