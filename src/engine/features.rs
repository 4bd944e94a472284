//! Per-number features and environmental compensation weights.

use crate::types::Draw;

// ---------------------------------------------------------------------------
// Windows and constants
// ---------------------------------------------------------------------------

/// Long-run frequency window.
pub const BASE_WINDOW: usize = 50;

/// Short-term overrepresentation window.
pub const HEAT_WINDOW: usize = 15;

/// Window for the odd/even and small/big balance.
pub const ENVIRONMENT_WINDOW: usize = 20;

/// Omission reported for numbers absent from every supplied draw.
pub const OMISSION_SENTINEL: u32 = 99;

/// Number slots in a full environment window (20 draws × 20 numbers).
pub const ENVIRONMENT_SLOTS: usize = 400;

/// A side is under-represented at or below this count (40% of 400).
/// Fixed, even when fewer than 20 draws are available.
pub const UNDER_THRESHOLD: usize = 160;

/// Multiplier applied to numbers on an under-represented side.
const COMPENSATION_WEIGHT: f64 = 1.2;

/// Numbers at or below this are "small".
const SMALL_MAX: u8 = 40;

const EXHAUSTION_STREAK: u32 = 3;
const EXHAUSTION_PENALTY: f64 = -15.0;
const HEAT_PENALTY_PER_HIT: f64 = -2.0;

// ---------------------------------------------------------------------------
// Number features
// ---------------------------------------------------------------------------

/// Raw recency and frequency features for one number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFeatures {
    pub number: u8,
    pub base: u32,
    pub streak: u32,
    pub heat: u32,
    pub omission: u32,
}

impl NumberFeatures {
    /// Compute features for `number` from newest-first draws.
    pub fn compute(number: u8, draws: &[Draw]) -> Self {
        let count_in = |window: usize| -> u32 {
            draws
                .iter()
                .take(window)
                .filter(|d| d.contains(number))
                .count() as u32
        };

        let streak = draws.iter().take_while(|d| d.contains(number)).count() as u32;

        let omission = draws
            .iter()
            .position(|d| d.contains(number))
            .map(|idx| idx as u32)
            .unwrap_or(OMISSION_SENTINEL);

        Self {
            number,
            base: count_in(BASE_WINDOW),
            streak,
            heat: count_in(HEAT_WINDOW),
            omission,
        }
    }

    /// Reward for a fresh appearance: +5 after one hit, +2 after two.
    pub fn streak_bonus(&self) -> f64 {
        match self.streak {
            1 => 5.0,
            2 => 2.0,
            _ => 0.0,
        }
    }

    /// Hard cutoff for numbers that look due for a miss.
    pub fn exhaustion_penalty(&self) -> f64 {
        if self.streak >= EXHAUSTION_STREAK {
            EXHAUSTION_PENALTY
        } else {
            0.0
        }
    }

    pub fn heat_penalty(&self) -> f64 {
        HEAT_PENALTY_PER_HIT * self.heat as f64
    }
}

// ---------------------------------------------------------------------------
// Environmental weights
// ---------------------------------------------------------------------------

/// Parity and size balance of the recent draws.
///
/// When one side (odd/even, small/big) counts at most 160 of the 400
/// slots, numbers on that side get a 1.2 multiplier. Both can apply.
/// The missing side of a short window counts toward even and big.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentWeights {
    pub odd_count: usize,
    pub small_count: usize,
}

impl EnvironmentWeights {
    pub fn from_draws(draws: &[Draw]) -> Self {
        let recent = &draws[..draws.len().min(ENVIRONMENT_WINDOW)];
        let mut odd_count = 0;
        let mut small_count = 0;

        for n in recent.iter().flat_map(|d| d.numbers().iter().copied()) {
            if n % 2 == 1 {
                odd_count += 1;
            }
            if n <= SMALL_MAX {
                small_count += 1;
            }
        }

        Self {
            odd_count,
            small_count,
        }
    }

    pub fn even_count(&self) -> usize {
        ENVIRONMENT_SLOTS - self.odd_count
    }

    pub fn big_count(&self) -> usize {
        ENVIRONMENT_SLOTS - self.small_count
    }

    fn under_threshold(count: usize) -> bool {
        count <= UNDER_THRESHOLD
    }

    pub fn odd_under(&self) -> bool {
        Self::under_threshold(self.odd_count)
    }

    pub fn even_under(&self) -> bool {
        Self::under_threshold(self.even_count())
    }

    pub fn small_under(&self) -> bool {
        Self::under_threshold(self.small_count)
    }

    pub fn big_under(&self) -> bool {
        Self::under_threshold(self.big_count())
    }

    pub fn parity_weight(&self, n: u8) -> f64 {
        let under = if n % 2 == 1 {
            self.odd_under()
        } else {
            self.even_under()
        };
        if under {
            COMPENSATION_WEIGHT
        } else {
            1.0
        }
    }

    pub fn size_weight(&self, n: u8) -> f64 {
        let under = if n <= SMALL_MAX {
            self.small_under()
        } else {
            self.big_under()
        };
        if under {
            COMPENSATION_WEIGHT
        } else {
            1.0
        }
    }
}
