//! Shared types for the Bingo scout.
//!
//! These types form the data model used across all modules. The engine,
//! feed and dashboard all depend on them without depending on each other.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Highest ball number in a draw.
pub const MAX_NUMBER: u8 = 80;

/// Numbers drawn per game.
pub const NUMBERS_PER_DRAW: usize = 20;

// ---------------------------------------------------------------------------
// Draw
// ---------------------------------------------------------------------------

/// One historical Bingo outcome: 20 distinct numbers in 1..=80.
///
/// Construction is the validation boundary, so every `Draw` in the
/// program is well-formed. Numbers keep the order the feed reported them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u8>")]
pub struct Draw {
    numbers: Vec<u8>,
    /// Bit `n` is set when number `n` is present.
    mask: u128,
}

impl Draw {
    /// Validate and build a draw.
    pub fn new(numbers: &[u32]) -> Result<Self, InvalidDrawError> {
        if numbers.len() != NUMBERS_PER_DRAW {
            return Err(InvalidDrawError::WrongLength {
                expected: NUMBERS_PER_DRAW,
                actual: numbers.len(),
            });
        }

        let mut mask = 0u128;
        let mut out = Vec::with_capacity(NUMBERS_PER_DRAW);
        for &n in numbers {
            if n == 0 || n > MAX_NUMBER as u32 {
                return Err(InvalidDrawError::OutOfRange(n));
            }
            let bit = 1u128 << n;
            if mask & bit != 0 {
                return Err(InvalidDrawError::Duplicate(n as u8));
            }
            mask |= bit;
            out.push(n as u8);
        }

        Ok(Self { numbers: out, mask })
    }

    /// Whether `n` was drawn.
    pub fn contains(&self, n: u8) -> bool {
        n <= MAX_NUMBER && self.mask & (1u128 << n) != 0
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    /// The numbers in ascending order.
    pub fn sorted(&self) -> Vec<u8> {
        let mut v = self.numbers.clone();
        v.sort_unstable();
        v
    }
}

impl TryFrom<Vec<u32>> for Draw {
    type Error = InvalidDrawError;

    fn try_from(numbers: Vec<u32>) -> Result<Self, Self::Error> {
        Draw::new(&numbers)
    }
}

impl From<Draw> for Vec<u8> {
    fn from(draw: Draw) -> Self {
        draw.numbers
    }
}

impl fmt::Display for Draw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", join_padded(&self.sorted()))
    }
}

/// Format numbers as zero-padded two-digit values separated by spaces.
pub fn join_padded(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{n:02}"))
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Per-number statistics
// ---------------------------------------------------------------------------

/// Scoring output for a single ball number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberStat {
    pub number: u8,
    /// Composite score, rounded to one decimal.
    pub score: f64,
    /// Draws since the number last appeared (99 when never seen).
    pub omission: u32,
    /// Consecutive most-recent draws containing the number.
    pub streak: u32,
    /// Appearances in the long-run frequency window.
    pub base: u32,
    /// Appearances in the short-term heat window.
    pub heat: u32,
    /// Weighted co-occurrence with the latest draw.
    pub drag: f64,
}

// ---------------------------------------------------------------------------
// Squads
// ---------------------------------------------------------------------------

/// Allowed squad sizes ("3-star" and "6-star" tickets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SquadSize {
    Three,
    Six,
}

impl SquadSize {
    pub fn get(self) -> usize {
        match self {
            SquadSize::Three => 3,
            SquadSize::Six => 6,
        }
    }
}

impl TryFrom<u8> for SquadSize {
    type Error = BingoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(SquadSize::Three),
            6 => Ok(SquadSize::Six),
            other => Err(BingoError::Config(format!(
                "squad size must be 3 or 6, got {other}"
            ))),
        }
    }
}

impl From<SquadSize> for u8 {
    fn from(size: SquadSize) -> Self {
        size.get() as u8
    }
}

impl fmt::Display for SquadSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-star", self.get())
    }
}

/// How a set of squads should be generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadPlan {
    pub name: String,
    pub size: SquadSize,
    pub count: usize,
    /// When set, no number appears in more than one squad of the set.
    #[serde(default)]
    pub exclusive: bool,
}

impl SquadPlan {
    pub fn new(name: impl Into<String>, size: SquadSize, count: usize, exclusive: bool) -> Self {
        Self {
            name: name.into(),
            size,
            count,
            exclusive,
        }
    }
}

/// A recommended group of numbers, sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Squad {
    /// The high-scoring number the squad was built around.
    pub seed: u8,
    pub numbers: Vec<u8>,
}

impl Squad {
    /// The squad's numbers that appear in `winning`, ascending.
    pub fn hits(&self, winning: &[u8]) -> Vec<u8> {
        self.numbers
            .iter()
            .copied()
            .filter(|n| winning.contains(n))
            .collect()
    }
}

impl fmt::Display for Squad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", join_padded(&self.numbers))
    }
}

/// Squads generated for one plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadSet {
    pub plan: SquadPlan,
    pub squads: Vec<Squad>,
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Full output of one scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub draws_analyzed: usize,
    pub latest_draw: Option<Draw>,
    /// Keyed by ball number; empty when there was no data.
    pub scores: BTreeMap<u8, NumberStat>,
    pub squad_sets: Vec<SquadSet>,
}

impl Analysis {
    /// The degraded result returned for an empty draw list.
    pub fn no_data() -> Self {
        Self {
            draws_analyzed: 0,
            latest_draw: None,
            scores: BTreeMap::new(),
            squad_sets: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.draws_analyzed == 0
    }

    /// Highest-scoring numbers first; equal scores keep ascending order.
    pub fn ranked(&self) -> Vec<&NumberStat> {
        let mut stats: Vec<&NumberStat> = self.scores.values().collect();
        stats.sort_by(|a, b| b.score.total_cmp(&a.score));
        stats
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// A draw that cannot be a real Bingo outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidDrawError {
    #[error("draw must contain {expected} numbers, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("number {0} is outside 1..=80")]
    OutOfRange(u32),

    #[error("number {0} appears more than once")]
    Duplicate(u8),
}

/// Domain-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum BingoError {
    #[error("Feed error ({source_name}): {message}")]
    Feed { source_name: String, message: String },

    #[error("Invalid draw: {0}")]
    InvalidDraw(#[from] InvalidDrawError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
