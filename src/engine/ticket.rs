//! Matching pasted winning numbers against recommended squads.

use serde::Serialize;

use crate::types::{Analysis, MAX_NUMBER};

/// Hits for one squad.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SquadHits {
    pub plan: String,
    pub numbers: Vec<u8>,
    pub hits: Vec<u8>,
}

/// Parse a pasted winning-number string.
///
/// Accepts either separated numbers (`"2 15 16"`, `"02,15,16"`) or one run
/// of concatenated two-digit numbers (`"021516..."`, at least 20 digits).
/// Values outside 1..=80 and repeats are dropped; first-seen order is kept.
pub fn parse_winning_numbers(input: &str) -> Vec<u8> {
    let trimmed = input.trim();
    let compact = trimmed.len() >= 20 && trimmed.chars().all(|c| c.is_ascii_digit());

    let raw: Vec<u32> = if compact {
        trimmed
            .as_bytes()
            .chunks(2)
            .filter_map(|pair| std::str::from_utf8(pair).ok()?.parse().ok())
            .collect()
    } else {
        trimmed
            .split(|c: char| !c.is_ascii_digit())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse().ok())
            .collect()
    };

    let mut out: Vec<u8> = Vec::with_capacity(raw.len());
    for n in raw {
        if n == 0 || n > MAX_NUMBER as u32 {
            continue;
        }
        let n = n as u8;
        if !out.contains(&n) {
            out.push(n);
        }
    }
    out
}

/// Count hits of `winning` against every squad of every plan.
pub fn check_squads(analysis: &Analysis, winning: &[u8]) -> Vec<SquadHits> {
    analysis
        .squad_sets
        .iter()
        .flat_map(|set| {
            set.squads.iter().map(move |squad| SquadHits {
                plan: set.plan.name.clone(),
                numbers: squad.numbers.clone(),
                hits: squad.hits(winning),
            })
        })
        .collect()
}
