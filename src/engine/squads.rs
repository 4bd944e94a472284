//! Squad generation.
//!
//! Seeds are the highest-scoring numbers; each seed is completed with the
//! partners it has co-occurred with most often. In exclusive mode every
//! number of an earlier squad leaves the pool, so squads never overlap.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

use super::synergy::CoOccurrenceMatrix;
use crate::types::{NumberStat, Squad, SquadPlan, MAX_NUMBER};

/// Build up to `plan.count` squads of `plan.size` numbers.
///
/// Fewer squads are returned only when the exclusive pool runs out.
pub fn generate_squads(
    scores: &BTreeMap<u8, NumberStat>,
    matrix: &CoOccurrenceMatrix,
    plan: &SquadPlan,
) -> Vec<Squad> {
    // BTreeMap iterates in ascending number order and sort_by is stable,
    // so equal scores keep that order.
    let mut ranked: Vec<&NumberStat> = scores.values().collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    let partners_needed = plan.size.get() - 1;
    let mut used = [false; MAX_NUMBER as usize + 1];
    // Each seed is a distinct number, so at most 80 squads can be built.
    let mut squads = Vec::with_capacity(plan.count.min(MAX_NUMBER as usize));

    for seed in &ranked {
        if squads.len() == plan.count {
            break;
        }
        if plan.exclusive && used[seed.number as usize] {
            continue;
        }

        let mut candidates: Vec<&NumberStat> = ranked
            .iter()
            .copied()
            .filter(|c| c.number != seed.number)
            .filter(|c| !(plan.exclusive && used[c.number as usize]))
            .collect();

        if candidates.len() < partners_needed {
            debug!(
                plan = %plan.name,
                built = squads.len(),
                "Candidate pool exhausted"
            );
            break;
        }

        candidates.sort_by(|a, b| partner_order(matrix, seed.number, a, b));

        let mut numbers: Vec<u8> = std::iter::once(seed.number)
            .chain(candidates[..partners_needed].iter().map(|c| c.number))
            .collect();
        numbers.sort_unstable();

        if plan.exclusive {
            for &n in &numbers {
                used[n as usize] = true;
            }
        }

        squads.push(Squad {
            seed: seed.number,
            numbers,
        });
    }

    squads
}

/// Highest synergy with the seed first, then highest score, then lowest number.
fn partner_order(matrix: &CoOccurrenceMatrix, seed: u8, a: &NumberStat, b: &NumberStat) -> Ordering {
    matrix
        .synergy(seed, b.number)
        .cmp(&matrix.synergy(seed, a.number))
        .then_with(|| b.score.total_cmp(&a.score))
        .then_with(|| a.number.cmp(&b.number))
}
