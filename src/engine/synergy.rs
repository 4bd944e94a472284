//! Pairwise co-occurrence ("synergy") counts.
//!
//! For every draw in the window, each of the C(20,2) = 190 unordered pairs
//! of drawn numbers gets one tally. The matrix is symmetric by
//! construction: pairs are stored under `(min, max)`.

use tracing::debug;

use crate::types::{Draw, MAX_NUMBER};

const SIDE: usize = MAX_NUMBER as usize + 1;

/// Symmetric pair counts over the most recent draws.
#[derive(Debug, Clone)]
pub struct CoOccurrenceMatrix {
    counts: Vec<u32>,
    draws_considered: usize,
}

impl CoOccurrenceMatrix {
    /// Tally pairs over the first `window` draws (newest-first).
    pub fn from_draws(draws: &[Draw], window: usize) -> Self {
        let recent = &draws[..draws.len().min(window)];
        let mut counts = vec![0u32; SIDE * SIDE];

        for draw in recent {
            let nums = draw.numbers();
            for (i, &a) in nums.iter().enumerate() {
                for &b in &nums[i + 1..] {
                    counts[Self::index(a, b)] += 1;
                }
            }
        }

        debug!(draws = recent.len(), "Co-occurrence matrix built");

        Self {
            counts,
            draws_considered: recent.len(),
        }
    }

    fn index(a: u8, b: u8) -> usize {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        lo as usize * SIDE + hi as usize
    }

    /// Number of draws in which both `a` and `b` appeared.
    /// A number has no synergy with itself.
    pub fn synergy(&self, a: u8, b: u8) -> u32 {
        if a == b || a > MAX_NUMBER || b > MAX_NUMBER {
            return 0;
        }
        self.counts[Self::index(a, b)]
    }

    /// Sum of `synergy(n, m)` over every member `m` of `draw`.
    pub fn total_with(&self, n: u8, draw: &Draw) -> u32 {
        draw.numbers().iter().map(|&m| self.synergy(n, m)).sum()
    }

    pub fn draws_considered(&self) -> usize {
        self.draws_considered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(start: u32) -> Draw {
        Draw::new(&(start..start + 20).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn test_symmetric() {
        let draws = vec![draw(1), draw(11), draw(30)];
        let m = CoOccurrenceMatrix::from_draws(&draws, 100);
        for a in 1..=80u8 {
            for b in 1..=80u8 {
                assert_eq!(m.synergy(a, b), m.synergy(b, a));
            }
        }
    }

    #[test]
    fn test_counts_overlap() {
        // 11..=20 appear in both of the first two draws
        let draws = vec![draw(1), draw(11)];
        let m = CoOccurrenceMatrix::from_draws(&draws, 100);
        assert_eq!(m.synergy(11, 20), 2);
        assert_eq!(m.synergy(1, 20), 1);
        assert_eq!(m.synergy(1, 30), 0);
        assert_eq!(m.synergy(5, 5), 0);
    }

    #[test]
    fn test_identical_draws_equal_window() {
        let draws = vec![draw(1); 120];
        let m = CoOccurrenceMatrix::from_draws(&draws, 100);
        assert_eq!(m.draws_considered(), 100);
        assert_eq!(m.synergy(1, 2), 100);
        assert_eq!(m.synergy(19, 20), 100);
    }

    #[test]
    fn test_window_truncates() {
        let draws = vec![draw(1), draw(1), draw(50)];
        let m = CoOccurrenceMatrix::from_draws(&draws, 2);
        assert_eq!(m.synergy(1, 2), 2);
        assert_eq!(m.synergy(50, 51), 0);
    }

    #[test]
    fn test_total_with_latest() {
        let draws = vec![draw(1); 3];
        let m = CoOccurrenceMatrix::from_draws(&draws, 100);
        // 19 partners, 3 draws each
        assert_eq!(m.total_with(1, &draws[0]), 57);
        assert_eq!(m.total_with(21, &draws[0]), 0);
    }

    #[test]
    fn test_empty() {
        let m = CoOccurrenceMatrix::from_draws(&[], 100);
        assert_eq!(m.draws_considered(), 0);
        assert_eq!(m.synergy(1, 2), 0);
    }
}
