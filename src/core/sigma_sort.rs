//! sigma-Sorter: groups elements of similar particle-count into sigma-sized bands.
//!
//! Pure function, no side effects. The reference implementation this crate is
//! modeled on ships with sorting disabled ("pending runtime-library fixes");
//! this version implements it, since the layout invariants and property tests
//! depend on it.

use rayon::prelude::*;

/// `(count, element_id)` pairs, sigma-sorted: within each contiguous band of
/// `sigma` entries, pairs are ordered by descending count, ties broken by
/// ascending element id. `sigma <= 1` disables sorting; `sigma >= counts.len()`
/// sorts the whole input as a single band.
pub fn sigma_sort(counts: &[u32], sigma: usize) -> Vec<(u32, u32)> {
    let mut pairs: Vec<(u32, u32)> = counts
        .iter()
        .enumerate()
        .map(|(i, &c)| (c, i as u32))
        .collect();

    if sigma <= 1 || pairs.len() <= 1 {
        return pairs;
    }

    pairs
        .par_chunks_mut(sigma)
        .for_each(|band| band.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1))));

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigma_one_is_identity() {
        let counts = [3, 1, 4, 1, 5];
        let sorted = sigma_sort(&counts, 1);
        let expected: Vec<(u32, u32)> = counts
            .iter()
            .enumerate()
            .map(|(i, &c)| (c, i as u32))
            .collect();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn global_sort_is_descending() {
        let counts = [10, 4, 3, 2, 1];
        let sorted = sigma_sort(&counts, counts.len());
        assert_eq!(
            sorted,
            vec![(10, 0), (4, 1), (3, 2), (2, 3), (1, 4)]
        );
    }

    #[test]
    fn ties_break_by_ascending_element_id() {
        let counts = [2, 2, 2];
        let sorted = sigma_sort(&counts, 3);
        assert_eq!(sorted, vec![(2, 0), (2, 1), (2, 2)]);
    }

    #[test]
    fn bands_are_sorted_independently() {
        let counts = [1, 5, 2, 9];
        let sorted = sigma_sort(&counts, 2);
        // band [0,1] -> sorted desc: (5,1),(1,0); band [2,3] -> (9,3),(2,2)
        assert_eq!(sorted, vec![(5, 1), (1, 0), (9, 3), (2, 2)]);
    }
}
