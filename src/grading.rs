//! Compositions of an integer, enumerated by stars and bars.
//!
//! A composition of `total` into `parts` pieces is a sequence of `parts` nonnegative integers
//! summing to `total`. These are in bijection with the `(parts - 1)`-element subsets of
//! `0..total + parts - 1`: the chosen positions are the bars and the gaps between them count the
//! stars.

use itertools::Itertools;

/// Convert a strictly increasing sequence of bar positions into the composition of
/// `total_degree` it encodes. The result has one more entry than `combination`.
///
/// # Panics
/// Panics if `combination` is not strictly increasing, or if a bar lies beyond
/// `total_degree + combination.len()`, in which case no composition of `total_degree` exists.
pub fn combination_to_tuple(combination: &[usize], total_degree: u32) -> Vec<u32> {
    let mut result = Vec::with_capacity(combination.len() + 1);
    let Some((&first, _)) = combination.split_first() else {
        return vec![total_degree];
    };
    result.push(first as u32);
    for (&prev, &next) in combination.iter().tuple_windows() {
        assert!(
            next > prev,
            "Combination {combination:?} is not strictly increasing"
        );
        result.push((next - prev - 1) as u32);
    }
    let last = combination[combination.len() - 1];
    let end = total_degree as usize + combination.len();
    assert!(
        end > last,
        "Combination {combination:?} does not fit in a composition of {total_degree}"
    );
    result.push((end - (last + 1)) as u32);

    assert_eq!(result.len(), combination.len() + 1);
    assert_eq!(
        result.iter().sum::<u32>(),
        total_degree,
        "Composition {result:?} does not sum to {total_degree}"
    );
    result
}

/// All compositions of `total` into `parts` pieces, in lexicographic order of their bar
/// positions. This is lazy, so only one composition is materialized at a time. There are none
/// when `parts` is zero.
pub fn compositions(total: u32, parts: usize) -> impl Iterator<Item = Vec<u32>> + Clone {
    parts.checked_sub(1).into_iter().flat_map(move |bars| {
        (0..total as usize + bars)
            .combinations(bars)
            .map(move |combination| combination_to_tuple(&combination, total))
    })
}

/// The number of compositions of `total` into `parts` pieces, which is zero when `parts` is
/// zero.
pub fn number_of_compositions(total: u32, parts: usize) -> u64 {
    if parts == 0 {
        return 0;
    }
    binomial(total as u64 + parts as u64 - 1, parts as u64 - 1)
}

/// The binomial coefficient `n choose k`, which is zero when `k > n`.
pub fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        0
    } else {
        num_integer::binomial(n, k)
    }
}
