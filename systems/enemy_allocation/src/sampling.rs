//! Random draws shared by the allocator and the group templates.

use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Draws an integer from a normal distribution, rounded and clamped to `[min, max]`.
///
/// A deviation the distribution rejects collapses the draw onto the mean.
pub(crate) fn next_gaussian<R: Rng>(
    mean: f64,
    deviation: f64,
    min: i64,
    max: i64,
    rng: &mut R,
) -> i64 {
    let sample = Normal::new(mean, deviation).map_or(mean, |normal| normal.sample(rng));
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    (sample.round() as i64).clamp(low, high)
}

/// Picks a uniformly random index in `0..len` that is not listed in `excluded`.
///
/// Returns `None` once every index has been excluded.
pub(crate) fn random_index_with_exclusion<R: Rng>(
    len: usize,
    excluded: &[usize],
    rng: &mut R,
) -> Option<usize> {
    let available = (0..len).filter(|index| !excluded.contains(index)).count();
    if available == 0 {
        return None;
    }

    let pick = rng.gen_range(0..available);
    (0..len).filter(|index| !excluded.contains(index)).nth(pick)
}
