use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffles row indices with a seeded RNG and holds out `ceil(n * test_fraction)` of them.
///
/// Returns `(train, test)`. Both sides are non-empty whenever `n >= 2`.
pub(crate) fn train_test_indices(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_len = ((n as f64) * test_fraction).ceil() as usize;
    let test_len = test_len.clamp(usize::from(n > 1), n.saturating_sub(1));

    let train = indices.split_off(test_len);
    (train, indices)
}
