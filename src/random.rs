use rand::Rng;

/// Fisher-Yates shuffle over an injectable random source.
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R)
{
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Draws up to `k` distinct elements in randomized order. Returns fewer
/// than `k` when the population is smaller, never fails.
pub fn sample<'a, T, R: Rng>(population: &'a [T], k: usize, rng: &mut R) -> Vec<&'a T>
{
    let mut indices: Vec<usize> = (0..population.len()).collect();
    shuffle(&mut indices, rng);
    indices
        .into_iter()
        .take(k)
        .map(|i| &population[i])
        .collect()
}

/// Reshuffles while `reject` accepts the arrangement. Slices shorter than
/// two elements get a single shuffle, since no reshuffle can change them.
pub fn shuffle_until<T, R, F>(items: &mut [T], rng: &mut R, reject: F)
where
    R: Rng,
    F: Fn(&[T]) -> bool,
{
    shuffle(items, rng);
    if items.len() < 2 {
        return;
    }
    while reject(items) {
        shuffle(items, rng);
    }
}
