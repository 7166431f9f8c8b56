use rand::Rng;
use rand::rngs::SmallRng;

/// Roulette-wheel pick over parallel `weights`. Returns the index of the first
/// item whose cumulative weight exceeds a uniform draw in `[0, total)`.
///
/// Non-finite or negative weights count as zero. Mismatched lengths or a zero
/// total fall back to index 0; only empty input yields `None`.
pub fn select_weighted_index(weights: &[f64], len: usize, rng: &mut SmallRng) -> Option<usize> {
    if len == 0 {
        return None;
    }
    if weights.len() != len {
        return Some(0);
    }

    let sanitized: Vec<f64> = weights
        .iter()
        .map(|&w| if w.is_finite() && w > 0.0 { w } else { 0.0 })
        .collect();
    let total: f64 = sanitized.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Some(0);
    }

    let roll = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    for (idx, &w) in sanitized.iter().enumerate() {
        cumulative += w;
        if roll < cumulative {
            return Some(idx);
        }
    }

    // Rounding can leave roll == cumulative at the very end
    sanitized.iter().rposition(|&w| w > 0.0).or(Some(0))
}

pub fn select_weighted<'a, T>(items: &'a [T], weights: &[f64], rng: &mut SmallRng) -> Option<&'a T> {
    select_weighted_index(weights, items.len(), rng).map(|idx| &items[idx])
}
