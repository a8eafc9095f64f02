/// Linear map of `value` onto `[min, max] -> [0, 1]`.
///
/// A degenerate range (`max == min`) yields exactly `0.5`. Values outside the
/// range are not clamped.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 0.5;
    }
    (value - min) / (max - min)
}

/// Inclusive-rank percentile: share of `population` that is `<= value`, in `[0, 100]`.
///
/// Empty population is undefined and yields NaN; callers guard.
pub fn percentile(value: f64, population: &[f64]) -> f64 {
    let count = population.iter().filter(|p| **p <= value).count();
    100.0 * count as f64 / population.len() as f64
}

#[cfg(test)]
#[path = "../../tests/src_inline/aggregate/scale.rs"]
mod tests;
