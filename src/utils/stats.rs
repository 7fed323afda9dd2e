//! Statistics helpers shared by the analyses.
//!
//! All divisions that can see a zero denominator go through [`safe_div`],
//! mirroring null-safe division in the source reports: an undefined ratio
//! is `None`, never an error or a non-finite float.

/// Divide, yielding `None` when the denominator is zero or the result is
/// not finite
#[must_use]
pub fn safe_div(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let ratio = numerator / denominator;
    ratio.is_finite().then_some(ratio)
}

/// Arithmetic mean, `None` for an empty slice
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator), `None` with fewer than
/// two values
#[must_use]
pub fn sample_stddev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Number of standard deviations `value` is from `mean`
///
/// `None` when the deviation is missing, zero or not finite, so a customer
/// whose transactions are all identical never produces a score.
#[must_use]
pub fn z_score(value: f64, mean: f64, stddev: Option<f64>) -> Option<f64> {
    let sd = stddev?;
    if sd <= 0.0 || !sd.is_finite() {
        return None;
    }
    safe_div(value - mean, sd)
}

/// Assign each value a bucket score in `1..=buckets` by ascending rank,
/// SQL `NTILE` style: larger values land in higher buckets and bucket
/// sizes differ by at most one.
///
/// Ties are broken by input position, so the partition is always exact.
/// Returns one score per input value, in input order.
#[must_use]
pub fn ntile(values: &[f64], buckets: usize) -> Vec<u8> {
    let n = values.len();
    if n == 0 || buckets == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    // NTILE: the first (n % buckets) buckets hold one extra row
    let base = n / buckets;
    let remainder = n % buckets;

    let mut scores = vec![0u8; n];
    let mut position = 0usize;
    for bucket in 0..buckets {
        let size = if bucket < remainder { base + 1 } else { base };
        for _ in 0..size {
            scores[order[position]] = (bucket + 1) as u8;
            position += 1;
        }
    }
    scores
}
