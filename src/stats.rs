// Copyright (c) 2025 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Statistics over a slice of sample values.
//!
//! All functions are pure: the input slice is never retained or mutated
//! (percentiles sort a private copy). Empty input yields zeroes throughout.

/// Maximum value, or 0 for an empty slice.
pub fn sample_max(values: &[i64]) -> i64 {
    values.iter().copied().max().unwrap_or(0)
}

/// Minimum value, or 0 for an empty slice.
pub fn sample_min(values: &[i64]) -> i64 {
    values.iter().copied().min().unwrap_or(0)
}

#[inline]
fn wide_sum(values: &[i64]) -> i128 {
    values.iter().map(|&v| v as i128).sum()
}

/// Sum of all values, saturated to the `i64` range.
pub fn sample_sum(values: &[i64]) -> i64 {
    wide_sum(values).clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Arithmetic mean.
pub fn sample_mean(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    wide_sum(values) as f64 / values.len() as f64
}

/// Population variance [M2 / N].
pub fn sample_variance(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean: f64 = sample_mean(values);
    values
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / values.len() as f64
}

/// Population standard deviation.
pub fn sample_std_dev(values: &[i64]) -> f64 {
    sample_variance(values).sqrt()
}

/// Single quantile, see [sample_percentiles].
pub fn sample_percentile(values: &[i64], p: f64) -> f64 {
    sample_percentiles(values, &[p])[0]
}

/// Quantiles `ps` (0.0 - 1.0) of `values`.
///
/// The rank of quantile `p` is `p * (N + 1)`. Ranks below 1 give the
/// smallest value (as does a NaN quantile), ranks at or past N give the
/// largest, and anything in between is linearly interpolated between its
/// two neighbours.
pub fn sample_percentiles(values: &[i64], ps: &[f64]) -> Vec<f64> {
    let mut scores: Vec<f64> = vec![0.0; ps.len()];
    if values.is_empty() {
        return scores;
    }

    let mut sorted: Vec<i64> = values.to_vec();
    sorted.sort_unstable();
    let size: usize = sorted.len();

    for (score, &p) in scores.iter_mut().zip(ps) {
        let pos: f64 = p * (size + 1) as f64;
        *score = if pos.is_nan() || pos < 1.0 {
            sorted[0] as f64
        } else if pos >= size as f64 {
            sorted[size - 1] as f64
        } else {
            let idx: usize = pos.floor() as usize;
            let lower: f64 = sorted[idx - 1] as f64;
            let upper: f64 = sorted[idx] as f64;
            lower + (pos - pos.floor()) * (upper - lower)
        };
    }
    scores
}

/// Immutable point-in-time copy of a sample, handed to reporting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SampleSnapshot {
    count: i64,
    values: Vec<i64>,
}

impl SampleSnapshot {
    pub fn new(count: i64, values: Vec<i64>) -> Self {
        Self { count, values }
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The snapshot's values, in the order they were recorded.
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn max(&self) -> i64 {
        sample_max(&self.values)
    }

    pub fn min(&self) -> i64 {
        sample_min(&self.values)
    }

    pub fn mean(&self) -> f64 {
        sample_mean(&self.values)
    }

    pub fn sum(&self) -> i64 {
        sample_sum(&self.values)
    }

    pub fn std_dev(&self) -> f64 {
        sample_std_dev(&self.values)
    }

    pub fn variance(&self) -> f64 {
        sample_variance(&self.values)
    }

    pub fn percentile(&self, p: f64) -> f64 {
        sample_percentile(&self.values, p)
    }

    pub fn percentiles(&self, ps: &[f64]) -> Vec<f64> {
        sample_percentiles(&self.values, ps)
    }
}
