// Copyright (c) 2025 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::stats::{self, SampleSnapshot};

/// A statistically significant selection of values recorded by a metric.
///
/// Implementors provide storage ([Sample::update], [Sample::clear],
/// [Sample::size], [Sample::values]); every summary is computed from a
/// fresh copy returned by [Sample::values].
pub trait Sample: Send + Sync {
    /// Record a new value.
    fn update(&self, v: i64);

    /// Drop every recorded value.
    fn clear(&self);

    /// Number of values currently held.
    fn size(&self) -> usize;

    /// Copy of the values currently held, oldest first.
    fn values(&self) -> Vec<i64>;

    fn count(&self) -> i64 {
        self.size() as i64
    }

    /// Immutable copy of the current values for reporting.
    fn snapshot(&self) -> SampleSnapshot {
        let v: Vec<i64> = self.values();
        SampleSnapshot::new(v.len() as i64, v)
    }

    fn max(&self) -> i64 {
        stats::sample_max(&self.values())
    }

    fn min(&self) -> i64 {
        stats::sample_min(&self.values())
    }

    fn mean(&self) -> f64 {
        stats::sample_mean(&self.values())
    }

    fn sum(&self) -> i64 {
        stats::sample_sum(&self.values())
    }

    fn std_dev(&self) -> f64 {
        stats::sample_std_dev(&self.values())
    }

    fn variance(&self) -> f64 {
        stats::sample_variance(&self.values())
    }

    fn percentile(&self, p: f64) -> f64 {
        stats::sample_percentile(&self.values(), p)
    }

    fn percentiles(&self, ps: &[f64]) -> Vec<f64> {
        stats::sample_percentiles(&self.values(), ps)
    }
}
