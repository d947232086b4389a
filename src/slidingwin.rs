// Copyright (c) 2025 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    clock::{Clock, SystemClock},
    sample::Sample,
};
use parking_lot::Mutex;
use std::{
    collections::VecDeque,
    time::{Duration, SystemTime},
};
use tracing::trace;

/// One recorded value and the time it was recorded at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Observation {
    value: i64,
    observed_at: SystemTime,
}

/// Sliding time-window sample with an upper bound on the number of values held.
///
/// Values older than `window` are dropped lazily, right before any access, so
/// there is no background timer. Once `capacity` values are held, new values
/// are dropped until old ones age out. This keeps the earliest part of a burst
/// and puts a hard ceiling on memory use.
#[derive(Debug)]
pub struct WindowedSample<C: Clock = SystemClock> {
    buf: Mutex<VecDeque<Observation>>, // chronological, oldest at front
    cap: usize,
    window: Duration,
    clock: C,
}

impl WindowedSample {
    /// Create new WindowedSample holding at most `capacity` values no older than `window`.
    ///
    /// Every slot holds both a value and a timestamp, so a large capacity
    /// costs considerably more memory than a plain `Vec<i64>` of the same size.
    ///
    /// A `capacity` of 0 gives a sample which silently drops every value. A zero
    /// `window` only retains values recorded at the current clock reading.
    pub fn new(capacity: usize, window: Duration) -> Self {
        Self::with_clock(capacity, window, SystemClock)
    }
}

impl<C: Clock> WindowedSample<C> {
    /// Same as [WindowedSample::new], but reads the time from `clock`.
    pub fn with_clock(capacity: usize, window: Duration, clock: C) -> Self {
        Self {
            buf: Mutex::new(VecDeque::new()),
            cap: capacity,
            window,
            clock,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Is a value recorded at `at` still within the window at `now`?
    /// Timestamps ahead of `now` (clock stepped back) count as zero age.
    #[inline]
    fn in_window(&self, now: SystemTime, at: SystemTime) -> bool {
        match now.duration_since(at) {
            Ok(age) => age <= self.window,
            Err(_) => true,
        }
    }

    /// Drop expired values from the front of `buf`. Caller must hold the lock.
    /// Returns the clock reading the window was evaluated against.
    fn slide(&self, buf: &mut VecDeque<Observation>) -> SystemTime {
        let now: SystemTime = self.clock.now();
        match buf.front() {
            None => return now,
            Some(oldest) if self.in_window(now, oldest.observed_at) => return now,
            Some(_) => {}
        }

        // Everything after the first surviving value is newer, hence also survives.
        let cut: usize = buf
            .iter()
            .position(|o: &Observation| self.in_window(now, o.observed_at))
            .unwrap_or(buf.len());
        buf.drain(..cut);
        trace!(evicted = cut, retained = buf.len(), "window slid");
        now
    }
}

impl<C: Clock> Sample for WindowedSample<C> {
    /// Record `v`, unless the sample is already at capacity.
    fn update(&self, v: i64) {
        let mut buf = self.buf.lock();
        let now: SystemTime = self.slide(&mut buf);

        if buf.len() >= self.cap {
            trace!(value = v, capacity = self.cap, "sample full, value dropped");
            return;
        }
        buf.push_back(Observation {
            value: v,
            observed_at: now,
        });
    }

    fn clear(&self) {
        *self.buf.lock() = VecDeque::new();
    }

    /// Number of values within the window. Never exceeds the capacity.
    fn size(&self) -> usize {
        let mut buf = self.buf.lock();
        self.slide(&mut buf);
        buf.len()
    }

    fn values(&self) -> Vec<i64> {
        let mut buf = self.buf.lock();
        self.slide(&mut buf);
        buf.iter().map(|o: &Observation| o.value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::testing::{FixedClock, ManualClock, at},
        stats::SampleSnapshot,
    };
    use std::{sync::Arc, thread};

    const SEC: Duration = Duration::from_secs(1);

    /// Sample pre-filled with `(value, secs)` observations, bypassing `update`.
    fn seeded<C: Clock>(cap: usize, window: Duration, clock: C, obs: &[(i64, u64)]) -> WindowedSample<C> {
        let s = WindowedSample::with_clock(cap, window, clock);
        s.buf.lock().extend(obs.iter().map(|&(value, secs)| Observation {
            value,
            observed_at: at(secs),
        }));
        s
    }

    fn raw_len<C: Clock>(s: &WindowedSample<C>) -> usize {
        s.buf.lock().len()
    }

    #[test]
    fn test_basic() {
        let s = WindowedSample::with_clock(3, SEC, FixedClock(0));
        assert!(s.is_empty());
        assert_eq!(s.size(), 0);
        assert_eq!(s.count(), 0);
        assert_eq!(s.capacity(), 3);
        assert_eq!(s.window(), SEC);
        assert_eq!(s.values(), Vec::<i64>::new());

        s.update(1);
        s.update(2);
        s.update(3);
        assert!(!s.is_empty());
        assert_eq!(s.values(), vec![1, 2, 3], "Wrong values after 3 updates");
        assert_eq!(s.size(), 3);
        assert_eq!(s.count(), 3);
    }

    #[test]
    fn test_update_when_full() {
        let s = seeded(3, SEC, FixedClock(0), &[(1, 0), (2, 0), (3, 0)]);
        s.update(4);
        assert_eq!(s.values(), vec![1, 2, 3], "4 should have been dropped");
        s.update(3);
        assert_eq!(s.values(), vec![1, 2, 3], "Duplicate should have been dropped too");
    }

    #[test]
    fn test_update_after_eviction_frees_space() {
        let clock: Arc<ManualClock> = Arc::new(ManualClock::default());
        let s = WindowedSample::with_clock(2, Duration::from_secs(10), clock.clone());
        s.update(1);
        s.update(2);

        clock.set(Duration::from_secs(5));
        s.update(3);
        assert_eq!(s.values(), vec![1, 2], "Full sample should not accept 3");

        clock.set(Duration::from_secs(11));
        s.update(4);
        assert_eq!(s.values(), vec![4], "Expired values should make room for 4");
    }

    #[test]
    fn test_slide_empty() {
        let s = WindowedSample::with_clock(0, SEC, FixedClock(0));
        let now: SystemTime = s.slide(&mut s.buf.lock());
        assert_eq!(now, at(0));
        assert_eq!(s.values(), Vec::<i64>::new());
    }

    #[test]
    fn test_slide_first_value_within_window() {
        let s = seeded(1, SEC, FixedClock(0), &[(1, 0)]);
        s.slide(&mut s.buf.lock());
        assert_eq!(s.values(), vec![1]);
    }

    #[test]
    fn test_slide_partial() {
        let s = seeded(3, SEC, FixedClock(2), &[(1, 0), (2, 1), (3, 2)]);
        s.slide(&mut s.buf.lock());
        assert_eq!(raw_len(&s), 2, "Only t0 should have been evicted");
        assert_eq!(s.values(), vec![2, 3]);
    }

    #[test]
    fn test_slide_all() {
        let s = seeded(3, SEC, FixedClock(2), &[(1, 0), (2, 0), (3, 0)]);
        assert_eq!(s.values(), Vec::<i64>::new());
        assert_eq!(raw_len(&s), 0);
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let clock: Arc<ManualClock> = Arc::new(ManualClock::default());
        let s = WindowedSample::with_clock(4, SEC, clock.clone());
        s.update(1);

        clock.set(SEC);
        assert_eq!(s.values(), vec![1], "Value exactly one window old must be kept");

        clock.advance(Duration::from_nanos(1));
        assert_eq!(s.values(), Vec::<i64>::new(), "Value older than the window must go");
    }

    #[test]
    fn test_window_eviction_over_time() {
        let clock: Arc<ManualClock> = Arc::new(ManualClock::default());
        let s = WindowedSample::with_clock(100, Duration::from_secs(3), clock.clone());
        for v in 0..10 {
            clock.set(Duration::from_secs(v as u64));
            s.update(v);
        }
        // now = 9, window = 3 -> recorded at 6, 7, 8, 9 survive
        assert_eq!(s.values(), vec![6, 7, 8, 9]);
        assert_eq!(s.snapshot(), SampleSnapshot::new(4, vec![6, 7, 8, 9]));

        clock.advance(Duration::from_secs(2));
        assert_eq!(s.values(), vec![8, 9]);
        clock.advance(Duration::from_secs(5));
        assert!(s.is_empty(), "Everything should have aged out");
    }

    #[test]
    fn test_clock_stepping_back_keeps_values() {
        let clock: Arc<ManualClock> = Arc::new(ManualClock::default());
        clock.set(Duration::from_secs(5));
        let s = WindowedSample::with_clock(4, SEC, clock.clone());
        s.update(1);
        clock.set(Duration::from_secs(3));
        assert_eq!(s.values(), vec![1], "Future timestamps count as zero age");
    }

    #[test]
    fn test_repeated_reads_agree() {
        let s = seeded(5, SEC, FixedClock(2), &[(1, 0), (2, 1), (3, 2), (4, 2)]);
        let first: Vec<i64> = s.values();
        assert_eq!(first, s.values());
        assert_eq!(s.size(), s.size());
        assert_eq!(s.snapshot(), s.snapshot());
        assert_eq!(s.mean(), s.mean());
    }

    #[test]
    fn test_clear() {
        let s = seeded(3, SEC, FixedClock(0), &[(1, 0), (2, 0)]);
        s.clear();
        assert_eq!(raw_len(&s), 0, "Sample values are not empty");
        assert_eq!(s.size(), 0);
        assert_eq!(s.capacity(), 3, "Clear must keep the capacity");
        assert_eq!(s.window(), SEC, "Clear must keep the window");

        // clearing an empty sample is fine too
        s.clear();
        assert!(s.is_empty());
        s.update(9);
        assert_eq!(s.values(), vec![9]);
    }

    #[test]
    fn test_snapshot() {
        let s = WindowedSample::with_clock(3, SEC, FixedClock(0));
        assert_eq!(s.snapshot(), SampleSnapshot::new(0, vec![]));

        let s = seeded(2, SEC, FixedClock(0), &[(1, 0), (2, 0)]);
        let snap: SampleSnapshot = s.snapshot();
        assert_eq!(snap, SampleSnapshot::new(2, vec![1, 2]));

        // the snapshot is a copy and does not follow the sample
        s.clear();
        assert_eq!(snap.values(), &[1, 2]);
    }

    #[test]
    fn test_statistics() {
        let s = seeded(8, SEC, FixedClock(2), &[(100, 0), (40, 1), (10, 2), (30, 2), (20, 2)]);
        // (100, t0) has aged out
        assert_eq!(s.count(), 4);
        assert_eq!(s.max(), 40);
        assert_eq!(s.min(), 10);
        assert_eq!(s.sum(), 100);
        assert_eq!(s.mean(), 25.0);
        assert_eq!(s.variance(), 125.0);
        assert_eq!(s.std_dev(), 125f64.sqrt());
        assert_eq!(s.percentile(0.5), 25.0);
        assert_eq!(s.percentiles(&[0.0, 0.5, 1.0]), vec![10.0, 25.0, 40.0]);
    }

    #[test]
    fn test_zero_capacity_drops_everything() {
        let s = WindowedSample::with_clock(0, SEC, FixedClock(0));
        for v in 0..10 {
            s.update(v);
        }
        assert!(s.is_empty());
        assert_eq!(s.snapshot(), SampleSnapshot::default());
    }

    #[test]
    fn test_zero_window_keeps_only_current_instant() {
        let clock: Arc<ManualClock> = Arc::new(ManualClock::default());
        let s = WindowedSample::with_clock(4, Duration::ZERO, clock.clone());
        s.update(1);
        s.update(2);
        assert_eq!(s.values(), vec![1, 2]);
        clock.advance(Duration::from_nanos(1));
        assert!(s.is_empty());
    }

    #[test]
    fn test_capacity_bound_under_contention() {
        let s = WindowedSample::with_clock(100, SEC, FixedClock(0));
        thread::scope(|scope| {
            for t in 0..8i64 {
                let s = &s;
                scope.spawn(move || {
                    for i in 0..1000 {
                        s.update(t * 1000 + i);
                        assert!(s.size() <= 100);
                    }
                });
            }
        });
        assert_eq!(s.size(), 100, "Sample should be exactly full");
    }

    #[test]
    fn test_chronological_order_under_contention() {
        let clock: Arc<ManualClock> = Arc::new(ManualClock::default());
        let s = WindowedSample::with_clock(10_000, Duration::from_secs(3600), clock.clone());
        thread::scope(|scope| {
            scope.spawn(|| {
                for _ in 0..500 {
                    clock.advance(Duration::from_millis(1));
                }
            });
            for _ in 0..4 {
                scope.spawn(|| {
                    for i in 0..500 {
                        s.update(i);
                    }
                });
            }
        });
        let buf = s.buf.lock();
        assert_eq!(buf.len(), 2000);
        assert!(
            buf.iter().zip(buf.iter().skip(1)).all(|(a, b)| a.observed_at <= b.observed_at),
            "Observations out of chronological order"
        );
    }

    #[test]
    fn test_as_trait_object() {
        let s: Arc<dyn Sample> = Arc::new(WindowedSample::new(10, Duration::from_secs(60)));
        s.update(5);
        s.update(7);
        assert_eq!(s.count(), 2);
        assert_eq!(s.mean(), 6.0);
        assert_eq!(s.snapshot().values(), &[5, 7]);
    }
}
