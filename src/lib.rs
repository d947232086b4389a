// Copyright (c) 2025 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded sliding time-window sample for low-volume metrics.
//!
//! A [WindowedSample] keeps at most `capacity` values, each for at most
//! `window`. Expired values are removed lazily whenever the sample is
//! touched, which suits metrics such as request latencies that arrive
//! irregularly and should not linger once they are stale.
//!
//! ```
//! use std::time::Duration;
//! use wsample::{Sample, WindowedSample};
//!
//! let s = WindowedSample::new(1028, Duration::from_secs(60));
//! s.update(120);
//! s.update(80);
//! assert_eq!(s.count(), 2);
//! assert_eq!(s.mean(), 100.0);
//! ```

pub mod clock;
pub mod sample;
pub mod slidingwin;
pub mod stats;

pub use crate::{
    clock::{Clock, SystemClock},
    sample::Sample,
    slidingwin::WindowedSample,
    stats::SampleSnapshot,
};
