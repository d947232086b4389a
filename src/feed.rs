// Copyright (c) 2025 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value producers feeding the sample: synthetic tokio tasks, or stdin.

use rand::random_range;
use std::{
    borrow::Cow,
    io::{BufRead, ErrorKind, stdin},
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    thread::{self, JoinHandle},
    time::Duration,
};
use tokio::time::{self, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use wsample::Sample;

/// What a single stdin line turned out to be.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Line {
    Value(i64),
    Skip,
    Invalid,
}

/// Parse a stdin line. Blank lines and `#` comments are skipped.
pub(crate) fn parse_line(line: &str) -> Line {
    let line: &str = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Line::Skip;
    }
    match line.parse::<i64>() {
        Ok(v) => Line::Value(v),
        Err(_) => Line::Invalid,
    }
}

/// Uniformly distributed synthetic value in `base +/- jitter`.
pub(crate) fn synthetic_value(base: i64, jitter: u32) -> i64 {
    let j: i64 = jitter as i64;
    base.saturating_add(random_range(-j..=j))
}

/// Synthetic producer loop: `rate` updates per second until `quit` is set.
pub(crate) async fn synthetic_producer(
    id: usize,
    sample: Arc<dyn Sample>,
    rate: u32,
    base: i64,
    jitter: u32,
    sent: Arc<AtomicU64>,
    quit: Arc<AtomicBool>,
) {
    let period: Duration = Duration::from_secs_f64(1.0 / rate.max(1) as f64);
    let mut ticker: Interval = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    debug!(producer = id, ?period, "producer started");

    while !quit.load(Ordering::Relaxed) {
        ticker.tick().await;
        sample.update(synthetic_value(base, jitter));
        sent.fetch_add(1, Ordering::Relaxed);
    }
    debug!(producer = id, "producer stopped");
}

/// Feed every integer line of `input` into `sample` until EOF or `quit`.
/// Lines which are not valid UTF-8 are decoded lossily and then skipped as
/// invalid. Returns the number of values fed.
pub(crate) fn feed_lines<R: BufRead>(
    mut input: R,
    sample: &dyn Sample,
    sent: &AtomicU64,
    quit: &AtomicBool,
) -> u64 {
    let mut fed: u64 = 0;
    let mut raw: Vec<u8> = Vec::new();
    let mut lineno: usize = 0;

    while !quit.load(Ordering::Relaxed) {
        raw.clear();
        match input.read_until(b'\n', &mut raw) {
            Ok(0) => break,
            Ok(_) => lineno += 1,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("Error reading input: {e}");
                break;
            }
        }
        let line: Cow<str> = String::from_utf8_lossy(&raw);
        match parse_line(&line) {
            Line::Value(v) => {
                sample.update(v);
                sent.fetch_add(1, Ordering::Relaxed);
                fed += 1;
            }
            Line::Skip => {}
            Line::Invalid => warn!(line = lineno, "Ignoring non-integer input {:?}", line.trim_end()),
        }
    }
    fed
}

/// Spawn a dedicated thread reading values from stdin. Sets `quit` at EOF.
pub(crate) fn spawn_stdin_reader(
    sample: Arc<dyn Sample>,
    sent: Arc<AtomicU64>,
    quit: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let fed: u64 = feed_lines(stdin().lock(), sample.as_ref(), &sent, &quit);
        info!(values = fed, "stdin closed, shutting down...");
        quit.store(true, Ordering::Relaxed);
    })
}

/// How the stdin reader thread ended, as seen at shutdown.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ReaderExit {
    Clean,
    Panicked,
    /// Still blocked on stdin (shutdown came from a signal or the run duration).
    Running,
}

/// Join the reader thread if it has finished; a blocked reader is left to end with the process.
pub(crate) fn reap_reader(handle: JoinHandle<()>) -> ReaderExit {
    if !handle.is_finished() {
        return ReaderExit::Running;
    }
    match handle.join() {
        Ok(()) => ReaderExit::Clean,
        Err(_) => {
            warn!("stdin reader thread panicked");
            ReaderExit::Panicked
        }
    }
}
