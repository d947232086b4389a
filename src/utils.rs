// Copyright (c) 2025 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use signal_hook::{
    consts::signal::{SIGINT, SIGQUIT, SIGTERM},
    iterator::{Signals, SignalsInfo},
};
use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tracing::{Level, warn};

/// Set up handlers for various termination signals.
///
/// Currently we handle:
///   - [SIGINT] - `Ctrl-C`
///   - [SIGTERM] - `kill -15` from shell or systemd etc
///   - [SIGQUIT] - `Ctrl-\`. This normally creates a core dump, but here we just exit cleanly.
pub(crate) fn setup_signal_handler(quit: Arc<AtomicBool>) {
    let listen: [i32; 3] = [SIGINT, SIGTERM, SIGQUIT];
    let mut signals: SignalsInfo = Signals::new(listen).expect("Error setting up signal handlers");

    std::thread::spawn(move || {
        for sig in signals.forever() {
            match sig {
                SIGINT => warn!("Received SIGINT (Ctrl-C), shutting down..."),
                SIGTERM => warn!("Received SIGTERM (kill -15), shutting down..."),
                SIGQUIT => warn!("Received SIGQUIT (Ctrl-\\), shutting down..."),
                _ => {}
            }
            quit.store(true, Ordering::Relaxed);
        }
    });
}

/// Install the stderr log subscriber. `debug` wins over `verbose`.
pub(crate) fn init_logging(verbose: bool, debug: bool) -> Result<(), String> {
    let level: Level = match (debug, verbose) {
        (true, _) => Level::TRACE,
        (false, true) => Level::INFO,
        _ => Level::WARN,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| format!("Failed to set up logging: {e}"))
}

/// Parse a floating point number of seconds into a Duration.
pub(crate) fn parse_float_into_duration(arg: &str) -> Result<Duration, String> {
    match arg.parse::<f64>() {
        Ok(secs) if secs > 0.0 && secs.is_finite() => {
            let millis = (secs * 1000.0).round() as u64;
            Ok(Duration::from_millis(millis.max(1)))
        }
        _ => Err(format!("Invalid time value: {arg}")),
    }
}

/// Parse a quantile in the range 0.0 - 1.0.
pub(crate) fn parse_quantile(arg: &str) -> Result<f64, String> {
    match arg.trim().parse::<f64>() {
        Ok(q) if (0.0..=1.0).contains(&q) => Ok(q),
        _ => Err(format!("Invalid quantile (expected 0.0 - 1.0): {arg}")),
    }
}

/// Column label for a quantile, e.g. 0.99 -> "p99", 0.999 -> "p99.9".
pub(crate) fn quantile_label(q: f64) -> String {
    let pct: f64 = (q * 1e5).round() / 1e3;
    format!("p{pct}")
}
