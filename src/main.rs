// Copyright (c) 2025 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

mod args;
mod feed;
mod simplecolor;
mod structs;
mod tabulator;
mod utils;

use crate::{
    args::WsConfig,
    feed::{ReaderExit, reap_reader, spawn_stdin_reader, synthetic_producer},
    structs::AppState,
    tabulator::tabulate_with_missing,
    utils::{init_logging, setup_signal_handler},
};

use futures::future::join_all;
use itertools::Itertools;
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Duration,
};
use tokio::time::{self, Instant, Interval};
use tracing::info;

const DEFAULT_TICK: Duration = Duration::from_millis(100); // 10 Hz

////////////////////////////////////////////////////////////////////////////////

/// Start the value producers configured in `conf`.
fn start_producers(app: &mut AppState, conf: &WsConfig, sent: &Arc<AtomicU64>, quit: &Arc<AtomicBool>) {
    if conf.stdin {
        app.reader = Some(spawn_stdin_reader(app.sample.clone(), sent.clone(), quit.clone()));
        return;
    }
    for id in 0..conf.producers as usize {
        app.tasks.push(tokio::spawn(synthetic_producer(
            id,
            app.sample.clone(),
            conf.rate,
            conf.base,
            conf.jitter,
            sent.clone(),
            quit.clone(),
        )));
    }
}

////////////////////////////////////////////////////////////////////////////////

#[tokio::main(worker_threads = 4)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let conf: Arc<WsConfig> = WsConfig::parse().into();
    init_logging(conf.verbose, conf.debug)?;
    info!(
        capacity = conf.capacity,
        window = ?conf.window,
        interval = ?conf.interval,
        quantiles = %conf.quantiles.iter().join(","),
        source = if conf.stdin { "stdin" } else { "synthetic" },
        "starting"
    );

    let mut app: AppState = AppState::new(&conf);
    let quit: Arc<AtomicBool> = Arc::new(AtomicBool::new(false));
    let sent: Arc<AtomicU64> = Arc::new(AtomicU64::new(0));
    setup_signal_handler(quit.clone());
    start_producers(&mut app, &conf, &sent, &quit);

    let started: Instant = Instant::now();
    let mut tick: Interval = time::interval(DEFAULT_TICK.min(conf.interval));
    let mut next_report: Instant = started + conf.interval;
    let mut last_sent: u64 = 0;
    println!("{}", app.header_line());

    // Main report loop
    while !quit.load(Ordering::Relaxed) {
        tick.tick().await;
        if conf.duration.is_some_and(|d| started.elapsed() >= d) {
            info!("run duration reached, shutting down...");
            quit.store(true, Ordering::Relaxed);
            break;
        }
        if Instant::now() < next_report {
            continue;
        }

        let total: u64 = sent.load(Ordering::Relaxed);
        let row = app.record(started.elapsed(), total - last_sent, &conf.quantiles).clone();
        println!("{}", app.live_line(&row));
        last_sent = total;
        next_report += conf.interval;
    }

    // Cleanup
    info!("waiting for producers to terminate...");
    join_all(app.tasks.drain(..)).await;
    if let Some(reader) = app.reader.take() {
        let exit: ReaderExit = reap_reader(reader);
        info!(?exit, "stdin reader");
    }

    // Final report, then the whole history as a table
    let total: u64 = sent.load(Ordering::Relaxed);
    app.record(started.elapsed(), total - last_sent, &conf.quantiles);
    println!();
    let hdrs: Vec<&str> = app.headers.iter().map(String::as_str).collect();
    let rows = app.rows.iter().map(|r| r.cells(app.color));
    for line in tabulate_with_missing(rows, Some(hdrs.as_slice()), "-") {
        println!("{line}");
    }
    Ok(())
}
