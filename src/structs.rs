// Copyright (c) 2025 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    args::WsConfig,
    simplecolor::{faint, grn, yel},
    tabulator::{fill_missing, format_row, visible_len},
    utils::quantile_label,
};
use std::{collections::VecDeque, fmt::Display, sync::Arc, thread, time::Duration};
use tokio::task::JoinHandle;
use wsample::{Sample, SampleSnapshot, WindowedSample};

/// Report rows kept for the final summary table.
pub(crate) const MAX_REPORT_ROWS: usize = 3600;

/// Minimum width of a live report column.
const MIN_COL_WIDTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Empty,
    Ok,
    /// At capacity, new values are being dropped.
    Full,
}

impl Status {
    fn of(count: usize, capacity: usize) -> Self {
        match count {
            0 => Status::Empty,
            n if n >= capacity => Status::Full,
            _ => Status::Ok,
        }
    }

    fn colored(self) -> String {
        match self {
            Status::Empty => faint(self.to_string()).build(),
            Status::Ok => grn(self.to_string()).build(),
            Status::Full => yel(self.to_string()).build(),
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Empty => write!(f, "empty"),
            Status::Ok => write!(f, "ok"),
            Status::Full => write!(f, "full"),
        }
    }
}

/// One line of the report, computed from a single snapshot.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReportRow {
    pub elapsed: Duration,
    pub updates: u64,
    pub count: i64,
    pub min: i64,
    pub max: i64,
    pub mean: f64,
    pub stdev: f64,
    pub quantiles: Vec<f64>,
    pub status: Status,
}

impl ReportRow {
    pub fn new(elapsed: Duration, updates: u64, snap: &SampleSnapshot, qs: &[f64], capacity: usize) -> Self {
        Self {
            elapsed,
            updates,
            count: snap.count(),
            min: snap.min(),
            max: snap.max(),
            mean: snap.mean(),
            stdev: snap.std_dev(),
            quantiles: snap.percentiles(qs),
            status: Status::of(snap.size(), capacity),
        }
    }

    /// Table cells. Statistics are None for an empty window.
    pub fn cells(&self, color: bool) -> Vec<Option<String>> {
        let has_data: bool = self.count > 0;
        let stat = |s: String| has_data.then_some(s);

        let mut row: Vec<Option<String>> = vec![
            Some(format!("{:.1}s", self.elapsed.as_secs_f64())),
            Some(self.updates.to_string()),
            Some(self.count.to_string()),
            stat(self.min.to_string()),
            stat(self.max.to_string()),
            stat(format!("{:.1}", self.mean)),
            stat(format!("{:.1}", self.stdev)),
        ];
        row.extend(self.quantiles.iter().map(|q: &f64| stat(format!("{q:.1}"))));
        row.push(Some(match color {
            true => self.status.colored(),
            false => self.status.to_string(),
        }));
        row
    }
}

/// Program state for the reporting loop.
pub(crate) struct AppState {
    pub sample: Arc<WindowedSample>,
    pub tasks: Vec<JoinHandle<()>>,
    pub reader: Option<thread::JoinHandle<()>>, // stdin reader, if any
    pub headers: Vec<String>,
    pub widths: Vec<usize>,
    pub rows: VecDeque<ReportRow>,
    pub color: bool,
}

impl AppState {
    pub fn new(conf: &WsConfig) -> Self {
        let mut headers: Vec<String> = ["time", "updates", "count", "min", "max", "mean", "stdev"]
            .iter()
            .map(|h: &&str| h.to_string())
            .collect();
        headers.extend(conf.quantiles.iter().map(|q: &f64| quantile_label(*q)));
        headers.push("status".to_string());
        let widths: Vec<usize> = headers.iter().map(|h| visible_len(h).max(MIN_COL_WIDTH)).collect();

        Self {
            sample: Arc::new(WindowedSample::new(conf.capacity as usize, conf.window)),
            tasks: Vec::new(),
            reader: None,
            headers,
            widths,
            rows: VecDeque::new(),
            color: !conf.no_color,
        }
    }

    /// Snapshot the sample and store the resulting row.
    pub fn record(&mut self, elapsed: Duration, updates: u64, qs: &[f64]) -> &ReportRow {
        let snap: SampleSnapshot = self.sample.snapshot();
        if self.rows.len() >= MAX_REPORT_ROWS {
            self.rows.pop_front();
        }
        self.rows
            .push_back(ReportRow::new(elapsed, updates, &snap, qs, self.sample.capacity()));
        &self.rows[self.rows.len() - 1]
    }

    /// Fixed-width header line for the live report.
    pub fn header_line(&self) -> String {
        format_row(&self.headers, &self.widths, "")
    }

    /// Fixed-width live report line for `row`.
    pub fn live_line(&self, row: &ReportRow) -> String {
        format_row(&fill_missing(row.cells(self.color), "-"), &self.widths, "-")
    }
}
