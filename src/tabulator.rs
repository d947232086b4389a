// Copyright (c) 2025 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::Display;

lazy_static! {
    /// Regex to match ANSI escape codes
    static ref ANSI_RX: Regex = Regex::new(r"\x1b\[[0-9;]*m").unwrap();
}

/// Return the visible length of a string, ignoring ANSI escape codes
#[inline]
pub fn visible_len(s: &str) -> usize {
    ANSI_RX.replace_all(s, "").chars().count()
}

/// Format a single row with padding. Short rows are filled with `missing`.
pub fn format_row(row: &[String], widths: &[usize], missing: &str) -> String {
    let mut items: Vec<String> = Vec::with_capacity(widths.len());

    for (i, item) in row.iter().enumerate() {
        let pad: String = " ".repeat(widths[i].saturating_sub(visible_len(item)));
        items.push(format!("{item}{pad}"));
    }

    let missing_vis_len: usize = visible_len(missing);
    for w in &widths[items.len().min(widths.len())..] {
        let pad: String = " ".repeat(w.saturating_sub(missing_vis_len));
        items.push(format!("{missing}{pad}"));
    }
    items.join(" | ")
}

/// Stringify a row, replacing None values with `missing`.
pub fn fill_missing<R, T>(row: R, missing: &str) -> Vec<String>
where
    R: IntoIterator<Item = Option<T>>,
    T: Display,
{
    row.into_iter()
        .map(|item| match item {
            Some(val) => val.to_string(),
            None => missing.to_string(),
        })
        .collect()
}

/// Format a collection of rows as a table for printing. Handles Option<T> values,
/// replacing None with the provided `missing` string.
///
/// ## Arguments
/// * `data` - Iterator of rows (each row is an iterator of items)
/// * `headers` - Optional slice of column headers
/// * `missing` - String to replace None values with
///
/// ## Returns
///   * Vec of Strings containing the formatted table
pub fn tabulate_with_missing<I, R, T>(
    data: I,
    headers: Option<&[&str]>,
    missing: &str,
) -> Vec<String>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = Option<T>>,
    T: Display,
{
    let mut rows: Vec<Vec<String>> = Vec::new();
    if let Some(hdrs) = headers {
        rows.push(hdrs.iter().map(|h: &&str| h.to_string()).collect());
    }
    rows.extend(data.into_iter().map(|row| fill_missing(row, missing)));

    if rows.is_empty() {
        return Vec::new();
    }

    // Find the maximum width needed for each column (based on visible lengths)
    let columns: usize = rows.iter().map(|row: &Vec<String>| row.len()).max().unwrap_or(1);
    let mut widths: Vec<usize> = vec![visible_len(missing); columns];
    for row in &rows {
        for (i, item) in row.iter().enumerate() {
            widths[i] = widths[i].max(visible_len(item));
        }
    }

    let mut out: Vec<String> = Vec::with_capacity(rows.len() + 1);
    let start_index: usize = if headers.is_some() {
        // Format headers with a separator line
        out.push(format_row(&rows[0], &widths, missing));
        out.push(
            widths
                .iter()
                .map(|w: &usize| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        1
    } else {
        0
    };

    for row in &rows[start_index..] {
        out.push(format_row(row, &widths, missing));
    }
    out
}
