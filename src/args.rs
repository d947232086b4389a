// Copyright (c) 2025 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::utils::{parse_float_into_duration, parse_quantile};
use clap::{Parser, crate_authors, crate_description, crate_name, crate_version, value_parser};
use itertools::Itertools;
use std::time::Duration;

/// Configuration struct for the program.
#[derive(Parser, Default, Debug, Clone)]
#[command(name = crate_name!(), version = crate_version!(), author = crate_authors!(), about = crate_description!())]
pub(crate) struct WsConfig {
    #[arg(
        long,
        short = 'c',
        value_name = "NUM",
        value_parser = value_parser!(u32).range(1..=1_000_000),
        default_value = "1028",
        help = "Sample capacity (maximum number of values held at once)"
    )]
    pub capacity: u32,

    #[arg(
        long,
        short = 'w',
        value_name = "SECS",
        value_parser = parse_float_into_duration,
        default_value = "60",
        help = "Sliding window length; older values are dropped"
    )]
    pub window: Duration,

    #[arg(
        long,
        short = 'I',
        value_name = "SECS",
        value_parser = parse_float_into_duration,
        default_value = "1",
        help = "Interval between reports"
    )]
    pub interval: Duration,

    #[arg(
        long,
        short = 'p',
        value_name = "NUM",
        value_parser = value_parser!(u16).range(1..=256),
        default_value = "4",
        help = "Number of synthetic producers"
    )]
    pub producers: u16,

    #[arg(
        long,
        short = 'r',
        value_name = "NUM",
        value_parser = value_parser!(u32).range(1..=100_000),
        default_value = "20",
        help = "Updates per second per synthetic producer"
    )]
    pub rate: u32,

    #[arg(
        long,
        short = 'b',
        value_name = "NUM",
        allow_negative_numbers = true,
        default_value = "20000",
        help = "Center of the synthetic value distribution"
    )]
    pub base: i64,

    #[arg(
        long,
        short = 'j',
        value_name = "NUM",
        default_value = "5000",
        help = "Synthetic values are uniform in base +/- jitter"
    )]
    pub jitter: u32,

    #[arg(
        long,
        short = 'q',
        value_name = "Q1,Q2...",
        value_delimiter = ',',
        value_parser = parse_quantile,
        default_values_t = [0.5, 0.9, 0.99],
        help = "Comma separated quantiles (0.0 - 1.0) to report"
    )]
    pub quantiles: Vec<f64>,

    #[arg(
        long,
        short = 'd',
        value_name = "SECS",
        value_parser = parse_float_into_duration,
        help = "Stop after this long (default: run until interrupted)"
    )]
    pub duration: Option<Duration>,

    #[arg(long, help = "Read one integer value per line from stdin instead of synthesizing")]
    pub stdin: bool,

    #[arg(long, help = "Disable colored status output")]
    pub no_color: bool,

    #[arg(long, short = 'v', help = "Increase output verbosity")]
    pub verbose: bool,

    #[arg(long, help = "Print debug information where applicable")]
    pub debug: bool,
}

impl WsConfig {
    /// Parses command line arguments and returns a [WsConfig] struct.
    pub fn parse() -> WsConfig {
        <WsConfig as Parser>::parse().normalized()
    }

    /// Sort and dedup quantiles, clamp the report interval between 100ms and 60s.
    fn normalized(mut self) -> WsConfig {
        self.quantiles = self
            .quantiles
            .iter()
            .copied()
            .sorted_by(f64::total_cmp)
            .dedup()
            .collect();

        self.interval = match self.interval {
            d if d < Duration::from_millis(100) => Duration::from_millis(100),
            d if d > Duration::from_secs(60) => Duration::from_secs(60),
            d => d,
        };
        self
    }
}
