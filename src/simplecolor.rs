// Copyright (c) 2025 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal ANSI coloring for report cells.

use std::fmt;

const ANSI_BEG: &str = "\x1b[";
const ANSI_SEP: char = ';';
const ANSI_END: char = 'm';
const ANSI_FAINT: u8 = 2;

/// Full ANSI clear string for convenience
pub const CLR: &str = "\x1b[0m";

/// ANSI foreground color codes
#[derive(Clone, Copy, Debug)]
pub enum AnsiColor {
    Green = 32,
    Yellow = 33,
}

/// Struct for building ANSI-formatted strings
#[derive(Clone, Debug)]
pub struct AnsiString {
    text: String,
    codes: Vec<u8>,
}

impl AnsiString {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            codes: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: u8) -> Self {
        self.codes.push(code);
        self
    }

    pub fn with_fg(mut self, color: AnsiColor) -> Self {
        self.codes.push(color as u8);
        self
    }

    pub fn build(&self) -> String {
        if self.codes.is_empty() {
            return self.text.clone();
        }
        let codes_str = self
            .codes
            .iter()
            .map(|&c| c.to_string())
            .collect::<Vec<_>>()
            .join(&ANSI_SEP.to_string());
        format!("{ANSI_BEG}{codes_str}{ANSI_END}{}{CLR}", self.text)
    }
}

impl fmt::Display for AnsiString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.build())
    }
}

#[inline]
pub fn faint(text: impl Into<String>) -> AnsiString {
    AnsiString::new(text).with_code(ANSI_FAINT)
}
#[inline]
pub fn grn(text: impl Into<String>) -> AnsiString {
    AnsiString::new(text).with_fg(AnsiColor::Green)
}
#[inline]
pub fn yel(text: impl Into<String>) -> AnsiString {
    AnsiString::new(text).with_fg(AnsiColor::Yellow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build() {
        assert_eq!(AnsiString::new("ok").build(), "ok", "No codes -> plain text");
        assert_eq!(grn("ok").build(), "\x1b[32mok\x1b[0m");
        assert_eq!(yel("full").to_string(), "\x1b[33mfull\x1b[0m");
        assert_eq!(faint("x").with_fg(AnsiColor::Green).build(), "\x1b[2;32mx\x1b[0m", "Codes join in order");
        assert_eq!(faint("-").build(), "\x1b[2m-\x1b[0m");
    }
}
