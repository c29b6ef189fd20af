/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! # Chart input data.
//!
//! A chart as loaded from disk: one shared X axis (timestamps in milliseconds)
//! and one or more value lines that all share the same [`LineType`].

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::{ChartError, Result};

/// How the value lines of a chart are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    Line,
    Bar,
    Area,
}

impl LineType {
    /// Bar and area charts stack their lines on top of each other.
    pub fn is_stacked(&self) -> bool {
        matches!(self, LineType::Bar | LineType::Area)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineType::Line => "line",
            LineType::Bar => "bar",
            LineType::Area => "area",
        }
    }
}

impl FromStr for LineType {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "line" => Ok(LineType::Line),
            "bar" => Ok(LineType::Bar),
            "area" => Ok(LineType::Area),
            _ => Err(ChartError::UnknownLineType(s.to_owned())),
        }
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Optional presentation flags carried by a chart.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ChartFlags: u8 {
        const PERCENTAGE = 1 << 0;
        const STACKED = 1 << 1;
        const Y_SCALED = 1 << 2;
    }
}

/// One value line of a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartLine {
    pub name: String,
    /// ARGB, as produced by a [`crate::ColorParser`].
    pub color: i32,
    pub values: Vec<i32>,
}

/// A chart ready to be handed to the views.
///
/// Deserializing goes through [`ChartInputData::new`], so a chart read back
/// from JSON is checked like any other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedChartInputData")]
pub struct ChartInputData {
    x_values: Vec<i64>,
    lines: Vec<ChartLine>,
    line_type: LineType,
    flags: ChartFlags,
}

#[derive(Deserialize)]
struct UncheckedChartInputData {
    x_values: Vec<i64>,
    lines: Vec<ChartLine>,
    line_type: LineType,
    flags: ChartFlags,
}

impl TryFrom<UncheckedChartInputData> for ChartInputData {
    type Error = ChartError;

    fn try_from(raw: UncheckedChartInputData) -> Result<Self> {
        Self::new(raw.x_values, raw.lines, raw.line_type, raw.flags)
    }
}

impl ChartInputData {
    /// Build a chart, checking that it has at least one line and one point and
    /// that every line covers the whole X axis.
    pub fn new(
        x_values: Vec<i64>,
        lines: Vec<ChartLine>,
        line_type: LineType,
        flags: ChartFlags,
    ) -> Result<Self> {
        if lines.is_empty() {
            return Err(ChartError::Empty("at least one line"));
        }
        if x_values.is_empty() {
            return Err(ChartError::Empty("at least one point"));
        }
        for (i, line) in lines.iter().enumerate() {
            if line.values.len() != x_values.len() {
                return Err(ChartError::LengthMismatch {
                    line: i,
                    expected: x_values.len(),
                    found: line.values.len(),
                });
            }
        }

        Ok(Self {
            x_values,
            lines,
            line_type,
            flags,
        })
    }

    pub fn x_values(&self) -> &[i64] {
        &self.x_values
    }

    pub fn lines(&self) -> &[ChartLine] {
        &self.lines
    }

    pub fn line_type(&self) -> LineType {
        self.line_type
    }

    pub fn flags(&self) -> ChartFlags {
        self.flags
    }

    pub fn lines_count(&self) -> usize {
        self.lines.len()
    }

    pub fn points_count(&self) -> usize {
        self.x_values.len()
    }
}
