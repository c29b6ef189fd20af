/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::io;

use crate::data::LineType;

pub type Result<T, E = ChartError> = std::result::Result<T, E>;

/// Everything that can go wrong while loading a chart or querying its stats.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The JSON is well-formed but does not describe a valid chart.
    #[error("bad chart data: {0}")]
    Format(String),

    #[error("unknown line type `{0}`")]
    UnknownLineType(String),

    #[error("line type {found:?} differs from the chart's {expected:?}")]
    MixedLineTypes { expected: LineType, found: LineType },

    #[error("unknown color `{0}`")]
    UnknownColor(String),

    #[error("chart needs {0}")]
    Empty(&'static str),

    #[error("line {line} has {found} values, expected {expected}")]
    LengthMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("range {l}..={r} is outside 0..{points}")]
    InvalidRange { l: usize, r: usize, points: usize },

    #[error("got {found} visibility states for {expected} lines")]
    VisibilityMismatch { expected: usize, found: usize },
}

impl ChartError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        ChartError::Format(msg.into())
    }
}
