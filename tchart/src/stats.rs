/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! # Per-chart statistics.
//!
//! The views need to know, for the visible part of the X axis, how far the
//! visible lines extend along Y. Lines can be switched on and off (with an
//! animated fade in between), so every line carries a visibility state from
//! [`VISIBILITY_STATE_OFF`] to [`VISIBILITY_STATE_ON`].

use crate::{ChartError, ChartInputData, LineType, Result};

pub const VISIBILITY_STATE_ON: u8 = 255;
pub const VISIBILITY_STATE_OFF: u8 = 0;

/// The Y extent of a range of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YRange {
    pub min: i32,
    pub max: i32,
}

impl YRange {
    /// What a search over no values at all yields.
    pub const EMPTY: YRange = YRange {
        min: i32::MAX,
        max: i32::MIN,
    };

    const PERCENT: YRange = YRange { min: 0, max: 100 };

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// `|max - min|`, or 0 for an empty range.
    pub fn abs_swing(&self) -> i32 {
        if self.is_empty() {
            return 0;
        }
        let swing = (i64::from(self.max) - i64::from(self.min)).unsigned_abs();
        i32::try_from(swing).unwrap_or(i32::MAX)
    }

    fn include(&mut self, val: i32) {
        self.min = self.min.min(val);
        self.max = self.max.max(val);
    }
}

#[derive(Debug, Clone)]
pub struct ChartInputDataStats {
    data: ChartInputData,
    lines_visibility_state: Vec<u8>,
    // Only kept for stacked (bar and area) charts.
    stacked_sum: Option<Vec<i32>>,
    tmp_stacked_sum: Vec<i32>,
}

impl ChartInputDataStats {
    /// Start tracking `data` with every line fully visible.
    pub fn new(data: ChartInputData) -> Self {
        let lines_visibility_state = vec![VISIBILITY_STATE_ON; data.lines_count()];
        let stacked_sum = if data.line_type().is_stacked() {
            let mut sum = vec![0; data.points_count()];
            update_stacked_sum(&data, &mut sum, &lines_visibility_state);
            Some(sum)
        } else {
            None
        };

        Self {
            data,
            lines_visibility_state,
            stacked_sum,
            tmp_stacked_sum: Vec::new(),
        }
    }

    pub fn data(&self) -> &ChartInputData {
        &self.data
    }

    pub fn lines_visibility_state(&self) -> &[u8] {
        &self.lines_visibility_state
    }

    pub fn line_visibility_state(&self, line_index: usize) -> Option<u8> {
        self.lines_visibility_state.get(line_index).copied()
    }

    /// Set the visibility of one line.
    ///
    /// With `except_line` every other line that is not switched off gets the
    /// complementary state, which is how the "show only this line" long-press
    /// fades the rest out. Indices past the last line are ignored.
    pub fn update_line_visibility(&mut self, line_index: usize, except_line: bool, state: u8) {
        if line_index >= self.lines_visibility_state.len() {
            log::debug!("ignoring visibility update for missing line {line_index}");
            return;
        }

        if except_line {
            let other_lines_state = VISIBILITY_STATE_ON - state;
            for s in self
                .lines_visibility_state
                .iter_mut()
                .filter(|s| **s != VISIBILITY_STATE_OFF)
            {
                *s = other_lines_state;
            }
        }
        self.lines_visibility_state[line_index] = state;

        if let Some(sum) = &mut self.stacked_sum {
            update_stacked_sum(&self.data, sum, &self.lines_visibility_state);
        }
    }

    /// Number of lines whose state is not [`VISIBILITY_STATE_OFF`].
    pub fn visible_lines_count(&self) -> usize {
        self.lines_visibility_state
            .iter()
            .filter(|s| **s != VISIBILITY_STATE_OFF)
            .count()
    }

    pub fn stacked_sum(&self) -> Option<&[i32]> {
        self.stacked_sum.as_deref()
    }

    /// Y extent of the points `l..=r` when the lines have the given `states`.
    ///
    /// Area charts are always drawn as percentages, so they report `0..=100`.
    pub fn find_y_min_max(&mut self, l: usize, r: usize, states: &[u8]) -> Result<YRange> {
        let points = self.data.points_count();
        if l > r || r >= points {
            return Err(ChartError::InvalidRange { l, r, points });
        }
        if states.len() != self.data.lines_count() {
            return Err(ChartError::VisibilityMismatch {
                expected: self.data.lines_count(),
                found: states.len(),
            });
        }

        let mut range = YRange::EMPTY;
        match self.data.line_type() {
            LineType::Line => {
                for (line, _) in self
                    .data
                    .lines()
                    .iter()
                    .zip(states)
                    .filter(|(_, s)| **s != VISIBILITY_STATE_OFF)
                {
                    for &val in &line.values[l..=r] {
                        range.include(val);
                    }
                }
            }
            LineType::Bar => {
                self.tmp_stacked_sum.resize(points, 0);
                update_stacked_sum(&self.data, &mut self.tmp_stacked_sum, states);
                for &val in &self.tmp_stacked_sum[l..=r] {
                    range.include(val);
                }
            }
            LineType::Area => range = YRange::PERCENT,
        }

        Ok(range)
    }

    /// `|max - min|` of [`Self::find_y_min_max`].
    pub fn find_y_abs_swing(&mut self, l: usize, r: usize, states: &[u8]) -> Result<i32> {
        Ok(self.find_y_min_max(l, r, states)?.abs_swing())
    }
}

// Partially visible lines contribute proportionally to their state.
fn update_stacked_sum(data: &ChartInputData, sum: &mut [i32], states: &[u8]) {
    sum.iter_mut().for_each(|v| *v = 0);

    for (line, &state) in data.lines().iter().zip(states) {
        if state == VISIBILITY_STATE_OFF {
            continue;
        }

        let line_k = f32::from(state) / f32::from(VISIBILITY_STATE_ON);
        for (acc, &val) in sum.iter_mut().zip(&line.values) {
            *acc = acc.wrapping_add((val as f32 * line_k) as i32);
        }
    }
}
