//! Playback planning for trajectory animations.
//!
//! Rendering lives outside this crate. Consumers get a [`PlaybackPlan`] that
//! fixes the cubic view volume around Earth and the subset of rows shown as
//! frames, so every renderer plays a table back at the same constant rate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::table::TableRow;

#[derive(Debug, Error, PartialEq)]
pub enum PlaybackError {
    #[error("trajectory table has no data rows")]
    Empty,
    #[error("invalid playback setting {0}")]
    InvalidSetting(&'static str),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Scale applied to the largest absolute coordinate.
    pub margin: f64,
    pub frame_skip: usize,
    pub frame_interval_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            margin: 1.1,
            frame_skip: 15,
            frame_interval_ms: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub row: usize,
    pub time: f64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaybackPlan {
    pub rows: usize,
    pub max_abs_coordinate: f64,
    /// Every axis spans `-axis_range..=axis_range` (m).
    pub axis_range: f64,
    pub frame_interval_ms: u64,
    pub frames: Vec<Frame>,
}

impl PlaybackPlan {
    pub fn from_rows(
        rows: &[TableRow],
        settings: &PlaybackSettings,
    ) -> Result<Self, PlaybackError> {
        if rows.is_empty() {
            return Err(PlaybackError::Empty);
        }
        if settings.frame_skip == 0 {
            return Err(PlaybackError::InvalidSetting("frame_skip"));
        }
        if !(settings.margin.is_finite() && settings.margin > 0.0) {
            return Err(PlaybackError::InvalidSetting("margin"));
        }

        let max_abs_coordinate = rows
            .iter()
            .map(TableRow::max_abs_coordinate)
            .fold(0.0_f64, f64::max);

        let frames = rows
            .iter()
            .enumerate()
            .step_by(settings.frame_skip)
            .map(|(row, r)| Frame {
                row,
                time: r.time,
                label: format!("t = {:.1} s", r.time),
            })
            .collect();

        Ok(PlaybackPlan {
            rows: rows.len(),
            max_abs_coordinate,
            axis_range: max_abs_coordinate * settings.margin,
            frame_interval_ms: settings.frame_interval_ms,
            frames,
        })
    }

    /// Wall-clock length of the animation at the configured frame interval.
    pub fn playback_ms(&self) -> u64 {
        self.frames.len() as u64 * self.frame_interval_ms
    }
}
