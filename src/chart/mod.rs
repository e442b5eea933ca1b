//! Chart specifications: the renderable descriptions each view produces.
//!
//! Every builder is a pure function `view → spec`. Specs are plain serde
//! values handed to the presentation layer as JSON; nothing here knows how
//! they end up drawn. Each rebuild is a full recomputation; no spec is
//! ever patched in place.

pub mod ethnicity;
pub mod pyramid;
pub mod sex;
pub mod trend;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use ethnicity::{build_ethnicity_animation, EthnicityAnimation, PieFrame, PieSlice};
pub use pyramid::{build_pyramid, PyramidChart, SideSeries};
pub use sex::{build_sex_animation, Bar, BarFrame, SexAnimation};
pub use trend::{build_trend, Callout, LineSeries, RangePreset, TrendChart, TrendPoint};

// Series colors carried into the specs so every renderer draws the same
// dashboard.
pub const MALE_COLOR: &str = "rgba(0, 123, 255, 0.8)";
pub const FEMALE_COLOR: &str = "rgba(255, 99, 132, 0.8)";
pub const TREND_LINE_COLOR: &str = "red";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionMode {
    Immediate,
    Smooth,
}

impl TransitionMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "immediate" => Some(TransitionMode::Immediate),
            "smooth" => Some(TransitionMode::Smooth),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionMode::Immediate => "immediate",
            TransitionMode::Smooth => "smooth",
        }
    }
}

/// Playback settings shared by the animated charts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playback {
    pub frame_duration_ms: u64,
    pub transition: TransitionMode,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            frame_duration_ms: 500,
            transition: TransitionMode::Immediate,
        }
    }
}

/// A category or row the loaded table was required to carry is absent.
/// Fatal for the one chart that needed it; the other views still render.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    pub chart: &'static str,
    pub msg: String,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} chart: {}", self.chart, self.msg)
    }
}

impl std::error::Error for SchemaError {}
