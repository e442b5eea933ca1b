//! Whole-population trend: magnitude-scaled scatter points plus a
//! connecting line, with the fixed 2020 callout.

use serde::{Deserialize, Serialize};

use crate::chart::{SchemaError, TREND_LINE_COLOR};
use crate::records::Record;

/// The callout's y-lookup requires a record for this year; its absence is
/// the one loud failure in the builders.
pub const CALLOUT_YEAR: u16 = 2020;
pub const CALLOUT_TEXT: &str = "Population drop due to COVID-19";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub year: u16,
    pub population: f64,
    /// Population relative to the series maximum, in [0, 1]. Drives point
    /// size and color.
    pub magnitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub color: String,
    pub width: f64,
    pub points: Vec<(u16, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Callout {
    pub year: u16,
    pub population: f64,
    pub text: String,
}

/// Zoom preset for the x axis. `span_years` of `None` means all time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangePreset {
    pub label: String,
    pub span_years: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendChart {
    pub x_title: String,
    pub y_title: String,
    pub points: Vec<TrendPoint>,
    pub line: LineSeries,
    pub callout: Callout,
    pub range_presets: Vec<RangePreset>,
}

pub fn build_trend(view: &[Record]) -> Result<TrendChart, SchemaError> {
    let mut rows: Vec<(u16, f64)> = view.iter().map(|r| (r.year, r.population)).collect();
    rows.sort_unstable_by_key(|(year, _)| *year);

    let callout_population = rows
        .iter()
        .find(|(year, _)| *year == CALLOUT_YEAR)
        .map(|(_, population)| *population)
        .ok_or_else(|| SchemaError {
            chart: "trend",
            msg: format!("no record for callout year {}", CALLOUT_YEAR),
        })?;

    let max = rows
        .iter()
        .map(|(_, population)| *population)
        .fold(0.0_f64, f64::max);
    let points = rows
        .iter()
        .map(|&(year, population)| TrendPoint {
            year,
            population,
            magnitude: if max > 0.0 { population / max } else { 0.0 },
        })
        .collect();

    Ok(TrendChart {
        x_title: "Year".to_string(),
        y_title: "Population".to_string(),
        points,
        line: LineSeries {
            name: "Trendline".to_string(),
            color: TREND_LINE_COLOR.to_string(),
            width: 2.0,
            points: rows,
        },
        callout: Callout {
            year: CALLOUT_YEAR,
            population: callout_population,
            text: CALLOUT_TEXT.to_string(),
        },
        range_presets: vec![
            RangePreset {
                label: "Last 10 Years".to_string(),
                span_years: Some(10),
            },
            RangePreset {
                label: "Last 20 Years".to_string(),
                span_years: Some(20),
            },
            RangePreset {
                label: "All Time".to_string(),
                span_years: None,
            },
        ],
    })
}
