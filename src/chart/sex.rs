//! Sex comparison: one categorical bar frame per year, played back in
//! ascending year order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::chart::Playback;
use crate::records::{Record, Sex};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarFrame {
    pub year: u16,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SexAnimation {
    pub title: String,
    /// One frame per year, strictly ascending.
    pub frames: Vec<BarFrame>,
    /// One y range for every frame, so the axis holds still during playback.
    pub y_range: (f64, f64),
    /// Draw each bar's value outside the bar.
    pub value_labels_outside: bool,
    pub playback: Playback,
}

fn bar_order(sex: Sex) -> u8 {
    match sex {
        Sex::Male => 0,
        Sex::Female => 1,
        Sex::Both => 2,
    }
}

/// Expects the sex view with combined rows already appended, so each frame
/// carries `male`, `female`, `Both`.
pub fn build_sex_animation(view: &[Record], playback: Playback) -> SexAnimation {
    let mut by_year: BTreeMap<u16, Vec<(u8, Bar)>> = BTreeMap::new();
    for r in view {
        by_year.entry(r.year).or_default().push((
            bar_order(r.sex),
            Bar {
                label: r.sex.category_label().to_string(),
                value: r.population,
            },
        ));
    }

    let mut y_max = 0.0_f64;
    let mut frames = Vec::with_capacity(by_year.len());
    for (year, mut bars) in by_year {
        bars.sort_by_key(|(order, _)| *order);
        let bars: Vec<Bar> = bars.into_iter().map(|(_, bar)| bar).collect();
        for bar in &bars {
            y_max = y_max.max(bar.value);
        }
        frames.push(BarFrame { year, bars });
    }

    SexAnimation {
        title: "Population in Millions by Sex and Year".to_string(),
        frames,
        y_range: if y_max > 0.0 {
            (0.0, y_max * 1.05)
        } else {
            (0.0, 0.0)
        },
        value_labels_outside: true,
        playback,
    }
}
