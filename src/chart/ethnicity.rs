//! Ethnicity composition: one pie frame per year. The category set is
//! whatever that year's rows carry; the source taxonomy changes over the
//! decades and frames must not assume a shared slice set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::chart::Playback;
use crate::records::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    /// Fraction of the frame total, in [0, 1]. Rendered next to the label.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieFrame {
    pub year: u16,
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthnicityAnimation {
    pub title: String,
    /// One frame per year, strictly ascending.
    pub frames: Vec<PieFrame>,
    pub playback: Playback,
}

pub fn build_ethnicity_animation(view: &[Record], playback: Playback) -> EthnicityAnimation {
    let mut by_year: BTreeMap<u16, Vec<(String, f64)>> = BTreeMap::new();
    for r in view {
        by_year
            .entry(r.year)
            .or_default()
            .push((r.ethnicity.clone(), r.population));
    }

    let frames = by_year
        .into_iter()
        .map(|(year, rows)| {
            let total: f64 = rows.iter().map(|(_, population)| population).sum();
            let slices = rows
                .into_iter()
                .map(|(label, value)| PieSlice {
                    label,
                    value,
                    share: if total > 0.0 { value / total } else { 0.0 },
                })
                .collect();
            PieFrame { year, slices }
        })
        .collect();

    EthnicityAnimation {
        title: "Population Distribution by Ethnicity and Year".to_string(),
        frames,
        playback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Sex, OVERALL};

    fn rec(year: u16, ethnicity: &str, population: f64) -> Record {
        Record {
            year,
            sex: Sex::Both,
            age: OVERALL.to_string(),
            ethnicity: ethnicity.to_string(),
            population,
        }
    }

    #[test]
    fn slice_sets_may_differ_between_frames() {
        let view = vec![
            rec(1980, "Malay", 7_000.0),
            rec(1980, "Chinese", 4_000.0),
            rec(1980, "Indian", 1_200.0),
            rec(1980, "Other", 300.0),
            rec(2024, "Malay Bumiputera", 17_000.0),
            rec(2024, "Other Bumiputera", 4_000.0),
            rec(2024, "Chinese", 7_000.0),
            rec(2024, "Indian", 2_300.0),
            rec(2024, "Other", 400.0),
            rec(2024, "Other non-citizens", 3_300.0),
        ];
        let chart = build_ethnicity_animation(&view, Playback::default());
        assert_eq!(chart.frames.len(), 2);
        assert_eq!(chart.frames[0].year, 1980);
        assert_eq!(chart.frames[0].slices.len(), 4);
        assert_eq!(chart.frames[1].slices.len(), 6);
    }

    #[test]
    fn shares_sum_to_one_per_frame() {
        let view = vec![
            rec(2000, "Malay", 6_000.0),
            rec(2000, "Chinese", 3_000.0),
            rec(2000, "Indian", 1_000.0),
        ];
        let chart = build_ethnicity_animation(&view, Playback::default());
        let total: f64 = chart.frames[0].slices.iter().map(|s| s.share).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert_eq!(chart.frames[0].slices[0].share, 0.6);
    }

    #[test]
    fn empty_view_renders_an_empty_chart() {
        let chart = build_ethnicity_animation(&[], Playback::default());
        assert!(chart.frames.is_empty());
    }

    #[test]
    fn zero_total_frame_has_zero_shares() {
        let view = vec![rec(1999, "Other", 0.0)];
        let chart = build_ethnicity_animation(&view, Playback::default());
        assert_eq!(chart.frames[0].slices[0].share, 0.0);
    }
}
