//! Population pyramid: male and female counts back to back over a shared
//! age-band axis. Male values are negated so they draw left of the zero
//! line. Rebuilt whole on every year change.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::chart::{FEMALE_COLOR, MALE_COLOR};
use crate::records::{Record, Sex};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideSeries {
    pub name: String,
    pub color: String,
    /// One value per age band, aligned with the chart's `age_bands`.
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PyramidChart {
    pub year: u16,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    /// Shared vertical axis, ascending by band lower bound. Both series
    /// index into it, so left and right bars align row for row.
    pub age_bands: Vec<String>,
    pub male: SideSeries,
    pub female: SideSeries,
}

/// Numeric lower bound of an age-band label: `"0-4"` → 0, `"85+"` → 85.
/// Labels without a leading number sort last.
fn band_lower_bound(label: &str) -> u32 {
    let digits: String = label.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(u32::MAX)
}

pub fn build_pyramid(view: &[Record], year: u16) -> PyramidChart {
    let mut male: HashMap<&str, f64> = HashMap::new();
    let mut female: HashMap<&str, f64> = HashMap::new();
    let mut age_bands: Vec<String> = Vec::new();
    for r in view {
        if !age_bands.iter().any(|band| band == &r.age) {
            age_bands.push(r.age.clone());
        }
        match r.sex {
            Sex::Male => {
                male.insert(r.age.as_str(), r.population);
            }
            Sex::Female => {
                female.insert(r.age.as_str(), r.population);
            }
            Sex::Both => {}
        }
    }
    age_bands.sort_by(|a, b| {
        band_lower_bound(a)
            .cmp(&band_lower_bound(b))
            .then_with(|| a.cmp(b))
    });

    // A band one sex lacks still gets a slot (0) so the two series stay the
    // same length as the shared axis.
    let male_values: Vec<f64> = age_bands
        .iter()
        .map(|band| -male.get(band.as_str()).copied().unwrap_or(0.0))
        .collect();
    let female_values: Vec<f64> = age_bands
        .iter()
        .map(|band| female.get(band.as_str()).copied().unwrap_or(0.0))
        .collect();

    PyramidChart {
        year,
        title: format!("Population Pyramid for {}", year),
        x_title: "Population".to_string(),
        y_title: "Age Group".to_string(),
        age_bands,
        male: SideSeries {
            name: format!("Male {}", year),
            color: MALE_COLOR.to_string(),
            values: male_values,
        },
        female: SideSeries {
            name: format!("Female {}", year),
            color: FEMALE_COLOR.to_string(),
            values: female_values,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::OVERALL;

    fn rec(year: u16, sex: Sex, age: &str, population: f64) -> Record {
        Record {
            year,
            sex,
            age: age.to_string(),
            ethnicity: OVERALL.to_string(),
            population,
        }
    }

    #[test]
    fn bands_sort_numerically_not_lexically() {
        let view = vec![
            rec(2024, Sex::Male, "10-14", 1_200.0),
            rec(2024, Sex::Male, "5-9", 1_100.0),
            rec(2024, Sex::Male, "85+", 90.0),
            rec(2024, Sex::Male, "0-4", 1_000.0),
            rec(2024, Sex::Female, "0-4", 950.0),
        ];
        let chart = build_pyramid(&view, 2024);
        assert_eq!(chart.age_bands, vec!["0-4", "5-9", "10-14", "85+"]);
    }

    #[test]
    fn series_align_with_the_shared_axis() {
        let view = vec![
            rec(2024, Sex::Male, "0-4", 1_000.0),
            rec(2024, Sex::Female, "0-4", 950.0),
            // No male row for this band.
            rec(2024, Sex::Female, "5-9", 900.0),
        ];
        let chart = build_pyramid(&view, 2024);
        assert_eq!(chart.age_bands.len(), 2);
        assert_eq!(chart.male.values.len(), chart.age_bands.len());
        assert_eq!(chart.female.values.len(), chart.age_bands.len());
        assert_eq!(chart.male.values[0], -1_000.0);
        assert_eq!(chart.male.values[1], 0.0);
        assert_eq!(chart.female.values[1], 900.0);
    }

    #[test]
    fn male_side_is_negated_female_is_not() {
        let view = vec![
            rec(1970, Sex::Male, "0-4", 500.0),
            rec(1970, Sex::Female, "0-4", 480.0),
        ];
        let chart = build_pyramid(&view, 1970);
        assert!(chart.male.values[0] < 0.0);
        assert!(chart.female.values[0] > 0.0);
        assert_eq!(chart.male.name, "Male 1970");
        assert_eq!(chart.female.name, "Female 1970");
    }

    #[test]
    fn empty_view_renders_a_degenerate_chart() {
        let chart = build_pyramid(&[], 1900);
        assert_eq!(chart.year, 1900);
        assert!(chart.age_bands.is_empty());
        assert!(chart.male.values.is_empty());
        assert!(chart.female.values.is_empty());
    }
}
