//! View filters and the combined-sexes aggregator.
//!
//! Each filter is a pure projection of the store into the subset one chart
//! consumes. Filters clone the matching rows: views are ephemeral, owned by
//! the builder that consumes them, and cheap at census scale.

use std::collections::BTreeMap;

use crate::records::{Record, RecordStore, Sex, OVERALL};

/// Rows feeding the whole-population trend: the source-side aggregate
/// across sex, age and ethnicity.
pub fn overall_view(store: &RecordStore) -> Vec<Record> {
    store
        .records()
        .iter()
        .filter(|r| r.sex == Sex::Both && r.is_overall_age() && r.is_overall_ethnicity())
        .cloned()
        .collect()
}

/// Rows feeding the sex comparison: male/female totals per year. Excludes
/// the source `both` rows so the derived combined row never double-counts.
pub fn sex_view(store: &RecordStore) -> Vec<Record> {
    store
        .records()
        .iter()
        .filter(|r| {
            r.year >= 1970
                && matches!(r.sex, Sex::Male | Sex::Female)
                && r.is_overall_age()
                && r.is_overall_ethnicity()
        })
        .cloned()
        .collect()
}

/// Rows feeding the ethnicity pie: everything with a concrete ethnicity.
/// Sex and age are already pre-aggregated in the source for this slice.
pub fn ethnicity_view(store: &RecordStore) -> Vec<Record> {
    store
        .records()
        .iter()
        .filter(|r| !r.is_overall_ethnicity())
        .cloned()
        .collect()
}

/// Rows feeding the pyramid for one year: per-age-band male/female counts.
/// A year with no matching rows yields an empty view; the builder renders a
/// degenerate chart from it.
pub fn age_view(store: &RecordStore, year: u16) -> Vec<Record> {
    store
        .records()
        .iter()
        .filter(|r| {
            matches!(r.sex, Sex::Male | Sex::Female)
                && r.year == year
                && !r.is_overall_age()
                && r.is_overall_ethnicity()
        })
        .cloned()
        .collect()
}

/// Append one synthetic combined-sexes row per year to a filtered sex view:
/// `population = male + female`, with a missing sex counted as 0 so the
/// combined series stays dense over patchy years.
///
/// Appends, never substitutes. A year that already carries a `both` row is
/// left alone, so re-running the aggregation cannot stack duplicates.
pub fn with_combined_sexes(view: &[Record]) -> Vec<Record> {
    let mut sums: BTreeMap<u16, f64> = BTreeMap::new();
    let mut existing: Vec<u16> = Vec::new();
    for r in view {
        match r.sex {
            Sex::Male | Sex::Female => *sums.entry(r.year).or_insert(0.0) += r.population,
            Sex::Both => existing.push(r.year),
        }
    }
    let mut out = view.to_vec();
    for (year, population) in sums {
        if existing.contains(&year) {
            continue;
        }
        out.push(Record {
            year,
            sex: Sex::Both,
            age: OVERALL.to_string(),
            ethnicity: OVERALL.to_string(),
            population,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::OVERALL;

    fn rec(year: u16, sex: Sex, age: &str, ethnicity: &str, population: f64) -> Record {
        Record {
            year,
            sex,
            age: age.to_string(),
            ethnicity: ethnicity.to_string(),
            population,
        }
    }

    fn store() -> RecordStore {
        RecordStore::from_records(vec![
            rec(1970, Sex::Both, OVERALL, OVERALL, 10_800.0),
            rec(1970, Sex::Male, OVERALL, OVERALL, 5_500.0),
            rec(1970, Sex::Female, OVERALL, OVERALL, 5_300.0),
            rec(1970, Sex::Both, OVERALL, "Malay", 5_000.0),
            rec(1970, Sex::Male, "0-4", OVERALL, 900.0),
            rec(1970, Sex::Female, "0-4", OVERALL, 880.0),
            rec(1980, Sex::Both, OVERALL, OVERALL, 13_900.0),
            rec(1980, Sex::Male, OVERALL, OVERALL, 7_000.0),
            rec(1980, Sex::Female, OVERALL, OVERALL, 6_900.0),
        ])
        .unwrap()
    }

    #[test]
    fn overall_view_keeps_only_triple_sentinel_rows() {
        let view = overall_view(&store());
        assert_eq!(view.len(), 2);
        assert!(view.iter().all(|r| r.sex == Sex::Both
            && r.age == OVERALL
            && r.ethnicity == OVERALL));
    }

    #[test]
    fn sex_view_excludes_both_rows_and_non_overall_slices() {
        let view = sex_view(&store());
        assert_eq!(view.len(), 4);
        assert!(view.iter().all(|r| r.sex != Sex::Both));
        assert!(view.iter().all(|r| r.age == OVERALL && r.ethnicity == OVERALL));
    }

    #[test]
    fn ethnicity_view_drops_the_sentinel() {
        let view = ethnicity_view(&store());
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].ethnicity, "Malay");
    }

    #[test]
    fn age_view_is_scoped_to_one_year() {
        let view = age_view(&store(), 1970);
        assert_eq!(view.len(), 2);
        assert!(view.iter().all(|r| r.year == 1970 && r.age == "0-4"));
        assert!(age_view(&store(), 1900).is_empty());
    }

    #[test]
    fn combined_row_sums_male_and_female() {
        let view = sex_view(&store());
        let combined = with_combined_sexes(&view);
        assert_eq!(combined.len(), view.len() + 2);
        let both_1970 = combined
            .iter()
            .find(|r| r.sex == Sex::Both && r.year == 1970)
            .unwrap();
        assert_eq!(both_1970.population, 10_800.0);
    }

    #[test]
    fn combined_row_treats_missing_sex_as_zero() {
        // Only a male count for 1991: the combined row silently equals it.
        let view = vec![rec(1991, Sex::Male, OVERALL, OVERALL, 7_700.0)];
        let combined = with_combined_sexes(&view);
        let both = combined.iter().find(|r| r.sex == Sex::Both).unwrap();
        assert_eq!(both.population, 7_700.0);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let view = sex_view(&store());
        let once = with_combined_sexes(&view);
        let again = with_combined_sexes(&view);
        assert_eq!(once, again);
        // Feeding the aggregated view back in must not stack more rows.
        assert_eq!(with_combined_sexes(&once), once);
    }

    #[test]
    fn empty_view_aggregates_to_empty() {
        assert!(with_combined_sexes(&[]).is_empty());
    }
}
