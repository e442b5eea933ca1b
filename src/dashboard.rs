//! Facade over the loaded store: one method per page, each running the
//! full filter, aggregate, build pass on demand. Nothing is cached; the
//! store is immutable after load, so every call is reproducible.

use crate::chart::{
    build_ethnicity_animation, build_sex_animation, build_trend, EthnicityAnimation, Playback,
    SchemaError, SexAnimation, TrendChart,
};
use crate::logging::{log, obj, v_num, v_str, Domain, Level};
use crate::records::{Record, RecordStore};
use crate::selector;
use crate::views::{ethnicity_view, overall_view, sex_view, with_combined_sexes};

pub const HOME_SUMMARY: &str = "The Malaysian population exhibited a consistent growth trajectory from 1970 to 2024. However, a unique demographic anomaly occurred in 2020, marked by a decline in population due to the unprecedented impact of the COVID-19 pandemic. Subsequent to this temporary downturn, the population gradually rebounded in 2021, and by 2023, the growth rate had returned to its historical norm.";

pub const SEX_SUMMARY: &str = "According to the bar chart, Malaysia has consistently exhibited a male-dominant population structure. This trend is further substantiated by data indicating a significant increase in the male population compared to females from 1970 to 2024. The disparity is particularly noteworthy, with males outnumbering females by a margin ranging from 2.85% to 10.55% during this period. For a deeper exploration of this phenomenon, you can refer to the UPM research portal link (https://myageing.upm.edu.my/artikel/interactive_malaysias_skewed_sex_ratio_what_it_means_and_what_must_be_done-67695).";

pub const ETHNICITY_SUMMARY: &str = "The pie chart reveals a significant evolution in Malaysia's ethnic composition between 1980 and 2024. Notably, the relative proportions of the Chinese and Indian populations have decreased during this period. Additionally, the Bumiputera category has transformed, expanding from a single classification to encompass both Malay Bumiputera and Other Bumiputera, including indigenous groups such as Orang Asli, Siam, Sabahan, and Sarawakian. A particularly noteworthy trend is the substantial growth in the Other non-citizens category, increasing from 2.18% in 1980 to 9.97% in 2024. This demographic shift can be attributed in part to Malaysia's government policy of accepting refugees from conflict-ridden regions and the allure of Malaysia's lower cost of living, which has attracted migrants from developed countries such as China, Japan, and Korea.";

pub const PYRAMID_SUMMARY: &str = "The population pyramid for Malaysia has undergone a significant transformation from 1970 to 2024, transitioning from a classic triangular shape to a more columnar structure. This shift is characterized by a narrowing of the base, representing the younger age groups, and a corresponding expansion of the middle-aged cohort. This demographic evolution suggests a growing proportion of individuals within the productive age range, coupled with a rising elderly population as the number of younger generations diminishes. The data indicates that Malaysian life expectancy has increased significantly over the past few decades, rising from an average of 70+ years in 1970 to 84 years in 2024.";

/// The four dashboard pages. Slugs double as route segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Sex,
    Ethnicity,
    Pyramid,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::Sex, Page::Ethnicity, Page::Pyramid];

    pub fn slug(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Sex => "sex",
            Page::Ethnicity => "ethnicity",
            Page::Pyramid => "pyramid",
        }
    }

    pub fn parse(s: &str) -> Option<Page> {
        match s {
            "home" => Some(Page::Home),
            "sex" => Some(Page::Sex),
            "ethnicity" => Some(Page::Ethnicity),
            "pyramid" => Some(Page::Pyramid),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Population in Millions over the Years",
            Page::Sex => "Population by Sex",
            Page::Ethnicity => "Population by Ethnicity",
            Page::Pyramid => "Population Pyramid by Age",
        }
    }

    /// Caption paragraph shown when the page's summary toggle is visible.
    pub fn summary(&self) -> &'static str {
        match self {
            Page::Home => HOME_SUMMARY,
            Page::Sex => SEX_SUMMARY,
            Page::Ethnicity => ETHNICITY_SUMMARY,
            Page::Pyramid => PYRAMID_SUMMARY,
        }
    }
}

pub struct Dashboard {
    store: RecordStore,
    playback: Playback,
}

impl Dashboard {
    pub fn new(store: RecordStore, playback: Playback) -> Self {
        Self { store, playback }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn available_years(&self) -> &[u16] {
        self.store.available_years()
    }

    pub fn default_pyramid_year(&self) -> u16 {
        selector::default_year(&self.store)
    }

    /// Home page: national total per year with the 2020 callout.
    pub fn trend_chart(&self) -> Result<TrendChart, SchemaError> {
        let view = overall_view(&self.store);
        self.note_if_empty("overall", &view);
        let chart = build_trend(&view)?;
        self.note_built("trend", chart.points.len());
        Ok(chart)
    }

    /// Sex page: per-sex bars plus the synthetic combined bar, one frame per year.
    pub fn sex_animation_chart(&self) -> SexAnimation {
        let view = with_combined_sexes(&sex_view(&self.store));
        self.note_if_empty("sex", &view);
        let chart = build_sex_animation(&view, self.playback);
        self.note_built("sex", chart.frames.len());
        chart
    }

    /// Ethnicity page: one pie frame per year over the named ethnic groups.
    pub fn ethnicity_animation_chart(&self) -> EthnicityAnimation {
        let view = ethnicity_view(&self.store);
        self.note_if_empty("ethnicity", &view);
        let chart = build_ethnicity_animation(&view, self.playback);
        self.note_built("ethnicity", chart.frames.len());
        chart
    }

    /// Pyramid page for a requested year; absent years clamp to the default.
    pub fn pyramid_chart(&self, year: u16) -> crate::chart::PyramidChart {
        let resolved = selector::resolve_year(&self.store, year);
        let chart = selector::rebuild(&self.store, resolved);
        self.note_built("pyramid", chart.age_bands.len());
        chart
    }

    fn note_if_empty(&self, view: &str, rows: &[Record]) {
        if rows.is_empty() {
            log(
                Level::Warn,
                Domain::View,
                "empty_view",
                obj(&[("view", v_str(view))]),
            );
        }
    }

    fn note_built(&self, kind: &str, size: usize) {
        log(
            Level::Debug,
            Domain::Chart,
            "built",
            obj(&[("kind", v_str(kind)), ("size", v_num(size as f64))]),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Record, Sex, OVERALL};

    fn record(year: u16, sex: Sex, age: &str, ethnicity: &str, population: f64) -> Record {
        Record {
            year,
            sex,
            age: age.to_string(),
            ethnicity: ethnicity.to_string(),
            population,
        }
    }

    fn store() -> RecordStore {
        let mut records = Vec::new();
        for year in [2019u16, 2020, 2021] {
            records.push(record(year, Sex::Both, OVERALL, OVERALL, 32_000.0));
            records.push(record(year, Sex::Male, OVERALL, OVERALL, 16_500.0));
            records.push(record(year, Sex::Female, OVERALL, OVERALL, 15_500.0));
            records.push(record(year, Sex::Both, OVERALL, "malay", 18_000.0));
            records.push(record(year, Sex::Both, OVERALL, "chinese", 7_000.0));
            records.push(record(year, Sex::Male, "0-4", OVERALL, 1_200.0));
            records.push(record(year, Sex::Female, "0-4", OVERALL, 1_100.0));
        }
        RecordStore::from_records(records).unwrap()
    }

    #[test]
    fn every_page_renders_from_one_store() {
        let dash = Dashboard::new(store(), Playback::default());
        let trend = dash.trend_chart().unwrap();
        assert_eq!(trend.points.len(), 3);
        assert_eq!(trend.callout.year, 2020);

        let sex = dash.sex_animation_chart();
        assert_eq!(sex.frames.len(), 3);

        let ethnicity = dash.ethnicity_animation_chart();
        assert_eq!(ethnicity.frames.len(), 3);

        let pyramid = dash.pyramid_chart(2020);
        assert_eq!(pyramid.year, 2020);
        assert_eq!(pyramid.age_bands, vec!["0-4".to_string()]);
    }

    #[test]
    fn pyramid_request_for_absent_year_falls_back() {
        let dash = Dashboard::new(store(), Playback::default());
        let chart = dash.pyramid_chart(1800);
        assert_eq!(chart.year, 2021);
    }

    #[test]
    fn trend_requires_the_callout_year() {
        let records = vec![
            record(2018, Sex::Both, OVERALL, OVERALL, 31_000.0),
            record(2019, Sex::Both, OVERALL, OVERALL, 32_000.0),
        ];
        let dash = Dashboard::new(
            RecordStore::from_records(records).unwrap(),
            Playback::default(),
        );
        let err = dash.trend_chart().unwrap_err();
        assert_eq!(err.chart, "trend");
    }

    #[test]
    fn page_slugs_round_trip() {
        for page in Page::ALL {
            assert_eq!(Page::parse(page.slug()), Some(page));
            assert!(!page.summary().is_empty());
            assert!(!page.title().is_empty());
        }
        assert_eq!(Page::parse("nope"), None);
    }
}
