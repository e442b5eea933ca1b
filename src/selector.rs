//! Interactive state for the age page: the year selector driving the
//! pyramid, and the redesigned caption toggle.
//!
//! The selector is the one component with a runtime re-entry point. Every
//! transition re-runs the age filter and the pyramid builder synchronously;
//! the previous chart is discarded, never merged.

use std::fmt;

use crate::chart::{build_pyramid, PyramidChart};
use crate::logging::{log, obj, v_num, v_str, Domain, Level};
use crate::records::RecordStore;
use crate::views::age_view;

/// Requested year not present in the store. Recovered locally by falling
/// back to the default year; never surfaced as a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSelection {
    pub requested: u16,
}

impl fmt::Display for InvalidSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "year {} is not in the dataset", self.requested)
    }
}

impl std::error::Error for InvalidSelection {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorState {
    /// Nothing chosen yet; the default (maximum) year applies.
    Idle,
    Selected(u16),
}

pub fn validate_year(store: &RecordStore, year: u16) -> Result<u16, InvalidSelection> {
    if store.has_year(year) {
        Ok(year)
    } else {
        Err(InvalidSelection { requested: year })
    }
}

pub fn default_year(store: &RecordStore) -> u16 {
    store.max_year().unwrap_or(0)
}

/// Clamp a requested year to the default when it is not in the store.
pub(crate) fn resolve_year(store: &RecordStore, requested: u16) -> u16 {
    match validate_year(store, requested) {
        Ok(year) => year,
        Err(err) => {
            let fallback = default_year(store);
            log(
                Level::Warn,
                Domain::Select,
                "invalid_year",
                obj(&[
                    ("requested", v_num(err.requested as f64)),
                    ("fallback", v_num(fallback as f64)),
                ]),
            );
            fallback
        }
    }
}

/// One full filter-and-build pass for a year already known to be resolved.
pub(crate) fn rebuild(store: &RecordStore, year: u16) -> PyramidChart {
    let view = age_view(store, year);
    if view.is_empty() {
        log(
            Level::Warn,
            Domain::View,
            "empty_view",
            obj(&[("view", v_str("age")), ("year", v_num(year as f64))]),
        );
    }
    build_pyramid(&view, year)
}

#[derive(Debug, Clone, Copy)]
pub struct PyramidSelector {
    state: SelectorState,
}

impl PyramidSelector {
    pub fn new() -> Self {
        Self {
            state: SelectorState::Idle,
        }
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    pub fn effective_year(&self, store: &RecordStore) -> u16 {
        match self.state {
            SelectorState::Idle => default_year(store),
            SelectorState::Selected(year) => year,
        }
    }

    /// Apply a year selection: clamp, transition, and rebuild the chart.
    pub fn select(&mut self, store: &RecordStore, year: u16) -> PyramidChart {
        let resolved = resolve_year(store, year);
        self.state = SelectorState::Selected(resolved);
        rebuild(store, resolved)
    }

    /// Chart for the current state without changing it (page load, re-render).
    pub fn current_chart(&self, store: &RecordStore) -> PyramidChart {
        rebuild(store, self.effective_year(store))
    }
}

impl Default for PyramidSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Visible,
}

/// Caption visibility for one page. Starts hidden; each toggle request
/// flips the state and reports the new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryToggle {
    visibility: Visibility,
}

impl SummaryToggle {
    pub fn new() -> Self {
        Self {
            visibility: Visibility::Hidden,
        }
    }

    pub fn toggle(&mut self) -> Visibility {
        self.visibility = match self.visibility {
            Visibility::Hidden => Visibility::Visible,
            Visibility::Visible => Visibility::Hidden,
        };
        self.visibility
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }
}

impl Default for SummaryToggle {
    fn default() -> Self {
        Self::new()
    }
}
