//! Population dashboard pipeline: load an annual census CSV, slice it into
//! per-page views, and build renderable chart specs.
//!
//! The flow is linear. `source` fetches the CSV and `records` parses it into
//! an immutable store; `views` filters the store into one row set per page;
//! `chart` turns each view into a serializable spec; `selector` holds the
//! only mutable piece of state, the pyramid year. `dashboard` fronts the
//! whole thing with one method per page.

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod logging;
pub mod records;
pub mod selector;
pub mod source;
pub mod views;
