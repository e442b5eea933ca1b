//! Census table loading and the immutable in-memory record store.
//!
//! One `Record` is one row of the source table. The store is populated once
//! at startup and never mutated; every view and chart is recomputed from it
//! on demand.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel category meaning "already aggregated across this dimension"
/// in the source data. Distinct from any aggregate the pipeline derives.
pub const OVERALL: &str = "overall";

pub const EXPECTED_COLUMNS: [&str; 5] = ["year", "sex", "age", "ethnicity", "population"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Both,
}

impl Sex {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Sex::Male),
            "female" => Some(Sex::Female),
            "both" => Some(Sex::Both),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Both => "both",
        }
    }

    /// Label shown on chart frames. Source rows keep their lowercase value;
    /// the synthesized combined-sexes row is displayed capitalized, so the
    /// two are never confused in a rendered chart.
    pub fn category_label(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Both => "Both",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub year: u16,
    pub sex: Sex,
    pub age: String,
    pub ethnicity: String,
    pub population: f64,
}

impl Record {
    pub fn is_overall_age(&self) -> bool {
        self.age == OVERALL
    }

    pub fn is_overall_ethnicity(&self) -> bool {
        self.ethnicity == OVERALL
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// Source unreachable: transport or filesystem failure.
    Source(String),
    /// Header row missing or columns differ from the expected five.
    Header { found: Vec<String> },
    /// A data row failed to parse.
    Row { line: usize, reason: String },
    /// Two rows share the same (year, sex, age, ethnicity) key.
    Duplicate { line: usize, key: String },
    /// Table parsed but holds no data rows.
    Empty,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Source(msg) => write!(f, "dataset unreachable: {}", msg),
            LoadError::Header { found } => write!(
                f,
                "bad header: got {:?}, expected {:?}",
                found, EXPECTED_COLUMNS
            ),
            LoadError::Row { line, reason } => write!(f, "bad row at line {}: {}", line, reason),
            LoadError::Duplicate { line, key } => {
                write!(f, "duplicate record at line {}: {}", line, key)
            }
            LoadError::Empty => write!(f, "table holds no data rows"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Parse one data row. Strict: exactly five columns, known sex value,
/// non-negative finite population.
pub fn parse_record_line(line: &str) -> Result<Record, String> {
    let parts: Vec<&str> = line.split(',').map(|s| s.trim()).collect();
    if parts.len() != EXPECTED_COLUMNS.len() {
        return Err(format!(
            "expected {} columns, got {}",
            EXPECTED_COLUMNS.len(),
            parts.len()
        ));
    }
    let year: u16 = parts[0].parse().map_err(|e| format!("bad year: {}", e))?;
    let sex = Sex::parse(parts[1]).ok_or_else(|| format!("unknown sex value: {:?}", parts[1]))?;
    let population: f64 = parts[4]
        .parse()
        .map_err(|e| format!("bad population: {}", e))?;
    if !population.is_finite() {
        return Err("population is not finite".to_string());
    }
    if population < 0.0 {
        return Err(format!("negative population: {}", population));
    }
    Ok(Record {
        year,
        sex,
        age: parts[2].to_string(),
        ethnicity: parts[3].to_string(),
        population,
    })
}

/// Parse the whole table text. The first non-empty, non-comment line must be
/// the header with exactly the expected columns.
pub fn parse_table(text: &str) -> Result<Vec<Record>, LoadError> {
    // Exported CSVs sometimes lead with a UTF-8 BOM.
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = Vec::new();
    let mut header_seen = false;
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if !header_seen {
            let found: Vec<String> = line.split(',').map(|s| s.trim().to_lowercase()).collect();
            if found != EXPECTED_COLUMNS {
                return Err(LoadError::Header { found });
            }
            header_seen = true;
            continue;
        }
        let record = parse_record_line(line).map_err(|reason| LoadError::Row {
            line: idx + 1,
            reason,
        })?;
        records.push(record);
    }
    if !header_seen {
        return Err(LoadError::Header { found: Vec::new() });
    }
    Ok(records)
}

/// The census table, read-only after construction.
///
/// Construction enforces the table invariants: at most one record per
/// (year, sex, age, ethnicity) key, and at least one data row. Distinct
/// years are precomputed in ascending order for selectors.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<Record>,
    years: Vec<u16>,
}

impl RecordStore {
    pub fn from_records(records: Vec<Record>) -> Result<Self, LoadError> {
        if records.is_empty() {
            return Err(LoadError::Empty);
        }
        let mut seen: HashSet<(u16, Sex, &str, &str)> = HashSet::new();
        for (idx, r) in records.iter().enumerate() {
            if !seen.insert((r.year, r.sex, r.age.as_str(), r.ethnicity.as_str())) {
                return Err(LoadError::Duplicate {
                    line: idx + 1,
                    key: format!("{},{},{},{}", r.year, r.sex.as_str(), r.age, r.ethnicity),
                });
            }
        }
        let mut years: Vec<u16> = records.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        Ok(Self { records, years })
    }

    pub fn from_csv(text: &str) -> Result<Self, LoadError> {
        Self::from_records(parse_table(text)?)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Distinct years, strictly ascending. Drives year selectors and
    /// animation frame order.
    pub fn available_years(&self) -> &[u16] {
        &self.years
    }

    pub fn max_year(&self) -> Option<u16> {
        self.years.last().copied()
    }

    pub fn has_year(&self, year: u16) -> bool {
        self.years.binary_search(&year).is_ok()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
