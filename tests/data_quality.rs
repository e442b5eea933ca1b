use popdash::data::{analyze_csv, default_manifest_path, file_sha256, validate_schema};
use popdash::records::{LoadError, RecordStore, EXPECTED_COLUMNS};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_csv(path: &Path, header: &[&str], rows: &[&str]) {
    let mut out = String::new();
    out.push_str(&header.join(","));
    out.push('\n');
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    fs::write(path, out).unwrap();
}

// ---------------------------------------------------------------------------
// Schema validation
// ---------------------------------------------------------------------------

#[test]
fn schema_accepts_good_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("good.csv");
    write_csv(
        &path,
        &EXPECTED_COLUMNS,
        &["2020,both,overall,overall,32447.4"],
    );
    let report = validate_schema(&path).unwrap();
    assert!(report.ok);
}

#[test]
fn schema_accepts_header_case_insensitively() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("upper.csv");
    write_csv(
        &path,
        &["Year", "Sex", "Age", "Ethnicity", "Population"],
        &["2020,both,overall,overall,32447.4"],
    );
    let report = validate_schema(&path).unwrap();
    assert!(report.ok);
}

#[test]
fn schema_rejects_bad_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.csv");
    write_csv(&path, &["year", "sex", "population"], &["2020,both,100.0"]);
    let report = validate_schema(&path).unwrap();
    assert!(!report.ok);
    assert!(report.message.contains("schema mismatch"));
}

// ---------------------------------------------------------------------------
// Manifest and quality report
// ---------------------------------------------------------------------------

#[test]
fn detects_year_gaps() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gaps.csv");
    write_csv(
        &path,
        &EXPECTED_COLUMNS,
        &[
            "1970,both,overall,overall,10000.0",
            "1971,both,overall,overall,10100.0",
            "1975,both,overall,overall,10500.0",
        ],
    );
    let (manifest, report) = analyze_csv(&path, 1_700_000_000).unwrap();
    assert_eq!(manifest.gaps.len(), 1);
    assert_eq!(manifest.gaps[0].start_year, 1971);
    assert_eq!(manifest.gaps[0].end_year, 1975);
    assert_eq!(manifest.gaps[0].missing_years, 3);
    assert_eq!(report.gaps, 1);
    assert_eq!(manifest.year_min, Some(1970));
    assert_eq!(manifest.year_max, Some(1975));
    assert_eq!(manifest.distinct_years, 3);
}

#[test]
fn counts_bad_rows_without_failing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dirty.csv");
    write_csv(
        &path,
        &EXPECTED_COLUMNS,
        &[
            "2020,both,overall,overall,32447.4",
            "2021,both,overall,overall,not-a-number",
            "2022,martian,overall,overall,100.0",
            "2023,both,overall,overall,32900.0",
        ],
    );
    let (manifest, report) = analyze_csv(&path, 1_700_000_000).unwrap();
    assert_eq!(manifest.row_count, 2);
    assert_eq!(manifest.bad_rows, 2);
    assert_eq!(report.bad_rows, 2);
    assert!(report.warnings.iter().any(|w| w.starts_with("bad_row:")));
}

#[test]
fn flags_duplicate_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dupes.csv");
    write_csv(
        &path,
        &EXPECTED_COLUMNS,
        &[
            "2020,both,overall,overall,32447.4",
            "2020,both,overall,overall,32447.4",
        ],
    );
    let (_, report) = analyze_csv(&path, 1_700_000_000).unwrap();
    assert!(report
        .warnings
        .iter()
        .any(|w| w.starts_with("duplicate_key:")));
}

#[test]
fn manifest_path_sits_next_to_the_dataset() {
    let out = default_manifest_path(Path::new("data/population.csv"));
    assert_eq!(out, Path::new("data/population.csv.manifest.json"));
}

#[test]
fn sha256_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hash.csv");
    write_csv(
        &path,
        &EXPECTED_COLUMNS,
        &["2020,both,overall,overall,32447.4"],
    );
    let h1 = file_sha256(&path).unwrap();
    let h2 = file_sha256(&path).unwrap();
    assert_eq!(h1, h2);
    assert_eq!(h1.len(), 64);
}

// ---------------------------------------------------------------------------
// Strict loader: QA tolerates what the load path refuses
// ---------------------------------------------------------------------------

#[test]
fn loader_rejects_what_qa_only_counts() {
    let csv = "year,sex,age,ethnicity,population\n\
               2020,both,overall,overall,32447.4\n\
               2021,both,overall,overall,not-a-number\n";
    let err = RecordStore::from_csv(csv).unwrap_err();
    match err {
        LoadError::Row { line, .. } => assert_eq!(line, 3),
        other => panic!("expected row error, got {}", other),
    }
}

#[test]
fn loader_rejects_duplicate_keys() {
    let csv = "year,sex,age,ethnicity,population\n\
               2020,both,overall,overall,32447.4\n\
               2020,both,overall,overall,32447.4\n";
    let err = RecordStore::from_csv(csv).unwrap_err();
    assert!(matches!(err, LoadError::Duplicate { .. }));
}

#[test]
fn loader_rejects_header_mismatch() {
    let csv = "year,sex,population\n2020,both,32447.4\n";
    let err = RecordStore::from_csv(csv).unwrap_err();
    match err {
        LoadError::Header { found } => assert_eq!(found.len(), 3),
        other => panic!("expected header error, got {}", other),
    }
}

#[test]
fn loader_rejects_an_empty_table() {
    let csv = "year,sex,age,ethnicity,population\n";
    let err = RecordStore::from_csv(csv).unwrap_err();
    assert!(matches!(err, LoadError::Empty));
}
