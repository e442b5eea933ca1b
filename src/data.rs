//! Offline dataset QA: schema validation, integrity hashing, and manifest
//! generation for a CSV snapshot on disk. Unlike the strict load path,
//! bad rows here are counted and reported, never fatal.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::records::{parse_record_line, EXPECTED_COLUMNS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gap {
    pub start_year: u16,
    pub end_year: u16,
    pub missing_years: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub path: String,
    pub hash_sha256: String,
    pub row_count: u64,
    pub bad_rows: u64,
    pub year_min: Option<u16>,
    pub year_max: Option<u16>,
    pub distinct_years: u64,
    pub columns: Vec<String>,
    pub gaps: Vec<Gap>,
    pub warnings: Vec<String>,
    pub generated_at_epoch: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaReport {
    pub columns: Vec<String>,
    pub expected: Vec<String>,
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataQualityReport {
    pub rows: u64,
    pub bad_rows: u64,
    pub gaps: u64,
    pub warnings: Vec<String>,
}

pub fn analyze_csv(
    path: &Path,
    now_ts: u64,
) -> Result<(DatasetManifest, DataQualityReport), String> {
    let mut warnings = Vec::new();
    let hash = file_sha256(path)?;

    let file = File::open(path).map_err(|e| e.to_string())?;
    let reader = BufReader::new(file);

    let mut row_count = 0u64;
    let mut bad_rows = 0u64;
    let mut years: BTreeSet<u16> = BTreeSet::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut header: Vec<String> = Vec::new();

    for line in reader.lines().flatten() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if trimmed.to_lowercase().starts_with("year,") && header.is_empty() {
            header = trimmed.split(',').map(|s| s.trim().to_string()).collect();
            continue;
        }
        match parse_record_line(trimmed) {
            Ok(record) => {
                row_count += 1;
                years.insert(record.year);
                let key = format!(
                    "{},{},{},{}",
                    record.year,
                    record.sex.as_str(),
                    record.age,
                    record.ethnicity
                );
                if !seen.insert(key.clone()) {
                    warnings.push(format!("duplicate_key: {}", key));
                }
            }
            Err(err) => {
                bad_rows += 1;
                warnings.push(format!("bad_row: {}", err));
            }
        }
    }

    if header.is_empty() {
        warnings.push("missing_header".to_string());
    }

    // Annual series: any skipped year between observed years is a gap.
    let mut gaps: Vec<Gap> = Vec::new();
    let ordered: Vec<u16> = years.iter().copied().collect();
    for pair in ordered.windows(2) {
        if pair[1] > pair[0] + 1 {
            gaps.push(Gap {
                start_year: pair[0],
                end_year: pair[1],
                missing_years: pair[1] - pair[0] - 1,
            });
        }
    }

    let manifest = DatasetManifest {
        path: path.display().to_string(),
        hash_sha256: hash,
        row_count,
        bad_rows,
        year_min: ordered.first().copied(),
        year_max: ordered.last().copied(),
        distinct_years: ordered.len() as u64,
        columns: header,
        gaps: gaps.clone(),
        warnings: warnings.clone(),
        generated_at_epoch: now_ts,
    };

    let report = DataQualityReport {
        rows: row_count,
        bad_rows,
        gaps: gaps.len() as u64,
        warnings,
    };

    Ok((manifest, report))
}

pub fn validate_schema(path: &Path) -> Result<SchemaReport, String> {
    let header: Vec<String> = read_header(path)?
        .iter()
        .map(|s| s.to_lowercase())
        .collect();
    let expected = EXPECTED_COLUMNS
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>();
    let ok = header == expected;
    let message = if ok {
        "schema ok".to_string()
    } else {
        format!("schema mismatch: got {:?} expected {:?}", header, expected)
    };
    Ok(SchemaReport {
        columns: header,
        expected,
        ok,
        message,
    })
}

pub fn read_header(path: &Path) -> Result<Vec<String>, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    let reader = BufReader::new(file);
    for line in reader.lines().flatten() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if trimmed.to_lowercase().starts_with("year,") {
            return Ok(trimmed.split(',').map(|s| s.trim().to_string()).collect());
        }
        break;
    }
    Ok(Vec::new())
}

pub fn file_sha256(path: &Path) -> Result<String, String> {
    let mut file = File::open(path).map_err(|e| e.to_string())?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).map_err(|e| e.to_string())?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

pub fn text_sha256(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn default_manifest_path(dataset_path: &Path) -> PathBuf {
    let mut p = dataset_path.to_path_buf();
    let fname = dataset_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset.csv");
    p.set_file_name(format!("{}.manifest.json", fname));
    p
}
