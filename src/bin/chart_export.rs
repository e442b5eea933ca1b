//! Offline chart exporter: builds every chart spec from a local CSV and
//! writes them as JSON artifacts under out/charts/.
//!
//! Run with: cargo run --bin chart_export [path/to/population.csv]

use std::env;
use std::fs;
use std::path::Path;

use popdash::config::Config;
use popdash::dashboard::Dashboard;
use popdash::records::RecordStore;
use serde_json::json;

fn main() {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "data/population.csv".to_string());

    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("failed to read {}: {}", path, err);
            std::process::exit(1);
        }
    };

    let store = match RecordStore::from_csv(&text) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("failed to parse {}: {}", path, err);
            std::process::exit(2);
        }
    };

    let out_dir = Path::new("out/charts");
    if let Err(err) = fs::create_dir_all(out_dir) {
        eprintln!("failed to create {}: {}", out_dir.display(), err);
        std::process::exit(3);
    }

    let cfg = Config::from_env();
    let dash = Dashboard::new(store, cfg.playback());
    let years: Vec<u16> = dash.available_years().to_vec();

    let mut written = 0usize;

    write_artifact(
        out_dir,
        "years.json",
        json!({
            "years": years,
            "default": dash.default_pyramid_year(),
        })
        .to_string(),
        &mut written,
    );

    match dash.trend_chart() {
        Ok(chart) => write_artifact(out_dir, "trend.json", pretty(&chart), &mut written),
        // Trend alone fails when its anchor row is missing; export the rest.
        Err(err) => eprintln!("skipping trend: {}", err),
    }

    write_artifact(
        out_dir,
        "sex.json",
        pretty(&dash.sex_animation_chart()),
        &mut written,
    );
    write_artifact(
        out_dir,
        "ethnicity.json",
        pretty(&dash.ethnicity_animation_chart()),
        &mut written,
    );

    for year in &years {
        let chart = dash.pyramid_chart(*year);
        write_artifact(
            out_dir,
            &format!("pyramid_{}.json", year),
            pretty(&chart),
            &mut written,
        );
    }

    println!("wrote {} artifacts to {}", written, out_dir.display());
}

fn pretty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

fn write_artifact(dir: &Path, name: &str, body: String, written: &mut usize) {
    let path = dir.join(name);
    match fs::write(&path, body) {
        Ok(()) => *written += 1,
        Err(err) => {
            eprintln!("failed to write {}: {}", path.display(), err);
            std::process::exit(4);
        }
    }
}
