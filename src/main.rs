//! Dashboard server: fetch the census CSV once, build the store, then serve
//! chart specs as JSON over a plain TCP listener.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;

use anyhow::Result;

use popdash::config::Config;
use popdash::dashboard::{Dashboard, Page};
use popdash::logging::{log, obj, v_num, v_str, Domain, Level};
use popdash::selector::{PyramidSelector, SummaryToggle};
use popdash::source;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[
            ("config_hash", v_str(&cfg.config_hash())),
            ("port", v_num(cfg.port as f64)),
        ]),
    );

    let store = match source::load_store(&cfg).await {
        Ok(store) => store,
        Err(err) => {
            log(
                Level::Fatal,
                Domain::System,
                "load_failed",
                obj(&[("error", v_str(&err.to_string()))]),
            );
            eprintln!("dataset load failed: {}", err);
            std::process::exit(1);
        }
    };

    let dash = Dashboard::new(store, cfg.playback());
    serve(dash, cfg.port)
}

fn serve(dash: Dashboard, port: u16) -> Result<()> {
    let listener = TcpListener::bind(format!("127.0.0.1:{}", port))?;

    println!("Population dashboard serving at http://localhost:{}", port);
    println!();
    println!("Endpoints:");
    println!("  GET  /api/health                  - Health check");
    println!("  GET  /api/years                   - Available years and default");
    println!("  GET  /api/charts/trend            - Total population trend");
    println!("  GET  /api/charts/sex              - Animated bars by sex");
    println!("  GET  /api/charts/ethnicity        - Animated pies by ethnicity");
    println!("  GET  /api/charts/pyramid?year=N   - Pyramid for a year");
    println!("  GET  /api/summary/<page>          - Caption state for a page");
    println!("  POST /api/summary/<page>/toggle   - Flip a page caption");
    println!();

    let mut selector = PyramidSelector::new();
    let mut toggles: HashMap<Page, SummaryToggle> = Page::ALL
        .iter()
        .map(|page| (*page, SummaryToggle::new()))
        .collect();

    for stream in listener.incoming() {
        let mut stream = match stream {
            Ok(s) => s,
            Err(_) => continue,
        };

        let buf_reader = BufReader::new(&stream);
        let request_line = buf_reader.lines().next();

        let request = match request_line {
            Some(Ok(line)) => line,
            _ => continue,
        };

        let (status, content_type, body) = route(&request, &dash, &mut selector, &mut toggles);
        log(
            Level::Debug,
            Domain::Serve,
            "request",
            obj(&[("line", v_str(&request)), ("status", v_str(status))]),
        );

        let response = format!(
            "HTTP/1.1 {}\r\n\
             Content-Type: {}\r\n\
             Access-Control-Allow-Origin: *\r\n\
             Content-Length: {}\r\n\r\n{}",
            status,
            content_type,
            body.len(),
            body
        );

        let _ = stream.write_all(response.as_bytes());
    }
    Ok(())
}

fn route(
    request: &str,
    dash: &Dashboard,
    selector: &mut PyramidSelector,
    toggles: &mut HashMap<Page, SummaryToggle>,
) -> (&'static str, &'static str, String) {
    let mut parts = request.split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("");
    let (path, query) = match target.split_once('?') {
        Some((p, q)) => (p, q),
        None => (target, ""),
    };

    match (method, path) {
        ("GET", "/api/health") => ok(r#"{"status":"ok"}"#.to_string()),
        ("GET", "/api/years") => ok(serde_json::json!({
            "years": dash.available_years(),
            "default": dash.default_pyramid_year(),
        })
        .to_string()),
        ("GET", "/api/charts/trend") => match dash.trend_chart() {
            Ok(chart) => ok(to_json(&chart)),
            // The trend page fails alone; every other route keeps serving.
            Err(err) => (
                "500 INTERNAL SERVER ERROR",
                "application/json",
                serde_json::json!({ "error": err.to_string() }).to_string(),
            ),
        },
        ("GET", "/api/charts/sex") => ok(to_json(&dash.sex_animation_chart())),
        ("GET", "/api/charts/ethnicity") => ok(to_json(&dash.ethnicity_animation_chart())),
        ("GET", "/api/charts/pyramid") => match year_param(query) {
            Some(Ok(year)) => ok(to_json(&selector.select(dash.store(), year))),
            Some(Err(bad)) => (
                "400 BAD REQUEST",
                "application/json",
                serde_json::json!({ "error": format!("bad year: {}", bad) }).to_string(),
            ),
            None => ok(to_json(&selector.current_chart(dash.store()))),
        },
        _ => route_summary(method, path, toggles),
    }
}

fn route_summary(
    method: &str,
    path: &str,
    toggles: &mut HashMap<Page, SummaryToggle>,
) -> (&'static str, &'static str, String) {
    if let Some(rest) = path.strip_prefix("/api/summary/") {
        if method == "POST" {
            if let Some(slug) = rest.strip_suffix("/toggle") {
                if let Some(page) = Page::parse(slug) {
                    let toggle = toggles.entry(page).or_insert_with(SummaryToggle::new);
                    toggle.toggle();
                    log(
                        Level::Info,
                        Domain::Serve,
                        "summary_toggled",
                        obj(&[
                            ("page", v_str(page.slug())),
                            ("visible", serde_json::json!(toggle.is_visible())),
                        ]),
                    );
                    return ok(serde_json::json!({
                        "page": page.slug(),
                        "visible": toggle.is_visible(),
                    })
                    .to_string());
                }
            }
        } else if method == "GET" {
            if let Some(page) = Page::parse(rest) {
                let visible = toggles.get(&page).map(|t| t.is_visible()).unwrap_or(false);
                let text = if visible {
                    serde_json::Value::String(page.summary().to_string())
                } else {
                    serde_json::Value::Null
                };
                return ok(serde_json::json!({
                    "page": page.slug(),
                    "title": page.title(),
                    "visible": visible,
                    "text": text,
                })
                .to_string());
            }
        }
    }
    ("404 NOT FOUND", "text/plain", "Not Found".to_string())
}

fn year_param(query: &str) -> Option<Result<u16, String>> {
    for pair in query.split('&') {
        if let Some(value) = pair.strip_prefix("year=") {
            return Some(value.parse::<u16>().map_err(|_| value.to_string()));
        }
    }
    None
}

fn ok(body: String) -> (&'static str, &'static str, String) {
    ("200 OK", "application/json", body)
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}
