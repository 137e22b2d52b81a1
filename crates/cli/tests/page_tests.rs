// Integration tests for `artview page`: selection output and exit codes.
// Run with: cargo test -p artview-cli --test page_tests -- --nocapture
//
// Manual smoke test (cannot be automated, requires a real TTY):
//   artview browse --offline
//   Verify: table renders, space toggles, # opens the prompt, q restores the terminal.

use std::process::{Command, Output};

use httpmock::prelude::*;
use tempfile::TempDir;

/// Run artview with an empty config dir so a user's settings.json never leaks in.
fn artview(config: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_artview"))
        .env("XDG_CONFIG_HOME", config.path())
        .env_remove("ARTVIEW_API_BASE")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("run artview")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// Virtual count plus an override, offline
// ---------------------------------------------------------------------------

#[test]
fn page_json_counts_overrides() {
    let config = TempDir::new().unwrap();
    let output = artview(
        &config,
        &["page", "2", "--select", "15", "--toggle", "100013", "--offline", "--json"],
    );
    assert!(output.status.success(), "exit code: {:?}\nstderr: {}",
        output.status, stderr(&output));

    let doc: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(doc["page"], 2);
    assert_eq!(doc["page_size"], 12);
    assert_eq!(doc["total_count"], 250);
    assert_eq!(doc["virtual_count"], 15);
    assert_eq!(doc["total_selected"], 14);
    assert_eq!(doc["overrides"], serde_json::json!({ "100013": false }));
    assert_eq!(doc["footer"], "Showing 13 to 24 of 250 entries");

    let rows = doc["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 12);
    let selected: Vec<u64> = rows
        .iter()
        .filter(|r| r["selected"] == true)
        .map(|r| r["rank"].as_u64().unwrap())
        .collect();
    assert_eq!(selected, vec![14, 15]);
}

#[test]
fn page_plain_prints_footer_and_banner() {
    let config = TempDir::new().unwrap();
    let output = artview(&config, &["page", "2", "--select", "15", "--offline"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Selected 15 rows"), "banner missing:\n{}", out);
    assert!(out.contains("Showing 13 to 24 of 250 entries"), "footer missing:\n{}", out);
    assert!(out.contains("15 row(s) selected"), "summary missing:\n{}", out);
    assert!(out.contains("[x]"));
    assert!(out.contains("[ ]"));
}

#[test]
fn page_size_flag_changes_window() {
    let config = TempDir::new().unwrap();
    let output = artview(&config, &["page", "3", "--page-size", "25", "--offline", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let doc: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(doc["footer"], "Showing 51 to 75 of 250 entries");
    assert_eq!(doc["page_count"], 10);
}

#[test]
fn off_page_toggle_is_noted_and_ignored() {
    let config = TempDir::new().unwrap();
    let output = artview(&config, &["page", "1", "--toggle", "100200", "--offline", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("record 100200 is not on page 1; ignored"));

    let doc: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(doc["total_selected"], 0);
    assert_eq!(doc["overrides"], serde_json::json!({}));

    let quiet = artview(&config, &["page", "1", "--toggle", "100200", "--offline", "--quiet"]);
    assert!(quiet.status.success());
    assert!(!stderr(&quiet).contains("ignored"));
}

#[test]
fn settings_page_size_is_used() {
    let config = TempDir::new().unwrap();
    let dir = config.path().join("artview");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("settings.json"), r#"{ "table.pageSize": 5 }"#).unwrap();

    let output = artview(&config, &["page", "1", "--offline", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let doc: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(doc["page_size"], 5);
    assert_eq!(doc["rows"].as_array().unwrap().len(), 5);
}

// ---------------------------------------------------------------------------
// Usage errors exit 2
// ---------------------------------------------------------------------------

#[test]
fn invalid_counts_exit_2() {
    let config = TempDir::new().unwrap();
    for bad in ["0", "-5", "2.5", "abc", ""] {
        let output = artview(&config, &["page", "1", "--select", bad, "--offline"]);
        assert_eq!(output.status.code(), Some(2), "--select {:?} should be rejected", bad);
        assert!(stdout(&output).is_empty());
    }
}

#[test]
fn page_zero_exits_2() {
    let config = TempDir::new().unwrap();
    let output = artview(&config, &["page", "0", "--offline"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn page_size_zero_exits_2() {
    let config = TempDir::new().unwrap();
    let output = artview(&config, &["page", "1", "--page-size", "0", "--offline"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn page_past_end_exits_2() {
    let config = TempDir::new().unwrap();
    let output = artview(&config, &["page", "99", "--offline", "--json"]);
    assert_eq!(output.status.code(), Some(2), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("the collection has 21 page(s)"), "stderr: {}", stderr(&output));
}

#[test]
fn last_page_is_partial() {
    let config = TempDir::new().unwrap();
    let output = artview(&config, &["page", "21", "--offline", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let doc: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(doc["footer"], "Showing 241 to 250 of 250 entries");
    assert_eq!(doc["rows"].as_array().unwrap().len(), 10);
}

#[test]
fn huge_page_exits_2_without_panicking() {
    let config = TempDir::new().unwrap();
    let huge = usize::MAX.to_string();
    let output = artview(&config, &["page", &huge, "--offline", "--json"]);
    assert_eq!(output.status.code(), Some(2), "stderr: {}", stderr(&output));
    assert!(!stderr(&output).contains("panicked"));
}

// ---------------------------------------------------------------------------
// Against a mock API
// ---------------------------------------------------------------------------

#[test]
fn api_page_is_printed() {
    let config = TempDir::new().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/artworks")
            .query_param("page", "1")
            .query_param("limit", "2");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(serde_json::json!({
                "pagination": { "total": 4, "limit": 2, "current_page": 1 },
                "data": [
                    { "id": 27992, "title": "A Sunday on La Grande Jatte", "inscriptions": null },
                    { "id": 28560, "title": "The Bedroom", "inscriptions": "Signed" },
                ],
            }));
    });

    let base = server.base_url();
    let output = artview(
        &config,
        &["page", "1", "--page-size", "2", "--api-base", &base, "--select", "3", "--json"],
    );
    mock.assert();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let doc: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(doc["total_count"], 4);
    assert_eq!(doc["total_selected"], 3);
    assert_eq!(doc["rows"][0]["inscriptions"], "N/A");
    assert_eq!(doc["rows"][1]["id"], 28560);
}

#[test]
fn http_error_exits_51() {
    let config = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/artworks");
        then.status(503).body("maintenance");
    });

    let base = server.base_url();
    let output = artview(&config, &["page", "1", "--api-base", &base]);
    assert_eq!(output.status.code(), Some(51), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("503"));
}

#[test]
fn garbage_body_exits_52() {
    let config = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/artworks");
        then.status(200).body("<html>not json</html>");
    });

    let base = server.base_url();
    let output = artview(&config, &["page", "1", "--api-base", &base]);
    assert_eq!(output.status.code(), Some(52), "stderr: {}", stderr(&output));
}

#[test]
fn invalid_count_skips_network() {
    let config = TempDir::new().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/v1/artworks");
        then.status(200).json_body(serde_json::json!({ "pagination": { "total": 0 } }));
    });

    let base = server.base_url();
    let output = artview(&config, &["page", "1", "--api-base", &base, "--select", "0"]);
    assert_eq!(output.status.code(), Some(2));
    mock.assert_hits(0);
}
