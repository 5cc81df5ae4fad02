use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn hds_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("hds");
    path
}

const TICKETS: &str = r#"[
  {
    "id": "T-100",
    "title": "Errore aggiornamento IPOS",
    "status": "resolved",
    "category": "software",
    "resolution": "Riavviare il servizio IPOS e ripetere l'aggiornamento",
    "resolved_at": "2024-03-01T09:00:00Z"
  },
  {
    "id": "T-101",
    "title": "Stampante non stampa",
    "body": "La stampante del reparto resta offline",
    "status": "closed",
    "category": "hardware",
    "resolution": "Sostituire il toner della stampante e riavviare lo spooler",
    "resolved_at": "2024-02-10T15:30:00Z"
  },
  {
    "id": "T-102",
    "title": "Errore aggiornamento IPOS su cassa 3",
    "status": "open"
  },
  {
    "id": "T-103",
    "title": "Aggiornamento IPOS bloccato",
    "status": "resolved",
    "category": "software",
    "resolution": "Liberare spazio su disco e rilanciare l'aggiornamento IPOS",
    "resolved_at": "2024-01-20T11:00:00Z"
  }
]"#;

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::create_dir_all(root.join("data")).unwrap();

    fs::write(root.join("tickets.json"), TICKETS).unwrap();

    let config_content = format!(
        r#"[db]
path = "{}/data/hds.sqlite"

[suggestions]
max_suggestions = 5

[server]
bind = "127.0.0.1:7341"

[logging]
level = "warn"
"#,
        root.display()
    );

    let config_path = config_dir.join("hds.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_hds(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = hds_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run hds binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn setup_imported() -> (TempDir, PathBuf) {
    let (tmp, config_path) = setup_test_env();
    let tickets = tmp.path().join("tickets.json");

    let (_, stderr, success) = run_hds(&config_path, &["init"]);
    assert!(success, "init failed: {}", stderr);
    let (stdout, stderr, success) = run_hds(&config_path, &["import", tickets.to_str().unwrap()]);
    assert!(success, "import failed: stdout={}, stderr={}", stdout, stderr);

    (tmp, config_path)
}

#[test]
fn test_init_creates_database() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_hds(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_hds(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_hds(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_import_tickets() {
    let (tmp, config_path) = setup_test_env();
    let tickets = tmp.path().join("tickets.json");

    run_hds(&config_path, &["init"]);
    let (stdout, stderr, success) = run_hds(&config_path, &["import", tickets.to_str().unwrap()]);
    assert!(success, "import failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("imported tickets: 4"));
    assert!(stdout.contains("ok"));
}

#[test]
fn test_import_idempotent_no_duplicates() {
    let (tmp, config_path) = setup_imported();
    let tickets = tmp.path().join("tickets.json");

    let (_, _, success) = run_hds(&config_path, &["import", tickets.to_str().unwrap()]);
    assert!(success);

    let (stdout, _, success) = run_hds(&config_path, &["stats", "--json"]);
    assert!(success);
    let stats: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats["tickets"]["total"], 4);
    assert_eq!(stats["tickets"]["candidates"], 3);
}

#[test]
fn test_import_missing_file() {
    let (_tmp, config_path) = setup_test_env();
    run_hds(&config_path, &["init"]);

    let (_, stderr, success) = run_hds(&config_path, &["import", "/nonexistent/tickets.json"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read tickets file"));
}

#[test]
fn test_suggest_ranks_exact_match_first() {
    let (_tmp, config_path) = setup_imported();

    let (stdout, stderr, success) = run_hds(
        &config_path,
        &["suggest", "Errore aggiornamento IPOS", "--json"],
    );
    assert!(success, "suggest failed: stdout={}, stderr={}", stdout, stderr);

    let suggestions: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let suggestions = suggestions.as_array().unwrap();
    assert!(!suggestions.is_empty());
    assert!(suggestions.len() <= 5);

    let first = &suggestions[0];
    assert_eq!(first["kind"], "direct");
    assert_eq!(first["source_record_ids"][0], "T-100");
    assert!((first["confidence"].as_f64().unwrap() - 0.95).abs() < 1e-9);
    assert!(first["text"].as_str().unwrap().ends_with('.'));
}

#[test]
fn test_suggest_skips_open_tickets() {
    let (_tmp, config_path) = setup_imported();

    let (stdout, _, success) = run_hds(
        &config_path,
        &["suggest", "Errore aggiornamento IPOS su cassa 3", "--json"],
    );
    assert!(success);
    let suggestions: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    for s in suggestions.as_array().unwrap() {
        for id in s["source_record_ids"].as_array().unwrap() {
            assert_ne!(id, "T-102", "open ticket used as a source");
        }
    }
}

#[test]
fn test_suggest_confidence_descending() {
    let (_tmp, config_path) = setup_imported();

    let (stdout, _, success) = run_hds(
        &config_path,
        &["suggest", "Aggiornamento IPOS", "--body", "errore durante l'update", "--json"],
    );
    assert!(success);
    let suggestions: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let confidences: Vec<f64> = suggestions
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["confidence"].as_f64().unwrap())
        .collect();
    assert!(!confidences.is_empty());
    for pair in confidences.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
}

#[test]
fn test_suggest_limit() {
    let (_tmp, config_path) = setup_imported();

    let (stdout, _, success) = run_hds(
        &config_path,
        &["suggest", "Aggiornamento IPOS", "--limit", "1", "--json"],
    );
    assert!(success);
    let suggestions: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(suggestions.as_array().unwrap().len(), 1);
}

#[test]
fn test_suggest_no_results() {
    let (_tmp, config_path) = setup_imported();

    let (stdout, _, success) = run_hds(&config_path, &["suggest", "Monitor sfarfalla"]);
    assert!(success);
    assert!(stdout.contains("No suggestions found."));
}

#[test]
fn test_suggest_empty_database() {
    let (_tmp, config_path) = setup_test_env();
    run_hds(&config_path, &["init"]);

    let (stdout, _, success) = run_hds(&config_path, &["suggest", "Errore aggiornamento IPOS"]);
    assert!(success);
    assert!(stdout.contains("No suggestions found."));
}

#[test]
fn test_feedback_and_stats() {
    let (_tmp, config_path) = setup_imported();

    let (stdout, stderr, success) =
        run_hds(&config_path, &["feedback", "sug_1", "T-200", "--helpful"]);
    assert!(success, "feedback failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Feedback recorded"));
    assert!(stdout.contains("(helpful)"));

    let (_, _, success) = run_hds(
        &config_path,
        &["feedback", "sug_2", "T-201", "--not-helpful", "--text", "non pertinente"],
    );
    assert!(success);

    let (stdout, _, success) = run_hds(&config_path, &["stats", "--json"]);
    assert!(success);
    let stats: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats["feedback"]["total"], 2);
    assert_eq!(stats["feedback"]["helpful"], 1);
    assert_eq!(stats["feedback"]["accuracy_rate_percent"], 50.0);
    assert_eq!(stats["feedback"]["last_week_count"], 2);
}

#[test]
fn test_stats_empty() {
    let (_tmp, config_path) = setup_test_env();
    run_hds(&config_path, &["init"]);

    let (stdout, _, success) = run_hds(&config_path, &["stats"]);
    assert!(success);
    assert!(stdout.contains("Feedback:        0"));
    assert!(stdout.contains("Accuracy:        0.00%"));
}

#[test]
fn test_feedback_requires_verdict() {
    let (_tmp, config_path) = setup_imported();

    let (_, _, success) = run_hds(&config_path, &["feedback", "sug_1", "T-200"]);
    assert!(!success);
}

#[test]
fn test_feedback_rejects_blank_ids() {
    let (_tmp, config_path) = setup_imported();

    let (_, stderr, success) = run_hds(&config_path, &["feedback", " ", "T-200", "--helpful"]);
    assert!(!success);
    assert!(stderr.contains("must not be empty"));
}

#[test]
fn test_keywords_without_config() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("missing.toml");

    let (stdout, stderr, success) = run_hds(
        &missing,
        &["keywords", "Errore di aggiornamento sulla stampante"],
    );
    assert!(success, "keywords failed: {}", stderr);
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines[0].contains("errore (technical)"));
    assert!(!stdout.contains(" di"));
}

#[test]
fn test_keywords_rejects_broken_config() {
    let tmp = TempDir::new().unwrap();
    let broken = tmp.path().join("hds.toml");
    fs::write(&broken, "[vocabulary\ntechnical_terms = [").unwrap();

    let (stdout, stderr, success) = run_hds(&broken, &["keywords", "Errore stampante"]);
    assert!(!success, "broken config accepted: {}", stdout);
    assert!(stderr.contains("Failed to parse config file"));
}

#[test]
fn test_score_identical_texts() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("missing.toml");

    let (stdout, _, success) = run_hds(
        &missing,
        &["score", "Stampante offline", "Stampante offline", "--json"],
    );
    assert!(success);
    let breakdown: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(breakdown["score"], 1.0);
}

#[test]
fn test_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("missing.toml");

    let (_, stderr, success) = run_hds(&missing, &["init"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}
