use std::fs;

use refgraph::config::*;
use refgraph::RefGraphError;
use tempfile::TempDir;

#[test]
fn test_default_config_values() {
    let config = SearchConfig::default();
    assert_eq!(config.slice_budget_ms, 3000);
    assert_eq!(config.slice_budget().as_secs(), 3);
    assert_eq!(config.max_slices, 4);
    assert!(config.is_ignored_category(12));
    assert!(config.is_ignored_category(5));
    assert!(!config.is_ignored_category(1));
    assert_eq!(config.no_results_text, NO_RESULTS_TEXT);
    assert!(config.processing_markers.iter().any(|m| m == "Please Wait..."));
    assert_eq!(config.max_expand_attempts, 3);
}

#[test]
fn test_save_and_load_config() {
    let dir = TempDir::new().unwrap();
    let config = SearchConfig {
        slice_budget_ms: 500,
        max_slices: 10,
        ..SearchConfig::default()
    };
    save_config(dir.path(), &config).unwrap();
    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(config, loaded);
    assert!(!get_config_path(dir.path()).with_extension("tmp").exists());
}

#[test]
fn test_missing_config_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(loaded, SearchConfig::default());
}

#[test]
fn test_partial_config_fills_defaults() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(get_refgraph_dir(dir.path())).unwrap();
    fs::write(
        get_config_path(dir.path()),
        r#"{ "max_slices": 9, "ignored_categories": [12] }"#,
    )
    .unwrap();

    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(loaded.max_slices, 9);
    assert!(!loaded.is_ignored_category(5));
    assert_eq!(loaded.slice_budget_ms, 3000);
}

#[test]
fn test_malformed_config_is_error() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(get_refgraph_dir(dir.path())).unwrap();
    fs::write(get_config_path(dir.path()), "{ not json").unwrap();

    let err = load_config(dir.path()).unwrap_err();
    assert!(matches!(err, RefGraphError::Config { .. }));
}

#[test]
fn test_zero_expand_attempts_rejected() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(get_refgraph_dir(dir.path())).unwrap();
    fs::write(get_config_path(dir.path()), r#"{ "max_expand_attempts": 0 }"#).unwrap();

    let err = load_config(dir.path()).unwrap_err();
    assert!(err.to_string().contains("max_expand_attempts"));
}

#[test]
fn test_refgraph_dir_name() {
    let dir = TempDir::new().unwrap();
    let rg_dir = get_refgraph_dir(dir.path());
    assert!(rg_dir.ends_with(".refgraph"));
    assert!(get_config_path(dir.path()).ends_with(".refgraph/config.json"));
}
