mod common;

use pagemarker::config::{Config, ConfigError, ConfigStore};

/// Test that Config::default() produces the expected values.
#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.server.bind_addr, "127.0.0.1:8080");
    assert_eq!(config.marker.namespace, "PageMarker");
    assert_eq!(config.marker.reset_key, "__pagemarker_reset");
    assert_eq!(config.session.cookie_name, "pagemarker_session");
    assert!(config.validate().is_ok());
}

/// Test that Config::config_path() returns a path ending with the expected filename.
#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("pagemarker/config.toml"));
}

#[test]
fn test_missing_file_uses_defaults() {
    let (dir, _) = common::temp_config("");
    let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.marker.namespace, "PageMarker");
}

/// Test that a partial file fills the rest from defaults.
#[test]
fn test_parse_partial_toml() {
    let (_dir, path) = common::temp_config(
        r#"
[marker]
reset_key = "clear_filters"
"#,
    );

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.marker.reset_key, "clear_filters");
    assert_eq!(config.marker.namespace, "PageMarker");
    assert_eq!(config.server.bind_addr, "127.0.0.1:8080");
}

#[test]
fn test_parse_full_toml() {
    let (_dir, path) = common::temp_config(
        r#"
[server]
bind_addr = "0.0.0.0:9000"

[marker]
namespace = "Lists"
reset_key = "reset"

[session]
cookie_name = "sid"
"#,
    );

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.server.bind_addr, "0.0.0.0:9000");
    assert_eq!(config.marker.namespace, "Lists");
    assert_eq!(config.session.cookie_name, "sid");
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let (_dir, path) = common::temp_config("[marker\nnamespace = ");
    match Config::load_from(&path) {
        Err(ConfigError::ParseError { path: p, .. }) => assert_eq!(p, path),
        other => panic!("Expected ParseError, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_validation_fails_empty_reset_key() {
    let (_dir, path) = common::temp_config(
        r#"
[marker]
reset_key = "  "
"#,
    );

    match Config::load_from(&path) {
        Err(ConfigError::ValidationError { message }) => {
            assert!(message.contains("marker.reset_key"));
        }
        other => panic!("Expected ValidationError, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_validation_fails_bad_bind_addr() {
    let mut config = Config::default();
    config.server.bind_addr = "localhost".to_string();

    match config.validate() {
        Err(ConfigError::ValidationError { message }) => {
            assert!(message.contains("localhost"));
        }
        other => panic!("Expected ValidationError, got {:?}", other),
    }
}

#[test]
fn test_config_store_reload() {
    let (_dir, path) = common::temp_config("[marker]\nnamespace = \"First\"\n");
    let store = ConfigStore::new(Config::load_from(&path).unwrap(), path.clone());
    assert_eq!(store.get().marker.namespace, "First");

    std::fs::write(&path, "[marker]\nnamespace = \"Second\"\n").unwrap();
    store.reload().unwrap();
    assert_eq!(store.get().marker.namespace, "Second");
    assert_eq!(store.path(), path.as_path());
}

#[test]
fn test_config_store_reload_failure_keeps_old() {
    let (_dir, path) = common::temp_config("[marker]\nnamespace = \"First\"\n");
    let store = ConfigStore::new(Config::load_from(&path).unwrap(), path.clone());

    std::fs::write(&path, "not = [valid").unwrap();
    assert!(store.reload().is_err());
    assert_eq!(store.get().marker.namespace, "First");
}
