//! Config file round trips against a temporary directory.

use nimbus_core::Config;

#[test]
fn test_missing_file_writes_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nimbus").join("config.toml");

    let config = Config::load_from(&path).unwrap();

    assert!(path.exists(), "Default config should be written");
    assert_eq!(config.config_dir, dir.path().join("nimbus"));
    assert!(config.weather.api_key.is_empty());
    assert!(!config.validate().is_valid(), "Defaults lack an API key");
}

#[test]
fn test_reads_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[weather]
api_key = "from-file"
base_url = "http://localhost:9999/weather"

[location]
permission_granted = false
latitude = 48.8566
longitude = 2.3522
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();

    assert_eq!(config.weather.api_key, "from-file");
    assert_eq!(config.weather.base_url, "http://localhost:9999/weather");
    assert!(!config.location.permission_granted);
    assert_eq!(config.location.latitude, 48.8566);
    assert!(config.validate().is_valid());
}

#[test]
fn test_partial_location_table_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[weather]\napi_key = \"k\"\n\n[location]\npermission_granted = false\n",
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();

    assert!(!config.location.permission_granted);
    assert_eq!(config.location.latitude, 51.5074);
    assert_eq!(config.location.longitude, -0.1278);
    assert!(config.location.geocoder_url.contains("nominatim"));
}

#[test]
fn test_malformed_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[weather\napi_key = ").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("parse"), "unexpected error: {}", err);
}

#[test]
fn test_save_then_load_preserves_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = Config::default();
    config.weather.api_key = "saved-key".to_string();
    config.weather.request_timeout_secs = Some(5);
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.weather.api_key, "saved-key");
    assert_eq!(loaded.weather.request_timeout_secs, Some(5));
}
