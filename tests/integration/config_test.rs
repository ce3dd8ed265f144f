use chatline::core::config::{MusicPrefix, TempUnit};
use chatline::core::DisplayConfig;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_missing_file_loads_defaults() {
    let dir = TempDir::new().unwrap();
    let config = DisplayConfig::load_from(&dir.path().join("config.json")).unwrap();
    assert_eq!(config, DisplayConfig::default());
}

#[test]
fn test_empty_and_corrupt_files_load_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    fs::write(&path, "   \n").unwrap();
    assert_eq!(DisplayConfig::load_from(&path).unwrap(), DisplayConfig::default());

    fs::write(&path, "{ \"system_stats\": [1, 2").unwrap();
    assert_eq!(DisplayConfig::load_from(&path).unwrap(), DisplayConfig::default());
}

#[test]
fn test_save_then_load_keeps_changes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let mut config = DisplayConfig::default();
    config.set_value("system_stats.temp_unit", "F").unwrap();
    config.set_value("music.prefix", "text").unwrap();
    config.set_value("time.24hour", "true").unwrap();
    config.set_value("chat_timeout", "10").unwrap();
    config.save_to(&path).unwrap();

    let loaded = DisplayConfig::load_from(&path).unwrap();
    assert_eq!(loaded.system_stats.temp_unit, TempUnit::Fahrenheit);
    assert_eq!(loaded.music.prefix, MusicPrefix::Text);
    assert!(loaded.time.hour24);
    assert_eq!(loaded.chat_timeout, "10");
}

#[test]
fn test_partial_file_fills_missing_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{ "system_stats": { "cpu_temp": true }, "app": { "port": "9100" } }"#,
    )
    .unwrap();

    let config = DisplayConfig::load_from(&path).unwrap();
    assert!(config.system_stats.cpu_temp);
    assert!(config.system_stats.cpu_usage);
    assert_eq!(config.app.ip, "127.0.0.1");
    assert_eq!(config.app.endpoint().port, 9100);
    assert!(config.skinny_mode);
}

#[test]
fn test_saved_json_key_names() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    DisplayConfig::default().save_to(&path).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"24hour\""));
    assert!(raw.contains("\"temp_unit\": \"C\""));
    assert!(raw.contains("\"prefix\": \"emoji\""));
}
