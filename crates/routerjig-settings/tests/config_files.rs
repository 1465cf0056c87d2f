use routerjig_settings::{Config, ConfigError, MeasurementSystem, SettingsError};

#[test]
fn test_toml_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.debug = true;
    config.min_finger_width = 4;
    config.units.system = MeasurementSystem::Metric;
    config.units.num_increments = Some(2);
    config.woods.insert("Oak".to_string(), "red-oak.png".to_string());

    config.save_to_file(&path).expect("save failed");
    let loaded = Config::load_from_file(&path).expect("load failed");
    assert_eq!(loaded, config);
}

#[test]
fn test_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut config = Config::default();
    config.units.english_separator = "-".to_string();
    config.save_to_file(&path).expect("save failed");

    let loaded = Config::load_from_file(&path).expect("load failed");
    assert_eq!(loaded.units.english_separator, "-");
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "debug = true\n\n[units]\nsystem = \"metric\"\n").unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert!(loaded.debug);
    assert_eq!(loaded.min_finger_width, 2);
    assert_eq!(loaded.units.english_separator, " ");
    assert!(loaded.unit_system().is_metric());
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "min_finger_width = 0\n").unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::ValueOutOfRange { .. })
    ));
}

#[test]
fn test_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    let err = Config::default().save_to_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_explicit_path_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");
    assert!(matches!(
        Config::load_or_default(Some(&path)),
        Err(SettingsError::LoadError(_))
    ));
}
