use std::io::Write;

use tempfile::tempdir;

use crate::shared::config::load_settings_from;

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent");
    let settings = load_settings_from(path.to_str().unwrap()).unwrap();

    assert_eq!(settings.logging.log_dir, "logs");
    assert_eq!(settings.logging.stdout_level, "info");
    assert_eq!(settings.logging.file_level, "debug");
    assert!(!settings.aggregate.strict_serialization);
    assert_eq!(settings.aggregate.max_field_len, usize::MAX);
    assert_eq!(settings.aggregate.group_limit, None);
}

#[test]
fn file_values_override_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("concat.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"
[logging]
stdout_level = "warn"

[aggregate]
strict_serialization = true
max_field_len = 4096
group_limit = 10
"#
    )
    .unwrap();

    let settings = load_settings_from(path.to_str().unwrap()).unwrap();
    assert_eq!(settings.logging.stdout_level, "warn");
    assert_eq!(settings.logging.log_dir, "logs");
    assert!(settings.aggregate.strict_serialization);
    assert_eq!(settings.aggregate.max_field_len, 4096);
    assert_eq!(settings.aggregate.group_limit, Some(10));
}
