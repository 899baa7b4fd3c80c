use fs_helper::{PACKAGE_NAME, VERSION};
use regex::Regex;

#[test]
fn test_package_metadata() {
    assert_eq!(PACKAGE_NAME, "fs-helper");
    assert_eq!(VERSION, "0.0.8");

    let semver = Regex::new(r"^\d+\.\d+\.\d+$").unwrap();
    assert!(semver.is_match(VERSION));
}

#[test]
fn test_bundled_settings_ship_with_crate() {
    let bundled = fs_helper::config::settings::BUNDLED_SETTINGS;
    assert!(bundled.contains("[logging]"));
    assert!(fs_helper::Settings::bundled().is_ok());
}
