use std::fs;

use sysfolio_core::service::{ServiceDirectory, ServiceStatus};
use sysfolio_core::SysfolioConfig;
use tempfile::TempDir;

#[test]
fn test_missing_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = SysfolioConfig::load_from(&temp_dir.path().join("config.toml"))
        .expect("missing file should load defaults");
    assert_eq!(config, SysfolioConfig::default());
}

#[test]
fn test_malformed_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[load_test\nconcurrent_users = ").unwrap();

    let err = SysfolioConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse configuration file"));
}

#[test]
fn test_services_file_replaces_canned_directory() {
    let temp_dir = TempDir::new().unwrap();
    let services_path = temp_dir.path().join("services.toml");
    fs::write(
        &services_path,
        r#"
[[service]]
id = "billing"
name = "Billing Service"
status = "warning"
uptime = "2d 4h 0m"
port = 7000

[[service.stats]]
label = "Invoices/min"
value = "12"

[[service.logs]]
type = "warn"
message = "Slow database query (325ms)"
timestamp = "2024-03-01T12:00:00+00:00"
"#,
    )
    .unwrap();

    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!("services_file = {:?}\n", services_path.display().to_string()),
    )
    .unwrap();

    let config = SysfolioConfig::load_from(&config_path).unwrap();
    let directory = config.service_directory().unwrap();
    assert_eq!(directory.len(), 1);

    let billing = directory.find("billing").unwrap();
    assert_eq!(billing.status, ServiceStatus::Warning);
    assert_eq!(billing.stats[0].value, "12");
    assert_eq!(billing.logs.len(), 1);
}

#[test]
fn test_directory_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("services.toml");

    let canned = ServiceDirectory::canned_now();
    fs::write(&path, canned.to_toml_string().unwrap()).unwrap();

    let loaded = ServiceDirectory::load_from(&path).unwrap();
    assert_eq!(loaded.len(), canned.len());
    for (a, b) in loaded.iter().zip(canned.iter()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.status, b.status);
        assert_eq!(a.logs.len(), b.logs.len());
    }
}

#[test]
fn test_missing_services_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = ServiceDirectory::load_from(&temp_dir.path().join("nope.toml")).unwrap_err();
    assert!(err.is_io());
}
