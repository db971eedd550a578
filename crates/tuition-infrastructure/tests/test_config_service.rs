use std::fs;
use tempfile::TempDir;
use tuition_core::TuitionError;
use tuition_infrastructure::ConfigService;

#[test]
fn test_missing_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");

    let config = ConfigService::load_file(&path).expect("Missing file should load");
    assert_eq!(config.min_student_id_len, 7);
    assert_eq!(config.notice_ttl_secs, 5);
    assert_eq!(config.otp.countdown_secs, 300);
    assert!(!path.exists(), "Loading should not create the file");
}

#[test]
fn test_load_file_reads_values() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
api_base_url = "http://10.0.0.5:9000"
notice_ttl_secs = 8

[payment]
reconcile_balance_after_payment = true
"#,
    )
    .unwrap();

    let config = ConfigService::load_file(&path).unwrap();
    assert_eq!(config.api_base_url, "http://10.0.0.5:9000");
    assert_eq!(config.notice_ttl_secs, 8);
    assert!(config.payment.reconcile_balance_after_payment);
    assert!(config.otp.restart_countdown_on_resend);
}

#[test]
fn test_malformed_file_is_serialization_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "api_base_url = [not toml").unwrap();

    let err = ConfigService::load_file(&path).unwrap_err();
    assert!(matches!(err, TuitionError::Serialization { .. }));
}

#[test]
fn test_service_caches_until_invalidated() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "min_student_id_len = 9\n").unwrap();

    let service = ConfigService::with_path(&path);
    assert_eq!(service.try_get_config().unwrap().min_student_id_len, 9);

    fs::write(&path, "min_student_id_len = 11\n").unwrap();
    assert_eq!(service.get_config().min_student_id_len, 9, "Should serve cached value");

    service.invalidate_cache();
    assert_eq!(service.get_config().min_student_id_len, 11);
}

#[test]
fn test_broken_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[otp]\ncountdown_secs = 0\n").unwrap();

    let service = ConfigService::with_path(&path);
    assert!(service.try_get_config().is_err());
    assert_eq!(service.get_config().otp.countdown_secs, 300);
}
