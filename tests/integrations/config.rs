use alertbus::logging::init_tracing;
use alertbus::{
    AlertCategory, AlertContext, AlertError, AlertEvent, AlertType, Config, ErrorAlert,
    WarningAlert,
};
use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

struct PaymentFailed;

impl AlertEvent for PaymentFailed {
    const NAME: &'static str = "PaymentFailed";
    const KIND_OF: Option<AlertCategory> = Some(AlertCategory::Error);
}

struct SlowQuery;

impl AlertEvent for SlowQuery {
    const NAME: &'static str = "SlowQuery";
    const KIND_OF: Option<AlertCategory> = Some(AlertCategory::Warning);
}

/// A helper function to run a test with a temporary config file.
fn with_config_file<F>(toml_content: &str, test_fn: F)
where
    F: FnOnce(PathBuf),
{
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", toml_content).unwrap();
    let path = file.path().to_path_buf();
    test_fn(path);
}

#[test]
#[serial]
fn test_load_full_valid_config() {
    let toml_content = r#"
        log_level = "warn"

        [console]
        timestamp_format = "%d/%m %H:%M"

        [dispatch]
        install_standard_listeners = false

        [overrides]
        error = "PaymentFailed"
        warning = "SlowQuery"
    "#;

    with_config_file(toml_content, |path| {
        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.console.timestamp_format, "%d/%m %H:%M");
        assert!(!config.dispatch.install_standard_listeners);
        assert_eq!(config.overrides.len(), 2);
        assert_eq!(config.overrides[&AlertCategory::Warning], "SlowQuery");
    });
}

#[test]
#[serial]
fn test_env_overrides_file() {
    with_config_file("log_level = \"debug\"\n", |path| {
        std::env::set_var("ALERTS_LOG_LEVEL", "trace");
        std::env::set_var("ALERTS_CONSOLE__TIMESTAMP_FORMAT", "%H");
        let config = Config::load(Some(path.as_path()));
        std::env::remove_var("ALERTS_LOG_LEVEL");
        std::env::remove_var("ALERTS_CONSOLE__TIMESTAMP_FORMAT");

        let config = config.unwrap();
        assert_eq!(config.log_level, "trace");
        assert_eq!(config.console.timestamp_format, "%H");
    });
}

#[test]
#[serial]
fn test_malformed_file_is_rejected() {
    with_config_file("[dispatch]\ninstall_standard_listeners = \"sometimes\"\n", |path| {
        assert!(Config::load(Some(path.as_path())).is_err());
    });
}

#[test]
#[serial]
fn test_loaded_overrides_drive_resolution() {
    let toml_content = r#"
        [overrides]
        error = "PaymentFailed"
        warning = "SlowQuery"
    "#;

    with_config_file(toml_content, |path| {
        let config = Config::load(Some(path.as_path())).unwrap();
        let context = AlertContext::builder(config)
            .register::<PaymentFailed>()
            .register::<SlowQuery>()
            .build()
            .unwrap();

        let registry = context.registry();
        assert!(registry.has_overrides());
        assert_eq!(registry.resolve_type::<ErrorAlert>(), AlertType::of::<PaymentFailed>());
        assert_eq!(registry.resolve_type::<WarningAlert>(), AlertType::of::<SlowQuery>());
        assert_eq!(registry.find("SlowQuery"), Some(AlertType::of::<SlowQuery>()));
    });
}

#[test]
#[serial]
fn test_override_with_wrong_kind_fails_build() {
    with_config_file("[overrides]\ncritical = \"PaymentFailed\"\n", |path| {
        let config = Config::load(Some(path.as_path())).unwrap();
        let result = AlertContext::builder(config)
            .register::<PaymentFailed>()
            .build();
        assert!(matches!(result, Err(AlertError::Configuration(_))));
    });
}

#[test]
#[serial]
fn test_code_binding_wins_over_config() {
    let mut config = Config::default();
    config
        .overrides
        .insert(AlertCategory::Error, "ErrorAlert".to_string());

    let context = AlertContext::builder(config)
        .bind::<PaymentFailed>()
        .build()
        .unwrap();

    assert_eq!(
        context.registry().binding(AlertCategory::Error),
        Some(AlertType::of::<PaymentFailed>())
    );
}

#[test]
fn test_tracing_init_is_idempotent() {
    init_tracing("debug");
    assert!(!init_tracing("info"));
}
