#![allow(clippy::unwrap_used)]

use gateway_env::{
    logger::{self, config},
    TelemetryGuard,
};

fn logger() -> &'static TelemetryGuard {
    use once_cell::sync::OnceCell;

    static INSTANCE: OnceCell<TelemetryGuard> = OnceCell::new();
    INSTANCE.get_or_init(|| {
        let config = config::Config::new().unwrap();

        gateway_env::setup(&config.log, "gateway_env_test", ["logger"]).unwrap()
    })
}

#[test]
fn basic() {
    logger();

    logger::info!(flow = %logger::Flow::PaymentMethodsCreate, "payment method created");
    logger::warn!(tag = %logger::Tag::EncryptionService, "label fell back to placeholder");
}

#[test]
fn default_config_logs_to_console_only() {
    let config = config::Log::default();

    assert!(config.console.enabled);
    assert!(!config.file.enabled);
    assert_eq!(config.console.log_format, config::LogFormat::Default);
    assert_eq!(config.console.level.into_level(), logger::Level::INFO);
}

#[test]
fn explicit_missing_config_path_falls_back_to_defaults() {
    let config =
        config::Config::new_with_config_path(Some("does/not/exist.toml".into())).unwrap();

    assert!(config.log.console.enabled);
}
