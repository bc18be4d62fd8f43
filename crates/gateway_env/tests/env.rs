#![allow(clippy::unwrap_used)]

use gateway_env::{env, Env};

#[test]
fn env_parses_case_insensitively() {
    assert_eq!("production".parse::<Env>().unwrap(), Env::Production);
    assert_eq!("Sandbox".parse::<Env>().unwrap(), Env::Sandbox);
    assert!("staging".parse::<Env>().is_err());
}

#[test]
fn config_file_name_follows_env() {
    assert_eq!(Env::Development.config_file_name(), "development");
    assert_eq!(Env::Production.to_string(), "production");
}

#[test]
fn workspace_path_is_two_levels_above_crate() {
    let path = env::workspace_path();
    assert!(path.join("crates").join("gateway_env").exists());
}
