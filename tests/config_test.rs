//! Integration tests for Settings layered loading.
//!
//! Precedence: defaults → global file → local `.orgbudget.toml` → ORGBUDGET_* env.
//! These tests pass explicit global paths (temp directories only). Every test
//! holds an [`EnvGuard`], which serializes access to the ORGBUDGET_* variables
//! and restores them afterwards.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;

use orgbudget::application::ApplicationError;
use orgbudget::config::{local_config_path, Settings, UnknownEmployeePolicy};

const ENV_VARS: [&str; 2] = ["ORGBUDGET_ROSTER", "ORGBUDGET_UNKNOWN_EMPLOYEE"];

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Exclusive access to the ORGBUDGET_* variables, cleared on entry and
/// restored on drop.
struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvGuard {
    fn new() -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let saved = ENV_VARS
            .iter()
            .map(|&name| (name, env::var(name).ok()))
            .collect();
        for name in ENV_VARS {
            env::remove_var(name);
        }
        Self { saved, _lock: lock }
    }

    fn set(&self, name: &str, value: &str) {
        env::set_var(name, value);
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (name, value) in &self.saved {
            match value {
                Some(value) => env::set_var(name, value),
                None => env::remove_var(name),
            }
        }
    }
}

#[test]
fn given_no_config_files_when_load_then_uses_defaults() {
    // Arrange
    let _env = EnvGuard::new();
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.toml");

    // Act
    let settings =
        Settings::load_layers(Some(missing.as_path()), Some(dir.path())).expect("load settings");

    // Assert
    assert_eq!(settings, Settings::default());
}

#[test]
fn given_global_config_when_load_then_applies_values() {
    // Arrange
    let _env = EnvGuard::new();
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("orgbudget.toml");
    fs::write(
        &global,
        "roster = \"/srv/org/roster.toml\"\nunknown_employee = \"error\"\n",
    )
    .unwrap();

    // Act
    let settings = Settings::load_layers(Some(global.as_path()), None).expect("load settings");

    // Assert
    assert_eq!(settings.roster, Some(PathBuf::from("/srv/org/roster.toml")));
    assert_eq!(settings.unknown_employee, UnknownEmployeePolicy::Error);
}

#[test]
fn given_local_config_when_load_then_overrides_global_field_by_field() {
    // Arrange
    let _env = EnvGuard::new();
    let global_dir = TempDir::new().unwrap();
    let global = global_dir.path().join("orgbudget.toml");
    fs::write(
        &global,
        "roster = \"/srv/org/roster.toml\"\nunknown_employee = \"error\"\n",
    )
    .unwrap();

    let local_dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(local_dir.path()),
        "roster = \"team.toml\"\n",
    )
    .unwrap();

    // Act
    let settings = Settings::load_layers(Some(global.as_path()), Some(local_dir.path()))
        .expect("load settings");

    // Assert
    assert_eq!(settings.roster, Some(PathBuf::from("team.toml")));
    assert_eq!(
        settings.unknown_employee,
        UnknownEmployeePolicy::Error,
        "unspecified local field should inherit from global"
    );
}

#[test]
fn given_malformed_config_when_load_then_config_error() {
    // Arrange
    let _env = EnvGuard::new();
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "unknown_employee = \"maybe\"\n").unwrap();

    // Act
    let result = Settings::load_layers(None, Some(dir.path()));

    // Assert
    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_unknown_key_when_load_then_config_error() {
    let _env = EnvGuard::new();
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "budget_floor = 10\n").unwrap();

    let result = Settings::load_layers(None, Some(dir.path()));

    assert!(result.is_err());
}

#[test]
fn given_settings_when_show_then_round_trips_through_toml() {
    let settings = Settings {
        roster: Some(PathBuf::from("/srv/org/roster.toml")),
        unknown_employee: UnknownEmployeePolicy::Error,
    };

    let content = settings.to_toml().unwrap();

    assert!(content.contains("unknown_employee = \"error\""));
    let parsed: Settings = toml::from_str(&content).unwrap();
    assert_eq!(parsed, settings);
}

#[test]
fn given_env_vars_when_load_then_override_local_file() {
    // Arrange
    let env = EnvGuard::new();
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "roster = \"team.toml\"\nunknown_employee = \"zero\"\n",
    )
    .unwrap();
    env.set("ORGBUDGET_ROSTER", "/srv/env/roster.toml");
    env.set("ORGBUDGET_UNKNOWN_EMPLOYEE", "error");

    // Act
    let settings = Settings::load_layers(None, Some(dir.path())).expect("load settings");

    // Assert
    assert_eq!(settings.roster, Some(PathBuf::from("/srv/env/roster.toml")));
    assert_eq!(settings.unknown_employee, UnknownEmployeePolicy::Error);
}

#[test]
fn given_env_roster_with_tilde_when_load_then_expands_to_home() {
    // Arrange
    let env = EnvGuard::new();
    env.set("ORGBUDGET_ROSTER", "~/org/roster.toml");
    let home = env::var("HOME").expect("HOME should be set");

    // Act
    let settings = Settings::load_layers(None, None).expect("load settings");

    // Assert
    assert_eq!(
        settings.roster,
        Some(PathBuf::from(format!("{home}/org/roster.toml")))
    );
}

#[test]
fn given_invalid_env_policy_when_load_then_config_error() {
    // Arrange
    let env = EnvGuard::new();
    env.set("ORGBUDGET_UNKNOWN_EMPLOYEE", "maybe");

    // Act
    let result = Settings::load_layers(None, None);

    // Assert
    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_empty_env_var_when_load_then_treated_as_unset() {
    let env = EnvGuard::new();
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "roster = \"team.toml\"\n").unwrap();
    env.set("ORGBUDGET_ROSTER", "");

    let settings = Settings::load_layers(None, Some(dir.path())).expect("load settings");

    assert_eq!(settings.roster, Some(PathBuf::from("team.toml")));
}
