//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/orgbudget/orgbudget.toml`
//! 3. Local config: `<dir>/.orgbudget.toml` (usually the working directory)
//! 4. Environment variables: `ORGBUDGET_*` prefix
//!
//! Command-line flags are applied on top by the CLI layer.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// What a budget query reports for an employee id that is not in the roster.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnknownEmployeePolicy {
    /// Report a budget of 0, same as an organization without budget
    #[default]
    Zero,
    /// Fail the query
    Error,
}

impl FromStr for UnknownEmployeePolicy {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" => Ok(Self::Zero),
            "error" => Ok(Self::Error),
            other => Err(ApplicationError::Config {
                message: format!("unknown_employee must be 'zero' or 'error', got '{other}'"),
            }),
        }
    }
}

impl fmt::Display for UnknownEmployeePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "zero"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    pub roster: Option<PathBuf>,
    pub unknown_employee: Option<UnknownEmployeePolicy>,
}

/// Unified configuration for orgbudget.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Roster file used when `--roster` is not given
    pub roster: Option<PathBuf>,
    /// Behavior for employee ids missing from the roster
    pub unknown_employee: UnknownEmployeePolicy,
}

/// Get the XDG config directory for orgbudget.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgbudget").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("orgbudget.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".orgbudget.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; unexpandable input is kept as is.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(roster) = &self.roster {
            let expanded = expand_env_vars(roster.to_string_lossy().as_ref());
            self.roster = Some(PathBuf::from(expanded));
        }
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            roster: overlay.roster.clone().or_else(|| self.roster.clone()),
            unknown_employee: overlay.unknown_employee.unwrap_or(self.unknown_employee),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.orgbudget.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), local_dir)
    }

    /// Load settings from an explicit global config path.
    ///
    /// Missing files are skipped; unreadable or malformed ones are errors.
    pub fn load_layers(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_path {
            if global_path.exists() {
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply ORGBUDGET_* environment variables as explicit overrides.
    ///
    /// `ORGBUDGET_ROSTER`, `ORGBUDGET_UNKNOWN_EMPLOYEE`; empty values count as unset.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // config uses the key separator after the prefix unless told otherwise
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ORGBUDGET")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("roster") {
            settings.roster = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("unknown_employee") {
            settings.unknown_employee = val.parse()?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# orgbudget configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/orgbudget/orgbudget.toml
#   Local:  ./.orgbudget.toml
#   Env:    ORGBUDGET_* environment variables (explicit overrides)

# Roster file used when --roster is not given
# roster = "~/org/roster.toml"

# Unknown employee ids: "zero" reports a budget of 0, "error" fails the query
# unknown_employee = "zero"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_settings_when_created_then_reports_zero_for_unknown() {
        let settings = Settings::default();
        assert_eq!(settings.roster, None);
        assert_eq!(settings.unknown_employee, UnknownEmployeePolicy::Zero);
    }

    #[test]
    fn given_overlay_when_merging_then_specified_fields_win() {
        let base = Settings {
            roster: Some(PathBuf::from("/base/roster.toml")),
            unknown_employee: UnknownEmployeePolicy::Zero,
        };
        let overlay = RawSettings {
            roster: None,
            unknown_employee: Some(UnknownEmployeePolicy::Error),
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.roster, Some(PathBuf::from("/base/roster.toml")));
        assert_eq!(merged.unknown_employee, UnknownEmployeePolicy::Error);
    }

    #[test]
    fn given_tilde_in_roster_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            roster: Some(PathBuf::from("~/roster.toml")),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let roster = settings.roster.unwrap();
        assert!(roster.to_string_lossy().starts_with(&home));
        assert!(!roster.to_string_lossy().contains('~'));
    }

    #[test]
    fn given_policy_strings_when_parsing_then_accepts_known_values() {
        assert_eq!(
            "zero".parse::<UnknownEmployeePolicy>().unwrap(),
            UnknownEmployeePolicy::Zero
        );
        assert_eq!(
            " ERROR ".parse::<UnknownEmployeePolicy>().unwrap(),
            UnknownEmployeePolicy::Error
        );
        assert!("ignore".parse::<UnknownEmployeePolicy>().is_err());
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.roster.is_none());
        assert!(raw.unknown_employee.is_none());
    }
}
