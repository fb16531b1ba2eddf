//! Process configuration for mode selection and the admin shortcut.
//!
//! # Responsibility
//! - Read mode flags, remote credentials and the local database path.
//! - Keep environment access behind an injectable lookup for tests.
//!
//! # Invariants
//! - Mode strings are parsed eagerly; unknown values are rejected.
//! - Mode-specific requirements (remote URL/key) are checked when the
//!   backend is first resolved, not here.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DATA_MODE_VAR: &str = "CLINIC_DATA_MODE";
pub const LOCAL_DB_VAR: &str = "CLINIC_LOCAL_DB";
pub const REMOTE_URL_VAR: &str = "CLINIC_REMOTE_URL";
pub const REMOTE_KEY_VAR: &str = "CLINIC_REMOTE_KEY";
pub const ADMIN_MODE_VAR: &str = "CLINIC_ADMIN_MODE";
pub const ADMIN_SECRET_VAR: &str = "CLINIC_ADMIN_SECRET";

/// Configuration problem detected while parsing or resolving a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidMode { variable: &'static str, value: String },
    Missing(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMode { variable, value } => write!(
                f,
                "unsupported value `{value}` for {variable}; expected local|remote"
            ),
            Self::Missing(variable) => write!(f, "required configuration {variable} is not set"),
        }
    }
}

impl Error for ConfigError {}

/// Which backend serves the data operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataMode {
    #[default]
    Local,
    Remote,
}

impl DataMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

/// Which sign-in path the surrounding application uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminMode {
    /// Shared-secret shortcut with an on-device flag.
    Local,
    /// Sign-in handled by the remote identity service.
    #[default]
    Remote,
}

/// Credentials for the remote tabular service.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: String,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataConfig {
    pub mode: DataMode,
    /// SQLite file for local slots; `None` keeps slots in memory.
    pub local_db_path: Option<PathBuf>,
    pub remote_url: Option<String>,
    pub remote_key: Option<String>,
}

impl DataConfig {
    /// Local mode with slots in memory.
    pub fn local_in_memory() -> Self {
        Self::default()
    }

    /// Local mode persisted to a SQLite file.
    pub fn local_file(path: impl Into<PathBuf>) -> Self {
        Self {
            local_db_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Remote URL and key, required once remote mode is resolved.
    pub fn remote(&self) -> Result<RemoteConfig, ConfigError> {
        let base_url = self
            .remote_url
            .clone()
            .ok_or(ConfigError::Missing(REMOTE_URL_VAR))?;
        let api_key = self
            .remote_key
            .clone()
            .ok_or(ConfigError::Missing(REMOTE_KEY_VAR))?;
        Ok(RemoteConfig { base_url, api_key })
    }
}

#[derive(Clone, PartialEq, Eq, Default)]
pub struct AdminConfig {
    pub mode: AdminMode,
    pub secret: Option<String>,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("mode", &self.mode)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub admin: AdminConfig,
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mode = match read(DATA_MODE_VAR) {
            None => DataMode::default(),
            Some(value) => match parse_mode(&value) {
                Some(true) => DataMode::Local,
                Some(false) => DataMode::Remote,
                None => {
                    return Err(ConfigError::InvalidMode {
                        variable: DATA_MODE_VAR,
                        value,
                    })
                }
            },
        };

        let admin_mode = match read(ADMIN_MODE_VAR) {
            None => AdminMode::default(),
            Some(value) => match parse_mode(&value) {
                Some(true) => AdminMode::Local,
                Some(false) => AdminMode::Remote,
                None => {
                    return Err(ConfigError::InvalidMode {
                        variable: ADMIN_MODE_VAR,
                        value,
                    })
                }
            },
        };

        Ok(Self {
            data: DataConfig {
                mode,
                local_db_path: read(LOCAL_DB_VAR).map(PathBuf::from),
                remote_url: read(REMOTE_URL_VAR),
                remote_key: read(REMOTE_KEY_VAR),
            },
            admin: AdminConfig {
                mode: admin_mode,
                secret: read(ADMIN_SECRET_VAR),
            },
        })
    }
}

/// `Some(true)` for local, `Some(false)` for remote.
fn parse_mode(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "local" => Some(true),
        "remote" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{AdminMode, AppConfig, ConfigError, DataMode, REMOTE_KEY_VAR};
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_to_local_data_and_remote_admin() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.data.mode, DataMode::Local);
        assert_eq!(config.data.local_db_path, None);
        assert_eq!(config.admin.mode, AdminMode::Remote);
        assert_eq!(config.admin.secret, None);
    }

    #[test]
    fn reads_remote_settings_case_insensitively() {
        let config = config_from(&[
            ("CLINIC_DATA_MODE", " Remote "),
            ("CLINIC_REMOTE_URL", "https://example.supabase.co"),
            ("CLINIC_REMOTE_KEY", "anon"),
            ("CLINIC_ADMIN_MODE", "LOCAL"),
            ("CLINIC_ADMIN_SECRET", "s3cret"),
        ])
        .unwrap();
        assert_eq!(config.data.mode, DataMode::Remote);
        assert_eq!(config.admin.mode, AdminMode::Local);
        let remote = config.data.remote().unwrap();
        assert_eq!(remote.base_url, "https://example.supabase.co");
        assert!(!format!("{remote:?}").contains("anon"));
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = config_from(&[("CLINIC_DATA_MODE", "cloud")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMode { value, .. } if value == "cloud"));
    }

    #[test]
    fn remote_requires_key() {
        let config = config_from(&[("CLINIC_REMOTE_URL", "https://x")]).unwrap();
        assert_eq!(
            config.data.remote().unwrap_err(),
            ConfigError::Missing(REMOTE_KEY_VAR)
        );
    }
}
