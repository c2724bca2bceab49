use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const CONFIG_ENV: &str = "SEALNOTE_CONFIG";
const APP_DIR: &str = "sealnote";
const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_ORIGIN: &str = "https://sealnote.app/";
pub const DEFAULT_EXPIRY_HOURS: u32 = 24;
pub const DEFAULT_MAX_PASSWORD_ATTEMPTS: u32 = 3;

#[derive(Debug)]
pub enum ConfigError {
    ConfigDirUnavailable,
    Io(std::io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
    InvalidOrigin(String),
    InvalidAttempts(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ConfigDirUnavailable => {
                write!(f, "unable to determine configuration directory")
            }
            ConfigError::Io(err) => write!(f, "filesystem error: {err}"),
            ConfigError::Parse(err) => write!(f, "failed to parse config: {err}"),
            ConfigError::Serialize(err) => write!(f, "failed to serialize config: {err}"),
            ConfigError::InvalidOrigin(origin) => {
                write!(f, "origin '{origin}' must start with http:// or https://")
            }
            ConfigError::InvalidAttempts(n) => {
                write!(f, "max password attempts must be at least 1 (got {n})")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Serialize(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Origin and path that share URLs are built on.
    pub origin: String,
    pub default_expiry_hours: u32,
    pub max_password_attempts: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            default_expiry_hours: DEFAULT_EXPIRY_HOURS,
            max_password_attempts: DEFAULT_MAX_PASSWORD_ATTEMPTS,
        }
    }
}

/// Partial update applied by `config set`.
#[derive(Debug, Default)]
pub struct SettingsUpdate {
    pub origin: Option<String>,
    pub default_expiry_hours: Option<u32>,
    pub max_password_attempts: Option<u32>,
}

pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    validate_origin(&settings.origin)?;
    if settings.max_password_attempts == 0 {
        return Err(ConfigError::InvalidAttempts(0));
    }
    Ok(())
}

pub fn validate_origin(origin: &str) -> Result<(), ConfigError> {
    if origin.starts_with("https://") || origin.starts_with("http://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidOrigin(origin.to_string()))
    }
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    let mut dir = config_dir().ok_or(ConfigError::ConfigDirUnavailable)?;
    dir.push(APP_DIR);
    dir.push(CONFIG_FILE_NAME);
    Ok(dir)
}

fn load_config(path: &Path) -> Result<Settings, ConfigError> {
    match fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).map_err(ConfigError::Parse),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
        Err(err) => Err(ConfigError::Io(err)),
    }
}

fn persist_config(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    let parent = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    if !parent.exists() {
        fs::create_dir_all(&parent).map_err(ConfigError::Io)?;
    }

    let toml = toml::to_string_pretty(settings).map_err(ConfigError::Serialize)?;
    let mut temp = NamedTempFile::new_in(&parent).map_err(ConfigError::Io)?;
    temp.write_all(toml.as_bytes()).map_err(ConfigError::Io)?;
    temp.flush().map_err(ConfigError::Io)?;
    temp.persist(path)
        .map_err(|err| ConfigError::Io(err.error))?;
    Ok(())
}

pub fn load() -> Result<Settings, ConfigError> {
    let settings = load_config(&config_path()?)?;
    validate(&settings)?;
    Ok(settings)
}

pub fn update(changes: SettingsUpdate) -> Result<Settings, ConfigError> {
    let path = config_path()?;
    let mut settings = load_config(&path)?;

    if let Some(origin) = changes.origin {
        settings.origin = origin;
    }
    if let Some(hours) = changes.default_expiry_hours {
        settings.default_expiry_hours = hours;
    }
    if let Some(attempts) = changes.max_password_attempts {
        settings.max_password_attempts = attempts;
    }

    validate(&settings)?;
    persist_config(&path, &settings)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_config(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "origin = \"https://notes.example.com/view\"\n").unwrap();

        let settings = load_config(&path).unwrap();
        assert_eq!(settings.origin, "https://notes.example.com/view");
        assert_eq!(settings.default_expiry_hours, DEFAULT_EXPIRY_HOURS);
        assert_eq!(settings.max_password_attempts, DEFAULT_MAX_PASSWORD_ATTEMPTS);
    }

    #[test]
    fn persisted_settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let settings = Settings {
            origin: "http://localhost:8080/".to_string(),
            default_expiry_hours: 0,
            max_password_attempts: 5,
        };

        persist_config(&path, &settings).unwrap();
        assert_eq!(load_config(&path).unwrap(), settings);
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "origin = [").unwrap();
        assert!(matches!(load_config(&path).unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_bad_origin_and_zero_attempts() {
        let bad_origin = Settings {
            origin: "ftp://example.com".to_string(),
            ..Settings::default()
        };
        assert!(matches!(
            validate(&bad_origin).unwrap_err(),
            ConfigError::InvalidOrigin(_)
        ));

        let zero = Settings {
            max_password_attempts: 0,
            ..Settings::default()
        };
        assert!(matches!(
            validate(&zero).unwrap_err(),
            ConfigError::InvalidAttempts(0)
        ));
    }
}
