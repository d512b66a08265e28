//! Service configuration read from the environment

use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_GUARDIANSHIP_TEMPLATE_URL: &str =
    "https://guardianship-conservatorship.netlify.app/templates/guardianship";
pub const DEFAULT_CONSERVATORSHIP_TEMPLATE_URL: &str =
    "https://guardianshipconservatorsh.netlify.app/templates";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a port number, got {value:?}")]
    InvalidPort { name: &'static str, value: String },

    #[error("{name} must be true or false, got {value:?}")]
    InvalidFlag { name: &'static str, value: String },

    #[error("{0} is set but empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub guardianship_template_url: String,
    pub conservatorship_template_url: String,
    /// Read templates from this directory instead of the template host
    pub template_dir: Option<PathBuf>,
    /// Fail a form when any mapped field is missing from its template
    pub strict_fields: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            guardianship_template_url: DEFAULT_GUARDIANSHIP_TEMPLATE_URL.to_string(),
            conservatorship_template_url: DEFAULT_CONSERVATORSHIP_TEMPLATE_URL.to_string(),
            template_dir: None,
            strict_fields: false,
        }
    }
}

impl ServerConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort { name: "PORT", value })?,
            None => defaults.port,
        };

        let strict_fields = match lookup("STRICT_FIELDS") {
            Some(value) => parse_flag("STRICT_FIELDS", value)?,
            None => defaults.strict_fields,
        };

        let template_dir = match lookup("TEMPLATE_DIR") {
            Some(dir) if dir.trim().is_empty() => return Err(ConfigError::Empty("TEMPLATE_DIR")),
            Some(dir) => Some(PathBuf::from(dir)),
            None => None,
        };

        Ok(Self {
            host: non_empty(lookup("HOST"), "HOST")?.unwrap_or(defaults.host),
            port,
            guardianship_template_url: non_empty(
                lookup("GUARDIANSHIP_TEMPLATE_URL"),
                "GUARDIANSHIP_TEMPLATE_URL",
            )?
            .unwrap_or(defaults.guardianship_template_url),
            conservatorship_template_url: non_empty(
                lookup("CONSERVATORSHIP_TEMPLATE_URL"),
                "CONSERVATORSHIP_TEMPLATE_URL",
            )?
            .unwrap_or(defaults.conservatorship_template_url),
            template_dir,
            strict_fields,
        })
    }
}

fn non_empty(value: Option<String>, name: &'static str) -> Result<Option<String>, ConfigError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(ConfigError::Empty(name)),
        other => Ok(other),
    }
}

fn parse_flag(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config(&[]).unwrap(), ServerConfig::default());
    }

    #[test]
    fn test_overrides() {
        let c = config(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("TEMPLATE_DIR", "/srv/templates"),
            ("STRICT_FIELDS", "1"),
        ])
        .unwrap();
        assert_eq!(c.host, "127.0.0.1");
        assert_eq!(c.port, 9000);
        assert_eq!(c.template_dir, Some(PathBuf::from("/srv/templates")));
        assert!(c.strict_fields);
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            config(&[("PORT", "eighty")]),
            Err(ConfigError::InvalidPort {
                name: "PORT",
                value: "eighty".into()
            })
        );
        assert!(matches!(
            config(&[("STRICT_FIELDS", "maybe")]),
            Err(ConfigError::InvalidFlag { .. })
        ));
        assert_eq!(
            config(&[("GUARDIANSHIP_TEMPLATE_URL", " ")]),
            Err(ConfigError::Empty("GUARDIANSHIP_TEMPLATE_URL"))
        );
    }
}
