//! Client configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::Session;

pub const ENV_API_URL: &str = "QUIZMASTER_API_URL";
pub const ENV_TOKEN: &str = "QUIZMASTER_TOKEN";
pub const ENV_LOG: &str = "QUIZMASTER_LOG";

/// Settings for talking to the quiz service and for logging.
///
/// Note: Custom Debug impl masks the session token.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Root of the quiz service, without the `/api` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Session token from `quizmaster login`.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Directory for the rolling log file.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("log_dir", &self.log_dir)
            .field("log_filter", &self.log_filter)
            .finish()
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}
fn default_log_filter() -> String {
    "info,quizmaster_client=debug".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            request_timeout_secs: default_timeout(),
            log_dir: default_log_dir(),
            log_filter: default_log_filter(),
        }
    }
}

impl ClientConfig {
    /// Applies `QUIZMASTER_*` overrides, reading variables through `lookup`.
    /// Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(url) = var(ENV_API_URL) {
            self.base_url = url;
        }
        if let Some(token) = var(ENV_TOKEN) {
            self.token = Some(token);
        }
        if let Some(filter) = var(ENV_LOG) {
            self.log_filter = filter;
        }
    }

    /// The session handed to the API client.
    pub fn session(&self) -> Session {
        let session = Session::new(&self.base_url)
            .with_timeout(Duration::from_secs(self.request_timeout_secs));
        match &self.token {
            Some(token) => session.with_token(token),
            None => session,
        }
    }
}

/// Load configuration from well-known paths and the process environment.
///
/// Search order:
/// 1. `path`, when given (must exist)
/// 2. `quizmaster.toml` in the current directory
/// 3. `~/.config/quizmaster/config.toml`
///
/// Environment overrides: `QUIZMASTER_API_URL`, `QUIZMASTER_TOKEN`, `QUIZMASTER_LOG`.
pub fn load_config_from(path: Option<&Path>) -> Result<ClientConfig> {
    let mut config = read_config(path)?;
    config.apply_env(|name| std::env::var(name).ok());
    Ok(config)
}

/// Like [`load_config_from`] without the environment overrides.
pub fn read_config(path: Option<&Path>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => default_locations().into_iter().find(|p| p.exists()),
    };

    match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ClientConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))
        }
        None => Ok(ClientConfig::default()),
    }
}

fn default_locations() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("quizmaster.toml")];
    if let Ok(home) = std::env::var("HOME") {
        paths.push(
            PathBuf::from(home)
                .join(".config")
                .join("quizmaster")
                .join("config.toml"),
        );
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.token, None);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert_eq!(config.log_filter, "info,quizmaster_client=debug");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"https://quiz.example.com/\"").unwrap();
        writeln!(file, "request_timeout_secs = 5").unwrap();

        let config = read_config(Some(file.path())).unwrap();
        assert_eq!(config.base_url, "https://quiz.example.com/");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.log_dir, PathBuf::from("logs"));

        let session = config.session();
        assert_eq!(session.base_url(), "https://quiz.example.com");
        assert_eq!(session.timeout(), Duration::from_secs(5));
        assert_eq!(session.token(), None);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = read_config(Some(missing.as_path())).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn malformed_file_names_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "request_timeout_secs = \"soon\"").unwrap();

        let err = read_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = ClientConfig {
            token: Some("from-file".into()),
            ..ClientConfig::default()
        };
        config.apply_env(env(&[
            (ENV_API_URL, "http://10.0.0.2:8080"),
            (ENV_TOKEN, "from-env"),
            (ENV_LOG, "warn"),
        ]));

        assert_eq!(config.base_url, "http://10.0.0.2:8080");
        assert_eq!(config.token.as_deref(), Some("from-env"));
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = ClientConfig::default();
        config.apply_env(env(&[(ENV_TOKEN, "  "), (ENV_API_URL, "")]));
        assert_eq!(config.token, None);
        assert_eq!(config.base_url, "http://localhost:5000");
    }

    #[test]
    fn debug_masks_token() {
        let config = ClientConfig {
            token: Some("s3cret".into()),
            ..ClientConfig::default()
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("s3cret"));
        assert!(printed.contains("***"));
    }
}
