//! Configuration loading and types

use std::path::{Path, PathBuf};

use cloudhost_inventory::ConnectionDefaults;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable pointing at a config file
pub const CONFIG_ENV: &str = "CLOUDHOST_CONFIG";

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level configuration for the inventory script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Regions queried when `--regions` is not given
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,
    /// Output path for `--set-env`
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Connection variables for compute hosts
    #[serde(default)]
    pub connection: ConnectionDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            regions: default_regions(),
            env_file: default_env_file(),
            log_level: default_log_level(),
            connection: ConnectionDefaults::default(),
        }
    }
}

fn default_regions() -> Vec<String> {
    vec!["us-east-1".to_string()]
}

fn default_env_file() -> PathBuf {
    PathBuf::from("env_vars.sh")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from an explicit path, the environment, default paths, or use defaults
    ///
    /// Also returns the file the configuration came from, `None` for defaults.
    ///
    /// # Errors
    /// Returns error if a selected file cannot be read or parsed
    pub fn load_default(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        Self::load_selected(explicit, std::env::var_os(CONFIG_ENV).map(PathBuf::from))
    }

    fn load_selected(
        explicit: Option<&Path>,
        from_env: Option<PathBuf>,
    ) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let source = explicit
            .map(Path::to_path_buf)
            .or(from_env)
            .or_else(|| search_paths().into_iter().find(|path| path.exists()));

        match source {
            Some(path) => Ok((Self::load(&path)?, Some(path))),
            None => Ok((Config::default(), None)),
        }
    }
}

/// Default config locations, in priority order
fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("cloudhost.toml"),
        PathBuf::from("/etc/cloudhost/cloudhost.toml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("cloudhost/cloudhost.toml"));
    }
    paths
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.regions, ["us-east-1"]);
        assert_eq!(config.env_file, PathBuf::from("env_vars.sh"));
        assert_eq!(config.connection.user, "ubuntu");
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
regions = ["us-east-1", "eu-west-1"]

[connection]
user = "ec2-user"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.regions, ["us-east-1", "eu-west-1"]);
        assert_eq!(config.connection.user, "ec2-user");
        assert_eq!(config.connection.port, "22");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_explicit_path_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"env_file = "/tmp/endpoints.sh""#).unwrap();

        let (config, source) = Config::load_default(Some(file.path())).unwrap();

        assert_eq!(config.env_file, PathBuf::from("/tmp/endpoints.sh"));
        assert_eq!(source.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_env_path_used_without_explicit() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"regions = ["ap-south-1"]"#).unwrap();

        let (config, source) =
            Config::load_selected(None, Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.regions, ["ap-south-1"]);
        assert_eq!(source.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_explicit_path_beats_env_path() {
        let mut explicit = tempfile::NamedTempFile::new().unwrap();
        writeln!(explicit, r#"log_level = "debug""#).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let from_env = Some(dir.path().join("nope.toml"));

        let (config, source) = Config::load_selected(Some(explicit.path()), from_env).unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(source.as_deref(), Some(explicit.path()));
    }

    #[test]
    fn test_missing_env_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = Config::load_selected(None, Some(dir.path().join("nope.toml"))).unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.toml")).unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "regions = \"us-east-1\"").unwrap();

        let err = Config::load(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
