use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Config file looked up in the current directory.
pub const CONFIG_FILE: &str = ".bitbucket-pr-tools.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Top-level configuration loaded from .bitbucket-pr-tools.toml.
///
/// All fields are optional; environment variables override the file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bitbucket: BitbucketConfig,

    #[serde(default)]
    pub diff: DiffConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BitbucketConfig {
    /// Server root, e.g. "https://bitbucket.example.com". Env: BITBUCKET_URL
    pub base_url: Option<String>,
    /// Personal access token. Env: BITBUCKET_TOKEN
    pub token: Option<String>,
    /// Project key used when a call names none. Env: BITBUCKET_DEFAULT_PROJECT
    pub default_project: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiffConfig {
    /// Default per-file content-line cap; 0 or unset means no limit.
    /// Env: BITBUCKET_DIFF_MAX_LINES_PER_FILE
    pub max_lines_per_file: Option<usize>,
    /// Context lines requested from the server when a call names none
    pub context_lines: Option<u32>,
}

impl Config {
    /// Load configuration from .bitbucket-pr-tools.toml in the current
    /// directory, or from `path` when given, then apply env overrides.
    /// A missing default file yields the default config.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let default = Path::new(CONFIG_FILE);
                if default.exists() {
                    Self::load_from(default)?
                } else {
                    Config::default()
                }
            }
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Override fields from environment variables looked up through `var`.
    pub fn apply_env<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("BITBUCKET_URL") {
            self.bitbucket.base_url = Some(url);
        }
        if let Some(token) = var("BITBUCKET_TOKEN") {
            self.bitbucket.token = Some(token);
        }
        if let Some(project) = var("BITBUCKET_DEFAULT_PROJECT") {
            self.bitbucket.default_project = Some(project);
        }
        if let Some(value) = var("BITBUCKET_DIFF_MAX_LINES_PER_FILE") {
            let parsed = value.trim().parse::<usize>().map_err(|_| ConfigError::InvalidEnv {
                name: "BITBUCKET_DIFF_MAX_LINES_PER_FILE",
                value: value.clone(),
            })?;
            self.diff.max_lines_per_file = Some(parsed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.bitbucket.base_url.is_none());
        assert!(config.bitbucket.token.is_none());
        assert!(config.diff.max_lines_per_file.is_none());
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_str = r#"
[bitbucket]
base_url = "https://bitbucket.example.com"
default_project = "CORE"

[diff]
max_lines_per_file = 500
context_lines = 5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.bitbucket.base_url.as_deref(),
            Some("https://bitbucket.example.com")
        );
        assert_eq!(config.bitbucket.default_project.as_deref(), Some("CORE"));
        assert_eq!(config.diff.max_lines_per_file, Some(500));
        assert_eq!(config.diff.context_lines, Some(5));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config: Config = toml::from_str("[diff]\nmax_lines_per_file = 500\n").unwrap();
        config
            .apply_env(env(&[
                ("BITBUCKET_URL", "https://bb.internal"),
                ("BITBUCKET_TOKEN", "secret"),
                ("BITBUCKET_DIFF_MAX_LINES_PER_FILE", "200"),
            ]))
            .unwrap();
        assert_eq!(config.bitbucket.base_url.as_deref(), Some("https://bb.internal"));
        assert_eq!(config.bitbucket.token.as_deref(), Some("secret"));
        assert_eq!(config.diff.max_lines_per_file, Some(200));
    }

    #[test]
    fn test_invalid_env_number() {
        let mut config = Config::default();
        let err = config
            .apply_env(env(&[("BITBUCKET_DIFF_MAX_LINES_PER_FILE", "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("bitbucket_pr_tools_config_test.toml");
        std::fs::write(&path, "[bitbucket]\ndefault_project = \"OPS\"\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.bitbucket.default_project.as_deref(), Some("OPS"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_from_missing_file() {
        let path = std::env::temp_dir().join("bitbucket_pr_tools_does_not_exist.toml");
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::FileRead(_))
        ));
    }
}
