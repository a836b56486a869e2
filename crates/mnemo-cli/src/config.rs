use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::memory_tools::{DEFAULT_DAILY_LIST_LIMIT, DEFAULT_MAX_RESULTS, MemoryToolLimits};

pub(crate) const CONFIG_FILE: &str = "mnemo.toml";
pub(crate) const DIR_ENV: &str = "MNEMO_DIR";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub list: ListConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct MemoryConfig {
    /// Base directory; `~/` is expanded. Unset means the platform default.
    #[serde(default)]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SearchConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ListConfig {
    #[serde(default = "default_daily_limit")]
    pub daily_limit: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            daily_limit: default_daily_limit(),
        }
    }
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_daily_limit() -> usize {
    DEFAULT_DAILY_LIST_LIMIT
}

impl Config {
    /// Load config from a TOML file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load the discovered config, or defaults when no file exists.
    ///
    /// An explicit path that does not exist is an error.
    pub(crate) fn load_or_default(explicit: Option<&str>) -> Result<Self> {
        let path = Self::find_config_path(explicit);
        if explicit.is_none() && !path.exists() {
            debug!("no config file found, using defaults");
            return Ok(Self::default());
        }
        debug!(path = %path.display(), "loading config");
        Self::load(&path)
    }

    /// Resolve config path: check arg, then default locations.
    pub(crate) fn find_config_path(explicit: Option<&str>) -> PathBuf {
        if let Some(p) = explicit {
            return PathBuf::from(p);
        }

        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return local;
        }

        if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME") {
            let xdg = PathBuf::from(config_dir).join("mnemo").join(CONFIG_FILE);
            if xdg.exists() {
                return xdg;
            }
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/mnemo").join(CONFIG_FILE);
            if home_config.exists() {
                return home_config;
            }
        }

        local
    }

    /// Base directory: `--dir`, then `MNEMO_DIR`, then `[memory] dir`, then
    /// the platform default.
    pub(crate) fn resolve_base_dir(&self, flag: Option<&str>) -> PathBuf {
        self.base_dir_with(flag, std::env::var(DIR_ENV).ok())
    }

    fn base_dir_with(&self, flag: Option<&str>, env: Option<String>) -> PathBuf {
        let chosen = flag
            .map(str::to_owned)
            .or_else(|| env.filter(|v| !v.is_empty()))
            .or_else(|| self.memory.dir.clone());
        match chosen {
            Some(raw) => expand_home(&raw, dirs::home_dir().as_deref()),
            None => mnemo_memory::resolve_base_directory(),
        }
    }

    pub(crate) fn limits(&self) -> MemoryToolLimits {
        MemoryToolLimits {
            max_results: self.search.max_results,
            daily_list_limit: self.list.daily_limit,
        }
    }
}

fn expand_home(raw: &str, home: Option<&Path>) -> PathBuf {
    match (raw.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if raw == "~" => home.map_or_else(|| PathBuf::from(raw), Path::to_path_buf),
        _ => PathBuf::from(raw),
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.search.max_results, 20);
        assert_eq!(config.list.daily_limit, 10);
        assert!(config.memory.dir.is_none());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[memory]
dir = "/srv/agent/memory"

[search]
max_results = 5

[list]
daily_limit = 3
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.memory.dir.as_deref(), Some("/srv/agent/memory"));
        assert_eq!(
            config.limits(),
            MemoryToolLimits {
                max_results: 5,
                daily_list_limit: 3,
            }
        );
    }

    #[test]
    fn parse_partial_section_keeps_defaults() {
        let config: Config = toml::from_str("[search]\n").unwrap();
        assert_eq!(config.search.max_results, 20);
    }

    #[test]
    fn unknown_value_type_is_an_error() {
        assert!(toml::from_str::<Config>("[search]\nmax_results = \"many\"\n").is_err());
    }

    #[test]
    fn load_reports_parse_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mnemo.toml");
        std::fs::write(&path, "[memory\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(format!("{err}").contains("failed to parse config file"));
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load_or_default(missing.to_str()).is_err());
    }

    #[test]
    fn explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[list]\ndaily_limit = 2\n").unwrap();

        let config = Config::load_or_default(path.to_str()).unwrap();
        assert_eq!(config.list.daily_limit, 2);
    }

    #[test]
    fn base_dir_precedence() {
        let config = Config {
            memory: MemoryConfig {
                dir: Some("/from/config".to_owned()),
            },
            ..Config::default()
        };

        assert_eq!(
            config.base_dir_with(Some("/from/flag"), Some("/from/env".to_owned())),
            PathBuf::from("/from/flag")
        );
        assert_eq!(
            config.base_dir_with(None, Some("/from/env".to_owned())),
            PathBuf::from("/from/env")
        );
        assert_eq!(
            config.base_dir_with(None, Some(String::new())),
            PathBuf::from("/from/config")
        );
        assert_eq!(
            config.base_dir_with(None, None),
            PathBuf::from("/from/config")
        );
    }

    #[test]
    fn base_dir_falls_back_to_platform_default() {
        let config = Config::default();
        assert_eq!(
            config.base_dir_with(None, None),
            mnemo_memory::resolve_base_directory()
        );
    }

    #[test]
    fn home_is_expanded() {
        let home = Path::new("/home/ada");
        assert_eq!(
            expand_home("~/notes", Some(home)),
            PathBuf::from("/home/ada/notes")
        );
        assert_eq!(expand_home("~", Some(home)), PathBuf::from("/home/ada"));
        assert_eq!(expand_home("~/notes", None), PathBuf::from("~/notes"));
        assert_eq!(
            expand_home("/abs/notes", Some(home)),
            PathBuf::from("/abs/notes")
        );
    }
}
