use markdown_regions_engine::editing::IndentConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// `[indent]` table of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndentSettings {
    /// Text of one indentation level, e.g. `"    "` or `"\t"`.
    pub unit: String,
    /// Visual width of a tab character.
    pub tab_size: usize,
}

impl Default for IndentSettings {
    fn default() -> Self {
        let engine = IndentConfig::default();
        Self {
            unit: engine.indent_unit,
            tab_size: engine.tab_size,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub indent: IndentSettings,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        let config_path = Self::expand_path(config_path).unwrap_or_else(|| config_path.to_path_buf());
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.clone(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.clone(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/markdown-regions");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Indentation settings in the form the engine's `EditorState` takes.
    pub fn indent_config(&self) -> IndentConfig {
        IndentConfig {
            indent_unit: self.indent.unit.clone(),
            tab_size: self.indent.tab_size,
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/markdown-regions/config.toml"));
    }

    #[test]
    fn test_defaults_match_engine() {
        assert_eq!(Config::default().indent_config(), IndentConfig::default());
    }

    #[test]
    fn test_parse_tab_unit() {
        let config: Config = toml::from_str(
            r#"
[indent]
unit = "\t"
tab_size = 8
"#,
        )
        .unwrap();

        assert_eq!(config.indent_config(), IndentConfig::tabs(8));
        assert_eq!(config.indent_config().unit_width(), 8);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = toml::from_str("[indent]\nunit = \"  \"\n").unwrap();
        assert_eq!(config.indent.unit, "  ");
        assert_eq!(config.indent.tab_size, 4);

        let empty: Config = toml::from_str("").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[indent]\ntab_size = \"wide\"\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/config.toml");
        let test_config = Config {
            indent: IndentSettings {
                unit: "  ".to_string(),
                tab_size: 2,
            },
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
        assert_eq!(loaded_config.indent_config(), IndentConfig::spaces(2));
    }

    #[test]
    fn test_load_expands_env_var_in_path() {
        let temp_dir = TempDir::new().unwrap();
        Config::default()
            .save_to_path(temp_dir.path().join("config.toml"))
            .unwrap();

        unsafe {
            env::set_var("MARKDOWN_REGIONS_TEST_DIR", temp_dir.path());
        }

        let loaded = Config::load_from_path("$MARKDOWN_REGIONS_TEST_DIR/config.toml").unwrap();
        assert_eq!(loaded, Some(Config::default()));

        unsafe {
            env::remove_var("MARKDOWN_REGIONS_TEST_DIR");
        }
    }
}
