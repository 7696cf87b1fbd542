//! Configuration for promptcraft.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (PROMPTCRAFT_HOME, PROMPTCRAFT_STORE)
//! 2. Config file (.promptcraft/config.yaml)
//! 3. Defaults (~/.promptcraft)
//!
//! Config file discovery:
//! - Searches current directory and parents for .promptcraft/config.yaml
//! - Paths in the config file are relative to the `.promptcraft/` directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::{EditorLimits, PublishRules};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const CONFIG_DIR: &str = ".promptcraft";
const DEFAULT_STORE_FILE: &str = "drafts.json";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub limits: Option<EditorLimits>,
    #[serde(default)]
    pub publish: Option<PublishRules>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to .promptcraft/)
    pub home: Option<String>,
    /// Draft catalog file (relative to home)
    pub store: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// State directory
    pub home: PathBuf,
    /// Draft catalog file
    pub store: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Editor caps and field limits
    pub limits: EditorLimits,
    /// Publish gate thresholds
    pub publish: PublishRules,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(CONFIG_DIR).join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to `base`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Merge a parsed config file (if any) with the environment
fn resolve(
    config_file: Option<(PathBuf, ConfigFile)>,
    default_home: PathBuf,
    env_home: Option<String>,
    env_store: Option<String>,
) -> ResolvedConfig {
    let (config_path, file) = match config_file {
        Some((path, file)) => (Some(path), Some(file)),
        None => (None, None),
    };

    let home = if let Some(env_home) = env_home {
        PathBuf::from(env_home)
    } else if let (Some(path), Some(home)) = (
        config_path.as_ref(),
        file.as_ref().and_then(|f| f.paths.home.as_ref()),
    ) {
        let config_dir = path.parent().unwrap_or(Path::new("."));
        resolve_path(config_dir, home)
    } else {
        default_home
    };

    let store = if let Some(env_store) = env_store {
        PathBuf::from(env_store)
    } else if let Some(store) = file.as_ref().and_then(|f| f.paths.store.as_ref()) {
        resolve_path(&home, store)
    } else {
        home.join(DEFAULT_STORE_FILE)
    };

    let limits = file
        .as_ref()
        .and_then(|f| f.limits.clone())
        .unwrap_or_default();
    let publish = file
        .as_ref()
        .and_then(|f| f.publish.clone())
        .unwrap_or_default();

    ResolvedConfig {
        home,
        store,
        config_file: config_path,
        limits,
        publish,
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(CONFIG_DIR);

    let config_file = match find_config_file() {
        Some(path) => {
            let file = load_config_file(&path)?;
            Some((path, file))
        }
        None => None,
    };

    Ok(resolve(
        config_file,
        default_home,
        std::env::var("PROMPTCRAFT_HOME").ok(),
        std::env::var("PROMPTCRAFT_STORE").ok(),
    ))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

/// Get the promptcraft state directory
pub fn promptcraft_home() -> Result<PathBuf> {
    Ok(config()?.home.clone())
}

/// Get the draft catalog path
pub fn store_path() -> Result<PathBuf> {
    Ok(config()?.store.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = resolve(None, PathBuf::from("/home/u/.promptcraft"), None, None);

        assert_eq!(config.home, PathBuf::from("/home/u/.promptcraft"));
        assert_eq!(config.store, PathBuf::from("/home/u/.promptcraft/drafts.json"));
        assert!(config.config_file.is_none());
        assert_eq!(config.limits, EditorLimits::default());
        assert_eq!(config.publish, PublishRules::default());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_dir = temp.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();

        let config_path = config_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1"
paths:
  home: ./state
  store: prompts.json
limits:
  max_categories: 6
publish:
  min_images: 5
"#
        )
        .unwrap();

        let parsed = load_config_file(&config_path).unwrap();
        assert_eq!(parsed.version, "1");
        assert_eq!(parsed.paths.home, Some("./state".to_string()));

        let config = resolve(
            Some((config_path, parsed)),
            PathBuf::from("/unused"),
            None,
            None,
        );
        assert_eq!(config.home, config_dir.join("./state"));
        assert_eq!(config.store, config_dir.join("./state").join("prompts.json"));
        assert_eq!(config.limits.max_categories, 6);
        assert_eq!(config.limits.max_tags_per_category, 15);
        assert_eq!(config.publish.min_images, 5);
        assert_eq!(config.publish.min_categories, 3);
    }

    #[test]
    fn test_env_overrides_file() {
        let parsed: ConfigFile = serde_yaml::from_str(
            r#"
version: "1"
paths:
  home: /from/file
"#,
        )
        .unwrap();

        let config = resolve(
            Some((PathBuf::from("/p/.promptcraft/config.yaml"), parsed)),
            PathBuf::from("/unused"),
            Some("/from/env".to_string()),
            Some("/elsewhere/drafts.json".to_string()),
        );
        assert_eq!(config.home, PathBuf::from("/from/env"));
        assert_eq!(config.store, PathBuf::from("/elsewhere/drafts.json"));
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/./subdir")
        );
    }
}
