//! Configuration for postflow.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (POSTFLOW_HOME)
//! 2. Config file (.postflow/config.yaml)
//! 3. Defaults (~/.postflow)
//!
//! Config file discovery:
//! - Searches current directory and parents for .postflow/config.yaml
//! - Paths in config file are relative to the config file's parent directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::ProcessorConfig;
use crate::ingest::upload::DEFAULT_MAX_SIZE_BYTES;
use crate::ingest::UploadPolicy;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub processing: Option<ProcessingConfig>,
    #[serde(default)]
    pub uploads: Option<UploadsConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Pipeline state directory (relative to config file)
    pub home: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessingConfig {
    pub start_delay_ms: Option<u64>,
    pub enrich_latency_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    pub max_size_bytes: Option<u64>,
    pub media_base_url: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to postflow home (pipeline state)
    pub home: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Processing settings
    pub processing: ProcessingSettings,
    /// Upload intake settings
    pub uploads: UploadSettings,
}

#[derive(Debug, Clone)]
pub struct ProcessingSettings {
    /// Pause before an item is marked processing
    pub start_delay_ms: u64,
    /// Simulated enrichment latency
    pub enrich_latency_ms: u64,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            start_delay_ms: 0,
            enrich_latency_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub max_size_bytes: u64,
    pub media_base_url: String,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            media_base_url: "https://example.com".to_string(),
        }
    }
}

impl ResolvedConfig {
    /// Path to the content journal ($POSTFLOW_HOME/content.jsonl)
    pub fn journal_path(&self) -> PathBuf {
        self.home.join("content.jsonl")
    }

    /// Lifecycle manager configuration derived from the processing settings
    pub fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig {
            start_delay: Duration::from_millis(self.processing.start_delay_ms),
        }
    }

    /// Simulated enrichment latency as a Duration
    pub fn enrich_latency(&self) -> Duration {
        Duration::from_millis(self.processing.enrich_latency_ms)
    }

    /// Upload policy derived from the upload settings
    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_size_bytes: self.uploads.max_size_bytes,
            media_base_url: self.uploads.media_base_url.clone(),
            ..Default::default()
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".postflow").join("config.yaml");
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

/// Resolve a path that may be relative to the config file's parent
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

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    // Default home directory
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".postflow");

    // Check for config file
    let config_file = find_config_file();

    let (home, processing, uploads) = if let Some(ref config_path) = config_file {
        // Config file found - use it as base
        let config = load_config_file(config_path)?;

        // Resolve home path
        let home = if let Ok(env_home) = std::env::var("POSTFLOW_HOME") {
            PathBuf::from(env_home)
        } else if let Some(ref home_path) = config.paths.home {
            // home is relative to .postflow/ directory
            let postflow_dir = config_path.parent().unwrap_or(Path::new("."));
            resolve_path(postflow_dir, home_path)
        } else {
            default_home.clone()
        };

        // Processing settings
        let processing = ProcessingSettings {
            start_delay_ms: config
                .processing
                .as_ref()
                .and_then(|p| p.start_delay_ms)
                .unwrap_or(0),
            enrich_latency_ms: config
                .processing
                .as_ref()
                .and_then(|p| p.enrich_latency_ms)
                .unwrap_or(5_000),
        };

        // Upload settings
        let uploads = UploadSettings {
            max_size_bytes: config
                .uploads
                .as_ref()
                .and_then(|u| u.max_size_bytes)
                .unwrap_or(DEFAULT_MAX_SIZE_BYTES),
            media_base_url: config
                .uploads
                .as_ref()
                .and_then(|u| u.media_base_url.clone())
                .unwrap_or_else(|| "https://example.com".to_string()),
        };

        (home, processing, uploads)
    } else {
        // No config file - use env vars or defaults
        let home = std::env::var("POSTFLOW_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_home.clone());

        (home, ProcessingSettings::default(), UploadSettings::default())
    };

    Ok(ResolvedConfig {
        home,
        config_file,
        processing,
        uploads,
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| {
        load_config().map_err(|e| e.to_string())
    });

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

// ============================================================================
// Convenience functions
// ============================================================================

/// Get the postflow home directory (pipeline state).
pub fn postflow_home() -> Result<PathBuf> {
    Ok(config()?.home.clone())
}

/// Get the content journal path ($POSTFLOW_HOME/content.jsonl)
pub fn journal_path() -> Result<PathBuf> {
    Ok(config()?.journal_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_without_file() {
        // Without a config file or env vars, should use defaults
        let config = load_config().unwrap();

        // Should fall back to ~/.postflow
        let expected_home = dirs::home_dir().unwrap().join(".postflow");
        assert_eq!(config.home, expected_home);
        assert_eq!(config.journal_path(), expected_home.join("content.jsonl"));
        assert!(config.config_file.is_none());
        assert_eq!(config.processing.start_delay_ms, 0);
        assert_eq!(config.processing.enrich_latency_ms, 5_000);
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let postflow_dir = temp.path().join(".postflow");
        std::fs::create_dir_all(&postflow_dir).unwrap();

        let config_path = postflow_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
paths:
  home: ./
processing:
  start_delay_ms: 1000
  enrich_latency_ms: 250
uploads:
  max_size_bytes: 1048576
  media_base_url: https://cdn.test
"#
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.paths.home, Some("./".to_string()));

        let processing = config.processing.unwrap();
        assert_eq!(processing.start_delay_ms, Some(1000));
        assert_eq!(processing.enrich_latency_ms, Some(250));

        let uploads = config.uploads.unwrap();
        assert_eq!(uploads.max_size_bytes, Some(1_048_576));
        assert_eq!(uploads.media_base_url, Some("https://cdn.test".to_string()));
    }

    #[test]
    fn test_derived_settings() {
        let config = ResolvedConfig {
            home: PathBuf::from("/test/.postflow"),
            config_file: None,
            processing: ProcessingSettings {
                start_delay_ms: 1000,
                enrich_latency_ms: 250,
            },
            uploads: UploadSettings {
                max_size_bytes: 1024,
                media_base_url: "https://cdn.test".to_string(),
            },
        };

        assert_eq!(
            config.processor_config().start_delay,
            Duration::from_millis(1000)
        );
        assert_eq!(config.enrich_latency(), Duration::from_millis(250));

        let policy = config.upload_policy();
        assert_eq!(policy.max_size_bytes, 1024);
        assert_eq!(policy.media_base_url, "https://cdn.test");
        // Allowed media types are not configurable; defaults apply
        assert!(policy.allowed_media_types.contains(&"image/jpeg".to_string()));
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
        assert_eq!(
            resolve_path(&base, "../sibling"),
            PathBuf::from("/home/user/project/../sibling")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }
}
