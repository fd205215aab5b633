//! Runtime settings and the optional `core-config.yaml`.
//!
//! ```text
//! .bmad-core/
//!   core-config.yaml      optional, free-form mapping
//!   agents/*.md           agent definitions (fenced ```yaml block)
//!   workflows/*.yaml      workflow definitions
//!   tasks/*.md            task placeholders (lazy)
//!   templates/*.md        template bodies (lazy)
//! ```

use std::path::{Path, PathBuf};

use crate::dispatch::DispatchMode;

pub const DEFAULT_ROOT: &str = ".bmad-core";
pub const CONFIG_FILE: &str = "core-config.yaml";

pub const ROOT_ENV: &str = "BMAD_CORE_PATH";
pub const MODE_ENV: &str = "BMAD_LLM_MODE";

/// Where the catalog lives and how `agents.call` dispatches.
#[derive(Debug, Clone)]
pub struct Settings {
    pub root: PathBuf,
    pub mode: DispatchMode,
}

impl Settings {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mode: DispatchMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Build settings from `BMAD_CORE_PATH` / `BMAD_LLM_MODE`.
    ///
    /// An unrecognised mode falls back to the default with a warning.
    pub fn from_env() -> Self {
        let root = std::env::var(ROOT_ENV).unwrap_or_else(|_| DEFAULT_ROOT.to_string());
        let mode = match std::env::var(MODE_ENV) {
            Ok(raw) => DispatchMode::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("Ignoring unknown {}='{}'", MODE_ENV, raw);
                DispatchMode::default()
            }),
            Err(_) => DispatchMode::default(),
        };
        Self::new(root).with_mode(mode)
    }

    pub fn paths(&self) -> CatalogPaths {
        CatalogPaths::new(&self.root)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

/// Fixed directory layout under the catalog root.
#[derive(Debug, Clone)]
pub struct CatalogPaths {
    pub root: PathBuf,
}

impl CatalogPaths {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn agents_dir(&self) -> PathBuf {
        self.root.join("agents")
    }

    pub fn workflows_dir(&self) -> PathBuf {
        self.root.join("workflows")
    }

    pub fn tasks_dir(&self) -> PathBuf {
        self.root.join("tasks")
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join("templates")
    }

    pub fn agent_file(&self, id: &str) -> PathBuf {
        self.agents_dir().join(format!("{}.md", id))
    }

    pub fn workflow_file(&self, id: &str) -> PathBuf {
        self.workflows_dir().join(format!("{}.yaml", id))
    }
}

/// Contents of `core-config.yaml`. The service only reports whether it was
/// loaded; the mapping is kept for callers that want to inspect it.
#[derive(Debug, Clone, Default)]
pub struct CoreConfig {
    pub values: serde_yaml::Mapping,
}

impl CoreConfig {
    /// Load the config file. A missing, unreadable or non-mapping file yields
    /// an empty config.
    pub fn load(path: &Path) -> Self {
        if !path.is_file() {
            return Self::default();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_yaml::from_str::<serde_yaml::Value>(&content) {
            Ok(serde_yaml::Value::Mapping(values)) => Self { values },
            Ok(serde_yaml::Value::Null) => Self::default(),
            Ok(_) => {
                tracing::warn!("{} is not a mapping, ignoring it", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        !self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_config_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig::load(&dir.path().join(CONFIG_FILE));
        assert!(!config.is_loaded());
    }

    #[test]
    fn test_load_config_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "devLoadAlwaysFiles:\n  - docs/architecture.md\nslashPrefix: BMad\n")
            .unwrap();

        let config = CoreConfig::load(&path);
        assert!(config.is_loaded());
        assert_eq!(
            config.values.get("slashPrefix").and_then(|v| v.as_str()),
            Some("BMad")
        );
    }

    #[test]
    fn test_malformed_config_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "key: [unterminated").unwrap();
        assert!(!CoreConfig::load(&path).is_loaded());
    }

    #[test]
    fn test_catalog_paths_layout() {
        let paths = CatalogPaths::new("/srv/.bmad-core");
        assert_eq!(paths.agent_file("pm"), PathBuf::from("/srv/.bmad-core/agents/pm.md"));
        assert_eq!(
            paths.workflow_file("greenfield"),
            PathBuf::from("/srv/.bmad-core/workflows/greenfield.yaml")
        );
    }
}
