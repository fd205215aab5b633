//! Shared parsing helpers: failure type, fenced-block extraction and
//! directory listing.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

/// Why a single catalog file could not be turned into an entity.
///
/// `Io` is unexpected (permissions, vanished file); the other variants mean
/// the file simply does not match the expected schema.
#[derive(Debug, thiserror::Error)]
pub enum ParseFailure {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no ```yaml block found in {}", path.display())]
    MissingBlock { path: PathBuf },

    #[error("invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unexpected shape in {}: {reason}", path.display())]
    Schema { path: PathBuf, reason: String },
}

impl ParseFailure {
    pub fn schema(path: &Path, reason: impl Into<String>) -> Self {
        ParseFailure::Schema {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn yaml(path: &Path, source: serde_yaml::Error) -> Self {
        ParseFailure::Yaml {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Log at a level matching how surprising the failure is.
    pub fn log(&self) {
        match self {
            ParseFailure::Io { .. } => tracing::warn!("Skipping catalog file: {}", self),
            _ => tracing::debug!("Skipping catalog file: {}", self),
        }
    }
}

pub(crate) fn read_text(path: &Path) -> Result<String, ParseFailure> {
    std::fs::read_to_string(path).map_err(|source| ParseFailure::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn yaml_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```yaml\r?\n(.*?)\r?\n```").expect("valid yaml block regex"))
}

/// Body of the first ```` ```yaml ```` fenced block in `text`.
pub fn extract_yaml_block(text: &str) -> Option<&str> {
    yaml_block_re()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// `section` of a YAML document as a non-empty mapping.
pub(crate) fn non_empty_section<'a>(
    doc: &'a serde_yaml::Value,
    section: &str,
) -> Option<&'a serde_yaml::Mapping> {
    doc.as_mapping()?
        .get(section)?
        .as_mapping()
        .filter(|m| !m.is_empty())
}

/// A YAML value as display text. `null` counts as absent; numbers and
/// booleans are rendered the way they were written.
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Tagged(tagged) => scalar_text(tagged.value),
        other => serde_yaml::to_string(&other)
            .ok()
            .map(|s| s.trim_end().to_string()),
    }
}

/// `deserialize_with` for optional text fields that may hold any scalar
/// (`name: 2024`).
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

/// `deserialize_with` for optional lists of names. A lone scalar is a
/// one-element list; null entries are dropped.
pub(crate) fn lenient_text_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::Sequence(items) => Some(items.into_iter().filter_map(scalar_text).collect()),
        single => scalar_text(single).map(|s| vec![s]),
    })
}

/// Files directly inside `dir` with the given extension, sorted by path.
/// A missing or unreadable directory yields an empty list.
pub fn list_files(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(extension))
        .collect();
    files.sort();
    files
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Strip a trailing file extension from a dependency reference
/// (`create-doc.md` → `create-doc`).
pub fn dependency_stem(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty() && matches!(ext, "md" | "yaml" | "yml" | "txt") =>
        {
            stem
        }
        _ => name,
    }
}
