//! Agent definitions — a markdown file carrying one fenced YAML block.
//!
//! ````markdown
//! # pm
//!
//! ```yaml
//! agent:
//!   name: John
//!   id: pm
//!   title: Product Manager
//!   icon: 📋
//!   whenToUse: Use for PRDs, product strategy, feature prioritization
//! persona:
//!   role: Investigative Product Strategist
//!   style: Analytical, inquisitive, data-driven
//!   identity: Product Manager specialized in document creation
//!   focus: Creating PRDs and other product documentation
//! dependencies:
//!   tasks:
//!     - create-doc.md
//!   templates:
//!     - prd-tmpl.yaml
//! ```
//! ````
//!
//! Only the first ```` ```yaml ```` block is read; the rest of the document
//! is ignored.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::parse::{
    extract_yaml_block, file_stem, lenient_text, lenient_text_list, non_empty_section, read_text,
    ParseFailure,
};

pub const DEFAULT_ICON: &str = "🤖";

/// A parsed agent persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub id: String,
    pub name: String,
    pub title: String,
    pub icon: String,
    pub description: String,
    pub when_to_use: String,
    pub role: String,
    pub style: String,
    pub identity: String,
    pub focus: String,
    /// Dependency kind (`tasks`, `templates`, ...) → referenced names.
    pub dependencies: BTreeMap<String, Vec<String>>,
}

/// Compact form used by listings.
#[derive(Debug, Clone, Serialize)]
pub struct AgentSummary {
    pub id: String,
    pub name: String,
    pub title: String,
    pub icon: String,
    pub description: String,
    pub when_to_use: String,
    pub role: String,
    pub focus: String,
}

impl From<&AgentDescriptor> for AgentSummary {
    fn from(agent: &AgentDescriptor) -> Self {
        Self {
            id: agent.id.clone(),
            name: agent.name.clone(),
            title: agent.title.clone(),
            icon: agent.icon.clone(),
            description: agent.description.clone(),
            when_to_use: agent.when_to_use.clone(),
            role: agent.role.clone(),
            focus: agent.focus.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AgentDocument {
    agent: AgentSection,
    #[serde(default)]
    persona: Option<PersonaSection>,
    #[serde(default)]
    dependencies: Option<BTreeMap<String, DependencyList>>,
}

#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct DependencyList(#[serde(deserialize_with = "lenient_text_list")] Option<Vec<String>>);

#[derive(Debug, Deserialize)]
struct AgentSection {
    #[serde(default, deserialize_with = "lenient_text")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    icon: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    description: Option<String>,
    #[serde(default, rename = "whenToUse", deserialize_with = "lenient_text")]
    when_to_use: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PersonaSection {
    #[serde(default, deserialize_with = "lenient_text")]
    role: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    style: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    identity: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    focus: Option<String>,
}

impl AgentDescriptor {
    /// Parse an agent from the text of its markdown file. `fallback_id` is
    /// used when the block has no `agent.id`.
    pub fn from_markdown(text: &str, fallback_id: &str, path: &Path) -> Result<Self, ParseFailure> {
        let block = extract_yaml_block(text).ok_or_else(|| ParseFailure::MissingBlock {
            path: path.to_path_buf(),
        })?;

        let doc: serde_yaml::Value =
            serde_yaml::from_str(block).map_err(|e| ParseFailure::yaml(path, e))?;
        if !doc.is_mapping() {
            return Err(ParseFailure::schema(path, "YAML block is not a mapping"));
        }
        if non_empty_section(&doc, "agent").is_none() {
            return Err(ParseFailure::schema(path, "missing or empty `agent` section"));
        }

        let doc: AgentDocument =
            serde_yaml::from_value(doc).map_err(|e| ParseFailure::yaml(path, e))?;
        Ok(Self::from_document(doc, fallback_id))
    }

    /// Read and parse an agent file. The file stem is the fallback id.
    pub fn from_file(path: &Path) -> Result<Self, ParseFailure> {
        let text = read_text(path)?;
        Self::from_markdown(&text, &file_stem(path), path)
    }

    fn from_document(doc: AgentDocument, fallback_id: &str) -> Self {
        let agent = doc.agent;
        let persona = doc.persona.unwrap_or_default();
        let title = agent.title.unwrap_or_default();

        let dependencies = doc
            .dependencies
            .unwrap_or_default()
            .into_iter()
            .map(|(kind, names)| (kind, names.0.unwrap_or_default()))
            .collect();

        Self {
            id: agent.id.unwrap_or_else(|| fallback_id.to_string()),
            name: agent.name.unwrap_or_default(),
            description: agent.description.unwrap_or_else(|| title.clone()),
            title,
            icon: agent.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
            when_to_use: agent.when_to_use.unwrap_or_default(),
            role: persona.role.unwrap_or_default(),
            style: persona.style.unwrap_or_default(),
            identity: persona.identity.unwrap_or_default(),
            focus: persona.focus.unwrap_or_default(),
            dependencies,
        }
    }

    /// Names listed under a dependency kind, or nothing.
    pub fn dependency_names(&self, kind: &str) -> &[String] {
        self.dependencies
            .get(kind)
            .map(|names| names.as_slice())
            .unwrap_or(&[])
    }
}
