//! Workflow definitions — a YAML file with a `workflow` section.
//!
//! ```yaml
//! workflow:
//!   id: greenfield-fullstack
//!   name: Greenfield Full-Stack Application Development
//!   description: Agent workflow for building full-stack applications
//!   type: greenfield
//!   project_types:
//!     - web-app
//!     - saas
//!   sequence:
//!     - agent: analyst
//!       creates: project-brief.md
//!     - agent: pm
//!       creates: prd.md
//!       requires: project-brief.md
//! ```
//!
//! Sequence entries are opaque: they are indexed and counted, never
//! interpreted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::parse::{
    file_stem, lenient_text, lenient_text_list, non_empty_section, read_text, ParseFailure,
};

/// A parsed workflow definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub workflow_type: String,
    pub project_types: Vec<String>,
    pub sequence: Vec<serde_json::Value>,
}

/// Compact form used by listings.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSummary {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub workflow_type: String,
    pub project_types: Vec<String>,
}

impl From<&WorkflowDescriptor> for WorkflowSummary {
    fn from(workflow: &WorkflowDescriptor) -> Self {
        Self {
            name: workflow.name.clone(),
            description: workflow.description.clone(),
            workflow_type: workflow.workflow_type.clone(),
            project_types: workflow.project_types.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WorkflowDocument {
    workflow: WorkflowSection,
}

#[derive(Debug, Deserialize)]
struct WorkflowSection {
    #[serde(default, deserialize_with = "lenient_text")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    description: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_text")]
    workflow_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text_list")]
    project_types: Option<Vec<String>>,
    sequence: Option<Vec<serde_json::Value>>,
}

impl WorkflowDescriptor {
    /// Parse a workflow from YAML text. `fallback_id` is used when the file
    /// has no `workflow.id`.
    pub fn from_yaml(yaml: &str, fallback_id: &str, path: &Path) -> Result<Self, ParseFailure> {
        let doc: serde_yaml::Value =
            serde_yaml::from_str(yaml).map_err(|e| ParseFailure::yaml(path, e))?;
        if !doc.is_mapping() {
            return Err(ParseFailure::schema(path, "document is not a mapping"));
        }
        if non_empty_section(&doc, "workflow").is_none() {
            return Err(ParseFailure::schema(path, "missing or empty `workflow` section"));
        }

        let doc: WorkflowDocument =
            serde_yaml::from_value(doc).map_err(|e| ParseFailure::yaml(path, e))?;
        let section = doc.workflow;

        Ok(Self {
            id: section.id.unwrap_or_else(|| fallback_id.to_string()),
            name: section.name.unwrap_or_default(),
            description: section.description.unwrap_or_default(),
            workflow_type: section.workflow_type.unwrap_or_default(),
            project_types: section.project_types.unwrap_or_default(),
            sequence: section.sequence.unwrap_or_default(),
        })
    }

    /// Read and parse a workflow file. The file stem is the fallback id.
    pub fn from_file(path: &Path) -> Result<Self, ParseFailure> {
        let text = read_text(path)?;
        Self::from_yaml(&text, &file_stem(path), path)
    }

    pub fn total_steps(&self) -> usize {
        self.sequence.len()
    }

    pub fn step(&self, index: usize) -> Option<&serde_json::Value> {
        self.sequence.get(index)
    }

    /// Whether `project_type` may be used with this workflow. An empty
    /// `project_types` list accepts anything.
    pub fn supports(&self, project_type: &str) -> bool {
        self.project_types.is_empty() || self.project_types.iter().any(|t| t == project_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Result<WorkflowDescriptor, ParseFailure> {
        WorkflowDescriptor::from_yaml(yaml, "fallback", Path::new("workflows/fallback.yaml"))
    }

    #[test]
    fn test_parse_workflow() {
        let wf = parse(
            r#"
workflow:
  id: greenfield-fullstack
  name: Greenfield
  description: Build from scratch
  type: greenfield
  project_types: [web-app, saas]
  sequence:
    - agent: analyst
      creates: project-brief.md
    - agent: pm
      creates: prd.md
      requires: project-brief.md
"#,
        )
        .unwrap();

        assert_eq!(wf.id, "greenfield-fullstack");
        assert_eq!(wf.workflow_type, "greenfield");
        assert_eq!(wf.total_steps(), 2);
        assert_eq!(wf.step(1).unwrap()["agent"], "pm");
        assert!(wf.step(2).is_none());
        assert!(wf.supports("saas"));
        assert!(!wf.supports("cli"));
    }

    #[test]
    fn test_defaults() {
        let wf = parse("workflow:\n  name: Bare\n").unwrap();
        assert_eq!(wf.id, "fallback");
        assert!(wf.project_types.is_empty());
        assert!(wf.sequence.is_empty());
        assert!(wf.supports("anything"));
    }

    #[test]
    fn test_missing_workflow_section() {
        assert!(matches!(
            parse("name: not a workflow\n"),
            Err(ParseFailure::Schema { .. })
        ));
        assert!(matches!(parse("workflow:\n"), Err(ParseFailure::Schema { .. })));
    }

    #[test]
    fn test_scalar_document() {
        assert!(matches!(parse("just text"), Err(ParseFailure::Schema { .. })));
    }

    #[test]
    fn test_numeric_fields_are_kept_as_text() {
        let wf = parse(
            "workflow:\n  id: 2024\n  name: 1.5\n  project_types: [2024, saas]\n  sequence: [A]\n",
        )
        .unwrap();
        assert_eq!(wf.id, "2024");
        assert_eq!(wf.name, "1.5");
        assert!(wf.supports("2024"));
        assert_eq!(wf.total_steps(), 1);
    }
}
