//! Structural checks for catalog files and a whole-tree scan.
//!
//! Unlike discovery, which silently skips anything it cannot parse, these
//! checks collect every problem they find so they can be shown to an author.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_yaml::Value;

use super::parse::{extract_yaml_block, list_files};
use crate::config::CatalogPaths;

const AGENT_REQUIRED: &[(&str, &[&str])] = &[("agent", &["id", "name", "title"]), ("persona", &["role"])];
const WORKFLOW_REQUIRED: &[&str] = &["id", "name", "description"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    fn finish(mut self) -> Self {
        self.valid = self.errors.is_empty();
        self
    }

    fn failed(message: impl Into<String>) -> Self {
        let mut report = Self::default();
        report.error(message);
        report
    }
}

fn read(path: &Path) -> Result<String, ValidationReport> {
    std::fs::read_to_string(path)
        .map_err(|e| ValidationReport::failed(format!("failed to read file: {}", e)))
}

fn decode(yaml: &str) -> Result<Value, ValidationReport> {
    serde_yaml::from_str(yaml)
        .map_err(|e| ValidationReport::failed(format!("YAML parse error: {}", e)))
}

/// Check an agent markdown file for its YAML block and required fields.
pub fn validate_agent_file(path: &Path) -> ValidationReport {
    let text = match read(path) {
        Ok(text) => text,
        Err(report) => return report,
    };
    let Some(block) = extract_yaml_block(&text) else {
        return ValidationReport::failed("no ```yaml block found");
    };
    let doc = match decode(block) {
        Ok(doc) => doc,
        Err(report) => return report,
    };
    let Some(doc) = doc.as_mapping() else {
        return ValidationReport::failed("YAML block is not a mapping");
    };

    let mut report = ValidationReport::default();
    for (section, fields) in AGENT_REQUIRED {
        let Some(value) = doc.get(*section) else {
            report.error(format!("missing `{}` section", section));
            continue;
        };
        let Some(mapping) = value.as_mapping() else {
            report.error(format!("`{}` section is not a mapping", section));
            continue;
        };
        for field in *fields {
            if !mapping.contains_key(*field) {
                report.error(format!("missing `{}.{}` field", section, field));
            }
        }
    }
    report.finish()
}

/// Check a workflow YAML file for its `workflow` section, required fields
/// and sequence shape.
pub fn validate_workflow_file(path: &Path) -> ValidationReport {
    let text = match read(path) {
        Ok(text) => text,
        Err(report) => return report,
    };
    let doc = match decode(&text) {
        Ok(doc) => doc,
        Err(report) => return report,
    };
    let Some(doc) = doc.as_mapping() else {
        return ValidationReport::failed("document is not a mapping");
    };
    let Some(workflow) = doc.get("workflow") else {
        return ValidationReport::failed("missing `workflow` section");
    };
    let Some(workflow) = workflow.as_mapping() else {
        return ValidationReport::failed("`workflow` section is not a mapping");
    };

    let mut report = ValidationReport::default();
    for field in WORKFLOW_REQUIRED {
        if !workflow.contains_key(*field) {
            report.error(format!("missing `workflow.{}` field", field));
        }
    }
    match workflow.get("sequence") {
        None => report.warning("missing `workflow.sequence` field"),
        Some(Value::Sequence(steps)) if steps.is_empty() => {
            report.warning("workflow sequence is empty")
        }
        Some(Value::Sequence(_)) => {}
        Some(_) => report.error("`workflow.sequence` must be a list"),
    }
    report.finish()
}

#[derive(Debug, Clone, Serialize)]
pub struct InvalidFile {
    pub file: String,
    pub errors: Vec<String>,
}

/// Files of one validated collection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidatedCollection {
    pub count: usize,
    pub files: Vec<String>,
    pub valid: Vec<String>,
    pub invalid: Vec<InvalidFile>,
}

/// Files of a collection that is only listed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListedCollection {
    pub count: usize,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub path: PathBuf,
    pub exists: bool,
    pub agents: ValidatedCollection,
    pub workflows: ValidatedCollection,
    pub tasks: ListedCollection,
    pub templates: ListedCollection,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn validate_collection(
    files: Vec<PathBuf>,
    check: fn(&Path) -> ValidationReport,
) -> ValidatedCollection {
    let mut collection = ValidatedCollection {
        count: files.len(),
        files: files.iter().map(|p| file_name(p)).collect(),
        ..Default::default()
    };
    for path in &files {
        let report = check(path);
        if report.valid {
            collection.valid.push(file_name(path));
        } else {
            collection.invalid.push(InvalidFile {
                file: file_name(path),
                errors: report.errors,
            });
        }
    }
    collection
}

fn list_collection(files: Vec<PathBuf>) -> ListedCollection {
    ListedCollection {
        count: files.len(),
        files: files.iter().map(|p| file_name(p)).collect(),
    }
}

/// Validate every agent and workflow under `root` and list tasks and
/// templates by name.
pub fn scan(root: &Path) -> ScanReport {
    let paths = CatalogPaths::new(root);
    let exists = root.is_dir();

    let report = ScanReport {
        path: root.to_path_buf(),
        exists,
        agents: validate_collection(list_files(&paths.agents_dir(), "md"), validate_agent_file),
        workflows: validate_collection(
            list_files(&paths.workflows_dir(), "yaml"),
            validate_workflow_file,
        ),
        tasks: list_collection(list_files(&paths.tasks_dir(), "md")),
        templates: list_collection(list_files(&paths.templates_dir(), "md")),
    };
    tracing::debug!(
        "Scanned {}: {} agents ({} invalid), {} workflows ({} invalid)",
        root.display(),
        report.agents.count,
        report.agents.invalid.len(),
        report.workflows.count,
        report.workflows.invalid.len()
    );
    report
}

impl ScanReport {
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# BMAD Core Scan Report\n\n");
        out.push_str(&format!("Path: {}\n", self.path.display()));
        out.push_str(&format!("Exists: {}\n\n", if self.exists { "✅" } else { "❌" }));

        if !self.exists {
            out.push_str("❌ catalog directory does not exist\n");
            return out;
        }

        write_validated(&mut out, "🤖 Agents", "agent", &self.agents);
        write_validated(&mut out, "🔄 Workflows", "workflow", &self.workflows);
        out.push_str(&format!("## 📋 Tasks ({})\n", self.tasks.count));
        out.push_str(&format!("## 📄 Templates ({})\n", self.templates.count));
        out
    }
}

fn write_validated(out: &mut String, heading: &str, kind: &str, collection: &ValidatedCollection) {
    out.push_str(&format!("## {} ({})\n", heading, collection.count));
    out.push_str(&format!("- Valid: {}\n", collection.valid.len()));
    out.push_str(&format!("- Invalid: {}\n", collection.invalid.len()));
    if !collection.invalid.is_empty() {
        out.push_str(&format!("\n### Invalid {} files\n", kind));
        for invalid in &collection.invalid {
            out.push_str(&format!("- {}\n", invalid.file));
            for error in &invalid.errors {
                out.push_str(&format!("  - ❌ {}\n", error));
            }
        }
    }
    out.push('\n');
}
