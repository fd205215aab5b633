//! Task and template entries. Both are plain files; tasks are reduced to a
//! placeholder record, templates keep their full text.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::parse::{file_stem, read_text, ParseFailure};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub name: String,
    pub description: String,
    pub agent: Option<String>,
    pub dependencies: Vec<String>,
    pub outputs: Vec<String>,
}

impl TaskDescriptor {
    /// Placeholder record for `tasks/<name>.md`. The file body is not read.
    pub fn placeholder(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            description: format!("Task: {}", name),
            name,
            agent: None,
            dependencies: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        Self::placeholder(file_stem(path))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub name: String,
    pub content: String,
}

impl TemplateDescriptor {
    pub fn from_file(path: &Path) -> Result<Self, ParseFailure> {
        Ok(Self {
            name: file_stem(path),
            content: read_text(path)?,
        })
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_placeholder() {
        let task = TaskDescriptor::from_path(Path::new("/x/tasks/create-doc.md"));
        assert_eq!(task.name, "create-doc");
        assert_eq!(task.description, "Task: create-doc");
        assert!(task.agent.is_none());
        assert!(task.dependencies.is_empty());
        assert!(task.outputs.is_empty());
    }

    #[test]
    fn test_template_keeps_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prd-tmpl.md");
        std::fs::write(&path, "# PRD\n\n{{goals}}\n").unwrap();

        let template = TemplateDescriptor::from_file(&path).unwrap();
        assert_eq!(template.name, "prd-tmpl");
        assert_eq!(template.content, "# PRD\n\n{{goals}}\n");
        assert_eq!(template.len(), 17);
    }
}
