//! Agent, workflow, task and template catalog backed by a directory tree.
//!
//! Agents and workflows are rediscovered on demand through an mtime cache,
//! so edits on disk show up on the next pass. Tasks and templates are read
//! once, on first access, and then kept for the life of the catalog.

mod agent;
mod parse;
mod task;
pub mod validation;
mod workflow;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::cache::EntityCache;
use crate::config::CatalogPaths;

pub use agent::{AgentDescriptor, AgentSummary, DEFAULT_ICON};
pub use parse::{dependency_stem, extract_yaml_block, list_files, ParseFailure};
pub use task::{TaskDescriptor, TemplateDescriptor};
pub use workflow::{WorkflowDescriptor, WorkflowSummary};

/// One-shot population state of a lazily loaded collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    NotLoaded,
    Loaded,
}

impl LoadState {
    pub fn is_loaded(self) -> bool {
        self == LoadState::Loaded
    }
}

/// A discovered entity and the file it came from.
struct Entry<T> {
    path: PathBuf,
    value: Arc<T>,
}

pub struct Catalog {
    paths: CatalogPaths,
    agents: BTreeMap<String, Entry<AgentDescriptor>>,
    workflows: BTreeMap<String, Entry<WorkflowDescriptor>>,
    agent_cache: EntityCache<AgentDescriptor>,
    workflow_cache: EntityCache<WorkflowDescriptor>,
    tasks: BTreeMap<String, TaskDescriptor>,
    tasks_state: LoadState,
    templates: BTreeMap<String, TemplateDescriptor>,
    templates_state: LoadState,
}

impl Catalog {
    /// An empty catalog rooted at `paths`. Nothing is read until a
    /// `discover_*` call or a task/template accessor.
    pub fn new(paths: CatalogPaths) -> Self {
        Self {
            paths,
            agents: BTreeMap::new(),
            workflows: BTreeMap::new(),
            agent_cache: EntityCache::new(),
            workflow_cache: EntityCache::new(),
            tasks: BTreeMap::new(),
            tasks_state: LoadState::NotLoaded,
            templates: BTreeMap::new(),
            templates_state: LoadState::NotLoaded,
        }
    }

    pub fn paths(&self) -> &CatalogPaths {
        &self.paths
    }

    pub fn root(&self) -> &Path {
        &self.paths.root
    }

    // ── Agents ──────────────────────────────────────────────────────────

    /// Rebuild the agent map from `agents/*.md`. Returns the agent count.
    pub fn discover_agents(&mut self) -> usize {
        let dir = self.paths.agents_dir();
        let cache = &mut self.agent_cache;
        self.agents = discover(
            &dir,
            "md",
            "agent",
            |path| cache.get_or_parse(path, AgentDescriptor::from_file),
            |agent| agent.id.clone(),
        );
        self.agents.len()
    }

    pub fn agent(&self, id: &str) -> Option<Arc<AgentDescriptor>> {
        self.agents.get(id).map(|entry| entry.value.clone())
    }

    /// File the agent `id` was read from in the last discovery pass.
    pub fn agent_path(&self, id: &str) -> Option<&Path> {
        self.agents.get(id).map(|entry| entry.path.as_path())
    }

    pub fn agents(&self) -> impl Iterator<Item = &Arc<AgentDescriptor>> {
        self.agents.values().map(|entry| &entry.value)
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    // ── Workflows ───────────────────────────────────────────────────────

    /// Rebuild the workflow map from `workflows/*.yaml`. Returns the count.
    pub fn discover_workflows(&mut self) -> usize {
        let dir = self.paths.workflows_dir();
        let cache = &mut self.workflow_cache;
        self.workflows = discover(
            &dir,
            "yaml",
            "workflow",
            |path| cache.get_or_parse(path, WorkflowDescriptor::from_file),
            |workflow| workflow.id.clone(),
        );
        self.workflows.len()
    }

    pub fn workflow(&self, id: &str) -> Option<Arc<WorkflowDescriptor>> {
        self.workflows.get(id).map(|entry| entry.value.clone())
    }

    /// File the workflow `id` was read from in the last discovery pass.
    pub fn workflow_path(&self, id: &str) -> Option<&Path> {
        self.workflows.get(id).map(|entry| entry.path.as_path())
    }

    pub fn workflows(&self) -> impl Iterator<Item = &Arc<WorkflowDescriptor>> {
        self.workflows.values().map(|entry| &entry.value)
    }

    pub fn workflow_count(&self) -> usize {
        self.workflows.len()
    }

    // ── Tasks ───────────────────────────────────────────────────────────

    /// Populate the task collection if it has not been loaded yet.
    pub fn discover_tasks(&mut self) {
        if self.tasks_state.is_loaded() {
            return;
        }
        self.tasks = list_files(&self.paths.tasks_dir(), "md")
            .iter()
            .map(|path| {
                let task = TaskDescriptor::from_path(path);
                (task.name.clone(), task)
            })
            .collect();
        self.tasks_state = LoadState::Loaded;
        tracing::info!("Loaded {} tasks", self.tasks.len());
    }

    pub fn get_task(&mut self, name: &str) -> Option<&TaskDescriptor> {
        self.discover_tasks();
        self.tasks.get(name)
    }

    pub fn get_all_tasks(&mut self) -> &BTreeMap<String, TaskDescriptor> {
        self.discover_tasks();
        &self.tasks
    }

    pub fn tasks_state(&self) -> LoadState {
        self.tasks_state
    }

    /// Tasks named in the agent's `tasks` dependencies that exist on disk,
    /// in dependency order.
    pub fn tasks_for_agent(&mut self, agent: &AgentDescriptor) -> Vec<TaskDescriptor> {
        self.discover_tasks();
        agent
            .dependency_names("tasks")
            .iter()
            .filter_map(|name| self.tasks.get(dependency_stem(name)).cloned())
            .collect()
    }

    // ── Templates ───────────────────────────────────────────────────────

    /// Populate the template collection if it has not been loaded yet.
    /// Unreadable files are logged and skipped.
    pub fn discover_templates(&mut self) {
        if self.templates_state.is_loaded() {
            return;
        }
        let mut templates = BTreeMap::new();
        for path in list_files(&self.paths.templates_dir(), "md") {
            match TemplateDescriptor::from_file(&path) {
                Ok(template) => {
                    templates.insert(template.name.clone(), template);
                }
                Err(failure) => failure.log(),
            }
        }
        self.templates = templates;
        self.templates_state = LoadState::Loaded;
        tracing::info!("Loaded {} templates", self.templates.len());
    }

    pub fn get_template(&mut self, name: &str) -> Option<&TemplateDescriptor> {
        self.discover_templates();
        self.templates.get(name)
    }

    pub fn get_all_templates(&mut self) -> &BTreeMap<String, TemplateDescriptor> {
        self.discover_templates();
        &self.templates
    }

    pub fn templates_state(&self) -> LoadState {
        self.templates_state
    }

    /// Templates named in the agent's `templates` dependencies that exist,
    /// mapped to their content length.
    pub fn templates_for_agent(&mut self, agent: &AgentDescriptor) -> BTreeMap<String, usize> {
        self.discover_templates();
        agent
            .dependency_names("templates")
            .iter()
            .filter_map(|name| {
                let stem = dependency_stem(name);
                self.templates
                    .get(stem)
                    .map(|template| (stem.to_string(), template.len()))
            })
            .collect()
    }
}

/// One discovery pass over `dir`. Files that fail to parse are logged and
/// left out; when two files declare the same id the later path wins.
fn discover<T, P, K>(
    dir: &Path,
    extension: &str,
    kind: &str,
    mut parse: P,
    key: K,
) -> BTreeMap<String, Entry<T>>
where
    P: FnMut(&Path) -> Result<Arc<T>, ParseFailure>,
    K: Fn(&T) -> String,
{
    let mut found = BTreeMap::new();
    for path in list_files(dir, extension) {
        match parse(&path) {
            Ok(entity) => {
                let id = key(&entity);
                let entry = Entry {
                    path: path.clone(),
                    value: entity,
                };
                if found.insert(id.clone(), entry).is_some() {
                    tracing::warn!(
                        "Duplicate {} id '{}' in {}, keeping the later file",
                        kind,
                        id,
                        path.display()
                    );
                }
            }
            Err(failure) => failure.log(),
        }
    }
    tracing::info!("Discovered {} {}s in {}", found.len(), kind, dir.display());
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn catalog_dir() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["agents", "workflows", "tasks", "templates"] {
            fs::create_dir(dir.path().join(sub)).unwrap();
        }
        dir
    }

    fn write_agent(root: &Path, stem: &str, id: &str) {
        fs::write(
            root.join("agents").join(format!("{}.md", stem)),
            format!(
                "# {id}\n\n```yaml\nagent:\n  id: {id}\n  name: Agent {id}\n  title: Title {id}\ndependencies:\n  tasks:\n    - create-doc.md\n    - missing-task.md\n  templates:\n    - prd-tmpl.md\n```\n"
            ),
        )
        .unwrap();
    }

    fn catalog(dir: &TempDir) -> Catalog {
        Catalog::new(CatalogPaths::new(dir.path()))
    }

    #[test]
    fn test_discover_agents_and_workflows() {
        let dir = catalog_dir();
        write_agent(dir.path(), "pm", "pm");
        write_agent(dir.path(), "analyst", "analyst");
        fs::write(
            dir.path().join("workflows/greenfield.yaml"),
            "workflow:\n  name: Greenfield\n  sequence:\n    - agent: pm\n",
        )
        .unwrap();

        let mut catalog = catalog(&dir);
        assert_eq!(catalog.discover_agents(), 2);
        assert_eq!(catalog.discover_workflows(), 1);
        assert_eq!(catalog.agent("pm").unwrap().name, "Agent pm");
        assert_eq!(catalog.workflow("greenfield").unwrap().total_steps(), 1);

        let ids: Vec<&str> = catalog.agents().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["analyst", "pm"]);
    }

    #[test]
    fn test_missing_directories_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = catalog(&dir);
        assert_eq!(catalog.discover_agents(), 0);
        assert_eq!(catalog.discover_workflows(), 0);
        assert!(catalog.get_all_tasks().is_empty());
        assert!(catalog.get_all_templates().is_empty());
        assert!(catalog.tasks_state().is_loaded());
        assert!(catalog.templates_state().is_loaded());
    }

    #[test]
    fn test_malformed_sibling_is_skipped_then_retried() {
        let dir = catalog_dir();
        write_agent(dir.path(), "pm", "pm");
        let broken = dir.path().join("agents/broken.md");
        fs::write(&broken, "# broken, no block\n").unwrap();

        let mut catalog = catalog(&dir);
        assert_eq!(catalog.discover_agents(), 1);
        assert!(catalog.agent("broken").is_none());

        write_agent(dir.path(), "broken", "fixed");
        assert_eq!(catalog.discover_agents(), 2);
        assert!(catalog.agent("fixed").is_some());
    }

    #[test]
    fn test_deleted_file_vanishes_on_next_pass() {
        let dir = catalog_dir();
        write_agent(dir.path(), "pm", "pm");
        write_agent(dir.path(), "qa", "qa");

        let mut catalog = catalog(&dir);
        assert_eq!(catalog.discover_agents(), 2);

        fs::remove_file(dir.path().join("agents/qa.md")).unwrap();
        assert_eq!(catalog.discover_agents(), 1);
        assert!(catalog.agent("qa").is_none());
    }

    #[test]
    fn test_unchanged_files_are_served_from_cache() {
        let dir = catalog_dir();
        write_agent(dir.path(), "pm", "pm");

        let mut catalog = catalog(&dir);
        catalog.discover_agents();
        let first = catalog.agent("pm").unwrap();
        catalog.discover_agents();
        let second = catalog.agent("pm").unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let path = dir.path().join("agents/pm.md");
        fs::write(
            &path,
            "```yaml\nagent:\n  id: pm\n  name: Renamed\n```\n",
        )
        .unwrap();
        fs::OpenOptions::new()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(SystemTime::now() + Duration::from_secs(10))
            .unwrap();

        catalog.discover_agents();
        let third = catalog.agent("pm").unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.name, "Renamed");
    }

    #[test]
    fn test_duplicate_ids_keep_later_file() {
        let dir = catalog_dir();
        write_agent(dir.path(), "a-first", "dup");
        fs::write(
            dir.path().join("agents/b-second.md"),
            "```yaml\nagent:\n  id: dup\n  name: Second\n```\n",
        )
        .unwrap();

        let mut catalog = catalog(&dir);
        assert_eq!(catalog.discover_agents(), 1);
        assert_eq!(catalog.agent("dup").unwrap().name, "Second");
        assert_eq!(
            catalog.agent_path("dup"),
            Some(dir.path().join("agents/b-second.md").as_path())
        );
    }

    #[test]
    fn test_numeric_agent_name_stays_in_catalog() {
        let dir = catalog_dir();
        fs::write(
            dir.path().join("agents/pm.md"),
            "```yaml\nagent:\n  id: pm\n  name: 2024\n  title: PM\n```\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("workflows/w.yaml"),
            "workflow:\n  id: w\n  project_types: [2024]\n",
        )
        .unwrap();

        let mut catalog = catalog(&dir);
        assert_eq!(catalog.discover_agents(), 1);
        assert_eq!(catalog.agent("pm").unwrap().name, "2024");
        assert_eq!(catalog.discover_workflows(), 1);
        assert_eq!(
            catalog.workflow_path("w"),
            Some(dir.path().join("workflows/w.yaml").as_path())
        );
    }

    #[test]
    fn test_tasks_load_once() {
        let dir = catalog_dir();
        fs::write(dir.path().join("tasks/create-doc.md"), "# Create doc").unwrap();

        let mut catalog = catalog(&dir);
        assert_eq!(catalog.tasks_state(), LoadState::NotLoaded);
        assert_eq!(
            catalog.get_task("create-doc").unwrap().description,
            "Task: create-doc"
        );

        fs::write(dir.path().join("tasks/shard-doc.md"), "# Shard").unwrap();
        assert!(catalog.get_task("shard-doc").is_none());
        assert_eq!(catalog.get_all_tasks().len(), 1);
    }

    #[test]
    fn test_templates_load_once() {
        let dir = catalog_dir();
        fs::write(dir.path().join("templates/prd-tmpl.md"), "# PRD").unwrap();

        let mut catalog = catalog(&dir);
        assert_eq!(catalog.get_template("prd-tmpl").unwrap().content, "# PRD");

        fs::write(dir.path().join("templates/arch-tmpl.md"), "# Arch").unwrap();
        assert!(catalog.get_template("arch-tmpl").is_none());
        assert_eq!(catalog.get_all_templates().len(), 1);
    }

    #[test]
    fn test_agent_dependencies_resolve_against_stems() {
        let dir = catalog_dir();
        write_agent(dir.path(), "pm", "pm");
        fs::write(dir.path().join("tasks/create-doc.md"), "").unwrap();
        fs::write(dir.path().join("tasks/unrelated.md"), "").unwrap();
        fs::write(dir.path().join("templates/prd-tmpl.md"), "12345").unwrap();

        let mut catalog = catalog(&dir);
        catalog.discover_agents();
        let pm = catalog.agent("pm").unwrap();

        let tasks = catalog.tasks_for_agent(&pm);
        let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["create-doc"]);

        let templates = catalog.templates_for_agent(&pm);
        assert_eq!(templates.get("prd-tmpl"), Some(&5));
    }
}
