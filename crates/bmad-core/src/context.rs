//! Composition root: one catalog, one workflow engine, the active agent and
//! the dispatch mode.
//!
//! `Context` is not internally synchronized. Transports share it through
//! [`SharedContext`] and hold the lock for the whole of each request, so a
//! lazy load or a workflow read-modify-write never interleaves with another.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::catalog::validation::{self, ScanReport, ValidationReport};
use crate::catalog::{
    AgentDescriptor, AgentSummary, Catalog, TaskDescriptor, TemplateDescriptor,
    WorkflowDescriptor, WorkflowSummary,
};
use crate::config::{CoreConfig, Settings};
use crate::dispatch::{role_prompt, AgentDispatcher, DispatchMode, DispatchRequest, ModeInfo};
use crate::error::CoreError;
use crate::workflow::{
    AdvanceOutcome, ExportOutcome, ImportOutcome, ReportOutcome, ResetOutcome, StartOutcome,
    StatusSnapshot, WorkflowEngine,
};

pub type SharedContext = Arc<tokio::sync::Mutex<Context>>;

#[derive(Debug, Clone, Serialize)]
pub struct AgentList {
    pub agents: Vec<AgentSummary>,
    pub count: usize,
    pub current_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActiveAgent {
    pub id: String,
    pub name: String,
    pub title: String,
    pub icon: String,
    pub role: String,
    pub focus: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Activation {
    pub message: String,
    pub agent: ActiveAgent,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowList {
    pub workflows: BTreeMap<String, WorkflowSummary>,
    pub current_workflow: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    pub tasks: BTreeMap<String, TaskDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskRun {
    pub message: String,
    pub task: TaskDescriptor,
    pub agent: String,
    pub context: Map<String, Value>,
    pub executed_at: DateTime<Utc>,
    /// Whether the run was appended to the active workflow's history.
    pub recorded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateList {
    pub templates: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentTasks {
    pub agent: AgentDescriptor,
    pub tasks: BTreeMap<String, TaskDescriptor>,
    /// Template name → content length.
    pub templates: BTreeMap<String, usize>,
    pub dependencies: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LazyLoading {
    pub tasks_loaded: bool,
    pub templates_loaded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemStatus {
    pub bmad_core_path: PathBuf,
    pub config_loaded: bool,
    pub agents_count: usize,
    pub workflows_count: usize,
    pub tasks_count: usize,
    pub templates_count: usize,
    pub current_agent: Option<String>,
    pub current_workflow: Option<String>,
    pub workflow_active: bool,
    pub system_time: DateTime<Utc>,
    pub dispatch_mode: &'static str,
    pub dispatch_mode_description: &'static str,
    pub dispatcher_ready: bool,
    /// Load state of the lazy collections before this call counted them.
    pub lazy_loading: LazyLoading,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModeSwitch {
    pub mode: &'static str,
    pub description: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogScan {
    pub scan_result: ScanReport,
    pub report: String,
}

pub struct Context {
    settings: Settings,
    config: CoreConfig,
    catalog: Catalog,
    engine: WorkflowEngine,
    current_agent: Option<String>,
    mode: DispatchMode,
    dispatcher: Option<Box<dyn AgentDispatcher>>,
}

impl Context {
    /// Load `core-config.yaml`, then agents, then workflows. Tasks and
    /// templates wait for first use. Missing pieces degrade to empty.
    pub fn open(settings: Settings) -> Self {
        let paths = settings.paths();
        let config = CoreConfig::load(&paths.config_file());
        let mut catalog = Catalog::new(paths);
        catalog.discover_agents();
        catalog.discover_workflows();

        tracing::info!(
            "Opened catalog at {} ({} agents, {} workflows)",
            settings.root.display(),
            catalog.agent_count(),
            catalog.workflow_count()
        );

        Self {
            mode: settings.mode,
            settings,
            config,
            catalog,
            engine: WorkflowEngine::new(),
            current_agent: None,
            dispatcher: None,
        }
    }

    pub fn into_shared(self) -> SharedContext {
        Arc::new(tokio::sync::Mutex::new(self))
    }

    pub fn set_dispatcher(&mut self, dispatcher: Box<dyn AgentDispatcher>) {
        tracing::debug!("Registered dispatcher '{}'", dispatcher.name());
        self.dispatcher = Some(dispatcher);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn engine(&self) -> &WorkflowEngine {
        &self.engine
    }

    pub fn current_agent(&self) -> Option<&str> {
        self.current_agent.as_deref()
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    fn find_agent(&mut self, id: &str) -> Result<Arc<AgentDescriptor>, CoreError> {
        self.catalog.discover_agents();
        self.catalog
            .agent(id)
            .ok_or_else(|| CoreError::NotFound(format!("agent '{}'", id)))
    }

    // ── Agents ──────────────────────────────────────────────────────────

    pub fn list_agents(&mut self) -> AgentList {
        self.catalog.discover_agents();
        let agents: Vec<AgentSummary> = self
            .catalog
            .agents()
            .map(|a| AgentSummary::from(a.as_ref()))
            .collect();
        AgentList {
            count: agents.len(),
            agents,
            current_agent: self.current_agent.clone(),
        }
    }

    pub fn get_agent(&mut self, id: &str) -> Result<Arc<AgentDescriptor>, CoreError> {
        self.find_agent(id)
    }

    pub fn activate_agent(&mut self, id: &str) -> Result<Activation, CoreError> {
        let agent = self.find_agent(id)?;
        self.current_agent = Some(agent.id.clone());
        tracing::info!("Activated agent '{}'", agent.id);

        Ok(Activation {
            message: format!("Activated agent: {} {}", agent.title, agent.icon),
            agent: ActiveAgent {
                id: agent.id.clone(),
                name: agent.name.clone(),
                title: agent.title.clone(),
                icon: agent.icon.clone(),
                role: agent.role.clone(),
                focus: agent.focus.clone(),
            },
        })
    }

    pub fn get_agent_tasks(&mut self, id: &str) -> Result<AgentTasks, CoreError> {
        let agent = self.find_agent(id)?;
        let tasks = self
            .catalog
            .tasks_for_agent(&agent)
            .into_iter()
            .map(|task| (task.name.clone(), task))
            .collect();
        let templates = self.catalog.templates_for_agent(&agent);

        Ok(AgentTasks {
            dependencies: agent.dependencies.clone(),
            agent: agent.as_ref().clone(),
            tasks,
            templates,
        })
    }

    /// Frame `task` in the agent's persona and dispatch it according to the
    /// current mode. The result is a JSON object tagged with `mode`.
    pub fn call_agent(
        &mut self,
        id: &str,
        task: &str,
        context: Option<Map<String, Value>>,
    ) -> Result<Value, CoreError> {
        let agent = self.find_agent(id)?;
        let context = context.unwrap_or_default();
        let prompt = role_prompt(&agent);
        let executed_at = Utc::now();

        match self.mode {
            DispatchMode::Builtin => Ok(json!({
                "success": true,
                "agent_id": agent.id,
                "agent_name": agent.name,
                "agent_title": agent.title,
                "task": task,
                "role_prompt": prompt,
                "context": context,
                "mode": self.mode.label(),
                "mode_description": self.mode.description(),
                "message": format!("Activated {}, handle the task in this role", agent.name),
                "executed_at": executed_at,
            })),
            DispatchMode::External => {
                let dispatcher = self
                    .dispatcher
                    .as_ref()
                    .ok_or_else(|| CoreError::DispatchUnavailable(self.mode.label().to_string()))?;
                let request = DispatchRequest {
                    agent_id: agent.id.clone(),
                    agent_title: agent.title.clone(),
                    role_prompt: prompt,
                    task: task.to_string(),
                    context,
                };
                tracing::debug!("Dispatching '{}' to {}", agent.id, dispatcher.name());

                let mut result = match dispatcher.dispatch(&request)? {
                    Value::Object(map) => map,
                    other => {
                        let mut map = Map::new();
                        map.insert("result".to_string(), other);
                        map
                    }
                };
                result.insert("mode".to_string(), json!(self.mode.label()));
                result.insert("mode_description".to_string(), json!(self.mode.description()));
                result.insert("executed_at".to_string(), json!(executed_at));
                Ok(Value::Object(result))
            }
        }
    }

    /// Validate the file behind agent `id`. A catalog entry is resolved to
    /// its source file; otherwise `agents/<id>.md` is checked, so files that
    /// fail to load can still be diagnosed.
    pub fn validate_agent(&mut self, id: &str) -> Result<ValidationReport, CoreError> {
        self.catalog.discover_agents();
        let path = match self.catalog.agent_path(id) {
            Some(path) => path.to_path_buf(),
            None => self.catalog.paths().agent_file(id),
        };
        if !path.is_file() {
            return Err(CoreError::NotFound(format!("agent file '{}.md'", id)));
        }
        Ok(validation::validate_agent_file(&path))
    }

    // ── Workflows ───────────────────────────────────────────────────────

    pub fn list_workflows(&mut self) -> WorkflowList {
        self.catalog.discover_workflows();
        WorkflowList {
            workflows: self
                .catalog
                .workflows()
                .map(|w| (w.id.clone(), WorkflowSummary::from(w.as_ref())))
                .collect(),
            current_workflow: self.engine.current_workflow().map(str::to_string),
        }
    }

    pub fn get_workflow(&mut self, id: &str) -> Result<Arc<WorkflowDescriptor>, CoreError> {
        self.catalog.discover_workflows();
        self.catalog
            .workflow(id)
            .ok_or_else(|| CoreError::NotFound(format!("workflow '{}'", id)))
    }

    pub fn start_workflow(
        &mut self,
        id: &str,
        project_type: Option<String>,
    ) -> Result<StartOutcome, CoreError> {
        self.catalog.discover_workflows();
        self.engine.start(&self.catalog, id, project_type)
    }

    pub fn workflow_status(&self) -> Result<StatusSnapshot, CoreError> {
        self.engine.status(&self.catalog)
    }

    pub fn advance_workflow(
        &mut self,
        artifacts: Vec<String>,
    ) -> Result<AdvanceOutcome, CoreError> {
        self.engine.advance(&self.catalog, artifacts)
    }

    pub fn reset_workflow(&mut self) -> ResetOutcome {
        self.engine.reset()
    }

    pub fn export_state(&self, path: &Path) -> Result<ExportOutcome, CoreError> {
        self.engine.export(path)
    }

    pub fn import_state(&mut self, path: &Path) -> Result<ImportOutcome, CoreError> {
        self.engine.import(path)
    }

    pub fn workflow_report(&self) -> Result<ReportOutcome, CoreError> {
        self.engine.report()
    }

    /// Validate the file behind workflow `id`, resolved the same way as
    /// [`Context::validate_agent`].
    pub fn validate_workflow(&mut self, id: &str) -> Result<ValidationReport, CoreError> {
        self.catalog.discover_workflows();
        let path = match self.catalog.workflow_path(id) {
            Some(path) => path.to_path_buf(),
            None => self.catalog.paths().workflow_file(id),
        };
        if !path.is_file() {
            return Err(CoreError::NotFound(format!("workflow file '{}.yaml'", id)));
        }
        Ok(validation::validate_workflow_file(&path))
    }

    // ── Tasks & templates ───────────────────────────────────────────────

    /// All tasks, or only those the agent depends on.
    pub fn list_tasks(&mut self, agent_id: Option<&str>) -> Result<TaskList, CoreError> {
        let Some(agent_id) = agent_id else {
            return Ok(TaskList {
                agent: None,
                tasks: self.catalog.get_all_tasks().clone(),
            });
        };

        let agent = self.find_agent(agent_id)?;
        let tasks = self
            .catalog
            .tasks_for_agent(&agent)
            .into_iter()
            .map(|task| (task.name.clone(), task))
            .collect();
        Ok(TaskList {
            agent: Some(agent.id.clone()),
            tasks,
        })
    }

    pub fn get_task(&mut self, name: &str) -> Result<TaskDescriptor, CoreError> {
        self.catalog
            .get_task(name)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("task '{}'", name)))
    }

    /// Run `name` under the active agent. When a workflow is active the run
    /// is appended to its task history.
    pub fn execute_task(
        &mut self,
        name: &str,
        context: Option<Map<String, Value>>,
    ) -> Result<TaskRun, CoreError> {
        let task = self.get_task(name)?;
        let agent = self.current_agent.clone().ok_or(CoreError::NoActiveAgent)?;

        let recorded = self
            .engine
            .record_task_execution(&task.name, &agent, context.clone());
        tracing::info!("Executed task '{}' with agent '{}'", task.name, agent);

        Ok(TaskRun {
            message: format!("Executed task '{}' with agent '{}'", task.name, agent),
            task,
            agent,
            context: context.unwrap_or_default(),
            executed_at: Utc::now(),
            recorded,
        })
    }

    pub fn list_templates(&mut self) -> TemplateList {
        let templates: Vec<String> = self.catalog.get_all_templates().keys().cloned().collect();
        TemplateList {
            count: templates.len(),
            templates,
        }
    }

    pub fn get_template(&mut self, name: &str) -> Result<TemplateDescriptor, CoreError> {
        self.catalog
            .get_template(name)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("template '{}'", name)))
    }

    // ── System ──────────────────────────────────────────────────────────

    pub fn system_status(&mut self) -> SystemStatus {
        let lazy_loading = LazyLoading {
            tasks_loaded: self.catalog.tasks_state().is_loaded(),
            templates_loaded: self.catalog.templates_state().is_loaded(),
        };
        let current_workflow = self.engine.current_workflow().map(str::to_string);

        SystemStatus {
            bmad_core_path: self.settings.root.clone(),
            config_loaded: self.config.is_loaded(),
            agents_count: self.catalog.agent_count(),
            workflows_count: self.catalog.workflow_count(),
            tasks_count: self.catalog.get_all_tasks().len(),
            templates_count: self.catalog.get_all_templates().len(),
            current_agent: self.current_agent.clone(),
            workflow_active: current_workflow.is_some(),
            current_workflow,
            system_time: Utc::now(),
            dispatch_mode: self.mode.label(),
            dispatch_mode_description: self.mode.description(),
            dispatcher_ready: match self.mode {
                DispatchMode::Builtin => true,
                DispatchMode::External => self.dispatcher.is_some(),
            },
            lazy_loading,
        }
    }

    pub fn set_dispatch_mode(&mut self, raw: &str) -> Result<ModeSwitch, CoreError> {
        let mode = DispatchMode::parse(raw).ok_or_else(|| CoreError::InvalidMode(raw.to_string()))?;
        self.mode = mode;
        tracing::info!("Dispatch mode set to {}", mode);
        Ok(ModeSwitch {
            mode: mode.label(),
            description: mode.description(),
            message: format!("Switched to {} mode", mode.label()),
        })
    }

    pub fn dispatch_mode_info(&self) -> ModeInfo {
        ModeInfo::new(
            self.mode,
            self.dispatcher.as_ref().map(|d| d.name().to_string()),
        )
    }

    pub fn scan_catalog(&self) -> CatalogScan {
        let scan_result = validation::scan(self.catalog.root());
        CatalogScan {
            report: scan_result.to_markdown(),
            scan_result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for sub in ["agents", "workflows", "tasks", "templates"] {
            fs::create_dir(root.join(sub)).unwrap();
        }
        fs::write(
            root.join("agents/pm.md"),
            "```yaml\nagent:\n  id: pm\n  name: John\n  title: Product Manager\n  icon: 📋\npersona:\n  role: Strategist\ndependencies:\n  tasks:\n    - create-doc.md\n  templates:\n    - prd-tmpl.md\n```\n",
        )
        .unwrap();
        fs::write(
            root.join("workflows/w1.yaml"),
            "workflow:\n  id: w1\n  name: W1\n  sequence: [A, B]\n",
        )
        .unwrap();
        fs::write(root.join("tasks/create-doc.md"), "# create").unwrap();
        fs::write(root.join("tasks/other.md"), "# other").unwrap();
        fs::write(root.join("templates/prd-tmpl.md"), "# PRD").unwrap();
        fs::write(root.join("core-config.yaml"), "slashPrefix: BMad\n").unwrap();
        dir
    }

    fn open(dir: &TempDir) -> Context {
        Context::open(Settings::new(dir.path()))
    }

    struct EchoDispatcher;

    impl AgentDispatcher for EchoDispatcher {
        fn name(&self) -> &str {
            "echo"
        }

        fn dispatch(&self, request: &DispatchRequest) -> Result<Value, CoreError> {
            Ok(json!({ "success": true, "content": request.task }))
        }
    }

    #[test]
    fn test_open_loads_config_agents_workflows() {
        let dir = fixture();
        let mut ctx = open(&dir);
        let status = ctx.system_status();
        assert!(status.config_loaded);
        assert_eq!(status.agents_count, 1);
        assert_eq!(status.workflows_count, 1);
        assert!(!status.lazy_loading.tasks_loaded);
        assert_eq!(status.tasks_count, 2);
        assert!(ctx.system_status().lazy_loading.tasks_loaded);
    }

    #[test]
    fn test_list_agents_sees_new_files() {
        let dir = fixture();
        let mut ctx = open(&dir);
        assert_eq!(ctx.list_agents().count, 1);

        fs::write(
            dir.path().join("agents/qa.md"),
            "```yaml\nagent:\n  id: qa\n  title: QA\n```\n",
        )
        .unwrap();
        let list = ctx.list_agents();
        assert_eq!(list.count, 2);
        assert!(list.agents.iter().any(|a| a.id == "qa" && a.description == "QA"));
    }

    #[test]
    fn test_activate_and_execute_task() {
        let dir = fixture();
        let mut ctx = open(&dir);

        assert!(matches!(
            ctx.execute_task("create-doc", None),
            Err(CoreError::NoActiveAgent)
        ));
        assert!(matches!(
            ctx.execute_task("missing", None),
            Err(CoreError::NotFound(_))
        ));

        let activation = ctx.activate_agent("pm").unwrap();
        assert_eq!(activation.message, "Activated agent: Product Manager 📋");
        assert_eq!(ctx.current_agent(), Some("pm"));

        let run = ctx.execute_task("create-doc", None).unwrap();
        assert!(!run.recorded);

        ctx.start_workflow("w1", None).unwrap();
        let run = ctx.execute_task("create-doc", None).unwrap();
        assert!(run.recorded);
        let state = ctx.engine().state().unwrap();
        assert_eq!(state.task_executions().len(), 1);
        assert_eq!(state.current_step, 0);
    }

    #[test]
    fn test_agent_task_views() {
        let dir = fixture();
        let mut ctx = open(&dir);

        let all = ctx.list_tasks(None).unwrap();
        assert_eq!(all.tasks.len(), 2);

        let filtered = ctx.list_tasks(Some("pm")).unwrap();
        assert_eq!(filtered.agent.as_deref(), Some("pm"));
        assert_eq!(filtered.tasks.keys().collect::<Vec<_>>(), vec!["create-doc"]);

        assert!(matches!(ctx.list_tasks(Some("ghost")), Err(CoreError::NotFound(_))));

        let view = ctx.get_agent_tasks("pm").unwrap();
        assert!(view.tasks.contains_key("create-doc"));
        assert_eq!(view.templates.get("prd-tmpl"), Some(&5));
        assert_eq!(view.dependencies["tasks"], vec!["create-doc.md"]);
    }

    #[test]
    fn test_templates() {
        let dir = fixture();
        let mut ctx = open(&dir);
        let list = ctx.list_templates();
        assert_eq!(list.templates, vec!["prd-tmpl"]);
        assert_eq!(ctx.get_template("prd-tmpl").unwrap().content, "# PRD");
        assert!(matches!(ctx.get_template("nope"), Err(CoreError::NotFound(_))));
    }

    #[test]
    fn test_call_agent_builtin() {
        let dir = fixture();
        let mut ctx = open(&dir);
        let result = ctx.call_agent("pm", "Write a PRD", None).unwrap();
        assert_eq!(result["mode"], "builtin_llm");
        assert_eq!(result["task"], "Write a PRD");
        assert!(result["role_prompt"]
            .as_str()
            .unwrap()
            .contains("John (Product Manager)"));
        assert!(matches!(
            ctx.call_agent("ghost", "x", None),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_call_agent_external() {
        let dir = fixture();
        let mut ctx = open(&dir);
        ctx.set_dispatch_mode("api").unwrap();
        assert!(matches!(
            ctx.call_agent("pm", "x", None),
            Err(CoreError::DispatchUnavailable(_))
        ));
        assert!(!ctx.system_status().dispatcher_ready);

        ctx.set_dispatcher(Box::new(EchoDispatcher));
        let result = ctx.call_agent("pm", "Review", None).unwrap();
        assert_eq!(result["mode"], "external_api");
        assert_eq!(result["content"], "Review");
        assert!(result.get("executed_at").is_some());
        assert_eq!(ctx.dispatch_mode_info().dispatcher.as_deref(), Some("echo"));
    }

    #[test]
    fn test_invalid_mode_keeps_current() {
        let dir = fixture();
        let mut ctx = open(&dir);
        assert!(matches!(
            ctx.set_dispatch_mode("quantum"),
            Err(CoreError::InvalidMode(_))
        ));
        assert_eq!(ctx.mode(), DispatchMode::Builtin);
    }

    #[test]
    fn test_validate_by_id() {
        let dir = fixture();
        let mut ctx = open(&dir);
        assert!(ctx.validate_agent("pm").unwrap().valid);
        assert!(matches!(ctx.validate_agent("ghost"), Err(CoreError::NotFound(_))));

        let report = ctx.validate_workflow("w1").unwrap();
        assert!(!report.valid);
        assert!(matches!(ctx.validate_workflow("ghost"), Err(CoreError::NotFound(_))));
    }

    #[test]
    fn test_validate_resolves_declared_id_to_its_file() {
        let dir = fixture();
        fs::rename(
            dir.path().join("agents/pm.md"),
            dir.path().join("agents/product-manager.md"),
        )
        .unwrap();
        fs::rename(
            dir.path().join("workflows/w1.yaml"),
            dir.path().join("workflows/two-step.yaml"),
        )
        .unwrap();
        let mut ctx = open(&dir);

        assert!(ctx.get_agent("pm").is_ok());
        assert!(ctx.validate_agent("pm").unwrap().valid);
        assert!(ctx.validate_agent("product-manager").unwrap().valid);
        assert!(ctx.get_workflow("w1").is_ok());
        assert!(ctx.validate_workflow("w1").is_ok());
    }

    #[test]
    fn test_validate_reaches_files_that_fail_to_load() {
        let dir = fixture();
        fs::write(dir.path().join("agents/broken.md"), "no yaml here").unwrap();
        let mut ctx = open(&dir);

        assert!(ctx.get_agent("broken").is_err());
        let report = ctx.validate_agent("broken").unwrap();
        assert!(!report.valid);
    }

    #[test]
    fn test_scan_and_workflow_listing() {
        let dir = fixture();
        let mut ctx = open(&dir);
        let scan = ctx.scan_catalog();
        assert_eq!(scan.scan_result.agents.valid, vec!["pm.md"]);
        assert!(scan.report.contains("Workflows (1)"));

        ctx.start_workflow("w1", None).unwrap();
        let list = ctx.list_workflows();
        assert_eq!(list.current_workflow.as_deref(), Some("w1"));
        assert_eq!(list.workflows["w1"].name, "W1");
    }

    #[test]
    fn test_missing_root_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = Context::open(Settings::new(dir.path().join("absent")));
        let status = ctx.system_status();
        assert!(!status.config_loaded);
        assert_eq!(status.agents_count, 0);
        assert_eq!(status.tasks_count, 0);
        assert!(matches!(ctx.start_workflow("w1", None), Err(CoreError::NotFound(_))));
    }
}
