//! BMAD CLI — browse the agent catalog and drive workflows.
//!
//! Every command goes through the same JSON-RPC router that `bmad serve`
//! exposes on stdio, so the CLI output matches what a tool-calling host sees.

use std::path::PathBuf;

use bmad_cli::commands;
use bmad_core::dispatch::DispatchMode;
use bmad_core::Settings;
use clap::{Parser, Subcommand};

/// BMAD CLI — Agent catalog and workflow progression
#[derive(Parser)]
#[command(name = "bmad", version, about = "BMAD CLI — Agent catalog and workflow progression")]
pub struct Cli {
    /// Path to the `.bmad-core` catalog directory
    #[arg(long, global = true, env = "BMAD_CORE_PATH", default_value = ".bmad-core")]
    root: PathBuf,

    /// Dispatch mode for `agent call` (builtin or external)
    #[arg(long, global = true, env = "BMAD_LLM_MODE")]
    mode: Option<String>,

    /// File that carries the active workflow between invocations
    #[arg(long, global = true, env = "BMAD_STATE_FILE")]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and activate agents
    Agent {
        #[command(subcommand)]
        action: AgentAction,
    },

    /// Browse workflows and drive the active one
    Workflow {
        #[command(subcommand)]
        action: WorkflowAction,
    },

    /// Browse and execute tasks
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Browse templates
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Service status, catalog scan and dispatch mode
    System {
        #[command(subcommand)]
        action: SystemAction,
    },

    /// Send a raw JSON-RPC request
    Rpc {
        /// JSON-RPC method name (e.g. "agents.list")
        #[arg(short, long)]
        method: String,
        /// JSON params (e.g. '{"id": "pm"}')
        #[arg(short, long, default_value = "{}")]
        params: String,
    },

    /// Serve JSON-RPC over stdio, one message per line
    Serve,
}

#[derive(Subcommand)]
enum AgentAction {
    /// List all agents
    List,
    /// Show an agent's full definition
    Get {
        /// Agent ID (file stem)
        id: String,
    },
    /// Make an agent the active one
    Activate { id: String },
    /// Show the tasks and templates an agent depends on
    Tasks { id: String },
    /// Ask an agent to perform a task
    Call {
        id: String,
        /// Task description
        #[arg(short, long)]
        task: String,
        /// Extra context as a JSON object
        #[arg(short, long)]
        context: Option<String>,
    },
    /// Validate an agent definition file
    Validate { id: String },
}

#[derive(Subcommand)]
enum WorkflowAction {
    /// List all workflows
    List,
    /// Show a workflow's full definition
    Get { id: String },
    /// Validate a workflow definition file
    Validate { id: String },
    /// Start a workflow
    Start {
        id: String,
        /// Project type (must be one the workflow supports)
        #[arg(long)]
        project_type: Option<String>,
    },
    /// Show progress of the active workflow
    Status,
    /// Complete the current step
    Advance {
        /// Artifact created by this step (repeatable)
        #[arg(short, long = "artifact")]
        artifacts: Vec<String>,
    },
    /// Clear the active workflow
    Reset,
    /// Print a markdown report of the active workflow
    Report,
    /// Write the active workflow state to a JSON file
    Export { path: PathBuf },
    /// Load workflow state from a JSON file
    Import { path: PathBuf },
}

#[derive(Subcommand)]
enum TaskAction {
    /// List tasks, optionally only those an agent depends on
    List {
        #[arg(long)]
        agent: Option<String>,
    },
    /// Show a task
    Get { name: String },
    /// Execute a task as an agent
    Execute {
        name: String,
        /// Agent that runs the task
        #[arg(short, long)]
        agent: String,
        /// Extra context as a JSON object
        #[arg(short, long)]
        context: Option<String>,
    },
}

#[derive(Subcommand)]
enum TemplateAction {
    /// List templates
    List,
    /// Show a template
    Get {
        name: String,
        /// Print the template body instead of JSON
        #[arg(long)]
        raw: bool,
    },
}

#[derive(Subcommand)]
enum SystemAction {
    /// Catalog counts, lazy-load flags and workflow state
    Status,
    /// Validate every catalog file
    Scan {
        /// Print the markdown report instead of JSON
        #[arg(long)]
        markdown: bool,
    },
    /// Show or switch the dispatch mode
    Mode {
        #[arg(long)]
        set: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bmad_core=warn,bmad_cli=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        let _ = Cli::command().print_help();
        println!();
        return;
    };

    let mode = match cli.mode.as_deref().map(DispatchMode::parse) {
        Some(Some(mode)) => mode,
        Some(None) => {
            eprintln!(
                "Error: unknown mode '{}' (expected builtin or external)",
                cli.mode.as_deref().unwrap_or_default()
            );
            std::process::exit(1);
        }
        None => DispatchMode::default(),
    };
    let settings = Settings::new(cli.root.clone()).with_mode(mode);
    let ctx = commands::init_context(settings);
    let state = cli.state.as_deref();

    let result = match command {
        Commands::Agent { action } => match action {
            AgentAction::List => commands::agent::list(&ctx).await,
            AgentAction::Get { id } => commands::agent::get(&ctx, &id).await,
            AgentAction::Activate { id } => commands::agent::activate(&ctx, &id).await,
            AgentAction::Tasks { id } => commands::agent::tasks(&ctx, &id).await,
            AgentAction::Call { id, task, context } => {
                commands::agent::call(&ctx, &id, &task, context.as_deref()).await
            }
            AgentAction::Validate { id } => commands::agent::validate(&ctx, &id).await,
        },
        Commands::Workflow { action } => match action {
            WorkflowAction::List => commands::workflow::list(&ctx, state).await,
            WorkflowAction::Get { id } => commands::workflow::get(&ctx, &id).await,
            WorkflowAction::Validate { id } => commands::workflow::validate(&ctx, &id).await,
            WorkflowAction::Start { id, project_type } => {
                commands::workflow::start(&ctx, &id, project_type.as_deref(), state).await
            }
            WorkflowAction::Status => commands::workflow::status(&ctx, state).await,
            WorkflowAction::Advance { artifacts } => {
                commands::workflow::advance(&ctx, artifacts, state).await
            }
            WorkflowAction::Reset => commands::workflow::reset(&ctx, state).await,
            WorkflowAction::Report => commands::workflow::report(&ctx, state).await,
            WorkflowAction::Export { path } => commands::workflow::export(&ctx, &path, state).await,
            WorkflowAction::Import { path } => commands::workflow::import(&ctx, &path, state).await,
        },
        Commands::Task { action } => match action {
            TaskAction::List { agent } => commands::task::list(&ctx, agent.as_deref()).await,
            TaskAction::Get { name } => commands::task::get(&ctx, &name).await,
            TaskAction::Execute {
                name,
                agent,
                context,
            } => commands::task::execute(&ctx, &name, &agent, context.as_deref(), state).await,
        },
        Commands::Template { action } => match action {
            TemplateAction::List => commands::template::list(&ctx).await,
            TemplateAction::Get { name, raw } => commands::template::get(&ctx, &name, raw).await,
        },
        Commands::System { action } => match action {
            SystemAction::Status => commands::system::status(&ctx).await,
            SystemAction::Scan { markdown } => commands::system::scan(&ctx, markdown).await,
            SystemAction::Mode { set } => commands::system::mode(&ctx, set.as_deref()).await,
        },
        Commands::Rpc { method, params } => {
            commands::rpc::call(&ctx, &method, &params, state).await
        }
        Commands::Serve => commands::serve::run(&ctx).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
