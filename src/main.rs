use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use workflow_builder::{Engine, EngineConfig, RunOutcome, Workflow, WorkflowEditor};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check a workflow file against the graph invariants
    Validate {
        /// Path to the workflow YAML or JSON file
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },
    /// Print the order nodes would run in
    Plan {
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },
    /// Animate a simulated run; Ctrl-C stops it between steps
    Run {
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
        /// Milliseconds spent on each node
        #[arg(long)]
        step_delay_ms: Option<u64>,
        /// Keep going after a node fails
        #[arg(long)]
        continue_on_error: bool,
    },
}

fn load_workflow(path: &Path) -> Result<Workflow> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read file `{:?}`", path))?;

    // YAML is a superset of JSON, so one parser covers both.
    let workflow: Workflow =
        serde_yaml::from_str(&content).context("Failed to parse workflow file")?;
    workflow
        .graph
        .validate()
        .with_context(|| format!("Workflow `{}` is not valid", workflow.name))?;
    Ok(workflow)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    env_logger::init();
    let cli = Cli::parse();
    let mut config = EngineConfig::from_env()?;

    match cli.command {
        Command::Validate { file } => {
            let workflow = load_workflow(&file)?;
            println!(
                "✅ Workflow '{}' is valid: {} nodes, {} connections",
                workflow.name,
                workflow.graph.nodes.len(),
                workflow.graph.connections.len()
            );
        }
        Command::Plan { file } => {
            let workflow = load_workflow(&file)?;
            let editor = WorkflowEditor::from_workflow(workflow, &config)?;
            let plan = editor.plan_execution()?;

            println!("📋 Execution order for '{}':", editor.workflow().name);
            for (step, node_id) in plan.iter().enumerate() {
                if let Some(node) = editor.graph().node(node_id) {
                    println!(
                        "  {}. {} [{}] ({})",
                        step + 1,
                        node.title,
                        node.node_type,
                        node.id
                    );
                }
            }
            let skipped = editor.graph().nodes.len() - plan.len();
            if skipped > 0 {
                println!("  ({} nodes unreachable from the trigger)", skipped);
            }
        }
        Command::Run {
            file,
            step_delay_ms,
            continue_on_error,
        } => {
            if let Some(ms) = step_delay_ms {
                config.step_delay_ms = ms;
            }
            config.continue_on_error |= continue_on_error;

            let workflow = load_workflow(&file)?;
            println!("🚀 Running workflow: {}", workflow.name);
            let mut editor = WorkflowEditor::from_workflow(workflow, &config)?;

            let (tx, mut rx) = mpsc::unbounded_channel();
            let engine = Engine::new(config).with_events(tx);

            let cancel = CancellationToken::new();
            let on_ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::info!("Stop requested");
                    on_ctrl_c.cancel();
                }
            });

            let printer = tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    println!("  {} -> {:?}", event.node_id, event.status);
                }
            });

            let report = editor.run(&engine, &cancel).await?;
            drop(engine);
            printer.await.context("Status printer failed")?;

            println!();
            match report.outcome {
                RunOutcome::Completed => println!(
                    "✨ Run completed: {}/{} nodes, {} failed",
                    report.visited.len(),
                    report.plan.len(),
                    report.failures.len()
                ),
                RunOutcome::Cancelled => println!(
                    "⏹  Run stopped after {}/{} nodes",
                    report.visited.len(),
                    report.plan.len()
                ),
                RunOutcome::Aborted => println!(
                    "❌ Run aborted after {}/{} nodes",
                    report.visited.len(),
                    report.plan.len()
                ),
            }
            for failure in &report.failures {
                println!("   {}: {}", failure.node_id, failure.message);
            }
        }
    }

    Ok(())
}
