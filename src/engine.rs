use crate::config::EngineConfig;
use crate::error::Result;
use crate::executor::{NodeExecutor, SimulatedExecutor};
use crate::planner;
use crate::schema::{Graph, NodeStatus};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub node_id: String,
    pub status: NodeStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every planned node was visited.
    Completed,
    /// The cancellation token fired before the plan finished.
    Cancelled,
    /// A node failed and `continue_on_error` was off.
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeFailure {
    pub node_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub plan: Vec<String>,
    /// Nodes that finished, successfully or not, in visitation order.
    pub visited: Vec<String>,
    pub failures: Vec<NodeFailure>,
    pub outcome: RunOutcome,
}

/// Drives a workflow run: nodes are visited one at a time in plan order,
/// each moving idle -> running -> success (or error).
pub struct Engine {
    config: EngineConfig,
    executor: Box<dyn NodeExecutor>,
    events: Option<UnboundedSender<StatusEvent>>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let executor = SimulatedExecutor::new(config.step_delay());
        Self::with_executor(config, executor)
    }

    pub fn with_executor(config: EngineConfig, executor: impl NodeExecutor + 'static) -> Self {
        Self {
            config,
            executor: Box::new(executor),
            events: None,
        }
    }

    /// Publishes every status change to `tx` as it happens.
    pub fn with_events(mut self, tx: UnboundedSender<StatusEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    fn set_status(&self, graph: &mut Graph, node_id: &str, status: NodeStatus) {
        graph.set_status(node_id, status);
        if let Some(tx) = &self.events {
            // A dropped receiver only means nobody is watching.
            let _ = tx.send(StatusEvent {
                node_id: node_id.to_string(),
                status,
            });
        }
    }

    /// Plans from the trigger and visits each node in order.
    ///
    /// The token is checked before every step and raced against the step
    /// itself; a node interrupted mid-step goes back to idle.
    pub async fn run(&self, graph: &mut Graph, cancel: &CancellationToken) -> Result<RunReport> {
        let plan = planner::plan_execution(graph)?;
        graph.reset_statuses();

        log::info!("Starting run over {} nodes", plan.len());

        let mut report = RunReport {
            plan: plan.clone(),
            visited: Vec::new(),
            failures: Vec::new(),
            outcome: RunOutcome::Completed,
        };

        for node_id in &plan {
            if cancel.is_cancelled() {
                report.outcome = RunOutcome::Cancelled;
                break;
            }
            let Some(node) = graph.node(node_id).cloned() else {
                continue;
            };

            self.set_status(graph, node_id, NodeStatus::Running);
            log::info!("Executing node: {} ({})", node.title, node.id);

            let result = tokio::select! {
                biased;

                () = cancel.cancelled() => None,
                result = self.executor.execute(&node) => Some(result),
            };

            match result {
                None => {
                    self.set_status(graph, node_id, NodeStatus::Idle);
                    report.outcome = RunOutcome::Cancelled;
                    break;
                }
                Some(Ok(())) => {
                    self.set_status(graph, node_id, NodeStatus::Success);
                    report.visited.push(node_id.clone());
                }
                Some(Err(e)) => {
                    log::error!("Node {} failed: {:#}", node_id, e);
                    self.set_status(graph, node_id, NodeStatus::Error);
                    report.visited.push(node_id.clone());
                    report.failures.push(NodeFailure {
                        node_id: node_id.clone(),
                        message: format!("{:#}", e),
                    });
                    if !self.config.continue_on_error {
                        report.outcome = RunOutcome::Aborted;
                        break;
                    }
                }
            }
        }

        match report.outcome {
            RunOutcome::Completed => log::info!(
                "Run completed: {} nodes, {} failed",
                report.visited.len(),
                report.failures.len()
            ),
            RunOutcome::Cancelled => log::info!(
                "Run cancelled after {}/{} nodes",
                report.visited.len(),
                plan.len()
            ),
            RunOutcome::Aborted => log::warn!(
                "Run aborted after {}/{} nodes",
                report.visited.len(),
                plan.len()
            ),
        }

        Ok(report)
    }
}
