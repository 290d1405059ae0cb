use crate::config::EngineConfig;
use crate::engine::{Engine, RunReport};
use crate::error::Result;
use crate::history::History;
use crate::nodes::NodeConfig;
use crate::planner;
use crate::schema::{
    Connection, Graph, Node, NodeType, Position, Snapshot, SourcePort, Workflow,
};
use chrono::Utc;
use tokio_util::sync::CancellationToken;

/// One editing session over a workflow.
///
/// Owns the live workflow and its undo history and keeps them in step:
/// every structural edit that changes the graph records a snapshot, while
/// dragging a node and rejected edits do not.
#[derive(Debug, Clone)]
pub struct WorkflowEditor {
    workflow: Workflow,
    history: History,
    dirty: bool,
}

impl WorkflowEditor {
    pub fn new(name: impl Into<String>) -> Self {
        Self::open(Workflow::new(name), &EngineConfig::default())
    }

    /// Starts a session from an existing workflow. The initial graph is the
    /// first history entry, so the first edit can be undone. A graph that
    /// breaks the structural invariants is rejected.
    pub fn from_workflow(workflow: Workflow, config: &EngineConfig) -> Result<Self> {
        workflow.graph.validate()?;
        Ok(Self::open(workflow, config))
    }

    fn open(mut workflow: Workflow, config: &EngineConfig) -> Self {
        workflow.graph.reset_statuses();
        let mut history = History::new(config.history_limit);
        history.record(workflow.graph.clone());
        log::info!(
            "Opened workflow '{}' with {} nodes",
            workflow.name,
            workflow.graph.nodes.len()
        );
        Self {
            workflow,
            history,
            dirty: false,
        }
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn graph(&self) -> &Graph {
        &self.workflow.graph
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn commit(&mut self) {
        self.workflow.graph.reset_statuses();
        self.history.record(self.workflow.graph.clone());
        self.dirty = true;
    }

    pub fn add_node(&mut self, node_type: NodeType, position: Option<Position>) -> Node {
        let node = self.workflow.graph.add_node(node_type, position);
        self.commit();
        node
    }

    pub fn delete_node(&mut self, node_id: &str) -> bool {
        let changed = self.workflow.graph.delete_node(node_id);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn duplicate_node(&mut self, node_id: &str) -> Option<Node> {
        let copy = self.workflow.graph.duplicate_node(node_id)?;
        self.commit();
        Some(copy)
    }

    /// Moves a node without touching history.
    pub fn update_node_position(&mut self, node_id: &str, position: Position) -> bool {
        let changed = self.workflow.graph.update_node_position(node_id, position);
        if changed {
            self.dirty = true;
        }
        changed
    }

    pub fn update_node_config(&mut self, node_id: &str, config: NodeConfig) -> Result<bool> {
        let changed = self.workflow.graph.update_node_config(node_id, config)?;
        if changed {
            self.commit();
        }
        Ok(changed)
    }

    pub fn update_node_details(
        &mut self,
        node_id: &str,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> bool {
        let changed = self
            .workflow
            .graph
            .update_node_details(node_id, title, description);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn connect(
        &mut self,
        source_id: &str,
        port: SourcePort,
        target_id: &str,
    ) -> Option<Connection> {
        let connection = self.workflow.graph.connect(source_id, port, target_id)?;
        self.commit();
        Some(connection)
    }

    pub fn disconnect(&mut self, connection_id: &str) -> bool {
        let changed = self.workflow.graph.disconnect(connection_id);
        if changed {
            self.commit();
        }
        changed
    }

    /// Restores the previous snapshot. `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.workflow.graph = snapshot.clone();
        self.dirty = true;
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.workflow.graph = snapshot.clone();
        self.dirty = true;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn plan_execution(&self) -> Result<Vec<String>> {
        planner::plan_execution(&self.workflow.graph)
    }

    /// Animates a run over the live graph. Statuses written by the run are
    /// not recorded in history.
    pub async fn run(
        &mut self,
        engine: &Engine,
        cancel: &CancellationToken,
    ) -> Result<RunReport> {
        engine.run(&mut self.workflow.graph, cancel).await
    }

    /// Current nodes and connections, with statuses cleared.
    pub fn snapshot(&self) -> Snapshot {
        let mut graph = self.workflow.graph.clone();
        graph.reset_statuses();
        graph
    }

    /// Replaces the live graph with an externally supplied snapshot, e.g.
    /// when recovering an unsaved draft. Invalid snapshots are rejected and
    /// leave the session untouched. History restarts from the snapshot.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) -> Result<()> {
        snapshot.validate()?;
        let mut graph = snapshot;
        graph.reset_statuses();
        self.history.reset(graph.clone());
        self.workflow.graph = graph;
        self.dirty = true;
        log::info!(
            "Loaded snapshot with {} nodes and {} connections",
            self.workflow.graph.nodes.len(),
            self.workflow.graph.connections.len()
        );
        Ok(())
    }

    /// Stamps `updated_at` and returns the workflow for the caller to
    /// persist. Clears the dirty flag.
    pub fn save(&mut self) -> Workflow {
        self.workflow.updated_at = Utc::now();
        self.dirty = false;
        let mut saved = self.workflow.clone();
        saved.graph.reset_statuses();
        log::info!("Saved workflow '{}'", saved.name);
        saved
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.workflow.name = name.into();
        self.dirty = true;
    }

    pub fn set_active(&mut self, active: bool) {
        self.workflow.is_active = active;
        self.dirty = true;
    }
}
