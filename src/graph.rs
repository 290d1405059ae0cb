use crate::error::{Result, WorkflowError};
use crate::nodes::{self, NodeConfig};
use crate::schema::{Connection, Graph, Node, NodeStatus, NodeType, Position, SourcePort};
use std::collections::HashSet;
use uuid::Uuid;

const DEFAULT_ORIGIN: f64 = 100.0;
const CASCADE_STEP_X: f64 = 50.0;
const CASCADE_STEP_Y: f64 = 30.0;
const DUPLICATE_OFFSET: f64 = 50.0;

impl Graph {
    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    fn node_mut(&mut self, node_id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == node_id)
    }

    pub fn connection(&self, connection_id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == connection_id)
    }

    /// Connections leaving `node_id`, in insertion order.
    pub fn outgoing<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.source_id == node_id)
    }

    pub fn triggers(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.node_type == NodeType::Trigger)
    }

    /// Adds a node of `node_type` with the registry defaults.
    ///
    /// Without a position, new nodes cascade diagonally from (100, 100) so
    /// they do not stack on top of each other.
    pub fn add_node(&mut self, node_type: NodeType, position: Option<Position>) -> Node {
        let template = nodes::template(node_type);
        let n = self.nodes.len() as f64;
        let position = position.unwrap_or_else(|| {
            Position::new(
                DEFAULT_ORIGIN + CASCADE_STEP_X * n,
                DEFAULT_ORIGIN + CASCADE_STEP_Y * n,
            )
        });

        let node = Node {
            id: Uuid::new_v4().to_string(),
            node_type,
            title: template.title.to_string(),
            description: template.description.to_string(),
            position,
            config: template.default_config(),
            inputs: template.input_ports(),
            outputs: template.output_ports(),
            status: NodeStatus::Idle,
        };
        log::debug!("Added {} node {}", node_type, node.id);
        self.nodes.push(node.clone());
        node
    }

    /// Removes a node together with every connection touching it.
    /// Returns `false` if the node did not exist.
    pub fn delete_node(&mut self, node_id: &str) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != node_id);
        if self.nodes.len() == before {
            return false;
        }
        self.connections
            .retain(|c| c.source_id != node_id && c.target_id != node_id);
        log::debug!("Deleted node {}", node_id);
        true
    }

    pub fn duplicate_node(&mut self, node_id: &str) -> Option<Node> {
        let original = self.node(node_id)?;
        let copy = Node {
            id: Uuid::new_v4().to_string(),
            position: original.position.offset(DUPLICATE_OFFSET, DUPLICATE_OFFSET),
            status: NodeStatus::Idle,
            ..original.clone()
        };
        log::debug!("Duplicated node {} as {}", node_id, copy.id);
        self.nodes.push(copy.clone());
        Some(copy)
    }

    pub fn update_node_position(&mut self, node_id: &str, position: Position) -> bool {
        match self.node_mut(node_id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Replaces a node's config. `Ok(false)` if the node does not exist.
    pub fn update_node_config(&mut self, node_id: &str, config: NodeConfig) -> Result<bool> {
        let Some(node) = self.node_mut(node_id) else {
            return Ok(false);
        };
        if config.node_type() != node.node_type {
            return Err(WorkflowError::ConfigMismatch {
                node_id: node_id.to_string(),
                expected: node.node_type,
                found: config.node_type(),
            });
        }
        node.config = config;
        Ok(true)
    }

    pub fn update_node_details(
        &mut self,
        node_id: &str,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> bool {
        match self.node_mut(node_id) {
            Some(node) => {
                node.title = title.into();
                node.description = description.into();
                true
            }
            None => false,
        }
    }

    /// Connects `source_id`'s `port` to `target_id`'s input.
    ///
    /// Returns `None` without touching the graph for self-loops, a second
    /// edge between the same pair of nodes (whatever the port), unknown
    /// nodes, ports the source does not expose and targets with no input.
    pub fn connect(
        &mut self,
        source_id: &str,
        port: SourcePort,
        target_id: &str,
    ) -> Option<Connection> {
        if source_id == target_id {
            log::debug!("Rejected self-loop on {}", source_id);
            return None;
        }
        if self
            .connections
            .iter()
            .any(|c| c.source_id == source_id && c.target_id == target_id)
        {
            log::debug!("Rejected duplicate edge {} -> {}", source_id, target_id);
            return None;
        }
        let source = self.node(source_id)?;
        let target = self.node(target_id)?;
        if !source.exposes_output(port) || !target.accepts_input() {
            log::debug!(
                "Rejected edge {} ({:?}) -> {}: port mismatch",
                source_id,
                port,
                target_id
            );
            return None;
        }

        let connection = Connection {
            id: Uuid::new_v4().to_string(),
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            source_port: port,
        };
        self.connections.push(connection.clone());
        Some(connection)
    }

    pub fn disconnect(&mut self, connection_id: &str) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| c.id != connection_id);
        self.connections.len() != before
    }

    pub fn reset_statuses(&mut self) {
        for node in &mut self.nodes {
            node.status = NodeStatus::Idle;
        }
    }

    pub fn set_status(&mut self, node_id: &str, status: NodeStatus) -> bool {
        match self.node_mut(node_id) {
            Some(node) => {
                node.status = status;
                true
            }
            None => false,
        }
    }

    /// Checks the structural invariants for a graph that came from outside
    /// the editor (a loaded file or a recovered snapshot).
    pub fn validate(&self) -> Result<()> {
        let mut node_ids = HashSet::new();
        for node in &self.nodes {
            if !node_ids.insert(node.id.as_str()) {
                return Err(invalid(format!("duplicate node id '{}'", node.id)));
            }
            let template = nodes::template(node.node_type);
            if node.inputs != template.inputs || node.outputs != template.outputs {
                return Err(invalid(format!(
                    "node '{}' has ports that do not match its type '{}'",
                    node.id, node.node_type
                )));
            }
            if node.config.node_type() != node.node_type {
                return Err(WorkflowError::ConfigMismatch {
                    node_id: node.id.clone(),
                    expected: node.node_type,
                    found: node.config.node_type(),
                });
            }
        }

        let mut connection_ids = HashSet::new();
        let mut pairs = HashSet::new();
        for conn in &self.connections {
            if !connection_ids.insert(conn.id.as_str()) {
                return Err(invalid(format!("duplicate connection id '{}'", conn.id)));
            }
            if conn.source_id == conn.target_id {
                return Err(invalid(format!(
                    "connection '{}' is a self-loop on '{}'",
                    conn.id, conn.source_id
                )));
            }
            if !pairs.insert((conn.source_id.as_str(), conn.target_id.as_str())) {
                return Err(invalid(format!(
                    "more than one connection from '{}' to '{}'",
                    conn.source_id, conn.target_id
                )));
            }
            let source = self
                .node(&conn.source_id)
                .ok_or_else(|| WorkflowError::NodeNotFound(conn.source_id.clone()))?;
            let target = self
                .node(&conn.target_id)
                .ok_or_else(|| WorkflowError::NodeNotFound(conn.target_id.clone()))?;
            if !source.exposes_output(conn.source_port) {
                return Err(invalid(format!(
                    "connection '{}' leaves '{}' from port '{}' which it does not expose",
                    conn.id,
                    conn.source_id,
                    conn.source_port.port_name()
                )));
            }
            if !target.accepts_input() {
                return Err(invalid(format!(
                    "connection '{}' targets '{}' which has no input",
                    conn.id, conn.target_id
                )));
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> WorkflowError {
    WorkflowError::InvalidGraph(message)
}
