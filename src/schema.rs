use crate::nodes::{self, NodeConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Trigger,
    Action,
    Condition,
    Loop,
    Delay,
    Email,
    Webhook,
    Notification,
    Database,
    Code,
    End,
}

impl NodeType {
    pub const ALL: [NodeType; 11] = [
        NodeType::Trigger,
        NodeType::Action,
        NodeType::Condition,
        NodeType::Loop,
        NodeType::Delay,
        NodeType::Email,
        NodeType::Webhook,
        NodeType::Notification,
        NodeType::Database,
        NodeType::Code,
        NodeType::End,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Trigger => "trigger",
            NodeType::Action => "action",
            NodeType::Condition => "condition",
            NodeType::Loop => "loop",
            NodeType::Delay => "delay",
            NodeType::Email => "email",
            NodeType::Webhook => "webhook",
            NodeType::Notification => "notification",
            NodeType::Database => "database",
            NodeType::Code => "code",
            NodeType::End => "end",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution-visualization state of a node. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    #[default]
    Idle,
    Running,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Output port a connection leaves from.
///
/// `Default` is the single `output` port of ordinary nodes; `True` and
/// `False` only exist on condition nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourcePort {
    Default,
    True,
    False,
}

impl SourcePort {
    /// Name of the output port this refers to on the source node.
    pub fn port_name(&self) -> &'static str {
        match self {
            SourcePort::Default => nodes::OUTPUT_PORT,
            SourcePort::True => nodes::TRUE_PORT,
            SourcePort::False => nodes::FALSE_PORT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNode", into = "RawNode")]
pub struct Node {
    pub id: String,
    pub node_type: NodeType,
    pub title: String,
    pub description: String,
    pub position: Position,
    pub config: NodeConfig,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub status: NodeStatus,
}

impl Node {
    pub fn exposes_output(&self, port: SourcePort) -> bool {
        self.outputs.iter().any(|p| p == port.port_name())
    }

    pub fn accepts_input(&self) -> bool {
        !self.inputs.is_empty()
    }
}

/// Wire shape of a node: the config stays an untyped object until the
/// declared type tells us which struct to read it into.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawNode {
    id: String,
    #[serde(rename = "type")]
    node_type: NodeType,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    position: Position,
    #[serde(default)]
    config: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inputs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    outputs: Option<Vec<String>>,
}

impl TryFrom<RawNode> for Node {
    type Error = serde_json::Error;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let template = nodes::template(raw.node_type);
        let config = NodeConfig::from_value(raw.node_type, raw.config)?;
        Ok(Node {
            id: raw.id,
            node_type: raw.node_type,
            title: raw.title,
            description: raw.description,
            position: raw.position,
            config,
            inputs: raw.inputs.unwrap_or_else(|| template.input_ports()),
            outputs: raw.outputs.unwrap_or_else(|| template.output_ports()),
            status: NodeStatus::Idle,
        })
    }
}

impl From<Node> for RawNode {
    fn from(node: Node) -> Self {
        RawNode {
            id: node.id,
            node_type: node.node_type,
            title: node.title,
            description: node.description,
            position: node.position,
            config: node.config.to_value(),
            inputs: Some(node.inputs),
            outputs: Some(node.outputs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub source_port: SourcePort,
}

/// The node and connection sets of a workflow.
///
/// Both lists keep insertion order, which the planner relies on to order
/// sibling edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// Immutable copy of a graph, as stored in history and handed to persistence.
pub type Snapshot = Graph;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(default = "new_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(flatten)]
    pub graph: Graph,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Workflow {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: name.into(),
            is_active: false,
            graph: Graph::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::ConditionOperator;

    #[test]
    fn test_node_type_serialization() {
        assert_eq!(
            serde_json::to_string(&NodeType::Notification).unwrap(),
            "\"notification\""
        );
        let parsed: NodeType = serde_json::from_str("\"webhook\"").unwrap();
        assert_eq!(parsed, NodeType::Webhook);
        assert_eq!(NodeType::End.to_string(), "end");
    }

    #[test]
    fn test_node_reads_typed_config_and_fills_ports() {
        let node: Node = serde_json::from_value(serde_json::json!({
            "id": "n1",
            "type": "condition",
            "title": "Check plan",
            "position": {"x": 10.0, "y": 20.0},
            "config": {"field": "plan", "operator": "equals", "value": "pro"}
        }))
        .unwrap();

        assert_eq!(node.node_type, NodeType::Condition);
        assert_eq!(node.inputs, vec!["input"]);
        assert_eq!(node.outputs, vec!["true", "false"]);
        assert_eq!(node.status, NodeStatus::Idle);
        match node.config {
            NodeConfig::Condition(cfg) => {
                assert_eq!(cfg.field, "plan");
                assert_eq!(cfg.operator, ConditionOperator::Equals);
                assert_eq!(cfg.value, "pro");
            }
            other => panic!("unexpected config: {:?}", other),
        }
    }

    #[test]
    fn test_status_is_not_serialized() {
        let mut node: Node = serde_json::from_value(serde_json::json!({
            "id": "n1",
            "type": "end"
        }))
        .unwrap();
        node.status = NodeStatus::Running;

        let json = serde_json::to_value(&node).unwrap();
        assert!(json.get("status").is_none());
        assert_eq!(json["type"], "end");
        assert_eq!(json["outputs"], serde_json::json!([]));
    }

    #[test]
    fn test_bad_config_is_rejected() {
        let result: Result<Node, _> = serde_json::from_value(serde_json::json!({
            "id": "n1",
            "type": "delay",
            "config": {"duration": "soon"}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_workflow_from_yaml_fills_metadata() {
        let yaml = r#"
name: Lead follow-up
nodes:
  - id: start
    type: trigger
  - id: mail
    type: email
    config:
      to: sales@example.com
connections:
  - id: c1
    source_id: start
    target_id: mail
    source_port: default
"#;
        let workflow: Workflow = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(workflow.name, "Lead follow-up");
        assert!(!workflow.is_active);
        assert!(!workflow.id.is_empty());
        assert_eq!(workflow.graph.nodes.len(), 2);
        assert_eq!(workflow.graph.connections[0].source_port, SourcePort::Default);
        assert!(workflow.graph.validate().is_ok());
    }

    #[test]
    fn test_source_port_names() {
        assert_eq!(SourcePort::Default.port_name(), "output");
        assert_eq!(SourcePort::True.port_name(), "true");
        assert_eq!(SourcePort::False.port_name(), "false");
    }
}
