//! Static registry of node types: display defaults, port shapes and typed
//! configuration.

use crate::schema::NodeType;

mod config;

pub use config::{
    ActionConfig, CodeConfig, ConditionConfig, ConditionOperator, DatabaseConfig,
    DatabaseOperation, DelayConfig, DelayUnit, EmailConfig, EndConfig, HttpMethod, LoopConfig,
    NodeConfig, NotificationConfig, TriggerConfig, WebhookConfig,
};

pub const INPUT_PORT: &str = "input";
pub const OUTPUT_PORT: &str = "output";
pub const TRUE_PORT: &str = "true";
pub const FALSE_PORT: &str = "false";

const NO_PORTS: &[&str] = &[];
const SINGLE_INPUT: &[&str] = &[INPUT_PORT];
const SINGLE_OUTPUT: &[&str] = &[OUTPUT_PORT];
const BRANCH_OUTPUTS: &[&str] = &[TRUE_PORT, FALSE_PORT];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeTemplate {
    pub node_type: NodeType,
    pub title: &'static str,
    pub description: &'static str,
    pub inputs: &'static [&'static str],
    pub outputs: &'static [&'static str],
}

impl NodeTemplate {
    pub fn input_ports(&self) -> Vec<String> {
        self.inputs.iter().map(|p| p.to_string()).collect()
    }

    pub fn output_ports(&self) -> Vec<String> {
        self.outputs.iter().map(|p| p.to_string()).collect()
    }

    pub fn default_config(&self) -> NodeConfig {
        NodeConfig::default_for(self.node_type)
    }
}

static TEMPLATES: [NodeTemplate; 11] = [
    NodeTemplate {
        node_type: NodeType::Trigger,
        title: "Form Submitted",
        description: "Starts the workflow when a form is submitted",
        inputs: NO_PORTS,
        outputs: SINGLE_OUTPUT,
    },
    NodeTemplate {
        node_type: NodeType::Action,
        title: "Action",
        description: "Performs a generic action",
        inputs: SINGLE_INPUT,
        outputs: SINGLE_OUTPUT,
    },
    NodeTemplate {
        node_type: NodeType::Condition,
        title: "Condition",
        description: "Branches on a field comparison",
        inputs: SINGLE_INPUT,
        outputs: BRANCH_OUTPUTS,
    },
    NodeTemplate {
        node_type: NodeType::Loop,
        title: "Loop",
        description: "Repeats the following steps for each item",
        inputs: SINGLE_INPUT,
        outputs: SINGLE_OUTPUT,
    },
    NodeTemplate {
        node_type: NodeType::Delay,
        title: "Delay",
        description: "Waits before continuing",
        inputs: SINGLE_INPUT,
        outputs: SINGLE_OUTPUT,
    },
    NodeTemplate {
        node_type: NodeType::Email,
        title: "Send Email",
        description: "Sends an email message",
        inputs: SINGLE_INPUT,
        outputs: SINGLE_OUTPUT,
    },
    NodeTemplate {
        node_type: NodeType::Webhook,
        title: "Webhook",
        description: "Calls an external HTTP endpoint",
        inputs: SINGLE_INPUT,
        outputs: SINGLE_OUTPUT,
    },
    NodeTemplate {
        node_type: NodeType::Notification,
        title: "Notification",
        description: "Sends a notification to a channel",
        inputs: SINGLE_INPUT,
        outputs: SINGLE_OUTPUT,
    },
    NodeTemplate {
        node_type: NodeType::Database,
        title: "Database",
        description: "Reads or writes a database table",
        inputs: SINGLE_INPUT,
        outputs: SINGLE_OUTPUT,
    },
    NodeTemplate {
        node_type: NodeType::Code,
        title: "Run Code",
        description: "Runs a custom script",
        inputs: SINGLE_INPUT,
        outputs: SINGLE_OUTPUT,
    },
    NodeTemplate {
        node_type: NodeType::End,
        title: "End",
        description: "Ends the workflow",
        inputs: SINGLE_INPUT,
        outputs: NO_PORTS,
    },
];

pub fn templates() -> &'static [NodeTemplate] {
    &TEMPLATES
}

pub fn template(node_type: NodeType) -> &'static NodeTemplate {
    // TEMPLATES is declared in NodeType::ALL order.
    &TEMPLATES[node_type as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_every_type_in_order() {
        assert_eq!(templates().len(), NodeType::ALL.len());
        for node_type in NodeType::ALL {
            assert_eq!(template(node_type).node_type, node_type);
        }
    }

    #[test]
    fn test_port_shapes() {
        assert!(template(NodeType::Trigger).inputs.is_empty());
        assert_eq!(template(NodeType::Trigger).outputs, &["output"]);
        assert_eq!(template(NodeType::Condition).outputs, &["true", "false"]);
        assert!(template(NodeType::End).outputs.is_empty());
        assert_eq!(template(NodeType::Email).inputs, &["input"]);
    }

    #[test]
    fn test_default_config_from_template() {
        match template(NodeType::Code).default_config() {
            NodeConfig::Code(cfg) => assert_eq!(cfg.language, "javascript"),
            other => panic!("unexpected config: {:?}", other),
        }
    }
}
