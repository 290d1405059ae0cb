use crate::schema::NodeType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// What starts the workflow, e.g. `manual`, `form_submit`, `schedule`.
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            event: "form_submit".to_string(),
            schedule: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    pub action: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    #[default]
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionConfig {
    pub field: String,
    pub operator: ConditionOperator,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Field holding the collection to iterate.
    pub items: String,
    pub max_iterations: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            items: String::new(),
            max_iterations: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayUnit {
    #[default]
    Seconds,
    Minutes,
    Hours,
    Days,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    pub duration: u64,
    pub unit: DelayUnit,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            duration: 5,
            unit: DelayUnit::Minutes,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
    Put,
    Patch,
    Delete,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    pub url: String,
    pub method: HttpMethod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub channel: String,
    pub message: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            channel: "in_app".to_string(),
            message: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseOperation {
    #[default]
    Insert,
    Update,
    Delete,
    Query,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub operation: DatabaseOperation,
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeConfig {
    pub language: String,
    pub code: String,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            language: "javascript".to_string(),
            code: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndConfig {}

/// Per-type node configuration. The variant always matches the owning
/// node's `NodeType`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeConfig {
    Trigger(TriggerConfig),
    Action(ActionConfig),
    Condition(ConditionConfig),
    Loop(LoopConfig),
    Delay(DelayConfig),
    Email(EmailConfig),
    Webhook(WebhookConfig),
    Notification(NotificationConfig),
    Database(DatabaseConfig),
    Code(CodeConfig),
    End(EndConfig),
}

impl NodeConfig {
    pub fn default_for(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Trigger => NodeConfig::Trigger(TriggerConfig::default()),
            NodeType::Action => NodeConfig::Action(ActionConfig::default()),
            NodeType::Condition => NodeConfig::Condition(ConditionConfig::default()),
            NodeType::Loop => NodeConfig::Loop(LoopConfig::default()),
            NodeType::Delay => NodeConfig::Delay(DelayConfig::default()),
            NodeType::Email => NodeConfig::Email(EmailConfig::default()),
            NodeType::Webhook => NodeConfig::Webhook(WebhookConfig::default()),
            NodeType::Notification => NodeConfig::Notification(NotificationConfig::default()),
            NodeType::Database => NodeConfig::Database(DatabaseConfig::default()),
            NodeType::Code => NodeConfig::Code(CodeConfig::default()),
            NodeType::End => NodeConfig::End(EndConfig::default()),
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeConfig::Trigger(_) => NodeType::Trigger,
            NodeConfig::Action(_) => NodeType::Action,
            NodeConfig::Condition(_) => NodeType::Condition,
            NodeConfig::Loop(_) => NodeType::Loop,
            NodeConfig::Delay(_) => NodeType::Delay,
            NodeConfig::Email(_) => NodeType::Email,
            NodeConfig::Webhook(_) => NodeType::Webhook,
            NodeConfig::Notification(_) => NodeType::Notification,
            NodeConfig::Database(_) => NodeType::Database,
            NodeConfig::Code(_) => NodeType::Code,
            NodeConfig::End(_) => NodeType::End,
        }
    }

    /// Reads a JSON object into the config struct for `node_type`.
    /// Missing fields take their defaults; `null` yields the full default.
    pub fn from_value(node_type: NodeType, value: Value) -> Result<Self, serde_json::Error> {
        if value.is_null() {
            return Ok(Self::default_for(node_type));
        }
        let config = match node_type {
            NodeType::Trigger => NodeConfig::Trigger(serde_json::from_value(value)?),
            NodeType::Action => NodeConfig::Action(serde_json::from_value(value)?),
            NodeType::Condition => NodeConfig::Condition(serde_json::from_value(value)?),
            NodeType::Loop => NodeConfig::Loop(serde_json::from_value(value)?),
            NodeType::Delay => NodeConfig::Delay(serde_json::from_value(value)?),
            NodeType::Email => NodeConfig::Email(serde_json::from_value(value)?),
            NodeType::Webhook => NodeConfig::Webhook(serde_json::from_value(value)?),
            NodeType::Notification => NodeConfig::Notification(serde_json::from_value(value)?),
            NodeType::Database => NodeConfig::Database(serde_json::from_value(value)?),
            NodeType::Code => NodeConfig::Code(serde_json::from_value(value)?),
            NodeType::End => NodeConfig::End(serde_json::from_value(value)?),
        };
        Ok(config)
    }

    pub fn to_value(&self) -> Value {
        let value = match self {
            NodeConfig::Trigger(c) => serde_json::to_value(c),
            NodeConfig::Action(c) => serde_json::to_value(c),
            NodeConfig::Condition(c) => serde_json::to_value(c),
            NodeConfig::Loop(c) => serde_json::to_value(c),
            NodeConfig::Delay(c) => serde_json::to_value(c),
            NodeConfig::Email(c) => serde_json::to_value(c),
            NodeConfig::Webhook(c) => serde_json::to_value(c),
            NodeConfig::Notification(c) => serde_json::to_value(c),
            NodeConfig::Database(c) => serde_json::to_value(c),
            NodeConfig::Code(c) => serde_json::to_value(c),
            NodeConfig::End(c) => serde_json::to_value(c),
        };
        // Plain structs of strings, integers and unit enums always serialize.
        value.unwrap_or(Value::Null)
    }
}
