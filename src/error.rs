use crate::schema::NodeType;
use thiserror::Error;

/// Errors surfaced by the workflow core.
///
/// Most rejected edits (self-loops, duplicate connections, unknown ids,
/// undo past the first entry) are not errors: the operation reports that it
/// had no effect instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    #[error("Workflow has no trigger node; execution cannot start")]
    NoTrigger,

    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    #[error("Node '{node_id}' is of type '{expected}' but was given a '{found}' config")]
    ConfigMismatch {
        node_id: String,
        expected: NodeType,
        found: NodeType,
    },

    #[error("Invalid workflow graph: {0}")]
    InvalidGraph(String),
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
