//! Graph core of a visual workflow builder.
//!
//! A [`WorkflowEditor`] owns one workflow being edited: its nodes and
//! connections, linear undo/redo over graph snapshots, a breadth-first
//! execution plan from the trigger node, and an [`Engine`] that animates a
//! run over that plan.

pub mod config;
pub mod editor;
pub mod engine;
pub mod error;
pub mod executor;
pub mod graph;
pub mod history;
pub mod nodes;
pub mod planner;
pub mod schema;

pub use config::EngineConfig;
pub use editor::WorkflowEditor;
pub use engine::{Engine, NodeFailure, RunOutcome, RunReport, StatusEvent};
pub use error::{Result, WorkflowError};
pub use executor::{NodeExecutor, SimulatedExecutor};
pub use history::History;
pub use nodes::{NodeConfig, NodeTemplate};
pub use planner::{plan_execution, plan_from};
pub use schema::{
    Connection, Graph, Node, NodeStatus, NodeType, Position, Snapshot, SourcePort, Workflow,
};
