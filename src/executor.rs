use crate::schema::Node;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Runs a single node during a workflow run.
///
/// `Ok` marks the node `success`, `Err` marks it `error`.
#[async_trait]
pub trait NodeExecutor: Send + Sync {
    async fn execute(&self, node: &Node) -> Result<()>;
}

/// Performs no side effects: waits a fixed delay per node so progress is
/// visible, then reports success.
pub struct SimulatedExecutor {
    delay: Duration,
}

impl SimulatedExecutor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl NodeExecutor for SimulatedExecutor {
    async fn execute(&self, node: &Node) -> Result<()> {
        log::debug!(
            "Simulating {} node {} for {} ms",
            node.node_type,
            node.id,
            self.delay.as_millis()
        );
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Graph, NodeType};

    #[tokio::test(start_paused = true)]
    async fn test_simulated_executor_waits_its_delay() {
        let mut graph = Graph::default();
        let node = graph.add_node(NodeType::Delay, None);
        let executor = SimulatedExecutor::new(Duration::from_millis(500));

        let started = tokio::time::Instant::now();
        executor.execute(&node).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(500));
    }
}
