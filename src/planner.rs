use crate::error::{Result, WorkflowError};
use crate::schema::Graph;
use std::collections::{HashSet, VecDeque};

/// Visitation order starting at the workflow's trigger.
///
/// Fails with [`WorkflowError::NoTrigger`] when the graph has none, so an
/// empty workflow is never confused with a trigger that has no outgoing
/// edges. If several triggers exist the first one added wins.
pub fn plan_execution(graph: &Graph) -> Result<Vec<String>> {
    let mut triggers = graph.triggers();
    let trigger = triggers.next().ok_or(WorkflowError::NoTrigger)?;
    if triggers.next().is_some() {
        log::warn!(
            "Workflow has more than one trigger; planning from {}",
            trigger.id
        );
    }
    plan_from(graph, &trigger.id)
}

/// Breadth-first visitation order from `start_id`.
///
/// Sibling edges are followed in connection insertion order. Every node
/// reachable from the start appears exactly once; unreachable nodes are
/// left out. Both branches of a condition are followed.
pub fn plan_from(graph: &Graph, start_id: &str) -> Result<Vec<String>> {
    let start = graph
        .node(start_id)
        .ok_or_else(|| WorkflowError::NodeNotFound(start_id.to_string()))?;

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    let mut order = vec![start.id.clone()];

    visited.insert(start.id.as_str());
    queue.push_back(start.id.as_str());

    while let Some(current) = queue.pop_front() {
        for conn in graph.outgoing(current) {
            let target = conn.target_id.as_str();
            if visited.insert(target) {
                queue.push_back(target);
                order.push(conn.target_id.clone());
            }
        }
    }

    log::debug!("Planned {} of {} nodes", order.len(), graph.nodes.len());
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{NodeType, SourcePort};

    #[test]
    fn test_empty_graph_has_no_trigger() {
        assert_eq!(plan_execution(&Graph::default()), Err(WorkflowError::NoTrigger));
    }

    #[test]
    fn test_lone_trigger_plans_itself() {
        let mut graph = Graph::default();
        let t = graph.add_node(NodeType::Trigger, None);
        assert_eq!(plan_execution(&graph), Ok(vec![t.id]));
    }

    #[test]
    fn test_breadth_first_order_follows_insertion() {
        let mut graph = Graph::default();
        let t = graph.add_node(NodeType::Trigger, None);
        let cond = graph.add_node(NodeType::Condition, None);
        let yes = graph.add_node(NodeType::Email, None);
        let no = graph.add_node(NodeType::Notification, None);
        let end = graph.add_node(NodeType::End, None);
        let orphan = graph.add_node(NodeType::Code, None);

        graph.connect(&t.id, SourcePort::Default, &cond.id).unwrap();
        // false edge first: sibling order is insertion order, not port order
        graph.connect(&cond.id, SourcePort::False, &no.id).unwrap();
        graph.connect(&cond.id, SourcePort::True, &yes.id).unwrap();
        graph.connect(&yes.id, SourcePort::Default, &end.id).unwrap();
        graph.connect(&no.id, SourcePort::Default, &end.id).unwrap();

        let order = plan_execution(&graph).unwrap();
        assert_eq!(order, vec![t.id, cond.id, no.id, yes.id, end.id]);
        assert!(!order.contains(&orphan.id));
    }

    #[test]
    fn test_cycles_terminate() {
        let mut graph = Graph::default();
        let t = graph.add_node(NodeType::Trigger, None);
        let a = graph.add_node(NodeType::Loop, None);
        let b = graph.add_node(NodeType::Action, None);
        graph.connect(&t.id, SourcePort::Default, &a.id).unwrap();
        graph.connect(&a.id, SourcePort::Default, &b.id).unwrap();
        graph.connect(&b.id, SourcePort::Default, &a.id).unwrap();

        assert_eq!(plan_execution(&graph), Ok(vec![t.id, a.id, b.id]));
    }

    #[test]
    fn test_plan_from_any_start() {
        let mut graph = Graph::default();
        let t = graph.add_node(NodeType::Trigger, None);
        let a = graph.add_node(NodeType::Action, None);
        let b = graph.add_node(NodeType::End, None);
        graph.connect(&t.id, SourcePort::Default, &a.id).unwrap();
        graph.connect(&a.id, SourcePort::Default, &b.id).unwrap();

        assert_eq!(plan_from(&graph, &a.id), Ok(vec![a.id.clone(), b.id]));
        assert_eq!(
            plan_from(&graph, "nope"),
            Err(WorkflowError::NodeNotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_first_trigger_wins() {
        let mut graph = Graph::default();
        let first = graph.add_node(NodeType::Trigger, None);
        let _second = graph.add_node(NodeType::Trigger, None);
        assert_eq!(plan_execution(&graph), Ok(vec![first.id]));
    }
}
