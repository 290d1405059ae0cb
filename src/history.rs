use crate::schema::Snapshot;

pub const DEFAULT_HISTORY_LIMIT: usize = 128;

/// Linear undo/redo over full graph snapshots.
///
/// `entries[cursor]` is always the last recorded (or restored) state. A new
/// record after an undo discards everything past the cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    cursor: Option<usize>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// `limit` is the maximum number of retained snapshots (at least one).
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            limit: limit.max(1),
        }
    }

    pub fn record(&mut self, snapshot: Snapshot) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
        self.entries.push(snapshot);

        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(0..excess);
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    pub fn undo(&mut self) -> Option<&Snapshot> {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                self.entries.get(c - 1)
            }
            _ => None,
        }
    }

    pub fn redo(&mut self) -> Option<&Snapshot> {
        match self.cursor {
            Some(c) if c + 1 < self.entries.len() => {
                self.cursor = Some(c + 1);
                self.entries.get(c + 1)
            }
            _ => None,
        }
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 < self.entries.len())
    }

    /// Drops all entries and starts over from `snapshot`.
    pub fn reset(&mut self, snapshot: Snapshot) {
        self.entries.clear();
        self.cursor = None;
        self.record(snapshot);
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the current entry, `None` while empty.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Graph, NodeType};

    fn graph_with(count: usize) -> Snapshot {
        let mut graph = Graph::default();
        for _ in 0..count {
            graph.add_node(NodeType::Action, None);
        }
        graph
    }

    #[test]
    fn test_empty_history() {
        let mut history = History::default();
        assert_eq!(history.cursor(), None);
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert!(history.current().is_none());
    }

    #[test]
    fn test_undo_redo_walks_cursor() {
        let (s0, s1, s2) = (graph_with(0), graph_with(1), graph_with(2));
        let mut history = History::default();
        history.record(s0.clone());
        history.record(s1.clone());
        history.record(s2.clone());

        assert_eq!(history.undo(), Some(&s1));
        assert_eq!(history.undo(), Some(&s0));
        assert!(history.undo().is_none());
        assert_eq!(history.cursor(), Some(0));

        assert_eq!(history.redo(), Some(&s1));
        assert_eq!(history.redo(), Some(&s2));
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_record_discards_redo_branch() {
        let mut history = History::default();
        history.record(graph_with(0));
        history.record(graph_with(1));
        history.undo();
        assert!(history.can_redo());

        let fresh = graph_with(3);
        history.record(fresh.clone());
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
        assert_eq!(history.len(), 2);
        assert_eq!(history.current(), Some(&fresh));
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::new(2);
        history.record(graph_with(0));
        history.record(graph_with(1));
        let last = graph_with(2);
        history.record(last.clone());

        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), Some(1));
        assert_eq!(history.current(), Some(&last));
        assert!(history.undo().is_some());
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_reset() {
        let mut history = History::default();
        history.record(graph_with(0));
        history.record(graph_with(1));
        history.reset(graph_with(4));
        assert_eq!(history.len(), 1);
        assert!(!history.can_undo());
    }
}
