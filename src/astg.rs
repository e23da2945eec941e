//! Activity stack transition graph.
//!
//! # Structure
//!
//! Nodes are distinct [`ActivityStack`] values stored in an arena and
//! addressed by [`StackId`]. A stack is interned on first sight and keeps its
//! id for the lifetime of the graph, so looking up the same content twice
//! always yields the same node.
//!
//! Edges are keyed by `(source, target)` only. Every transition connecting
//! the same pair lands in one [`AstgEdge`], which holds the list of
//! [`Transition`]s (callback sequence plus launch configuration) realizing it.
//!
//! The graph only grows: nothing is ever removed.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::launch::LaunchConfiguration;
use crate::reference::{EdgeId, StackId};
use crate::sequence::MethodSequence;
use crate::stack::ActivityStack;

/// One way of moving between two stacks.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Transition {
    pub sequence: MethodSequence,
    pub config: LaunchConfiguration,
}

impl Transition {
    pub fn new(sequence: MethodSequence, config: LaunchConfiguration) -> Self {
        Self { sequence, config }
    }

    pub fn is_finish(&self) -> bool {
        self.config.is_finish()
    }
}

/// A merged edge between two stacks.
#[derive(Debug, Clone)]
pub struct AstgEdge {
    pub source: StackId,
    pub target: StackId,
    transitions: Vec<Transition>,
}

impl AstgEdge {
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn configs(&self) -> impl Iterator<Item = LaunchConfiguration> + '_ {
        self.transitions.iter().map(|t| t.config)
    }

    pub fn is_self_transition(&self) -> bool {
        self.source == self.target
    }

    pub fn has_finish(&self) -> bool {
        self.transitions.iter().any(Transition::is_finish)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActivityStackTransitionGraph {
    stacks: Vec<ActivityStack>,
    index: HashMap<ActivityStack, StackId>,
    edges: Vec<AstgEdge>,
    edge_index: HashMap<(StackId, StackId), EdgeId>,
    outgoing: Vec<Vec<EdgeId>>,
    incoming: Vec<Vec<EdgeId>>,
    init: Option<StackId>,
}

impl ActivityStackTransitionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `stack`, returning its node and whether it was newly created.
    pub fn node_or_insert(&mut self, stack: ActivityStack) -> (StackId, bool) {
        if let Some(&id) = self.index.get(&stack) {
            return (id, false);
        }
        let id = StackId::from_index(self.stacks.len());
        self.stacks.push(stack.clone());
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        self.index.insert(stack, id);
        (id, true)
    }

    pub fn lookup(&self, stack: &ActivityStack) -> Option<StackId> {
        self.index.get(stack).copied()
    }

    pub fn contains(&self, stack: &ActivityStack) -> bool {
        self.index.contains_key(stack)
    }

    pub fn stack(&self, id: StackId) -> &ActivityStack {
        assert!(id.index() < self.stacks.len(), "Unknown stack node {}", id);
        &self.stacks[id.index()]
    }

    /// All nodes, in discovery order.
    pub fn nodes(&self) -> impl Iterator<Item = (StackId, &ActivityStack)> + '_ {
        self.stacks
            .iter()
            .enumerate()
            .map(|(i, s)| (StackId::from_index(i), s))
    }

    /// Nodes whose top activity is `activity`.
    pub fn nodes_with_top<'a>(&'a self, activity: &'a str) -> impl Iterator<Item = StackId> + 'a {
        self.nodes()
            .filter(move |(_, s)| s.top().is_some_and(|top| top == activity))
            .map(|(id, _)| id)
    }

    pub fn set_init_stack(&mut self, id: StackId) {
        assert!(id.index() < self.stacks.len(), "Unknown stack node {}", id);
        self.init = Some(id);
    }

    /// The designated initial stack, if one was set.
    pub fn init_stack(&self) -> Option<StackId> {
        self.init
    }

    /// Appends a transition to the edge `source -> target`, creating the edge if needed.
    pub fn add_transition(
        &mut self,
        source: StackId,
        target: StackId,
        sequence: MethodSequence,
        config: LaunchConfiguration,
    ) -> EdgeId {
        assert!(source.index() < self.stacks.len(), "Unknown stack node {}", source);
        assert!(target.index() < self.stacks.len(), "Unknown stack node {}", target);
        let id = match self.edge_index.get(&(source, target)) {
            Some(&id) => id,
            None => {
                let id = EdgeId::from_index(self.edges.len());
                self.edges.push(AstgEdge {
                    source,
                    target,
                    transitions: Vec::new(),
                });
                self.edge_index.insert((source, target), id);
                self.outgoing[source.index()].push(id);
                self.incoming[target.index()].push(id);
                id
            }
        };
        self.edges[id.index()].transitions.push(Transition::new(sequence, config));
        id
    }

    pub fn edge(&self, id: EdgeId) -> &AstgEdge {
        assert!(id.index() < self.edges.len(), "Unknown stack edge {}", id);
        &self.edges[id.index()]
    }

    pub fn edge_between(&self, source: StackId, target: StackId) -> Option<&AstgEdge> {
        self.edge_index.get(&(source, target)).map(|&id| self.edge(id))
    }

    pub fn edges(&self) -> impl Iterator<Item = &AstgEdge> + '_ {
        self.edges.iter()
    }

    pub fn outgoing(&self, id: StackId) -> impl Iterator<Item = &AstgEdge> + '_ {
        assert!(id.index() < self.stacks.len(), "Unknown stack node {}", id);
        self.outgoing[id.index()].iter().map(|&e| &self.edges[e.index()])
    }

    pub fn incoming(&self, id: StackId) -> impl Iterator<Item = &AstgEdge> + '_ {
        assert!(id.index() < self.stacks.len(), "Unknown stack node {}", id);
        self.incoming[id.index()].iter().map(|&e| &self.edges[e.index()])
    }

    /// Target of the finish (back press) edge leaving `id`, if any.
    pub fn finish_target(&self, id: StackId) -> Option<StackId> {
        self.outgoing(id).find(|e| e.has_finish()).map(|e| e.target)
    }

    pub fn node_count(&self) -> usize {
        self.stacks.len()
    }

    /// Number of merged `(source, target)` edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of individual transitions over all edges.
    pub fn transition_count(&self) -> usize {
        self.edges.iter().map(|e| e.transitions.len()).sum()
    }

    /// Stacks reachable from the initial stack, in BFS order.
    pub fn reachable_stacks(&self) -> Vec<StackId> {
        let Some(init) = self.init else {
            return Vec::new();
        };
        let mut seen = HashSet::from([init]);
        let mut order = vec![init];
        let mut queue = VecDeque::from([init]);
        while let Some(id) = queue.pop_front() {
            for edge in self.outgoing(id) {
                if seen.insert(edge.target) {
                    order.push(edge.target);
                    queue.push_back(edge.target);
                }
            }
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Activity, Callback};

    fn stack(activities: &[&str]) -> ActivityStack {
        ActivityStack::from_top_to_bottom(activities.iter().copied())
    }

    #[test]
    fn test_interning() {
        let mut g = ActivityStackTransitionGraph::new();
        let (a, new_a) = g.node_or_insert(stack(&["Main"]));
        let (b, new_b) = g.node_or_insert(stack(&["A", "Main"]));
        let (a2, new_a2) = g.node_or_insert(stack(&["Main"]));
        assert!(new_a && new_b && !new_a2);
        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.lookup(&stack(&["A", "Main"])), Some(b));
        assert_eq!(g.lookup(&stack(&["B"])), None);
        assert_eq!(g.stack(b), &stack(&["A", "Main"]));
    }

    #[test]
    fn test_edges_merge() {
        let mut g = ActivityStackTransitionGraph::new();
        let (s, _) = g.node_or_insert(stack(&["Main"]));
        let (t, _) = g.node_or_insert(stack(&["A", "Main"]));
        let main = Activity::from("Main");
        let seq = MethodSequence::new().then(&main, Callback::OnPause);

        let e1 = g.add_transition(s, t, seq.clone(), LaunchConfiguration::STANDARD);
        let e2 = g.add_transition(s, t, seq.clone(), LaunchConfiguration::SINGLE_TOP);
        let e3 = g.add_transition(t, s, seq, LaunchConfiguration::FINISH);
        assert_eq!(e1, e2);
        assert_ne!(e1, e3);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.transition_count(), 3);

        let edge = g.edge_between(s, t).unwrap();
        let configs: Vec<_> = edge.configs().collect();
        assert_eq!(configs, vec![LaunchConfiguration::STANDARD, LaunchConfiguration::SINGLE_TOP]);
        assert!(!edge.has_finish());
        assert_eq!(g.finish_target(t), Some(s));
        assert_eq!(g.finish_target(s), None);
        assert_eq!(g.incoming(s).count(), 1);
    }

    #[test]
    fn test_reachable_and_top() {
        let mut g = ActivityStackTransitionGraph::new();
        assert!(g.reachable_stacks().is_empty());
        let (s, _) = g.node_or_insert(stack(&["Main"]));
        let (t, _) = g.node_or_insert(stack(&["A", "Main"]));
        let (u, _) = g.node_or_insert(stack(&["A"]));
        g.set_init_stack(s);
        g.add_transition(s, t, MethodSequence::new(), LaunchConfiguration::STANDARD);
        assert_eq!(g.init_stack(), Some(s));
        assert_eq!(g.reachable_stacks(), vec![s, t]);
        assert_eq!(g.nodes_with_top("A").collect::<Vec<_>>(), vec![t, u]);
    }

    #[test]
    #[should_panic(expected = "Unknown stack node")]
    fn test_unknown_node() {
        let g = ActivityStackTransitionGraph::new();
        g.stack(StackId::new(3));
    }
}
