//! Activity transition graph: the static navigation graph between activities.
//!
//! Nodes are activities, deduplicated by name. An edge `source -> target`
//! exists when some launch site in `source` may start `target`; it carries
//! the set of launch configurations statically possible for those launches.
//! Invalid and finish configurations never make it into the graph.
//!
//! The graph is built once, by whatever extracts navigation from the
//! application, and is read-only for the exploration.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use log::debug;

use crate::launch::LaunchConfiguration;
use crate::reference::ActivityId;
use crate::types::Activity;

/// An edge of the [`ActivityTransitionGraph`].
#[derive(Debug, Clone)]
pub struct AtgEdge {
    pub source: ActivityId,
    pub target: ActivityId,
    /// Possible launch configurations, never containing `invalid` or `finish`.
    pub configs: BTreeSet<LaunchConfiguration>,
}

impl AtgEdge {
    pub fn is_self_transition(&self) -> bool {
        self.source == self.target
    }
}

#[derive(Debug, Clone)]
struct Node {
    activity: Activity,
    /// Outgoing edges, in insertion order.
    outgoing: Vec<AtgEdge>,
}

/// A directed graph over activities; see the [module docs](self).
#[derive(Debug, Clone, Default)]
pub struct ActivityTransitionGraph {
    nodes: Vec<Node>,
    index: HashMap<Activity, ActivityId>,
    edge_count: usize,
    /// Activity-level projection of back-press transitions observed on a stack graph.
    finish_edges: HashMap<ActivityId, BTreeSet<ActivityId>>,
}

impl ActivityTransitionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node of `activity`, creating it on first use.
    pub fn node(&mut self, activity: impl Into<Activity>) -> ActivityId {
        let activity = activity.into();
        if let Some(&id) = self.index.get(&activity) {
            return id;
        }
        let id = ActivityId::from_index(self.nodes.len());
        self.nodes.push(Node {
            activity: activity.clone(),
            outgoing: Vec::new(),
        });
        self.index.insert(activity, id);
        id
    }

    /// Looks up the node of an activity without creating it.
    pub fn find(&self, activity: &str) -> Option<ActivityId> {
        self.index.get(activity).copied()
    }

    pub fn activity(&self, id: ActivityId) -> &Activity {
        assert!(id.index() < self.nodes.len(), "Unknown activity node {}", id);
        &self.nodes[id.index()].activity
    }

    pub fn activities(&self) -> impl Iterator<Item = (ActivityId, &Activity)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (ActivityId::from_index(i), &n.activity))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct `(source, target)` edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Adds `config` to the edge `source -> target`, creating the edge if needed.
    ///
    /// Invalid and finish configurations are dropped: the edge is neither
    /// created nor extended, and `None` is returned. Finish transitions are
    /// synthesized during exploration, never launched.
    pub fn add_edge(
        &mut self,
        source: ActivityId,
        target: ActivityId,
        config: LaunchConfiguration,
    ) -> Option<&AtgEdge> {
        assert!(source.index() < self.nodes.len(), "Unknown activity node {}", source);
        assert!(target.index() < self.nodes.len(), "Unknown activity node {}", target);
        if config.is_invalid() || config.is_finish() {
            debug!(
                "dropping {} launch {} -> {}",
                config,
                self.activity(source),
                self.activity(target)
            );
            return None;
        }
        let outgoing = &mut self.nodes[source.index()].outgoing;
        let position = match outgoing.iter().position(|e| e.target == target) {
            Some(i) => i,
            None => {
                outgoing.push(AtgEdge {
                    source,
                    target,
                    configs: BTreeSet::new(),
                });
                self.edge_count += 1;
                outgoing.len() - 1
            }
        };
        let edge = &mut outgoing[position];
        edge.configs.insert(config);
        Some(&*edge)
    }

    /// Name-based convenience for [`add_edge`](Self::add_edge).
    pub fn add_transition(
        &mut self,
        source: impl Into<Activity>,
        target: impl Into<Activity>,
        config: LaunchConfiguration,
    ) -> bool {
        let source = self.node(source);
        let target = self.node(target);
        self.add_edge(source, target, config).is_some()
    }

    pub fn outgoing(&self, id: ActivityId) -> &[AtgEdge] {
        assert!(id.index() < self.nodes.len(), "Unknown activity node {}", id);
        &self.nodes[id.index()].outgoing
    }

    /// Outgoing edges of an activity by name; empty for unknown activities.
    pub fn outgoing_of(&self, activity: &str) -> &[AtgEdge] {
        match self.find(activity) {
            Some(id) => self.outgoing(id),
            None => &[],
        }
    }

    pub fn edge(&self, source: ActivityId, target: ActivityId) -> Option<&AtgEdge> {
        self.outgoing(source).iter().find(|e| e.target == target)
    }

    pub fn edges(&self) -> impl Iterator<Item = &AtgEdge> + '_ {
        self.nodes.iter().flat_map(|n| n.outgoing.iter())
    }

    /// Activities reachable from `main` (including `main`), in BFS order.
    pub fn reachable_from(&self, main: &str) -> Vec<ActivityId> {
        let Some(start) = self.find(main) else {
            return Vec::new();
        };
        let mut covered = HashSet::from([start]);
        let mut order = vec![start];
        let mut worklist = VecDeque::from([start]);
        while let Some(id) = worklist.pop_front() {
            for edge in self.outgoing(id) {
                if covered.insert(edge.target) {
                    order.push(edge.target);
                    worklist.push_back(edge.target);
                }
            }
        }
        order
    }

    pub fn is_non_standard(&self, edge: &AtgEdge, config: LaunchConfiguration) -> bool {
        config.is_non_standard(edge.is_self_transition())
    }

    pub fn contains_non_standard(&self, edge: &AtgEdge) -> bool {
        edge.configs.iter().any(|&c| self.is_non_standard(edge, c))
    }

    pub fn count_non_standard(&self, edge: &AtgEdge) -> usize {
        edge.configs.iter().filter(|&&c| self.is_non_standard(edge, c)).count()
    }

    /// Records that popping `source` off some stack may resume `target`.
    pub fn add_finish_edge(&mut self, source: ActivityId, target: ActivityId) {
        self.finish_edges.entry(source).or_default().insert(target);
    }

    pub fn finish_targets(&self, source: ActivityId) -> impl Iterator<Item = ActivityId> + '_ {
        self.finish_edges.get(&source).into_iter().flatten().copied()
    }

    /// Whether a back press from the edge's target may return to its source.
    pub fn has_inverse_finish_edge(&self, edge: &AtgEdge) -> bool {
        self.finish_edges
            .get(&edge.target)
            .is_some_and(|targets| targets.contains(&edge.source))
    }
}
