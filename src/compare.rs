//! Comparing and measuring transition graphs.
//!
//! - [`StackDiff`] lists the stacks found by one exploration but not by another,
//!   typically the accurate policy against the naive one.
//! - [`AtgCensus`] classifies the launch configurations reachable from the main
//!   activity as standard or non-standard.
//! - [`InterestingTransitions`] counts stack transitions that a BACK press cannot
//!   undo.

use std::collections::HashSet;
use std::fmt;

use log::warn;

use crate::astg::ActivityStackTransitionGraph;
use crate::atg::ActivityTransitionGraph;
use crate::error::{TransitionError, TransitionResult};
use crate::launch::LaunchConfiguration;
use crate::reference::StackId;
use crate::stack::ActivityStack;

/// Stacks present in only one of two graphs, each side in discovery order.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct StackDiff {
    pub only_left: Vec<ActivityStack>,
    pub only_right: Vec<ActivityStack>,
}

impl StackDiff {
    pub fn between(left: &ActivityStackTransitionGraph, right: &ActivityStackTransitionGraph) -> Self {
        let only = |a: &ActivityStackTransitionGraph, b: &ActivityStackTransitionGraph| {
            a.nodes()
                .filter(|(_, s)| !b.contains(s))
                .map(|(_, s)| s.clone())
                .collect()
        };
        Self {
            only_left: only(left, right),
            only_right: only(right, left),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.only_left.is_empty() && self.only_right.is_empty()
    }
}

impl fmt::Display for StackDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.only_left {
            writeln!(f, "  - {}", s)?;
        }
        for s in &self.only_right {
            writeln!(f, "  + {}", s)?;
        }
        Ok(())
    }
}

/// Launch configuration counts over the part of an ATG reachable from main.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct AtgCensus {
    /// Configurations that push a fresh instance.
    pub standard: usize,
    /// Configurations that clear, reorder, or reuse a self-launched top.
    pub non_standard: usize,
    /// Non-standard configurations on edges no BACK press can undo.
    pub non_standard_without_inverse: usize,
    /// Activities reachable from main, main included.
    pub covered_activities: usize,
    /// Launch configurations on reachable edges.
    pub covered_edges: usize,
}

impl AtgCensus {
    /// Takes the census of `atg` starting at `main`.
    ///
    /// The inverse check uses finish edges recorded with
    /// [`project_finish_edges`]; without them every non-standard
    /// configuration counts as lacking an inverse.
    pub fn of(atg: &ActivityTransitionGraph, main: &str) -> TransitionResult<Self> {
        let mut census = AtgCensus::default();
        let reachable = atg.reachable_from(main);
        census.covered_activities = reachable.len();
        for id in reachable {
            for edge in atg.outgoing(id) {
                census.covered_edges += edge.configs.len();
                for &config in &edge.configs {
                    if !config.is_well_formed() {
                        return Err(TransitionError::MalformedConfiguration { config });
                    }
                }
                let non_standard = atg.count_non_standard(edge);
                census.non_standard += non_standard;
                census.standard += edge.configs.len() - non_standard;
                if non_standard > 0 && !atg.has_inverse_finish_edge(edge) {
                    census.non_standard_without_inverse += non_standard;
                }
            }
        }
        Ok(census)
    }

    pub fn total(&self) -> usize {
        self.standard + self.non_standard
    }

    /// Share of standard configurations in percent, `None` if there are none at all.
    pub fn standard_percent(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.standard as f64 / total as f64 * 100.0)
    }
}

impl fmt::Display for AtgCensus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} standard, {} non-standard ({} without inverse) over {} activities and {} edge configurations",
            self.standard,
            self.non_standard,
            self.non_standard_without_inverse,
            self.covered_activities,
            self.covered_edges
        )
    }
}

/// Records the activity-level projection of every finish transition of `astg` in `atg`.
pub fn project_finish_edges(astg: &ActivityStackTransitionGraph, atg: &mut ActivityTransitionGraph) {
    for edge in astg.edges().filter(|e| e.has_finish()) {
        let (Some(from), Some(to)) = (astg.stack(edge.source).top(), astg.stack(edge.target).top()) else {
            continue;
        };
        let from = atg.node(from);
        let to = atg.node(to);
        atg.add_finish_edge(from, to);
    }
}

/// A launch transition whose source stack is not restored by BACK.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct InterestingTransition {
    pub source: StackId,
    pub target: StackId,
    pub config: LaunchConfiguration,
}

/// Counts of launch transitions that cannot be undone by a BACK press.
#[derive(Debug, Clone, Default)]
pub struct InterestingTransitions {
    /// Launch (non-finish) transitions inspected.
    pub total: usize,
    /// Transitions whose target has no finish edge back to the source.
    pub interesting: usize,
    /// Interesting transitions where BACK still resumes the source's top activity.
    pub relaxed: usize,
    /// Interesting transitions with a standard configuration. A correct
    /// policy never produces these.
    pub anomalies: Vec<InterestingTransition>,
}

impl InterestingTransitions {
    pub fn measure(astg: &ActivityStackTransitionGraph) -> Self {
        let mut result = Self::default();
        for edge in astg.edges() {
            let source = astg.stack(edge.source);
            let target = astg.stack(edge.target);
            let self_transition = source.top() == target.top();
            for transition in edge.transitions().iter().filter(|t| !t.is_finish()) {
                result.total += 1;
                if astg.finish_target(edge.target) == Some(edge.source) {
                    continue;
                }
                result.interesting += 1;
                if !transition.config.is_non_standard(self_transition) {
                    warn!("standard transition {} -> {} via {} cannot be undone", source, target, transition.config);
                    result.anomalies.push(InterestingTransition {
                        source: edge.source,
                        target: edge.target,
                        config: transition.config,
                    });
                }
                let back_top = astg.finish_target(edge.target).and_then(|id| astg.stack(id).top());
                if back_top.is_some() && back_top == source.top() {
                    result.relaxed += 1;
                }
            }
        }
        result
    }

    /// Share of interesting transitions, `None` if there are no launches.
    pub fn ratio(&self) -> Option<f64> {
        (self.total > 0).then(|| self.interesting as f64 / self.total as f64)
    }

    /// Distinct source stacks of interesting transitions.
    pub fn sources(astg: &ActivityStackTransitionGraph) -> HashSet<StackId> {
        astg.edges()
            .filter(|e| e.transitions().iter().any(|t| !t.is_finish()))
            .filter(|e| astg.finish_target(e.target) != Some(e.source))
            .map(|e| e.source)
            .collect()
    }
}

impl fmt::Display for InterestingTransitions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} interesting", self.interesting, self.total)?;
        if let Some(ratio) = self.ratio() {
            write!(f, " ({:.2})", ratio)?;
        }
        write!(f, ", {} relaxed", self.relaxed)
    }
}
