//! K-limit exploration of reachable activity stacks.
//!
//! Starting from `[main]`, the explorer drains a FIFO worklist of stacks.
//! For a dequeued stack `S` with top `a`, every launch configuration on every
//! ATG edge `a -> t` is fed to the [`TransitionPolicy`]; the resulting stack is
//! kept only if `t` occurs in it at most `k_limit` times. Stacks of size > 1
//! additionally get a synthetic finish transition popping the top.
//!
//! Every activity occurs at most `k_limit` times in any kept stack and the
//! alphabet is finite, so the set of stacks is finite and the run halts.
//!
//! # Example
//!
//! ```
//! use astg_rs::atg::ActivityTransitionGraph;
//! use astg_rs::explore::KLimitExplorer;
//! use astg_rs::launch::LaunchConfiguration;
//! use astg_rs::policy::DefaultTransitionPolicy;
//!
//! let mut atg = ActivityTransitionGraph::new();
//! atg.add_transition("Main", "A", LaunchConfiguration::STANDARD);
//!
//! let run = KLimitExplorer::new(1).explore(&atg, "Main", &DefaultTransitionPolicy)?;
//! assert_eq!(run.graph.node_count(), 2);
//! # Ok::<(), astg_rs::error::TransitionError>(())
//! ```

use std::collections::VecDeque;

use log::{debug, info, warn};

use crate::astg::ActivityStackTransitionGraph;
use crate::atg::ActivityTransitionGraph;
use crate::error::{TransitionError, TransitionResult};
use crate::launch::LaunchConfiguration;
use crate::policy::TransitionPolicy;
use crate::reference::StackId;
use crate::sequence::MethodSequence;
use crate::stack::ActivityStack;
use crate::types::{Activity, Callback};

/// Configuration for stack exploration.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    /// Maximum number of occurrences of the launched activity in a kept stack.
    pub k_limit: usize,
    /// Hard cap on the number of stacks; `None` explores exhaustively.
    pub max_states: Option<usize>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            k_limit: 1,
            max_states: None,
        }
    }
}

impl ExplorerConfig {
    pub fn with_k_limit(mut self, k_limit: usize) -> Self {
        self.k_limit = k_limit;
        self
    }

    pub fn with_max_states(mut self, max_states: usize) -> Self {
        self.max_states = Some(max_states);
        self
    }
}

/// Counters collected during one run.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ExplorationStats {
    /// Stacks dequeued and expanded.
    pub expanded: usize,
    /// Launch transitions recorded in the graph.
    pub launches: usize,
    /// Finish transitions recorded in the graph.
    pub finishes: usize,
    /// Launch transitions dropped by the K-limit.
    pub dropped: usize,
    /// Size of the deepest stack seen.
    pub max_depth: usize,
    /// Whether `max_states` cut the run short.
    pub truncated: bool,
}

/// Result of one exploration run.
#[derive(Debug, Clone)]
pub struct Exploration {
    pub graph: ActivityStackTransitionGraph,
    pub stats: ExplorationStats,
}

/// The bounded worklist driver.
#[derive(Debug, Clone, Default)]
pub struct KLimitExplorer {
    config: ExplorerConfig,
}

impl KLimitExplorer {
    pub fn new(k_limit: usize) -> Self {
        Self::with_config(ExplorerConfig::default().with_k_limit(k_limit))
    }

    pub fn with_config(config: ExplorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn k_limit(&self) -> usize {
        self.config.k_limit
    }

    /// Explores every stack reachable from `[main]` under `policy`.
    ///
    /// Fails on the first malformed launch configuration; no graph is
    /// returned in that case.
    pub fn explore<P>(&self, atg: &ActivityTransitionGraph, main: &str, policy: &P) -> TransitionResult<Exploration>
    where
        P: TransitionPolicy + ?Sized,
    {
        let mut run = Run {
            atg,
            config: &self.config,
            graph: ActivityStackTransitionGraph::new(),
            stats: ExplorationStats::default(),
            worklist: VecDeque::new(),
        };

        let root = ActivityStack::with_root(main);
        run.stats.max_depth = root.size();
        let (init, _) = run.graph.node_or_insert(root);
        run.graph.set_init_stack(init);
        run.worklist.push_back(init);

        debug!(
            "exploring from [{}] with policy '{}', k = {}",
            main,
            policy.name(),
            self.config.k_limit
        );

        while let Some(id) = run.worklist.pop_front() {
            run.expand(id, policy)?;
        }

        info!(
            "policy '{}', k = {}: {} stacks, {} edges ({} launches, {} finishes), {} dropped, max depth {}",
            policy.name(),
            self.config.k_limit,
            run.graph.node_count(),
            run.graph.edge_count(),
            run.stats.launches,
            run.stats.finishes,
            run.stats.dropped,
            run.stats.max_depth
        );

        Ok(Exploration {
            graph: run.graph,
            stats: run.stats,
        })
    }
}

/// Callbacks of a back press from `top` resuming `resumed`.
pub fn finish_sequence(top: &Activity, resumed: &Activity) -> MethodSequence {
    MethodSequence::new()
        .then(top, Callback::OnPause)
        .then_all(resumed, &[Callback::OnRestart, Callback::OnStart, Callback::OnResume])
        .then_all(top, &[Callback::OnStop, Callback::OnDestroy])
}

struct Run<'a> {
    atg: &'a ActivityTransitionGraph,
    config: &'a ExplorerConfig,
    graph: ActivityStackTransitionGraph,
    stats: ExplorationStats,
    worklist: VecDeque<StackId>,
}

impl Run<'_> {
    fn expand<P>(&mut self, id: StackId, policy: &P) -> TransitionResult<()>
    where
        P: TransitionPolicy + ?Sized,
    {
        let current = self.graph.stack(id).clone();
        let top = current.top().cloned().ok_or(TransitionError::EmptyStack)?;
        self.stats.expanded += 1;
        debug!("expanding {} {}", id, current);

        let atg = self.atg;
        for edge in atg.outgoing_of(top.as_str()) {
            let target = atg.activity(edge.target);
            for &config in &edge.configs {
                let next = policy.construct_new_stack(&current, config, target)?;
                let occurrences = next.count(target.as_str());
                if occurrences > self.config.k_limit {
                    debug!(
                        "dropping {} -> {} via {} ({} occurrences of {})",
                        current, next, config, occurrences, target
                    );
                    self.stats.dropped += 1;
                    continue;
                }
                let sequence = policy.method_sequence(&current, config, target)?;
                if self.record(id, next, sequence, config) {
                    self.stats.launches += 1;
                }
            }
        }

        if current.size() > 1 {
            let mut popped = current.clone();
            popped.pop();
            if let Some(resumed) = popped.top() {
                let sequence = finish_sequence(&top, resumed);
                if self.record(id, popped, sequence, LaunchConfiguration::FINISH) {
                    self.stats.finishes += 1;
                }
            }
        }
        Ok(())
    }

    /// Adds the transition, enqueueing `next` if it is new. Returns `false`
    /// if the state cap kept `next` out of the graph.
    fn record(
        &mut self,
        source: StackId,
        next: ActivityStack,
        sequence: MethodSequence,
        config: LaunchConfiguration,
    ) -> bool {
        if !self.graph.contains(&next) {
            if let Some(max) = self.config.max_states {
                if self.graph.node_count() >= max {
                    if !self.stats.truncated {
                        warn!("state cap of {} stacks reached, exploration is incomplete", max);
                        self.stats.truncated = true;
                    }
                    return false;
                }
            }
        }
        let depth = next.size();
        let (target, new) = self.graph.node_or_insert(next);
        if new {
            debug!("new stack {} {}", target, self.graph.stack(target));
            self.stats.max_depth = self.stats.max_depth.max(depth);
            self.worklist.push_back(target);
        }
        self.graph.add_transition(source, target, sequence, config);
        true
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::policy::{DefaultTransitionPolicy, NaiveTransitionPolicy};

    type C = LaunchConfiguration;

    fn stack(activities: &[&str]) -> ActivityStack {
        ActivityStack::from_top_to_bottom(activities.iter().copied())
    }

    #[test]
    fn test_single_launch() {
        let mut atg = ActivityTransitionGraph::new();
        atg.add_transition("Main", "A", C::STANDARD);

        let run = KLimitExplorer::new(1)
            .explore(&atg, "Main", &DefaultTransitionPolicy)
            .unwrap();
        let g = &run.graph;
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 2);
        let main = g.lookup(&stack(&["Main"])).unwrap();
        let a = g.lookup(&stack(&["A", "Main"])).unwrap();
        assert_eq!(g.init_stack(), Some(main));
        assert_eq!(g.finish_target(a), Some(main));
        assert_eq!(run.stats.launches, 1);
        assert_eq!(run.stats.finishes, 1);
        assert_eq!(run.stats.max_depth, 2);
        assert!(!run.stats.truncated);
    }

    #[test]
    fn test_main_without_edges() {
        let atg = ActivityTransitionGraph::new();
        let run = KLimitExplorer::new(2)
            .explore(&atg, "Main", &DefaultTransitionPolicy)
            .unwrap();
        assert_eq!(run.graph.node_count(), 1);
        assert_eq!(run.graph.edge_count(), 0);
        assert_eq!(run.stats.expanded, 1);
    }

    #[test]
    fn test_k_limit_drops_transitions() {
        let mut atg = ActivityTransitionGraph::new();
        atg.add_transition("Main", "A", C::STANDARD);
        atg.add_transition("A", "A", C::STANDARD);

        let run = KLimitExplorer::new(2)
            .explore(&atg, "Main", &DefaultTransitionPolicy)
            .unwrap();
        let g = &run.graph;
        assert_eq!(g.node_count(), 3);
        assert!(g.contains(&stack(&["A", "A", "Main"])));
        assert!(!g.contains(&stack(&["A", "A", "A", "Main"])));
        assert_eq!(run.stats.dropped, 1);
    }

    #[test]
    fn test_naive_cycle_bounded() {
        let mut atg = ActivityTransitionGraph::new();
        atg.add_transition("Main", "A", C::STANDARD);
        atg.add_transition("A", "Main", C::STANDARD.with(C::FLAG_CLEAR_TOP));

        let accurate = KLimitExplorer::new(1)
            .explore(&atg, "Main", &DefaultTransitionPolicy)
            .unwrap();
        assert_eq!(accurate.graph.node_count(), 2);

        let naive = KLimitExplorer::new(1)
            .explore(&atg, "Main", &NaiveTransitionPolicy)
            .unwrap();
        // [Main, A, Main] exceeds the bound for Main.
        assert_eq!(naive.graph.node_count(), 2);
        assert_eq!(naive.stats.dropped, 1);

        let naive = KLimitExplorer::new(2)
            .explore(&atg, "Main", &NaiveTransitionPolicy)
            .unwrap();
        assert!(naive.graph.contains(&stack(&["A", "Main", "A", "Main"])));
    }

    #[test]
    fn test_malformed_aborts() {
        let mut atg = ActivityTransitionGraph::new();
        atg.add_transition("Main", "A", C::new(C::FLAG_CLEAR_TOP));

        let err = KLimitExplorer::new(1)
            .explore(&atg, "Main", &DefaultTransitionPolicy)
            .unwrap_err();
        assert!(matches!(err, TransitionError::MalformedConfiguration { .. }));
    }

    #[test]
    fn test_state_cap() {
        let mut atg = ActivityTransitionGraph::new();
        atg.add_transition("Main", "A", C::STANDARD);
        atg.add_transition("A", "B", C::STANDARD);
        atg.add_transition("B", "C", C::STANDARD);

        let config = ExplorerConfig::default().with_k_limit(1).with_max_states(2);
        let run = KLimitExplorer::with_config(config)
            .explore(&atg, "Main", &DefaultTransitionPolicy)
            .unwrap();
        assert_eq!(run.graph.node_count(), 2);
        assert!(run.stats.truncated);
    }

    #[test]
    fn test_finish_sequence() {
        let seq = finish_sequence(&"A".into(), &"Main".into());
        assert_eq!(
            seq.to_string(),
            "<A.onPause, Main.onRestart, Main.onStart, Main.onResume, A.onStop, A.onDestroy>"
        );
    }
}
