//! Lifecycle callback paths over an activity stack transition graph.
//!
//! A lifecycle path is the concatenation of callbacks observed while an
//! app starts and then follows a walk through the stack graph. Walks start
//! at the initial stack with the launch prefix
//! `[main.onCreate, main.onStart, main.onResume]`, which counts as the first
//! edge. Each further step follows one transition of one outgoing edge. On a
//! stack holding a single activity, the walk may also end by pressing BACK,
//! which appends `[top.onPause, top.onStop, top.onDestroy]`.
//!
//! Constructor calls (`<init>`) never appear in a path. A caller-supplied
//! filter can drop more callbacks, e.g. those an activity does not override.
//!
//! # Example
//!
//! ```
//! use astg_rs::atg::ActivityTransitionGraph;
//! use astg_rs::explore::KLimitExplorer;
//! use astg_rs::launch::LaunchConfiguration;
//! use astg_rs::paths::{lifecycle_paths, PathConfig};
//! use astg_rs::policy::DefaultTransitionPolicy;
//!
//! let mut atg = ActivityTransitionGraph::new();
//! atg.add_transition("Main", "A", LaunchConfiguration::STANDARD);
//! let run = KLimitExplorer::new(1).explore(&atg, "Main", &DefaultTransitionPolicy)?;
//!
//! let histogram = lifecycle_paths(&run.graph, &PathConfig::default());
//! assert_eq!(histogram.bucket(1).sequences, 1);
//! assert_eq!(histogram.bucket(2).sequences, 2);
//! # Ok::<(), astg_rs::error::TransitionError>(())
//! ```
//!
//! # Performance
//!
//! The number of paths grows exponentially with the number of edges. Use
//! [`count_paths`] when only the count is needed.

use std::collections::{HashSet, VecDeque};

use num_bigint::BigUint;

use crate::astg::ActivityStackTransitionGraph;
use crate::sequence::Call;
use crate::types::{Activity, Callback};

/// A sequence of callback invocations.
pub type LifecyclePath = Vec<Call>;

/// Configuration for lifecycle path enumeration.
#[derive(Debug, Clone)]
pub struct PathConfig {
    /// Longest walk to enumerate, counting the launch prefix as one edge.
    pub max_edges: usize,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self { max_edges: 8 }
    }
}

/// Paths of one edge count.
#[derive(Debug, Clone, Default)]
pub struct PathBucket {
    /// Number of walks, duplicates included.
    pub sequences: usize,
    /// Sum of the lengths of all walks, duplicates included.
    pub total_length: usize,
    /// Distinct callback paths.
    pub distinct: HashSet<LifecyclePath>,
}

impl PathBucket {
    fn record(&mut self, path: &LifecyclePath) {
        self.sequences += 1;
        self.total_length += path.len();
        if !self.distinct.contains(path) {
            self.distinct.insert(path.clone());
        }
    }

    /// Average walk length, or `None` for an empty bucket.
    pub fn average_length(&self) -> Option<f64> {
        (self.sequences > 0).then(|| self.total_length as f64 / self.sequences as f64)
    }

    /// Average length of the distinct paths, or `None` for an empty bucket.
    pub fn average_distinct_length(&self) -> Option<f64> {
        if self.distinct.is_empty() {
            return None;
        }
        let total: usize = self.distinct.iter().map(Vec::len).sum();
        Some(total as f64 / self.distinct.len() as f64)
    }
}

/// Lifecycle paths grouped by edge count `1..=max_edges`.
#[derive(Debug, Clone)]
pub struct PathHistogram {
    buckets: Vec<PathBucket>,
}

impl PathHistogram {
    fn new(max_edges: usize) -> Self {
        Self {
            buckets: vec![PathBucket::default(); max_edges],
        }
    }

    pub fn max_edges(&self) -> usize {
        self.buckets.len()
    }

    /// Paths made of exactly `edges` edges.
    ///
    /// # Panics
    ///
    /// Panics if `edges` is zero or above [`max_edges`](Self::max_edges).
    pub fn bucket(&self, edges: usize) -> &PathBucket {
        assert!(
            edges >= 1 && edges <= self.buckets.len(),
            "Edge count {} out of range 1..={}",
            edges,
            self.buckets.len()
        );
        &self.buckets[edges - 1]
    }

    /// Iterates `(edge count, bucket)` pairs in increasing edge count.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &PathBucket)> + '_ {
        self.buckets.iter().enumerate().map(|(i, b)| (i + 1, b))
    }

    fn bucket_mut(&mut self, edges: usize) -> &mut PathBucket {
        &mut self.buckets[edges - 1]
    }
}

/// Enumerates lifecycle paths, keeping every callback except `<init>`.
pub fn lifecycle_paths(astg: &ActivityStackTransitionGraph, config: &PathConfig) -> PathHistogram {
    lifecycle_paths_filtered(astg, config, |_, _| true)
}

/// Enumerates lifecycle paths, keeping only callbacks accepted by `keep`.
pub fn lifecycle_paths_filtered<F>(astg: &ActivityStackTransitionGraph, config: &PathConfig, keep: F) -> PathHistogram
where
    F: Fn(&Activity, Callback) -> bool,
{
    let mut histogram = PathHistogram::new(config.max_edges);
    let Some(init) = astg.init_stack() else {
        return histogram;
    };
    if config.max_edges == 0 {
        return histogram;
    }
    let Some(main) = astg.stack(init).top().cloned() else {
        return histogram;
    };

    let extend = |path: &LifecyclePath, calls: &mut dyn Iterator<Item = Call>| -> LifecyclePath {
        let mut extended = path.clone();
        extended.extend(calls.filter(|(a, c)| !c.is_init() && keep(a, *c)));
        extended
    };

    let launch = [Callback::OnCreate, Callback::OnStart, Callback::OnResume];
    let init_path = extend(&Vec::new(), &mut launch.iter().map(|&c| (main.clone(), c)));
    histogram.bucket_mut(1).record(&init_path);

    let mut worklist = VecDeque::from([(init, init_path, 1)]);
    while let Some((id, path, edges)) = worklist.pop_front() {
        let next_edges = edges + 1;
        if next_edges > config.max_edges {
            continue;
        }
        for edge in astg.outgoing(id) {
            for transition in edge.transitions() {
                let next = extend(&path, &mut transition.sequence.iter().cloned());
                histogram.bucket_mut(next_edges).record(&next);
                if next_edges < config.max_edges {
                    worklist.push_back((edge.target, next, next_edges));
                }
            }
        }
        let stack = astg.stack(id);
        if stack.size() == 1 {
            if let Some(top) = stack.top() {
                let back = [Callback::OnPause, Callback::OnStop, Callback::OnDestroy];
                let next = extend(&path, &mut back.iter().map(|&c| (top.clone(), c)));
                histogram.bucket_mut(next_edges).record(&next);
            }
        }
    }
    histogram
}

/// Number of distinct walks of exactly `length` transitions starting at the
/// initial stack. Parallel transitions on one edge count separately.
pub fn count_paths(astg: &ActivityStackTransitionGraph, length: usize) -> BigUint {
    let Some(init) = astg.init_stack() else {
        return BigUint::default();
    };
    let mut ways = vec![BigUint::default(); astg.node_count()];
    ways[init.index()] = BigUint::from(1u32);
    for _ in 0..length {
        let mut next = vec![BigUint::default(); astg.node_count()];
        for edge in astg.edges() {
            let w = &ways[edge.source.index()];
            if w.bits() == 0 {
                continue;
            }
            next[edge.target.index()] += w * BigUint::from(edge.transitions().len());
        }
        ways = next;
    }
    ways.into_iter().sum()
}
