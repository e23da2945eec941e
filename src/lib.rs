//! # astg-rs: Activity Stack Transition Graphs in Rust
//!
//! **`astg-rs`** computes every back-stack an Android application can reach, together with
//! the lifecycle callbacks executed on each move between two stacks.
//! It is designed for static analysis and test generation over app navigation.
//!
//! ## What is an ASTG?
//!
//! The input is an *activity transition graph* (ATG): which activity may launch which, and with which
//! launch configuration (standard, single-top, clear-top, reorder-to-front).
//! The output is an *activity stack transition graph* (ASTG): nodes are concrete back-stacks, edges
//! are launches and back presses, each annotated with the callback sequence Android runs for it.
//!
//! Cycles in the ATG would make the set of stacks infinite. The exploration is therefore
//! **K-limited**: a launch is dropped when the launched activity would occur more than `K` times
//! in the resulting stack.
//!
//! ## Key Features
//!
//! - **Pluggable Semantics**: Stack mutation and callback ordering live behind the
//!   [`TransitionPolicy`][crate::policy::TransitionPolicy] trait. The accurate
//!   [`DefaultTransitionPolicy`][crate::policy::DefaultTransitionPolicy] and the push-only
//!   [`NaiveTransitionPolicy`][crate::policy::NaiveTransitionPolicy] are provided.
//! - **Arena Graphs**: Both graphs own their nodes in flat vectors and hand out lightweight
//!   handles ([`StackId`][crate::reference::StackId] and friends). Stacks are interned by value.
//! - **Deterministic**: For a fixed input, policy and `K`, repeated runs produce identical graphs.
//! - **Analysis Helpers**: Lifecycle path enumeration, exact path counting, policy differentials,
//!   Graphviz export, and a small text format for describing ATGs.
//!
//! ## Basic Usage
//!
//! ```rust
//! use astg_rs::atg::ActivityTransitionGraph;
//! use astg_rs::explore::KLimitExplorer;
//! use astg_rs::launch::LaunchConfiguration;
//! use astg_rs::policy::DefaultTransitionPolicy;
//! use astg_rs::stack::ActivityStack;
//!
//! // 1. Describe the navigation
//! let mut atg = ActivityTransitionGraph::new();
//! atg.add_transition("Main", "A", LaunchConfiguration::STANDARD);
//!
//! // 2. Explore with K = 1
//! let run = KLimitExplorer::new(1).explore(&atg, "Main", &DefaultTransitionPolicy)?;
//! let astg = &run.graph;
//!
//! // 3. Inspect the stacks
//! assert_eq!(astg.node_count(), 2);
//! let main = astg.lookup(&ActivityStack::with_root("Main")).unwrap();
//! let a = astg.lookup(&ActivityStack::from_top_to_bottom(["A", "Main"])).unwrap();
//!
//! // 4. ... and the callbacks of each move
//! let launch = &astg.edge_between(main, a).unwrap().transitions()[0];
//! assert_eq!(
//!     launch.sequence.to_string(),
//!     "<Main.onPause, A.<init>, A.onCreate, A.onStart, A.onResume, Main.onStop>"
//! );
//! # Ok::<(), astg_rs::error::TransitionError>(())
//! ```
//!
//! ## Core Components
//!
//! - **[`explore`]**: The K-limit worklist driver.
//! - **[`policy`]**: Transition semantics.
//! - **[`atg`]** and **[`astg`]**: The input and output graphs.
//! - **[`stack`]**, **[`launch`]**, **[`sequence`]**: The value types everything is built from.

pub mod astg;
pub mod atg;
pub mod compare;
pub mod dot;
pub mod error;
pub mod explore;
pub mod intent;
pub mod launch;
pub mod parse;
pub mod paths;
pub mod policy;
pub mod reference;
pub mod sequence;
pub mod stack;
pub mod types;
