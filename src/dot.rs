//! Graph to DOT (Graphviz) conversion.
//!
//! Both transition graphs can be rendered as directed graphs:
//! - **ATG**: one node per activity, one edge per `(source, target)` pair,
//!   labelled with its launch configurations as `[{cfg}, {cfg}]`.
//! - **ASTG**: one node per stack, the initial stack in a box. One edge per
//!   merged edge, labelled with its configurations. Edges made only of finish
//!   transitions are dashed.
//!
//! # Examples
//!
//! ```
//! use astg_rs::atg::ActivityTransitionGraph;
//! use astg_rs::launch::LaunchConfiguration;
//!
//! let mut atg = ActivityTransitionGraph::new();
//! atg.add_transition("Main", "Settings", LaunchConfiguration::STANDARD);
//!
//! let dot = atg.to_dot().unwrap();
//! assert!(dot.starts_with("digraph ATG {"));
//! // Write to file and render with: dot -Tpng atg.dot -o atg.png
//! ```

use std::fmt::Write as _;

use crate::astg::ActivityStackTransitionGraph;
use crate::atg::ActivityTransitionGraph;
use crate::launch::LaunchConfiguration;

/// Configuration options for DOT output generation.
///
/// ```
/// use astg_rs::dot::DotConfig;
///
/// let config = DotConfig {
///     label_sequences: true,
///     ..DotConfig::default()
/// };
/// assert_eq!(config.node_shape, "ellipse");
/// ```
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for regular nodes (default: "ellipse")
    pub node_shape: &'static str,
    /// Shape for the initial stack (default: "box")
    pub init_shape: &'static str,
    /// Style for launch edges (default: "solid")
    pub launch_edge_style: &'static str,
    /// Style for edges made only of finish transitions (default: "dashed")
    pub finish_edge_style: &'static str,
    /// Whether ASTG edge labels list callback sequences instead of configurations (default: false)
    pub label_sequences: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "ellipse",
            init_shape: "box",
            launch_edge_style: "solid",
            finish_edge_style: "dashed",
            label_sequences: false,
        }
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

fn configs_label(configs: impl IntoIterator<Item = LaunchConfiguration>) -> String {
    let configs: Vec<String> = configs.into_iter().map(|c| format!("{{{}}}", c)).collect();
    format!("[{}]", configs.join(", "))
}

impl ActivityTransitionGraph {
    /// Converts the ATG to DOT format with default settings.
    pub fn to_dot(&self) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "digraph ATG {{")?;
        writeln!(dot, "  node [shape={}];", config.node_shape)?;
        for (id, activity) in self.activities() {
            writeln!(dot, "  n{} [label=\"{}\"];", id.raw(), escape(activity.as_str()))?;
        }
        for edge in self.edges() {
            writeln!(
                dot,
                "  n{} -> n{} [label=\"{}\", style={}];",
                edge.source.raw(),
                edge.target.raw(),
                configs_label(edge.configs.iter().copied()),
                config.launch_edge_style
            )?;
        }
        writeln!(dot, "}}")?;
        Ok(dot)
    }
}

impl ActivityStackTransitionGraph {
    /// Converts the ASTG to DOT format with default settings.
    pub fn to_dot(&self) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "digraph ASTG {{")?;
        writeln!(dot, "  node [shape={}];", config.node_shape)?;
        for (id, stack) in self.nodes() {
            let label = escape(&stack.to_string());
            if self.init_stack() == Some(id) {
                writeln!(dot, "  s{} [label=\"{}\", shape={}];", id.raw(), label, config.init_shape)?;
            } else {
                writeln!(dot, "  s{} [label=\"{}\"];", id.raw(), label)?;
            }
        }
        for edge in self.edges() {
            let label = if config.label_sequences {
                let sequences: Vec<String> = edge
                    .transitions()
                    .iter()
                    .map(|t| escape(&t.sequence.to_string()))
                    .collect();
                sequences.join("\\n")
            } else {
                configs_label(edge.configs())
            };
            let only_finish = edge.transitions().iter().all(|t| t.is_finish());
            let style = if only_finish {
                config.finish_edge_style
            } else {
                config.launch_edge_style
            };
            writeln!(
                dot,
                "  s{} -> s{} [label=\"{}\", style={}];",
                edge.source.raw(),
                edge.target.raw(),
                label,
                style
            )?;
        }
        writeln!(dot, "}}")?;
        Ok(dot)
    }
}
