use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::info;

use astg_rs::atg::ActivityTransitionGraph;
use astg_rs::compare::{project_finish_edges, AtgCensus, InterestingTransitions};
use astg_rs::explore::{ExplorerConfig, KLimitExplorer};
use astg_rs::parse::{parse_atg, read_atg, ParsedAtg};
use astg_rs::paths::{count_paths, lifecycle_paths, PathConfig};
use astg_rs::policy::{DefaultTransitionPolicy, NaiveTransitionPolicy, TransitionPolicy};

const BUILTIN: &str = "\
main Main
Main -> List
List -> Detail
Detail -> Detail : SINGLE_TOP
Detail -> Edit
Edit -> List : CLEAR_TOP
Edit -> Main : REORDER_TO_FRONT
";

#[derive(Debug, Copy, Clone, ValueEnum)]
enum Policy {
    Default,
    Naive,
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Explore the activity stacks of a navigation graph")]
struct Cli {
    /// Navigation graph description (a built-in sample is used if omitted).
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Maximum number of occurrences of an activity in a stack.
    #[arg(long, value_name = "INT", default_value = "1")]
    k: usize,

    /// Transition semantics.
    #[arg(long, value_enum, default_value = "default")]
    policy: Policy,

    /// Stop after this many stacks.
    #[arg(long, value_name = "INT")]
    max_states: Option<usize>,

    /// Write the stack graph in DOT format to this file.
    #[arg(long, value_name = "FILE")]
    dot: Option<PathBuf>,

    /// Enumerate lifecycle paths up to this many edges.
    #[arg(long, value_name = "INT", default_value = "8")]
    paths: usize,

    /// Print debug logs.
    #[arg(long)]
    verbose: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();
    println!("args = {:?}", args);

    let ParsedAtg {
        main,
        mut graph,
        dropped,
    } = match &args.input {
        Some(path) => read_atg(path)?,
        None => parse_atg(BUILTIN)?,
    };
    info!(
        "ATG: {} activities, {} edges, {} invalid launches dropped",
        graph.node_count(),
        graph.edge_count(),
        dropped
    );

    let policy: &dyn TransitionPolicy = match args.policy {
        Policy::Default => &DefaultTransitionPolicy,
        Policy::Naive => &NaiveTransitionPolicy,
    };
    let mut config = ExplorerConfig::default().with_k_limit(args.k);
    if let Some(max) = args.max_states {
        config = config.with_max_states(max);
    }

    let time_explore = std::time::Instant::now();
    let run = KLimitExplorer::with_config(config).explore(&graph, main.as_str(), policy)?;
    let astg = &run.graph;
    println!(
        "Explored {} stacks and {} edges in {:.3} s",
        astg.node_count(),
        astg.edge_count(),
        time_explore.elapsed().as_secs_f64()
    );
    println!("stats = {:?}", run.stats);

    for (id, stack) in astg.nodes() {
        println!("  {} {}", id, stack);
    }

    if let Some(path) = &args.dot {
        std::fs::write(path, astg.to_dot()?)?;
        info!("Stack graph written to {}", path.display());
    }

    project_finish_edges(astg, &mut graph);
    println!("census: {}", AtgCensus::of(&graph, main.as_str())?);
    println!("interesting: {}", InterestingTransitions::measure(astg));

    let histogram = lifecycle_paths(astg, &PathConfig { max_edges: args.paths });
    for (edges, bucket) in histogram.iter() {
        println!(
            "  {} edges: {} sequences (avg {:.2}), {} distinct (avg {:.2}), {} stack walks",
            edges,
            bucket.sequences,
            bucket.average_length().unwrap_or(0.0),
            bucket.distinct.len(),
            bucket.average_distinct_length().unwrap_or(0.0),
            count_paths(astg, edges - 1)
        );
    }

    print_atg_summary(&graph);

    println!("Total time: {:.3} s", time_total.elapsed().as_secs_f64());
    Ok(())
}

fn print_atg_summary(graph: &ActivityTransitionGraph) {
    for edge in graph.edges() {
        let configs: Vec<String> = edge.configs.iter().map(|c| c.to_string()).collect();
        println!(
            "  {} -> {} [{}]{}",
            graph.activity(edge.source),
            graph.activity(edge.target),
            configs.join("; "),
            if graph.has_inverse_finish_edge(edge) { "" } else { " (no inverse)" }
        );
    }
}
