use std::path::PathBuf;

use clap::Parser;
use log::info;

use astg_rs::compare::StackDiff;
use astg_rs::explore::{ExplorerConfig, KLimitExplorer};
use astg_rs::parse::{parse_atg, read_atg};
use astg_rs::policy::{DefaultTransitionPolicy, NaiveTransitionPolicy};

const BUILTIN: &str = "\
main Main
Main -> A
A -> B
B -> A : CLEAR_TOP
B -> B : SINGLE_TOP
B -> Main : REORDER_TO_FRONT
";

#[derive(Debug, Parser)]
#[command(author, version, about = "Compare accurate and naive stack exploration")]
struct Cli {
    /// Navigation graph description (a built-in sample is used if omitted).
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Largest K to compare; every K from 1 up to this is run.
    #[arg(long, value_name = "INT", default_value = "2")]
    k: usize,

    /// Stop each run after this many stacks.
    #[arg(long, value_name = "INT", default_value = "100000")]
    max_states: usize,

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

    let parsed = match &args.input {
        Some(path) => read_atg(path)?,
        None => parse_atg(BUILTIN)?,
    };
    let main = parsed.main.as_str();

    for k in 1..=args.k {
        let config = ExplorerConfig::default()
            .with_k_limit(k)
            .with_max_states(args.max_states);
        let explorer = KLimitExplorer::with_config(config);
        let accurate = explorer.explore(&parsed.graph, main, &DefaultTransitionPolicy)?;
        let naive = explorer.explore(&parsed.graph, main, &NaiveTransitionPolicy)?;
        if accurate.stats.truncated || naive.stats.truncated {
            info!("k = {}: state cap reached, the comparison is partial", k);
        }

        println!(
            "=== {}-limit stacks: default {} vs naive {}",
            k,
            accurate.graph.node_count(),
            naive.graph.node_count()
        );
        let diff = StackDiff::between(&accurate.graph, &naive.graph);
        if diff.is_empty() {
            println!("  (identical)");
        } else {
            print!("{}", diff);
        }
        println!("===");
    }

    Ok(())
}
