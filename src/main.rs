use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chordal::{
    elimination::{GivenOrder, LowestIndex, MaximumCardinality, Policy, Shuffled},
    graph::NodeIndex,
    parser::DotGraph,
};
use clap::{Parser, ValueEnum};
use itertools::Itertools;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
        std::process::exit(1);
    }
}

/// How to pick the elimination order.
#[derive(Clone, Debug, PartialEq, Eq)]
enum OrderArg {
    Lowest,
    MaximumCardinality,
    Random(u64),
    Given(Vec<String>),
}

impl FromStr for OrderArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            None if s == "lowest" => Ok(OrderArg::Lowest),
            None if s == "mcs" => Ok(OrderArg::MaximumCardinality),
            Some(("random", seed)) => seed
                .parse()
                .map(OrderArg::Random)
                .map_err(|e| format!("invalid seed {seed:?}: {e}")),
            Some(("given", names)) => Ok(OrderArg::Given(
                names.split(',').map(|n| n.trim().to_string()).collect(),
            )),
            _ => Err(format!(
                "unknown order {s:?}, expected lowest, mcs, random:<seed> or given:<a,b,...>"
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Report {
    Chordal,
    Clique,
    FillIn,
    Tree,
}

#[derive(Parser, Debug)]
#[command(
    name = "chordal-cli",
    about = "Chordality, maximum clique, fill-in and tree decomposition of a DOT graph."
)]
struct Cli {
    /// DOT file to analyse.
    input: PathBuf,
    /// Elimination order: lowest, mcs, random:<seed> or given:<a,b,...>.
    #[arg(long, value_name = "ORDER", default_value = "lowest")]
    order: OrderArg,
    /// Reports to print (all of them when omitted).
    #[arg(long, value_enum, value_delimiter = ',')]
    report: Vec<Report>,
}

fn policy(order: &OrderArg, graph: &DotGraph) -> Result<Policy> {
    Ok(match order {
        OrderArg::Lowest => Policy::Lowest(LowestIndex::default()),
        OrderArg::MaximumCardinality => {
            Policy::MaximumCardinality(MaximumCardinality::new(&graph.graph))
        }
        OrderArg::Random(seed) => Policy::Shuffled(Shuffled::seeded(*seed)),
        OrderArg::Given(names) => {
            let mut ids = Vec::with_capacity(names.len());
            for name in names {
                let Some(id) = graph.node(name) else {
                    bail!("no vertex named {name:?} in the input");
                };
                ids.push(id);
            }
            let order = GivenOrder::strict(&graph.graph, ids)
                .context("the given order must list every vertex exactly once")?;
            Policy::Given(order)
        }
    })
}

fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "chordal=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let graph = DotGraph::from_file(&cli.input)
        .with_context(|| format!("failed to load {}", cli.input.display()))?;
    let policy = policy(&cli.order, &graph)?;
    tracing::info!(
        nodes = graph.n_nodes(),
        edges = graph.edge_set().len(),
        order = ?cli.order,
        "loaded"
    );

    let reports = if cli.report.is_empty() {
        Report::value_variants().to_vec()
    } else {
        cli.report.clone()
    };
    let name = |n: NodeIndex| graph.name(n).unwrap_or("?").to_string();

    for report in reports {
        match report {
            Report::Chordal => {
                println!("chordal: {}", graph.is_chordal_with(policy.clone()));
            }
            Report::Clique => {
                let clique = graph.max_clique_with(policy.clone());
                println!(
                    "max clique ({}): {{{}}}",
                    clique.len(),
                    clique.iter().map(|&n| name(n)).join(",")
                );
            }
            Report::FillIn => {
                let completion = graph
                    .graph
                    .clone()
                    .chordal_completion_with(policy.clone(), |_, _| Default::default());
                println!(
                    "order: {}",
                    completion.order.iter().map(|&n| name(n)).join(" ")
                );
                println!("fill-in ({}):", completion.fill_count());
                for pair in &completion.fill_in {
                    println!("  {} -- {}", name(pair.lo), name(pair.hi));
                }
            }
            Report::Tree => {
                let tree = graph.tree_decomposition_with(policy.clone());
                println!("tree decomposition (width {}):", tree.width());
                print!("{}", tree.draw(name));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn order_arguments() {
        assert_eq!("lowest".parse(), Ok(OrderArg::Lowest));
        assert_eq!("mcs".parse(), Ok(OrderArg::MaximumCardinality));
        assert_eq!("random:42".parse(), Ok(OrderArg::Random(42)));
        assert_eq!(
            "given:b, a".parse(),
            Ok(OrderArg::Given(vec!["b".into(), "a".into()]))
        );
        assert!("random:x".parse::<OrderArg>().is_err());
        assert!("sideways".parse::<OrderArg>().is_err());
    }

    #[test]
    fn cli_parses() {
        let cli = Cli::try_parse_from([
            "chordal-cli",
            "g.dot",
            "--order",
            "mcs",
            "--report",
            "clique,tree",
        ])
        .unwrap();
        assert_eq!(cli.order, OrderArg::MaximumCardinality);
        assert_eq!(cli.report, vec![Report::Clique, Report::Tree]);
    }

    #[test]
    fn given_order_must_cover_the_graph() {
        let graph = chordal::dot!(digraph { a -> b; b -> c; }).unwrap();
        let order = OrderArg::Given(vec!["c".into(), "a".into()]);
        assert!(policy(&order, &graph).is_err());
        let order = OrderArg::Given(vec!["c".into(), "x".into()]);
        assert!(policy(&order, &graph).is_err());
        let order = OrderArg::Given(vec!["c".into(), "a".into(), "b".into()]);
        assert!(matches!(policy(&order, &graph), Ok(Policy::Given(_))));
    }
}
