mod logging;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use nutri_flow::layout::{DEFAULT_ITERATIONS, DEFAULT_NODE_PADDING, DEFAULT_NODE_WIDTH};
use nutri_flow::nutrients::parse_amounts;
use nutri_flow::util::format_grams;
use nutri_flow::{
    FlowGraph, FlowLink, FlowOptions, FoodDataset, LayoutConfig, NodeAlign, NodeName,
    NutrientAmounts, build, layout, reachable, resolve,
};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fuzzy-search foods in a dataset.
    Search {
        #[arg(long)]
        dataset: PathBuf,
        query: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Only foods of this data type (repeatable).
        #[arg(long = "data-type")]
        data_types: Vec<String>,
    },
    /// Print the flow graph for a food.
    Graph {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        flow: FlowArgs,
        /// Print one line per link instead of JSON.
        #[arg(long)]
        text: bool,
    },
    /// Print the laid-out diagram for a food.
    Layout {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        flow: FlowArgs,
        #[command(flatten)]
        layout: LayoutArgs,
    },
    /// Print the nodes and links emphasised when hovering a node.
    Highlight {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        flow: FlowArgs,
        /// Node label, e.g. "Fat" or "Sat.".
        #[arg(long)]
        focus: String,
    },
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// FoodData Central JSON export.
    #[arg(long, requires = "food")]
    dataset: Option<PathBuf>,
    /// Food id (fdcId) inside the dataset.
    #[arg(long)]
    food: Option<u64>,
    /// JSON object of nutrient name to grams per 100 g, or a single food.
    #[arg(long, conflicts_with = "dataset")]
    amounts: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct FlowArgs {
    #[arg(long)]
    reverse_hierarchy: bool,
    #[arg(long)]
    show_sodium: bool,
    #[arg(long)]
    no_fat_breakdown: bool,
}

impl From<&FlowArgs> for FlowOptions {
    fn from(args: &FlowArgs) -> Self {
        Self {
            reverse_hierarchy: args.reverse_hierarchy,
            show_sodium: args.show_sodium,
            show_fat_breakdown: !args.no_fat_breakdown,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AlignArg {
    Left,
    Right,
    Justify,
}

impl From<AlignArg> for NodeAlign {
    fn from(align: AlignArg) -> Self {
        match align {
            AlignArg::Left => Self::Left,
            AlignArg::Right => Self::Right,
            AlignArg::Justify => Self::Justify,
        }
    }
}

#[derive(Debug, Args)]
struct LayoutArgs {
    #[arg(long, default_value_t = 960.0)]
    width: f64,
    #[arg(long, default_value_t = 550.0)]
    height: f64,
    #[arg(long, default_value_t = DEFAULT_NODE_WIDTH)]
    node_width: f64,
    #[arg(long, default_value_t = DEFAULT_NODE_PADDING)]
    node_padding: f64,
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,
    #[arg(long, value_enum, default_value_t = AlignArg::Justify)]
    align: AlignArg,
    /// Mirror the diagram so flow runs right to left.
    #[arg(long)]
    reverse_flow: bool,
}

#[derive(Serialize)]
struct HighlightOutput<'a> {
    focus: NodeName,
    nodes: Vec<NodeName>,
    links: Vec<&'a FlowLink>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Search {
            dataset,
            query,
            page,
            data_types,
        } => {
            let dataset = FoodDataset::load(&dataset)?;
            print_json(&dataset.search(&query, page, &data_types))
        }
        Command::Graph { source, flow, text } => {
            let graph = food_graph(&source, &flow)?;
            if text {
                print_links(&graph);
                Ok(())
            } else {
                print_json(&graph)
            }
        }
        Command::Layout {
            source,
            flow,
            layout: args,
        } => {
            let graph = food_graph(&source, &flow)?;
            let config = LayoutConfig::new(args.width, args.height)
                .with_node_width(args.node_width)
                .with_node_padding(args.node_padding)
                .with_iterations(args.iterations)
                .with_align(args.align.into())
                .with_reverse_hierarchy(flow.reverse_hierarchy)
                .with_reverse_flow(args.reverse_flow);
            print_json(&layout(&graph, &config))
        }
        Command::Highlight {
            source,
            flow,
            focus,
        } => {
            let Some(focus) = NodeName::from_label(&focus) else {
                bail!("unknown node {focus:?}");
            };
            let graph = food_graph(&source, &flow)?;
            let highlight = reachable(&graph, focus);
            let output = HighlightOutput {
                focus,
                nodes: highlight.nodes.iter().copied().collect(),
                links: graph
                    .links
                    .iter()
                    .enumerate()
                    .filter(|&(index, _)| highlight.contains_link(index))
                    .map(|(_, link)| link)
                    .collect(),
            };
            print_json(&output)
        }
    }
}

fn load_amounts(source: &SourceArgs) -> Result<NutrientAmounts> {
    if let Some(path) = &source.amounts {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return parse_amounts(&raw).with_context(|| format!("failed to parse {}", path.display()));
    }

    match (&source.dataset, source.food) {
        (Some(path), Some(food)) => {
            let dataset = FoodDataset::load(path)?;
            let amounts = dataset
                .raw_amounts(food)
                .with_context(|| format!("in dataset {}", path.display()))?;
            Ok(amounts.clone())
        }
        _ => bail!("pass either --amounts or --dataset with --food"),
    }
}

fn food_graph(source: &SourceArgs, flow: &FlowArgs) -> Result<FlowGraph> {
    let amounts = load_amounts(source)?;
    let quantities = resolve(&amounts);
    Ok(build(&quantities, flow.into()))
}

fn print_links(graph: &FlowGraph) {
    if graph.is_empty() {
        println!("no data");
        return;
    }

    let width = graph
        .links
        .iter()
        .map(|link| link.source.label().len() + link.target.label().len())
        .max()
        .unwrap_or(0);

    for link in &graph.links {
        let route = format!("{} -> {}", link.source, link.target);
        println!("{route:<pad$}  {}", format_grams(link.value), pad = width + 4);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}
