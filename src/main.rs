use anyhow::Context;
use clap::Parser;
use gedx::input::{read_cost_function, read_graph};
use gedx::{Algorithm, CostFunction, DebugOptions, GraphMatcher};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Graph edit distance between two attributed graphs
#[derive(Parser, Debug)]
#[command(name = "gedx")]
#[command(about = "Graph edit distance between two graphs", long_about = None)]
struct Args {
    /// First graph: a JSON graph document or a JSON list of triples
    g1: PathBuf,

    /// Second graph, same formats as the first
    g2: PathBuf,

    /// astar, beam, beam:<width>, hungarian or vj
    #[arg(short, long, default_value = "hungarian")]
    algorithm: String,

    /// Beam width for beam search; rejected with any other algorithm unless --all is set
    #[arg(short, long)]
    beam: Option<u32>,

    /// Run every algorithm and report each distance with its run time
    #[arg(long)]
    all: bool,

    /// Cost function JSON; defaults to the RDF cost function
    #[arg(long)]
    costs: Option<PathBuf>,

    /// Time limit for search in milliseconds
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Print the edit path
    #[arg(long)]
    edit_path: bool,

    /// Log the cost matrix at debug level
    #[arg(long)]
    debug_matrix: bool,

    /// Log the node matching at debug level
    #[arg(long)]
    debug_matching: bool,

    /// Log the edit path at debug level
    #[arg(long)]
    debug_edit_path: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let g1 = read_graph(&args.g1)?;
    let g2 = read_graph(&args.g2)?;
    info!("Graph 1 '{}': {} nodes, {} edges", g1.id(), g1.len(), g1.edge_count());
    info!("Graph 2 '{}': {} nodes, {} edges", g2.id(), g2.len(), g2.edge_count());

    let costs = match &args.costs {
        Some(path) => read_cost_function(path)?,
        None => CostFunction::rdf_default(),
    };

    let mut algorithm: Algorithm = args.algorithm.parse()?;
    if let Some(width) = args.beam {
        // with --all the width goes to the beam run whatever --algorithm says
        if !args.all || matches!(algorithm, Algorithm::AStarBeam { .. }) {
            algorithm = algorithm.with_beam(width)?;
        }
    }

    let algorithms = if args.all {
        let beam = match algorithm {
            Algorithm::AStarBeam { beam } => beam,
            _ => NonZeroU32::new(args.beam.unwrap_or(Algorithm::DEFAULT_BEAM_WIDTH))
                .context("beam width must be at least 1")?,
        };
        Algorithm::all(beam).to_vec()
    } else {
        vec![algorithm]
    };

    let debug = DebugOptions {
        cost_matrix: args.debug_matrix,
        matching: args.debug_matching,
        edit_path: args.debug_edit_path,
    };
    let mut matcher = GraphMatcher::new(costs, algorithm).with_debug(debug);
    if let Some(ms) = args.time_limit_ms {
        matcher = matcher.with_time_limit(Duration::from_millis(ms));
    }

    for algorithm in algorithms {
        let matcher = matcher.clone().with_algorithm(algorithm);
        let started = Instant::now();
        let comparison = matcher.compare(&g1, &g2)?;
        let elapsed = started.elapsed();

        println!("{algorithm}: {}", comparison.distance);
        info!(
            "{} finished in {:.3} ms ({:?}, {} states expanded)",
            algorithm,
            elapsed.as_secs_f64() * 1000.0,
            comparison.status,
            comparison.expanded
        );

        if args.edit_path {
            let (source, target) = if comparison.swapped { (&g2, &g1) } else { (&g1, &g2) };
            println!("{}", comparison.edit_path.describe(source, target));
        }
    }

    Ok(())
}
