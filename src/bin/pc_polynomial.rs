//! Counting polynomial command line.
//!
//! ## Commands
//!
//! - `compute`: N(T) for a `.graph` layout or a named family
//! - `tutte`: Tutte polynomial or one of its specializations
//! - `simulate`: count wavefront points at numeric lengths
//! - `evaluate`: evaluate a stored `.poly` file at numeric lengths
//! - `todd`: print the generic `R_k`
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (default: pc_polynomial=info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: pretty)
//!
//! Logs go to stderr; results go to stdout.
//!
//! ## Usage
//!
//! ```bash
//! pc_polynomial compute --family triangle
//! pc_polynomial compute --input drawings/h.graph --mode outward --save
//! pc_polynomial simulate --family triangle --lengths 1,1.4142,1.7321 --horizon 20
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pc_polynomial::algebra::Symbol;
use pc_polynomial::io::graph_file::POSITIONAL_PREFIX;
use pc_polynomial::io::{poly_path_for, read_poly, write_poly};
use pc_polynomial::{
    critical_polynomial, ehrhart_polynomial, tutte_polynomial, AssemblyPolicy, CountingMode, Family, Graph,
    GraphLayout, PolynomialAssembler, ToddPolynomial, VertexId, WavefrontSimulator, WeightNaming, LAMBDA_SYMBOL,
    LENGTH_SYMBOL, RECOMMENDED_EDGE_CEILING,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "pc_polynomial=info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .flatten_event(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

#[derive(Parser)]
#[command(name = "pc_polynomial", version, about = "Reflection-point counting polynomials for metric graphs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the graph comes from.
#[derive(clap::Args)]
struct GraphArgs {
    /// Read a `.graph` layout file
    #[arg(long, short, value_name = "FILE", conflicts_with = "family")]
    input: Option<PathBuf>,
    /// Use a named family: single, multiedge:<m>, bamboo:<len>, triangle, triangle-tail, h, loop-tail
    #[arg(long, short)]
    family: Option<Family>,
    /// How edge weights are named when reading a layout
    #[arg(long, value_enum, default_value_t = NamingArg::Positional)]
    naming: NamingArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum NamingArg {
    /// Edge i gets t_i
    Positional,
    /// Edge names are the weights
    Names,
}

#[derive(Clone, Copy, ValueEnum)]
enum TutteKind {
    /// T(x, y)
    Tutte,
    /// T(1, y)
    Critical,
    /// T(x, 1 + 1/x)
    Ehrhart,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the counting polynomial N(T)
    Compute {
        #[command(flatten)]
        graph: GraphArgs,
        /// Counting variant
        #[arg(long, short, default_value = "inward")]
        mode: CountingMode,
        /// Source vertex
        #[arg(long, default_value_t = 0)]
        source: u32,
        /// Refuse graphs with more edges
        #[arg(long)]
        edge_limit: Option<usize>,
        /// Print the fully symbolic form instead of the unit-weight form
        #[arg(long)]
        symbolic: bool,
        /// Print the full report as JSON instead of the polynomial
        #[arg(long)]
        json: bool,
        /// Write the polynomial to this `.poly` file
        #[arg(long, value_name = "FILE")]
        poly_out: Option<PathBuf>,
        /// Write the polynomial next to the input layout
        #[arg(long, requires = "input")]
        save: bool,
    },
    /// Compute the Tutte polynomial or a specialization
    Tutte {
        #[command(flatten)]
        graph: GraphArgs,
        #[arg(long, value_enum, default_value_t = TutteKind::Tutte)]
        kind: TutteKind,
    },
    /// Count wavefront points with a direct simulation
    Simulate {
        #[command(flatten)]
        graph: GraphArgs,
        /// Edge lengths: `1,1.41` binds t_0, t_1; `a=1,b=2` binds by name
        #[arg(long, value_delimiter = ',', required = true)]
        lengths: Vec<String>,
        /// Time horizon T
        #[arg(long)]
        horizon: f64,
        /// Source vertex
        #[arg(long, default_value_t = 0)]
        source: u32,
    },
    /// Evaluate a stored polynomial
    Evaluate {
        /// `.poly` file
        #[arg(value_name = "FILE")]
        poly: PathBuf,
        /// Edge lengths, as for `simulate`
        #[arg(long, value_delimiter = ',')]
        lengths: Vec<String>,
        /// Value of T
        #[arg(long)]
        horizon: f64,
    },
    /// Print the generic Todd polynomial R_k
    Todd {
        /// Order k
        order: usize,
    },
}

fn load_graph(args: &GraphArgs) -> CliResult<Graph> {
    let naming = match args.naming {
        NamingArg::Positional => WeightNaming::Positional,
        NamingArg::Names => WeightNaming::EdgeNames,
    };
    let (vertices, edges, graph) = match (&args.input, args.family) {
        (Some(path), _) => GraphLayout::load(path)?.to_graph(naming)?,
        (None, Some(family)) => family.build(),
        (None, None) => return Err("either --input or --family is required".into()),
    };
    info!(vertices, edges, "Loaded graph");
    if edges > RECOMMENDED_EDGE_CEILING {
        tracing::warn!(
            edges,
            ceiling = RECOMMENDED_EDGE_CEILING,
            "Graph is large; subgraph enumeration may take a long time"
        );
    }
    Ok(graph)
}

fn parse_lengths(entries: &[String]) -> CliResult<BTreeMap<Symbol, f64>> {
    let mut lengths = BTreeMap::new();
    for (i, entry) in entries.iter().enumerate() {
        let (symbol, value) = match entry.split_once('=') {
            Some((name, value)) => (Symbol::new(name.trim()), value),
            None => (Symbol::indexed(POSITIONAL_PREFIX, i), entry.as_str()),
        };
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|_| format!("invalid length '{entry}'"))?;
        lengths.insert(symbol, value);
    }
    Ok(lengths)
}

fn save_poly(path: &Path, polynomial: &pc_polynomial::CountingPolynomial) -> CliResult<()> {
    write_poly(path, polynomial)?;
    info!(path = %path.display(), "Wrote polynomial");
    Ok(())
}

fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Compute {
            graph,
            mode,
            source,
            edge_limit,
            symbolic,
            json,
            poly_out,
            save,
        } => {
            let input = graph.input.clone();
            let graph = load_graph(&graph)?;
            let mut policy = AssemblyPolicy {
                mode,
                ..AssemblyPolicy::default()
            }
            .with_source(VertexId::new(source));
            if let Some(limit) = edge_limit {
                policy = policy.with_edge_limit(limit);
            }
            let report = PolynomialAssembler::new(policy).build_report(&graph)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if symbolic {
                println!("{}", report.polynomial.for_persistence());
            } else {
                println!("{}", report.polynomial.for_display()?);
            }

            if let Some(path) = poly_out {
                save_poly(&path, &report.polynomial)?;
            }
            if let (true, Some(input)) = (save, input) {
                save_poly(&poly_path_for(&input), &report.polynomial)?;
            }
        }
        Commands::Tutte { graph, kind } => {
            let graph = load_graph(&graph)?;
            let polynomial = match kind {
                TutteKind::Tutte => tutte_polynomial(&graph),
                TutteKind::Critical => critical_polynomial(&graph)?,
                TutteKind::Ehrhart => ehrhart_polynomial(&graph)?,
            };
            println!("{polynomial}");
        }
        Commands::Simulate {
            graph,
            lengths,
            horizon,
            source,
        } => {
            let graph = load_graph(&graph)?;
            let lengths = parse_lengths(&lengths)?;
            let count = WavefrontSimulator::new().count_at(&graph, VertexId::new(source), &lengths, horizon)?;
            println!("{count}");
        }
        Commands::Evaluate { poly, lengths, horizon } => {
            let polynomial = read_poly(&poly, Symbol::new(LENGTH_SYMBOL))?;
            let lengths = parse_lengths(&lengths)?;
            println!("{}", polynomial.evaluate(horizon, &lengths)?);
        }
        Commands::Todd { order } => {
            let rk = ToddPolynomial::generic(order)?;
            println!("{}", rk.to_expr(&Symbol::new(LAMBDA_SYMBOL)));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
