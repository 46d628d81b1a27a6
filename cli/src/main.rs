//! Orgcausal CLI: run causal analytics over a graph snapshot
//!
//! Loads a JSON snapshot (and optionally a YAML/JSON engine config) into an
//! in-process engine, runs one query, and prints a table or JSON.

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use orgcausal::graph::{Direction, EdgeType, GraphSnapshot, OutcomeType, VertexId};
use orgcausal::{CausalEngine, CausalPath, EngineConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "orgcausal", version, about = "Causal analytics over an organizational graph")]
struct Cli {
    /// Graph snapshot (JSON)
    #[arg(long, short, env = "ORGCAUSAL_SNAPSHOT")]
    snapshot: PathBuf,

    /// Engine config (YAML or JSON)
    #[arg(long, short, env = "ORGCAUSAL_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum DirectionArg {
    Outgoing,
    Incoming,
    Both,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Outgoing => Direction::Outgoing,
            DirectionArg::Incoming => Direction::Incoming,
            DirectionArg::Both => Direction::Both,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutcomeArg {
    Intended,
    Unintended,
    Emergent,
}

impl From<OutcomeArg> for OutcomeType {
    fn from(arg: OutcomeArg) -> Self {
        match arg {
            OutcomeArg::Intended => OutcomeType::Intended,
            OutcomeArg::Unintended => OutcomeType::Unintended,
            OutcomeArg::Emergent => OutcomeType::Emergent,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Intent vs. outcome gap of an initiative
    Gap {
        /// Initiative vertex id
        initiative: u64,
    },
    /// Metrics straying from their target
    Gameable {
        /// Relative gap threshold (defaults to the configured one)
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Metrics with no initiative behind them
    Theater,
    /// Synergy score of a department
    Synergy {
        /// Department vertex id
        department: u64,
    },
    /// Simple paths between two vertices
    Paths {
        from: u64,
        to: u64,
        #[arg(long)]
        max_depth: Option<usize>,
        /// Restrict to these edge types (repeatable)
        #[arg(long = "edge-type")]
        edge_types: Vec<EdgeType>,
        #[arg(long)]
        max_paths: Option<usize>,
        /// Only the path with the highest strength product
        #[arg(long)]
        strongest: bool,
    },
    /// Vertices reachable from a start vertex
    Traverse {
        start: u64,
        #[arg(long)]
        max_depth: Option<usize>,
        #[arg(long, default_value = "outgoing")]
        direction: DirectionArg,
        #[arg(long = "edge-type")]
        edge_types: Vec<EdgeType>,
        /// Only report outcomes of this type
        #[arg(long)]
        outcome_type: Option<OutcomeArg>,
    },
    /// Graph statistics
    Stats,
    /// Print the RDF projection as N-Triples
    Mirror,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult {
    let engine = load_engine(&cli)?;
    let format = &cli.format;

    match cli.command {
        Commands::Gap { initiative } => run_gap(&engine, initiative, format),
        Commands::Gameable { threshold } => run_gameable(&engine, threshold, format),
        Commands::Theater => run_theater(&engine, format),
        Commands::Synergy { department } => run_synergy(&engine, department, format),
        Commands::Paths {
            from,
            to,
            max_depth,
            edge_types,
            max_paths,
            strongest,
        } => {
            let mut query = engine.path_query();
            if let Some(depth) = max_depth {
                query.max_depth = depth;
            }
            if !edge_types.is_empty() {
                query.edge_types = Some(edge_types);
            }
            if max_paths.is_some() {
                query.max_paths = max_paths;
            }
            let (from, to) = (VertexId::new(from), VertexId::new(to));
            let paths = if strongest {
                engine.strongest_path(from, to, &query)?.into_iter().collect()
            } else {
                engine.find_paths(from, to, &query)?
            };
            print_paths(&engine, &paths, format)
        }
        Commands::Traverse {
            start,
            max_depth,
            direction,
            edge_types,
            outcome_type,
        } => {
            let mut query = engine.traversal_query().direction(direction.into());
            if let Some(depth) = max_depth {
                query.max_depth = depth;
            }
            if !edge_types.is_empty() {
                query.edge_types = Some(edge_types);
            }
            query.outcome_type = outcome_type.map(OutcomeType::from);
            run_traverse(&engine, VertexId::new(start), &query, format)
        }
        Commands::Stats => run_stats(&engine, format),
        Commands::Mirror => {
            let (mirror, _feed) = engine.attach_mirror()?;
            print!("{}", mirror.to_ntriples());
            Ok(())
        }
    }
}

fn load_engine(cli: &Cli) -> Result<CausalEngine, Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let json = std::fs::read_to_string(&cli.snapshot)?;
    let snapshot = GraphSnapshot::from_json(&json)?;

    let engine = CausalEngine::new(config);
    engine.import_snapshot(snapshot)?;
    Ok(engine)
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

/// "name (#id)" for a vertex, or the bare id if it vanished
fn label(engine: &CausalEngine, id: VertexId) -> String {
    match engine.get_vertex(id) {
        Ok(Some(vertex)) => format!("{} (#{})", vertex.display_name(), id.as_u64()),
        _ => format!("#{}", id.as_u64()),
    }
}

fn run_gap(engine: &CausalEngine, initiative: u64, format: &OutputFormat) -> CliResult {
    let report = engine.calculate_gap(VertexId::new(initiative))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            let names = |vertices: &[orgcausal::Vertex]| {
                vertices
                    .iter()
                    .map(|v| v.display_name().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            let mut table = new_table(vec!["Field", "Value"]);
            table.add_row(vec!["Initiative".to_string(), label(engine, report.initiative_id)]);
            table.add_row(vec!["Gap score".to_string(), format!("{:.2}", report.gap_score)]);
            table.add_row(vec!["Analysis".to_string(), report.analysis.to_string()]);
            table.add_row(vec!["Avg metric gap".to_string(), format!("{:.3}", report.avg_metric_gap)]);
            table.add_row(vec!["Intended".to_string(), names(&report.intended)]);
            table.add_row(vec!["Actual".to_string(), names(&report.actual)]);
            table.add_row(vec!["Metrics".to_string(), names(&report.metrics)]);
            println!("{}", table);
        }
    }
    Ok(())
}

fn run_gameable(engine: &CausalEngine, threshold: Option<f64>, format: &OutputFormat) -> CliResult {
    let metrics = engine.find_gameable_metrics(threshold)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&metrics)?),
        OutputFormat::Table => {
            if metrics.is_empty() {
                println!("(no gameable metrics)");
                return Ok(());
            }
            let mut table = new_table(vec!["Id", "Metric", "Value", "Target", "Gap", "Suspicion"]);
            for m in &metrics {
                table.add_row(vec![
                    m.metric_id.as_u64().to_string(),
                    m.name.clone(),
                    m.value.to_string(),
                    m.target.to_string(),
                    format!("{:.3}", m.gap),
                    m.suspicion_level.to_string(),
                ]);
            }
            println!("{}", table);
            println!("{} metric(s)", metrics.len());
        }
    }
    Ok(())
}

fn run_theater(engine: &CausalEngine, format: &OutputFormat) -> CliResult {
    let metrics = engine.detect_theater_metrics()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&metrics)?),
        OutputFormat::Table => {
            if metrics.is_empty() {
                println!("(no theater metrics)");
                return Ok(());
            }
            let mut table = new_table(vec!["Id", "Metric", "Theater score"]);
            for m in &metrics {
                table.add_row(vec![
                    m.metric_id.as_u64().to_string(),
                    m.name.clone(),
                    m.theater_score.to_string(),
                ]);
            }
            println!("{}", table);
            println!("{} metric(s)", metrics.len());
        }
    }
    Ok(())
}

fn run_synergy(engine: &CausalEngine, department: u64, format: &OutputFormat) -> CliResult {
    let report = engine.calculate_synergy(VertexId::new(department))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            let mut table = new_table(vec!["Field", "Value"]);
            table.add_row(vec!["Department".to_string(), report.department.clone()]);
            table.add_row(vec!["Employees".to_string(), report.employee_count.to_string()]);
            table.add_row(vec!["Initiatives".to_string(), report.initiative_count.to_string()]);
            table.add_row(vec!["Avg wellness".to_string(), format!("{:.2}", report.avg_wellness)]);
            table.add_row(vec!["Avg engagement".to_string(), format!("{:.2}", report.avg_engagement)]);
            table.add_row(vec![
                "Completed / abandoned".to_string(),
                format!("{} / {}", report.completed, report.abandoned),
            ]);
            table.add_row(vec!["Success ratio".to_string(), format!("{:.3}", report.success_ratio)]);
            table.add_row(vec!["Synergy score".to_string(), format!("{:.2}", report.synergy_score)]);
            table.add_row(vec!["Grade".to_string(), report.grade.to_string()]);
            println!("{}", table);
        }
    }
    Ok(())
}

fn print_paths(engine: &CausalEngine, paths: &[CausalPath], format: &OutputFormat) -> CliResult {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(paths)?),
        OutputFormat::Table => {
            if paths.is_empty() {
                println!("(no paths)");
                return Ok(());
            }
            let mut table = new_table(vec!["#", "Strength", "Length", "Path"]);
            for (n, path) in paths.iter().enumerate() {
                let route = path
                    .vertices
                    .iter()
                    .map(|&id| label(engine, id))
                    .collect::<Vec<_>>()
                    .join(" -> ");
                table.add_row(vec![
                    (n + 1).to_string(),
                    format!("{:.4}", path.strength),
                    path.length.to_string(),
                    route,
                ]);
            }
            println!("{}", table);
            println!("{} path(s)", paths.len());
        }
    }
    Ok(())
}

fn run_traverse(
    engine: &CausalEngine,
    start: VertexId,
    query: &orgcausal::TraversalQuery,
    format: &OutputFormat,
) -> CliResult {
    let hits = engine.traverse(start, query)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&hits)?),
        OutputFormat::Table => {
            if hits.is_empty() {
                println!("(nothing reachable)");
                return Ok(());
            }
            let mut table = new_table(vec!["Depth", "Id", "Kind", "Name"]);
            for hit in &hits {
                table.add_row(vec![
                    hit.depth.to_string(),
                    hit.vertex.id.as_u64().to_string(),
                    hit.vertex.kind().to_string(),
                    hit.vertex.display_name().to_string(),
                ]);
            }
            println!("{}", table);
            println!("{} vertex(es)", hits.len());
        }
    }
    Ok(())
}

fn run_stats(engine: &CausalEngine, format: &OutputFormat) -> CliResult {
    let stats = engine.statistics()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Table => {
            let mut table = new_table(vec!["Metric", "Value"]);
            table.add_row(vec!["Vertices".to_string(), stats.vertex_count.to_string()]);
            table.add_row(vec!["Edges".to_string(), stats.edge_count.to_string()]);
            for (kind, count) in &stats.vertices_by_kind {
                table.add_row(vec![format!("  {}", kind), count.to_string()]);
            }
            for (edge_type, count) in &stats.edges_by_type {
                table.add_row(vec![format!("  {}", edge_type), count.to_string()]);
            }
            table.add_row(vec!["Avg strength".to_string(), format!("{:.3}", stats.average_strength)]);
            println!("{}", table);
        }
    }
    Ok(())
}
