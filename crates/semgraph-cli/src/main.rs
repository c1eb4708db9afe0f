//! Taxonomic graph toolkit CLI.
//!
//! Provides the `semgraph` binary with subcommands for working with graphs
//! serialized as JSON: `stats` summarizes a graph, `apply` runs a configured
//! action pipeline over it, and `sim` scores a vertex pair with a selected
//! similarity measure.
//!
//! The binary owns all file I/O: graphs and action lists are read here and
//! handed to the engines as data. Identifier-list files referenced by an
//! `iris_file` option are expanded into inline `iris` options before the
//! specs reach the pipeline.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use semgraph_algo::pipeline::{apply_actions, Collaborators};
use semgraph_algo::{parse_actions, ActionSpec};
use semgraph_core::{GraphStore, PredicateRegistry, VertexKind};
use semgraph_sim::{MeasureConfig, SimilarityEngine};

/// Taxonomic graph analysis tools.
#[derive(Parser)]
#[command(name = "semgraph", about = "Taxonomic graph analysis tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Print vertex/edge statistics of a graph.
    Stats {
        /// Path to the graph JSON file.
        #[arg(short, long)]
        graph: PathBuf,
    },

    /// Run an action pipeline over a graph.
    Apply {
        /// Path to the graph JSON file.
        #[arg(short, long)]
        graph: PathBuf,

        /// Path to the actions JSON file (array of {kind, options}).
        #[arg(short, long)]
        actions: PathBuf,

        /// Where to write the transformed graph (default: overwrite input).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Score the similarity of two vertices.
    Sim {
        /// Path to the graph JSON file.
        #[arg(short, long)]
        graph: PathBuf,

        /// Measure identifier: pekar-staab, rada, wu-palmer, resnik-seco.
        #[arg(short, long, default_value = "pekar-staab")]
        measure: String,

        /// IRI of the first vertex.
        a: String,

        /// IRI of the second vertex.
        b: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let exit_code = match cli.command {
        Commands::Stats { graph } => run_stats(&graph),
        Commands::Apply { graph, actions, out } => run_apply(&graph, &actions, out),
        Commands::Sim {
            graph,
            measure,
            a,
            b,
        } => run_sim(&graph, &measure, &a, &b),
    };
    process::exit(exit_code);
}

// Exit codes across subcommands: 0 = success, 1 = engine error,
// 2 = bad input file or arguments.

fn load_graph(path: &PathBuf) -> Result<GraphStore, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read graph '{}': {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| format!("failed to parse graph '{}': {}", path.display(), e))
}

fn run_stats(graph_path: &PathBuf) -> i32 {
    let graph = match load_graph(graph_path) {
        Ok(g) => g,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 2;
        }
    };

    let stats = serde_json::json!({
        "vertices": graph.vertex_count(),
        "classes": graph.vertex_count_of(VertexKind::Class),
        "instances": graph.vertex_count_of(VertexKind::Instance),
        "edges": graph.edge_count(),
        "generation": graph.generation(),
    });
    println!("{}", serde_json::to_string_pretty(&stats).unwrap_or_default());
    0
}

fn run_apply(graph_path: &PathBuf, actions_path: &PathBuf, out: Option<PathBuf>) -> i32 {
    let mut graph = match load_graph(graph_path) {
        Ok(g) => g,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 2;
        }
    };

    let actions_content = match fs::read_to_string(actions_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!(
                "Error: failed to read actions '{}': {}",
                actions_path.display(),
                e
            );
            return 2;
        }
    };
    let specs = match parse_actions(&actions_content) {
        Ok(specs) => specs,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 2;
        }
    };
    let specs = match expand_file_options(specs) {
        Ok(specs) => specs,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 2;
        }
    };

    let registry = PredicateRegistry::new();
    // No external reasoner or type inferencer is wired into the CLI yet;
    // actions requiring one fail with a configuration error.
    if let Err(e) = apply_actions(&specs, &mut graph, &registry, &Collaborators::none()) {
        eprintln!("Error: {}", e);
        return 1;
    }

    tracing::info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "pipeline finished"
    );

    let out_path = out.unwrap_or_else(|| graph_path.clone());
    let serialized = match serde_json::to_string_pretty(&graph) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: failed to serialize graph: {}", e);
            return 1;
        }
    };
    if let Err(e) = fs::write(&out_path, serialized) {
        eprintln!("Error: failed to write '{}': {}", out_path.display(), e);
        return 2;
    }
    println!(
        "{} vertices, {} edges written to {}",
        graph.vertex_count(),
        graph.edge_count(),
        out_path.display()
    );
    0
}

fn run_sim(graph_path: &PathBuf, measure: &str, a: &str, b: &str) -> i32 {
    let graph = match load_graph(graph_path) {
        Ok(g) => g,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 2;
        }
    };

    let config = match MeasureConfig::parse(measure) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 2;
        }
    };

    let registry = PredicateRegistry::new();
    let result = (|| {
        let a = graph.resolve(a)?;
        let b = graph.resolve(b)?;
        let engine = SimilarityEngine::new(&graph, &registry)?;
        engine.similarity_between(&a, &b, &config)
    })();

    match result {
        Ok(score) => {
            println!("{}", score);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

/// Replaces every `iris_file` option with an inline `iris` option holding
/// the file contents (one IRI per line, blank lines ignored; multiple files
/// separated by commas).
fn expand_file_options(specs: Vec<ActionSpec>) -> Result<Vec<ActionSpec>, String> {
    let mut expanded = Vec::with_capacity(specs.len());
    for mut spec in specs {
        if let Some(paths) = spec.options.remove("iris_file") {
            let mut iris: Vec<String> = Vec::new();
            for path in paths.split(',') {
                let path = path.trim();
                let content = fs::read_to_string(path)
                    .map_err(|e| format!("failed to read IRI list '{}': {}", path, e))?;
                iris.extend(
                    content
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .map(str::to_owned),
                );
            }
            spec.options.insert("iris".to_owned(), iris.join(","));
        }
        expanded.push(spec);
    }
    Ok(expanded)
}
