// SPDX-License-Identifier: MIT OR Apache-2.0

//! A command-line frontend for `pkgraph`.
//!
//! `pkgraph` builds a dependency graph over a package universe and answers
//! radius-bounded neighborhood queries against it. This binary drives that core
//! library against a JSON package dump in place of a live repository metadata
//! backend.
//!
//! # Commands
//!
//! * `build`: build the graph from a package dump and print summary stats
//! * `neighborhood`: build the graph, then print the induced sub-multigraph around
//!   a root package as sigma.js-compatible JSON

mod dump;

use std::path::PathBuf;

use anyhow::{Context, Result};
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use pkgraph::graph::{GraphBuilder, NeighborhoodDirection};

#[derive(Debug, StructOpt)]
#[structopt(about = "Build and query a package dependency graph")]
struct Args {
    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    #[structopt(name = "build")]
    /// Build the graph from a package dump and print summary stats
    Build(BuildOptions),
    #[structopt(name = "neighborhood")]
    /// Print the sigma.js JSON for the neighborhood of a package
    Neighborhood(NeighborhoodOptions),
}

#[derive(Debug, StructOpt)]
struct BuildOptions {
    /// Path to a JSON package dump
    dump: PathBuf,

    #[structopt(long)]
    /// Log (without aborting) source packages appearing where only binaries are
    /// expected
    with_check: bool,
}

#[derive(Debug, StructOpt)]
struct NeighborhoodOptions {
    /// Path to a JSON package dump
    dump: PathBuf,

    /// The package name to center the neighborhood on
    root: String,

    /// How many hops out from the root to include
    #[structopt(long, default_value = "1")]
    radius: usize,

    #[structopt(long)]
    /// Treat edges as undirected when walking outward from the root
    undirected: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::from_args();
    match args.cmd {
        Command::Build(options) => cmd_build(options),
        Command::Neighborhood(options) => cmd_neighborhood(options),
    }
}

fn cmd_build(options: BuildOptions) -> Result<()> {
    let oracle = dump::load_oracle(&options.dump)?;
    let mut builder = GraphBuilder::new(oracle).with_structural_check(options.with_check);
    let graph = builder.build().context("building package graph")?;

    println!("nodes: {}", graph.node_count());
    println!("edges: {}", graph.edge_count());
    println!("stats: {}", builder.stats());
    Ok(())
}

fn cmd_neighborhood(options: NeighborhoodOptions) -> Result<()> {
    let oracle = dump::load_oracle(&options.dump)?;
    let mut builder = GraphBuilder::new(oracle);
    let graph = builder.build().context("building package graph")?;

    let direction = if options.undirected {
        NeighborhoodDirection::Undirected
    } else {
        NeighborhoodDirection::Directed
    };
    let sub = graph
        .neighborhood(&options.root, options.radius, direction)
        .with_context(|| format!("computing neighborhood of '{}'", options.root))?;

    let json = sub.to_sigma_json().context("serializing neighborhood to sigma.js JSON")?;
    println!("{}", json);
    Ok(())
}
