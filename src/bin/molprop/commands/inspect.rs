use std::io::Write;

use anyhow::{Context, Result};

use molprop::GraphConfig;
use molprop::graph::from_molecule;

use crate::cli::InspectArgs;
use crate::display::{Context as DisplayContext, print_element_distribution, print_graph_summary};
use crate::io::create_output;

pub fn run_inspect(args: InspectArgs, _ctx: DisplayContext) -> Result<()> {
    let mol = molprop::parse_smiles(&args.smiles)
        .with_context(|| format!("Failed to parse SMILES '{}'", args.smiles))?;
    let config = GraphConfig {
        strict_adjacency: args.strict_adjacency,
    };
    let graph = from_molecule(&mol, &config);

    if args.json {
        let mut out = create_output(args.output.as_deref())?;
        serde_json::to_writer_pretty(&mut out, &graph).context("Failed to serialize graph")?;
        writeln!(out).context("Failed to write graph")?;
        out.flush().context("Failed to write graph")?;
        return Ok(());
    }

    print_graph_summary(&mol, &graph, args.strict_adjacency);
    print_element_distribution(&mol);
    Ok(())
}
