use std::fs;
use std::io::Write;

use anyhow::{Context, Result};
use funcviz_core::graph::build_graph;

use crate::canonicalize_or_current;
use crate::commands::util::{load_input_functions, resolve_config, InputArgs, StyleArgs};

/// Output path meaning "write to stdout".
pub const STDOUT_OUTPUT: &str = "-";

/// Build the DOT text for the selected input.
pub fn build_dot(input: &InputArgs, style: &StyleArgs) -> Result<(String, usize)> {
    let config = resolve_config(input.config.as_deref())?;
    let options = style.apply(config.graph_options())?;
    let functions = load_input_functions(input, &config)?;
    let graph = build_graph(&functions, &options);
    Ok((graph.to_dot(), graph.function_count()))
}

/// Write the dependency graph of the selected input as DOT text.
pub fn dot_command(input: &InputArgs, style: &StyleArgs, output: &str) -> Result<()> {
    let (dot, functions) = build_dot(input, style)?;

    if output == STDOUT_OUTPUT {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(dot.as_bytes()).context("Failed to write DOT to stdout")?;
        return Ok(());
    }

    let out_path = canonicalize_or_current(output)?;
    fs::write(&out_path, &dot)
        .with_context(|| format!("Failed to write DOT file at {}", out_path.display()))?;

    println!("Wrote function graph:");
    println!("  Functions: {functions}");
    println!("  DOT file:  {}", out_path.display());
    Ok(())
}
