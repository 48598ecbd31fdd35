use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use funcviz_core::graph::build_graph;
use funcviz_core::services::render::render_dot_text;
use funcviz_core::services::{GraphvizRenderer, Renderer};

use crate::commands::util::{load_input_functions, resolve_config, InputArgs, StyleArgs};
use crate::{canonicalize_or_current, default_output_name};

/// Build the graph and render it to an image with Graphviz.
///
/// `format` and the renderer binary default to the config; `keep_dot` also
/// writes the intermediate DOT file to that path.
pub fn render_command(
    input: &InputArgs,
    style: &StyleArgs,
    format: Option<&str>,
    output: Option<&str>,
    keep_dot: Option<&str>,
) -> Result<()> {
    let config = resolve_config(input.config.as_deref())?;
    let options = style.apply(config.graph_options())?;
    let format = format.unwrap_or(&config.renderer.format);
    let default_output = default_output_name(format);
    let out_path = canonicalize_or_current(output.unwrap_or(&default_output))?;

    let functions = load_input_functions(input, &config)?;
    let graph = build_graph(&functions, &options);
    let dot = graph.to_dot();

    let renderer = GraphvizRenderer::new(config.renderer.dot_path.as_ref().map(PathBuf::from));
    let rendered = match keep_dot {
        Some(path) => {
            let dot_path = canonicalize_or_current(path)?;
            fs::write(&dot_path, &dot)
                .with_context(|| format!("Failed to write DOT file at {}", dot_path.display()))?;
            renderer.render(&dot_path, format, &out_path)
        }
        None => render_dot_text(&renderer, &dot, format, &out_path),
    };
    rendered.with_context(|| {
        format!("Failed to render graph with {} ({})", renderer.name(), renderer.binary().display())
    })?;

    println!("Rendered function graph:");
    println!("  Functions: {}", graph.function_count());
    println!("  Format:    {format}");
    println!("  Output:    {}", out_path.display());
    if let Some(path) = keep_dot {
        println!("  DOT file:  {path}");
    }
    Ok(())
}
