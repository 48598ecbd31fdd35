use anyhow::{Context, Result};
use funcviz_core::graph::identity::{resolve, Resolution, RuleInput};
use funcviz_core::graph::GraphOptions;
use funcviz_core::model::{Binding, FunctionMetadata};
use serde::Serialize;

use crate::commands::util::{load_input_functions, resolve_config, InputArgs};

/// A binding as reported by `list`, with the graph node it resolves to.
#[derive(Debug, Serialize)]
pub struct ListedBinding {
    pub kind: String,
    pub direction: &'static str,
    /// Node identity, HTTP route, or `None` when the binding is not drawn.
    pub node: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListedFunction {
    pub name: String,
    pub excluded: bool,
    pub bindings: Vec<ListedBinding>,
}

fn describe_binding(
    function: &FunctionMetadata,
    binding: &Binding,
    options: &GraphOptions,
) -> ListedBinding {
    let input = RuleInput {
        function_name: &function.name,
        kind: &binding.kind,
        fields: &binding.fields,
        default_connection: &options.default_connection,
        event_hub_consumer_group: options.event_hub_consumer_group,
    };
    let node = match resolve(&input) {
        Resolution::Resource(key) => Some(key.identity),
        Resolution::HttpRoute { route } => Some(format!("HTTP {route}")),
        Resolution::Elided => None,
    };
    ListedBinding { kind: binding.kind.clone(), direction: binding.direction.as_str(), node }
}

/// Summarize the functions of the selected input.
pub fn list_functions(input: &InputArgs) -> Result<Vec<ListedFunction>> {
    let config = resolve_config(input.config.as_deref())?;
    let options = config.graph_options();
    let functions = load_input_functions(input, &config)?;
    Ok(functions
        .iter()
        .map(|function| ListedFunction {
            name: function.name.clone(),
            excluded: function.excluded,
            bindings: function
                .bindings
                .iter()
                .map(|binding| describe_binding(function, binding, &options))
                .collect(),
        })
        .collect())
}

/// List discovered functions and their bindings.
pub fn list_command(input: &InputArgs, json: bool) -> Result<()> {
    let functions = list_functions(input)?;

    if json {
        let out = serde_json::to_string_pretty(&functions)
            .context("Failed to serialize function listing")?;
        println!("{out}");
        return Ok(());
    }

    if functions.is_empty() {
        println!("No functions found.");
        return Ok(());
    }

    println!("Functions ({}):", functions.len());
    for function in &functions {
        let marker = if function.excluded { " [excluded]" } else { "" };
        println!("- {}{marker}", function.name);
        for binding in &function.bindings {
            match &binding.node {
                Some(node) => println!(
                    "    {:<7} {:<18} {}",
                    binding.direction,
                    binding.kind,
                    node.replace('\n', " ")
                ),
                None => println!("    {:<7} {}", binding.direction, binding.kind),
            }
        }
    }
    Ok(())
}
