//! Translation of parsed function metadata into a Graphviz dependency graph.
//!
//! The builder walks functions in input order and bindings in declaration
//! order, resolving every binding through the kind-dispatch table in
//! [`identity`]. Resource nodes are deduplicated by identity within one build;
//! edges are always kept.

pub mod dot;
pub mod identity;

use std::collections::HashSet;
use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::model::{BindingDirection, FunctionMetadata, DEFAULT_CONNECTION};

pub use dot::Palette;
pub use identity::{ResourceKey, Resolution};

/// How HTTP triggers are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HttpMode {
    /// One shared table node with a cell (and port) per function.
    #[default]
    Aggregate,
    /// One ordinary resource node per HTTP-triggered function.
    Node,
}

impl HttpMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "aggregate" => Some(HttpMode::Aggregate),
            "node" => Some(HttpMode::Node),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMode::Aggregate => "aggregate",
            HttpMode::Node => "node",
        }
    }
}

/// Knobs for a single graph build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphOptions {
    pub default_connection: String,
    pub http_mode: HttpMode,
    pub event_hub_consumer_group: bool,
    pub palette: Palette,
    pub font: String,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            default_connection: DEFAULT_CONNECTION.to_string(),
            http_mode: HttpMode::default(),
            event_hub_consumer_group: false,
            palette: Palette::default(),
            font: "Segoe UI".to_string(),
        }
    }
}

/// A declared node of the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Function { name: String },
    Resource { identity: String, label: String, role: BindingDirection },
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::Function { name } => name,
            Node::Resource { identity, .. } => identity,
        }
    }
}

/// One end of an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Node(String),
    /// The cell of the HTTP table owned by the named function.
    HttpPort(String),
}

impl Endpoint {
    fn render(&self) -> String {
        match self {
            Endpoint::Node(id) => dot::quote_id(id),
            Endpoint::HttpPort(function) => {
                format!("{}:{}", dot::quote_id(dot::HTTP_TABLE_ID), dot::quote_id(function))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: Endpoint,
    pub to: Endpoint,
    pub role: BindingDirection,
}

/// Route cell of the aggregated HTTP table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRoute {
    pub function: String,
    pub route: String,
}

/// The complete dependency graph, ready to be written as DOT text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    http_routes: Vec<HttpRoute>,
    palette: Palette,
    font: String,
}

impl Graph {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn http_routes(&self) -> &[HttpRoute] {
        &self.http_routes
    }

    pub fn function_count(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n, Node::Function { .. })).count()
    }

    pub fn resource_count(&self) -> usize {
        self.nodes.len() - self.function_count()
    }

    /// Render the graph as DOT text.
    pub fn to_dot(&self) -> String {
        let mut out = String::with_capacity(256 + 96 * (self.nodes.len() + self.edges.len()));
        dot::write_preamble(&mut out, &self.font);

        for node in &self.nodes {
            let _ = writeln!(out, "{}{}", dot::INDENT, self.node_line(node));
        }

        for edge in &self.edges {
            let arrow = match edge.role {
                BindingDirection::Trigger => dot::TRIGGER_ARROW,
                BindingDirection::In => dot::INPUT_ARROW,
                BindingDirection::Out => dot::OUTPUT_ARROW,
            };
            let _ = writeln!(
                out,
                "{}{} -> {} [{}]",
                dot::INDENT,
                edge.from.render(),
                edge.to.render(),
                arrow
            );
        }

        if !self.http_routes.is_empty() {
            let _ = writeln!(out, "{}{}", dot::INDENT, dot::http_table_open(self.http_routes.len()));
            for route in &self.http_routes {
                let _ = writeln!(
                    out,
                    "{}{}{}",
                    dot::INDENT,
                    dot::INDENT,
                    dot::http_cell(&route.function, &route.route, self.palette)
                );
            }
            let _ = writeln!(out, "{}{}", dot::INDENT, dot::HTTP_TABLE_CLOSE);
        }

        out.push_str("}\n");
        out
    }

    fn node_line(&self, node: &Node) -> String {
        match node {
            Node::Function { name } => {
                format!("{} [{}]", dot::quote_id(name), self.palette.function_attrs())
            }
            Node::Resource { identity, label, role } => {
                let style = match role {
                    BindingDirection::Trigger => self.palette.trigger_attrs(),
                    BindingDirection::In => self.palette.input_attrs(),
                    BindingDirection::Out => self.palette.output_attrs(),
                };
                format!(
                    "{} [label = \"{}\", {}]",
                    dot::quote_id(identity),
                    dot::escape_label(label),
                    style
                )
            }
        }
    }
}

/// Accumulates functions into a [`Graph`].
///
/// The seen-sets live only as long as the builder, so separate builds never
/// influence each other.
pub struct GraphBuilder<'a> {
    options: &'a GraphOptions,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    http_routes: Vec<HttpRoute>,
    seen_functions: HashSet<String>,
    seen_resources: HashSet<String>,
    seen_routes: HashSet<String>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(options: &'a GraphOptions) -> Self {
        Self {
            options,
            nodes: Vec::new(),
            edges: Vec::new(),
            http_routes: Vec::new(),
            seen_functions: HashSet::new(),
            seen_resources: HashSet::new(),
            seen_routes: HashSet::new(),
        }
    }

    pub fn add_function(&mut self, function: &FunctionMetadata) -> &mut Self {
        let options = self.options;
        let name = function.name.as_str();
        if self.seen_functions.insert(name.to_string()) {
            self.nodes.push(Node::Function { name: name.to_string() });
        }

        for binding in &function.bindings {
            let input = identity::RuleInput {
                function_name: name,
                kind: &binding.kind,
                fields: &binding.fields,
                default_connection: &options.default_connection,
                event_hub_consumer_group: options.event_hub_consumer_group,
            };

            let source = match identity::resolve(&input) {
                Resolution::Elided => continue,
                Resolution::HttpRoute { route } => match options.http_mode {
                    HttpMode::Aggregate => {
                        if self.seen_routes.insert(name.to_string()) {
                            self.http_routes
                                .push(HttpRoute { function: name.to_string(), route });
                        }
                        Endpoint::HttpPort(name.to_string())
                    }
                    HttpMode::Node => self.declare_resource(
                        ResourceKey {
                            label: format!("HTTP\n{route}"),
                            identity: format!("{} - {}", binding.kind, name),
                        },
                        binding.direction,
                    ),
                },
                Resolution::Resource(key) => self.declare_resource(key, binding.direction),
            };

            let function_end = Endpoint::Node(name.to_string());
            let (from, to) = match binding.direction {
                BindingDirection::Out => (function_end, source),
                BindingDirection::Trigger | BindingDirection::In => (source, function_end),
            };
            self.edges.push(Edge { from, to, role: binding.direction });
        }
        self
    }

    pub fn add_functions<'f>(
        &mut self,
        functions: impl IntoIterator<Item = &'f FunctionMetadata>,
    ) -> &mut Self {
        for function in functions {
            self.add_function(function);
        }
        self
    }

    pub fn finish(self) -> Graph {
        tracing::info!(
            functions = self.seen_functions.len(),
            resources = self.seen_resources.len(),
            edges = self.edges.len(),
            http_routes = self.http_routes.len(),
            "built function graph"
        );
        Graph {
            nodes: self.nodes,
            edges: self.edges,
            http_routes: self.http_routes,
            palette: self.options.palette,
            font: self.options.font.clone(),
        }
    }

    fn declare_resource(&mut self, key: ResourceKey, role: BindingDirection) -> Endpoint {
        if self.seen_resources.insert(key.identity.clone()) {
            self.nodes.push(Node::Resource {
                identity: key.identity.clone(),
                label: key.label,
                role,
            });
        } else {
            tracing::debug!(identity = %key.identity, "resource node already declared");
        }
        Endpoint::Node(key.identity)
    }
}

/// Build a graph from functions in the given order.
pub fn build_graph(functions: &[FunctionMetadata], options: &GraphOptions) -> Graph {
    let mut builder = GraphBuilder::new(options);
    builder.add_functions(functions);
    builder.finish()
}
