use funcviz_core::graph::{build_graph, Endpoint, GraphBuilder, GraphOptions, HttpMode, Node, Palette};
use funcviz_core::metadata::parse_function;
use funcviz_core::model::{BindingDirection, FunctionMetadata};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn function(name: &str, unit: Value) -> FunctionMetadata {
    parse_function(name, &unit).expect("valid unit")
}

fn queue_pair() -> Vec<FunctionMetadata> {
    vec![
        function("Foo", json!({"bindings": [{"type": "queueTrigger", "queueName": "q1"}]})),
        function(
            "Bar",
            json!({"bindings": [{"type": "queue", "direction": "out", "queueName": "q1"}]}),
        ),
    ]
}

#[test]
fn shared_queue_collapses_to_one_node() {
    let graph = build_graph(&queue_pair(), &GraphOptions::default());

    assert_eq!(graph.function_count(), 2);
    assert_eq!(graph.resource_count(), 1);

    let queue_id = "Queue - q1 - AzureWebJobsStorage";
    assert_eq!(
        graph.nodes()[1],
        Node::Resource {
            identity: queue_id.into(),
            label: "Queue".into(),
            role: BindingDirection::Trigger
        }
    );

    let edges = graph.edges();
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0].from, Endpoint::Node(queue_id.into()));
    assert_eq!(edges[0].to, Endpoint::Node("Foo".into()));
    assert_eq!(edges[0].role, BindingDirection::Trigger);
    assert_eq!(edges[1].from, Endpoint::Node("Bar".into()));
    assert_eq!(edges[1].to, Endpoint::Node(queue_id.into()));
    assert_eq!(edges[1].role, BindingDirection::Out);
}

#[test]
fn queue_pair_renders_expected_dot() {
    let dot = build_graph(&queue_pair(), &GraphOptions::default()).to_dot();
    let expected = concat!(
        "digraph Functions {\n",
        "   graph [fontname = \"Segoe UI\"];\n",
        "   node[fontname = \"Segoe UI\", shape = box, style = filled];\n",
        "   edge[fontname = \"Segoe UI\", fontsize = 10];\n",
        "   \"Foo\" [shape=note, fillcolor=\"/blues4/1\"]\n",
        "   \"Queue - q1 - AzureWebJobsStorage\" [label = \"Queue\", fillcolor=\"/blues4/2\"]\n",
        "   \"Bar\" [shape=note, fillcolor=\"/blues4/1\"]\n",
        "   \"Queue - q1 - AzureWebJobsStorage\" -> \"Foo\" [arrowhead = vee, label=\"   Trigger\"]\n",
        "   \"Bar\" -> \"Queue - q1 - AzureWebJobsStorage\" [arrowhead = box, label=\"   Output\"]\n",
        "}\n",
    );
    assert_eq!(dot, expected);
}

#[test]
fn each_resource_declared_exactly_once() {
    let functions = vec![
        function(
            "A",
            json!({"bindings": [
                {"type": "blobTrigger", "path": "in/{name}"},
                {"type": "table", "direction": "out", "tableName": "T"}
            ]}),
        ),
        function(
            "B",
            json!({"bindings": [
                {"type": "blob", "direction": "in", "path": "in/{name}"},
                {"type": "table", "direction": "in", "tableName": "T"}
            ]}),
        ),
        function("C", json!({"bindings": [{"type": "table", "tableName": "T"}]})),
    ];
    let dot = build_graph(&functions, &GraphOptions::default()).to_dot();

    let declarations = |id: &str| {
        dot.lines().filter(|l| l.trim_start().starts_with(&format!("\"{id}\" [label"))).count()
    };
    assert_eq!(declarations("Blob - in/{name} - AzureWebJobsStorage"), 1);
    assert_eq!(declarations("Table - T - AzureWebJobsStorage"), 1);

    let table_edges = dot.lines().filter(|l| l.contains("\"Table - T - AzureWebJobsStorage\" ->")).count()
        + dot.lines().filter(|l| l.contains("-> \"Table - T - AzureWebJobsStorage\"")).count();
    assert_eq!(table_edges, 3);
}

#[test]
fn function_nodes_appear_once_per_unit() {
    let functions = vec![
        function(
            "Busy",
            json!({"bindings": [
                {"type": "queueTrigger", "queueName": "a"},
                {"type": "queue", "direction": "out", "queueName": "b"},
                {"type": "queue", "direction": "out", "queueName": "c"}
            ]}),
        ),
        function("Idle", json!({"bindings": [{"type": "manualTrigger"}]})),
    ];
    let graph = build_graph(&functions, &GraphOptions::default());
    assert_eq!(graph.function_count(), functions.len());

    let dot = graph.to_dot();
    assert_eq!(dot.lines().filter(|l| l.trim_start().starts_with("\"Busy\" [shape=note")).count(), 1);
}

#[test]
fn edge_direction_follows_binding_direction() {
    let functions = vec![function(
        "Fn",
        json!({"bindings": [
            {"type": "eventHubTrigger", "path": "hub"},
            {"type": "documentDB", "direction": "in", "databaseName": "d", "collectionName": "c"},
            {"type": "serviceBus", "direction": "out", "queueName": "sb"}
        ]}),
    )];
    let graph = build_graph(&functions, &GraphOptions::default());
    let fn_end = Endpoint::Node("Fn".into());

    let edges = graph.edges();
    assert_eq!(edges[0].to, fn_end);
    assert_eq!(edges[1].to, fn_end);
    assert_eq!(edges[2].from, fn_end);
    assert_eq!(
        edges.iter().map(|e| e.role).collect::<Vec<_>>(),
        [BindingDirection::Trigger, BindingDirection::In, BindingDirection::Out]
    );

    let dot = graph.to_dot();
    assert!(dot.contains("-> \"Fn\" [arrowhead = dot, label=\"   Input\"]"));
    assert!(dot.contains("\"Fn\" -> \"ServiceBus - sb -  -  - AzureWebJobsStorage\" [arrowhead = box"));
}

#[test]
fn building_twice_is_byte_identical() {
    let functions = vec![
        function("H", json!({"bindings": [{"type": "httpTrigger"}, {"type": "http", "direction": "out"}]})),
        function("T", json!({"bindings": [{"type": "timerTrigger", "schedule": "0 */5 * * * *"}]})),
        function("Q", json!({"bindings": [{"type": "queueTrigger", "queueName": "x"}]})),
    ];
    let options = GraphOptions::default();
    assert_eq!(build_graph(&functions, &options).to_dot(), build_graph(&functions, &options).to_dot());
}

#[test]
fn http_triggers_aggregate_into_one_table() {
    let functions = vec![
        function(
            "GetItems",
            json!({"bindings": [{"type": "httpTrigger", "route": "items"}, {"type": "http", "direction": "out"}]}),
        ),
        function("Ping", json!({"bindings": [{"type": "httpTrigger"}]})),
    ];
    let graph = build_graph(&functions, &GraphOptions::default());

    let routes: Vec<(&str, &str)> =
        graph.http_routes().iter().map(|r| (r.function.as_str(), r.route.as_str())).collect();
    assert_eq!(routes, [("GetItems", "items"), ("Ping", "/api/Ping")]);
    assert_eq!(graph.resource_count(), 0, "http bindings never create resource nodes");

    let dot = graph.to_dot();
    assert!(dot.contains("<td colspan=\"2\">HTTP Triggers</td>"));
    assert!(dot.contains("port=\"Ping\"><font point-size=\"10\"><b>/api/Ping</b>"));
    assert!(dot.contains("\"/httpTrigger\":\"GetItems\" -> \"GetItems\" [arrowhead = vee"));
    assert!(dot.contains("\"/httpTrigger\":\"Ping\" -> \"Ping\""));
    assert_eq!(dot.matches("\"/httpTrigger\" [shape=none").count(), 1);
    assert!(dot.trim_end().ends_with("</tr></table>>];\n}"));
}

#[test]
fn no_http_triggers_means_no_table() {
    let dot = build_graph(&queue_pair(), &GraphOptions::default()).to_dot();
    assert!(!dot.contains("HTTP Triggers"));
    assert!(!dot.contains("httpTrigger"));
}

#[test]
fn http_node_mode_draws_standalone_nodes() {
    let options = GraphOptions { http_mode: HttpMode::Node, ..GraphOptions::default() };
    let functions = vec![function("Ping", json!({"bindings": [{"type": "httpTrigger"}]}))];
    let graph = build_graph(&functions, &options);

    assert!(graph.http_routes().is_empty());
    assert_eq!(
        graph.nodes()[1],
        Node::Resource {
            identity: "httpTrigger - Ping".into(),
            label: "HTTP\n/api/Ping".into(),
            role: BindingDirection::Trigger
        }
    );
    let dot = graph.to_dot();
    assert!(dot.contains("\"httpTrigger - Ping\" [label = \"HTTP\\n/api/Ping\""));
    assert!(!dot.contains("HTTP Triggers"));
}

#[test]
fn unknown_kind_never_collapses_across_functions() {
    let functions = vec![
        function("A", json!({"bindings": [{"type": "customThing", "direction": "out"}]})),
        function("B", json!({"bindings": [{"type": "customThing", "direction": "out"}]})),
    ];
    let graph = build_graph(&functions, &GraphOptions::default());
    let resources: Vec<&str> = graph
        .nodes()
        .iter()
        .filter_map(|n| match n {
            Node::Resource { identity, label, .. } => {
                assert_eq!(label, "customThing");
                Some(identity.as_str())
            }
            Node::Function { .. } => None,
        })
        .collect();
    assert_eq!(resources, ["customThing - A", "customThing - B"]);
}

#[test]
fn timer_label_escapes_newline() {
    let functions =
        vec![function("Nightly", json!({"bindings": [{"type": "timerTrigger", "schedule": "0 0 3 * * *"}]}))];
    let dot = build_graph(&functions, &GraphOptions::default()).to_dot();
    assert!(dot.contains("\"timerTrigger - Nightly\" [label = \"Timer\\n0 0 3 * * *\", fillcolor=\"/blues4/2\"]"));
}

#[test]
fn excluded_functions_are_still_drawn() {
    let functions = vec![function(
        "Hidden",
        json!({"excluded": true, "bindings": [{"type": "queueTrigger", "queueName": "q"}]}),
    )];
    let graph = build_graph(&functions, &GraphOptions::default());
    assert_eq!(graph.function_count(), 1);
}

#[test]
fn options_change_connection_palette_and_font() {
    let options = GraphOptions {
        default_connection: "Storage2".into(),
        palette: Palette::Classic,
        font: "Fira Sans".into(),
        ..GraphOptions::default()
    };
    let functions = vec![function(
        "Fn",
        json!({"bindings": [{"type": "queue", "direction": "out", "queueName": "q"}]}),
    )];
    let dot = build_graph(&functions, &options).to_dot();
    assert!(dot.contains("\"Fn\" [shape=note, fillcolor=\"beige\"]"));
    assert!(dot.contains("\"Queue - q - Storage2\" [label = \"Queue\", fillcolor=\"/bugn3/3\"]"));
    assert!(dot.contains("graph [fontname = \"Fira Sans\"];"));
}

#[test]
fn event_hub_consumer_group_variant_splits_nodes() {
    let functions = vec![
        function("A", json!({"bindings": [{"type": "eventHubTrigger", "path": "hub", "consumerGroup": "a"}]})),
        function("B", json!({"bindings": [{"type": "eventHubTrigger", "path": "hub", "consumerGroup": "b"}]})),
    ];
    let merged = build_graph(&functions, &GraphOptions::default());
    assert_eq!(merged.resource_count(), 1);

    let options = GraphOptions { event_hub_consumer_group: true, ..GraphOptions::default() };
    let split = build_graph(&functions, &options);
    assert_eq!(split.resource_count(), 2);
}

#[test]
fn identifiers_with_quotes_are_escaped() {
    let functions = vec![function(
        "Fn",
        json!({"bindings": [{"type": "blob", "direction": "out", "path": "out/\"quoted\".txt"}]}),
    )];
    let dot = build_graph(&functions, &GraphOptions::default()).to_dot();
    assert!(dot.contains(r#""Blob - out/\"quoted\".txt - AzureWebJobsStorage""#));
}

#[test]
fn builder_accumulates_across_calls() {
    let options = GraphOptions::default();
    let pair = queue_pair();
    let mut builder = GraphBuilder::new(&options);
    builder.add_function(&pair[0]).add_function(&pair[1]);
    let incremental = builder.finish();
    assert_eq!(incremental, build_graph(&pair, &options));
}

#[test]
fn function_named_like_the_http_table_stays_separate() {
    let functions = vec![
        function("httpTrigger", json!({"bindings": [{"type": "queueTrigger", "queueName": "q"}]})),
        function("Ping", json!({"bindings": [{"type": "httpTrigger"}]})),
    ];
    let dot = build_graph(&functions, &GraphOptions::default()).to_dot();

    let declarations =
        dot.lines().filter(|l| l.trim_start().starts_with("\"httpTrigger\" [")).count();
    assert_eq!(declarations, 1);
    assert!(dot.contains("\"httpTrigger\" [shape=note"));
    assert!(dot.contains("\"Queue - q - AzureWebJobsStorage\" -> \"httpTrigger\""));
    assert!(dot.contains("\"/httpTrigger\" [shape=none"));
    assert!(dot.contains("\"/httpTrigger\":\"Ping\" -> \"Ping\""));
    assert!(
        !dot.lines().any(|l| l.trim_start().starts_with("httpTrigger")),
        "table node must not share the unquoted function id"
    );
}
