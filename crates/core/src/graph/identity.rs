//! Kind-dispatch table deriving a resource's label and node identity.
//!
//! Every rule is a pure function of the binding kind, its fields and (for the
//! per-function kinds) the function name. Two bindings resolving to the same
//! identity are drawn as a single node.

use crate::model::BindingFields;

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub function_name: &'a str,
    pub kind: &'a str,
    pub fields: &'a BindingFields,
    pub default_connection: &'a str,
    /// Fold the consumer group into event hub identities.
    pub event_hub_consumer_group: bool,
}

impl RuleInput<'_> {
    fn connection(&self) -> &str {
        self.fields.connection_or(self.default_connection)
    }

    /// `<kind> - <function>`: identity scoped to a single function.
    fn function_scoped(&self) -> String {
        format!("{} - {}", self.kind, self.function_name)
    }
}

/// Label and identity of a resource node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceKey {
    pub label: String,
    pub identity: String,
}

impl ResourceKey {
    fn new(label: impl Into<String>, identity: String) -> Self {
        Self { label: label.into(), identity }
    }
}

/// What a binding turns into on the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A (possibly shared) resource node.
    Resource(ResourceKey),
    /// An HTTP route owned by the function.
    HttpRoute { route: String },
    /// Nothing is drawn.
    Elided,
}

pub type Rule = fn(&RuleInput<'_>) -> Resolution;

/// Consumer group event hubs read from when none is declared.
pub const DEFAULT_CONSUMER_GROUP: &str = "$Default";

/// Kind tag to rule. Kinds missing here use `fallback`.
pub const RULES: &[(&str, Rule)] = &[
    ("queueTrigger", queue),
    ("queue", queue),
    ("httpTrigger", http_trigger),
    ("http", elided),
    ("blobTrigger", blob),
    ("blob", blob),
    ("serviceBusTrigger", service_bus),
    ("serviceBus", service_bus),
    ("timerTrigger", timer),
    ("eventHubTrigger", event_hub),
    ("eventHub", event_hub),
    ("documentDB", document_db),
    ("manualTrigger", manual),
    ("table", table),
];

/// Rule for `kind`; exact, case-sensitive match on the declared type.
pub fn rule_for(kind: &str) -> Rule {
    RULES.iter().find(|(tag, _)| *tag == kind).map(|(_, rule)| *rule).unwrap_or(fallback)
}

pub fn resolve(input: &RuleInput<'_>) -> Resolution {
    rule_for(input.kind)(input)
}

/// Undeclared fields render as the empty string.
fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn queue(input: &RuleInput<'_>) -> Resolution {
    let f = input.fields;
    Resolution::Resource(ResourceKey::new(
        "Queue",
        format!("Queue - {} - {}", field(&f.queue_name), input.connection()),
    ))
}

fn http_trigger(input: &RuleInput<'_>) -> Resolution {
    Resolution::HttpRoute { route: input.fields.route_or_default(input.function_name) }
}

fn elided(_: &RuleInput<'_>) -> Resolution {
    Resolution::Elided
}

fn blob(input: &RuleInput<'_>) -> Resolution {
    let f = input.fields;
    Resolution::Resource(ResourceKey::new(
        "Blob",
        format!("Blob - {} - {}", field(&f.path), input.connection()),
    ))
}

fn service_bus(input: &RuleInput<'_>) -> Resolution {
    let f = input.fields;
    Resolution::Resource(ResourceKey::new(
        "Service Bus",
        format!(
            "ServiceBus - {} - {} - {} - {}",
            field(&f.queue_name),
            field(&f.topic_name),
            field(&f.subscription_name),
            input.connection()
        ),
    ))
}

fn timer(input: &RuleInput<'_>) -> Resolution {
    let label = match input.fields.schedule.as_deref() {
        Some(schedule) => format!("Timer\n{schedule}"),
        None => "Timer".to_string(),
    };
    Resolution::Resource(ResourceKey::new(label, input.function_scoped()))
}

fn event_hub(input: &RuleInput<'_>) -> Resolution {
    let f = input.fields;
    let mut identity = format!("EventHub - {} - {}", field(&f.path), input.connection());
    if input.event_hub_consumer_group {
        identity.push_str(" - ");
        identity.push_str(f.consumer_group.as_deref().unwrap_or(DEFAULT_CONSUMER_GROUP));
    }
    Resolution::Resource(ResourceKey::new("Event Hub", identity))
}

fn document_db(input: &RuleInput<'_>) -> Resolution {
    let f = input.fields;
    Resolution::Resource(ResourceKey::new(
        "DocumentDB",
        format!(
            "DocumentDB - {} - {} - {}",
            field(&f.database_name),
            field(&f.collection_name),
            input.connection()
        ),
    ))
}

fn manual(input: &RuleInput<'_>) -> Resolution {
    Resolution::Resource(ResourceKey::new("Manual", input.function_scoped()))
}

fn table(input: &RuleInput<'_>) -> Resolution {
    let f = input.fields;
    Resolution::Resource(ResourceKey::new(
        "Table",
        format!("Table - {} - {}", field(&f.table_name), input.connection()),
    ))
}

fn fallback(input: &RuleInput<'_>) -> Resolution {
    Resolution::Resource(ResourceKey::new(input.kind, input.function_scoped()))
}
