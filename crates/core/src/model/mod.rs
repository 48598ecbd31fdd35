//! Normalized in-memory model of function configuration units.
//!
//! A `FunctionMetadata` is produced once per `function.json` by the metadata
//! parser and is immutable afterwards. Bindings keep their declaration order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Connection setting name used when a binding does not declare one.
pub const DEFAULT_CONNECTION: &str = "AzureWebJobsStorage";

/// Role a binding plays for its function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingDirection {
    /// The binding that invokes the function.
    Trigger,
    In,
    Out,
}

impl BindingDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindingDirection::Trigger => "trigger",
            BindingDirection::In => "in",
            BindingDirection::Out => "out",
        }
    }

    /// Classify a binding from its declared kind and optional direction.
    ///
    /// Kinds ending in `Trigger` are triggers no matter what direction says.
    pub fn classify(kind: &str, declared: Option<&str>) -> Self {
        if kind.to_ascii_lowercase().ends_with("trigger") {
            BindingDirection::Trigger
        } else if declared.is_some_and(|d| d.eq_ignore_ascii_case("out")) {
            BindingDirection::Out
        } else {
            BindingDirection::In
        }
    }
}

/// Declared configuration keys of one binding.
///
/// The keys the graph rules look at get their own slot; everything else the
/// unit declared lands in `other`, keyed by the original name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_group: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub other: BTreeMap<String, String>,
}

impl BindingFields {
    /// Store a raw key/value pair, routing known keys to their typed slot.
    pub fn insert(&mut self, key: &str, value: String) {
        let slot = match key {
            "name" => &mut self.name,
            "queueName" => &mut self.queue_name,
            "connection" => &mut self.connection,
            "path" => &mut self.path,
            "topicName" => &mut self.topic_name,
            "subscriptionName" => &mut self.subscription_name,
            "schedule" => &mut self.schedule,
            "databaseName" => &mut self.database_name,
            "collectionName" => &mut self.collection_name,
            "tableName" => &mut self.table_name,
            "route" => &mut self.route,
            "consumerGroup" => &mut self.consumer_group,
            _ => {
                self.other.insert(key.to_string(), value);
                return;
            }
        };
        *slot = Some(value);
    }

    /// Look up any declared key by its configuration name.
    pub fn get(&self, key: &str) -> Option<&str> {
        let slot = match key {
            "name" => &self.name,
            "queueName" => &self.queue_name,
            "connection" => &self.connection,
            "path" => &self.path,
            "topicName" => &self.topic_name,
            "subscriptionName" => &self.subscription_name,
            "schedule" => &self.schedule,
            "databaseName" => &self.database_name,
            "collectionName" => &self.collection_name,
            "tableName" => &self.table_name,
            "route" => &self.route,
            "consumerGroup" => &self.consumer_group,
            other => return self.other.get(other).map(String::as_str),
        };
        slot.as_deref()
    }

    /// Connection setting name, falling back to `default` when undeclared.
    pub fn connection_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.connection.as_deref().unwrap_or(default)
    }

    /// Declared HTTP route, or `/api/<function>` when none is declared.
    pub fn route_or_default(&self, function_name: &str) -> String {
        match &self.route {
            Some(route) => route.clone(),
            None => format!("/api/{function_name}"),
        }
    }
}

/// One declared connection point of a function to the outside world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub kind: String,
    pub direction: BindingDirection,
    pub fields: BindingFields,
}

impl Binding {
    pub fn new(kind: impl Into<String>, direction: BindingDirection, fields: BindingFields) -> Self {
        Self { kind: kind.into(), direction, fields }
    }

    pub fn is_trigger(&self) -> bool {
        self.direction == BindingDirection::Trigger
    }
}

/// One unit of compute: a name and its bindings in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionMetadata {
    pub name: String,
    pub bindings: Vec<Binding>,
    /// Parsed from the unit but not consulted when building graphs.
    #[serde(default)]
    pub excluded: bool,
}

impl FunctionMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), bindings: Vec::new(), excluded: false }
    }

    pub fn with_binding(mut self, binding: Binding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// The first trigger binding, if any.
    pub fn trigger(&self) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.is_trigger())
    }
}
