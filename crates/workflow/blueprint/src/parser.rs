//! Parser: resolve blueprint field aliases into typed nodes and edges
//!
//! Designer payloads are loosely typed. Every alias and coercion rule
//! lives here, so the compiler only ever sees a [`ParsedBlueprint`].
//!
//! Node aliases: `id`/`key`, `name`/`title`, `type`/`kind`,
//! `roles`/`assignee_roles`, `perms`/`permissions`, `meta`.
//! Edge aliases: `source`/`from`, `target`/`to`, `name`, `condition`,
//! `parallel` or `is_parallel_fork`/`is_parallel_join`.

use crate::blueprint::{Blueprint, RawElement};
use crate::errors::{BlueprintError, BlueprintResult};
use routeflow_types::{Condition, ConditionKind, Meta, StepKind};
use serde_json::Value;

/// Parsed blueprint: the intermediate representation
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedBlueprint {
    pub key: String,
    pub title: String,
    pub version: u32,
    pub nodes: Vec<ParsedNode>,
    pub edges: Vec<ParsedEdge>,
}

/// A node with every alias resolved
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedNode {
    pub id: String,
    pub name: String,
    pub kind: StepKind,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub meta: Meta,
}

/// An edge with every alias resolved
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedEdge {
    pub name: Option<String>,
    pub source: String,
    pub target: String,
    pub condition: Option<Condition>,
    pub fork: bool,
    pub join: bool,
}

/// Alias-resolving parser for designer blueprints
pub struct Parser;

impl Parser {
    /// Parse every node and edge; the first malformed element aborts.
    pub fn parse(blueprint: &Blueprint) -> BlueprintResult<ParsedBlueprint> {
        let nodes = blueprint
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| Self::parse_node(index, node))
            .collect::<BlueprintResult<Vec<_>>>()?;
        let edges = blueprint
            .edges
            .iter()
            .enumerate()
            .map(|(index, edge)| Self::parse_edge(index, edge))
            .collect::<BlueprintResult<Vec<_>>>()?;

        Ok(ParsedBlueprint {
            key: blueprint.key.clone(),
            title: blueprint.display_title().to_string(),
            version: blueprint.version,
            nodes,
            edges,
        })
    }

    pub fn parse_node(index: usize, node: &RawElement) -> BlueprintResult<ParsedNode> {
        let id = first_text(node, &["id", "key"]).ok_or(BlueprintError::MissingNodeId { index })?;
        let name = first_text(node, &["name", "title"]).unwrap_or_else(|| id.clone());
        let kind = first_text(node, &["type", "kind"])
            .map(|text| StepKind::parse_lenient(&text))
            .unwrap_or_default();

        let meta = match node.get("meta") {
            Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            _ => Meta::new(),
        };

        Ok(ParsedNode {
            name,
            kind,
            roles: first_list(node, &["roles", "assignee_roles"]),
            permissions: first_list(node, &["perms", "permissions"]),
            meta,
            id,
        })
    }

    pub fn parse_edge(index: usize, edge: &RawElement) -> BlueprintResult<ParsedEdge> {
        let source = first_text(edge, &["source", "from"]).ok_or(
            BlueprintError::MissingEdgeEndpoint {
                index,
                field: "source",
            },
        )?;
        let target = first_text(edge, &["target", "to"]).ok_or(
            BlueprintError::MissingEdgeEndpoint {
                index,
                field: "target",
            },
        )?;

        let parallel = edge
            .get("parallel")
            .and_then(Value::as_str)
            .map(|p| p.trim().to_lowercase());

        Ok(ParsedEdge {
            name: first_text(edge, &["name"]),
            condition: parse_condition(index, edge.get("condition"))?,
            fork: edge.get("is_parallel_fork").is_some_and(truthy)
                || parallel.as_deref() == Some("fork"),
            join: edge.get("is_parallel_join").is_some_and(truthy)
                || parallel.as_deref() == Some("join"),
            source,
            target,
        })
    }
}

fn parse_condition(index: usize, value: Option<&Value>) -> BlueprintResult<Option<Condition>> {
    match value {
        Some(Value::String(expr)) if !expr.trim().is_empty() => {
            Ok(Some(Condition::new(expr.trim())))
        }
        Some(Value::Object(map)) => {
            let expr = match map.get("expr") {
                None | Some(Value::Null) => return Ok(None),
                Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
                Some(Value::String(s)) => s.clone(),
                // Structured JsonLogic keeps its JSON text
                Some(other) => other.to_string(),
            };
            let kind = match map.get("kind").and_then(scalar_text) {
                None => ConditionKind::JsonLogic,
                Some(text) => match text.trim().to_lowercase().as_str() {
                    "jsonlogic" => ConditionKind::JsonLogic,
                    "expr" => ConditionKind::Expr,
                    _ => return Err(BlueprintError::InvalidConditionKind { index, kind: text }),
                },
            };
            Ok(Some(Condition::new(expr).with_kind(kind)))
        }
        _ => Ok(None),
    }
}

/// Text of a scalar value, kept verbatim; numbers are rendered as text.
///
/// Blank strings count as absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_text(element: &RawElement, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| element.get(*key))
        .find_map(scalar_text)
}

/// First alias holding a non-empty list (or a single non-blank string).
fn first_list(element: &RawElement, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .filter_map(|key| element.get(*key))
        .map(string_list)
        .find(|list| !list.is_empty())
        .unwrap_or_default()
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        ),
        _ => false,
    }
}
