use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ExprError;
use crate::node::{CaseLabels, Node, Op};
use crate::value::Value;

/// The flat, serializable form of a node, one row per tree vertex.
///
/// `parent_id` is `None` exactly at the root and `child_index` is the
/// ordinal among siblings (`None` at the root). `value` holds the
/// evaluated value as JSON; `operator` is one of the stable tags
/// (`leaf`, `plus`, …). The nullable `labels` column and the
/// default-false `minimal` flag carry lookup/conditional metadata and
/// simplifier marks through the round trip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub child_index: Option<usize>,
    pub name: Option<String>,
    pub value: serde_json::Value,
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<CaseLabels>,
    #[serde(default)]
    pub minimal: bool,
}

/// Flattens a tree into records in pre-order.
///
/// Stable: repeated calls on the same tree yield identical sequences.
pub fn flatten(root: &Node) -> Vec<Record> {
    let mut out = Vec::new();
    walk(root, None, None, &mut out);
    debug!("flattened tree {} into {} records", root.id(), out.len());
    out
}

fn walk(node: &Node, parent: Option<Uuid>, index: Option<usize>, out: &mut Vec<Record>) {
    out.push(Record {
        id: node.id(),
        parent_id: parent,
        child_index: index,
        name: node.name().map(str::to_owned),
        value: value_to_json(node.value()),
        operator: node.op().tag().to_owned(),
        labels: node.labels().cloned(),
        minimal: node.is_minimal(),
    });
    for (i, child) in node.operands().iter().enumerate() {
        walk(child, Some(node.id()), Some(i), out);
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Int(v) => serde_json::Value::from(*v),
        // Non-finite floats have no JSON number form.
        Value::Float(v) => serde_json::Number::from_f64(*v)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Bool(v) => serde_json::Value::from(*v),
        Value::Str(v) => serde_json::Value::from(v.as_str()),
        Value::Null => serde_json::Value::Null,
    }
}

fn value_from_json(value: &serde_json::Value) -> Result<Value, ExprError> {
    match value {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(v) => Ok(Value::Bool(*v)),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(v) => Ok(Value::Int(v)),
            None => n
                .as_f64()
                .map(Value::Float)
                .ok_or_else(|| ExprError::Integrity(format!("unrepresentable number {}", n))),
        },
        serde_json::Value::String(s) => Ok(Value::Str(s.clone())),
        other => Err(ExprError::Integrity(format!(
            "unsupported value column {}",
            other
        ))),
    }
}

/// Rebuilds a tree from its flattened records.
///
/// Rejects duplicate ids, zero or multiple roots, dangling parent
/// references, cycles (records unreachable from the root), and child
/// indexes that are missing, duplicated, or non-contiguous.
pub fn reconstruct(records: &[Record]) -> Result<Node, ExprError> {
    if records.is_empty() {
        return Err(ExprError::Integrity("no records".into()));
    }
    let mut by_id: HashMap<Uuid, &Record> = HashMap::with_capacity(records.len());
    for record in records {
        if by_id.insert(record.id, record).is_some() {
            return Err(ExprError::Integrity(format!(
                "duplicate record id {}",
                record.id
            )));
        }
    }
    let mut children: HashMap<Uuid, Vec<&Record>> = HashMap::new();
    let mut root: Option<&Record> = None;
    for record in records {
        match record.parent_id {
            None => {
                if record.child_index.is_some() {
                    return Err(ExprError::Integrity(format!(
                        "root record {} carries a child index",
                        record.id
                    )));
                }
                if root.replace(record).is_some() {
                    return Err(ExprError::Integrity("multiple roots".into()));
                }
            }
            Some(parent) => {
                if !by_id.contains_key(&parent) {
                    return Err(ExprError::Integrity(format!(
                        "record {} references missing parent {}",
                        record.id, parent
                    )));
                }
                if record.child_index.is_none() {
                    return Err(ExprError::Integrity(format!(
                        "record {} is missing its child index",
                        record.id
                    )));
                }
                children.entry(parent).or_default().push(record);
            }
        }
    }
    let root = root.ok_or_else(|| ExprError::Integrity("no root record".into()))?;
    let mut reached = 0usize;
    let node = build(root, &children, &mut reached)?;
    if reached != records.len() {
        return Err(ExprError::Integrity(format!(
            "{} records are unreachable from the root",
            records.len() - reached
        )));
    }
    debug!("reconstructed tree {} from {} records", root.id, reached);
    Ok(node)
}

fn build(
    record: &Record,
    children: &HashMap<Uuid, Vec<&Record>>,
    reached: &mut usize,
) -> Result<Node, ExprError> {
    *reached += 1;
    let op = Op::from_tag(&record.operator).ok_or_else(|| {
        ExprError::Integrity(format!("unknown operator tag {:?}", record.operator))
    })?;
    let mut kids: Vec<&Record> = children.get(&record.id).cloned().unwrap_or_default();
    kids.sort_by_key(|c| c.child_index);
    for (i, kid) in kids.iter().enumerate() {
        if kid.child_index != Some(i) {
            return Err(ExprError::Integrity(format!(
                "child indexes of {} are not contiguous",
                record.id
            )));
        }
    }
    if op == Op::Leaf && !kids.is_empty() {
        return Err(ExprError::Integrity(format!(
            "leaf record {} has operands",
            record.id
        )));
    }
    let operands = kids
        .into_iter()
        .map(|kid| build(kid, children, reached))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Node::from_parts(
        record.id,
        record.name.clone(),
        value_from_json(&record.value)?,
        op,
        operands,
        record.labels.clone(),
        record.minimal,
    ))
}
