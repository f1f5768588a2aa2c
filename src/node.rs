use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::render;
use crate::simplify;
use crate::value::Value;

/// The operator kinds a node can be tagged with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// A bound or literal operand, no operator.
    Leaf,
    /// N-ary addition (flattened).
    Plus,
    /// Binary subtraction, left-associative.
    Minus,
    /// N-ary multiplication (flattened).
    Times,
    /// Binary division, left-associative, always Float.
    DividedBy,
    /// Equality comparison.
    Eq,
    /// Inequality comparison.
    Neq,
    /// Greater-than comparison.
    Gt,
    /// Greater-or-equal comparison.
    Gte,
    /// Less-than comparison.
    Lt,
    /// Less-or-equal comparison.
    Lte,
    /// N-ary conjunction (flattened).
    And,
    /// N-ary disjunction (flattened).
    Or,
    /// Unary boolean negation; erased by simplification and rendering.
    Not,
    /// If/elif/else chain: operands `cond₁, then₁, …, else`.
    Conditional,
    /// Table lookup: operands `key, selected value`.
    Lookup,
    /// Table lookup with a default for a missing key.
    UncertainLookup,
}

impl Op {
    /// Stable tag used in the record layer.
    pub fn tag(&self) -> &'static str {
        match self {
            Op::Leaf => "leaf",
            Op::Plus => "plus",
            Op::Minus => "minus",
            Op::Times => "times",
            Op::DividedBy => "divided_by",
            Op::Eq => "eq",
            Op::Neq => "neq",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::And => "and",
            Op::Or => "or",
            Op::Not => "not",
            Op::Conditional => "conditional",
            Op::Lookup => "lookup",
            Op::UncertainLookup => "uncertain_lookup",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Op> {
        Some(match tag {
            "leaf" => Op::Leaf,
            "plus" => Op::Plus,
            "minus" => Op::Minus,
            "times" => Op::Times,
            "divided_by" => Op::DividedBy,
            "eq" => Op::Eq,
            "neq" => Op::Neq,
            "gt" => Op::Gt,
            "gte" => Op::Gte,
            "lt" => Op::Lt,
            "lte" => Op::Lte,
            "and" => Op::And,
            "or" => Op::Or,
            "not" => Op::Not,
            "conditional" => Op::Conditional,
            "lookup" => Op::Lookup,
            "uncertain_lookup" => Op::UncertainLookup,
            _ => return None,
        })
    }

    /// Infix symbol used by the renderer. Empty for non-infix operators.
    pub(crate) fn symbol(&self) -> &'static str {
        match self {
            Op::Plus => "+",
            Op::Minus => "-",
            Op::Times => "×",
            Op::DividedBy => "/",
            Op::Eq => "=",
            Op::Neq => "≠",
            Op::Gt => ">",
            Op::Gte => "≥",
            Op::Lt => "<",
            Op::Lte => "≤",
            Op::And => "and",
            Op::Or => "or",
            _ => "",
        }
    }

    /// The dual recorded when a comparison evaluates false, so the stored
    /// expression reads as a true statement about the operands.
    pub(crate) fn flipped(self) -> Op {
        match self {
            Op::Gt => Op::Lte,
            Op::Gte => Op::Lt,
            Op::Lt => Op::Gte,
            Op::Lte => Op::Gt,
            Op::Eq => Op::Neq,
            Op::Neq => Op::Eq,
            other => other,
        }
    }

    pub(crate) fn is_comparison(&self) -> bool {
        matches!(self, Op::Eq | Op::Neq | Op::Gt | Op::Gte | Op::Lt | Op::Lte)
    }
}

/// Auxiliary operand metadata carried by lookup and conditional nodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseLabels {
    /// Lookup keys in table order; empty for conditionals.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,
    /// The key that matched; `None` when the default was taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
    /// Index of the taken branch; `None` for the else/default branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taken: Option<usize>,
}

impl CaseLabels {
    pub(crate) fn branch(taken: Option<usize>) -> CaseLabels {
        CaseLabels {
            keys: Vec::new(),
            selected: None,
            taken,
        }
    }
}

/// An immutable expression-tree vertex.
///
/// Carries the operator, the ordered operands, the value computed at
/// construction time, an optional host-assigned binding name, and the
/// branch metadata for lookups and conditionals. The `value` is never
/// recomputed; simplification builds new nodes instead of editing.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    id: Uuid,
    name: Option<String>,
    value: Value,
    op: Op,
    operands: Vec<Node>,
    labels: Option<CaseLabels>,
    minimal: bool,
}

impl Node {
    pub(crate) fn leaf(name: Option<String>, value: Value) -> Node {
        Node {
            id: Uuid::new_v4(),
            name,
            value,
            op: Op::Leaf,
            operands: Vec::new(),
            labels: None,
            minimal: false,
        }
    }

    pub(crate) fn interior(op: Op, value: Value, operands: Vec<Node>) -> Node {
        Node {
            id: Uuid::new_v4(),
            name: None,
            value,
            op,
            operands,
            labels: None,
            minimal: false,
        }
    }

    pub(crate) fn with_labels(op: Op, value: Value, operands: Vec<Node>, labels: CaseLabels) -> Node {
        Node {
            labels: Some(labels),
            ..Node::interior(op, value, operands)
        }
    }

    /// A node produced by causal reduction; it will not be reduced again.
    pub(crate) fn minimal(
        op: Op,
        value: Value,
        operands: Vec<Node>,
        name: Option<String>,
        labels: Option<CaseLabels>,
    ) -> Node {
        Node {
            id: Uuid::new_v4(),
            name,
            value,
            op,
            operands,
            labels,
            minimal: true,
        }
    }

    /// Rebuilds a node from its persisted parts, keeping the stored id.
    pub(crate) fn from_parts(
        id: Uuid,
        name: Option<String>,
        value: Value,
        op: Op,
        operands: Vec<Node>,
        labels: Option<CaseLabels>,
        minimal: bool,
    ) -> Node {
        Node {
            id,
            name,
            value,
            op,
            operands,
            labels,
            minimal,
        }
    }

    /// A copy with the same identity and metadata but different operands.
    pub(crate) fn with_operands(&self, operands: Vec<Node>) -> Node {
        Node {
            operands,
            ..self.clone()
        }
    }

    pub(crate) fn renamed(mut self, name: String) -> Node {
        self.name = Some(name);
        self
    }

    pub(crate) fn into_operands(self) -> Vec<Node> {
        self.operands
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn operands(&self) -> &[Node] {
        &self.operands
    }

    pub fn labels(&self) -> Option<&CaseLabels> {
        self.labels.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        self.op == Op::Leaf
    }

    /// True for nodes produced by causal reduction; such nodes are
    /// already minimal and simplify to themselves.
    pub fn is_minimal(&self) -> bool {
        self.minimal
    }

    /// Returns the causally minimal form of this tree.
    pub fn simplify(&self) -> Node {
        simplify::simplify(self)
    }

    /// Structural equality ignoring node ids: names, values, operators,
    /// branch metadata, operand order, and tree shape.
    pub fn shape_eq(&self, other: &Node) -> bool {
        self.name == other.name
            && self.value == other.value
            && self.op == other.op
            && self.labels == other.labels
            && self.minimal == other.minimal
            && self.operands.len() == other.operands.len()
            && self
                .operands
                .iter()
                .zip(&other.operands)
                .all(|(a, b)| a.shape_eq(b))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render::reason(self))
    }
}
