use crate::conditional::PartialConditional;
use crate::error::ExprError;
use crate::node::{CaseLabels, Node, Op};
use crate::render;
use crate::value::Value;
use std::fmt;

/// A builder operand: an already-built expression, or a `name = value`
/// binding, or a bare literal.
///
/// Bindings become named leaves, literals unnamed leaves. Conversions
/// exist from `Expr`, `Node`, `(name, value)` tuples, and the primitive
/// value types, so call sites read as `expr.plus(("b", 1))`.
pub struct Operand(Node);

impl Operand {
    pub(crate) fn into_node(self) -> Node {
        self.0
    }
}

impl From<Node> for Operand {
    fn from(node: Node) -> Self {
        Operand(node)
    }
}

impl From<Expr> for Operand {
    fn from(expr: Expr) -> Self {
        Operand(expr.node)
    }
}

impl From<&Expr> for Operand {
    fn from(expr: &Expr) -> Self {
        Operand(expr.node.clone())
    }
}

impl<V: Into<Value>> From<(&str, V)> for Operand {
    fn from((name, value): (&str, V)) -> Self {
        Operand(Node::leaf(Some(name.to_owned()), value.into()))
    }
}

impl<V: Into<Value>> From<(String, V)> for Operand {
    fn from((name, value): (String, V)) -> Self {
        Operand(Node::leaf(Some(name), value.into()))
    }
}

impl From<i64> for Operand {
    fn from(v: i64) -> Self {
        Operand(Node::leaf(None, Value::Int(v)))
    }
}

impl From<i32> for Operand {
    fn from(v: i32) -> Self {
        Operand(Node::leaf(None, Value::Int(v as i64)))
    }
}

impl From<f64> for Operand {
    fn from(v: f64) -> Self {
        Operand(Node::leaf(None, Value::Float(v)))
    }
}

impl From<bool> for Operand {
    fn from(v: bool) -> Self {
        Operand(Node::leaf(None, Value::Bool(v)))
    }
}

impl From<&str> for Operand {
    fn from(v: &str) -> Self {
        Operand(Node::leaf(None, Value::Str(v.to_owned())))
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand(Node::leaf(None, v))
    }
}

/// The fluent expression builder.
///
/// Every operation constructs an immutable [`Node`] and evaluates it on
/// the spot; the builder itself is a thin handle around the finished
/// node. Operations borrow `self`, so a failed call leaves the existing
/// expression untouched and hosts can reuse an expression in several
/// places.
///
/// ```
/// use rationale::Expr;
///
/// # fn main() -> Result<(), rationale::ExprError> {
/// let sum = Expr::int(("a", 1))?.plus(("b", 2))?.with_name("sum");
/// assert_eq!(sum.to_string(), "3 because (a := 1) + (b := 2)");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Expr {
    node: Node,
}

impl Expr {
    pub(crate) fn from_node(node: Node) -> Expr {
        Expr { node }
    }

    /// Entry point for any numeric operand (`Int` or `Float`).
    pub fn numeric(operand: impl Into<Operand>) -> Result<Expr, ExprError> {
        let node = operand.into().into_node();
        if node.value().is_numeric() {
            Ok(Expr { node })
        } else {
            Err(ExprError::Type(format!(
                "numeric operand required, got {}",
                node.value().type_name()
            )))
        }
    }

    /// Entry point for an `Int` operand.
    pub fn int(operand: impl Into<Operand>) -> Result<Expr, ExprError> {
        let node = operand.into().into_node();
        match node.value() {
            Value::Int(_) => Ok(Expr { node }),
            other => Err(ExprError::Type(format!(
                "int operand required, got {}",
                other.type_name()
            ))),
        }
    }

    /// Entry point for a `Float` operand.
    pub fn float(operand: impl Into<Operand>) -> Result<Expr, ExprError> {
        let node = operand.into().into_node();
        match node.value() {
            Value::Float(_) => Ok(Expr { node }),
            other => Err(ExprError::Type(format!(
                "float operand required, got {}",
                other.type_name()
            ))),
        }
    }

    /// Entry point for a `Bool` operand.
    pub fn bool_(operand: impl Into<Operand>) -> Result<Expr, ExprError> {
        let node = operand.into().into_node();
        match node.value() {
            Value::Bool(_) => Ok(Expr { node }),
            other => Err(ExprError::Type(format!(
                "bool operand required, got {}",
                other.type_name()
            ))),
        }
    }

    /// Boolean negation. The node records the operand unchanged and
    /// carries the negated value; rendering and simplification erase the
    /// operator, so the justification is the operand itself.
    pub fn not_(operand: impl Into<Operand>) -> Result<Expr, ExprError> {
        let node = operand.into().into_node();
        let b = node.value().as_bool().ok_or_else(|| {
            ExprError::Type(format!(
                "bool operand required, got {}",
                node.value().type_name()
            ))
        })?;
        Ok(Expr {
            node: Node::interior(Op::Not, Value::Bool(!b), vec![node]),
        })
    }

    /// Table lookup. `table` is an ordered sequence of `(key, operand)`
    /// pairs; `key` must evaluate to a `Str`. The node's operands are the
    /// key and the selected value; the table keys, the matched key, and
    /// the branch index are recorded as labels. A missing key fails with
    /// [`ExprError::KeyNotFound`].
    pub fn lookup<I, K, O>(table: I, key: impl Into<Operand>) -> Result<Expr, ExprError>
    where
        I: IntoIterator<Item = (K, O)>,
        K: Into<String>,
        O: Into<Operand>,
    {
        Self::lookup_inner(table, key.into(), None, Op::Lookup)
    }

    /// Like [`Expr::lookup`], but a missing key yields `default` (which
    /// may be `Null`) instead of failing; the labels record that the
    /// default was taken.
    pub fn uncertain_lookup<I, K, O>(
        table: I,
        key: impl Into<Operand>,
        default: impl Into<Operand>,
    ) -> Result<Expr, ExprError>
    where
        I: IntoIterator<Item = (K, O)>,
        K: Into<String>,
        O: Into<Operand>,
    {
        Self::lookup_inner(table, key.into(), Some(default.into()), Op::UncertainLookup)
    }

    fn lookup_inner<I, K, O>(
        table: I,
        key: Operand,
        default: Option<Operand>,
        op: Op,
    ) -> Result<Expr, ExprError>
    where
        I: IntoIterator<Item = (K, O)>,
        K: Into<String>,
        O: Into<Operand>,
    {
        let table: Vec<(String, Node)> = table
            .into_iter()
            .map(|(k, o)| (k.into(), o.into().into_node()))
            .collect();
        if table.is_empty() {
            return Err(ExprError::Argument("lookup table is empty".into()));
        }
        let key = key.into_node();
        let key_str = match key.value() {
            Value::Str(s) => s.clone(),
            other => {
                return Err(ExprError::Type(format!(
                    "lookup key must be str, got {}",
                    other.type_name()
                )))
            }
        };
        let keys: Vec<String> = table.iter().map(|(k, _)| k.clone()).collect();
        let hit = table.iter().position(|(k, _)| *k == key_str);
        let (chosen, labels) = match hit {
            Some(i) => {
                let chosen = table.into_iter().nth(i).map(|(_, n)| n).unwrap();
                let labels = CaseLabels {
                    keys,
                    selected: Some(key_str),
                    taken: Some(i),
                };
                (chosen, labels)
            }
            None => match default {
                Some(d) => {
                    let labels = CaseLabels {
                        keys,
                        selected: None,
                        taken: None,
                    };
                    (d.into_node(), labels)
                }
                None => return Err(ExprError::KeyNotFound(key_str)),
            },
        };
        let value = chosen.value().clone();
        Ok(Expr {
            node: Node::with_labels(op, value, vec![key, chosen], labels),
        })
    }

    /// A copy of this expression carrying a binding name.
    pub fn with_name(&self, name: &str) -> Expr {
        Expr {
            node: self.node.clone().renamed(name.to_owned()),
        }
    }

    pub fn plus(&self, operand: impl Into<Operand>) -> Result<Expr, ExprError> {
        self.arith(Op::Plus, operand.into())
    }

    pub fn minus(&self, operand: impl Into<Operand>) -> Result<Expr, ExprError> {
        self.arith(Op::Minus, operand.into())
    }

    pub fn times(&self, operand: impl Into<Operand>) -> Result<Expr, ExprError> {
        self.arith(Op::Times, operand.into())
    }

    pub fn divided_by(&self, operand: impl Into<Operand>) -> Result<Expr, ExprError> {
        self.arith(Op::DividedBy, operand.into())
    }

    /// Plus and Times flatten onto an unnamed left node of the same
    /// operator, so chains become one n-ary node; a named left node is an
    /// opaque operand, since collapsing it would discard the binding.
    /// Minus and DividedBy stay binary left-associative.
    fn arith(&self, op: Op, operand: Operand) -> Result<Expr, ExprError> {
        let rhs = operand.into_node();
        let value = match op {
            Op::Plus => self.node.value().add(rhs.value())?,
            Op::Minus => self.node.value().sub(rhs.value())?,
            Op::Times => self.node.value().mul(rhs.value())?,
            Op::DividedBy => self.node.value().div(rhs.value())?,
            _ => unreachable!("not an arithmetic operator"),
        };
        let lhs = self.node.clone();
        let operands = if matches!(op, Op::Plus | Op::Times)
            && lhs.op() == op
            && lhs.name().is_none()
        {
            let mut flat = lhs.into_operands();
            flat.push(rhs);
            flat
        } else {
            vec![lhs, rhs]
        };
        Ok(Expr {
            node: Node::interior(op, value, operands),
        })
    }

    pub fn eq(&self, operand: impl Into<Operand>) -> Result<Expr, ExprError> {
        self.compare(Op::Eq, operand.into())
    }

    pub fn neq(&self, operand: impl Into<Operand>) -> Result<Expr, ExprError> {
        self.compare(Op::Neq, operand.into())
    }

    pub fn gt(&self, operand: impl Into<Operand>) -> Result<Expr, ExprError> {
        self.compare(Op::Gt, operand.into())
    }

    pub fn gte(&self, operand: impl Into<Operand>) -> Result<Expr, ExprError> {
        self.compare(Op::Gte, operand.into())
    }

    pub fn lt(&self, operand: impl Into<Operand>) -> Result<Expr, ExprError> {
        self.compare(Op::Lt, operand.into())
    }

    pub fn lte(&self, operand: impl Into<Operand>) -> Result<Expr, ExprError> {
        self.compare(Op::Lte, operand.into())
    }

    /// True when this value is not `Null`. Sugar for `neq(Null)`: the
    /// node is a `Neq` against a Null leaf, and the flip rule turns it
    /// into an `Eq` when the value is Null.
    pub fn is_not_null(&self) -> Result<Expr, ExprError> {
        self.neq(Value::Null)
    }

    /// A comparison that evaluates false is recorded with the flipped
    /// operator and the operands in place, so the stored expression reads
    /// as a true statement; the node's value stays `False`.
    fn compare(&self, op: Op, operand: Operand) -> Result<Expr, ExprError> {
        let rhs = operand.into_node();
        let lhs = self.node.clone();
        let outcome = match op {
            Op::Eq => lhs.value() == rhs.value(),
            Op::Neq => lhs.value() != rhs.value(),
            Op::Gt => lhs.value().gt(rhs.value())?,
            Op::Gte => lhs.value().ge(rhs.value())?,
            Op::Lt => lhs.value().lt(rhs.value())?,
            Op::Lte => lhs.value().le(rhs.value())?,
            _ => unreachable!("not a comparison operator"),
        };
        let recorded = if outcome { op } else { op.flipped() };
        Ok(Expr {
            node: Node::interior(recorded, Value::Bool(outcome), vec![lhs, rhs]),
        })
    }

    /// Conjunction with one more operand; chains flatten into a single
    /// n-ary `And` node.
    pub fn and_(&self, operand: impl Into<Operand>) -> Result<Expr, ExprError> {
        self.connect(Op::And, vec![operand.into()])
    }

    /// Conjunction with one or more operands at once.
    pub fn and_all<I, O>(&self, operands: I) -> Result<Expr, ExprError>
    where
        I: IntoIterator<Item = O>,
        O: Into<Operand>,
    {
        self.connect(Op::And, operands.into_iter().map(Into::into).collect())
    }

    /// Disjunction with one more operand; chains flatten into a single
    /// n-ary `Or` node.
    pub fn or_(&self, operand: impl Into<Operand>) -> Result<Expr, ExprError> {
        self.connect(Op::Or, vec![operand.into()])
    }

    /// Disjunction with one or more operands at once.
    pub fn or_all<I, O>(&self, operands: I) -> Result<Expr, ExprError>
    where
        I: IntoIterator<Item = O>,
        O: Into<Operand>,
    {
        self.connect(Op::Or, operands.into_iter().map(Into::into).collect())
    }

    /// Evaluation is eager and total: every operand is evaluated at
    /// construction time. Short-circuiting belongs to the simplifier.
    fn connect(&self, op: Op, operands: Vec<Operand>) -> Result<Expr, ExprError> {
        if operands.is_empty() {
            return Err(ExprError::Argument(
                "at least one operand is required".into(),
            ));
        }
        let lhs = self.node.clone();
        require_bool(&lhs)?;
        let mut all = if lhs.op() == op && lhs.name().is_none() {
            lhs.into_operands()
        } else {
            vec![lhs]
        };
        for operand in operands {
            let node = operand.into_node();
            require_bool(&node)?;
            all.push(node);
        }
        let value = match op {
            Op::And => all.iter().all(|n| n.value() == &Value::Bool(true)),
            Op::Or => all.iter().any(|n| n.value() == &Value::Bool(true)),
            _ => unreachable!("not a boolean connective"),
        };
        Ok(Expr {
            node: Node::interior(op, Value::Bool(value), all),
        })
    }

    /// Ternary entry: `self` becomes the taken-if-true branch, and the
    /// returned state only finalizes through `else_`.
    pub fn if_(&self, cond: impl Into<Operand>) -> Result<PartialConditional, ExprError> {
        PartialConditional::ternary(self.node.clone(), cond.into())
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn into_node(self) -> Node {
        self.node
    }

    pub fn value(&self) -> &Value {
        self.node.value()
    }

    pub fn name(&self) -> Option<&str> {
        self.node.name()
    }

    /// The causally minimal form of this expression.
    pub fn simplify(&self) -> Expr {
        Expr {
            node: self.node.simplify(),
        }
    }
}

pub(crate) fn require_bool(node: &Node) -> Result<(), ExprError> {
    match node.value() {
        Value::Bool(_) => Ok(()),
        other => Err(ExprError::Type(format!(
            "bool operand required, got {}",
            other.type_name()
        ))),
    }
}

impl From<Node> for Expr {
    fn from(node: Node) -> Self {
        Expr { node }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render::reason(&self.node))
    }
}
