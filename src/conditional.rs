use crate::builder::{Expr, Operand};
use crate::error::ExprError;
use crate::node::{CaseLabels, Node, Op};
use crate::value::Value;

/// Entry point of the conditional chain
/// `If::new → then → (elif_ → then)* → else_`.
///
/// Each state is its own type, so an illegal transition (a `then` before
/// an `if_`, a finalization without `else_`) does not type-check; the
/// only runtime check left is that conditions are boolean.
///
/// ```
/// use rationale::If;
///
/// # fn main() -> Result<(), rationale::ExprError> {
/// let grade = If::new(("excellent", false))?
///     .then(("a", 1))
///     .elif_(("good", true))?
///     .then(("b", 2))
///     .else_(("c", 3));
/// assert_eq!(grade.value(), &rationale::Value::Int(2));
/// # Ok(())
/// # }
/// ```
///
/// An unfinished chain never yields a node (this snippet intentionally
/// fails to compile):
///
/// ```compile_fail
/// use rationale::{flatten, If};
///
/// let unfinished = If::new(("cond", true)).unwrap().then(("x", 1));
/// flatten(unfinished.node());
/// ```
pub struct If;

impl If {
    pub fn new(cond: impl Into<Operand>) -> Result<IncompleteConditional, ExprError> {
        let cond = bool_condition(cond.into())?;
        Ok(IncompleteConditional {
            conds: vec![cond],
            thens: Vec::new(),
        })
    }
}

/// A chain with one more condition than branches; only `then` continues.
#[derive(Debug)]
pub struct IncompleteConditional {
    conds: Vec<Node>,
    thens: Vec<Node>,
}

impl IncompleteConditional {
    pub fn then(mut self, expr: impl Into<Operand>) -> PartialConditional {
        self.thens.push(expr.into().into_node());
        PartialConditional {
            conds: self.conds,
            thens: self.thens,
        }
    }
}

/// A chain with matched conditions and branches; `elif_` extends it and
/// `else_` finalizes. The mandatory else has no default.
#[derive(Debug)]
pub struct PartialConditional {
    conds: Vec<Node>,
    thens: Vec<Node>,
}

impl PartialConditional {
    /// The two-branch ternary specialization: `then` is already known.
    pub(crate) fn ternary(then: Node, cond: Operand) -> Result<PartialConditional, ExprError> {
        let cond = bool_condition(cond)?;
        Ok(PartialConditional {
            conds: vec![cond],
            thens: vec![then],
        })
    }

    pub fn elif_(mut self, cond: impl Into<Operand>) -> Result<IncompleteConditional, ExprError> {
        self.conds.push(bool_condition(cond.into())?);
        Ok(IncompleteConditional {
            conds: self.conds,
            thens: self.thens,
        })
    }

    /// Finalizes the `Conditional` node. Operands are laid out as
    /// `cond₁, then₁, …, else`; the value is the first then whose
    /// condition is true, else the fallback; the taken branch index is
    /// recorded for the simplifier and renderer (`None` means the else
    /// branch).
    pub fn else_(self, expr: impl Into<Operand>) -> Expr {
        let fallback = expr.into().into_node();
        let taken = self
            .conds
            .iter()
            .position(|c| c.value() == &Value::Bool(true));
        let value = match taken {
            Some(i) => self.thens[i].value().clone(),
            None => fallback.value().clone(),
        };
        let mut operands = Vec::with_capacity(self.conds.len() * 2 + 1);
        for (cond, then) in self.conds.into_iter().zip(self.thens) {
            operands.push(cond);
            operands.push(then);
        }
        operands.push(fallback);
        Expr::from_node(Node::with_labels(
            Op::Conditional,
            value,
            operands,
            CaseLabels::branch(taken),
        ))
    }
}

fn bool_condition(operand: Operand) -> Result<Node, ExprError> {
    let node = operand.into_node();
    match node.value() {
        Value::Bool(_) => Ok(node),
        other => Err(ExprError::BuilderState(format!(
            "condition must be boolean, got {}",
            other.type_name()
        ))),
    }
}
