use crate::node::{CaseLabels, Node, Op};
use crate::value::Value;

/// Reduces a tree to the operands that caused its value.
///
/// Rules, applied bottom-up: leaves are unchanged; arithmetic,
/// comparison, and lookup nodes are rebuilt with simplified operands; a
/// `Not` is erased in favor of its operand; a false `And` becomes the
/// `Or` of its false operands, a true `Or` keeps only its true operands
/// (either collapsing to a lone survivor), a false `Or` becomes the
/// `And` of all operands; a conditional keeps the justifying conditions
/// and the taken branch. Nodes produced by a rewrite are marked minimal
/// and pass through unchanged, which makes the function idempotent.
pub fn simplify(node: &Node) -> Node {
    match node.op() {
        Op::Leaf => node.clone(),
        Op::Not => simplify(&node.operands()[0]),
        Op::And | Op::Or => connective(node),
        Op::Conditional => conditional(node),
        _ => node.with_operands(node.operands().iter().map(simplify).collect()),
    }
}

fn connective(node: &Node) -> Node {
    if node.is_minimal() {
        return node.clone();
    }
    let truth = node.value() == &Value::Bool(true);
    match (node.op(), truth) {
        // Every operand contributed.
        (Op::And, true) => node.with_operands(node.operands().iter().map(simplify).collect()),
        // Only the false operands are causes; the connective dualizes.
        (Op::And, false) => {
            let causes = falsy(node);
            collapse_or_dual(Op::Or, causes, node)
        }
        // Only the operands that fired are causes.
        (Op::Or, true) => {
            let causes: Vec<Node> = node
                .operands()
                .iter()
                .filter(|o| o.value() == &Value::Bool(true))
                .map(simplify)
                .collect();
            if causes.len() == 1 {
                causes.into_iter().next().unwrap()
            } else {
                node.with_operands(causes)
            }
        }
        // Every operand had to be false; the connective dualizes.
        (Op::Or, false) => {
            let all: Vec<Node> = node.operands().iter().map(simplify).collect();
            collapse_or_dual(Op::And, all, node)
        }
        _ => node.clone(),
    }
}

fn falsy(node: &Node) -> Vec<Node> {
    node.operands()
        .iter()
        .filter(|o| o.value() == &Value::Bool(false))
        .map(simplify)
        .collect()
}

fn collapse_or_dual(op: Op, mut causes: Vec<Node>, source: &Node) -> Node {
    if causes.len() == 1 {
        return causes.pop().unwrap();
    }
    Node::minimal(
        op,
        source.value().clone(),
        causes,
        source.name().map(str::to_owned),
        None,
    )
}

/// Keeps the conditions up to and including the selected one (every
/// condition in the else case) and the taken branch, in that order.
fn conditional(node: &Node) -> Node {
    if node.is_minimal() {
        return node.clone();
    }
    let ops = node.operands();
    let taken = node.labels().and_then(|l| l.taken);
    let mut kept: Vec<Node> = match taken {
        Some(k) => (0..=k).map(|i| simplify(&ops[2 * i])).collect(),
        None => {
            let branches = (ops.len() - 1) / 2;
            (0..branches).map(|i| simplify(&ops[2 * i])).collect()
        }
    };
    let branch = match taken {
        Some(k) => &ops[2 * k + 1],
        None => ops.last().expect("conditional has an else operand"),
    };
    kept.push(simplify(branch));
    Node::minimal(
        Op::Conditional,
        node.value().clone(),
        kept,
        node.name().map(str::to_owned),
        Some(CaseLabels::branch(taken)),
    )
}
