use crate::node::{Node, Op};

/// Renders the canonical `"<value> because <expression>"` form.
///
/// Works on a raw or a simplified tree; the expression is the infix
/// textual form of whatever tree is given.
pub fn reason(node: &Node) -> String {
    format!("{} because {}", node.value(), expression(node))
}

/// The expression clause without the leading value.
pub(crate) fn expression(node: &Node) -> String {
    match node.op() {
        Op::Leaf => leaf(node),
        // Not contributes no justification of its own.
        Op::Not => expression(&node.operands()[0]),
        Op::Conditional => conditional(node),
        Op::Lookup | Op::UncertainLookup => lookup(node),
        Op::Plus | Op::Times | Op::And | Op::Or => nary(node),
        Op::Minus | Op::DividedBy => binary(node),
        op if op.is_comparison() => binary(node),
        _ => leaf(node),
    }
}

fn leaf(node: &Node) -> String {
    match node.name() {
        Some(name) => format!("({} := {})", name, node.value()),
        None => node.value().to_string(),
    }
}

/// An operand renders bare only when it is an unnamed leaf; named leaves
/// carry their own parentheses and compound operands get one enclosing
/// pair, which keeps left-to-right reading unambiguous.
fn operand(node: &Node) -> String {
    match node.op() {
        Op::Leaf => leaf(node),
        Op::Not => operand(&node.operands()[0]),
        _ => format!("({})", expression(node)),
    }
}

fn nary(node: &Node) -> String {
    let sym = node.op().symbol();
    node.operands()
        .iter()
        .map(operand)
        .collect::<Vec<_>>()
        .join(&format!(" {} ", sym))
}

fn binary(node: &Node) -> String {
    let ops = node.operands();
    format!(
        "{} {} {}",
        operand(&ops[0]),
        node.op().symbol(),
        operand(&ops[1])
    )
}

/// `<branch> when <cond₁> and … and <condₖ>` for a taken branch; in the
/// else case every condition is rendered behind `not`.
fn conditional(node: &Node) -> String {
    let (conds, branch, is_else) = justification(node);
    let clause = conds
        .iter()
        .map(|c| {
            if is_else {
                format!("not {}", operand(c))
            } else {
                operand(c)
            }
        })
        .collect::<Vec<_>>()
        .join(" and ");
    format!("{} when {}", operand(branch), clause)
}

/// The justifying conditions and the taken branch, for both the raw
/// `cond, then, …, else` layout and the simplified `cond…, branch` one.
fn justification(node: &Node) -> (Vec<&Node>, &Node, bool) {
    let ops = node.operands();
    let taken = node.labels().and_then(|l| l.taken);
    if node.is_minimal() {
        let (branch, conds) = ops.split_last().expect("conditional has operands");
        (conds.iter().collect(), branch, taken.is_none())
    } else {
        match taken {
            Some(k) => ((0..=k).map(|i| &ops[2 * i]).collect(), &ops[2 * k + 1], false),
            None => {
                let branches = (ops.len() - 1) / 2;
                (
                    (0..branches).map(|i| &ops[2 * i]).collect(),
                    ops.last().expect("conditional has an else operand"),
                    true,
                )
            }
        }
    }
}

fn lookup(node: &Node) -> String {
    let ops = node.operands();
    let (key, chosen) = (&ops[0], &ops[1]);
    match node.labels().and_then(|l| l.selected.as_ref()) {
        Some(k) => format!("{} when {} = \"{}\"", operand(chosen), operand(key), k),
        None => format!("{} when {} not found", operand(chosen), operand(key)),
    }
}
