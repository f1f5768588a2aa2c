use rationale::{Expr, ExprError, Op, Value};

#[test]
fn and_is_eager_and_total() {
    // all operands are evaluated and recorded, no short-circuit
    let out = Expr::bool_(("a", false))
        .unwrap()
        .and_(("b", true))
        .unwrap()
        .and_(("c", true))
        .unwrap();
    assert_eq!(out.value(), &Value::Bool(false));
    assert_eq!(out.node().operands().len(), 3);
}

#[test]
fn and_chain_flattens() {
    let out = Expr::bool_(("a", true))
        .unwrap()
        .and_(("b", true))
        .unwrap()
        .and_(("c", true))
        .unwrap();
    assert_eq!(out.value(), &Value::Bool(true));
    assert_eq!(out.node().op(), Op::And);
    assert!(out.node().operands().iter().all(|o| o.op() != Op::And));
}

#[test]
fn or_chain_flattens() {
    let out = Expr::bool_(("a", false))
        .unwrap()
        .or_(("b", false))
        .unwrap()
        .or_(("c", true))
        .unwrap();
    assert_eq!(out.value(), &Value::Bool(true));
    assert_eq!(out.node().op(), Op::Or);
    assert_eq!(out.node().operands().len(), 3);
}

#[test]
fn multi_operand_sugar_matches_chaining() {
    let chained = Expr::bool_(("a", true))
        .unwrap()
        .and_(("b", true))
        .unwrap()
        .and_(("c", false))
        .unwrap();
    let at_once = Expr::bool_(("a", true))
        .unwrap()
        .and_all([("b", true), ("c", false)])
        .unwrap();
    assert_eq!(chained.value(), at_once.value());
    assert!(chained.node().shape_eq(at_once.node()));
}

#[test]
fn empty_operand_list_fails() {
    let operands: [bool; 0] = [];
    let err = Expr::bool_(("a", true))
        .unwrap()
        .and_all(operands)
        .unwrap_err();
    match err {
        ExprError::Argument(_) => {}
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn non_bool_operand_fails() {
    let err = Expr::bool_(("a", true)).unwrap().and_(("b", 1)).unwrap_err();
    match err {
        ExprError::Type(_) => {}
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn not_negates_and_keeps_the_operand() {
    let out = Expr::not_(("x", true)).unwrap();
    assert_eq!(out.value(), &Value::Bool(false));
    assert_eq!(out.node().op(), Op::Not);
    assert_eq!(out.node().operands()[0].value(), &Value::Bool(true));

    let out = Expr::not_(("x", false)).unwrap();
    assert_eq!(out.value(), &Value::Bool(true));
}

#[test]
fn not_requires_a_bool() {
    let err = Expr::not_(("x", 3)).unwrap_err();
    match err {
        ExprError::Type(_) => {}
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn named_left_connective_does_not_flatten() {
    let inner = Expr::bool_(("a", true))
        .unwrap()
        .and_(("b", true))
        .unwrap()
        .with_name("inner");
    let outer = inner.and_(("c", true)).unwrap();
    assert_eq!(outer.node().operands().len(), 2);
    assert_eq!(outer.node().operands()[0].name(), Some("inner"));
}

#[test]
fn a_failed_call_leaves_the_expression_usable() {
    let base = Expr::bool_(("a", true)).unwrap();
    assert!(base.and_(("b", 2)).is_err());
    // the original expression is untouched and still composes
    let out = base.and_(("b", true)).unwrap();
    assert_eq!(out.value(), &Value::Bool(true));
}
