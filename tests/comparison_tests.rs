use rationale::{Expr, ExprError, Op, Value};

#[test]
fn true_comparison_keeps_its_operator() {
    let cmp = Expr::numeric(("a", 4)).unwrap().gt(("b", 2)).unwrap();
    assert_eq!(cmp.value(), &Value::Bool(true));
    assert_eq!(cmp.node().op(), Op::Gt);
    assert_eq!(cmp.to_string(), "True because (a := 4) > (b := 2)");
}

#[test]
fn false_comparison_is_recorded_flipped() {
    // gt false flips to lte; the value stays False and the operands stay
    // in place, so the stored expression reads as a true statement
    let cmp = Expr::numeric(("a", 2)).unwrap().gt(("b", 4)).unwrap();
    assert_eq!(cmp.value(), &Value::Bool(false));
    assert_eq!(cmp.node().op(), Op::Lte);
    assert_eq!(cmp.to_string(), "False because (a := 2) ≤ (b := 4)");
}

#[test]
fn every_false_comparison_flips_to_its_dual() {
    let gte = Expr::numeric(("a", 1)).unwrap().gte(("b", 2)).unwrap();
    assert_eq!(gte.node().op(), Op::Lt);

    let lt = Expr::numeric(("a", 2)).unwrap().lt(("b", 1)).unwrap();
    assert_eq!(lt.node().op(), Op::Gte);

    let lte = Expr::numeric(("a", 2)).unwrap().lte(("b", 1)).unwrap();
    assert_eq!(lte.node().op(), Op::Gt);

    let eq = Expr::numeric(("a", 1)).unwrap().eq(("b", 2)).unwrap();
    assert_eq!(eq.node().op(), Op::Neq);

    let neq = Expr::numeric(("a", 1)).unwrap().neq(("b", 1)).unwrap();
    assert_eq!(neq.node().op(), Op::Eq);
}

#[test]
fn equality_promotes_numerics() {
    let cmp = Expr::int(("a", 1)).unwrap().eq(("b", 1.0)).unwrap();
    assert_eq!(cmp.value(), &Value::Bool(true));
}

#[test]
fn equality_across_variants_is_false_not_an_error() {
    let cmp = Expr::int(("a", 1)).unwrap().eq(("b", "1")).unwrap();
    assert_eq!(cmp.value(), &Value::Bool(false));
    assert_eq!(cmp.node().op(), Op::Neq);
}

#[test]
fn ordering_strings_is_lexicographic() {
    let chosen = Expr::lookup([("a", "alpha")], ("k", "a")).unwrap();
    let cmp = chosen.lt(("limit", "beta")).unwrap();
    assert_eq!(cmp.value(), &Value::Bool(true));
}

#[test]
fn ordering_non_numeric_fails() {
    let err = Expr::bool_(("a", true))
        .unwrap()
        .gt(("b", false))
        .unwrap_err();
    match err {
        ExprError::Type(_) => {}
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn compound_left_operand_renders_parenthesized() {
    let sum = Expr::int(("a", 1)).unwrap().plus(("b", 2)).unwrap();
    let cmp = sum.gte(("c", 3)).unwrap();
    assert_eq!(
        cmp.to_string(),
        "True because ((a := 1) + (b := 2)) ≥ (c := 3)"
    );
}

#[test]
fn is_not_null_on_a_value() {
    let present = Expr::int(("x", 1)).unwrap().is_not_null().unwrap();
    assert_eq!(present.value(), &Value::Bool(true));
    assert_eq!(present.node().op(), Op::Neq);
    assert_eq!(present.to_string(), "True because (x := 1) ≠ Null");
}

#[test]
fn is_not_null_on_null_flips_to_eq() {
    let absent = Expr::uncertain_lookup(
        [("a", 1)],
        ("key", "missing"),
        Value::Null,
    )
    .unwrap()
    .is_not_null()
    .unwrap();
    assert_eq!(absent.value(), &Value::Bool(false));
    assert_eq!(absent.node().op(), Op::Eq);
}
