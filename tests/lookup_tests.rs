use rationale::{Expr, ExprError, Op, Value};

#[test]
fn lookup_selects_the_matching_entry() {
    let out = Expr::lookup([("a", 1), ("b", 2), ("c", 3)], ("key", "b")).unwrap();
    assert_eq!(out.value(), &Value::Int(2));
    assert_eq!(out.node().op(), Op::Lookup);

    let labels = out.node().labels().unwrap();
    assert_eq!(labels.keys, vec!["a", "b", "c"]);
    assert_eq!(labels.selected.as_deref(), Some("b"));
    assert_eq!(labels.taken, Some(1));

    // operands are the key and the selected value
    assert_eq!(out.node().operands().len(), 2);
    assert_eq!(out.node().operands()[0].value(), &Value::Str("b".into()));
    assert_eq!(out.node().operands()[1].value(), &Value::Int(2));
}

#[test]
fn lookup_missing_key_fails() {
    let err = Expr::lookup([("a", 1)], ("key", "z")).unwrap_err();
    match err {
        ExprError::KeyNotFound(key) => assert_eq!(key, "z"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn lookup_values_can_be_expressions() {
    let computed = Expr::int(("base", 2)).unwrap().times(("factor", 5)).unwrap();
    let out = Expr::lookup([("hit", computed)], ("key", "hit")).unwrap();
    assert_eq!(out.value(), &Value::Int(10));
}

#[test]
fn lookup_key_must_be_a_string() {
    let err = Expr::lookup([("a", 1)], ("key", 7)).unwrap_err();
    match err {
        ExprError::Type(_) => {}
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn empty_table_fails() {
    let table: [(&str, i64); 0] = [];
    let err = Expr::lookup(table, ("key", "a")).unwrap_err();
    match err {
        ExprError::Argument(_) => {}
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn uncertain_lookup_hit_behaves_like_lookup() {
    let out = Expr::uncertain_lookup([("a", 1), ("b", 2)], ("key", "a"), Value::Null).unwrap();
    assert_eq!(out.value(), &Value::Int(1));
    assert_eq!(out.node().op(), Op::UncertainLookup);
    assert_eq!(out.node().labels().unwrap().taken, Some(0));
}

#[test]
fn uncertain_lookup_miss_takes_the_default() {
    let out = Expr::uncertain_lookup([("a", 1)], ("key", "z"), ("fallback", 9)).unwrap();
    assert_eq!(out.value(), &Value::Int(9));

    let labels = out.node().labels().unwrap();
    assert_eq!(labels.selected, None);
    assert_eq!(labels.taken, None);
    assert_eq!(out.node().operands()[1].name(), Some("fallback"));
}

#[test]
fn uncertain_lookup_defaults_to_null() {
    let out = Expr::uncertain_lookup([("a", 1)], ("key", "z"), Value::Null).unwrap();
    assert_eq!(out.value(), &Value::Null);
    assert_eq!(out.is_not_null().unwrap().value(), &Value::Bool(false));
}
