use funcadl_lower::*;

fn env() -> Environment {
    Environment::default()
        .with_global("x")
        .with_global("y")
        .with_global("z")
}

fn lower(expr: &Expr) -> Result<String> {
    lower_expr(expr, &env(), &LoweringConfig::default())
}

fn name(id: &str) -> Expr {
    Expr::name(id)
}

fn attr_rep(value: &str, attr: &str) -> String {
    format!("({value}.{attr} if hasattr({value}, '{attr}') else {value}['{attr}'])")
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_integer_literals() {
    assert_eq!(lower(&Expr::int(42)).unwrap(), "42");
    assert_eq!(lower(&Expr::int(0)).unwrap(), "0");
}

#[test]
fn test_negative_numbers_are_parenthesized() {
    assert_eq!(lower(&Expr::int(-3)).unwrap(), "(-3)");
    assert_eq!(lower(&Expr::float(-0.5)).unwrap(), "(-0.5)");
}

#[test]
fn test_float_literals() {
    assert_eq!(lower(&Expr::float(2.5)).unwrap(), "2.5");
    assert_eq!(lower(&Expr::float(3.0)).unwrap(), "3.0");
}

#[test]
fn test_string_boolean_and_null_literals() {
    assert_eq!(lower(&Expr::string("tree")).unwrap(), "'tree'");
    assert_eq!(lower(&Expr::boolean(true)).unwrap(), "True");
    assert_eq!(lower(&Expr::boolean(false)).unwrap(), "False");
    assert_eq!(lower(&Expr::Null).unwrap(), "None");
}

#[test]
fn test_list_literal() {
    let expr = Expr::list(vec![Expr::int(1), Expr::string("a"), name("x")]);
    assert_eq!(lower(&expr).unwrap(), "[1, 'a', x]");
    assert_eq!(lower(&Expr::list(vec![])).unwrap(), "[]");
}

#[test]
fn test_tuple_literals() {
    assert_eq!(lower(&Expr::tuple(vec![Expr::int(1), Expr::int(2)])).unwrap(), "(1, 2)");
    assert_eq!(lower(&Expr::tuple(vec![])).unwrap(), "()");
}

#[test]
fn test_single_element_tuple_keeps_trailing_comma() {
    assert_eq!(lower(&Expr::tuple(vec![name("x")])).unwrap(), "(x,)");
}

#[test]
fn test_dict_literal() {
    let expr = Expr::dict(vec![
        (Expr::string("a"), Expr::int(1)),
        (Expr::string("b"), name("y")),
    ]);
    assert_eq!(lower(&expr).unwrap(), "{'a': 1, 'b': y}");
}

// ============================================================================
// Identifiers
// ============================================================================

#[test]
fn test_builtin_names_resolve() {
    for builtin in ["True", "False", "None", "abs", "all", "any", "len", "max", "min", "sum"] {
        assert_eq!(lower(&name(builtin)).unwrap(), builtin);
    }
}

#[test]
fn test_host_globals_resolve() {
    assert_eq!(lower(&name("np")).unwrap(), "np");
    assert_eq!(lower(&name("x")).unwrap(), "x");
}

#[test]
fn test_unknown_name_is_unresolved() {
    let err = lower(&name("missing")).unwrap_err();
    assert_eq!(err, LowerError::UnresolvedIdentifier("missing".into()));
    assert_eq!(err.to_string(), "Unknown id: missing");
}

#[test]
fn test_empty_environment_resolves_nothing() {
    let result = lower_expr(&name("True"), &Environment::empty(), &LoweringConfig::default());
    assert!(matches!(result, Err(LowerError::UnresolvedIdentifier(ref n)) if n == "True"));
}

// ============================================================================
// Operations
// ============================================================================

#[test]
fn test_unary_operators() {
    assert_eq!(lower(&Expr::unary(UnaryOp::UAdd, name("x"))).unwrap(), "(+x)");
    assert_eq!(lower(&Expr::unary(UnaryOp::USub, name("x"))).unwrap(), "(-x)");
    assert_eq!(lower(&Expr::unary(UnaryOp::Invert, name("x"))).unwrap(), "(~x)");
}

#[test]
fn test_logical_not_is_elementwise() {
    let expr = Expr::unary(UnaryOp::Not, name("x"));
    assert_eq!(lower(&expr).unwrap(), "np.logical_not(x)");
}

#[test]
fn test_binary_operators() {
    let cases = [
        (BinOp::Add, "+"),
        (BinOp::Sub, "-"),
        (BinOp::Mult, "*"),
        (BinOp::Div, "/"),
        (BinOp::FloorDiv, "//"),
        (BinOp::Mod, "%"),
        (BinOp::Pow, "**"),
        (BinOp::LShift, "<<"),
        (BinOp::RShift, ">>"),
        (BinOp::BitOr, "|"),
        (BinOp::BitXor, "^"),
        (BinOp::BitAnd, "&"),
    ];
    for (op, symbol) in cases {
        let expr = Expr::binary(op, name("x"), name("y"));
        assert_eq!(lower(&expr).unwrap(), format!("(x {symbol} y)"));
    }
}

#[test]
fn test_nested_binary_operations_are_fully_parenthesized() {
    // (x + y) * -2
    let expr = Expr::binary(
        BinOp::Mult,
        Expr::binary(BinOp::Add, name("x"), name("y")),
        Expr::int(-2),
    );
    assert_eq!(lower(&expr).unwrap(), "((x + y) * (-2))");
}

#[test]
fn test_matrix_multiplication_is_unsupported() {
    let expr = Expr::binary(BinOp::MatMult, name("x"), name("y"));
    assert!(matches!(lower(&expr), Err(LowerError::UnsupportedOperator(_))));
}

#[test]
fn test_boolean_operations_are_elementwise_calls() {
    let and = Expr::boolean_op(BoolOp::And, vec![name("x"), name("y"), name("z")]);
    assert_eq!(lower(&and).unwrap(), "np.logical_and(x, y, z)");

    let or = Expr::boolean_op(BoolOp::Or, vec![name("x"), name("y")]);
    assert_eq!(lower(&or).unwrap(), "np.logical_or(x, y)");
}

#[test]
fn test_single_comparison() {
    let expr = Expr::compare(name("x"), CmpOp::GtE, Expr::int(0));
    assert_eq!(lower(&expr).unwrap(), "(x >= 0)");
}

#[test]
fn test_comparison_chain_keeps_pairwise_order() {
    let expr = Expr::Compare {
        left: Box::new(Expr::int(0)),
        ops: vec![CmpOp::Lt, CmpOp::LtE, CmpOp::NotEq],
        comparators: vec![name("x"), name("y"), name("z")],
    };
    assert_eq!(lower(&expr).unwrap(), "(0 < x <= y != z)");
}

#[test]
fn test_word_comparison_operators() {
    let cases = [
        (CmpOp::Is, "x is None"),
        (CmpOp::IsNot, "x is not None"),
        (CmpOp::In, "x in None"),
        (CmpOp::NotIn, "x not in None"),
    ];
    for (op, expected) in cases {
        let expr = Expr::compare(name("x"), op, Expr::Null);
        assert_eq!(lower(&expr).unwrap(), format!("({expected})"));
    }
}

#[test]
fn test_comparison_with_mismatched_comparators_is_malformed() {
    let expr = Expr::Compare {
        left: Box::new(name("x")),
        ops: vec![CmpOp::Lt, CmpOp::Lt],
        comparators: vec![name("y")],
    };
    assert!(matches!(lower(&expr), Err(LowerError::MalformedQuery(_))));
}

#[test]
fn test_conditional_expression() {
    let expr = Expr::if_exp(name("x"), name("y"), name("z"));
    assert_eq!(lower(&expr).unwrap(), "(y if x else z)");
}

// ============================================================================
// Subscripts and attributes
// ============================================================================

#[test]
fn test_simple_index() {
    assert_eq!(lower(&Expr::subscript(name("x"), Expr::int(0))).unwrap(), "x[0]");
    assert_eq!(lower(&Expr::subscript(name("x"), Expr::int(-1))).unwrap(), "x[(-1)]");
}

#[test]
fn test_slices() {
    let full = Expr::subscript(name("x"), Expr::slice(None, None, None));
    assert_eq!(lower(&full).unwrap(), "x[:]");

    let bounded = Expr::subscript(name("x"), Expr::slice(Some(Expr::int(1)), Some(Expr::int(2)), None));
    assert_eq!(lower(&bounded).unwrap(), "x[1:2]");

    let stepped = Expr::subscript(name("x"), Expr::slice(None, Some(Expr::int(2)), Some(name("y"))));
    assert_eq!(lower(&stepped).unwrap(), "x[:2:y]");
}

#[test]
fn test_tuple_subscript_key_is_multidimensional() {
    let key = Expr::tuple(vec![Expr::slice(Some(Expr::int(1)), None, None), Expr::int(0)]);
    let expr = Expr::subscript(name("x"), key);
    assert_eq!(lower(&expr).unwrap(), "x[1:, 0]");
}

#[test]
fn test_extended_slice() {
    let key = Expr::ExtSlice {
        dims: vec![Expr::slice(None, None, None), Expr::int(1)],
    };
    let expr = Expr::subscript(name("x"), key);
    assert_eq!(lower(&expr).unwrap(), "x[:, 1]");
}

#[test]
fn test_attribute_access_falls_back_to_mapping_lookup() {
    let expr = Expr::attr(name("x"), "pt");
    assert_eq!(
        lower(&expr).unwrap(),
        "(x.pt if hasattr(x, 'pt') else x['pt'])"
    );
}

#[test]
fn test_chained_attribute_access() {
    let expr = Expr::attr(Expr::attr(name("x"), "jet"), "pt");
    let inner = attr_rep("x", "jet");
    assert_eq!(lower(&expr).unwrap(), attr_rep(&inner, "pt"));
}

// ============================================================================
// Lambdas and calls
// ============================================================================

#[test]
fn test_lambda_binds_its_parameters() {
    let expr = Expr::lambda(&["a", "b"], Expr::binary(BinOp::Add, name("a"), name("b")));
    assert_eq!(lower(&expr).unwrap(), "(lambda a, b: (a + b))");
}

#[test]
fn test_lambda_without_parameters() {
    let expr = Expr::lambda(&[], Expr::int(1));
    assert_eq!(lower(&expr).unwrap(), "(lambda: 1)");
}

#[test]
fn test_lambda_parameter_is_not_visible_outside() {
    // [(lambda a: a), a]
    let expr = Expr::list(vec![Expr::lambda(&["a"], name("a")), name("a")]);
    assert_eq!(
        lower(&expr).unwrap_err(),
        LowerError::UnresolvedIdentifier("a".into())
    );
}

#[test]
fn test_generic_call() {
    assert_eq!(lower(&Expr::call(name("abs"), vec![name("x")])).unwrap(), "abs(x)");
    assert_eq!(
        lower(&Expr::call(name("max"), vec![name("x"), Expr::int(3)])).unwrap(),
        "max(x, 3)"
    );
    assert_eq!(lower(&Expr::call(name("len"), vec![])).unwrap(), "len()");
}

#[test]
fn test_call_of_unknown_function_is_unresolved() {
    let expr = Expr::call(name("mystery"), vec![name("x")]);
    assert!(matches!(lower(&expr), Err(LowerError::UnresolvedIdentifier(_))));
}

#[test]
fn test_immediately_applied_lambda() {
    let expr = Expr::call(Expr::lambda(&["a"], Expr::attr(name("a"), "pt")), vec![name("x")]);
    assert_eq!(
        lower(&expr).unwrap(),
        format!("(lambda a: {})(x)", attr_rep("a", "pt"))
    );
}

// ============================================================================
// Unsupported constructs
// ============================================================================

#[test]
fn test_set_literal_is_unsupported() {
    let expr = Expr::Set {
        elements: vec![Expr::int(1)],
    };
    assert_eq!(
        lower(&expr).unwrap_err(),
        LowerError::UnsupportedOperator("set literal".into())
    );
}

#[test]
fn test_starred_expression_is_unsupported() {
    let expr = Expr::call(
        name("max"),
        vec![Expr::Starred {
            value: Box::new(name("x")),
        }],
    );
    assert_eq!(
        lower(&expr).unwrap_err(),
        LowerError::UnsupportedOperator("starred expression".into())
    );
}

#[test]
fn test_attribute_name_must_be_an_identifier() {
    let injected = "a') else __import__('os').system('id') or ('";
    let err = lower(&Expr::attr(name("x"), injected)).unwrap_err();
    assert!(matches!(err, LowerError::MalformedQuery(ref msg) if msg.contains("attribute")));

    for bad in ["", "1st", "a.b", "pt ", "lambda"] {
        assert!(matches!(
            lower(&Expr::attr(name("x"), bad)),
            Err(LowerError::MalformedQuery(_))
        ));
    }
    assert_eq!(lower(&Expr::attr(name("x"), "_pt2")).unwrap(), attr_rep("x", "_pt2"));
}

#[test]
fn test_lambda_parameter_must_be_an_identifier() {
    for bad in ["a, b", "x)", "x: __import__('os')", "None", ""] {
        let err = lower(&Expr::lambda(&[bad], Expr::int(1))).unwrap_err();
        assert!(
            matches!(err, LowerError::MalformedQuery(ref msg) if msg.contains("lambda parameter")),
            "{bad:?} was accepted"
        );
    }
}

#[test]
fn test_injected_attribute_inside_select_is_rejected() {
    let query = Expr::select(
        name("x"),
        Expr::lambda(&["row"], Expr::attr(name("row"), "pt) + (__import__('os')")),
    );
    assert!(matches!(lower(&query), Err(LowerError::MalformedQuery(_))));
}

// ============================================================================
// Memoization and depth
// ============================================================================

#[test]
fn test_lowering_twice_returns_the_cached_rep() {
    let expr = Expr::binary(BinOp::Add, name("x"), Expr::attr(name("y"), "pt"));
    let (mut arena, root) = Arena::from_expr(&expr, 256).unwrap();
    let env = env();
    let config = LoweringConfig::default();

    let mut lowerer = Lowerer::new(&mut arena, &env, &config);
    let first = lowerer.lower(root).unwrap();
    let second = lowerer.lower(root).unwrap();

    assert_eq!(first, second);
    assert_eq!(arena.rep(root), Some(first.as_str()));
}

#[test]
fn test_preattached_rep_short_circuits_lowering() {
    // `unknown` would not resolve, but its rep is already attached
    let expr = Expr::call(name("abs"), vec![name("unknown")]);
    let (mut arena, root) = Arena::from_expr(&expr, 256).unwrap();
    let arg = match arena.get(root) {
        Node::Call { args, .. } => args[0],
        other => panic!("expected call, got {:?}", other),
    };
    arena.attach_rep(arg, "row.value".to_string());

    let env = env();
    let config = LoweringConfig::default();
    let mut lowerer = Lowerer::new(&mut arena, &env, &config);
    assert_eq!(lowerer.lower(root).unwrap(), "abs(row.value)");
}

#[test]
fn test_attached_rep_is_never_replaced() {
    let (mut arena, root) = Arena::from_expr(&Expr::int(1), 256).unwrap();
    assert_eq!(arena.attach_rep(root, "1".into()), "1");
    assert_eq!(arena.attach_rep(root, "2".into()), "1");
}

#[test]
fn test_excessive_nesting_is_reported() {
    let mut expr = name("x");
    for _ in 0..20 {
        expr = Expr::unary(UnaryOp::USub, expr);
    }
    let config = LoweringConfig {
        max_depth: 8,
        ..LoweringConfig::default()
    };

    let err = lower_expr(&expr, &env(), &config).unwrap_err();
    assert!(matches!(err, LowerError::MalformedQuery(ref msg) if msg.contains("maximum depth of 8")));
}

#[test]
fn test_very_deep_tree_is_rejected_without_overflow() {
    let mut expr = name("x");
    for _ in 0..20_000 {
        expr = Expr::unary(UnaryOp::USub, expr);
    }

    let err = lower(&expr).unwrap_err();
    assert!(matches!(err, LowerError::MalformedQuery(ref msg) if msg.contains("maximum depth of 256")));

    // Dropping the chain recurses, so it happens on a thread with room for it
    std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(move || drop(expr))
        .unwrap()
        .join()
        .unwrap();
}

#[test]
fn test_arena_rejects_trees_deeper_than_the_limit() {
    let expr = Expr::list(vec![Expr::tuple(vec![Expr::int(1)])]);
    assert!(Arena::from_expr(&expr, 3).is_ok());
    assert!(matches!(
        Arena::from_expr(&expr, 2),
        Err(LowerError::MalformedQuery(_))
    ));
}

#[test]
fn test_nesting_within_limit_succeeds() {
    let mut expr = name("x");
    for _ in 0..3 {
        expr = Expr::unary(UnaryOp::Invert, expr);
    }
    let config = LoweringConfig {
        max_depth: 4,
        ..LoweringConfig::default()
    };
    assert_eq!(lower_expr(&expr, &env(), &config).unwrap(), "(~(~(~x)))");
}

// ============================================================================
// Emitter
// ============================================================================

#[test]
fn test_empty_query_emits_nothing() {
    let query = Query::default();
    assert_eq!(emit(&query, &env(), &LoweringConfig::default()).unwrap(), "");
}

#[test]
fn test_only_first_statement_is_emitted() {
    let query = Query {
        body: vec![name("x"), name("missing")],
    };
    assert_eq!(emit(&query, &env(), &LoweringConfig::default()).unwrap(), "x");
}

#[test]
fn test_lowered_query_lists_runtime_overrides() {
    let lowered = LoweredQuery::from_query(&Query::new(name("x")), &env(), &LoweringConfig::default()).unwrap();
    assert_eq!(lowered.expression, "x");
    assert_eq!(lowered.runtime_overrides, vec!["input_filenames", "tree_name"]);
}
