//! End-to-end behaviour of registration and parsing.

mod common;

use argweave::{
    ArgError, Argument, Cardinality, Configure, Flag, OptionArg, Parser, Value, ValueKind,
};
use common::tokens;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// =============================================================================
// REGISTRATION
// =============================================================================

#[test]
fn duplicate_identifier_fails_and_keeps_registry() {
    let mut parser = Parser::new();
    parser.register(Flag::new("verbose")).unwrap();
    parser.register(Argument::new("file")).unwrap();

    for duplicate in [
        argweave::Element::from(Flag::new("file")),
        argweave::Element::from(OptionArg::new("verbose")),
        argweave::Element::from(Argument::new("file")),
    ] {
        let err = parser.register(duplicate).unwrap_err();
        assert!(matches!(err, ArgError::DuplicateIdentifier { .. }));
    }

    let ids: Vec<&str> = parser.elements().iter().map(|e| e.identifier()).collect();
    assert_eq!(ids, vec!["verbose", "file"]);
}

#[test]
fn slot_default_length_mismatch_fails_at_registration() {
    let mut parser = Parser::new();
    let err = parser
        .register(
            OptionArg::new("rgb")
                .count(3)
                .with_default_slots(vec![0, 0]),
        )
        .unwrap_err();
    assert!(matches!(err, ArgError::InvalidConfiguration { id, .. } if id == "rgb"));

    let err = parser
        .register(Argument::new("pair").count(2).with_default_slots(vec!["a"]))
        .unwrap_err();
    assert!(matches!(err, ArgError::InvalidConfiguration { .. }));
    assert!(parser.elements().is_empty());
}

#[test]
fn unknown_named_type_fails_at_registration() {
    let mut parser = Parser::new();
    let err = parser.register(OptionArg::new("when").typed("Date")).unwrap_err();
    assert!(matches!(err, ArgError::InvalidType { target, .. } if target == "Date"));
}

// =============================================================================
// POSITIONAL ARGUMENTS
// =============================================================================

#[test]
fn single_positional_consumes_token() {
    let mut parser = Parser::new();
    parser.register(Argument::new("name")).unwrap();

    let m = parser.parse(tokens(&["x"])).unwrap();
    assert_eq!(m.get("name").unwrap(), &Value::from("x"));
    assert!(m.leftover().is_empty());
}

#[test]
fn unlimited_positional_accepts_nothing() {
    let mut parser = Parser::new();
    parser.register(Argument::new("files").unlimited()).unwrap();

    let m = parser.parse(Vec::<String>::new()).unwrap();
    assert_eq!(m.get_list("files").unwrap(), &[] as &[Value]);
}

#[test]
fn finite_positional_without_candidates_fails() {
    for n in 1..=3 {
        let mut parser = Parser::new();
        parser.register(Argument::new("pos").count(n)).unwrap();

        let err = parser.parse(Vec::<String>::new()).unwrap_err();
        assert_eq!(
            err,
            ArgError::MissingArgument {
                id: "pos".into(),
                expected: n.to_string(),
                found: 0,
            }
        );
    }
}

#[test]
fn positional_ignores_unclaimed_option_like_tokens() {
    let mut parser = Parser::new();
    parser.register(Argument::new("src")).unwrap();
    parser.register(Argument::new("dst")).unwrap();

    let m = parser.parse(tokens(&["--unknown", "a", "-z", "b"])).unwrap();
    assert_eq!(m.get_str("src").unwrap(), "a");
    assert_eq!(m.get_str("dst").unwrap(), "b");
    assert_eq!(m.leftover(), tokens(&["--unknown", "-z"]).as_slice());
}

#[test]
fn trailing_fixed_positional_fills_from_default() {
    let mut parser = Parser::new();
    parser.register(Argument::new("cmd")).unwrap();
    parser
        .register(
            Argument::new("size")
                .count(2)
                .kind(ValueKind::Int)
                .with_default(10),
        )
        .unwrap();

    let m = parser.parse(tokens(&["resize", "3"])).unwrap();
    assert_eq!(m.get_str("cmd").unwrap(), "resize");
    assert_eq!(m.get("size").unwrap(), &Value::from(vec![3, 10]));
}

#[test]
fn only_trailing_unlimited_positional_uses_default() {
    let mut parser = Parser::new();
    parser
        .register(Argument::new("a").unlimited().with_default_slots(vec!["d"]))
        .unwrap();
    parser
        .register(Argument::new("b").unlimited().with_default_slots(vec!["e"]))
        .unwrap();

    let m = parser.parse(Vec::<String>::new()).unwrap();
    assert_eq!(m.get_list("a").unwrap(), &[] as &[Value]);
    assert_eq!(m.get("b").unwrap(), &Value::from(vec!["e"]));
}

// =============================================================================
// OPTIONS AND FLAGS
// =============================================================================

#[test]
fn option_inline_backfills_from_default() {
    let mut parser = Parser::new();
    parser
        .register(
            OptionArg::new("opt")
                .count(3)
                .with_minimum(1)
                .with_default_slots(vec!["a", "b", "c"])
                .kind(ValueKind::Int),
        )
        .unwrap();

    let m = parser.parse(tokens(&["--opt=1"])).unwrap();
    assert_eq!(
        m.get("opt").unwrap(),
        &Value::List(vec![Value::Int(1), Value::from("b"), Value::from("c")])
    );
}

#[test]
fn explicit_option_minimum_counts_supplied_values() {
    let mut parser = Parser::new();
    parser
        .register(
            OptionArg::new("opt")
                .count(3)
                .with_minimum(2)
                .with_default_slots(vec!["a", "b", "c"]),
        )
        .unwrap();

    for input in [&["--opt=1"][..], &["--opt"][..], &["--opt", "1"][..]] {
        let err = parser.parse(tokens(input)).unwrap_err();
        assert!(matches!(err, ArgError::MissingArgument { ref id, .. } if id == "opt"));
    }

    let m = parser.parse(tokens(&["--opt=1,2"])).unwrap();
    assert_eq!(m.get("opt").unwrap(), &Value::from(vec!["1", "2", "c"]));

    // absent entirely: the default stands in
    let m = parser.parse(Vec::<String>::new()).unwrap();
    assert_eq!(m.get("opt").unwrap(), &Value::from(vec!["a", "b", "c"]));
}

#[test]
fn flag_absent_and_present() {
    let mut parser = Parser::new();
    parser.register(Flag::new("verbose").alias("v")).unwrap();
    parser.register(Argument::new("rest").unlimited()).unwrap();

    let m = parser.parse(tokens(&["a", "b"])).unwrap();
    assert!(!m.get_bool("verbose").unwrap());

    let m = parser.parse(tokens(&["a", "-v", "b"])).unwrap();
    assert!(m.get_bool("verbose").unwrap());
    assert_eq!(m.get("rest").unwrap(), &Value::from(vec!["a", "b"]));
    assert!(m.leftover().is_empty());
}

#[test]
fn unmatched_options_still_have_entries() {
    let mut parser = Parser::new();
    parser.register(OptionArg::new("name")).unwrap();
    parser.register(OptionArg::new("tags").unlimited()).unwrap();
    parser
        .register(OptionArg::new("dry-run").with_cardinality(Cardinality::Zero))
        .unwrap();
    parser.register(OptionArg::new("level").with_default(2)).unwrap();

    let m = parser.parse(Vec::<String>::new()).unwrap();
    assert!(m.get("name").unwrap().is_null());
    assert_eq!(m.get_list("tags").unwrap().len(), 0);
    assert!(!m.get_bool("dry-run").unwrap());
    assert_eq!(m.get_int("level").unwrap(), 2);
    assert_eq!(m.len(), 4);
}

#[test]
fn option_value_is_validated_and_transformed() {
    let mut parser = Parser::new();
    parser
        .register(
            OptionArg::new("port")
                .alias("p")
                .kind(ValueKind::Int)
                .validate_with(|v| v.as_int().is_some_and(|p| (1..=65535).contains(&p)))
                .transform(|v| Value::from(format!("127.0.0.1:{}", v))),
        )
        .unwrap();

    let m = parser.parse(tokens(&["-p", "8080"])).unwrap();
    assert_eq!(m.get_str("port").unwrap(), "127.0.0.1:8080");

    let err = parser.parse(tokens(&["-p", "70000"])).unwrap_err();
    assert_eq!(
        err,
        ArgError::InvalidArgument {
            id: "port".into(),
            value: "70000".into(),
        }
    );

    let err = parser.parse(tokens(&["-p", "http"])).unwrap_err();
    assert!(matches!(err, ArgError::InvalidType { .. }));
}

#[test]
fn flag_actions_fire_once_per_parse() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    let mut parser = Parser::new();
    parser
        .register(Flag::new("trace").on_present(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
        .unwrap();

    parser.parse(tokens(&["--trace"])).unwrap();
    parser.parse(tokens(&["other"])).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

// =============================================================================
// ORCHESTRATION
// =============================================================================

#[test]
fn options_consumed_before_positionals() {
    let mut parser = Parser::new();
    parser.register(OptionArg::new("a")).unwrap();
    parser.register(Argument::new("b")).unwrap();
    parser.register(OptionArg::new("c")).unwrap();
    parser.register(Argument::new("d")).unwrap();

    // Scanning positionals first would hand "1" to b.
    let m = parser
        .parse(tokens(&["--a", "1", "bee", "--c", "3", "dee"]))
        .unwrap();
    assert_eq!(m.get_str("a").unwrap(), "1");
    assert_eq!(m.get_str("c").unwrap(), "3");
    assert_eq!(m.get_str("b").unwrap(), "bee");
    assert_eq!(m.get_str("d").unwrap(), "dee");

    let order: Vec<&str> = m.iter().map(|(id, _)| id).collect();
    assert_eq!(order, vec!["a", "b", "c", "d"]);
}

#[test]
fn first_error_in_processing_order_wins() {
    let mut parser = Parser::new();
    parser.register(Argument::new("file")).unwrap();
    parser
        .register(OptionArg::new("count").kind(ValueKind::Int))
        .unwrap();

    // Both the positional (missing) and the option (bad int) fail;
    // options run first.
    let err = parser.parse(tokens(&["--count", "many"])).unwrap_err();
    assert!(matches!(err, ArgError::InvalidType { id, .. } if id == "count"));
}

#[test]
fn repeated_parses_are_identical() {
    let mut parser = Parser::new();
    parser.register(Flag::new("v")).unwrap();
    parser
        .register(OptionArg::new("n").kind(ValueKind::Float).with_default(0.5))
        .unwrap();
    parser.register(Argument::new("files").unlimited()).unwrap();

    let input = tokens(&["x", "--n=2.5", "-v", "y", "--v"]);
    let first = parser.parse(input.clone()).unwrap();
    let second = parser.parse(input).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.get_float("n").unwrap(), 2.5);
}

#[test]
fn strict_mode_reports_leftover_option() {
    let mut parser = Parser::new().strict(true);
    parser.register(Flag::new("quiet").alias("q")).unwrap();

    assert!(parser.parse(tokens(&["-q"])).is_ok());
    let err = parser.parse(tokens(&["-q", "-x"])).unwrap_err();
    assert_eq!(err, ArgError::UnrecognizedOption { token: "-x".into() });
}

#[test]
fn constructible_type_builds_objects() {
    #[derive(Debug, PartialEq)]
    struct Range(i64, i64);

    let mut parser = Parser::new().with_type("Range", |raw| {
        let (lo, hi) = raw.split_once("..").ok_or("expected lo..hi")?;
        let lo = lo.parse::<i64>().map_err(|e| e.to_string())?;
        let hi = hi.parse::<i64>().map_err(|e| e.to_string())?;
        Ok(Value::Object(argweave::Object::new("Range", Range(lo, hi))))
    });
    parser
        .register(OptionArg::new("lines").alias("l").typed("Range"))
        .unwrap();

    let m = parser.parse(tokens(&["-l3..9"])).unwrap();
    assert_eq!(
        m.get("lines").unwrap().downcast_ref::<Range>(),
        Some(&Range(3, 9))
    );

    let err = parser.parse(tokens(&["-l", "nine"])).unwrap_err();
    assert!(matches!(err, ArgError::InvalidType { target, .. } if target == "Range"));
}
