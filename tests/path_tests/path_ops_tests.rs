//! Tests for the path grammar, traversal and per-document operations
//!
//! These tests verify:
//! - Tokenizer acceptance and rejection rules
//! - Negative index resolution
//! - Query / Set / Increment / Push / Pop / ArrayLen / Remove semantics
//! - Auto-creation of intermediate objects on Set

use jsonkv::path::{self, resolve_index, walk, walk_mut, Intermediates, Path, Token};
use jsonkv::JsonKvError;
use serde_json::{json, Number, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn p(text: &str) -> Path {
    Path::parse(text).unwrap()
}

fn sample_doc() -> Value {
    json!({
        "a": 1.1,
        "b": [1, 2, 3, 4, 5],
        "c": [{"d": [1, 2, 3, 4, 5]}, {"e": 2}]
    })
}

fn delta(n: i64) -> Number {
    Number::from(n)
}

// =============================================================================
// Tokenizer Tests
// =============================================================================

#[test]
fn test_parse_single_field() {
    assert_eq!(p("name").tokens(), &[Token::field("name")]);
}

#[test]
fn test_parse_nested_fields_keep_order() {
    assert_eq!(
        p("user.address.city").tokens(),
        &[
            Token::field("user"),
            Token::field("address"),
            Token::field("city")
        ]
    );
}

#[test]
fn test_parse_field_with_index() {
    assert_eq!(p("items[2]").tokens(), &[Token::field_index("items", 2)]);
}

#[test]
fn test_parse_bare_and_negative_index() {
    assert_eq!(p("[0].x[-1]").tokens(), &[Token::index(0), Token::field_index("x", -1)]);
}

#[test]
fn test_parse_root_paths() {
    assert!(p("").is_root());
    assert!(p(".").is_root());
    assert_eq!(p(".").len(), 0);
}

#[test]
fn test_parse_field_allows_punctuation() {
    // Anything but whitespace and '[' is allowed after the first character
    assert_eq!(p("user-id]:x").tokens(), &[Token::field("user-id]:x")]);
    assert_eq!(p("_1").tokens(), &[Token::field("_1")]);
}

#[test]
fn test_parse_rejects_leading_digit() {
    assert!(matches!(Path::parse("1abc"), Err(JsonKvError::InvalidPath(_))));
}

#[test]
fn test_parse_rejects_whitespace() {
    assert!(matches!(Path::parse("a b"), Err(JsonKvError::InvalidPath(_))));
    assert!(matches!(Path::parse(" a"), Err(JsonKvError::InvalidPath(_))));
    assert!(matches!(Path::parse("a.b c"), Err(JsonKvError::InvalidPath(_))));
}

#[test]
fn test_parse_rejects_malformed_brackets() {
    for bad in ["a[", "a[]", "a[x]", "a[1", "a[1]b", "a[1][2]", "a[--1]", "a[+1]", "a[ 1]"] {
        assert!(
            matches!(Path::parse(bad), Err(JsonKvError::InvalidPath(_))),
            "expected '{}' to be rejected",
            bad
        );
    }
}

#[test]
fn test_parse_rejects_empty_segments() {
    assert!(matches!(Path::parse("a..b"), Err(JsonKvError::InvalidPath(_))));
    assert!(matches!(Path::parse("a."), Err(JsonKvError::InvalidPath(_))));
    assert!(matches!(Path::parse(".a"), Err(JsonKvError::InvalidPath(_))));
}

#[test]
fn test_parse_rejects_index_overflow() {
    assert!(matches!(
        Path::parse("a[99999999999999999999]"),
        Err(JsonKvError::InvalidPath(_))
    ));
}

#[test]
fn test_path_display_round_trips() {
    for text in ["a", "a.b[3]", "[0].c[-2].d", "."] {
        assert_eq!(p(text).to_string(), text);
    }
}

#[test]
fn test_from_str() {
    let path: Path = "x[1].y".parse().unwrap();
    assert_eq!(path.len(), 2);
}

// =============================================================================
// Index Resolution Tests
// =============================================================================

#[test]
fn test_resolve_index_positive() {
    assert_eq!(resolve_index(0, 3).unwrap(), 0);
    assert_eq!(resolve_index(2, 3).unwrap(), 2);
    assert!(matches!(
        resolve_index(3, 3),
        Err(JsonKvError::IndexOutOfRange { index: 3, len: 3 })
    ));
}

#[test]
fn test_resolve_index_negative() {
    assert_eq!(resolve_index(-1, 3).unwrap(), 2);
    assert_eq!(resolve_index(-3, 3).unwrap(), 0);
    assert!(matches!(
        resolve_index(-4, 3),
        Err(JsonKvError::IndexOutOfRange { .. })
    ));
}

#[test]
fn test_resolve_index_empty_array() {
    assert!(resolve_index(0, 0).is_err());
    assert!(resolve_index(-1, 0).is_err());
}

#[test]
fn test_resolve_index_extremes() {
    assert!(resolve_index(i64::MIN, 10).is_err());
    assert!(resolve_index(i64::MAX, 10).is_err());
}

// =============================================================================
// Query Tests
// =============================================================================

#[test]
fn test_query_field() {
    let doc = sample_doc();
    assert_eq!(path::query(&doc, &p("a")).unwrap(), json!(1.1));
}

#[test]
fn test_query_nested_index() {
    let doc = sample_doc();
    assert_eq!(path::query(&doc, &p("c[0].d[4]")).unwrap(), json!(5));
    assert_eq!(path::query(&doc, &p("c[-1].e")).unwrap(), json!(2));
}

#[test]
fn test_query_negative_index_matches_positive() {
    let doc = sample_doc();
    let len = doc["b"].as_array().unwrap().len() as i64;
    for i in 1..=len {
        let from_end = path::query(&doc, &p(&format!("b[-{}]", i))).unwrap();
        let from_start = path::query(&doc, &p(&format!("b[{}]", len - i))).unwrap();
        assert_eq!(from_end, from_start);
    }
    assert!(matches!(
        path::query(&doc, &p(&format!("b[-{}]", len + 1))),
        Err(JsonKvError::IndexOutOfRange { .. })
    ));
}

#[test]
fn test_query_root_returns_document() {
    let doc = sample_doc();
    assert_eq!(path::query(&doc, &p(".")).unwrap(), doc);
}

#[test]
fn test_query_missing_field() {
    let doc = sample_doc();
    assert!(matches!(
        path::query(&doc, &p("zzz")),
        Err(JsonKvError::NoSuchField(_))
    ));
    assert!(matches!(
        path::query(&doc, &p("zzz.y.z")),
        Err(JsonKvError::NoSuchField(_))
    ));
}

#[test]
fn test_query_out_of_range() {
    let doc = sample_doc();
    assert!(matches!(
        path::query(&doc, &p("b[20]")),
        Err(JsonKvError::IndexOutOfRange { index: 20, len: 5 })
    ));
}

#[test]
fn test_query_type_mismatch() {
    let doc = sample_doc();
    assert!(matches!(path::query(&doc, &p("a.x")), Err(JsonKvError::ExpectedObject)));
    assert!(matches!(path::query(&doc, &p("a[0]")), Err(JsonKvError::ExpectedArray)));
    assert!(matches!(path::query(&doc, &p("b.x")), Err(JsonKvError::ExpectedObject)));
}

#[test]
fn test_query_explicit_null_is_a_value() {
    let doc = json!({"n": null});
    assert_eq!(path::query(&doc, &p("n")).unwrap(), Value::Null);
}

#[test]
fn test_walk_reports_absent_as_none() {
    let doc = sample_doc();
    assert_eq!(walk(&doc, &p("missing")).unwrap(), None);
    assert_eq!(walk(&doc, &p("b[1]")).unwrap(), Some(&json!(2)));
}

// =============================================================================
// Set Tests
// =============================================================================

#[test]
fn test_set_existing_field() {
    let mut doc = sample_doc();
    path::set(&mut doc, &p("a"), json!("x")).unwrap();
    assert_eq!(doc["a"], json!("x"));
}

#[test]
fn test_set_creates_intermediate_objects() {
    let mut doc = json!({"a": 1, "b": [1, 2, 3]});
    path::set(&mut doc, &p("c.d"), json!(5)).unwrap();
    assert_eq!(doc, json!({"a": 1, "b": [1, 2, 3], "c": {"d": 5}}));
}

#[test]
fn test_set_replaces_scalar_intermediate() {
    let mut doc = json!({"a": 1});
    path::set(&mut doc, &p("a.b.c"), json!(true)).unwrap();
    assert_eq!(doc, json!({"a": {"b": {"c": true}}}));
}

#[test]
fn test_set_keeps_existing_containers() {
    let mut doc = json!({"a": {"keep": 1}});
    path::set(&mut doc, &p("a.new"), json!(2)).unwrap();
    assert_eq!(doc, json!({"a": {"keep": 1, "new": 2}}));
}

#[test]
fn test_set_array_element() {
    let mut doc = sample_doc();
    path::set(&mut doc, &p("b[-1]"), json!({"z": 0})).unwrap();
    path::set(&mut doc, &p("c[1].e"), json!(3)).unwrap();
    assert_eq!(doc["b"][4], json!({"z": 0}));
    assert_eq!(doc["c"][1]["e"], json!(3));
}

#[test]
fn test_set_does_not_grow_arrays() {
    let mut doc = sample_doc();
    assert!(matches!(
        path::set(&mut doc, &p("b[5]"), json!(6)),
        Err(JsonKvError::IndexOutOfRange { .. })
    ));
    assert_eq!(doc["b"], json!([1, 2, 3, 4, 5]));
}

#[test]
fn test_set_through_array_into_object_field() {
    let mut doc = json!({"list": [{}]});
    path::set(&mut doc, &p("list[0].x.y"), json!(1)).unwrap();
    assert_eq!(doc, json!({"list": [{"x": {"y": 1}}]}));
}

#[test]
fn test_set_field_on_array_fails() {
    let mut doc = json!({"arr": [1]});
    assert!(matches!(
        path::set(&mut doc, &p("arr.x"), json!(1)),
        Err(JsonKvError::ExpectedObject)
    ));
}

#[test]
fn test_set_root_replaces_document() {
    let mut doc = sample_doc();
    path::set(&mut doc, &Path::root(), json!([1])).unwrap();
    assert_eq!(doc, json!([1]));
}

#[test]
fn test_set_then_query_round_trip() {
    let values = [json!(null), json!(0), json!("s"), json!([1, [2]]), json!({"k": {"v": 1}})];
    for value in values {
        let mut doc = sample_doc();
        let target = p("c[0].d[2]");
        path::set(&mut doc, &target, value.clone()).unwrap();
        assert_eq!(path::query(&doc, &target).unwrap(), value);
    }
}

#[test]
fn test_set_partial_creation_is_kept_on_failure() {
    // Intermediates are created before later tokens are checked
    let mut doc = json!({});
    let result = path::set(&mut doc, &p("a.b[0]"), json!(1));
    assert!(result.is_err());
    assert_eq!(doc, json!({"a": {}}));
}

// =============================================================================
// Increment Tests
// =============================================================================

#[test]
fn test_increment_integer() {
    let mut doc = json!({"a": 1});
    assert_eq!(path::increment(&mut doc, &p("a"), &delta(5)).unwrap(), 6);
    assert_eq!(doc["a"], json!(6));
}

#[test]
fn test_increment_float_truncates() {
    let mut doc = sample_doc();
    assert_eq!(path::increment(&mut doc, &p("a"), &delta(1)).unwrap(), 2);
    assert_eq!(doc["a"], json!(2));
}

#[test]
fn test_increment_float_delta_truncates() {
    let mut doc = json!({"a": 10});
    let d = Number::from_f64(-2.9).unwrap();
    assert_eq!(path::increment(&mut doc, &p("a"), &d).unwrap(), 8);
}

#[test]
fn test_increment_is_additive() {
    let mut doc = json!({"n": 7});
    path::increment(&mut doc, &p("n"), &delta(3)).unwrap();
    path::increment(&mut doc, &p("n"), &delta(-12)).unwrap();
    assert_eq!(doc["n"], json!(-2));
}

#[test]
fn test_increment_array_element() {
    let mut doc = sample_doc();
    path::increment(&mut doc, &p("c[0].d[-1]"), &delta(100)).unwrap();
    assert_eq!(doc["c"][0]["d"][4], json!(105));
}

#[test]
fn test_increment_non_number() {
    let mut doc = json!({"s": "x", "b": [1]});
    assert!(matches!(
        path::increment(&mut doc, &p("s"), &delta(1)),
        Err(JsonKvError::ExpectedNumber)
    ));
    assert!(matches!(
        path::increment(&mut doc, &p("b"), &delta(1)),
        Err(JsonKvError::ExpectedNumber)
    ));
    assert!(matches!(
        path::increment(&mut doc, &p("missing"), &delta(1)),
        Err(JsonKvError::ExpectedNumber)
    ));
    assert!(doc.get("missing").is_none());
}

#[test]
fn test_increment_out_of_range_index() {
    let mut doc = sample_doc();
    assert!(matches!(
        path::increment(&mut doc, &p("b[20]"), &delta(100)),
        Err(JsonKvError::IndexOutOfRange { .. })
    ));
}

#[test]
fn test_increment_missing_intermediate() {
    let mut doc = json!({});
    assert!(matches!(
        path::increment(&mut doc, &p("x.y"), &delta(1)),
        Err(JsonKvError::ExpectedObject)
    ));
    assert!(matches!(
        path::increment(&mut doc, &p("x[0]"), &delta(1)),
        Err(JsonKvError::ExpectedArray)
    ));
    assert_eq!(doc, json!({}));
}

#[test]
fn test_increment_overflow() {
    let mut doc = json!({"n": i64::MAX});
    assert!(matches!(
        path::increment(&mut doc, &p("n"), &delta(1)),
        Err(JsonKvError::NumericOverflow)
    ));
    assert_eq!(doc["n"], json!(i64::MAX));
}

// =============================================================================
// Push / Pop Tests
// =============================================================================

#[test]
fn test_push_appends_to_tail() {
    let mut doc = sample_doc();
    path::push(&mut doc, &p("b"), json!(6)).unwrap();
    assert_eq!(doc["b"], json!([1, 2, 3, 4, 5, 6]));
}

#[test]
fn test_push_nested_array() {
    let mut doc = sample_doc();
    path::push(&mut doc, &p("c[0].d"), json!({"x": 1})).unwrap();
    assert_eq!(doc["c"][0]["d"][5], json!({"x": 1}));
}

#[test]
fn test_push_non_array() {
    let mut doc = sample_doc();
    assert!(matches!(
        path::push(&mut doc, &p("a"), json!(1)),
        Err(JsonKvError::ExpectedArray)
    ));
    assert!(matches!(
        path::push(&mut doc, &p("nope"), json!(1)),
        Err(JsonKvError::ExpectedArray)
    ));
}

#[test]
fn test_pop_takes_head() {
    let mut doc = sample_doc();
    assert_eq!(path::pop(&mut doc, &p("b")).unwrap(), json!(1));
    assert_eq!(doc["b"], json!([2, 3, 4, 5]));
}

#[test]
fn test_push_then_pop_is_fifo() {
    let mut doc = json!({"q": ["first"]});
    path::push(&mut doc, &p("q"), json!("second")).unwrap();
    assert_eq!(path::pop(&mut doc, &p("q")).unwrap(), json!("first"));
    assert_eq!(path::pop(&mut doc, &p("q")).unwrap(), json!("second"));
}

#[test]
fn test_push_then_pop_on_empty_returns_pushed() {
    let mut doc = json!({"q": []});
    path::push(&mut doc, &p("q"), json!(42)).unwrap();
    assert_eq!(path::pop(&mut doc, &p("q")).unwrap(), json!(42));
    assert_eq!(doc["q"], json!([]));
}

#[test]
fn test_pop_empty_array() {
    let mut doc = json!({"q": []});
    assert!(matches!(path::pop(&mut doc, &p("q")), Err(JsonKvError::EmptyArray)));
}

#[test]
fn test_pop_non_array() {
    let mut doc = json!({"q": {"a": 1}});
    assert!(matches!(path::pop(&mut doc, &p("q")), Err(JsonKvError::ExpectedArray)));
}

#[test]
fn test_pop_element_of_array_of_arrays() {
    let mut doc = json!({"m": [[1, 2], [3]]});
    assert_eq!(path::pop(&mut doc, &p("m[-1]")).unwrap(), json!(3));
    assert_eq!(doc, json!({"m": [[1, 2], []]}));
}

#[test]
fn test_push_pop_on_root_array() {
    let mut doc = json!([1]);
    path::push(&mut doc, &Path::root(), json!(2)).unwrap();
    assert_eq!(path::pop(&mut doc, &Path::root()).unwrap(), json!(1));
    assert_eq!(doc, json!([2]));
}

// =============================================================================
// ArrayLen / Remove Tests
// =============================================================================

#[test]
fn test_array_len() {
    let doc = sample_doc();
    assert_eq!(path::array_len(&doc, &p("b")).unwrap(), 5);
    assert_eq!(path::array_len(&doc, &p("c")).unwrap(), 2);
    assert!(matches!(path::array_len(&doc, &p("a")), Err(JsonKvError::ExpectedArray)));
    assert!(matches!(
        path::array_len(&doc, &p("zz")),
        Err(JsonKvError::NoSuchField(_))
    ));
}

#[test]
fn test_remove_field() {
    let mut doc = sample_doc();
    assert_eq!(path::remove(&mut doc, &p("c[1].e")).unwrap(), json!(2));
    assert_eq!(doc["c"][1], json!({}));
}

#[test]
fn test_remove_element() {
    let mut doc = sample_doc();
    assert_eq!(path::remove(&mut doc, &p("b[-2]")).unwrap(), json!(4));
    assert_eq!(doc["b"], json!([1, 2, 3, 5]));
    assert_eq!(path::remove(&mut doc, &p("c[0].d[0]")).unwrap(), json!(1));
    assert_eq!(doc["c"][0]["d"], json!([2, 3, 4, 5]));
}

#[test]
fn test_remove_missing() {
    let mut doc = sample_doc();
    assert!(matches!(
        path::remove(&mut doc, &p("nope")),
        Err(JsonKvError::NoSuchField(_))
    ));
    assert!(matches!(
        path::remove(&mut doc, &p("b[9]")),
        Err(JsonKvError::IndexOutOfRange { .. })
    ));
    assert!(matches!(
        path::remove(&mut doc, &Path::root()),
        Err(JsonKvError::InvalidPath(_))
    ));
    assert_eq!(doc, sample_doc());
}

// =============================================================================
// Raw Traversal Tests
// =============================================================================

#[test]
fn test_walk_mut_keep_leaves_slot() {
    let mut doc = sample_doc();
    let mut seen = None;
    walk_mut(&mut doc, &p("b[2]"), Intermediates::Require, |slot| {
        seen = Some(slot.clone());
        Ok(None)
    })
    .unwrap();
    assert_eq!(seen, Some(json!(3)));
    assert_eq!(doc, sample_doc());
}

#[test]
fn test_walk_mut_vacant_terminal_field() {
    let mut doc = json!({});
    walk_mut(&mut doc, &p("new"), Intermediates::Require, |slot| {
        assert!(slot.is_null());
        Ok(Some(json!("made")))
    })
    .unwrap();
    assert_eq!(doc, json!({"new": "made"}));
}

#[test]
fn test_walk_mut_failing_replacer_leaves_document() {
    let mut doc = sample_doc();
    let result = walk_mut(&mut doc, &p("a"), Intermediates::Require, |_| {
        Err(JsonKvError::ExpectedArray)
    });
    assert!(result.is_err());
    assert_eq!(doc, sample_doc());
}
