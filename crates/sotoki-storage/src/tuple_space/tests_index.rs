//! Secondary index query tests.
//!
//! # Edge Cases Covered
//! - Empty index relation
//! - Prefix with zero matches in a non-empty index
//! - Neighbouring attributes and values that share leading bytes
//! - Numeric ordering of integer values

use sotoki_core::{AttributeName, EntityId, Value};

use super::tests_core::{create_temp_space, post, post_attr};
use crate::codec::{IndexPrefix, PrimaryKey};

fn comment(local: &str) -> EntityId {
    EntityId::new("Comment", local)
}

fn comment_post_id() -> AttributeName {
    AttributeName::new("Comment", "PostId")
}

#[test]
fn test_query_on_empty_index_is_not_found() {
    println!("=== TEST: query on an empty index ===");
    let (_tmp, space) = create_temp_space();

    let result = space
        .session()
        .query(IndexPrefix::attribute(post_attr("Id")))
        .map(|scan| scan.count());

    println!("AFTER: {:?}", result.as_ref().err());
    assert!(result.expect_err("empty index").is_not_found());
}

#[test]
fn test_query_without_matches_is_empty_not_error() {
    println!("=== TEST: query with zero matches ===");
    let (_tmp, space) = create_temp_space();
    let session = space.session();
    session.insert(&comment("1"), &comment_post_id(), &Value::text("10")).expect("insert");

    // lands after: a value greater than any stored one, then an attribute
    // sorting after everything, then one sorting before everything
    let prefixes = [
        IndexPrefix::attribute_value(comment_post_id(), &Value::text("99")),
        IndexPrefix::attribute(AttributeName::new("Zzz", "Zzz")),
        IndexPrefix::attribute(AttributeName::new("AAA", "AAA")),
        IndexPrefix::attribute_value(comment_post_id(), &Value::text("1")),
    ];
    for prefix in prefixes {
        let hits = session.query_all(prefix.clone()).expect("query");
        println!("AFTER: {:?} -> {} rows", prefix, hits.len());
        assert!(hits.is_empty());
    }
}

#[test]
fn test_query_value_returns_exact_set_in_id_order() {
    println!("=== TEST: prefix completeness for (name, value) ===");
    let (_tmp, space) = create_temp_space();
    let session = space.session();

    for (id, post_id) in [("7", "1"), ("2", "1"), ("5", "2"), ("3", "1"), ("4", "11")] {
        session
            .insert(&comment(id), &comment_post_id(), &Value::text(post_id))
            .expect("insert");
    }

    let hits = session
        .query_all(IndexPrefix::attribute_value(comment_post_id(), &Value::text("1")))
        .expect("query");
    let ids: Vec<String> = hits.iter().map(|e| e.entity.to_string()).collect();
    println!("AFTER: {:?}", ids);
    assert_eq!(ids, vec!["Comment:2", "Comment:3", "Comment:7"]);
    for entry in &hits {
        assert_eq!(entry.value, Value::text("1"));
        assert_eq!(entry.attribute, comment_post_id());
        assert_eq!(
            entry.backpointer,
            PrimaryKey::new(entry.entity.clone(), comment_post_id())
        );
    }
}

#[test]
fn test_query_attribute_returns_every_row() {
    let (_tmp, space) = create_temp_space();
    let session = space.session();
    session.insert(&post("1"), &post_attr("Id"), &Value::text("1")).expect("insert");
    session.insert(&post("2"), &post_attr("Id"), &Value::text("2")).expect("insert");
    session.insert(&post("2"), &post_attr("IdX"), &Value::text("2")).expect("insert");
    session.insert(&post("1"), &post_attr("Title"), &Value::text("t")).expect("insert");

    let hits = session.query_all(IndexPrefix::attribute(post_attr("Id"))).expect("query");
    assert_eq!(hits.len(), 2, "IdX and Title rows must not match");
    assert!(hits.iter().all(|e| e.attribute == post_attr("Id")));
}

#[test]
fn test_query_exact_row() {
    let (_tmp, space) = create_temp_space();
    let session = space.session();
    session.insert(&comment("1"), &comment_post_id(), &Value::text("4")).expect("insert");
    session.insert(&comment("2"), &comment_post_id(), &Value::text("4")).expect("insert");

    let hit = session
        .query_all(IndexPrefix::exact(comment_post_id(), &Value::text("4"), comment("2")))
        .expect("query");
    assert_eq!(hit.len(), 1);
    assert_eq!(hit[0].entity, comment("2"));

    let miss = session
        .query_all(IndexPrefix::exact(comment_post_id(), &Value::text("4"), comment("3")))
        .expect("query");
    assert!(miss.is_empty());
}

#[test]
fn test_query_integer_values_in_numeric_order() {
    println!("=== TEST: integer index order ===");
    let (_tmp, space) = create_temp_space();
    let session = space.session();
    for (id, score) in [("1", 10i64), ("2", -4), ("3", 0), ("4", 3), ("5", -100)] {
        session
            .insert(&post(id), &post_attr("Score"), &Value::Integer(score))
            .expect("insert");
    }

    let scores: Vec<i64> = session
        .query_all(IndexPrefix::attribute(post_attr("Score")))
        .expect("query")
        .iter()
        .filter_map(|e| e.value.as_integer())
        .collect();
    println!("AFTER: {:?}", scores);
    assert_eq!(scores, vec![-100, -4, 0, 3, 10]);
}

#[test]
fn test_query_distinguishes_kinds() {
    let (_tmp, space) = create_temp_space();
    let session = space.session();
    session.insert(&post("1"), &post_attr("Score"), &Value::Integer(5)).expect("insert");
    session.insert(&post("2"), &post_attr("Score"), &Value::text("5")).expect("insert");

    let ints = session
        .query_all(IndexPrefix::attribute_value(post_attr("Score"), &Value::Integer(5)))
        .expect("query");
    assert_eq!(ints.len(), 1);
    assert_eq!(ints[0].entity, post("1"));
}

#[test]
fn test_scan_is_lazy_and_can_stop_early() {
    let (_tmp, space) = create_temp_space();
    let session = space.session();
    for i in 0..20 {
        session
            .insert(&comment(&format!("{i:02}")), &comment_post_id(), &Value::text("1"))
            .expect("insert");
    }

    let first_two: Vec<_> = session
        .query(IndexPrefix::attribute_value(comment_post_id(), &Value::text("1")))
        .expect("query")
        .take(2)
        .collect::<Result<_, _>>()
        .expect("rows");
    assert_eq!(first_two.len(), 2);
    assert_eq!(first_two[0].entity, comment("00"));
    assert_eq!(first_two[1].entity, comment("01"));
}
