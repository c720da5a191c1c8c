//! Primary relation tests: insert and get_entity.

use serde_json::json;
use sotoki_core::{AttributeName, EntityId, IndexMaintenance, StorageConfig, Value};

use super::error::StorageError;
use super::tests_core::{create_temp_space, create_temp_space_with, post, post_attr};
use crate::codec::IndexPrefix;

#[test]
fn test_get_entity_on_empty_store_is_not_found() {
    println!("=== TEST: get_entity on an empty relation ===");
    let (_tmp, space) = create_temp_space();

    let result = space.session().get_entity(&post("1"));

    println!("AFTER: {:?}", result);
    let err = result.expect_err("empty relation must fail");
    assert!(err.is_not_found());
    assert!(matches!(err, StorageError::NotFound { relation: "tuples", .. }));
}

#[test]
fn test_get_entity_missing_id_is_empty() {
    println!("=== TEST: get_entity on an unknown id in a non-empty relation ===");
    let (_tmp, space) = create_temp_space();
    let session = space.session();
    session
        .insert(&post("5"), &post_attr("Title"), &Value::text("five"))
        .expect("insert");

    // before, between and after the stored id
    for local in ["1", "50", "9"] {
        let entity = session.get_entity(&post(local)).expect("get");
        println!("AFTER: Post:{} -> {} attributes", local, entity.len());
        assert!(entity.is_empty(), "Post:{local} must be empty");
        assert_eq!(entity.id, post(local));
    }
}

#[test]
fn test_get_entity_collects_all_attributes_only() {
    println!("=== TEST: get_entity stops at the next entity ===");
    let (_tmp, space) = create_temp_space();
    let session = space.session();

    session.insert(&post("1"), &post_attr("Title"), &Value::text("one")).expect("insert");
    session.insert(&post("1"), &post_attr("Score"), &Value::Integer(4)).expect("insert");
    session
        .insert(&post("1"), &post_attr("Tags"), &Value::Structured(json!(["rust"])))
        .expect("insert");
    // "10" shares the leading character with "1"
    session.insert(&post("10"), &post_attr("Title"), &Value::text("ten")).expect("insert");
    session
        .insert(
            &EntityId::new("Comment", "1"),
            &AttributeName::new("Comment", "Text"),
            &Value::text("c"),
        )
        .expect("insert");

    let entity = session.get_entity(&post("1")).expect("get");
    println!("AFTER: {:?}", entity.attributes);
    assert_eq!(entity.len(), 3);
    assert_eq!(entity.text("Title"), Some("one"));
    assert_eq!(entity.integer("Score"), Some(4));
    assert_eq!(entity.get("Tags"), Some(&Value::Structured(json!(["rust"]))));

    let ten = session.get_entity(&post("10")).expect("get");
    assert_eq!(ten.len(), 1);
    assert_eq!(ten.text("Title"), Some("ten"));
}

#[test]
fn test_attribute_names_are_field_only() {
    let (_tmp, space) = create_temp_space();
    let session = space.session();
    session
        .insert(&post("1"), &post_attr("OwnerUserId"), &Value::text("3"))
        .expect("insert");

    let entity = session.get_entity(&post("1")).expect("get");
    let names: Vec<&String> = entity.attributes.keys().collect();
    assert_eq!(names, vec!["OwnerUserId"]);
}

#[test]
fn test_ids_with_separator_characters() {
    let (_tmp, space) = create_temp_space();
    let session = space.session();
    let odd = EntityId::new("TagLink/c++", "1:2");
    let attr = AttributeName::new("TagLink", "c++/x");
    session.insert(&odd, &attr, &Value::text("q")).expect("insert");
    session
        .insert(&EntityId::new("TagLink/c++", "1"), &attr, &Value::text("other"))
        .expect("insert");

    let entity = session.get_entity(&odd).expect("get");
    assert_eq!(entity.len(), 1);
    assert_eq!(entity.text("c++/x"), Some("q"));
}

#[test]
fn test_overwrite_append_only_keeps_stale_index_row() {
    println!("=== TEST: overwrite under append_only ===");
    let (_tmp, space) = create_temp_space();
    let session = space.session();
    let name = post_attr("ParentID");

    session.insert(&post("3"), &name, &Value::text("1")).expect("insert");
    session.insert(&post("3"), &name, &Value::text("2")).expect("overwrite");

    let entity = session.get_entity(&post("3")).expect("get");
    println!("AFTER: primary value = {:?}", entity.get("ParentID"));
    assert_eq!(entity.text("ParentID"), Some("2"), "last write wins");

    let stale = session
        .query_all(IndexPrefix::attribute_value(name.clone(), &Value::text("1")))
        .expect("query old value");
    let fresh = session
        .query_all(IndexPrefix::attribute_value(name, &Value::text("2")))
        .expect("query new value");
    println!("AFTER: stale rows = {}, fresh rows = {}", stale.len(), fresh.len());
    // known gap under append_only: the old value is still indexed
    assert_eq!(stale.len(), 1);
    assert_eq!(fresh.len(), 1);
}

#[test]
fn test_overwrite_replace_removes_stale_index_row() {
    println!("=== TEST: overwrite under replace ===");
    let config = StorageConfig {
        index_maintenance: IndexMaintenance::Replace,
        ..StorageConfig::default()
    };
    let (_tmp, space) = create_temp_space_with(config);
    let session = space.session();
    let name = post_attr("ParentID");

    session.insert(&post("3"), &name, &Value::text("1")).expect("insert");
    session.insert(&post("3"), &name, &Value::text("2")).expect("overwrite");
    // same value again must not drop the live row
    session.insert(&post("3"), &name, &Value::text("2")).expect("rewrite");

    let stale = session
        .query_all(IndexPrefix::attribute_value(name.clone(), &Value::text("1")))
        .expect("query old value");
    let fresh = session
        .query_all(IndexPrefix::attribute_value(name, &Value::text("2")))
        .expect("query new value");
    println!("AFTER: stale rows = {}, fresh rows = {}", stale.len(), fresh.len());
    assert!(stale.is_empty());
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].entity, post("3"));
}

#[test]
fn test_overwrite_replace_across_kinds() {
    let config = StorageConfig {
        index_maintenance: IndexMaintenance::Replace,
        ..StorageConfig::default()
    };
    let (_tmp, space) = create_temp_space_with(config);
    let session = space.session();
    let name = post_attr("Score");

    session.insert(&post("1"), &name, &Value::text("7")).expect("insert");
    session.insert(&post("1"), &name, &Value::Integer(7)).expect("overwrite");

    let all = session.query_all(IndexPrefix::attribute(name)).expect("query");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].value, Value::Integer(7));
}
