//! Cursor pool and search-near tests.

use sotoki_core::{StorageConfig, Value};

use super::cursor::{search_near, NearMatch};
use super::tests_core::{create_temp_space, create_temp_space_with, post, post_attr};
use crate::codec::{IndexPrefix, PrimaryKey};

#[test]
fn test_search_near_outcomes() {
    println!("=== TEST: search_near reports exact, after, before ===");
    let (_tmp, space) = create_temp_space();
    let session = space.session();
    session.insert(&post("2"), &post_attr("Id"), &Value::text("2")).expect("insert");
    session.insert(&post("4"), &post_attr("Id"), &Value::text("4")).expect("insert");

    let mut cursor = session.tuples.checkout().expect("checkout");
    let exact = PrimaryKey::new(post("2"), post_attr("Id")).encode();
    let between = PrimaryKey::new(post("3"), post_attr("Id")).encode();
    let beyond = PrimaryKey::new(post("9"), post_attr("Id")).encode();

    let target = "test";
    assert_eq!(
        search_near(&mut cursor.iter, &exact, "tuples", &target).expect("exact"),
        NearMatch::Exact
    );
    assert_eq!(
        search_near(&mut cursor.iter, &between, "tuples", &target).expect("after"),
        NearMatch::After
    );
    assert_eq!(
        cursor.iter.key().map(|k| PrimaryKey::decode(k).expect("decode").entity),
        Some(post("4"))
    );
    assert_eq!(
        search_near(&mut cursor.iter, &beyond, "tuples", &target).expect("before"),
        NearMatch::Before
    );
    assert_eq!(
        cursor.iter.key().map(|k| PrimaryKey::decode(k).expect("decode").entity),
        Some(post("4")),
        "Before leaves the cursor on the last row"
    );
    session.tuples.checkin(cursor);
}

#[test]
fn test_search_near_empty_relation() {
    let (_tmp, space) = create_temp_space();
    let session = space.session();
    let mut cursor = session.index.checkout().expect("checkout");

    let err = search_near(&mut cursor.iter, b"anything", "tuples_index", &"anything")
        .expect_err("empty relation");
    assert!(err.is_not_found());
}

#[test]
fn test_cursor_reused_after_drained_scan() {
    println!("=== TEST: drained scans return their cursor ===");
    let (_tmp, space) = create_temp_space();
    let session = space.session();
    session.insert(&post("1"), &post_attr("Id"), &Value::text("1")).expect("insert");

    for _ in 0..5 {
        let n = session
            .query(IndexPrefix::attribute(post_attr("Id")))
            .expect("query")
            .count();
        assert_eq!(n, 1);
        session.get_entity(&post("1")).expect("get");
    }

    println!(
        "AFTER: index opened={} idle={}, tuples opened={} idle={}",
        session.index.opened_count(),
        session.index.idle_count(),
        session.tuples.opened_count(),
        session.tuples.idle_count()
    );
    assert_eq!(session.index.opened_count(), 1);
    assert_eq!(session.index.idle_count(), 1);
    assert_eq!(session.tuples.opened_count(), 1);
    assert_eq!(session.tuples.idle_count(), 1);
}

#[test]
fn test_concurrent_scans_use_distinct_cursors() {
    let (_tmp, space) = create_temp_space();
    let session = space.session();
    session.insert(&post("1"), &post_attr("Id"), &Value::text("1")).expect("insert");
    session.insert(&post("2"), &post_attr("Id"), &Value::text("2")).expect("insert");

    let mut outer = session
        .query(IndexPrefix::attribute(post_attr("Id")))
        .expect("outer");
    let first = outer.next().expect("row").expect("ok");
    // nested scan while the outer one is mid-iteration
    let inner: Vec<_> = session
        .query_all(IndexPrefix::attribute(post_attr("Id")))
        .expect("inner");
    let second = outer.next().expect("row").expect("ok");
    assert!(outer.next().is_none());
    drop(outer);

    assert_eq!(inner.len(), 2);
    assert_eq!(first.entity, post("1"));
    assert_eq!(second.entity, post("2"));
    assert_eq!(session.index.opened_count(), 2);
    assert_eq!(session.index.idle_count(), 2);
}

#[test]
fn test_early_drop_returns_cursor() {
    let (_tmp, space) = create_temp_space();
    let session = space.session();
    session.insert(&post("1"), &post_attr("Id"), &Value::text("1")).expect("insert");
    session.insert(&post("2"), &post_attr("Id"), &Value::text("2")).expect("insert");

    {
        let mut scan = session
            .query(IndexPrefix::attribute(post_attr("Id")))
            .expect("query");
        scan.next();
        assert_eq!(session.index.idle_count(), 0);
    }
    assert_eq!(session.index.idle_count(), 1);
}

#[test]
fn test_writes_invalidate_pooled_cursors() {
    println!("=== TEST: a write makes pooled cursors stale ===");
    let (_tmp, space) = create_temp_space();
    let session = space.session();
    session.insert(&post("1"), &post_attr("Id"), &Value::text("1")).expect("insert");

    let before = session
        .query_all(IndexPrefix::attribute(post_attr("Id")))
        .expect("query");
    assert_eq!(session.index.idle_count(), 1);

    session.insert(&post("2"), &post_attr("Id"), &Value::text("2")).expect("insert");
    let after = session
        .query_all(IndexPrefix::attribute(post_attr("Id")))
        .expect("query");

    println!("AFTER: before={} after={}", before.len(), after.len());
    assert_eq!(before.len(), 1);
    assert_eq!(after.len(), 2, "stale cursor must not be reused");
    assert_eq!(session.index.opened_count(), 2);
}

#[test]
fn test_pool_capacity_bounds_idle_cursors() {
    let config = StorageConfig {
        cursor_pool_size: 1,
        ..StorageConfig::default()
    };
    let (_tmp, space) = create_temp_space_with(config);
    let session = space.session();
    session.insert(&post("1"), &post_attr("Id"), &Value::text("1")).expect("insert");

    let a = session.query(IndexPrefix::attribute(post_attr("Id"))).expect("a");
    let b = session.query(IndexPrefix::attribute(post_attr("Id"))).expect("b");
    drop(a);
    drop(b);
    assert_eq!(session.index.idle_count(), 1);
}
