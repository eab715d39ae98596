#![forbid(unsafe_code)]

use ol_core::ids::{ItemId, OwnerId};
use ol_storage::{CreateItemRequest, CreateOwnerRequest, SqliteStore, StoreError};
use rusqlite::{Connection, params};
use std::path::PathBuf;

fn temp_db(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    base.join(format!("ol_storage_{test_name}_{pid}_{nonce}"))
        .join("orderly.db")
}

fn register_owner(store: &mut SqliteStore, username: &str) -> OwnerId {
    let row = store
        .create_owner(CreateOwnerRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
        })
        .expect("create owner");
    OwnerId::try_new(row.id).expect("owner id")
}

fn append_item(store: &mut SqliteStore, owner: OwnerId, title: &str) -> ItemId {
    let row = store
        .create_item(
            owner,
            CreateItemRequest {
                title: title.to_string(),
                description: None,
                completed: false,
            },
        )
        .expect("create item");
    ItemId::try_new(row.id).expect("item id")
}

#[test]
fn uncommitted_transaction_is_not_persisted_after_reopen() {
    let db_path = temp_db("uncommitted_transaction_is_not_persisted_after_reopen");

    {
        let _store = SqliteStore::open(&db_path).expect("open store");
    }

    {
        let mut conn = Connection::open(&db_path).expect("open db");
        let tx = conn.transaction().expect("begin tx");
        tx.execute(
            "INSERT INTO owners (username, email, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, 0, 0)",
            params!["ghost", "ghost@example.com"],
        )
        .expect("insert owner");
        // Drop without commit -> rollback (simulated crash before commit).
    }

    let store = SqliteStore::open(&db_path).expect("open store again");
    let found = store.find_owner_by_username("ghost").expect("find owner");
    assert!(found.is_none(), "uncommitted transaction should not persist");
}

#[test]
fn failed_move_leaves_rows_untouched() {
    let db_path = temp_db("failed_move_leaves_rows_untouched");
    let mut store = SqliteStore::open(&db_path).expect("open store");
    let owner = register_owner(&mut store, "alice");

    for title in ["a", "b", "c"] {
        append_item(&mut store, owner, title);
    }
    let before = store.list_items(owner).expect("list items");
    let b = ItemId::try_new(before[1].id).expect("item id");

    let err = store.move_item(owner, b, 9).expect_err("target past end");
    assert!(matches!(err, StoreError::InvalidPosition { .. }), "got {err:?}");

    let after = store.list_items(owner).expect("list items");
    assert_eq!(before, after, "failed move must leave the table unchanged");

    // Reopen to confirm nothing half-applied reached disk.
    drop(store);
    let store = SqliteStore::open(&db_path).expect("reopen store");
    assert_eq!(store.list_items(owner).expect("list items"), after);
}

#[test]
fn owners_never_disturb_each_other() {
    let mut store = SqliteStore::open(temp_db("owners_never_disturb_each_other")).expect("open store");
    let alice = register_owner(&mut store, "alice");
    let bob = register_owner(&mut store, "bob");

    let a1 = append_item(&mut store, alice, "a1");
    let b1 = append_item(&mut store, bob, "b1");
    append_item(&mut store, alice, "a2");
    let b2 = append_item(&mut store, bob, "b2");
    append_item(&mut store, bob, "b3");
    let a3 = append_item(&mut store, alice, "a3");

    store.move_item(bob, b2, 1).expect("move bob item");
    store.delete_item(alice, a1).expect("delete alice item");
    store.move_item(alice, a3, 1).expect("move alice item");
    store.delete_item(bob, b1).expect("delete bob item");

    let alice_view: Vec<(String, i64)> = store
        .list_items(alice)
        .expect("list alice")
        .into_iter()
        .map(|row| (row.title, row.order_no))
        .collect();
    assert_eq!(
        alice_view,
        vec![("a3".to_string(), 1), ("a2".to_string(), 2)]
    );

    let bob_view: Vec<(String, i64)> = store
        .list_items(bob)
        .expect("list bob")
        .into_iter()
        .map(|row| (row.title, row.order_no))
        .collect();
    assert_eq!(bob_view, vec![("b2".to_string(), 1), ("b3".to_string(), 2)]);

    // Cross-owner reads never leak rows.
    let err = store.get_item(alice, b2).expect_err("bob's item via alice");
    assert!(matches!(err, StoreError::NotFound), "got {err:?}");
}

#[test]
fn preflight_gate_rejects_foreign_layout() {
    let db_path = temp_db("preflight_gate_rejects_foreign_layout");

    {
        let _store = SqliteStore::open(&db_path).expect("open store");
    }

    {
        let conn = Connection::open(&db_path).expect("open db");
        conn.execute_batch("CREATE TABLE stray (id INTEGER PRIMARY KEY);")
            .expect("create stray table");
    }

    let err = SqliteStore::open(&db_path).expect_err("foreign table must be rejected");
    match err {
        StoreError::Validation(message) => {
            assert_eq!(message, "RESET_REQUIRED: unsupported tables detected");
        }
        other => panic!("expected Validation error, got {other:?}"),
    }
}
