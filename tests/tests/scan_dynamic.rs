use batis::{args, Value};
use pretty_assertions::assert_eq;
use std::collections::{BTreeMap, HashMap};
use tests::{DbTest, USERS_MAPPER};

async fn seeded() -> DbTest {
    let test = DbTest::setup(USERS_MAPPER).await;
    test.insert_user("ferris", Some(7)).await;
    test.insert_user("corro", None).await;
    test
}

#[tokio::test]
async fn rows_as_value_maps() {
    let test = seeded().await;

    let rows: Vec<Value> = test
        .db
        .mapper("listUsers")
        .unwrap()
        .bind(args! { "name" => "ferris" })
        .fetch_all()
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    let row = rows[0].as_map().unwrap();

    let keys: Vec<_> = row.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        [
            "id",
            "user_name",
            "email",
            "age",
            "street",
            "city",
            "created_at",
            "deleted_at"
        ]
    );
    assert_eq!(row["user_name"], Value::from("ferris"));
    assert_eq!(
        row["created_at"],
        Value::Timestamp("2024-05-01T10:00:00Z".parse().unwrap())
    );
    assert_eq!(row["deleted_at"], Value::Null);
}

#[tokio::test]
async fn typed_maps_drop_what_they_cannot_hold() {
    let test = seeded().await;

    let row: BTreeMap<String, i64> = test
        .db
        .mapper("findUser")
        .unwrap()
        .bind(args! { "id" => 1 })
        .fetch_one()
        .await
        .unwrap();

    assert_eq!(
        row,
        BTreeMap::from([("age".to_string(), 7), ("id".to_string(), 1)])
    );

    let rows: Vec<HashMap<String, String>> = test
        .db
        .mapper("usersByIds")
        .unwrap()
        .bind(args! { "ids" => vec![2] })
        .fetch_all()
        .await
        .unwrap();

    assert_eq!(rows[0]["user_name"], "corro");
    assert_eq!(rows[0]["id"], "2");
}

#[tokio::test]
async fn fetch_into_list_appends() {
    let test = seeded().await;

    let mut dst = Value::List(vec![]);
    test.db
        .mapper("usersOrdered")
        .unwrap()
        .bind(args! { "by" => "age" })
        .fetch_into(&mut dst)
        .await
        .unwrap();

    let names: Vec<_> = dst
        .as_list()
        .unwrap()
        .iter()
        .map(|row| row.get("user_name").cloned().unwrap())
        .collect();

    // NULL ages sort first in SQLite, so DESC puts them last.
    assert_eq!(names, [Value::from("ferris"), Value::from("corro")]);
}

#[tokio::test]
async fn fetch_into_map_takes_first_row() {
    let test = seeded().await;

    let mut dst = Value::Null;
    test.db
        .mapper("usersOrdered")
        .unwrap()
        .bind(args! { "by" => "id" })
        .fetch_into(&mut dst)
        .await
        .unwrap();

    assert_eq!(dst.get("id"), Some(&Value::I64(1)));
}

#[tokio::test]
async fn fetch_into_rejects_scalars() {
    let test = seeded().await;

    let mut dst = Value::I64(0);
    let err = test
        .db
        .mapper("countUsers")
        .unwrap()
        .bind(args! {})
        .fetch_into(&mut dst)
        .await
        .unwrap_err();
    assert!(err.is_unsupported_scan_type(), "{err}");

    let mut dst = Value::List(vec![Value::from("not a row")]);
    let err = test
        .db
        .mapper("countUsers")
        .unwrap()
        .bind(args! {})
        .fetch_into(&mut dst)
        .await
        .unwrap_err();
    assert!(err.is_invalid_destination(), "{err}");
}

#[tokio::test]
async fn expressions_without_declared_type() {
    let test = seeded().await;

    let total: BTreeMap<String, i64> = test
        .db
        .mapper("countUsers")
        .unwrap()
        .bind(args! {})
        .fetch_one()
        .await
        .unwrap();

    assert_eq!(total["total"], 2);
}
