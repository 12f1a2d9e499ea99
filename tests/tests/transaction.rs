use batis::{args, Db, Value};
use batis_core::err;
use batis_driver_sqlite::Sqlite;
use pretty_assertions::assert_eq;
use std::time::Duration;
use tests::{DbTest, DriverOp, LoggingDriver, USERS_MAPPER};

async fn user_count(db: &Db) -> i64 {
    let rows: Vec<Value> = db
        .raw_query("SELECT count(*) AS n FROM users", vec![])
        .await
        .unwrap();
    rows[0].get("n").and_then(Value::as_i64).unwrap()
}

async fn add_user(db: &Db, name: &str) -> batis::Result<()> {
    db.mapper("addUser")?
        .bind(args! {
            "name" => name,
            "email" => Value::Null,
            "age" => 1,
            "created_at" => Value::Null,
        })
        .execute()
        .await?;
    Ok(())
}

#[tokio::test]
async fn commit_on_ok() {
    let test = DbTest::setup(USERS_MAPPER).await;

    let id = test
        .db
        .transaction(async |tx| -> batis::Result<i64> {
            assert!(tx.in_transaction());
            add_user(tx, "ferris").await?;
            add_user(tx, "corro").await?;
            Ok(user_count(tx).await)
        })
        .await
        .unwrap();

    assert_eq!(id, 2);
    assert!(!test.db.in_transaction());
    assert_eq!(user_count(&test.db).await, 2);

    let ops = test.take_ops();
    assert_eq!(ops.first(), Some(&DriverOp::Begin));
    assert_eq!(ops.get(4), Some(&DriverOp::Commit));
}

#[tokio::test]
async fn rollback_on_err() {
    let test = DbTest::setup(USERS_MAPPER).await;

    let err = test
        .db
        .transaction(async |tx| -> batis::Result<()> {
            add_user(tx, "ferris").await?;
            Err(err!("changed my mind"))
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "changed my mind");
    assert_eq!(user_count(&test.db).await, 0);
    assert!(test.take_ops().contains(&DriverOp::Rollback));
}

#[tokio::test]
async fn nested_transactions_share_the_outer_one() {
    let test = DbTest::setup(USERS_MAPPER).await;

    let res = test
        .db
        .transaction(async |tx| -> batis::Result<i64> {
            add_user(tx, "ferris").await?;

            // The inner failure rolls nothing back by itself...
            let inner = tx
                .transaction(async |tx| -> batis::Result<()> {
                    add_user(tx, "corro").await?;
                    Err(err!("inner"))
                })
                .await;
            assert!(inner.is_err());

            // ...but the outer transaction still sees both rows.
            Ok(user_count(tx).await)
        })
        .await
        .unwrap();

    assert_eq!(res, 2);

    let ops = test.take_ops();
    let lifecycle: Vec<_> = ops
        .into_iter()
        .filter(|op| matches!(op, DriverOp::Begin | DriverOp::Commit | DriverOp::Rollback))
        .collect();
    assert_eq!(lifecycle, [DriverOp::Begin, DriverOp::Commit]);
}

#[tokio::test]
async fn transaction_timeout_rolls_back() {
    let test = DbTest::setup(USERS_MAPPER).await;

    let err = test
        .db
        .transaction_with_timeout(Duration::from_millis(20), async |tx| -> batis::Result<()> {
            add_user(tx, "ferris").await?;
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await
        .unwrap_err();

    assert!(err.is_timed_out(), "{err}");
    assert!(err.to_string().starts_with("transaction: timed out"), "{err}");
    assert_eq!(user_count(&test.db).await, 0);
}

#[tokio::test]
async fn query_timeout_bounds_driver_calls() {
    let test = DbTest::try_setup(
        Db::builder()
            .mapper_str(USERS_MAPPER)
            .query_timeout(Duration::from_millis(20)),
        LoggingDriver::new(Sqlite::in_memory()).query_delay(Duration::from_secs(5)),
    )
    .await
    .unwrap();

    let err = test
        .db
        .mapper("countUsers")
        .unwrap()
        .bind(args! {})
        .fetch_one::<Value>()
        .await
        .unwrap_err();
    assert!(err.is_timed_out(), "{err}");

    // Writes are not delayed and still go through.
    add_user(&test.db, "ferris").await.unwrap();
}
