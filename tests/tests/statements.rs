use batis::{args, Db, ExecResult, Scope, StatementKind, Value};
use batis_driver_sqlite::Sqlite;
use pretty_assertions::assert_eq;
use serde::Serialize;
use tests::{DbTest, DriverOp, LoggingDriver, USERS_MAPPER};

#[tokio::test]
async fn dispatch_by_id() {
    let test = DbTest::setup(USERS_MAPPER).await;

    let mapper = test.db.mapper("updateUser").unwrap();
    assert_eq!(mapper.id(), "updateUser");
    assert_eq!(mapper.kind(), StatementKind::Update);

    let err = test.db.mapper("missing").unwrap_err();
    assert!(err.is_statement_not_found());
    assert_eq!(err.to_string(), "statement `missing` not found");
}

#[tokio::test]
async fn bound_sql_uses_driver_placeholders() {
    let test = DbTest::setup(USERS_MAPPER).await;

    let query = test
        .db
        .mapper("listUsers")
        .unwrap()
        .bind(args! { "name" => "ferris", "min_age" => 3 });
    let bound = query.bound().unwrap();

    assert_eq!(
        bound.sql,
        "SELECT id, user_name, email, age, street, city, created_at, deleted_at FROM users \
         WHERE user_name = ? AND age >= ? ORDER BY id"
    );
    assert_eq!(bound.params, [Value::from("ferris"), Value::I64(3)]);
}

#[tokio::test]
async fn insert_update_delete() {
    let test = DbTest::setup(USERS_MAPPER).await;

    #[derive(Serialize)]
    struct NewUser<'a> {
        name: &'a str,
        email: Option<&'a str>,
        age: i64,
        created_at: &'a str,
    }

    let args = Scope::from_serialize(&NewUser {
        name: "ferris",
        email: None,
        age: 7,
        created_at: "2024-05-01T10:00:00Z",
    })
    .unwrap();

    let res = test
        .db
        .mapper("addUser")
        .unwrap()
        .bind(args)
        .execute()
        .await
        .unwrap();
    assert_eq!(
        res,
        ExecResult {
            rows_affected: 1,
            last_insert_id: Some(1)
        }
    );

    let res = test
        .db
        .mapper("updateUser")
        .unwrap()
        .bind(args! { "id" => 1, "age" => 8 })
        .execute()
        .await
        .unwrap();
    assert_eq!(res.rows_affected, 1);

    let ages: Vec<Value> = test
        .db
        .raw_query("SELECT age, email FROM users", vec![])
        .await
        .unwrap();
    assert_eq!(ages[0].get("age"), Some(&Value::I64(8)));
    assert_eq!(ages[0].get("email"), Some(&Value::Null));

    let res = test
        .db
        .mapper("deleteUser")
        .unwrap()
        .bind(args! { "id" => 1 })
        .execute()
        .await
        .unwrap();
    assert_eq!(res.rows_affected, 1);

    let ops = test.take_ops();
    assert_eq!(
        ops.last(),
        Some(&DriverOp::Exec("DELETE FROM users WHERE id = ?".to_string()))
    );
}

#[tokio::test]
async fn foreach_insert() {
    let test = DbTest::setup(USERS_MAPPER).await;

    let res = test
        .db
        .mapper("addTags")
        .unwrap()
        .bind(args! { "user_id" => 1, "tags" => vec!["a", "b", "c"] })
        .execute()
        .await
        .unwrap();
    assert_eq!(res.rows_affected, 3);

    assert_eq!(
        test.take_ops(),
        [DriverOp::Exec(
            "INSERT INTO tags (user_id, tag) VALUES (?, ?),(?, ?),(?, ?)".to_string()
        )]
    );

    let tags: Vec<Value> = test
        .db
        .raw_query("SELECT tag FROM tags WHERE user_id = ? ORDER BY tag", vec![1.into()])
        .await
        .unwrap();
    let tags: Vec<_> = tags.iter().filter_map(|row| row.get("tag")).collect();
    assert_eq!(tags, [&Value::from("a"), &Value::from("b"), &Value::from("c")]);
}

#[tokio::test]
async fn execute_refuses_selects() {
    let test = DbTest::setup(USERS_MAPPER).await;

    let err = test
        .db
        .mapper("findUser")
        .unwrap()
        .bind(args! { "id" => 1 })
        .execute()
        .await
        .unwrap_err();

    assert!(err.is_invalid_statement(), "{err}");
    assert!(test.take_ops().is_empty());
}

#[tokio::test]
async fn binding_errors_surface_when_run() {
    let test = DbTest::setup(USERS_MAPPER).await;

    let err = test
        .db
        .mapper("findUser")
        .unwrap()
        .bind(args! {})
        .fetch_all::<Value>()
        .await
        .unwrap_err();

    assert!(err.is_undefined_variable(), "{err}");
    assert!(test.take_ops().is_empty());
}

#[tokio::test]
async fn raw_exec_and_query() {
    let test = DbTest::setup(USERS_MAPPER).await;

    let res = test
        .db
        .raw_exec(
            "INSERT INTO users (user_name) VALUES (?), (?)",
            vec!["a".into(), "b".into()],
        )
        .await
        .unwrap();
    assert_eq!(res.rows_affected, 2);
    assert_eq!(res.last_insert_id, Some(2));

    let err = test
        .db
        .raw_query::<Value>("SELECT * FROM nowhere", vec![])
        .await
        .unwrap_err();
    assert!(err.is_driver_operation_failed(), "{err}");
}

#[tokio::test]
async fn duplicate_statements_fail_to_load() {
    let err = Db::builder()
        .mapper_str(USERS_MAPPER)
        .mapper_str(r#"<mapper><select id="findUser">SELECT 1</select></mapper>"#)
        .connect(Sqlite::in_memory())
        .await
        .unwrap_err();

    assert!(err.is_duplicate_statement(), "{err}");

    // Ids only have to be unique per statement kind.
    let db = Db::builder()
        .mapper_str(USERS_MAPPER)
        .mapper_str(r#"<mapper><delete id="findUser">DELETE FROM users</delete></mapper>"#)
        .connect(Sqlite::in_memory())
        .await
        .unwrap();
    assert_eq!(db.mapper("findUser").unwrap().kind(), StatementKind::Select);
}

#[tokio::test]
async fn malformed_mapper_fails_to_load() {
    let err = Db::builder()
        .mapper_str("<mapper><select id=\"a\">")
        .connect(Sqlite::in_memory())
        .await
        .unwrap_err();

    assert!(err.is_invalid_mapper(), "{err}");
}

#[tokio::test]
async fn mappers_from_directory() {
    let dir = std::env::temp_dir().join(format!("batis-mappers-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("users.xml"), USERS_MAPPER).unwrap();
    std::fs::write(
        dir.join("extra.XML"),
        r#"<mapper><select id="one">SELECT 1 AS one</select></mapper>"#,
    )
    .unwrap();
    std::fs::write(dir.join("notes.txt"), "not a mapper").unwrap();

    let test = DbTest::try_setup(
        Db::builder().mapper_dir(&dir),
        LoggingDriver::new(Sqlite::in_memory()),
    )
    .await;
    std::fs::remove_dir_all(&dir).unwrap();
    let test = test.unwrap();

    let one: Value = test
        .db
        .mapper("one")
        .unwrap()
        .bind(args! {})
        .fetch_one()
        .await
        .unwrap();
    assert_eq!(one.get("one"), Some(&Value::I64(1)));
    assert!(test.db.mapper("findUser").is_ok());

    let err = Db::builder()
        .mapper_dir(dir.join("missing"))
        .connect(Sqlite::in_memory())
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("reading "), "{err}");
}

#[tokio::test]
async fn configured_dialect_overrides_driver() {
    let test = DbTest::try_setup(
        Db::builder().mapper_str(USERS_MAPPER).dialect("postgres"),
        LoggingDriver::new(Sqlite::in_memory()),
    )
    .await
    .unwrap();

    let query = test
        .db
        .mapper("findUser")
        .unwrap()
        .bind(args! { "id" => 1 });
    assert!(query.bound().unwrap().sql.ends_with("WHERE id = $1"));
}
