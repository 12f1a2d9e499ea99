use batis::{args, Record};
use pretty_assertions::assert_eq;
use tests::{DbTest, USERS_MAPPER};

#[derive(Debug, Default, PartialEq, Record)]
struct Address {
    street: String,
    city: String,
}

#[derive(Debug, Default, PartialEq, Record)]
struct User {
    id: i64,

    #[column("user_name")]
    name: String,

    #[db("email,omitempty")]
    contact: Option<String>,

    age: i64,

    #[embed]
    address: Address,

    #[sql("column:created_at")]
    created: Option<jiff::Timestamp>,

    deleted_at: Option<jiff::Timestamp>,
}

#[tokio::test]
async fn derive_maps_tags_and_embedded_fields() {
    let test = DbTest::setup(USERS_MAPPER).await;
    let id = test.insert_user("ferris", Some(7)).await;

    let user: User = test
        .db
        .mapper("findUser")
        .unwrap()
        .bind(args! { "id" => id })
        .fetch_one()
        .await
        .unwrap();

    assert_eq!(
        user,
        User {
            id,
            name: "ferris".to_string(),
            contact: Some("ferris@example.com".to_string()),
            age: 7,
            address: Address {
                street: "1 Main St".to_string(),
                city: "Springfield".to_string(),
            },
            created: Some("2024-05-01T10:00:00Z".parse().unwrap()),
            deleted_at: None,
        }
    );
}

#[tokio::test]
async fn null_columns_keep_defaults() {
    let test = DbTest::setup(USERS_MAPPER).await;
    let id = test.insert_user("ferris", None).await;

    let user: User = test
        .db
        .mapper("findUser")
        .unwrap()
        .bind(args! { "id" => id })
        .fetch_one()
        .await
        .unwrap();

    assert_eq!(user.age, 0);
    assert_eq!(user.deleted_at, None);
}

#[tokio::test]
async fn unmatched_columns_are_skipped() {
    #[derive(Debug, Default, Record)]
    struct Name {
        #[column("user_name")]
        name: String,
    }

    let test = DbTest::setup(USERS_MAPPER).await;
    test.insert_user("ferris", Some(7)).await;
    test.insert_user("corro", None).await;

    // `deleted_at` is a NULL DATETIME with no field to land in.
    let names: Vec<Name> = test
        .db
        .mapper("listUsers")
        .unwrap()
        .bind(args! {})
        .fetch_all()
        .await
        .unwrap();

    let names: Vec<_> = names.into_iter().map(|n| n.name).collect();
    assert_eq!(names, ["ferris", "corro"]);
}

#[tokio::test]
async fn null_into_plain_timestamp_fails() {
    #[derive(Debug, Default, Record)]
    struct Deleted {
        #[allow(dead_code)]
        deleted_at: jiff::Timestamp,
    }

    let test = DbTest::setup(USERS_MAPPER).await;
    let id = test.insert_user("ferris", None).await;

    let err = test
        .db
        .mapper("findUser")
        .unwrap()
        .bind(args! { "id" => id })
        .fetch_one::<Deleted>()
        .await
        .unwrap_err();

    assert!(err.is_type_conversion(), "{err}");
    assert!(err.to_string().starts_with("scanning `findUser`: "), "{err}");
}

#[tokio::test]
async fn fetch_one_without_rows() {
    let test = DbTest::setup(USERS_MAPPER).await;

    let err = test
        .db
        .mapper("findUser")
        .unwrap()
        .bind(args! { "id" => 404 })
        .fetch_one::<User>()
        .await
        .unwrap_err();

    assert!(err.is_record_not_found());
}

#[tokio::test]
async fn raw_query_into_records() {
    let test = DbTest::setup(USERS_MAPPER).await;
    test.insert_user("ferris", Some(7)).await;
    test.insert_user("corro", Some(3)).await;

    let users: Vec<Box<User>> = test
        .db
        .raw_query("SELECT u.id, u.user_name FROM users u WHERE age < ?", vec![5.into()])
        .await
        .unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "corro");
    assert_eq!(users[0].address, Address::default());
}
