use batis_core::{args, expr::Engine, pg::Array, Composite, Result, Scope, Value};
use batis_sql::{
    bind::normalize, stmt::Foreach, Binder, Bound, Fragments, Node, Statement,
};
use pretty_assertions::assert_eq;

fn bind(stmt: &Statement, scope: Scope) -> Result<Bound> {
    let engine = Engine::new();
    let fragments = Fragments::new();
    Binder::new(&engine, &fragments).bind(stmt, scope)
}

fn select(dialect: &str, children: Vec<Node>) -> Statement {
    Statement::select("find", children).with_dialect(dialect)
}

// ---------------------------------------------------------------------------
// Placeholders
// ---------------------------------------------------------------------------

#[test]
fn if_with_postgres_placeholder() {
    let stmt = select(
        "postgres",
        vec![
            Node::text("SELECT * FROM users WHERE"),
            Node::if_("id != nil", vec![Node::text("id = #{id}")]),
        ],
    );

    let bound = bind(&stmt, args! { "id" => 500 }).unwrap();
    assert_eq!(bound.sql, "SELECT * FROM users WHERE id = $1");
    assert_eq!(bound.params, [Value::I64(500)]);
}

#[test]
fn placeholders_follow_marker_order() {
    let stmt = select(
        "postgres",
        vec![Node::text("SELECT * FROM t WHERE b = #{b} AND a = #{a}")],
    );

    let bound = bind(&stmt, args! { "a" => 1, "b" => "two" }).unwrap();
    assert_eq!(bound.sql, "SELECT * FROM t WHERE b = $1 AND a = $2");
    assert_eq!(bound.params, [Value::from("two"), Value::I64(1)]);
}

#[test]
fn dialects() {
    let children = vec![Node::text("a = #{a} AND b = #{b}")];
    let scope = args! { "a" => 1, "b" => 2 };

    let cases = [
        ("postgres", "a = $1 AND b = $2"),
        ("PGX", "a = $1 AND b = $2"),
        ("pgx/v5", "a = $1 AND b = $2"),
        ("sqlserver", "a = @p1 AND b = @p2"),
        ("mssql", "a = @p1 AND b = @p2"),
        ("godror", "a = :1 AND b = :2"),
        ("goracle", "a = :1 AND b = :2"),
        ("mysql", "a = ? AND b = ?"),
        ("sqlite", "a = ? AND b = ?"),
    ];

    for (dialect, expected) in cases {
        let bound = bind(&select(dialect, children.clone()), scope.clone()).unwrap();
        assert_eq!(bound.sql, expected, "dialect {dialect}");
    }

    let bound = bind(&Statement::select("find", children), scope).unwrap();
    assert_eq!(bound.sql, "a = ? AND b = ?");
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

#[test]
fn list_marker_expands() {
    let stmt = select(
        "postgres",
        vec![Node::text("SELECT * FROM t WHERE id IN (#{ids}) AND kind = #{kind}")],
    );

    let bound = bind(&stmt, args! { "ids" => vec![1, 2, 3], "kind" => "x" }).unwrap();
    assert_eq!(
        bound.sql,
        "SELECT * FROM t WHERE id IN ($1, $2, $3) AND kind = $4"
    );
    assert_eq!(
        bound.params,
        [Value::I64(1), Value::I64(2), Value::I64(3), Value::from("x")]
    );
}

#[test]
fn composite_binds_as_one_parameter() {
    let stmt = select("postgres", vec![Node::text("tags = #{tags}")]);
    let tags = Array::new(vec![1i64, 2, 3]);

    let bound = bind(&stmt, args! { "tags" => tags }).unwrap();
    assert_eq!(bound.sql, "tags = $1");
    assert_eq!(
        bound.params,
        [Value::Composite(Composite::new("int8[]", "{1,2,3}"))]
    );
}

#[test]
fn foreach_binds_each_item() {
    let stmt = select(
        "postgres",
        vec![
            Node::text("SELECT * FROM t WHERE id IN ("),
            Foreach::new("ids", "v")
                .separator(",")
                .children(vec![Node::text("#{v}")])
                .into(),
            Node::text(")"),
        ],
    );

    let bound = bind(&stmt, args! { "ids" => vec![1, 2, 400] }).unwrap();
    assert_eq!(bound.sql, "SELECT * FROM t WHERE id IN ( $1,$2,$3 )");
    assert_eq!(
        bound.params,
        [Value::I64(1), Value::I64(2), Value::I64(400)]
    );
}

#[test]
fn nested_foreach_with_indexes() {
    let inner = Foreach::new("r.tags", "t")
        .index("i")
        .separator(",")
        .children(vec![Node::text("(#{o}, #{i}, #{t})")]);
    let outer = Foreach::new("rows", "r")
        .index("o")
        .separator(",")
        .children(vec![inner.into()]);

    let stmt = select("sqlite", vec![Node::text("VALUES"), outer.into()]);

    let rows = Value::from(serde_json::json!([
        { "tags": ["a", "b"] },
        { "tags": ["c"] },
    ]));

    let mut scope = args! { "rows" => rows, "o" => "outer" };
    scope.insert("i", 99);

    let bound = bind(&stmt, scope).unwrap();
    assert_eq!(bound.sql, "VALUES (?, ?, ?),(?, ?, ?) , (?, ?, ?)");
    assert_eq!(
        bound.params,
        [
            Value::I64(0),
            Value::I64(0),
            Value::from("a"),
            Value::I64(0),
            Value::I64(1),
            Value::from("b"),
            Value::I64(1),
            Value::I64(0),
            Value::from("c"),
        ]
    );
}

#[test]
fn foreach_over_map_entries() {
    let stmt = select(
        "postgres",
        vec![
            Node::text("UPDATE t SET"),
            Foreach::new("fields", "v")
                .index("k")
                .separator(", ")
                .children(vec![Node::text("${k} = #{v}")])
                .into(),
        ],
    );

    let fields = Value::from(serde_json::json!({ "age": 30, "name": "ferris" }));
    let bound = bind(&stmt, args! { "fields" => fields }).unwrap();

    assert_eq!(bound.sql, "UPDATE t SET age = $1, name = $2");
    assert_eq!(bound.params, [Value::I64(30), Value::from("ferris")]);
}

#[test]
fn foreach_over_struct_fields_keeps_declaration_order() {
    #[derive(serde::Serialize)]
    struct Fields {
        name: &'static str,
        age: i64,
    }

    #[derive(serde::Serialize)]
    struct Args {
        fields: Fields,
    }

    let stmt = select(
        "postgres",
        vec![
            Node::text("UPDATE t SET"),
            Foreach::new("fields", "v")
                .index("k")
                .separator(", ")
                .children(vec![Node::text("${k} = #{v}")])
                .into(),
        ],
    );

    let scope = Scope::from_serialize(&Args {
        fields: Fields {
            name: "ferris",
            age: 30,
        },
    })
    .unwrap();
    let bound = bind(&stmt, scope).unwrap();

    assert_eq!(bound.sql, "UPDATE t SET name = $1, age = $2");
    assert_eq!(bound.params, [Value::from("ferris"), Value::I64(30)]);

    let fields = Value::from(serde_json::json!({ "zone": "eu", "id": 7 }));
    let bound = bind(&stmt, args! { "fields" => fields }).unwrap();
    assert_eq!(bound.sql, "UPDATE t SET zone = $1, id = $2");
}

#[test]
fn nested_foreach_shares_the_index_name() {
    let inner = Foreach::new("r.vals", "v")
        .index("i")
        .separator(",")
        .children(vec![Node::text("(#{i},#{v})")]);
    let outer = Foreach::new("rows", "r")
        .index("i")
        .separator("; ")
        .children(vec![
            inner.into(),
            Node::if_("i == 1", vec![Node::text("ONE")]),
            Node::text("[#{i}]"),
        ]);

    let stmt = select("postgres", vec![outer.into(), Node::text("LIMIT #{i}")]);

    let rows = Value::from(serde_json::json!([
        { "vals": [10, 11] },
        { "vals": [20] },
    ]));

    let bound = bind(&stmt, args! { "rows" => rows, "i" => "outside" }).unwrap();
    assert_eq!(
        bound.sql,
        "($1,$2),($3,$4) [$5]; ($6,$7) ONE [$8] LIMIT $9"
    );
    assert_eq!(
        bound.params,
        [
            Value::I64(0),
            Value::I64(10),
            Value::I64(1),
            Value::I64(11),
            Value::I64(0),
            Value::I64(0),
            Value::I64(20),
            Value::I64(1),
            Value::from("outside"),
        ]
    );
}

// ---------------------------------------------------------------------------
// Literals
// ---------------------------------------------------------------------------

#[test]
fn literal_markers_are_spliced() {
    let stmt = select(
        "postgres",
        vec![Node::text("SELECT * FROM ${table} ORDER BY ${col} LIMIT #{limit}")],
    );

    let bound = bind(
        &stmt,
        args! { "table" => "users", "col" => "name", "limit" => 10 },
    )
    .unwrap();
    assert_eq!(bound.sql, "SELECT * FROM users ORDER BY name LIMIT $1");
    assert_eq!(bound.params, [Value::I64(10)]);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn undefined_variable() {
    let stmt = select("postgres", vec![Node::text("id = #{missing}")]);

    let err = bind(&stmt, Scope::new()).unwrap_err();
    assert!(err.is_undefined_variable());
    assert_eq!(
        err.to_string(),
        "binding `find`: undefined variable: missing"
    );
}

#[test]
fn null_is_not_undefined() {
    let stmt = select("postgres", vec![Node::text("id = #{id}")]);

    let bound = bind(&stmt, args! { "id" => Value::Null }).unwrap();
    assert_eq!(bound.params, [Value::Null]);
}

#[test]
fn undefined_loop_field_names_the_item() {
    let stmt = select(
        "postgres",
        vec![Foreach::new("users", "u")
            .children(vec![Node::text("#{u.nick}")])
            .into()],
    );

    let users = Value::from(serde_json::json!([{ "name": "a" }]));
    let err = bind(&stmt, args! { "users" => users }).unwrap_err();

    assert!(err.is_undefined_variable());
    assert!(err.to_string().ends_with("undefined variable: u.nick"), "{err}");
}

#[test]
fn undefined_names_outside_the_loop_are_reported_as_written() {
    let stmt = select(
        "postgres",
        vec![
            Foreach::new("ids", "v")
                .separator(",")
                .children(vec![Node::text("#{v}")])
                .into(),
            Node::text("AND #{xids[0]}"),
        ],
    );

    let err = bind(&stmt, args! { "ids" => vec![1, 2] }).unwrap_err();
    assert!(err.is_undefined_variable());
    assert!(err.to_string().ends_with("undefined variable: xids[0]"), "{err}");

    // The loop body never names the item, so nothing is mapped back.
    let stmt = select(
        "postgres",
        vec![
            Foreach::new("ids", "v")
                .separator(",")
                .children(vec![Node::text("1")])
                .into(),
            Node::text("AND #{ids[0].missing}"),
        ],
    );

    let ids = Value::from(serde_json::json!([{ "id": 1 }, { "id": 2 }]));
    let err = bind(&stmt, args! { "ids" => ids }).unwrap_err();
    assert!(err.is_undefined_variable());
    assert!(
        err.to_string().ends_with("undefined variable: ids[0].missing"),
        "{err}"
    );
}

#[test]
fn evaluation_errors_carry_the_statement() {
    let stmt = select(
        "postgres",
        vec![Node::if_("id ==", vec![Node::text("id = #{id}")])],
    );

    let err = bind(&stmt, args! { "id" => 1 }).unwrap_err();
    assert!(err.is_expression_evaluation_failed());
    assert!(err.to_string().starts_with("evaluating `find`: "), "{err}");
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

#[test]
fn normalize_collapses_whitespace() {
    assert_eq!(
        normalize("\n  SELECT *\n\t FROM t\r\n  WHERE  a = 1  \n"),
        "SELECT * FROM t WHERE a = 1"
    );
    assert_eq!(normalize("   "), "");
}
