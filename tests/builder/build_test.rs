use insta::assert_snapshot;
use sqlparser::dialect::{MsSqlDialect, MySqlDialect, PostgreSqlDialect};
use sqlparser::parser::Parser;
use tabula::builder::{QueryBuilder, QueryParams, StatementKind};
use tabula::error::QueryError;
use tabula::filter::FilterClause;
use tabula::schema::{ColumnRef, ColumnType, StaticSchemaSource};
use tabula::sql::{Dialect, Literal};

fn source() -> StaticSchemaSource {
    StaticSchemaSource::new()
        .with_table(
            "t",
            vec![
                ColumnRef::new("id", ColumnType::Integer),
                ColumnRef::new("name", ColumnType::Text),
                ColumnRef::new("n", ColumnType::Integer),
            ],
        )
        .with_table(
            "orders",
            vec![
                ColumnRef::new("id", ColumnType::BigInt).primary_key(),
                ColumnRef::new("customer", ColumnType::Varchar(Some(64))),
                ColumnRef::new("total", ColumnType::Decimal(Some((10, 2)))),
                ColumnRef::new("status", ColumnType::Text),
            ],
        )
}

fn builder() -> QueryBuilder<StaticSchemaSource> {
    QueryBuilder::new(source())
}

fn assert_parses(sql: &str, dialect: &dyn sqlparser::dialect::Dialect) {
    if let Err(e) = Parser::parse_sql(dialect, sql) {
        panic!("invalid SQL: {}\n{}", e, sql);
    }
}

#[tokio::test]
async fn test_no_parameters_selects_every_column() {
    let stmt = builder().build("t", &QueryParams::new()).await.unwrap();
    assert_eq!(stmt.kind, StatementKind::Select);
    assert_eq!(
        stmt.output_names(),
        vec![Some("id"), Some("name"), Some("n")]
    );
    let sql = stmt.to_sql(Dialect::Postgres).unwrap();
    assert_snapshot!(sql, @r#"
SELECT
  "id",
  "name",
  "n"
FROM "t"
"#);
    assert_parses(&sql, &PostgreSqlDialect {});
}

#[tokio::test]
async fn test_filtered_select() {
    let params = QueryParams::new()
        .filter(vec![
            FilterClause::new("n", ">", 2),
            FilterClause::new("name", "=", "b"),
        ])
        .where_boolean("AND");
    let stmt = builder().build("t", &params).await.unwrap();

    let (sql, bound) = stmt.to_sql_with_params(Dialect::Postgres).unwrap();
    assert_snapshot!(sql, @r#"
SELECT
  "id",
  "name",
  "n"
FROM "t"
WHERE "n" > $1 AND "name" = $2
"#);
    assert_eq!(bound, vec![Literal::Int(2), Literal::String("b".into())]);
    assert_parses(&sql, &PostgreSqlDialect {});
}

#[tokio::test]
async fn test_grouped_aggregate_truncates() {
    let params = QueryParams::new()
        .select("name")
        .group_by("name")
        .aggregate("n")
        .aggregate_func(vec!["count", "sum"]);
    let stmt = builder().build("t", &params).await.unwrap();
    assert_eq!(stmt.output_names(), vec![Some("name"), Some("n_count")]);

    let sql = stmt.to_sql(Dialect::MySql).unwrap();
    assert_snapshot!(sql, @r#"
SELECT
  `name`,
  COUNT(`n`) AS `n_count`
FROM `t`
GROUP BY `name`
"#);
    assert_parses(&sql, &MySqlDialect {});
}

#[tokio::test]
async fn test_shorter_function_list_drops_columns() {
    let params = QueryParams::new()
        .select("id")
        .aggregate(vec!["id", "n"])
        .aggregate_func(vec!["sum"]);
    let stmt = builder().build("t", &params).await.unwrap();
    assert_eq!(stmt.output_names(), vec![Some("id"), Some("id_sum")]);
}

#[tokio::test]
async fn test_sort_direction_broadcasts() {
    let params = QueryParams::new()
        .select("id")
        .order_by(vec!["name", "n"])
        .order_by_sort("desc");
    let sql = builder()
        .build("t", &params)
        .await
        .unwrap()
        .to_sql(Dialect::Postgres)
        .unwrap();
    assert_snapshot!(sql, @r#"
SELECT
  "id"
FROM "t"
ORDER BY "name" DESC, "n" DESC
"#);
}

#[tokio::test]
async fn test_paging_on_tsql() {
    let params = QueryParams::new()
        .select(vec!["id", "total"])
        .filter(FilterClause::new("status", "startswith", "open"))
        .limit(20)
        .offset(40);
    let stmt = builder().build("orders", &params).await.unwrap();
    let (sql, bound) = stmt.to_sql_with_params(Dialect::TSql).unwrap();
    assert_snapshot!(sql, @r#"
SELECT
  [id],
  [total]
FROM [orders]
WHERE [status] LIKE @P1
ORDER BY (SELECT NULL)
OFFSET 40 ROWS FETCH NEXT 20 ROWS ONLY
"#);
    assert_eq!(bound, vec![Literal::String("open%".into())]);
    assert_parses(&sql, &MsSqlDialect {});
}

#[tokio::test]
async fn test_update_statement() {
    let params = QueryParams::new()
        .update()
        .set("status", "closed")
        .set("total", 0)
        .filter(FilterClause::new("id", "=", 7));
    let stmt = builder().build("orders", &params).await.unwrap();
    assert_eq!(stmt.kind, StatementKind::Update);

    let (sql, bound) = stmt.to_sql_with_params(Dialect::Postgres).unwrap();
    assert_snapshot!(sql, @r#"UPDATE "orders" SET "status" = $1, "total" = $2 WHERE "id" = $3"#);
    assert_eq!(
        bound,
        vec![
            Literal::String("closed".into()),
            Literal::Int(0),
            Literal::Int(7)
        ]
    );
    assert_parses(&sql, &PostgreSqlDialect {});
}

#[tokio::test]
async fn test_delete_takes_priority() {
    let params = QueryParams::new()
        .update()
        .delete()
        .set("status", "closed")
        .filter(FilterClause::new("status", "=", "void"));
    let stmt = builder().build("orders", &params).await.unwrap();
    assert_eq!(stmt.kind, StatementKind::Delete);

    let sql = stmt.to_sql(Dialect::MySql).unwrap();
    assert_snapshot!(sql, @"DELETE FROM `orders` WHERE `status` = 'void'");
    assert_parses(&sql, &MySqlDialect {});
}

#[tokio::test]
async fn test_delete_with_limit_fails_at_lowering() {
    let params = QueryParams::new().delete().limit(1);
    let stmt = builder().build("orders", &params).await.unwrap();
    assert_eq!(
        stmt.to_sql(Dialect::Postgres),
        Err(QueryError::ClauseNotSupported {
            statement: "DELETE",
            clause: "LIMIT"
        })
    );
}

#[tokio::test]
async fn test_errors_surface_from_build() {
    let b = builder();

    let err = b.build("missing", &QueryParams::new()).await.unwrap_err();
    assert_eq!(err, QueryError::TableNotFound("missing".into()));

    let err = b
        .build("t", &QueryParams::new().select(["id", "ghost"]))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        QueryError::UnknownColumn {
            table: "t".into(),
            column: "ghost".into()
        }
    );

    let err = b
        .build(
            "t",
            &QueryParams::new().filter(FilterClause::new("n", "BETWEEN", 1)),
        )
        .await
        .unwrap_err();
    assert_eq!(err, QueryError::UnsupportedOperator("BETWEEN".into()));

    let err = b
        .build("t", &QueryParams::new().update())
        .await
        .unwrap_err();
    assert_eq!(err, QueryError::MissingValues);
}

#[tokio::test]
async fn test_params_from_json() {
    let params: QueryParams = serde_json::from_str(
        r#"{
            "select": ["name"],
            "where": [["n", ">=", 10], ["name", "contains", "x"]],
            "where_boolean": "or",
            "order_by": "n",
            "limit": 5
        }"#,
    )
    .unwrap();
    let stmt = builder().build("t", &params).await.unwrap();
    let (sql, bound) = stmt.to_sql_with_params(Dialect::Sqlite).unwrap();
    assert_snapshot!(sql, @r#"
SELECT
  "name"
FROM "t"
WHERE "n" >= ? OR "name" LIKE ?
ORDER BY "n" ASC
LIMIT 5
"#);
    assert_eq!(
        bound,
        vec![Literal::Int(10), Literal::String("%x%".into())]
    );
}
