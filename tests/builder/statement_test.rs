use insta::assert_snapshot;
use tabula::builder::{Lowered, Statement, StatementKind};
use tabula::error::QueryError;
use tabula::sql::{col, param, sum, Dialect, ExprExt, Literal, OrderByExpr, SelectExpr, TableRef};

fn orders() -> TableRef {
    TableRef::parse("sales.orders")
}

fn closing_update() -> Statement {
    let mut stmt = Statement::update(orders());
    stmt.assignments = vec![
        ("status".into(), Literal::String("closed".into())),
        ("archived".into(), Literal::Bool(true)),
        ("closed_on".into(), Literal::Date("2024-03-01".into())),
    ];
    stmt.filter = Some(col("id").eq(param(42)));
    stmt
}

#[test]
fn test_lowering_picks_builder_by_kind() {
    assert!(matches!(
        Statement::select(orders()).lower(),
        Ok(Lowered::Select(_))
    ));
    assert!(matches!(closing_update().lower(), Ok(Lowered::Update(_))));
    assert!(matches!(
        Statement::delete(orders()).lower(),
        Ok(Lowered::Delete(_))
    ));
}

#[test]
fn test_schema_qualified_select() {
    let mut stmt = Statement::select(orders());
    stmt.projection = vec![
        SelectExpr::new(col("customer")),
        sum(col("total")).alias("total_sum"),
    ];
    stmt.group_by = vec![col("customer")];
    stmt.order_by = vec![OrderByExpr::desc(col("customer"))];
    stmt.limit = Some(3);

    let sql = stmt.to_sql(Dialect::Snowflake).unwrap();
    assert_snapshot!(sql, @r#"
SELECT
  "customer",
  SUM("total") AS "total_sum"
FROM "sales"."orders"
GROUP BY "customer"
ORDER BY "customer" DESC
LIMIT 3
"#);
}

#[test]
fn test_update_literals_per_dialect() {
    let stmt = closing_update();

    assert_snapshot!(
        stmt.to_sql(Dialect::Postgres).unwrap(),
        @r#"UPDATE "sales"."orders" SET "archived" = true, "closed_on" = DATE '2024-03-01', "status" = 'closed' WHERE "id" = 42"#
    );
    assert_snapshot!(
        stmt.to_sql(Dialect::TSql).unwrap(),
        @"UPDATE [sales].[orders] SET [archived] = 1, [closed_on] = '2024-03-01', [status] = 'closed' WHERE [id] = 42"
    );
}

#[test]
fn test_update_placeholders() {
    let stmt = closing_update();

    let (sql, params) = stmt.to_sql_with_params(Dialect::TSql).unwrap();
    assert_eq!(
        sql,
        "UPDATE [sales].[orders] SET [archived] = @P1, [closed_on] = @P2, [status] = @P3 WHERE [id] = @P4"
    );
    assert_eq!(
        params,
        vec![
            Literal::Bool(true),
            Literal::Date("2024-03-01".into()),
            Literal::String("closed".into()),
            Literal::Int(42),
        ]
    );

    let (sql, params) = stmt.to_sql_with_params(Dialect::DuckDb).unwrap();
    assert_eq!(
        sql,
        "UPDATE \"sales\".\"orders\" SET \"archived\" = ?, \"closed_on\" = ?, \"status\" = ? WHERE \"id\" = ?"
    );
    assert_eq!(params.len(), 4);
}

#[test]
fn test_delete_without_filter_clears_table() {
    let stmt = Statement::delete(orders());
    assert_eq!(stmt.kind, StatementKind::Delete);
    assert_eq!(
        stmt.to_sql(Dialect::Sqlite).unwrap(),
        "DELETE FROM \"sales\".\"orders\""
    );
}

#[test]
fn test_update_ignores_projection() {
    let mut stmt = closing_update();
    stmt.projection = vec![SelectExpr::new(col("id"))];
    assert_eq!(
        stmt.to_sql(Dialect::Postgres),
        closing_update().to_sql(Dialect::Postgres)
    );
}

#[test]
fn test_select_only_clauses_checked_in_order() {
    let mut stmt = Statement::delete(orders());
    stmt.offset = Some(5);
    stmt.limit = Some(1);
    assert_eq!(
        stmt.to_sql(Dialect::Postgres),
        Err(QueryError::ClauseNotSupported {
            statement: "DELETE",
            clause: "OFFSET"
        })
    );

    let mut stmt = closing_update();
    stmt.order_by = vec![OrderByExpr::asc(col("id"))];
    let err = stmt.to_sql_with_params(Dialect::MySql).unwrap_err();
    assert_eq!(
        err.to_string(),
        "ORDER BY is not supported on UPDATE statements"
    );
}
