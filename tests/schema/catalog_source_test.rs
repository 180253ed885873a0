use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use insta::assert_snapshot;
use tabula::builder::{QueryBuilder, QueryParams, Statement};
use tabula::error::{ExecutionError, QueryError, SchemaError};
use tabula::executor::{ExecutionResult, ResultSet, StatementExecutor};
use tabula::schema::{CatalogSchemaSource, ColumnRef, ColumnType, SchemaSource};
use tabula::sql::{Dialect, Literal};

/// Replays queued results in order and records every rendered statement.
struct Scripted {
    dialect: Dialect,
    results: Mutex<VecDeque<Result<ExecutionResult, ExecutionError>>>,
    log: Mutex<Vec<(String, Vec<Literal>)>>,
}

impl Scripted {
    fn new(dialect: Dialect) -> Arc<Self> {
        Arc::new(Self {
            dialect,
            results: Mutex::new(VecDeque::new()),
            log: Mutex::new(Vec::new()),
        })
    }

    fn push_rows(&self, columns: &[&str], rows: Vec<Vec<Literal>>) {
        let rs = ResultSet::new(columns.iter().map(|c| c.to_string()).collect(), rows);
        self.results
            .lock()
            .unwrap()
            .push_back(Ok(ExecutionResult::Rows(rs)));
    }

    fn push_error(&self, message: &str) {
        self.results
            .lock()
            .unwrap()
            .push_back(Err(ExecutionError::Backend(message.into())));
    }

    fn log(&self) -> Vec<(String, Vec<Literal>)> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatementExecutor for Scripted {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn execute(&self, statement: &Statement) -> Result<ExecutionResult, ExecutionError> {
        let rendered = statement
            .to_sql_with_params(self.dialect)
            .map_err(|e| ExecutionError::Backend(e.to_string()))?;
        self.log.lock().unwrap().push(rendered);
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ExecutionError::Backend("no scripted result".into())))
    }
}

fn s(v: &str) -> Literal {
    Literal::String(v.into())
}

#[tokio::test]
async fn test_builder_over_live_catalog() {
    let exec = Scripted::new(Dialect::Postgres);
    exec.push_rows(
        &["column_name", "data_type", "is_nullable", "is_identity"],
        vec![
            vec![s("id"), s("bigint"), s("NO"), s("YES")],
            vec![s("customer"), s("text"), s("YES"), s("NO")],
            vec![s("total"), s("numeric(12,2)"), s("YES"), s("NO")],
        ],
    );
    exec.push_rows(&["constraint_name"], vec![]);

    let builder = QueryBuilder::new(CatalogSchemaSource::new(exec.clone()));
    let stmt = builder
        .build(
            "orders",
            &QueryParams::new()
                .select("customer")
                .aggregate("total")
                .aggregate_func("sum")
                .group_by("customer"),
        )
        .await
        .unwrap();

    assert_snapshot!(stmt.to_sql(Dialect::Postgres).unwrap(), @r#"
SELECT
  "customer",
  SUM("total") AS "total_sum"
FROM "orders"
GROUP BY "customer"
"#);

    let log = exec.log();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].1, vec![s("orders")]);
}

#[tokio::test]
async fn test_unqualified_table_stays_in_current_schema() {
    let exec = Scripted::new(Dialect::Postgres);
    exec.push_rows(
        &["column_name", "data_type", "is_nullable", "is_identity"],
        vec![
            vec![s("id"), s("integer"), s("NO"), s("YES")],
            vec![s("name"), s("text"), s("YES"), s("NO")],
        ],
    );
    exec.push_rows(&["constraint_name"], vec![vec![s("users_pkey")]]);
    exec.push_rows(&["column_name"], vec![vec![s("id")]]);

    let source = CatalogSchemaSource::new(exec.clone());
    let stmt = QueryBuilder::new(source)
        .build("users", &QueryParams::new())
        .await
        .unwrap();
    assert_snapshot!(stmt.to_sql(Dialect::Postgres).unwrap(), @r#"
SELECT
  "id",
  "name"
FROM "users"
"#);

    let log = exec.log();
    assert_eq!(log.len(), 3);
    for (sql, _) in &log {
        assert!(
            sql.contains("\"table_schema\" = CURRENT_SCHEMA()"),
            "{}",
            sql
        );
    }
}

#[tokio::test]
async fn test_primary_key_from_constraints() {
    let exec = Scripted::new(Dialect::DuckDb);
    exec.push_rows(
        &["column_name", "data_type", "is_nullable"],
        vec![
            vec![s("tenant"), s("VARCHAR"), s("NO")],
            vec![s("id"), s("BIGINT"), s("NO")],
            vec![s("label"), s("VARCHAR"), s("YES")],
        ],
    );
    exec.push_rows(&["constraint_name"], vec![vec![s("accounts_tenant_id_pkey")]]);
    exec.push_rows(&["column_name"], vec![vec![s("tenant")], vec![s("id")]]);

    let columns = CatalogSchemaSource::new(exec.clone())
        .with_schema("main")
        .get_columns("accounts")
        .await
        .unwrap();
    assert_eq!(
        columns,
        vec![
            ColumnRef::new("tenant", ColumnType::Varchar(None)).primary_key(),
            ColumnRef::new("id", ColumnType::BigInt).primary_key(),
            ColumnRef::new("label", ColumnType::Varchar(None)),
        ]
    );

    let log = exec.log();
    assert!(log[1].0.contains("FROM \"information_schema\".\"table_constraints\""));
    assert_eq!(log[1].1, vec![s("accounts"), s("main")]);
    assert!(log[2].0.contains("FROM \"information_schema\".\"key_column_usage\""));
    assert_eq!(
        log[2].1,
        vec![s("accounts"), s("main"), s("accounts_tenant_id_pkey")]
    );
}

#[tokio::test]
async fn test_decoded_column_flags() {
    let exec = Scripted::new(Dialect::Postgres);
    exec.push_rows(
        &["column_name", "data_type", "is_nullable", "is_identity"],
        vec![
            vec![s("id"), s("integer"), s("NO"), s("YES")],
            vec![s("note"), s("character varying(80)"), Literal::Null, Literal::Null],
        ],
    );
    exec.push_rows(&["constraint_name"], vec![]);

    let columns = CatalogSchemaSource::new(exec)
        .get_columns("notes")
        .await
        .unwrap();
    assert_eq!(
        columns,
        vec![
            ColumnRef::new("id", ColumnType::Integer)
                .not_null()
                .autoincrement(),
            ColumnRef::new("note", ColumnType::Varchar(Some(80))),
        ]
    );
}

#[tokio::test]
async fn test_tsql_catalog_query() {
    let exec = Scripted::new(Dialect::TSql);
    exec.push_rows(
        &["column_name", "data_type", "is_nullable"],
        vec![vec![s("id"), s("int"), s("NO")]],
    );
    exec.push_rows(&["constraint_name"], vec![]);

    let source = CatalogSchemaSource::new(exec.clone()).with_schema("dbo");
    source.get_columns("orders").await.unwrap();

    let log = exec.log();
    let (sql, params) = &log[0];
    assert_snapshot!(sql.as_str(), @r#"
SELECT
  [column_name],
  [data_type],
  [is_nullable]
FROM [information_schema].[columns]
WHERE [table_name] = @P1 AND [table_schema] = @P2
ORDER BY [ordinal_position] ASC
"#);
    assert_eq!(params, &vec![s("orders"), s("dbo")]);
}

#[tokio::test]
async fn test_list_tables_in_one_schema() {
    let exec = Scripted::new(Dialect::DuckDb);
    exec.push_rows(&["table_name"], vec![vec![s("events")], vec![s("users")]]);

    let source = CatalogSchemaSource::new(exec.clone()).with_schema("main");
    assert_eq!(source.list_tables().await.unwrap(), vec!["events", "users"]);

    let log = exec.log();
    let (sql, params) = &log[0];
    assert!(sql.contains("FROM \"information_schema\".\"tables\""));
    assert!(sql.contains("WHERE \"table_schema\" = ?"));
    assert_eq!(params, &vec![s("main")]);
}

#[tokio::test]
async fn test_backend_failure() {
    let exec = Scripted::new(Dialect::MySql);
    exec.push_error("access denied");

    let source = CatalogSchemaSource::new(exec.clone());
    let err = source.get_columns("orders").await.unwrap_err();
    assert_eq!(
        err,
        SchemaError::Source("execution failed: access denied".into())
    );

    exec.push_error("access denied");
    let err = QueryBuilder::new(source)
        .build("orders", &QueryParams::new())
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::Schema(_)));
}

#[tokio::test]
async fn test_missing_table_then_created() {
    let exec = Scripted::new(Dialect::Postgres);
    let cols = ["column_name", "data_type", "is_nullable", "is_identity"];
    exec.push_rows(&cols, vec![]);
    exec.push_rows(&cols, vec![vec![s("id"), s("integer"), s("NO"), s("NO")]]);
    exec.push_rows(&["constraint_name"], vec![]);

    let source = CatalogSchemaSource::new(exec.clone());
    assert!(!source.has_table("t").await.unwrap());
    assert!(source.has_table("t").await.unwrap());
    assert_eq!(exec.log().len(), 3);
}
