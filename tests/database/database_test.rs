use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tabula::builder::{QueryParams, Statement, StatementKind};
use tabula::error::{DatabaseError, ExecutionError, QueryError};
use tabula::executor::{ExecutionResult, ResultSet, StatementExecutor};
use tabula::filter::{FilterClause, FilterSpec};
use tabula::schema::{ColumnRef, ColumnType, StaticSchemaSource};
use tabula::sql::{Dialect, Literal};
use tabula::Database;

/// Answers SELECTs with fixed rows and DML with a fixed count.
struct Recording {
    dialect: Dialect,
    rows: ResultSet,
    affected: u64,
    /// Answer every statement with rows, whatever its kind.
    always_rows: bool,
    log: Mutex<Vec<(StatementKind, String, Vec<Literal>)>>,
}

impl Recording {
    fn new(dialect: Dialect) -> Arc<Self> {
        Arc::new(Self::plain(dialect))
    }

    fn plain(dialect: Dialect) -> Self {
        Self {
            dialect,
            rows: ResultSet::new(
                vec!["id".into(), "name".into()],
                vec![
                    vec![Literal::Int(1), Literal::String("ann".into())],
                    vec![Literal::Int(2), Literal::String("bob".into())],
                ],
            ),
            affected: 3,
            always_rows: false,
            log: Mutex::new(Vec::new()),
        }
    }

    fn log(&self) -> Vec<(StatementKind, String, Vec<Literal>)> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatementExecutor for Recording {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn execute(&self, statement: &Statement) -> Result<ExecutionResult, ExecutionError> {
        let (sql, params) = statement
            .to_sql_with_params(self.dialect)
            .map_err(|e| ExecutionError::Backend(e.to_string()))?;
        self.log.lock().unwrap().push((statement.kind, sql, params));
        Ok(match statement.kind {
            StatementKind::Select => ExecutionResult::Rows(self.rows.clone()),
            _ if self.always_rows => ExecutionResult::Rows(ResultSet::default()),
            _ => ExecutionResult::Affected(self.affected),
        })
    }
}

fn people() -> StaticSchemaSource {
    StaticSchemaSource::new().with_table(
        "people",
        vec![
            ColumnRef::new("id", ColumnType::Integer).primary_key(),
            ColumnRef::new("name", ColumnType::Text),
            ColumnRef::new("age", ColumnType::Integer),
        ],
    )
}

fn database(exec: Arc<Recording>) -> Database<StaticSchemaSource, Arc<Recording>> {
    Database::new(people(), exec)
}

#[tokio::test]
async fn test_select_returns_rows() {
    let exec = Recording::new(Dialect::Postgres);
    let db = database(exec.clone());

    let rows = db
        .select(
            "people",
            &QueryParams::new()
                .select(vec!["id", "name"])
                .filter(FilterClause::new("age", ">", 30)),
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.get(1, "NAME"), Some(&Literal::String("bob".into())));

    let log = exec.log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].0, StatementKind::Select);
    assert_eq!(
        log[0].1,
        "SELECT\n  \"id\",\n  \"name\"\nFROM \"people\"\nWHERE \"age\" > $1"
    );
    assert_eq!(log[0].2, vec![Literal::Int(30)]);
}

#[tokio::test]
async fn test_select_ignores_dml_flags() {
    let exec = Recording::new(Dialect::Postgres);
    let db = database(exec.clone());

    db.select("people", &QueryParams::new().update().delete().set("age", 1))
        .await
        .unwrap();
    assert_eq!(exec.log()[0].0, StatementKind::Select);
}

#[tokio::test]
async fn test_update_returns_affected_rows() {
    let exec = Recording::new(Dialect::MySql);
    let db = database(exec.clone());

    let mut values = BTreeMap::new();
    values.insert("name".to_string(), Literal::String("zed".into()));
    values.insert("age".to_string(), Literal::Int(40));

    let affected = db
        .update(
            "people",
            Some(FilterSpec::Many(vec![
                FilterClause::new("id", "=", 1),
                FilterClause::new("id", "=", 2),
            ])),
            Some("or"),
            values,
        )
        .await
        .unwrap();
    assert_eq!(affected, 3);

    let log = exec.log();
    assert_eq!(
        log[0].1,
        "UPDATE `people` SET `age` = ?, `name` = ? WHERE `id` = ? OR `id` = ?"
    );
    assert_eq!(
        log[0].2,
        vec![
            Literal::Int(40),
            Literal::String("zed".into()),
            Literal::Int(1),
            Literal::Int(2)
        ]
    );
}

#[tokio::test]
async fn test_update_without_values_never_executes() {
    let exec = Recording::new(Dialect::Postgres);
    let db = database(exec.clone());

    let err = db
        .update("people", None, None, BTreeMap::new())
        .await
        .unwrap_err();
    assert_eq!(err, DatabaseError::Query(QueryError::MissingValues));
    assert!(exec.log().is_empty());
}

#[tokio::test]
async fn test_delete() {
    let exec = Recording::new(Dialect::TSql);
    let db = database(exec.clone());

    let affected = db
        .delete(
            "people",
            Some(FilterClause::new("name", "startswith", "b").into()),
            None,
        )
        .await
        .unwrap();
    assert_eq!(affected, 3);

    let log = exec.log();
    assert_eq!(log[0].0, StatementKind::Delete);
    assert_eq!(log[0].1, "DELETE FROM [people] WHERE [name] LIKE @P1");
    assert_eq!(log[0].2, vec![Literal::String("b%".into())]);
}

#[tokio::test]
async fn test_result_shape_mismatch() {
    let exec = Arc::new(Recording {
        always_rows: true,
        ..Recording::plain(Dialect::Postgres)
    });
    let db = database(exec);

    let err = db.delete("people", None, None).await.unwrap_err();
    assert_eq!(
        err,
        DatabaseError::Execution(ExecutionError::UnexpectedResult {
            expected: "affected row count",
            actual: "rows"
        })
    );
}

#[tokio::test]
async fn test_unsupported_clause_rejected_before_executor() {
    let exec = Recording::new(Dialect::Postgres);
    let db = database(exec.clone());

    let stmt = db
        .build("people", &QueryParams::new().delete().limit(10))
        .await
        .unwrap();
    let err = db.execute(&stmt).await.unwrap_err();
    assert_eq!(
        err,
        DatabaseError::Query(QueryError::ClauseNotSupported {
            statement: "DELETE",
            clause: "LIMIT"
        })
    );
    assert!(exec.log().is_empty());
}

#[tokio::test]
async fn test_metadata_queries() {
    let db = database(Recording::new(Dialect::Postgres));

    assert!(db.has_table("people").await.unwrap());
    assert!(!db.has_table("pets").await.unwrap());
    assert_eq!(db.tables().await.unwrap(), vec!["people"]);

    let columns = db.columns("people").await.unwrap();
    assert_eq!(
        columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        vec!["id", "name", "age"]
    );

    let err = db.columns("pets").await.unwrap_err();
    assert_eq!(
        err,
        DatabaseError::Query(QueryError::TableNotFound("pets".into()))
    );
}

/// Serves the catalog query for `people`, then a fixed affected count.
struct CatalogThenDml {
    log: Mutex<Vec<String>>,
}

#[async_trait]
impl StatementExecutor for CatalogThenDml {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn execute(&self, statement: &Statement) -> Result<ExecutionResult, ExecutionError> {
        let (sql, _) = statement
            .to_sql_with_params(Dialect::Sqlite)
            .map_err(|e| ExecutionError::Backend(e.to_string()))?;
        self.log.lock().unwrap().push(sql);
        Ok(match statement.kind {
            StatementKind::Select => ExecutionResult::Rows(ResultSet::new(
                vec![
                    "column_name".into(),
                    "data_type".into(),
                    "notnull".into(),
                    "pk".into(),
                ],
                vec![
                    vec![
                        Literal::String("id".into()),
                        Literal::String("INTEGER".into()),
                        Literal::Int(1),
                        Literal::Int(1),
                    ],
                    vec![
                        Literal::String("name".into()),
                        Literal::String("TEXT".into()),
                        Literal::Int(0),
                        Literal::Int(0),
                    ],
                ],
            )),
            _ => ExecutionResult::Affected(1),
        })
    }
}

#[tokio::test]
async fn test_with_catalog_reflects_through_executor() {
    let exec = Arc::new(CatalogThenDml {
        log: Mutex::new(Vec::new()),
    });
    let db = Database::with_catalog(exec.clone());
    assert_eq!(db.dialect(), Dialect::Sqlite);

    let affected = db
        .delete("people", Some(FilterClause::new("id", "=", 9).into()), None)
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let log = exec.log.lock().unwrap();
    assert_eq!(log.len(), 2);
    assert!(log[0].contains("PRAGMA_TABLE_INFO(?)"));
    assert_eq!(log[1], "DELETE FROM \"people\" WHERE \"id\" = ?");
}
