use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tabula::builder::{QueryBuilder, QueryParams};
use tabula::error::{QueryError, SchemaError};
use tabula::schema::{
    ColumnRef, ColumnType, SchemaResolver, SchemaResult, SchemaSource, StaticSchemaSource,
};
use tokio::sync::RwLock;

/// A catalog that can change between calls and counts lookups.
#[derive(Default)]
struct LiveCatalog {
    tables: RwLock<StaticSchemaSource>,
    lookups: AtomicUsize,
}

impl LiveCatalog {
    async fn create(&self, name: &str, columns: Vec<ColumnRef>) {
        self.tables.write().await.insert(name, columns);
    }

    async fn drop_table(&self, name: &str) {
        self.tables.write().await.remove(name);
    }
}

#[async_trait]
impl SchemaSource for LiveCatalog {
    async fn get_columns(&self, table: &str) -> SchemaResult<Vec<ColumnRef>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.tables.read().await.get_columns(table).await
    }

    async fn list_tables(&self) -> SchemaResult<Vec<String>> {
        self.tables.read().await.list_tables().await
    }
}

struct Unreachable;

#[async_trait]
impl SchemaSource for Unreachable {
    async fn get_columns(&self, _table: &str) -> SchemaResult<Vec<ColumnRef>> {
        Err(SchemaError::Source("connection refused".into()))
    }

    async fn list_tables(&self) -> SchemaResult<Vec<String>> {
        Err(SchemaError::Source("connection refused".into()))
    }
}

fn users() -> Vec<ColumnRef> {
    vec![
        ColumnRef::new("id", ColumnType::parse("integer")).primary_key(),
        ColumnRef::new("email", ColumnType::parse("varchar(320)")).not_null(),
        ColumnRef::new("created_at", ColumnType::parse("timestamp with time zone")),
    ]
}

#[tokio::test]
async fn test_every_resolution_reads_the_catalog() {
    let catalog = Arc::new(LiveCatalog::default());
    catalog.create("users", users()).await;
    let resolver = SchemaResolver::new(catalog.clone());

    resolver.resolve("users").await.unwrap();
    resolver.resolve("users").await.unwrap();
    assert_eq!(catalog.lookups.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_schema_changes_are_seen_immediately() {
    let catalog = Arc::new(LiveCatalog::default());
    let builder = QueryBuilder::new(catalog.clone());

    let err = builder
        .build("users", &QueryParams::new())
        .await
        .unwrap_err();
    assert_eq!(err, QueryError::TableNotFound("users".into()));

    catalog.create("users", users()).await;
    let stmt = builder.build("users", &QueryParams::new()).await.unwrap();
    assert_eq!(stmt.projection.len(), 3);

    catalog
        .create(
            "users",
            vec![ColumnRef::new("id", ColumnType::Integer).primary_key()],
        )
        .await;
    let err = builder
        .build("users", &QueryParams::new().select("email"))
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::UnknownColumn { .. }));

    catalog.drop_table("users").await;
    assert!(!catalog.has_table("users").await.unwrap());
}

#[tokio::test]
async fn test_concurrent_builds_share_nothing() {
    let catalog = Arc::new(LiveCatalog::default());
    catalog.create("users", users()).await;
    let builder = Arc::new(QueryBuilder::new(catalog.clone()));

    let handles: Vec<_> = ["id", "email", "created_at", "id"]
        .into_iter()
        .map(|column| {
            let builder = builder.clone();
            tokio::spawn(async move {
                builder
                    .build("users", &QueryParams::new().select(column))
                    .await
            })
        })
        .collect();

    for (handle, column) in handles.into_iter().zip(["id", "email", "created_at", "id"]) {
        let stmt = handle.await.unwrap().unwrap();
        assert_eq!(stmt.output_names(), vec![Some(column)]);
    }
    assert_eq!(catalog.lookups.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_resolved_types_and_flags() {
    let catalog = LiveCatalog::default();
    catalog.create("users", users()).await;
    let schema = SchemaResolver::new(catalog).resolve("users").await.unwrap();

    let id = schema.column("id").unwrap();
    assert_eq!(id.data_type, ColumnType::Integer);
    assert!(id.primary_key && !id.nullable);

    let email = schema.require("email").unwrap();
    assert_eq!(email.data_type, ColumnType::Varchar(Some(320)));
    assert!(!email.nullable);

    assert!(schema.column("created_at").unwrap().data_type.is_temporal());
}

#[tokio::test]
async fn test_source_failure_is_not_a_missing_table() {
    let resolver = SchemaResolver::new(Unreachable);
    let err = resolver.resolve("users").await.unwrap_err();
    assert_eq!(err, SchemaError::Source("connection refused".into()));

    let err = QueryBuilder::new(Unreachable)
        .build("users", &QueryParams::new())
        .await
        .unwrap_err();
    assert_eq!(err, QueryError::Schema("connection refused".into()));

    assert!(Unreachable.has_table("users").await.is_err());
}
