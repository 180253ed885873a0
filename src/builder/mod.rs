//! Query Builder.
//!
//! Normalizes single-or-list parameters, validates every column reference
//! against the resolved schema, and assembles a [`Statement`]:
//!
//! ```ignore
//! let builder = QueryBuilder::new(source);
//! let stmt = builder
//!     .build("t", &QueryParams::new().select("name").order_by("n"))
//!     .await?;
//! let (sql, params) = stmt.to_sql_with_params(Dialect::Postgres)?;
//! ```

pub mod aggregate;
pub mod params;
pub mod query_builder;
pub mod statement;

pub use aggregate::{pair, parse_sort_dir, AggregateFunc};
pub use params::{OneOrMany, QueryParams};
pub use query_builder::{assemble, QueryBuilder};
pub use statement::{Lowered, Statement, StatementKind};
