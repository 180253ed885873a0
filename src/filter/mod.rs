//! Predicate Compiler.
//!
//! Turns the caller's `(column, operator, value)` triples into one boolean
//! [`Expr`](crate::sql::Expr) over a resolved [`TableSchema`](crate::schema::TableSchema).

pub mod clause;
pub mod compiler;
pub mod operator;

pub use clause::{FilterClause, FilterSpec};
pub use compiler::{compile, compile_clause, escape_like, LIKE_ESCAPE};
pub use operator::{BooleanMode, OperatorKind};
