//! Filter operator vocabulary.

use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// The closed set of filter operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
    NotLike,
    ILike,
    NotILike,
    Contains,
    StartsWith,
    EndsWith,
}

impl OperatorKind {
    pub const ALL: [OperatorKind; 13] = [
        OperatorKind::Eq,
        OperatorKind::Ne,
        OperatorKind::Gt,
        OperatorKind::Ge,
        OperatorKind::Lt,
        OperatorKind::Le,
        OperatorKind::Like,
        OperatorKind::NotLike,
        OperatorKind::ILike,
        OperatorKind::NotILike,
        OperatorKind::Contains,
        OperatorKind::StartsWith,
        OperatorKind::EndsWith,
    ];

    /// Parse an operator token.
    ///
    /// Comparison tokens are exact; word tokens ignore case.
    pub fn parse(token: &str) -> Result<Self, QueryError> {
        let op = match token {
            "=" | "==" => OperatorKind::Eq,
            "!=" | "!==" => OperatorKind::Ne,
            ">" => OperatorKind::Gt,
            ">=" => OperatorKind::Ge,
            "<" => OperatorKind::Lt,
            "<=" => OperatorKind::Le,
            _ => match token.to_ascii_uppercase().as_str() {
                "LIKE" => OperatorKind::Like,
                "NOTLIKE" => OperatorKind::NotLike,
                "ILIKE" => OperatorKind::ILike,
                "NOTILIKE" => OperatorKind::NotILike,
                "CONTAINS" => OperatorKind::Contains,
                "STARTSWITH" => OperatorKind::StartsWith,
                "ENDSWITH" => OperatorKind::EndsWith,
                _ => return Err(QueryError::UnsupportedOperator(token.to_string())),
            },
        };
        Ok(op)
    }

    /// Canonical token.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorKind::Eq => "=",
            OperatorKind::Ne => "!=",
            OperatorKind::Gt => ">",
            OperatorKind::Ge => ">=",
            OperatorKind::Lt => "<",
            OperatorKind::Le => "<=",
            OperatorKind::Like => "LIKE",
            OperatorKind::NotLike => "NOTLIKE",
            OperatorKind::ILike => "ILIKE",
            OperatorKind::NotILike => "NOTILIKE",
            OperatorKind::Contains => "CONTAINS",
            OperatorKind::StartsWith => "STARTSWITH",
            OperatorKind::EndsWith => "ENDSWITH",
        }
    }

    /// Whether this operator builds a LIKE pattern.
    pub fn is_pattern(&self) -> bool {
        !matches!(
            self,
            OperatorKind::Eq
                | OperatorKind::Ne
                | OperatorKind::Gt
                | OperatorKind::Ge
                | OperatorKind::Lt
                | OperatorKind::Le
        )
    }
}

impl FromStr for OperatorKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperatorKind::parse(s)
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the clauses of one filter are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BooleanMode {
    #[default]
    And,
    Or,
}

impl BooleanMode {
    /// `"or"` in any case is OR; anything else, including nothing, is AND.
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            Some(t) if t.eq_ignore_ascii_case("or") => BooleanMode::Or,
            _ => BooleanMode::And,
        }
    }
}
