//! SQL Tokens - the atomic units of SQL output.
//!
//! Tokens are dialect-agnostic representations that serialize
//! to dialect-specific strings. Caller-supplied values travel as
//! [`Token::Param`] so the same stream can be rendered with inline
//! literals or with bind placeholders.

use super::dialect::{Dialect, SqlDialect};
use super::expr::Literal;

/// SQL Token - every possible element in a SQL statement.
///
/// Adding a new variant here will cause compile errors everywhere
/// it needs to be handled (exhaustive matching).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Keywords ===
    Select,
    From,
    Where,
    And,
    Or,
    Not,
    As,
    GroupBy,
    OrderBy,
    Asc,
    Desc,
    Limit,
    Offset,
    Fetch,
    Next,
    Rows,
    Only,
    Like,
    ILike,
    Escape,
    IsNull,
    IsNotNull,
    Null,
    True,
    False,

    // === DML Keywords ===
    Update,
    Set,
    Delete,

    // === Punctuation ===
    Comma,
    Dot,
    Star,
    LParen,
    RParen,

    // === Operators ===
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,

    // === Whitespace / Formatting ===
    Space,
    Newline,
    Indent(usize),

    // === Dynamic Content ===
    /// Simple identifier (table, column, alias)
    Ident(String),
    /// Qualified identifier: schema.table or just table
    QualifiedIdent {
        schema: Option<String>,
        name: String,
    },
    /// Integer literal
    LitInt(i64),
    /// Unsigned integer literal (row counts)
    LitUInt(u64),
    /// Float literal
    LitFloat(f64),
    /// String literal
    LitString(String),
    /// Boolean literal
    LitBool(bool),
    /// Date literal (ISO-8601)
    LitDate(String),
    /// Timestamp literal (ISO-8601)
    LitTimestamp(String),
    /// NULL literal
    LitNull,

    /// Caller-supplied value: inline literal or bind placeholder depending
    /// on how the stream is serialized.
    Param(Literal),

    // === Function Names ===
    FunctionName(String),
}

impl Token {
    /// Serialize this token to a string for the given dialect.
    ///
    /// [`Token::Param`] renders as an inline literal here; use
    /// [`TokenStream::serialize_with_params`] for placeholders.
    pub fn serialize(&self, dialect: Dialect) -> String {
        match self {
            // Keywords
            Token::Select => "SELECT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::And => "AND".into(),
            Token::Or => "OR".into(),
            Token::Not => "NOT".into(),
            Token::As => "AS".into(),
            Token::GroupBy => "GROUP BY".into(),
            Token::OrderBy => "ORDER BY".into(),
            Token::Asc => "ASC".into(),
            Token::Desc => "DESC".into(),
            Token::Limit => "LIMIT".into(),
            Token::Offset => "OFFSET".into(),
            Token::Fetch => "FETCH".into(),
            Token::Next => "NEXT".into(),
            Token::Rows => "ROWS".into(),
            Token::Only => "ONLY".into(),
            Token::Like => "LIKE".into(),
            Token::ILike => "ILIKE".into(),
            Token::Escape => "ESCAPE".into(),
            Token::IsNull => "IS NULL".into(),
            Token::IsNotNull => "IS NOT NULL".into(),
            Token::Null => "NULL".into(),
            Token::True => "TRUE".into(),
            Token::False => "FALSE".into(),

            // DML keywords
            Token::Update => "UPDATE".into(),
            Token::Set => "SET".into(),
            Token::Delete => "DELETE".into(),

            // Punctuation
            Token::Comma => ",".into(),
            Token::Dot => ".".into(),
            Token::Star => "*".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),

            // Operators
            Token::Eq => "=".into(),
            Token::Ne => "<>".into(),
            Token::Lt => "<".into(),
            Token::Gt => ">".into(),
            Token::Lte => "<=".into(),
            Token::Gte => ">=".into(),

            // Whitespace
            Token::Space => " ".into(),
            Token::Newline => "\n".into(),
            Token::Indent(n) => "  ".repeat(*n),

            // Dynamic - dialect-specific formatting
            Token::Ident(name) => dialect.quote_identifier(name),
            Token::QualifiedIdent { schema, name } => match schema {
                Some(s) => format!(
                    "{}.{}",
                    dialect.quote_identifier(s),
                    dialect.quote_identifier(name)
                ),
                None => dialect.quote_identifier(name),
            },
            Token::LitInt(n) => n.to_string(),
            Token::LitUInt(n) => n.to_string(),
            Token::LitFloat(f) => format_float(*f),
            Token::LitString(s) => dialect.quote_string(s),
            Token::LitBool(b) => dialect.format_bool(*b).into(),
            Token::LitDate(d) => dialect.format_date_literal(d),
            Token::LitTimestamp(ts) => dialect.format_timestamp_literal(ts),
            Token::LitNull => dialect.format_null().into(),

            Token::Param(lit) => lit.to_token().serialize(dialect),

            Token::FunctionName(name) => name.to_uppercase(),
        }
    }
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        panic!("Cannot serialize NaN to SQL")
    }
    if f.is_infinite() {
        panic!("Cannot serialize Infinity to SQL")
    }
    let mut buffer = ryu::Buffer::new();
    buffer.format(f).to_string()
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Serialize all tokens to a SQL string with inline literals.
    pub fn serialize(&self, dialect: Dialect) -> String {
        self.tokens.iter().map(|t| t.serialize(dialect)).collect()
    }

    /// Serialize with bind placeholders in place of [`Token::Param`].
    ///
    /// Returns the SQL text and the bound values in placeholder order.
    pub fn serialize_with_params(&self, dialect: Dialect) -> (String, Vec<Literal>) {
        let mut sql = String::new();
        let mut params = Vec::new();
        for token in &self.tokens {
            match token {
                Token::Param(lit) => {
                    params.push(lit.clone());
                    sql.push_str(&dialect.placeholder(params.len()));
                }
                other => sql.push_str(&other.serialize(dialect)),
            }
        }
        (sql, params)
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn newline(&mut self) -> &mut Self {
        self.push(Token::Newline)
    }
    pub fn indent(&mut self, n: usize) -> &mut Self {
        self.push(Token::Indent(n))
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
}
