//! Column data types as reported by database catalogs.
//!
//! Catalogs spell the same type many ways (`int4`, `INTEGER`, `int(11)`,
//! `NUMBER(38,0)`, `timestamp without time zone`, ...). [`ColumnType::parse`]
//! folds them into one closed set and keeps anything it does not recognise
//! as [`ColumnType::Other`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of a column.
///
/// # Examples
///
/// ```ignore
/// use tabula::schema::ColumnType;
///
/// assert_eq!(ColumnType::parse("bigint"), ColumnType::BigInt);
/// assert_eq!(ColumnType::parse("varchar(255)"), ColumnType::Varchar(Some(255)));
/// assert_eq!(ColumnType::parse("decimal(18,2)"), ColumnType::Decimal(Some((18, 2))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    /// Boolean type.
    Boolean,

    /// 8/16-bit integer (TINYINT, SMALLINT).
    SmallInt,

    /// 32-bit integer (INT/INTEGER).
    Integer,

    /// 64-bit integer (BIGINT).
    BigInt,

    /// 32-bit floating point (REAL/FLOAT4).
    Real,

    /// 64-bit floating point (DOUBLE PRECISION/FLOAT8).
    Double,

    /// Fixed-precision decimal, optionally with (precision, scale).
    Decimal(Option<(u8, u8)>),

    /// Unbounded string (TEXT).
    Text,

    /// Fixed-length character string.
    Char(Option<u32>),

    /// Variable-length character string with optional maximum length.
    Varchar(Option<u32>),

    /// Date without time.
    Date,

    /// Time without date.
    Time,

    /// Timestamp without timezone.
    Timestamp,

    /// Timestamp with timezone.
    TimestampTz,

    /// Binary data (BLOB, BYTEA, VARBINARY).
    Binary,

    /// JSON data type.
    Json,

    /// UUID/GUID type.
    Uuid,

    /// Anything else, kept verbatim.
    Other(String),
}

impl ColumnType {
    /// Parse a catalog type name. Never fails.
    ///
    /// Supports common spellings:
    /// - `bool`, `boolean`, `bit`
    /// - `tinyint`, `smallint`, `int2`
    /// - `int`, `integer`, `int4`, `mediumint`
    /// - `bigint`, `int8`, `hugeint`
    /// - `real`, `float4`
    /// - `double`, `float8`, `double precision`, `float`
    /// - `decimal(p,s)`, `numeric(p,s)`, `number(p,s)`
    /// - `text`, `string`, `clob`
    /// - `char(n)`, `character(n)`, `nchar(n)`
    /// - `varchar(n)`, `character varying(n)`, `nvarchar(n|max)`
    /// - `date`, `time`, `timestamp`, `datetime`, `timestamptz`, ...
    /// - `binary`, `blob`, `bytea`, `varbinary`
    /// - `json`, `jsonb`, `variant`
    /// - `uuid`, `uniqueidentifier`
    pub fn parse(s: &str) -> Self {
        let raw = s.trim();
        let lower = raw.to_lowercase();
        let (base, params) = split_params(&lower);

        match base {
            // Boolean
            "bool" | "boolean" | "bit" => ColumnType::Boolean,

            // Integers; MySQL display widths (`int(11)`) are ignored
            "tinyint" | "smallint" | "int2" | "int16" => ColumnType::SmallInt,
            "int" | "integer" | "int4" | "int32" | "mediumint" => ColumnType::Integer,
            "bigint" | "int8" | "int64" | "hugeint" => ColumnType::BigInt,

            // Floating point
            "real" | "float4" | "float32" => ColumnType::Real,
            "double" | "float8" | "float64" | "double precision" | "float" => ColumnType::Double,

            // Decimal
            "decimal" | "numeric" | "number" => {
                ColumnType::Decimal(params.and_then(parse_decimal_params))
            }

            // Strings
            "text" | "string" | "clob" | "ntext" | "tinytext" | "mediumtext" | "longtext" => {
                ColumnType::Text
            }
            "varchar" | "character varying" | "nvarchar" | "varchar2" => {
                ColumnType::Varchar(params.and_then(parse_length_param))
            }
            "char" | "character" | "nchar" | "bpchar" => {
                ColumnType::Char(params.and_then(parse_length_param))
            }

            // Date/Time
            "date" => ColumnType::Date,
            "time" | "time without time zone" => ColumnType::Time,
            "timestamp" | "datetime" | "datetime2" | "timestamp without time zone"
            | "timestamp_ntz" | "smalldatetime" => ColumnType::Timestamp,
            "timestamptz" | "timestamp with time zone" | "datetimeoffset" | "timestamp_tz"
            | "timestamp_ltz" => ColumnType::TimestampTz,

            // Binary
            "binary" | "blob" | "bytea" | "varbinary" | "image" | "longblob" => {
                ColumnType::Binary
            }

            // JSON
            "json" | "jsonb" | "variant" => ColumnType::Json,

            // UUID
            "uuid" | "guid" | "uniqueidentifier" => ColumnType::Uuid,

            _ => ColumnType::Other(raw.to_string()),
        }
    }

    /// Returns true if this is a numeric type.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnType::SmallInt
                | ColumnType::Integer
                | ColumnType::BigInt
                | ColumnType::Real
                | ColumnType::Double
                | ColumnType::Decimal(_)
        )
    }

    /// Returns true if this is an integer type.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ColumnType::SmallInt | ColumnType::Integer | ColumnType::BigInt
        )
    }

    /// Returns true if this is a string/text type.
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            ColumnType::Text | ColumnType::Char(_) | ColumnType::Varchar(_)
        )
    }

    /// Returns true if this is a temporal (date/time) type.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            ColumnType::Date | ColumnType::Time | ColumnType::Timestamp | ColumnType::TimestampTz
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Boolean => write!(f, "BOOLEAN"),
            ColumnType::SmallInt => write!(f, "SMALLINT"),
            ColumnType::Integer => write!(f, "INTEGER"),
            ColumnType::BigInt => write!(f, "BIGINT"),
            ColumnType::Real => write!(f, "REAL"),
            ColumnType::Double => write!(f, "DOUBLE PRECISION"),
            ColumnType::Decimal(Some((p, s))) => write!(f, "DECIMAL({}, {})", p, s),
            ColumnType::Decimal(None) => write!(f, "DECIMAL"),
            ColumnType::Text => write!(f, "TEXT"),
            ColumnType::Char(Some(n)) => write!(f, "CHAR({})", n),
            ColumnType::Char(None) => write!(f, "CHAR"),
            ColumnType::Varchar(Some(n)) => write!(f, "VARCHAR({})", n),
            ColumnType::Varchar(None) => write!(f, "VARCHAR"),
            ColumnType::Date => write!(f, "DATE"),
            ColumnType::Time => write!(f, "TIME"),
            ColumnType::Timestamp => write!(f, "TIMESTAMP"),
            ColumnType::TimestampTz => write!(f, "TIMESTAMP WITH TIME ZONE"),
            ColumnType::Binary => write!(f, "BINARY"),
            ColumnType::Json => write!(f, "JSON"),
            ColumnType::Uuid => write!(f, "UUID"),
            ColumnType::Other(name) => write!(f, "{}", name),
        }
    }
}

impl From<String> for ColumnType {
    fn from(s: String) -> Self {
        ColumnType::parse(&s)
    }
}

impl From<ColumnType> for String {
    fn from(t: ColumnType) -> Self {
        t.to_string()
    }
}

/// Split `name(params)` into its base name and the text inside the parentheses.
/// Trailing modifiers after the closing paren (`int(10) unsigned`) are dropped.
fn split_params(s: &str) -> (&str, Option<&str>) {
    match s.find('(') {
        Some(open) => {
            let base = s[..open].trim();
            let rest = &s[open + 1..];
            let params = rest.find(')').map(|close| rest[..close].trim());
            (base, params)
        }
        None => (s.trim(), None),
    }
}

/// Parse decimal parameters "precision,scale" or "precision".
fn parse_decimal_params(inner: &str) -> Option<(u8, u8)> {
    let mut parts = inner.split(',').map(|s| s.trim());
    let precision: u8 = parts.next()?.parse().ok()?;
    let scale: u8 = match parts.next() {
        Some(s) => s.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    Some((precision, scale))
}

/// Parse a single length parameter. T-SQL `max` means unbounded.
fn parse_length_param(inner: &str) -> Option<u32> {
    let inner = inner.trim();
    if inner.eq_ignore_ascii_case("max") {
        return None;
    }
    inner.parse().ok()
}
