//! Table query wire format
//!
//! A [`TableQuery`] travels as URL query pairs:
//!
//! - filter: `<column>=<op>.<value>` (`eq`, `neq`, `gt`, `gte`, `lt`, `lte`, `like`, `ilike`)
//! - ordering: `order=<column>.<asc|desc>[,<column>.<asc|desc>...]`
//! - paging: `limit=<n>`, `offset=<n>`
//!
//! Pattern operators take `*` (or `%`) as the multi-char wildcard.
//!
//! ```
//! use shared::query::{Direction, FilterOp, TableQuery};
//!
//! let q = TableQuery::new()
//!     .filter("name", FilterOp::Ilike, "*kopi*")
//!     .order_by("created_at", Direction::Desc)
//!     .limit(20);
//!
//! let pairs = q.to_query_pairs();
//! assert_eq!(pairs[0], ("name".to_string(), "ilike.*kopi*".to_string()));
//! assert_eq!(TableQuery::from_query_pairs(pairs).unwrap(), q);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{AppError, ErrorCode};

const ORDER_KEY: &str = "order";
const LIMIT_KEY: &str = "limit";
const OFFSET_KEY: &str = "offset";

/// Filter operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    Ilike,
}

impl FilterOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Like => "like",
            Self::Ilike => "ilike",
        }
    }

    /// `like` / `ilike`
    pub fn is_pattern(&self) -> bool {
        matches!(self, Self::Like | Self::Ilike)
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOp {
    type Err = QueryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(Self::Eq),
            "neq" => Ok(Self::Neq),
            "gt" => Ok(Self::Gt),
            "gte" => Ok(Self::Gte),
            "lt" => Ok(Self::Lt),
            "lte" => Ok(Self::Lte),
            "like" => Ok(Self::Like),
            "ilike" => Ok(Self::Ilike),
            other => Err(QueryParseError::UnknownOperator(other.to_string())),
        }
    }
}

/// One `<column> <op> <value>` condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: String,
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// One ordering term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

/// Query parse failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryParseError {
    #[error("empty column name")]
    EmptyColumn,

    #[error("missing operator in filter on `{0}`")]
    MissingOperator(String),

    #[error("unknown filter operator `{0}`")]
    UnknownOperator(String),

    #[error("invalid order term `{0}`")]
    InvalidOrder(String),

    #[error("invalid limit `{0}`")]
    InvalidLimit(String),

    #[error("invalid offset `{0}`")]
    InvalidOffset(String),
}

impl From<QueryParseError> for AppError {
    fn from(err: QueryParseError) -> Self {
        AppError::with_message(ErrorCode::InvalidFilter, err.to_string())
    }
}

/// Filters, ordering and paging for one table request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableQuery {
    pub filters: Vec<Filter>,
    pub order: Vec<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl TableQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(
        mut self,
        column: impl Into<String>,
        op: FilterOp,
        value: impl Into<String>,
    ) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order.push(OrderBy {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Encode as URL query pairs (filters first, then order, limit, offset)
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .filters
            .iter()
            .map(|f| (f.column.clone(), format!("{}.{}", f.op, f.value)))
            .collect();

        if !self.order.is_empty() {
            let terms: Vec<String> = self
                .order
                .iter()
                .map(|o| format!("{}.{}", o.column, o.direction.as_str()))
                .collect();
            pairs.push((ORDER_KEY.to_string(), terms.join(",")));
        }
        if let Some(limit) = self.limit {
            pairs.push((LIMIT_KEY.to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push((OFFSET_KEY.to_string(), offset.to_string()));
        }
        pairs
    }

    /// Decode URL query pairs
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Result<Self, QueryParseError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = TableQuery::new();

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                ORDER_KEY => {
                    for term in value.split(',').filter(|t| !t.is_empty()) {
                        query.order.push(parse_order_term(term)?);
                    }
                }
                LIMIT_KEY => {
                    let limit = value
                        .parse()
                        .map_err(|_| QueryParseError::InvalidLimit(value.to_string()))?;
                    query.limit = Some(limit);
                }
                OFFSET_KEY => {
                    let offset = value
                        .parse()
                        .map_err(|_| QueryParseError::InvalidOffset(value.to_string()))?;
                    query.offset = Some(offset);
                }
                column => {
                    if column.is_empty() {
                        return Err(QueryParseError::EmptyColumn);
                    }
                    let (op, rest) = value
                        .split_once('.')
                        .ok_or_else(|| QueryParseError::MissingOperator(column.to_string()))?;
                    query.filters.push(Filter {
                        column: column.to_string(),
                        op: op.parse()?,
                        value: rest.to_string(),
                    });
                }
            }
        }

        Ok(query)
    }
}

fn parse_order_term(term: &str) -> Result<OrderBy, QueryParseError> {
    let (column, direction) = match term.rsplit_once('.') {
        Some((column, "asc")) => (column, Direction::Asc),
        Some((column, "desc")) => (column, Direction::Desc),
        Some(_) => return Err(QueryParseError::InvalidOrder(term.to_string())),
        None => (term, Direction::Asc),
    };
    if column.is_empty() {
        return Err(QueryParseError::EmptyColumn);
    }
    Ok(OrderBy {
        column: column.to_string(),
        direction,
    })
}
