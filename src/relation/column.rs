//! Column references that may or may not carry a table prefix.

use serde::{Deserialize, Serialize};

use crate::sql::expr::Expr;

/// A column, optionally qualified with a table or alias (`table.column`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub struct QualifiedColumn {
    pub table: Option<String>,
    pub column: String,
}

impl QualifiedColumn {
    /// Parse `column` or `table.column`. Only the last dot splits.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        match s.rsplit_once('.') {
            Some((table, column)) if !table.is_empty() => Self {
                table: Some(table.to_string()),
                column: column.to_string(),
            },
            _ => Self {
                table: None,
                column: s.trim_start_matches('.').to_string(),
            },
        }
    }

    pub fn new(table: &str, column: &str) -> Self {
        Self {
            table: Some(table.into()),
            column: column.into(),
        }
    }

    /// Qualify with `alias` when there is no table, or when the table is
    /// the unaliased `table_name`. Columns of other tables are untouched.
    pub fn qualify_if_absent(&self, table_name: &str, alias: &str) -> Self {
        match &self.table {
            Some(t) if t != table_name => self.clone(),
            _ => Self::new(alias, &self.column),
        }
    }

    /// Replace any table with `table`.
    pub fn with_table(&self, table: &str) -> Self {
        Self::new(table, &self.column)
    }

    pub fn to_expr(&self) -> Expr {
        Expr::Column {
            table: self.table.clone(),
            column: self.column.clone(),
        }
    }
}

impl From<String> for QualifiedColumn {
    fn from(s: String) -> Self {
        QualifiedColumn::parse(&s)
    }
}

impl From<&str> for QualifiedColumn {
    fn from(s: &str) -> Self {
        QualifiedColumn::parse(s)
    }
}

impl From<QualifiedColumn> for String {
    fn from(c: QualifiedColumn) -> Self {
        c.to_string()
    }
}

impl std::fmt::Display for QualifiedColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.table {
            Some(t) => write!(f, "{}.{}", t, self.column),
            None => write!(f, "{}", self.column),
        }
    }
}
