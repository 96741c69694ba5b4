//! WHERE constraint trees and ORDER clauses attached to relations and
//! global scopes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::column::QualifiedColumn;
use crate::error::ConfigurationError;
use crate::sql::expr::{bind, BinaryOperator, Expr, ExprExt, Literal};
use crate::sql::query::SortDir;

// ============================================================================
// Operators
// ============================================================================

/// Comparison operator accepted in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    #[default]
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
    NotLike,
    ILike,
    NotILike,
}

impl Operator {
    pub fn to_binary(self) -> BinaryOperator {
        match self {
            Operator::Eq => BinaryOperator::Eq,
            Operator::Ne => BinaryOperator::Ne,
            Operator::Lt => BinaryOperator::Lt,
            Operator::Lte => BinaryOperator::Lte,
            Operator::Gt => BinaryOperator::Gt,
            Operator::Gte => BinaryOperator::Gte,
            Operator::Like => BinaryOperator::Like,
            Operator::NotLike => BinaryOperator::NotLike,
            Operator::ILike => BinaryOperator::ILike,
            Operator::NotILike => BinaryOperator::NotILike,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Like => "like",
            Operator::NotLike => "not like",
            Operator::ILike => "ilike",
            Operator::NotILike => "not ilike",
        }
    }
}

impl FromStr for Operator {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();
        match normalized.as_str() {
            "=" | "==" => Ok(Operator::Eq),
            "<>" | "!=" => Ok(Operator::Ne),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Lte),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Gte),
            "like" => Ok(Operator::Like),
            "not like" => Ok(Operator::NotLike),
            "ilike" => Ok(Operator::ILike),
            "not ilike" => Ok(Operator::NotILike),
            _ => Err(ConfigurationError::InvalidOperator(s.to_string())),
        }
    }
}

impl TryFrom<String> for Operator {
    type Error = ConfigurationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

/// How a constraint combines with the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connective {
    #[default]
    And,
    Or,
}

// ============================================================================
// Constraint tree
// ============================================================================

/// One WHERE condition. `Nested` groups recurse.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    Basic {
        column: QualifiedColumn,
        #[serde(default)]
        operator: Operator,
        value: Literal,
        #[serde(default)]
        boolean: Connective,
    },
    Null {
        column: QualifiedColumn,
        #[serde(default)]
        negated: bool,
        #[serde(default)]
        boolean: Connective,
    },
    In {
        column: QualifiedColumn,
        values: Vec<Literal>,
        #[serde(default)]
        negated: bool,
        #[serde(default)]
        boolean: Connective,
    },
    Nested {
        constraints: Vec<Constraint>,
        #[serde(default)]
        boolean: Connective,
    },
}

impl Constraint {
    /// `column = value`
    pub fn basic(column: &str, operator: Operator, value: impl Into<Literal>) -> Self {
        Constraint::Basic {
            column: QualifiedColumn::parse(column),
            operator,
            value: value.into(),
            boolean: Connective::And,
        }
    }

    pub fn is_null(column: &str) -> Self {
        Constraint::Null {
            column: QualifiedColumn::parse(column),
            negated: false,
            boolean: Connective::And,
        }
    }

    pub fn nested(constraints: Vec<Constraint>) -> Self {
        Constraint::Nested {
            constraints,
            boolean: Connective::And,
        }
    }

    /// Switch this constraint to combine with OR.
    pub fn or(mut self) -> Self {
        match &mut self {
            Constraint::Basic { boolean, .. }
            | Constraint::Null { boolean, .. }
            | Constraint::In { boolean, .. }
            | Constraint::Nested { boolean, .. } => *boolean = Connective::Or,
        }
        self
    }

    pub fn connective(&self) -> Connective {
        match self {
            Constraint::Basic { boolean, .. }
            | Constraint::Null { boolean, .. }
            | Constraint::In { boolean, .. }
            | Constraint::Nested { boolean, .. } => *boolean,
        }
    }

    /// Render with columns qualified for a table reachable as `alias`.
    /// Returns `None` for an empty nested group.
    pub fn to_expr(&self, table_name: &str, alias: &str) -> Option<Expr> {
        let qualify = |c: &QualifiedColumn| c.qualify_if_absent(table_name, alias).to_expr();
        match self {
            Constraint::Basic {
                column,
                operator,
                value,
                ..
            } => Some(qualify(column).binary(operator.to_binary(), bind(value.clone()))),
            Constraint::Null {
                column, negated, ..
            } => Some(if *negated {
                qualify(column).is_not_null()
            } else {
                qualify(column).is_null()
            }),
            Constraint::In {
                column,
                values,
                negated,
                ..
            } => {
                let values = values.iter().cloned().map(bind).collect();
                Some(if *negated {
                    qualify(column).not_in_list(values)
                } else {
                    qualify(column).in_list(values)
                })
            }
            Constraint::Nested { constraints, .. } => {
                combine(constraints, table_name, alias).map(ExprExt::paren)
            }
        }
    }
}

/// Chain constraints by their connectives. The first connective is ignored.
pub fn combine(constraints: &[Constraint], table_name: &str, alias: &str) -> Option<Expr> {
    constraints.iter().fold(None, |acc, c| {
        let Some(expr) = c.to_expr(table_name, alias) else {
            return acc;
        };
        Some(match acc {
            None => expr,
            Some(prev) => match c.connective() {
                Connective::And => prev.and(expr),
                Connective::Or => prev.or(expr),
            },
        })
    })
}

/// Combine constraints for appending to another condition with AND.
/// Multi-constraint groups are parenthesised so an OR cannot escape.
pub fn combine_grouped(constraints: &[Constraint], table_name: &str, alias: &str) -> Option<Expr> {
    let expr = combine(constraints, table_name, alias)?;
    Some(if constraints.len() > 1 { expr.paren() } else { expr })
}

// ============================================================================
// ORDER clauses
// ============================================================================

/// An ORDER BY on a relation or global scope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OrderClause {
    pub column: QualifiedColumn,
    #[serde(default)]
    pub direction: SortDir,
}

impl OrderClause {
    pub fn new(column: &str, direction: SortDir) -> Self {
        Self {
            column: QualifiedColumn::parse(column),
            direction,
        }
    }
}
