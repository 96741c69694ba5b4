//! Expression tree for WHERE / ON / ORDER BY / SELECT items.
//!
//! Expressions are built with the constructor functions and the
//! [`ExprExt`] combinators, then written into a [`TokenStream`].
//! Operators are emitted exactly as nested; grouping is explicit through
//! [`ExprExt::paren`].

use serde::{Deserialize, Serialize};

use super::dialect::Dialect;
use super::query::{Query, SelectExpr};
use super::token::{Token, TokenStream};

/// A SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `table.column` or bare `column`.
    Column {
        table: Option<String>,
        column: String,
    },

    /// Always inlined.
    Literal(Literal),

    /// Bound value.
    Param(Literal),

    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    Not(Box<Expr>),

    /// `NAME(arg, ...)`
    Function { name: String, args: Vec<Expr> },

    /// Scalar subquery, rendered on one line.
    Subquery(Box<Query>),

    In {
        expr: Box<Expr>,
        values: Vec<Expr>,
        negated: bool,
    },

    Exists(Box<Query>),

    IsNull { expr: Box<Expr>, negated: bool },

    /// `*` or `table.*`
    Star { table: Option<String> },

    Paren(Box<Expr>),

    /// Trusted SQL from model configuration, such as an order expression
    /// `CONCAT(last_name, first_name)`. Never built from user input.
    Raw(String),
}

/// Scalar values.
///
/// Deserializes untagged, so configuration files write plain values
/// (`value = 1`, `value = "open"`, `value = true`).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

macro_rules! literal_from {
    ($($ty:ty => |$v:ident| $make:expr),* $(,)?) => {
        $(
            impl From<$ty> for Literal {
                fn from($v: $ty) -> Self {
                    $make
                }
            }

            impl From<$ty> for Expr {
                fn from(value: $ty) -> Self {
                    Expr::Literal(Literal::from(value))
                }
            }
        )*
    };
}

literal_from! {
    i64 => |n| Literal::Int(n),
    i32 => |n| Literal::Int(i64::from(n)),
    f64 => |f| Literal::Float(f),
    bool => |b| Literal::Bool(b),
    &str => |s| Literal::String(s.to_string()),
    String => |s| Literal::String(s),
}

impl From<Query> for Expr {
    fn from(query: Query) -> Self {
        Expr::Subquery(Box::new(query))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    And,
    Or,
    Like,
    NotLike,
    ILike,
    NotILike,
}

impl BinaryOperator {
    fn token(self) -> Token {
        let keyword = match self {
            BinaryOperator::Eq => "=",
            BinaryOperator::Ne => "<>",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
            BinaryOperator::Lte => "<=",
            BinaryOperator::Gte => ">=",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
            BinaryOperator::Like => "LIKE",
            BinaryOperator::NotLike => "NOT LIKE",
            BinaryOperator::ILike => return Token::ILike { negated: false },
            BinaryOperator::NotILike => return Token::ILike { negated: true },
        };
        Token::Keyword(keyword)
    }
}

impl Expr {
    /// Tokens for the default dialect.
    pub fn to_tokens(&self) -> TokenStream {
        self.to_tokens_for_dialect(Dialect::default())
    }

    /// Tokens for `dialect`, which decides the pagination syntax of nested
    /// subqueries.
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        self.write_to(&mut ts, dialect);
        ts
    }

    pub(crate) fn write_to(&self, ts: &mut TokenStream, dialect: Dialect) {
        match self {
            Expr::Column { table, column } => {
                if let Some(table) = table {
                    ts.ident(table).push(Token::Punct('.'));
                }
                ts.ident(column);
            }
            Expr::Literal(value) => {
                ts.push(Token::Literal(value.clone()));
            }
            Expr::Param(value) => {
                ts.push(Token::Param(value.clone()));
            }
            Expr::BinaryOp { left, op, right } => {
                left.write_to(ts, dialect);
                ts.space().push(op.token()).space();
                right.write_to(ts, dialect);
            }
            Expr::Not(inner) => {
                ts.keyword_space("NOT");
                inner.write_to(ts, dialect);
            }
            Expr::Function { name, args } => {
                ts.push(Token::FunctionName(name.clone())).lparen();
                ts.comma_separated(args, |arg, ts| arg.write_to(ts, dialect));
                ts.rparen();
            }
            Expr::Subquery(query) => {
                ts.lparen();
                query.write_inline(ts, dialect);
                ts.rparen();
            }
            // An empty list matches nothing (or everything when negated);
            // `IN ()` itself is not valid SQL.
            Expr::In { values, negated, .. } if values.is_empty() => {
                ts.push(Token::Literal(Literal::Int(1)))
                    .space()
                    .keyword_space(if *negated { "=" } else { "<>" })
                    .push(Token::Literal(Literal::Int(1)));
            }
            Expr::In {
                expr,
                values,
                negated,
            } => {
                expr.write_to(ts, dialect);
                ts.space();
                if *negated {
                    ts.keyword_space("NOT");
                }
                ts.keyword_space("IN").lparen();
                ts.comma_separated(values, |value, ts| value.write_to(ts, dialect));
                ts.rparen();
            }
            Expr::Exists(query) => {
                ts.keyword_space("EXISTS").lparen();
                query.write_inline(ts, dialect);
                ts.rparen();
            }
            Expr::IsNull { expr, negated } => {
                expr.write_to(ts, dialect);
                ts.space()
                    .keyword(if *negated { "IS NOT NULL" } else { "IS NULL" });
            }
            Expr::Star { table } => {
                if let Some(table) = table {
                    ts.ident(table).push(Token::Punct('.'));
                }
                ts.push(Token::Punct('*'));
            }
            Expr::Paren(inner) => {
                ts.lparen();
                inner.write_to(ts, dialect);
                ts.rparen();
            }
            Expr::Raw(sql) => {
                ts.push(Token::Raw(sql.clone()));
            }
        }
    }
}

pub fn col(name: &str) -> Expr {
    Expr::Column {
        table: None,
        column: name.into(),
    }
}

pub fn table_col(table: &str, column: &str) -> Expr {
    Expr::Column {
        table: Some(table.into()),
        column: column.into(),
    }
}

/// Inlined literal.
pub fn lit(value: impl Into<Literal>) -> Expr {
    Expr::Literal(value.into())
}

/// Bound parameter.
pub fn bind(value: impl Into<Literal>) -> Expr {
    Expr::Param(value.into())
}

pub fn star() -> Expr {
    Expr::Star { table: None }
}

pub fn table_star(table: &str) -> Expr {
    Expr::Star {
        table: Some(table.into()),
    }
}

pub fn min(expr: Expr) -> Expr {
    Expr::Function {
        name: "MIN".into(),
        args: vec![expr],
    }
}

pub fn max(expr: Expr) -> Expr {
    Expr::Function {
        name: "MAX".into(),
        args: vec![expr],
    }
}

pub fn exists(subquery: Query) -> Expr {
    Expr::Exists(Box::new(subquery))
}

/// Unescaped SQL. Only for trusted configuration, never user input.
pub fn raw_sql(sql: &str) -> Expr {
    Expr::Raw(sql.into())
}

/// Fluent combinators on expressions.
pub trait ExprExt: Sized {
    fn into_expr(self) -> Expr;

    fn binary(self, op: BinaryOperator, other: impl Into<Expr>) -> Expr {
        Expr::BinaryOp {
            left: Box::new(self.into_expr()),
            op,
            right: Box::new(other.into()),
        }
    }

    fn eq(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Eq, other)
    }

    fn ne(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Ne, other)
    }

    fn gt(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Gt, other)
    }

    fn gte(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Gte, other)
    }

    fn lt(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Lt, other)
    }

    fn lte(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Lte, other)
    }

    fn like(self, pattern: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Like, pattern)
    }

    fn and(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::And, other)
    }

    fn or(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Or, other)
    }

    fn not(self) -> Expr {
        Expr::Not(Box::new(self.into_expr()))
    }

    #[allow(clippy::wrong_self_convention)]
    fn is_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: false,
        }
    }

    #[allow(clippy::wrong_self_convention)]
    fn is_not_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: true,
        }
    }

    fn in_list(self, values: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self.into_expr()),
            values,
            negated: false,
        }
    }

    fn not_in_list(self, values: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self.into_expr()),
            values,
            negated: true,
        }
    }

    fn paren(self) -> Expr {
        Expr::Paren(Box::new(self.into_expr()))
    }

    /// Use as a SELECT item named `name`.
    fn alias(self, name: &str) -> SelectExpr {
        SelectExpr::new(self.into_expr()).with_alias(name)
    }
}

impl ExprExt for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}
