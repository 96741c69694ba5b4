//! SELECT statements.
//!
//! Top-level statements render one clause per line with the select list
//! indented; a query nested in an expression or a FROM clause renders on
//! a single line.

use serde::{Deserialize, Serialize};

use super::dialect::{Dialect, SqlDialect};
use super::expr::{star, Expr, ExprExt, Literal};
use super::token::TokenStream;

/// SELECT list item.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct SelectExpr {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl SelectExpr {
    pub fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    fn write_to(&self, ts: &mut TokenStream, dialect: Dialect) {
        self.expr.write_to(ts, dialect);
        if let Some(alias) = &self.alias {
            write_alias(ts, alias);
        }
    }
}

impl From<Expr> for SelectExpr {
    fn from(expr: Expr) -> Self {
        SelectExpr::new(expr)
    }
}

fn write_alias(ts: &mut TokenStream, alias: &str) {
    ts.space().keyword_space("AS").ident(alias);
}

/// Table with optional alias.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct TableRef {
    pub table: String,
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.into(),
            alias: None,
        }
    }

    /// Alias the table. An empty alias, or one equal to the table name,
    /// is dropped.
    pub fn with_alias(mut self, alias: &str) -> Self {
        if !alias.is_empty() && alias != self.table {
            self.alias = Some(alias.into());
        }
        self
    }

    /// The name other clauses use to reference this table.
    pub fn reference_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.table)
    }

    fn write_to(&self, ts: &mut TokenStream) {
        ts.ident(&self.table);
        if let Some(alias) = &self.alias {
            write_alias(ts, alias);
        }
    }
}

/// FROM source: a table or a derived table.
#[derive(Debug, Clone, PartialEq)]
pub enum FromItem {
    Table(TableRef),
    Subquery { query: Box<Query>, alias: String },
}

impl FromItem {
    /// The name other clauses use to reference the source.
    pub fn reference_name(&self) -> &str {
        match self {
            FromItem::Table(table) => table.reference_name(),
            FromItem::Subquery { alias, .. } => alias,
        }
    }

    fn write_to(&self, ts: &mut TokenStream, dialect: Dialect) {
        match self {
            FromItem::Table(table) => table.write_to(ts),
            FromItem::Subquery { query, alias } => {
                ts.lparen();
                query.write_inline(ts, dialect);
                ts.rparen();
                write_alias(ts, alias);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    Inner,
    #[default]
    Left,
    Right,
    Cross,
}

impl JoinType {
    fn keyword(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Cross => "CROSS JOIN",
        }
    }
}

impl std::str::FromStr for JoinType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inner" => Ok(JoinType::Inner),
            "left" => Ok(JoinType::Left),
            "right" => Ok(JoinType::Right),
            "cross" => Ok(JoinType::Cross),
            other => Err(format!("unknown join type '{other}'")),
        }
    }
}

/// JOIN clause. A cross join has no ON condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: TableRef,
    pub on: Option<Expr>,
}

impl Join {
    fn write_to(&self, ts: &mut TokenStream, dialect: Dialect) {
        ts.keyword_space(self.join_type.keyword());
        self.table.write_to(ts);
        if let Some(on) = &self.on {
            ts.space().keyword_space("ON");
            on.write_to(ts, dialect);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn keyword(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// ORDER BY item. Without a direction the database default applies.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct OrderByExpr {
    pub expr: Expr,
    pub dir: Option<SortDir>,
}

impl OrderByExpr {
    pub fn new(expr: Expr) -> Self {
        Self { expr, dir: None }
    }

    pub fn asc(expr: Expr) -> Self {
        Self::with_dir(expr, SortDir::Asc)
    }

    pub fn desc(expr: Expr) -> Self {
        Self::with_dir(expr, SortDir::Desc)
    }

    pub fn with_dir(expr: Expr, dir: SortDir) -> Self {
        Self {
            expr,
            dir: Some(dir),
        }
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        self.write_to(&mut ts, dialect);
        ts
    }

    fn write_to(&self, ts: &mut TokenStream, dialect: Dialect) {
        self.expr.write_to(ts, dialect);
        if let Some(dir) = self.dir {
            ts.space().keyword(dir.keyword());
        }
    }
}

/// Clause separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Pretty,
    Inline,
}

impl Layout {
    fn clause_break(self, ts: &mut TokenStream) {
        match self {
            Layout::Pretty => ts.newline(),
            Layout::Inline => ts.space(),
        };
    }

    fn item_break(self, ts: &mut TokenStream) {
        match self {
            Layout::Pretty => ts.newline().indent(1),
            Layout::Inline => ts.space(),
        };
    }
}

/// A SELECT statement.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "Query has no effect until rendered with to_sql()"]
pub struct Query {
    pub select: Vec<SelectExpr>,
    pub distinct: bool,
    pub from: Option<FromItem>,
    pub joins: Vec<Join>,
    pub where_clause: Option<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the SELECT list.
    pub fn select(mut self, exprs: Vec<impl Into<SelectExpr>>) -> Self {
        self.select = exprs.into_iter().map(Into::into).collect();
        self
    }

    pub fn add_select(mut self, expr: impl Into<SelectExpr>) -> Self {
        self.select.push(expr.into());
        self
    }

    pub fn select_star(self) -> Self {
        self.select(vec![star()])
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn from(mut self, table: TableRef) -> Self {
        self.from = Some(FromItem::Table(table));
        self
    }

    /// `FROM (query) AS alias`
    pub fn from_subquery(mut self, query: Query, alias: &str) -> Self {
        self.from = Some(FromItem::Subquery {
            query: Box::new(query),
            alias: alias.into(),
        });
        self
    }

    /// Add a join. `on` is ignored for [`JoinType::Cross`].
    pub fn join(mut self, join_type: JoinType, table: TableRef, on: Expr) -> Self {
        let on = (join_type != JoinType::Cross).then_some(on);
        self.joins.push(Join {
            join_type,
            table,
            on,
        });
        self
    }

    pub fn inner_join(self, table: TableRef, on: Expr) -> Self {
        self.join(JoinType::Inner, table, on)
    }

    pub fn left_join(self, table: TableRef, on: Expr) -> Self {
        self.join(JoinType::Left, table, on)
    }

    /// Whether a join already references `name`, as table or alias.
    pub fn has_join(&self, name: &str) -> bool {
        self.joins
            .iter()
            .any(|j| j.table.reference_name() == name || j.table.table == name)
    }

    /// AND `condition` onto the WHERE clause.
    pub fn filter(mut self, condition: Expr) -> Self {
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    /// Replace the ORDER BY list.
    pub fn order_by(mut self, exprs: Vec<OrderByExpr>) -> Self {
        self.order_by = exprs;
        self
    }

    pub fn then_order_by(mut self, expr: OrderByExpr) -> Self {
        self.order_by.push(expr);
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

    /// Bound values in placeholder order.
    pub fn bindings(&self) -> Vec<Literal> {
        self.to_tokens().params()
    }

    pub fn to_tokens(&self) -> TokenStream {
        self.to_tokens_for_dialect(Dialect::default())
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        self.write_to(&mut ts, dialect);
        ts
    }

    pub(crate) fn write_to(&self, ts: &mut TokenStream, dialect: Dialect) {
        self.write(ts, dialect, Layout::Pretty);
    }

    pub(crate) fn write_inline(&self, ts: &mut TokenStream, dialect: Dialect) {
        self.write(ts, dialect, Layout::Inline);
    }

    fn write(&self, ts: &mut TokenStream, dialect: Dialect, layout: Layout) {
        ts.keyword("SELECT");
        if self.distinct {
            ts.space().keyword("DISTINCT");
        }
        for (i, item) in self.select.iter().enumerate() {
            if i > 0 {
                ts.comma();
            }
            layout.item_break(ts);
            item.write_to(ts, dialect);
        }

        if let Some(from) = &self.from {
            layout.clause_break(ts);
            ts.keyword_space("FROM");
            from.write_to(ts, dialect);
        }

        for join in &self.joins {
            layout.clause_break(ts);
            join.write_to(ts, dialect);
        }

        if let Some(condition) = &self.where_clause {
            layout.clause_break(ts);
            ts.keyword_space("WHERE");
            condition.write_to(ts, dialect);
        }

        let paginated = self.limit.is_some() || self.offset.is_some();
        let pagination = dialect.pagination();

        if !self.order_by.is_empty() {
            layout.clause_break(ts);
            ts.keyword_space("ORDER BY");
            ts.comma_separated(&self.order_by, |item, ts| item.write_to(ts, dialect));
        } else if paginated && pagination.requires_order_by() {
            // No meaningful order; the caller asked for a slice anyway.
            layout.clause_break(ts);
            ts.keyword_space("ORDER BY")
                .lparen()
                .keyword_space("SELECT")
                .keyword("NULL")
                .rparen();
        }

        if paginated {
            layout.clause_break(ts);
            pagination.write(ts, self.limit, self.offset);
        }
    }

    /// Render for `dialect` with bound values inlined.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens_for_dialect(dialect).serialize(dialect)
    }

    /// Render with positional placeholders plus the bound values.
    pub fn to_sql_with_params(&self, dialect: Dialect) -> (String, Vec<Literal>) {
        self.to_tokens_for_dialect(dialect)
            .serialize_with_params(dialect)
    }
}

impl std::fmt::Display for Query {
    /// Renders for the default dialect (MySQL).
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_sql(Dialect::default()))
    }
}
