//! JOIN clauses for resolved relations.

use super::columns::JoinColumns;
use super::has_one::OrderedHasOneJoiner;
use super::window::one_row_condition;
use crate::relation::{combine_grouped, Operator, RelationDescriptor, RelationKind};
use crate::sql::expr::{Expr, ExprExt};
use crate::sql::query::{JoinType, Query, SortDir};

/// Per-call join options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinOptions {
    pub operator: Operator,
    pub join_type: JoinType,
    /// Also add the key condition to the outer WHERE.
    pub as_where: bool,
    /// Restrict has-many joins to one related row (MIN/MAX by direction).
    pub direction: Option<SortDir>,
    /// Select every listed column of the joined table as `"alias.column"`.
    pub select_related: bool,
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            operator: Operator::Eq,
            join_type: JoinType::Left,
            as_where: false,
            direction: None,
            select_related: true,
        }
    }
}

impl JoinOptions {
    pub fn operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    pub fn join_type(mut self, join_type: JoinType) -> Self {
        self.join_type = join_type;
        self
    }

    pub fn as_where(mut self, as_where: bool) -> Self {
        self.as_where = as_where;
        self
    }

    pub fn direction(mut self, direction: SortDir) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn select_related(mut self, select_related: bool) -> Self {
        self.select_related = select_related;
        self
    }
}

/// Adds one relation hop to a query.
pub struct JoinBuilder<'a> {
    descriptor: &'a RelationDescriptor,
    options: JoinOptions,
}

impl<'a> JoinBuilder<'a> {
    pub fn new(descriptor: &'a RelationDescriptor, options: JoinOptions) -> Self {
        Self {
            descriptor,
            options,
        }
    }

    /// The ON condition: key columns, relation wheres, then the ordered
    /// has-one or has-many single-row restriction when applicable.
    pub fn on_condition(&self) -> Expr {
        let d = self.descriptor;
        let op = self.options.operator.to_binary();

        if d.is_ordered_has_one() {
            return OrderedHasOneJoiner::new(d).on_condition(op);
        }

        let mut on = JoinColumns::resolve(d).to_expr(op);
        if let Some(wheres) = combine_grouped(&d.constraints, &d.target.name, &d.target.alias) {
            on = on.and(wheres);
        }
        if let (RelationKind::HasMany, Some(direction)) = (d.kind, self.options.direction) {
            on = on.and(one_row_condition(d, direction));
        }
        on
    }

    /// Append the JOIN (and the WHERE copy of the key condition when
    /// `as_where` is set).
    pub fn apply(&self, query: Query) -> Query {
        let d = self.descriptor;
        let mut query = query.join(self.options.join_type, d.target.table_ref(), self.on_condition());
        if self.options.as_where {
            query = query.filter(JoinColumns::resolve(d).to_expr(self.options.operator.to_binary()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::{Constraint, OrderClause, RelationKeys, TableAlias};
    use crate::sql::dialect::Dialect;
    use crate::sql::expr::table_star;
    use crate::sql::query::TableRef;
    use crate::sql::test_utils::validate_sql;

    fn descriptor(kind: RelationKind) -> RelationDescriptor {
        RelationDescriptor {
            name: "contacts".into(),
            kind,
            parent: "customers".into(),
            target: TableAlias::new("contacts", None),
            related_model: "Contact".into(),
            keys: RelationKeys {
                parent: "id".into(),
                related: "customer_id".into(),
            },
            related_primary_key: "id".into(),
            constraints: vec![],
            orders: vec![],
        }
    }

    fn base() -> Query {
        Query::new()
            .select(vec![table_star("customers")])
            .from(TableRef::new("customers"))
    }

    #[test]
    fn test_plain_left_join() {
        let d = descriptor(RelationKind::HasMany);
        let sql = JoinBuilder::new(&d, JoinOptions::default())
            .apply(base())
            .to_sql(Dialect::MySql);
        assert!(sql.ends_with(
            "LEFT JOIN `contacts` ON `customers`.`id` = `contacts`.`customer_id`"
        ));
        validate_sql(&sql, Dialect::MySql).unwrap();
    }

    #[test]
    fn test_wheres_are_grouped() {
        let mut d = descriptor(RelationKind::HasMany);
        d.constraints = vec![
            Constraint::basic("type", Operator::Eq, "billing"),
            Constraint::basic("type", Operator::Eq, "shipping").or(),
        ];
        let on = JoinBuilder::new(&d, JoinOptions::default()).on_condition();
        assert_eq!(
            on.to_tokens().serialize(Dialect::Postgres),
            "\"customers\".\"id\" = \"contacts\".\"customer_id\" \
             AND (\"contacts\".\"type\" = 'billing' OR \"contacts\".\"type\" = 'shipping')"
        );
    }

    #[test]
    fn test_operator_and_join_type() {
        let d = descriptor(RelationKind::HasOne);
        let options = JoinOptions::default()
            .operator(Operator::Ne)
            .join_type(JoinType::Inner);
        let sql = JoinBuilder::new(&d, options).apply(base()).to_sql(Dialect::Sqlite);
        assert!(sql.contains("INNER JOIN \"contacts\" ON \"customers\".\"id\" <> \"contacts\".\"customer_id\""));
    }

    #[test]
    fn test_as_where_copies_key_condition() {
        let d = descriptor(RelationKind::HasMany);
        let sql = JoinBuilder::new(&d, JoinOptions::default().as_where(true))
            .apply(base())
            .to_sql(Dialect::Postgres);
        assert!(sql.ends_with("WHERE \"customers\".\"id\" = \"contacts\".\"customer_id\""));
    }

    #[test]
    fn test_has_many_direction_adds_window() {
        let d = descriptor(RelationKind::HasMany);
        let sql = JoinBuilder::new(&d, JoinOptions::default().direction(SortDir::Desc))
            .apply(base())
            .to_sql(Dialect::Postgres);
        assert!(sql.contains("AND \"contacts\".\"id\" = (SELECT MAX(\"contacts\".\"id\") FROM \"contacts\""));
        validate_sql(&sql, Dialect::Postgres).unwrap();
    }

    #[test]
    fn test_direction_ignored_for_belongs_to() {
        let mut d = descriptor(RelationKind::BelongsTo);
        d.keys = RelationKeys {
            parent: "contact_id".into(),
            related: "id".into(),
        };
        let on = JoinBuilder::new(&d, JoinOptions::default().direction(SortDir::Desc)).on_condition();
        assert_eq!(
            on.to_tokens().serialize(Dialect::MySql),
            "`contacts`.`id` = `customers`.`contact_id`"
        );
    }

    #[test]
    fn test_ordered_has_one_routes_to_subquery() {
        let mut d = descriptor(RelationKind::HasOne);
        d.orders = vec![OrderClause::new("created_at", SortDir::Desc)];
        let sql = JoinBuilder::new(&d, JoinOptions::default())
            .apply(base())
            .to_sql(Dialect::MySql);
        assert!(sql.contains("`contacts`.`created_at` = (SELECT MAX(`contacts`.`created_at`)"));
        validate_sql(&sql, Dialect::MySql).unwrap();
    }
}
