//! One related row per parent for has-many joins, without window
//! functions.
//!
//! ```text
//! alias.pk = (SELECT MIN|MAX(t.pk) FROM t WHERE <correlation> AND <wheres>)
//! alias.pk = (SELECT t.pk FROM t WHERE ... ORDER BY <orders>, t.pk LIMIT 1)
//! ```
//!
//! The second form is used when the relation carries its own orders.
//! Self-referencing relations read `FROM t AS <alias>_sub` instead.

use super::columns::JoinColumns;
use crate::relation::{combine_grouped, RelationDescriptor};
use crate::sql::expr::{max, min, table_col, BinaryOperator, Expr, ExprExt};
use crate::sql::query::{OrderByExpr, Query, SortDir, TableRef};

/// `alias.pk = (subquery)` restricting the join to a single related row.
pub fn one_row_condition(descriptor: &RelationDescriptor, direction: SortDir) -> Expr {
    let target = &descriptor.target;
    let inner = descriptor.subquery_reference();
    let inner_pk = table_col(&inner, &descriptor.related_primary_key);

    let mut subquery = correlated_subquery(descriptor);
    if descriptor.orders.is_empty() {
        subquery = subquery.select(vec![aggregate(inner_pk, direction)]);
    } else {
        let orders = descriptor.orders.iter().map(|o| {
            OrderByExpr::with_dir(
                o.column.qualify_if_absent(&target.name, &inner).to_expr(),
                o.direction,
            )
        });
        subquery = subquery
            .select(vec![inner_pk.clone()])
            .order_by(orders.collect())
            .then_order_by(OrderByExpr::with_dir(inner_pk, direction))
            .limit(1);
    }

    table_col(&target.alias, &descriptor.related_primary_key).eq(subquery)
}

/// `FROM related WHERE <join columns> AND <relation wheres>`, correlated
/// to the outer parent row. The related table is referenced as
/// [`RelationDescriptor::subquery_reference`].
pub(crate) fn correlated_subquery(descriptor: &RelationDescriptor) -> Query {
    let target = &descriptor.target;
    let inner = descriptor.subquery_reference();
    let mut query = Query::new()
        .from(TableRef::new(&target.name).with_alias(&inner))
        .filter(JoinColumns::correlated(descriptor).to_expr(BinaryOperator::Eq));

    if let Some(wheres) = combine_grouped(&descriptor.constraints, &target.name, &inner) {
        query = query.filter(wheres);
    }
    query
}

/// MIN for ascending, MAX for descending.
pub(crate) fn aggregate(expr: Expr, direction: SortDir) -> Expr {
    match direction {
        SortDir::Asc => min(expr),
        SortDir::Desc => max(expr),
    }
}
