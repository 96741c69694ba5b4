//! Has-one relations with an ORDER BY join the latest/earliest related row.

use tracing::warn;

use super::columns::JoinColumns;
use super::window::{aggregate, correlated_subquery};
use crate::relation::{combine_grouped, OrderClause, RelationDescriptor};
use crate::sql::expr::{BinaryOperator, Expr, ExprExt};

/// Builds the ON condition of an ordered has-one join.
pub struct OrderedHasOneJoiner<'a> {
    descriptor: &'a RelationDescriptor,
}

impl<'a> OrderedHasOneJoiner<'a> {
    pub fn new(descriptor: &'a RelationDescriptor) -> Self {
        Self { descriptor }
    }

    /// The order column driving MIN/MAX. Only the first order is used.
    pub fn order(&self) -> Option<&'a OrderClause> {
        let orders = &self.descriptor.orders;
        if orders.len() > 1 {
            warn!(
                relation = %self.descriptor.name,
                orders = orders.len(),
                "has-one relation defines several orders; only the first is used"
            );
        }
        orders.first()
    }

    /// `first = second AND <wheres> AND alias.col = (SELECT MIN|MAX(t.col) ...)`
    ///
    /// Without an order this is a plain key join.
    pub fn on_condition(&self, operator: BinaryOperator) -> Expr {
        let d = self.descriptor;
        let target = &d.target;

        let mut on = JoinColumns::resolve(d).to_expr(operator);
        if let Some(wheres) = combine_grouped(&d.constraints, &target.name, &target.alias) {
            on = on.and(wheres);
        }

        let Some(order) = self.order() else {
            return on;
        };

        let outer = order.column.qualify_if_absent(&target.name, &target.alias);
        let inner = order
            .column
            .qualify_if_absent(&target.name, &d.subquery_reference());
        let subquery = correlated_subquery(d)
            .select(vec![aggregate(inner.to_expr(), order.direction)]);

        on.and(outer.to_expr().eq(subquery))
    }
}
