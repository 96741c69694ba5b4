//! The pair of columns equated by a relation join.

use crate::relation::{QualifiedColumn, RelationDescriptor, RelationKind};
use crate::sql::expr::{BinaryOperator, Expr, ExprExt};

/// `first <op> second` of a relation join.
///
/// Belongs-to puts the related (owner) key first; has-one/has-many put
/// the parent (local) key first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinColumns {
    pub first: QualifiedColumn,
    pub second: QualifiedColumn,
}

impl JoinColumns {
    /// Columns for the JOIN itself: the related side uses the target alias.
    pub fn resolve(descriptor: &RelationDescriptor) -> Self {
        Self::with_related_table(descriptor, &descriptor.target.alias)
    }

    /// Columns for a correlated subquery over the related table.
    pub fn correlated(descriptor: &RelationDescriptor) -> Self {
        Self::with_related_table(descriptor, &descriptor.subquery_reference())
    }

    fn with_related_table(descriptor: &RelationDescriptor, related_table: &str) -> Self {
        let parent = descriptor.parent_column();
        let related = descriptor.related_column(related_table);
        match descriptor.kind {
            RelationKind::BelongsTo => Self {
                first: related,
                second: parent,
            },
            RelationKind::HasOne | RelationKind::HasMany => Self {
                first: parent,
                second: related,
            },
        }
    }

    pub fn to_expr(&self, op: BinaryOperator) -> Expr {
        self.first.to_expr().binary(op, self.second.to_expr())
    }
}
