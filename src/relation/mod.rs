//! Relations between models and their resolution into join metadata.

mod column;
mod constraint;
mod descriptor;
mod kind;
mod path;

pub use column::QualifiedColumn;
pub use constraint::{combine, combine_grouped, Connective, Constraint, Operator, OrderClause};
pub use descriptor::{RelationDescriptor, RelationKeys, TableAlias};
pub use kind::RelationKind;
pub use path::RelationPathResolver;
