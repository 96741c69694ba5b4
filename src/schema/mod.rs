//! Model metadata consumed by the query builders.

mod catalog;
mod model;
pub mod naming;

pub use catalog::{Catalog, ModelCatalog, RelationMetadata, SchemaIntrospector};
pub use model::{GlobalScope, ModelDefinition, RelationDefinition};
