//! Resolved, query-ready view of one relation hop.

use super::column::QualifiedColumn;
use super::constraint::{Constraint, OrderClause};
use super::kind::RelationKind;
use crate::error::ConfigurationError;
use crate::schema::naming::default_foreign_key;
use crate::schema::{ModelDefinition, RelationMetadata};
use crate::sql::query::TableRef;

/// A table and the name it is referenced by. `alias == name` means no alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableAlias {
    pub name: String,
    pub alias: String,
}

impl TableAlias {
    pub fn new(name: &str, alias: Option<&str>) -> Self {
        let alias = match alias {
            Some(a) if !a.is_empty() => a,
            _ => name,
        };
        Self {
            name: name.into(),
            alias: alias.into(),
        }
    }

    pub fn is_aliased(&self) -> bool {
        self.alias != self.name
    }

    /// `name AS alias`, or just `name`.
    pub fn table_with_alias(&self) -> String {
        if self.is_aliased() {
            format!("{} AS {}", self.name, self.alias)
        } else {
            self.name.clone()
        }
    }

    pub fn table_ref(&self) -> TableRef {
        TableRef::new(&self.name).with_alias(&self.alias)
    }
}

/// Bare key column names on each side of a relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationKeys {
    /// Key on the source side: the foreign key for belongs-to,
    /// the local key otherwise.
    pub parent: String,
    /// Key on the related side: the owner key for belongs-to,
    /// the foreign key otherwise.
    pub related: String,
}

/// Everything needed to join one relation from an already-present table.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationDescriptor {
    pub name: String,
    pub kind: RelationKind,
    /// How the source table is referenced in the query.
    pub parent: String,
    pub target: TableAlias,
    pub related_model: String,
    pub keys: RelationKeys,
    pub related_primary_key: String,
    /// Relation wheres followed by the related model's global scopes.
    pub constraints: Vec<Constraint>,
    pub orders: Vec<OrderClause>,
}

impl RelationDescriptor {
    /// Resolve relation `name` of `parent`, whose table is referenced as
    /// `parent_ref` in the query being built.
    pub fn resolve(
        metadata: &dyn RelationMetadata,
        parent: &ModelDefinition,
        parent_ref: &str,
        name: &str,
    ) -> Result<Self, ConfigurationError> {
        let definition =
            parent
                .relations
                .get(name)
                .ok_or_else(|| ConfigurationError::UnknownRelation {
                    model: parent.name.clone(),
                    relation: name.to_string(),
                })?;

        let related = metadata
            .model(&definition.related)
            .ok_or_else(|| ConfigurationError::UnknownModel(definition.related.clone()))?;

        let alias = definition.alias.as_deref().or(related.alias.as_deref());
        let target = TableAlias::new(&related.table, alias);

        let keys = match definition.kind {
            RelationKind::BelongsTo => RelationKeys {
                parent: definition
                    .foreign_key
                    .clone()
                    .unwrap_or_else(|| default_foreign_key(name, &related.primary_key)),
                related: definition
                    .owner_key
                    .clone()
                    .unwrap_or_else(|| related.primary_key.clone()),
            },
            RelationKind::HasOne | RelationKind::HasMany => RelationKeys {
                parent: definition
                    .local_key
                    .clone()
                    .unwrap_or_else(|| parent.primary_key.clone()),
                related: definition
                    .foreign_key
                    .clone()
                    .unwrap_or_else(|| default_foreign_key(&parent.name, &parent.primary_key)),
            },
        };

        let mut constraints = definition.wheres.clone();
        let mut orders = definition.orders.clone();

        // A has-one is only "ordered" by its own orders; ordering scopes
        // on the related model would otherwise turn every has-one into a
        // latest/earliest join.
        let scopes = related.global_scopes.iter().filter(|scope| {
            definition.kind != RelationKind::HasOne || !scope.name_contains("order")
        });
        for scope in scopes {
            constraints.extend(scope.constraints.iter().cloned());
            orders.extend(scope.orders.iter().cloned());
        }

        Ok(Self {
            name: name.to_string(),
            kind: definition.kind,
            parent: parent_ref.to_string(),
            target,
            related_model: related.name.clone(),
            keys,
            related_primary_key: related.primary_key.clone(),
            constraints,
            orders,
        })
    }

    /// Parent-side key, qualified with the parent reference.
    pub fn parent_column(&self) -> QualifiedColumn {
        QualifiedColumn::new(&self.parent, &self.keys.parent)
    }

    /// Related-side key, qualified with `table` (alias or bare table name).
    pub fn related_column(&self, table: &str) -> QualifiedColumn {
        QualifiedColumn::new(table, &self.keys.related)
    }

    /// How the related table is referenced inside a correlated subquery.
    ///
    /// A relation back to the parent's own table gets `<alias>_sub`, so
    /// the correlation still reaches the outer row.
    pub fn subquery_reference(&self) -> String {
        if self.parent == self.target.name {
            format!("{}_sub", self.target.alias)
        } else {
            self.target.name.clone()
        }
    }

    /// Whether the relation should join the latest/earliest row.
    pub fn is_ordered_has_one(&self) -> bool {
        self.kind == RelationKind::HasOne && !self.orders.is_empty()
    }
}
