use serde::{Deserialize, Serialize};

/// Cardinality and key ownership of a relation.
///
/// - `BelongsTo`: the source row holds the foreign key.
/// - `HasOne` / `HasMany`: the related rows hold the foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    BelongsTo,
    HasOne,
    HasMany,
}

impl RelationKind {
    /// Whether the foreign key lives on the source table.
    pub fn owns_foreign_key(self) -> bool {
        matches!(self, RelationKind::BelongsTo)
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RelationKind::BelongsTo => "belongs_to",
            RelationKind::HasOne => "has_one",
            RelationKind::HasMany => "has_many",
        };
        write!(f, "{}", name)
    }
}
