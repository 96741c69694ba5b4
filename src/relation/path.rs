//! Dotted relation paths (`customer.contact`) resolved hop by hop.

use super::descriptor::RelationDescriptor;
use crate::error::ConfigurationError;
use crate::schema::{ModelDefinition, RelationMetadata};

/// Walks a relation path from a root model.
pub struct RelationPathResolver<'a> {
    metadata: &'a dyn RelationMetadata,
}

impl<'a> RelationPathResolver<'a> {
    pub fn new(metadata: &'a dyn RelationMetadata) -> Self {
        Self { metadata }
    }

    /// Resolve every segment of `path`, starting at `root` referenced as
    /// `root_ref`. Each hop's parent is the previous hop's target alias.
    pub fn resolve(
        &self,
        root: &ModelDefinition,
        root_ref: &str,
        path: &str,
    ) -> Result<Vec<RelationDescriptor>, ConfigurationError> {
        let mut hops = Vec::new();
        let mut model = root;
        let mut parent_ref = root_ref.to_string();

        for segment in path.split('.') {
            let descriptor =
                RelationDescriptor::resolve(self.metadata, model, &parent_ref, segment.trim())?;

            model = self
                .metadata
                .model(&descriptor.related_model)
                .ok_or_else(|| ConfigurationError::UnknownModel(descriptor.related_model.clone()))?;
            parent_ref = descriptor.target.alias.clone();
            hops.push(descriptor);
        }

        Ok(hops)
    }
}
