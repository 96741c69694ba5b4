//! Free-text search over configured columns.
//!
//! Each configured field contributes one condition; the conditions of a
//! single search are ORed together and the group is ANDed onto the query.
//!
//! ```text
//! local field:     table.column <op> '<template with {{search}} replaced>'
//! relation field:  EXISTS (SELECT * FROM related WHERE <correlation> AND related.column LIKE 'text%')
//! ```

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::ConfigurationError;
use crate::join::correlated_subquery;
use crate::relation::{Operator, QualifiedColumn, RelationPathResolver};
use crate::schema::{ModelDefinition, RelationMetadata};
use crate::sql::expr::{bind, exists, Expr, ExprExt};
use crate::sql::query::Query;

/// Placeholder substituted with the search text in value templates.
pub const SEARCH_PLACEHOLDER: &str = "{{search}}";

fn default_operator() -> Operator {
    Operator::Like
}

fn default_template() -> String {
    format!("%{SEARCH_PLACEHOLDER}%")
}

// ============================================================================
// Configuration
// ============================================================================

/// A compiled regex that remembers its source, so configuration stays
/// comparable and serializable.
#[derive(Clone)]
pub struct SearchPattern {
    source: String,
    regex: Regex,
}

impl SearchPattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            source: source.to_string(),
            regex: Regex::new(source)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl fmt::Debug for SearchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SearchPattern").field(&self.source).finish()
    }
}

impl PartialEq for SearchPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Serialize for SearchPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for SearchPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        SearchPattern::new(&source).map_err(serde::de::Error::custom)
    }
}

/// One searchable column.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "RawSearchField")]
pub struct SearchField {
    /// Column on the model's table, or on the related table when
    /// `relation` is set.
    pub column: String,
    pub operator: Operator,
    /// Value compared against; `{{search}}` is replaced by the text.
    /// Relation fields ignore both `operator` and `value` and always use
    /// `LIKE 'text%'`.
    pub value: String,
    /// Relation path whose table holds `column`.
    pub relation: Option<String>,
    /// The field is skipped unless the search text matches.
    pub regex: Option<SearchPattern>,
}

/// A bare string is shorthand for a column with every default.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSearchField {
    Column(String),
    Full {
        column: String,
        #[serde(default = "default_operator")]
        operator: Operator,
        #[serde(default = "default_template")]
        value: String,
        #[serde(default)]
        relation: Option<String>,
        #[serde(default)]
        regex: Option<SearchPattern>,
    },
}

impl From<RawSearchField> for SearchField {
    fn from(raw: RawSearchField) -> Self {
        match raw {
            RawSearchField::Column(column) => SearchField::new(&column),
            RawSearchField::Full {
                column,
                operator,
                value,
                relation,
                regex,
            } => SearchField {
                column,
                operator,
                value,
                relation,
                regex,
            },
        }
    }
}

impl SearchField {
    pub fn new(column: &str) -> Self {
        Self {
            column: column.into(),
            operator: default_operator(),
            value: default_template(),
            relation: None,
            regex: None,
        }
    }

    pub fn operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    pub fn value(mut self, template: &str) -> Self {
        self.value = template.into();
        self
    }

    pub fn relation(mut self, path: &str) -> Self {
        self.relation = Some(path.into());
        self
    }

    pub fn regex(mut self, pattern: &str) -> Result<Self, ConfigurationError> {
        let pattern =
            SearchPattern::new(pattern).map_err(|source| ConfigurationError::InvalidPattern {
                field: self.column.clone(),
                source,
            })?;
        self.regex = Some(pattern);
        Ok(self)
    }

    /// Whether this field takes part in a search for `text`.
    pub fn applies_to(&self, text: &str) -> bool {
        self.regex.as_ref().map_or(true, |p| p.is_match(text))
    }

    /// The template with the search text substituted.
    pub fn render_value(&self, text: &str) -> String {
        self.value.replace(SEARCH_PLACEHOLDER, text)
    }
}

/// Searchable fields of a model, in the order their conditions are emitted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SearchConfiguration {
    #[serde(default)]
    pub fields: Vec<SearchField>,
}

impl SearchConfiguration {
    pub fn new(fields: Vec<SearchField>) -> Self {
        Self { fields }
    }

    pub fn field(mut self, field: SearchField) -> Self {
        self.fields.push(field);
        self
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Builds the search condition for one model.
pub struct SearchEngine<'a> {
    metadata: &'a dyn RelationMetadata,
    model: &'a ModelDefinition,
    /// How the model's table is referenced in the outer query.
    reference: &'a str,
}

impl<'a> SearchEngine<'a> {
    pub fn new(
        metadata: &'a dyn RelationMetadata,
        model: &'a ModelDefinition,
        reference: &'a str,
    ) -> Self {
        Self {
            metadata,
            model,
            reference,
        }
    }

    /// The ORed, parenthesized condition for `text`.
    ///
    /// `Ok(None)` when the trimmed text is empty or no field applies.
    pub fn condition(&self, text: &str) -> Result<Option<Expr>, ConfigurationError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let config = self
            .model
            .search
            .as_ref()
            .ok_or_else(|| ConfigurationError::MissingSearchConfiguration(self.model.name.clone()))?;

        let mut group: Option<Expr> = None;
        let mut matched = 0usize;
        for field in config.fields.iter().filter(|f| f.applies_to(text)) {
            let condition = match &field.relation {
                Some(path) => self.relation_condition(field, path, text)?,
                None => self.local_condition(field, text),
            };
            matched += 1;
            group = Some(match group {
                Some(existing) => existing.or(condition),
                None => condition,
            });
        }

        debug!(
            model = %self.model.name,
            fields = config.fields.len(),
            matched,
            "search condition built"
        );
        Ok(group.map(ExprExt::paren))
    }

    /// AND the search condition onto `query`.
    pub fn apply(&self, query: Query, text: &str) -> Result<Query, ConfigurationError> {
        Ok(match self.condition(text)? {
            Some(condition) => query.filter(condition),
            None => query,
        })
    }

    fn local_condition(&self, field: &SearchField, text: &str) -> Expr {
        QualifiedColumn::parse(&field.column)
            .qualify_if_absent(&self.model.table, self.reference)
            .to_expr()
            .binary(field.operator.to_binary(), bind(field.render_value(text)))
    }

    /// Nested EXISTS subqueries, one per hop, over the bare related tables.
    fn relation_condition(
        &self,
        field: &SearchField,
        path: &str,
        text: &str,
    ) -> Result<Expr, ConfigurationError> {
        let mut hops =
            RelationPathResolver::new(self.metadata).resolve(self.model, self.reference, path)?;

        // Inside the subqueries each hop is correlated to the previous
        // hop's subquery reference, not to its join alias.
        for i in 1..hops.len() {
            hops[i].parent = hops[i - 1].subquery_reference();
        }

        let Some(last) = hops.last() else {
            return Err(ConfigurationError::UnknownRelation {
                model: self.model.name.clone(),
                relation: path.to_string(),
            });
        };
        let mut condition = QualifiedColumn::parse(&field.column)
            .qualify_if_absent(&last.target.name, &last.subquery_reference())
            .to_expr()
            .like(bind(format!("{text}%")));

        for hop in hops.iter().rev() {
            condition = exists(correlated_subquery(hop).select_star().filter(condition));
        }
        Ok(condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::Constraint;
    use crate::schema::{Catalog, RelationDefinition};
    use crate::sql::dialect::Dialect;
    use crate::sql::expr::table_star;
    use crate::sql::query::TableRef;
    use crate::sql::test_utils::validate_sql;
    use tracing_test::traced_test;

    fn catalog(search: Option<SearchConfiguration>) -> Catalog {
        let mut customer = ModelDefinition::new("Customer", "customers")
            .relation("contacts", RelationDefinition::has_many("Contact"))
            .relation("orders", RelationDefinition::has_many("Order"));
        customer.search = search;
        Catalog::new()
            .with_model(customer)
            .with_model(
                ModelDefinition::new("Contact", "contacts")
                    .relation("region", RelationDefinition::belongs_to("Region")),
            )
            .with_model(ModelDefinition::new("Region", "regions"))
            .with_model(ModelDefinition::new("Order", "orders").relation(
                "lines",
                RelationDefinition::has_many("OrderLine").constrain(Constraint::is_null("deleted_at")),
            ))
            .with_model(ModelDefinition::new("OrderLine", "order_lines"))
    }

    fn render(catalog: &Catalog, text: &str) -> Option<String> {
        let customer = catalog.model("Customer").unwrap();
        SearchEngine::new(catalog, customer, "customers")
            .condition(text)
            .unwrap()
            .map(|e| e.to_tokens().serialize(Dialect::MySql))
    }

    #[test]
    fn test_local_fields_or_together() {
        let catalog = catalog(Some(SearchConfiguration::new(vec![
            SearchField::new("name"),
            SearchField::new("code").operator(Operator::Eq).value("{{search}}"),
        ])));
        assert_eq!(
            render(&catalog, "  acme ").unwrap(),
            "(`customers`.`name` LIKE '%acme%' OR `customers`.`code` = 'acme')"
        );
    }

    #[test]
    fn test_empty_text_is_noop() {
        let catalog = catalog(None);
        assert_eq!(render(&catalog, "   "), None);
    }

    #[test]
    fn test_missing_configuration() {
        let catalog = catalog(None);
        let customer = catalog.model("Customer").unwrap();
        let err = SearchEngine::new(&catalog, customer, "customers")
            .condition("acme")
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingSearchConfiguration(m) if m == "Customer"));
    }

    #[test]
    fn test_regex_gates_fields() {
        let catalog = catalog(Some(SearchConfiguration::new(vec![
            SearchField::new("name"),
            SearchField::new("id")
                .operator(Operator::Eq)
                .value("{{search}}")
                .regex(r"^\d+$")
                .unwrap(),
        ])));
        assert_eq!(
            render(&catalog, "acme").unwrap(),
            "(`customers`.`name` LIKE '%acme%')"
        );
        assert_eq!(
            render(&catalog, "42").unwrap(),
            "(`customers`.`name` LIKE '%42%' OR `customers`.`id` = '42')"
        );
    }

    #[test]
    fn test_no_matching_field_adds_nothing() {
        let catalog = catalog(Some(SearchConfiguration::new(vec![SearchField::new("id")
            .regex(r"^\d+$")
            .unwrap()])));
        assert_eq!(render(&catalog, "acme"), None);
    }

    #[test]
    fn test_relation_field_uses_prefix_match() {
        let catalog = catalog(Some(SearchConfiguration::new(vec![
            SearchField::new("email").relation("contacts"),
        ])));
        assert_eq!(
            render(&catalog, "ab").unwrap(),
            "(EXISTS (SELECT * FROM `contacts` WHERE `customers`.`id` = `contacts`.`customer_id` \
             AND `contacts`.`email` LIKE 'ab%'))"
        );
    }

    #[test]
    fn test_relation_field_ignores_configured_operator() {
        let catalog = catalog(Some(SearchConfiguration::new(vec![SearchField::new("email")
            .relation("contacts")
            .operator(Operator::Eq)
            .value("{{search}}")])));
        let sql = render(&catalog, "ab").unwrap();
        assert!(sql.ends_with("`contacts`.`email` LIKE 'ab%'))"));
    }

    #[test]
    fn test_self_referencing_relation_field() {
        let mut category = ModelDefinition::new("Category", "categories").relation(
            "children",
            RelationDefinition::has_many("Category")
                .foreign_key("parent_id")
                .alias("children"),
        );
        category.search = Some(SearchConfiguration::new(vec![
            SearchField::new("name").relation("children.children"),
        ]));
        let catalog = Catalog::new().with_model(category);
        let category = catalog.model("Category").unwrap();
        let sql = SearchEngine::new(&catalog, category, "categories")
            .condition("tools")
            .unwrap()
            .unwrap()
            .to_tokens()
            .serialize(Dialect::MySql);
        assert_eq!(
            sql,
            "(EXISTS (SELECT * FROM `categories` AS `children_sub` \
             WHERE `categories`.`id` = `children_sub`.`parent_id` \
             AND EXISTS (SELECT * FROM `categories` \
             WHERE `children_sub`.`id` = `categories`.`parent_id` \
             AND `categories`.`name` LIKE 'tools%')))"
        );
    }

    #[test]
    fn test_nested_relation_field() {
        let catalog = catalog(Some(SearchConfiguration::new(vec![
            SearchField::new("sku").relation("orders.lines"),
        ])));
        let sql = render(&catalog, "X1").unwrap();
        assert_eq!(
            sql,
            "(EXISTS (SELECT * FROM `orders` WHERE `customers`.`id` = `orders`.`customer_id` \
             AND EXISTS (SELECT * FROM `order_lines` WHERE `orders`.`id` = `order_lines`.`order_id` \
             AND `order_lines`.`deleted_at` IS NULL AND `order_lines`.`sku` LIKE 'X1%')))"
        );
    }

    #[test]
    fn test_unknown_relation_is_configuration_error() {
        let catalog = catalog(Some(SearchConfiguration::new(vec![
            SearchField::new("email").relation("contcats"),
        ])));
        let customer = catalog.model("Customer").unwrap();
        let err = SearchEngine::new(&catalog, customer, "customers")
            .condition("ab")
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownRelation { .. }));
    }

    #[test]
    fn test_apply_ands_separate_searches() {
        let catalog = catalog(Some(SearchConfiguration::new(vec![
            SearchField::new("name"),
            SearchField::new("city"),
        ])));
        let customer = catalog.model("Customer").unwrap();
        let engine = SearchEngine::new(&catalog, customer, "customers");
        let query = Query::new()
            .select(vec![table_star("customers")])
            .from(TableRef::new("customers"));
        let query = engine.apply(query, "a").unwrap();
        let query = engine.apply(query, "b").unwrap();
        let (sql, params) = query.to_sql_with_params(Dialect::Postgres);
        assert!(sql.ends_with(
            "WHERE (\"customers\".\"name\" LIKE $1 OR \"customers\".\"city\" LIKE $2) \
             AND (\"customers\".\"name\" LIKE $3 OR \"customers\".\"city\" LIKE $4)"
        ));
        assert_eq!(params.len(), 4);
        validate_sql(&sql, Dialect::Postgres).unwrap();
    }

    #[test]
    #[traced_test]
    fn test_logs_matched_fields() {
        let catalog = catalog(Some(SearchConfiguration::new(vec![SearchField::new("name")])));
        render(&catalog, "acme");
        assert!(logs_contain("search condition built"));
    }

    #[test]
    fn test_deserialize_shorthand_and_full_fields() {
        let config: SearchConfiguration = toml::from_str(
            r#"
fields = [
    "name",
    { column = "id", operator = "=", value = "{{search}}", regex = '^\d+$' },
    { column = "email", relation = "contacts" },
]
"#,
        )
        .unwrap();
        assert_eq!(config.fields[0], SearchField::new("name"));
        assert_eq!(config.fields[1].operator, Operator::Eq);
        assert_eq!(config.fields[1].regex.as_ref().unwrap().as_str(), r"^\d+$");
        assert_eq!(config.fields[2].relation.as_deref(), Some("contacts"));

        let err = toml::from_str::<SearchConfiguration>(r#"fields = [{ column = "id", regex = "(" }]"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_invalid_pattern_names_field() {
        let err = SearchField::new("id").regex("(").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidPattern { field, .. } if field == "id"));
    }
}
