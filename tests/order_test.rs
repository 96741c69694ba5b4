//! Configured ordering through the query facade.

mod common;

use common::{catalog, validate_sql};
use insta::assert_snapshot;
use related_plus::error::ConfigurationError;
use related_plus::join::JoinOptions;
use related_plus::{Dialect, RelatedQuery};

fn order_by(field: &str, direction: &str) -> String {
    let catalog = catalog();
    RelatedQuery::new(&catalog, "Customer")
        .unwrap()
        .order_by_custom(field, direction)
        .unwrap()
        .to_sql(Dialect::MySql)
}

#[test]
fn test_blank_request_uses_defaults() {
    let sql = order_by("", "");
    assert_snapshot!(sql, @r"
    SELECT
      `customers`.*
    FROM `customers`
    WHERE `customers`.`active` = 1
    ORDER BY `customers`.`name` ASC
    ");
    validate_sql(&sql, Dialect::MySql);
}

#[test]
fn test_order_scope_is_replaced() {
    let sql = order_by("name", "DESC");
    assert!(sql.ends_with("ORDER BY `customers`.`name` DESC"));
    assert!(!sql.contains("ASC"));
}

#[test]
fn test_invalid_direction_falls_back() {
    let sql = order_by("name", "sideways");
    assert!(sql.ends_with("ORDER BY `customers`.`name` ASC"));
}

#[test]
fn test_unknown_field_falls_back() {
    let sql = order_by("shoe_size", "desc");
    assert!(sql.ends_with("ORDER BY `customers`.`name` DESC"));
}

#[test]
fn test_multi_column_field() {
    let sql = order_by("full", "asc");
    assert!(sql.ends_with("ORDER BY `customers`.`last_name` ASC, `customers`.`first_name` ASC"));
}

#[test]
fn test_related_column_joins_relation() {
    let sql = order_by("contact", "desc");
    assert_snapshot!(sql, @r"
    SELECT
      `customers`.*
    FROM `customers`
    LEFT JOIN `contacts` ON `contacts`.`id` = `customers`.`contact_id`
    WHERE `customers`.`active` = 1
    ORDER BY `contacts`.`name` DESC
    ");
    validate_sql(&sql, Dialect::MySql);
}

#[test]
fn test_nested_relation_column_joins_every_hop() {
    let catalog = catalog();
    let (sql, _) = RelatedQuery::new(&catalog, "Customer")
        .unwrap()
        .order_by_custom("region", "asc")
        .unwrap()
        .to_sql_with_params(Dialect::Postgres);

    assert_snapshot!(sql, @r#"
    SELECT
      "customers".*
    FROM "customers"
    LEFT JOIN "contacts" ON "contacts"."id" = "customers"."contact_id"
    LEFT JOIN "regions" ON "regions"."id" = "contacts"."region_id"
    WHERE "customers"."active" = $1
    ORDER BY "regions"."name" ASC
    "#);
    validate_sql(&sql, Dialect::Postgres);
}

#[test]
fn test_existing_join_is_reused() {
    let catalog = catalog();
    let query = RelatedQuery::new(&catalog, "Customer")
        .unwrap()
        .model_join("contact", JoinOptions::default())
        .unwrap()
        .order_by_custom("contact", "asc")
        .unwrap();
    assert_eq!(query.query().joins.len(), 1);
}

#[test]
fn test_eager_loaded_relation_is_not_joined() {
    let catalog = catalog();
    let query = RelatedQuery::new(&catalog, "Customer")
        .unwrap()
        .with("contact")
        .order_by_custom("contact", "asc")
        .unwrap();
    assert!(query.query().joins.is_empty());
}

#[test]
fn test_missing_configuration_is_an_error() {
    let catalog = catalog();
    let err = RelatedQuery::new(&catalog, "Order")
        .unwrap()
        .order_by_custom("x", "y")
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::MissingOrderConfiguration(ref m) if m == "Order"));
    assert_eq!(err.to_string(), "Model 'Order' has no order configuration");
}

#[test]
fn test_order_by_with_loads_and_joins() {
    let catalog = catalog();
    let query = RelatedQuery::new(&catalog, "Customer")
        .unwrap()
        .order_by_with("region")
        .unwrap();

    assert_eq!(query.eager_loads(), ["contact.region"]);
    assert!(query.has_join("contacts"));
    assert!(query.has_join("regions"));
    // No ORDER BY beyond the global scope.
    assert!(query.to_sql(Dialect::MySql).ends_with("ORDER BY `customers`.`name` ASC"));
}

#[test]
fn test_order_by_with_without_configuration_is_noop() {
    let catalog = catalog();
    let query = RelatedQuery::new(&catalog, "Order")
        .unwrap()
        .order_by_with("anything")
        .unwrap();
    assert!(query.eager_loads().is_empty());
    assert!(query.query().joins.is_empty());
}

#[test]
fn test_orders_accumulate_across_calls() {
    let catalog = catalog();
    let sql = RelatedQuery::new(&catalog, "Customer")
        .unwrap()
        .order_by_custom("contact", "asc")
        .unwrap()
        .order_by_custom("name", "desc")
        .unwrap()
        .to_sql(Dialect::Sqlite);
    assert!(sql.ends_with("ORDER BY \"contacts\".\"name\" ASC, \"customers\".\"name\" DESC"));
    validate_sql(&sql, Dialect::Sqlite);
}
