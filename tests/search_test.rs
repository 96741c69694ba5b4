//! Free-text search, derived tables and binding rendering.

mod common;

use common::{catalog, validate_sql};
use insta::assert_snapshot;
use related_plus::error::{BindingError, ConfigurationError};
use related_plus::expr::{bind, col, table_col, ExprExt, Literal};
use related_plus::query::{Query, TableRef};
use related_plus::sql::sql_with_bindings;
use related_plus::{Dialect, RelatedQuery};

#[test]
fn test_blank_text_is_noop() {
    let catalog = catalog();
    let base = RelatedQuery::new(&catalog, "Customer").unwrap();
    let searched = base.clone().search("   ").unwrap();
    assert_eq!(searched.to_sql(Dialect::MySql), base.to_sql(Dialect::MySql));

    // Never looks at the (missing) configuration.
    let order = RelatedQuery::new(&catalog, "Order").unwrap().search("").unwrap();
    assert!(order.query().where_clause.is_none());
}

#[test]
fn test_text_search_with_relation_field() {
    let catalog = catalog();
    let sql = RelatedQuery::new(&catalog, "Customer")
        .unwrap()
        .search(" acme ")
        .unwrap()
        .to_sql(Dialect::MySql);

    assert_snapshot!(sql, @r"
    SELECT
      `customers`.*
    FROM `customers`
    WHERE (`customers`.`name` LIKE '%acme%' OR EXISTS (SELECT * FROM `contacts` WHERE `contacts`.`id` = `customers`.`contact_id` AND `contacts`.`email` LIKE 'acme%')) AND `customers`.`active` = 1
    ORDER BY `customers`.`name` ASC
    ");
    validate_sql(&sql, Dialect::MySql);
}

#[test]
fn test_regex_field_joins_for_numeric_text() {
    let catalog = catalog();
    let (sql, params) = RelatedQuery::new(&catalog, "Customer")
        .unwrap()
        .without_global_scopes_matching("")
        .search("42")
        .unwrap()
        .to_sql_with_params(Dialect::Postgres);

    assert_snapshot!(sql, @r#"
    SELECT
      "customers".*
    FROM "customers"
    WHERE ("customers"."name" LIKE $1 OR "customers"."id" = $2 OR EXISTS (SELECT * FROM "contacts" WHERE "contacts"."id" = "customers"."contact_id" AND "contacts"."email" LIKE $3))
    "#);
    assert_eq!(
        params,
        vec![
            Literal::String("%42%".into()),
            Literal::String("42".into()),
            Literal::String("42%".into()),
        ]
    );
    validate_sql(&sql, Dialect::Postgres);
}

#[test]
fn test_search_calls_and_together() {
    let catalog = catalog();
    let query = RelatedQuery::new(&catalog, "Customer")
        .unwrap()
        .without_global_scopes_matching("")
        .map(|q| q.filter(col("deleted_at").is_null()))
        .search("a")
        .unwrap()
        .search("b")
        .unwrap();

    let sql = query.to_sql(Dialect::Sqlite);
    assert!(sql.contains("WHERE \"deleted_at\" IS NULL AND (\"customers\".\"name\" LIKE '%a%'"));
    assert!(sql.contains(")) AND (\"customers\".\"name\" LIKE '%b%'"));
    validate_sql(&sql, Dialect::Sqlite);
}

#[test]
fn test_missing_configuration_is_an_error() {
    let catalog = catalog();
    let err = RelatedQuery::new(&catalog, "Order")
        .unwrap()
        .search("acme")
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::MissingSearchConfiguration(ref m) if m == "Order"));
}

#[test]
fn test_quotes_in_search_text_are_escaped() {
    let catalog = catalog();
    let sql = RelatedQuery::new(&catalog, "Customer")
        .unwrap()
        .search("o'neil")
        .unwrap()
        .to_sql(Dialect::Postgres);
    assert!(sql.contains("\"customers\".\"name\" LIKE '%o''neil%'"));
    validate_sql(&sql, Dialect::Postgres);
}

#[test]
fn test_set_subquery_keeps_bindings_live() {
    let catalog = catalog();
    let inner = Query::new()
        .select(vec![col("id"), col("name"), col("active")])
        .from(TableRef::new("customer_archive"))
        .filter(col("region").eq(bind("north")));

    let query = RelatedQuery::new(&catalog, "Customer")
        .unwrap()
        .set_subquery(inner);

    let (sql, params) = query.to_sql_with_params(Dialect::MySql);
    assert_snapshot!(sql, @r"
    SELECT
      `customers`.*
    FROM (SELECT `id`, `name`, `active` FROM `customer_archive` WHERE `region` = ?) AS `customers`
    WHERE `customers`.`active` = ?
    ORDER BY `customers`.`name` ASC
    ");
    assert_eq!(
        params,
        vec![Literal::String("north".into()), Literal::Bool(true)]
    );
    validate_sql(&sql, Dialect::MySql);
}

#[test]
fn test_sql_with_bindings_skips_quoted_placeholders() {
    let sql = "SELECT * FROM t WHERE a = ? AND note = 'why?' AND b = ?";
    let rendered = sql_with_bindings(
        sql,
        &[Literal::Int(5), Literal::String("it's".into())],
        Dialect::Postgres,
    )
    .unwrap();
    assert_eq!(
        rendered,
        "SELECT * FROM t WHERE a = 5 AND note = 'why?' AND b = 'it''s'"
    );

    let err = sql_with_bindings(sql, &[Literal::Int(5)], Dialect::Postgres).unwrap_err();
    assert_eq!(
        err,
        BindingError::CountMismatch {
            placeholders: 2,
            bindings: 1
        }
    );
}

#[test]
fn test_facade_sql_with_bindings() {
    let catalog = catalog();
    let query = RelatedQuery::new(&catalog, "Customer")
        .unwrap()
        .search("acme")
        .unwrap();

    let sql = query.sql_with_bindings(Dialect::MySql).unwrap();
    assert_eq!(sql, query.to_sql(Dialect::MySql));
    assert!(!sql.contains('?'));
    assert!(sql.contains("`contacts`.`email` LIKE 'acme%'"));
}

#[test]
fn test_insert_select_from_search() {
    let catalog = catalog();
    let insert = RelatedQuery::new(&catalog, "Customer")
        .unwrap()
        .without_global_scopes_matching("")
        .map(|q| q.select(vec![table_col("customers", "id")]))
        .search("acme")
        .unwrap()
        .insert_select("flagged_customers", &["customer_id"]);

    let (sql, params) = insert.to_sql_with_params(Dialect::Postgres);
    assert!(sql.starts_with("INSERT INTO \"flagged_customers\" (\"customer_id\")\nSELECT\n  \"customers\".\"id\""));
    assert_eq!(params.len(), 2);
    validate_sql(&sql, Dialect::Postgres);
}
