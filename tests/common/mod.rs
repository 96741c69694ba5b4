//! Shared fixture: a small customer/contact/order catalog.

#![allow(dead_code)]

use related_plus::Catalog;
use related_plus::Dialect;
use sqlparser::dialect::{MsSqlDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect};
use sqlparser::parser::Parser;

pub const CATALOG: &str = r#"
[models.Customer]
nullable = ["phone", "notes"]

[[models.Customer.global_scopes]]
name = "active"
constraints = [{ kind = "basic", column = "active", value = true }]

[[models.Customer.global_scopes]]
name = "order"
orders = [{ column = "name" }]

[models.Customer.relations.contact]
kind = "belongs_to"
related = "Contact"

[models.Customer.relations.orders]
kind = "has_many"
related = "Order"

[models.Customer.relations.openOrders]
kind = "has_many"
related = "Order"
alias = "open_orders"
wheres = [{ kind = "basic", column = "status", value = "open" }]

[models.Customer.relations.latestOrder]
kind = "has_one"
related = "Order"
alias = "latest_order"
orders = [{ column = "created_at", direction = "desc" }]

[models.Customer.order]
defaults = { field = "name", direction = "asc" }
relations = { contacts = "contact", regions = "contact.region" }
with = { region = "contact.region" }

[models.Customer.order.fields]
name = "customers.name"
full = ["customers.last_name", "customers.first_name"]
contact = "contacts.name"
region = "regions.name"

[models.Customer.search]
fields = [
    "name",
    { column = "id", operator = "=", value = "{{search}}", regex = '^\d+$' },
    { column = "email", relation = "contact" },
]

[models.Contact]

[models.Contact.relations.region]
kind = "belongs_to"
related = "Region"

[models.Region]

[models.Order]

[models.Order.relations.customer]
kind = "belongs_to"
related = "Customer"

[models.Order.relations.lines]
kind = "has_many"
related = "OrderLine"

[models.OrderLine]

[tables]
contacts = ["id", "name", "email"]
regions = ["id", "name"]
"#;

pub fn catalog() -> Catalog {
    Catalog::from_toml_str(CATALOG).expect("fixture catalog parses")
}

/// Parse `sql` with sqlparser for `dialect`.
pub fn validate_sql(sql: &str, dialect: Dialect) {
    let parser_dialect: Box<dyn sqlparser::dialect::Dialect> = match dialect {
        Dialect::MySql => Box::new(MySqlDialect {}),
        Dialect::Postgres => Box::new(PostgreSqlDialect {}),
        Dialect::Sqlite => Box::new(SQLiteDialect {}),
        Dialect::TSql => Box::new(MsSqlDialect {}),
    };

    if let Err(e) = Parser::parse_sql(&*parser_dialect, sql) {
        panic!("Invalid SQL for {:?}: {}\nSQL: {}", dialect, e, sql);
    }
}
