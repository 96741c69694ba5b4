//! Parse rendered SQL with sqlparser to catch syntax errors in tests.

use sqlparser::dialect::{MsSqlDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect};
use sqlparser::parser::Parser;

use super::dialect::Dialect;

pub fn validate_sql(sql: &str, dialect: Dialect) -> Result<(), String> {
    let parser: Box<dyn sqlparser::dialect::Dialect> = match dialect {
        Dialect::MySql => Box::new(MySqlDialect {}),
        Dialect::Postgres => Box::new(PostgreSqlDialect {}),
        Dialect::Sqlite => Box::new(SQLiteDialect {}),
        Dialect::TSql => Box::new(MsSqlDialect {}),
    };

    Parser::parse_sql(parser.as_ref(), sql)
        .map(drop)
        .map_err(|e| format!("{dialect} rejected SQL: {e}\n{sql}"))
}

#[test]
fn test_rejects_garbage() {
    assert!(validate_sql("SELECT * FROM `customers`", Dialect::MySql).is_ok());
    assert!(validate_sql("SELEC * FORM customers", Dialect::Sqlite).is_err());
}
