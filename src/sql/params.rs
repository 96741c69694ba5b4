//! Inline bindings into `?`-placeholder SQL.
//!
//! Produces a single SQL string suitable for embedding a query inside
//! another one, or for logging. Values are rendered through the dialect's
//! literal escaping, never spliced raw.

use super::dialect::Dialect;
use super::expr::Literal;
use super::token::render_literal;
use crate::error::BindingError;

/// Replace every `?` placeholder outside quoted regions with the next
/// binding, escaped as a literal for `dialect`.
///
/// Single-quoted strings, double-quoted and backtick-quoted identifiers
/// are skipped. Doubled quote characters stay inside the region; on MySQL
/// a backslash also escapes the following character.
pub fn sql_with_bindings(
    sql: &str,
    bindings: &[Literal],
    dialect: Dialect,
) -> Result<String, BindingError> {
    let positions = placeholder_positions(sql, dialect);
    if positions.len() != bindings.len() {
        return Err(BindingError::CountMismatch {
            placeholders: positions.len(),
            bindings: bindings.len(),
        });
    }

    let mut out = String::with_capacity(sql.len());
    let mut last = 0;
    for (pos, value) in positions.iter().zip(bindings) {
        out.push_str(&sql[last..*pos]);
        out.push_str(&render_literal(value, dialect));
        last = pos + 1;
    }
    out.push_str(&sql[last..]);
    Ok(out)
}

/// Byte offsets of unquoted `?` characters.
fn placeholder_positions(sql: &str, dialect: Dialect) -> Vec<usize> {
    let backslash_escapes = dialect == Dialect::MySql;
    let mut positions = Vec::new();
    let mut quote: Option<char> = None;
    let mut chars = sql.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        match quote {
            Some(q) => {
                if backslash_escapes && ch == '\\' {
                    chars.next();
                } else if ch == q {
                    if matches!(chars.peek(), Some((_, next)) if *next == q) {
                        chars.next();
                    } else {
                        quote = None;
                    }
                }
            }
            None => match ch {
                '\'' | '"' | '`' => quote = Some(ch),
                '?' => positions.push(idx),
                _ => {}
            },
        }
    }

    positions
}
