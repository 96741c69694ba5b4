//! Rendering styles shared between dialects.
//!
//! A dialect is mostly a choice among these; the concrete dialect types
//! only pick a variant of each.

use super::super::token::{Token, TokenStream};

/// Identifier quote characters. The closing character is doubled inside
/// the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentQuote {
    /// `"name"` (ANSI: Postgres, SQLite)
    Double,
    /// `` `name` `` (MySQL)
    Backtick,
    /// `[name]` (SQL Server)
    Bracket,
}

impl IdentQuote {
    fn delimiters(self) -> (char, char) {
        match self {
            IdentQuote::Double => ('"', '"'),
            IdentQuote::Backtick => ('`', '`'),
            IdentQuote::Bracket => ('[', ']'),
        }
    }

    pub fn quote(self, ident: &str) -> String {
        let (open, close) = self.delimiters();
        let mut out = String::with_capacity(ident.len() + 2);
        out.push(open);
        for ch in ident.chars() {
            if ch == close {
                out.push(close);
            }
            out.push(ch);
        }
        out.push(close);
        out
    }
}

/// Single-quoted string literal with `''` escaping.
///
/// `backslash` additionally doubles backslashes, for servers that treat
/// them as escapes (MySQL without `NO_BACKSLASH_ESCAPES`; the output is
/// valid in both modes). `national` adds the `N` prefix.
pub fn quote_string(s: &str, backslash: bool, national: bool) -> String {
    let mut out = String::with_capacity(s.len() + 3);
    if national {
        out.push('N');
    }
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\'' => out.push_str("''"),
            '\\' if backslash => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// How booleans are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolStyle {
    /// `true` / `false`
    Keyword,
    /// `1` / `0`
    Numeric,
}

impl BoolStyle {
    pub fn format(self, b: bool) -> &'static str {
        match (self, b) {
            (BoolStyle::Keyword, true) => "true",
            (BoolStyle::Keyword, false) => "false",
            (BoolStyle::Numeric, true) => "1",
            (BoolStyle::Numeric, false) => "0",
        }
    }
}

/// Positional placeholder syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `?`
    Question,
    /// `$1`, `$2`, ...
    Dollar,
    /// `@p1`, `@p2`, ...
    AtP,
}

impl Placeholder {
    /// Placeholder for the value at zero-based `index`.
    pub fn render(self, index: usize) -> String {
        match self {
            Placeholder::Question => "?".into(),
            Placeholder::Dollar => format!("${}", index + 1),
            Placeholder::AtP => format!("@p{}", index + 1),
        }
    }
}

/// Row limiting syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// `LIMIT n OFFSET m`
    LimitOffset,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`, which needs an ORDER BY.
    OffsetFetch,
}

impl Pagination {
    pub fn requires_order_by(self) -> bool {
        self == Pagination::OffsetFetch
    }

    pub fn write(self, ts: &mut TokenStream, limit: Option<u64>, offset: Option<u64>) {
        match self {
            Pagination::LimitOffset => {
                if let Some(limit) = limit {
                    ts.keyword_space("LIMIT").push(count(limit));
                }
                if let Some(offset) = offset {
                    if limit.is_some() {
                        ts.space();
                    }
                    ts.keyword_space("OFFSET").push(count(offset));
                }
            }
            Pagination::OffsetFetch => {
                ts.keyword_space("OFFSET")
                    .push(count(offset.unwrap_or(0)))
                    .space()
                    .keyword("ROWS");
                if let Some(limit) = limit {
                    ts.space()
                        .keyword_space("FETCH NEXT")
                        .push(count(limit))
                        .space()
                        .keyword("ROWS ONLY");
                }
            }
        }
    }
}

fn count(n: u64) -> Token {
    Token::Literal(crate::sql::expr::Literal::Int(
        i64::try_from(n).unwrap_or(i64::MAX),
    ))
}
