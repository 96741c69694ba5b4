//! Flat token representation of rendered SQL.
//!
//! Builders write tokens into a [`TokenStream`]; the stream is serialized
//! once per dialect. Bound values stay as [`Token::Param`] until
//! serialization decides whether they become placeholders or escaped
//! literals.

use super::dialect::{Dialect, SqlDialect};
use super::expr::Literal;

/// One element of a SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Reserved word or operator, emitted verbatim (`SELECT`, `ORDER BY`, `<>`).
    Keyword(&'static str),

    /// `ILIKE` / `NOT ILIKE`, degraded to `LIKE` where the dialect lacks it.
    ILike { negated: bool },

    /// Single punctuation character: `,` `.` `*` `(` `)`.
    Punct(char),

    Space,
    Newline,
    Indent(usize),

    /// Table, column or alias name, quoted per dialect.
    Ident(String),

    /// Literal that is always inlined.
    Literal(Literal),

    /// Bound value: a placeholder in [`TokenStream::serialize_with_params`],
    /// an escaped literal in [`TokenStream::serialize`].
    Param(Literal),

    /// Function name, rendered upper-cased.
    FunctionName(String),

    /// Trusted SQL fragment from model configuration, emitted unescaped.
    /// User input must go through [`Token::Param`] instead.
    Raw(String),
}

impl Token {
    fn write_to(&self, out: &mut String, dialect: Dialect) {
        match self {
            Token::Keyword(word) => out.push_str(word),
            Token::ILike { negated } => {
                if *negated {
                    out.push_str("NOT ");
                }
                out.push_str(if dialect.supports_ilike() { "ILIKE" } else { "LIKE" });
            }
            Token::Punct(ch) => out.push(*ch),
            Token::Space => out.push(' '),
            Token::Newline => out.push('\n'),
            Token::Indent(depth) => {
                for _ in 0..*depth {
                    out.push_str("  ");
                }
            }
            Token::Ident(name) => out.push_str(&dialect.quote_identifier(name)),
            Token::Literal(value) | Token::Param(value) => {
                out.push_str(&render_literal(value, dialect))
            }
            Token::FunctionName(name) => out.push_str(&name.to_uppercase()),
            Token::Raw(sql) => out.push_str(sql),
        }
    }

    /// Render this token alone.
    pub fn serialize(&self, dialect: Dialect) -> String {
        let mut out = String::new();
        self.write_to(&mut out, dialect);
        out
    }
}

/// Render a value as an escaped SQL literal for `dialect`.
pub fn render_literal(value: &Literal, dialect: Dialect) -> String {
    match value {
        Literal::Int(n) => n.to_string(),
        // SQL has no NaN or infinity literal.
        Literal::Float(f) if !f.is_finite() => "NULL".into(),
        Literal::Float(f) => ryu::Buffer::new().format(*f).to_string(),
        Literal::String(s) => dialect.quote_string(s),
        Literal::Bool(b) => dialect.format_bool(*b).into(),
        Literal::Null => "NULL".into(),
    }
}

/// Tokens of one statement, in output order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    pub fn keyword(&mut self, word: &'static str) -> &mut Self {
        self.push(Token::Keyword(word))
    }

    pub fn ident(&mut self, name: &str) -> &mut Self {
        self.push(Token::Ident(name.to_string()))
    }

    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }

    pub fn newline(&mut self) -> &mut Self {
        self.push(Token::Newline)
    }

    pub fn indent(&mut self, depth: usize) -> &mut Self {
        self.push(Token::Indent(depth))
    }

    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Punct(','))
    }

    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::Punct('('))
    }

    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::Punct(')'))
    }

    /// `keyword ` with a trailing space, the common clause opener.
    pub fn keyword_space(&mut self, word: &'static str) -> &mut Self {
        self.keyword(word).space()
    }

    /// Write `items` separated by `, `.
    pub fn comma_separated<T>(
        &mut self,
        items: &[T],
        mut write: impl FnMut(&T, &mut TokenStream),
    ) -> &mut Self {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.comma().space();
            }
            write(item, self);
        }
        self
    }

    /// Bound values in the order they appear.
    pub fn params(&self) -> Vec<Literal> {
        self.tokens
            .iter()
            .filter_map(|t| match t {
                Token::Param(value) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    /// Render with bound values inlined as escaped literals.
    pub fn serialize(&self, dialect: Dialect) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            token.write_to(&mut out, dialect);
        }
        out
    }

    /// Render with positional placeholders, returning the bound values in
    /// placeholder order.
    pub fn serialize_with_params(&self, dialect: Dialect) -> (String, Vec<Literal>) {
        let mut out = String::new();
        let mut params = Vec::new();

        for token in &self.tokens {
            if let Token::Param(value) = token {
                out.push_str(&dialect.placeholder(params.len()));
                params.push(value.clone());
            } else {
                token.write_to(&mut out, dialect);
            }
        }

        (out, params)
    }
}
