#![forbid(unsafe_code)]

//! Property path segments.
//!
//! A parsed path such as `A.B[2].C` arrives as an ordered token sequence
//! `[Name("A"), Name("B"), Indexer([2]), Name("C")]`. Tokens are immutable;
//! the engine only borrows them.

use std::fmt;

use crate::value::Value;

/// One segment of a property path.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyToken {
    /// Named property access: `.Name`.
    Name(String),
    /// Indexer access with ordered arguments: `[a, b]`.
    Indexer(Vec<Value>),
}

impl PropertyToken {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn indexer<I, V>(args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Indexer(args.into_iter().map(Into::into).collect())
    }

    /// Single integer indexer: `[index]`.
    pub fn index(index: i64) -> Self {
        Self::Indexer(vec![Value::Int(index)])
    }

    /// Single string-key indexer: `["key"]`.
    pub fn key(key: impl Into<String>) -> Self {
        Self::Indexer(vec![Value::Str(key.into())])
    }

    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Indexer(_) => None,
        }
    }

    #[must_use]
    pub fn is_indexer(&self) -> bool {
        matches!(self, Self::Indexer(_))
    }
}

impl fmt::Display for PropertyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Indexer(args) => {
                f.write_str("[")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    match arg {
                        Value::Str(s) => write!(f, "{s:?}")?,
                        other => write!(f, "{other}")?,
                    }
                }
                f.write_str("]")
            }
        }
    }
}

/// Render a token sequence back to dotted path form, for logs.
#[must_use]
pub fn display_path(tokens: &[PropertyToken]) -> String {
    let mut out = String::new();
    for token in tokens {
        if matches!(token, PropertyToken::Name(_)) && !out.is_empty() {
            out.push('.');
        }
        out.push_str(&token.to_string());
    }
    out
}
