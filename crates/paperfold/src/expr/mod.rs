//! Tag expressions: the boolean query language over vertex tag sets.
//!
//! Grammar (loosest binding first): `OR`, `AND`, `NOT`, identifier; parentheses
//! group. Keywords are upper case and match whole words only. `TRUE`/`FALSE`
//! are literals. A blank expression matches everything.
//!
//! `validate` is an opt-in pre-check for balanced parentheses and the allowed
//! character set (ASCII letters and digits, `_`, space, parentheses). It does
//! not catch misplaced operators: those evaluate on a best-effort basis (see
//! `tree`) and never panic. Evaluation is more lenient than `validate`: any
//! whitespace separates words and non-ASCII identifiers are matched as given.

mod lexer;
mod tree;

use std::borrow::Borrow;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{BuildHasher, Hash};

use lexer::{tokenize, Token};

pub use tree::{ExprCache, TagExpr};

/// Anything that can answer "does this vertex carry tag `name`?".
pub trait TagLookup {
    fn has_tag(&self, name: &str) -> bool;
}

impl<S, H> TagLookup for HashSet<S, H>
where
    S: Borrow<str> + Hash + Eq,
    H: BuildHasher,
{
    fn has_tag(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl<S> TagLookup for BTreeSet<S>
where
    S: Borrow<str> + Ord,
{
    fn has_tag(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl TagLookup for [&str] {
    fn has_tag(&self, name: &str) -> bool {
        self.iter().any(|t| *t == name)
    }
}

/// Evaluate `expr` against `tags`, re-parsing on every call.
///
/// Pure: the result depends only on the two arguments.
pub fn evaluate<L: TagLookup + ?Sized>(expr: &str, tags: &L) -> bool {
    TagExpr::compile(expr).eval(tags)
}

/// Errors reported by `validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    /// A `)` without an opener, or an unclosed `(`.
    UnbalancedParentheses,
    /// Character outside ASCII letters and digits, `_`, space and parentheses.
    InvalidCharacter { ch: char, pos: usize },
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprError::UnbalancedParentheses => write!(f, "Unbalanced parentheses"),
            ExprError::InvalidCharacter { ch, pos } => {
                write!(f, "Invalid character '{ch}' at position {pos}")
            }
        }
    }
}

impl std::error::Error for ExprError {}

/// Check parentheses balance and the character set.
pub fn validate(expr: &str) -> Result<(), ExprError> {
    let mut depth = 0usize;
    for ch in expr.chars() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(ExprError::UnbalancedParentheses)?;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(ExprError::UnbalancedParentheses);
    }
    for (pos, ch) in expr.chars().enumerate() {
        let ok = ch.is_ascii_alphanumeric() || matches!(ch, '_' | ' ' | '(' | ')');
        if !ok {
            return Err(ExprError::InvalidCharacter { ch, pos });
        }
    }
    Ok(())
}

/// `validate` as an `(is_valid, message)` pair; the message is empty when valid.
pub fn validate_report(expr: &str) -> (bool, String) {
    match validate(expr) {
        Ok(()) => (true, String::new()),
        Err(e) => (false, e.to_string()),
    }
}

/// Identifiers referenced by `expr`, without keywords, literals or parens.
pub fn extract_tag_names(expr: &str) -> BTreeSet<String> {
    tokenize(expr)
        .into_iter()
        .filter_map(|t| match t {
            Token::Word(w) => Some(w),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests;
