//! Compiled tag expressions and a per-string cache.
//!
//! Compilation follows the evaluation order of the string form exactly:
//! parenthesized groups are opaque to operator splitting; the first top-level
//! `OR` splits, else the first top-level `AND`, else a leading `NOT` negates
//! the remainder, else the sequence is a single primary. Compilation never
//! fails. Structural mistakes degrade instead:
//! - an empty operand (`a AND AND b`, trailing `OR`) is `TRUE`;
//! - bare words with no operator between them form one identifier joined by
//!   single spaces;
//! - a group next to other words with no operator matches nothing;
//! - an unmatched `(` runs to the end, a stray `)` is skipped.

use std::collections::HashMap;
use std::fmt;

use super::lexer::{tokenize, Token};
use super::TagLookup;

/// Boolean predicate over a tag set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagExpr {
    Const(bool),
    Tag(String),
    Not(Box<TagExpr>),
    And(Box<TagExpr>, Box<TagExpr>),
    Or(Box<TagExpr>, Box<TagExpr>),
}

impl TagExpr {
    /// Compile an expression; blank input is `Const(true)`.
    pub fn compile(src: &str) -> Self {
        let tokens = tokenize(src);
        parse(&tokens)
    }

    pub fn eval<L: TagLookup + ?Sized>(&self, tags: &L) -> bool {
        match self {
            TagExpr::Const(b) => *b,
            TagExpr::Tag(name) => tags.has_tag(name),
            TagExpr::Not(e) => !e.eval(tags),
            TagExpr::And(a, b) => a.eval(tags) && b.eval(tags),
            TagExpr::Or(a, b) => a.eval(tags) || b.eval(tags),
        }
    }

    /// Matches every tag set without looking at it.
    #[inline]
    pub fn is_trivially_true(&self) -> bool {
        matches!(self, TagExpr::Const(true))
    }
}

impl fmt::Display for TagExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagExpr::Const(true) => write!(f, "TRUE"),
            TagExpr::Const(false) => write!(f, "FALSE"),
            TagExpr::Tag(name) => write!(f, "{name}"),
            TagExpr::Not(e) => write!(f, "NOT ({e})"),
            TagExpr::And(a, b) => write!(f, "({a}) AND ({b})"),
            TagExpr::Or(a, b) => write!(f, "({a}) OR ({b})"),
        }
    }
}

fn parse(tokens: &[Token]) -> TagExpr {
    if tokens.is_empty() {
        return TagExpr::Const(true);
    }
    if let Some(i) = find_top_level(tokens, &Token::Or) {
        return TagExpr::Or(
            Box::new(parse(&tokens[..i])),
            Box::new(parse(&tokens[i + 1..])),
        );
    }
    if let Some(i) = find_top_level(tokens, &Token::And) {
        return TagExpr::And(
            Box::new(parse(&tokens[..i])),
            Box::new(parse(&tokens[i + 1..])),
        );
    }
    if tokens[0] == Token::Not {
        return TagExpr::Not(Box::new(parse(&tokens[1..])));
    }
    primary(tokens)
}

/// First position of `op` at paren depth 0, scanning left to right.
fn find_top_level(tokens: &[Token], op: &Token) -> Option<usize> {
    let mut depth = 0usize;
    for (i, t) in tokens.iter().enumerate() {
        match t {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            t if depth == 0 && t == op => return Some(i),
            _ => {}
        }
    }
    None
}

/// Index of the `)` closing the `(` at `open`, or `tokens.len()` if unmatched.
fn matching_close(tokens: &[Token], open: usize) -> usize {
    let mut depth = 0usize;
    for (i, t) in tokens.iter().enumerate().skip(open) {
        match t {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth -= 1;
                if depth == 0 {
                    return i;
                }
            }
            _ => {}
        }
    }
    tokens.len()
}

enum Atom {
    Group(TagExpr),
    Word(String),
}

/// Operator-free sequence: groups, words and literals.
fn primary(tokens: &[Token]) -> TagExpr {
    let mut atoms = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i] {
            Token::LParen => {
                let close = matching_close(tokens, i);
                atoms.push(Atom::Group(parse(&tokens[i + 1..close])));
                i = close + 1;
                continue;
            }
            Token::RParen => {}
            Token::True => atoms.push(Atom::Group(TagExpr::Const(true))),
            Token::False => atoms.push(Atom::Group(TagExpr::Const(false))),
            Token::Word(w) => atoms.push(Atom::Word(w.clone())),
            // Operators that survived splitting (e.g. a `NOT` mid-sequence)
            // read as plain words.
            Token::And => atoms.push(Atom::Word("AND".into())),
            Token::Or => atoms.push(Atom::Word("OR".into())),
            Token::Not => atoms.push(Atom::Word("NOT".into())),
        }
        i += 1;
    }
    match atoms.len() {
        0 => TagExpr::Const(true),
        1 => match atoms.pop() {
            Some(Atom::Group(e)) => e,
            Some(Atom::Word(w)) => TagExpr::Tag(w),
            None => TagExpr::Const(true),
        },
        _ => {
            let mut words = Vec::with_capacity(atoms.len());
            for atom in atoms {
                match atom {
                    Atom::Word(w) => words.push(w),
                    Atom::Group(_) => return TagExpr::Const(false),
                }
            }
            TagExpr::Tag(words.join(" "))
        }
    }
}

/// Compiled expressions keyed by their source string.
#[derive(Clone, Debug, Default)]
pub struct ExprCache {
    compiled: HashMap<String, TagExpr>,
}

impl ExprCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiled form of `src`, compiling on first use.
    pub fn get(&mut self, src: &str) -> &TagExpr {
        if !self.compiled.contains_key(src) {
            tracing::trace!(expr = src, "compiling tag expression");
            self.compiled.insert(src.to_owned(), TagExpr::compile(src));
        }
        &self.compiled[src]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    pub fn clear(&mut self) {
        self.compiled.clear();
    }
}
