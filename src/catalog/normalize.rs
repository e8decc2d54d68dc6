//! Canonicalization of free-text SQL expressions.
//!
//! Check clauses and trigger conditions can be written many ways that mean
//! the same thing. Comparing them needs an oracle that rewrites both sides
//! into one canonical text; the database-backed one lives in
//! `crate::db::normalizer`.

use crate::error::BoxError;
use serde::{Deserialize, Serialize};

/// Name and type of an owning table's column, enough to rebuild it in a
/// scratch table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnShape {
    pub name: String,
    pub data_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedClause {
    pub text: String,
    /// Owner columns the expression references, in owner column order.
    pub column_names: Vec<String>,
}

/// Rewrites expressions into a canonical form.
///
/// Implementations must be deterministic for a given input and must not
/// leave anything behind that a caller could observe.
pub trait Normalizer {
    fn normalize_check_clause(
        &self,
        columns: &[ColumnShape],
        clause: &str,
    ) -> Result<NormalizedClause, BoxError>;

    fn normalize_trigger_condition(
        &self,
        columns: &[ColumnShape],
        condition: &str,
    ) -> Result<NormalizedClause, BoxError>;
}

/// Offline normalizer: collapses whitespace, drops parentheses wrapping the
/// whole expression and finds referenced columns by scanning identifiers.
/// Used when no database is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalNormalizer;

impl LexicalNormalizer {
    fn normalize(columns: &[ColumnShape], text: &str) -> Result<NormalizedClause, BoxError> {
        let text = collapse_whitespace(text);
        let text = strip_outer_parens(&text).to_string();
        if text.is_empty() {
            return Err("expression is empty".into());
        }
        let words = identifiers(&text);
        let column_names = columns
            .iter()
            .filter(|c| words.iter().any(|w| w.eq_ignore_ascii_case(&c.name)))
            .map(|c| c.name.clone())
            .collect();
        Ok(NormalizedClause { text, column_names })
    }
}

impl Normalizer for LexicalNormalizer {
    fn normalize_check_clause(
        &self,
        columns: &[ColumnShape],
        clause: &str,
    ) -> Result<NormalizedClause, BoxError> {
        Self::normalize(columns, clause)
    }

    fn normalize_trigger_condition(
        &self,
        columns: &[ColumnShape],
        condition: &str,
    ) -> Result<NormalizedClause, BoxError> {
        Self::normalize(columns, condition)
    }
}

/// `((a > 0))` and `a > 0` are the same clause; `(a > 0) AND (b > 0)` keeps
/// its parentheses.
pub fn strip_outer_parens(mut text: &str) -> &str {
    while text.starts_with('(') && text.ends_with(')') && closes_at_end(text) {
        text = text[1..text.len() - 1].trim();
    }
    text
}

/// Whether the `(` opening `text` is closed by its last character.
fn closes_at_end(text: &str) -> bool {
    let mut depth = 0usize;
    let mut in_literal = false;
    for (i, c) in text.char_indices() {
        match c {
            '\'' => in_literal = !in_literal,
            '(' if !in_literal => depth += 1,
            ')' if !in_literal => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i == text.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

/// Trims and folds whitespace runs into one space, leaving single-quoted
/// literals untouched.
fn collapse_whitespace(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut in_literal = false;
    let mut pending_space = false;

    for c in text.trim().chars() {
        if !in_literal && c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            collapsed.push(' ');
            pending_space = false;
        }
        if c == '\'' {
            in_literal = !in_literal;
        }
        collapsed.push(c);
    }
    collapsed
}

/// Identifier-like words outside single-quoted literals.
fn identifiers(text: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut in_literal = false;
    let mut start = None;

    for (i, c) in text.char_indices() {
        if in_literal {
            if c == '\'' {
                in_literal = false;
            }
            continue;
        }
        let ident_char = c.is_ascii_alphanumeric() || c == '_' || c == '$';
        match (ident_char, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                words.push(&text[s..i]);
                start = None;
            }
            _ => {}
        }
        if c == '\'' {
            in_literal = true;
        }
    }
    if let Some(s) = start {
        words.push(&text[s..]);
    }
    words
}
