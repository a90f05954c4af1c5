//! The two error kinds the core ever produces: a [GrammarError] when
//! `BnfParser` cannot turn a BNF fragment into a [crate::grammar::GrammarExpr],
//! and a [NoMatch] when the interpreter exhausts every derivation of an input
//! without finding one that consumes the whole text.
//!
//! Small structs with hand-written `Display` impls rather than
//! `thiserror`-derived ones.

use std::fmt::{Display, Formatter};

/// Emitted by [crate::bnf::BnfParser] when a BNF fragment cannot be parsed.
///
/// Carries the production name the fragment was defining (when known), the
/// construct the parser expected, and a short window of the remaining input
/// at the point parsing stopped. Fatal for the affected rule: the caller is
/// expected to abort the grammar load rather than retry.
#[derive(Debug, Clone)]
pub struct GrammarError {
    pub rule: Option<String>,
    pub expected: String,
    pub window: String,
}

impl GrammarError {
    pub fn new(rule: Option<String>, expected: impl Into<String>, remaining: &str) -> Self {
        let window: String = remaining.chars().take(10).collect();
        Self {
            rule,
            expected: expected.into(),
            window,
        }
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.rule {
            Some(rule) => write!(
                f,
                "GrammarError: while defining '{}', expected {} near '{}'",
                rule, self.expected, self.window
            ),
            None => write!(
                f,
                "GrammarError: expected {} near '{}'",
                self.expected, self.window
            ),
        }
    }
}

impl std::error::Error for GrammarError {}

/// Emitted by the interpreter when `parse(text, expr)` finds zero full-text
/// derivations. Carries the first 40 characters of the input for context.
#[derive(Debug, Clone)]
pub struct NoMatch {
    pub rule: String,
    pub head: String,
}

impl NoMatch {
    pub fn new(rule: impl Into<String>, text: &str) -> Self {
        Self {
            rule: rule.into(),
            head: text.chars().take(40).collect(),
        }
    }
}

impl Display for NoMatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "NoMatch: no derivation of '{}' consumes '{}'",
            self.rule, self.head
        )
    }
}

impl std::error::Error for NoMatch {}
