//! The generic grammar interpreter (spec.md §4.2-§4.4): a nondeterministic
//! recursive-descent engine that explores every derivation of a
//! [GrammarExpr] against a fixed input text, memoizing on `(node, index,
//! frame)` the way the teacher's `Cache` memoizes on `(production, index)`.
mod bind;
mod cache;
mod frame;
#[cfg(test)]
mod tests;
mod value;

pub use frame::Frame;
pub use value::{str_concat, ParseNode, ParseValue};

use crate::error::NoMatch;
use crate::grammar::{Bound, Grammar, GrammarExpr};
use crate::util::{Code, Log};
use bind::{auto_enumerate, bind, longest_literal_bound, resolve_actual, resolve_bound};
use cache::Cache;
use std::rc::Rc;

/// The auto-enumerated domain bound for `m` (spec.md §4.3's table: `{0..5}`).
/// The crate's one piece of configuration (SPEC_FULL.md §8); override with
/// [Engine::with_m_var_max] rather than a config file or env var.
pub const M_VAR_MAX: u32 = 5;

/// Drives one parse of one fixed input text against a [Grammar]. Not
/// `Send`/reusable across texts: construct one per call, as the teacher
/// constructs one `Cache` per parse.
pub struct Engine<'g, 't> {
    grammar: Option<&'g Grammar>,
    text: Vec<char>,
    code: Code<'t>,
    cache: Cache,
    tree_mode: bool,
    m_var_max: u32,
}

impl<'g, 't> Engine<'g, 't> {
    pub fn new(text: &'t str) -> Self {
        Self {
            grammar: None,
            text: text.chars().collect(),
            code: Code::new(text),
            cache: Cache::new(),
            tree_mode: false,
            m_var_max: M_VAR_MAX,
        }
    }

    pub fn with_grammar(mut self, grammar: &'g Grammar) -> Self {
        self.grammar = Some(grammar);
        self
    }

    pub fn with_tree_mode(mut self, tree_mode: bool) -> Self {
        self.tree_mode = tree_mode;
        self
    }

    pub fn with_m_var_max(mut self, m_var_max: u32) -> Self {
        self.m_var_max = m_var_max;
        self
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// `parse(text, expr)` (spec.md §4.2): every full-text derivation of
    /// `expr`, collapsed to a single value, a [ParseValue::Set] on genuine
    /// ambiguity, or [NoMatch].
    pub fn parse(&mut self, expr: &Rc<GrammarExpr>) -> Result<ParseValue, NoMatch> {
        let results = self.derive(expr, 0, &Frame::default());
        self.finish(results, "<expr>")
    }

    /// Convenience over [Self::parse] for the common case of parsing a
    /// named top-level rule with no actual arguments.
    pub fn parse_rule(&mut self, rule: &str) -> Result<ParseValue, NoMatch> {
        let expr = Rc::new(GrammarExpr::RuleRef(rule.to_string(), Vec::new()));
        let results = self.derive(&expr, 0, &Frame::default());
        self.finish(results, rule)
    }

    fn finish(
        &self,
        results: Vec<(ParseValue, usize)>,
        rule: &str,
    ) -> Result<ParseValue, NoMatch> {
        let full_len = self.text.len();
        let mut values: Vec<ParseValue> = Vec::new();
        for (value, end) in results {
            if end == full_len && !values.contains(&value) {
                values.push(value);
            }
        }
        match values.len() {
            0 => Err(NoMatch::new(
                rule.to_string(),
                &self.text.iter().collect::<String>(),
            )),
            1 => Ok(values.into_iter().next().unwrap()),
            _ => Ok(ParseValue::Set(values)),
        }
    }

    /// The memoized dispatcher: every [GrammarExpr] variant's derivation
    /// rule from spec.md §4.2.
    pub fn derive(
        &mut self,
        expr: &Rc<GrammarExpr>,
        i: usize,
        frame: &Frame,
    ) -> Vec<(ParseValue, usize)> {
        let key = (Rc::as_ptr(expr) as usize, i, frame.clone());
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }
        let result = self.derive_uncached(expr, i, frame);
        self.cache.insert(key, result.clone());
        result
    }

    fn derive_uncached(
        &mut self,
        expr: &Rc<GrammarExpr>,
        i: usize,
        frame: &Frame,
    ) -> Vec<(ParseValue, usize)> {
        match &**expr {
            GrammarExpr::Char(c) => {
                if self.text.get(i) == Some(c) {
                    vec![(ParseValue::Str(c.to_string()), i + 1)]
                } else {
                    Vec::new()
                }
            }
            GrammarExpr::Str(s) => {
                let chars: Vec<char> = s.chars().collect();
                let end = i + chars.len();
                if end <= self.text.len() && self.text[i..end] == chars[..] {
                    vec![(ParseValue::Str(s.clone()), end)]
                } else {
                    Vec::new()
                }
            }
            GrammarExpr::Range(lo, hi) => match self.text.get(i) {
                Some(&c) if (*lo..*hi).contains(&(c as u32)) => {
                    vec![(ParseValue::Str(c.to_string()), i + 1)]
                }
                _ => Vec::new(),
            },
            GrammarExpr::StartOfLine => {
                if self.code.is_start_of_line(i) {
                    vec![(ParseValue::None, i)]
                } else {
                    Vec::new()
                }
            }
            GrammarExpr::EndOfInput => {
                if i == self.text.len() {
                    vec![(ParseValue::None, i)]
                } else {
                    Vec::new()
                }
            }
            GrammarExpr::Alt(items) => items
                .iter()
                .flat_map(|item| self.derive(item, i, frame))
                .collect(),
            GrammarExpr::Concat(items) => self.derive_concat(items, i, frame),
            GrammarExpr::Repeat(lo, hi, inner) => self.derive_repeat(*lo, *hi, inner, i, frame),
            GrammarExpr::Diff(e, subs) => self.derive_diff(e, subs, i, frame),
            GrammarExpr::Lookahead(positive, e) => {
                let has_match = !self.derive(e, i, frame).is_empty();
                if has_match == *positive {
                    vec![(ParseValue::None, i)]
                } else {
                    Vec::new()
                }
            }
            GrammarExpr::Lookbehind(e) => self.derive_lookbehind(e, i, frame),
            GrammarExpr::RuleRef(name, actuals) => self.derive_rule_ref(name, actuals, i, frame),
        }
    }

    fn derive_concat(
        &mut self,
        items: &[Rc<GrammarExpr>],
        i: usize,
        frame: &Frame,
    ) -> Vec<(ParseValue, usize)> {
        match items.split_first() {
            None => vec![(ParseValue::None, i)],
            Some((head, rest)) => {
                let mut out = Vec::new();
                for (v0, i0) in self.derive(head, i, frame) {
                    for (vrest, irest) in self.derive_concat(rest, i0, frame) {
                        out.push((str_concat(v0.clone(), vrest), irest));
                    }
                }
                out
            }
        }
    }

    fn derive_repeat(
        &mut self,
        lo: Bound,
        hi: Bound,
        inner: &Rc<GrammarExpr>,
        i: usize,
        frame: &Frame,
    ) -> Vec<(ParseValue, usize)> {
        let (Some(lo_opt), Some(hi_opt)) = (resolve_bound(lo, frame), resolve_bound(hi, frame))
        else {
            return Vec::new();
        };
        let lo_n = lo_opt.unwrap_or(0);
        self.derive_repeat_bounded(lo_n, hi_opt, inner, i, frame)
    }

    fn derive_repeat_bounded(
        &mut self,
        lo: u64,
        hi: Option<u64>,
        inner: &Rc<GrammarExpr>,
        i: usize,
        frame: &Frame,
    ) -> Vec<(ParseValue, usize)> {
        let mut out = Vec::new();
        if lo == 0 {
            out.push((ParseValue::None, i));
        }
        if hi != Some(0) {
            let next_lo = lo.saturating_sub(1);
            let next_hi = hi.map(|h| h - 1);
            for (v, i1) in self.derive(inner, i, frame) {
                for (vrest, irest) in self.derive_repeat_bounded(next_lo, next_hi, inner, i1, frame)
                {
                    out.push((str_concat(v.clone(), vrest), irest));
                }
            }
        }
        out
    }

    fn derive_diff(
        &mut self,
        e: &Rc<GrammarExpr>,
        subs: &[Rc<GrammarExpr>],
        i: usize,
        frame: &Frame,
    ) -> Vec<(ParseValue, usize)> {
        let candidates = self.derive(e, i, frame);
        if candidates.is_empty() {
            return candidates;
        }
        for s in subs {
            if !self.derive(s, i, frame).is_empty() {
                return Vec::new();
            }
        }
        candidates
    }

    fn derive_lookbehind(
        &mut self,
        e: &Rc<GrammarExpr>,
        i: usize,
        frame: &Frame,
    ) -> Vec<(ParseValue, usize)> {
        let bound = longest_literal_bound(e, frame, 0).unwrap_or(i);
        let scan_from = i.saturating_sub(bound);
        for start in scan_from..=i {
            if self.derive(e, start, frame).iter().any(|&(_, end)| end == i) {
                return vec![(ParseValue::None, i)];
            }
        }
        Vec::new()
    }

    fn derive_rule_ref(
        &mut self,
        name: &str,
        actuals: &[crate::grammar::Actual],
        i: usize,
        frame: &Frame,
    ) -> Vec<(ParseValue, usize)> {
        let Some(grammar) = self.grammar else {
            return Vec::new();
        };
        let Some(overloads) = grammar.overloads(name) else {
            return Vec::new();
        };
        let resolved: Vec<String> = actuals.iter().map(|a| resolve_actual(a, frame)).collect();
        Log::<&str>::Verbose("rule").log_rule_attempt(name, i, &self.code);

        let mut out = Vec::new();
        for overload in overloads {
            if overload.formals.len() != resolved.len() {
                continue;
            }
            let Some(new_frame) = bind(&overload.formals, &resolved) else {
                continue;
            };
            for enum_frame in auto_enumerate(&overload.body, new_frame, self.m_var_max) {
                for (v, j) in self.derive(&overload.body, i, &enum_frame) {
                    let value = if self.tree_mode {
                        ParseValue::Node(Rc::new(ParseNode {
                            rule: name.to_string(),
                            start: i,
                            end: j,
                            inner: Box::new(v),
                        }))
                    } else {
                        v
                    };
                    out.push((value, j));
                }
            }
        }
        Log::<&str>::Verbose("rule").log_rule_result(name, i, out.len(), &self.code);
        out
    }
}
