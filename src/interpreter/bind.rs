//! Rule invocation (spec.md §4.3): resolving actual arguments against the
//! caller's frame, matching them against a candidate overload's formals,
//! and auto-enumerating any binding variable the body still leaves free.
use super::frame::Frame;
use crate::grammar::{Actual, Bound, EnumParam, Formal, GrammarExpr};
use std::collections::HashSet;
use std::rc::Rc;

/// Resolve one actual argument's text against the caller frame: a bare
/// variable substitutes its bound value; anything else (a digit, a context
/// name, a composite spelling like `<n`) is kept as written.
pub fn resolve_actual(actual: &Actual, caller_frame: &Frame) -> String {
    match actual {
        Actual::Var(c) => caller_frame
            .get(*c)
            .map(str::to_string)
            .unwrap_or_else(|| c.to_string()),
        Actual::Raw(s) => s.clone(),
    }
}

/// Match a resolved actual argument list against one overload's formals,
/// producing the callee's fresh frame. `None` means this overload rejects
/// the call (a formal/actual mismatch), so the caller should fall through
/// to the next overload.
pub fn bind(formals: &[Formal], actuals: &[String]) -> Option<Frame> {
    let mut frame = Frame::default();
    for (formal, actual) in formals.iter().zip(actuals) {
        match formal {
            Formal::Digit(d) => {
                if actual != &d.to_string() {
                    return None;
                }
            }
            Formal::Enum(e) => {
                if actual != e.name() {
                    return None;
                }
            }
            Formal::NPlus1 => {
                let n: i64 = actual.parse().ok()?;
                if n <= 0 {
                    return None;
                }
                frame.set('n', (n - 1).to_string());
            }
            Formal::Var(c) => {
                frame.set(*c, actual.clone());
            }
        }
    }
    Some(frame)
}

/// Every domain for a variable the interpreter is allowed to auto-enumerate
/// (spec.md §4.3's table). `M_VAR_MAX` is the crate's one configuration
/// knob (SPEC_FULL.md §8).
pub fn domain_for(var: char, m_var_max: u32) -> Option<Vec<String>> {
    match var {
        'm' => Some((0..=m_var_max).map(|n| n.to_string()).collect()),
        't' => Some(
            EnumParam::CHOMPING
                .iter()
                .map(|e| e.name().to_string())
                .collect(),
        ),
        _ => None,
    }
}

/// Binding variables a body references directly (repeat bounds, rule-ref
/// arguments) that are not already bound in `frame`. Does not descend into
/// a nested `RuleRef`'s own body — that is a separate invocation with its
/// own frame scope.
pub fn free_vars(body: &GrammarExpr, frame: &Frame) -> HashSet<char> {
    let mut acc = HashSet::new();
    collect_free_vars(body, frame, &mut acc);
    acc
}

fn collect_free_vars(expr: &GrammarExpr, frame: &Frame, acc: &mut HashSet<char>) {
    match expr {
        GrammarExpr::Char(_)
        | GrammarExpr::Str(_)
        | GrammarExpr::Range(..)
        | GrammarExpr::StartOfLine
        | GrammarExpr::EndOfInput => {}
        GrammarExpr::RuleRef(_, actuals) => {
            for a in actuals {
                if let Actual::Var(c) = a {
                    if !frame.contains(*c) {
                        acc.insert(*c);
                    }
                }
            }
        }
        GrammarExpr::Concat(items) | GrammarExpr::Alt(items) => {
            for item in items {
                collect_free_vars(item, frame, acc);
            }
        }
        GrammarExpr::Repeat(lo, hi, inner) => {
            for bound in [lo, hi] {
                if let Bound::Var(c) = bound {
                    if !frame.contains(*c) {
                        acc.insert(*c);
                    }
                }
            }
            collect_free_vars(inner, frame, acc);
        }
        GrammarExpr::Diff(e, subs) => {
            collect_free_vars(e, frame, acc);
            for s in subs {
                collect_free_vars(s, frame, acc);
            }
        }
        GrammarExpr::Lookahead(_, e) | GrammarExpr::Lookbehind(e) => {
            collect_free_vars(e, frame, acc)
        }
    }
}

/// Every frame reachable by auto-enumerating `body`'s free variables over
/// their fixed domains (spec.md §4.3's Cartesian product). A free variable
/// outside `{m, t}` is a grammar-authoring error (SPEC_FULL.md §7): rather
/// than a third public error kind, it degrades to "no frames", which makes
/// the call site see an ordinary empty derivation.
pub fn auto_enumerate(body: &GrammarExpr, base: Frame, m_var_max: u32) -> Vec<Frame> {
    let free = free_vars(body, &base);
    let mut domains: Vec<(char, Vec<String>)> = Vec::new();
    for var in free {
        match domain_for(var, m_var_max) {
            Some(values) => domains.push((var, values)),
            None => return Vec::new(),
        }
    }
    let mut frames = vec![base];
    for (var, values) in domains {
        frames = frames
            .iter()
            .flat_map(|f| {
                values.iter().map(move |v| {
                    let mut nf = f.clone();
                    nf.set(var, v.clone());
                    nf
                })
            })
            .collect();
    }
    frames
}

/// Resolve a repeat bound against the frame. `None` means an unresolvable
/// symbolic bound (the referenced variable isn't bound) — an engine error
/// that degrades like any other, per the policy above.
pub fn resolve_bound(bound: Bound, frame: &Frame) -> Option<Option<u64>> {
    match bound {
        Bound::Inf => Some(None),
        Bound::Lit(n) => Some(Some(n as u64)),
        Bound::Var(c) => frame.get(c).and_then(|s| s.parse::<u64>().ok()).map(Some),
    }
}

pub fn longest_literal_bound(expr: &Rc<GrammarExpr>, frame: &Frame, depth: usize) -> Option<usize> {
    if depth > 64 {
        return None;
    }
    match &**expr {
        GrammarExpr::Char(_) | GrammarExpr::Range(..) => Some(1),
        GrammarExpr::Str(s) => Some(s.chars().count()),
        GrammarExpr::Concat(items) => items.iter().try_fold(0usize, |acc, it| {
            longest_literal_bound(it, frame, depth + 1).map(|m| acc + m)
        }),
        GrammarExpr::Alt(items) => items
            .iter()
            .map(|it| longest_literal_bound(it, frame, depth + 1))
            .collect::<Option<Vec<_>>>()
            .map(|v| v.into_iter().max().unwrap_or(0)),
        GrammarExpr::Repeat(_, hi, inner) => {
            let inner_max = longest_literal_bound(inner, frame, depth + 1)?;
            let hi_n = resolve_bound(*hi, frame)??;
            Some(inner_max * hi_n as usize)
        }
        GrammarExpr::Diff(e, _) => longest_literal_bound(e, frame, depth + 1),
        GrammarExpr::Lookahead(..)
        | GrammarExpr::Lookbehind(_)
        | GrammarExpr::StartOfLine
        | GrammarExpr::EndOfInput => Some(0),
        GrammarExpr::RuleRef(..) => None,
    }
}
