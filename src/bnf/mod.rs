//! `BnfParser`: turns BNF fragment text into a [GrammarExpr] tree (spec.md
//! §4.1), and [load_grammar]: turns a whole grammar file (spec.md §6's
//! "Input grammar file" contract) into a [Grammar] production table.
//!
//! Precedence, tightest first: atom, repeat (postfix `? * + {N} × N`), diff
//! (`A - B - C`), concat (juxtaposition), alt (`|`).
mod lexer;

use crate::error::GrammarError;
use crate::grammar::{alt, concat, range, str_lit, Actual, Bound, EnumParam, Formal, Grammar, GrammarExpr, Overload};
use lexer::{Lexer, Token};
use std::rc::Rc;

/// Stateless entry point mirroring the teacher's `DefaultParser`/
/// `LexerlessParser` construction style: a small struct with associated
/// functions rather than free functions, even though it carries no state of
/// its own (the state lives in the internal [Parser]).
pub struct BnfParser;

impl BnfParser {
    /// Parse a single BNF fragment — one production body, or any
    /// standalone expression — into a [GrammarExpr].
    pub fn parse_fragment(text: &str) -> Result<Rc<GrammarExpr>, GrammarError> {
        Parser::new(text, None).parse_fragment()
    }

    /// Same as [Self::parse_fragment], but attaches `rule` to any error for
    /// a more useful message.
    pub fn parse_body(text: &str, rule: &str) -> Result<Rc<GrammarExpr>, GrammarError> {
        Parser::new(text, Some(rule.to_string())).parse_fragment()
    }
}

/// Parse a whole grammar file: every `name ::= body` definition, collecting
/// every overload of a repeated name rather than keeping only the first
/// (see DESIGN.md's resolution of spec.md's "duplicate production names"
/// open question).
pub fn load_grammar(text: &str) -> Result<Grammar, GrammarError> {
    let chars: Vec<char> = text.chars().collect();
    let markers = find_markers(&chars);
    if markers.is_empty() {
        return Err(GrammarError::new(
            None,
            "at least one '::=' production marker",
            text,
        ));
    }

    let lhs_starts: Vec<usize> = markers.iter().map(|&m| lhs_line_start(&chars, m)).collect();

    let mut grammar = Grammar::new();
    for idx in 0..markers.len() {
        let marker = markers[idx];
        let lhs_text: String = chars[lhs_starts[idx]..marker].iter().collect();
        let body_start = marker + 3;
        let body_end = if idx + 1 < markers.len() {
            lhs_starts[idx + 1]
        } else {
            chars.len()
        };
        let body_text: String = chars[body_start..body_end].iter().collect();

        let (name, formals) = parse_lhs(lhs_text.trim())?;
        let body = BnfParser::parse_body(&body_text, &name)?;
        grammar.define(name, Overload::new(formals, body));
    }
    Ok(grammar)
}

fn find_markers(chars: &[char]) -> Vec<usize> {
    let mut markers = Vec::new();
    let mut i = 0;
    while i + 2 < chars.len() {
        if chars[i] == ':' && chars[i + 1] == ':' && chars[i + 2] == '=' {
            markers.push(i);
            i += 3;
        } else {
            i += 1;
        }
    }
    markers
}

fn lhs_line_start(chars: &[char], marker: usize) -> usize {
    let mut i = marker;
    while i > 0 && chars[i - 1] != '\n' {
        i -= 1;
    }
    i
}

/// Parse the LHS of a definition (`s-indent(n)`, `nb-json`, …) into the
/// production name and its formal parameters. The LHS uses the same
/// rule-reference lexing as a body atom, just with [Formal]s instead of
/// [Actual]s on the argument list.
fn parse_lhs(text: &str) -> Result<(String, Vec<Formal>), GrammarError> {
    let mut lexer = Lexer::new(text);
    let (token, _) = lexer
        .next_token()
        .map_err(|e| GrammarError::new(None, e, text))?;
    let (name, raw_args) = match token {
        Token::Ident(name) => (name, Vec::new()),
        Token::RuleRef(name, args) => (name, args),
        other => {
            return Err(GrammarError::new(
                None,
                format!("a production name, found {:?}", other),
                text,
            ))
        }
    };
    let (trailing, _) = lexer
        .next_token()
        .map_err(|e| GrammarError::new(Some(name.clone()), e, text))?;
    if trailing != Token::Eof {
        return Err(GrammarError::new(
            Some(name),
            "no remaining input after the production name",
            text,
        ));
    }
    let formals = raw_args
        .iter()
        .map(|raw| to_formal(raw))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| GrammarError::new(Some(name.clone()), e, text))?;
    Ok((name, formals))
}

fn to_formal(raw: &str) -> Result<Formal, String> {
    if raw == "n+1" {
        return Ok(Formal::NPlus1);
    }
    if let Ok(d) = raw.parse::<u32>() {
        return Ok(Formal::Digit(d));
    }
    if let Some(e) = EnumParam::from_name(raw) {
        return Ok(Formal::Enum(e));
    }
    let mut chars = raw.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_lowercase() {
            return Ok(Formal::Var(c));
        }
    }
    Err(format!(
        "'{}' is not a valid formal parameter (digit, context name, n+1, or a binding variable)",
        raw
    ))
}

fn to_actual(raw: &str) -> Actual {
    let mut chars = raw.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_lowercase() {
            return Actual::Var(c);
        }
    }
    Actual::Raw(raw.to_string())
}

/// Recursive-descent parser over a [Lexer]'s token stream, with one token
/// of lookahead.
struct Parser {
    lexer: Lexer,
    peeked: Option<(Token, usize)>,
    rule: Option<String>,
}

impl Parser {
    fn new(text: &str, rule: Option<String>) -> Self {
        Self {
            lexer: Lexer::new(text),
            peeked: None,
            rule,
        }
    }

    fn fill(&mut self) -> Result<(), GrammarError> {
        if self.peeked.is_none() {
            let window_pos = self.lexer.position();
            let tok = self
                .lexer
                .next_token()
                .map_err(|e| self.err_at(window_pos, e))?;
            self.peeked = Some(tok);
        }
        Ok(())
    }

    fn peek(&mut self) -> Result<&Token, GrammarError> {
        self.fill()?;
        Ok(&self.peeked.as_ref().unwrap().0)
    }

    fn bump(&mut self) -> Result<(Token, usize), GrammarError> {
        self.fill()?;
        Ok(self.peeked.take().unwrap())
    }

    fn err_at(&self, pos: usize, expected: impl Into<String>) -> GrammarError {
        let _ = pos;
        GrammarError::new(self.rule.clone(), expected, &self.lexer.remaining())
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<(), GrammarError> {
        let (tok, pos) = self.bump()?;
        if tok == expected {
            Ok(())
        } else {
            Err(self.err_at(pos, format!("{}, found {:?}", what, tok)))
        }
    }

    fn parse_fragment(&mut self) -> Result<Rc<GrammarExpr>, GrammarError> {
        let expr = self.parse_alt()?;
        let (tok, pos) = self.bump()?;
        if tok == Token::Eof {
            Ok(expr)
        } else {
            Err(self.err_at(pos, "no remaining input"))
        }
    }

    fn parse_alt(&mut self) -> Result<Rc<GrammarExpr>, GrammarError> {
        let mut items = vec![self.parse_concat()?];
        while *self.peek()? == Token::Pipe {
            self.bump()?;
            items.push(self.parse_concat()?);
        }
        Ok(alt(items))
    }

    fn parse_concat(&mut self) -> Result<Rc<GrammarExpr>, GrammarError> {
        let mut items = Vec::new();
        loop {
            match self.peek()? {
                Token::Eof | Token::Pipe | Token::RParen | Token::RBracket => break,
                _ => items.push(self.parse_diff()?),
            }
        }
        Ok(concat(items))
    }

    fn parse_diff(&mut self) -> Result<Rc<GrammarExpr>, GrammarError> {
        let first = self.parse_repeat()?;
        let mut subs = Vec::new();
        while *self.peek()? == Token::Minus {
            self.bump()?;
            subs.push(self.parse_repeat()?);
        }
        if subs.is_empty() {
            Ok(first)
        } else {
            Ok(Rc::new(GrammarExpr::Diff(first, subs)))
        }
    }

    fn parse_repeat(&mut self) -> Result<Rc<GrammarExpr>, GrammarError> {
        let atom = self.parse_atom()?;
        match self.peek()? {
            Token::Question => {
                self.bump()?;
                Ok(Rc::new(GrammarExpr::Repeat(Bound::Lit(0), Bound::Lit(1), atom)))
            }
            Token::Star => {
                self.bump()?;
                Ok(Rc::new(GrammarExpr::Repeat(Bound::Lit(0), Bound::Inf, atom)))
            }
            Token::Plus => {
                self.bump()?;
                Ok(Rc::new(GrammarExpr::Repeat(Bound::Lit(1), Bound::Inf, atom)))
            }
            Token::LBrace => {
                self.bump()?;
                let n = self.parse_bound_inline()?;
                self.expect(Token::RBrace, "closing '}'")?;
                Ok(Rc::new(GrammarExpr::Repeat(n, n, atom)))
            }
            Token::Times => {
                self.bump()?;
                let n = self.parse_bound_inline()?;
                Ok(Rc::new(GrammarExpr::Repeat(n, n, atom)))
            }
            _ => Ok(atom),
        }
    }

    fn parse_bound_inline(&mut self) -> Result<Bound, GrammarError> {
        let (tok, pos) = self.bump()?;
        match tok {
            Token::Number(n) => Ok(Bound::Lit(n)),
            Token::Ident(name) if name.chars().count() == 1 => {
                let c = name.chars().next().unwrap();
                if c.is_ascii_lowercase() {
                    return Ok(Bound::Var(c));
                }
                Err(self.err_at(pos, "a repeat count (digits or a binding variable)"))
            }
            other => Err(self.err_at(
                pos,
                format!("a repeat count (digits or a binding variable), found {:?}", other),
            )),
        }
    }

    fn parse_atom(&mut self) -> Result<Rc<GrammarExpr>, GrammarError> {
        let (tok, pos) = self.bump()?;
        match tok {
            Token::Str(s) => Ok(str_lit(s)),
            Token::Char(c) => Ok(Rc::new(GrammarExpr::Char(c))),
            Token::Hex(cp) => match char::from_u32(cp) {
                Some(c) => Ok(Rc::new(GrammarExpr::Char(c))),
                None => Err(self.err_at(pos, "a valid unicode code point")),
            },
            Token::LParen => {
                let inner = self.parse_alt()?;
                self.expect(Token::RParen, "closing ')'")?;
                Ok(inner)
            }
            Token::RuleRef(name, raw_args) => {
                let actuals = raw_args.iter().map(|a| to_actual(a)).collect();
                Ok(Rc::new(GrammarExpr::RuleRef(name, actuals)))
            }
            Token::Ident(name) => Ok(Rc::new(GrammarExpr::RuleRef(name, Vec::new()))),
            Token::LBracket => self.parse_bracket(),
            Token::Lt => self.parse_angle_form(),
            other => Err(self.err_at(pos, format!("an atom, found {:?}", other))),
        }
    }

    fn parse_bracket(&mut self) -> Result<Rc<GrammarExpr>, GrammarError> {
        match self.peek()?.clone() {
            Token::Hex(lo) => {
                self.bump()?;
                self.expect(Token::Minus, "'-' in a hex range")?;
                let (hi_tok, hi_pos) = self.bump()?;
                let hi = match hi_tok {
                    Token::Hex(hi) => hi,
                    other => {
                        return Err(self.err_at(hi_pos, format!("a hex escape, found {:?}", other)))
                    }
                };
                self.expect(Token::RBracket, "closing ']'")?;
                range(lo, hi + 1).map_err(|e| self.err_at(hi_pos, e))
            }
            Token::Ident(word) if word == "lookahead" => {
                self.bump()?;
                let (sign_tok, sign_pos) = self.bump()?;
                let positive = match sign_tok {
                    Token::Eq => true,
                    Token::Ne => false,
                    other => {
                        return Err(self.err_at(
                            sign_pos,
                            format!("'=' or '!=' after lookahead, found {:?}", other),
                        ))
                    }
                };
                let inner = self.parse_alt()?;
                self.expect(Token::RBracket, "closing ']'")?;
                Ok(Rc::new(GrammarExpr::Lookahead(positive, inner)))
            }
            Token::Ident(word) if word == "lookbehind" => {
                self.bump()?;
                self.expect(Token::Eq, "'=' after lookbehind")?;
                let inner = self.parse_alt()?;
                self.expect(Token::RBracket, "closing ']'")?;
                Ok(Rc::new(GrammarExpr::Lookbehind(inner)))
            }
            other => Err(self.err_at(
                self.lexer.position(),
                format!("a hex range or a lookaround, found {:?}", other),
            )),
        }
    }

    fn parse_angle_form(&mut self) -> Result<Rc<GrammarExpr>, GrammarError> {
        let (tok, pos) = self.bump()?;
        let word = match tok {
            Token::Ident(word) => word,
            other => return Err(self.err_at(pos, format!("a special form name, found {:?}", other))),
        };
        self.expect(Token::Gt, "closing '>'")?;
        match word.as_str() {
            "start-of-line" => Ok(Rc::new(GrammarExpr::StartOfLine)),
            "end-of-input" => Ok(Rc::new(GrammarExpr::EndOfInput)),
            "empty" => Ok(concat(Vec::new())),
            other => Err(self.err_at(
                pos,
                format!(
                    "one of <start-of-line>, <end-of-input>, <empty>, found <{}>",
                    other
                ),
            )),
        }
    }
}
