//! `yaml-bnf` is a YAML 1.2.2 reader built by mechanically interpreting the
//! spec's own Backus-Naur grammar rather than by hand-writing a parser for
//! the language it describes.
//!
//! # Overview
//!
//! A YAML grammar file is a set of `name ::= body` definitions written in
//! the BNF dialect the YAML 1.2.2 specification itself uses: string and
//! character literals, Unicode code point ranges, concatenation,
//! alternation, repetition, set difference, lookaround, and parameterized
//! productions like `s-indent(n)`. [bnf] turns that text into an algebraic
//! [grammar::GrammarExpr] tree; [interpreter] then explores every
//! derivation of that tree against a fixed input text, the same way a
//! context-free parser explores a production, except here the productions
//! themselves are ordinary runtime data rather than Rust types.
//!
//! This mirrors the approach the crate's own ancestor (`lang_pt`) takes to
//! parsing: instead of hand-writing a recursive descent parser for one
//! language, build composable production utilities and let grammar
//! authors assemble a language out of them. Here the assembly step moves
//! one level further out — the grammar itself is data, loaded at runtime
//! from a BNF source file instead of built up with combinator calls in
//! Rust.
//!
//! # Design
//!
//! Three layers, loaded in this order:
//!
//! - [grammar] — the algebraic data model ([grammar::GrammarExpr],
//!   [grammar::Grammar]) that every other layer operates on.
//! - [bnf] — [bnf::BnfParser] and [bnf::load_grammar] turn BNF source text
//!   into [grammar::Grammar] values.
//! - [interpreter] — [interpreter::Engine] derives a [interpreter::ParseValue]
//!   (or reports [error::NoMatch]) for a loaded grammar against concrete
//!   input text, including parameterized productions, auto-enumerated
//!   binding variables, lookaround, and tree-mode parse nodes.
//!
//! [scalar] sits beside the core: once the interpreter has produced a leaf
//! string, [scalar::resolve] classifies it against YAML's core schema
//! (null, bool, int, float, timestamp, binary, or plain string). [reader]
//! combines all of the above into a single `Reader::read` call for callers
//! who just want a typed document back.
//!
//! # Example
//!
//! ```
//! use yaml_bnf::reader::{Document, Reader};
//! use yaml_bnf::scalar::Value;
//!
//! let grammar_text = "top ::= [x30-x39]+\n";
//! let reader = Reader::load(grammar_text).unwrap();
//! let doc = reader.read("top", "42").unwrap();
//! match doc {
//!     Document::Node { rule, inner, .. } => {
//!         assert_eq!(rule, "top");
//!         assert_eq!(*inner, Document::Scalar(Value::Int(42)));
//!     }
//!     other => panic!("expected a node, got {:?}", other),
//! }
//! ```
pub mod bnf;
pub mod error;
pub mod grammar;
pub mod interpreter;
pub mod reader;
pub mod scalar;
mod util;

pub use error::{GrammarError, NoMatch};
pub use grammar::{Grammar, GrammarExpr};
pub use interpreter::{Engine, ParseNode, ParseValue};
pub use reader::{Document, Reader};
