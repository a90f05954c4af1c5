mod code;
mod logger;
mod position;
use once_cell::unsync::OnceCell;

/// The line and column of a byte offset into an input document, one-indexed
/// the same way the teacher's own `Position` is: the first character of the
/// first line is `(1, 1)`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// A wrapper around the input text with lazily-computed line break offsets,
/// used to translate a byte pointer into a [Position] for error messages.
pub struct Code<'c> {
    pub value: &'c str,
    line_breaks: OnceCell<Vec<usize>>,
}

/// Debug-only verbosity levels for derivation tracing, ordered so a level
/// only prints messages at or below its own order. Gated on
/// `cfg(debug_assertions)` exactly like the teacher's logging, rather than
/// routed through `log`/`tracing`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Log<T> {
    None,
    Default(T),
    Success(T),
    Result(T),
    Verbose(T),
}
