use super::{Code, Position};
use once_cell::unsync::OnceCell;

impl<'c> From<&'c str> for Code<'c> {
    fn from(value: &'c str) -> Self {
        Code::new(value)
    }
}

impl<'c> Code<'c> {
    pub fn new(value: &'c str) -> Self {
        Self {
            value,
            line_breaks: OnceCell::new(),
        }
    }

    /// Character indices (not byte offsets) of every `\n` in the document,
    /// used both for [Position] lookups and for [StartOfLine](crate::grammar::GrammarExpr::StartOfLine).
    pub fn obtain_line_breaks(&self) -> &Vec<usize> {
        self.line_breaks.get_or_init(|| {
            self.value
                .chars()
                .enumerate()
                .filter_map(|(index, c)| if c == '\n' { Some(index) } else { None })
                .collect()
        })
    }

    pub fn obtain_position(&self, pointer: usize) -> Position {
        let line_breaks = self.obtain_line_breaks();
        let index = match line_breaks.binary_search(&pointer) {
            Ok(index) | Err(index) => index,
        };

        if index == 0 {
            Position::new(1, pointer + 1)
        } else {
            let break_point = line_breaks[index - 1] + 1;
            Position::new(index + 1, pointer - break_point + 1)
        }
    }

    /// `true` at character index 0 or immediately after a `\n`, per
    /// spec.md's `StartOfLine` production.
    pub fn is_start_of_line(&self, pointer: usize) -> bool {
        pointer == 0 || self.obtain_line_breaks().iter().any(|&b| b + 1 == pointer)
    }
}
