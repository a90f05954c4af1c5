use std::fmt::{Display, Formatter};

use crate::util::Code;

use super::Log;

impl<T: Display> Display for Log<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Log::None => Ok(()),
            Log::Default(s) | Log::Success(s) | Log::Result(s) | Log::Verbose(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

impl<T> Log<T> {
    /// Order of the log level; a level only prints at or below its own order.
    pub fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Default(_) => 1,
            Log::Success(_) => 2,
            Log::Result(_) => 3,
            Log::Verbose(_) => 4,
        }
    }
}

impl Log<&'static str> {
    /// Trace a rule invocation attempt. Gated on `cfg(debug_assertions)`
    /// exactly like the teacher's `log_success`/`wrap_lexeme_result`.
    pub fn log_rule_attempt(&self, rule: &str, index: usize, code: &Code) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Verbose(()).order() {
            println!(
                "[{}; RuleAttempt]: {} at {}",
                self,
                rule,
                code.obtain_position(index)
            );
        }
    }

    pub fn log_rule_result(&self, rule: &str, index: usize, derivations: usize, code: &Code) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Result(()).order() {
            println!(
                "[{}; RuleResult]: {} at {} -> {} derivation(s)",
                self,
                rule,
                code.obtain_position(index),
                derivations
            );
        }
    }
}
