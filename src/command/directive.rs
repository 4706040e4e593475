//! Caller-level interpretation of a directive line
//!
//! "stop" and empty text are reserved: they clear the active strategy and
//! never reach the parser.

use crate::command::intent::Intent;
use crate::command::parser::parse_intents;
use crate::grid::GridSpec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Clear every active intent
    Stop,
    /// Replace the active intents with these
    Strategy(Vec<Intent>),
    /// Nothing recognizable; the caller decides whether to tell the user
    Unrecognized,
}

impl Directive {
    pub fn interpret(text: &str, spec: &GridSpec) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("stop") {
            return Directive::Stop;
        }
        let intents = parse_intents(trimmed, spec);
        if intents.is_empty() {
            Directive::Unrecognized
        } else {
            Directive::Strategy(intents)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_is_reserved() {
        let spec = GridSpec::default();
        assert_eq!(Directive::interpret("stop", &spec), Directive::Stop);
        assert_eq!(Directive::interpret("  STOP ", &spec), Directive::Stop);
        assert_eq!(Directive::interpret("", &spec), Directive::Stop);
    }

    #[test]
    fn test_strategy_and_unrecognized() {
        let spec = GridSpec::default();
        match Directive::interpret("guard E5", &spec) {
            Directive::Strategy(intents) => assert_eq!(intents.len(), 1),
            other => panic!("expected strategy, got {other:?}"),
        }
        assert_eq!(
            Directive::interpret("stop and guard E5", &spec),
            Directive::Strategy(vec![Intent::Guard {
                cell: "E5".parse().unwrap()
            }])
        );
        assert_eq!(Directive::interpret("hello there", &spec), Directive::Unrecognized);
    }
}
