//! Command pipeline
//!
//! Directive text -> `parser` -> `Vec<Intent>` -> `CommandExecutor` ->
//! `Vec<ActuatorCommand>` per tick.

pub mod actuator;
pub mod directive;
pub mod executor;
pub mod intent;
pub mod parser;

pub use actuator::ActuatorCommand;
pub use directive::Directive;
pub use executor::CommandExecutor;
pub use intent::{Intent, IntentKind};
pub use parser::{parse, parse_intents};
