//! Chat command handling: parsing, validation, execution and the two-step
//! domain removal.

pub mod interpreter;
pub mod messages;
pub mod parser;

pub use interpreter::CommandInterpreter;
pub use parser::{Command, parse};
