//! Execution engine: the interpreter and its async dispatch seam.

mod dispatcher;
mod interpreter;

pub use dispatcher::Dispatcher;
pub use interpreter::Interpreter;
