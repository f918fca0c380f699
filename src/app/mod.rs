// Application layer: interactive loop, command handlers and terminal output.

pub mod commands;
pub mod console;
pub mod context;
pub mod repl;
pub mod table;
