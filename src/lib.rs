//! An interactive command shell with a raw-mode line editor and Tab completion.
//!
//! The shell reads keystrokes byte by byte, keeps its own line buffer and completes command
//! names from a prefix tree filled with the builtins and the executables on `PATH`.
//! Submitted lines are split into words with POSIX-style quoting, may redirect one output
//! stream to a file, and run either as a builtin (`cd`, `exit`, `type`, `pwd`, `echo`) or
//! as a child process.
//!
//! The main entry point is [`Interpreter`]. [`Interpreter::repl`] runs an interactive
//! session over any byte source and sink, [`Interpreter::execute_line`] runs one line.

mod builtin;
pub mod command;
pub mod completion;
pub mod editor;
pub mod env;
pub mod error;
mod external;
mod interpreter;
pub mod io_adapters;
pub mod lexer;
pub mod logging;
pub mod parser;
pub mod redirect;
pub mod repository;
pub mod terminal;
#[cfg(test)]
mod test_util;
pub mod trie;

pub use error::ShellError;
pub use interpreter::Interpreter;
