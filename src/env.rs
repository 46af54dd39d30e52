use crate::command::ExitCode;
use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// The shell's view of the process environment.
///
/// `current_dir` is the shell's working directory. The process working directory is never
/// changed; spawned commands and relative redirection targets use this one instead.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Variables passed on to spawned commands (PATH, HOME, ...).
    pub vars: HashMap<String, String>,
    pub current_dir: PathBuf,
    /// Set by `exit`; the session ends after the current command.
    pub should_exit: bool,
    /// Status the session ends with.
    pub exit_code: ExitCode,
}

impl Environment {
    /// Capture the variables and working directory of the current process.
    pub fn new() -> Self {
        let vars = stdenv::vars().collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_vars(vars, current_dir)
    }

    /// An environment with exactly the given variables, independent of the process.
    pub fn with_vars(vars: HashMap<String, String>, current_dir: PathBuf) -> Self {
        Self {
            vars,
            current_dir,
            should_exit: false,
            exit_code: 0,
        }
    }

    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
