use crate::command::{CommandFactory, Context, ExecutableCommand, ExitCode};
use crate::interpreter::Factory;
use crate::repository::CommandKind;
use anyhow::{Context as _, Result, anyhow};
use argh::{EarlyExit, FromArgs};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Names of every builtin, in the order the shell registers them.
pub const BUILTIN_NAMES: [&str; 5] = ["cd", "exit", "type", "pwd", "echo"];

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "echo" or "cd".
    fn name() -> &'static str;

    /// Executes the command. An `Err` is reported on stderr and turns into exit code 1.
    fn execute(self, stdout: &mut dyn Write, ctx: &mut Context<'_>) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        ctx: &mut Context<'_>,
    ) -> Result<ExitCode> {
        match <T as BuiltinCommand>::execute(*self, stdout, ctx) {
            Ok(x) => Ok(x),
            Err(e) => {
                writeln!(stderr, "{e}")?;
                Ok(1)
            }
        }
    }
}

/// Result of `--help` or of arguments argh refused.
struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        _ctx: &mut Context<'_>,
    ) -> Result<ExitCode> {
        if self.is_error {
            writeln!(stderr, "{}", self.output.trim_end())?;
            Ok(1)
        } else {
            writeln!(stdout, "{}", self.output.trim_end())?;
            Ok(0)
        }
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _ctx: &Context<'_>,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name != T::name() {
            return None;
        }
        Some(match T::from_args(&[name], args) {
            Ok(cmd) => Box::new(cmd),
            Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                output,
                is_error: status.is_err(),
            }),
        })
    }
}

#[derive(FromArgs)]
/// Print the current working directory to standard output.
pub struct Pwd {}

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn execute(self, stdout: &mut dyn Write, ctx: &mut Context<'_>) -> Result<ExitCode> {
        writeln!(stdout, "{}", ctx.env.current_dir.display())?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute, relative to the current directory, or starting with ~ for $HOME.
    pub target: String,
}

impl Cd {
    fn resolve(&self, ctx: &Context<'_>) -> Result<PathBuf> {
        if let Some(rest) = self.target.strip_prefix('~') {
            let home = ctx
                .env
                .get_var("HOME")
                .ok_or_else(|| anyhow!("cd: HOME not set"))?;
            return Ok(PathBuf::from(home).join(rest.trim_start_matches('/')));
        }
        Ok(ctx.env.current_dir.join(&self.target))
    }
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, _stdout: &mut dyn Write, ctx: &mut Context<'_>) -> Result<ExitCode> {
        let new_dir = self.resolve(ctx)?;

        let metadata = fs::metadata(&new_dir)
            .map_err(|_| anyhow!("cd: {}: No such file or directory", self.target))?;
        if !metadata.is_dir() {
            return Err(anyhow!("cd: {}: Not a directory", self.target));
        }

        let canonical = fs::canonicalize(&new_dir)
            .with_context(|| format!("cd: can't canonicalize {}", new_dir.display()))?;
        ctx.env.current_dir = canonical;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Exit the shell.
pub struct Exit {
    #[argh(positional)]
    /// exit status of the shell, 0 when omitted.
    pub code: Option<ExitCode>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _stdout: &mut dyn Write, ctx: &mut Context<'_>) -> Result<ExitCode> {
        let code = self.code.unwrap_or(0);
        ctx.env.should_exit = true;
        ctx.env.exit_code = code;
        Ok(code)
    }
}

#[derive(FromArgs)]
/// Write the arguments to standard output, separated by spaces.
/// By default, a trailing newline is printed.
pub struct Echo {
    #[argh(switch, short = 'n')]
    /// do not output the trailing newline.
    pub no_newline: bool,

    #[argh(positional, greedy)]
    /// values to print as-is, separated by spaces.
    pub args: Vec<String>,
}

impl BuiltinCommand for Echo {
    fn name() -> &'static str {
        "echo"
    }

    fn execute(self, stdout: &mut dyn Write, _ctx: &mut Context<'_>) -> Result<ExitCode> {
        let s = self.args.join(" ");
        if self.no_newline {
            write!(stdout, "{}", s)?;
        } else {
            writeln!(stdout, "{}", s)?;
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Tell how a command name would be interpreted.
pub struct Type {
    #[argh(positional)]
    /// command name to look up.
    pub name: String,
}

impl BuiltinCommand for Type {
    fn name() -> &'static str {
        "type"
    }

    fn execute(self, stdout: &mut dyn Write, ctx: &mut Context<'_>) -> Result<ExitCode> {
        match ctx.commands.lookup(&self.name) {
            Some(CommandKind::Builtin) => writeln!(stdout, "{} is a shell builtin", self.name)?,
            Some(CommandKind::External(path)) => {
                writeln!(stdout, "{} is {}", self.name, path.display())?
            }
            None => return Err(anyhow!("{}: not found", self.name)),
        }
        Ok(0)
    }
}
