use crate::builtin::{BUILTIN_NAMES, Cd, Echo, Exit, Pwd, Type};
use crate::command::{CommandFactory, Context, ExitCode};
use crate::completion::CommandCompleter;
use crate::editor::{LineEditor, ReadOutcome};
use crate::env::Environment;
use crate::error::ShellError;
use crate::external::ExternalCommand;
use crate::io_adapters::CrlfWriter;
use crate::parser::{CommandRequest, parse_line};
use crate::redirect::{OutputTarget, open_target};
use crate::repository::CommandRepository;
use anyhow::Result;
use std::io::{Read, Write};
use tracing::{debug, info, warn};

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate: builtins and ExternalCommand.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// The shell session: environment, known commands, and the loop that ties the line
/// editor to command dispatch.
///
/// There is one per process, built once at startup and passed around explicitly.
///
/// Example
/// ```
/// use std::collections::HashMap;
/// use tabshell::Interpreter;
/// use tabshell::env::Environment;
///
/// let env = Environment::with_vars(HashMap::new(), std::env::temp_dir());
/// let mut sh = Interpreter::with_environment(env);
/// let (mut out, mut err) = (Vec::new(), Vec::new());
/// let code = sh.execute_line("echo 'hello   world'", &mut out, &mut err).unwrap();
/// assert_eq!(code, 0);
/// assert_eq!(out, b"hello   world\n");
/// ```
pub struct Interpreter {
    env: Environment,
    commands: CommandRepository,
    factories: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create an interpreter with a custom command table and set of command factories.
    pub fn new(
        env: Environment,
        commands: CommandRepository,
        factories: Vec<Box<dyn CommandFactory>>,
    ) -> Self {
        Self {
            env,
            commands,
            factories,
        }
    }

    /// Create an interpreter with the builtins and the executables on `env`'s `PATH`.
    pub fn with_environment(env: Environment) -> Self {
        let commands = CommandRepository::from_env(&env, &BUILTIN_NAMES);
        Self::new(env, commands, default_factories())
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn commands(&self) -> &CommandRepository {
        &self.commands
    }

    /// Parse one command line and run it, honouring its redirection.
    ///
    /// A line with nothing to run succeeds without output.
    pub fn execute_line(
        &mut self,
        line: &str,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<ExitCode> {
        let Some(request) = parse_line(line) else {
            return Ok(0);
        };
        dispatch(
            &mut self.env,
            &self.commands,
            &self.factories,
            request,
            stdout,
            stderr,
        )
    }

    /// Interactive loop: read a line with the editor, run it, repeat.
    ///
    /// `input` must deliver keystrokes byte by byte (a terminal in raw mode); prompt, echo
    /// and command output go to `output`, shell-level errors to `errors`. Ends on end of
    /// input or `exit`, returning the session's exit code. A failing command is reported
    /// and the loop goes on.
    pub fn repl<R: Read, W: Write, E: Write>(
        &mut self,
        input: R,
        output: W,
        errors: E,
    ) -> Result<ExitCode> {
        let Interpreter {
            env,
            commands,
            factories,
        } = self;
        let commands = &*commands;
        let factories = factories.as_slice();
        let mut editor = LineEditor::new(input, output, CommandCompleter::new(commands.tree()));
        let mut errors = CrlfWriter::new(errors);
        info!(commands = commands.len(), "session started");

        while !env.should_exit {
            let line = match editor.read_line()? {
                ReadOutcome::Line(line) => line,
                ReadOutcome::Eof => break,
            };
            let Some(request) = parse_line(&line) else {
                continue;
            };

            let mut out = CrlfWriter::new(editor.output());
            if let Err(e) = dispatch(env, commands, factories, request, &mut out, &mut errors) {
                warn!(error = %e, "command failed");
                writeln!(errors, "tabshell: {e:#}")?;
            }
        }

        info!(code = env.exit_code, "session ended");
        Ok(env.exit_code)
    }
}

impl Default for Interpreter {
    /// Create an interpreter for the current process environment.
    fn default() -> Self {
        Self::with_environment(Environment::new())
    }
}

/// Builtins first, so they shadow executables of the same name.
fn default_factories() -> Vec<Box<dyn CommandFactory>> {
    vec![
        Box::new(Factory::<Cd>::default()),
        Box::new(Factory::<Exit>::default()),
        Box::new(Factory::<Type>::default()),
        Box::new(Factory::<Pwd>::default()),
        Box::new(Factory::<Echo>::default()),
        Box::new(Factory::<ExternalCommand>::default()),
    ]
}

fn dispatch(
    env: &mut Environment,
    commands: &CommandRepository,
    factories: &[Box<dyn CommandFactory>],
    request: CommandRequest,
    terminal_out: &mut dyn Write,
    terminal_err: &mut dyn Write,
) -> Result<ExitCode> {
    let mut stdout_file;
    let stdout: &mut dyn Write = match &request.stdout {
        OutputTarget::Inherit => terminal_out,
        OutputTarget::File { path, append } => match open_target(path, *append, &env.current_dir) {
            Ok(file) => {
                stdout_file = file;
                &mut stdout_file
            }
            Err(e) => return report_redirect_failure(e, terminal_err),
        },
    };

    let mut stderr_file;
    let stderr: &mut dyn Write = match &request.stderr {
        OutputTarget::Inherit => terminal_err,
        OutputTarget::File { path, append } => match open_target(path, *append, &env.current_dir) {
            Ok(file) => {
                stderr_file = file;
                &mut stderr_file
            }
            Err(e) => return report_redirect_failure(e, terminal_err),
        },
    };

    let args: Vec<&str> = request.args.iter().map(String::as_str).collect();
    run_command(env, commands, factories, &request.name, &args, stdout, stderr)
}

fn report_redirect_failure(e: ShellError, terminal_err: &mut dyn Write) -> Result<ExitCode> {
    warn!(error = %e, "cannot open redirection target");
    writeln!(terminal_err, "tabshell: {e}")?;
    Ok(1)
}

fn run_command(
    env: &mut Environment,
    commands: &CommandRepository,
    factories: &[Box<dyn CommandFactory>],
    name: &str,
    args: &[&str],
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<ExitCode> {
    let mut ctx = Context { env, commands };
    for factory in factories {
        if let Some(cmd) = factory.try_create(&ctx, name, args) {
            debug!(command = name, ?args, "dispatching");
            let code = cmd.execute(stdout, stderr, &mut ctx)?;
            stdout.flush()?;
            stderr.flush()?;
            return Ok(code);
        }
    }
    debug!(command = name, "command not found");
    writeln!(stderr, "{name}: command not found")?;
    Ok(127)
}
