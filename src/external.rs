use crate::command::{CommandFactory, Context, ExecutableCommand, ExitCode};
use crate::interpreter::Factory;
use crate::repository::CommandKind;
use anyhow::{Context as _, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

/// Command that is not a builtin: a program run as a child process.
pub struct ExternalCommand {
    name: String,
    program: PathBuf,
    args: Vec<String>,
}

impl ExternalCommand {
    pub fn new(name: impl Into<String>, program: PathBuf, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            program,
            args,
        }
    }
}

impl CommandFactory for Factory<ExternalCommand> {
    fn try_create(
        &self,
        ctx: &Context<'_>,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        let program = if name.contains('/') {
            find_command_path(&ctx.env.current_dir, Path::new(name))?
        } else {
            match ctx.commands.lookup(name)? {
                CommandKind::External(path) => path.clone(),
                CommandKind::Builtin => return None,
            }
        };
        Some(Box::new(ExternalCommand::new(
            name,
            program,
            args.iter().map(|x| x.to_string()).collect(),
        )))
    }
}

impl ExecutableCommand for ExternalCommand {
    /// Runs the program to completion with stdin detached, then writes what it printed.
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        ctx: &mut Context<'_>,
    ) -> Result<ExitCode> {
        let mut cmd = std::process::Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .env_clear()
            .envs(&ctx.env.vars)
            .current_dir(&ctx.env.current_dir);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.arg0(&self.name);
        }

        let output = cmd
            .output()
            .with_context(|| format!("{}: failed to run {}", self.name, self.program.display()))?;
        stdout.write_all(&output.stdout)?;
        stderr.write_all(&output.stderr)?;

        match output.status.code() {
            Some(x) => Ok(x),
            None => Ok(terminated_by_signal(output.status)),
        }
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}

/// Resolve a command given as a path rather than a bare name.
///
/// Absolute paths are used as they are; relative ones (`./foo`, `bin/sh`) are taken
/// relative to the shell's current directory. Only existing regular files resolve.
pub fn find_command_path(cwd: &Path, path: &Path) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        return None;
    }
    let full = cwd.join(path);
    full.is_file().then_some(full)
}
