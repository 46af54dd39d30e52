use anyhow::Result;
use argh::FromArgs;
use std::io;
use std::path::PathBuf;
use tabshell::Interpreter;
use tabshell::logging::init_logging;
use tabshell::terminal::RawModeGuard;

#[derive(FromArgs)]
/// Interactive shell with Tab completion of command names.
struct Args {
    #[argh(option)]
    /// append diagnostics to this file.
    log_file: Option<PathBuf>,

    #[argh(option, short = 'c')]
    /// run a single command line and exit with its status.
    command: Option<String>,
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();
    init_logging(args.log_file.as_deref())?;

    let mut shell = Interpreter::default();
    let code = match args.command {
        Some(line) => shell.execute_line(&line, &mut io::stdout(), &mut io::stderr())?,
        None => {
            let _raw = RawModeGuard::new()?;
            shell.repl(io::stdin().lock(), io::stdout(), io::stderr())?
        }
    };
    std::process::exit(code)
}
