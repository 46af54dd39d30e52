//! Turns a submitted line into a [`CommandRequest`].

use crate::lexer::split_into_words;
use crate::redirect::{OutputTarget, Redirections, split_redirections};

/// Everything needed to dispatch one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub name: String,
    pub args: Vec<String>,
    pub stdout: OutputTarget,
    pub stderr: OutputTarget,
}

/// Parses a line: redirections are split off first, then the rest is lexed into words.
///
/// Returns `None` when there is nothing to run, i.e. the command part has no words.
pub fn parse_line(line: &str) -> Option<CommandRequest> {
    let Redirections {
        command,
        stdout,
        stderr,
    } = split_redirections(line);

    let mut words = split_into_words(command).into_iter();
    let name = words.next()?;
    Some(CommandRequest {
        name,
        args: words.collect(),
        stdout,
        stderr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_simple_command() {
        let req = parse_line("echo hello   world").unwrap();
        assert_eq!(req.name, "echo");
        assert_eq!(req.args, vec!["hello", "world"]);
        assert_eq!(req.stdout, OutputTarget::Inherit);
        assert_eq!(req.stderr, OutputTarget::Inherit);
    }

    #[test]
    fn test_parse_quoted_arguments() {
        let req = parse_line("echo 'hello   world'").unwrap();
        assert_eq!(req.args, vec!["hello   world"]);

        let req = parse_line(r#"echo "say \"hi\" now""#).unwrap();
        assert_eq!(req.args, vec![r#"say "hi" now"#]);
    }

    #[test]
    fn test_parse_quoted_command_name() {
        let req = parse_line(r#"'my prog' "a b""#).unwrap();
        assert_eq!(req.name, "my prog");
        assert_eq!(req.args, vec!["a b"]);
    }

    #[test]
    fn test_parse_with_stdout_redirect() {
        let req = parse_line("ls /tmp 1>> out.txt").unwrap();
        assert_eq!(req.name, "ls");
        assert_eq!(req.args, vec!["/tmp"]);
        assert_eq!(
            req.stdout,
            OutputTarget::File {
                path: PathBuf::from("out.txt"),
                append: true
            }
        );
        assert_eq!(req.stderr, OutputTarget::Inherit);
    }

    #[test]
    fn test_parse_with_stderr_redirect() {
        let req = parse_line("cmd 2> err.txt").unwrap();
        assert_eq!(req.name, "cmd");
        assert!(req.args.is_empty());
        assert_eq!(req.stdout, OutputTarget::Inherit);
        assert_eq!(
            req.stderr,
            OutputTarget::File {
                path: PathBuf::from("err.txt"),
                append: false
            }
        );
    }

    #[test]
    fn test_parse_nothing_to_run() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("    "), None);
        assert_eq!(parse_line("> out.txt"), None);
    }
}
