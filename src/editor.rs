//! Raw-mode line editor.
//!
//! The terminal delivers keystrokes one byte at a time and does no echoing of its own, so
//! the editor keeps the unsubmitted line, echoes what is typed and redraws after edits.
//! All terminal output uses `\r\n` line endings, as raw mode doesn't translate `\n`.

use crate::completion::Complete;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Read, Write};
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Written before every line.
pub const PROMPT: &str = "$ ";

const CTRL_C: u8 = 0x03;
const CTRL_D: u8 = 0x04;
const BACKSPACE: u8 = 0x08;
const TAB: u8 = b'\t';
const ENTER: u8 = b'\r';
const DELETE: u8 = 0x7f;
const BELL: &[u8] = b"\x07";
const ERASE: &[u8] = b"\x08 \x08";

/// Result of reading one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Enter was pressed. The line is trimmed and may be empty.
    Line(String),
    /// Ctrl-D on an empty line, or the byte source ran dry.
    Eof,
}

/// Reads lines from a byte source, rendering the prompt and edits on `output`.
///
/// Key handling:
/// - Ctrl-C drops the line and starts a fresh prompt;
/// - Ctrl-D ends input, but only on an empty line, otherwise it is ignored;
/// - Backspace/Delete erase the last character;
/// - Tab completes through `C`. If completion is ambiguous the first Tab rings the bell
///   and a second Tab in a row lists the candidates;
/// - any other byte is appended and echoed.
pub struct LineEditor<R, W, C> {
    input: R,
    output: W,
    completer: C,
    buffer: Vec<u8>,
    /// Candidates of an ambiguous completion, shown by the next Tab.
    pending: Option<Vec<String>>,
}

impl<R: Read, W: Write, C: Complete> LineEditor<R, W, C> {
    pub fn new(input: R, output: W, completer: C) -> Self {
        Self {
            input,
            output,
            completer,
            buffer: Vec::new(),
            pending: None,
        }
    }

    /// The display sink, for output that has to appear between prompts.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Writes the prompt and processes keystrokes until a line is submitted or input ends.
    pub fn read_line(&mut self) -> io::Result<ReadOutcome> {
        self.buffer.clear();
        self.pending = None;
        self.output.write_all(PROMPT.as_bytes())?;
        self.output.flush()?;

        loop {
            let Some(byte) = self.read_byte()? else {
                self.output.write_all(b"\r\n")?;
                self.output.flush()?;
                return Ok(ReadOutcome::Eof);
            };
            let outcome = self.handle_byte(byte)?;
            self.output.flush()?;
            if let Some(outcome) = outcome {
                return Ok(outcome);
            }
        }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.input.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn handle_byte(&mut self, byte: u8) -> io::Result<Option<ReadOutcome>> {
        if byte != TAB {
            self.pending = None;
        }

        match byte {
            CTRL_C => {
                debug!("line interrupted");
                self.buffer.clear();
                write!(self.output, "^C\r\n{PROMPT}")?;
            }
            CTRL_D if self.buffer.is_empty() => {
                self.output.write_all(b"\r\n")?;
                return Ok(Some(ReadOutcome::Eof));
            }
            // Ctrl-D on a non-empty line does nothing.
            CTRL_D => {}
            BACKSPACE | DELETE => self.erase()?,
            ENTER => {
                self.output.write_all(b"\r\n")?;
                let line = String::from_utf8_lossy(&self.buffer).trim().to_string();
                return Ok(Some(ReadOutcome::Line(line)));
            }
            TAB => self.complete()?,
            other => {
                self.buffer.push(other);
                self.output.write_all(&[other])?;
            }
        }
        Ok(None)
    }

    fn erase(&mut self) -> io::Result<()> {
        let Some(columns) = self.pop_last_char() else {
            return Ok(());
        };
        for _ in 0..columns.max(1) {
            self.output.write_all(ERASE)?;
        }
        Ok(())
    }

    /// Removes the last user-perceived character and returns its display width.
    fn pop_last_char(&mut self) -> Option<usize> {
        match std::str::from_utf8(&self.buffer) {
            Ok(text) => {
                let (start, grapheme) = text.grapheme_indices(true).next_back()?;
                let width = grapheme.width();
                self.buffer.truncate(start);
                Some(width)
            }
            // A multi-byte character is still arriving.
            Err(_) => self.buffer.pop().map(|_| 1),
        }
    }

    fn complete(&mut self) -> io::Result<()> {
        if let Some(candidates) = self.pending.take() {
            write!(self.output, "\r\n{}\r\n{PROMPT}", candidates.join("  "))?;
            self.output.write_all(&self.buffer)?;
            return Ok(());
        }

        let mut candidates = {
            let input = String::from_utf8_lossy(&self.buffer);
            self.completer.complete(&input)
        };

        match candidates.len() {
            0 => self.output.write_all(BELL)?,
            1 => {
                let mut completed = candidates.swap_remove(0);
                completed.push(' ');
                queue!(
                    self.output,
                    Print('\r'),
                    Clear(ClearType::UntilNewLine),
                    Print(PROMPT),
                    Print(&completed)
                )?;
                self.buffer = completed.into_bytes();
            }
            _ => {
                self.output.write_all(BELL)?;
                self.pending = Some(candidates);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CommandCompleter;
    use crate::trie::PrefixTree;
    use std::io::Cursor;

    fn tree() -> PrefixTree {
        ["echo", "exit", "pwd", "type", "cd", "cat", "cargo"]
            .into_iter()
            .collect()
    }

    /// Feeds `keys` to a fresh editor and collects every outcome until input runs out.
    fn run(tree: &PrefixTree, keys: &[u8]) -> (Vec<ReadOutcome>, String) {
        let mut out = Vec::new();
        let mut outcomes = Vec::new();
        {
            let mut editor =
                LineEditor::new(Cursor::new(keys.to_vec()), &mut out, CommandCompleter::new(tree));
            loop {
                let outcome = editor.read_line().unwrap();
                let done = outcome == ReadOutcome::Eof;
                outcomes.push(outcome);
                if done {
                    break;
                }
            }
        }
        (outcomes, String::from_utf8(out).unwrap())
    }

    fn line(s: &str) -> ReadOutcome {
        ReadOutcome::Line(s.to_string())
    }

    #[test]
    fn test_typed_line_is_echoed_and_trimmed() {
        let tree = tree();
        let (outcomes, screen) = run(&tree, b"  echo hi  \r");
        assert_eq!(outcomes, vec![line("echo hi"), ReadOutcome::Eof]);
        assert_eq!(screen, "$   echo hi  \r\n$ \r\n");
    }

    #[test]
    fn test_backspace_erases_last_character() {
        let tree = tree();
        let (outcomes, screen) = run(&tree, b"pwdx\x7f\r");
        assert_eq!(outcomes[0], line("pwd"));
        assert!(screen.starts_with("$ pwdx\x08 \x08\r\n"));

        let (outcomes, _) = run(&tree, b"ab\x08\x08\x08\x08c\r");
        assert_eq!(outcomes[0], line("c"));
    }

    #[test]
    fn test_backspace_on_empty_line_is_noop() {
        let tree = tree();
        let (outcomes, screen) = run(&tree, b"\x7f\r");
        assert_eq!(outcomes[0], line(""));
        assert_eq!(screen, "$ \r\n$ \r\n");
    }

    #[test]
    fn test_backspace_removes_whole_multibyte_character() {
        let tree = tree();
        let mut keys = "zażó".as_bytes().to_vec();
        keys.extend_from_slice(b"\x7f\r");
        let (outcomes, _) = run(&tree, &keys);
        assert_eq!(outcomes[0], line("zaż"));

        let mut keys = "日".as_bytes().to_vec();
        keys.extend_from_slice(b"\x7f\r");
        let (outcomes, screen) = run(&tree, &keys);
        assert_eq!(outcomes[0], line(""));
        // Wide characters take two columns to erase.
        assert!(screen.contains("\x08 \x08\x08 \x08"));
    }

    #[test]
    fn test_interrupt_discards_line_and_continues() {
        let tree = tree();
        let (outcomes, screen) = run(&tree, b"echo abc\x03pwd\r");
        assert_eq!(outcomes, vec![line("pwd"), ReadOutcome::Eof]);
        assert!(screen.starts_with("$ echo abc^C\r\n$ pwd\r\n"));
    }

    #[test]
    fn test_ctrl_d_on_empty_line_ends_input() {
        let tree = tree();
        let (outcomes, screen) = run(&tree, b"\x04pwd\r");
        assert_eq!(outcomes, vec![ReadOutcome::Eof]);
        assert_eq!(screen, "$ \r\n");
    }

    #[test]
    fn test_ctrl_d_on_non_empty_line_is_ignored() {
        let tree = tree();
        let (outcomes, _) = run(&tree, b"ech\x04o hi\r");
        assert_eq!(outcomes[0], line("echo hi"));

        // With nothing else to read the line is never submitted; input just runs out.
        let (outcomes, screen) = run(&tree, b"pwd\x04");
        assert_eq!(outcomes, vec![ReadOutcome::Eof]);
        assert_eq!(screen, "$ pwd\r\n");
    }

    #[test]
    fn test_tab_completes_unique_command() {
        let tree = tree();
        let (outcomes, screen) = run(&tree, b"ty\tfoo\r");
        assert_eq!(outcomes[0], line("type foo"));
        assert!(screen.starts_with("$ ty\r\x1b[K$ type foo\r\n"));
    }

    #[test]
    fn test_tab_without_match_rings_bell() {
        let tree = tree();
        let (outcomes, screen) = run(&tree, b"zz\t\r");
        assert_eq!(outcomes[0], line("zz"));
        assert!(screen.starts_with("$ zz\x07\r\n"));

        let (outcomes, screen) = run(&tree, b"\t\r");
        assert_eq!(outcomes[0], line(""));
        assert!(screen.starts_with("$ \x07\r\n"));
    }

    #[test]
    fn test_double_tab_lists_ambiguous_candidates() {
        let tree = tree();
        let (outcomes, screen) = run(&tree, b"e\t\t\r");
        assert_eq!(outcomes[0], line("e"));
        assert!(screen.starts_with("$ e\x07\r\necho  exit\r\n$ e\r\n"));
    }

    #[test]
    fn test_third_tab_starts_over() {
        let tree = tree();
        let (_, screen) = run(&tree, b"e\t\t\t\r");
        assert!(screen.starts_with("$ e\x07\r\necho  exit\r\n$ e\x07\r\n"));
    }

    #[test]
    fn test_other_key_clears_pending_candidates() {
        let tree = tree();
        // The `x` between the tabs forgets the first ambiguous result.
        let (outcomes, screen) = run(&tree, b"e\tx\t\r");
        assert_eq!(outcomes[0], line("exit"));
        assert!(!screen.contains("echo  exit"));
        assert!(screen.contains("\r\x1b[K$ exit "));
    }

    #[test]
    fn test_single_group_completes_to_first_word() {
        let tree = tree();
        // `car` only continues with `g`, so `cargo` is completed even though `ca` is ambiguous.
        let (outcomes, _) = run(&tree, b"car\t\r");
        assert_eq!(outcomes[0], line("cargo"));

        let (outcomes, screen) = run(&tree, b"ca\t\t\r");
        assert_eq!(outcomes[0], line("ca"));
        assert!(screen.contains("\r\ncargo  cat\r\n"));
    }
}
