//! Lexical analysis of a command line into argument words.
//!
//! Quoting follows the POSIX shell rules the prompt supports:
//! - `'...'` copies everything verbatim up to the closing quote.
//! - `"..."` copies everything up to the closing quote, except that a backslash followed
//!   by `"`, `\`, `$` or a newline produces that character alone. Any other backslash
//!   sequence is kept as written, backslash included.
//! - Outside quotes a backslash makes the next character literal, whatever it is.
//! - Unquoted whitespace separates words. Quoted spans glue onto the surrounding word,
//!   so `a'b'"c"` is the single word `abc`.
//!
//! Lexing never fails. An unterminated quote runs to the end of the line and a trailing
//! lone backslash is kept as a literal backslash.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexingState {
    /// Between words, skipping whitespace.
    Start,
    ReadingWord,
    ReadingSingleQuote,
    ReadingDoubleQuote,
    /// Just consumed a `\` inside double quotes.
    DoubleQuoteEscape,
    /// Just consumed a `\` outside quotes.
    Escape,
}

struct LexingFSM {
    state: LexingState,
    word: String,
    words: Vec<String>,
}

impl LexingFSM {
    fn new() -> Self {
        LexingFSM {
            state: LexingState::Start,
            word: String::new(),
            words: Vec::new(),
        }
    }

    /// Feeds every character of `line` through the state machine and returns the words.
    fn make_words(mut self, line: &str) -> Vec<String> {
        for ch in line.chars() {
            match self.state {
                LexingState::Start => self.handle_start(ch),
                LexingState::ReadingWord => self.handle_word(ch),
                LexingState::ReadingSingleQuote => self.handle_single_quote(ch),
                LexingState::ReadingDoubleQuote => self.handle_double_quote(ch),
                LexingState::DoubleQuoteEscape => self.handle_double_quote_escape(ch),
                LexingState::Escape => self.handle_escape(ch),
            }
        }

        match self.state {
            LexingState::Start => {}
            LexingState::Escape | LexingState::DoubleQuoteEscape => {
                self.word.push('\\');
                self.finish_word();
            }
            _ => self.finish_word(),
        }
        self.words
    }

    fn handle_start(&mut self, ch: char) {
        if !ch.is_whitespace() {
            self.handle_word(ch);
        }
    }

    fn handle_word(&mut self, ch: char) {
        self.state = match ch {
            c if c.is_whitespace() => {
                self.finish_word();
                LexingState::Start
            }
            '\'' => LexingState::ReadingSingleQuote,
            '"' => LexingState::ReadingDoubleQuote,
            '\\' => LexingState::Escape,
            c => {
                self.word.push(c);
                LexingState::ReadingWord
            }
        };
    }

    fn handle_single_quote(&mut self, ch: char) {
        match ch {
            '\'' => self.state = LexingState::ReadingWord,
            c => self.word.push(c),
        }
    }

    fn handle_double_quote(&mut self, ch: char) {
        match ch {
            '"' => self.state = LexingState::ReadingWord,
            '\\' => self.state = LexingState::DoubleQuoteEscape,
            c => self.word.push(c),
        }
    }

    fn handle_double_quote_escape(&mut self, ch: char) {
        match ch {
            '"' | '\\' | '$' | '\n' => self.word.push(ch),
            c => {
                self.word.push('\\');
                self.word.push(c);
            }
        }
        self.state = LexingState::ReadingDoubleQuote;
    }

    fn handle_escape(&mut self, ch: char) {
        self.word.push(ch);
        self.state = LexingState::ReadingWord;
    }

    fn finish_word(&mut self) {
        self.words.push(std::mem::take(&mut self.word));
    }
}

/// Splits a command line into words, resolving quotes and escapes.
///
/// # Returns
/// The words in their original order. A line holding only whitespace yields no words.
pub fn split_into_words(line: &str) -> Vec<String> {
    LexingFSM::new().make_words(line)
}
