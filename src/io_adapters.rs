use std::io::{Result as IoResult, Write};

/// Writer for a terminal in raw mode: every bare `\n` goes out as `\r\n`.
///
/// A `\n` already preceded by `\r` is left alone, also when the two arrive in
/// separate writes.
pub struct CrlfWriter<W> {
    inner: W,
    last_was_cr: bool,
}

impl<W: Write> CrlfWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            last_was_cr: false,
        }
    }
}

impl<W: Write> Write for CrlfWriter<W> {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        let mut start = 0;
        for (i, &b) in data.iter().enumerate() {
            let after_cr = match i {
                0 => self.last_was_cr,
                _ => data[i - 1] == b'\r',
            };
            if b == b'\n' && !after_cr {
                self.inner.write_all(&data[start..i])?;
                self.inner.write_all(b"\r")?;
                start = i;
            }
        }
        self.inner.write_all(&data[start..])?;
        if let Some(&last) = data.last() {
            self.last_was_cr = last == b'\r';
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(chunks: &[&str]) -> String {
        let mut w = CrlfWriter::new(Vec::new());
        for chunk in chunks {
            w.write_all(chunk.as_bytes()).unwrap();
        }
        String::from_utf8(w.inner).unwrap()
    }

    #[test]
    fn test_bare_newlines_become_crlf() {
        assert_eq!(translate(&["a\nb\n"]), "a\r\nb\r\n");
        assert_eq!(translate(&["\n\n"]), "\r\n\r\n");
        assert_eq!(translate(&["no newline"]), "no newline");
    }

    #[test]
    fn test_existing_crlf_is_kept() {
        assert_eq!(translate(&["a\r\nb\n"]), "a\r\nb\r\n");
        assert_eq!(translate(&["a\r", "\nb"]), "a\r\nb");
        assert_eq!(translate(&["a\n", "\n"]), "a\r\n\r\n");
    }
}
