//! Logical entry reader.
//!
//! zsh writes a multi-line command as several physical lines, each one but
//! the last ending in a backslash. [`EntryReader`] stitches those back
//! together, turning every trailing backslash into the newline it replaced.
//!
//! A command that really ends in a backslash is indistinguishable from a
//! continuation and is read as one.

use std::io::BufRead;

use crate::error::ImportError;

/// Reads logical history entries from a line-oriented source.
pub struct EntryReader<R> {
    inner: R,
    buf: Vec<u8>,
}

impl<R: BufRead> EntryReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
        }
    }

    /// Reads the next logical entry.
    ///
    /// Returns `Ok(None)` once the source is exhausted. An empty string is a
    /// blank line and is returned as-is so callers can skip it. A
    /// continuation left dangling at end of input is returned with whatever
    /// was accumulated.
    pub fn read_entry(&mut self) -> Result<Option<String>, ImportError> {
        let mut entry = String::new();
        let mut read_any = false;

        while let Some(line) = self.read_line()? {
            read_any = true;
            entry.push_str(&line);

            if entry.is_empty() {
                break;
            }
            if entry.ends_with('\\') {
                entry.pop();
                entry.push('\n');
                continue;
            }
            break;
        }

        Ok(read_any.then_some(entry))
    }

    /// Reads one physical line without its terminator.
    ///
    /// Invalid UTF-8 is replaced rather than rejected; a byte-order mark is
    /// left in place.
    fn read_line(&mut self) -> Result<Option<String>, ImportError> {
        self.buf.clear();
        if self.inner.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }

        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

impl<R: BufRead> Iterator for EntryReader<R> {
    type Item = Result<String, ImportError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_entry().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, BufReader, Read};

    fn entries(input: &str) -> Vec<String> {
        EntryReader::new(input.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .expect("reading from memory should not fail")
    }

    #[test]
    fn test_plain_lines_map_one_to_one() {
        let input = ": 1471766782:0;git status\n\
                     : 1471766797:0;git commit -am \"Update README.md\"\n\
                     : 1471766804:3;git push origin master\n";

        assert_eq!(
            entries(input),
            vec![
                ": 1471766782:0;git status",
                ": 1471766797:0;git commit -am \"Update README.md\"",
                ": 1471766804:3;git push origin master",
            ]
        );
    }

    #[test]
    fn test_continuation_joins_with_newline() {
        let input = ": 1472100273:0;echo \"hello\\\nworld\"\n";
        assert_eq!(entries(input), vec![": 1472100273:0;echo \"hello\nworld\""]);
    }

    #[test]
    fn test_double_backslash_strips_only_one() {
        let input = ": 1472100278:0;echo \"hello\\\\\nworld\"\n";
        assert_eq!(
            entries(input),
            vec![": 1472100278:0;echo \"hello\\\nworld\""]
        );
    }

    #[test]
    fn test_continuation_across_blank_physical_line() {
        let input = ": 1472100284:0;echo \"hello\\\ncruel\\\n\\\nworld\"\n";
        assert_eq!(
            entries(input),
            vec![": 1472100284:0;echo \"hello\ncruel\n\nworld\""]
        );
    }

    #[test]
    fn test_continuation_followed_by_empty_line() {
        let input = ": 1472100290:0;git commit -m 'rebuild the dam\\\n\n: 1472100291:0;ls\n";
        assert_eq!(
            entries(input),
            vec![
                ": 1472100290:0;git commit -m 'rebuild the dam\n",
                ": 1472100291:0;ls",
            ]
        );
    }

    #[test]
    fn test_blank_line_is_its_own_entry() {
        let input = ": 1:0;a\n\n: 2:0;b\n";
        assert_eq!(entries(input), vec![": 1:0;a", "", ": 2:0;b"]);
    }

    #[test]
    fn test_final_line_without_newline() {
        assert_eq!(entries(": 1:0;pwd"), vec![": 1:0;pwd"]);
    }

    #[test]
    fn test_dangling_continuation_at_eof_is_returned() {
        assert_eq!(entries(": 1:0;echo \\"), vec![": 1:0;echo \n"]);
    }

    #[test]
    fn test_crlf_terminators_are_dropped() {
        assert_eq!(entries(": 1:0;a\r\n: 2:0;b\r\n"), vec![": 1:0;a", ": 2:0;b"]);
    }

    #[test]
    fn test_cr_at_eof_is_dropped() {
        assert_eq!(entries(": 1:0;a\r"), vec![": 1:0;a"]);
        assert_eq!(entries(": 1:0;a\n: 2:0;b\r"), vec![": 1:0;a", ": 2:0;b"]);
    }

    #[test]
    fn test_byte_order_mark_is_preserved() {
        let input = "\u{feff}: 1:0;make\n";
        assert_eq!(entries(input), vec!["\u{feff}: 1:0;make"]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let input: &[u8] = b": 1:0;echo \xff\n";
        let got = EntryReader::new(input)
            .read_entry()
            .expect("read should succeed")
            .expect("entry should exist");
        assert_eq!(got, ": 1:0;echo \u{fffd}");
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let mut reader = EntryReader::new(&b""[..]);
        assert!(reader.read_entry().expect("read should succeed").is_none());
    }

    struct BrokenSource;

    impl Read for BrokenSource {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn test_read_error_is_surfaced() {
        let mut reader = EntryReader::new(BufReader::new(BrokenSource));
        let err = reader.read_entry().expect_err("read should fail");
        assert!(matches!(err, ImportError::Stream(_)));
    }
}
