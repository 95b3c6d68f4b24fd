// Seekable line-oriented streams shared by every telemetry parser.

mod file;

pub use file::{FileLineSource, open_checked};

use crate::error::{MonitorError, Result};
use std::io::{self, BufRead, Seek, SeekFrom};

/// A byte stream that can be read line by line and repositioned.
///
/// Offsets are byte offsets from the start of the stream. Lines are returned
/// without their `\n` / `\r\n` terminator; invalid UTF-8 is replaced lossily.
pub trait LineSource {
    /// Reads the next line, or `None` once the stream is exhausted.
    fn read_next_line(&mut self) -> io::Result<Option<String>>;

    fn seek_to(&mut self, offset: u64) -> io::Result<()>;

    fn offset(&mut self) -> io::Result<u64>;

    /// Reads the next line and moves back to where it started.
    fn peek_next_line(&mut self) -> io::Result<Option<String>> {
        let start = self.offset()?;
        let line = self.read_next_line()?;
        self.seek_to(start)?;
        Ok(line)
    }
}

impl<R: BufRead + Seek> LineSource for R {
    fn read_next_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        if self.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        self.seek(SeekFrom::Start(offset)).map(|_| ())
    }

    fn offset(&mut self) -> io::Result<u64> {
        self.stream_position()
    }
}

/// Runs `read` against `source` and puts the source back at its starting
/// offset afterwards, whether `read` succeeded or not.
///
/// When `read` fails its error wins over a failure to restore the offset.
pub fn restoring<S, T, F>(source: &mut S, read: F) -> Result<T>
where
    S: LineSource + ?Sized,
    F: FnOnce(&mut S) -> Result<T>,
{
    let start = source.offset()?;
    let outcome = read(source);
    let restored = source.seek_to(start);
    match (outcome, restored) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(e), _) => Err(e),
    }
}

/// Next line carrying data, or `None` at end of stream or on a blank line.
pub(crate) fn next_data_line<S>(source: &mut S) -> io::Result<Option<String>>
where
    S: LineSource + ?Sized,
{
    Ok(source.read_next_line()?.filter(|line| !line.is_empty()))
}

/// Discards `count` lines without looking at them.
pub(crate) fn skip_lines<S: LineSource + ?Sized>(
    source: &mut S,
    count: usize,
    what: &str,
) -> Result<()> {
    for skipped in 0..count {
        if source.read_next_line()?.is_none() {
            return Err(MonitorError::incomplete(format!(
                "{what} has only {skipped} of {count} header lines"
            )));
        }
    }
    Ok(())
}

/// Consumes lines up to and including the next blank line (or end of stream).
pub(crate) fn skip_past_blank_line<S: LineSource + ?Sized>(source: &mut S) -> Result<()> {
    while let Some(line) = source.read_next_line()? {
        if line.is_empty() {
            break;
        }
    }
    Ok(())
}
