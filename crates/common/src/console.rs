//! The single input/output channel shared by sinks and the debugger.
//!
//! Program reads and debugger commands consume the same input stream in
//! program order, and all output goes through the same writer. The console
//! is passed explicitly to every component that does I/O, so tests can run
//! against in-memory buffers.

use std::io::{self, BufRead, Write};

/// A paired input reader and output writer.
pub struct Console<'io> {
    input: Box<dyn BufRead + 'io>,
    output: Box<dyn Write + 'io>,
}

impl<'io> Console<'io> {
    /// Create a console over any reader and writer.
    pub fn new(input: impl BufRead + 'io, output: impl Write + 'io) -> Self {
        Self {
            input: Box::new(input),
            output: Box::new(output),
        }
    }

    /// The output writer.
    pub fn output(&mut self) -> &mut (dyn Write + 'io) {
        &mut *self.output
    }

    /// Read one UTF-8 character. Returns `None` at end of input.
    ///
    /// Pending output is flushed first so prompts appear before blocking.
    pub fn read_char(&mut self) -> io::Result<Option<char>> {
        self.output.flush()?;

        let Some(first) = self.read_byte()? else {
            return Ok(None);
        };
        let width = match first {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        let mut buf = [first, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            *slot = self.read_byte()?.ok_or(io::ErrorKind::UnexpectedEof)?;
        }

        std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "input is not valid UTF-8"))
    }

    /// Read one line without its terminator. Returns `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let buf = self.input.fill_buf()?;
        let Some(&byte) = buf.first() else {
            return Ok(None);
        };
        self.input.consume(1);
        Ok(Some(byte))
    }
}

impl Console<'static> {
    /// A console over the process's standard input and output.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}
