use std::io::{self, BufRead, Write};

/// The interactive side of the shell: one input stream, an output stream and
/// an error stream. Every exchange is a blocking prompt followed by one line.
pub struct Console {
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
    errors: Box<dyn Write>,
}

impl Console {
    pub fn new(input: Box<dyn BufRead>, output: Box<dyn Write>, errors: Box<dyn Write>) -> Self {
        Self { input, output, errors }
    }

    pub fn stdio() -> Self {
        Self::new(
            Box::new(io::BufReader::new(io::stdin())),
            Box::new(io::stdout()),
            Box::new(io::stderr()),
        )
    }

    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.output
    }

    pub fn err(&mut self) -> &mut dyn Write {
        &mut *self.errors
    }

    /// Writes `text` without a newline, flushes, and reads the reply.
    ///
    /// Returns `None` at end of input. The trailing line terminator is stripped.
    pub fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        self.read_line()
    }

    /// Bytes that are not valid UTF-8 are replaced rather than rejected.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Ok(None);
        }
        let mut line = String::from_utf8_lossy(&raw).into_owned();
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}
