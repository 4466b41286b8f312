use colored::Colorize;
use std::cell::RefCell;
use std::io::{self, BufRead, Write};

/// Colored terminal output plus the interactive input stream.
///
/// Everything the user sees goes through here so that tests can swap stdio
/// for in-memory buffers.
pub struct Console {
    output: RefCell<Box<dyn Write>>,
    input: RefCell<Box<dyn BufRead>>,
}

impl Console {
    pub fn stdio() -> Self {
        Self::new(Box::new(io::stdout()), Box::new(io::BufReader::new(io::stdin())))
    }

    pub fn new(output: Box<dyn Write>, input: Box<dyn BufRead>) -> Self {
        Self {
            output: RefCell::new(output),
            input: RefCell::new(input),
        }
    }

    pub fn info(&self, message: &str) {
        self.line(&message.blue().to_string());
    }

    pub fn success(&self, message: &str) {
        self.line(&message.green().to_string());
    }

    pub fn warn(&self, message: &str) {
        self.line(&message.yellow().bold().to_string());
    }

    pub fn error(&self, message: &str) {
        self.line(&message.red().to_string());
    }

    pub fn line(&self, message: &str) {
        let mut out = self.output.borrow_mut();
        // Losing a progress line on a closed stdout is not worth aborting for.
        let _ = writeln!(out, "{message}");
    }

    pub fn blank(&self) {
        self.line("");
    }

    /// Write `text` as-is, without a trailing newline.
    pub fn raw(&self, text: &str) {
        let mut out = self.output.borrow_mut();
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }

    /// Show `prompt` and block until one line of input is read.
    pub fn prompt(&self, prompt: &str) -> io::Result<String> {
        self.raw(prompt);

        let mut answer = String::new();
        let read = self.input.borrow_mut().read_line(&mut answer)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before an answer was given",
            ));
        }
        Ok(answer)
    }
}
