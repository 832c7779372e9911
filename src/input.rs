//! Interactive prompting with validation against a closed vocabulary.
//!
//! The input and output streams are injected so tests can feed a scripted token
//! sequence instead of a real console.

use anyhow::{Result, bail};
use std::io::{BufRead, Write};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes one line of feedback to the output stream.
    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Borrows the output stream, for callers that print full report blocks
    /// between prompts.
    pub fn writer(&mut self) -> &mut W {
        &mut self.output
    }

    /// Consumes the prompter and returns its output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Prints `prompt` and reads one response line, trimmed and lowercased.
    ///
    /// # Errors
    ///
    /// Fails if the input stream is closed or unreadable.
    pub fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}\n--> ")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            bail!("input stream closed before a valid response was given");
        }

        Ok(line.trim().to_lowercase())
    }

    /// Prompts until the response case-insensitively matches one of `allowed`,
    /// then returns the accepted value in lowercase.
    ///
    /// An invalid token is never an error, only a re-prompt; there is no retry
    /// limit short of the input stream closing.
    pub fn ask_valid(&mut self, prompt: &str, allowed: &[&str]) -> Result<String> {
        let mut answer = self.ask(prompt)?;

        while !allowed.contains(&answer.as_str()) {
            writeln!(self.output, "Oops! '{answer}' is not something I know.")?;
            answer = self.ask(&format!("Please pick one of: {}", allowed.join(" / ")))?;
        }

        Ok(answer)
    }
}
