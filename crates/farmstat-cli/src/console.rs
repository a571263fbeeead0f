//! Line-oriented prompting over any reader/writer pair.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use colored::Colorize;

/// Console wrapper used by the interactive commands.
///
/// Prompt helpers return `Ok(None)` once the input is exhausted, so callers
/// can treat end of input as a request to leave.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writer for free-form output.
    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    /// Read one trimmed line after printing `message`.
    pub fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt until the answer parses as `T`.
    pub fn prompt_number<T: FromStr>(&mut self, message: &str) -> io::Result<Option<T>> {
        loop {
            let Some(line) = self.prompt(message)? else {
                return Ok(None);
            };
            match line.parse() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => self.error("Invalid input. Please enter a valid number.")?,
            }
        }
    }

    /// Yes/no question; anything but `y`/`yes` (or an empty answer when
    /// `default` is true) counts as no.
    pub fn confirm(&mut self, message: &str, default: bool) -> io::Result<Option<bool>> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        let Some(answer) = self.prompt(&format!("{} {}: ", message, hint))? else {
            return Ok(None);
        };
        Ok(Some(match answer.to_lowercase().as_str() {
            "" => default,
            "y" | "yes" => true,
            _ => false,
        }))
    }

    pub fn heading(&mut self, title: &str) -> io::Result<()> {
        writeln!(
            self.output,
            "\n{}",
            format!("--- {} ---", title).cyan().bold()
        )
    }

    pub fn success(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message.green())
    }

    pub fn warning(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message.yellow())
    }

    pub fn error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message.red())
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }
}
