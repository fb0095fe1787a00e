//! Line-oriented prompt handling over any reader/writer pair.

use std::{
    fmt::Display,
    io::{BufRead, Write},
};

use anyhow::{Context, Result};
use crossterm::style::{Color, Stylize};

#[derive(Debug, Clone, Copy)]
struct Palette {
    enabled: bool,
}

impl Palette {
    fn paint(&self, text: &str, color: Color) -> String {
        if self.enabled {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Blocking console that reads whole lines and writes optionally styled text.
pub struct Console<R, W> {
    input: R,
    output: W,
    palette: Palette,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, color: bool) -> Self {
        Self {
            input,
            output,
            palette: Palette { enabled: color },
        }
    }

    pub fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{text}").context("failed to write to console")
    }

    pub fn heading(&mut self, text: &str) -> Result<()> {
        let styled = self.palette.paint(text, Color::Cyan);
        self.say(styled)
    }

    pub fn success(&mut self, text: &str) -> Result<()> {
        let styled = self.palette.paint(text, Color::Green);
        self.say(styled)
    }

    pub fn warn(&mut self, text: &str) -> Result<()> {
        let styled = self.palette.paint(text, Color::Yellow);
        self.say(styled)
    }

    pub fn error(&mut self, text: &str) -> Result<()> {
        let styled = self.palette.paint(text, Color::Red);
        self.say(styled)
    }

    /// Read one line without its terminator. `None` once input is exhausted.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        self.output.flush().context("failed to flush console")?;
        let mut buffer = String::new();
        let read = self
            .input
            .read_line(&mut buffer)
            .context("failed to read from console")?;
        if read == 0 {
            return Ok(None);
        }
        let trimmed = buffer.trim_end_matches(['\r', '\n']).len();
        buffer.truncate(trimmed);
        Ok(Some(buffer))
    }

    /// Print `text` on its own line and read the reply.
    pub fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        self.say(text)?;
        self.read_line()
    }

    /// Print `text` without a newline and read the reply on the same line.
    pub fn prompt_inline(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}").context("failed to write to console")?;
        self.read_line()
    }

    /// Prompt once, then keep reading until `parse` accepts a line.
    ///
    /// Each rejection prints the message returned by `parse`.
    pub fn ask<T>(
        &mut self,
        text: &str,
        mut parse: impl FnMut(&str) -> Result<T, String>,
    ) -> Result<Option<T>> {
        self.say(text)?;
        while let Some(line) = self.read_line()? {
            match parse(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(message) => self.error(&message)?,
            }
        }
        Ok(None)
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
