//! Path string tokenizer.
//!
//! Numbers may be separated by whitespace or commas, but the compact
//! datasets also run numbers together whenever a `-` or a second `.`
//! makes the boundary unambiguous: `-1.4-.8-2.4,1.1` is four numbers.

use crate::error::PathError;

/// Command letters understood by the parser.
const COMMANDS: &str = "mMlLhHvVcCsSqQaAzZ";

/// One command letter and the flat list of numbers that follow it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCommand {
    pub code: char,
    pub args: Vec<f64>,
}

/// Accumulates the characters of the number being read.
#[derive(Default)]
struct NumberBuffer {
    text: String,
    has_dot: bool,
}

impl NumberBuffer {
    /// Feed one numeric character (`0-9`, `.` or `-`), flushing the
    /// pending number first when the character has to start a new one.
    fn push(&mut self, ch: char, out: &mut Vec<f64>) -> Result<(), PathError> {
        match ch {
            '-' if !self.text.is_empty() => self.flush(out)?,
            '.' if self.has_dot => self.flush(out)?,
            _ => {}
        }
        if ch == '.' {
            self.has_dot = true;
        }
        self.text.push(ch);
        Ok(())
    }

    fn flush(&mut self, out: &mut Vec<f64>) -> Result<(), PathError> {
        if self.text.is_empty() {
            return Ok(());
        }
        let value = self
            .text
            .parse::<f64>()
            .map_err(|_| PathError::InvalidNumber(self.text.clone()))?;
        out.push(value);
        self.text.clear();
        self.has_dot = false;
        Ok(())
    }
}

fn is_numeric(ch: char) -> bool {
    ch.is_ascii_digit() || ch == '.' || ch == '-'
}

fn is_separator(ch: char) -> bool {
    ch == ',' || ch.is_whitespace()
}

/// Parse a bare number list such as `"-1.4-.8-2.4,1.1"`.
pub fn parse_num_sequence(text: &str) -> Result<Vec<f64>, PathError> {
    let mut numbers = Vec::new();
    let mut buffer = NumberBuffer::default();
    for (offset, ch) in text.char_indices() {
        if is_numeric(ch) {
            buffer.push(ch, &mut numbers)?;
        } else if is_separator(ch) {
            buffer.flush(&mut numbers)?;
        } else {
            return Err(PathError::UnexpectedCharacter { ch, offset });
        }
    }
    buffer.flush(&mut numbers)?;
    Ok(numbers)
}

/// Split a path string into commands with their numeric arguments.
///
/// Argument counts are not checked here; see `parse::parse_path`.
pub fn tokenize(path: &str) -> Result<Vec<RawCommand>, PathError> {
    let mut commands: Vec<RawCommand> = Vec::new();
    let mut args = Vec::new();
    let mut buffer = NumberBuffer::default();

    for (offset, ch) in path.char_indices() {
        if is_numeric(ch) {
            if commands.is_empty() {
                return Err(PathError::NumberBeforeCommand);
            }
            buffer.push(ch, &mut args)?;
        } else if is_separator(ch) {
            buffer.flush(&mut args)?;
        } else if COMMANDS.contains(ch) {
            buffer.flush(&mut args)?;
            if let Some(last) = commands.last_mut() {
                last.args = std::mem::take(&mut args);
            }
            commands.push(RawCommand {
                code: ch,
                args: Vec::new(),
            });
        } else {
            return Err(PathError::UnexpectedCharacter { ch, offset });
        }
    }

    buffer.flush(&mut args)?;
    if let Some(last) = commands.last_mut() {
        last.args = args;
    }
    Ok(commands)
}
