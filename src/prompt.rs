use std::fmt::Display;

use crate::argument_converters::InputConverter;
use crate::error::{Error, Result};
use crate::input::{InterruptFlag, Line, LineReader};

/// Question/answer prompts on top of a [`LineReader`].
///
/// Every prompt takes a default that is returned on empty input. Input the
/// converter rejects is reported and the question is asked again.
pub struct Prompter {
    reader: Box<dyn LineReader>,
    interrupt: InterruptFlag,
}

impl Prompter {
    pub fn new(reader: Box<dyn LineReader>) -> Self {
        Prompter {
            reader,
            interrupt: InterruptFlag::new(),
        }
    }

    /// Makes a raised `interrupt` abort the next question.
    pub fn with_interrupt(mut self, interrupt: InterruptFlag) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Reads a raw line; interrupts and end of input pass through untouched.
    pub fn read_line(&mut self, prompt: &str) -> Result<Line> {
        self.next_line(prompt, true)
    }

    /// Drops an interrupt that arrived after the last answer was read.
    pub fn clear_interrupt(&self) {
        self.interrupt.take();
    }

    fn next_line(&mut self, prompt: &str, echo: bool) -> Result<Line> {
        if self.interrupt.take() {
            return Ok(Line::Interrupted);
        }
        Ok(self.reader.read_line(prompt, echo)?)
    }

    fn ask(&mut self, prompt: &str, echo: bool) -> Result<String> {
        match self.next_line(prompt, echo)? {
            Line::Text(text) => Ok(text),
            Line::Interrupted => Err(Error::Interrupted),
            Line::Eof => Err(Error::EndOfInput),
        }
    }

    /// Yes/no question. Empty input keeps `default`.
    pub fn confirm(&mut self, label: &str, default: bool) -> Result<bool> {
        let hint = if default { "(Y/n)" } else { "(y/N)" };
        loop {
            let input = self.ask(&format!("{label} {hint}: "), true)?;
            match input.to_lowercase().as_str() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                "" => return Ok(default),
                _ => {}
            }
        }
    }

    /// Asks for a value, converting it with the type's [`InputConverter`].
    pub fn value<T>(&mut self, label: &str, default: T) -> Result<T>
    where
        T: InputConverter + Display,
    {
        let shown = default.to_string();
        self.value_with(label, default, &shown, T::convert)
    }

    /// Asks for a value with an explicit converter; `shown` is how the
    /// default appears in the question.
    pub fn value_with<T, F>(&mut self, label: &str, default: T, shown: &str, convert: F) -> Result<T>
    where
        F: Fn(&str) -> Result<T>,
    {
        loop {
            let input = self.ask(&format!("Enter {label} ['{shown}']: "), true)?;
            if input.is_empty() {
                return Ok(default);
            }
            match convert(&input) {
                Ok(value) => return Ok(value),
                Err(e) => println!("{e}"),
            }
        }
    }

    /// Asks until a convertible, non-empty answer is given.
    pub fn required<T: InputConverter>(&mut self, prompt: &str, echo: bool) -> Result<T> {
        loop {
            let input = self.ask(prompt, echo)?;
            if input.is_empty() {
                continue;
            }
            match T::convert(&input) {
                Ok(value) => return Ok(value),
                Err(e) => println!("{e}"),
            }
        }
    }
}
