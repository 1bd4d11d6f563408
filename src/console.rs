//! Operator console: line input, numbered selection, and output.
//!
//! The menu only talks to the [`Console`] trait. [`TerminalConsole`] drives a
//! real terminal through rustyline; [`ScriptedConsole`] replays canned input
//! and records output, which is how the flows are tested.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::collections::VecDeque;
use std::io;

const INPUT_PROMPT: &str = "> ";

pub trait Console {
    /// Show one line of text
    fn message(&mut self, text: &str);

    /// Read one line. Fails only when input is closed.
    fn prompt_line(&mut self) -> io::Result<String>;

    fn display_lines(&mut self, lines: &[String]) {
        for line in lines {
            self.message(line);
        }
    }

    /// Show `options` numbered from 1 and return the 0-based index chosen,
    /// re-prompting until the operator types a valid number.
    fn prompt_selection(&mut self, options: &[&str]) -> io::Result<usize> {
        for (index, option) in options.iter().enumerate() {
            self.message(&format!("{}. {}", index + 1, option));
        }

        loop {
            let input = self.prompt_line()?;
            match input.trim().parse::<usize>() {
                Ok(choice) if (1..=options.len()).contains(&choice) => return Ok(choice - 1),
                _ => self.message(&format!(
                    "Please enter a number between 1 and {}",
                    options.len()
                )),
            }
        }
    }
}

/// Interactive console on stdin/stdout with line editing and history
pub struct TerminalConsole {
    editor: DefaultEditor,
}

impl TerminalConsole {
    pub fn new() -> io::Result<Self> {
        let editor = DefaultEditor::new().map_err(readline_to_io)?;
        Ok(Self { editor })
    }
}

fn readline_to_io(err: ReadlineError) -> io::Error {
    match err {
        ReadlineError::Io(e) => e,
        ReadlineError::Eof | ReadlineError::Interrupted => {
            io::Error::new(io::ErrorKind::UnexpectedEof, "input closed")
        }
        other => io::Error::new(io::ErrorKind::Other, other.to_string()),
    }
}

impl Console for TerminalConsole {
    fn message(&mut self, text: &str) {
        println!("{}", text);
    }

    fn prompt_line(&mut self) -> io::Result<String> {
        let line = self.editor.readline(INPUT_PROMPT).map_err(readline_to_io)?;
        if !line.trim().is_empty() {
            self.editor.add_history_entry(line.as_str()).ok();
        }
        Ok(line)
    }
}

/// Console fed from a fixed script, capturing everything shown
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    output: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(input: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: input.into_iter().map(Into::into).collect(),
            output: Vec::new(),
        }
    }

    /// Every line shown so far
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// True if any shown line contains `needle`
    pub fn saw(&self, needle: &str) -> bool {
        self.output.iter().any(|line| line.contains(needle))
    }

    /// Script lines not consumed yet
    pub fn remaining(&self) -> usize {
        self.input.len()
    }
}

impl Console for ScriptedConsole {
    fn message(&mut self, text: &str) {
        self.output.push(text.to_string());
    }

    fn prompt_line(&mut self) -> io::Result<String> {
        self.input
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}
