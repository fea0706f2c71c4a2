// Field input loop.
//
// Every prompt repeats until the operator supplies a value satisfying the
// field's constraints; validation failures print one diagnostic line and
// re-prompt. Only transport errors (closed input, I/O failure) escape.

use std::fmt::Display;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::core::HotelError;

/// One line of operator input per call. Implemented by the interactive
/// console and by scripted sources in tests.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<String, HotelError>;
}

/// Interactive console input with line editing and persistent history.
pub struct Console {
    editor: DefaultEditor,
    history: Option<PathBuf>,
}

impl Console {
    pub fn new() -> Result<Self, HotelError> {
        let editor = DefaultEditor::new().map_err(|e| HotelError::Readline(e.to_string()))?;
        let history = dirs::home_dir().map(|mut path| {
            path.push(".hotelsql_history");
            path
        });
        let mut console = Self { editor, history };
        if let Some(path) = &console.history {
            // Missing history file on first run is expected.
            let _ = console.editor.load_history(path);
        }
        Ok(console)
    }

    pub fn save_history(&mut self) {
        if let Some(path) = &self.history {
            if let Err(err) = self.editor.save_history(path) {
                log::warn!("could not save history to {}: {err}", path.display());
            }
        }
    }
}

impl LineSource for Console {
    fn read_line(&mut self, prompt: &str) -> Result<String, HotelError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                Ok(line)
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Err(HotelError::InputClosed),
            Err(err) => Err(HotelError::Readline(err.to_string())),
        }
    }
}

fn prompt_parse<T, L, W>(
    input: &mut L,
    out: &mut W,
    label: &str,
    diagnostic: &str,
) -> Result<T, HotelError>
where
    T: FromStr,
    L: LineSource + ?Sized,
    W: Write + ?Sized,
{
    let prompt = format!("{label}: ");
    loop {
        let line = input.read_line(&prompt)?;
        match line.trim().parse::<T>() {
            Ok(value) => return Ok(value),
            Err(_) => writeln!(out, "{diagnostic}")?,
        }
    }
}

/// Prompts until the line parses as an `i32`.
pub fn prompt_int<L, W>(input: &mut L, out: &mut W, label: &str) -> Result<i32, HotelError>
where
    L: LineSource + ?Sized,
    W: Write + ?Sized,
{
    prompt_parse(input, out, label, "Your input is invalid!")
}

/// Prompts until the line parses as an `i64` (phone numbers).
pub fn prompt_bigint<L, W>(input: &mut L, out: &mut W, label: &str) -> Result<i64, HotelError>
where
    L: LineSource + ?Sized,
    W: Write + ?Sized,
{
    prompt_parse(input, out, label, "Your input is invalid!")
}

/// Prompts until the line parses as an ISO `YYYY-MM-DD` date.
pub fn prompt_date<L, W>(input: &mut L, out: &mut W, label: &str) -> Result<NaiveDate, HotelError>
where
    L: LineSource + ?Sized,
    W: Write + ?Sized,
{
    prompt_parse(input, out, label, "Invalid date: expected YYYY-MM-DD!")
}

/// Prompts until the line is TRUE or FALSE (case-insensitive).
pub fn prompt_bool<L, W>(input: &mut L, out: &mut W, label: &str) -> Result<bool, HotelError>
where
    L: LineSource + ?Sized,
    W: Write + ?Sized,
{
    let prompt = format!("{label}: ");
    loop {
        let line = input.read_line(&prompt)?;
        match line.trim().to_ascii_lowercase().parse::<bool>() {
            Ok(value) => return Ok(value),
            Err(_) => writeln!(out, "Invalid input: expected TRUE or FALSE!")?,
        }
    }
}

/// Prompts until the line length (in characters) is within `[min, max]`.
/// The value is returned as typed, without trimming.
pub fn prompt_bounded<L, W>(
    input: &mut L,
    out: &mut W,
    label: &str,
    min: usize,
    max: usize,
) -> Result<String, HotelError>
where
    L: LineSource + ?Sized,
    W: Write + ?Sized,
{
    let prompt = format!("{label}: ");
    loop {
        let line = input.read_line(&prompt)?;
        let len = line.chars().count();
        if len < min || len > max {
            writeln!(
                out,
                "Invalid input: expected between {min} and {max} characters!"
            )?;
            continue;
        }
        return Ok(line);
    }
}

/// Scripted input source replaying canned lines, recording every prompt it
/// was shown. This is the test double for `Console`.
pub struct ScriptedInput {
    lines: std::collections::VecDeque<String>,
    pub prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Display,
    {
        Self {
            lines: lines.into_iter().map(|l| l.to_string()).collect(),
            prompts: Vec::new(),
        }
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Result<String, HotelError> {
        self.prompts.push(prompt.to_string());
        self.lines.pop_front().ok_or(HotelError::InputClosed)
    }
}
