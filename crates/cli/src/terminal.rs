use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use docqa_rag::{Answer, IngestReport};

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const USER_PROMPT: Color = Color::Green;
    const ANSWER: Color = Color::Cyan;
    const CHUNK: Color = Color::DarkGreen;
    const WARNING: Color = Color::Yellow;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
    const HEADER: Color = Color::Magenta;
}

/// Terminal I/O for both the one-shot and the interactive modes.
#[derive(Default)]
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }

    /// Print the interactive-mode banner.
    pub fn print_banner(&self, provider: &str, model: &str, report: &IngestReport) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print("docqa"),
            ResetColor,
            Print(" - Document Q&A\n"),
            SetForegroundColor(Colors::DIM),
            Print(format!("Provider: {} | Model: {}\n", provider, model)),
            Print(format!(
                "Indexed {} file(s), {} chunk(s)\n",
                report.accepted.len(),
                report.chunks
            )),
            Print("Type 'exit' or 'quit' to end.\n"),
            Print("---\n"),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Warn about every upload that was skipped.
    pub fn print_rejected(&self, report: &IngestReport) -> Result<()> {
        let mut stderr = io::stderr();
        for rejected in &report.rejected {
            execute!(
                stderr,
                SetForegroundColor(Colors::WARNING),
                Print(format!("skipped {}: {}\n", rejected.name, rejected.reason)),
                ResetColor,
            )?;
        }
        Ok(())
    }

    /// Read a line of user input with prompt.
    /// Returns None if the user wants to exit or stdin is closed.
    pub fn read_input(&self) -> Result<Option<String>> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            Print("\n"),
            SetForegroundColor(Colors::USER_PROMPT),
            Print("question> "),
            ResetColor,
        )?;
        stdout.flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(None);
        }
        let trimmed = input.trim().to_string();

        if matches!(trimmed.as_str(), "exit" | "quit" | "/exit" | "/quit") {
            return Ok(None);
        }

        Ok(Some(trimmed))
    }

    /// Answer text followed by the retrieved chunks it was built from.
    pub fn print_answer(&self, answer: &Answer) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::ANSWER),
            Print(&answer.text),
            ResetColor,
            Print("\n"),
        )?;
        for item in &answer.retrieved.items {
            execute!(
                stdout,
                SetForegroundColor(Colors::DIM),
                Print(format!("\n[{} | score {:.3}]\n", item.chunk.citation(), item.score)),
                SetForegroundColor(Colors::CHUNK),
                Print(quote(&item.chunk.content)),
                ResetColor,
            )?;
        }
        stdout.flush()?;
        Ok(())
    }

    pub fn print_info(&self, msg: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!("{}\n", msg)),
            ResetColor,
        )?;
        Ok(())
    }

    pub fn print_error(&self, msg: &str) -> Result<()> {
        let mut stderr = io::stderr();
        execute!(
            stderr,
            SetForegroundColor(Colors::ERROR),
            Print(format!("Error: {}\n", msg)),
            ResetColor,
        )?;
        Ok(())
    }
}

/// Prefix every line with `> `.
fn quote(text: &str) -> String {
    text.lines().map(|line| format!("> {line}\n")).collect()
}
