// ============================================================================
// src/dialog.rs – modal yes/no and notice dialogs
// ============================================================================

use anyhow::{Context, Result};
use console::{Style, Term};
use dialoguer::Confirm;

/// Blocking modal prompts. The console implementation talks to the user; the
/// scripted one in tests replays canned answers.
pub trait Dialogs {
    fn confirm(&mut self, title: &str, message: &str) -> Result<bool>;
    fn inform(&mut self, title: &str, message: &str) -> Result<()>;
}

pub struct ConsoleDialogs {
    term: Term,
    title_style: Style,
}

impl ConsoleDialogs {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            title_style: Style::new().color256(214).bold(),
        }
    }

    fn heading(&self, title: &str, message: &str) -> Result<()> {
        self.term.clear_screen()?;
        self.term
            .write_line(&self.title_style.apply_to(format!("▸ {title}")).to_string())?;
        self.term.write_line("")?;
        for line in message.lines() {
            self.term.write_line(line)?;
        }
        self.term.write_line("")?;
        Ok(())
    }
}

impl Dialogs for ConsoleDialogs {
    fn confirm(&mut self, title: &str, message: &str) -> Result<bool> {
        // The last line is the question; anything above it is context.
        let (body, question) = message.rsplit_once('\n').unwrap_or(("", message));
        self.heading(title, body.trim_end())?;
        Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact_on(&self.term)
            .with_context(|| format!("read answer for '{title}'"))
    }

    fn inform(&mut self, title: &str, message: &str) -> Result<()> {
        self.heading(title, message)?;
        self.term
            .write_line(&Style::new().dim().apply_to("Press Enter to continue").to_string())?;
        self.term
            .read_line()
            .with_context(|| format!("acknowledge '{title}'"))?;
        Ok(())
    }
}
