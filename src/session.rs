// ============================================================================
// src/session.rs – per-run state: logger, status line, show/clear actions
// ============================================================================

use anyhow::Result;
use tracing::info;

use crate::consent::ConsentGrant;
use crate::dialog::Dialogs;
use crate::keylog::{KeyLogger, LogStore, LogSummary, Recorded};
use crate::keys::KeyStroke;

pub const NOT_FOUND_PLACEHOLDER: &str = "(log file not found)";
pub const WAITING_STATUS: &str = "Waiting for keystrokes...";
pub const CLEARED_STATUS: &str = "Log cleared.";

const CLEAR_TITLE: &str = "Clear log";
const CLEAR_QUESTION: &str = "Delete the current log file?";
const WRITE_FAILED_TITLE: &str = "Logging stopped";

/// Contents for the read-only viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogView {
    pub content: String,
    pub summary: Option<LogSummary>,
}

pub struct Session {
    logger: KeyLogger,
    store: LogStore,
    status: String,
}

impl Session {
    /// Writes the session header. Must run before any key is routed here.
    pub fn open(grant: ConsentGrant, store: LogStore, dialogs: &mut dyn Dialogs) -> Result<Self> {
        let mut session = Self {
            logger: KeyLogger::new(grant, store.clone()),
            store,
            status: WAITING_STATUS.to_string(),
        };
        let outcome = session.logger.begin_session();
        session.report(outcome, dialogs)?;
        info!(path = %session.store.path().display(), "logging session started");
        Ok(session)
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn log_path(&self) -> &std::path::Path {
        self.store.path()
    }

    pub fn is_logging(&self) -> bool {
        !self.logger.is_degraded()
    }

    pub fn on_key(&mut self, stroke: &KeyStroke, dialogs: &mut dyn Dialogs) -> Result<()> {
        let outcome = self.logger.record(stroke);
        let marker = match outcome {
            Recorded::Logged => "logged",
            _ => "not logged",
        };
        self.status = format!("Last key: {}   ({marker})", stroke.keysym);
        self.report(outcome, dialogs)
    }

    pub fn show_log(&self) -> Result<LogView> {
        let view = match self.store.read_to_string()? {
            Some(content) => LogView {
                summary: Some(LogSummary::of(&content)),
                content,
            },
            None => LogView {
                content: NOT_FOUND_PLACEHOLDER.to_string(),
                summary: None,
            },
        };
        Ok(view)
    }

    /// Returns whether the user confirmed the deletion.
    pub fn clear_log(&mut self, dialogs: &mut dyn Dialogs) -> Result<bool> {
        if !dialogs.confirm(CLEAR_TITLE, CLEAR_QUESTION)? {
            return Ok(false);
        }
        let existed = self.store.remove()?;
        info!(existed, "log cleared");
        self.status = CLEARED_STATUS.to_string();
        Ok(true)
    }

    fn report(&mut self, outcome: Recorded, dialogs: &mut dyn Dialogs) -> Result<()> {
        if let Recorded::Failed(err) = outcome {
            self.status = format!("Logging stopped: {err}");
            dialogs.inform(
                WRITE_FAILED_TITLE,
                &format!(
                    "The key log could not be written:\n{err}\n\n\
                     Key capture continues, but nothing more will be logged this run."
                ),
            )?;
        }
        Ok(())
    }
}
