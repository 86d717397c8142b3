// ============================================================================
// src/keylog/recorder.rs – consent-gated key logger
// ============================================================================

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::consent::{ConsentGrant, ConsentState};
use crate::error::LogFileError;
use crate::keylog::entry::{LogEntry, SessionHeader};
use crate::keylog::store::LogStore;
use crate::keys::KeyStroke;

/// What happened to one write.
#[derive(Debug)]
pub enum Recorded {
    Logged,
    /// Nothing was written: consent withheld or logging degraded.
    Skipped,
    /// First failed write; the logger has switched to degraded mode.
    Failed(LogFileError),
}

/// Appends one line per key-down. After a write failure the logger stops
/// touching the file for the rest of the run instead of failing the app.
#[derive(Debug)]
pub struct KeyLogger {
    consent: ConsentState,
    store: LogStore,
    degraded: bool,
    written: u64,
}

impl KeyLogger {
    pub fn new(grant: ConsentGrant, store: LogStore) -> Self {
        Self::with_state(ConsentState::from(grant), store)
    }

    fn with_state(consent: ConsentState, store: LogStore) -> Self {
        Self {
            consent,
            store,
            degraded: false,
            written: 0,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Lines written by this logger, header included.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn begin_session(&mut self) -> Recorded {
        self.begin_session_at(Utc::now())
    }

    pub fn begin_session_at(&mut self, now: DateTime<Utc>) -> Recorded {
        self.write(&SessionHeader { started: now }.render())
    }

    pub fn record(&mut self, stroke: &KeyStroke) -> Recorded {
        self.record_at(stroke, Utc::now())
    }

    pub fn record_at(&mut self, stroke: &KeyStroke, now: DateTime<Utc>) -> Recorded {
        self.write(&LogEntry::new(now, stroke).render())
    }

    fn write(&mut self, line: &str) -> Recorded {
        if !self.consent.granted() || self.degraded {
            return Recorded::Skipped;
        }
        match self.store.append(line) {
            Ok(()) => {
                self.written += 1;
                debug!(lines = self.written, "log line appended");
                Recorded::Logged
            }
            Err(err) => {
                self.degraded = true;
                warn!(error = %err, "log write failed; capture continues without logging");
                Recorded::Failed(err)
            }
        }
    }
}
