// ============================================================================
// src/keylog/entry.rs – line formats of the key log
// ============================================================================

use chrono::{DateTime, Utc};

use crate::keys::{quote_char, KeyStroke};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const HEADER_PREFIX: &str = "--- Started logging at ";
const HEADER_SUFFIX: &str = " (consent given) ---";

/// UTC ISO-8601 with microseconds and a trailing `Z`. Header and key lines
/// both go through here so their timestamps are rendered identically.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    format!("{}Z", ts.format(TIMESTAMP_FORMAT))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub keysym: String,
    pub ch: Option<char>,
}

impl LogEntry {
    pub fn new(timestamp: DateTime<Utc>, stroke: &KeyStroke) -> Self {
        Self {
            timestamp,
            keysym: stroke.keysym.clone(),
            ch: stroke.ch,
        }
    }

    pub fn render(&self) -> String {
        format!(
            "{}\tkeysym={}\tchar={}\n",
            format_timestamp(&self.timestamp),
            self.keysym,
            quote_char(self.ch)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionHeader {
    pub started: DateTime<Utc>,
}

impl SessionHeader {
    pub fn render(&self) -> String {
        format!(
            "{HEADER_PREFIX}{}{HEADER_SUFFIX}\n",
            format_timestamp(&self.started)
        )
    }
}

/// Classification of one existing log line, used for the viewer footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine<'a> {
    SessionStart {
        timestamp: &'a str,
    },
    Key {
        timestamp: &'a str,
        keysym: &'a str,
        quoted_char: &'a str,
    },
    Unrecognized(&'a str),
}

impl<'a> LogLine<'a> {
    pub fn parse(line: &'a str) -> Self {
        if let Some(timestamp) = line
            .strip_prefix(HEADER_PREFIX)
            .and_then(|rest| rest.strip_suffix(HEADER_SUFFIX))
        {
            return LogLine::SessionStart { timestamp };
        }

        let mut fields = line.splitn(3, '\t');
        match (fields.next(), fields.next(), fields.next()) {
            (Some(timestamp), Some(keysym), Some(quoted_char)) => {
                match (
                    keysym.strip_prefix("keysym="),
                    quoted_char.strip_prefix("char="),
                ) {
                    (Some(keysym), Some(quoted_char)) if timestamp.ends_with('Z') => {
                        LogLine::Key {
                            timestamp,
                            keysym,
                            quoted_char,
                        }
                    }
                    _ => LogLine::Unrecognized(line),
                }
            }
            _ => LogLine::Unrecognized(line),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LogSummary {
    pub sessions: usize,
    pub keys: usize,
    pub unrecognized: usize,
}

impl LogSummary {
    pub fn of(content: &str) -> Self {
        content
            .lines()
            .filter(|l| !l.is_empty())
            .fold(Self::default(), |mut acc, line| {
                match LogLine::parse(line) {
                    LogLine::SessionStart { .. } => acc.sessions += 1,
                    LogLine::Key { .. } => acc.keys += 1,
                    LogLine::Unrecognized(_) => acc.unrecognized += 1,
                }
                acc
            })
    }
}
