// ============================================================================
// src/consent.rs – one-time consent gate in front of key capture
// ============================================================================
//! Nothing that can write keystrokes exists until [`request_consent`] hands
//! out a [`ConsentGrant`]. The grant has no public constructor, so the only
//! route to a `KeyLogger` runs through an affirmative answer.

use anyhow::Result;
use std::path::Path;

use crate::dialog::Dialogs;

pub const CONSENT_TITLE: &str = "Consent required";
pub const REFUSAL_NOTICE: &str = "Cannot proceed without consent. Exiting.";

/// Proof that the user said yes in this process.
#[derive(Debug)]
pub struct ConsentGrant {
    _private: (),
}

#[derive(Debug)]
pub enum ConsentDecision {
    Granted(ConsentGrant),
    Refused,
}

/// Consent flag carried by the logger. Starts withheld; only a grant flips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsentState {
    granted: bool,
}

impl ConsentState {
    pub const fn withheld() -> Self {
        Self { granted: false }
    }

    pub fn granted(&self) -> bool {
        self.granted
    }
}

impl From<ConsentGrant> for ConsentState {
    fn from(_: ConsentGrant) -> Self {
        let mut state = Self::withheld();
        state.granted = true;
        state
    }
}

pub fn disclosure(log_path: &Path) -> String {
    format!(
        "This application will record keypresses only while this window is focused.\n\n\
         Logs will be saved to: {}\n\n\
         Do you consent to recording your keystrokes while this app is active?",
        log_path.display()
    )
}

/// Ask once. `log_path` must already be absolute so the user sees the real
/// destination.
pub fn request_consent(dialogs: &mut dyn Dialogs, log_path: &Path) -> Result<ConsentDecision> {
    debug_assert!(log_path.is_absolute());
    if dialogs.confirm(CONSENT_TITLE, &disclosure(log_path))? {
        Ok(ConsentDecision::Granted(ConsentGrant { _private: () }))
    } else {
        Ok(ConsentDecision::Refused)
    }
}

#[cfg(test)]
pub(crate) fn test_grant() -> ConsentGrant {
    ConsentGrant { _private: () }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::testing::{ScriptedDialogs, Shown};
    use std::path::PathBuf;

    fn log_path() -> PathBuf {
        std::env::temp_dir().join("app_key_log.txt")
    }

    #[test]
    fn disclosure_names_scope_destination_and_question() {
        let text = disclosure(&log_path());
        assert!(text.contains("only while this window is focused"));
        assert!(text.contains(&log_path().display().to_string()));
        assert!(text.trim_end().ends_with('?'));
    }

    #[test]
    fn yes_grants() {
        let mut dialogs = ScriptedDialogs::answering(&[true]);
        let decision = request_consent(&mut dialogs, &log_path()).unwrap();
        let ConsentDecision::Granted(grant) = decision else {
            panic!("expected a grant");
        };
        assert!(ConsentState::from(grant).granted());
        assert!(matches!(
            &dialogs.shown[0],
            Shown::Confirm { title, .. } if title == CONSENT_TITLE
        ));
    }

    #[test]
    fn no_refuses() {
        let mut dialogs = ScriptedDialogs::answering(&[false]);
        let decision = request_consent(&mut dialogs, &log_path()).unwrap();
        assert!(matches!(decision, ConsentDecision::Refused));
    }

    #[test]
    fn state_starts_withheld() {
        assert!(!ConsentState::withheld().granted());
    }
}
