// ============================================================================
// src/app.rs – startup ordering and the single-threaded event loop
// ============================================================================

use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::consent::{self, ConsentDecision, CONSENT_TITLE, REFUSAL_NOTICE};
use crate::dialog::{ConsoleDialogs, Dialogs};
use crate::keylog::LogStore;
use crate::keys::KeyStroke;
use crate::session::Session;
use crate::ui::{Button, Screen, Viewer, ViewerAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Exited,
    ConsentRefused,
}

/// Resolve the destination, ask for consent, then write the session header.
/// Returns `None` on refusal, in which case nothing has touched the log.
pub fn startup(config: &AppConfig, dialogs: &mut dyn Dialogs) -> Result<Option<Session>> {
    let log_path = config.resolve_log_path()?;

    match consent::request_consent(dialogs, &log_path)? {
        ConsentDecision::Refused => {
            info!("consent refused");
            dialogs.inform(CONSENT_TITLE, REFUSAL_NOTICE)?;
            Ok(None)
        }
        ConsentDecision::Granted(grant) => {
            info!("consent granted");
            let session = Session::open(grant, LogStore::new(log_path), dialogs)?;
            Ok(Some(session))
        }
    }
}

pub fn run(config: &AppConfig) -> Result<Outcome> {
    if !console::user_attended() {
        bail!("{} needs an interactive terminal", config.title);
    }

    let mut dialogs = ConsoleDialogs::new();
    let Some(mut session) = startup(config, &mut dialogs)? else {
        return Ok(Outcome::ConsentRefused);
    };

    let mut screen = Screen::enter().context("take over terminal")?;
    let outcome = event_loop(config, &mut screen, &mut session, &mut dialogs);
    screen.suspend()?;
    outcome
}

/// Dialogs shown from inside the screen need the terminal in cooked mode.
struct OverScreen<'a> {
    screen: &'a mut Screen,
    dialogs: &'a mut dyn Dialogs,
}

impl<'a> OverScreen<'a> {
    fn new(screen: &'a mut Screen, dialogs: &'a mut dyn Dialogs) -> Self {
        Self { screen, dialogs }
    }
}

impl Dialogs for OverScreen<'_> {
    fn confirm(&mut self, title: &str, message: &str) -> Result<bool> {
        self.screen.suspend()?;
        let answer = self.dialogs.confirm(title, message);
        self.screen.resume()?;
        answer
    }

    fn inform(&mut self, title: &str, message: &str) -> Result<()> {
        self.screen.suspend()?;
        let done = self.dialogs.inform(title, message);
        self.screen.resume()?;
        done
    }
}

fn left_click(mouse: &MouseEvent) -> Option<(u16, u16)> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some((mouse.column, mouse.row)),
        _ => None,
    }
}

/// Every key goes to the logger first, wherever it was pressed.
fn capture(
    session: &mut Session,
    screen: &mut Screen,
    dialogs: &mut dyn Dialogs,
    key: &KeyEvent,
) -> Result<()> {
    if let Some(stroke) = KeyStroke::from_terminal(key) {
        session.on_key(&stroke, &mut OverScreen::new(screen, dialogs))?;
    }
    Ok(())
}

fn event_loop(
    config: &AppConfig,
    screen: &mut Screen,
    session: &mut Session,
    dialogs: &mut dyn Dialogs,
) -> Result<Outcome> {
    let mut focused = true;
    loop {
        screen.draw_main(&config.title, session, focused)?;

        let pressed = match event::read().context("read terminal event")? {
            Event::Key(key) => {
                // A delivered key means the terminal holds focus, whatever
                // the last focus report said.
                focused = true;
                capture(session, screen, dialogs, &key)?;
                Button::from_key(&key)
            }
            Event::Mouse(mouse) => left_click(&mouse).and_then(|(c, r)| screen.button_at(c, r)),
            Event::FocusGained => {
                focused = true;
                None
            }
            Event::FocusLost => {
                focused = false;
                None
            }
            Event::Resize(w, h) => {
                screen.resize(w, h);
                None
            }
            _ => None,
        };

        match pressed {
            Some(Button::ClearLog) => {
                session.clear_log(&mut OverScreen::new(screen, dialogs))?;
            }
            Some(Button::ShowLog) => show_log(screen, session, dialogs)?,
            Some(Button::Exit) => {
                info!("exit requested");
                return Ok(Outcome::Exited);
            }
            None => {}
        }
    }
}

fn show_log(screen: &mut Screen, session: &mut Session, dialogs: &mut dyn Dialogs) -> Result<()> {
    let view = match session.show_log() {
        Ok(view) => view,
        Err(err) => {
            warn!(error = %err, "log unreadable");
            OverScreen::new(screen, dialogs).inform("Show log", &format!("{err:#}"))?;
            return Ok(());
        }
    };

    let mut viewer = Viewer::new(&view);
    loop {
        screen.draw_viewer(&viewer)?;
        match event::read().context("read terminal event")? {
            Event::Key(key) => {
                capture(session, screen, dialogs, &key)?;
                if viewer.handle(&key, screen.viewer_rows()) == ViewerAction::Close {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => {
                    viewer.scroll(-3, screen.viewer_rows());
                }
                MouseEventKind::ScrollDown => {
                    viewer.scroll(3, screen.viewer_rows());
                }
                _ => {
                    if left_click(&mouse).is_some_and(|(c, r)| screen.close_at(c, r)) {
                        return Ok(());
                    }
                }
            },
            Event::Resize(w, h) => screen.resize(w, h),
            _ => {}
        }
    }
}
