// ============================================================================
// src/ui.rs – full-screen terminal "window": main panel and log viewer
// ============================================================================

use anyhow::{Context, Result};
use console::{truncate_str, Style};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, KeyCode,
        KeyEvent, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    style::Print,
    terminal::{
        self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
    ExecutableCommand, QueueableCommand,
};
use std::io::{self, Stdout, Write};

use crate::keylog::LogSummary;
use crate::session::{LogView, Session};

const INTRO: &str = "Focus this window and type — keypresses will be logged while focused.";
const VIEWER_TITLE: &str = "Log contents";
const CLOSE_CAPTION: &str = "[ Close · Esc ]";
const BUTTON_GAP: u16 = 2;
const TAB_WIDTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    ClearLog,
    ShowLog,
    Exit,
}

pub const BUTTONS: [Button; 3] = [Button::ClearLog, Button::ShowLog, Button::Exit];

impl Button {
    pub fn label(self) -> &'static str {
        match self {
            Button::ClearLog => "Clear log",
            Button::ShowLog => "Show log",
            Button::Exit => "Exit",
        }
    }

    fn shortcut(self) -> u8 {
        match self {
            Button::ClearLog => 2,
            Button::ShowLog => 3,
            Button::Exit => 10,
        }
    }

    fn caption(self) -> String {
        format!("[ {} · F{} ]", self.label(), self.shortcut())
    }

    /// Function-key accelerator, presses only.
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        match key.code {
            KeyCode::F(n) => BUTTONS.into_iter().find(|b| b.shortcut() == n),
            _ => None,
        }
    }
}

/// Clickable span on one row; `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hitbox {
    pub row: u16,
    pub start: u16,
    pub end: u16,
}

impl Hitbox {
    pub fn contains(&self, column: u16, row: u16) -> bool {
        row == self.row && (self.start..self.end).contains(&column)
    }
}

/// Centre `captions` on `row`, separated by a fixed gap.
pub fn layout_row(width: u16, row: u16, captions: &[String]) -> Vec<Hitbox> {
    let widths: Vec<u16> = captions
        .iter()
        .map(|c| console::measure_text_width(c) as u16)
        .collect();
    let total = widths.iter().sum::<u16>()
        + BUTTON_GAP * (captions.len().saturating_sub(1) as u16);
    let mut x = width.saturating_sub(total) / 2;

    widths
        .into_iter()
        .map(|w| {
            let hb = Hitbox {
                row,
                start: x,
                end: x + w,
            };
            x += w + BUTTON_GAP;
            hb
        })
        .collect()
}

/// Replace tabs with spaces up to the next tab stop so width math holds.
pub fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut col = 0usize;
    for c in line.chars() {
        if c == '\t' {
            let pad = TAB_WIDTH - col % TAB_WIDTH;
            out.extend(std::iter::repeat(' ').take(pad));
            col += pad;
        } else {
            out.push(c);
            col += console::measure_text_width(c.encode_utf8(&mut [0u8; 4]));
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    Close,
    Scrolled,
    Ignored,
}

/// Read-only snapshot of the log with a scroll position.
#[derive(Debug)]
pub struct Viewer {
    lines: Vec<String>,
    footer: String,
    offset: usize,
}

impl Viewer {
    pub fn new(view: &LogView) -> Self {
        let lines = view.content.lines().map(expand_tabs).collect();
        let footer = match view.summary {
            Some(LogSummary {
                sessions,
                keys,
                unrecognized,
            }) => {
                let mut s = format!("{keys} key event(s) across {sessions} session(s)");
                if unrecognized > 0 {
                    s.push_str(&format!(", {unrecognized} other line(s)"));
                }
                s
            }
            None => String::new(),
        };
        Self {
            lines,
            footer,
            offset: 0,
        }
    }

    fn max_offset(&self, visible: usize) -> usize {
        self.lines.len().saturating_sub(visible)
    }

    pub fn scroll(&mut self, delta: isize, visible: usize) -> ViewerAction {
        let target = self
            .offset
            .saturating_add_signed(delta)
            .min(self.max_offset(visible));
        if target == self.offset {
            return ViewerAction::Ignored;
        }
        self.offset = target;
        ViewerAction::Scrolled
    }

    pub fn handle(&mut self, key: &KeyEvent, visible: usize) -> ViewerAction {
        if key.kind == KeyEventKind::Release {
            return ViewerAction::Ignored;
        }
        let page = visible.max(1) as isize;
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => ViewerAction::Close,
            KeyCode::Up => self.scroll(-1, visible),
            KeyCode::Down => self.scroll(1, visible),
            KeyCode::PageUp => self.scroll(-page, visible),
            KeyCode::PageDown => self.scroll(page, visible),
            KeyCode::Home => self.scroll(isize::MIN, visible),
            KeyCode::End => self.scroll(isize::MAX, visible),
            _ => ViewerAction::Ignored,
        }
    }
}

/// Owns the terminal while the main panel is up. Dropping it restores the
/// terminal even on an error path.
pub struct Screen {
    out: Stdout,
    width: u16,
    height: u16,
    buttons: Vec<(Button, Hitbox)>,
    close: Option<Hitbox>,
    enhanced: bool,
    active: bool,
}

impl Screen {
    pub fn enter() -> Result<Self> {
        let (width, height) = terminal::size().context("query terminal size")?;
        let mut screen = Self {
            out: io::stdout(),
            width,
            height,
            buttons: Vec::new(),
            close: None,
            enhanced: false,
            active: false,
        };
        screen.resume()?;
        Ok(screen)
    }

    /// Hand the terminal back in cooked mode, e.g. for a modal prompt.
    pub fn suspend(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        if self.enhanced {
            self.out.execute(PopKeyboardEnhancementFlags)?;
        }
        self.out
            .execute(DisableFocusChange)?
            .execute(DisableMouseCapture)?
            .execute(LeaveAlternateScreen)?
            .execute(Show)?;
        disable_raw_mode().context("leave raw mode")?;
        self.active = false;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        if self.active {
            return Ok(());
        }
        enable_raw_mode().context("enter raw mode")?;
        self.out
            .execute(EnterAlternateScreen)?
            .execute(EnableMouseCapture)?
            .execute(EnableFocusChange)?
            .execute(Hide)?;
        // Kitty-protocol terminals report bare modifier presses (Shift_L, ...)
        // and, with alternate keys, the shifted codepoint.
        self.enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.enhanced {
            self.out.execute(PushKeyboardEnhancementFlags(enhancement_flags()))?;
        }
        self.active = true;
        if let Ok((w, h)) = terminal::size() {
            self.resize(w, h);
        }
        Ok(())
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Rows available to log text in the viewer.
    pub fn viewer_rows(&self) -> usize {
        self.height.saturating_sub(3) as usize
    }

    pub fn button_at(&self, column: u16, row: u16) -> Option<Button> {
        self.buttons
            .iter()
            .find(|(_, hb)| hb.contains(column, row))
            .map(|(b, _)| *b)
    }

    pub fn close_at(&self, column: u16, row: u16) -> bool {
        self.close.is_some_and(|hb| hb.contains(column, row))
    }

    fn line(&mut self, row: u16, text: &str) -> Result<()> {
        if row >= self.height {
            return Ok(());
        }
        let fitted = truncate_str(text, self.width as usize, "…");
        self.out.queue(MoveTo(0, row))?.queue(Print(fitted))?;
        Ok(())
    }

    fn centered(&mut self, row: u16, text: &str, style: &Style) -> Result<()> {
        let pad = (self.width as usize).saturating_sub(console::measure_text_width(text)) / 2;
        let padded = format!("{}{}", " ".repeat(pad), text);
        let fitted = truncate_str(&padded, self.width as usize, "…").into_owned();
        self.line(row, &style.apply_to(fitted).to_string())
    }

    pub fn draw_main(&mut self, title: &str, session: &Session, focused: bool) -> Result<()> {
        self.out.queue(Clear(ClearType::All))?;
        self.close = None;

        let title_style = Style::new().color256(214).bold();
        self.centered(0, &format!("▸ {title}"), &title_style)?;
        self.line(2, &format!("  {INTRO}"))?;
        let dest = format!("  Logging to: {}", session.log_path().display());
        self.line(3, &Style::new().dim().apply_to(dest).to_string())?;

        let status_style = if session.is_logging() {
            Style::new().color256(221).bold()
        } else {
            Style::new().red().bold()
        };
        self.line(5, &status_style.apply_to(format!("  {}", session.status())).to_string())?;

        let captions: Vec<String> = BUTTONS.iter().map(|b| b.caption()).collect();
        let hitboxes = layout_row(self.width, 7, &captions);
        let button_style = Style::new().color256(208).bold();
        for (caption, hb) in captions.iter().zip(&hitboxes) {
            if hb.row < self.height {
                self.out
                    .queue(MoveTo(hb.start, hb.row))?
                    .queue(Print(button_style.apply_to(caption)))?;
            }
        }
        self.buttons = BUTTONS.into_iter().zip(hitboxes).collect();

        let focus = if focused {
            Style::new().green().apply_to("● window focused — capturing")
        } else {
            Style::new().dim().apply_to("○ window not focused — nothing is captured")
        };
        self.line(self.height.saturating_sub(1), &format!("  {focus}"))?;

        self.out.flush()?;
        Ok(())
    }

    pub fn draw_viewer(&mut self, viewer: &Viewer) -> Result<()> {
        self.out.queue(Clear(ClearType::All))?;
        self.buttons.clear();

        let title_style = Style::new().color256(214).bold();
        self.centered(0, VIEWER_TITLE, &title_style)?;

        let rows = self.viewer_rows();
        let visible: Vec<String> = viewer
            .lines
            .iter()
            .skip(viewer.offset)
            .take(rows)
            .cloned()
            .collect();
        for (i, text) in visible.iter().enumerate() {
            self.line(1 + i as u16, text)?;
        }

        let footer_row = self.height.saturating_sub(2);
        let footer = Style::new().dim().apply_to(&viewer.footer).to_string();
        self.line(footer_row, &footer)?;

        let close_row = self.height.saturating_sub(1);
        let hb = layout_row(self.width, close_row, &[CLOSE_CAPTION.to_string()])[0];
        self.out
            .queue(MoveTo(hb.start, hb.row))?
            .queue(Print(Style::new().color256(208).bold().apply_to(CLOSE_CAPTION)))?;
        self.close = Some(hb);

        self.out.flush()?;
        Ok(())
    }
}

/// Kitty keyboard protocol flags pushed while the screen is active.
/// Alternate keys make shifted presses arrive with the produced codepoint.
fn enhancement_flags() -> KeyboardEnhancementFlags {
    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
        | KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS
        | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = self.suspend();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn view(content: &str) -> LogView {
        LogView {
            content: content.to_string(),
            summary: Some(LogSummary::of(content)),
        }
    }

    #[test]
    fn buttons_are_centred_and_hit_tested() {
        let captions: Vec<String> = BUTTONS.iter().map(|b| b.caption()).collect();
        let boxes = layout_row(80, 7, &captions);
        assert_eq!(boxes.len(), 3);

        let left = boxes[0].start;
        let right = 80 - boxes[2].end;
        assert!(left.abs_diff(right) <= 1);
        assert_eq!(boxes[1].start, boxes[0].end + BUTTON_GAP);

        assert!(boxes[1].contains(boxes[1].start, 7));
        assert!(!boxes[1].contains(boxes[1].end, 7));
        assert!(!boxes[1].contains(boxes[1].start, 8));
    }

    #[test]
    fn function_keys_map_to_buttons() {
        assert_eq!(Button::from_key(&key(KeyCode::F(2))), Some(Button::ClearLog));
        assert_eq!(Button::from_key(&key(KeyCode::F(3))), Some(Button::ShowLog));
        assert_eq!(Button::from_key(&key(KeyCode::F(10))), Some(Button::Exit));
        assert_eq!(Button::from_key(&key(KeyCode::F(4))), None);
        assert_eq!(Button::from_key(&key(KeyCode::Char('q'))), None);

        let release = KeyEvent {
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
            ..key(KeyCode::F(10))
        };
        assert_eq!(Button::from_key(&release), None);
    }

    #[test]
    fn enhanced_keyboard_reports_shifted_codepoints() {
        let flags = enhancement_flags();
        assert!(flags.contains(KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS));
        assert!(flags.contains(KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES));
    }

    #[test]
    fn tabs_expand_to_stops() {
        assert_eq!(expand_tabs("a\tb"), "a       b");
        assert_eq!(expand_tabs("12345678\tx"), "12345678        x");
        assert_eq!(expand_tabs("plain"), "plain");
    }

    #[test]
    fn viewer_scrolls_within_bounds() {
        let content: String = (0..30).map(|i| format!("line {i}\n")).collect();
        let mut viewer = Viewer::new(&view(&content));

        assert_eq!(viewer.handle(&key(KeyCode::Up), 10), ViewerAction::Ignored);
        assert_eq!(viewer.handle(&key(KeyCode::Down), 10), ViewerAction::Scrolled);
        assert_eq!(viewer.offset, 1);
        viewer.handle(&key(KeyCode::End), 10);
        assert_eq!(viewer.offset, 20);
        assert_eq!(viewer.handle(&key(KeyCode::PageDown), 10), ViewerAction::Ignored);
        viewer.handle(&key(KeyCode::PageUp), 10);
        assert_eq!(viewer.offset, 10);
        viewer.handle(&key(KeyCode::Home), 10);
        assert_eq!(viewer.offset, 0);
        assert_eq!(viewer.handle(&key(KeyCode::Esc), 10), ViewerAction::Close);
    }

    #[test]
    fn viewer_footer_summarises_the_log() {
        let content = "--- Started logging at 2026-10-18T09:30:05.000000Z (consent given) ---\n\
                       2026-10-18T09:30:06.000000Z\tkeysym=a\tchar='a'\n";
        let viewer = Viewer::new(&view(content));
        assert_eq!(viewer.footer, "1 key event(s) across 1 session(s)");
        assert!(!viewer.lines[1].contains('\t'));

        let missing = Viewer::new(&LogView {
            content: crate::session::NOT_FOUND_PLACEHOLDER.to_string(),
            summary: None,
        });
        assert_eq!(missing.lines, vec![crate::session::NOT_FOUND_PLACEHOLDER]);
        assert!(missing.footer.is_empty());
    }
}
