use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveToColumn, MoveToPreviousLine, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    queue,
    style::Print,
    terminal::{self, disable_raw_mode, enable_raw_mode, Clear, ClearType},
};
use unicode_width::UnicodeWidthChar;

/// What the user did with the menu. Interrupt and end-of-input are
/// ordinary outcomes here, not errors; only real widget I/O failures
/// surface as `io::Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Selected(usize),
    Interrupted,
    EndOfInput,
}

/// Inline arrow-key list selection. Renders below the current cursor
/// position, never enters the alternate screen, and erases itself before
/// returning so the surrounding output stays clean.
pub struct Select<'a, W: Write> {
    label: &'a str,
    items: &'a [String],
    out: &'a mut W,
}

struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

impl<'a, W: Write> Select<'a, W> {
    pub fn new(label: &'a str, items: &'a [String], out: &'a mut W) -> Self {
        Self { label, items, out }
    }

    pub fn run(mut self) -> io::Result<Outcome> {
        if self.items.is_empty() {
            return Ok(Outcome::EndOfInput);
        }

        let _guard = RawMode::enable()?;
        queue!(self.out, Hide)?;

        let result = self.event_loop();
        // restore the cursor even when the event loop failed
        let restored = self.restore_cursor();
        let outcome = result?;
        restored?;
        Ok(outcome)
    }

    fn event_loop(&mut self) -> io::Result<Outcome> {
        let mut cursor = 0usize;
        let mut rendered = 0u16;
        let outcome = loop {
            rendered = self.draw(cursor, rendered)?;
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                if let Some(outcome) = self.handle_key(key, &mut cursor) {
                    break outcome;
                }
            }
        };
        self.erase(rendered)?;
        Ok(outcome)
    }

    fn restore_cursor(&mut self) -> io::Result<()> {
        queue!(self.out, Show)?;
        self.out.flush()
    }

    fn handle_key(&mut self, key: KeyEvent, cursor: &mut usize) -> Option<Outcome> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Outcome::Interrupted),
                KeyCode::Char('d') => Some(Outcome::EndOfInput),
                _ => {
                    self.ring();
                    None
                }
            };
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                *cursor = wrap_prev(*cursor, self.items.len());
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                *cursor = wrap_next(*cursor, self.items.len());
                None
            }
            KeyCode::Enter => Some(Outcome::Selected(*cursor)),
            KeyCode::Esc => Some(Outcome::Interrupted),
            _ => {
                self.ring();
                None
            }
        }
    }

    // The bell never reaches a real terminal: menus write through the
    // BellFilter, which swallows it.
    fn ring(&mut self) {
        let _ = self.out.write_all(b"\x07");
        let _ = self.out.flush();
    }

    fn draw(&mut self, cursor: usize, prev_rows: u16) -> io::Result<u16> {
        let width = terminal::size().map(|(w, _)| w as usize).unwrap_or(80);
        if prev_rows > 0 {
            queue!(self.out, MoveToPreviousLine(prev_rows))?;
        }
        queue!(self.out, MoveToColumn(0), Clear(ClearType::FromCursorDown))?;
        queue!(self.out, Print(truncate(self.label, width)), Print("\r\n"))?;
        for (i, item) in self.items.iter().enumerate() {
            let marker = if i == cursor { "> " } else { "  " };
            let row = format!("{marker}{item}");
            queue!(self.out, Print(truncate(&row, width)), Print("\r\n"))?;
        }
        self.out.flush()?;
        Ok(self.items.len() as u16 + 1)
    }

    fn erase(&mut self, rows: u16) -> io::Result<()> {
        if rows > 0 {
            queue!(self.out, MoveToPreviousLine(rows))?;
        }
        queue!(self.out, MoveToColumn(0), Clear(ClearType::FromCursorDown))?;
        Ok(())
    }
}

fn wrap_prev(i: usize, len: usize) -> usize {
    if i == 0 {
        len - 1
    } else {
        i - 1
    }
}

fn wrap_next(i: usize, len: usize) -> usize {
    if i + 1 >= len {
        0
    } else {
        i + 1
    }
}

fn truncate(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}
