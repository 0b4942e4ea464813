//! Input model: discrete per-frame events plus a held-key snapshot.
//!
//! The game only sees [`InputEvent`] and [`HeldKeys`]. Translation from
//! crossterm events lives here too, together with the hold-window tracker
//! that turns press/repeat/release events into "currently held" state.

use std::collections::HashMap;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::geometry::Point;

/// A key is considered held if its last press/repeat event arrived within
/// this many frames. Terminals without release events rely on OS key-repeat
/// refreshing the timestamp before it expires.
pub const HOLD_WINDOW: u64 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Space,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    /// Mouse button press in logical canvas coordinates.
    MouseDown(Point),
}

/// Directional keys currently held down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl HeldKeys {
    pub fn any(&self) -> bool {
        self.left || self.right || self.up || self.down
    }
}

// ── Hold tracking ─────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct KeyTracker {
    key_frame: HashMap<Key, u64>,
    frame: u64,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame. Must be called once before draining the frame's events.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Press or repeat: refresh the timestamp so the key stays held.
    pub fn touch(&mut self, key: Key) {
        self.key_frame.insert(key, self.frame);
    }

    /// Release: drop the key immediately (keyboard-enhancement terminals only).
    pub fn release(&mut self, key: Key) {
        self.key_frame.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.key_frame
            .get(&key)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    pub fn held(&self) -> HeldKeys {
        HeldKeys {
            left: self.is_held(Key::Left),
            right: self.is_held(Key::Right),
            up: self.is_held(Key::Up),
            down: self.is_held(Key::Down),
        }
    }
}

// ── crossterm translation ─────────────────────────────────────────────────────

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Key::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Key::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::Right),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Char(' ') => Some(Key::Space),
        _ => None,
    }
}

/// Translate one terminal event, updating `tracker` as a side effect.
///
/// `to_canvas` maps a terminal cell (column, row) to logical canvas
/// coordinates; it is only called for mouse presses.
pub fn translate_event<F>(event: Event, tracker: &mut KeyTracker, to_canvas: F) -> Option<InputEvent>
where
    F: Fn(u16, u16) -> Point,
{
    match event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) => {
            if modifiers.contains(KeyModifiers::CONTROL)
                && matches!(code, KeyCode::Char('c') | KeyCode::Char('C'))
            {
                return Some(InputEvent::Quit);
            }
            let key = map_key(code)?;
            match kind {
                KeyEventKind::Press => {
                    tracker.touch(key);
                    Some(InputEvent::KeyDown(key))
                }
                KeyEventKind::Repeat => {
                    tracker.touch(key);
                    None
                }
                KeyEventKind::Release => {
                    tracker.release(key);
                    None
                }
            }
        }
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => Some(InputEvent::MouseDown(to_canvas(column, row))),
        _ => None,
    }
}
