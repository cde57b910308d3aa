use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, Message, Mode};

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: usize = 3;

/// A declarative keybinding map that can be composed and extended.
#[derive(Clone)]
pub struct Keymap {
    bindings: Vec<(KeyCode, KeyModifiers, Message)>,
}

impl Keymap {
    pub const fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Add a key binding with no modifiers.
    pub fn bind(mut self, code: KeyCode, message: Message) -> Self {
        self.bindings.push((code, KeyModifiers::NONE, message));
        self
    }

    /// Add a key binding with Ctrl modifier.
    pub fn bind_ctrl(mut self, code: KeyCode, message: Message) -> Self {
        self.bindings.push((code, KeyModifiers::CONTROL, message));
        self
    }

    /// Look up a message for a key event.
    /// Later bindings take precedence over earlier ones.
    pub fn get(&self, event: &KeyEvent) -> Option<Message> {
        self.bindings
            .iter()
            .rev()
            .find(|(code, mods, _)| *code == event.code && event.modifiers.contains(*mods))
            .map(|(_, _, msg)| msg.clone())
    }

    /// Extend this keymap with another. The other keymap's bindings take precedence.
    pub fn extend(mut self, other: Self) -> Self {
        self.bindings.extend(other.bindings);
        self
    }

    /// Find the first key bound to a specific message.
    pub fn find_key(&self, message: &Message) -> Option<(KeyCode, KeyModifiers)> {
        self.bindings
            .iter()
            .find(|(_, _, msg)| msg == message)
            .map(|(code, mods, _)| (*code, *mods))
    }
}

/// Format a key binding for display in help text.
pub fn format_key(code: KeyCode, mods: KeyModifiers) -> String {
    let key_str = match code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => "?".to_string(),
    };
    if mods.contains(KeyModifiers::CONTROL) {
        format!("C-{key_str}")
    } else if mods.contains(KeyModifiers::ALT) {
        format!("M-{key_str}")
    } else {
        key_str
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

/// Keys that work in every mode.
pub fn global_keymap() -> Keymap {
    Keymap::new().bind_ctrl(KeyCode::Char('c'), Message::Quit)
}

/// Keybindings while the help overlay is open.
fn help_overlay_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('?'), Message::ToggleHelp)
        .bind(KeyCode::Esc, Message::ToggleHelp)
        .bind(KeyCode::Char('q'), Message::ToggleHelp)
        .bind_ctrl(KeyCode::Char('c'), Message::ToggleHelp)
}

/// Editing keys for the video id field. Printable characters not bound
/// here are inserted as text.
pub fn input_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Enter, Message::SubmitInput)
        .bind(KeyCode::Esc, Message::CancelInput)
        .bind(KeyCode::Backspace, Message::InputBackspace)
        .bind(KeyCode::Left, Message::InputLeft)
        .bind(KeyCode::Right, Message::InputRight)
        .bind_ctrl(KeyCode::Char('u'), Message::InputClear)
}

/// Comment list keybindings.
pub fn browse_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('j'), Message::ScrollDown(1))
        .bind(KeyCode::Down, Message::ScrollDown(1))
        .bind(KeyCode::Char('k'), Message::ScrollUp(1))
        .bind(KeyCode::Up, Message::ScrollUp(1))
        .bind_ctrl(KeyCode::Char('d'), Message::PageDown)
        .bind(KeyCode::PageDown, Message::PageDown)
        .bind_ctrl(KeyCode::Char('u'), Message::PageUp)
        .bind(KeyCode::PageUp, Message::PageUp)
        .bind(KeyCode::Char('g'), Message::ScrollTop)
        .bind(KeyCode::Char('G'), Message::ScrollBottom)
        .bind(KeyCode::Char('/'), Message::FocusInput)
        .bind(KeyCode::Char('i'), Message::FocusInput)
        .bind(KeyCode::Char('r'), Message::Retry)
        .bind(KeyCode::Char('o'), Message::OpenVideo)
        .bind(KeyCode::Char('`'), Message::ToggleDebug)
        .bind(KeyCode::Char('?'), Message::ToggleHelp)
        .bind(KeyCode::Char('q'), Message::Quit)
}

pub fn handle_key(key: KeyEvent, app: &App) -> Option<Message> {
    // Help overlay takes priority when open
    if app.show_help {
        return help_overlay_keymap().get(&key);
    }

    if let Some(msg) = global_keymap().get(&key) {
        return Some(msg);
    }

    match app.mode {
        Mode::Input => input_keymap().get(&key).or_else(|| match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(Message::InputChar(c))
            }
            _ => None,
        }),
        Mode::Browse => browse_keymap().get(&key),
    }
}

pub fn handle_mouse(mouse: MouseEvent, app: &App) -> Option<Message> {
    if app.show_help {
        return None;
    }
    match mouse.kind {
        MouseEventKind::ScrollDown => Some(Message::ScrollDown(WHEEL_LINES)),
        MouseEventKind::ScrollUp => Some(Message::ScrollUp(WHEEL_LINES)),
        _ => None,
    }
}
