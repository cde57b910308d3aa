//! Dynamic help text generation from keymaps.

use crate::app::{Message, Mode};
use crate::keys::{Keymap, browse_keymap, format_key, global_keymap, input_keymap};

/// A single help item representing one or more related actions.
pub struct HelpItem {
    /// Messages to look up keys for. Keys are joined with "/".
    messages: Vec<Message>,
    /// The label to show (e.g., "scroll", "retry", "quit").
    label: &'static str,
}

impl HelpItem {
    /// Create a help item for a single action.
    pub fn new(message: Message, label: &'static str) -> Self {
        Self {
            messages: vec![message],
            label,
        }
    }

    /// Create a help item for paired actions (e.g., j/k for down/up).
    pub fn pair(first: Message, second: Message, label: &'static str) -> Self {
        Self {
            messages: vec![first, second],
            label,
        }
    }

    fn keys(&self, keymap: &Keymap) -> Option<String> {
        let keys: Vec<String> = self
            .messages
            .iter()
            .filter_map(|msg| {
                keymap
                    .find_key(msg)
                    .map(|(code, mods)| format_key(code, mods))
            })
            .collect();
        if keys.is_empty() {
            return None;
        }
        Some(keys.join("/"))
    }

    /// Format this help item using the given keymap.
    /// Returns None if no keys are bound for any of the messages.
    pub fn format(&self, keymap: &Keymap) -> Option<String> {
        self.keys(keymap)
            .map(|keys| format!("{}:{}", keys, self.label))
    }

    /// Format this help item for overlay display.
    /// Returns (`keys_string`, label) or None if no keys are bound.
    pub fn format_for_overlay(&self, keymap: &Keymap) -> Option<(String, &'static str)> {
        self.keys(keymap).map(|keys| (keys, self.label))
    }
}

/// A collection of help items for a specific context.
pub struct HelpConfig {
    /// Items to show in expanded (full help) mode.
    pub expanded: Vec<HelpItem>,
    /// Items to show in compact (minimal) mode.
    pub compact: Vec<HelpItem>,
}

impl HelpConfig {
    /// Format help text for the given mode.
    pub fn format(&self, keymap: &Keymap, show_expanded: bool) -> String {
        let items = if show_expanded {
            &self.expanded
        } else {
            &self.compact
        };
        items
            .iter()
            .filter_map(|item| item.format(keymap))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

/// Keymap in effect for `mode`, used to look up keys for help text.
pub fn keymap_for(mode: Mode) -> Keymap {
    match mode {
        Mode::Input => global_keymap().extend(input_keymap()),
        Mode::Browse => global_keymap().extend(browse_keymap()),
    }
}

/// Status bar help while typing a video id.
pub fn input_help() -> HelpConfig {
    use Message::{CancelInput, InputClear, Quit, SubmitInput};
    HelpConfig {
        expanded: vec![
            HelpItem::new(SubmitInput, "load"),
            HelpItem::new(InputClear, "clear"),
            HelpItem::new(CancelInput, "comments"),
            HelpItem::new(Quit, "quit"),
        ],
        compact: vec![
            HelpItem::new(SubmitInput, "load"),
            HelpItem::new(CancelInput, "comments"),
        ],
    }
}

/// Status bar help while browsing comments.
pub fn browse_help() -> HelpConfig {
    use Message::{
        FocusInput, OpenVideo, Quit, Retry, ScrollBottom, ScrollDown, ScrollTop, ScrollUp,
        ToggleDebug, ToggleHelp,
    };
    HelpConfig {
        expanded: vec![
            HelpItem::pair(ScrollDown(1), ScrollUp(1), "scroll"),
            HelpItem::pair(ScrollTop, ScrollBottom, "top/bottom"),
            HelpItem::new(FocusInput, "video id"),
            HelpItem::new(OpenVideo, "open"),
            HelpItem::new(Retry, "retry"),
            HelpItem::new(ToggleDebug, "debug"),
            HelpItem::new(Quit, "quit"),
            HelpItem::new(ToggleHelp, "hide"),
        ],
        compact: vec![
            HelpItem::pair(ScrollDown(1), ScrollUp(1), "scroll"),
            HelpItem::new(FocusInput, "video id"),
            HelpItem::new(ToggleHelp, "help"),
            HelpItem::new(Quit, "quit"),
        ],
    }
}

/// Rows for the full help overlay.
pub fn overlay_items() -> Vec<HelpItem> {
    use Message::{
        FocusInput, OpenVideo, PageDown, PageUp, Quit, Retry, ScrollBottom, ScrollDown,
        ScrollTop, ScrollUp, ToggleDebug, ToggleHelp,
    };
    vec![
        HelpItem::pair(ScrollDown(1), ScrollUp(1), "scroll"),
        HelpItem::pair(PageDown, PageUp, "half page"),
        HelpItem::pair(ScrollTop, ScrollBottom, "top/bottom"),
        HelpItem::new(FocusInput, "enter video id"),
        HelpItem::new(OpenVideo, "open video in browser"),
        HelpItem::new(Retry, "retry failed request"),
        HelpItem::new(ToggleDebug, "debug pane"),
        HelpItem::new(Quit, "quit"),
        HelpItem::new(ToggleHelp, "close"),
    ]
}
