use crate::domain::Direction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Playback speeds bound to the digit keys 1 through 5
pub const SPEED_PRESETS: [f32; 5] = [0.25, 0.5, 1.0, 1.5, 2.0];

/// Input-agnostic commands produced by the keyboard (and, for swipes, the mouse)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Decide on the current clip
    Swipe(Direction),
    TogglePlayPause,
    SetSpeed(f32),
    /// Reverse the last decision
    Undo,
    ToggleHelp,
    OpenSettings,
    /// Open the current clip in the system player
    OpenExternally,
    Quit,
}

/// What currently has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTarget {
    /// The review surface
    Surface,
    /// A text field; keys belong to it
    Editable,
}

/// Result of routing one key event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Routed {
    /// The key was recognized and consumed
    Handled(Intent),
    /// Not ours; let the focused control have it
    PassThrough,
}

/// Maps key presses on the review surface to intents
#[derive(Debug, Clone)]
pub struct KeyboardRouter {
    enabled: bool,
}

impl Default for KeyboardRouter {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl KeyboardRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn route(&self, key: KeyEvent, target: KeyTarget) -> Routed {
        if !self.enabled || target == KeyTarget::Editable || key.kind != KeyEventKind::Press {
            return Routed::PassThrough;
        }

        match map_key(key) {
            Some(intent) => Routed::Handled(intent),
            None => Routed::PassThrough,
        }
    }
}

fn map_key(key: KeyEvent) -> Option<Intent> {
    let command = key.modifiers.contains(KeyModifiers::CONTROL)
        || key.modifiers.contains(KeyModifiers::SUPER);
    let plain = key.modifiers.difference(KeyModifiers::SHIFT).is_empty();

    let intent = match key.code {
        // Ctrl+C quits; Ctrl/Cmd+Z is undo, same as plain z
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Intent::Quit,
        KeyCode::Char('z') | KeyCode::Char('Z') if plain || command => Intent::Undo,

        _ if !plain => return None,

        KeyCode::Left => Intent::Swipe(Direction::Left),
        KeyCode::Right => Intent::Swipe(Direction::Right),
        KeyCode::Up => Intent::Swipe(Direction::Up),
        KeyCode::Down => Intent::Swipe(Direction::Down),

        KeyCode::Char(' ') => Intent::TogglePlayPause,
        KeyCode::Char(c @ '1'..='5') => {
            let slot = c as usize - '1' as usize;
            Intent::SetSpeed(SPEED_PRESETS[slot])
        }

        KeyCode::Char('?') => Intent::ToggleHelp,
        KeyCode::Char('s') => Intent::OpenSettings,
        KeyCode::Char('o') => Intent::OpenExternally,
        KeyCode::Char('q') | KeyCode::Esc => Intent::Quit,

        _ => return None,
    };

    Some(intent)
}

/// Keys understood by the settings form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsKey {
    NextField,
    PreviousField,
    Insert(char),
    Backspace,
    Save,
    Cancel,
    None,
}

/// Maps keyboard events to settings form edits
pub fn handle_settings_input(key: KeyEvent) -> SettingsKey {
    if key.kind != KeyEventKind::Press {
        return SettingsKey::None;
    }

    match key.code {
        KeyCode::Tab | KeyCode::Down => SettingsKey::NextField,
        KeyCode::BackTab | KeyCode::Up => SettingsKey::PreviousField,
        KeyCode::Enter => SettingsKey::Save,
        KeyCode::Esc => SettingsKey::Cancel,
        KeyCode::Backspace => SettingsKey::Backspace,
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            SettingsKey::Insert(c)
        }
        _ => SettingsKey::None,
    }
}
