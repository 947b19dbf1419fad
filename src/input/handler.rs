use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Move(Direction),
    TogglePause,
    /// Same seed stream, fresh board
    Restart,
    /// Fresh seed, fresh board
    NewGame,
    CopyChallenge,
    ToggleLeaderboard,
    ExportHtml,
    ExportJson,
    SaveConfig,
    /// Flip wrap mode for the next game
    ToggleWrap,
    /// Shorter base tick, from the next game
    Faster,
    /// Longer base tick, from the next game
    Slower,
    AlphaDown,
    AlphaUp,
    PrevPreset,
    NextPreset,
    /// Re-read the profile's config file
    ReloadConfig,
    ResetDefaults,
    /// Esc: closes an overlay if one is open, otherwise quits
    Back,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Move(Direction::Up),
            KeyCode::Down => KeyAction::Move(Direction::Down),
            KeyCode::Left => KeyAction::Move(Direction::Left),
            KeyCode::Right => KeyAction::Move(Direction::Right),

            // Movement - WASD
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'w' => KeyAction::Move(Direction::Up),
                's' => KeyAction::Move(Direction::Down),
                'a' => KeyAction::Move(Direction::Left),
                'd' => KeyAction::Move(Direction::Right),

                'p' | ' ' => KeyAction::TogglePause,
                'r' => KeyAction::Restart,
                'n' => KeyAction::NewGame,
                'c' => KeyAction::CopyChallenge,
                'l' => KeyAction::ToggleLeaderboard,
                'e' => KeyAction::ExportHtml,
                'j' => KeyAction::ExportJson,
                'k' => KeyAction::SaveConfig,
                't' => KeyAction::ToggleWrap,
                'o' => KeyAction::ReloadConfig,
                'x' => KeyAction::ResetDefaults,

                // Settings
                '-' => KeyAction::Faster,
                '=' | '+' => KeyAction::Slower,
                '[' => KeyAction::AlphaDown,
                ']' => KeyAction::AlphaUp,
                ',' | '<' => KeyAction::PrevPreset,
                '.' | '>' => KeyAction::NextPreset,
                'q' => KeyAction::Quit,
                _ => KeyAction::None,
            },

            KeyCode::Esc => KeyAction::Back,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
