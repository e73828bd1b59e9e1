//! Keyboard bindings and input handling.
//!
//! Centralizes all keyboard shortcuts and key mapping logic.

use nannou::prelude::*;

/// Actions that can be triggered by key presses
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // App-level
    Quit,
    ShowHelp,
    HideHelp,

    // Control panel
    SelectPrevious,
    SelectNext,
    /// Step the selected knob; `coarse` multiplies the step by ten
    Adjust { direction: f64, coarse: bool },

    // Presets
    ApplyPreset(u32),
    Reset,

    // View
    ZoomIn,
    ZoomOut,
    ToggleUnits,
    TogglePause,
}

/// Convert a number key to its digit
pub fn key_to_digit(key: Key) -> Option<u32> {
    let digit = match key {
        Key::Key0 | Key::Numpad0 => 0,
        Key::Key1 | Key::Numpad1 => 1,
        Key::Key2 | Key::Numpad2 => 2,
        Key::Key3 | Key::Numpad3 => 3,
        Key::Key4 | Key::Numpad4 => 4,
        Key::Key5 | Key::Numpad5 => 5,
        Key::Key6 | Key::Numpad6 => 6,
        Key::Key7 | Key::Numpad7 => 7,
        Key::Key8 | Key::Numpad8 => 8,
        Key::Key9 | Key::Numpad9 => 9,
        _ => return None,
    };
    Some(digit)
}

/// Parse a key into an action based on current mode
pub fn parse_key(key: Key, shift: bool, help_visible: bool) -> Option<Action> {
    // Global quit key
    if key == Key::Q {
        return Some(Action::Quit);
    }

    if key == Key::H {
        return Some(Action::ShowHelp);
    }

    // Help overlay swallows everything except its own close keys
    if help_visible {
        return match key {
            Key::Escape => Some(Action::HideHelp),
            _ => None,
        };
    }

    if let Some(digit) = key_to_digit(key) {
        return Some(Action::ApplyPreset(digit));
    }

    match key {
        Key::Up => Some(Action::SelectPrevious),
        Key::Down => Some(Action::SelectNext),
        Key::Left => Some(Action::Adjust {
            direction: -1.0,
            coarse: shift,
        }),
        Key::Right => Some(Action::Adjust {
            direction: 1.0,
            coarse: shift,
        }),
        Key::R => Some(Action::Reset),
        Key::Z => Some(Action::ZoomIn),
        Key::X => Some(Action::ZoomOut),
        Key::U => Some(Action::ToggleUnits),
        Key::P | Key::Space => Some(Action::TogglePause),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_and_help_work_in_every_mode() {
        for help in [false, true] {
            assert_eq!(parse_key(Key::Q, false, help), Some(Action::Quit));
            assert_eq!(parse_key(Key::H, false, help), Some(Action::ShowHelp));
        }
    }

    #[test]
    fn test_help_swallows_controls() {
        assert_eq!(parse_key(Key::Right, false, true), None);
        assert_eq!(parse_key(Key::Key1, false, true), None);
        assert_eq!(parse_key(Key::Escape, false, true), Some(Action::HideHelp));
    }

    #[test]
    fn test_shift_selects_coarse_step() {
        assert_eq!(
            parse_key(Key::Left, true, false),
            Some(Action::Adjust {
                direction: -1.0,
                coarse: true
            })
        );
        assert_eq!(
            parse_key(Key::Right, false, false),
            Some(Action::Adjust {
                direction: 1.0,
                coarse: false
            })
        );
    }

    #[test]
    fn test_number_keys_pick_presets() {
        assert_eq!(parse_key(Key::Key2, false, false), Some(Action::ApplyPreset(2)));
        assert_eq!(parse_key(Key::Key0, false, false), Some(Action::ApplyPreset(0)));
        assert_eq!(parse_key(Key::Numpad9, false, false), Some(Action::ApplyPreset(9)));
    }
}
