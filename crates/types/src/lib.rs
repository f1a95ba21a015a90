//! Core types module - shared value types and constants
//!
//! Everything in here is plain data with no external dependencies, so the
//! renderer, the input pump and the loop can all agree on the same vocabulary
//! without depending on each other.
//!
//! # Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_WIDTH` | 80 | Frame buffer columns |
//! | `DEFAULT_HEIGHT` | 24 | Frame buffer rows |
//! | `DEFAULT_FPS` | 60.0 | Frame-rate cap |
//! | `DEFAULT_TIME_SCALE` | 1.0 | Multiplier applied to measured `dt` |
//! | `DEFAULT_INPUT_QUEUE_DEPTH` | 8 | Pending input events before new ones are dropped |
//!
//! # Examples
//!
//! ```
//! use tui_gg_types::{Color, Flow, InputEvent, Key};
//!
//! let event = InputEvent::char('q');
//! assert!(event.is_char('q'));
//! assert_eq!(event.key, Key::Char('q'));
//!
//! assert_eq!(Color::BrightWhite.index(), 15);
//! assert_eq!(Color::from_index(1), Some(Color::Red));
//!
//! assert!(Flow::Quit.is_quit());
//! ```

/// Default frame buffer width in columns.
pub const DEFAULT_WIDTH: u16 = 80;

/// Default frame buffer height in rows.
pub const DEFAULT_HEIGHT: u16 = 24;

/// Default frame-rate cap.
pub const DEFAULT_FPS: f64 = 60.0;

/// Default time-scale factor (real time).
pub const DEFAULT_TIME_SCALE: f64 = 1.0;

/// Default bound of the input event queue.
///
/// The loop drains one event per frame, so a handful is plenty.
pub const DEFAULT_INPUT_QUEUE_DEPTH: usize = 8;

/// Glyph used for blank cells.
pub const BLANK: char = ' ';

/// Block elements.
pub mod glyph {
    pub const FULL_BLOCK: char = '█';
    pub const LIGHT_SHADE: char = '░';
    pub const MEDIUM_SHADE: char = '▒';
    pub const DARK_SHADE: char = '▓';
    pub const UPPER_HALF_BLOCK: char = '▀';
    pub const LOWER_HALF_BLOCK: char = '▄';
    pub const LEFT_HALF_BLOCK: char = '▌';
    pub const RIGHT_HALF_BLOCK: char = '▐';

    // Box drawing
    pub const LIGHT_HORIZONTAL: char = '─';
    pub const LIGHT_VERTICAL: char = '│';
    pub const LIGHT_DOWN_AND_RIGHT: char = '┌';
    pub const LIGHT_DOWN_AND_LEFT: char = '┐';
    pub const LIGHT_UP_AND_RIGHT: char = '└';
    pub const LIGHT_UP_AND_LEFT: char = '┘';
    pub const LIGHT_CROSS: char = '┼';

    // Geometric shapes
    pub const BLACK_CIRCLE: char = '●';
    pub const WHITE_CIRCLE: char = '○';
    pub const BLACK_SQUARE: char = '■';
    pub const WHITE_SQUARE: char = '□';
    pub const BLACK_TRIANGLE: char = '▲';

    // Arrows
    pub const LEFT_ARROW: char = '←';
    pub const UP_ARROW: char = '↑';
    pub const RIGHT_ARROW: char = '→';
    pub const DOWN_ARROW: char = '↓';
}

/// The 16 ANSI colors, in palette order.
///
/// The discriminant is the palette index, so any `Color` is always a valid
/// index into a full palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Color {
    #[default]
    Black = 0,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl Color {
    /// Number of palette slots.
    pub const COUNT: usize = 16;

    /// All colors in palette order.
    pub const ALL: [Color; Color::COUNT] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::White,
        Color::BrightBlack,
        Color::BrightRed,
        Color::BrightGreen,
        Color::BrightYellow,
        Color::BrightBlue,
        Color::BrightMagenta,
        Color::BrightCyan,
        Color::BrightWhite,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Logical key carried by an [`InputEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    /// Function key, 1-based.
    F(u8),
    /// Pointer button; position is in [`InputEvent::pointer`].
    Pointer,
}

/// Press/release phase, for backends that report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyKind {
    #[default]
    Press,
    Repeat,
    Release,
}

/// A normalized input record, created per keystroke and discarded after
/// dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputEvent {
    pub key: Key,
    pub kind: KeyKind,
    /// Control modifier was held.
    pub ctrl: bool,
    /// `(column, row)` for pointer events, zero-based.
    pub pointer: Option<(u16, u16)>,
}

impl InputEvent {
    /// A plain key press.
    pub const fn press(key: Key) -> Self {
        Self {
            key,
            kind: KeyKind::Press,
            ctrl: false,
            pointer: None,
        }
    }

    /// A plain character press.
    pub const fn char(ch: char) -> Self {
        Self::press(Key::Char(ch))
    }

    pub const fn with_kind(mut self, kind: KeyKind) -> Self {
        self.kind = kind;
        self
    }

    pub const fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// The character code, if this event carries one.
    ///
    /// Enter, Tab, Escape and Backspace map to their control codes so games
    /// written against raw byte streams keep working.
    pub fn code(&self) -> Option<char> {
        match self.key {
            Key::Char(c) => Some(c),
            Key::Enter => Some('\r'),
            Key::Tab => Some('\t'),
            Key::Escape => Some('\x1b'),
            Key::Backspace => Some('\x7f'),
            _ => None,
        }
    }

    /// Case-insensitive character match on a press or repeat.
    pub fn is_char(&self, ch: char) -> bool {
        self.kind != KeyKind::Release
            && matches!(self.key, Key::Char(c) if c.eq_ignore_ascii_case(&ch))
    }

    pub fn is_press(&self) -> bool {
        self.kind == KeyKind::Press
    }
}

/// Outcome of input handling or an update step.
///
/// `Quit` is a normal, non-error request to stop the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    Continue,
    Quit,
}

impl Flow {
    pub fn is_quit(self) -> bool {
        self == Flow::Quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_index_round_trips_through_palette_order() {
        for (i, color) in Color::ALL.iter().enumerate() {
            assert_eq!(color.index(), i);
        }
        assert_eq!(Color::from_index(Color::COUNT), None);
        assert_eq!(Color::default(), Color::Black);
    }

    #[test]
    fn input_event_codes() {
        assert_eq!(InputEvent::press(Key::Enter).code(), Some('\r'));
        assert_eq!(InputEvent::press(Key::Escape).code(), Some('\x1b'));
        assert_eq!(InputEvent::press(Key::Up).code(), None);
        assert_eq!(InputEvent::char('a').code(), Some('a'));
    }

    #[test]
    fn is_char_ignores_case_and_releases() {
        assert!(InputEvent::char('Q').is_char('q'));
        assert!(!InputEvent::char('q')
            .with_kind(KeyKind::Release)
            .is_char('q'));
        assert!(!InputEvent::press(Key::Enter).is_char('\r'));
    }

    #[test]
    fn default_timing() {
        assert_eq!(DEFAULT_FPS, 60.0);
        assert_eq!(DEFAULT_TIME_SCALE, 1.0);
        assert!(DEFAULT_INPUT_QUEUE_DEPTH >= 1 && DEFAULT_INPUT_QUEUE_DEPTH <= 10);
    }
}
