//! Color palette: one named SGR sequence per [`Color`].

use crate::types::Color;

/// A palette slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub name: &'static str,
    /// Control sequence that switches the foreground to this color.
    pub sgr: &'static str,
}

impl PaletteEntry {
    pub const fn new(name: &'static str, sgr: &'static str) -> Self {
        Self { name, sgr }
    }
}

/// Immutable color table indexed by [`Color`].
///
/// Holding exactly [`Color::COUNT`] entries means every color always resolves.
/// Renderers share one palette through an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: [PaletteEntry; Color::COUNT],
    default: Color,
}

const ANSI16: [PaletteEntry; Color::COUNT] = [
    PaletteEntry::new("black", "\x1b[30m"),
    PaletteEntry::new("red", "\x1b[31m"),
    PaletteEntry::new("green", "\x1b[32m"),
    PaletteEntry::new("yellow", "\x1b[33m"),
    PaletteEntry::new("blue", "\x1b[34m"),
    PaletteEntry::new("magenta", "\x1b[35m"),
    PaletteEntry::new("cyan", "\x1b[36m"),
    PaletteEntry::new("white", "\x1b[37m"),
    PaletteEntry::new("bright_black", "\x1b[90m"),
    PaletteEntry::new("bright_red", "\x1b[91m"),
    PaletteEntry::new("bright_green", "\x1b[92m"),
    PaletteEntry::new("bright_yellow", "\x1b[93m"),
    PaletteEntry::new("bright_blue", "\x1b[94m"),
    PaletteEntry::new("bright_magenta", "\x1b[95m"),
    PaletteEntry::new("bright_cyan", "\x1b[96m"),
    PaletteEntry::new("bright_white", "\x1b[97m"),
];

impl Palette {
    pub const fn new(entries: [PaletteEntry; Color::COUNT], default: Color) -> Self {
        Self { entries, default }
    }

    /// The 8 standard plus 8 bright ANSI foreground colors; black is the default.
    pub const fn ansi16() -> Self {
        Self::new(ANSI16, Color::Black)
    }

    /// Same entries, different color for blank cells.
    pub const fn with_default(mut self, default: Color) -> Self {
        self.default = default;
        self
    }

    pub fn default_color(&self) -> Color {
        self.default
    }

    pub fn entry(&self, color: Color) -> &PaletteEntry {
        &self.entries[color.index()]
    }

    pub fn sgr(&self, color: Color) -> &'static str {
        self.entry(color).sgr
    }

    pub fn find(&self, name: &str) -> Option<Color> {
        self.entries
            .iter()
            .position(|e| e.name.eq_ignore_ascii_case(name))
            .and_then(Color::from_index)
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::ansi16()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi16_maps_standard_and_bright_codes() {
        let p = Palette::ansi16();
        assert_eq!(p.sgr(Color::Black), "\x1b[30m");
        assert_eq!(p.sgr(Color::White), "\x1b[37m");
        assert_eq!(p.sgr(Color::BrightBlack), "\x1b[90m");
        assert_eq!(p.sgr(Color::BrightWhite), "\x1b[97m");
        assert_eq!(p.default_color(), Color::Black);
    }

    #[test]
    fn find_by_name() {
        let p = Palette::ansi16();
        assert_eq!(p.find("bright_cyan"), Some(Color::BrightCyan));
        assert_eq!(p.find("RED"), Some(Color::Red));
        assert_eq!(p.find("orange"), None);
    }

    #[test]
    fn entries_are_unique() {
        let p = Palette::ansi16();
        for (i, a) in p.entries().iter().enumerate() {
            for b in &p.entries()[i + 1..] {
                assert_ne!(a.sgr, b.sgr);
                assert_ne!(a.name, b.name);
            }
        }
    }
}
