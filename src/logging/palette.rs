//! ANSI escapes used to color log lines

use colored::Color;

/// Named colors of the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteColor {
    Blue,
    Green,
    Purple,
    Red,
    Yellow,
}

/// Escape sequences for each color plus the terminating reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    blue: String,
    green: String,
    purple: String,
    red: String,
    yellow: String,
    reset: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self::ansi()
    }
}

impl Palette {
    /// Bright foreground colors.
    pub fn ansi() -> Self {
        Self {
            blue: escape(Color::BrightBlue),
            green: escape(Color::BrightGreen),
            purple: escape(Color::BrightMagenta),
            red: escape(Color::BrightRed),
            yellow: escape(Color::BrightYellow),
            reset: "\x1b[0m".to_string(),
        }
    }

    /// No escapes at all, for sinks that are not terminals.
    pub fn plain() -> Self {
        Self {
            blue: String::new(),
            green: String::new(),
            purple: String::new(),
            red: String::new(),
            yellow: String::new(),
            reset: String::new(),
        }
    }

    pub fn escape(&self, color: PaletteColor) -> &str {
        match color {
            PaletteColor::Blue => &self.blue,
            PaletteColor::Green => &self.green,
            PaletteColor::Purple => &self.purple,
            PaletteColor::Red => &self.red,
            PaletteColor::Yellow => &self.yellow,
        }
    }

    pub fn reset(&self) -> &str {
        &self.reset
    }
}

fn escape(color: Color) -> String {
    format!("\x1b[{}m", color.to_fg_str())
}
