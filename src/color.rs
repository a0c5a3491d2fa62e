//! Color helpers for piece and cell display attributes

use crate::error::ConfigError;
use ratatui::style::Color;
use std::str::FromStr;

/// Color of a falling piece when nothing else is configured
pub const DEFAULT_PIECE_COLOR: Color = Color::Rgb(128, 48, 192);

/// xterm values for the 16 ANSI colors, in index order
const ANSI_RGB: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (128, 0, 0),
    (0, 128, 0),
    (128, 128, 0),
    (0, 0, 128),
    (128, 0, 128),
    (0, 128, 128),
    (192, 192, 192),
    (128, 128, 128),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (0, 0, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

/// Cube levels for indices 16..=231
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// Parse a color the way ratatui does: `#rrggbb`, a name, or an ANSI index.
pub fn parse_color(s: &str) -> Result<Color, ConfigError> {
    Color::from_str(s.trim()).map_err(|_| ConfigError::InvalidColor(s.to_string()))
}

/// Resolve any terminal color to an RGB triple
pub fn to_rgb(color: Color) -> (u8, u8, u8) {
    match color {
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Indexed(i) => indexed_rgb(i),
        Color::Reset | Color::Black => ANSI_RGB[0],
        Color::Red => ANSI_RGB[1],
        Color::Green => ANSI_RGB[2],
        Color::Yellow => ANSI_RGB[3],
        Color::Blue => ANSI_RGB[4],
        Color::Magenta => ANSI_RGB[5],
        Color::Cyan => ANSI_RGB[6],
        Color::Gray => ANSI_RGB[7],
        Color::DarkGray => ANSI_RGB[8],
        Color::LightRed => ANSI_RGB[9],
        Color::LightGreen => ANSI_RGB[10],
        Color::LightYellow => ANSI_RGB[11],
        Color::LightBlue => ANSI_RGB[12],
        Color::LightMagenta => ANSI_RGB[13],
        Color::LightCyan => ANSI_RGB[14],
        Color::White => ANSI_RGB[15],
    }
}

fn indexed_rgb(i: u8) -> (u8, u8, u8) {
    match i {
        0..=15 => ANSI_RGB[i as usize],
        16..=231 => {
            let n = i - 16;
            (
                CUBE_LEVELS[(n / 36) as usize],
                CUBE_LEVELS[((n / 6) % 6) as usize],
                CUBE_LEVELS[(n % 6) as usize],
            )
        }
        _ => {
            let level = 8 + 10 * (i - 232);
            (level, level, level)
        }
    }
}

/// Shade used for locked cells: every channel loses a quarter of its value.
pub fn darken(color: Color) -> Color {
    let (r, g, b) = to_rgb(color);
    Color::Rgb(r - r / 4, g - g / 4, b - b / 4)
}
