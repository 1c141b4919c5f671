use crate::config::DisplayMode;
use crossterm::style::Color;

/// Wave stroke color
pub fn stroke_color(mode: DisplayMode) -> Color {
    match mode {
        DisplayMode::Dark => Color::Rgb { r: 255, g: 255, b: 255 },
        DisplayMode::Light => Color::Rgb { r: 0, g: 0, b: 0 },
    }
}

/// Faint horizontal guide through the canvas center
pub fn centerline_color(mode: DisplayMode) -> Color {
    match mode {
        DisplayMode::Dark => Color::Rgb { r: 34, g: 34, b: 34 },
        DisplayMode::Light => Color::Rgb { r: 221, g: 221, b: 221 },
    }
}

/// Terminal background painted behind the canvas
pub fn background_color(mode: DisplayMode) -> Color {
    match mode {
        DisplayMode::Dark => Color::Rgb { r: 0, g: 0, b: 0 },
        DisplayMode::Light => Color::Rgb { r: 255, g: 255, b: 255 },
    }
}

/// Status line text
pub fn status_color(mode: DisplayMode) -> Color {
    match mode {
        DisplayMode::Dark => Color::Grey,
        DisplayMode::Light => Color::DarkGrey,
    }
}
