//! Theme configuration for the console.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::Trend;

/// Line colours assigned to chart series in order.
const DARK_PALETTE: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::LightBlue,
    Color::LightGreen,
    Color::LightRed,
];

const LIGHT_PALETTE: [Color; 6] = [
    Color::Blue,
    Color::Magenta,
    Color::DarkGray,
    Color::Cyan,
    Color::Green,
    Color::Red,
];

/// Color and style theme for the console.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for cells that increased relative to the reference column.
    pub increase: Color,
    /// Color for cells that decreased relative to the reference column.
    pub decrease: Color,
    pub border: Color,
    pub header: Style,
    pub selected: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub border_type: BorderType,
    palette: &'static [Color],
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            increase: Color::Red,
            decrease: Color::Green,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
            palette: &DARK_PALETTE,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            increase: Color::Red,
            decrease: Color::Green,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
            palette: &LIGHT_PALETTE,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for a table cell: increases red, decreases green.
    pub fn trend_style(&self, trend: Trend) -> Style {
        match trend {
            Trend::Increase => Style::default().fg(self.increase),
            Trend::Decrease => Style::default().fg(self.decrease),
            Trend::Flat => Style::default(),
        }
    }

    /// Line color of the `index`-th chart series.
    pub fn series_color(&self, index: usize) -> Color {
        self.palette[index % self.palette.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_styles() {
        let theme = Theme::dark();
        assert_eq!(theme.trend_style(Trend::Increase).fg, Some(Color::Red));
        assert_eq!(theme.trend_style(Trend::Decrease).fg, Some(Color::Green));
        assert_eq!(theme.trend_style(Trend::Flat).fg, None);
    }

    #[test]
    fn test_series_colors_wrap() {
        let theme = Theme::light();
        assert_eq!(theme.series_color(0), theme.series_color(LIGHT_PALETTE.len()));
    }
}
