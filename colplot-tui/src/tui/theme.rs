use colplot_core::Rgb;
use ratatui::style::Color;

pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub highlight: Color,
    pub axis: Color,
    pub bars: Color,
    pub dim: Color,
    pub error: Color,
    pub success: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            highlight: Color::Yellow,
            axis: Color::Gray,
            bars: Color::Cyan,
            dim: Color::DarkGray,
            error: Color::Red,
            success: Color::LightGreen,
        }
    }
    pub fn light() -> Self {
        Self {
            bg: Color::White,
            fg: Color::Black,
            highlight: Color::Blue,
            axis: Color::DarkGray,
            bars: Color::Blue,
            dim: Color::Gray,
            error: Color::Red,
            success: Color::Green,
        }
    }
    pub fn nord() -> Self {
        Self {
            bg: Color::Rgb(46, 52, 64),
            fg: Color::Rgb(216, 222, 233),
            highlight: Color::Rgb(136, 192, 208),
            axis: Color::Rgb(129, 161, 193),
            bars: Color::Rgb(163, 190, 140),
            dim: Color::Rgb(76, 86, 106),
            error: Color::Rgb(191, 97, 106),
            success: Color::Rgb(163, 190, 140),
        }
    }
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "nord" => Self::nord(),
            _ => Self::dark(),
        }
    }
}

pub fn rgb(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}
