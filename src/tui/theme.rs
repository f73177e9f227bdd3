use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use crate::todotxt::Priority;

#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub muted: Color,
    pub highlight: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn load(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            "light" => Self::light(),
            custom => Self::try_custom(custom).unwrap_or_else(Self::dark),
        }
    }

    fn try_custom(name: &str) -> Option<Self> {
        let path = dirs::config_dir()?
            .join("todo")
            .join("themes")
            .join(format!("{}.toml", name));
        if !path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(&path).ok()?;
        Self::from_toml(&content)
    }

    fn from_toml(content: &str) -> Option<Self> {
        let theme_file: ThemeFile = toml::from_str(content).ok()?;
        Some(theme_file.colors.into())
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(30, 30, 30),
            foreground: Color::Rgb(220, 220, 220),
            accent: Color::Rgb(100, 149, 237),
            success: Color::Rgb(95, 135, 95),
            warning: Color::Rgb(218, 165, 32),
            error: Color::Rgb(205, 92, 92),
            muted: Color::Rgb(128, 128, 128),
            highlight: Color::Rgb(147, 112, 219),
            selection_bg: Color::Rgb(70, 70, 70),
            selection_fg: Color::Rgb(255, 255, 255),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(250, 250, 250),
            foreground: Color::Rgb(50, 50, 50),
            accent: Color::Rgb(65, 105, 225),
            success: Color::Rgb(34, 139, 34),
            warning: Color::Rgb(218, 165, 32),
            error: Color::Rgb(220, 20, 60),
            muted: Color::Rgb(128, 128, 128),
            highlight: Color::Rgb(138, 43, 226),
            selection_bg: Color::Rgb(200, 220, 255),
            selection_fg: Color::Rgb(50, 50, 50),
        }
    }

    pub fn style_default(&self) -> Style {
        Style::default().bg(self.background).fg(self.foreground)
    }

    pub fn style_selected(&self) -> Style {
        Style::default().bg(self.selection_bg).fg(self.selection_fg)
    }

    pub fn style_accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn style_success(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn style_warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn style_error(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn style_muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn style_highlight(&self) -> Style {
        Style::default().fg(self.highlight)
    }

    pub fn style_done(&self) -> Style {
        self.style_muted().add_modifier(Modifier::CROSSED_OUT)
    }

    /// (A) stands out, (B) less so, everything below is plain.
    pub fn style_priority(&self, priority: Option<Priority>) -> Style {
        match priority.map(Priority::letter) {
            Some('A') => self.style_error().add_modifier(Modifier::BOLD),
            Some('B') => self.style_warning(),
            Some('C') => self.style_accent(),
            _ => self.style_default(),
        }
    }
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
struct ThemeFile {
    name: Option<String>,
    colors: ColorScheme,
}

#[derive(Debug, Deserialize)]
struct ColorScheme {
    background: String,
    foreground: String,
    accent: String,
    success: String,
    warning: String,
    error: String,
    muted: String,
    highlight: String,
    selection_bg: String,
    selection_fg: String,
}

impl From<ColorScheme> for Theme {
    fn from(scheme: ColorScheme) -> Self {
        Self {
            background: hex_to_color(&scheme.background).unwrap_or(Color::Black),
            foreground: hex_to_color(&scheme.foreground).unwrap_or(Color::White),
            accent: hex_to_color(&scheme.accent).unwrap_or(Color::Cyan),
            success: hex_to_color(&scheme.success).unwrap_or(Color::Green),
            warning: hex_to_color(&scheme.warning).unwrap_or(Color::Yellow),
            error: hex_to_color(&scheme.error).unwrap_or(Color::Red),
            muted: hex_to_color(&scheme.muted).unwrap_or(Color::Gray),
            highlight: hex_to_color(&scheme.highlight).unwrap_or(Color::Magenta),
            selection_bg: hex_to_color(&scheme.selection_bg).unwrap_or(Color::Blue),
            selection_fg: hex_to_color(&scheme.selection_fg).unwrap_or(Color::White),
        }
    }
}

fn hex_to_color(hex: &str) -> Option<Color> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_theme() {
        let theme = Theme::dark();
        assert_ne!(theme.background, Color::Black);
    }

    #[test]
    fn test_unknown_theme_falls_back_to_dark() {
        let theme = Theme::load("no-such-theme-anywhere");
        assert_eq!(theme.background, Theme::dark().background);
    }

    #[test]
    fn test_hex_to_color() {
        assert_eq!(hex_to_color("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(hex_to_color("ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(hex_to_color("#fff"), None);
        assert_eq!(hex_to_color("#gg0000"), None);
    }

    #[test]
    fn test_theme_file() {
        let content = r##"
name = "mono"

[colors]
background = "#000000"
foreground = "#ffffff"
accent = "#00ffff"
success = "#00ff00"
warning = "#ffff00"
error = "#ff0000"
muted = "#808080"
highlight = "bad"
selection_bg = "#0000ff"
selection_fg = "#ffffff"
"##;
        let theme = Theme::from_toml(content).unwrap();
        assert_eq!(theme.background, Color::Rgb(0, 0, 0));
        assert_eq!(theme.highlight, Color::Magenta);
    }
}
