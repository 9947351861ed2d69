use std::fs;
use std::path::Path;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_typed: String,
    pub text_pending: String,
    pub text_incorrect: String,
    pub text_incorrect_bg: String,
    pub text_cursor_bg: String,
    pub text_cursor_fg: String,
    pub accent: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub success: String,
}

const BUILTIN: &[&str] = &["default", "paper"];

impl Theme {
    /// User themes in `<config>/retype/themes/` shadow the built-in ones.
    pub fn load(name: &str) -> Option<Self> {
        if let Some(config_dir) = dirs::config_dir() {
            let dir = config_dir.join("retype").join("themes");
            if let Some(theme) = Self::load_from_dir(&dir, name) {
                return Some(theme);
            }
        }
        Self::builtin(name)
    }

    pub fn load_from_dir(dir: &Path, name: &str) -> Option<Self> {
        let path = dir.join(format!("{name}.toml"));
        let content = fs::read_to_string(&path).ok()?;
        match toml::from_str::<Theme>(&content) {
            Ok(theme) => Some(theme),
            Err(err) => {
                warn!(path = %path.display(), %err, "ignoring malformed theme");
                None
            }
        }
    }

    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self {
                name: "default".to_string(),
                colors: ThemeColors::default(),
            }),
            "paper" => Some(Self {
                name: "paper".to_string(),
                colors: ThemeColors::paper(),
            }),
            _ => None,
        }
    }

    pub fn available_themes() -> Vec<String> {
        BUILTIN.iter().map(|n| n.to_string()).collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1e1e2e".to_string(),
            fg: "#cdd6f4".to_string(),
            text_typed: "#a6adc8".to_string(),
            text_pending: "#585b70".to_string(),
            text_incorrect: "#f38ba8".to_string(),
            text_incorrect_bg: "#45273a".to_string(),
            text_cursor_bg: "#f5e0dc".to_string(),
            text_cursor_fg: "#1e1e2e".to_string(),
            accent: "#89b4fa".to_string(),
            border: "#45475a".to_string(),
            border_focused: "#89b4fa".to_string(),
            header_bg: "#313244".to_string(),
            header_fg: "#cdd6f4".to_string(),
            success: "#a6e3a1".to_string(),
        }
    }
}

impl ThemeColors {
    fn paper() -> Self {
        Self {
            bg: "#fdf6e3".to_string(),
            fg: "#073642".to_string(),
            text_typed: "#586e75".to_string(),
            text_pending: "#93a1a1".to_string(),
            text_incorrect: "#dc322f".to_string(),
            text_incorrect_bg: "#f5d6d0".to_string(),
            text_cursor_bg: "#268bd2".to_string(),
            text_cursor_fg: "#fdf6e3".to_string(),
            accent: "#268bd2".to_string(),
            border: "#93a1a1".to_string(),
            border_focused: "#268bd2".to_string(),
            header_bg: "#eee8d5".to_string(),
            header_fg: "#073642".to_string(),
            success: "#859900".to_string(),
        }
    }

    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn text_typed(&self) -> Color { Self::parse_color(&self.text_typed) }
    pub fn text_pending(&self) -> Color { Self::parse_color(&self.text_pending) }
    pub fn text_incorrect(&self) -> Color { Self::parse_color(&self.text_incorrect) }
    pub fn text_incorrect_bg(&self) -> Color { Self::parse_color(&self.text_incorrect_bg) }
    pub fn text_cursor_bg(&self) -> Color { Self::parse_color(&self.text_cursor_bg) }
    pub fn text_cursor_fg(&self) -> Color { Self::parse_color(&self.text_cursor_fg) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}
