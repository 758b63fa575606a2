//! Light/dark theme and its persisted preference.

use log::warn;
use ratatui::style::Color;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Key of the stored preference.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

const DARK_VARS: [(&str, &str); 8] = [
    ("--bg-color", "#000000"),
    ("--header-bg", "linear-gradient(145deg, #1E1E1E, #000000)"),
    ("--card-bg", "linear-gradient(145deg, #1E1E1E, #2B2B2B)"),
    ("--text-color", "#ffffff"),
    ("--text-secondary", "#a0aec0"),
    ("--input-bg", "#1a202c"),
    ("--card-shadow", "0 10px 20px rgba(160, 32, 240, 0.3)"),
    ("--header-text", "#ffffff"),
];

const LIGHT_VARS: [(&str, &str); 8] = [
    ("--bg-color", "#f7fafc"),
    ("--header-bg", "#3357E9"),
    ("--card-bg", "linear-gradient(145deg, #ffffff, #f7fafc)"),
    ("--text-color", "#1a202c"),
    ("--text-secondary", "#4a5568"),
    ("--input-bg", "#edf2f7"),
    ("--card-shadow", "0 10px 20px rgba(37, 99, 235, 0.2)"),
    ("--header-text", "#ffffff"),
];

impl Theme {
    pub fn name(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn css_variables(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Theme::Dark => &DARK_VARS,
            Theme::Light => &LIGHT_VARS,
        }
    }

    fn var(self, name: &str) -> Color {
        self.css_variables()
            .iter()
            .find(|(k, _)| *k == name)
            .and_then(|(_, v)| first_color(v))
            .unwrap_or(Color::Reset)
    }

    pub fn palette(self) -> Palette {
        Palette {
            bg: self.var("--bg-color"),
            header: self.var("--header-bg"),
            card: self.var("--card-bg"),
            text: self.var("--text-color"),
            text_secondary: self.var("--text-secondary"),
            input: self.var("--input-bg"),
            accent: self.var("--card-shadow"),
            header_text: self.var("--header-text"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub header: Color,
    pub card: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub input: Color,
    pub accent: Color,
    pub header_text: Color,
}

/// First `#rrggbb` or `rgb[a](r, g, b...)` colour found in a CSS value.
fn first_color(value: &str) -> Option<Color> {
    let hex = value.find('#').and_then(|i| {
        let digits = value.get(i + 1..i + 7)?;
        let n = u32::from_str_radix(digits, 16).ok()?;
        Some((i, Color::Rgb((n >> 16) as u8, (n >> 8) as u8, n as u8)))
    });
    let rgb = value.find("rgb").and_then(|i| {
        let open = value[i..].find('(')? + i + 1;
        let close = value[open..].find(')')? + open;
        let parts: Vec<u8> = value[open..close]
            .split(',')
            .take(3)
            .filter_map(|p| p.trim().parse().ok())
            .collect();
        match parts.as_slice() {
            [r, g, b] => Some((i, Color::Rgb(*r, *g, *b))),
            _ => None,
        }
    });
    match (hex, rgb) {
        (Some(h), Some(r)) => Some(if h.0 < r.0 { h.1 } else { r.1 }),
        (a, b) => a.or(b).map(|(_, c)| c),
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PrefsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Small JSON key/value file holding the theme preference.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Option<Map<String, Value>> {
        let text = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Some(map),
            Ok(_) | Err(_) => {
                warn!("ignoring unreadable preferences at {}", self.path.display());
                None
            }
        }
    }

    /// Missing or corrupt preferences fall back to the dark theme.
    pub fn load(&self) -> Theme {
        self.read_map()
            .and_then(|m| m.get(THEME_KEY).and_then(|v| v.as_str()).and_then(Theme::parse))
            .unwrap_or_default()
    }

    pub fn save(&self, theme: Theme) -> Result<(), PrefsError> {
        let mut map = self.read_map().unwrap_or_default();
        map.insert(THEME_KEY.to_string(), Value::String(theme.name().to_string()));
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&Value::Object(map))?)?;
        Ok(())
    }
}
