//! Outline palette
//!
//! Colors used for the outline tree's visual state. Palettes are YAML
//! documents embedded at compile time; the active one is selected by id
//! from [`crate::config::OutlineConfig::palette`].

use serde::Deserialize;

pub const DEFAULT_DARK_YAML: &str = r##"
version: 1
name: "Default Dark"
outline:
  foreground: "#D4D4D4"
  border: "#00000000"
  highlight_foreground: "#FFFFFF"
  highlight_border: "#569CD6"
"##;

pub const DEFAULT_LIGHT_YAML: &str = r##"
version: 1
name: "Default Light"
outline:
  foreground: "#1E1E1E"
  border: "#00000000"
  highlight_foreground: "#0451A5"
  highlight_border: "#0451A5"
"##;

/// A built-in palette entry
pub struct BuiltinPalette {
    /// Stable identifier for config (e.g. "default-dark")
    pub id: &'static str,
    /// Embedded YAML content
    pub yaml: &'static str,
}

/// Registry of all built-in palettes
pub const BUILTIN_PALETTES: &[BuiltinPalette] = &[
    BuiltinPalette {
        id: "default-dark",
        yaml: DEFAULT_DARK_YAML,
    },
    BuiltinPalette {
        id: "default-light",
        yaml: DEFAULT_LIGHT_YAML,
    },
];

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new color from RGBA values
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully transparent, used as "no border"
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&s[range], 16).map_err(|e| e.to_string())
        };
        match s.len() {
            6 => Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Color::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }

    /// Format as "#RRGGBBAA"
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

/// Raw palette data as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteData {
    pub version: u32,
    pub name: String,
    pub outline: OutlineColorsData,
}

/// Outline colors (raw strings from YAML)
#[derive(Debug, Clone, Deserialize)]
pub struct OutlineColorsData {
    pub foreground: String,
    pub border: String,
    pub highlight_foreground: String,
    pub highlight_border: String,
}

/// Resolved palette for outline items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlinePalette {
    pub name: String,
    /// Foreground of items not on the caret's ancestor chain
    pub foreground: Color,
    /// Border of containers not on the caret's ancestor chain
    pub border: Color,
    pub highlight_foreground: Color,
    pub highlight_border: Color,
}

impl OutlinePalette {
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let data: PaletteData =
            serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse palette: {}", e))?;
        Ok(Self {
            name: data.name,
            foreground: Color::from_hex(&data.outline.foreground)?,
            border: Color::from_hex(&data.outline.border)?,
            highlight_foreground: Color::from_hex(&data.outline.highlight_foreground)?,
            highlight_border: Color::from_hex(&data.outline.highlight_border)?,
        })
    }

    pub fn from_builtin(id: &str) -> Result<Self, String> {
        BUILTIN_PALETTES
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| format!("Unknown palette: {}", id))
            .and_then(|p| Self::from_yaml(p.yaml))
    }

    /// Load a palette by id, falling back to the default on failure
    pub fn load(id: &str) -> Self {
        match Self::from_builtin(id) {
            Ok(palette) => palette,
            Err(e) => {
                tracing::warn!("{}, using default palette", e);
                Self::default()
            }
        }
    }
}

impl Default for OutlinePalette {
    fn default() -> Self {
        Self {
            name: "Default Dark".to_string(),
            foreground: Color::rgb(0xD4, 0xD4, 0xD4),
            border: Color::TRANSPARENT,
            highlight_foreground: Color::rgb(0xFF, 0xFF, 0xFF),
            highlight_border: Color::rgb(0x56, 0x9C, 0xD6),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex_6() {
        let color = Color::from_hex("#1E1E1E").unwrap();
        assert_eq!(color, Color::rgb(0x1E, 0x1E, 0x1E));
    }

    #[test]
    fn test_color_from_hex_8() {
        let color = Color::from_hex("#1E1E1E80").unwrap();
        assert_eq!(color.a, 0x80);
    }

    #[test]
    fn test_color_from_hex_rejects_bad_length() {
        assert!(Color::from_hex("#123").is_err());
    }

    #[test]
    fn test_builtin_palettes_parse() {
        for builtin in BUILTIN_PALETTES {
            let palette = OutlinePalette::from_yaml(builtin.yaml).unwrap();
            assert_ne!(palette.foreground, palette.highlight_foreground);
        }
    }

    #[test]
    fn test_default_matches_default_dark_yaml() {
        let parsed = OutlinePalette::from_builtin("default-dark").unwrap();
        assert_eq!(parsed, OutlinePalette::default());
    }

    #[test]
    fn test_unknown_palette_falls_back() {
        assert_eq!(OutlinePalette::load("nope"), OutlinePalette::default());
    }
}
