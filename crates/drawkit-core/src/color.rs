//! RGBA colors with `#rrggbb` / `#rrggbbaa` hex notation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA color, each channel in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self, String> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return Err(format!("Invalid hex color: {}", hex));
        }
        let channel = |s: &str| {
            u8::from_str_radix(s, 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| format!("Invalid hex color: {}", hex))
        };
        match digits.len() {
            3 => {
                let expand = |i: usize| channel(&digits[i..i + 1].repeat(2));
                Ok(Color::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 | 8 => {
                let a = if digits.len() == 8 {
                    channel(&digits[6..8])?
                } else {
                    1.0
                };
                Ok(Color::rgba(
                    channel(&digits[0..2])?,
                    channel(&digits[2..4])?,
                    channel(&digits[4..6])?,
                    a,
                ))
            }
            _ => Err(format!("Invalid hex color: {}", hex)),
        }
    }

    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        if byte(self.a) == 255 {
            format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                byte(self.r),
                byte(self.g),
                byte(self.b),
                byte(self.a)
            )
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex("#ffffff").unwrap(), Color::WHITE);
        assert_eq!(Color::from_hex("000").unwrap(), Color::BLACK);
        let c = Color::from_hex("#ff000080").unwrap();
        assert_eq!(c.r, 1.0);
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#gggggg").is_err());
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(Color::rgb(1.0, 0.0, 0.0).to_hex(), "#ff0000");
        assert_eq!(Color::WHITE.with_alpha(0.0).to_hex(), "#ffffff00");
    }

    #[test]
    fn test_serde_uses_hex() {
        let json = serde_json::to_string(&Color::rgb(0.0, 0.0, 1.0)).unwrap();
        assert_eq!(json, "\"#0000ff\"");
        let back: Color = serde_json::from_str("\"#00ff00\"").unwrap();
        assert_eq!(back, Color::rgb(0.0, 1.0, 0.0));
    }
}
