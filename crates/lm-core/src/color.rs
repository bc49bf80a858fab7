//! RGBA colors and the CSS color forms produced by the editor's inputs.
//!
//! Parsing is built on `winnow` and accepts `#hex`, `rgb()`, `rgba()` and
//! `transparent`.

use crate::error::DocumentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use winnow::ascii::multispace0;
use winnow::combinator::{alt, delimited, preceded, separated, terminated};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit channels.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        let short = |i: usize| hex_val(bytes[i]).map(|v| v * 17);
        let long = |i: usize| Some(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?);

        match bytes.len() {
            3 => Some(Self::from_rgba8(short(0)?, short(1)?, short(2)?, 255)),
            4 => Some(Self::from_rgba8(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Some(Self::from_rgba8(long(0)?, long(2)?, long(4)?, 255)),
            8 => Some(Self::from_rgba8(long(0)?, long(2)?, long(4)?, long(6)?)),
            _ => None,
        }
    }

    /// Emit as shortest valid hex string.
    pub fn to_hex(&self) -> String {
        let r = (self.r * 255.0).round() as u8;
        let g = (self.g * 255.0).round() as u8;
        let b = (self.b * 255.0).round() as u8;
        let a = (self.a * 255.0).round() as u8;

        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    /// Parse any supported CSS color form.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let mut rest = text.trim();
        let color = parse_color(&mut rest)
            .map_err(|_| DocumentError::InvalidColor(text.to_string()))?;
        if !rest.trim().is_empty() {
            return Err(DocumentError::InvalidColor(text.to_string()));
        }
        Ok(color)
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// Copy of this color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl FromStr for Color {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ─── Parsers ─────────────────────────────────────────────────────────────

fn parse_color(input: &mut &str) -> ModalResult<Color> {
    alt((parse_hex_color, parse_rgb_color, parse_transparent)).parse_next(input)
}

fn parse_hex_digits<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    preceded('#', take_while(1..=8, |c: char| c.is_ascii_hexdigit())).parse_next(input)
}

fn parse_hex_color(input: &mut &str) -> ModalResult<Color> {
    let digits = parse_hex_digits(input)?;
    Color::from_hex(digits).ok_or_else(|| ErrMode::Backtrack(ContextError::new()))
}

fn parse_channel(input: &mut &str) -> ModalResult<f64> {
    delimited(
        multispace0,
        take_while(1.., |c: char| c.is_ascii_digit() || c == '.').try_map(str::parse::<f64>),
        multispace0,
    )
    .parse_next(input)
}

fn parse_channel_list(input: &mut &str) -> ModalResult<Vec<f64>> {
    preceded(
        (alt(("rgba", "rgb")), multispace0, '('),
        terminated(separated(3..=4, parse_channel, ','), ')'),
    )
    .parse_next(input)
}

fn parse_rgb_color(input: &mut &str) -> ModalResult<Color> {
    let channels = parse_channel_list(input)?;
    let byte = |v: f64| v.clamp(0.0, 255.0).round() as u8;
    let alpha = channels.get(3).copied().unwrap_or(1.0).clamp(0.0, 1.0);
    Ok(Color::from_rgba8(byte(channels[0]), byte(channels[1]), byte(channels[2]), 255)
        .with_alpha(alpha as f32))
}

fn parse_transparent(input: &mut &str) -> ModalResult<Color> {
    "transparent".value(Color::TRANSPARENT).parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hex_forms() {
        assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("000000"), Some(Color::BLACK));
        assert_eq!(Color::from_hex("#FF000080").map(|c| c.to_hex()), Some("#FF000080".into()));
        assert_eq!(Color::from_hex("#12345"), None);
    }

    #[test]
    fn to_hex_drops_opaque_alpha() {
        assert_eq!(Color::from_rgba8(0x33, 0x66, 0x99, 255).to_hex(), "#336699");
    }

    #[test]
    fn parse_css_forms() {
        assert_eq!(Color::parse("#ffffff").unwrap(), Color::WHITE);
        assert_eq!(Color::parse("  rgb(255, 0, 0) ").unwrap().to_hex(), "#FF0000");
        let c = Color::parse("rgba(0,0,255,0.5)").unwrap();
        assert_eq!(c.to_hex(), "#0000FF80");
        assert!(Color::parse("transparent").unwrap().is_transparent());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            Color::parse("blurple"),
            Err(DocumentError::InvalidColor(_))
        ));
        assert!(Color::parse("#ffffff trailing").is_err());
        assert!(Color::parse("rgb(1,2)").is_err());
    }
}
