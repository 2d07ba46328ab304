//! Color values for the drawing surface.
//!
//! The settings store hands the border color over as a CSS-style `#RRGGBB`
//! string; the drawing surface wants normalized channels. This module is the
//! only place that conversion happens.

use thiserror::Error;

/// RGB triple with each channel normalized to the `0.0..=1.0` range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("expected a 7-character #RRGGBB color, got {0:?}")]
    BadFormat(String),
    #[error("invalid hex digits in color {0:?}")]
    BadHexDigits(String),
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Parse a `#RRGGBB` string into normalized channels.
    pub fn parse_hex(hex: &str) -> Result<Rgb, ColorParseError> {
        if hex.len() != 7 || !hex.is_ascii() || !hex.starts_with('#') {
            return Err(ColorParseError::BadFormat(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| f64::from(v) / 255.0)
                .map_err(|_| ColorParseError::BadHexDigits(hex.to_string()))
        };
        Ok(Rgb {
            r: channel(1..3)?,
            g: channel(3..5)?,
            b: channel(5..7)?,
        })
    }
}
