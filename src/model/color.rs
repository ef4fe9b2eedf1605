//! RGB colors as used for region fills and density lookup.
//!
//! Colors travel as `#RRGGBB` hex strings (the form a color picker produces)
//! and are compared by Euclidean distance in RGB space.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a hex color string cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid hex color '{0}': expected #RRGGBB or #RGB")]
pub struct ColorParseError(pub String);

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `#RGB` (the leading `#` is optional, case-insensitive).
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError(hex.to_string());
        let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| err());
        match digits.len() {
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                // #RGB expands each nibble: #F80 == #FF8800
                let r = channel(&digits[0..1])?;
                let g = channel(&digits[1..2])?;
                let b = channel(&digits[2..3])?;
                Ok(Self::new(r * 17, g * 17, b * 17))
            }
            _ => Err(err()),
        }
    }

    /// Format as uppercase `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Euclidean distance to another color in RGB space.
    pub fn distance_to(&self, other: &Rgb) -> f64 {
        let dr = f64::from(self.r) - f64::from(other.r);
        let dg = f64::from(self.g) - f64::from(other.g);
        let db = f64::from(self.b) - f64::from(other.b);
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_hex() {
        assert_eq!(Rgb::from_hex("#ff0000"), Ok(Rgb::new(255, 0, 0)));
        assert_eq!(Rgb::from_hex("#800080"), Ok(Rgb::new(128, 0, 128)));
        assert_eq!(Rgb::from_hex("00FF7f"), Ok(Rgb::new(0, 255, 127)));
    }

    #[test]
    fn test_parse_short_hex() {
        assert_eq!(Rgb::from_hex("#F80"), Ok(Rgb::new(255, 136, 0)));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#GGGGGG").is_err());
        assert!(Rgb::from_hex("").is_err());
        assert!(Rgb::from_hex("#ÿÿÿ").is_err());
        assert!(Rgb::from_hex("#+1+2+3").is_err());
    }

    #[test]
    fn test_hex_display() {
        let c = Rgb::new(18, 171, 255);
        assert_eq!(c.to_hex(), "#12ABFF");
        assert_eq!(c.to_string(), "#12ABFF");
        assert_eq!("#12abff".parse::<Rgb>(), Ok(c));
    }

    #[test]
    fn test_distance() {
        let black = Rgb::new(0, 0, 0);
        let white = Rgb::new(255, 255, 255);
        assert_eq!(black.distance_to(&black), 0.0);
        assert!((black.distance_to(&white) - 255.0 * 3f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Rgb::new(255, 255, 0)).unwrap();
        assert_eq!(json, "\"#FFFF00\"");
        let back: Rgb = serde_json::from_str("\"#ffff00\"").unwrap();
        assert_eq!(back, Rgb::new(255, 255, 0));
        assert!(serde_json::from_str::<Rgb>("\"yellow\"").is_err());
    }
}
