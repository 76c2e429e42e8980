mod css;
mod namer;
mod reference;

pub use namer::{ ColorDescription, ColorNamer };
pub use reference::ReferenceColor;

use std::{ fmt, str::FromStr };

use crate::error::{ Error, ErrorKind };

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uppercase `#RRGGBB`.
    pub fn hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Squared euclidean distance in RGB space.
    pub fn distance_sq(self, other: Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;

        (dr * dr + dg * dg + db * db) as u32
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(Error::with_message(ErrorKind::ParseHex, format!("could not parse hex color `{}`", s)));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|err| Error::from(ErrorKind::ParseHex, err))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_pads_and_uppercases() {
        assert_eq!(Rgb::new(10, 11, 12).hex(), "#0A0B0C");
        assert_eq!(Rgb::new(255, 165, 0).hex(), "#FFA500");
        assert_eq!(Rgb::new(0, 0, 0).to_string(), "#000000");
    }

    #[test]
    fn parses_either_case_with_or_without_hash() {
        assert_eq!("#8b4513".parse::<Rgb>().unwrap(), Rgb::new(139, 69, 19));
        assert_eq!("FFFF00".parse::<Rgb>().unwrap(), Rgb::new(255, 255, 0));
    }

    #[test]
    fn rejects_bad_hex() {
        for bad in ["#FFF", "#GG0000", "#FF00001", "", "#ÿÿÿ"] {
            let err = bad.parse::<Rgb>().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ParseHex, "{}", bad);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Rgb::new(255, 0, 0);
        let b = Rgb::new(0, 0, 255);
        assert_eq!(a.distance_sq(b), b.distance_sq(a));
        assert_eq!(a.distance_sq(b), 2 * 255 * 255);
        assert_eq!(a.distance_sq(a), 0);
    }
}
