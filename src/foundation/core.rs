use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{AspectFitError, AspectFitResult};

// Serde for string tokens goes through `FromStr` and `Display`.
macro_rules! string_tokens {
    ($ty:ty) => {
        impl TryFrom<String> for $ty {
            type Error = AspectFitError;

            fn try_from(s: String) -> AspectFitResult<Self> {
                s.parse()
            }
        }

        impl From<$ty> for String {
            fn from(v: $ty) -> Self {
                v.to_string()
            }
        }
    };
}

/// Width × height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Return `true` when either side is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Dimensions of the rect.
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether this rect covers the whole `size` canvas (no actual crop).
    pub fn is_full(self, size: Size) -> bool {
        self.x == 0 && self.y == 0 && self.width == size.width && self.height == size.height
    }
}

/// An image axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Which side of the source stays fixed while the other is derived from the ratio.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum KeepAxis {
    Width,
    #[default]
    Height,
}

impl FromStr for KeepAxis {
    type Err = AspectFitError;

    fn from_str(s: &str) -> AspectFitResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "width" => Ok(Self::Width),
            "height" => Ok(Self::Height),
            other => Err(AspectFitError::invalid_argument(format!(
                "keep axis '{other}' (expected width|height)"
            ))),
        }
    }
}

impl fmt::Display for KeepAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Width => "width",
            Self::Height => "height",
        })
    }
}

string_tokens!(KeepAxis);

/// Anchor used to place a crop window or a padded image.
///
/// `Top`/`Bottom` only move the vertical axis and `Left`/`Right` only the
/// horizontal one; the unaffected axis always centers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Gravity {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

impl FromStr for Gravity {
    type Err = AspectFitError;

    fn from_str(s: &str) -> AspectFitResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "center" => Ok(Self::Center),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(AspectFitError::invalid_argument(format!(
                "gravity '{other}' (expected center|top|bottom|left|right)"
            ))),
        }
    }
}

impl fmt::Display for Gravity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Center => "center",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

string_tokens!(Gravity);

/// Target `width / height` ratio. Always positive and finite.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RatioRepr", into = "f64")]
pub struct AspectRatio(f64);

impl AspectRatio {
    pub fn new(value: f64) -> AspectFitResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(AspectFitError::invalid_argument(format!(
                "aspect ratio must be a positive finite number, got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Ratio from two positive sides, e.g. `from_sides(16.0, 9.0)`.
    pub fn from_sides(width: f64, height: f64) -> AspectFitResult<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(AspectFitError::invalid_argument(format!(
                "aspect sides must be > 0, got {width}:{height}"
            )));
        }
        Self::new(width / height)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl FromStr for AspectRatio {
    type Err = AspectFitError;

    /// Accepts `"W:H"` or a decimal such as `"1.777"`.
    fn from_str(s: &str) -> AspectFitResult<Self> {
        let s = s.trim();
        let number = |part: &str| {
            part.trim().parse::<f64>().map_err(|_| {
                AspectFitError::invalid_argument(format!("aspect ratio '{s}' is not a number"))
            })
        };
        match s.split_once(':') {
            Some((w, h)) => Self::from_sides(number(w)?, number(h)?),
            None => Self::new(number(s)?),
        }
    }
}

impl From<AspectRatio> for f64 {
    fn from(r: AspectRatio) -> Self {
        r.0
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RatioRepr {
    Number(f64),
    Text(String),
}

impl TryFrom<RatioRepr> for AspectRatio {
    type Error = AspectFitError;

    fn try_from(repr: RatioRepr) -> AspectFitResult<Self> {
        match repr {
            RatioRepr::Number(v) => Self::new(v),
            RatioRepr::Text(s) => s.parse(),
        }
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully transparent black, the default pad color.
    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn to_pixel(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

impl FromStr for Rgba8 {
    type Err = AspectFitError;

    /// Accepts `R,G,B`, `R,G,B,A`, `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
    /// and the names `transparent`, `black`, `white`.
    fn from_str(s: &str) -> AspectFitResult<Self> {
        let s = s.trim();
        let bad = || AspectFitError::invalid_argument(format!("color '{s}' (expected R,G,B[,A])"));

        if s.contains(',') {
            let channels = s
                .split(',')
                .map(|c| c.trim().parse::<u8>().map_err(|_| bad()))
                .collect::<AspectFitResult<Vec<u8>>>()?;
            return match channels[..] {
                [r, g, b] => Ok(Self::new(r, g, b, 255)),
                [r, g, b, a] => Ok(Self::new(r, g, b, a)),
                _ => Err(bad()),
            };
        }

        match s.to_ascii_lowercase().as_str() {
            "transparent" => return Ok(Self::transparent()),
            "black" => return Ok(Self::black()),
            "white" => return Ok(Self::white()),
            _ => {}
        }

        parse_hex(s.strip_prefix('#').unwrap_or(s)).ok_or_else(bad)
    }
}

fn parse_hex(hex: &str) -> Option<Rgba8> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let digits: Vec<u8> = hex
        .bytes()
        .map(|b| (b as char).to_digit(16).map(|d| d as u8))
        .collect::<Option<_>>()?;
    let channels: Vec<u8> = match digits.len() {
        // One nibble per channel: 'f' -> 0xFF.
        3 | 4 => digits.iter().map(|n| n << 4 | n).collect(),
        6 | 8 => digits.chunks_exact(2).map(|p| p[0] << 4 | p[1]).collect(),
        _ => return None,
    };
    match channels[..] {
        [r, g, b] => Some(Rgba8::new(r, g, b, 255)),
        [r, g, b, a] => Some(Rgba8::new(r, g, b, a)),
        _ => None,
    }
}

string_tokens!(Rgba8);

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_parses_colon_and_decimal() {
        let r: AspectRatio = "16:9".parse().unwrap();
        assert!((r.value() - 16.0 / 9.0).abs() < 1e-12);

        let r: AspectRatio = " 1.5 ".parse().unwrap();
        assert_eq!(r.value(), 1.5);
    }

    #[test]
    fn aspect_ratio_rejects_non_positive_and_garbage() {
        for bad in ["-1", "0", "0:9", "16:0", "16:-9", "abc", "16:x", "inf", "NaN", ""] {
            let err = bad.parse::<AspectRatio>().unwrap_err();
            assert!(
                matches!(err, AspectFitError::InvalidArgument(_)),
                "{bad}: {err}"
            );
        }
        assert!(AspectRatio::new(-1.0).is_err());
    }

    #[test]
    fn aspect_ratio_deserializes_from_string_or_number() {
        let r: AspectRatio = serde_json::from_str("\"4:5\"").unwrap();
        assert_eq!(r.value(), 0.8);
        let r: AspectRatio = serde_json::from_str("2.0").unwrap();
        assert_eq!(r.value(), 2.0);
        assert!(serde_json::from_str::<AspectRatio>("-2.0").is_err());
    }

    #[test]
    fn color_parses_triplets_quads_hex_and_names() {
        assert_eq!("0,0,0".parse::<Rgba8>().unwrap(), Rgba8::black());
        assert_eq!(
            "10, 20, 30, 40".parse::<Rgba8>().unwrap(),
            Rgba8::new(10, 20, 30, 40)
        );
        assert_eq!("#fff".parse::<Rgba8>().unwrap(), Rgba8::white());
        assert_eq!(
            "#11223344".parse::<Rgba8>().unwrap(),
            Rgba8::new(0x11, 0x22, 0x33, 0x44)
        );
        assert_eq!(
            "Transparent".parse::<Rgba8>().unwrap(),
            Rgba8::transparent()
        );
    }

    #[test]
    fn color_rejects_wrong_arity_and_range() {
        for bad in ["1,2", "1,2,3,4,5", "256,0,0", "a,b,c", "#12345", "purple"] {
            assert!(bad.parse::<Rgba8>().is_err(), "{bad}");
        }
    }

    #[test]
    fn tokens_deserialize_case_insensitively_and_serialize_lowercase() {
        let g: Gravity = serde_json::from_str("\"Top\"").unwrap();
        assert_eq!(g, Gravity::Top);
        let k: KeepAxis = serde_json::from_str("\"WIDTH\"").unwrap();
        assert_eq!(k, KeepAxis::Width);
        assert_eq!(serde_json::to_string(&Gravity::Bottom).unwrap(), "\"bottom\"");
        assert!(serde_json::from_str::<Gravity>("\"middle\"").is_err());
    }

    #[test]
    fn tokens_are_case_insensitive_and_unknown_is_invalid_argument() {
        assert_eq!("LEFT".parse::<Gravity>().unwrap(), Gravity::Left);
        assert_eq!("Width".parse::<KeepAxis>().unwrap(), KeepAxis::Width);
        assert!(matches!(
            "middle".parse::<Gravity>(),
            Err(AspectFitError::InvalidArgument(_))
        ));
        assert!(matches!(
            "depth".parse::<KeepAxis>(),
            Err(AspectFitError::InvalidArgument(_))
        ));
    }
}
