//! Conversions between the color representations found in adapter settings.
//!
//! Color pickers hand back channel objects, older configs store `rgb(...)`
//! text and the adapter itself expects `#rrggbb`. Every conversion here is
//! total: input that cannot be parsed comes back unchanged.

use serde_json::{Map, Value};

/// Channel triple with an optional alpha component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: Option<f64>,
}

impl Rgb {
    /// Build an opaque channel triple.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: None }
    }

    fn from_object(map: &Map<String, Value>) -> Option<Self> {
        // Color picker change payloads wrap the channels under `rgb`.
        if let Some(inner) = map.get("rgb").and_then(Value::as_object) {
            return Self::from_object(inner);
        }

        Some(Self {
            r: channel_from_number(map.get("r")?)?,
            g: channel_from_number(map.get("g")?)?,
            b: channel_from_number(map.get("b")?)?,
            a: map.get("a").and_then(Value::as_f64),
        })
    }
}

/// A color as it may appear in a settings object.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorValue {
    /// `#rrggbb` text (not necessarily canonical until converted).
    Hex(String),
    /// `rgb(r,g,b)` or `rgba(r,g,b,a)` text.
    RgbText(String),
    /// Channel object produced by color pickers.
    Structured(Rgb),
}

impl ColorValue {
    /// Classify a JSON value, returning `None` when it is not a color.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) if text.starts_with('#') => {
                Some(Self::Hex(text.clone()))
            },
            Value::String(text) if has_rgb_prefix(text.trim_start()) => {
                Some(Self::RgbText(text.clone()))
            },
            Value::Object(map) => Rgb::from_object(map).map(Self::Structured),
            _ => None,
        }
    }

    /// Convert back into the JSON shape stored in settings.
    pub fn into_value(self) -> Value {
        match self {
            Self::Hex(text) | Self::RgbText(text) => Value::String(text),
            Self::Structured(rgb) => {
                let mut map = Map::new();
                map.insert(String::from("r"), Value::from(rgb.r));
                map.insert(String::from("g"), Value::from(rgb.g));
                map.insert(String::from("b"), Value::from(rgb.b));
                if let Some(alpha) = rgb.a {
                    map.insert(String::from("a"), Value::from(alpha));
                }
                Value::Object(map)
            },
        }
    }

    /// Return the canonical `#rrggbb` form, or `self` unchanged when the
    /// value cannot be parsed.
    pub fn to_hex(&self) -> Self {
        let converted = match self {
            Self::Hex(text) => canonical_hex(text),
            Self::RgbText(text) => parse_rgb_text(text).map(format_hex),
            Self::Structured(rgb) => Some(format_hex(*rgb)),
        };
        converted.map_or_else(|| self.clone(), Self::Hex)
    }

    /// Return the `rgb(r,g,b)` form of a structured value; other variants
    /// are returned unchanged.
    pub fn to_rgb_text(&self) -> Self {
        match self {
            Self::Structured(rgb) => Self::RgbText(to_rgb_text(rgb)),
            other => other.clone(),
        }
    }
}

/// Format channels as `rgb(r,g,b)`.
pub fn to_rgb_text(rgb: &Rgb) -> String {
    format!("rgb({},{},{})", rgb.r, rgb.g, rgb.b)
}

/// Return whether `value` is a canonical lower-case `#rrggbb` string.
pub fn is_canonical_hex(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    digits.len() == 6
        && digits
            .bytes()
            .all(|ch| ch.is_ascii_digit() || (b'a'..=b'f').contains(&ch))
}

/// Parse `rgb(r, g, b)` / `rgba(r, g, b, a)` text.
///
/// Whitespace around tokens is ignored, the alpha component and anything
/// after the closing parenthesis are dropped, and channels clamp to 255.
pub fn parse_rgb_text(text: &str) -> Option<Rgb> {
    let text = text.trim_start();
    if !has_rgb_prefix(text) {
        return None;
    }
    let rest = &text[3..];
    let rest = rest
        .strip_prefix('a')
        .or_else(|| rest.strip_prefix('A'))
        .unwrap_or(rest);
    let body = rest.trim_start().strip_prefix('(')?;
    let body = body.split(')').next().unwrap_or(body);

    let mut parts = body.split(',');
    let r = parse_channel(parts.next()?)?;
    let g = parse_channel(parts.next()?)?;
    let b = parse_channel(parts.next()?)?;
    Some(Rgb::new(r, g, b))
}

fn format_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
}

fn canonical_hex(text: &str) -> Option<String> {
    let digits = text.strip_prefix('#')?;
    if !digits.bytes().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }

    match digits.len() {
        6 => Some(format!("#{}", digits.to_ascii_lowercase())),
        3 => {
            let mut out = String::with_capacity(7);
            out.push('#');
            for ch in digits.chars().map(|ch| ch.to_ascii_lowercase()) {
                out.push(ch);
                out.push(ch);
            }
            Some(out)
        },
        _ => None,
    }
}

fn has_rgb_prefix(text: &str) -> bool {
    text.get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("rgb"))
}

fn parse_channel(token: &str) -> Option<u8> {
    let token = token.trim();
    if token.is_empty() || !token.bytes().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    // Digit runs too long for u32 are still "above 255".
    let value = token.parse::<u32>().unwrap_or(u32::MAX).min(255);
    u8::try_from(value).ok()
}

fn channel_from_number(value: &Value) -> Option<u8> {
    let value = value.as_f64()?;
    Some(value.round().clamp(0.0, 255.0) as u8)
}
