use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, fmt};

/// Clamp a channel into `0.0..=1.0`, mapping NaN to `0.0`.
#[inline]
pub fn clamp01(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Clamp a hue into `0.0..1.0`. A full turn (1.0 and above) is stored as 0.0.
#[inline]
fn wrap_hue(hue: f32) -> f32 {
    let hue = clamp01(hue);
    if hue >= 1.0 { 0.0 } else { hue }
}

/// A HSV color, hue in `0.0..1.0`, saturation and value in `0.0..=1.0`.
///
/// The fields are private so a stored value is always in range, use
/// [`Hsv::new`] to build one from arbitrary input. Deserializing goes through
/// [`Hsv::new`] as well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawHsv")]
pub struct Hsv {
    /// Hue (0.0 to 1.0, exclusive)
    h: f32,
    /// Saturation (0.0 to 1.0)
    s: f32,
    /// Value / brightness (0.0 to 1.0)
    v: f32,
}

impl Default for Hsv {
    fn default() -> Self {
        Self::new(0.0, 0.5, 0.5)
    }
}

impl Hsv {
    /// Create a HSV color, clamping each channel into its range.
    pub fn new(h: f32, s: f32, v: f32) -> Self {
        Self {
            h: wrap_hue(h),
            s: clamp01(s),
            v: clamp01(v),
        }
    }

    pub fn hue(&self) -> f32 {
        self.h
    }

    pub fn saturation(&self) -> f32 {
        self.s
    }

    pub fn value(&self) -> f32 {
        self.v
    }

    /// Return a copy with a different hue, keeping saturation and value.
    pub fn with_hue(self, h: f32) -> Self {
        Self::new(h, self.s, self.v)
    }

    /// Return a copy with different saturation and value, keeping the hue.
    pub fn with_saturation_value(self, s: f32, v: f32) -> Self {
        Self::new(self.h, s, v)
    }

    pub fn to_rgb(&self) -> Rgb {
        hsv_to_rgb(self.h, self.s, self.v)
    }
}

/// The serialized shape of [`Hsv`], accepted as is and clamped on conversion.
#[derive(Deserialize, JsonSchema)]
#[serde(default)]
struct RawHsv {
    /// Hue (0.0 to 1.0), 1.0 is the same angle as 0.0
    h: f32,
    /// Saturation (0.0 to 1.0)
    s: f32,
    /// Value / brightness (0.0 to 1.0)
    v: f32,
}

impl Default for RawHsv {
    fn default() -> Self {
        let hsv = Hsv::default();
        Self {
            h: hsv.h,
            s: hsv.s,
            v: hsv.v,
        }
    }
}

impl From<RawHsv> for Hsv {
    fn from(raw: RawHsv) -> Self {
        Hsv::new(raw.h, raw.s, raw.v)
    }
}

impl JsonSchema for Hsv {
    fn schema_name() -> Cow<'static, str> {
        "Hsv".into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        RawHsv::json_schema(generator)
    }
}

/// A RGB color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Convert to 8-bit channels, rounding to the nearest step.
    pub fn to_rgb8(&self) -> [u8; 3] {
        [
            (clamp01(self.r) * 255.0).round() as u8,
            (clamp01(self.g) * 255.0).round() as u8,
            (clamp01(self.b) * 255.0).round() as u8,
        ]
    }

    /// Format as `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }

    /// Largest per-channel difference, handy for approximate comparisons.
    pub fn max_difference(&self, other: &Rgb) -> f32 {
        (self.r - other.r)
            .abs()
            .max((self.g - other.g).abs())
            .max((self.b - other.b).abs())
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Convert HSV to RGB.
///
/// - h: Hue (0.0 to 1.0), wraps so that 1.0 equals 0.0
/// - s: Saturation (0.0 to 1.0)
/// - v: Value (0.0 to 1.0)
///
/// Inputs are clamped first, so this never produces out-of-range channels.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb {
    let (h, s, v) = (clamp01(h), clamp01(s), clamp01(v));
    if s == 0.0 {
        return Rgb::new(v, v, v);
    }

    let h6 = (h * 6.0) % 6.0;
    let sector = h6.floor();
    let f = h6 - sector;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match sector as u8 {
        0 => Rgb::new(v, t, p),
        1 => Rgb::new(q, v, p),
        2 => Rgb::new(p, v, t),
        3 => Rgb::new(p, q, v),
        4 => Rgb::new(t, p, v),
        _ => Rgb::new(v, p, q),
    }
}
