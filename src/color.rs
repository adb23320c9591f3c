use eyre::eyre;
use eyre::Result;
use palette::{encoding, FromColor, Hsv, Srgb};
use serde::Deserialize;

pub type Rgb8 = Srgb<u8>;

pub const BLACK: Rgb8 = Srgb::new(0, 0, 0);

/// Hue, saturation and value in 8 bits each. Hue wraps around at 256.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hsv8 {
    pub hue: u8,
    pub saturation: u8,
    pub value: u8,
}

impl Hsv8 {
    pub const fn new(hue: u8, saturation: u8, value: u8) -> Hsv8 {
        Hsv8 {
            hue,
            saturation,
            value,
        }
    }

    pub fn to_rgb(self) -> Rgb8 {
        let hsv = Hsv::<encoding::Srgb, f32>::new(
            self.hue as f32 * 360.0 / 256.0,
            self.saturation as f32 / 255.0,
            self.value as f32 / 255.0,
        );
        let rgb: Srgb<f32> = Srgb::from_color(hsv);
        rgb.into_format()
    }

    /// Recovers an approximate HSV value from a rendered pixel. Quantization to
    /// 8 bit channels makes this lossy: hue is only reliable to about ±2 steps,
    /// and not at all for greys.
    pub fn from_rgb_approximate(rgb: Rgb8) -> Hsv8 {
        let hsv = Hsv::<encoding::Srgb, f32>::from_color(rgb.into_format::<f32>());
        let hue = (hsv.hue.into_positive_degrees() * 256.0 / 360.0).round() as u32 % 256;

        Hsv8 {
            hue: hue as u8,
            saturation: unit_to_u8(hsv.saturation),
            value: unit_to_u8(hsv.value),
        }
    }
}

impl From<Hsv8> for Rgb8 {
    fn from(hsv: Hsv8) -> Self {
        hsv.to_rgb()
    }
}

fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Scales `i` by `scale / 256`, where a scale of 255 leaves `i` untouched.
pub fn scale8(i: u8, scale: u8) -> u8 {
    ((i as u16 * (1 + scale as u16)) >> 8) as u8
}

pub fn scale_rgb(color: Rgb8, scale: u8) -> Rgb8 {
    Srgb::new(
        scale8(color.red, scale),
        scale8(color.green, scale),
        scale8(color.blue, scale),
    )
}

/// Dims `color` by `amount` / 256. 0 keeps the color, 255 is almost black.
pub fn fade_to_black_by(color: Rgb8, amount: u8) -> Rgb8 {
    scale_rgb(color, 255 - amount)
}

/// Hue index `steps * delta` positions away from `base`, wrapped into 0..=255.
pub fn hue_offset(base: i64, steps: i64, delta: i64) -> u8 {
    (base + steps * delta).rem_euclid(256) as u8
}

/// Circular distance between two hues.
pub fn hue_distance(a: u8, b: u8) -> u8 {
    let d = a.wrapping_sub(b);
    d.min(d.wrapping_neg())
}

/// Per-channel white point adjustment applied when a frame is shown.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColorCorrection {
    None,
    #[default]
    TypicalLedStrip,
}

impl ColorCorrection {
    fn factors(self) -> [u8; 3] {
        match self {
            ColorCorrection::None => [255, 255, 255],
            ColorCorrection::TypicalLedStrip => [255, 176, 240],
        }
    }

    /// Applies global brightness and correction to a single pixel.
    pub fn apply(self, color: Rgb8, brightness: u8) -> Rgb8 {
        let [r, g, b] = self.factors().map(|f| scale8(f, brightness));
        Srgb::new(
            scale8(color.red, r),
            scale8(color.green, g),
            scale8(color.blue, b),
        )
    }
}

/// Parses a CSS color name ("red") or a hex triplet ("#ff0000", "f00").
pub fn parse_color(s: &str) -> Result<Rgb8> {
    let s = s.trim();
    if let Some(color) = palette::named::from_str(&s.to_lowercase()) {
        return Ok(color);
    }

    s.parse::<Rgb8>()
        .map_err(|err| eyre!("Unknown color {:?}: {}", s, err))
}
