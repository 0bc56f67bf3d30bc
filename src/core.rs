use crate::error::{LedfxError, LedfxResult};

/// Absolute monotonic timestamp in nanoseconds. All animation motion is
/// derived from this value, never from tick counts, so skipped or delayed
/// frames do not change speeds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nanos(pub u64);

impl Nanos {
    pub fn from_millis(ms: u64) -> Self {
        Self(ms.saturating_mul(1_000_000))
    }

    pub fn as_millis(self) -> u64 {
        self.0 / 1_000_000
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

/// The full logical pixel grid spanning all tiled panels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> LedfxResult<Self> {
        if width == 0 || height == 0 {
            return Err(LedfxError::validation("canvas dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn led_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// One LED's color, 8 bits per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn is_black(self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }

    /// Saturating per-channel add, used when overlapping features land on
    /// the same cell in one frame.
    pub fn saturating_add(self, other: Self) -> Self {
        Self {
            r: self.r.saturating_add(other.r),
            g: self.g.saturating_add(other.g),
            b: self.b.saturating_add(other.b),
        }
    }

    /// Scale every channel by `factor` in [0, 1].
    pub fn scaled(self, factor: f64) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self {
            r: (f64::from(self.r) * f).round() as u8,
            g: (f64::from(self.g) * f).round() as u8,
            b: (f64::from(self.b) * f).round() as u8,
        }
    }
}
