use crate::animation::Animation;
use crate::core::{Nanos, Rgb8};
use crate::math::{beatsin8, cos8};

const DEFAULT_SPEED: u16 = 128;
const DEFAULT_SCALE: u16 = 64;

/// Analytic distortion field: every pixel's color is a closed-form function
/// of (x, y, time) — nested cosine waves plus squared distances to three
/// oscillator-driven centers. No per-cell state at all.
pub struct DistortionWaves {
    width: i32,
    height: i32,
    start: Option<Nanos>,
    elapsed_ms: u64,
}

impl DistortionWaves {
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            start: None,
            elapsed_ms: 0,
        }
    }
}

impl Default for DistortionWaves {
    fn default() -> Self {
        Self::new()
    }
}

impl Animation for DistortionWaves {
    fn name(&self) -> &'static str {
        "Distortion Waves"
    }

    fn init(&mut self, width: u32, height: u32) {
        self.width = width as i32;
        self.height = height as i32;
        self.start = None;
        self.elapsed_ms = 0;
    }

    fn update(&mut self, now: Nanos) -> bool {
        let start = *self.start.get_or_insert(now);
        self.elapsed_ms = now.saturating_sub(start).as_millis();
        true
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb8 {
        let x = x as i32;
        let y = y as i32;
        let t = self.elapsed_ms;
        let speed = i64::from(DEFAULT_SPEED / 32);
        let scale = i32::from(DEFAULT_SCALE / 32);

        let a = (t / 32) as i64;
        let a2 = a / 2;
        let a3 = a / 3;

        let cols_scaled = self.width * scale;
        let rows_scaled = self.height * scale;

        let cx = beatsin8((10 - speed) as u16, 0, cols_scaled, t, 0);
        let cy = beatsin8((12 - speed) as u16, 0, rows_scaled, t, 0);
        let cx1 = beatsin8((13 - speed) as u16, 0, cols_scaled, t, 0);
        let cy1 = beatsin8((15 - speed) as u16, 0, rows_scaled, t, 0);
        let cx2 = beatsin8((17 - speed) as u16, 0, cols_scaled, t, 0);
        let cy2 = beatsin8((14 - speed) as u16, 0, rows_scaled, t, 0);

        let xoffs = x * scale;
        let yoffs = y * scale;

        let term_r = (i64::from(cos8((((x << 3) as i64 + a) & 255) as u8))
            + i64::from(cos8((((y << 3) as i64 - a2) & 255) as u8))
            + a3)
            & 255;
        let term_g = (i64::from(cos8((((x << 3) as i64 - a2) & 255) as u8))
            + i64::from(cos8((((y << 3) as i64 + a3) & 255) as u8))
            + a
            + 32)
            & 255;
        let term_b = (i64::from(cos8((((x << 3) as i64 + a3) & 255) as u8))
            + i64::from(cos8((((y << 3) as i64 - a) & 255) as u8))
            + a2
            + 64)
            & 255;

        let rdistort = i64::from(cos8(term_r as u8) >> 1);
        let gdistort = i64::from(cos8(term_g as u8) >> 1);
        let bdistort = i64::from(cos8(term_b as u8) >> 1);

        let dist_r = i64::from(((xoffs - cx).pow(2) + (yoffs - cy).pow(2)) >> 7);
        let dist_g = i64::from(((xoffs - cx1).pow(2) + (yoffs - cy1).pow(2)) >> 7);
        let dist_b = i64::from(((xoffs - cx2).pow(2) + (yoffs - cy2).pow(2)) >> 7);

        let value_r = rdistort + ((a - dist_r) << 1);
        let value_g = gdistort + ((a2 - dist_g) << 1);
        let value_b = bdistort + ((a3 - dist_b) << 1);

        Rgb8::new(
            cos8((value_r & 255) as u8),
            cos8((value_g & 255) as u8),
            cos8((value_b & 255) as u8),
        )
    }
}
