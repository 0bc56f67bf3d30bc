use crate::animation::Animation;
use crate::audio::{SpectrumFeed, SpectrumSource};
use crate::color::{HEAT_PALETTE, gradient_lookup};
use crate::core::{Nanos, Rgb8};
use crate::math::{cos8f, sin8f};

const ENERGY_BASE: f64 = 0.4;
const ENERGY_RANGE: f64 = 1.2;
const HEAT_BOOST_RANGE: f64 = 90.0;
const LEVEL_KEEP: f64 = 0.85;

/// Interfering sine and cosine waves sampled through the heat palette.
/// Every pixel is a pure function of position, elapsed time, and the
/// smoothed loudness, so no frame buffer is kept. Loudness speeds the
/// waves up and pushes the palette toward the hot end.
pub struct WavingCell {
    elapsed_ms: u64,
    start: Option<Nanos>,
    feed: SpectrumFeed,
    smoothed_level: f64,
}

impl WavingCell {
    pub fn new(spectrum: Option<Box<dyn SpectrumSource>>) -> Self {
        Self {
            elapsed_ms: 0,
            start: None,
            feed: SpectrumFeed::new(spectrum),
            smoothed_level: 0.0,
        }
    }
}

fn brighten(color: Rgb8, factor: f64) -> Rgb8 {
    let scale = |c: u8| (f64::from(c) * factor).round().clamp(0.0, 255.0) as u8;
    Rgb8::new(scale(color.r), scale(color.g), scale(color.b))
}

impl Animation for WavingCell {
    fn name(&self) -> &'static str {
        "Waving Cell"
    }

    fn is_audio_reactive(&self) -> bool {
        true
    }

    fn init(&mut self, _width: u32, _height: u32) {
        self.elapsed_ms = 0;
        self.start = None;
        self.smoothed_level = 0.0;
    }

    fn update(&mut self, now: Nanos) -> bool {
        let start = *self.start.get_or_insert(now);
        self.elapsed_ms = now.saturating_sub(start).as_millis();

        self.feed.refresh(now);
        self.smoothed_level = self.smoothed_level * LEVEL_KEEP
            + f64::from(self.feed.level()) * (1.0 - LEVEL_KEEP);
        true
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb8 {
        let t = self.elapsed_ms as f64 / 100.0;
        let level_factor = (self.smoothed_level / 255.0).clamp(0.0, 1.0);
        let energy = ENERGY_BASE + level_factor * ENERGY_RANGE;
        let heat_boost = level_factor * HEAT_BOOST_RANGE;

        let xf = f64::from(x);
        let yf = f64::from(y);

        let inner = sin8f(yf * 5.0 + t * 5.0 * energy);
        let wave = sin8f(xf * 10.0 + inner * energy);
        let vertical = cos8f(yf * 10.0 * energy);

        let index = (wave * energy + vertical * (0.7 + energy * 0.3) + t + heat_boost)
            .rem_euclid(256.0) as u8;
        let color = gradient_lookup(&HEAT_PALETTE, index);

        let brightness = (0.6 + level_factor * 0.8).clamp(0.6, 1.4);
        brighten(color, brightness)
    }
}
