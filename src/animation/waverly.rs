use crate::animation::Animation;
use crate::audio::{SpectrumFeed, SpectrumSource};
use crate::buffer::PixelBuffer;
use crate::color::rainbow;
use crate::core::{Nanos, Rgb8};
use crate::math::inoise8_3d;

// Loudness shaping tuned against a typical room microphone; calibration
// knobs, not invariants.
const AMPLIFICATION: f64 = 3.5;
const ATTACK_KEEP: f64 = 0.70;
const DECAY_KEEP: f64 = 0.85;
const SILENCE_FLOOR: f64 = 3.0;
const HEIGHT_MULTIPLIER: f64 = 3.5;
const MIN_BRIGHTNESS: f64 = 180.0;

/// Mirrored noise columns: per-column Perlin height, rainbow ramp along the
/// column, mirrored about the canvas center. Loudness drives column height,
/// brightness, and blur; silence goes fully dark.
pub struct Waverly {
    width: i32,
    height: i32,
    buffer: PixelBuffer,
    feed: SpectrumFeed,
    smoothed_level: f64,
}

impl Waverly {
    pub fn new(spectrum: Option<Box<dyn SpectrumSource>>) -> Self {
        Self {
            width: 0,
            height: 0,
            buffer: PixelBuffer::new(0, 0),
            feed: SpectrumFeed::new(spectrum),
            smoothed_level: 0.0,
        }
    }

    fn absorb_level(&mut self) {
        let incoming = (f64::from(self.feed.level()) * AMPLIFICATION).clamp(0.0, 255.0);
        if incoming > self.smoothed_level {
            self.smoothed_level = self.smoothed_level * ATTACK_KEEP + incoming * (1.0 - ATTACK_KEEP);
        } else {
            self.smoothed_level *= DECAY_KEEP;
        }
        if self.smoothed_level < SILENCE_FLOOR {
            self.smoothed_level = 0.0;
        }
    }
}

impl Animation for Waverly {
    fn name(&self) -> &'static str {
        "Waverly"
    }

    fn is_audio_reactive(&self) -> bool {
        true
    }

    fn init(&mut self, width: u32, height: u32) {
        self.width = width as i32;
        self.height = height as i32;
        self.buffer = PixelBuffer::new(width as usize, height as usize);
        self.smoothed_level = 0.0;
    }

    fn update(&mut self, now: Nanos) -> bool {
        let t = now.as_millis() as f64 / 2.0;
        self.buffer.clear();

        self.feed.refresh(now);
        self.absorb_level();

        let level = self.smoothed_level.clamp(0.0, 255.0);
        if level <= 0.0 {
            return true;
        }

        let level_factor = level / 255.0;
        let height_multiplier = level_factor * HEIGHT_MULTIPLIER;
        let brightness_base = level_factor * 255.0;
        let brightness = (MIN_BRIGHTNESS + (brightness_base - MIN_BRIGHTNESS) * 0.3)
            .clamp(MIN_BRIGHTNESS, 255.0) as u8;
        let blur_amount = (level_factor * 127.0).round().clamp(0.0, 127.0) as u8;

        for i in 0..self.width {
            let noise = inoise8_3d(f64::from(i) * 45.0, t, t * 0.6);
            let base_height = f64::from(noise) / 255.0 * f64::from(self.height);
            let this_max =
                ((base_height * height_multiplier).round() as i32).clamp(0, self.height);
            if this_max <= 0 {
                continue;
            }

            for j in 0..this_max {
                let palette_index =
                    (250.0 - f64::from(j) / f64::from(this_max) * 250.0).round() as u8;
                let color = rainbow(palette_index, brightness);
                self.buffer.add(i, j, color);
                self.buffer
                    .add(self.width - 1 - i, self.height - 1 - j, color);
            }
        }

        self.buffer.blur(blur_amount);
        true
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb8 {
        self.buffer.get(x as i32, y as i32)
    }
}
