use crate::animation::Animation;
use crate::audio::{SpectrumFeed, SpectrumSource};
use crate::buffer::PixelBuffer;
use crate::color::rainbow;
use crate::core::{Nanos, Rgb8};
use crate::math::map_range;

const BANDS: i32 = 16;
const PEAK_COLOR: Rgb8 = Rgb8::WHITE;
// Empirically tuned against the receiving panels; calibration knobs, not
// invariants.
const NOISE_FLOOR: i32 = 50;
const MAX_BAND_VALUE: i32 = 255;
const DEFAULT_SPEED: i32 = 128;
const DEFAULT_INTENSITY: i32 = 128;

/// Graphic equalizer: one column of bars per canvas column, band energies
/// mapped linearly into rows, with white peak-hold markers that rise
/// immediately and ripple down one row per tick interval.
pub struct Geq {
    width: i32,
    height: i32,
    buffer: PixelBuffer,
    feed: SpectrumFeed,
    previous_bar_height: Vec<i32>,
    last_ripple: Option<Nanos>,
    frame_count: u64,
}

impl Geq {
    pub fn new(spectrum: Option<Box<dyn SpectrumSource>>) -> Self {
        Self {
            width: 0,
            height: 0,
            buffer: PixelBuffer::new(0, 0),
            feed: SpectrumFeed::new(spectrum),
            previous_bar_height: Vec::new(),
            last_ripple: None,
            frame_count: 0,
        }
    }
}

impl Animation for Geq {
    fn name(&self) -> &'static str {
        "GEQ"
    }

    fn is_audio_reactive(&self) -> bool {
        true
    }

    fn init(&mut self, width: u32, height: u32) {
        self.width = width as i32;
        self.height = height as i32;
        self.buffer = PixelBuffer::new(width as usize, height as usize);
        self.previous_bar_height = vec![0; width as usize];
        self.last_ripple = None;
        self.frame_count = 0;
    }

    fn update(&mut self, now: Nanos) -> bool {
        self.frame_count += 1;
        self.feed.refresh(now);
        let bands = self.feed.bands();

        let ripple_interval_ms = (256 - DEFAULT_INTENSITY).max(1) as u64;
        let ripple_due = match self.last_ripple {
            None => true,
            Some(last) => now.saturating_sub(last).as_millis() >= ripple_interval_ms,
        };
        if ripple_due {
            self.last_ripple = Some(now);
        }

        // Fading every frame at high speed would wash the bars out; gate
        // the pass to every n-th frame below max speed.
        let fadeout_delay = (256 - DEFAULT_SPEED) / 64;
        if fadeout_delay <= 1 || self.frame_count % fadeout_delay as u64 == 0 {
            self.buffer.fade_scale(DEFAULT_SPEED as u8);
        }

        for x in 0..self.width {
            let band = map_range(x, 0, self.width, 0, BANDS).clamp(0, BANDS - 1);
            let color_index = (band * 17) as u8;

            let adjusted = (i32::from(bands[band as usize]) - NOISE_FLOOR).max(0);
            let boosted = adjusted * 2;
            let effective_max = MAX_BAND_VALUE - NOISE_FLOOR;

            let mut bar_height = 0;
            if boosted > 0 {
                let capped = boosted.min(effective_max);
                bar_height = map_range(capped, 0, effective_max, 0, self.height)
                    .clamp(0, self.height);
            }

            // Peak markers only ever rise here; decay happens on ripple
            // ticks below, so they hang above falling bars.
            if bar_height > self.previous_bar_height[x as usize] {
                self.previous_bar_height[x as usize] = bar_height;
            }

            for y in 0..bar_height {
                let color = rainbow(color_index, 255);
                self.buffer.set(x, self.height - 1 - y, color);
            }

            let peak = self.previous_bar_height[x as usize];
            if peak > 0 {
                self.buffer.set(x, self.height - peak, PEAK_COLOR);
            }

            if ripple_due && peak > 0 {
                self.previous_bar_height[x as usize] -= 1;
            }
        }

        true
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb8 {
        self.buffer.get(x as i32, y as i32)
    }
}
