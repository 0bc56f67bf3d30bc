use crate::animation::Animation;
use crate::audio::{SpectrumFeed, SpectrumSource};
use crate::color::hsv_deg_to_rgb;
use crate::core::{Nanos, Rgb8};

const WINDOW_SIZE: usize = 64;
// 75th percentile of the rolling loudness window; spikes above it spawn
// spots. Tuned empirically, recalibrate per microphone gain.
const PERCENTILE: f64 = 0.75;
const FADE_SPEED: u8 = 20;
const FADE_INTERVAL_NS: u64 = 100_000_000;
const SPAWN_INTERVAL_NS: u64 = 50_000_000;
const SPOTS_PER_BURST: usize = 5;

/// Loudness spikes splash short-lived radial spots of a slowly advancing
/// hue onto the canvas. A rolling-window percentile threshold keeps
/// sustained input from saturating the field.
pub struct Blurz {
    width: i32,
    height: i32,
    brightness: Vec<u8>,
    hue: Vec<u8>,
    current_hue: u8,
    feed: SpectrumFeed,
    window: [u8; WINDOW_SIZE],
    window_index: usize,
    last_fade: Option<Nanos>,
    last_spawn: Option<Nanos>,
    rng: fastrand::Rng,
}

impl Blurz {
    pub fn new(spectrum: Option<Box<dyn SpectrumSource>>) -> Self {
        Self {
            width: 0,
            height: 0,
            brightness: Vec::new(),
            hue: Vec::new(),
            current_hue: 0,
            feed: SpectrumFeed::new(spectrum),
            window: [0; WINDOW_SIZE],
            window_index: 0,
            last_fade: None,
            last_spawn: None,
            rng: fastrand::Rng::new(),
        }
    }

    fn threshold(&self) -> u8 {
        let mut sorted = self.window;
        sorted.sort_unstable();
        let index = ((WINDOW_SIZE as f64 * PERCENTILE).round() as usize).min(WINDOW_SIZE - 1);
        sorted[index]
    }

    fn cell(&self, x: i32, y: i32) -> usize {
        (y as usize) * self.width as usize + x as usize
    }
}

impl Animation for Blurz {
    fn name(&self) -> &'static str {
        "Blurz"
    }

    fn is_audio_reactive(&self) -> bool {
        true
    }

    fn init(&mut self, width: u32, height: u32) {
        self.width = width as i32;
        self.height = height as i32;
        let cells = width as usize * height as usize;
        self.brightness = vec![0; cells];
        self.hue = vec![0; cells];
        self.window = [0; WINDOW_SIZE];
        self.window_index = 0;
        self.last_fade = None;
        self.last_spawn = None;
    }

    fn update(&mut self, now: Nanos) -> bool {
        self.feed.refresh(now);
        let level = self.feed.raw_level();
        self.window[self.window_index] = level;
        self.window_index = (self.window_index + 1) % WINDOW_SIZE;

        let fade_due = self
            .last_fade
            .is_none_or(|last| now.saturating_sub(last).0 > FADE_INTERVAL_NS);
        if fade_due {
            for b in &mut self.brightness {
                *b = b.saturating_sub(FADE_SPEED);
            }
            self.last_fade = Some(now);
        }

        let spawn_due = self
            .last_spawn
            .is_none_or(|last| now.saturating_sub(last).0 > SPAWN_INTERVAL_NS);
        if !spawn_due {
            return true;
        }

        let threshold = self.threshold();
        if level < threshold {
            return true;
        }

        let spike = i32::from(level) - i32::from(threshold);
        let burst_brightness = (spike * 5).clamp(150, 255) as u8;
        self.current_hue = ((u16::from(self.current_hue) + 15) % 255) as u8;

        for _ in 0..SPOTS_PER_BURST {
            let cx = self.rng.i32(0..self.width);
            let cy = self.rng.i32(0..self.height);
            let radius = 1 + self.rng.i32(0..2);

            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let px = cx + dx;
                    let py = cy + dy;
                    if px < 0 || py < 0 || px >= self.width || py >= self.height {
                        continue;
                    }
                    let distance = f64::from(dx * dx + dy * dy).sqrt();
                    if distance > f64::from(radius) {
                        continue;
                    }
                    let falloff = 1.0 - distance / f64::from(radius);
                    let spot = (f64::from(burst_brightness) * falloff).round() as u8;
                    let i = self.cell(px, py);
                    if spot > self.brightness[i] {
                        self.brightness[i] = spot;
                        self.hue[i] = self.current_hue;
                    }
                }
            }
        }

        self.last_spawn = Some(now);
        true
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb8 {
        let i = self.cell(x as i32, y as i32);
        let brightness = self.brightness[i];
        if brightness == 0 {
            return Rgb8::BLACK;
        }
        let hue_deg = f64::from(self.hue[i]) / 255.0 * 360.0;
        hsv_deg_to_rgb(hue_deg, 1.0, f64::from(brightness) / 255.0)
    }
}
