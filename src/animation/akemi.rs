use crate::animation::Animation;
use crate::audio::{SpectrumFeed, SpectrumSource};
use crate::buffer::PixelBuffer;
use crate::color::{color_wheel, rainbow};
use crate::core::{Nanos, Rgb8};
use crate::math::map_range;

const DEFAULT_COLOR_SPEED: u64 = 128;
const DEFAULT_INTENSITY: u8 = 128;
const LIGHT_FACTOR: f64 = 0.15;
const NORMAL_FACTOR: f64 = 0.4;
const SOUND_COLOR: Rgb8 = Rgb8::new(255, 165, 0);
const LIMB_COLOR: Rgb8 = Rgb8::new(0xFF, 0xE0, 0xA0);
const EYE_COLOR: Rgb8 = Rgb8::WHITE;

/// Stylised mascot rendered from a fixed 32x32 index bitmap, scaled to the
/// canvas by nearest-neighbor index mapping. Face tones cycle through the
/// color wheel; index 8 cells light up orange with the bass band; mirrored
/// GEQ bars fill the side margins.
pub struct Akemi {
    width: i32,
    height: i32,
    buffer: PixelBuffer,
    feed: SpectrumFeed,
}

impl Akemi {
    pub fn new(spectrum: Option<Box<dyn SpectrumSource>>) -> Self {
        Self {
            width: 0,
            height: 0,
            buffer: PixelBuffer::new(0, 0),
            feed: SpectrumFeed::new(spectrum),
        }
    }
}

impl Animation for Akemi {
    fn name(&self) -> &'static str {
        "Akemi"
    }

    fn is_audio_reactive(&self) -> bool {
        true
    }

    fn init(&mut self, width: u32, height: u32) {
        self.width = width as i32;
        self.height = height as i32;
        self.buffer = PixelBuffer::new(width as usize, height as usize);
    }

    fn update(&mut self, now: Nanos) -> bool {
        self.feed.refresh(now);
        let bands = self.feed.bands();

        let speed_factor = (DEFAULT_COLOR_SPEED >> 2) + 2;
        let counter = ((now.as_millis() * speed_factor) & 0xFFFF) >> 8;
        let face_color = color_wheel((counter & 0xFF) as u8);

        let bass = f64::from(bands[0]) / 255.0;
        let is_dancing = DEFAULT_INTENSITY > 64 && bands[0] > 64;

        if is_dancing {
            for x in 0..self.width {
                self.buffer.set(x, 0, Rgb8::BLACK);
            }
        }

        for y in 0..self.height {
            let ak_y = ((y * BASE_SIZE / self.height) as usize).min(BASE_SIZE as usize - 1);
            for x in 0..self.width {
                let ak_x = ((x * BASE_SIZE / self.width) as usize).min(BASE_SIZE as usize - 1);
                let index = AKEMI_MAP[ak_y * BASE_SIZE as usize + ak_x];

                let color = match index {
                    3 => LIMB_COLOR.scaled(LIGHT_FACTOR),
                    2 => LIMB_COLOR.scaled(NORMAL_FACTOR),
                    1 => LIMB_COLOR,
                    6 => face_color.scaled(LIGHT_FACTOR),
                    5 => face_color.scaled(NORMAL_FACTOR),
                    4 => face_color,
                    7 => EYE_COLOR,
                    8 => {
                        if bass > 0.4 {
                            SOUND_COLOR.scaled(bass)
                        } else {
                            LIMB_COLOR
                        }
                    }
                    _ => Rgb8::BLACK,
                };

                if is_dancing {
                    self.buffer.set(x, (y + 1).min(self.height - 1), color);
                } else {
                    self.buffer.set(x, y, color);
                }
            }
        }

        // Mirrored side equalizer bars rising from the vertical center.
        let x_max = (self.width / 8).max(1);
        let mid_y = self.height / 2;
        let max_bar_height = (17 * self.height / 32).max(1);

        for x in 0..x_max {
            let band = map_range(x, 0, x_max.max(4), 0, 15).clamp(0, 15);
            let bar_height = map_range(i32::from(bands[band as usize]), 0, 255, 0, max_bar_height)
                .clamp(0, max_bar_height);
            let bar_color = rainbow((band * 35) as u8, 255);

            for y in 0..bar_height {
                let top_y = mid_y - y;
                if top_y >= 0 && top_y < self.height {
                    self.buffer.set(x, top_y, bar_color);
                    self.buffer.set(self.width - 1 - x, top_y, bar_color);
                }
            }
        }

        true
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb8 {
        self.buffer.get(x as i32, y as i32)
    }
}

const BASE_SIZE: i32 = 32;

#[rustfmt::skip]
const AKEMI_MAP: [u8; 1024] = [
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,0,0,0,0,2,2,2,2,2,2,0,0,0,0,0,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,0,0,2,2,3,3,3,3,3,3,2,2,0,0,0,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,0,2,3,3,0,0,0,0,0,0,3,3,2,0,0,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,2,3,0,0,0,6,5,5,4,0,0,0,3,2,0,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,2,3,0,0,6,6,5,5,5,5,4,4,0,0,3,2,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,2,3,0,6,5,5,5,5,5,5,5,5,4,0,3,2,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,2,3,0,6,5,5,5,5,5,5,5,5,5,5,4,0,3,2,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,3,2,0,6,5,5,5,5,5,5,5,5,5,5,4,0,2,3,0,0,0,0,0,0,0,
    0,0,0,0,0,0,3,2,3,6,5,5,7,7,5,5,5,5,7,7,5,5,4,3,2,3,0,0,0,0,0,0,
    0,0,0,0,0,2,3,1,3,6,5,1,7,7,7,5,5,1,7,7,7,5,4,3,1,3,2,0,0,0,0,0,
    0,0,0,0,0,8,3,1,3,6,5,1,7,7,7,5,5,1,7,7,7,5,4,3,1,3,8,0,0,0,0,0,
    0,0,0,0,0,8,3,1,3,6,5,5,1,1,5,5,5,5,1,1,5,5,4,3,1,3,8,0,0,0,0,0,
    0,0,0,0,0,2,3,1,3,6,5,5,5,5,5,5,5,5,5,5,5,5,4,3,1,3,2,0,0,0,0,0,
    0,0,0,0,0,0,3,2,3,6,5,5,5,5,5,5,5,5,5,5,5,5,4,3,2,3,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,6,5,5,5,5,5,7,7,5,5,5,5,5,4,0,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,6,5,5,5,5,5,5,5,5,5,5,5,5,4,0,0,0,0,0,0,0,0,0,
    1,0,0,0,0,0,0,0,0,6,5,5,5,5,5,5,5,5,5,5,5,5,4,0,0,0,0,0,0,0,0,2,
    0,2,2,2,0,0,0,0,0,6,5,5,5,5,5,5,5,5,5,5,5,5,4,0,0,0,0,0,2,2,2,0,
    0,0,0,3,2,0,0,0,6,5,4,4,4,4,4,4,4,4,4,4,4,4,4,4,0,0,0,2,2,0,0,0,
    0,0,0,3,2,0,0,0,6,5,5,5,5,5,5,5,5,5,5,5,5,5,5,4,0,0,0,2,3,0,0,0,
    0,0,0,0,3,2,0,0,0,0,3,3,0,3,3,0,0,3,3,0,3,3,0,0,0,0,2,2,0,0,0,0,
    0,0,0,0,3,2,0,0,0,0,3,2,0,3,2,0,0,3,2,0,3,2,0,0,0,0,2,3,0,0,0,0,
    0,0,0,0,0,3,2,0,0,3,2,0,0,3,2,0,0,3,2,0,0,3,2,0,0,2,3,0,0,0,0,0,
    0,0,0,0,0,3,2,2,2,2,0,0,0,3,2,0,0,3,2,0,0,0,3,2,2,2,3,0,0,0,0,0,
    0,0,0,0,0,0,3,3,3,0,0,0,0,3,2,0,0,3,2,0,0,0,0,3,3,3,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,0,0,0,0,3,2,0,0,3,2,0,0,0,0,0,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,0,0,0,0,3,2,0,0,3,2,0,0,0,0,0,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,0,0,0,0,3,2,0,0,3,2,0,0,0,0,0,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,0,0,0,0,3,2,0,0,3,2,0,0,0,0,0,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,0,0,0,0,3,2,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,0,0,0,0,3,2,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
];
