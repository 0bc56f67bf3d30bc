use crate::animation::Animation;
use crate::audio::{SpectrumFeed, SpectrumSource};
use crate::buffer::PixelBuffer;
use crate::color::rainbow;
use crate::core::{Nanos, Rgb8};
use crate::math::beatsin8;

const BORDER_WIDTH: i32 = 2;
const NOISE_FLOOR: u8 = 100;
const DEFAULT_SPEED: i32 = 128;
const FADE_AMOUNT: u8 = 4;
const BLUR_AMOUNT: u8 = 16;

/// Six additive dots orbit the canvas on bounded sine oscillators at
/// mutually prime frequencies, each pulling its color from the rainbow at
/// a different time divisor. Loudness raises brightness and shifts the
/// palette; below the noise floor the field only fades.
pub struct Swirl {
    width: i32,
    height: i32,
    buffer: PixelBuffer,
    feed: SpectrumFeed,
    // Slow 1-in-20 smoothing on top of the feed keeps the dots from
    // flickering with every loudness spike.
    smoothed_level: u16,
}

impl Swirl {
    pub fn new(spectrum: Option<Box<dyn SpectrumSource>>) -> Self {
        Self {
            width: 0,
            height: 0,
            buffer: PixelBuffer::new(0, 0),
            feed: SpectrumFeed::new(spectrum),
            smoothed_level: 0,
        }
    }
}

impl Animation for Swirl {
    fn name(&self) -> &'static str {
        "Swirl"
    }

    fn is_audio_reactive(&self) -> bool {
        true
    }

    fn init(&mut self, width: u32, height: u32) {
        self.width = width as i32;
        self.height = height as i32;
        self.buffer = PixelBuffer::new(width as usize, height as usize);
        self.smoothed_level = 0;
    }

    fn update(&mut self, now: Nanos) -> bool {
        self.feed.refresh(now);
        self.smoothed_level =
            (self.smoothed_level * 19 + u16::from(self.feed.level())) / 20;
        let level = self.smoothed_level.min(255) as u8;

        if level < NOISE_FLOOR {
            self.buffer.fade_by(15);
            self.buffer.blur(BLUR_AMOUNT);
            return true;
        }

        self.buffer.fade_by(FADE_AMOUNT);
        self.buffer.blur(BLUR_AMOUNT);

        let t = now.as_millis();
        let freq1 = ((27 * DEFAULT_SPEED) / 255).max(1) as u16;
        let freq2 = ((41 * DEFAULT_SPEED) / 255).max(1) as u16;

        let i = beatsin8(freq1, BORDER_WIDTH, self.width - BORDER_WIDTH, t, 0);
        let j = beatsin8(freq2, BORDER_WIDTH, self.height - BORDER_WIDTH, t, 0);
        let ni = self.width - 1 - i;
        let nj = self.height - 1 - j;

        let brightness = (200 + i32::from(level) / 2).clamp(150, 255) as u8;
        let palette_offset = u64::from(level) * 4;

        let dots: [(i32, i32, u64); 6] = [
            (i, j, 11),
            (j, i, 13),
            (ni, nj, 17),
            (nj, ni, 29),
            (i, nj, 37),
            (ni, j, 41),
        ];
        for (x, y, divisor) in dots {
            let index = ((t / divisor + palette_offset) & 0xFF) as u8;
            self.buffer.add(x, y, rainbow(index, brightness));
        }

        true
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb8 {
        self.buffer.get(x as i32, y as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::BAND_COUNT;

    struct Fixed(u8);

    impl SpectrumSource for Fixed {
        fn sample(&mut self, _now: Nanos) -> [u8; BAND_COUNT] {
            [self.0; BAND_COUNT]
        }
    }

    #[test]
    fn quiet_input_never_lights_the_canvas() {
        let mut anim = Swirl::new(Some(Box::new(Fixed(0))));
        anim.init(16, 16);
        for i in 0..120u64 {
            anim.update(Nanos::from_millis(i * 16));
        }
        for y in 0..16 {
            for x in 0..16 {
                assert!(anim.pixel(x, y).is_black());
            }
        }
    }

    #[test]
    fn loud_input_paints_orbiting_dots() {
        let mut anim = Swirl::new(Some(Box::new(Fixed(255))));
        anim.init(16, 16);
        for i in 0..400u64 {
            anim.update(Nanos::from_millis(i * 16));
        }
        let lit = (0..16)
            .flat_map(|y| (0..16).map(move |x| (x, y)))
            .filter(|&(x, y)| !anim.pixel(x, y).is_black())
            .count();
        assert!(lit > 0);
    }
}
