use crate::animation::Animation;
use crate::buffer::PixelBuffer;
use crate::color::hsv_to_rgb;
use crate::core::{Nanos, Rgb8};

const MAX_BEES: usize = 5;
const FADE_AMOUNT: u8 = 32;
const BLUR_AMOUNT: u8 = 10;
const DEFAULT_SPEED: u16 = 128;

struct Bee {
    pos_x: i32,
    pos_y: i32,
    aim_x: i32,
    aim_y: i32,
    hue: u8,
    delta_x: i32,
    delta_y: i32,
    sign_x: i32,
    sign_y: i32,
    error: i32,
}

impl Bee {
    fn new() -> Self {
        Self {
            pos_x: 0,
            pos_y: 0,
            aim_x: 0,
            aim_y: 0,
            hue: 0,
            delta_x: 0,
            delta_y: 0,
            sign_x: 1,
            sign_y: 1,
            error: 0,
        }
    }

    fn set_aim(&mut self, rng: &mut fastrand::Rng, width: i32, height: i32) {
        self.aim_x = rng.i32(0..width);
        self.aim_y = rng.i32(0..height);
        self.hue = rng.u8(..);
        self.delta_x = (self.aim_x - self.pos_x).abs();
        self.delta_y = (self.aim_y - self.pos_y).abs();
        self.sign_x = if self.pos_x < self.aim_x { 1 } else { -1 };
        self.sign_y = if self.pos_y < self.aim_y { 1 } else { -1 };
        self.error = self.delta_x - self.delta_y;
    }
}

/// Bees line-walk toward random flowers. Each bee advances one Bresenham
/// step per update interval; reaching its aim re-rolls target and hue. The
/// flower is painted as four additive petals around the aim cell.
pub struct CrazyBees {
    width: i32,
    height: i32,
    buffer: PixelBuffer,
    bees: Vec<Bee>,
    last_update: Option<Nanos>,
    update_interval: u64,
    rng: fastrand::Rng,
}

impl CrazyBees {
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            buffer: PixelBuffer::new(0, 0),
            bees: Vec::new(),
            last_update: None,
            update_interval: 0,
            rng: fastrand::Rng::new(),
        }
    }
}

impl Default for CrazyBees {
    fn default() -> Self {
        Self::new()
    }
}

impl Animation for CrazyBees {
    fn name(&self) -> &'static str {
        "Crazy Bees"
    }

    fn init(&mut self, width: u32, height: u32) {
        self.width = width as i32;
        self.height = height as i32;
        self.buffer = PixelBuffer::new(width as usize, height as usize);
        self.last_update = None;

        let count = ((width as usize * height as usize) / 256 + 1).min(MAX_BEES);
        self.bees = (0..count).map(|_| Bee::new()).collect();
        for bee in &mut self.bees {
            bee.pos_x = self.rng.i32(0..self.width);
            bee.pos_y = self.rng.i32(0..self.height);
            bee.set_aim(&mut self.rng, self.width, self.height);
        }

        let speed_factor = u64::from(DEFAULT_SPEED >> 4) + 1;
        self.update_interval = 16_000_000 * 16 / speed_factor;
    }

    fn update(&mut self, now: Nanos) -> bool {
        if let Some(last) = self.last_update {
            if now.saturating_sub(last).0 < self.update_interval {
                return true;
            }
        }
        self.last_update = Some(now);

        self.buffer.fade_by(FADE_AMOUNT);
        self.buffer.blur(BLUR_AMOUNT);

        for bee in &mut self.bees {
            let flower = hsv_to_rgb(bee.hue, 255, 255);
            self.buffer.add(bee.aim_x + 1, bee.aim_y, flower);
            self.buffer.add(bee.aim_x, bee.aim_y + 1, flower);
            self.buffer.add(bee.aim_x - 1, bee.aim_y, flower);
            self.buffer.add(bee.aim_x, bee.aim_y - 1, flower);

            if bee.pos_x != bee.aim_x || bee.pos_y != bee.aim_y {
                let body = hsv_to_rgb(bee.hue, 153, 255);
                self.buffer.set(bee.pos_x, bee.pos_y, body);

                let error2 = bee.error * 2;
                if error2 > -bee.delta_y {
                    bee.error -= bee.delta_y;
                    bee.pos_x += bee.sign_x;
                }
                if error2 < bee.delta_x {
                    bee.error += bee.delta_x;
                    bee.pos_y += bee.sign_y;
                }
            } else {
                bee.set_aim(&mut self.rng, self.width, self.height);
            }
        }

        true
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb8 {
        self.buffer.get(x as i32, y as i32)
    }
}
