use crate::animation::Animation;
use crate::buffer::PixelBuffer;
use crate::color::rainbow;
use crate::core::{Nanos, Rgb8};

const MAX_BLOBS: usize = 8;
const FADE_AMOUNT: u8 = 5; // (32 >> 3) + 1
const BLUR_AMOUNT: u8 = 8; // 32 >> 2
const COLOR_CYCLE_MS: u64 = 2_000;
const DEFAULT_SPEED: u16 = 128;
const DEFAULT_INTENSITY: u16 = 128;

struct Blob {
    x: f32,
    y: f32,
    speed_x: f32,
    speed_y: f32,
    radius: f32,
    grow: bool,
    color: u8,
}

/// Soft floating blobs: each one drifts, slows near the walls, re-rolls its
/// speed when it crosses an edge, and breathes between a minimum and a
/// size-dependent maximum radius.
pub struct Blobs {
    width: usize,
    height: usize,
    buffer: PixelBuffer,
    blobs: Vec<Blob>,
    active: usize,
    last_color_change: Option<Nanos>,
    rng: fastrand::Rng,
}

impl Blobs {
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            buffer: PixelBuffer::new(0, 0),
            blobs: Vec::new(),
            active: 0,
            last_color_change: None,
            rng: fastrand::Rng::new(),
        }
    }

    fn random_speed(&mut self, span: usize) -> f32 {
        let speed_div = (256 - DEFAULT_SPEED).max(1) as f32;
        let range = span.max(4) - 3;
        (self.rng.usize(0..range) + 3) as f32 / speed_div
    }
}

impl Default for Blobs {
    fn default() -> Self {
        Self::new()
    }
}

impl Animation for Blobs {
    fn name(&self) -> &'static str {
        "Blobs"
    }

    fn init(&mut self, width: u32, height: u32) {
        self.width = width as usize;
        self.height = height as usize;
        self.buffer = PixelBuffer::new(self.width, self.height);
        self.active = ((DEFAULT_INTENSITY >> 5) as usize + 1).min(MAX_BLOBS);
        self.last_color_change = None;

        let max_radius = (self.width / 4).max(2) as f32;
        self.blobs = (0..MAX_BLOBS)
            .map(|_| {
                let radius = self.rng.f32() * (max_radius - 1.0) + 1.0;
                Blob {
                    radius,
                    grow: radius < 1.0,
                    x: self.rng.usize(0..self.width) as f32,
                    y: self.rng.usize(0..self.height) as f32,
                    speed_x: 0.0,
                    speed_y: 0.0,
                    color: self.rng.u8(..),
                }
            })
            .collect();
        for i in 0..MAX_BLOBS {
            let sx = self.random_speed(self.width);
            let sy = self.random_speed(self.height);
            self.blobs[i].speed_x = if sx == 0.0 { 1.0 } else { sx };
            self.blobs[i].speed_y = if sy == 0.0 { 1.0 } else { sy };
        }
    }

    fn update(&mut self, now: Nanos) -> bool {
        self.buffer.fade_scale(FADE_AMOUNT);

        let cycle_due = match self.last_color_change {
            None => true,
            Some(last) => now.saturating_sub(last).as_millis() >= COLOR_CYCLE_MS,
        };
        if cycle_due {
            for blob in self.blobs.iter_mut().take(self.active) {
                blob.color = blob.color.wrapping_add(4);
            }
            self.last_color_change = Some(now);
        }

        let w = self.width as f32;
        let h = self.height as f32;
        let max_radius = (w / 4.0).min(2.0);

        for i in 0..self.active {
            let blob = &mut self.blobs[i];
            let speed_factor = blob.speed_x.abs().max(blob.speed_y.abs());

            if blob.grow {
                blob.radius += speed_factor * 0.05;
                if blob.radius >= max_radius {
                    blob.grow = false;
                }
            } else {
                blob.radius -= speed_factor * 0.05;
                if blob.radius < 1.0 {
                    blob.grow = true;
                }
            }

            let color = rainbow(blob.color, 255);
            let px = blob.x.round() as i32;
            let py = blob.y.round() as i32;
            if blob.radius > 1.0 {
                self.buffer
                    .fill_circle(px, py, blob.radius.round() as i32, color);
            } else {
                self.buffer.set(px, py, color);
            }

            // Approaching a wall shortens the step so blobs graze the edge
            // instead of clipping through it.
            let blob = &mut self.blobs[i];
            blob.x = if blob.x + blob.radius >= w - 1.0 {
                blob.x + blob.speed_x * ((w - 1.0 - blob.x) / blob.radius + 0.005)
            } else if blob.x - blob.radius <= 0.0 {
                blob.x + blob.speed_x * (blob.x / blob.radius + 0.005)
            } else {
                blob.x + blob.speed_x
            };
            blob.y = if blob.y + blob.radius >= h - 1.0 {
                blob.y + blob.speed_y * ((h - 1.0 - blob.y) / blob.radius + 0.005)
            } else if blob.y - blob.radius <= 0.0 {
                blob.y + blob.speed_y * (blob.y / blob.radius + 0.005)
            } else {
                blob.y + blob.speed_y
            };

            if self.blobs[i].x < 0.01 || self.blobs[i].x > w - 1.01 {
                let dir = if self.blobs[i].x < 0.01 { 1.0 } else { -1.0 };
                let speed = self.random_speed(self.width);
                let blob = &mut self.blobs[i];
                blob.speed_x = dir * speed;
                blob.x = if dir > 0.0 { 0.01 } else { w - 1.01 };
            }
            if self.blobs[i].y < 0.01 || self.blobs[i].y > h - 1.01 {
                let dir = if self.blobs[i].y < 0.01 { 1.0 } else { -1.0 };
                let speed = self.random_speed(self.height);
                let blob = &mut self.blobs[i];
                blob.speed_y = dir * speed;
                blob.y = if dir > 0.0 { 0.01 } else { h - 1.01 };
            }
        }

        self.buffer.blur(BLUR_AMOUNT);
        true
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb8 {
        self.buffer.get(x as i32, y as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_radii_stay_within_breathing_bounds() {
        let mut anim = Blobs::new();
        anim.init(32, 32);
        for i in 0..600u64 {
            anim.update(Nanos::from_millis(i * 16));
            for blob in anim.blobs.iter().take(anim.active) {
                assert!(blob.radius >= 0.5, "radius collapsed: {}", blob.radius);
                assert!(blob.radius <= 8.5, "radius exploded: {}", blob.radius);
            }
        }
    }

    #[test]
    fn canvas_lights_up_and_decays_when_blobs_stop_painting() {
        let mut anim = Blobs::new();
        anim.init(16, 16);
        for i in 0..30u64 {
            anim.update(Nanos::from_millis(i * 16));
        }
        let lit = (0..16)
            .flat_map(|y| (0..16).map(move |x| (x, y)))
            .filter(|&(x, y)| !anim.pixel(x, y).is_black())
            .count();
        assert!(lit > 0);
    }
}
