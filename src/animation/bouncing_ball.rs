use crate::animation::Animation;
use crate::core::{Nanos, Rgb8};

const BOUNCE_DAMPING: f64 = 0.95;
const RANDOM_KICK_PROBABILITY: f64 = 0.02;
const MAX_SPEED: f64 = 8.0;
const TRAIL_LENGTH: f64 = 5.0;

/// A single ball integrated with explicit position/velocity, reflecting off
/// the canvas edges with damping and the occasional random kick. The ball
/// and its radial trail are evaluated analytically per pixel, so no buffer
/// is needed.
pub struct BouncingBall {
    width: f64,
    height: f64,
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    radius: f64,
    color: Rgb8,
    rng: fastrand::Rng,
}

impl BouncingBall {
    pub fn new() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            radius: 1.0,
            color: Rgb8::new(255, 120, 0),
            rng: fastrand::Rng::new(),
        }
    }
}

impl Default for BouncingBall {
    fn default() -> Self {
        Self::new()
    }
}

impl Animation for BouncingBall {
    fn name(&self) -> &'static str {
        "Bouncing Ball"
    }

    fn init(&mut self, width: u32, height: u32) {
        self.width = f64::from(width);
        self.height = f64::from(height);
        self.x = self.width / 2.0 + (self.rng.f64() - 0.5) * 10.0;
        self.y = self.height / 2.0 + (self.rng.f64() - 0.5) * 10.0;
        self.vx = (self.rng.f64() - 0.5) * 4.0;
        self.vy = (self.rng.f64() - 0.5) * 4.0;
        self.radius = 1.0;
    }

    fn update(&mut self, _now: Nanos) -> bool {
        if self.rng.f64() < RANDOM_KICK_PROBABILITY {
            self.vx += (self.rng.f64() - 0.5) * 2.0;
            self.vy += (self.rng.f64() - 0.5) * 2.0;
        }

        self.x += self.vx;
        self.y += self.vy;

        if self.x < self.radius {
            self.x = self.radius;
            self.vx = -self.vx * BOUNCE_DAMPING;
        } else if self.x >= self.width - self.radius {
            self.x = self.width - self.radius - 1.0;
            self.vx = -self.vx * BOUNCE_DAMPING;
        }

        if self.y < self.radius {
            self.y = self.radius;
            self.vy = -self.vy * BOUNCE_DAMPING;
        } else if self.y >= self.height - self.radius {
            self.y = self.height - self.radius - 1.0;
            self.vy = -self.vy * BOUNCE_DAMPING;
        }

        self.vx = self.vx.clamp(-MAX_SPEED, MAX_SPEED);
        self.vy = self.vy.clamp(-MAX_SPEED, MAX_SPEED);

        true
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb8 {
        let dx = f64::from(x) - self.x;
        let dy = f64::from(y) - self.y;
        let distance = (dx * dx + dy * dy).sqrt();

        if distance <= self.radius {
            self.color
        } else if distance <= self.radius + TRAIL_LENGTH {
            let trail = distance - self.radius;
            self.color.scaled(1.0 - trail / TRAIL_LENGTH)
        } else {
            Rgb8::BLACK
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ball_stays_inside_the_canvas() {
        let mut ball = BouncingBall::new();
        ball.init(16, 12);
        for i in 0..2_000u64 {
            ball.update(Nanos::from_millis(i * 16));
            assert!(ball.x >= 0.0 && ball.x < 16.0, "x escaped: {}", ball.x);
            assert!(ball.y >= 0.0 && ball.y < 12.0, "y escaped: {}", ball.y);
            assert!(ball.vx.abs() <= MAX_SPEED && ball.vy.abs() <= MAX_SPEED);
        }
    }

    #[test]
    fn trail_fades_with_distance() {
        let mut ball = BouncingBall::new();
        ball.init(32, 32);
        ball.x = 16.0;
        ball.y = 16.0;
        let center = ball.pixel(16, 16);
        let near = ball.pixel(18, 16);
        let far = ball.pixel(26, 16);
        assert_eq!(center, ball.color);
        assert!(near.r < center.r && near.r > 0);
        assert_eq!(far, Rgb8::BLACK);
    }
}
