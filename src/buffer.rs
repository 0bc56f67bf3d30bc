//! Per-cell RGB state shared by the buffer-backed animations: decay,
//! saturating blends, box blur, and circle splats.

use crate::core::Rgb8;

/// Owned canvas-sized pixel state. Coordinates outside the buffer are
/// ignored on write and read back as black, so feature painters never need
/// their own bounds checks.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    cells: Vec<Rgb8>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Rgb8::BLACK; width * height],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Rgb8::BLACK);
    }

    pub fn get(&self, x: i32, y: i32) -> Rgb8 {
        match self.index(x, y) {
            Some(i) => self.cells[i],
            None => Rgb8::BLACK,
        }
    }

    pub fn set(&mut self, x: i32, y: i32, color: Rgb8) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = color;
        }
    }

    /// Saturating additive blend into a cell.
    pub fn add(&mut self, x: i32, y: i32, color: Rgb8) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = self.cells[i].saturating_add(color);
        }
    }

    /// Subtractive fade: every channel drops by a flat `amount`, clamped
    /// at zero.
    pub fn fade_by(&mut self, amount: u8) {
        for cell in &mut self.cells {
            cell.r = cell.r.saturating_sub(amount);
            cell.g = cell.g.saturating_sub(amount);
            cell.b = cell.b.saturating_sub(amount);
        }
    }

    /// Multiplicative fade: every channel scaled by `(255 - amount) / 255`
    /// with integer division, so repeated application reaches exact zero.
    pub fn fade_scale(&mut self, amount: u8) {
        let keep = u16::from(255 - amount);
        for cell in &mut self.cells {
            cell.r = ((u16::from(cell.r) * keep) / 255) as u8;
            cell.g = ((u16::from(cell.g) * keep) / 255) as u8;
            cell.b = ((u16::from(cell.b) * keep) / 255) as u8;
        }
    }

    /// 3x3 box blur blended with the original by `amount` (0 = untouched,
    /// 255 = fully blurred). Edge cells average only their in-bounds
    /// neighbors. Always a full out-of-place pass over a fresh buffer.
    pub fn blur(&mut self, amount: u8) {
        if amount == 0 {
            return;
        }
        let mut out = vec![Rgb8::BLACK; self.cells.len()];
        let amt = u32::from(amount);
        let keep = 255 - amt;

        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let mut sum = [0u32; 3];
                let mut count = 0u32;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if let Some(i) = self.index(x + dx, y + dy) {
                            let c = self.cells[i];
                            sum[0] += u32::from(c.r);
                            sum[1] += u32::from(c.g);
                            sum[2] += u32::from(c.b);
                            count += 1;
                        }
                    }
                }
                let i = (y as usize) * self.width + x as usize;
                let orig = self.cells[i];
                let blend = |o: u8, s: u32| -> u8 {
                    let blurred = s / count;
                    ((u32::from(o) * keep + blurred * amt) / 255) as u8
                };
                out[i] = Rgb8::new(
                    blend(orig.r, sum[0]),
                    blend(orig.g, sum[1]),
                    blend(orig.b, sum[2]),
                );
            }
        }
        self.cells = out;
    }

    /// Additively fill a disc of `radius` around the center; radius 0 sets
    /// the single center cell.
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Rgb8) {
        if radius <= 0 {
            self.set(cx, cy, color);
            return;
        }
        let r2 = radius * radius;
        for y in cy - radius..=cy + radius {
            for x in cx - radius..=cx + radius {
                let dx = x - cx;
                let dy = y - cy;
                if dx * dx + dy * dy <= r2 {
                    self.add(x, y, color);
                }
            }
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((y as usize) * self.width + x as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_reads_black_and_writes_are_ignored() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.set(-1, 0, Rgb8::WHITE);
        buf.set(4, 4, Rgb8::WHITE);
        assert_eq!(buf.get(-1, 0), Rgb8::BLACK);
        assert_eq!(buf.get(0, 0), Rgb8::BLACK);
    }

    #[test]
    fn fade_by_reaches_zero_and_stays() {
        let mut buf = PixelBuffer::new(2, 1);
        buf.set(0, 0, Rgb8::new(70, 3, 0));
        buf.fade_by(32);
        assert_eq!(buf.get(0, 0), Rgb8::new(38, 0, 0));
        buf.fade_by(32);
        buf.fade_by(32);
        assert_eq!(buf.get(0, 0), Rgb8::BLACK);
        buf.fade_by(32);
        assert_eq!(buf.get(0, 0), Rgb8::BLACK);
    }

    #[test]
    fn fade_scale_strictly_decreases_nonzero_channels() {
        let mut buf = PixelBuffer::new(1, 1);
        buf.set(0, 0, Rgb8::new(255, 128, 1));
        let mut prev = buf.get(0, 0);
        for _ in 0..64 {
            buf.fade_scale(40);
            let cur = buf.get(0, 0);
            for (p, c) in [(prev.r, cur.r), (prev.g, cur.g), (prev.b, cur.b)] {
                if p > 0 {
                    assert!(c < p, "channel failed to decrease: {p} -> {c}");
                }
            }
            prev = cur;
        }
        assert_eq!(prev, Rgb8::BLACK);
        buf.fade_scale(40);
        assert_eq!(buf.get(0, 0), Rgb8::BLACK);
    }

    #[test]
    fn blur_zero_is_identity() {
        let mut buf = PixelBuffer::new(3, 3);
        buf.set(1, 1, Rgb8::new(90, 180, 30));
        let before = buf.get(1, 1);
        buf.blur(0);
        assert_eq!(buf.get(1, 1), before);
    }

    #[test]
    fn blur_spreads_to_neighbors_without_escaping_range() {
        let mut buf = PixelBuffer::new(5, 5);
        buf.set(2, 2, Rgb8::WHITE);
        buf.blur(128);
        assert!(buf.get(1, 2).r > 0);
        assert!(buf.get(2, 2).r < 255);
        // Corner cells average only their 4 in-bounds neighbors, all black.
        assert_eq!(buf.get(0, 0), Rgb8::BLACK);
    }

    #[test]
    fn blur_constant_field_is_fixed_point() {
        let mut buf = PixelBuffer::new(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                buf.set(x, y, Rgb8::new(100, 100, 100));
            }
        }
        buf.blur(255);
        assert_eq!(buf.get(2, 2), Rgb8::new(100, 100, 100));
    }

    #[test]
    fn circle_splat_is_additive_and_clamped() {
        let mut buf = PixelBuffer::new(8, 8);
        buf.fill_circle(4, 4, 2, Rgb8::new(200, 0, 0));
        buf.fill_circle(4, 4, 2, Rgb8::new(200, 0, 0));
        assert_eq!(buf.get(4, 4).r, 255);
        assert_eq!(buf.get(0, 0), Rgb8::BLACK);
    }
}
