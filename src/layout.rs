//! Device geometry and the frame compositor: global canvas coordinates to
//! per-device channel sequences, via a per-device wiring transform.

use serde::{Deserialize, Serialize};

use crate::animation::Animation;
use crate::core::Canvas;

/// Coordinate-to-LED-index transform for one panel's wiring. Panel wiring
/// conventions vary between vendors, so the transform is configured per
/// device rather than fixed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PixelMapping {
    /// Columns left to right, each column wired bottom to top. The first
    /// LED of the data line sits at the panel's top-right corner.
    #[default]
    VerticalSerpentine,
    /// Rows top to bottom, even rows left to right, odd rows reversed.
    HorizontalSerpentine,
    /// Plain raster order, row by row, left to right.
    RowMajor,
}

impl PixelMapping {
    /// Linear LED index for the local coordinate `(lx, ly)` on a
    /// `width x height` panel. Bijective onto `0..width*height` for
    /// in-bounds coordinates.
    pub fn led_index(self, lx: u32, ly: u32, width: u32, height: u32) -> usize {
        match self {
            Self::VerticalSerpentine => (lx * height + (height - 1 - ly)) as usize,
            Self::HorizontalSerpentine => {
                let x = if ly % 2 == 0 { lx } else { width - 1 - lx };
                (ly * width + x) as usize
            }
            Self::RowMajor => (ly * width + lx) as usize,
        }
    }
}

fn default_port() -> u16 {
    crate::artnet::ARTNET_PORT
}

/// One physical panel: network endpoint, tile position in the canvas grid,
/// geometry, and protocol addressing. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub name: String,
    pub host: String,
    /// Tile column and row within the canvas grid, in panel units.
    pub tile_x: u32,
    pub tile_y: u32,
    pub panel_width: u32,
    pub panel_height: u32,
    pub universe: u16,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Zero-padding channels preceding the pixel data in each packet.
    #[serde(default)]
    pub dmx_start_address: usize,
    #[serde(default)]
    pub mapping: PixelMapping,
}

impl Device {
    pub fn led_count(&self) -> usize {
        self.panel_width as usize * self.panel_height as usize
    }

    /// Global canvas coordinate of the panel's local origin.
    pub fn origin(&self) -> (u32, u32) {
        (self.tile_x * self.panel_width, self.tile_y * self.panel_height)
    }

    /// Whether the panel lies entirely inside `canvas`.
    pub fn fits(&self, canvas: Canvas) -> bool {
        let (ox, oy) = self.origin();
        ox + self.panel_width <= canvas.width && oy + self.panel_height <= canvas.height
    }
}

/// Read every local coordinate of `device` from the active animation and
/// produce its channel sequence: 3 bytes per LED in RGB order, ordered by
/// the device's LED index. `brightness` in [0, 1] scales all channels.
pub fn compose_device(animation: &dyn Animation, device: &Device, brightness: f64) -> Vec<u8> {
    let factor = brightness.clamp(0.0, 1.0);
    let (origin_x, origin_y) = device.origin();
    let mut channels = vec![0u8; device.led_count() * 3];

    for ly in 0..device.panel_height {
        for lx in 0..device.panel_width {
            let color = animation.pixel(origin_x + lx, origin_y + ly).scaled(factor);
            let index =
                device
                    .mapping
                    .led_index(lx, ly, device.panel_width, device.panel_height)
                    * 3;
            channels[index] = color.r;
            channels[index + 1] = color.g;
            channels[index + 2] = color.b;
        }
    }

    channels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Nanos, Rgb8};

    fn device(mapping: PixelMapping) -> Device {
        Device {
            name: "panel".into(),
            host: "192.168.1.50".into(),
            tile_x: 0,
            tile_y: 0,
            panel_width: 16,
            panel_height: 16,
            universe: 0,
            port: default_port(),
            dmx_start_address: 0,
            mapping,
        }
    }

    #[test]
    fn every_mapping_is_a_bijection() {
        for mapping in [
            PixelMapping::VerticalSerpentine,
            PixelMapping::HorizontalSerpentine,
            PixelMapping::RowMajor,
        ] {
            for (w, h) in [(16u32, 16u32), (8, 32), (1, 4), (5, 3)] {
                let mut seen = vec![false; (w * h) as usize];
                for ly in 0..h {
                    for lx in 0..w {
                        let i = mapping.led_index(lx, ly, w, h);
                        assert!(!seen[i], "{mapping:?} repeats index {i} on {w}x{h}");
                        seen[i] = true;
                    }
                }
                assert!(seen.iter().all(|&s| s));
            }
        }
    }

    #[test]
    fn vertical_serpentine_matches_the_wiring() {
        let m = PixelMapping::VerticalSerpentine;
        // First data-line LED is the top of the first column's return run.
        assert_eq!(m.led_index(0, 15, 16, 16), 0);
        assert_eq!(m.led_index(0, 0, 16, 16), 15);
        assert_eq!(m.led_index(4, 5, 16, 16), 74);
    }

    struct OnePixel {
        x: u32,
        y: u32,
    }

    impl Animation for OnePixel {
        fn name(&self) -> &'static str {
            "one pixel"
        }
        fn init(&mut self, _w: u32, _h: u32) {}
        fn update(&mut self, _now: Nanos) -> bool {
            true
        }
        fn pixel(&self, x: u32, y: u32) -> Rgb8 {
            if x == self.x && y == self.y {
                Rgb8::WHITE
            } else {
                Rgb8::BLACK
            }
        }
    }

    #[test]
    fn tiled_panels_attribute_global_pixels_correctly() {
        // 32x32 canvas split into four 16x16 tiles; a pixel at global
        // (20, 5) belongs to the tile at (1, 0), local (4, 5), LED 74.
        let mut dev = device(PixelMapping::VerticalSerpentine);
        dev.tile_x = 1;
        dev.tile_y = 0;
        let anim = OnePixel { x: 20, y: 5 };

        let channels = compose_device(&anim, &dev, 1.0);
        assert_eq!(channels.len(), 16 * 16 * 3);
        let lit: Vec<usize> = channels
            .chunks_exact(3)
            .enumerate()
            .filter(|(_, c)| c != &[0, 0, 0])
            .map(|(i, _)| i)
            .collect();
        assert_eq!(lit, vec![74]);

        // The same pixel never lands on the sibling tiles.
        for (tx, ty) in [(0u32, 0u32), (0, 1), (1, 1)] {
            let mut other = device(PixelMapping::VerticalSerpentine);
            other.tile_x = tx;
            other.tile_y = ty;
            let channels = compose_device(&anim, &other, 1.0);
            assert!(channels.iter().all(|&c| c == 0));
        }
    }

    #[test]
    fn brightness_scales_the_sequence() {
        let dev = device(PixelMapping::RowMajor);
        let anim = OnePixel { x: 3, y: 2 };
        let full = compose_device(&anim, &dev, 1.0);
        let half = compose_device(&anim, &dev, 0.5);
        let i = (2 * 16 + 3) * 3;
        assert_eq!(full[i], 255);
        assert_eq!(half[i], 128);
    }

    #[test]
    fn fits_detects_overhang() {
        let canvas = Canvas::new(32, 32).unwrap();
        let mut dev = device(PixelMapping::RowMajor);
        dev.tile_x = 1;
        dev.tile_y = 1;
        assert!(dev.fits(canvas));
        dev.tile_x = 2;
        assert!(!dev.fits(canvas));
    }
}
