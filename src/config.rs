//! Session configuration: the logical canvas plus the device list, loaded
//! from a JSON file. Device metadata normally comes from the panels'
//! controllers; here it is captured once into the file before a run.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Canvas;
use crate::error::{LedfxError, LedfxResult};
use crate::layout::Device;

fn default_brightness() -> f64 {
    1.0
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    pub canvas: Canvas,
    pub devices: Vec<Device>,
    /// Master output scale in [0, 1], applied at composition.
    #[serde(default = "default_brightness")]
    pub brightness: f64,
}

impl SessionConfig {
    pub fn load(path: &Path) -> LedfxResult<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| LedfxError::config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// The device tiles must partition the canvas exactly: every cell
    /// covered once, no overlaps, no overhang.
    pub fn validate(&self) -> LedfxResult<()> {
        if self.devices.is_empty() {
            return Err(LedfxError::config("no devices configured"));
        }
        if !(0.0..=1.0).contains(&self.brightness) {
            return Err(LedfxError::config(format!(
                "brightness {} outside [0, 1]",
                self.brightness
            )));
        }

        let mut covered = vec![false; self.canvas.led_count()];
        for device in &self.devices {
            if device.panel_width == 0 || device.panel_height == 0 {
                return Err(LedfxError::config(format!(
                    "device '{}' has a zero dimension",
                    device.name
                )));
            }
            if !device.fits(self.canvas) {
                return Err(LedfxError::config(format!(
                    "device '{}' extends past the canvas",
                    device.name
                )));
            }
            let (ox, oy) = device.origin();
            for ly in 0..device.panel_height {
                for lx in 0..device.panel_width {
                    let cell =
                        ((oy + ly) * self.canvas.width + ox + lx) as usize;
                    if covered[cell] {
                        return Err(LedfxError::config(format!(
                            "device '{}' overlaps another tile",
                            device.name
                        )));
                    }
                    covered[cell] = true;
                }
            }
        }

        if covered.iter().any(|&c| !c) {
            return Err(LedfxError::config(
                "device tiles do not cover the full canvas",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PixelMapping;

    fn tile(name: &str, tx: u32, ty: u32) -> Device {
        Device {
            name: name.into(),
            host: format!("192.168.1.{}", 50 + tx + ty * 2),
            tile_x: tx,
            tile_y: ty,
            panel_width: 16,
            panel_height: 16,
            universe: 0,
            port: crate::artnet::ARTNET_PORT,
            dmx_start_address: 0,
            mapping: PixelMapping::VerticalSerpentine,
        }
    }

    fn four_tile_config() -> SessionConfig {
        SessionConfig {
            canvas: Canvas::new(32, 32).unwrap(),
            devices: vec![
                tile("a", 0, 0),
                tile("b", 1, 0),
                tile("c", 0, 1),
                tile("d", 1, 1),
            ],
            brightness: 1.0,
        }
    }

    #[test]
    fn exact_tiling_passes() {
        assert!(four_tile_config().validate().is_ok());
    }

    #[test]
    fn missing_tile_is_rejected() {
        let mut config = four_tile_config();
        config.devices.pop();
        assert!(matches!(
            config.validate().unwrap_err(),
            LedfxError::Config(_)
        ));
    }

    #[test]
    fn overlapping_tiles_are_rejected() {
        let mut config = four_tile_config();
        config.devices[3].tile_x = 0;
        config.devices[3].tile_y = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn overhanging_tile_is_rejected() {
        let mut config = four_tile_config();
        config.devices[1].tile_x = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn json_round_trip_keeps_defaults() {
        let json = r#"{
            "canvas": { "width": 16, "height": 16 },
            "devices": [{
                "name": "only",
                "host": "10.0.0.5",
                "tile_x": 0,
                "tile_y": 0,
                "panel_width": 16,
                "panel_height": 16,
                "universe": 1
            }]
        }"#;
        let config: SessionConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.brightness, 1.0);
        assert_eq!(config.devices[0].port, crate::artnet::ARTNET_PORT);
        assert_eq!(
            config.devices[0].mapping,
            PixelMapping::VerticalSerpentine
        );
    }
}
