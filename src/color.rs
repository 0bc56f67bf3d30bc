//! HSV conversion, color wheel, and gradient palette lookup shared by the
//! animation family.

use crate::core::Rgb8;

/// Six-sector HSV to RGB. `hue` is an 8-bit index wrapped onto 0..360
/// degrees; `sat` and `val` are 0..=255.
pub fn hsv_to_rgb(hue: u8, sat: u8, val: u8) -> Rgb8 {
    let h = f64::from(hue) / 255.0 * 360.0;
    hsv_deg_to_rgb(h, f64::from(sat) / 255.0, f64::from(val) / 255.0)
}

/// Six-sector conversion from (hue degrees, sat 0..1, val 0..1).
pub fn hsv_deg_to_rgb(hue_deg: f64, sat: f64, val: f64) -> Rgb8 {
    let mut h = hue_deg % 360.0;
    if h < 0.0 {
        h += 360.0;
    }
    let s = sat.clamp(0.0, 1.0);
    let v = val.clamp(0.0, 1.0);

    let hi = ((h / 60.0) as u32) % 6;
    let f = h / 60.0 - (h / 60.0).floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match hi {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    Rgb8::new(
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    )
}

/// Classic 256-position RGB color wheel (red -> blue -> green thirds).
pub fn color_wheel(pos: u8) -> Rgb8 {
    match pos {
        0..=84 => Rgb8::new(pos * 3, 255 - pos * 3, 0),
        85..=169 => {
            let p = pos - 85;
            Rgb8::new(255 - p * 3, 0, p * 3)
        }
        _ => {
            let p = pos - 170;
            Rgb8::new(0, p * 3, 255 - p * 3)
        }
    }
}

/// Rainbow palette entry at an 8-bit index with an 8-bit brightness.
pub fn rainbow(index: u8, brightness: u8) -> Rgb8 {
    hsv_to_rgb(index, 255, brightness)
}

/// One stop of a gradient palette: 8-bit position plus color.
#[derive(Clone, Copy, Debug)]
pub struct PaletteStop {
    pub pos: u8,
    pub color: Rgb8,
}

/// Black-body heat ramp used by the waving-cell effect.
pub const HEAT_PALETTE: [PaletteStop; 6] = [
    PaletteStop {
        pos: 0,
        color: Rgb8::new(0, 0, 0),
    },
    PaletteStop {
        pos: 48,
        color: Rgb8::new(48, 0, 0),
    },
    PaletteStop {
        pos: 96,
        color: Rgb8::new(128, 16, 0),
    },
    PaletteStop {
        pos: 160,
        color: Rgb8::new(255, 80, 0),
    },
    PaletteStop {
        pos: 224,
        color: Rgb8::new(255, 200, 0),
    },
    PaletteStop {
        pos: 255,
        color: Rgb8::new(255, 255, 255),
    },
];

/// Linear interpolation between the surrounding stops of a gradient palette.
pub fn gradient_lookup(stops: &[PaletteStop], index: u8) -> Rgb8 {
    let Some(first) = stops.first() else {
        return Rgb8::BLACK;
    };
    let mut lower = *first;
    let mut upper = *stops.last().unwrap_or(first);

    for stop in stops {
        if stop.pos <= index {
            lower = *stop;
        }
        if stop.pos >= index {
            upper = *stop;
            break;
        }
    }

    if lower.pos == upper.pos {
        return lower.color;
    }

    let range = f64::from(upper.pos) - f64::from(lower.pos);
    let t = (f64::from(index) - f64::from(lower.pos)) / range;
    let lerp = |a: u8, b: u8| -> u8 {
        (f64::from(a) + (f64::from(b) - f64::from(a)) * t)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Rgb8::new(
        lerp(lower.color.r, upper.color.r),
        lerp(lower.color.g, upper.color.g),
        lerp(lower.color.b, upper.color.b),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsv_primaries() {
        assert_eq!(hsv_deg_to_rgb(0.0, 1.0, 1.0), Rgb8::new(255, 0, 0));
        assert_eq!(hsv_deg_to_rgb(120.0, 1.0, 1.0), Rgb8::new(0, 255, 0));
        assert_eq!(hsv_deg_to_rgb(240.0, 1.0, 1.0), Rgb8::new(0, 0, 255));
    }

    #[test]
    fn hsv_wraps_hue() {
        assert_eq!(hsv_deg_to_rgb(360.0, 1.0, 1.0), hsv_deg_to_rgb(0.0, 1.0, 1.0));
        assert_eq!(
            hsv_deg_to_rgb(-120.0, 1.0, 1.0),
            hsv_deg_to_rgb(240.0, 1.0, 1.0)
        );
    }

    #[test]
    fn hsv_zero_saturation_is_gray() {
        let c = hsv_deg_to_rgb(200.0, 0.0, 0.5);
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);
    }

    #[test]
    fn wheel_endpoints() {
        assert_eq!(color_wheel(0), Rgb8::new(0, 255, 0));
        assert_eq!(color_wheel(85), Rgb8::new(255, 0, 0));
        assert_eq!(color_wheel(170), Rgb8::new(0, 0, 255));
    }

    #[test]
    fn gradient_hits_exact_stops() {
        assert_eq!(gradient_lookup(&HEAT_PALETTE, 0), Rgb8::BLACK);
        assert_eq!(gradient_lookup(&HEAT_PALETTE, 255), Rgb8::WHITE);
        assert_eq!(gradient_lookup(&HEAT_PALETTE, 160), Rgb8::new(255, 80, 0));
    }

    #[test]
    fn gradient_interpolates_between_stops() {
        // Midway between (0,0,0) at 0 and (48,0,0) at 48.
        assert_eq!(gradient_lookup(&HEAT_PALETTE, 24), Rgb8::new(24, 0, 0));
    }
}
