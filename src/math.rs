//! Fixed-point wave helpers in the FastLED tradition plus Perlin noise.
//! These back every oscillator-driven animation; all time-based functions
//! take wall-clock milliseconds so motion speed is frame-rate independent.

use std::f64::consts::PI;

/// Sine for an 8-bit phase: 0..=255 maps to one full turn, output 0..=255.
pub fn sin8(theta: u8) -> u8 {
    let radians = f64::from(theta) / 255.0 * 2.0 * PI;
    (((radians.sin() + 1.0) / 2.0) * 255.0).round() as u8
}

/// Cosine counterpart of [`sin8`].
pub fn cos8(theta: u8) -> u8 {
    let radians = f64::from(theta) / 255.0 * 2.0 * PI;
    (((radians.cos() + 1.0) / 2.0) * 255.0).round() as u8
}

/// [`sin8`] with a fractional phase, for oscillators whose phase terms are
/// themselves continuous. The phase wraps modulo 256; output is 0..=255.
pub fn sin8f(theta: f64) -> f64 {
    let radians = theta.rem_euclid(256.0) / 255.0 * 2.0 * PI;
    ((radians.sin() + 1.0) / 2.0) * 255.0
}

/// Cosine counterpart of [`sin8f`].
pub fn cos8f(theta: f64) -> f64 {
    let radians = theta.rem_euclid(256.0) / 255.0 * 2.0 * PI;
    ((radians.cos() + 1.0) / 2.0) * 255.0
}

/// Bounded sine oscillator: an integer in `[low, high]` whose phase combines
/// wall-clock time, `bpm`, and `phase_offset` (0..=255 of a turn). Period is
/// `60_000 / bpm` milliseconds.
pub fn beatsin8(bpm: u16, low: i32, high: i32, time_ms: u64, phase_offset: u8) -> i32 {
    let beat =
        (time_ms as f64 * f64::from(bpm) / 60_000.0 + f64::from(phase_offset) / 256.0) % 1.0;
    let sine = (beat * 2.0 * PI).sin();
    let normalized = (sine + 1.0) / 2.0;
    let value = low + (normalized * f64::from(high - low)) as i32;
    value.clamp(low.min(high), high.max(low))
}

/// Linear remap of `value` from `[in_min, in_max]` to `[out_min, out_max]`
/// using integer arithmetic; collapsed input ranges return `out_min`.
pub fn map_range(value: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    if in_max == in_min {
        return out_min;
    }
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Improved Perlin noise over three dimensions, roughly in [-1, 1].
pub fn perlin3(x: f64, y: f64, z: f64) -> f64 {
    let xi = (x.floor() as i64 & PERM_MASK as i64) as usize;
    let yi = (y.floor() as i64 & PERM_MASK as i64) as usize;
    let zi = (z.floor() as i64 & PERM_MASK as i64) as usize;

    let xf = x - x.floor();
    let yf = y - y.floor();
    let zf = z - z.floor();

    let u = fade(xf);
    let v = fade(yf);
    let w = fade(zf);

    let p = &PERM;
    let aaa = p[p[p[xi] as usize + yi] as usize + zi];
    let aba = p[p[p[xi] as usize + ((yi + 1) & PERM_MASK)] as usize + zi];
    let aab = p[p[p[xi] as usize + yi] as usize + ((zi + 1) & PERM_MASK)];
    let abb = p[p[p[xi] as usize + ((yi + 1) & PERM_MASK)] as usize + ((zi + 1) & PERM_MASK)];
    let baa = p[p[p[(xi + 1) & PERM_MASK] as usize + yi] as usize + zi];
    let bba = p[p[p[(xi + 1) & PERM_MASK] as usize + ((yi + 1) & PERM_MASK)] as usize + zi];
    let bab = p[p[p[(xi + 1) & PERM_MASK] as usize + yi] as usize + ((zi + 1) & PERM_MASK)];
    let bbb = p[p[p[(xi + 1) & PERM_MASK] as usize + ((yi + 1) & PERM_MASK)] as usize
        + ((zi + 1) & PERM_MASK)];

    let x1 = lerp(grad(aaa, xf, yf, zf), grad(baa, xf - 1.0, yf, zf), u);
    let x2 = lerp(
        grad(aba, xf, yf - 1.0, zf),
        grad(bba, xf - 1.0, yf - 1.0, zf),
        u,
    );
    let y1 = lerp(x1, x2, v);

    let x3 = lerp(
        grad(aab, xf, yf, zf - 1.0),
        grad(bab, xf - 1.0, yf, zf - 1.0),
        u,
    );
    let x4 = lerp(
        grad(abb, xf, yf - 1.0, zf - 1.0),
        grad(bbb, xf - 1.0, yf - 1.0, zf - 1.0),
        u,
    );
    let y2 = lerp(x3, x4, v);

    lerp(y1, y2, w)
}

/// Perlin noise mapped to 0..=255, the form the animations consume.
pub fn inoise8_3d(x: f64, y: f64, z: f64) -> u8 {
    let n = perlin3(x / 64.0, y / 64.0, z / 64.0);
    (((n + 1.0) / 2.0) * 255.0).round().clamp(0.0, 255.0) as u8
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

fn grad(hash: u8, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    let uu = if h & 1 == 0 { u } else { -u };
    let vv = if h & 2 == 0 { v } else { -v };
    uu + vv
}

const PERM_MASK: usize = 255;

const PERM_BASE: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209,
    76, 132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198,
    173, 186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212,
    207, 206, 59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44,
    154, 163, 70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79,
    113, 224, 232, 178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12,
    191, 179, 162, 241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157,
    184, 84, 204, 176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29,
    24, 72, 243, 141, 128, 195, 78, 66, 215, 61, 156, 180,
];

static PERM: [u8; 512] = {
    let mut table = [0u8; 512];
    let mut i = 0;
    while i < 512 {
        table[i] = PERM_BASE[i & PERM_MASK];
        i += 1;
    }
    table
};
