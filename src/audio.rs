//! Banded audio-energy input for the audio-reactive animations.
//!
//! The capture subsystem itself is an external collaborator: this module
//! only defines the seam it plugs into plus a deterministic synthetic
//! fallback, so every animation stays visually defined without a live
//! source.

use crate::core::Nanos;
use crate::math::beatsin8;

pub const BAND_COUNT: usize = 16;

/// A source of 16-band energy samples, 0..=255 per band, sampled at the
/// current instant.
pub trait SpectrumSource: Send {
    fn sample(&mut self, now: Nanos) -> [u8; BAND_COUNT];
}

/// Hands out spectrum sources to animations as they start. Opening may fail
/// (no capture device); that is non-fatal and the animation falls back to
/// the synthetic waveform.
pub trait AudioProvider {
    fn open_spectrum(&mut self) -> Option<Box<dyn SpectrumSource>>;
}

/// Provider with no capture backend; every animation runs on the fallback.
pub struct NoAudio;

impl AudioProvider for NoAudio {
    fn open_spectrum(&mut self) -> Option<Box<dyn SpectrumSource>> {
        None
    }
}

/// Deterministic time-driven waveform: each band is a bounded sine at its
/// own tempo and phase, so bar effects keep moving in a recognizable way
/// when no microphone is present.
pub struct SyntheticSpectrum;

impl SpectrumSource for SyntheticSpectrum {
    fn sample(&mut self, now: Nanos) -> [u8; BAND_COUNT] {
        let ms = now.as_millis();
        let mut bands = [0u8; BAND_COUNT];
        for (i, band) in bands.iter_mut().enumerate() {
            let bpm = 22 + 7 * i as u16;
            let phase = (i as u8).wrapping_mul(41);
            // Low bands carry more energy, like real program material.
            let ceiling = 230 - 9 * i as i32;
            *band = beatsin8(bpm, 0, ceiling, ms, phase) as u8;
        }
        bands
    }
}

/// An animation's handle on its spectrum input. Owns the source for the
/// animation's lifetime (dropping the animation releases it), smooths
/// incoming bands with the `(old*3 + new) / 4` ratio the receiving effects
/// were tuned against, and derives a scalar loudness level.
pub struct SpectrumFeed {
    source: Box<dyn SpectrumSource>,
    smoothed: [u8; BAND_COUNT],
    raw: [u8; BAND_COUNT],
}

impl SpectrumFeed {
    /// Wrap a live source, or fall back to [`SyntheticSpectrum`].
    pub fn new(source: Option<Box<dyn SpectrumSource>>) -> Self {
        Self {
            source: source.unwrap_or_else(|| Box::new(SyntheticSpectrum)),
            smoothed: [0; BAND_COUNT],
            raw: [0; BAND_COUNT],
        }
    }

    /// Pull one sample and fold it into the smoothed bands. Called once per
    /// frame from `update`.
    pub fn refresh(&mut self, now: Nanos) {
        self.raw = self.source.sample(now);
        for (slot, inc) in self.smoothed.iter_mut().zip(self.raw) {
            *slot = ((u16::from(*slot) * 3 + u16::from(inc)) / 4) as u8;
        }
    }

    pub fn bands(&self) -> [u8; BAND_COUNT] {
        self.smoothed
    }

    pub fn band(&self, i: usize) -> u8 {
        self.smoothed.get(i).copied().unwrap_or(0)
    }

    /// Scalar loudness 0..=255: mean of the smoothed band energies.
    pub fn level(&self) -> u8 {
        let sum: u32 = self.smoothed.iter().map(|&b| u32::from(b)).sum();
        (sum / BAND_COUNT as u32) as u8
    }

    /// Unsmoothed loudness of the most recent sample, for spike detectors
    /// that run their own windowing.
    pub fn raw_level(&self) -> u8 {
        let sum: u32 = self.raw.iter().map(|&b| u32::from(b)).sum();
        (sum / BAND_COUNT as u32) as u8
    }
}
