//! Level and decibel utilities

use crate::config::SynthConfig;
use crate::core::waveform::Waveform;

/// Peak level after linear normalisation
pub const LINEAR_PEAK: f64 = 0.8;

/// Floor used before taking a logarithm of an amplitude
pub const MIN_AMPLITUDE: f64 = 1e-6;

/// Decibels to linear amplitude ratio
pub fn db_to_amplitude(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

/// Amplitude to decibels, floored at `MIN_AMPLITUDE`
pub fn amplitude_to_db(amplitude: f64) -> f64 {
    20.0 * amplitude.max(MIN_AMPLITUDE).log10()
}

/// Map an intensity in (0, 1] onto [0, 1] through a `range_db` window:
/// 0 dB maps to 1, `-range_db` and below map to 0.
pub fn db_window(intensity: f64, range_db: f64) -> f64 {
    let min_db = -range_db;
    let db = amplitude_to_db(intensity).clamp(min_db, 0.0);
    (db - min_db) / range_db
}

/// Scale factors derived for one normalisation pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gain {
    /// Silent input, nothing to do
    Unity,
    /// Multiply every sample
    Linear { scale: f64 },
    /// Multiply, then hold non-zero magnitudes at or above `floor`
    Floored { scale: f64, floor: f64 },
}

impl Gain {
    /// Work out the gain for a waveform whose largest magnitude is `peak`
    pub fn for_peak(peak: f64, config: &SynthConfig) -> Self {
        if peak == 0.0 {
            return Gain::Unity;
        }
        if config.use_dynamic_range {
            let scale = db_to_amplitude(config.dynamic_range_db) / peak;
            let floor = scale * db_to_amplitude(-config.dynamic_range_db);
            Gain::Floored { scale, floor }
        } else {
            Gain::Linear {
                scale: LINEAR_PEAK / peak,
            }
        }
    }

    /// Apply to a buffer in place
    pub fn apply(&self, samples: &mut [f32]) {
        match *self {
            Gain::Unity => {}
            Gain::Linear { scale } => {
                for s in samples.iter_mut() {
                    *s = (*s as f64 * scale) as f32;
                }
            }
            Gain::Floored { scale, floor } => {
                for s in samples.iter_mut() {
                    // Exact zeros have no sign and stay zero
                    if *s == 0.0 {
                        continue;
                    }
                    let magnitude = (s.abs() as f64 * scale).max(floor);
                    *s = (magnitude as f32).copysign(*s);
                }
            }
        }
    }
}

/// Normalise a waveform in place according to the config's level mode.
///
/// Linear mode brings the peak to 0.8. Dynamic range mode boosts the peak to
/// `10^(range/20)` and lifts every non-zero sample to at least `1/peak`.
pub fn normalize(waveform: &mut Waveform, config: &SynthConfig) -> Gain {
    let peak = waveform.peak() as f64;
    let gain = Gain::for_peak(peak, config);
    log::debug!("Normalising {} samples, peak {:.4}: {:?}", waveform.len(), peak, gain);
    gain.apply(waveform.samples_mut());
    gain
}
