// src/core/mapping.rs
//
// Pixel geometry -> frequency, time window and amplitude.
// The preview and the synthesizer both go through here so they agree on
// which row sounds at which pitch and which pixels are audible.

use std::ops::Range;

use crate::config::SynthConfig;

/// Mean of the three channels, 0-255, no gamma correction
pub fn brightness(rgb: [u8; 3]) -> f64 {
    (rgb[0] as f64 + rgb[1] as f64 + rgb[2] as f64) / 3.0
}

/// Maps image coordinates into the time-frequency plane for one conversion
#[derive(Debug, Clone, Copy)]
pub struct SpectralMapper<'a> {
    config: &'a SynthConfig,
    width: usize,
    height: usize,
}

impl<'a> SpectralMapper<'a> {
    pub fn new(config: &'a SynthConfig, width: usize, height: usize) -> Self {
        Self {
            config,
            width,
            height,
        }
    }

    pub fn config(&self) -> &SynthConfig {
        self.config
    }

    /// Frequency spacing between adjacent rows
    pub fn frequency_step(&self) -> f64 {
        self.config.frequency_span() / self.height as f64
    }

    /// Frequency of row `y`. Row 0 (top) is the highest, the last row sits at
    /// `base_frequency + frequency_shift`.
    pub fn frequency(&self, y: usize) -> f64 {
        let base = self.config.base_frequency + self.config.frequency_shift;
        base + (self.height - 1 - y) as f64 * self.frequency_step()
    }

    /// Upper edge of the frequency axis, ignoring the shift
    pub fn max_frequency(&self) -> f64 {
        self.config.base_frequency + self.config.frequency_span()
    }

    /// Seconds covered by each column
    pub fn column_duration(&self) -> f64 {
        self.config.duration / self.width as f64
    }

    /// Start and end time of column `x`, in seconds
    pub fn time_window(&self, x: usize) -> (f64, f64) {
        let per_column = self.column_duration();
        (x as f64 * per_column, (x + 1) as f64 * per_column)
    }

    /// Sample index of the boundary before column `x`, clamped to the
    /// waveform length. Boundary `width` is the end of the last column.
    fn boundary(&self, x: usize, total_samples: usize) -> usize {
        let t = x as f64 * self.column_duration();
        let index = (t * self.config.sample_rate as f64).floor();
        (index.max(0.0) as usize).min(total_samples)
    }

    /// Half-open sample range written by column `x`
    pub fn sample_range(&self, x: usize, total_samples: usize) -> Range<usize> {
        let start = self.boundary(x, total_samples);
        let end = self.boundary(x + 1, total_samples);
        start..end.max(start)
    }

    /// Amplitude of a pixel, or `None` if it is below the brightness threshold
    pub fn amplitude(&self, rgb: [u8; 3]) -> Option<f64> {
        let level = brightness(rgb);
        if level >= self.config.brightness_threshold as f64 {
            Some(level / 255.0)
        } else {
            None
        }
    }
}
