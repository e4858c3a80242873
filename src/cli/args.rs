//! Command-line arguments and their mapping onto a synthesis config

use std::path::PathBuf;

use clap::Parser;

use crate::config::{DynamicRangePreset, SynthConfig, SynthConfigBuilder};
use crate::core::{ResizePolicy, Result, SonifyError};

#[derive(Parser, Debug, Default)]
#[command(name = "spectroglyph")]
#[command(version, about = "Turn images into sound: columns become time, rows become frequency")]
pub struct Args {
    /// Input image or directory of images
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory for WAV and PNG files
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// JSON config file (defaults to the per-user config if present)
    #[arg(short, long, env = "SPECTROGLYPH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Sample rate in Hz
    #[arg(short = 'r', long, env = "SPECTROGLYPH_SAMPLE_RATE")]
    pub sample_rate: Option<u32>,

    /// Bit depth (8, 16, 24 or 32)
    #[arg(short, long, env = "SPECTROGLYPH_BIT_DEPTH")]
    pub bit_depth: Option<u16>,

    /// Duration in seconds
    #[arg(short, long)]
    pub duration: Option<f64>,

    /// Brightness threshold (0-255); darker pixels stay silent
    #[arg(short, long)]
    pub threshold: Option<u8>,

    /// Frequency of the bottom row in Hz
    #[arg(long)]
    pub base_frequency: Option<f64>,

    /// Shift every row by this many Hz (may be negative)
    #[arg(short = 's', long, allow_hyphen_values = true)]
    pub shift: Option<f64>,

    /// Enable dB-range normalisation with this range in dB
    #[arg(long, conflicts_with = "preset")]
    pub dynamic_range: Option<f64>,

    /// Dynamic range preset (smooth, balanced, high-contrast, extreme)
    #[arg(long)]
    pub preset: Option<String>,

    /// Force linear peak normalisation even if the config enables dB range
    #[arg(long, conflicts_with_all = ["dynamic_range", "preset"])]
    pub linear: bool,

    /// FFT size the preview height is derived from
    #[arg(long)]
    pub fft_size: Option<usize>,

    /// Write a preview PNG next to each WAV
    #[arg(short, long)]
    pub preview: bool,

    /// Preview width in pixels (clamped to 800 and the image width)
    #[arg(long)]
    pub preview_width: Option<usize>,

    /// Write an STFT spectrogram PNG of the rendered audio
    #[arg(long)]
    pub spectrogram: bool,

    /// Do not shrink oversized images
    #[arg(long)]
    pub keep_size: bool,

    /// Print a JSON summary per file
    #[arg(long)]
    pub json: bool,

    /// Print the header of an existing WAV file and exit
    #[arg(long, value_name = "WAV")]
    pub inspect: Option<PathBuf>,

    /// List dynamic range presets and exit
    #[arg(long)]
    pub list_presets: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Layer the command-line overrides on top of `base`.
    pub fn apply(&self, base: SynthConfig) -> Result<SynthConfig> {
        let mut builder = SynthConfigBuilder::from_config(base);

        if let Some(rate) = self.sample_rate {
            builder = builder.sample_rate(rate);
        }
        if let Some(bits) = self.bit_depth {
            builder = builder.bit_depth(bits);
        }
        if let Some(duration) = self.duration {
            builder = builder.duration(duration);
        }
        if let Some(threshold) = self.threshold {
            builder = builder.brightness_threshold(threshold);
        }
        if let Some(base) = self.base_frequency {
            builder = builder.base_frequency(base);
        }
        if let Some(shift) = self.shift {
            builder = builder.frequency_shift(shift);
        }
        if let Some(fft_size) = self.fft_size {
            builder = builder.fft_size(fft_size);
        }
        if let Some(name) = &self.preset {
            let preset = DynamicRangePreset::from_name(name).ok_or_else(|| {
                SonifyError::invalid("preset", format!("unknown dynamic range preset '{}'", name))
            })?;
            builder = builder.dynamic_range_preset(preset);
        }
        if let Some(db) = self.dynamic_range {
            builder = builder.dynamic_range(db);
        }
        if self.linear {
            builder = builder.linear();
        }

        builder.build()
    }

    pub fn resize_policy(&self) -> ResizePolicy {
        if self.keep_size {
            ResizePolicy::Keep
        } else {
            ResizePolicy::FitOversized
        }
    }
}
