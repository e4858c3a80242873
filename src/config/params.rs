// src/config/params.rs
//
// Synthesis parameters, presets and layered loading

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SonifyError};

/// Lowest frequency span allowed, in Hz
pub const MIN_FREQUENCY_SPAN: f64 = 20.0;

/// Largest PCM data chunk that still fits a 32-bit RIFF size field
pub const MAX_DATA_LEN: u64 = u32::MAX as u64 - 36;

/// Supported PCM sample widths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum BitDepth {
    Eight,
    Sixteen,
    TwentyFour,
    ThirtyTwo,
}

impl BitDepth {
    pub fn bits(&self) -> u16 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
            BitDepth::TwentyFour => 24,
            BitDepth::ThirtyTwo => 32,
        }
    }

    pub fn bytes_per_sample(&self) -> usize {
        self.bits() as usize / 8
    }
}

impl TryFrom<u16> for BitDepth {
    type Error = SonifyError;

    fn try_from(bits: u16) -> Result<Self> {
        match bits {
            8 => Ok(BitDepth::Eight),
            16 => Ok(BitDepth::Sixteen),
            24 => Ok(BitDepth::TwentyFour),
            32 => Ok(BitDepth::ThirtyTwo),
            other => Err(SonifyError::UnsupportedBitDepth(other)),
        }
    }
}

impl From<BitDepth> for u16 {
    fn from(depth: BitDepth) -> u16 {
        depth.bits()
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// Named dynamic range settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DynamicRangePreset {
    /// Little variation, suits images with smooth tones
    Smooth,
    /// Natural dynamics, good for most images
    Balanced,
    /// Sharp contrast for crisp black and white images
    HighContrast,
    /// Overemphasises small brightness variations
    Extreme,
}

impl DynamicRangePreset {
    pub fn db(&self) -> f64 {
        match self {
            DynamicRangePreset::Smooth => 12.0,
            DynamicRangePreset::Balanced => 24.0,
            DynamicRangePreset::HighContrast => 40.0,
            DynamicRangePreset::Extreme => 60.0,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "smooth" => Some(Self::Smooth),
            "balanced" => Some(Self::Balanced),
            "high-contrast" | "highcontrast" | "contrast" => Some(Self::HighContrast),
            "extreme" => Some(Self::Extreme),
            _ => None,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::Smooth, Self::Balanced, Self::HighContrast, Self::Extreme]
    }

    pub fn description(&self) -> &'static str {
        match self {
            DynamicRangePreset::Smooth => "uniform level, little variation",
            DynamicRangePreset::Balanced => "natural dynamics",
            DynamicRangePreset::HighContrast => "sharp contrast",
            DynamicRangePreset::Extreme => "exaggerates small differences",
        }
    }
}

/// Parameters for a single image-to-audio conversion.
///
/// A conversion takes its own copy; nothing here is shared between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SynthConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    pub bit_depth: BitDepth,
    /// Length of the rendered audio in seconds
    pub duration: f64,
    /// Pixels darker than this (mean of R, G, B) stay silent
    pub brightness_threshold: u8,
    /// Frequency of the bottom image row, in Hz
    pub base_frequency: f64,
    /// Offset added to every row frequency, in Hz (may be negative)
    pub frequency_shift: f64,
    pub use_dynamic_range: bool,
    /// Dynamic range in dB used when `use_dynamic_range` is set
    pub dynamic_range_db: f64,
    /// FFT size the preview height is derived from
    pub fft_size: usize,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            bit_depth: BitDepth::Sixteen,
            duration: 5.0,
            brightness_threshold: 50,
            base_frequency: 20.0,
            frequency_shift: 0.0,
            use_dynamic_range: false,
            dynamic_range_db: DynamicRangePreset::Balanced.db(),
            fft_size: 512,
        }
    }
}

impl SynthConfig {
    pub fn builder() -> SynthConfigBuilder {
        SynthConfigBuilder::new()
    }

    /// Width of the frequency band the image rows are spread over
    pub fn frequency_span(&self) -> f64 {
        (self.sample_rate as f64 / 2.0 - self.base_frequency).max(MIN_FREQUENCY_SPAN)
    }

    /// Number of samples a conversion produces
    pub fn total_samples(&self) -> usize {
        (self.sample_rate as f64 * self.duration).floor() as usize
    }

    /// Reject anything that cannot produce a well-formed result.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(SonifyError::invalid("sampleRate", "must be positive"));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(SonifyError::invalid(
                "duration",
                format!("must be a positive number of seconds, got {}", self.duration),
            ));
        }
        if self.fft_size == 0 {
            return Err(SonifyError::invalid("fftSize", "must be positive"));
        }
        if !self.base_frequency.is_finite() || self.base_frequency < 0.0 {
            return Err(SonifyError::invalid(
                "baseFrequency",
                format!("must be >= 0 Hz, got {}", self.base_frequency),
            ));
        }
        if !self.frequency_shift.is_finite() {
            return Err(SonifyError::invalid("frequencyShift", "must be finite"));
        }
        if !self.dynamic_range_db.is_finite() || self.dynamic_range_db <= 0.0 {
            return Err(SonifyError::invalid(
                "dynamicRangeDb",
                format!("must be positive, got {}", self.dynamic_range_db),
            ));
        }

        // The RIFF header stores byte rate and data size as u32
        let bytes_per_sample = self.bit_depth.bytes_per_sample() as u64;
        if self.sample_rate as u64 * bytes_per_sample > u32::MAX as u64 {
            return Err(SonifyError::invalid(
                "sampleRate",
                format!("{} Hz at {} overflows the 32-bit byte rate", self.sample_rate, self.bit_depth),
            ));
        }
        let data_len = (self.sample_rate as f64 * self.duration).floor() * bytes_per_sample as f64;
        if data_len > MAX_DATA_LEN as f64 {
            return Err(SonifyError::invalid(
                "duration",
                format!(
                    "{}s at {} Hz needs {} bytes of audio, more than a WAV file can hold",
                    self.duration, self.sample_rate, data_len
                ),
            ));
        }
        Ok(())
    }

    /// Load a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SynthConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Location of the per-user config file, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("spectroglyph").join("config.json"))
    }

    /// Explicit file if given, else the per-user file if it exists, else defaults.
    pub fn load_layered(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            log::debug!("Loading config from {}", path.display());
            return Self::from_json_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                log::debug!("Loading user config from {}", path.display());
                Self::from_json_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// Fluent builder for [`SynthConfig`]
pub struct SynthConfigBuilder {
    config: SynthConfig,
    bit_depth: Option<u16>,
}

impl SynthConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SynthConfig::default(),
            bit_depth: None,
        }
    }

    pub fn from_config(config: SynthConfig) -> Self {
        Self {
            config,
            bit_depth: None,
        }
    }

    pub fn sample_rate(mut self, rate: u32) -> Self {
        self.config.sample_rate = rate;
        self
    }

    /// Checked in `build`
    pub fn bit_depth(mut self, bits: u16) -> Self {
        self.bit_depth = Some(bits);
        self
    }

    pub fn duration(mut self, seconds: f64) -> Self {
        self.config.duration = seconds;
        self
    }

    pub fn brightness_threshold(mut self, threshold: u8) -> Self {
        self.config.brightness_threshold = threshold;
        self
    }

    pub fn base_frequency(mut self, hz: f64) -> Self {
        self.config.base_frequency = hz;
        self
    }

    pub fn frequency_shift(mut self, hz: f64) -> Self {
        self.config.frequency_shift = hz;
        self
    }

    /// Enables dB-range normalisation with the given range
    pub fn dynamic_range(mut self, db: f64) -> Self {
        self.config.use_dynamic_range = true;
        self.config.dynamic_range_db = db;
        self
    }

    pub fn dynamic_range_preset(self, preset: DynamicRangePreset) -> Self {
        self.dynamic_range(preset.db())
    }

    pub fn linear(mut self) -> Self {
        self.config.use_dynamic_range = false;
        self
    }

    pub fn fft_size(mut self, size: usize) -> Self {
        self.config.fft_size = size;
        self
    }

    pub fn build(mut self) -> Result<SynthConfig> {
        if let Some(bits) = self.bit_depth {
            self.config.bit_depth = BitDepth::try_from(bits)?;
        }
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for SynthConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_span() {
        let config = SynthConfig::default();
        assert!((config.frequency_span() - 22030.0).abs() < 1e-9);

        // Base above Nyquist falls back to the floor
        let config = SynthConfig {
            sample_rate: 100,
            base_frequency: 60.0,
            ..Default::default()
        };
        assert_eq!(config.frequency_span(), MIN_FREQUENCY_SPAN);
    }

    #[test]
    fn test_total_samples() {
        let config = SynthConfig {
            sample_rate: 8000,
            duration: 1.25,
            ..Default::default()
        };
        assert_eq!(config.total_samples(), 10000);
    }

    #[test]
    fn test_bit_depth_conversion() {
        assert_eq!(BitDepth::try_from(24).unwrap(), BitDepth::TwentyFour);
        assert!(matches!(
            BitDepth::try_from(12),
            Err(SonifyError::UnsupportedBitDepth(12))
        ));
        assert_eq!(BitDepth::ThirtyTwo.bytes_per_sample(), 4);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let bad = [
            SynthConfig { sample_rate: 0, ..Default::default() },
            SynthConfig { duration: 0.0, ..Default::default() },
            SynthConfig { duration: f64::NAN, ..Default::default() },
            SynthConfig { fft_size: 0, ..Default::default() },
            SynthConfig { dynamic_range_db: 0.0, ..Default::default() },
            SynthConfig { base_frequency: -1.0, ..Default::default() },
        ];
        for config in &bad {
            assert!(matches!(
                config.validate(),
                Err(SonifyError::InvalidConfig { .. })
            ));
        }
        assert!(SynthConfig::default().validate().is_ok());
    }

    fn rejected_field(config: &SynthConfig) -> Option<&'static str> {
        match config.validate() {
            Err(SonifyError::InvalidConfig { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn test_validation_rejects_unrepresentable_length() {
        let endless = SynthConfig {
            duration: 1e15,
            ..Default::default()
        };
        assert_eq!(rejected_field(&endless), Some("duration"));

        // 48 kHz * 4 bytes * 30000 s is about 5.8 GB of data
        let long = SynthConfig {
            sample_rate: 48000,
            bit_depth: BitDepth::ThirtyTwo,
            duration: 30000.0,
            ..Default::default()
        };
        assert_eq!(rejected_field(&long), Some("duration"));

        let hour = SynthConfig {
            sample_rate: 48000,
            duration: 3600.0,
            ..Default::default()
        };
        assert!(hour.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_byte_rate_overflow() {
        let config = SynthConfig {
            sample_rate: 1_500_000_000,
            bit_depth: BitDepth::ThirtyTwo,
            duration: 1e-9,
            ..Default::default()
        };
        assert_eq!(rejected_field(&config), Some("sampleRate"));

        let eight_bit = SynthConfig {
            bit_depth: BitDepth::Eight,
            ..config
        };
        assert!(eight_bit.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = SynthConfig::builder()
            .sample_rate(48000)
            .bit_depth(24)
            .duration(2.0)
            .brightness_threshold(10)
            .frequency_shift(-100.0)
            .dynamic_range_preset(DynamicRangePreset::HighContrast)
            .build()
            .unwrap();

        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.bit_depth, BitDepth::TwentyFour);
        assert!(config.use_dynamic_range);
        assert_eq!(config.dynamic_range_db, 40.0);

        assert!(SynthConfig::builder().bit_depth(12).build().is_err());
    }

    #[test]
    fn test_json_partial_and_bad_depth() {
        let config = SynthConfig::from_json_str(r#"{"sampleRate": 8000, "bitDepth": 8}"#).unwrap();
        assert_eq!(config.sample_rate, 8000);
        assert_eq!(config.bit_depth, BitDepth::Eight);
        assert_eq!(config.fft_size, 512);

        assert!(SynthConfig::from_json_str(r#"{"bitDepth": 12}"#).is_err());
        assert!(SynthConfig::from_json_str(r#"{"duration": -1}"#).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = SynthConfig::builder().dynamic_range(30.0).build().unwrap();
        let json = config.to_json().unwrap();
        assert!(json.contains("\"bitDepth\": 16"));
        assert_eq!(SynthConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(DynamicRangePreset::from_name("Balanced"), Some(DynamicRangePreset::Balanced));
        assert_eq!(DynamicRangePreset::from_name("high-contrast"), Some(DynamicRangePreset::HighContrast));
        assert_eq!(DynamicRangePreset::from_name("loud"), None);
    }
}
