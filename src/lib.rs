//! Spectroglyph - turn images into sound
//!
//! Each image column becomes a slice of time and each row a sine partial,
//! with the top row at the highest pitch. Pixel brightness sets the partial's
//! amplitude, so a bright shape drawn on a dark background shows up again
//! when the resulting audio is viewed in a spectrogram.
//!
//! ## Module Structure
//!
//! - `core` - pixel mapping, additive synthesis, normalisation, WAV encoding
//!   and the preview / spectrogram renderers
//! - `config` - synthesis parameters, presets and layered config loading
//! - `cli` - command-line interface
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use spectroglyph::{convert, load_pixel_field, ResizePolicy, SynthConfig};
//!
//! let field = load_pixel_field(path, ResizePolicy::FitOversized)?;
//! let config = SynthConfig::builder().duration(3.0).bit_depth(24).build()?;
//! let wav_bytes = convert(&field, &config)?;
//! std::fs::write("out.wav", wav_bytes)?;
//! ```
//!
//! ## Level Modes
//!
//! | Mode          | Peak                 | Quiet samples               |
//! |---------------|----------------------|-----------------------------|
//! | Linear        | 0.8                  | scaled with everything else |
//! | Dynamic range | 10^(range/20)        | held at or above 1/peak     |
//!
//! Dynamic range mode deliberately drives the peak past full scale, so the
//! encoder clips the loudest passages.

// Synthesis engine and renderers
pub mod core;

// Command-line interface
pub mod cli;

// Synthesis parameters
pub mod config;

pub use config::{BitDepth, DynamicRangePreset, SynthConfig, SynthConfigBuilder};
pub use crate::core::dsp::normalize;
pub use crate::core::visualization::{
    render_preview, render_spectrogram, ColorGradient, PreviewRaster, PreviewRenderer,
    SpectrogramConfig,
};
pub use crate::core::wav::{read_header, WavHeader};
pub use crate::core::{
    convert, load_pixel_field, synthesize, AudioSynthesizer, CancellationToken, PixelField,
    ResizePolicy, Result, SonifyError, SpectralMapper, Waveform,
};
