//! Synthesis engine, preview and container modules

pub mod decoder;
pub mod dsp;
pub mod error;
pub mod mapping;
pub mod synth;
pub mod visualization;
pub mod wav;
pub mod waveform;

pub use decoder::{load_pixel_field, PixelField, ResizePolicy};
pub use error::{Result, SonifyError};
pub use mapping::SpectralMapper;
pub use synth::{convert, synthesize, AudioSynthesizer, CancellationToken};
pub use waveform::Waveform;
