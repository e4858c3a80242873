//! Configuration module for Spectroglyph

mod params;

pub use params::{
    BitDepth, DynamicRangePreset, SynthConfig, SynthConfigBuilder, MAX_DATA_LEN,
    MIN_FREQUENCY_SPAN,
};
