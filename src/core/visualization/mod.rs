//! Visual renderings of the time/frequency mapping
//!
//! The preview shows where an image will place energy before any audio is
//! rendered; the spectrogram analyses the audio that was actually produced.

pub mod colormap;
pub mod preview;
pub mod spectrogram;

pub use colormap::{ColorGradient, INFERNO, INFERNO_LEN};
pub use preview::{render_preview, PreviewRaster, PreviewRenderer};
pub use spectrogram::{render_spectrogram, stft_db, SpectrogramConfig};
