// src/core/visualization/spectrogram.rs
//
// STFT spectrogram of a rendered waveform, for checking the audio against
// the preview.

use image::RgbImage;
use num_complex::Complex;
use rustfft::FftPlanner;
use std::f32::consts::PI;

use super::colormap::ColorGradient;
use crate::core::error::{Result, SonifyError};
use crate::core::waveform::Waveform;

/// Spectrogram configuration
#[derive(Debug, Clone)]
pub struct SpectrogramConfig {
    pub width: u32,
    pub height: u32,
    pub fft_size: usize,
    pub hop_size: usize,
    pub min_db: f32,
    pub max_db: f32,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            fft_size: 2048,
            hop_size: 512,
            min_db: -90.0,
            max_db: 0.0,
        }
    }
}

/// Magnitudes in dB, indexed `[bin][frame]`
pub fn stft_db(samples: &[f32], config: &SpectrogramConfig) -> Result<Vec<Vec<f32>>> {
    if config.fft_size < 2 || config.hop_size == 0 {
        return Err(SonifyError::invalid(
            "fftSize",
            "FFT size must be at least 2 and hop size positive",
        ));
    }
    if samples.len() < config.fft_size {
        return Err(SonifyError::invalid(
            "fftSize",
            format!(
                "waveform has {} samples, fewer than one {}-point frame",
                samples.len(),
                config.fft_size
            ),
        ));
    }

    let num_frames = (samples.len() - config.fft_size) / config.hop_size + 1;
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(config.fft_size);

    let window: Vec<f32> = (0..config.fft_size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / config.fft_size as f32).cos()))
        .collect();
    // Hann window coherent gain, so a full-scale sine reads close to 0 dB
    let norm = config.fft_size as f32 / 4.0;

    let freq_bins = config.fft_size / 2;
    let mut spectrogram = vec![vec![config.min_db; num_frames]; freq_bins];

    let mut buffer = vec![Complex::new(0.0f32, 0.0); config.fft_size];
    for frame in 0..num_frames {
        let start = frame * config.hop_size;
        for (i, slot) in buffer.iter_mut().enumerate() {
            *slot = Complex::new(samples[start + i] * window[i], 0.0);
        }

        fft.process(&mut buffer);

        for (bin, value) in buffer.iter().take(freq_bins).enumerate() {
            let magnitude = value.norm() / norm;
            let db = if magnitude > 1e-10 {
                20.0 * magnitude.log10()
            } else {
                config.min_db
            };
            spectrogram[bin][frame] = db.clamp(config.min_db, config.max_db);
        }
    }

    Ok(spectrogram)
}

/// Render a linear-frequency spectrogram image, low frequencies at the bottom.
pub fn render_spectrogram(
    waveform: &Waveform,
    config: &SpectrogramConfig,
    gradient: &ColorGradient,
) -> Result<RgbImage> {
    let spectrogram = stft_db(waveform.samples(), config)?;
    let freq_bins = spectrogram.len();
    let num_frames = spectrogram[0].len();

    let mut img = RgbImage::new(config.width, config.height);
    let x_scale = num_frames as f32 / config.width as f32;
    let y_scale = freq_bins as f32 / config.height as f32;
    let range = config.max_db - config.min_db;

    for y in 0..config.height {
        let bin = (((config.height - 1 - y) as f32 * y_scale) as usize).min(freq_bins - 1);
        for x in 0..config.width {
            let frame = ((x as f32 * x_scale) as usize).min(num_frames - 1);
            let normalized = (spectrogram[bin][frame] - config.min_db) / range;
            img.put_pixel(x, y, gradient.rgb_at(normalized as f64));
        }
    }

    log::debug!(
        "Spectrogram: {} frames x {} bins -> {}x{}",
        num_frames,
        freq_bins,
        config.width,
        config.height
    );
    Ok(img)
}

/// Bin holding the most energy in `frame`, converted to Hz
pub fn dominant_frequency(spectrogram: &[Vec<f32>], frame: usize, sample_rate: u32, fft_size: usize) -> f32 {
    let bin = spectrogram
        .iter()
        .enumerate()
        .max_by(|a, b| a.1[frame].total_cmp(&b.1[frame]))
        .map(|(bin, _)| bin)
        .unwrap_or(0);
    bin as f32 * sample_rate as f32 / fft_size as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freq: f32, sample_rate: u32, len: usize) -> Waveform {
        let samples = (0..len)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate as f32).sin() * 0.8)
            .collect();
        Waveform::from_samples(samples, sample_rate)
    }

    #[test]
    fn test_too_short_is_error() {
        let wave = Waveform::silent(100, 8000);
        let err = render_spectrogram(&wave, &SpectrogramConfig::default(), &ColorGradient::inferno());
        assert!(matches!(err, Err(SonifyError::InvalidConfig { .. })));
    }

    #[test]
    fn test_tone_peak_bin() {
        let config = SpectrogramConfig {
            fft_size: 1024,
            hop_size: 256,
            ..Default::default()
        };
        let wave = tone(1000.0, 8000, 8000);
        let spec = stft_db(wave.samples(), &config).unwrap();
        let peak = dominant_frequency(&spec, 3, 8000, 1024);
        assert!((peak - 1000.0).abs() <= 8000.0 / 1024.0);
        // Windowed full-scale-ish tone reads a few dB under 0
        assert!(spec[128][3] > -6.0);
    }

    #[test]
    fn test_image_size_and_silence_color() {
        let config = SpectrogramConfig {
            width: 40,
            height: 20,
            fft_size: 256,
            hop_size: 128,
            ..Default::default()
        };
        let gradient = ColorGradient::inferno();
        let img = render_spectrogram(&Waveform::silent(4000, 8000), &config, &gradient).unwrap();
        assert_eq!(img.dimensions(), (40, 20));
        assert_eq!(img.get_pixel(5, 5).0, gradient.color_at(0.0));
    }
}
