// src/core/synth.rs
//
// Additive synthesis: every audible pixel adds one sine partial to the
// samples of its column.

use std::f64::consts::PI;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use super::decoder::PixelField;
use super::dsp;
use super::error::{Result, SonifyError};
use super::mapping::SpectralMapper;
use super::waveform::Waveform;
use super::wav;
use crate::config::SynthConfig;

/// Shared flag for stopping a synthesis run between columns
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// One sine component of a column
#[derive(Debug, Clone, Copy)]
struct Partial {
    frequency: f64,
    amplitude: f64,
}

/// Renders pixel fields into waveforms for a fixed config
pub struct AudioSynthesizer {
    config: SynthConfig,
    cancel: Option<CancellationToken>,
}

impl AudioSynthesizer {
    pub fn new(config: SynthConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: None,
        })
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|t| t.is_cancelled())
    }

    /// Raw additive synthesis, before normalisation.
    pub fn synthesize(&self, field: &PixelField) -> Result<Waveform> {
        let sample_rate = self.config.sample_rate;
        let total = self.config.total_samples();
        let mut waveform = Waveform::silent(total, sample_rate);

        if field.is_empty() || total == 0 {
            log::debug!("Empty pixel field, returning {} silent samples", total);
            return Ok(waveform);
        }

        let mapper = SpectralMapper::new(&self.config, field.width(), field.height());
        log::debug!(
            "Synthesizing {}x{} pixels into {} samples ({:.3}s per column, {:.2} Hz per row)",
            field.width(),
            field.height(),
            total,
            mapper.column_duration(),
            mapper.frequency_step()
        );

        // Columns own disjoint, ordered slices of the output
        let mut columns: Vec<(usize, usize, &mut [f32])> = Vec::with_capacity(field.width());
        let mut rest = waveform.samples_mut();
        let mut consumed = 0;
        for x in 0..field.width() {
            let range = mapper.sample_range(x, total);
            let (_, tail) = std::mem::take(&mut rest).split_at_mut(range.start - consumed);
            let (slice, tail) = tail.split_at_mut(range.len());
            columns.push((x, range.start, slice));
            rest = tail;
            consumed = range.end;
        }

        columns
            .into_par_iter()
            .try_for_each(|(x, start, slice)| -> Result<()> {
                if self.is_cancelled() {
                    return Err(SonifyError::Cancelled);
                }
                let partials = column_partials(field, &mapper, x);
                render_column(slice, start, sample_rate, &partials);
                Ok(())
            })?;

        Ok(waveform)
    }

    /// Synthesize and normalise
    pub fn render(&self, field: &PixelField) -> Result<Waveform> {
        let mut waveform = self.synthesize(field)?;
        dsp::normalize(&mut waveform, &self.config);
        Ok(waveform)
    }
}

fn column_partials(field: &PixelField, mapper: &SpectralMapper<'_>, x: usize) -> Vec<Partial> {
    (0..field.height())
        .filter_map(|y| {
            mapper.amplitude(field.pixel(x, y)).map(|amplitude| Partial {
                frequency: mapper.frequency(y),
                amplitude,
            })
        })
        .collect()
}

/// Add each partial into `slice`, which starts at absolute sample `start`.
/// Phase follows absolute time so partials line up across columns.
fn render_column(slice: &mut [f32], start: usize, sample_rate: u32, partials: &[Partial]) {
    let rate = sample_rate as f64;
    for partial in partials {
        let omega = 2.0 * PI * partial.frequency;
        for (offset, slot) in slice.iter_mut().enumerate() {
            let t = (start + offset) as f64 / rate;
            *slot = (*slot as f64 + partial.amplitude * (omega * t).sin()) as f32;
        }
    }
}

/// Synthesize a waveform without normalising it
pub fn synthesize(field: &PixelField, config: &SynthConfig) -> Result<Waveform> {
    AudioSynthesizer::new(config.clone())?.synthesize(field)
}

/// Full pipeline: synthesize, normalise and encode as a WAV byte buffer.
pub fn convert(field: &PixelField, config: &SynthConfig) -> Result<Vec<u8>> {
    let waveform = AudioSynthesizer::new(config.clone())?.render(field)?;
    let bytes = wav::write(&waveform, config)?;
    log::info!(
        "Converted {}x{} image into {:.2}s of {} audio ({} bytes)",
        field.width(),
        field.height(),
        waveform.duration_secs(),
        config.bit_depth,
        bytes.len()
    );
    Ok(bytes)
}
