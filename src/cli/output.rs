//! Output formatting for CLI results

use std::path::PathBuf;

use colorful::Colorful;
use serde::Serialize;

use crate::config::{DynamicRangePreset, SynthConfig};
use crate::core::wav::WavHeader;

/// What one conversion produced
#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub input: PathBuf,
    pub width: usize,
    pub height: usize,
    pub wav: PathBuf,
    pub preview: Option<PathBuf>,
    pub spectrogram: Option<PathBuf>,
    pub samples: usize,
    pub duration_secs: f64,
    pub peak: f32,
    pub bytes: usize,
    pub config: SynthConfig,
}

/// Format a summary for terminal output
pub fn format_summary(summary: &ConversionSummary, verbose: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} {} ({}x{})\n",
        "✓".green(),
        summary.input.display().to_string().cyan(),
        summary.width,
        summary.height
    ));
    output.push_str(&format!(
        "  Audio: {} ({:.2}s, {} Hz, {})\n",
        summary.wav.display(),
        summary.duration_secs,
        summary.config.sample_rate,
        summary.config.bit_depth
    ));
    if let Some(preview) = &summary.preview {
        output.push_str(&format!("  Preview: {}\n", preview.display()));
    }
    if let Some(spectrogram) = &summary.spectrogram {
        output.push_str(&format!("  Spectrogram: {}\n", spectrogram.display()));
    }
    if summary.peak > 1.0 {
        output.push_str(&format!(
            "  {}\n",
            format!("Peak {:.2} exceeds full scale; output is clipped", summary.peak).yellow()
        ));
    }

    if verbose {
        let config = &summary.config;
        output.push_str("\n  Settings:\n");
        output.push_str(&format!(
            "    Frequencies: {:.0}-{:.0} Hz (shift {:+.0} Hz)\n",
            config.base_frequency,
            config.base_frequency + config.frequency_span(),
            config.frequency_shift
        ));
        output.push_str(&format!("    Threshold: {}\n", config.brightness_threshold));
        if config.use_dynamic_range {
            output.push_str(&format!("    Dynamic range: {:.0} dB\n", config.dynamic_range_db));
        } else {
            output.push_str("    Normalisation: linear\n");
        }
        output.push_str(&format!("    Samples: {} ({} bytes)\n", summary.samples, summary.bytes));
    }

    output
}

pub fn print_summary(summary: &ConversionSummary, verbose: bool) {
    print!("{}", format_summary(summary, verbose));
}

/// Print a summary as JSON
pub fn print_json(summary: &ConversionSummary) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

pub fn format_header(header: &WavHeader) -> String {
    format!(
        "  Format: PCM ({})\n  Channels: {}\n  Sample Rate: {} Hz\n  Bit Depth: {} bit\n  Samples: {}\n  Duration: {:.2}s\n",
        header.format_code,
        header.channels,
        header.sample_rate,
        header.bits_per_sample,
        header.sample_count(),
        header.duration_secs()
    )
}

pub fn print_presets() {
    println!("Dynamic range presets:\n");
    for preset in DynamicRangePreset::all() {
        println!(
            "  {:<14} {:>3.0} dB  {}",
            format!("{:?}", preset).to_lowercase(),
            preset.db(),
            preset.description()
        );
    }
}
