// src/core/wav.rs
//
// Canonical 44-byte-header RIFF/WAVE writer for mono linear PCM.

use serde::Serialize;

use super::error::{Result, SonifyError};
use super::waveform::Waveform;
use crate::config::{BitDepth, SynthConfig, MAX_DATA_LEN};

pub const HEADER_LEN: usize = 44;
const FMT_CHUNK_LEN: u32 = 16;
const PCM_FORMAT: u16 = 1;
const CHANNELS: u16 = 1;

/// Fields of a parsed canonical WAV header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WavHeader {
    pub riff_size: u32,
    pub format_code: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_len: u32,
}

impl WavHeader {
    pub fn sample_count(&self) -> u32 {
        if self.block_align == 0 {
            return 0;
        }
        self.data_len / self.block_align as u32
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.sample_count() as f64 / self.sample_rate as f64
    }
}

/// Quantise one sample to the integer code stored for `depth`.
/// Out-of-range input is clamped, never wrapped.
pub fn quantize(sample: f32, depth: BitDepth) -> i32 {
    let s = sample as f64;
    match depth {
        BitDepth::Eight => ((s + 1.0) * 127.5).round().clamp(0.0, 255.0) as i32,
        BitDepth::Sixteen => (s * 32767.0).round().clamp(-32768.0, 32767.0) as i32,
        BitDepth::TwentyFour => (s * 8388607.0).round().clamp(-8388608.0, 8388607.0) as i32,
        BitDepth::ThirtyTwo => (s * 2147483647.0)
            .round()
            .clamp(-2147483648.0, 2147483647.0) as i32,
    }
}

fn push_sample(out: &mut Vec<u8>, code: i32, depth: BitDepth) {
    match depth {
        BitDepth::Eight => out.push(code as u8),
        BitDepth::Sixteen => out.extend_from_slice(&(code as i16).to_le_bytes()),
        BitDepth::TwentyFour => out.extend_from_slice(&code.to_le_bytes()[..3]),
        BitDepth::ThirtyTwo => out.extend_from_slice(&code.to_le_bytes()),
    }
}

/// Serialise a waveform as a mono PCM WAV file at the config's bit depth.
pub fn write(waveform: &Waveform, config: &SynthConfig) -> Result<Vec<u8>> {
    config.validate()?;
    let depth = config.bit_depth;
    let block_align = depth.bytes_per_sample() as u16 * CHANNELS;

    let data_len = waveform.len() as u64 * block_align as u64;
    if data_len > MAX_DATA_LEN {
        return Err(SonifyError::ContainerTooLarge(data_len));
    }
    let data_len = data_len as u32;
    let byte_rate = config.sample_rate as u64 * block_align as u64;
    let byte_rate =
        u32::try_from(byte_rate).map_err(|_| SonifyError::invalid("sampleRate", "byte rate overflows 32 bits"))?;

    let mut out = Vec::with_capacity(HEADER_LEN + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
    out.extend_from_slice(&PCM_FORMAT.to_le_bytes());
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&config.sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&depth.bits().to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());

    let mut clipped = 0usize;
    for &sample in waveform.samples() {
        if sample.abs() > 1.0 {
            clipped += 1;
        }
        push_sample(&mut out, quantize(sample, depth), depth);
    }
    if clipped > 0 {
        log::warn!(
            "{} of {} samples exceeded full scale and were clipped at {}",
            clipped,
            waveform.len(),
            depth
        );
    }

    Ok(out)
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Parse the canonical header written by [`write`].
pub fn read_header(bytes: &[u8]) -> Result<WavHeader> {
    if bytes.len() < HEADER_LEN {
        return Err(SonifyError::MalformedHeader(format!(
            "{} bytes is shorter than a {}-byte header",
            bytes.len(),
            HEADER_LEN
        )));
    }
    for (at, tag) in [(0, b"RIFF"), (8, b"WAVE"), (12, b"fmt "), (36, b"data")] {
        if &bytes[at..at + 4] != tag {
            return Err(SonifyError::MalformedHeader(format!(
                "expected {:?} at offset {}",
                String::from_utf8_lossy(tag),
                at
            )));
        }
    }
    if read_u32(bytes, 16) != FMT_CHUNK_LEN {
        return Err(SonifyError::MalformedHeader("fmt chunk is not 16 bytes".into()));
    }
    let format_code = read_u16(bytes, 20);
    if format_code != PCM_FORMAT {
        return Err(SonifyError::MalformedHeader(format!(
            "format code {} is not linear PCM",
            format_code
        )));
    }

    Ok(WavHeader {
        riff_size: read_u32(bytes, 4),
        format_code,
        channels: read_u16(bytes, 22),
        sample_rate: read_u32(bytes, 24),
        byte_rate: read_u32(bytes, 28),
        block_align: read_u16(bytes, 32),
        bits_per_sample: read_u16(bytes, 34),
        data_len: read_u32(bytes, 40),
    })
}
