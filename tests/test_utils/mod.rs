#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use image::{Rgb, RgbImage};
use spectroglyph::PixelField;
use uuid::Uuid;

pub fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_spectroglyph"))
}

pub fn run_spectroglyph() -> Command {
    Command::new(get_binary_path())
}

/// Binary invocation that only sees config inside `dir`: an explicit
/// `config.json` (written as `{}` unless one exists) and a config home
/// pointing at `dir`, so no per-user file leaks in.
pub fn run_isolated(dir: &Path) -> Command {
    let config_path = dir.join("config.json");
    if !config_path.exists() {
        fs::write(&config_path, "{}").expect("Failed to write test config");
    }
    let mut cmd = run_spectroglyph();
    cmd.env("SPECTROGLYPH_CONFIG", &config_path)
        .env("XDG_CONFIG_HOME", dir)
        .env("HOME", dir)
        .env_remove("SPECTROGLYPH_SAMPLE_RATE")
        .env_remove("SPECTROGLYPH_BIT_DEPTH");
    cmd
}

/// Fresh scratch directory under the system temp dir
pub fn scratch_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("spectroglyph_{}_{}", label, Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("Failed to create scratch dir");
    dir
}

/// White horizontal bar across a black image, `bar_row` rows from the top
pub fn bar_image(width: u32, height: u32, bar_row: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |_, y| {
        if y == bar_row {
            Rgb([255, 255, 255])
        } else {
            Rgb([0, 0, 0])
        }
    })
}

pub fn write_png(img: &RgbImage, path: &Path) {
    img.save(path).expect("Failed to write test image");
}

/// The two-column scenario: lit left column, dark right column
pub fn half_lit_field() -> PixelField {
    PixelField::new(2, 1, vec![[255, 255, 255], [0, 0, 0]]).expect("valid field")
}

/// Read all samples of a WAV buffer as i32 codes via hound
pub fn hound_samples(bytes: &[u8]) -> (hound::WavSpec, Vec<i32>) {
    let reader = hound::WavReader::new(std::io::Cursor::new(bytes)).expect("hound rejected WAV");
    let spec = reader.spec();
    let samples = reader
        .into_samples::<i32>()
        .collect::<Result<Vec<_>, _>>()
        .expect("Failed to read samples");
    (spec, samples)
}

pub fn cleanup(dir: &Path) {
    let _ = fs::remove_dir_all(dir);
}
