// src/core/decoder.rs
//
// Image decoding into the pixel field the synthesizer reads.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use super::error::{Result, SonifyError};

/// Images larger than this in either dimension get fitted to the target canvas
pub const MAX_WIDTH: u32 = 1024;
pub const MAX_HEIGHT: u32 = 512;
pub const TARGET_WIDTH: u32 = 512;
pub const TARGET_HEIGHT: u32 = 256;

/// Decoded RGB pixels, row-major, row 0 at the top
#[derive(Debug, Clone, PartialEq)]
pub struct PixelField {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 3]>,
}

impl PixelField {
    pub fn new(width: usize, height: usize, pixels: Vec<[u8; 3]>) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(SonifyError::PixelBufferMismatch {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Field of one repeated colour
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        Self {
            width,
            height,
            pixels: vec![rgb; width * height],
        }
    }

    pub fn from_rgb_image(img: &RgbImage) -> Self {
        let pixels = img.pixels().map(|p| p.0).collect();
        Self {
            width: img.width() as usize,
            height: img.height() as usize,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.pixels[y * self.width + x]
    }

    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }
}

/// What to do with images above the size limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizePolicy {
    /// Scale oversized images onto a 512x256 black canvas
    #[default]
    FitOversized,
    /// Use the image as decoded
    Keep,
}

/// Decode an image file into a pixel field. Alpha is dropped.
pub fn load_pixel_field(path: &Path, policy: ResizePolicy) -> Result<PixelField> {
    let img = image::open(path)?.to_rgb8();
    log::debug!(
        "Decoded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );

    let img = match policy {
        ResizePolicy::FitOversized => fit_oversized(img),
        ResizePolicy::Keep => img,
    };

    Ok(PixelField::from_rgb_image(&img))
}

/// Shrink images above `MAX_WIDTH`x`MAX_HEIGHT`, keeping the aspect ratio and
/// centring the result on a black `TARGET_WIDTH`x`TARGET_HEIGHT` canvas.
pub fn fit_oversized(img: RgbImage) -> RgbImage {
    let (width, height) = img.dimensions();
    if width <= MAX_WIDTH && height <= MAX_HEIGHT {
        return img;
    }

    let ratio = (TARGET_WIDTH as f64 / width as f64).min(TARGET_HEIGHT as f64 / height as f64);
    let new_width = ((width as f64 * ratio).floor() as u32).max(1);
    let new_height = ((height as f64 * ratio).floor() as u32).max(1);

    log::warn!(
        "Large image ({}x{}), resized to {}x{} on a {}x{} canvas",
        width,
        height,
        new_width,
        new_height,
        TARGET_WIDTH,
        TARGET_HEIGHT
    );

    let scaled = imageops::resize(&img, new_width, new_height, FilterType::Triangle);
    let mut canvas = RgbImage::from_pixel(TARGET_WIDTH, TARGET_HEIGHT, Rgb([0, 0, 0]));
    let offset_x = (TARGET_WIDTH - new_width) / 2;
    let offset_y = (TARGET_HEIGHT - new_height) / 2;
    imageops::overlay(&mut canvas, &scaled, offset_x as i64, offset_y as i64);
    canvas
}
