// src/core/visualization/preview.rs
//
// False-colour time/frequency preview of what an image will sound like.
// Cheap, reduced resolution, and not a faithful STFT: it only shows where
// the synthesizer will place energy.

use std::path::Path;

use image::{Rgb, RgbImage};

use super::colormap::ColorGradient;
use crate::config::SynthConfig;
use crate::core::decoder::PixelField;
use crate::core::dsp;
use crate::core::error::Result;
use crate::core::mapping::SpectralMapper;

pub const MAX_PREVIEW_WIDTH: usize = 800;
pub const MAX_PREVIEW_HEIGHT: usize = 400;

/// Duration the horizontal preview scale is relative to, in seconds
const REFERENCE_DURATION: f64 = 5.0;

const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// Rendered preview, low frequencies at the bottom
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewRaster {
    image: RgbImage,
}

impl PreviewRaster {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.image.get_pixel(x, y).0
    }

    /// Packed RGB bytes, row-major
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }
}

/// Renders previews for a config
pub struct PreviewRenderer {
    config: SynthConfig,
    gradient: ColorGradient,
}

impl PreviewRenderer {
    pub fn new(config: SynthConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            gradient: ColorGradient::inferno(),
        })
    }

    pub fn with_gradient(mut self, gradient: ColorGradient) -> Self {
        self.gradient = gradient;
        self
    }

    /// Output size for an image of `image_width` columns. The requested width
    /// defaults to the maximum and is clamped to it and to the image width.
    pub fn dimensions(&self, image_width: usize, requested_width: Option<usize>) -> (usize, usize) {
        let width = requested_width
            .unwrap_or(MAX_PREVIEW_WIDTH)
            .min(MAX_PREVIEW_WIDTH)
            .min(image_width);
        let height = (self.config.fft_size / 2).min(MAX_PREVIEW_HEIGHT);
        (width, height)
    }

    /// Source column shown at preview column `x`. Centred on the image and
    /// stretched by duration relative to a 5 s reference.
    fn source_column(&self, x: usize, out_width: usize, image_width: usize) -> usize {
        let duration_scale = self.config.duration / REFERENCE_DURATION;
        let position = (x as f64 - out_width as f64 / 2.0) / duration_scale + image_width as f64 / 2.0;
        position.floor().clamp(0.0, (image_width - 1) as f64) as usize
    }

    /// Peak raw intensity per (column, bin), bin 0 = lowest frequency
    fn intensities(&self, field: &PixelField, out_width: usize, out_height: usize) -> Vec<Vec<f64>> {
        let mut grid = vec![vec![0.0f64; out_height]; out_width];
        if field.is_empty() || out_height == 0 {
            return grid;
        }

        let mapper = SpectralMapper::new(&self.config, field.width(), field.height());
        let max_frequency = mapper.max_frequency();

        for (x, column) in grid.iter_mut().enumerate() {
            let src_x = self.source_column(x, out_width, field.width());
            for y in 0..field.height() {
                let Some(amplitude) = mapper.amplitude(field.pixel(src_x, y)) else {
                    continue;
                };
                let bin = (mapper.frequency(y) / max_frequency * out_height as f64).floor();
                if bin >= 0.0 && bin < out_height as f64 {
                    let cell = &mut column[bin as usize];
                    *cell = cell.max(amplitude);
                }
            }
        }
        grid
    }

    fn display_intensity(&self, raw: f64) -> f64 {
        if self.config.use_dynamic_range {
            dsp::db_window(raw, self.config.dynamic_range_db)
        } else {
            raw
        }
    }

    pub fn render(&self, field: &PixelField, requested_width: Option<usize>) -> PreviewRaster {
        let (out_width, out_height) = self.dimensions(field.width(), requested_width);
        log::debug!(
            "Rendering {}x{} preview of {}x{} image",
            out_width,
            out_height,
            field.width(),
            field.height()
        );

        let grid = self.intensities(field, out_width, out_height);
        let mut image = RgbImage::from_pixel(out_width as u32, out_height as u32, BACKGROUND);

        for (x, column) in grid.iter().enumerate() {
            for (bin, &raw) in column.iter().enumerate() {
                if raw <= 0.0 {
                    continue;
                }
                let display_y = out_height - 1 - bin;
                let color = self.gradient.rgb_at(self.display_intensity(raw));
                image.put_pixel(x as u32, display_y as u32, color);
            }
        }

        PreviewRaster { image }
    }
}

/// Render a preview with the default gradient
pub fn render_preview(
    field: &PixelField,
    config: &SynthConfig,
    requested_width: Option<usize>,
) -> Result<PreviewRaster> {
    Ok(PreviewRenderer::new(config.clone())?.render(field, requested_width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SonifyError;
    use crate::core::visualization::colormap::INFERNO;

    fn config() -> SynthConfig {
        SynthConfig {
            sample_rate: 8000,
            duration: 5.0,
            brightness_threshold: 10,
            base_frequency: 0.0,
            fft_size: 16,
            ..Default::default()
        }
    }

    #[test]
    fn test_dimensions_clamped() {
        let renderer = PreviewRenderer::new(SynthConfig::default()).unwrap();
        assert_eq!(renderer.dimensions(2000, None), (800, 256));
        assert_eq!(renderer.dimensions(300, Some(500)), (300, 256));
        assert_eq!(renderer.dimensions(2000, Some(100)), (100, 256));

        let tall = PreviewRenderer::new(SynthConfig {
            fft_size: 4096,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(tall.dimensions(10, None).1, 400);
    }

    #[test]
    fn test_dark_image_is_background() {
        let field = PixelField::filled(4, 4, [0, 0, 0]);
        let raster = render_preview(&field, &config(), None).unwrap();
        assert_eq!((raster.width(), raster.height()), (4, 8));
        assert!(raster.as_raw().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_empty_field() {
        let field = PixelField::new(0, 0, Vec::new()).unwrap();
        let raster = render_preview(&field, &config(), None).unwrap();
        assert_eq!(raster.width(), 0);
    }

    #[test]
    fn test_bottom_row_lands_in_lowest_bin() {
        // 1 column, 2 rows: bottom row is 0 Hz -> bin 0 -> last display row.
        // top row is 2000 Hz of 4000 Hz max -> bin 4 of 8.
        let field = PixelField::new(1, 2, vec![[255, 255, 255], [255, 255, 255]]).unwrap();
        let raster = render_preview(&field, &config(), None).unwrap();
        let top = *INFERNO.last().unwrap();

        assert_eq!(raster.pixel(0, 7), top);
        assert_eq!(raster.pixel(0, 8 - 1 - 4), top);
        assert_eq!(raster.pixel(0, 0), [0, 0, 0]);
        assert_eq!(raster.pixel(0, 5), [0, 0, 0]);
    }

    #[test]
    fn test_shifted_rows_outside_axis_dropped() {
        // 2 rows 2000 Hz apart on a 4000 Hz axis of 8 bins
        let field = PixelField::new(1, 2, vec![[255, 255, 255], [255, 255, 255]]).unwrap();
        let top = *INFERNO.last().unwrap();

        // -1000 Hz: bottom row falls below bin 0, top row (1000 Hz) is bin 2
        let down = SynthConfig {
            frequency_shift: -1000.0,
            ..config()
        };
        let grid = PreviewRenderer::new(down.clone()).unwrap().intensities(&field, 1, 8);
        assert_eq!(grid[0].iter().filter(|&&v| v > 0.0).count(), 1);
        assert_eq!(grid[0][2], 1.0);
        let raster = render_preview(&field, &down, None).unwrap();
        assert_eq!(raster.pixel(0, 8 - 1 - 2), top);
        assert_eq!(raster.pixel(0, 7), [0, 0, 0]);

        // +3000 Hz: top row (5000 Hz) runs past the last bin
        let up = SynthConfig {
            frequency_shift: 3000.0,
            ..config()
        };
        let grid = PreviewRenderer::new(up).unwrap().intensities(&field, 1, 8);
        assert_eq!(grid[0].iter().filter(|&&v| v > 0.0).count(), 1);
        assert_eq!(grid[0][6], 1.0);
    }

    #[test]
    fn test_collisions_keep_maximum() {
        // fft_size 4 gives 2 bins; rows 2 and 3 of 4 (1000 Hz and 0 Hz of
        // 4000 Hz) both land in bin 0
        let config = SynthConfig {
            fft_size: 4,
            ..config()
        };
        let field = PixelField::new(
            1,
            4,
            vec![[0, 0, 0], [0, 0, 0], [102, 102, 102], [51, 51, 51]],
        )
        .unwrap();
        let renderer = PreviewRenderer::new(config).unwrap();
        let grid = renderer.intensities(&field, 1, 2);
        assert!((grid[0][0] - 0.4).abs() < 1e-12);
        assert_eq!(grid[0][1], 0.0);
    }

    #[test]
    fn test_dynamic_range_coloring() {
        let field = PixelField::filled(1, 1, [26, 26, 26]);
        let linear = render_preview(&field, &config(), None).unwrap();
        let db = render_preview(
            &field,
            &SynthConfig {
                use_dynamic_range: true,
                dynamic_range_db: 24.0,
                ..config()
            },
            None,
        )
        .unwrap();

        // ~ -19.8 dB: the dB view is brighter than the linear one
        let gradient = ColorGradient::inferno();
        let raw = 26.0 / 255.0;
        assert_eq!(linear.pixel(0, 7), gradient.color_at(raw));
        assert_eq!(db.pixel(0, 7), gradient.color_at(dsp::db_window(raw, 24.0)));
        assert_ne!(linear.pixel(0, 7), db.pixel(0, 7));
    }

    #[test]
    fn test_source_column_centering() {
        let renderer = PreviewRenderer::new(config()).unwrap();
        // Reference duration: identity mapping
        assert_eq!(renderer.source_column(3, 10, 10), 3);

        // Doubling duration halves the horizontal spread around the centre
        let slow = PreviewRenderer::new(SynthConfig {
            duration: 10.0,
            ..config()
        })
        .unwrap();
        assert_eq!(slow.source_column(0, 10, 10), 2);
        assert_eq!(slow.source_column(9, 10, 10), 7);

        // Short durations run off the edges and clamp
        let fast = PreviewRenderer::new(SynthConfig {
            duration: 1.0,
            ..config()
        })
        .unwrap();
        assert_eq!(fast.source_column(0, 10, 10), 0);
        assert_eq!(fast.source_column(9, 10, 10), 9);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SynthConfig {
            fft_size: 0,
            ..config()
        };
        assert!(matches!(
            PreviewRenderer::new(config),
            Err(SonifyError::InvalidConfig { field: "fftSize", .. })
        ));
    }
}
