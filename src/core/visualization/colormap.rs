// src/core/visualization/colormap.rs
//
// Perceptually ordered colour gradient for the preview and spectrogram images

use image::Rgb;

/// Number of entries in [`INFERNO`]
pub const INFERNO_LEN: usize = 349;

/// Inferno-style colormap: near-black through purple and orange to yellow
pub static INFERNO: [[u8; 3]; INFERNO_LEN] = [
    [0, 0, 3], [0, 0, 4], [0, 0, 6], [1, 0, 7],
    [1, 1, 9], [1, 1, 11], [2, 2, 13], [2, 2, 15],
    [3, 3, 17], [4, 3, 19], [4, 4, 21], [5, 4, 23],
    [6, 5, 25], [7, 5, 27], [8, 6, 29], [9, 6, 31],
    [10, 7, 34], [11, 7, 36], [12, 8, 38], [13, 8, 40],
    [14, 9, 42], [15, 9, 44], [16, 10, 47], [17, 10, 49],
    [18, 11, 51], [20, 11, 53], [21, 11, 55], [22, 11, 58],
    [23, 12, 60], [24, 12, 62], [26, 12, 64], [27, 12, 66],
    [28, 12, 69], [30, 12, 71], [31, 12, 73], [32, 12, 75],
    [34, 11, 77], [35, 11, 79], [37, 11, 81], [38, 11, 83],
    [40, 10, 85], [41, 10, 87], [43, 10, 89], [44, 10, 91],
    [46, 9, 93], [47, 9, 95], [49, 9, 97], [51, 9, 99],
    [52, 9, 101], [54, 9, 103], [55, 9, 105], [57, 9, 107],
    [59, 9, 108], [60, 9, 110], [62, 9, 112], [64, 9, 114],
    [65, 9, 115], [67, 10, 117], [69, 10, 118], [70, 10, 120],
    [72, 11, 121], [74, 11, 123], [75, 12, 124], [77, 12, 126],
    [79, 13, 127], [80, 13, 128], [82, 14, 129], [84, 14, 131],
    [85, 15, 132], [87, 15, 133], [89, 16, 134], [90, 16, 135],
    [92, 17, 136], [94, 18, 137], [95, 18, 138], [97, 19, 139],
    [99, 19, 140], [100, 20, 141], [102, 21, 142], [104, 21, 143],
    [105, 22, 144], [107, 23, 144], [109, 23, 145], [110, 24, 146],
    [112, 24, 147], [114, 25, 147], [115, 26, 148], [117, 26, 149],
    [119, 27, 149], [120, 28, 150], [122, 28, 151], [124, 29, 151],
    [125, 30, 152], [127, 30, 152], [129, 31, 153], [130, 31, 153],
    [132, 32, 154], [134, 33, 154], [135, 33, 155], [137, 34, 155],
    [139, 34, 156], [140, 35, 156], [142, 36, 156], [144, 36, 157],
    [145, 37, 157], [147, 37, 157], [149, 38, 158], [150, 38, 158],
    [152, 39, 158], [154, 40, 159], [155, 40, 159], [157, 41, 159],
    [159, 41, 159], [160, 42, 160], [162, 42, 160], [164, 43, 160],
    [165, 44, 160], [167, 44, 160], [169, 45, 161], [170, 45, 161],
    [172, 46, 161], [174, 46, 161], [175, 47, 161], [177, 48, 161],
    [178, 48, 161], [180, 49, 161], [182, 49, 161], [183, 50, 161],
    [185, 51, 161], [186, 51, 161], [188, 52, 161], [190, 52, 161],
    [191, 53, 161], [193, 53, 161], [194, 54, 161], [196, 55, 161],
    [198, 55, 161], [199, 56, 161], [201, 56, 160], [202, 57, 160],
    [204, 58, 160], [205, 58, 160], [207, 59, 160], [208, 59, 159],
    [210, 60, 159], [211, 61, 159], [213, 61, 159], [214, 62, 158],
    [216, 62, 158], [217, 63, 158], [219, 64, 157], [220, 64, 157],
    [222, 65, 157], [223, 66, 156], [224, 66, 156], [226, 67, 155],
    [227, 68, 155], [229, 68, 155], [230, 69, 154], [231, 70, 154],
    [233, 70, 153], [234, 71, 153], [235, 72, 152], [237, 73, 152],
    [238, 73, 151], [239, 74, 151], [240, 75, 150], [242, 76, 149],
    [243, 77, 149], [244, 77, 148], [245, 78, 148], [246, 79, 147],
    [247, 80, 146], [248, 81, 146], [249, 82, 145], [250, 83, 144],
    [251, 83, 144], [252, 84, 143], [253, 85, 142], [254, 86, 141],
    [254, 87, 141], [255, 88, 140], [255, 89, 139], [255, 90, 138],
    [255, 91, 137], [255, 92, 136], [255, 93, 136], [255, 94, 135],
    [255, 95, 134], [255, 96, 133], [255, 97, 132], [255, 98, 131],
    [255, 99, 130], [255, 100, 129], [255, 101, 128], [255, 102, 127],
    [255, 103, 126], [255, 104, 125], [255, 105, 124], [255, 106, 123],
    [255, 107, 122], [255, 108, 121], [255, 109, 120], [255, 110, 119],
    [255, 111, 118], [255, 112, 117], [255, 113, 116], [255, 114, 115],
    [255, 115, 114], [255, 116, 113], [255, 117, 112], [255, 118, 111],
    [255, 119, 110], [255, 120, 109], [255, 121, 108], [255, 122, 106],
    [255, 123, 105], [255, 124, 104], [255, 125, 103], [255, 126, 102],
    [255, 127, 101], [255, 128, 100], [255, 129, 98], [255, 130, 97],
    [255, 131, 96], [255, 132, 95], [255, 133, 94], [255, 134, 93],
    [255, 135, 91], [255, 136, 90], [255, 137, 89], [255, 138, 88],
    [255, 139, 87], [255, 140, 85], [255, 141, 84], [255, 142, 83],
    [255, 143, 82], [255, 144, 81], [255, 145, 79], [255, 146, 78],
    [255, 147, 77], [255, 148, 76], [255, 149, 75], [255, 150, 73],
    [255, 151, 72], [255, 152, 71], [255, 153, 70], [255, 154, 69],
    [255, 155, 67], [255, 156, 66], [255, 157, 65], [255, 158, 64],
    [255, 159, 63], [255, 160, 61], [255, 161, 60], [255, 162, 59],
    [255, 163, 58], [255, 164, 57], [255, 165, 55], [255, 166, 54],
    [255, 167, 53], [255, 168, 52], [255, 169, 51], [255, 170, 49],
    [255, 171, 48], [255, 172, 47], [255, 173, 46], [255, 174, 45],
    [255, 175, 43], [255, 176, 42], [255, 177, 41], [255, 178, 40],
    [255, 179, 39], [255, 180, 37], [255, 181, 36], [255, 182, 35],
    [255, 183, 34], [255, 184, 33], [255, 185, 31], [255, 186, 30],
    [255, 187, 29], [255, 188, 28], [255, 189, 27], [255, 190, 25],
    [255, 191, 24], [255, 192, 23], [255, 193, 22], [255, 194, 21],
    [255, 195, 19], [255, 196, 18], [255, 197, 17], [255, 198, 16],
    [255, 199, 15], [255, 200, 13], [255, 201, 12], [255, 202, 11],
    [255, 203, 10], [255, 204, 9], [255, 205, 7], [255, 206, 6],
    [255, 207, 5], [255, 208, 4], [255, 209, 3], [255, 210, 1],
    [255, 211, 0], [255, 212, 0], [255, 213, 0], [255, 214, 0],
    [255, 215, 0], [255, 216, 0], [255, 217, 0], [255, 218, 0],
    [255, 219, 0], [255, 220, 0], [255, 221, 0], [255, 222, 0],
    [255, 223, 0], [255, 224, 0], [255, 225, 0], [255, 226, 0],
    [255, 227, 0], [255, 228, 0], [255, 229, 0], [255, 230, 0],
    [255, 231, 0], [255, 232, 0], [255, 233, 0], [255, 234, 0],
    [255, 235, 0], [255, 236, 0], [255, 237, 0], [255, 238, 0],
    [255, 239, 0], [255, 240, 0], [255, 241, 0], [255, 242, 0],
    [255, 243, 0], [255, 244, 0], [255, 245, 0], [255, 246, 0],
    [255, 247, 0], [255, 248, 0], [255, 249, 0], [255, 250, 0],
    [255, 251, 0], [255, 252, 0], [255, 253, 0], [255, 254, 0],
    [255, 255, 0],
];

/// Ordered palette with linear interpolation between neighbouring entries
#[derive(Debug, Clone, Copy)]
pub struct ColorGradient {
    palette: &'static [[u8; 3]],
}

impl ColorGradient {
    /// Needs at least two entries to interpolate between
    pub fn new(palette: &'static [[u8; 3]]) -> Option<Self> {
        if palette.len() < 2 {
            return None;
        }
        Some(Self { palette })
    }

    pub fn inferno() -> Self {
        Self { palette: &INFERNO }
    }

    pub fn palette(&self) -> &'static [[u8; 3]] {
        self.palette
    }

    /// Colour for an intensity in [0, 1]; values outside are clamped.
    pub fn color_at(&self, intensity: f64) -> [u8; 3] {
        // NaN maps to the bottom of the scale
        let intensity = if intensity.is_nan() {
            0.0
        } else {
            intensity.clamp(0.0, 1.0)
        };

        let last = self.palette.len() - 1;
        let position = intensity * last as f64;
        let i0 = (position.floor() as usize).min(last);
        let i1 = (i0 + 1).min(last);
        let frac = position - i0 as f64;

        let c0 = self.palette[i0];
        let c1 = self.palette[i1];
        let mut out = [0u8; 3];
        for ch in 0..3 {
            let a = c0[ch] as f64;
            let b = c1[ch] as f64;
            out[ch] = (a + frac * (b - a)).round() as u8;
        }
        out
    }

    pub fn rgb_at(&self, intensity: f64) -> Rgb<u8> {
        Rgb(self.color_at(intensity))
    }
}

impl Default for ColorGradient {
    fn default() -> Self {
        Self::inferno()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAST: usize = INFERNO_LEN - 1;

    #[test]
    fn test_endpoints() {
        let gradient = ColorGradient::inferno();
        assert_eq!(gradient.color_at(0.0), INFERNO[0]);
        assert_eq!(gradient.color_at(1.0), INFERNO[LAST]);
        assert_eq!(INFERNO[0], [0, 0, 3]);
        assert_eq!(INFERNO[LAST], [255, 255, 0]);
    }

    #[test]
    fn test_out_of_range_clamped() {
        let gradient = ColorGradient::inferno();
        assert_eq!(gradient.color_at(-3.0), INFERNO[0]);
        assert_eq!(gradient.color_at(7.5), INFERNO[LAST]);
        assert_eq!(gradient.color_at(f64::NAN), INFERNO[0]);
    }

    #[test]
    fn test_interpolation_stays_between_neighbours() {
        let gradient = ColorGradient::inferno();
        for step in 0..=1000 {
            let intensity = step as f64 / 1000.0;
            let pos = intensity * LAST as f64;
            let lo = INFERNO[pos.floor() as usize];
            let hi = INFERNO[(pos.floor() as usize + 1).min(LAST)];
            let c = gradient.color_at(intensity);
            for ch in 0..3 {
                assert!(c[ch] >= lo[ch].min(hi[ch]) && c[ch] <= lo[ch].max(hi[ch]));
            }
        }
    }

    #[test]
    fn test_midpoint_rounds() {
        static TWO: [[u8; 3]; 2] = [[0, 0, 0], [255, 100, 1]];
        let gradient = ColorGradient::new(&TWO).unwrap();
        assert_eq!(gradient.color_at(0.5), [128, 50, 1]);
        assert_eq!(gradient.color_at(0.25), [64, 25, 0]);
        assert!(ColorGradient::new(&TWO[..1]).is_none());
    }
}
