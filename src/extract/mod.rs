mod quantizer;

pub use quantizer::MedianCutQuantizer;

use crate::{
    color::Rgb,
    error::{ Error, ErrorKind, Result },
};

pub const DEFAULT_QUALITY: usize = 10;
pub const DOMINANT_PALETTE_SIZE: usize = 5;
pub const MIN_PALETTE_SIZE: usize = 2;
pub const MAX_PALETTE_SIZE: usize = 20;

const MIN_ALPHA: u8 = 125;
const WHITE_THRESHOLD: u8 = 250;

/// Derives representative colors from an encoded image.
pub trait ColorExtractor: Send + Sync {
    fn dominant(&self, image: &[u8]) -> Result<Rgb>;
    fn palette(&self, image: &[u8], count: usize) -> Result<Vec<Rgb>>;
}

/// Samples the decoded image and runs it through [`MedianCutQuantizer`].
/// Transparent and near-white pixels are left out.
#[derive(Debug, Clone)]
pub struct MedianCut {
    quality: usize,
}

impl Default for MedianCut {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
        }
    }
}

impl MedianCut {
    /// Only every `quality`-th pixel is sampled; 1 samples all of them.
    pub fn with_quality(quality: usize) -> Self {
        Self {
            quality: quality.max(1),
        }
    }

    fn sample(&self, image: &[u8]) -> Result<Vec<Rgb>> {
        let image = image::load_from_memory(image)?.to_rgba8();

        let pixels = image.pixels()
                          .step_by(self.quality)
                          .filter_map(|pixel| {
                              let [r, g, b, a] = pixel.0;
                              let white = r > WHITE_THRESHOLD && g > WHITE_THRESHOLD && b > WHITE_THRESHOLD;
                              if a >= MIN_ALPHA && !white {
                                  Some(Rgb::new(r, g, b))
                              } else {
                                  None
                              }
                          })
                          .collect::<Vec<_>>();

        if pixels.is_empty() {
            return Err(Error::new(ErrorKind::NoColors));
        }
        Ok(pixels)
    }
}

impl ColorExtractor for MedianCut {
    fn dominant(&self, image: &[u8]) -> Result<Rgb> {
        self.palette(image, DOMINANT_PALETTE_SIZE)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::new(ErrorKind::NoColors))
    }

    fn palette(&self, image: &[u8], count: usize) -> Result<Vec<Rgb>> {
        let pixels = self.sample(image)?;
        let count = count.clamp(MIN_PALETTE_SIZE, MAX_PALETTE_SIZE);

        let palette = MedianCutQuantizer::new(count).quantize(pixels);
        if palette.is_empty() {
            return Err(Error::new(ErrorKind::NoColors));
        }
        Ok(palette)
    }
}

#[cfg(test)]
pub(crate) mod test_images {
    use std::io::Cursor;

    use image::{ ImageFormat, Rgba, RgbaImage };

    /// PNG where the left `split` columns get `left` and the rest `right`.
    pub fn two_tone_png(width: u32, height: u32, split: u32, left: [u8; 4], right: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, _| {
            if x < split { Rgba(left) } else { Rgba(right) }
        });

        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        buf
    }

    pub fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        two_tone_png(width, height, width, rgba, rgba)
    }
}
