use image::imageops::FilterType;
use image::DynamicImage;
use rand::{Rng, RngCore};

use crate::error::PipelineError;

/// A decoded image and its segmentation mask, moving through the pipeline
/// together so spatial transforms stay in lockstep.
#[derive(Debug)]
pub struct ImagePair {
    pub image: DynamicImage,
    pub mask: DynamicImage,
}

impl ImagePair {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

/// One step of the transform pipeline. The RNG is passed in explicitly so
/// randomized steps stay reproducible under a caller-chosen seed.
pub trait PairTransform: Send + Sync {
    fn apply(&self, pair: ImagePair, rng: &mut dyn RngCore) -> Result<ImagePair, PipelineError>;
}

/// Resize so the shorter side of the pair equals `shorter_side`, keeping the
/// aspect ratio.
pub struct Scale {
    pub shorter_side: u32,
}

impl Scale {
    pub fn new(shorter_side: u32) -> Self {
        Scale { shorter_side }
    }
}

impl PairTransform for Scale {
    fn apply(&self, pair: ImagePair, _rng: &mut dyn RngCore) -> Result<ImagePair, PipelineError> {
        let (width, height) = pair.dimensions();
        let (new_width, new_height) = scaled_dimensions(width, height, self.shorter_side);

        Ok(ImagePair {
            image: pair
                .image
                .resize_exact(new_width, new_height, FilterType::Triangle),
            // Nearest keeps mask values binary
            mask: pair
                .mask
                .resize_exact(new_width, new_height, FilterType::Nearest),
        })
    }
}

fn scaled_dimensions(width: u32, height: u32, shorter_side: u32) -> (u32, u32) {
    let scale = |long: u32, short: u32| {
        ((long as u64 * shorter_side as u64 + short as u64 / 2) / short as u64).max(1) as u32
    };
    if width <= height {
        (shorter_side, scale(height, width))
    } else {
        (scale(width, height), shorter_side)
    }
}

/// Cut a randomly positioned square of `size` pixels, the same region from
/// image and mask.
pub struct RandomCrop {
    pub size: u32,
}

impl RandomCrop {
    pub fn new(size: u32) -> Self {
        RandomCrop { size }
    }
}

impl PairTransform for RandomCrop {
    fn apply(&self, pair: ImagePair, rng: &mut dyn RngCore) -> Result<ImagePair, PipelineError> {
        let (width, height) = pair.dimensions();
        if width < self.size || height < self.size {
            return Err(PipelineError::CropLargerThanImage {
                crop: self.size,
                width,
                height,
            });
        }

        let x = rng.gen_range(0..=width - self.size);
        let y = rng.gen_range(0..=height - self.size);

        Ok(ImagePair {
            image: pair.image.crop_imm(x, y, self.size, self.size),
            mask: pair.mask.crop_imm(x, y, self.size, self.size),
        })
    }
}

/// Deterministic counterpart of [`RandomCrop`] for validation and test
/// iteration.
pub struct CenterCrop {
    pub size: u32,
}

impl CenterCrop {
    pub fn new(size: u32) -> Self {
        CenterCrop { size }
    }
}

impl PairTransform for CenterCrop {
    fn apply(&self, pair: ImagePair, _rng: &mut dyn RngCore) -> Result<ImagePair, PipelineError> {
        let (width, height) = pair.dimensions();
        if width < self.size || height < self.size {
            return Err(PipelineError::CropLargerThanImage {
                crop: self.size,
                width,
                height,
            });
        }

        let x = (width - self.size) / 2;
        let y = (height - self.size) / 2;

        Ok(ImagePair {
            image: pair.image.crop_imm(x, y, self.size, self.size),
            mask: pair.mask.crop_imm(x, y, self.size, self.size),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use image::{GrayImage, Luma, Rgb, RgbImage};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn coded_pair(width: u32, height: u32) -> ImagePair {
        // Encode the pixel position so crops can be checked for alignment.
        let mut image = RgbImage::new(width, height);
        let mut mask = GrayImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let code = (y * width + x) as u8;
                image.put_pixel(x, y, Rgb([code, 0, 0]));
                mask.put_pixel(x, y, Luma([code]));
            }
        }
        ImagePair {
            image: DynamicImage::ImageRgb8(image),
            mask: DynamicImage::ImageLuma8(mask),
        }
    }

    #[test]
    fn scaled_dimensions_preserve_aspect() {
        assert_eq!(scaled_dimensions(100, 200, 50), (50, 100));
        assert_eq!(scaled_dimensions(200, 100, 50), (100, 50));
        assert_eq!(scaled_dimensions(64, 64, 16), (16, 16));
    }

    #[test]
    fn scale_resizes_both_halves() {
        let mut rng = StdRng::seed_from_u64(0);
        let pair = Scale::new(8).apply(coded_pair(16, 12), &mut rng).unwrap();
        assert_eq!(pair.image.width(), 11);
        assert_eq!(pair.image.height(), 8);
        assert_eq!(pair.mask.width(), 11);
        assert_eq!(pair.mask.height(), 8);
    }

    #[test]
    fn random_crop_cuts_the_same_region_from_image_and_mask() {
        let mut rng = StdRng::seed_from_u64(99);
        let pair = RandomCrop::new(4).apply(coded_pair(9, 9), &mut rng).unwrap();

        assert_eq!(pair.dimensions(), (4, 4));
        let image = pair.image.to_rgb8();
        let mask = pair.mask.to_luma8();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(image.get_pixel(x, y)[0], mask.get_pixel(x, y)[0]);
            }
        }
    }

    #[test]
    fn random_crop_rejects_undersized_input() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = RandomCrop::new(16)
            .apply(coded_pair(8, 8), &mut rng)
            .unwrap_err();
        assert!(matches!(err, PipelineError::CropLargerThanImage { .. }));
    }

    #[test]
    fn center_crop_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(0);
        let pair = CenterCrop::new(4)
            .apply(coded_pair(10, 6), &mut rng)
            .unwrap();
        // Region starts at (3, 1), so the first code is 1 * 10 + 3.
        assert_eq!(pair.image.to_rgb8().get_pixel(0, 0)[0], 13);
        assert_eq!(pair.dimensions(), (4, 4));
    }
}
