use std::path::Path;

use image::DynamicImage;
use rand::RngCore;

use crate::dataset::{Sample, SamplePaths, Tensor};
use crate::error::PipelineError;

use super::ops::{CenterCrop, ImagePair, PairTransform, RandomCrop, Scale};

/// Ordered transform steps plus the decode/convert bookends around them.
///
/// One pipeline instance is shared by all loader workers; steps carry no
/// mutable state, so a sample can run through it on any thread.
pub struct TransformPipeline {
    steps: Vec<Box<dyn PairTransform>>,
}

impl TransformPipeline {
    pub fn new(steps: Vec<Box<dyn PairTransform>>) -> Self {
        TransformPipeline { steps }
    }

    /// Scale then randomly crop: the training-time chain.
    pub fn training(shorter_side: u32, crop: u32) -> Self {
        Self::new(vec![
            Box::new(Scale::new(shorter_side)),
            Box::new(RandomCrop::new(crop)),
        ])
    }

    /// Scale then center crop, so evaluation batches stay stackable without
    /// crop randomness.
    pub fn evaluation(shorter_side: u32, crop: u32) -> Self {
        Self::new(vec![
            Box::new(Scale::new(shorter_side)),
            Box::new(CenterCrop::new(crop)),
        ])
    }

    /// Decode an (image, mask) pair, run every step in order, and convert the
    /// result to normalized tensors.
    pub fn load_sample(
        &self,
        paths: &SamplePaths,
        rng: &mut dyn RngCore,
    ) -> Result<Sample, PipelineError> {
        let image = open_image(&paths.image)?;
        let mask = open_image(&paths.mask)?;

        if image.width() != mask.width() || image.height() != mask.height() {
            return Err(PipelineError::ShapeMismatch {
                expected_w: image.width() as usize,
                expected_h: image.height() as usize,
                actual_w: mask.width() as usize,
                actual_h: mask.height() as usize,
            });
        }

        let mut pair = ImagePair { image, mask };
        for step in &self.steps {
            pair = step.apply(pair, rng)?;
        }

        pair_to_sample(&pair)
    }
}

fn open_image(path: &Path) -> Result<DynamicImage, PipelineError> {
    image::open(path).map_err(|source| PipelineError::Decode {
        path: path.display().to_string(),
        source,
    })
}

/// Convert a transformed pair into [0, 1] tensors: RGB image to 3xHxW, mask
/// to 1xHxW.
pub(crate) fn pair_to_sample(pair: &ImagePair) -> Result<Sample, PipelineError> {
    let (width, height) = (pair.image.width() as usize, pair.image.height() as usize);
    let (mask_w, mask_h) = (pair.mask.width() as usize, pair.mask.height() as usize);
    if (width, height) != (mask_w, mask_h) {
        return Err(PipelineError::ShapeMismatch {
            expected_w: width,
            expected_h: height,
            actual_w: mask_w,
            actual_h: mask_h,
        });
    }

    let rgb = pair.image.to_rgb8();
    let plane = width * height;
    let mut image_data = vec![0.0f32; 3 * plane];
    for (x, y, pixel) in rgb.enumerate_pixels() {
        let base = y as usize * width + x as usize;
        image_data[base] = pixel[0] as f32 / 255.0;
        image_data[plane + base] = pixel[1] as f32 / 255.0;
        image_data[2 * plane + base] = pixel[2] as f32 / 255.0;
    }

    let luma = pair.mask.to_luma8();
    let mut mask_data = vec![0.0f32; plane];
    for (x, y, pixel) in luma.enumerate_pixels() {
        mask_data[y as usize * width + x as usize] = pixel[0] as f32 / 255.0;
    }

    Ok(Sample {
        image: Tensor::new(image_data, 3, height, width),
        mask: Tensor::new(mask_data, 1, height, width),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn tensors_are_chw_and_normalized() {
        let mut image = RgbImage::new(2, 2);
        image.put_pixel(0, 0, Rgb([255, 0, 0]));
        image.put_pixel(1, 0, Rgb([0, 255, 0]));
        image.put_pixel(0, 1, Rgb([0, 0, 255]));
        image.put_pixel(1, 1, Rgb([51, 102, 153]));
        let mut mask = GrayImage::new(2, 2);
        mask.put_pixel(0, 0, Luma([255]));

        let sample = pair_to_sample(&ImagePair {
            image: DynamicImage::ImageRgb8(image),
            mask: DynamicImage::ImageLuma8(mask),
        })
        .unwrap();

        assert_eq!(sample.image.shape(), [3, 2, 2]);
        assert_eq!(sample.mask.shape(), [1, 2, 2]);
        // Red plane, then green, then blue, row-major within each plane.
        assert_eq!(sample.image.data[0], 1.0);
        assert_eq!(sample.image.data[4 + 1], 1.0);
        assert_eq!(sample.image.data[2 * 4 + 2], 1.0);
        assert!((sample.image.data[3] - 51.0 / 255.0).abs() < 1e-6);
        assert_eq!(sample.mask.data[0], 1.0);
        assert_eq!(sample.mask.data[3], 0.0);
    }

    #[test]
    fn mismatched_pair_is_rejected() {
        let err = pair_to_sample(&ImagePair {
            image: DynamicImage::ImageRgb8(RgbImage::new(4, 4)),
            mask: DynamicImage::ImageLuma8(GrayImage::new(4, 3)),
        })
        .unwrap_err();
        assert!(matches!(err, PipelineError::ShapeMismatch { .. }));
    }

    #[test]
    fn training_pipeline_outputs_crop_sized_tensors() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let temp = tempfile::tempdir().unwrap();
        let image_path = temp.path().join("car.png");
        let mask_path = temp.path().join("car_mask.png");
        RgbImage::new(48, 32).save(&image_path).unwrap();
        GrayImage::new(48, 32).save(&mask_path).unwrap();

        let pipeline = TransformPipeline::training(16, 16);
        let mut rng = StdRng::seed_from_u64(7);
        let sample = pipeline
            .load_sample(
                &SamplePaths {
                    image: image_path,
                    mask: mask_path,
                },
                &mut rng,
            )
            .unwrap();

        assert_eq!(sample.image.shape(), [3, 16, 16]);
        assert_eq!(sample.mask.shape(), [1, 16, 16]);
    }
}
