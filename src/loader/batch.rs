use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
use rayon::slice::ParallelSliceMut;

use crate::dataset::Sample;
use crate::error::PipelineError;

/// Samples stacked along a new leading dimension: one contiguous buffer for
/// images and one for masks, each sliced per sample by a fixed stride.
#[derive(Debug)]
pub struct SampleBatch {
    pub images: Box<[f32]>,
    pub masks: Box<[f32]>,
    pub samples_in_batch: usize,
    pub image_shape: [usize; 3],
    pub mask_shape: [usize; 3],
    /// Dataset positions the batch was drawn from, in batch order.
    pub indices: Vec<usize>,
    pub batch_number: usize,
}

impl SampleBatch {
    /// Stack transformed samples into the batch buffers. Callers never pass
    /// an empty set; every sample must share the first one's shapes.
    pub fn stack(
        samples: Vec<Sample>,
        indices: Vec<usize>,
        batch_number: usize,
    ) -> Result<Self, PipelineError> {
        debug_assert!(!samples.is_empty());
        debug_assert_eq!(samples.len(), indices.len());

        let image_shape = samples[0].image.shape();
        let mask_shape = samples[0].mask.shape();
        for sample in &samples[1..] {
            if sample.image.shape() != image_shape || sample.mask.shape() != mask_shape {
                return Err(PipelineError::ShapeMismatch {
                    expected_w: image_shape[2],
                    expected_h: image_shape[1],
                    actual_w: sample.image.width,
                    actual_h: sample.image.height,
                });
            }
        }

        let image_elems: usize = image_shape.iter().product();
        let mask_elems: usize = mask_shape.iter().product();

        let mut images = vec![0.0f32; samples.len() * image_elems].into_boxed_slice();
        let mut masks = vec![0.0f32; samples.len() * mask_elems].into_boxed_slice();

        images
            .par_chunks_exact_mut(image_elems)
            .zip(samples.par_iter())
            .for_each(|(chunk, sample)| chunk.copy_from_slice(&sample.image.data));
        masks
            .par_chunks_exact_mut(mask_elems)
            .zip(samples.par_iter())
            .for_each(|(chunk, sample)| chunk.copy_from_slice(&sample.mask.data));

        Ok(SampleBatch {
            images,
            masks,
            samples_in_batch: samples.len(),
            image_shape,
            mask_shape,
            indices,
            batch_number,
        })
    }

    pub fn len(&self) -> usize {
        self.samples_in_batch
    }

    pub fn is_empty(&self) -> bool {
        self.samples_in_batch == 0
    }

    pub fn image_elems(&self) -> usize {
        self.image_shape.iter().product()
    }

    pub fn mask_elems(&self) -> usize {
        self.mask_shape.iter().product()
    }

    pub fn image(&self, index: usize) -> &[f32] {
        let elems = self.image_elems();
        &self.images[index * elems..(index + 1) * elems]
    }

    pub fn mask(&self, index: usize) -> &[f32] {
        let elems = self.mask_elems();
        &self.masks[index * elems..(index + 1) * elems]
    }
}
