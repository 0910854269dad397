use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("No mask file paired with image: {0}")]
    MaskNotFound(String),

    #[error("No image/mask pairs found in {0}")]
    EmptyDataset(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: String,
        source: image::ImageError,
    },

    #[error("Spatial dimensions disagree: expected {expected_w}x{expected_h}, found {actual_w}x{actual_h}")]
    ShapeMismatch {
        expected_w: usize,
        expected_h: usize,
        actual_w: usize,
        actual_h: usize,
    },

    #[error("Crop of {crop}px does not fit a {width}x{height} input")]
    CropLargerThanImage { crop: u32, width: u32, height: u32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to acquire lock on RNG")]
    RngLock,
}
