use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;

use super::sample::SamplePaths;

/// Masks sit next to their source image as `<stem>_mask.<ext>`.
const MASK_SUFFIX: &str = "_mask";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DatasetSplit {
    Train,
    Validation,
    Test,
}

impl DatasetSplit {
    pub fn subdir(&self) -> &'static str {
        match self {
            DatasetSplit::Train => "train",
            DatasetSplit::Validation => "val",
            DatasetSplit::Test => "test",
        }
    }
}

/// Paired (image, mask) paths for one split of the Carvana layout.
///
/// All pairs are resolved at construction; the dataset never touches the
/// filesystem again afterwards.
#[derive(Debug)]
pub struct CarvanaDataset {
    root: PathBuf,
    split: DatasetSplit,
    pairs: Vec<SamplePaths>,
}

impl CarvanaDataset {
    pub fn new(root: impl AsRef<Path>, split: DatasetSplit) -> Result<Self, PipelineError> {
        let root = root.as_ref();
        if !root.exists() {
            return Err(PipelineError::DirectoryNotFound(
                root.display().to_string(),
            ));
        }

        let dir = root.join(split.subdir());
        if !dir.exists() {
            return Err(PipelineError::DirectoryNotFound(dir.display().to_string()));
        }

        let valid_extensions = image::ImageFormat::all()
            .flat_map(|format| format.extensions_str())
            .map(|ext| ext.to_string())
            .collect();

        let pairs = Self::scan_pairs(&dir, &valid_extensions)?;

        Ok(CarvanaDataset {
            root: root.to_owned(),
            split,
            pairs,
        })
    }

    fn scan_pairs(
        dir: &Path,
        valid_extensions: &HashSet<String>,
    ) -> Result<Vec<SamplePaths>, PipelineError> {
        let mut images: Vec<(String, PathBuf)> = Vec::new();
        let mut masks: HashMap<String, PathBuf> = HashMap::new();

        for entry in fs::read_dir(dir)?.filter_map(Result::ok) {
            let path = entry.path();
            if !is_valid_extension(&path, valid_extensions) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match stem.strip_suffix(MASK_SUFFIX) {
                Some(base) => {
                    masks.insert(base.to_string(), path);
                }
                None => images.push((stem.to_string(), path)),
            }
        }

        if images.is_empty() {
            return Err(PipelineError::EmptyDataset(dir.display().to_string()));
        }

        // read_dir order depends on the filesystem; the unshuffled sample
        // order must be stable across runs
        images.sort_unstable();

        images
            .into_iter()
            .map(|(stem, image)| {
                let mask = masks
                    .remove(&stem)
                    .ok_or_else(|| PipelineError::MaskNotFound(image.display().to_string()))?;
                Ok(SamplePaths { image, mask })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pair(&self, index: usize) -> &SamplePaths {
        &self.pairs[index]
    }

    pub fn pairs(&self) -> &[SamplePaths] {
        &self.pairs
    }

    pub fn split(&self) -> DatasetSplit {
        self.split
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn is_valid_extension(path: &Path, valid_extensions: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| valid_extensions.contains(&ext.to_lowercase()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    use image::{GrayImage, RgbImage};

    fn write_pair(dir: &Path, stem: &str) {
        RgbImage::new(4, 4)
            .save(dir.join(format!("{stem}.png")))
            .unwrap();
        GrayImage::new(4, 4)
            .save(dir.join(format!("{stem}_mask.png")))
            .unwrap();
    }

    #[test]
    fn pairs_images_with_masks_in_stable_order() {
        let temp = tempfile::tempdir().unwrap();
        let train = temp.path().join("train");
        fs::create_dir_all(&train).unwrap();
        write_pair(&train, "car_b");
        write_pair(&train, "car_a");
        fs::write(train.join("notes.txt"), "ignored").unwrap();

        let dataset = CarvanaDataset::new(temp.path(), DatasetSplit::Train).unwrap();
        assert_eq!(dataset.len(), 2);
        assert!(dataset.pair(0).image.ends_with("car_a.png"));
        assert!(dataset.pair(0).mask.ends_with("car_a_mask.png"));
        assert!(dataset.pair(1).image.ends_with("car_b.png"));
    }

    #[test]
    fn missing_root_fails() {
        let err = CarvanaDataset::new("/no/such/dataset", DatasetSplit::Train).unwrap_err();
        assert!(matches!(err, PipelineError::DirectoryNotFound(_)));
    }

    #[test]
    fn missing_split_folder_fails() {
        let temp = tempfile::tempdir().unwrap();
        let err = CarvanaDataset::new(temp.path(), DatasetSplit::Validation).unwrap_err();
        assert!(matches!(err, PipelineError::DirectoryNotFound(_)));
    }

    #[test]
    fn image_without_mask_fails() {
        let temp = tempfile::tempdir().unwrap();
        let train = temp.path().join("train");
        fs::create_dir_all(&train).unwrap();
        RgbImage::new(4, 4).save(train.join("car_a.png")).unwrap();

        let err = CarvanaDataset::new(temp.path(), DatasetSplit::Train).unwrap_err();
        assert!(matches!(err, PipelineError::MaskNotFound(_)));
    }

    #[test]
    fn empty_split_folder_fails() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("train")).unwrap();

        let err = CarvanaDataset::new(temp.path(), DatasetSplit::Train).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyDataset(_)));
    }
}
