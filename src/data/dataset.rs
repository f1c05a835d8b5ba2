use burn::data::dataset::Dataset;

/// One training row: a flattened landmark vector and its class index.
#[derive(Debug, Clone)]
pub struct LandmarkSample {
    pub features: Vec<f32>,
    pub target:   usize,
}

pub struct LandmarkDataset {
    samples: Vec<LandmarkSample>,
}

impl LandmarkDataset {
    pub fn new(samples: Vec<LandmarkSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl Dataset<LandmarkSample> for LandmarkDataset {
    fn get(&self, index: usize) -> Option<LandmarkSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
