/// Compute options shared by pipelines of a network

use std::fmt;
use std::sync::Arc;
use crate::compute::PipelineCache;

/// Per-network compute options
///
/// The fp16 switches express what the network would like to use; the
/// effective choice also depends on `DeviceInfo::features`.
#[derive(Clone, Default)]
pub struct ComputeOptions {
    pub use_fp16_packed: bool,
    pub use_fp16_storage: bool,
    /// Cache overriding the device's default one
    pub pipeline_cache: Option<Arc<dyn PipelineCache>>,
}

impl ComputeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pipeline_cache(mut self, cache: Arc<dyn PipelineCache>) -> Self {
        self.pipeline_cache = Some(cache);
        self
    }
}

impl fmt::Debug for ComputeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputeOptions")
            .field("use_fp16_packed", &self.use_fp16_packed)
            .field("use_fp16_storage", &self.use_fp16_storage)
            .field("pipeline_cache", &self.pipeline_cache.is_some())
            .finish()
    }
}
