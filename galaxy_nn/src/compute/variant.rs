/// Closed set of compute pipeline kinds

use crate::compute::{HardwareBufferImportPipeline, Pipeline};

/// A pipeline as held by a layer
#[derive(Debug)]
pub enum ComputePipelineVariant {
    /// Shader built from SPIR-V or a shader index
    Generic(Pipeline),
    /// External image import with YCbCr conversion
    HardwareBufferImport(HardwareBufferImportPipeline),
}

impl ComputePipelineVariant {
    /// Base pipeline, for command recording
    pub fn pipeline(&self) -> &Pipeline {
        match self {
            ComputePipelineVariant::Generic(p) => p,
            ComputePipelineVariant::HardwareBufferImport(p) => p.pipeline(),
        }
    }

    pub fn is_created(&self) -> bool {
        self.pipeline().is_created()
    }

    pub fn destroy(&mut self) {
        match self {
            ComputePipelineVariant::Generic(p) => p.destroy(),
            ComputePipelineVariant::HardwareBufferImport(p) => p.destroy(),
        }
    }
}

impl From<Pipeline> for ComputePipelineVariant {
    fn from(pipeline: Pipeline) -> Self {
        ComputePipelineVariant::Generic(pipeline)
    }
}

impl From<HardwareBufferImportPipeline> for ComputePipelineVariant {
    fn from(pipeline: HardwareBufferImportPipeline) -> Self {
        ComputePipelineVariant::HardwareBufferImport(pipeline)
    }
}

#[cfg(test)]
#[path = "variant_tests.rs"]
mod tests;
