/// Compute pipeline and pipeline layout objects

use galaxy_nn::galaxynn::compute::{
    DescriptorSetLayout, LocalSize, PipelineLayout, PipelineObject, SpecializationValue,
    pack_specializations,
};
use ash::vk::{self, Handle};
use std::mem::size_of;
use std::sync::Arc;
use crate::vulkan_context::GpuContext;
use crate::vulkan_reflect::LOCAL_SIZE_SPECIALIZATION_ID;

/// Specialization map entries and their packed data
///
/// Shader constants take ids 0..n; the local size follows at ids 233, 234, 235.
pub(crate) fn specialization_data(
    specializations: &[SpecializationValue],
    local_size: LocalSize,
) -> (Vec<vk::SpecializationMapEntry>, Vec<u32>) {
    let mut data = pack_specializations(specializations);
    data.extend([local_size.x, local_size.y, local_size.z]);

    let word = size_of::<u32>();
    let ids = (0..specializations.len() as u32)
        .chain(LOCAL_SIZE_SPECIALIZATION_ID..LOCAL_SIZE_SPECIALIZATION_ID + 3);

    let entries = ids
        .enumerate()
        .map(|(slot, constant_id)| {
            vk::SpecializationMapEntry::default()
                .constant_id(constant_id)
                .offset((slot * word) as u32)
                .size(word)
        })
        .collect();

    (entries, data)
}

/// Vulkan pipeline layout
pub struct VulkanPipelineLayout {
    pub(crate) layout: vk::PipelineLayout,
    pub(crate) _set_layout: Arc<dyn DescriptorSetLayout>,
    pub(crate) ctx: Arc<GpuContext>,
}

impl PipelineLayout for VulkanPipelineLayout {
    fn raw_handle(&self) -> u64 {
        self.layout.as_raw()
    }
}

impl Drop for VulkanPipelineLayout {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_pipeline_layout(self.layout, None);
        }
    }
}

/// Vulkan compute pipeline
pub struct VulkanPipeline {
    pub(crate) pipeline: vk::Pipeline,
    pub(crate) ctx: Arc<GpuContext>,
}

impl PipelineObject for VulkanPipeline {
    fn raw_handle(&self) -> u64 {
        self.pipeline.as_raw()
    }
}

impl Drop for VulkanPipeline {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_pipeline(self.pipeline, None);
        }
    }
}

#[cfg(test)]
#[path = "vulkan_pipeline_tests.rs"]
mod tests;
