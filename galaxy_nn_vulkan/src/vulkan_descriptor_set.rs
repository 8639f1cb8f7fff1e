/// Descriptor set layouts and descriptor update templates

use galaxy_nn::galaxynn::compute::{
    DescriptorBindingType, DescriptorSetLayout, DescriptorUpdateTemplate, Sampler, ShaderInfo,
};
use ash::vk::{self, Handle};
use std::mem::size_of;
use std::sync::Arc;
use crate::vulkan_context::GpuContext;

/// Byte stride between consecutive descriptor infos in template update data
///
/// Buffer and image infos share one slot size so a single array can mix them.
pub const DESCRIPTOR_INFO_STRIDE: usize = {
    let buffer = size_of::<vk::DescriptorBufferInfo>();
    let image = size_of::<vk::DescriptorImageInfo>();
    if buffer > image { buffer } else { image }
};

pub(crate) fn descriptor_type_to_vk(binding_type: DescriptorBindingType) -> vk::DescriptorType {
    match binding_type {
        DescriptorBindingType::StorageBuffer => vk::DescriptorType::STORAGE_BUFFER,
        DescriptorBindingType::StorageImage => vk::DescriptorType::STORAGE_IMAGE,
        DescriptorBindingType::CombinedImageSampler => vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
    }
}

/// One template entry per binding, each reading one descriptor info
pub(crate) fn template_entries(shader_info: &ShaderInfo) -> Vec<vk::DescriptorUpdateTemplateEntry> {
    shader_info
        .binding_types
        .iter()
        .enumerate()
        .map(|(i, &binding_type)| {
            vk::DescriptorUpdateTemplateEntry::default()
                .dst_binding(i as u32)
                .dst_array_element(0)
                .descriptor_count(1)
                .descriptor_type(descriptor_type_to_vk(binding_type))
                .offset(i * DESCRIPTOR_INFO_STRIDE)
                .stride(DESCRIPTOR_INFO_STRIDE)
        })
        .collect()
}

/// Vulkan descriptor set layout
pub struct VulkanDescriptorSetLayout {
    pub(crate) layout: vk::DescriptorSetLayout,
    pub(crate) push_descriptor: bool,
    /// Immutable samplers referenced by the layout
    pub(crate) _immutable_samplers: Vec<Arc<dyn Sampler>>,
    pub(crate) ctx: Arc<GpuContext>,
}

impl DescriptorSetLayout for VulkanDescriptorSetLayout {
    fn raw_handle(&self) -> u64 {
        self.layout.as_raw()
    }

    fn is_push_descriptor(&self) -> bool {
        self.push_descriptor
    }
}

impl Drop for VulkanDescriptorSetLayout {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_descriptor_set_layout(self.layout, None);
        }
    }
}

/// Vulkan descriptor update template
pub struct VulkanDescriptorUpdateTemplate {
    pub(crate) template: vk::DescriptorUpdateTemplate,
    pub(crate) ctx: Arc<GpuContext>,
}

impl DescriptorUpdateTemplate for VulkanDescriptorUpdateTemplate {
    fn raw_handle(&self) -> u64 {
        self.template.as_raw()
    }
}

impl Drop for VulkanDescriptorUpdateTemplate {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_descriptor_update_template(self.template, None);
        }
    }
}
