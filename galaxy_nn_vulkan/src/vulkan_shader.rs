/// VulkanShaderModule - Vulkan implementation of the ShaderModule trait

use galaxy_nn::galaxynn::compute::{ShaderInfo, ShaderModule};
use ash::vk::{self, Handle};
use std::sync::Arc;
use crate::vulkan_context::GpuContext;

/// Compiled SPIR-V module with its reflection data
pub struct VulkanShaderModule {
    pub(crate) module: vk::ShaderModule,
    pub(crate) shader_info: ShaderInfo,
    /// Keeps the device alive until the module is destroyed
    pub(crate) ctx: Arc<GpuContext>,
}

impl ShaderModule for VulkanShaderModule {
    fn raw_handle(&self) -> u64 {
        self.module.as_raw()
    }

    fn shader_info(&self) -> &ShaderInfo {
        &self.shader_info
    }
}

impl Drop for VulkanShaderModule {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_shader_module(self.module, None);
        }
    }
}
