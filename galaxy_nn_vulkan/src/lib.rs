/*!
# Galaxy NN - Vulkan Compute Backend

Vulkan implementation of the galaxy_nn compute traits.

This crate provides `VulkanComputeDevice`, a headless `ComputeDevice` built on
the Ash bindings with spirq SPIR-V reflection, and
`VulkanExternalImageAllocator` for importing hardware buffers through a
sampler YCbCr conversion.

Validation layers and the debug messenger are compiled in only with the
`vulkan-validation` feature.
*/

mod vulkan_config;
mod vulkan_context;
mod vulkan_device;
mod vulkan_reflect;
mod vulkan_shader;
mod vulkan_pipeline;
mod vulkan_descriptor_set;
mod vulkan_sampler;
mod vulkan_external_image;
#[cfg(feature = "vulkan-validation")]
mod debug;

pub use vulkan_config::{
    VulkanDeviceConfig, DebugSeverity, DebugOutput, DebugMessageFilter, ValidationStats,
};
pub use vulkan_context::GpuContext;
pub use vulkan_device::VulkanComputeDevice;
pub use vulkan_reflect::{resolve_shader_info, LOCAL_SIZE_SPECIALIZATION_ID};
pub use vulkan_descriptor_set::DESCRIPTOR_INFO_STRIDE;
pub use vulkan_external_image::{VulkanExternalImageAllocator, ExternalFormatProperties};

// Re-export debug utilities
#[cfg(feature = "vulkan-validation")]
pub use debug::{get_validation_stats, print_validation_stats_report};

/// Create a Vulkan device and register it with the engine under `name`
///
/// # Example
///
/// ```no_run
/// use galaxy_nn::galaxynn::Engine;
/// use galaxy_nn_vulkan::VulkanDeviceConfig;
///
/// Engine::initialize()?;
/// let device = galaxy_nn_vulkan::register("gpu0", VulkanDeviceConfig::default())?;
/// println!("{}", device.info().device_name);
/// # Ok::<(), galaxy_nn::galaxynn::Error>(())
/// ```
pub fn register(
    name: &str,
    config: VulkanDeviceConfig,
) -> galaxy_nn::galaxynn::Result<std::sync::Arc<dyn galaxy_nn::galaxynn::compute::ComputeDevice>> {
    galaxy_nn::galaxynn::Engine::create_device(name, VulkanComputeDevice::new(config)?)
}
