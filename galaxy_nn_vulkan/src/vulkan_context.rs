/// GpuContext - Vulkan instance and logical device shared by every GPU object
///
/// Each object created by `VulkanComputeDevice` keeps an `Arc<GpuContext>`,
/// so the device is destroyed only after the last object has been released.

use ash::vk;

/// Vulkan instance with its optional validation messenger
pub(crate) struct VulkanInstance {
    /// Vulkan loader (kept alive for the instance lifetime)
    pub(crate) _entry: ash::Entry,

    pub(crate) instance: ash::Instance,

    /// Debug utils loader and messenger (validation layers)
    #[cfg(feature = "vulkan-validation")]
    pub(crate) debug_utils: Option<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)>,
}

impl Drop for VulkanInstance {
    fn drop(&mut self) {
        unsafe {
            #[cfg(feature = "vulkan-validation")]
            if let Some((debug_utils, messenger)) = self.debug_utils.take() {
                // Stop forwarding messages before the messenger goes away
                crate::debug::cleanup_debug_config();
                debug_utils.destroy_debug_utils_messenger(messenger, None);
            }

            self.instance.destroy_instance(None);
        }
    }
}

/// Shared GPU context for all compute objects
pub struct GpuContext {
    /// Vulkan logical device
    pub device: ash::Device,

    /// Compute queue
    pub compute_queue: vk::Queue,

    /// Compute queue family index
    pub compute_queue_family: u32,

    pub(crate) physical_device: vk::PhysicalDevice,

    /// Destroyed after the device (field drop follows `Drop::drop`)
    pub(crate) instance: VulkanInstance,
}

impl GpuContext {
    pub(crate) fn new(
        instance: VulkanInstance,
        physical_device: vk::PhysicalDevice,
        device: ash::Device,
        compute_queue_family: u32,
    ) -> Self {
        let compute_queue = unsafe { device.get_device_queue(compute_queue_family, 0) };

        Self {
            device,
            compute_queue,
            compute_queue_family,
            physical_device,
            instance,
        }
    }
}

impl Drop for GpuContext {
    fn drop(&mut self) {
        unsafe {
            self.device.device_wait_idle().ok();
            self.device.destroy_device(None);
        }
    }
}
