/// External image allocator for platform hardware buffers (Android AHardwareBuffer)
///
/// Owns the YCbCr conversion matching the buffer's external format and
/// reports the image extent to `HardwareBufferImportPipeline`.

use galaxy_nn::galaxynn::log::source;
use galaxy_nn::galaxynn::Result;
use galaxy_nn::galaxynn::compute::{ComputeDevice, DeviceFeatures, ExternalImageAllocator, YcbcrConversion};
use galaxy_nn::{engine_bail_warn, engine_err, engine_debug};
use ash::vk;
use std::sync::Arc;
use crate::vulkan_device::VulkanComputeDevice;
use crate::vulkan_sampler::VulkanYcbcrConversion;

/// Format properties of an external buffer, as reported by
/// `vkGetAndroidHardwareBufferPropertiesANDROID`
#[derive(Debug, Clone, Copy)]
pub struct ExternalFormatProperties {
    /// Opaque external format token (non-zero)
    pub external_format: u64,
    pub ycbcr_model: vk::SamplerYcbcrModelConversion,
    pub ycbcr_range: vk::SamplerYcbcrRange,
    pub components: vk::ComponentMapping,
    pub x_chroma_offset: vk::ChromaLocation,
    pub y_chroma_offset: vk::ChromaLocation,
}

impl ExternalFormatProperties {
    /// Properties with the BT.601 narrow-range defaults used by camera buffers
    pub fn new(external_format: u64) -> Self {
        Self {
            external_format,
            ycbcr_model: vk::SamplerYcbcrModelConversion::YCBCR_601,
            ycbcr_range: vk::SamplerYcbcrRange::ITU_NARROW,
            components: vk::ComponentMapping::default(),
            x_chroma_offset: vk::ChromaLocation::MIDPOINT,
            y_chroma_offset: vk::ChromaLocation::MIDPOINT,
        }
    }
}

/// YCbCr conversion for one external format plus the image extent
///
/// Samplers built from this allocator share the conversion, so dropping the
/// allocator first is fine.
pub struct VulkanExternalImageAllocator {
    width: u32,
    height: u32,
    external_format: u64,
    conversion: Arc<VulkanYcbcrConversion>,
}

impl VulkanExternalImageAllocator {
    pub fn new(
        device: &VulkanComputeDevice,
        width: u32,
        height: u32,
        properties: &ExternalFormatProperties,
    ) -> Result<Self> {
        if !device.info().supports(DeviceFeatures::SAMPLER_YCBCR_CONVERSION) {
            engine_bail_warn!(source::VULKAN, "Device does not support sampler YCbCr conversion");
        }
        if properties.external_format == 0 {
            engine_bail_warn!(source::VULKAN, "External format token must be non-zero");
        }

        let ctx = device.context();

        let mut external_format = vk::ExternalFormatANDROID::default()
            .external_format(properties.external_format);

        let create_info = vk::SamplerYcbcrConversionCreateInfo::default()
            .format(vk::Format::UNDEFINED)
            .ycbcr_model(properties.ycbcr_model)
            .ycbcr_range(properties.ycbcr_range)
            .components(properties.components)
            .x_chroma_offset(properties.x_chroma_offset)
            .y_chroma_offset(properties.y_chroma_offset)
            .chroma_filter(vk::Filter::NEAREST)
            .force_explicit_reconstruction(false)
            .push_next(&mut external_format);

        let conversion = unsafe {
            ctx.device.create_sampler_ycbcr_conversion(&create_info, None)
                .map_err(|e| engine_err!(source::VULKAN, "Failed to create YCbCr conversion: {:?}", e))?
        };

        engine_debug!(source::VULKAN,
            "YCbCr conversion created for external format {:#x} ({}x{})",
            properties.external_format, width, height);

        Ok(Self {
            width,
            height,
            external_format: properties.external_format,
            conversion: Arc::new(VulkanYcbcrConversion {
                conversion,
                ctx: Arc::clone(ctx),
            }),
        })
    }

    pub fn conversion(&self) -> vk::SamplerYcbcrConversion {
        self.conversion.conversion
    }
}

impl ExternalImageAllocator for VulkanExternalImageAllocator {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn external_format(&self) -> u64 {
        self.external_format
    }

    fn ycbcr_conversion(&self) -> Arc<dyn YcbcrConversion> {
        self.conversion.clone()
    }
}
