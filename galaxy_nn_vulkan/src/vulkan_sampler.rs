/// Samplers for externally allocated (YCbCr) images

use galaxy_nn::galaxynn::log::source;
use galaxy_nn::galaxynn::Result;
use galaxy_nn::galaxynn::compute::{ExternalSamplerDesc, Sampler, SamplerFilter, YcbcrConversion};
use galaxy_nn::engine_err;
use ash::vk::{self, Handle};
use std::sync::Arc;
use crate::vulkan_context::GpuContext;

/// Sampler YCbCr conversion
pub struct VulkanYcbcrConversion {
    pub(crate) conversion: vk::SamplerYcbcrConversion,
    pub(crate) ctx: Arc<GpuContext>,
}

impl YcbcrConversion for VulkanYcbcrConversion {
    fn raw_handle(&self) -> u64 {
        self.conversion.as_raw()
    }
}

impl Drop for VulkanYcbcrConversion {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_sampler_ycbcr_conversion(self.conversion, None);
        }
    }
}

/// Vulkan sampler, optionally bound to a YCbCr conversion
pub struct VulkanSampler {
    pub(crate) sampler: vk::Sampler,
    // released after the sampler (fields drop after `Drop::drop`)
    _ycbcr_conversion: Option<Arc<dyn YcbcrConversion>>,
    pub(crate) ctx: Arc<GpuContext>,
}

/// Sampler state for an imported image, without the conversion chain
///
/// Clamp-to-edge on every axis, no mipmapping or anisotropy.
pub(crate) fn sampler_create_info<'a>(desc: &ExternalSamplerDesc) -> vk::SamplerCreateInfo<'a> {
    let filter = match desc.filter {
        SamplerFilter::Nearest => vk::Filter::NEAREST,
        SamplerFilter::Linear => vk::Filter::LINEAR,
    };
    let address = vk::SamplerAddressMode::CLAMP_TO_EDGE;

    vk::SamplerCreateInfo::default()
        .mag_filter(filter)
        .min_filter(filter)
        .mipmap_mode(vk::SamplerMipmapMode::NEAREST)
        .address_mode_u(address)
        .address_mode_v(address)
        .address_mode_w(address)
        .mip_lod_bias(0.0)
        .anisotropy_enable(false)
        .max_anisotropy(1.0)
        .compare_enable(false)
        .compare_op(vk::CompareOp::NEVER)
        .min_lod(0.0)
        .max_lod(0.0)
        .border_color(vk::BorderColor::FLOAT_TRANSPARENT_BLACK)
        .unnormalized_coordinates(desc.unnormalized_coordinates)
}

impl VulkanSampler {
    pub(crate) fn new(ctx: &Arc<GpuContext>, desc: &ExternalSamplerDesc) -> Result<Self> {
        let conversion = desc.ycbcr_conversion_handle();
        let mut conversion_info = vk::SamplerYcbcrConversionInfo::default()
            .conversion(vk::SamplerYcbcrConversion::from_raw(conversion));

        let mut create_info = sampler_create_info(desc);
        if conversion != 0 {
            create_info = create_info.push_next(&mut conversion_info);
        }

        let sampler = unsafe {
            ctx.device.create_sampler(&create_info, None)
                .map_err(|e| engine_err!(source::VULKAN, "Failed to create sampler: {:?}", e))?
        };

        Ok(Self {
            sampler,
            _ycbcr_conversion: desc.ycbcr_conversion.clone(),
            ctx: Arc::clone(ctx),
        })
    }
}

impl Sampler for VulkanSampler {
    fn raw_handle(&self) -> u64 {
        self.sampler.as_raw()
    }
}

impl Drop for VulkanSampler {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_sampler(self.sampler, None);
        }
    }
}

#[cfg(test)]
#[path = "vulkan_sampler_tests.rs"]
mod tests;
