/// VulkanComputeDevice - Vulkan implementation of the ComputeDevice trait
///
/// Headless: one instance, one physical device, one compute queue. Every
/// object it creates shares the `GpuContext`, so objects may outlive the
/// `VulkanComputeDevice` itself.

use galaxy_nn::galaxynn::log::source;
use galaxy_nn::galaxynn::{Result, Error};
use galaxy_nn::galaxynn::compute::{
    ComputeDevice, ComputePipelineDesc, DescriptorSetLayout, DescriptorSetLayoutDesc,
    DescriptorUpdateTemplate, DeviceFeatures, DeviceId, DeviceInfo, DevicePipelineCache,
    ExternalSamplerDesc, PipelineCache, PipelineLayout, PipelineObject, Sampler, ShaderInfo,
    ShaderLibrary, ShaderModule,
};
use galaxy_nn::{engine_bail_warn, engine_debug, engine_err, engine_error, engine_info};
#[cfg(feature = "vulkan-validation")]
use galaxy_nn::engine_warn;
use ash::vk::{self, Handle};
use std::ffi::{CStr, CString};
use std::sync::Arc;

use crate::vulkan_config::VulkanDeviceConfig;
use crate::vulkan_context::{GpuContext, VulkanInstance};
use crate::vulkan_descriptor_set::{
    VulkanDescriptorSetLayout, VulkanDescriptorUpdateTemplate, descriptor_type_to_vk, template_entries,
};
use crate::vulkan_pipeline::{VulkanPipeline, VulkanPipelineLayout, specialization_data};
use crate::vulkan_reflect::resolve_shader_info;
use crate::vulkan_sampler::VulkanSampler;
use crate::vulkan_shader::VulkanShaderModule;

const LOG_SOURCE: &str = source::VULKAN;

/// Optional capabilities detected on the physical device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FeatureSupport {
    pub storage_16bit: bool,
    pub shader_float16: bool,
    pub int8_storage: bool,
    /// Sampler YCbCr conversion plus external hardware buffer formats
    pub ycbcr_conversion: bool,
    /// Required subgroup size honored for compute stages
    pub subgroup_size_control: bool,
    pub push_descriptor: bool,
}

/// Default and selectable subgroup sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SubgroupCaps {
    pub default: u32,
    pub min: u32,
    pub max: u32,
}

/// Capability report from Vulkan properties and detected features
pub(crate) fn build_device_info(
    device_name: String,
    limits: &vk::PhysicalDeviceLimits,
    subgroup: SubgroupCaps,
    support: FeatureSupport,
) -> DeviceInfo {
    // Templates are core since 1.1, fp16 packing only needs 32-bit storage
    let mut features = DeviceFeatures::DESCRIPTOR_UPDATE_TEMPLATE | DeviceFeatures::FP16_PACKED;
    features.set(DeviceFeatures::PUSH_DESCRIPTOR, support.push_descriptor);
    features.set(DeviceFeatures::STORAGE_16BIT, support.storage_16bit);
    features.set(DeviceFeatures::FP16_ARITHMETIC, support.shader_float16);
    features.set(DeviceFeatures::INT8_STORAGE, support.int8_storage);
    features.set(DeviceFeatures::SUBGROUP_SIZE_CONTROL, support.subgroup_size_control);
    features.set(DeviceFeatures::SAMPLER_YCBCR_CONVERSION, support.ycbcr_conversion);

    let default = subgroup.default.max(1);
    let (min, max) = if support.subgroup_size_control {
        (subgroup.min.max(1).min(default), subgroup.max.max(default))
    } else {
        (default, default)
    };

    DeviceInfo {
        device_name,
        max_workgroup_size: limits.max_compute_work_group_size,
        max_workgroup_invocations: limits.max_compute_work_group_invocations,
        subgroup_size: default,
        min_subgroup_size: min,
        max_subgroup_size: max,
        features,
    }
}

/// Physical device chosen for compute with the logical device created on it
struct SelectedDevice {
    physical_device: vk::PhysicalDevice,
    device: ash::Device,
    queue_family: u32,
    info: DeviceInfo,
}

/// Vulkan compute device
pub struct VulkanComputeDevice {
    id: DeviceId,
    ctx: Arc<GpuContext>,
    info: DeviceInfo,
    shader_library: ShaderLibrary,
    pipeline_cache: DevicePipelineCache,
}

impl VulkanComputeDevice {
    /// Create a headless compute device
    ///
    /// # Errors
    ///
    /// `InitializationFailed` when the Vulkan loader, instance, physical
    /// device or logical device cannot be set up.
    pub fn new(config: VulkanDeviceConfig) -> Result<Self> {
        let instance = Self::create_instance(&config)?;

        // On failure `instance` drops and destroys the messenger and instance
        let selected = Self::create_logical_device(&instance.instance, &config)?;

        engine_info!(LOG_SOURCE,
            "Compute device '{}' ready (subgroup {} [{}..{}], max invocations {}, features {:?})",
            selected.info.device_name,
            selected.info.subgroup_size,
            selected.info.min_subgroup_size,
            selected.info.max_subgroup_size,
            selected.info.max_workgroup_invocations,
            selected.info.features);

        let ctx = GpuContext::new(
            instance,
            selected.physical_device,
            selected.device,
            selected.queue_family,
        );

        let id = DeviceId::next();
        Ok(Self {
            id,
            ctx: Arc::new(ctx),
            info: selected.info,
            shader_library: ShaderLibrary::new(),
            pipeline_cache: DevicePipelineCache::new(id),
        })
    }

    fn create_instance(config: &VulkanDeviceConfig) -> Result<VulkanInstance> {
        let entry = unsafe { ash::Entry::load() }
            .map_err(|e| {
                engine_error!(LOG_SOURCE, "Failed to load Vulkan library: {:?}", e);
                Error::InitializationFailed(format!("Failed to load Vulkan library: {:?}", e))
            })?;

        let app_name = CString::new(config.app_name.as_str())
            .map_err(|e| Error::InitializationFailed(format!("Invalid application name: {}", e)))?;

        let app_info = vk::ApplicationInfo::default()
            .application_name(&app_name)
            .application_version(vk::make_api_version(0, 1, 0, 0))
            .engine_name(c"GalaxyNN")
            .engine_version(vk::make_api_version(0, 0, 1, 0))
            .api_version(vk::API_VERSION_1_3);

        let validation = Self::validation_requested(&entry, config);

        let mut extension_names = Vec::new();
        let mut layer_names = Vec::new();
        if validation {
            #[cfg(feature = "vulkan-validation")]
            extension_names.push(ash::ext::debug_utils::NAME.as_ptr());
            layer_names.push(c"VK_LAYER_KHRONOS_validation".as_ptr());
        }

        let create_info = vk::InstanceCreateInfo::default()
            .application_info(&app_info)
            .enabled_layer_names(&layer_names)
            .enabled_extension_names(&extension_names);

        let instance = unsafe { entry.create_instance(&create_info, None) }
            .map_err(|e| {
                engine_error!(LOG_SOURCE, "Failed to create Vulkan instance: {:?}", e);
                Error::InitializationFailed(format!("Failed to create instance: {:?}", e))
            })?;

        #[allow(unused_mut)]
        let mut vulkan_instance = VulkanInstance {
            _entry: entry,
            instance,
            #[cfg(feature = "vulkan-validation")]
            debug_utils: None,
        };

        #[cfg(feature = "vulkan-validation")]
        if validation {
            vulkan_instance.debug_utils = Some(Self::create_debug_messenger(&vulkan_instance, config)?);
        }

        Ok(vulkan_instance)
    }

    #[cfg(feature = "vulkan-validation")]
    fn validation_requested(entry: &ash::Entry, config: &VulkanDeviceConfig) -> bool {
        if !config.enable_validation {
            return false;
        }
        let layers = unsafe { entry.enumerate_instance_layer_properties() }.unwrap_or_default();
        let available = layers.iter().any(|layer| {
            layer.layer_name_as_c_str() == Ok(c"VK_LAYER_KHRONOS_validation")
        });
        if !available {
            engine_warn!(LOG_SOURCE, "VK_LAYER_KHRONOS_validation not installed, continuing without validation");
        }
        available
    }

    #[cfg(not(feature = "vulkan-validation"))]
    fn validation_requested(_entry: &ash::Entry, config: &VulkanDeviceConfig) -> bool {
        if config.enable_validation {
            engine_debug!(LOG_SOURCE, "Validation requested but the vulkan-validation feature is disabled");
        }
        false
    }

    #[cfg(feature = "vulkan-validation")]
    fn create_debug_messenger(
        vulkan_instance: &VulkanInstance,
        config: &VulkanDeviceConfig,
    ) -> Result<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)> {
        let debug_utils = ash::ext::debug_utils::Instance::new(
            &vulkan_instance._entry,
            &vulkan_instance.instance,
        );

        crate::debug::init_debug_config(crate::debug::Config::from(config));

        let debug_info = vk::DebugUtilsMessengerCreateInfoEXT::default()
            .message_severity(crate::debug::severity_flags(config.debug_severity))
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE
            )
            .pfn_user_callback(Some(crate::debug::vulkan_debug_callback));

        let messenger = unsafe { debug_utils.create_debug_utils_messenger(&debug_info, None) }
            .map_err(|e| {
                engine_error!(LOG_SOURCE, "Failed to create debug messenger: {:?}", e);
                Error::InitializationFailed(format!("Failed to create debug messenger: {:?}", e))
            })?;

        Ok((debug_utils, messenger))
    }

    fn create_logical_device(instance: &ash::Instance, config: &VulkanDeviceConfig) -> Result<SelectedDevice> {
        let init_err = |message: String| {
            engine_error!(LOG_SOURCE, "{}", message);
            Error::InitializationFailed(message)
        };

        let physical_devices = unsafe { instance.enumerate_physical_devices() }
            .map_err(|e| init_err(format!("Failed to enumerate physical devices: {:?}", e)))?;

        let physical_device = *physical_devices
            .get(config.physical_device_index)
            .ok_or_else(|| init_err(format!(
                "Physical device {} not found ({} available)",
                config.physical_device_index, physical_devices.len()
            )))?;

        let properties = unsafe { instance.get_physical_device_properties(physical_device) };
        if properties.api_version < vk::API_VERSION_1_2 {
            return Err(init_err(format!(
                "Vulkan 1.2 required, device reports {}.{}",
                vk::api_version_major(properties.api_version),
                vk::api_version_minor(properties.api_version)
            )));
        }
        let has_vulkan13 = properties.api_version >= vk::API_VERSION_1_3;

        // Prefer a dedicated compute family over a graphics one
        let queue_families = unsafe { instance.get_physical_device_queue_family_properties(physical_device) };
        let queue_family = queue_families
            .iter()
            .position(|qf| {
                qf.queue_flags.contains(vk::QueueFlags::COMPUTE)
                    && !qf.queue_flags.contains(vk::QueueFlags::GRAPHICS)
            })
            .or_else(|| queue_families.iter().position(|qf| qf.queue_flags.contains(vk::QueueFlags::COMPUTE)))
            .map(|i| i as u32)
            .ok_or_else(|| init_err("No compute queue family found".to_string()))?;

        // Device extensions
        let available = unsafe { instance.enumerate_device_extension_properties(physical_device) }
            .map_err(|e| init_err(format!("Failed to enumerate device extensions: {:?}", e)))?;
        let has_extension = |name: &CStr| {
            available.iter().any(|ext| ext.extension_name_as_c_str().is_ok_and(|n| n == name))
        };

        let has_push_descriptor = has_extension(ash::khr::push_descriptor::NAME);
        let has_hardware_buffer = has_extension(ash::android::external_memory_android_hardware_buffer::NAME)
            && has_extension(ash::ext::queue_family_foreign::NAME);

        let mut extension_names = Vec::new();
        if has_push_descriptor {
            extension_names.push(ash::khr::push_descriptor::NAME.as_ptr());
        }
        if has_hardware_buffer {
            extension_names.push(ash::android::external_memory_android_hardware_buffer::NAME.as_ptr());
            extension_names.push(ash::ext::queue_family_foreign::NAME.as_ptr());
        }

        // Features
        let mut features11 = vk::PhysicalDeviceVulkan11Features::default();
        let mut features12 = vk::PhysicalDeviceVulkan12Features::default();
        let mut features13 = vk::PhysicalDeviceVulkan13Features::default();
        let mut features2 = vk::PhysicalDeviceFeatures2::default()
            .push_next(&mut features11)
            .push_next(&mut features12);
        if has_vulkan13 {
            features2 = features2.push_next(&mut features13);
        }
        unsafe { instance.get_physical_device_features2(physical_device, &mut features2) };

        let mut subgroup_properties = vk::PhysicalDeviceSubgroupProperties::default();
        let mut size_control_properties = vk::PhysicalDeviceSubgroupSizeControlProperties::default();
        let mut properties2 = vk::PhysicalDeviceProperties2::default()
            .push_next(&mut subgroup_properties);
        if has_vulkan13 {
            properties2 = properties2.push_next(&mut size_control_properties);
        }
        unsafe { instance.get_physical_device_properties2(physical_device, &mut properties2) };

        let support = FeatureSupport {
            storage_16bit: features11.storage_buffer16_bit_access == vk::TRUE,
            shader_float16: features12.shader_float16 == vk::TRUE,
            int8_storage: features12.storage_buffer8_bit_access == vk::TRUE,
            ycbcr_conversion: features11.sampler_ycbcr_conversion == vk::TRUE && has_hardware_buffer,
            subgroup_size_control: has_vulkan13
                && features13.subgroup_size_control == vk::TRUE
                && size_control_properties
                    .required_subgroup_size_stages
                    .contains(vk::ShaderStageFlags::COMPUTE),
            push_descriptor: has_push_descriptor,
        };

        let subgroup = SubgroupCaps {
            default: subgroup_properties.subgroup_size,
            min: size_control_properties.min_subgroup_size,
            max: size_control_properties.max_subgroup_size,
        };

        let device_name = properties
            .device_name_as_c_str()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "Unknown device".to_string());

        let info = build_device_info(device_name, &properties.limits, subgroup, support);

        // Logical device
        let queue_priorities = [1.0];
        let queue_create_infos = [
            vk::DeviceQueueCreateInfo::default()
                .queue_family_index(queue_family)
                .queue_priorities(&queue_priorities),
        ];

        let mut enable11 = vk::PhysicalDeviceVulkan11Features::default()
            .storage_buffer16_bit_access(support.storage_16bit)
            .sampler_ycbcr_conversion(support.ycbcr_conversion);
        let mut enable12 = vk::PhysicalDeviceVulkan12Features::default()
            .shader_float16(support.shader_float16)
            .storage_buffer8_bit_access(support.int8_storage)
            .shader_int8(features12.shader_int8 == vk::TRUE);
        let mut enable13 = vk::PhysicalDeviceVulkan13Features::default()
            .subgroup_size_control(support.subgroup_size_control);

        let mut device_create_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_create_infos)
            .enabled_extension_names(&extension_names)
            .push_next(&mut enable11)
            .push_next(&mut enable12);
        if has_vulkan13 {
            device_create_info = device_create_info.push_next(&mut enable13);
        }

        let device = unsafe { instance.create_device(physical_device, &device_create_info, None) }
            .map_err(|e| init_err(format!("Failed to create logical device: {:?}", e)))?;

        Ok(SelectedDevice {
            physical_device,
            device,
            queue_family,
            info,
        })
    }

    pub(crate) fn context(&self) -> &Arc<GpuContext> {
        &self.ctx
    }

    /// Raw ash device, for command recording outside this crate
    pub fn raw_device(&self) -> &ash::Device {
        &self.ctx.device
    }

    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.ctx.physical_device
    }

    pub fn compute_queue(&self) -> vk::Queue {
        self.ctx.compute_queue
    }

    pub fn compute_queue_family(&self) -> u32 {
        self.ctx.compute_queue_family
    }

    /// Typed default cache (the trait accessor hides `len` and `clear`)
    pub fn device_pipeline_cache(&self) -> &DevicePipelineCache {
        &self.pipeline_cache
    }
}

impl ComputeDevice for VulkanComputeDevice {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn info(&self) -> &DeviceInfo {
        &self.info
    }

    fn shader_library(&self) -> &ShaderLibrary {
        &self.shader_library
    }

    fn pipeline_cache(&self) -> &dyn PipelineCache {
        &self.pipeline_cache
    }

    fn create_shader_module(&self, spirv: &[u32]) -> Result<Arc<dyn ShaderModule>> {
        if spirv.is_empty() {
            engine_bail_warn!(LOG_SOURCE, "Cannot create a shader module from empty SPIR-V");
        }

        let shader_info = resolve_shader_info(spirv)?;

        let create_info = vk::ShaderModuleCreateInfo::default().code(spirv);
        let module = unsafe { self.ctx.device.create_shader_module(&create_info, None) }
            .map_err(|e| engine_err!(LOG_SOURCE, "Failed to create shader module: {:?}", e))?;

        Ok(Arc::new(VulkanShaderModule {
            module,
            shader_info,
            ctx: Arc::clone(&self.ctx),
        }))
    }

    fn create_descriptorset_layout(
        &self,
        desc: &DescriptorSetLayoutDesc,
    ) -> Result<Arc<dyn DescriptorSetLayout>> {
        if desc.push_descriptor && !self.info.support_push_descriptor() {
            engine_bail_warn!(LOG_SOURCE, "Push descriptors requested but VK_KHR_push_descriptor is unavailable");
        }

        let samplers: Vec<vk::Sampler> = desc
            .bindings
            .iter()
            .map(|b| {
                b.immutable_sampler
                    .as_ref()
                    .map(|s| vk::Sampler::from_raw(s.raw_handle()))
                    .unwrap_or_default()
            })
            .collect();

        let bindings: Vec<vk::DescriptorSetLayoutBinding> = desc
            .bindings
            .iter()
            .zip(&samplers)
            .map(|(b, sampler)| {
                let binding = vk::DescriptorSetLayoutBinding::default()
                    .binding(b.binding)
                    .descriptor_type(descriptor_type_to_vk(b.binding_type))
                    .descriptor_count(1)
                    .stage_flags(vk::ShaderStageFlags::COMPUTE);
                if b.immutable_sampler.is_some() {
                    binding.immutable_samplers(std::slice::from_ref(sampler))
                } else {
                    binding
                }
            })
            .collect();

        let flags = if desc.push_descriptor {
            vk::DescriptorSetLayoutCreateFlags::PUSH_DESCRIPTOR_KHR
        } else {
            vk::DescriptorSetLayoutCreateFlags::empty()
        };

        let create_info = vk::DescriptorSetLayoutCreateInfo::default()
            .flags(flags)
            .bindings(&bindings);

        let layout = unsafe { self.ctx.device.create_descriptor_set_layout(&create_info, None) }
            .map_err(|e| engine_err!(LOG_SOURCE, "Failed to create descriptor set layout: {:?}", e))?;

        Ok(Arc::new(VulkanDescriptorSetLayout {
            layout,
            push_descriptor: desc.push_descriptor,
            _immutable_samplers: desc.bindings.iter().filter_map(|b| b.immutable_sampler.clone()).collect(),
            ctx: Arc::clone(&self.ctx),
        }))
    }

    fn create_pipeline_layout(
        &self,
        set_layout: &Arc<dyn DescriptorSetLayout>,
        push_constant_count: u32,
    ) -> Result<Arc<dyn PipelineLayout>> {
        let set_layouts = [vk::DescriptorSetLayout::from_raw(set_layout.raw_handle())];
        let push_constant_ranges = [
            vk::PushConstantRange::default()
                .stage_flags(vk::ShaderStageFlags::COMPUTE)
                .offset(0)
                .size(push_constant_count * std::mem::size_of::<u32>() as u32),
        ];

        let mut create_info = vk::PipelineLayoutCreateInfo::default().set_layouts(&set_layouts);
        if push_constant_count > 0 {
            create_info = create_info.push_constant_ranges(&push_constant_ranges);
        }

        let layout = unsafe { self.ctx.device.create_pipeline_layout(&create_info, None) }
            .map_err(|e| engine_err!(LOG_SOURCE, "Failed to create pipeline layout: {:?}", e))?;

        Ok(Arc::new(VulkanPipelineLayout {
            layout,
            _set_layout: Arc::clone(set_layout),
            ctx: Arc::clone(&self.ctx),
        }))
    }

    fn create_pipeline(&self, desc: &ComputePipelineDesc) -> Result<Arc<dyn PipelineObject>> {
        let (map_entries, data) = specialization_data(desc.specializations, desc.local_size);
        let specialization_info = vk::SpecializationInfo::default()
            .map_entries(&map_entries)
            .data(bytemuck::cast_slice(&data));

        let mut required_subgroup = vk::PipelineShaderStageRequiredSubgroupSizeCreateInfo::default()
            .required_subgroup_size(desc.subgroup_size);

        let mut stage = vk::PipelineShaderStageCreateInfo::default()
            .stage(vk::ShaderStageFlags::COMPUTE)
            .module(vk::ShaderModule::from_raw(desc.shader_module.raw_handle()))
            .name(c"main")
            .specialization_info(&specialization_info);
        if self.info.support_subgroup_size_control() && desc.subgroup_size.is_power_of_two() {
            stage = stage.push_next(&mut required_subgroup);
        }

        let create_info = vk::ComputePipelineCreateInfo::default()
            .stage(stage)
            .layout(vk::PipelineLayout::from_raw(desc.pipeline_layout.raw_handle()));

        let pipelines = unsafe {
            self.ctx.device.create_compute_pipelines(vk::PipelineCache::null(), &[create_info], None)
        }
        .map_err(|(_, e)| engine_err!(LOG_SOURCE, "Failed to create compute pipeline: {:?}", e))?;

        let pipeline = pipelines
            .into_iter()
            .next()
            .ok_or_else(|| engine_err!(LOG_SOURCE, "Driver returned no compute pipeline"))?;

        engine_debug!(LOG_SOURCE,
            "Compute pipeline created (local size {}x{}x{}, {} specializations)",
            desc.local_size.x, desc.local_size.y, desc.local_size.z, desc.specializations.len());

        Ok(Arc::new(VulkanPipeline {
            pipeline,
            ctx: Arc::clone(&self.ctx),
        }))
    }

    fn create_descriptor_update_template(
        &self,
        shader_info: &ShaderInfo,
        set_layout: &Arc<dyn DescriptorSetLayout>,
        pipeline_layout: &Arc<dyn PipelineLayout>,
    ) -> Result<Arc<dyn DescriptorUpdateTemplate>> {
        let entries = template_entries(shader_info);

        let template_type = if set_layout.is_push_descriptor() {
            vk::DescriptorUpdateTemplateType::PUSH_DESCRIPTORS_KHR
        } else {
            vk::DescriptorUpdateTemplateType::DESCRIPTOR_SET
        };

        let create_info = vk::DescriptorUpdateTemplateCreateInfo::default()
            .descriptor_update_entries(&entries)
            .template_type(template_type)
            .descriptor_set_layout(vk::DescriptorSetLayout::from_raw(set_layout.raw_handle()))
            .pipeline_bind_point(vk::PipelineBindPoint::COMPUTE)
            .pipeline_layout(vk::PipelineLayout::from_raw(pipeline_layout.raw_handle()))
            .set(0);

        let template = unsafe { self.ctx.device.create_descriptor_update_template(&create_info, None) }
            .map_err(|e| engine_err!(LOG_SOURCE, "Failed to create descriptor update template: {:?}", e))?;

        Ok(Arc::new(VulkanDescriptorUpdateTemplate {
            template,
            ctx: Arc::clone(&self.ctx),
        }))
    }

    fn create_sampler(&self, desc: &ExternalSamplerDesc) -> Result<Arc<dyn Sampler>> {
        if desc.ycbcr_conversion.is_some() && !self.info.supports(DeviceFeatures::SAMPLER_YCBCR_CONVERSION) {
            engine_bail_warn!(LOG_SOURCE, "Sampler YCbCr conversion is not supported by this device");
        }

        Ok(Arc::new(VulkanSampler::new(&self.ctx, desc)?))
    }
}

impl Drop for VulkanComputeDevice {
    fn drop(&mut self) {
        engine_debug!(LOG_SOURCE,
            "Compute device '{}' released ({} cached pipelines)",
            self.info.device_name, self.pipeline_cache.len());
    }
}

#[cfg(test)]
#[path = "vulkan_device_tests.rs"]
mod tests;
