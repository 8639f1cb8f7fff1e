/// Compute device trait and GPU object traits
///
/// Backends (Vulkan) implement `ComputeDevice` as a factory for the objects a
/// compute pipeline is made of. Every object releases its native handle when
/// the last `Arc` is dropped.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use bitflags::bitflags;
use crate::error::Result;
use crate::compute::{
    ShaderInfo, DescriptorBindingType, SpecializationValue, LocalSize,
    WorkgroupLimits, ShaderLibrary, PipelineCache,
};

// ===== GPU OBJECTS =====

/// Compiled shader module
pub trait ShaderModule: Send + Sync {
    /// Native handle as a 64-bit value (e.g. `VkShaderModule`)
    fn raw_handle(&self) -> u64;

    /// Reflection data resolved when the module was compiled
    fn shader_info(&self) -> &ShaderInfo;
}

/// Descriptor set layout
pub trait DescriptorSetLayout: Send + Sync {
    fn raw_handle(&self) -> u64;

    /// True when created for push-descriptor updates
    fn is_push_descriptor(&self) -> bool;
}

/// Pipeline layout (descriptor set layout + push constant range)
pub trait PipelineLayout: Send + Sync {
    fn raw_handle(&self) -> u64;
}

/// Compiled compute pipeline
pub trait PipelineObject: Send + Sync {
    fn raw_handle(&self) -> u64;
}

/// Descriptor update template
pub trait DescriptorUpdateTemplate: Send + Sync {
    fn raw_handle(&self) -> u64;
}

/// Sampler (immutable YCbCr sampler for imported images)
pub trait Sampler: Send + Sync {
    fn raw_handle(&self) -> u64;
}

/// Sampler YCbCr conversion for one external image format
///
/// Samplers created with a conversion hold a reference to it, so the
/// conversion is released after every sampler using it.
pub trait YcbcrConversion: Send + Sync {
    fn raw_handle(&self) -> u64;
}

// ===== DEVICE CAPABILITIES =====

bitflags! {
    /// Optional device capabilities relevant to compute pipelines
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DeviceFeatures: u32 {
        const DESCRIPTOR_UPDATE_TEMPLATE = 1 << 0;
        const PUSH_DESCRIPTOR            = 1 << 1;
        const STORAGE_16BIT              = 1 << 2;
        const FP16_PACKED                = 1 << 3;
        const FP16_ARITHMETIC            = 1 << 4;
        const INT8_STORAGE               = 1 << 5;
        const SUBGROUP_SIZE_CONTROL      = 1 << 6;
        const SAMPLER_YCBCR_CONVERSION   = 1 << 7;
    }
}

/// Capability report of a compute device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Device name as reported by the driver
    pub device_name: String,
    /// Per-axis maximum workgroup size
    pub max_workgroup_size: [u32; 3],
    /// Maximum invocations per workgroup
    pub max_workgroup_invocations: u32,
    /// Default subgroup size
    pub subgroup_size: u32,
    /// Smallest subgroup size the device can be asked for
    pub min_subgroup_size: u32,
    /// Largest subgroup size the device can be asked for
    pub max_subgroup_size: u32,
    /// Optional features
    pub features: DeviceFeatures,
}

impl DeviceInfo {
    /// Workgroup limits for the optimizer
    pub fn limits(&self) -> WorkgroupLimits {
        WorkgroupLimits {
            max_size: self.max_workgroup_size,
            max_invocations: self.max_workgroup_invocations,
        }
    }

    pub fn supports(&self, features: DeviceFeatures) -> bool {
        self.features.contains(features)
    }

    pub fn support_descriptor_update_template(&self) -> bool {
        self.supports(DeviceFeatures::DESCRIPTOR_UPDATE_TEMPLATE)
    }

    pub fn support_push_descriptor(&self) -> bool {
        self.supports(DeviceFeatures::PUSH_DESCRIPTOR)
    }

    pub fn support_16bit_storage(&self) -> bool {
        self.supports(DeviceFeatures::STORAGE_16BIT)
    }

    pub fn support_subgroup_size_control(&self) -> bool {
        self.supports(DeviceFeatures::SUBGROUP_SIZE_CONTROL)
    }

    /// Clamp a requested subgroup size into the device bounds
    pub fn clamp_subgroup_size(&self, requested: u32) -> u32 {
        let min = self.min_subgroup_size.max(1);
        let max = self.max_subgroup_size.max(min);
        requested.clamp(min, max)
    }
}

// ===== DESCRIPTORS =====

/// One binding of a descriptor set layout
#[derive(Clone)]
pub struct DescriptorSetLayoutBinding {
    pub binding: u32,
    pub binding_type: DescriptorBindingType,
    /// Immutable sampler baked into the layout (combined image sampler only)
    pub immutable_sampler: Option<Arc<dyn Sampler>>,
}

impl fmt::Debug for DescriptorSetLayoutBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorSetLayoutBinding")
            .field("binding", &self.binding)
            .field("binding_type", &self.binding_type)
            .field("immutable_sampler", &self.immutable_sampler.as_ref().map(|s| s.raw_handle()))
            .finish()
    }
}

/// Descriptor set layout creation parameters
#[derive(Debug, Clone, Default)]
pub struct DescriptorSetLayoutDesc {
    pub bindings: Vec<DescriptorSetLayoutBinding>,
    /// Request push-descriptor updates instead of allocated sets
    pub push_descriptor: bool,
}

impl DescriptorSetLayoutDesc {
    /// Layout matching a shader's reflected bindings (no immutable samplers)
    pub fn from_shader_info(shader_info: &ShaderInfo, push_descriptor: bool) -> Self {
        let bindings = shader_info
            .binding_types
            .iter()
            .enumerate()
            .map(|(i, &binding_type)| DescriptorSetLayoutBinding {
                binding: i as u32,
                binding_type,
                immutable_sampler: None,
            })
            .collect();

        Self { bindings, push_descriptor }
    }
}

/// Compute pipeline creation parameters
pub struct ComputePipelineDesc<'a> {
    pub shader_module: &'a Arc<dyn ShaderModule>,
    pub pipeline_layout: &'a Arc<dyn PipelineLayout>,
    pub specializations: &'a [SpecializationValue],
    pub local_size: LocalSize,
    /// Required subgroup size, honored when the device supports it
    pub subgroup_size: u32,
}

/// Sampler filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerFilter {
    Nearest,
    Linear,
}

/// Sampler for an externally allocated image
///
/// Addressing is always clamp-to-edge.
#[derive(Clone)]
pub struct ExternalSamplerDesc {
    pub filter: SamplerFilter,
    pub unnormalized_coordinates: bool,
    /// Opaque platform format token of the external image
    pub external_format: u64,
    /// Conversion kept alive by the sampler
    pub ycbcr_conversion: Option<Arc<dyn YcbcrConversion>>,
}

impl ExternalSamplerDesc {
    /// Native conversion handle (0 when none)
    pub fn ycbcr_conversion_handle(&self) -> u64 {
        self.ycbcr_conversion.as_ref().map_or(0, |c| c.raw_handle())
    }
}

impl fmt::Debug for ExternalSamplerDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalSamplerDesc")
            .field("filter", &self.filter)
            .field("unnormalized_coordinates", &self.unnormalized_coordinates)
            .field("external_format", &self.external_format)
            .field("ycbcr_conversion", &self.ycbcr_conversion_handle())
            .finish()
    }
}

// ===== DEVICE =====

/// Process-unique identity of a compute device
///
/// Native handles are only valid on the device that created them; caches use
/// this to refuse requests coming from another device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId(u64);

impl DeviceId {
    /// Allocate a fresh identity (never reused within a process)
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device#{}", self.0)
    }
}

/// Compute device factory
///
/// Object creation is thread safe. Objects may outlive any `Pipeline` that
/// uses them but never the device itself (backends keep the native device
/// alive through shared ownership).
pub trait ComputeDevice: Send + Sync {
    /// Identity assigned when the device was created
    fn id(&self) -> DeviceId;

    /// Capability report
    fn info(&self) -> &DeviceInfo;

    /// Precompiled shaders addressable by index
    fn shader_library(&self) -> &ShaderLibrary;

    /// Default pipeline cache of this device
    fn pipeline_cache(&self) -> &dyn PipelineCache;

    /// Compile SPIR-V words into a shader module and reflect it
    fn create_shader_module(&self, spirv: &[u32]) -> Result<Arc<dyn ShaderModule>>;

    fn create_descriptorset_layout(
        &self,
        desc: &DescriptorSetLayoutDesc,
    ) -> Result<Arc<dyn DescriptorSetLayout>>;

    /// Pipeline layout with a single set and `push_constant_count` 32-bit push constants
    fn create_pipeline_layout(
        &self,
        set_layout: &Arc<dyn DescriptorSetLayout>,
        push_constant_count: u32,
    ) -> Result<Arc<dyn PipelineLayout>>;

    fn create_pipeline(&self, desc: &ComputePipelineDesc) -> Result<Arc<dyn PipelineObject>>;

    /// Template writing `shader_info.binding_count` descriptors in one call
    fn create_descriptor_update_template(
        &self,
        shader_info: &ShaderInfo,
        set_layout: &Arc<dyn DescriptorSetLayout>,
        pipeline_layout: &Arc<dyn PipelineLayout>,
    ) -> Result<Arc<dyn DescriptorUpdateTemplate>>;

    fn create_sampler(&self, desc: &ExternalSamplerDesc) -> Result<Arc<dyn Sampler>>;
}
