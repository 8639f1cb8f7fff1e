//! Compute pipeline
//!
//! A `Pipeline` is bound to one device, configured (local size, subgroup
//! size) while empty, then filled by `create` through a pipeline cache. The
//! handles it receives are shared with the cache; the native objects are
//! released when the last holder drops them.

use std::fmt;
use std::sync::Arc;
use crate::error::{Error, Result};
use crate::log::source;
use crate::compute::{
    ComputeDevice, ComputeOptions, ComputePipelineDesc, DescriptorSetLayout,
    DescriptorUpdateTemplate, LocalSize, PipelineCache, PipelineLayout,
    PipelineObject, PipelineRequest, ShaderInfo, ShaderModule, ShaderSource,
    SpecializationValue, optimal_local_size, align_to_subgroup,
};

/// The five GPU objects making up a compute pipeline
#[derive(Clone)]
pub struct PipelineHandles {
    pub shader_module: Arc<dyn ShaderModule>,
    pub descriptorset_layout: Arc<dyn DescriptorSetLayout>,
    pub pipeline_layout: Arc<dyn PipelineLayout>,
    pub pipeline: Arc<dyn PipelineObject>,
    /// Present only when the device supports update templates
    pub descriptor_update_template: Option<Arc<dyn DescriptorUpdateTemplate>>,
}

impl fmt::Debug for PipelineHandles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineHandles")
            .field("shader_module", &format_args!("{:#x}", self.shader_module.raw_handle()))
            .field("descriptorset_layout", &format_args!("{:#x}", self.descriptorset_layout.raw_handle()))
            .field("pipeline_layout", &format_args!("{:#x}", self.pipeline_layout.raw_handle()))
            .field("pipeline", &format_args!("{:#x}", self.pipeline.raw_handle()))
            .field(
                "descriptor_update_template",
                &self.descriptor_update_template.as_ref().map(|t| t.raw_handle()),
            )
            .finish()
    }
}

/// Fail unless `specializations` provides exactly the constants the shader declares
pub(crate) fn check_specializations(
    log_source: &str,
    shader_info: &ShaderInfo,
    specializations: &[SpecializationValue],
) -> Result<()> {
    let got = specializations.len() as u32;
    if got != shader_info.specialization_count {
        crate::engine_error!(
            log_source,
            "Specialization count mismatch, expect {} but got {}",
            shader_info.specialization_count, got
        );
        return Err(Error::SpecializationMismatch {
            expected: shader_info.specialization_count,
            got,
        });
    }
    Ok(())
}

/// Create pipeline layout, pipeline and (if supported) update template
///
/// Shared by the generic and the import path once the shader module and the
/// descriptor set layout exist. Nothing is retained on failure.
pub(crate) fn create_pipeline_handles(
    device: &dyn ComputeDevice,
    shader_module: Arc<dyn ShaderModule>,
    descriptorset_layout: Arc<dyn DescriptorSetLayout>,
    specializations: &[SpecializationValue],
    local_size: LocalSize,
    subgroup_size: u32,
) -> Result<PipelineHandles> {
    let shader_info = shader_module.shader_info().clone();

    let pipeline_layout = device.create_pipeline_layout(
        &descriptorset_layout,
        shader_info.push_constant_count,
    )?;

    let pipeline = device.create_pipeline(&ComputePipelineDesc {
        shader_module: &shader_module,
        pipeline_layout: &pipeline_layout,
        specializations,
        local_size,
        subgroup_size,
    })?;

    let descriptor_update_template =
        if device.info().support_descriptor_update_template() && shader_info.binding_count > 0 {
            Some(device.create_descriptor_update_template(
                &shader_info,
                &descriptorset_layout,
                &pipeline_layout,
            )?)
        } else {
            None
        };

    Ok(PipelineHandles {
        shader_module,
        descriptorset_layout,
        pipeline_layout,
        pipeline,
        descriptor_update_template,
    })
}

/// A compute pipeline bound to a device
///
/// Not `Clone`: two owners of the same configured pipeline cannot exist.
///
/// ```compile_fail
/// # use std::sync::Arc;
/// # use galaxy_nn::galaxynn::compute::{ComputeDevice, Pipeline};
/// fn duplicate(device: Arc<dyn ComputeDevice>) {
///     let pipeline = Pipeline::new(device);
///     let _copy = pipeline.clone();
/// }
/// ```
pub struct Pipeline {
    device: Arc<dyn ComputeDevice>,
    local_size: LocalSize,
    subgroup_size: u32,
    shader_info: ShaderInfo,
    handles: Option<PipelineHandles>,
}

impl Pipeline {
    /// Empty pipeline: local size 1x1x1, device default subgroup size
    pub fn new(device: Arc<dyn ComputeDevice>) -> Self {
        let subgroup_size = device.info().subgroup_size;
        Self {
            device,
            local_size: LocalSize::ONE,
            subgroup_size,
            shader_info: ShaderInfo::default(),
            handles: None,
        }
    }

    /// Pick the local size for `desired` from the device limits
    ///
    /// All-zero means no preference. Takes effect on the next `create`.
    pub fn set_optimal_local_size(&mut self, desired: LocalSize) {
        let limits = self.device.info().limits();
        self.local_size = optimal_local_size(desired, &limits, self.subgroup_size);

        crate::engine_trace!(
            source::PIPELINE,
            "local size = {} {} {}",
            self.local_size.x, self.local_size.y, self.local_size.z
        );
    }

    pub fn set_optimal_local_size_xyz(&mut self, w: u32, h: u32, c: u32) {
        self.set_optimal_local_size(LocalSize::new(w, h, c));
    }

    /// Use an explicit local size, grown to a whole number of subgroups
    ///
    /// Not checked against device limits.
    pub fn set_local_size_xyz(&mut self, w: u32, h: u32, c: u32) {
        let (x, y, z) = align_to_subgroup(w.max(1), h.max(1), c.max(1), self.subgroup_size);
        self.local_size = LocalSize::new(x, y, z);
    }

    /// Request a subgroup size, clamped into the device bounds
    pub fn set_subgroup_size(&mut self, subgroup_size: u32) {
        self.subgroup_size = self.device.info().clamp_subgroup_size(subgroup_size);
    }

    /// Create from raw SPIR-V through the device's default cache
    pub fn create(&mut self, spirv: &[u32], specializations: &[SpecializationValue]) -> Result<()> {
        let request = PipelineRequest {
            source: ShaderSource::Spirv(spirv),
            specializations,
            local_size: self.local_size,
            subgroup_size: self.subgroup_size,
        };

        let device = Arc::clone(&self.device);
        self.create_from(device.pipeline_cache(), &request)
    }

    /// Create from a registered shader index
    ///
    /// `options.pipeline_cache` overrides the device's default cache.
    pub fn create_with_shader_index(
        &mut self,
        shader_index: u32,
        options: &ComputeOptions,
        specializations: &[SpecializationValue],
    ) -> Result<()> {
        let request = PipelineRequest {
            source: ShaderSource::ShaderIndex { index: shader_index, options },
            specializations,
            local_size: self.local_size,
            subgroup_size: self.subgroup_size,
        };

        let device = Arc::clone(&self.device);
        match &options.pipeline_cache {
            Some(cache) => self.create_from(cache.as_ref(), &request),
            None => self.create_from(device.pipeline_cache(), &request),
        }
    }

    fn create_from(&mut self, cache: &dyn PipelineCache, request: &PipelineRequest) -> Result<()> {
        if self.handles.is_some() {
            crate::engine_warn!(source::PIPELINE, "Pipeline already created, destroy it first");
            return Err(Error::InvalidState("pipeline already created".to_string()));
        }

        let cached = cache.get_pipeline(self.device.as_ref(), request)?;
        self.install(cached.handles, cached.shader_info);
        Ok(())
    }

    /// Adopt a fully built handle set
    pub(crate) fn install(&mut self, handles: PipelineHandles, shader_info: ShaderInfo) {
        self.shader_info = shader_info;
        self.handles = Some(handles);
    }

    /// Release this pipeline's references to its handles
    ///
    /// Configuration (local size, subgroup size) is kept.
    pub fn destroy(&mut self) {
        self.handles = None;
        self.shader_info = ShaderInfo::default();
    }

    pub fn is_created(&self) -> bool {
        self.handles.is_some()
    }

    // ===== ACCESSORS =====

    pub fn device(&self) -> &Arc<dyn ComputeDevice> {
        &self.device
    }

    pub fn local_size(&self) -> LocalSize {
        self.local_size
    }

    pub fn subgroup_size(&self) -> u32 {
        self.subgroup_size
    }

    pub fn shader_info(&self) -> &ShaderInfo {
        &self.shader_info
    }

    pub fn handles(&self) -> Option<&PipelineHandles> {
        self.handles.as_ref()
    }

    pub fn shader_module(&self) -> Option<&Arc<dyn ShaderModule>> {
        self.handles.as_ref().map(|h| &h.shader_module)
    }

    pub fn descriptorset_layout(&self) -> Option<&Arc<dyn DescriptorSetLayout>> {
        self.handles.as_ref().map(|h| &h.descriptorset_layout)
    }

    pub fn pipeline_layout(&self) -> Option<&Arc<dyn PipelineLayout>> {
        self.handles.as_ref().map(|h| &h.pipeline_layout)
    }

    pub fn pipeline(&self) -> Option<&Arc<dyn PipelineObject>> {
        self.handles.as_ref().map(|h| &h.pipeline)
    }

    pub fn descriptor_update_template(&self) -> Option<&Arc<dyn DescriptorUpdateTemplate>> {
        self.handles.as_ref().and_then(|h| h.descriptor_update_template.as_ref())
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("device", &self.device.info().device_name)
            .field("local_size", &self.local_size)
            .field("subgroup_size", &self.subgroup_size)
            .field("shader_info", &self.shader_info)
            .field("handles", &self.handles)
            .finish()
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
