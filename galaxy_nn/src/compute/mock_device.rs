/// Mock compute device for unit tests (no GPU required)
///
/// Every object it hands out is tracked: creation bumps a per-kind counter
/// and drop releases it, so tests can check that failure paths leak nothing
/// and that handles are released exactly once. Creation of any object kind
/// can be made to fail on demand.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::compute::{
    ComputeDevice, ComputePipelineDesc, DescriptorBindingType, DescriptorSetLayout,
    DescriptorSetLayoutDesc, DescriptorUpdateTemplate, DeviceFeatures, DeviceId, DeviceInfo,
    DevicePipelineCache, ExternalSamplerDesc, LocalSize, PipelineCache, PipelineLayout,
    PipelineObject, Sampler, SamplerFilter, ShaderInfo, ShaderLibrary, ShaderModule, ShaderVariant,
    SpecializationValue, YcbcrConversion, CONVERT_YCBCR_SHADER_INDEX,
};

/// SPIR-V words the mock registers for the YCbCr conversion shader
pub const MOCK_YCBCR_SPIRV: [u32; 2] = [0x0723_0203, 0xC0DE_0001];

/// Device report used by `MockComputeDevice::new`
pub fn mock_device_info() -> DeviceInfo {
    DeviceInfo {
        device_name: "Mock GPU".to_string(),
        max_workgroup_size: [1024, 1024, 64],
        max_workgroup_invocations: 1024,
        subgroup_size: 32,
        min_subgroup_size: 16,
        max_subgroup_size: 64,
        features: DeviceFeatures::all(),
    }
}

/// Reflection data of the mock YCbCr shader (7 constants, 3 bindings)
pub fn ycbcr_shader_info() -> ShaderInfo {
    ShaderInfo::new(
        7,
        0,
        vec![
            DescriptorBindingType::CombinedImageSampler,
            DescriptorBindingType::StorageBuffer,
            DescriptorBindingType::StorageBuffer,
        ],
    )
}

// ============================================================================
// Object tracking
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockObjectKind {
    ShaderModule,
    DescriptorSetLayout,
    PipelineLayout,
    Pipeline,
    DescriptorUpdateTemplate,
    Sampler,
}

/// Live / created counters per object kind
#[derive(Default)]
pub struct ObjectTracker {
    live: Mutex<FxHashMap<MockObjectKind, usize>>,
    created: Mutex<FxHashMap<MockObjectKind, usize>>,
    next_handle: AtomicU64,
}

impl ObjectTracker {
    fn acquire(&self, kind: MockObjectKind) -> u64 {
        *self.live.lock().unwrap().entry(kind).or_default() += 1;
        *self.created.lock().unwrap().entry(kind).or_default() += 1;
        self.next_handle.fetch_add(1, Ordering::Relaxed) + 0x1000
    }

    fn release(&self, kind: MockObjectKind) {
        let mut live = self.live.lock().unwrap();
        let count = live.entry(kind).or_default();
        assert!(*count > 0, "{:?} released more often than created", kind);
        *count -= 1;
    }

    pub fn live(&self, kind: MockObjectKind) -> usize {
        self.live.lock().unwrap().get(&kind).copied().unwrap_or(0)
    }

    pub fn created(&self, kind: MockObjectKind) -> usize {
        self.created.lock().unwrap().get(&kind).copied().unwrap_or(0)
    }

    pub fn total_live(&self) -> usize {
        self.live.lock().unwrap().values().sum()
    }
}

/// Tracked native object stand-in
pub struct MockObject {
    kind: MockObjectKind,
    handle: u64,
    tracker: Arc<ObjectTracker>,
}

impl MockObject {
    fn new(kind: MockObjectKind, tracker: &Arc<ObjectTracker>) -> Self {
        let handle = tracker.acquire(kind);
        Self { kind, handle, tracker: Arc::clone(tracker) }
    }
}

impl Drop for MockObject {
    fn drop(&mut self) {
        self.tracker.release(self.kind);
    }
}

// ============================================================================
// Mock objects
// ============================================================================

pub struct MockShaderModule {
    object: MockObject,
    shader_info: ShaderInfo,
}

impl ShaderModule for MockShaderModule {
    fn raw_handle(&self) -> u64 { self.object.handle }
    fn shader_info(&self) -> &ShaderInfo { &self.shader_info }
}

pub struct MockDescriptorSetLayout {
    object: MockObject,
    push_descriptor: bool,
    _immutable_samplers: Vec<Arc<dyn Sampler>>,
}

impl DescriptorSetLayout for MockDescriptorSetLayout {
    fn raw_handle(&self) -> u64 { self.object.handle }
    fn is_push_descriptor(&self) -> bool { self.push_descriptor }
}

pub struct MockPipelineLayout {
    object: MockObject,
    _set_layout: Arc<dyn DescriptorSetLayout>,
}

impl PipelineLayout for MockPipelineLayout {
    fn raw_handle(&self) -> u64 { self.object.handle }
}

pub struct MockPipelineObject {
    object: MockObject,
}

impl PipelineObject for MockPipelineObject {
    fn raw_handle(&self) -> u64 { self.object.handle }
}

pub struct MockDescriptorUpdateTemplate {
    object: MockObject,
}

impl DescriptorUpdateTemplate for MockDescriptorUpdateTemplate {
    fn raw_handle(&self) -> u64 { self.object.handle }
}

pub struct MockSampler {
    object: MockObject,
    _ycbcr_conversion: Option<Arc<dyn YcbcrConversion>>,
}

impl Sampler for MockSampler {
    fn raw_handle(&self) -> u64 { self.object.handle }
}

// ============================================================================
// Records
// ============================================================================

/// Summary of one descriptor set layout creation
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRecord {
    /// (binding, type, has immutable sampler)
    pub bindings: Vec<(u32, DescriptorBindingType, bool)>,
    pub push_descriptor: bool,
}

/// Summary of one sampler creation
///
/// Holds the raw conversion handle only, so recording never extends the
/// conversion's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerRecord {
    pub filter: SamplerFilter,
    pub unnormalized_coordinates: bool,
    pub external_format: u64,
    pub ycbcr_conversion: u64,
}

/// Summary of one pipeline creation
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRecord {
    pub specializations: Vec<SpecializationValue>,
    pub local_size: LocalSize,
    pub subgroup_size: u32,
}

// ============================================================================
// Mock device
// ============================================================================

pub struct MockComputeDevice {
    id: DeviceId,
    info: DeviceInfo,
    library: ShaderLibrary,
    cache: DevicePipelineCache,
    tracker: Arc<ObjectTracker>,
    shader_infos: Mutex<FxHashMap<Vec<u32>, ShaderInfo>>,
    default_shader_info: ShaderInfo,
    fail_on: Mutex<Option<MockObjectKind>>,
    compile_delay: Mutex<Option<Duration>>,
    samplers: Mutex<Vec<SamplerRecord>>,
    layouts: Mutex<Vec<LayoutRecord>>,
    pipelines: Mutex<Vec<PipelineRecord>>,
}

impl MockComputeDevice {
    pub fn new() -> Self {
        Self::with_info(mock_device_info())
    }

    /// Mock with a custom capability report
    ///
    /// The YCbCr shader is registered under `CONVERT_YCBCR_SHADER_INDEX`.
    pub fn with_info(info: DeviceInfo) -> Self {
        let id = DeviceId::next();
        let device = Self {
            id,
            info,
            library: ShaderLibrary::new(),
            cache: DevicePipelineCache::new(id),
            tracker: Arc::new(ObjectTracker::default()),
            shader_infos: Mutex::new(FxHashMap::default()),
            default_shader_info: ShaderInfo::new(
                0,
                1,
                vec![DescriptorBindingType::StorageBuffer, DescriptorBindingType::StorageBuffer],
            ),
            fail_on: Mutex::new(None),
            compile_delay: Mutex::new(None),
            samplers: Mutex::new(Vec::new()),
            layouts: Mutex::new(Vec::new()),
            pipelines: Mutex::new(Vec::new()),
        };
        device
            .library
            .register(CONVERT_YCBCR_SHADER_INDEX, ShaderVariant::Fp32, MOCK_YCBCR_SPIRV.to_vec())
            .unwrap();
        device.set_shader_info(&MOCK_YCBCR_SPIRV, ycbcr_shader_info());
        device
    }

    /// Reflection data returned for modules built from `spirv`
    pub fn set_shader_info(&self, spirv: &[u32], info: ShaderInfo) {
        self.shader_infos.lock().unwrap().insert(spirv.to_vec(), info);
    }

    /// Make every creation of `kind` fail (None to stop)
    pub fn fail_on(&self, kind: Option<MockObjectKind>) {
        *self.fail_on.lock().unwrap() = kind;
    }

    /// Sleep inside `create_pipeline` to widen race windows
    pub fn set_compile_delay(&self, delay: Option<Duration>) {
        *self.compile_delay.lock().unwrap() = delay;
    }

    pub fn tracker(&self) -> &Arc<ObjectTracker> {
        &self.tracker
    }

    pub fn cache(&self) -> &DevicePipelineCache {
        &self.cache
    }

    /// Number of pipeline objects ever created
    pub fn compile_count(&self) -> usize {
        self.tracker.created(MockObjectKind::Pipeline)
    }

    pub fn sampler_records(&self) -> Vec<SamplerRecord> {
        self.samplers.lock().unwrap().clone()
    }

    pub fn layout_records(&self) -> Vec<LayoutRecord> {
        self.layouts.lock().unwrap().clone()
    }

    pub fn pipeline_records(&self) -> Vec<PipelineRecord> {
        self.pipelines.lock().unwrap().clone()
    }

    fn check_failure(&self, kind: MockObjectKind) -> Result<()> {
        if *self.fail_on.lock().unwrap() == Some(kind) {
            return Err(Error::BackendError(format!("mock {:?} creation failed", kind)));
        }
        Ok(())
    }
}

impl ComputeDevice for MockComputeDevice {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn info(&self) -> &DeviceInfo {
        &self.info
    }

    fn shader_library(&self) -> &ShaderLibrary {
        &self.library
    }

    fn pipeline_cache(&self) -> &dyn PipelineCache {
        &self.cache
    }

    fn create_shader_module(&self, spirv: &[u32]) -> Result<Arc<dyn ShaderModule>> {
        self.check_failure(MockObjectKind::ShaderModule)?;
        if spirv.is_empty() {
            return Err(Error::InvalidResource("empty SPIR-V".to_string()));
        }

        let shader_info = self
            .shader_infos
            .lock()
            .unwrap()
            .get(spirv)
            .cloned()
            .unwrap_or_else(|| self.default_shader_info.clone());

        Ok(Arc::new(MockShaderModule {
            object: MockObject::new(MockObjectKind::ShaderModule, &self.tracker),
            shader_info,
        }))
    }

    fn create_descriptorset_layout(
        &self,
        desc: &DescriptorSetLayoutDesc,
    ) -> Result<Arc<dyn DescriptorSetLayout>> {
        self.check_failure(MockObjectKind::DescriptorSetLayout)?;

        self.layouts.lock().unwrap().push(LayoutRecord {
            bindings: desc
                .bindings
                .iter()
                .map(|b| (b.binding, b.binding_type, b.immutable_sampler.is_some()))
                .collect(),
            push_descriptor: desc.push_descriptor,
        });

        Ok(Arc::new(MockDescriptorSetLayout {
            object: MockObject::new(MockObjectKind::DescriptorSetLayout, &self.tracker),
            push_descriptor: desc.push_descriptor,
            _immutable_samplers: desc
                .bindings
                .iter()
                .filter_map(|b| b.immutable_sampler.clone())
                .collect(),
        }))
    }

    fn create_pipeline_layout(
        &self,
        set_layout: &Arc<dyn DescriptorSetLayout>,
        _push_constant_count: u32,
    ) -> Result<Arc<dyn PipelineLayout>> {
        self.check_failure(MockObjectKind::PipelineLayout)?;
        Ok(Arc::new(MockPipelineLayout {
            object: MockObject::new(MockObjectKind::PipelineLayout, &self.tracker),
            _set_layout: Arc::clone(set_layout),
        }))
    }

    fn create_pipeline(&self, desc: &ComputePipelineDesc) -> Result<Arc<dyn PipelineObject>> {
        self.check_failure(MockObjectKind::Pipeline)?;

        let delay = *self.compile_delay.lock().unwrap();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }

        self.pipelines.lock().unwrap().push(PipelineRecord {
            specializations: desc.specializations.to_vec(),
            local_size: desc.local_size,
            subgroup_size: desc.subgroup_size,
        });

        Ok(Arc::new(MockPipelineObject {
            object: MockObject::new(MockObjectKind::Pipeline, &self.tracker),
        }))
    }

    fn create_descriptor_update_template(
        &self,
        _shader_info: &ShaderInfo,
        _set_layout: &Arc<dyn DescriptorSetLayout>,
        _pipeline_layout: &Arc<dyn PipelineLayout>,
    ) -> Result<Arc<dyn DescriptorUpdateTemplate>> {
        self.check_failure(MockObjectKind::DescriptorUpdateTemplate)?;
        Ok(Arc::new(MockDescriptorUpdateTemplate {
            object: MockObject::new(MockObjectKind::DescriptorUpdateTemplate, &self.tracker),
        }))
    }

    fn create_sampler(&self, desc: &ExternalSamplerDesc) -> Result<Arc<dyn Sampler>> {
        self.check_failure(MockObjectKind::Sampler)?;
        self.samplers.lock().unwrap().push(SamplerRecord {
            filter: desc.filter,
            unnormalized_coordinates: desc.unnormalized_coordinates,
            external_format: desc.external_format,
            ycbcr_conversion: desc.ycbcr_conversion_handle(),
        });
        Ok(Arc::new(MockSampler {
            object: MockObject::new(MockObjectKind::Sampler, &self.tracker),
            _ycbcr_conversion: desc.ycbcr_conversion.clone(),
        }))
    }
}

#[cfg(test)]
#[path = "mock_device_tests.rs"]
mod tests;
