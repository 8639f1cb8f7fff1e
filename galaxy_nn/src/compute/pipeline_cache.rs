//! Pipeline cache
//!
//! Compiling a compute pipeline can block on the driver for a long time, and
//! many layers of a network request the same (shader, specializations, local
//! size, subgroup size) combination. A `PipelineCache` hands out shared
//! handle sets so each combination is compiled once.

use std::sync::{Arc, Mutex};
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::log::source;
use crate::compute::{
    ComputeDevice, ComputeOptions, DescriptorSetLayoutDesc, DeviceId, LocalSize,
    PipelineHandles, ShaderInfo, ShaderVariant, SpecializationValue,
};
use crate::compute::pipeline::{check_specializations, create_pipeline_handles};

/// Where the shader of a request comes from
#[derive(Debug, Clone, Copy)]
pub enum ShaderSource<'a> {
    /// Raw SPIR-V words
    Spirv(&'a [u32]),
    /// Shader registered in the device's `ShaderLibrary`
    ShaderIndex {
        index: u32,
        options: &'a ComputeOptions,
    },
}

/// Everything that identifies one compiled pipeline
#[derive(Debug, Clone, Copy)]
pub struct PipelineRequest<'a> {
    pub source: ShaderSource<'a>,
    pub specializations: &'a [SpecializationValue],
    pub local_size: LocalSize,
    pub subgroup_size: u32,
}

/// Handle set plus reflection data returned by a cache
#[derive(Debug, Clone)]
pub struct CachedPipeline {
    pub handles: PipelineHandles,
    pub shader_info: ShaderInfo,
}

/// Deduplicating pipeline provider
///
/// Implementations must compile a given request at most once at a time and
/// may compile unrelated requests concurrently.
pub trait PipelineCache: Send + Sync {
    fn get_pipeline(
        &self,
        device: &dyn ComputeDevice,
        request: &PipelineRequest,
    ) -> Result<CachedPipeline>;
}

/// Compile every object of a pipeline for `spirv` (no caching)
pub fn compile_pipeline(
    device: &dyn ComputeDevice,
    spirv: &[u32],
    specializations: &[SpecializationValue],
    local_size: LocalSize,
    subgroup_size: u32,
) -> Result<CachedPipeline> {
    let shader_module = device.create_shader_module(spirv)?;
    let shader_info = shader_module.shader_info().clone();

    check_specializations(source::PIPELINE_CACHE, &shader_info, specializations)?;

    let push_descriptor = device.info().support_push_descriptor();
    let descriptorset_layout = device.create_descriptorset_layout(
        &DescriptorSetLayoutDesc::from_shader_info(&shader_info, push_descriptor),
    )?;

    let handles = create_pipeline_handles(
        device,
        shader_module,
        descriptorset_layout,
        specializations,
        local_size,
        subgroup_size,
    )?;

    Ok(CachedPipeline { handles, shader_info })
}

// ===== DEFAULT CACHE =====

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ShaderKey {
    Spirv(Arc<[u32]>),
    Index { index: u32, variant: ShaderVariant },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PipelineKey {
    shader: ShaderKey,
    /// (tag, bits) per value so floats hash by bit pattern
    specializations: Vec<(u8, u32)>,
    local_size: LocalSize,
    subgroup_size: u32,
}

type Slot = Arc<Mutex<Option<CachedPipeline>>>;

/// In-memory cache bound to one device
///
/// Each key has its own slot lock: a second request for a key being compiled
/// waits for that compile instead of starting another, while other keys
/// proceed. Failed compiles leave nothing behind and are retried on the next
/// request. Requests from any device other than `owner` are rejected.
pub struct DevicePipelineCache {
    owner: DeviceId,
    entries: Mutex<FxHashMap<PipelineKey, Slot>>,
}

impl DevicePipelineCache {
    pub fn new(owner: DeviceId) -> Self {
        Self {
            owner,
            entries: Mutex::new(FxHashMap::default()),
        }
    }

    /// Cache for `device`, e.g. to pass through `ComputeOptions`
    pub fn for_device(device: &dyn ComputeDevice) -> Self {
        Self::new(device.id())
    }

    pub fn owner(&self) -> DeviceId {
        self.owner
    }

    /// Number of compiled pipelines held
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .map(|entries| {
                entries
                    .values()
                    .filter(|slot| slot.try_lock().map(|s| s.is_some()).unwrap_or(false))
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop the cache's references; pipelines still in use stay alive
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    fn slot(&self, key: &PipelineKey) -> Result<Slot> {
        let mut entries = self.entries.lock()
            .map_err(|_| Error::BackendError("PipelineCache lock poisoned".to_string()))?;
        Ok(Arc::clone(entries.entry(key.clone()).or_default()))
    }

    /// Remove a slot left empty by a failed compile, unless someone is using it
    fn discard_empty(&self, key: &PipelineKey, slot: &Slot) {
        let Ok(mut entries) = self.entries.lock() else { return };
        let is_same_empty = entries.get(key).is_some_and(|existing| {
            Arc::ptr_eq(existing, slot)
                && existing.try_lock().map(|s| s.is_none()).unwrap_or(false)
        });
        if is_same_empty {
            entries.remove(key);
        }
    }
}

impl PipelineCache for DevicePipelineCache {
    fn get_pipeline(
        &self,
        device: &dyn ComputeDevice,
        request: &PipelineRequest,
    ) -> Result<CachedPipeline> {
        if device.id() != self.owner {
            crate::engine_error!(source::PIPELINE_CACHE,
                "Cache of {} cannot serve {}", self.owner, device.id());
            return Err(Error::CacheResolution(format!(
                "pipeline cache belongs to {}, requested by {}",
                self.owner,
                device.id()
            )));
        }

        let (shader, spirv): (ShaderKey, Arc<[u32]>) = match request.source {
            ShaderSource::Spirv(words) => {
                let words: Arc<[u32]> = Arc::from(words);
                (ShaderKey::Spirv(Arc::clone(&words)), words)
            }
            ShaderSource::ShaderIndex { index, options } => {
                let wanted = ShaderVariant::select(device.info(), options);
                let (variant, words) = device.shader_library().lookup(index, wanted)?;
                (ShaderKey::Index { index, variant }, words)
            }
        };

        let key = PipelineKey {
            shader,
            specializations: request
                .specializations
                .iter()
                .map(|v| (v.tag(), v.to_bits()))
                .collect(),
            local_size: request.local_size,
            subgroup_size: request.subgroup_size,
        };

        let slot = self.slot(&key)?;
        let mut guard = slot.lock()
            .map_err(|_| Error::BackendError("PipelineCache slot poisoned".to_string()))?;

        if let Some(cached) = guard.as_ref() {
            crate::engine_trace!(source::PIPELINE_CACHE, "Cache hit for {}", key.shader_label());
            return Ok(cached.clone());
        }

        match compile_pipeline(
            device,
            &spirv,
            request.specializations,
            request.local_size,
            request.subgroup_size,
        ) {
            Ok(compiled) => {
                crate::engine_debug!(
                    source::PIPELINE_CACHE,
                    "Compiled pipeline for {} (local size {} {} {})",
                    key.shader_label(),
                    request.local_size.x, request.local_size.y, request.local_size.z
                );
                *guard = Some(compiled.clone());
                Ok(compiled)
            }
            Err(e) => {
                drop(guard);
                self.discard_empty(&key, &slot);
                Err(e)
            }
        }
    }
}

impl PipelineKey {
    fn shader_label(&self) -> String {
        match &self.shader {
            ShaderKey::Spirv(words) => format!("spirv[{} words]", words.len()),
            ShaderKey::Index { index, variant } => format!("shader {} ({:?})", index, variant),
        }
    }
}

#[cfg(test)]
#[path = "pipeline_cache_tests.rs"]
mod tests;
