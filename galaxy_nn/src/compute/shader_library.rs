/// Registry of precompiled SPIR-V addressable by shader index
///
/// Layers refer to shaders by a numeric index. A shader may be registered in
/// two flavors: plain fp32 and an fp16-storage variant that is picked when
/// both the options and the device allow 16-bit storage.

use std::sync::{Arc, RwLock};
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::log::source;
use crate::compute::{ComputeOptions, DeviceInfo};

/// First index reserved for shaders shipped with the library itself
pub const BUILTIN_SHADER_INDEX_BASE: u32 = 0x8000_0000;

/// Shader converting an imported YCbCr image into a tensor blob
pub const CONVERT_YCBCR_SHADER_INDEX: u32 = BUILTIN_SHADER_INDEX_BASE + 1;

/// Storage flavor of a registered shader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderVariant {
    Fp32,
    Fp16Storage,
}

impl ShaderVariant {
    /// Variant requested by `options` on a device described by `info`
    pub fn select(info: &DeviceInfo, options: &ComputeOptions) -> Self {
        if options.use_fp16_storage && info.support_16bit_storage() {
            ShaderVariant::Fp16Storage
        } else {
            ShaderVariant::Fp32
        }
    }
}

/// Thread-safe shader index registry
#[derive(Default)]
pub struct ShaderLibrary {
    shaders: RwLock<FxHashMap<(u32, ShaderVariant), Arc<[u32]>>>,
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register SPIR-V words, replacing any previous entry
    pub fn register(&self, index: u32, variant: ShaderVariant, spirv: Vec<u32>) -> Result<()> {
        if spirv.is_empty() {
            crate::engine_bail_warn!(source::SHADER_LIBRARY, "Shader {} has empty SPIR-V", index);
        }

        let mut shaders = self.shaders.write()
            .map_err(|_| Error::BackendError("ShaderLibrary lock poisoned".to_string()))?;
        shaders.insert((index, variant), Arc::from(spirv));

        crate::engine_trace!(source::SHADER_LIBRARY, "Registered shader {} ({:?})", index, variant);
        Ok(())
    }

    /// Register SPIR-V given as bytes (length must be a multiple of 4)
    pub fn register_bytes(&self, index: u32, variant: ShaderVariant, bytes: &[u8]) -> Result<()> {
        if bytes.len() % 4 != 0 {
            crate::engine_bail_warn!(
                source::SHADER_LIBRARY,
                "Shader {} SPIR-V size {} is not a multiple of 4", index, bytes.len()
            );
        }

        let words = bytes
            .chunks_exact(4)
            .map(bytemuck::pod_read_unaligned::<u32>)
            .collect();
        self.register(index, variant, words)
    }

    /// SPIR-V for `index`, falling back to fp32 when the variant is missing
    pub fn lookup(&self, index: u32, variant: ShaderVariant) -> Result<(ShaderVariant, Arc<[u32]>)> {
        let shaders = self.shaders.read()
            .map_err(|_| Error::BackendError("ShaderLibrary lock poisoned".to_string()))?;

        if let Some(words) = shaders.get(&(index, variant)) {
            return Ok((variant, Arc::clone(words)));
        }
        if let Some(words) = shaders.get(&(index, ShaderVariant::Fp32)) {
            return Ok((ShaderVariant::Fp32, Arc::clone(words)));
        }

        Err(Error::CacheResolution(format!("Shader index {} not registered", index)))
    }

    pub fn contains(&self, index: u32) -> bool {
        self.shaders
            .read()
            .map(|s| s.keys().any(|&(i, _)| i == index))
            .unwrap_or(false)
    }

    /// Number of registered (index, variant) entries
    pub fn len(&self) -> usize {
        self.shaders.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "shader_library_tests.rs"]
mod tests;
