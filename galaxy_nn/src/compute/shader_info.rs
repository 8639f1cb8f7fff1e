/// Shader metadata resolved from SPIR-V

/// Kind of resource a descriptor binding expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorBindingType {
    /// Storage buffer (tensor blob)
    StorageBuffer,
    /// Storage image
    StorageImage,
    /// Combined image and sampler
    CombinedImageSampler,
}

/// Reflection summary of a compute shader
///
/// Produced once per shader module and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderInfo {
    /// Number of specialization constants the shader declares
    /// (local size constants excluded)
    pub specialization_count: u32,
    /// Number of descriptor bindings in set 0
    pub binding_count: u32,
    /// Number of 32-bit push constant members
    pub push_constant_count: u32,
    /// Binding types in binding order
    pub binding_types: Vec<DescriptorBindingType>,
}

impl ShaderInfo {
    pub fn new(
        specialization_count: u32,
        push_constant_count: u32,
        binding_types: Vec<DescriptorBindingType>,
    ) -> Self {
        Self {
            specialization_count,
            binding_count: binding_types.len() as u32,
            push_constant_count,
            binding_types,
        }
    }
}
