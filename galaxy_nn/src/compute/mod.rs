/// Compute module - pipeline management for the GPU inference path

pub mod workgroup;
pub mod specialization;
pub mod shader_info;
pub mod device;
pub mod options;
pub mod shader_library;
pub mod pipeline_cache;
pub mod pipeline;
pub mod import_pipeline;
pub mod variant;

#[cfg(test)]
pub mod mock_device;

pub use workgroup::*;
pub use specialization::*;
pub use shader_info::*;
pub use device::*;
pub use options::*;
pub use shader_library::*;
pub use pipeline_cache::*;
pub use pipeline::*;
pub use import_pipeline::*;
pub use variant::*;
