/*!
# Galaxy NN

Core traits and types for GPU compute pipelines of the Galaxy NN inference engine.

This crate is backend-agnostic: a backend (Vulkan, ...) implements
[`galaxynn::compute::ComputeDevice`] and the object traits it hands out,
while pipelines, pipeline caching and workgroup sizing live here.

## Architecture

- **ComputeDevice**: Factory trait for shader modules, layouts, pipelines and samplers
- **Pipeline**: One compute program with its five GPU handles and reflected ShaderInfo
- **PipelineCache**: Deduplicates compiled pipelines per (shader, specializations, local size, subgroup size)
- **HardwareBufferImportPipeline**: YCbCr conversion pipeline importing external camera buffers
- **ShaderLibrary**: Built-in SPIR-V indexed by shader type and precision variant

Backend implementations provide concrete types that implement these traits.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod compute;

// Main galaxynn namespace module
pub mod galaxynn {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Logging sub-module (types and source names; macros live at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
        pub use crate::log::source;
    }

    // Compute sub-module with pipelines, caches and device traits
    pub mod compute {
        pub use crate::compute::*;
    }
}
