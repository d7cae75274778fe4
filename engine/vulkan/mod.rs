mod context;
pub use context::Context;

mod physical_device;
use physical_device::PhysicalDevice;

mod buffer;
use buffer::Buffer;

pub mod shader;
pub use shader::ShaderCode;

pub mod renderer;
pub use renderer::Renderer;
