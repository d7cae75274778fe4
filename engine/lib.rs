pub mod error;
pub use error::{Result, SketchError};

pub mod config;
pub use config::Config;

pub mod math;

pub mod sketch;
pub use sketch::{SketchSession, VertexSink};

pub mod vulkan;
pub use vulkan::Renderer;
