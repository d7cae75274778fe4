use ash::vk;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SketchError>;

#[derive(Error, Debug)]
pub enum SketchError {
	#[error("Could not initialize GLFW: {0:?}")]
	GlfwInit(glfw::InitError),
	#[error("Could not create a {width}x{height} window")]
	WindowCreation { width: u32, height: u32 },
	#[error("Vulkan is not available: {0}")]
	VulkanUnavailable(String),
	#[error("Could not create Vulkan instance: {0}")]
	InstanceCreation(String),
	#[error("Required extension {0} not supported")]
	MissingExtension(String),
	#[error("No suitable physical device found")]
	NoSuitableDevice,
	#[error("Could not find suitable memory type")]
	NoSuitableMemoryType,
	#[error("Could not create window surface: {0:?}")]
	SurfaceCreation(vk::Result),
	#[error("Vulkan call failed while trying to {operation}: {result}")]
	Vulkan { operation: &'static str, result: vk::Result },
	#[error("Could not compile {stage} shader:\n{log}")]
	ShaderCompilation { stage: &'static str, log: String },
	#[error("Error initializing tracing: {0}")]
	Tracing(#[from] tracing::subscriber::SetGlobalDefaultError)
}

pub(crate) trait VulkanResultExt<T> {
	/// Tags a failed Vulkan call with the operation it was part of.
	fn or_vulkan(self, operation: &'static str) -> Result<T>;
}

impl<T> VulkanResultExt<T> for std::result::Result<T, vk::Result> {
	fn or_vulkan(self, operation: &'static str) -> Result<T> {
		self.map_err(|result| SketchError::Vulkan { operation, result })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn vulkan_error_names_operation() {
		let result: std::result::Result<(), vk::Result> = Err(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY);
		let error = result.or_vulkan("allocate vertex buffer memory").unwrap_err();

		match &error {
			SketchError::Vulkan { operation, result } => {
				assert_eq!(*operation, "allocate vertex buffer memory");
				assert_eq!(*result, vk::Result::ERROR_OUT_OF_DEVICE_MEMORY);
			},
			other => panic!("unexpected error {:?}", other)
		}

		assert!(error.to_string().starts_with("Vulkan call failed while trying to allocate vertex buffer memory"));
	}

	#[test]
	fn ok_passes_through() {
		let result: std::result::Result<u32, vk::Result> = Ok(7);
		assert_eq!(result.or_vulkan("anything").unwrap(), 7);
	}

	#[test]
	fn shader_error_carries_log() {
		let error = SketchError::ShaderCompilation { stage: "vertex", log: "unknown identifier".to_owned() };
		assert_eq!(error.to_string(), "Could not compile vertex shader:\nunknown identifier");
	}
}
