use ash::{vk, version::DeviceV1_0};
use naga::{
	back::spv,
	front::glsl,
	valid::{Capabilities, ValidationFlags, Validator},
	ShaderStage
};
use crate::error::{Result, SketchError, VulkanResultExt};

pub const VERTEX_SOURCE: &str = include_str!("../shaders/sketch.vert");
pub const FRAGMENT_SOURCE: &str = include_str!("../shaders/sketch.frag");

/// SPIR-V for the fixed-color triangle pipeline.
pub struct ShaderCode {
	pub vertex: Vec<u32>,
	pub fragment: Vec<u32>
}

impl ShaderCode {
	pub fn compile() -> Result<Self> {
		Ok(Self {
			vertex: compile_glsl(VERTEX_SOURCE, ShaderStage::Vertex)?,
			fragment: compile_glsl(FRAGMENT_SOURCE, ShaderStage::Fragment)?
		})
	}
}

/// Compiles a GLSL source to SPIR-V. Parse, validation and code generation
/// errors all end up in the returned diagnostic log.
pub fn compile_glsl(source: &str, stage: ShaderStage) -> Result<Vec<u32>> {
	let stage_name = stage_name(stage);
	let failed = |log: String| SketchError::ShaderCompilation { stage: stage_name, log };

	let module = glsl::Frontend::default()
		.parse(&glsl::Options::from(stage), source)
		.map_err(|e| failed(e.to_string()))?;

	let info = Validator::new(ValidationFlags::all(), Capabilities::empty())
		.validate(&module)
		.map_err(|e| failed(e.to_string()))?;

	let pipeline_options = spv::PipelineOptions {
		shader_stage: stage,
		entry_point: String::from("main")
	};

	spv::write_vec(&module, &info, &spv::Options::default(), Some(&pipeline_options))
		.map_err(|e| failed(e.to_string()))
}

pub fn create_shader_module(logical_device: &ash::Device, code: &[u32]) -> Result<vk::ShaderModule> {
	let create_info = vk::ShaderModuleCreateInfo::builder()
		.code(code);

	unsafe { logical_device.create_shader_module(&create_info, None) }.or_vulkan("create shader module")
}

fn stage_name(stage: ShaderStage) -> &'static str {
	match stage {
		ShaderStage::Vertex => "vertex",
		ShaderStage::Fragment => "fragment",
		ShaderStage::Compute => "compute",
		_ => "other"
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const SPIRV_MAGIC: u32 = 0x0723_0203;

	#[test]
	fn vertex_shader_compiles() {
		let code = compile_glsl(VERTEX_SOURCE, ShaderStage::Vertex).unwrap();
		assert_eq!(code[0], SPIRV_MAGIC);
	}

	#[test]
	fn fragment_shader_compiles() {
		let code = compile_glsl(FRAGMENT_SOURCE, ShaderStage::Fragment).unwrap();
		assert_eq!(code[0], SPIRV_MAGIC);
	}

	#[test]
	fn compile_both() {
		let code = ShaderCode::compile().unwrap();
		assert!(!code.vertex.is_empty());
		assert!(!code.fragment.is_empty());
	}

	#[test]
	fn broken_source_is_an_error() {
		let source = "#version 450\nvoid main() { gl_Position = undefined_thing; }\n";

		match compile_glsl(source, ShaderStage::Vertex) {
			Err(SketchError::ShaderCompilation { stage, log }) => {
				assert_eq!(stage, "vertex");
				assert!(!log.is_empty());
			},
			other => panic!("expected a compilation error, got {:?}", other.map(|code| code.len()))
		}
	}
}
