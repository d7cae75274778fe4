use std::{cmp::{min, max}, ffi::CStr, mem::size_of};
use ash::{vk, version::DeviceV1_0, extensions::khr};
use crate::{
	error::{Result, VulkanResultExt},
	math::Vector3,
	vulkan::{Context, ShaderCode, shader::create_shader_module}
};
use super::{Swapchain, SwapchainFrame, InFlightFrame, IN_FLIGHT_FRAMES_COUNT};

const ENTRY_POINT: &[u8] = b"main\0";

pub fn create_render_pass(context: &Context) -> Result<vk::RenderPass> {
	let color_attachment_description = vk::AttachmentDescription::builder()
		.format(context.surface.format.format)
		.samples(vk::SampleCountFlags::TYPE_1)
		.load_op(vk::AttachmentLoadOp::CLEAR)
		.store_op(vk::AttachmentStoreOp::STORE)
		.stencil_load_op(vk::AttachmentLoadOp::DONT_CARE)
		.stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
		.initial_layout(vk::ImageLayout::UNDEFINED)
		.final_layout(vk::ImageLayout::PRESENT_SRC_KHR);
	let attachment_descriptions = [color_attachment_description.build()];

	let color_attachment_ref = vk::AttachmentReference::builder()
		.attachment(0)
		.layout(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL);
	let color_attachment_refs = [color_attachment_ref.build()];

	let subpass_description = vk::SubpassDescription::builder()
		.pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
		.color_attachments(&color_attachment_refs);
	let subpass_descriptions = [subpass_description.build()];

	let subpass_dependency = vk::SubpassDependency::builder()
		.src_subpass(vk::SUBPASS_EXTERNAL)
		.dst_subpass(0)
		.src_stage_mask(vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT)
		.src_access_mask(vk::AccessFlags::empty())
		.dst_stage_mask(vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT)
		.dst_access_mask(vk::AccessFlags::COLOR_ATTACHMENT_READ | vk::AccessFlags::COLOR_ATTACHMENT_WRITE);
	let subpass_dependencies = [subpass_dependency.build()];

	let render_pass_create_info = vk::RenderPassCreateInfo::builder()
		.attachments(&attachment_descriptions)
		.subpasses(&subpass_descriptions)
		.dependencies(&subpass_dependencies);

	unsafe { context.logical_device.create_render_pass(&render_pass_create_info, None) }.or_vulkan("create render pass")
}

pub(super) fn create_swapchain(context: &Context, framebuffer_width: u32, framebuffer_height: u32, render_pass: vk::RenderPass) -> Result<Swapchain> {
	// FIFO is the one present mode every implementation supports
	let present_mode = vk::PresentModeKHR::FIFO;

	// Create extent
	let capabilities = unsafe { context.surface.extension.get_physical_device_surface_capabilities(context.physical_device.handle, context.surface.handle) }
		.or_vulkan("query surface capabilities")?;
	let extent = if capabilities.current_extent.width == u32::MAX {
		vk::Extent2D::builder()
			.width(max(capabilities.min_image_extent.width, min(capabilities.max_image_extent.width, framebuffer_width)))
			.height(max(capabilities.min_image_extent.height, min(capabilities.max_image_extent.height, framebuffer_height)))
			.build()
	}
	else {
		capabilities.current_extent
	};

	// Create swapchain extension, handle & images
	let mut image_count = capabilities.min_image_count + 1;
	if capabilities.max_image_count > 0 && image_count > capabilities.max_image_count {
		image_count = capabilities.max_image_count;
	}

	let mut swapchain_create_info = vk::SwapchainCreateInfoKHR::builder()
		.surface(context.surface.handle)
		.min_image_count(image_count)
		.image_format(context.surface.format.format)
		.image_color_space(context.surface.format.color_space)
		.image_extent(extent)
		.image_array_layers(1)
		.image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
		.pre_transform(capabilities.current_transform)
		.composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
		.present_mode(present_mode)
		.clipped(true);

	let graphics_queue_family_index = context.physical_device.graphics_queue_family;
	let present_queue_family_index = context.physical_device.present_queue_family;
	let queue_families = [graphics_queue_family_index, present_queue_family_index];
	if graphics_queue_family_index == present_queue_family_index {
		swapchain_create_info = swapchain_create_info.image_sharing_mode(vk::SharingMode::EXCLUSIVE);
	}
	else {
		swapchain_create_info = swapchain_create_info
			.image_sharing_mode(vk::SharingMode::CONCURRENT)
			.queue_family_indices(&queue_families);
	}

	let extension = khr::Swapchain::new(&context.instance, &context.logical_device);
	let handle = unsafe { extension.create_swapchain(&swapchain_create_info, None) }.or_vulkan("create swapchain")?;
	let images = unsafe { extension.get_swapchain_images(handle) }.or_vulkan("get swapchain images")?;

	// Create swapchain frames
	let mut frames = Vec::with_capacity(images.len());
	for image in images {
		let image_view_create_info = vk::ImageViewCreateInfo::builder()
			.image(image)
			.view_type(vk::ImageViewType::TYPE_2D)
			.format(context.surface.format.format)
			.components(vk::ComponentMapping::builder()
				.r(vk::ComponentSwizzle::IDENTITY)
				.g(vk::ComponentSwizzle::IDENTITY)
				.b(vk::ComponentSwizzle::IDENTITY)
				.a(vk::ComponentSwizzle::IDENTITY)
				.build())
			.subresource_range(vk::ImageSubresourceRange::builder()
				.aspect_mask(vk::ImageAspectFlags::COLOR)
				.base_mip_level(0)
				.level_count(1)
				.base_array_layer(0)
				.layer_count(1)
				.build());

		let image_view = unsafe { context.logical_device.create_image_view(&image_view_create_info, None) }.or_vulkan("create swapchain image view")?;

		let attachments = [image_view];
		let framebuffer_create_info = vk::FramebufferCreateInfo::builder()
			.render_pass(render_pass)
			.attachments(&attachments)
			.width(extent.width)
			.height(extent.height)
			.layers(1);

		let framebuffer = unsafe { context.logical_device.create_framebuffer(&framebuffer_create_info, None) }.or_vulkan("create framebuffer")?;

		frames.push(SwapchainFrame {
			image_view,
			framebuffer,
			fence: vk::Fence::null()
		});
	}

	Ok(Swapchain {
		extension,
		handle,
		extent,
		frames
	})
}

pub fn create_command_pool(context: &Context) -> Result<vk::CommandPool> {
	let create_info = vk::CommandPoolCreateInfo::builder()
		.queue_family_index(context.physical_device.graphics_queue_family)
		.flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);

	unsafe { context.logical_device.create_command_pool(&create_info, None) }.or_vulkan("create command pool")
}

pub(super) fn create_in_flight_frames(logical_device: &ash::Device, command_pool: vk::CommandPool) -> Result<Vec<InFlightFrame>> {
	let semaphore_create_info = vk::SemaphoreCreateInfo::builder();

	let fence_create_info = vk::FenceCreateInfo::builder()
		.flags(vk::FenceCreateFlags::SIGNALED);

	let command_buffer_allocate_info = vk::CommandBufferAllocateInfo::builder()
		.command_pool(command_pool)
		.level(vk::CommandBufferLevel::PRIMARY)
		.command_buffer_count(IN_FLIGHT_FRAMES_COUNT as u32);

	let command_buffers = unsafe { logical_device.allocate_command_buffers(&command_buffer_allocate_info) }.or_vulkan("allocate command buffers")?;

	let mut frames = Vec::with_capacity(IN_FLIGHT_FRAMES_COUNT);
	for command_buffer in command_buffers {
		let image_available = unsafe { logical_device.create_semaphore(&semaphore_create_info, None) }.or_vulkan("create semaphore")?;
		let render_finished = unsafe { logical_device.create_semaphore(&semaphore_create_info, None) }.or_vulkan("create semaphore")?;
		let fence = unsafe { logical_device.create_fence(&fence_create_info, None) }.or_vulkan("create fence")?;

		frames.push(InFlightFrame {
			image_available,
			render_finished,
			fence,
			command_buffer
		});
	}

	Ok(frames)
}

pub fn create_pipeline_layout(logical_device: &ash::Device) -> Result<vk::PipelineLayout> {
	let pipeline_layout_create_info = vk::PipelineLayoutCreateInfo::builder();

	unsafe { logical_device.create_pipeline_layout(&pipeline_layout_create_info, None) }.or_vulkan("create pipeline layout")
}

/// Builds the fixed-color triangle pipeline. The viewport is baked in, so the
/// pipeline is rebuilt whenever the swapchain is.
pub fn create_pipeline(
	logical_device: &ash::Device,
	extent: vk::Extent2D,
	pipeline_layout: vk::PipelineLayout,
	render_pass: vk::RenderPass,
	shader_code: &ShaderCode)
	-> Result<vk::Pipeline>
{
	let entry_point_cstr = unsafe { CStr::from_bytes_with_nul_unchecked(ENTRY_POINT) };

	let vert_module = create_shader_module(logical_device, &shader_code.vertex)?;
	let frag_module = match create_shader_module(logical_device, &shader_code.fragment) {
		Ok(module) => module,
		Err(e) => {
			unsafe { logical_device.destroy_shader_module(vert_module, None) };
			return Err(e);
		}
	};

	let vert_stage_create_info = vk::PipelineShaderStageCreateInfo::builder()
		.stage(vk::ShaderStageFlags::VERTEX)
		.module(vert_module)
		.name(entry_point_cstr);

	let frag_stage_create_info = vk::PipelineShaderStageCreateInfo::builder()
		.stage(vk::ShaderStageFlags::FRAGMENT)
		.module(frag_module)
		.name(entry_point_cstr);

	let stage_create_infos = [vert_stage_create_info.build(), frag_stage_create_info.build()];

	let input_binding_description = vk::VertexInputBindingDescription::builder()
		.binding(0)
		.stride(size_of::<Vector3>() as u32)
		.input_rate(vk::VertexInputRate::VERTEX);
	let input_binding_descriptions = [input_binding_description.build()];

	let input_attribute_description_position = vk::VertexInputAttributeDescription::builder()
		.binding(0)
		.location(0)
		.format(vk::Format::R32G32B32_SFLOAT)
		.offset(0);
	let input_attribute_descriptions = [input_attribute_description_position.build()];

	let vertex_input_state_create_info = vk::PipelineVertexInputStateCreateInfo::builder()
		.vertex_binding_descriptions(&input_binding_descriptions)
		.vertex_attribute_descriptions(&input_attribute_descriptions);

	let input_assembly_state_create_info = vk::PipelineInputAssemblyStateCreateInfo::builder()
		.topology(vk::PrimitiveTopology::TRIANGLE_LIST)
		.primitive_restart_enable(false);

	let viewport = vk::Viewport::builder()
		.x(0.0)
		.y(0.0)
		.width(extent.width as f32)
		.height(extent.height as f32)
		.min_depth(0.0)
		.max_depth(1.0);
	let viewports = [viewport.build()];

	let scissor = vk::Rect2D::builder()
		.offset(vk::Offset2D::builder().x(0).y(0).build())
		.extent(extent);
	let scissors = [scissor.build()];

	let viewport_state_create_info = vk::PipelineViewportStateCreateInfo::builder()
		.viewports(&viewports)
		.scissors(&scissors);

	// Clicks can come in either winding order
	let rasterization_state_create_info = vk::PipelineRasterizationStateCreateInfo::builder()
		.depth_clamp_enable(false)
		.rasterizer_discard_enable(false)
		.polygon_mode(vk::PolygonMode::FILL)
		.line_width(1.0)
		.cull_mode(vk::CullModeFlags::NONE)
		.front_face(vk::FrontFace::COUNTER_CLOCKWISE)
		.depth_bias_enable(false);

	let multisample_state_create_info = vk::PipelineMultisampleStateCreateInfo::builder()
		.sample_shading_enable(false)
		.rasterization_samples(vk::SampleCountFlags::TYPE_1);

	let color_blend_attachment_state = vk::PipelineColorBlendAttachmentState::builder()
		.color_write_mask(vk::ColorComponentFlags::all())
		.blend_enable(false);
	let color_blend_attachment_states = [color_blend_attachment_state.build()];

	let color_blend_state_create_info = vk::PipelineColorBlendStateCreateInfo::builder()
		.logic_op_enable(false)
		.attachments(&color_blend_attachment_states);

	let pipeline_create_info = vk::GraphicsPipelineCreateInfo::builder()
		.stages(&stage_create_infos)
		.vertex_input_state(&vertex_input_state_create_info)
		.input_assembly_state(&input_assembly_state_create_info)
		.viewport_state(&viewport_state_create_info)
		.rasterization_state(&rasterization_state_create_info)
		.multisample_state(&multisample_state_create_info)
		.color_blend_state(&color_blend_state_create_info)
		.layout(pipeline_layout)
		.render_pass(render_pass)
		.subpass(0);

	let result = unsafe { logical_device.create_graphics_pipelines(vk::PipelineCache::null(), &[pipeline_create_info.build()], None) };

	unsafe {
		logical_device.destroy_shader_module(vert_module, None);
		logical_device.destroy_shader_module(frag_module, None);
	}

	let pipelines = result.map_err(|(_, result)| result).or_vulkan("create graphics pipeline")?;
	Ok(pipelines[0])
}
