use std::mem::size_of_val;
use ash::{vk, version::DeviceV1_0, extensions::khr};
use tracing::{debug, info};
use crate::{
	config::Config,
	error::{Result, VulkanResultExt},
	math::Vector3,
	sketch::VertexSink,
	vulkan::{Context, Buffer, ShaderCode}
};

mod creation;
use creation::*;

const IN_FLIGHT_FRAMES_COUNT: usize = 2;

/// Draws the triangle list as filled triangles over a cleared background.
pub struct Renderer {
	context: Context,
	render_pass: vk::RenderPass,
	swapchain: Swapchain,
	command_pool: vk::CommandPool,
	pipeline_layout: vk::PipelineLayout,
	pipeline: vk::Pipeline,
	shader_code: ShaderCode,
	vertex_buffer: Buffer,
	vertex_count: u32,
	in_flight_frames: Vec<InFlightFrame>,
	current_in_flight_frame: usize,
	clear_color: [f32; 4]
}

struct Swapchain {
	extension: khr::Swapchain,
	handle: vk::SwapchainKHR,
	extent: vk::Extent2D,
	frames: Vec<SwapchainFrame>
}

struct SwapchainFrame {
	image_view: vk::ImageView,
	framebuffer: vk::Framebuffer,
	fence: vk::Fence
}

#[derive(Clone, Copy)]
struct InFlightFrame {
	image_available: vk::Semaphore,
	render_finished: vk::Semaphore,
	fence: vk::Fence,
	command_buffer: vk::CommandBuffer
}

impl Renderer {
	pub fn new(glfw: &glfw::Glfw, window: &glfw::Window, config: &Config) -> Result<Self> {
		// Compile first so broken shaders fail before any device work
		let shader_code = ShaderCode::compile()?;

		let context = Context::new(glfw, window, config.validation)?;
		let (framebuffer_width, framebuffer_height) = window.get_framebuffer_size();
		let render_pass = create_render_pass(&context)?;
		let swapchain = create_swapchain(&context, framebuffer_width as u32, framebuffer_height as u32, render_pass)?;
		let command_pool = create_command_pool(&context)?;
		let pipeline_layout = create_pipeline_layout(&context.logical_device)?;
		let pipeline = create_pipeline(&context.logical_device, swapchain.extent, pipeline_layout, render_pass, &shader_code)?;
		let in_flight_frames = create_in_flight_frames(&context.logical_device, command_pool)?;

		let vertex_buffer = Buffer::null(
			vk::BufferUsageFlags::VERTEX_BUFFER,
			vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT);

		Ok(Self {
			context,
			render_pass,
			swapchain,
			command_pool,
			pipeline_layout,
			pipeline,
			shader_code,
			vertex_buffer,
			vertex_count: 0,
			in_flight_frames,
			current_in_flight_frame: 0,
			clear_color: config.clear_color
		})
	}

	pub fn recreate_swapchain(&mut self, framebuffer_width: i32, framebuffer_height: i32) -> Result<()> {
		let logical_device = &self.context.logical_device;

		unsafe {
			logical_device.device_wait_idle().or_vulkan("wait for device idle")?;

			for frame in &self.swapchain.frames {
				logical_device.destroy_framebuffer(frame.framebuffer, None);
				logical_device.destroy_image_view(frame.image_view, None);
			}

			self.swapchain.extension.destroy_swapchain(self.swapchain.handle, None);
			logical_device.destroy_pipeline(self.pipeline, None);
		}

		self.swapchain.frames.clear();
		self.swapchain.handle = vk::SwapchainKHR::null();
		self.pipeline = vk::Pipeline::null();

		self.swapchain = create_swapchain(&self.context, framebuffer_width as u32, framebuffer_height as u32, self.render_pass)?;
		self.pipeline = create_pipeline(&self.context.logical_device, self.swapchain.extent, self.pipeline_layout, self.render_pass, &self.shader_code)?;

		info!(width = self.swapchain.extent.width, height = self.swapchain.extent.height, "Swapchain recreated");
		Ok(())
	}

	/// Renders one frame. Returns true when the surface no longer matches the
	/// swapchain and it has to be recreated.
	pub fn render(&mut self) -> Result<bool> {
		let logical_device = &self.context.logical_device;
		let in_flight_frame = self.in_flight_frames[self.current_in_flight_frame];

		// Wait for this in flight frame to become available
		let fences = [in_flight_frame.fence];
		unsafe { logical_device.wait_for_fences(&fences, true, std::u64::MAX) }.or_vulkan("wait for in flight frame")?;

		// Acquire a swapchain image to render to
		let result = unsafe {
			self.swapchain.extension.acquire_next_image(self.swapchain.handle,
				std::u64::MAX,
				in_flight_frame.image_available,
				vk::Fence::null())
		};

		let image_index = match result {
			Ok((image_index, _)) => image_index,
			Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => return Ok(true),
			Err(e) => return Err(e).or_vulkan("acquire swapchain image")
		};

		let swapchain_frame = &mut self.swapchain.frames[image_index as usize];

		// Wait for swapchain frame to become available
		if swapchain_frame.fence != vk::Fence::null() {
			let fences = [swapchain_frame.fence];
			unsafe { logical_device.wait_for_fences(&fences, true, std::u64::MAX) }.or_vulkan("wait for swapchain frame")?;
		}

		swapchain_frame.fence = in_flight_frame.fence;
		let framebuffer = swapchain_frame.framebuffer;

		self.record_command_buffer(in_flight_frame.command_buffer, framebuffer)?;

		// Wait for image to be available then submit command buffer
		let logical_device = &self.context.logical_device;
		let image_available_semaphores = [in_flight_frame.image_available];
		let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
		let command_buffers = [in_flight_frame.command_buffer];
		let render_finished_semaphores = [in_flight_frame.render_finished];
		let submit_info = vk::SubmitInfo::builder()
			.wait_semaphores(&image_available_semaphores)
			.wait_dst_stage_mask(&wait_stages)
			.command_buffers(&command_buffers)
			.signal_semaphores(&render_finished_semaphores);

		unsafe {
			logical_device.reset_fences(&fences).or_vulkan("reset in flight fence")?;
			logical_device.queue_submit(self.context.graphics_queue, &[submit_info.build()], in_flight_frame.fence).or_vulkan("submit command buffer")?;
		}

		// Wait for render to finish then present swapchain image
		let swapchains = [self.swapchain.handle];
		let image_indices = [image_index];
		let present_info = vk::PresentInfoKHR::builder()
			.wait_semaphores(&render_finished_semaphores)
			.swapchains(&swapchains)
			.image_indices(&image_indices);

		let result = unsafe { self.swapchain.extension.queue_present(self.context.present_queue, &present_info) };

		self.current_in_flight_frame = (self.current_in_flight_frame + 1) % IN_FLIGHT_FRAMES_COUNT;

		match result {
			Ok(suboptimal) => Ok(suboptimal),
			Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(true),
			Err(e) => Err(e).or_vulkan("present swapchain image")
		}
	}

	fn record_command_buffer(&self, command_buffer: vk::CommandBuffer, framebuffer: vk::Framebuffer) -> Result<()> {
		let logical_device = &self.context.logical_device;

		let clear_values = [vk::ClearValue {
			color: vk::ClearColorValue {
				float32: self.clear_color
			}
		}];

		let command_buffer_begin_info = vk::CommandBufferBeginInfo::builder()
			.flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);

		let render_pass_begin_info = vk::RenderPassBeginInfo::builder()
			.render_pass(self.render_pass)
			.framebuffer(framebuffer)
			.render_area(vk::Rect2D::builder()
				.offset(vk::Offset2D::builder().x(0).y(0).build())
				.extent(self.swapchain.extent)
				.build())
			.clear_values(&clear_values);

		unsafe {
			logical_device.begin_command_buffer(command_buffer, &command_buffer_begin_info).or_vulkan("begin command buffer")?;
			logical_device.cmd_begin_render_pass(command_buffer, &render_pass_begin_info, vk::SubpassContents::INLINE);

			if self.vertex_count > 0 {
				logical_device.cmd_bind_pipeline(command_buffer, vk::PipelineBindPoint::GRAPHICS, self.pipeline);
				logical_device.cmd_bind_vertex_buffers(command_buffer, 0, &[self.vertex_buffer.handle], &[0]);
				logical_device.cmd_draw(command_buffer, self.vertex_count, 1, 0, 0);
			}

			logical_device.cmd_end_render_pass(command_buffer);
			logical_device.end_command_buffer(command_buffer).or_vulkan("end command buffer")?;
		}

		Ok(())
	}
}

impl VertexSink for Renderer {
	/// Replaces the vertex buffer contents with `vertices`, growing the buffer
	/// when it is too small. Waits for the device so no frame in flight reads
	/// the buffer while it changes.
	fn upload(&mut self, vertices: &[Vector3]) -> Result<()> {
		let size = size_of_val(vertices) as vk::DeviceSize;

		unsafe { self.context.logical_device.device_wait_idle() }.or_vulkan("wait for device idle")?;
		self.vertex_count = 0;

		if size > self.vertex_buffer.capacity {
			self.vertex_buffer.reallocate(&self.context, size)?;
		}

		if !vertices.is_empty() {
			self.vertex_buffer.write(&self.context.logical_device, vertices)?;
		}

		self.vertex_count = vertices.len() as u32;
		debug!(vertices = vertices.len(), bytes = size, capacity = self.vertex_buffer.capacity, "Vertex buffer updated");
		Ok(())
	}
}

impl Drop for Renderer {
	fn drop(&mut self) {
		let logical_device = &self.context.logical_device;

		unsafe {
			// Nothing useful can be done about a failure this late
			let _ = logical_device.device_wait_idle();

			for frame in &self.in_flight_frames {
				logical_device.destroy_semaphore(frame.image_available, None);
				logical_device.destroy_semaphore(frame.render_finished, None);
				logical_device.destroy_fence(frame.fence, None);
			}

			logical_device.destroy_pipeline(self.pipeline, None);
			logical_device.destroy_pipeline_layout(self.pipeline_layout, None);
			logical_device.destroy_command_pool(self.command_pool, None);

			for frame in &self.swapchain.frames {
				logical_device.destroy_framebuffer(frame.framebuffer, None);
				logical_device.destroy_image_view(frame.image_view, None);
			}

			self.swapchain.extension.destroy_swapchain(self.swapchain.handle, None);
			logical_device.destroy_render_pass(self.render_pass, None);
		}

		self.vertex_buffer.destroy(&self.context.logical_device);
	}
}
