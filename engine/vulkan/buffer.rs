use ash::{vk, version::DeviceV1_0};
use std::{mem::size_of_val, ptr::copy_nonoverlapping};
use crate::{
	error::{Result, VulkanResultExt},
	vulkan::Context
};

/// A buffer and its memory. The handles start out null and are allocated on
/// the first `reallocate`. Destruction is explicit since the buffer does not
/// hold on to the device.
pub struct Buffer {
	pub handle: vk::Buffer,
	pub memory: vk::DeviceMemory,
	usage: vk::BufferUsageFlags,
	properties: vk::MemoryPropertyFlags,
	pub capacity: vk::DeviceSize
}

impl Buffer {
	pub fn null(usage: vk::BufferUsageFlags, properties: vk::MemoryPropertyFlags) -> Self {
		Self {
			handle: vk::Buffer::null(),
			memory: vk::DeviceMemory::null(),
			usage,
			properties,
			capacity: 0
		}
	}

	/// Replaces the buffer with one that holds at least `required_capacity`
	/// bytes. Old contents are not preserved.
	pub fn reallocate(&mut self, context: &Context, required_capacity: vk::DeviceSize) -> Result<()> {
		self.destroy(&context.logical_device);

		let logical_device = &context.logical_device;

		let create_info = vk::BufferCreateInfo::builder()
			.size(required_capacity)
			.usage(self.usage)
			.sharing_mode(vk::SharingMode::EXCLUSIVE);

		let handle = unsafe { logical_device.create_buffer(&create_info, None) }.or_vulkan("create buffer")?;
		let memory_requirements = unsafe { logical_device.get_buffer_memory_requirements(handle) };

		let memory_type_index = match context.physical_device.find_memory_type_index(memory_requirements.memory_type_bits, self.properties) {
			Ok(index) => index,
			Err(e) => {
				unsafe { logical_device.destroy_buffer(handle, None) };
				return Err(e);
			}
		};

		let allocate_info = vk::MemoryAllocateInfo::builder()
			.allocation_size(memory_requirements.size)
			.memory_type_index(memory_type_index);

		let memory = match unsafe { logical_device.allocate_memory(&allocate_info, None) } {
			Ok(memory) => memory,
			Err(result) => {
				unsafe { logical_device.destroy_buffer(handle, None) };
				return Err(result).or_vulkan("allocate buffer memory");
			}
		};

		self.handle = handle;
		self.memory = memory;
		self.capacity = memory_requirements.size;

		unsafe { logical_device.bind_buffer_memory(handle, memory, 0) }.or_vulkan("bind buffer memory")
	}

	/// Copies `data` to the start of the buffer. The memory must be host
	/// visible and coherent, and hold at least `size_of_val(data)` bytes.
	pub fn write<T: Copy>(&self, logical_device: &ash::Device, data: &[T]) -> Result<()> {
		let size = size_of_val(data) as vk::DeviceSize;
		debug_assert!(size <= self.capacity);

		unsafe {
			let dst_ptr = logical_device.map_memory(self.memory, 0, size, vk::MemoryMapFlags::empty()).or_vulkan("map buffer memory")?;
			copy_nonoverlapping(data.as_ptr(), dst_ptr as *mut T, data.len());
			logical_device.unmap_memory(self.memory);
		}

		Ok(())
	}

	pub fn destroy(&mut self, logical_device: &ash::Device) {
		unsafe {
			logical_device.destroy_buffer(self.handle, None);
			logical_device.free_memory(self.memory, None);
		}

		self.handle = vk::Buffer::null();
		self.memory = vk::DeviceMemory::null();
		self.capacity = 0;
	}
}
