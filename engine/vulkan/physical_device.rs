use ash::{vk, version::InstanceV1_0, extensions::khr};
use std::ffi::CStr;
use tracing::info;
use crate::error::{Result, SketchError, VulkanResultExt};

pub struct PhysicalDevice {
	pub handle: vk::PhysicalDevice,
	pub graphics_queue_family: u32,
	pub present_queue_family: u32,
	pub memory_properties: vk::PhysicalDeviceMemoryProperties
}

impl PhysicalDevice {
	/// Picks the first device that can draw to the surface, preferring a
	/// discrete GPU over anything else.
	pub fn new(instance: &ash::Instance, surface_handle: vk::SurfaceKHR, surface_extension: &khr::Surface, device_extensions: &[&CStr]) -> Result<Self> {
		let physical_devices = unsafe { instance.enumerate_physical_devices() }.or_vulkan("enumerate physical devices")?;
		let mut fallback = None;

		'main: for device in physical_devices {
			let properties = unsafe { instance.get_physical_device_properties(device) };

			let queue_family_properties = unsafe { instance.get_physical_device_queue_family_properties(device) };
			let mut graphics_queue_family = None;
			let mut present_queue_family = None;
			for (i, property) in queue_family_properties.iter().enumerate() {
				if graphics_queue_family.is_none() && property.queue_flags.contains(vk::QueueFlags::GRAPHICS) {
					graphics_queue_family = Some(i as u32);
				}

				let supports_present = unsafe { surface_extension.get_physical_device_surface_support(device, i as u32, surface_handle) }
					.or_vulkan("query surface support")?;
				if present_queue_family.is_none() && supports_present {
					present_queue_family = Some(i as u32);
				}
			}

			let (graphics_queue_family, present_queue_family) = match (graphics_queue_family, present_queue_family) {
				(Some(graphics), Some(present)) => (graphics, present),
				_ => continue
			};

			let available_device_extensions = unsafe { instance.enumerate_device_extension_properties(device) }
				.or_vulkan("enumerate device extensions")?;
			for device_extension in device_extensions {
				let supported = available_device_extensions.iter()
					.any(|e| unsafe { CStr::from_ptr(e.extension_name.as_ptr()) } == *device_extension);
				if !supported {
					continue 'main;
				}
			}

			let formats = unsafe { surface_extension.get_physical_device_surface_formats(device, surface_handle) }.or_vulkan("query surface formats")?;
			if formats.is_empty() {
				continue;
			}

			let present_modes = unsafe { surface_extension.get_physical_device_surface_present_modes(device, surface_handle) }.or_vulkan("query present modes")?;
			if present_modes.is_empty() {
				continue;
			}

			let candidate = Self {
				handle: device,
				graphics_queue_family,
				present_queue_family,
				memory_properties: unsafe { instance.get_physical_device_memory_properties(device) }
			};
			let name = unsafe { CStr::from_ptr(properties.device_name.as_ptr()) }.to_string_lossy().into_owned();

			if properties.device_type == vk::PhysicalDeviceType::DISCRETE_GPU {
				info!(device = %name, "Using discrete GPU");
				return Ok(candidate);
			}

			if fallback.is_none() {
				fallback = Some((candidate, name));
			}
		}

		match fallback {
			Some((device, name)) => {
				info!(device = %name, "Using non-discrete GPU");
				Ok(device)
			},
			None => Err(SketchError::NoSuitableDevice)
		}
	}

	pub fn find_memory_type_index(&self, r#type: u32, properties: vk::MemoryPropertyFlags) -> Result<u32> {
		let available_types = &self.memory_properties.memory_types[..self.memory_properties.memory_type_count as usize];

		available_types.iter()
			.enumerate()
			.position(|(i, t)| r#type & (1 << i) != 0 && t.property_flags.contains(properties))
			.map(|i| i as u32)
			.ok_or(SketchError::NoSuitableMemoryType)
	}
}
