use ash::{vk, version::EntryV1_0, version::InstanceV1_0, version::DeviceV1_0, extensions::ext, extensions::khr, vk::Handle};
use std::{
	ffi::{CString, CStr},
	os::raw::{c_void, c_char}
};
use tracing::{debug, error, info, warn};
use super::PhysicalDevice;
use crate::error::{Result, SketchError, VulkanResultExt};

const VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

pub struct Context {
	pub instance: ash::Instance,
	pub debug_utils: Option<DebugUtils>,
	pub physical_device: PhysicalDevice,
	pub surface: Surface,
	pub logical_device: ash::Device,
	pub graphics_queue: vk::Queue,
	pub present_queue: vk::Queue
}

pub struct DebugUtils {
	pub extension: ext::DebugUtils,
	pub messenger_handle: vk::DebugUtilsMessengerEXT
}

pub struct Surface {
	pub extension: khr::Surface,
	pub handle: vk::SurfaceKHR,
	pub format: vk::SurfaceFormatKHR
}

impl Context {
	pub fn new(glfw: &glfw::Glfw, window: &glfw::Window, validation: bool) -> Result<Self> {
		if !glfw.vulkan_supported() {
			return Err(SketchError::VulkanUnavailable(String::from("GLFW found no Vulkan loader")));
		}

		// Create entry
		let entry = unsafe { ash::Entry::new() }.map_err(|e| SketchError::VulkanUnavailable(format!("{:?}", e)))?;

		// Enable validation only when asked for and installed
		let validation_layer = CString::new(VALIDATION_LAYER).map_err(|e| SketchError::InstanceCreation(e.to_string()))?;
		let validation = validation && {
			let available_layers = entry.enumerate_instance_layer_properties().or_vulkan("enumerate instance layers")?;
			let found = available_layers.iter()
				.any(|layer| unsafe { CStr::from_ptr(layer.layer_name.as_ptr()) } == validation_layer.as_c_str());

			if !found {
				warn!("{} requested but not installed, continuing without it", VALIDATION_LAYER);
			}

			found
		};

		let required_layers: Vec<&CStr> = if validation { vec![validation_layer.as_c_str()] } else { vec![] };
		let required_device_extensions = [khr::Swapchain::name()];

		// Create instance extension list
		let glfw_instance_extensions = glfw.get_required_instance_extensions()
			.ok_or_else(|| SketchError::VulkanUnavailable(String::from("GLFW could not list the required instance extensions")))?;
		let glfw_instance_extensions_cstring = glfw_instance_extensions.iter()
			.map(|s| CString::new(s.as_str()))
			.collect::<std::result::Result<Vec<CString>, _>>()
			.map_err(|e| SketchError::InstanceCreation(e.to_string()))?;

		let mut required_instance_extensions: Vec<&CStr> = glfw_instance_extensions_cstring.iter().map(|s| s.as_c_str()).collect();
		if validation {
			required_instance_extensions.push(ext::DebugUtils::name());
		}

		// Check extension support
		let available_instance_extensions = entry.enumerate_instance_extension_properties().or_vulkan("enumerate instance extensions")?;
		for required_instance_extension in &required_instance_extensions {
			let supported = available_instance_extensions.iter()
				.any(|available| unsafe { CStr::from_ptr(available.extension_name.as_ptr()) } == *required_instance_extension);

			if !supported {
				return Err(SketchError::MissingExtension(required_instance_extension.to_string_lossy().into_owned()));
			}
		}

		// Create instance
		let application_name = CString::new("Triangle Sketch").map_err(|e| SketchError::InstanceCreation(e.to_string()))?;
		let app_info = vk::ApplicationInfo::builder()
			.application_name(application_name.as_c_str())
			.application_version(vk::make_version(0, 1, 0))
			.api_version(vk::make_version(1, 0, 0));

		let layers: Vec<*const c_char> = required_layers.iter().map(|layer| layer.as_ptr()).collect();
		let instance_extensions: Vec<*const c_char> = required_instance_extensions.iter().map(|extension| extension.as_ptr()).collect();

		let mut debug_messenger_create_info = vk::DebugUtilsMessengerCreateInfoEXT::builder()
			.message_severity(vk::DebugUtilsMessageSeverityFlagsEXT::INFO
				| vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
				| vk::DebugUtilsMessageSeverityFlagsEXT::ERROR)
			.message_type(vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
				| vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
				| vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE)
			.pfn_user_callback(Some(Self::debug_message_callback))
			.build();

		let mut instance_create_info = vk::InstanceCreateInfo::builder()
			.application_info(&app_info)
			.enabled_layer_names(&layers)
			.enabled_extension_names(&instance_extensions);

		if validation {
			instance_create_info = instance_create_info.push_next(&mut debug_messenger_create_info);
		}

		let instance = unsafe { entry.create_instance(&instance_create_info, None) }
			.map_err(|e| SketchError::InstanceCreation(format!("{:?}", e)))?;

		// Create debug utils
		let debug_utils = if validation {
			let extension = ext::DebugUtils::new(&entry, &instance);
			let messenger_handle = unsafe { extension.create_debug_utils_messenger(&debug_messenger_create_info, None) }
				.or_vulkan("create debug messenger")?;

			Some(DebugUtils { extension, messenger_handle })
		}
		else {
			None
		};

		// Create surface extension and handle
		let surface_extension = khr::Surface::new(&entry, &instance);
		let mut surface_handle_raw: u64 = 0;
		let result = window.create_window_surface(instance.handle().as_raw() as usize, std::ptr::null(), &mut surface_handle_raw as *mut u64);
		if result != 0 {
			return Err(SketchError::SurfaceCreation(vk::Result::from_raw(result as i32)));
		}
		let surface_handle = vk::SurfaceKHR::from_raw(surface_handle_raw);

		// Create the physical device
		let physical_device = PhysicalDevice::new(&instance, surface_handle, &surface_extension, &required_device_extensions)?;

		// Choose a surface format. Colors are given in display space so a UNORM target shows them unchanged
		let surface_formats = unsafe { surface_extension.get_physical_device_surface_formats(physical_device.handle, surface_handle) }
			.or_vulkan("query surface formats")?;
		let surface_format = surface_formats.iter()
			.find(|f| f.format == vk::Format::B8G8R8A8_UNORM && f.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR)
			.or_else(|| surface_formats.first())
			.copied()
			.ok_or(SketchError::NoSuitableDevice)?;

		// Create logical device and queues
		let graphics_queue_family = physical_device.graphics_queue_family;
		let present_queue_family = physical_device.present_queue_family;

		let mut device_queue_create_infos = vec![vk::DeviceQueueCreateInfo::builder()
			.queue_family_index(graphics_queue_family)
			.queue_priorities(&[1.0])
			.build()];

		if graphics_queue_family != present_queue_family {
			device_queue_create_infos.push(vk::DeviceQueueCreateInfo::builder()
				.queue_family_index(present_queue_family)
				.queue_priorities(&[1.0])
				.build());
		}

		let features = vk::PhysicalDeviceFeatures::builder();
		let device_extensions: Vec<*const c_char> = required_device_extensions.iter().map(|extension| extension.as_ptr()).collect();

		let device_create_info = vk::DeviceCreateInfo::builder()
			.queue_create_infos(&device_queue_create_infos)
			.enabled_features(&features)
			.enabled_layer_names(&layers)
			.enabled_extension_names(&device_extensions);

		let logical_device = unsafe { instance.create_device(physical_device.handle, &device_create_info, None) }.or_vulkan("create logical device")?;
		let graphics_queue = unsafe { logical_device.get_device_queue(graphics_queue_family, 0) };
		let present_queue = unsafe { logical_device.get_device_queue(present_queue_family, 0) };

		info!(validation, format = ?surface_format.format, "Vulkan context created");

		Ok(Self {
			instance,
			debug_utils,
			physical_device,
			surface: Surface {
				extension: surface_extension,
				handle: surface_handle,
				format: surface_format
			},
			logical_device,
			graphics_queue,
			present_queue
		})
	}

	unsafe extern "system" fn debug_message_callback(
		message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
		message_type: vk::DebugUtilsMessageTypeFlagsEXT,
		p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
		_p_user_data: *mut c_void) -> vk::Bool32
	{
		let message = CStr::from_ptr((*p_callback_data).p_message).to_string_lossy();

		if message_severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
			error!(?message_type, "{}", message);
		}
		else if message_severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
			warn!(?message_type, "{}", message);
		}
		else {
			debug!(?message_type, "{}", message);
		}

		vk::FALSE
	}
}

impl Drop for Context {
	fn drop(&mut self) {
		unsafe {
			self.logical_device.destroy_device(None);
			self.surface.extension.destroy_surface(self.surface.handle, None);

			if let Some(debug_utils) = &self.debug_utils {
				debug_utils.extension.destroy_debug_utils_messenger(debug_utils.messenger_handle, None);
			}

			self.instance.destroy_instance(None);
		}
	}
}
