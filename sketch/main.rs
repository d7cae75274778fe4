use engine::{
	math::Vector2,
	Config,
	Renderer,
	Result,
	SketchError,
	SketchSession
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const EXIT_FAILURE: i32 = -1;

fn main() {
	if let Err(e) = setup_tracing() {
		eprintln!("{}", e);
		std::process::exit(EXIT_FAILURE);
	}

	let config = Config::from_env();

	if let Err(e) = run(&config) {
		error!("{}", e);
		std::process::exit(EXIT_FAILURE);
	}
}

fn setup_tracing() -> Result<()> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
	tracing::subscriber::set_global_default(subscriber)?;
	Ok(())
}

fn log_glfw_error(error: glfw::Error, description: String, _: &()) {
	error!(?error, "GLFW: {}", description);
}

fn run(config: &Config) -> Result<()> {
	let error_callback = glfw::Callback { f: log_glfw_error as fn(glfw::Error, String, &()), data: () };
	let mut glfw = glfw::init(Some(error_callback)).map_err(SketchError::GlfwInit)?;
	glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
	glfw.window_hint(glfw::WindowHint::Resizable(true));

	let (mut window, events) = glfw.create_window(config.window_width, config.window_height, &config.window_title, glfw::WindowMode::Windowed)
		.ok_or(SketchError::WindowCreation { width: config.window_width, height: config.window_height })?;
	window.set_key_polling(true);
	window.set_mouse_button_polling(true);
	window.set_cursor_pos_polling(true);
	window.set_framebuffer_size_polling(true);

	let mut renderer = Renderer::new(&glfw, &window, config)?;
	let mut session = SketchSession::new();
	let mut framebuffer_resized = false;

	info!(width = config.window_width, height = config.window_height, "Click three points to draw a triangle");

	while !window.should_close() {
		glfw.poll_events();

		for (_, event) in glfw::flush_messages(&events) {
			match event {
				glfw::WindowEvent::Key(glfw::Key::Escape, _, glfw::Action::Press, _) => {
					window.set_should_close(true);
				},
				glfw::WindowEvent::FramebufferSize(_, _) => {
					framebuffer_resized = true;
				},
				glfw::WindowEvent::MouseButton(glfw::MouseButton::Button1, glfw::Action::Press, _) => {
					let (cursor_x, cursor_y) = window.get_cursor_pos();
					let (window_width, window_height) = window.get_size();
					session.press(Vector2::from_f64(cursor_x, cursor_y), Vector2::from_i32(window_width, window_height), &mut renderer)?;
				},
				glfw::WindowEvent::CursorPos(cursor_x, cursor_y) => {
					let (window_width, window_height) = window.get_size();
					session.pointer_moved(Vector2::from_f64(cursor_x, cursor_y), Vector2::from_i32(window_width, window_height));
				},
				_ => {}
			}
		}

		// Minimized
		let (framebuffer_width, framebuffer_height) = window.get_framebuffer_size();
		if framebuffer_width == 0 || framebuffer_height == 0 {
			glfw.wait_events();
			continue;
		}

		if framebuffer_resized {
			renderer.recreate_swapchain(framebuffer_width, framebuffer_height)?;
			framebuffer_resized = false;
		}

		framebuffer_resized = renderer.render()?;
	}

	info!(triangles = session.triangle_count(), "Window closed");
	Ok(())
}
