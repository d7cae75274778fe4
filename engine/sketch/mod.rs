pub mod mapper;
pub use mapper::{pixel_to_normalized, normalized_to_pixel};

pub mod state;
pub use state::InputState;

use tracing::{debug, info};
use crate::{
	error::Result,
	math::{Vector2, Vector3}
};

/// Destination for the triangle list after a triangle completes. The whole
/// list is handed over every time.
pub trait VertexSink {
	fn upload(&mut self, vertices: &[Vector3]) -> Result<()>;
}

/// All state of a drawing session: the triangle being entered, every
/// completed triangle and the live pointer preview.
#[derive(Default, Debug)]
pub struct SketchSession {
	state: InputState,
	triangles: Vec<Vector3>,
	preview: Option<Vector3>
}

impl SketchSession {
	pub fn new() -> Self {
		Self::default()
	}

	/// Handles a primary pointer press at `pixel`. When this completes a
	/// triangle, the full triangle list is uploaded to `sink` and the completed
	/// triangle is returned.
	///
	/// A failed upload still leaves the triangle in the list and the machine
	/// idle. The error is returned to the caller.
	pub fn press<S: VertexSink>(&mut self, pixel: Vector2, window_size: Vector2, sink: &mut S) -> Result<Option<[Vector3; 3]>> {
		let vertex = pixel_to_normalized(pixel, window_size);
		debug!(x = vertex.x, y = vertex.y, state = %self.state, "Pointer pressed");

		let (next_state, completed) = self.state.advance(vertex);
		self.state = next_state;

		if next_state.is_idle() {
			self.preview = None;
		}

		if let Some(triangle) = completed {
			self.triangles.extend_from_slice(&triangle);
			info!(triangles = self.triangle_count(), "Triangle completed");
			sink.upload(&self.triangles)?;
		}

		Ok(completed)
	}

	/// Tracks the pointer while a triangle is in progress. Only the preview is
	/// touched, never the triangle list.
	pub fn pointer_moved(&mut self, pixel: Vector2, window_size: Vector2) {
		if self.state.is_idle() {
			return;
		}

		self.preview = Some(pixel_to_normalized(pixel, window_size));
	}

	pub fn state(&self) -> &InputState {
		&self.state
	}

	/// Completed triangles as a flat list, three vertices per triangle.
	pub fn vertices(&self) -> &[Vector3] {
		&self.triangles
	}

	pub fn triangle_count(&self) -> usize {
		self.triangles.len() / 3
	}

	pub fn preview(&self) -> Option<Vector3> {
		self.preview
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{error::SketchError, math::assert_approx_eq};
	use ash::vk;

	const WINDOW: Vector2 = Vector2 { x: 500.0, y: 500.0 };

	#[derive(Default)]
	struct RecordingSink {
		uploads: Vec<Vec<Vector3>>
	}

	impl VertexSink for RecordingSink {
		fn upload(&mut self, vertices: &[Vector3]) -> Result<()> {
			self.uploads.push(vertices.to_vec());
			Ok(())
		}
	}

	struct FailingSink;

	impl VertexSink for FailingSink {
		fn upload(&mut self, _vertices: &[Vector3]) -> Result<()> {
			Err(SketchError::Vulkan { operation: "map vertex buffer memory", result: vk::Result::ERROR_MEMORY_MAP_FAILED })
		}
	}

	fn press(session: &mut SketchSession, sink: &mut RecordingSink, x: f32, y: f32) -> Option<[Vector3; 3]> {
		session.press(Vector2::from(x, y), WINDOW, sink).unwrap()
	}

	#[test]
	fn new_session_is_empty_and_idle() {
		let session = SketchSession::new();
		assert!(session.state().is_idle());
		assert!(session.vertices().is_empty());
		assert_eq!(session.triangle_count(), 0);
		assert_eq!(session.preview(), None);
	}

	#[test]
	fn three_presses_make_one_triangle_in_click_order() {
		let mut session = SketchSession::new();
		let mut sink = RecordingSink::default();

		assert_eq!(press(&mut session, &mut sink, 0.0, 0.0), None);
		assert_eq!(press(&mut session, &mut sink, 500.0, 500.0), None);
		let triangle = press(&mut session, &mut sink, 250.0, 250.0).unwrap();

		let expected = [
			Vector3::from(-1.0, 1.0, 0.0),
			Vector3::from(1.0, -1.0, 0.0),
			Vector3::from(0.0, 0.0, 0.0)
		];

		assert_eq!(session.vertices().len(), 3);
		for i in 0..3 {
			assert_approx_eq(&session.vertices()[i], &expected[i], 1e-6);
			assert_approx_eq(&triangle[i], &expected[i], 1e-6);
		}
	}

	#[test]
	fn fewer_than_three_presses_never_make_a_triangle() {
		let mut session = SketchSession::new();
		let mut sink = RecordingSink::default();

		press(&mut session, &mut sink, 10.0, 10.0);
		assert_eq!(session.triangle_count(), 0);
		assert_eq!(session.state().pending_count(), 1);

		press(&mut session, &mut sink, 20.0, 10.0);
		assert_eq!(session.triangle_count(), 0);
		assert_eq!(session.state().pending_count(), 2);

		assert!(sink.uploads.is_empty());
	}

	#[test]
	fn fourth_press_starts_a_new_triangle() {
		let mut session = SketchSession::new();
		let mut sink = RecordingSink::default();

		press(&mut session, &mut sink, 10.0, 10.0);
		press(&mut session, &mut sink, 20.0, 10.0);
		press(&mut session, &mut sink, 15.0, 20.0);
		let completed = session.vertices().to_vec();

		assert_eq!(press(&mut session, &mut sink, 400.0, 400.0), None);
		assert_eq!(session.vertices(), &completed[..]);
		assert_eq!(*session.state(), InputState::HaveFirstVertex(pixel_to_normalized(Vector2::from(400.0, 400.0), WINDOW)));
	}

	#[test]
	fn list_length_is_three_per_triangle() {
		let mut session = SketchSession::new();
		let mut sink = RecordingSink::default();

		for n in 1..=5 {
			for i in 0..3 {
				press(&mut session, &mut sink, (n * 40 + i * 10) as f32, (i * 30) as f32);
			}

			assert_eq!(session.vertices().len(), 3 * n as usize);
			assert_eq!(session.triangle_count(), n as usize);
		}
	}

	#[test]
	fn completed_triangles_are_never_changed() {
		let mut session = SketchSession::new();
		let mut sink = RecordingSink::default();

		press(&mut session, &mut sink, 1.0, 2.0);
		press(&mut session, &mut sink, 3.0, 4.0);
		press(&mut session, &mut sink, 5.0, 6.0);
		let first = session.vertices().to_vec();

		press(&mut session, &mut sink, 100.0, 200.0);
		press(&mut session, &mut sink, 300.0, 400.0);
		press(&mut session, &mut sink, 450.0, 60.0);

		assert_eq!(&session.vertices()[..3], &first[..]);
	}

	#[test]
	fn full_list_is_uploaded_once_per_triangle() {
		let mut session = SketchSession::new();
		let mut sink = RecordingSink::default();

		for i in 0..6 {
			press(&mut session, &mut sink, i as f32 * 50.0, 100.0);
		}

		assert_eq!(sink.uploads.len(), 2);
		assert_eq!(sink.uploads[0].len(), 3);
		assert_eq!(sink.uploads[1].len(), 6);
		assert_eq!(&sink.uploads[1][..], session.vertices());
	}

	#[test]
	fn pointer_movement_updates_preview_only() {
		let mut session = SketchSession::new();
		let mut sink = RecordingSink::default();

		session.pointer_moved(Vector2::from(100.0, 100.0), WINDOW);
		assert_eq!(session.preview(), None);

		press(&mut session, &mut sink, 10.0, 10.0);
		session.pointer_moved(Vector2::from(250.0, 250.0), WINDOW);
		assert_approx_eq(&session.preview().unwrap(), &Vector3::new(), 1e-6);
		assert_eq!(session.state().pending_count(), 1);
		assert!(session.vertices().is_empty());

		press(&mut session, &mut sink, 20.0, 10.0);
		press(&mut session, &mut sink, 30.0, 30.0);
		assert_eq!(session.preview(), None);
		assert_eq!(sink.uploads.len(), 1);
	}

	#[test]
	fn failed_upload_keeps_triangle_and_resets() {
		let mut session = SketchSession::new();
		let mut sink = FailingSink;

		session.press(Vector2::from(1.0, 1.0), WINDOW, &mut sink).unwrap();
		session.press(Vector2::from(2.0, 1.0), WINDOW, &mut sink).unwrap();
		let result = session.press(Vector2::from(2.0, 2.0), WINDOW, &mut sink);

		assert!(matches!(result, Err(SketchError::Vulkan { .. })));
		assert_eq!(session.triangle_count(), 1);
		assert!(session.state().is_idle());
	}
}
