use std::fmt;
use crate::math::Vector3;

/// Progress through entering a single triangle. The pending vertices live in
/// the variants so they are consumed when the triangle completes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputState {
	Idle,
	HaveFirstVertex(Vector3),
	HaveSecondVertex(Vector3, Vector3)
}

impl Default for InputState {
	fn default() -> Self {
		InputState::Idle
	}
}

impl InputState {
	/// Feeds one pressed vertex into the machine. Returns the next state and,
	/// on the third press, the completed triangle in click order.
	pub fn advance(self, vertex: Vector3) -> (InputState, Option<[Vector3; 3]>) {
		match self {
			InputState::Idle => (InputState::HaveFirstVertex(vertex), None),
			InputState::HaveFirstVertex(a) => (InputState::HaveSecondVertex(a, vertex), None),
			InputState::HaveSecondVertex(a, b) => (InputState::Idle, Some([a, b, vertex]))
		}
	}

	pub fn is_idle(&self) -> bool {
		matches!(self, InputState::Idle)
	}

	/// Number of vertices already entered for the triangle in progress.
	pub fn pending_count(&self) -> usize {
		match self {
			InputState::Idle => 0,
			InputState::HaveFirstVertex(_) => 1,
			InputState::HaveSecondVertex(_, _) => 2
		}
	}
}

impl fmt::Display for InputState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			InputState::Idle => "idle",
			InputState::HaveFirstVertex(_) => "have first vertex",
			InputState::HaveSecondVertex(_, _) => "have second vertex"
		};

		f.write_str(name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn v(x: f32, y: f32) -> Vector3 {
		Vector3::from(x, y, 0.0)
	}

	#[test]
	fn starts_idle() {
		assert_eq!(InputState::default(), InputState::Idle);
		assert!(InputState::default().is_idle());
	}

	#[test]
	fn first_press_stores_vertex_a() {
		let (state, triangle) = InputState::Idle.advance(v(0.1, 0.2));
		assert_eq!(state, InputState::HaveFirstVertex(v(0.1, 0.2)));
		assert_eq!(triangle, None);
	}

	#[test]
	fn second_press_stores_vertex_b() {
		let (state, triangle) = InputState::HaveFirstVertex(v(0.1, 0.2)).advance(v(0.3, 0.4));
		assert_eq!(state, InputState::HaveSecondVertex(v(0.1, 0.2), v(0.3, 0.4)));
		assert_eq!(triangle, None);
	}

	#[test]
	fn third_press_completes_triangle_and_returns_to_idle() {
		let (state, triangle) = InputState::HaveSecondVertex(v(0.1, 0.2), v(0.3, 0.4)).advance(v(0.5, 0.6));
		assert_eq!(state, InputState::Idle);
		assert_eq!(triangle, Some([v(0.1, 0.2), v(0.3, 0.4), v(0.5, 0.6)]));
	}

	#[test]
	fn pending_count() {
		assert_eq!(InputState::Idle.pending_count(), 0);
		assert_eq!(InputState::HaveFirstVertex(v(0.0, 0.0)).pending_count(), 1);
		assert_eq!(InputState::HaveSecondVertex(v(0.0, 0.0), v(1.0, 1.0)).pending_count(), 2);
	}

	#[test]
	fn display() {
		assert_eq!(InputState::Idle.to_string(), "idle");
		assert_eq!(InputState::HaveFirstVertex(v(0.0, 0.0)).to_string(), "have first vertex");
		assert_eq!(InputState::HaveSecondVertex(v(0.0, 0.0), v(0.0, 0.0)).to_string(), "have second vertex");
	}
}
