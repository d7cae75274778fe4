use super::ApproxEq;

pub const ZERO: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 0.0 };

/// Vertex position in normalized device coordinates. The layout matches the
/// `vec3` vertex attribute so a slice of these can be copied straight into a
/// vertex buffer.
#[derive(Default, Copy, Clone, Debug, PartialEq)]
#[repr(C)]
pub struct Vector3 {
	pub x: f32,
	pub y: f32,
	pub z: f32
}

impl Vector3 {
	pub fn new() -> Self {
		ZERO
	}

	pub fn from(x: f32, y: f32, z: f32) -> Self {
		Self { x, y, z }
	}

	pub fn from_scalar(scalar: f32) -> Self {
		Self { x: scalar, y: scalar, z: scalar }
	}

	pub fn set(&mut self, x: f32, y: f32, z: f32) {
		self.x = x;
		self.y = y;
		self.z = z;
	}
}

impl ApproxEq for Vector3 {
	fn approx_eq(&self, other: &Self, tol: f32) -> bool {
		(self.x - other.x).abs() <= tol &&
		(self.y - other.y).abs() <= tol &&
		(self.z - other.z).abs() <= tol
	}
}
