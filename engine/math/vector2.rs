use auto_ops::impl_op_ex;
use super::ApproxEq;

pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

/// Window-space quantity in pixels, such as a cursor position or a window size.
#[derive(Default, Copy, Clone, Debug, PartialEq)]
pub struct Vector2 {
	pub x: f32,
	pub y: f32
}

impl Vector2 {
	pub fn new() -> Self {
		ZERO
	}

	pub fn from(x: f32, y: f32) -> Self {
		Self { x, y }
	}

	pub fn from_scalar(scalar: f32) -> Self {
		Self { x: scalar, y: scalar }
	}

	/// Window APIs report cursor positions as doubles and sizes as integers.
	pub fn from_f64(x: f64, y: f64) -> Self {
		Self { x: x as f32, y: y as f32 }
	}

	pub fn from_i32(x: i32, y: i32) -> Self {
		Self { x: x as f32, y: y as f32 }
	}

	pub fn set(&mut self, x: f32, y: f32) {
		self.x = x;
		self.y = y;
	}
}

impl ApproxEq for Vector2 {
	fn approx_eq(&self, other: &Self, tol: f32) -> bool {
		(self.x - other.x).abs() <= tol && (self.y - other.y).abs() <= tol
	}
}

impl_op_ex!(+ |a: &Vector2, b: &Vector2| -> Vector2 {
	let mut r = *a;
	r += b;
	r
});

impl_op_ex!(- |a: &Vector2, b: &Vector2| -> Vector2 {
	let mut r = *a;
	r -= b;
	r
});

impl_op_ex!(* |a: &Vector2, b: &Vector2| -> Vector2 {
	let mut r = *a;
	r *= b;
	r
});

impl_op_ex!(/ |a: &Vector2, b: &Vector2| -> Vector2 {
	let mut r = *a;
	r /= b;
	r
});

impl_op_ex!(+= |a: &mut Vector2, b: &Vector2| {
	a.x += b.x;
	a.y += b.y;
});

impl_op_ex!(-= |a: &mut Vector2, b: &Vector2| {
	a.x -= b.x;
	a.y -= b.y;
});

impl_op_ex!(*= |a: &mut Vector2, b: &Vector2| {
	a.x *= b.x;
	a.y *= b.y;
});

impl_op_ex!(/= |a: &mut Vector2, b: &Vector2| {
	a.x /= b.x;
	a.y /= b.y;
});

impl_op_ex!(+ |a: &Vector2, b: f32| -> Vector2 {
	Vector2 { x: a.x + b, y: a.y + b }
});

impl_op_ex!(- |a: &Vector2, b: f32| -> Vector2 {
	Vector2 { x: a.x - b, y: a.y - b }
});

impl_op_ex!(* |a: &Vector2, b: f32| -> Vector2 {
	Vector2 { x: a.x * b, y: a.y * b }
});

#[cfg(test)]
mod tests {
	use super::*;
	use crate::math::assert_approx_eq;

	#[test]
	fn new() {
		assert_eq!(Vector2::new(), Vector2 { x: 0.0, y: 0.0 });
	}

	#[test]
	fn from() {
		assert_eq!(Vector2::from(1.0, 2.0), Vector2 { x: 1.0, y: 2.0 });
	}

	#[test]
	fn from_scalar() {
		assert_eq!(Vector2::from_scalar(1.0), Vector2 { x: 1.0, y: 1.0 });
	}

	#[test]
	fn from_f64() {
		assert_eq!(Vector2::from_f64(250.5, 12.0), Vector2 { x: 250.5, y: 12.0 });
	}

	#[test]
	fn from_i32() {
		assert_eq!(Vector2::from_i32(500, -3), Vector2 { x: 500.0, y: -3.0 });
	}

	#[test]
	fn set() {
		let mut v = Vector2::new();
		v.set(1.0, 2.0);
		assert_eq!(v, Vector2 { x: 1.0, y: 2.0 });
	}

	#[test]
	fn add_vector() {
		let a = Vector2::from(1.0, -2.0);
		let b = Vector2::from(-3.0, 1.0);
		assert_eq!(a + b, Vector2 { x: -2.0, y: -1.0 });
	}

	#[test]
	fn sub_vector() {
		let a = Vector2::from(1.0, -2.0);
		let b = Vector2::from(-3.0, 1.0);
		assert_eq!(a - b, Vector2 { x: 4.0, y: -3.0 });
	}

	#[test]
	fn mul_vector() {
		let a = Vector2::from(1.0, -2.0);
		let b = Vector2::from(-3.0, 1.0);
		assert_eq!(a * b, Vector2 { x: -3.0, y: -2.0 });
	}

	#[test]
	fn div_vector() {
		let a = Vector2::from(-3.0, 4.0);
		let b = Vector2::from(1.0, -2.0);
		assert_eq!(a / b, Vector2 { x: -3.0, y: -2.0 });
	}

	#[test]
	fn add_scalar() {
		assert_eq!(Vector2::from(1.0, -2.0) + 0.5, Vector2 { x: 1.5, y: -1.5 });
	}

	#[test]
	fn sub_scalar() {
		assert_eq!(Vector2::from(1.0, -2.0) - 0.5, Vector2 { x: 0.5, y: -2.5 });
	}

	#[test]
	fn mul_scalar() {
		assert_eq!(Vector2::from(1.0, -2.0) * 2.0, Vector2 { x: 2.0, y: -4.0 });
	}

	#[test]
	fn approx_eq() {
		assert_approx_eq(&Vector2::from(1.0, 2.0), &Vector2::from(1.0001, 1.9999), 0.001);
		assert!(!Vector2::from(1.0, 2.0).approx_eq(&Vector2::from(1.1, 2.0), 0.001));
	}
}
