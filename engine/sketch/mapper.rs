use crate::math::{Vector2, Vector3};

/// Maps a window-space pixel position to normalized device coordinates.
///
/// Pixel space grows rightwards and downwards from the top-left corner while
/// normalized device space grows rightwards and upwards from the center, so the
/// y axis is flipped. The window size must be non-zero on both axes.
pub fn pixel_to_normalized(pixel: Vector2, window_size: Vector2) -> Vector3 {
	let normalized = (pixel / window_size - 0.5) * Vector2::from(2.0, -2.0);
	Vector3::from(normalized.x, normalized.y, 0.0)
}

/// Inverse of [`pixel_to_normalized`]. The z component is ignored.
pub fn normalized_to_pixel(coordinate: Vector3, window_size: Vector2) -> Vector2 {
	let scaled = Vector2::from(coordinate.x, coordinate.y) / Vector2::from(2.0, -2.0);
	(scaled + 0.5) * window_size
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::math::assert_approx_eq;
	use test_case::test_case;

	const TOL: f32 = 1e-5;

	#[test_case(500.0, 500.0 ; "square window")]
	#[test_case(800.0, 600.0 ; "landscape window")]
	#[test_case(333.0, 1001.0 ; "odd sized window")]
	fn center_maps_to_origin(width: f32, height: f32) {
		let size = Vector2::from(width, height);
		let center = pixel_to_normalized(size * 0.5, size);
		assert_approx_eq(&center, &Vector3::new(), TOL);
	}

	#[test]
	fn top_left_maps_to_upper_left_corner() {
		let size = Vector2::from(500.0, 500.0);
		assert_approx_eq(&pixel_to_normalized(Vector2::new(), size), &Vector3::from(-1.0, 1.0, 0.0), TOL);
	}

	#[test]
	fn bottom_right_maps_to_lower_right_corner() {
		let size = Vector2::from(640.0, 480.0);
		assert_approx_eq(&pixel_to_normalized(size, size), &Vector3::from(1.0, -1.0, 0.0), TOL);
	}

	#[test]
	fn y_axis_points_up() {
		let size = Vector2::from(500.0, 500.0);
		let upper = pixel_to_normalized(Vector2::from(250.0, 100.0), size);
		let lower = pixel_to_normalized(Vector2::from(250.0, 400.0), size);
		assert!(upper.y > lower.y);
		assert_approx_eq(&upper, &Vector3::from(0.0, 0.6, 0.0), TOL);
	}

	#[test]
	fn z_is_always_zero() {
		let size = Vector2::from(123.0, 77.0);
		assert_eq!(pixel_to_normalized(Vector2::from(17.0, 3.5), size).z, 0.0);
	}

	#[test]
	fn deterministic() {
		let size = Vector2::from(500.0, 300.0);
		let pixel = Vector2::from(41.25, 270.0);
		assert_eq!(pixel_to_normalized(pixel, size), pixel_to_normalized(pixel, size));
	}

	#[test_case(0.0, 0.0, 500.0, 500.0)]
	#[test_case(250.0, 250.0, 500.0, 500.0)]
	#[test_case(17.5, 480.25, 500.0, 500.0)]
	#[test_case(799.0, 1.0, 800.0, 600.0)]
	#[test_case(1024.0, 768.0, 1024.0, 768.0)]
	#[test_case(3.0, 9.0, 7.0, 11.0)]
	fn round_trip(x: f32, y: f32, width: f32, height: f32) {
		let size = Vector2::from(width, height);
		let pixel = Vector2::from(x, y);
		let back = normalized_to_pixel(pixel_to_normalized(pixel, size), size);
		assert_approx_eq(&back, &pixel, 1e-3);
	}

	#[test]
	fn outside_window_maps_outside_unit_square() {
		let size = Vector2::from(500.0, 500.0);
		let coordinate = pixel_to_normalized(Vector2::from(-250.0, 750.0), size);
		assert_approx_eq(&coordinate, &Vector3::from(-2.0, -2.0, 0.0), TOL);
	}
}
