//! Startup options. Every field has a default and can be overridden through
//! `SKETCH_*` environment variables.

use std::{env, str::FromStr};
use tracing::warn;

pub const WIDTH_VAR: &str = "SKETCH_WIDTH";
pub const HEIGHT_VAR: &str = "SKETCH_HEIGHT";
pub const TITLE_VAR: &str = "SKETCH_TITLE";
pub const VALIDATION_VAR: &str = "SKETCH_VALIDATION";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
	pub window_width: u32,
	pub window_height: u32,
	pub window_title: String,
	pub clear_color: [f32; 4],
	pub validation: bool
}

impl Default for Config {
	fn default() -> Self {
		Self {
			window_width: 500,
			window_height: 500,
			window_title: String::from("Triangle Sketch"),
			clear_color: [0.2, 0.2, 0.2, 1.0],
			validation: cfg!(debug_assertions)
		}
	}
}

impl Config {
	pub fn from_env() -> Self {
		Self::from_lookup(|key| env::var(key).ok())
	}

	pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
		let mut config = Self::default();

		if let Some(width) = parse_var(&lookup, WIDTH_VAR).filter(|&w: &u32| w > 0) {
			config.window_width = width;
		}

		if let Some(height) = parse_var(&lookup, HEIGHT_VAR).filter(|&h: &u32| h > 0) {
			config.window_height = height;
		}

		if let Some(title) = lookup(TITLE_VAR) {
			config.window_title = title;
		}

		if let Some(validation) = lookup(VALIDATION_VAR) {
			match parse_flag(&validation) {
				Some(flag) => config.validation = flag,
				None => warn!(key = VALIDATION_VAR, value = %validation, "Ignoring unrecognized flag")
			}
		}

		config
	}
}

fn parse_var<F: Fn(&str) -> Option<String>, T: FromStr>(lookup: &F, key: &str) -> Option<T> {
	let value = lookup(key)?;

	match value.trim().parse() {
		Ok(parsed) => Some(parsed),
		Err(_) => {
			warn!(key, value = %value, "Ignoring unparsable value");
			None
		}
	}
}

fn parse_flag(value: &str) -> Option<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "on" | "yes" => Some(true),
		"0" | "false" | "off" | "no" => Some(false),
		_ => None
	}
}
