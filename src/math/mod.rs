//! Mathematical utilities for tile blending

/// Blend window construction and ramp profiles
pub mod window;
