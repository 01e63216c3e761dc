//! Math utilities and types
//!
//! Provides the math types used by the camera and the frame renderer. All
//! matrices follow OpenGL conventions: column vectors, right-handed view
//! space and clip-space depth in [-1, 1].

pub use nalgebra::{Matrix3, Matrix4, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Map `k` in `[0, n]` onto `[-1, 1]`
    pub fn normalize_index(k: u32, n: u32) -> f32 {
        (k as f32 / n as f32) * 2.0 - 1.0
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a translation matrix
    fn translation(offset: Vec3) -> Mat4;

    /// Create an OpenGL perspective projection matrix
    ///
    /// `fov_y` is in radians and `aspect` is width / height.
    fn perspective_gl(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Column-major element array, the layout `glUniformMatrix4fv` expects
    /// with `transpose = false`
    fn to_column_array(&self) -> [f32; 16];
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn translation(offset: Vec3) -> Mat4 {
        Mat4::new_translation(&offset)
    }

    fn perspective_gl(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        // nalgebra's perspective already maps view depth onto [-1, 1]
        Mat4::new_perspective(aspect, fov_y, near, far)
    }

    fn to_column_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        out.copy_from_slice(self.as_slice());
        out
    }
}

/// Extension trait for Mat3
pub trait Mat3Ext {
    /// Column-major element array
    fn to_column_array(&self) -> [f32; 9];
}

impl Mat3Ext for Mat3 {
    fn to_column_array(&self) -> [f32; 9] {
        let mut out = [0.0; 9];
        out.copy_from_slice(self.as_slice());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_index_spans_unit_range() {
        assert_relative_eq!(utils::normalize_index(0, 4), -1.0);
        assert_relative_eq!(utils::normalize_index(2, 4), 0.0);
        assert_relative_eq!(utils::normalize_index(4, 4), 1.0);
    }

    #[test]
    fn test_column_array_layout() {
        let m = Mat4::translation(Vec3::new(1.0, 2.0, 3.0));
        let cols = m.to_column_array();

        // Translation lives in the last column for column-major storage
        assert_eq!(&cols[12..15], &[1.0, 2.0, 3.0]);
        assert_relative_eq!(cols[15], 1.0);
    }

    #[test]
    fn test_column_arrays_are_column_major() {
        #[rustfmt::skip]
        let m3 = Mat3::new(
            1.0, 2.0, 3.0,
            4.0, 5.0, 6.0,
            7.0, 8.0, 9.0,
        );
        assert_eq!(m3.to_column_array(), [1.0, 4.0, 7.0, 2.0, 5.0, 8.0, 3.0, 6.0, 9.0]);

        #[rustfmt::skip]
        let m4 = Mat4::new(
            1.0, 2.0, 3.0, 4.0,
            5.0, 6.0, 7.0, 8.0,
            9.0, 10.0, 11.0, 12.0,
            13.0, 14.0, 15.0, 16.0,
        );
        assert_eq!(
            m4.to_column_array(),
            [1.0, 5.0, 9.0, 13.0, 2.0, 6.0, 10.0, 14.0, 3.0, 7.0, 11.0, 15.0, 4.0, 8.0, 12.0, 16.0]
        );
    }

    #[test]
    fn test_perspective_maps_near_and_far_to_clip_bounds() {
        let p = Mat4::perspective_gl(utils::deg_to_rad(45.0), 4.0 / 3.0, 1.0, 100.0);

        let near = p * Vec4::new(0.0, 0.0, -1.0, 1.0);
        let far = p * Vec4::new(0.0, 0.0, -100.0, 1.0);

        assert_relative_eq!(near.z / near.w, -1.0, epsilon = 1e-5);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_rotations_are_right_handed() {
        let rotated = Mat4::rotation_y(constants::PI * 0.5).transform_vector(&Vec3::x());
        assert_relative_eq!(rotated, -Vec3::z(), epsilon = 1e-6);

        let rotated = Mat4::rotation_x(constants::PI * 0.5).transform_vector(&Vec3::y());
        assert_relative_eq!(rotated, Vec3::z(), epsilon = 1e-6);
    }
}
