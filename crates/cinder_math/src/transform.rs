// Transform builders for the rasterizer.
//
// glam stores Mat4 column-major. Everything here is written and read as
// rows (m[row][col]) so the matrices match the usual textbook layout, and
// vectors are multiplied as homogeneous columns: `m * v`.

use glam::{Mat4, Vec3};

/// Default vertical field of view, in degrees.
pub const DEFAULT_FOV_DEGREES: f32 = 45.0;
/// Default near clipping distance.
pub const DEFAULT_NEAR: f32 = 0.1;
/// Default far clipping distance.
pub const DEFAULT_FAR: f32 = 1000.0;

/// Extension trait for Mat4 to address entries in row-major order.
pub trait Mat4Ext {
    /// Build a matrix from rows, `rows[r][c]` being row r, column c.
    fn from_rows(rows: [[f32; 4]; 4]) -> Self;

    /// The entries as rows.
    fn to_rows(&self) -> [[f32; 4]; 4];

    /// Single entry at (row, col).
    fn entry(&self, row: usize, col: usize) -> f32;
}

impl Mat4Ext for Mat4 {
    fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Mat4::from_cols_array_2d(&rows).transpose()
    }

    fn to_rows(&self) -> [[f32; 4]; 4] {
        self.transpose().to_cols_array_2d()
    }

    fn entry(&self, row: usize, col: usize) -> f32 {
        self.col(col)[row]
    }
}

/// Identity with the translation column set to `translation`.
pub fn translate(translation: Vec3) -> Mat4 {
    Mat4::from_rows([
        [1.0, 0.0, 0.0, translation.x],
        [0.0, 1.0, 0.0, translation.y],
        [0.0, 0.0, 1.0, translation.z],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Right-handed view matrix looking from `eye` towards `target`.
///
/// The camera basis is `{right, true_up, direction}` where `direction`
/// points from the target back to the eye, so the camera looks down its
/// local -Z. `eye` must differ from `target` and `up` must not be parallel
/// to the view direction.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let direction = (eye - target).normalize();
    let right = up.cross(direction).normalize();
    let true_up = direction.cross(right);

    let change_of_basis = Mat4::from_rows([
        [right.x, right.y, right.z, 0.0],
        [true_up.x, true_up.y, true_up.z, 0.0],
        [direction.x, direction.y, direction.z, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    change_of_basis * translate(-eye)
}

/// Symmetric perspective projection.
///
/// Maps the view frustum to clip space; the bottom row copies `-z` into `w`
/// so the perspective divide happens on `clip / clip.w`. After the divide,
/// points nearer the camera have smaller depth.
pub fn perspective_projection(
    vertical_fov_degrees: f32,
    near: f32,
    far: f32,
    aspect_ratio: f32,
) -> Mat4 {
    let top = near * (vertical_fov_degrees.to_radians() / 2.0).tan();
    let right = top * aspect_ratio;

    Mat4::from_rows([
        [near / right, 0.0, 0.0, 0.0],
        [0.0, near / top, 0.0, 0.0],
        [0.0, 0.0, (near - far) / (far - near), -2.0 * far * near / (far - near)],
        [0.0, 0.0, -1.0, 0.0],
    ])
}
