pub mod polygon;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Rigid placement (rotation + translation).
pub type Isometry3 = nalgebra::Isometry3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Tolerance used when sewing independently built faces into a shell.
/// Vertices closer than this are welded into one.
pub const SEWING_TOLERANCE: f64 = 1e-6;

/// Linear deflection used when triangulating a shape for display.
pub const LINEAR_DEFLECTION: f64 = 0.1;
