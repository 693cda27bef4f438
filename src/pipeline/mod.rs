//! End-to-end conversion pipeline between polygon meshes and solids.
//!
//! The pipeline operations drive the kernel through a [`KernelSession`]:
//! [`SolidFromMesh`] sews a polygon mesh into a solid, [`TessellateShape`]
//! meshes a shape back into triangles, and [`execute_boolean`] runs a CSG
//! operation between two shapes. [`OpRegistry`] exposes the same pipeline
//! to named, hot-swappable custom operations.
//!
//! [`KernelSession`]: crate::kernel::KernelSession

pub mod build_solid;
pub mod dispatch;
pub mod registry;
pub mod tessellate;

pub use build_solid::SolidFromMesh;
pub use dispatch::{execute_boolean, BooleanKind};
pub use registry::{OpRegistry, RegisteredOp};
pub use tessellate::TessellateShape;
