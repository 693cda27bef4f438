pub mod error;
pub mod geometry;
pub mod kernel;
pub mod math;
pub mod mesh;
pub mod pipeline;
pub mod topology;

pub use error::{Result, SolidcastError};
pub use kernel::{Capability, KernelRegistry, KernelSession};
pub use mesh::{Mesh, RenderMesh};
pub use pipeline::{execute_boolean, BooleanKind, OpRegistry, SolidFromMesh, TessellateShape};
pub use topology::Shape;
