pub mod camera;
pub mod mesh;
pub mod renderer;
pub mod uniforms;

pub use camera::*;
pub use mesh::{GateMesh, GateVertex, ParticleVertex};
pub use renderer::*;
pub use uniforms::FrameUniforms;
