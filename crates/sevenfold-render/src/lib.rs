pub mod instances;
pub mod lighting;
pub mod mesh;
pub mod renderer;

pub use lighting::{GpuPointLight, SceneUniforms};
pub use renderer::{RenderStats, Renderer};
