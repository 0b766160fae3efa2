use bytemuck::Zeroable;
use glam::{Mat4, Vec3};
use sevenfold_core::constants::DIAMOND_COUNT;
use sevenfold_core::DiamondTable;
use sevenfold_scene::animation::DiamondVisual;

/// Color of the diamond glow lights.
const GLOW_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// GPU point light data (32 bytes, matches WGSL PointLight).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuPointLight {
    pub position: [f32; 3],
    pub range: f32,
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Per-frame scene uniform (320 bytes, matches WGSL SceneUniforms).
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// Camera basis for billboarded particles; w unused.
    pub camera_right: [f32; 4],
    pub camera_up: [f32; 4],
    pub lights: [GpuPointLight; DIAMOND_COUNT],
}

impl SceneUniforms {
    pub fn new(view_proj: Mat4, camera_right: Vec3, camera_up: Vec3) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_right: camera_right.extend(0.0).to_array(),
            camera_up: camera_up.extend(0.0).to_array(),
            lights: [GpuPointLight::zeroed(); DIAMOND_COUNT],
        }
    }
}

/// One glow light per diamond; idle diamonds contribute zero intensity.
pub fn diamond_lights(
    table: &DiamondTable,
    visuals: &[DiamondVisual; DIAMOND_COUNT],
) -> [GpuPointLight; DIAMOND_COUNT] {
    let mut lights = [GpuPointLight::zeroed(); DIAMOND_COUNT];
    for (index, def) in table.iter() {
        let visual = &visuals[index.get()];
        lights[index.get()] = GpuPointLight {
            position: def.position().to_array(),
            range: visual.light_range,
            color: GLOW_COLOR,
            intensity: visual.light_intensity,
        };
    }
    lights
}

#[cfg(test)]
mod tests {
    use super::*;
    use sevenfold_core::{DiamondIndex, TrackSet};
    use sevenfold_scene::animation::DiamondAnimator;

    #[test]
    fn test_gpu_point_light_size() {
        assert_eq!(std::mem::size_of::<GpuPointLight>(), 32);
    }

    #[test]
    fn test_scene_uniforms_size() {
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 96 + 32 * DIAMOND_COUNT);
        assert_eq!(std::mem::size_of::<SceneUniforms>() % 16, 0);
    }

    #[test]
    fn test_only_spinning_diamonds_light() {
        let table = DiamondTable::builtin();
        let mut anim = DiamondAnimator::new();
        let nexus = DiamondIndex::new(3).expect("valid index");
        anim.update(1.0, [nexus].into_iter().collect::<TrackSet>());

        let lights = diamond_lights(&table, anim.visuals());
        assert_eq!(lights[3].intensity, 0.5);
        assert_eq!(lights[3].range, 50.0);
        assert_eq!(lights[3].position, [0.0, 150.0, 0.0]);
        assert!(lights
            .iter()
            .enumerate()
            .all(|(i, l)| i == 3 || l.intensity == 0.0));
    }
}
