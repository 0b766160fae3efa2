use crate::mesh;
use glam::{Mat4, Quat, Vec3};
use sevenfold_core::constants::DIAMOND_COUNT;
use sevenfold_core::DiamondTable;
use sevenfold_scene::animation::DiamondVisual;

/// Particles in one diamond's aura cloud.
pub const AURA_PARTICLES: usize = 150;
pub const MAX_PARTICLES: usize = AURA_PARTICLES * DIAMOND_COUNT;

/// Ground sits just below the terrain origin.
const GROUND_Y: f32 = -1.0;
const GROUND_LIT: [f32; 3] = [0.92, 0.92, 0.92];
const GROUND_UNLIT: [f32; 3] = [0.5, 0.5, 0.5];
const BLACK: [f32; 3] = [0.0, 0.0, 0.0];
const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

/// Per-instance data of the toon pipeline (96 bytes, matches InstanceInput in toon.wgsl).
/// A fragment takes `lit` where N·L passes the toon threshold and `unlit`
/// otherwise, then multiplies by `glow`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub lit: [f32; 3],
    pub glow: f32,
    pub unlit: [f32; 3],
    /// 1.0 if diamond glow lights brighten this surface. Only the diamond
    /// bodies sit within reach of a glow light.
    pub receives_light: f32,
}

impl InstanceRaw {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    fn flat(model: Mat4, color: [f32; 3], glow: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            lit: color,
            glow,
            unlit: color,
            receives_light: 0.0,
        }
    }
}

/// Aura particle (16 bytes, matches ParticleInput in aura.wgsl).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleRaw {
    pub center: [f32; 3],
    pub opacity: f32,
}

impl ParticleRaw {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleRaw>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Instance buffer layout: ground, then the seven bodies, then the seven
/// pattern sets.
pub const GROUND_INSTANCE: u32 = 0;
pub const BODY_INSTANCES: std::ops::Range<u32> = 1..1 + DIAMOND_COUNT as u32;
pub const PATTERN_INSTANCES: std::ops::Range<u32> =
    1 + DIAMOND_COUNT as u32..1 + 2 * DIAMOND_COUNT as u32;
pub const INSTANCE_COUNT: usize = 1 + 2 * DIAMOND_COUNT;

/// Model matrix of a unit-size diamond mesh placed and spun in the world.
pub fn diamond_model(position: Vec3, size: f32, rotation_y: f32) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        Vec3::splat(size),
        Quat::from_rotation_y(rotation_y),
        position,
    )
}

/// Fill the toon instance list for this frame.
pub fn build_instances(
    table: &DiamondTable,
    visuals: &[DiamondVisual; DIAMOND_COUNT],
    out: &mut Vec<InstanceRaw>,
) {
    out.clear();
    out.push(InstanceRaw {
        model: Mat4::from_translation(Vec3::Y * GROUND_Y).to_cols_array_2d(),
        lit: GROUND_LIT,
        glow: 1.0,
        unlit: GROUND_UNLIT,
        receives_light: 0.0,
    });
    for (index, def) in table.iter() {
        let v = &visuals[index.get()];
        out.push(InstanceRaw {
            receives_light: 1.0,
            ..InstanceRaw::flat(
                diamond_model(def.position(), def.size, v.rotation_y),
                BLACK,
                1.0,
            )
        });
    }
    for (index, def) in table.iter() {
        let v = &visuals[index.get()];
        out.push(InstanceRaw::flat(
            diamond_model(def.position(), def.size, v.rotation_y),
            WHITE,
            v.glow,
        ));
    }
}

/// Fill the aura particle list for this frame. Only visible auras emit
/// particles. `offsets` is the shared particle cloud in local space.
pub fn build_particles(
    table: &DiamondTable,
    visuals: &[DiamondVisual; DIAMOND_COUNT],
    offsets: &[Vec3],
    out: &mut Vec<ParticleRaw>,
) {
    out.clear();
    for (index, def) in table.iter() {
        let v = &visuals[index.get()];
        if !v.aura_visible {
            continue;
        }
        // The cloud rides on the spinning diamond and turns on its own axes.
        let rotation = Quat::from_rotation_y(v.rotation_y) * mesh::aura_rotation(v.aura_rotation);
        let origin = def.position();
        for offset in offsets.iter().take(AURA_PARTICLES) {
            out.push(ParticleRaw {
                center: (origin + rotation * *offset).to_array(),
                opacity: v.aura_opacity,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sevenfold_core::{DiamondIndex, TrackSet};
    use sevenfold_scene::animation::DiamondAnimator;

    fn spinning(indices: &[usize]) -> TrackSet {
        indices
            .iter()
            .map(|&i| DiamondIndex::new(i).expect("valid index"))
            .collect()
    }

    #[test]
    fn test_layout_sizes() {
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 96);
        assert_eq!(std::mem::size_of::<ParticleRaw>(), 16);
        assert_eq!(std::mem::size_of::<crate::mesh::Vertex>(), 24);
    }

    #[test]
    fn test_instance_ranges_cover_buffer() {
        assert_eq!(GROUND_INSTANCE, 0);
        assert_eq!(BODY_INSTANCES.start, 1);
        assert_eq!(BODY_INSTANCES.end, PATTERN_INSTANCES.start);
        assert_eq!(PATTERN_INSTANCES.end as usize, INSTANCE_COUNT);
    }

    #[test]
    fn test_instances_follow_visuals() {
        let table = DiamondTable::builtin();
        let mut anim = DiamondAnimator::new();
        anim.update(std::f32::consts::FRAC_PI_4, spinning(&[2]));

        let mut out = Vec::new();
        build_instances(&table, anim.visuals(), &mut out);
        assert_eq!(out.len(), INSTANCE_COUNT);

        let ground = &out[GROUND_INSTANCE as usize];
        assert_eq!(ground.lit, GROUND_LIT);
        assert_eq!(ground.unlit, GROUND_UNLIT);

        let body = &out[BODY_INSTANCES.start as usize + 2];
        assert_eq!(body.lit, BLACK);
        assert_eq!(body.glow, 1.0);

        let pattern = &out[PATTERN_INSTANCES.start as usize + 2];
        assert!((pattern.glow - 1.8).abs() < 1e-5);
        let idle = &out[PATTERN_INSTANCES.start as usize];
        assert_eq!(idle.glow, 1.0);

        // translation column carries the diamond position
        let def = table.get(DiamondIndex::new(2).expect("valid index"));
        assert_eq!(&pattern.model[3][..3], &def.position().to_array()[..]);
    }

    /// Falloff term of the toon shader's point-light loop.
    fn light_reach(light: &crate::lighting::GpuPointLight, point: Vec3) -> f32 {
        if light.intensity <= 0.0 {
            return 0.0;
        }
        let d = Vec3::from(light.position).distance(point);
        let falloff = (1.0 - d / light.range).clamp(0.0, 1.0);
        light.intensity * falloff * falloff
    }

    #[test]
    fn test_glow_light_reaches_own_body() {
        let table = DiamondTable::builtin();
        let mut anim = DiamondAnimator::new();
        anim.update(1.0, spinning(&[0, 3]));
        let lights = crate::lighting::diamond_lights(&table, anim.visuals());

        let mut out = Vec::new();
        build_instances(&table, anim.visuals(), &mut out);
        assert_eq!(out[GROUND_INSTANCE as usize].receives_light, 0.0);

        for (index, _) in table.iter() {
            let body = &out[BODY_INSTANCES.start as usize + index.get()];
            assert_eq!(body.receives_light, 1.0);
            let model = Mat4::from_cols_array_2d(&body.model);
            let light = &lights[index.get()];
            for p in crate::mesh::half_diamond_points(1.0) {
                let reach = light_reach(light, model.transform_point3(p));
                if index.get() == 0 || index.get() == 3 {
                    assert!(reach > 0.1, "diamond {index}: reach {reach}");
                } else {
                    assert_eq!(reach, 0.0, "idle diamond {index} lit");
                }
            }
        }
    }

    #[test]
    fn test_particles_only_for_spinning() {
        let table = DiamondTable::builtin();
        let offsets = crate::mesh::aura_offsets(AURA_PARTICLES, 11);
        let mut anim = DiamondAnimator::new();
        let mut out = Vec::new();

        anim.update(0.5, TrackSet::EMPTY);
        build_particles(&table, anim.visuals(), &offsets, &mut out);
        assert!(out.is_empty());

        anim.update(0.5, spinning(&[0, 6]));
        build_particles(&table, anim.visuals(), &offsets, &mut out);
        assert_eq!(out.len(), 2 * AURA_PARTICLES);

        let drift = table.get(DiamondIndex::new(0).expect("valid index")).position();
        for p in &out[..AURA_PARTICLES] {
            let r = (Vec3::from(p.center) - drift).length();
            assert!((8.0 - 1e-2..=14.0 + 1e-2).contains(&r));
        }
    }
}
