use glam::{Mat4, Vec3};
use sevenfold_core::constants::{DIAMOND_COUNT, GROUND_RADIUS, LIGHT_DIRECTION, TOON_THRESHOLD};
use sevenfold_core::DiamondTable;
use sevenfold_scene::animation::DiamondVisual;
use wgpu::util::DeviceExt;

use crate::instances::{
    self, InstanceRaw, ParticleRaw, AURA_PARTICLES, BODY_INSTANCES, GROUND_INSTANCE,
    INSTANCE_COUNT, MAX_PARTICLES, PATTERN_INSTANCES,
};
use crate::lighting::{self, SceneUniforms};
use crate::mesh::{self, MeshData, Vertex};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// World-space edge length of an aura particle.
const PARTICLE_SIZE: f32 = 1.5;
const GROUND_SEGMENTS: u32 = 96;
const AURA_SEED: u32 = 0x5EED_0007;

/// Constants shared with WGSL, injected ahead of every shader module.
pub fn shader_preamble() -> String {
    let [lx, ly, lz] = LIGHT_DIRECTION;
    format!(
        "const DIAMOND_COUNT: u32 = {DIAMOND_COUNT}u;\n\
         const LIGHT_DIRECTION: vec3<f32> = vec3<f32>({lx:?}, {ly:?}, {lz:?});\n\
         const TOON_THRESHOLD: f32 = {TOON_THRESHOLD:?};\n\
         const PARTICLE_SIZE: f32 = {PARTICLE_SIZE:?};\n",
    )
}

/// Vertex and index buffers of one static mesh.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, label: &str, data: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }
}

/// Counters for the debug panel.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderStats {
    pub triangles: u32,
    pub particles: u32,
}

/// Single public struct owning all rendering GPU resources.
/// Buffers are created at init time; per-frame work only writes into them.
pub struct Renderer {
    toon_pipeline: wgpu::RenderPipeline,
    aura_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    ground: GpuMesh,
    body: GpuMesh,
    patterns: GpuMesh,
    instance_buffer: wgpu::Buffer,
    particle_buffer: wgpu::Buffer,
    particle_count: u32,
    aura_offsets: Vec<Vec3>,
    // Scratch lists reused every frame
    instances: Vec<InstanceRaw>,
    particles: Vec<ParticleRaw>,
}

impl Renderer {
    /// Build all GPU resources at init time.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        // -- Shader source composition --
        let preamble = shader_preamble();
        let scene_wgsl = include_str!("../../../shaders/common/scene.wgsl");
        let toon_wgsl = include_str!("../../../shaders/render/toon.wgsl");
        let aura_wgsl = include_str!("../../../shaders/render/aura.wgsl");

        let toon_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("toon-shader"),
            source: wgpu::ShaderSource::Wgsl(format!("{preamble}\n{scene_wgsl}\n{toon_wgsl}").into()),
        });
        let aura_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("aura-shader"),
            source: wgpu::ShaderSource::Wgsl(format!("{preamble}\n{scene_wgsl}\n{aura_wgsl}").into()),
        });

        // -- Uniforms --
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene-uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene-uniform-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene-uniform-bg"),
            layout: &uniform_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene-pipeline-layout"),
            bind_group_layouts: &[&uniform_bgl],
            push_constant_ranges: &[],
        });

        // -- Toon pipeline: opaque, depth-writing, double-sided --
        let toon_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("toon-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &toon_module,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout(), InstanceRaw::layout()],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &toon_module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        });

        // -- Aura pipeline: additive, depth-tested but not depth-writing --
        let additive = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        };
        let aura_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("aura-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &aura_module,
                entry_point: Some("vs_particle"),
                buffers: &[ParticleRaw::layout()],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &aura_module,
                entry_point: Some("fs_particle"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState {
                        color: additive,
                        alpha: additive,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        });

        // -- Static meshes (diamond meshes are unit size, scaled per instance) --
        let ground = GpuMesh::upload(device, "ground", &mesh::ground_disc(GROUND_RADIUS, GROUND_SEGMENTS));
        let body = GpuMesh::upload(device, "diamond-body", &mesh::half_diamond(1.0));
        let patterns = GpuMesh::upload(device, "diamond-patterns", &mesh::diamond_patterns(1.0));

        // -- Per-frame buffers --
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("toon-instances"),
            size: (INSTANCE_COUNT * std::mem::size_of::<InstanceRaw>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let particle_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("aura-particles"),
            size: (MAX_PARTICLES * std::mem::size_of::<ParticleRaw>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_view = Self::create_depth_view(device, width, height);

        log::info!(
            "renderer ready: {} ground + {} body + {} pattern indices",
            ground.index_count,
            body.index_count,
            patterns.index_count
        );

        Self {
            toon_pipeline,
            aura_pipeline,
            uniform_buffer,
            uniform_bind_group,
            depth_view,
            ground,
            body,
            patterns,
            instance_buffer,
            particle_buffer,
            particle_count: 0,
            aura_offsets: mesh::aura_offsets(AURA_PARTICLES, AURA_SEED),
            instances: Vec::with_capacity(INSTANCE_COUNT),
            particles: Vec::with_capacity(MAX_PARTICLES),
        }
    }

    /// Recreate the depth texture on canvas resize.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_view = Self::create_depth_view(device, width, height);
    }

    /// Upload camera, lights, instances, and particles for this frame.
    pub fn prepare(
        &mut self,
        queue: &wgpu::Queue,
        view_proj: Mat4,
        camera_right: Vec3,
        camera_up: Vec3,
        table: &DiamondTable,
        visuals: &[DiamondVisual; DIAMOND_COUNT],
    ) {
        let mut uniforms = SceneUniforms::new(view_proj, camera_right, camera_up);
        uniforms.lights = lighting::diamond_lights(table, visuals);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        instances::build_instances(table, visuals, &mut self.instances);
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&self.instances));

        instances::build_particles(table, visuals, &self.aura_offsets, &mut self.particles);
        let count = self.particles.len().min(MAX_PARTICLES);
        self.particle_count = count as u32;
        if count > 0 {
            queue.write_buffer(
                &self.particle_buffer,
                0,
                bytemuck::cast_slice(&self.particles[..count]),
            );
        }
    }

    /// Encode the scene pass: toon meshes, then additive auras.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, surface_view: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.toon_pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        let ground = GROUND_INSTANCE..GROUND_INSTANCE + 1;
        for (gpu_mesh, range) in [
            (&self.ground, ground),
            (&self.body, BODY_INSTANCES),
            (&self.patterns, PATTERN_INSTANCES),
        ] {
            pass.set_vertex_buffer(0, gpu_mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(gpu_mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..gpu_mesh.index_count, 0, range);
        }

        if self.particle_count > 0 {
            pass.set_pipeline(&self.aura_pipeline);
            pass.set_vertex_buffer(0, self.particle_buffer.slice(..));
            pass.draw(0..6, 0..self.particle_count);
        }
    }

    pub fn stats(&self) -> RenderStats {
        let diamonds = DIAMOND_COUNT as u32;
        RenderStats {
            triangles: self.ground.index_count / 3
                + (self.body.index_count / 3) * diamonds
                + (self.patterns.index_count / 3) * diamonds
                + self.particle_count * 2,
            particles: self.particle_count,
        }
    }

    fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preamble_constants() {
        let p = shader_preamble();
        assert!(p.contains("const DIAMOND_COUNT: u32 = 7u;"));
        assert!(p.contains("vec3<f32>(5.0, 10.0, 5.0)"));
        assert!(p.contains("const TOON_THRESHOLD: f32 = 0.5;"));
        assert!(p.contains("const PARTICLE_SIZE: f32 = 1.5;"));
    }

    #[test]
    fn test_shaders_reference_preamble() {
        let toon = include_str!("../../../shaders/render/toon.wgsl");
        let scene = include_str!("../../../shaders/common/scene.wgsl");
        assert!(toon.contains("TOON_THRESHOLD"));
        assert!(scene.contains("array<PointLight, DIAMOND_COUNT>"));
        // constants come only from the preamble
        assert!(!toon.contains("const TOON_THRESHOLD"));
    }
}
