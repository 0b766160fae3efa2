use glam::{Quat, Vec3};
use std::f32::consts::{FRAC_1_SQRT_2, TAU};

/// Mesh vertex (24 bytes, matches VertexInput in toon.wgsl).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// CPU-side indexed triangle list.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append another mesh, rebasing its indices.
    pub fn extend(&mut self, other: MeshData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }
}

/// Triangles of the half diamond: an 8-triangle cone from the apex to the
/// rim, then a 6-triangle fan closing the flat top.
pub const HALF_DIAMOND_INDICES: [u32; 42] = [
    0, 2, 1, 0, 3, 2, 0, 4, 3, 0, 5, 4, //
    0, 6, 5, 0, 7, 6, 0, 8, 7, 0, 1, 8, //
    1, 2, 3, 1, 3, 4, 1, 4, 5, 1, 5, 6, //
    1, 6, 7, 1, 7, 8,
];

/// Apex `size` below the origin plus an octagonal rim of radius `size` at y = 0.
pub fn half_diamond_points(size: f32) -> [Vec3; 9] {
    let d = size * FRAC_1_SQRT_2;
    [
        Vec3::new(0.0, -size, 0.0),
        Vec3::new(size, 0.0, 0.0),
        Vec3::new(d, 0.0, d),
        Vec3::new(0.0, 0.0, size),
        Vec3::new(-d, 0.0, d),
        Vec3::new(-size, 0.0, 0.0),
        Vec3::new(-d, 0.0, -d),
        Vec3::new(0.0, 0.0, -size),
        Vec3::new(d, 0.0, -d),
    ]
}

/// Flat-shaded half diamond: every triangle gets its own three vertices
/// carrying the outward face normal. The mesh is drawn double-sided, so
/// winding is not relied on.
pub fn half_diamond(size: f32) -> MeshData {
    let points = half_diamond_points(size);
    let centroid = points.iter().copied().sum::<Vec3>() / points.len() as f32;
    let mut mesh = MeshData::default();
    for tri in HALF_DIAMOND_INDICES.chunks_exact(3) {
        let [a, b, c] = [
            points[tri[0] as usize],
            points[tri[1] as usize],
            points[tri[2] as usize],
        ];
        let mut normal = (b - a).cross(c - a).normalize_or_zero();
        let face_center = (a + b + c) / 3.0;
        if normal.dot(face_center - centroid) < 0.0 {
            normal = -normal;
        }
        let base = mesh.vertices.len() as u32;
        for p in [a, b, c] {
            mesh.vertices.push(Vertex::new(p, normal));
        }
        mesh.indices.extend([base, base + 1, base + 2]);
    }
    mesh
}

/// Torus lying in the XZ plane at height `y`, swept over `arc` radians
/// starting at `start` (measured about +Y).
pub fn torus_arc(
    radius: f32,
    tube: f32,
    y: f32,
    start: f32,
    arc: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> MeshData {
    let mut mesh = MeshData::default();
    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * TAU;
        for i in 0..=tubular_segments {
            let u = start + i as f32 / tubular_segments as f32 * arc;
            let center = Vec3::new(radius * u.cos(), y, radius * u.sin());
            let position = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                y + tube * v.sin(),
                (radius + tube * v.cos()) * u.sin(),
            );
            mesh.vertices
                .push(Vertex::new(position, (position - center).normalize_or_zero()));
        }
    }

    let row = tubular_segments + 1;
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            mesh.indices.extend([a, b, d, b, c, d]);
        }
    }
    mesh
}

/// Flat ring facing +Y.
pub fn annulus(inner: f32, outer: f32, y: f32, segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let dir = Vec3::new(theta.cos(), 0.0, theta.sin());
        mesh.vertices
            .push(Vertex::new(dir * inner + Vec3::Y * y, Vec3::Y));
        mesh.vertices
            .push(Vertex::new(dir * outer + Vec3::Y * y, Vec3::Y));
    }
    for i in 0..segments {
        let k = i * 2;
        mesh.indices.extend([k, k + 2, k + 1, k + 1, k + 2, k + 3]);
    }
    mesh
}

/// The white belt and ring decorations of a diamond, in its local frame.
pub fn diamond_patterns(size: f32) -> MeshData {
    const CENTER_SEGMENTS: u32 = 8;
    const GAP_RATIO: f32 = 0.3;
    let belt = size * 0.08;
    let top_y = 0.01;

    let mut mesh = torus_arc(size * 0.625, belt, -size * 0.25, 0.0, TAU, 16, 64);
    mesh.extend(torus_arc(size * 0.28, belt, -size * 0.6, 0.0, TAU, 16, 64));

    let step = TAU / CENTER_SEGMENTS as f32;
    for i in 0..CENTER_SEGMENTS {
        mesh.extend(torus_arc(
            size * 0.5,
            belt,
            top_y,
            i as f32 * step,
            step * (1.0 - GAP_RATIO),
            16,
            16,
        ));
    }

    let edge = size * 0.9;
    let width = belt * 1.5;
    mesh.extend(annulus(edge - width * 0.5, edge + width * 0.5, top_y, 32));
    mesh
}

/// Ground disc facing +Y.
pub fn ground_disc(radius: f32, segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    mesh.vertices.push(Vertex::new(Vec3::ZERO, Vec3::Y));
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let p = Vec3::new(theta.cos(), 0.0, theta.sin()) * radius;
        mesh.vertices.push(Vertex::new(p, Vec3::Y));
    }
    for i in 1..=segments {
        mesh.indices.extend([0, i + 1, i]);
    }
    mesh
}

/// Particle offsets of a diamond's aura: a shell between radius 8 and 14.
/// Deterministic so every diamond and every run looks the same.
pub fn aura_offsets(count: usize, seed: u32) -> Vec<Vec3> {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        (state >> 8) as f32 / (1u32 << 24) as f32
    };
    (0..count)
        .map(|_| {
            let radius = 8.0 + next() * 6.0;
            let theta = next() * TAU;
            let phi = (2.0 * next() - 1.0).clamp(-1.0, 1.0).acos();
            Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            )
        })
        .collect()
}

/// Rotation of an aura cloud given its (x, y) Euler angles, applied in
/// XYZ order: the y turn acts first, then x.
pub fn aura_rotation(angles: [f32; 2]) -> Quat {
    Quat::from_rotation_x(angles[0]) * Quat::from_rotation_y(angles[1])
}
