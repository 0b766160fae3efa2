use glam::{Mat4, Vec2, Vec3, Vec4};
use sevenfold_core::{DiamondIndex, DiamondTable};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction.
    pub dir: Vec3,
}

impl Ray {
    /// Ray through a pixel. `cursor` is in physical pixels from the top-left.
    /// Returns `None` for a degenerate viewport or projection.
    pub fn from_screen(cursor: Vec2, screen: Vec2, view_proj: Mat4) -> Option<Self> {
        if screen.x <= 0.0 || screen.y <= 0.0 {
            return None;
        }
        let ndc_x = cursor.x / screen.x * 2.0 - 1.0;
        let ndc_y = 1.0 - cursor.y / screen.y * 2.0;
        let inv = view_proj.inverse();

        // wgpu clip space: depth 0 = near, 1 = far
        let near = unproject(inv, Vec4::new(ndc_x, ndc_y, 0.0, 1.0))?;
        let far = unproject(inv, Vec4::new(ndc_x, ndc_y, 1.0, 1.0))?;
        let dir = (far - near).try_normalize()?;
        Some(Self { origin: near, dir })
    }
}

fn unproject(inv_view_proj: Mat4, clip: Vec4) -> Option<Vec3> {
    let world = inv_view_proj * clip;
    if world.w.abs() <= f32::EPSILON {
        return None;
    }
    Some(world.truncate() / world.w)
}

/// Distance along the ray to the first intersection with a sphere.
fn ray_sphere_t(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t_near = -b - sqrt_disc;
    let t_far = -b + sqrt_disc;
    if t_near >= 0.0 {
        Some(t_near)
    } else if t_far >= 0.0 {
        // origin inside the sphere
        Some(0.0)
    } else {
        None
    }
}

/// Bounding sphere of a diamond: the body spans from the flat top down to
/// the apex `size` below it, the rim has radius `size`.
fn bounding_sphere(table: &DiamondTable, index: DiamondIndex) -> (Vec3, f32) {
    let d = table.get(index);
    let center = d.position() - Vec3::Y * (d.size * 0.5);
    (center, d.size)
}

/// Nearest diamond hit by the ray. Equal distances resolve to the lower index.
pub fn pick_diamond(ray: &Ray, table: &DiamondTable) -> Option<DiamondIndex> {
    let mut best: Option<(f32, DiamondIndex)> = None;
    for (index, _) in table.iter() {
        let (center, radius) = bounding_sphere(table, index);
        let Some(t) = ray_sphere_t(ray, center, radius) else {
            continue;
        };
        best = match best {
            Some((bt, bi)) if bt <= t => Some((bt, bi)),
            _ => Some((t, index)),
        };
    }
    best.map(|(_, index)| index)
}
