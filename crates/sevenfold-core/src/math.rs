use glam::Vec3;

/// Cubic ease-out: fast start, gentle landing. Input is clamped to [0, 1].
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Linear progress of an animation that began at `start_ms` and lasts
/// `duration_ms`, clamped to [0, 1]. A non-positive duration is complete.
pub fn progress(now_ms: f64, start_ms: f64, duration_ms: f64) -> f32 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    ((now_ms - start_ms) / duration_ms).clamp(0.0, 1.0) as f32
}

/// Convert spherical coordinates around the Y axis into an offset vector.
/// `polar` is measured from +Y, `azimuth` from +Z towards +X.
pub fn spherical_to_offset(radius: f32, polar: f32, azimuth: f32) -> Vec3 {
    let sin_polar = polar.sin();
    Vec3::new(
        radius * sin_polar * azimuth.sin(),
        radius * polar.cos(),
        radius * sin_polar * azimuth.cos(),
    )
}

/// Inverse of [`spherical_to_offset`]: returns (radius, polar, azimuth).
pub fn offset_to_spherical(offset: Vec3) -> (f32, f32, f32) {
    let radius = offset.length();
    if radius <= f32::EPSILON {
        return (0.0, 0.0, 0.0);
    }
    let polar = (offset.y / radius).clamp(-1.0, 1.0).acos();
    let azimuth = offset.x.atan2(offset.z);
    (radius, polar, azimuth)
}
