//! CPU-side geometry for the gate and the particle field.
//!
//! Everything here is generated once at init and uploaded as-is.

use foundation::math::Vec3;
use std::f64::consts::TAU;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GateVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleVertex {
    pub position: [f32; 3],
    pub _pad: f32,
}

/// Wireframe mesh: vertices plus a line list of index pairs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GateMesh {
    pub vertices: Vec<GateVertex>,
    pub line_indices: Vec<u32>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TorusKnot {
    pub radius: f64,
    pub tube: f64,
    pub tubular_segments: u32,
    pub radial_segments: u32,
    pub p: u32,
    pub q: u32,
}

impl Default for TorusKnot {
    fn default() -> Self {
        Self {
            radius: 10.0,
            tube: 3.0,
            tubular_segments: 100,
            radial_segments: 16,
            p: 2,
            q: 3,
        }
    }
}

impl TorusKnot {
    fn curve(&self, u: f64) -> Vec3 {
        let qu_over_p = self.q as f64 / self.p as f64 * u;
        let cs = qu_over_p.cos();
        Vec3::new(
            self.radius * (2.0 + cs) * 0.5 * u.cos(),
            self.radius * (2.0 + cs) * 0.5 * u.sin(),
            self.radius * qu_over_p.sin() * 0.5,
        )
    }

    /// Sweeps a circle of radius `tube` along the (p, q) knot curve and
    /// returns the triangulation's edges.
    pub fn build(&self) -> GateMesh {
        let tubular = self.tubular_segments.max(3);
        let radial = self.radial_segments.max(3);
        let p = self.p.max(1) as f64;

        let mut vertices = Vec::with_capacity(((tubular + 1) * (radial + 1)) as usize);
        for i in 0..=tubular {
            let u = i as f64 / tubular as f64 * p * TAU;
            let p1 = self.curve(u);
            let p2 = self.curve(u + 0.01);

            // Frenet-like frame from the curve tangent.
            let t = p2 - p1;
            let n = p2 + p1;
            let b = t.cross(n).normalize();
            let n = b.cross(t).normalize();

            for j in 0..=radial {
                let v = j as f64 / radial as f64 * TAU;
                let cx = -self.tube * v.cos();
                let cy = self.tube * v.sin();
                let pos = p1 + n.scale(cx) + b.scale(cy);
                let normal = (pos - p1).normalize();
                vertices.push(GateVertex {
                    position: [pos.x as f32, pos.y as f32, pos.z as f32],
                    normal: [normal.x as f32, normal.y as f32, normal.z as f32],
                });
            }
        }

        let stride = radial + 1;
        let mut line_indices = Vec::with_capacity((tubular * radial * 6) as usize);
        for j in 1..=tubular {
            for i in 1..=radial {
                let a = stride * (j - 1) + (i - 1);
                let b = stride * j + (i - 1);
                let d = stride * (j - 1) + i;
                line_indices.extend_from_slice(&[a, b, a, d, b, d]);
            }
        }

        GateMesh {
            vertices,
            line_indices,
        }
    }
}

/// Integer mix with no visible correlation between neighbouring inputs.
fn hash_u32(x_in: u32) -> u32 {
    let mut x = x_in;
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846ca68b);
    x ^= x >> 16;
    x
}

fn hash01(x: u32) -> f64 {
    hash_u32(x) as f64 / u32::MAX as f64
}

/// `count` points spread uniformly over a cube of edge `spread` centred on
/// the origin. The same seed always yields the same field.
pub fn particle_field(count: u32, spread: f64, seed: u32) -> Vec<ParticleVertex> {
    (0..count)
        .map(|i| {
            let k = i.wrapping_mul(3).wrapping_add(seed.wrapping_mul(0x9e3779b9));
            let x = (hash01(k ^ 0x68bc21eb) - 0.5) * spread;
            let y = (hash01(k.wrapping_add(1) ^ 0x02e5be93) - 0.5) * spread;
            let z = (hash01(k.wrapping_add(2) ^ 0x9e3779b9) - 0.5) * spread;
            ParticleVertex {
                position: [x as f32, y as f32, z as f32],
                _pad: 0.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{TorusKnot, particle_field};

    #[test]
    fn torus_knot_counts() {
        let mesh = TorusKnot::default().build();
        assert_eq!(mesh.vertices.len(), 101 * 17);
        assert_eq!(mesh.line_indices.len(), 100 * 16 * 6);
        let max = *mesh.line_indices.iter().max().unwrap() as usize;
        assert!(max < mesh.vertices.len());
    }

    #[test]
    fn torus_knot_is_bounded_with_unit_normals() {
        let knot = TorusKnot::default();
        let limit = (knot.radius * 1.5 + knot.tube) as f32 + 1e-3;
        for v in knot.build().vertices {
            let [x, y, z] = v.position;
            assert!((x * x + y * y + z * z).sqrt() <= limit);
            let [nx, ny, nz] = v.normal;
            assert!(((nx * nx + ny * ny + nz * nz).sqrt() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn particle_field_is_deterministic_and_bounded() {
        let a = particle_field(1000, 50.0, 7);
        assert_eq!(a, particle_field(1000, 50.0, 7));
        assert_ne!(a, particle_field(1000, 50.0, 8));
        assert_eq!(a.len(), 1000);
        for p in &a {
            assert!(p.position.iter().all(|c| c.abs() <= 25.0));
        }
    }
}
