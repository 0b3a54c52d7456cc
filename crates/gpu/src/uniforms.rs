use foundation::math::Mat4;

/// Per-frame shader inputs. Layout matches the `Frame` struct in the site's
/// WGSL shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub gate_mvp: Mat4,
    pub particles_mvp: Mat4,
    /// x: gate opacity, y: particle opacity, z: point size in pixels,
    /// w: elapsed seconds.
    pub params: [f32; 4],
}

impl FrameUniforms {
    pub fn gate_opacity(&self) -> f32 {
        self.params[0]
    }

    pub fn particle_opacity(&self) -> f32 {
        self.params[1]
    }
}

impl Default for FrameUniforms {
    fn default() -> Self {
        bytemuck::Zeroable::zeroed()
    }
}

#[cfg(test)]
mod tests {
    use super::FrameUniforms;

    #[test]
    fn layout_is_std140_friendly() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 144);
        assert_eq!(std::mem::size_of::<FrameUniforms>() % 16, 0);
    }
}
