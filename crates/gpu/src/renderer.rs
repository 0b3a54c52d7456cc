use crate::camera::{CameraState, Viewport};
use crate::mesh::{GateMesh, ParticleVertex, TorusKnot, particle_field};
use crate::uniforms::FrameUniforms;
use foundation::easing::{Ease, lerp};
use foundation::math::{Vec2, mat4_mul, mat4_rotate_xy_scale};
use runtime::frame::Frame;
use scene::choreographer::SceneRig;
use scene::snapshot::SceneVisual;

/// Construction parameters for [`SceneRenderer`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneConfig {
    pub knot: TorusKnot,
    pub particle_count: u32,
    pub particle_spread: f64,
    pub particle_seed: u32,
    pub particle_opacity: f64,
    pub point_size_px: f64,
    /// Passive gate rotation per frame, radians (x, y).
    pub spin_per_frame: Vec2,
    /// Maximum pointer-driven tilt, radians.
    pub parallax_strength: f64,
    /// Fraction of the remaining parallax distance covered each frame.
    pub parallax_smoothing: f64,
    pub intro_seconds: f64,
    pub intro_ease: Ease,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            knot: TorusKnot::default(),
            particle_count: 1000,
            particle_spread: 50.0,
            particle_seed: 1,
            particle_opacity: 0.5,
            point_size_px: 2.0,
            spin_per_frame: Vec2::new(0.003, 0.005),
            parallax_strength: 0.1,
            parallax_smoothing: 0.05,
            intro_seconds: 2.0,
            intro_ease: Ease::ELASTIC,
        }
    }
}

/// The persistent 3D background: a wireframe gate the camera flies through
/// and a particle field around it.
///
/// Camera depth and the gate's scale and opacity belong to the choreographer
/// (through [`SceneRig`]); everything else advances once per [`tick`].
///
/// [`tick`]: SceneRenderer::tick
#[derive(Debug, Clone, PartialEq)]
pub struct SceneRenderer {
    config: SceneConfig,
    viewport: Viewport,
    camera: CameraState,
    pose: SceneVisual,
    spin: Vec2,
    parallax: Vec2,
    pointer: Vec2,
    intro_elapsed_s: f64,
    elapsed_s: f64,
    gate: GateMesh,
    particles: Vec<ParticleVertex>,
    uniforms: FrameUniforms,
    disposed: bool,
}

impl SceneRenderer {
    /// Allocates all geometry and per-frame storage.
    pub fn init(viewport: Viewport, config: SceneConfig) -> Self {
        let gate = config.knot.build();
        let particles = particle_field(
            config.particle_count,
            config.particle_spread,
            config.particle_seed,
        );
        tracing::debug!(
            gate_vertices = gate.vertices.len(),
            particles = particles.len(),
            width = viewport.width(),
            height = viewport.height(),
            "scene renderer initialized"
        );
        let pose = SceneVisual::default();
        let mut renderer = Self {
            config,
            viewport,
            camera: CameraState {
                z: pose.camera_z,
                ..CameraState::default()
            },
            pose,
            spin: Vec2::ZERO,
            parallax: Vec2::ZERO,
            pointer: Vec2::ZERO,
            intro_elapsed_s: 0.0,
            elapsed_s: 0.0,
            gate,
            particles,
            uniforms: FrameUniforms::default(),
            disposed: false,
        };
        renderer.write_uniforms();
        renderer
    }

    /// Updates projection only; geometry is untouched.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
        self.write_uniforms();
    }

    /// Pointer in normalized device coordinates.
    pub fn set_pointer(&mut self, ndc: Vec2) {
        self.pointer = Vec2::new(ndc.x.clamp(-1.0, 1.0), ndc.y.clamp(-1.0, 1.0));
    }

    /// Advances passive motion by one frame and rebuilds the uniforms.
    /// Does not allocate.
    pub fn tick(&mut self, frame: &Frame) -> &FrameUniforms {
        if self.disposed {
            return &self.uniforms;
        }
        self.spin = self.spin + self.config.spin_per_frame;

        let target = Vec2::new(self.pointer.y, self.pointer.x).scale(self.config.parallax_strength);
        let k = self.config.parallax_smoothing;
        self.parallax = Vec2::new(
            lerp(self.parallax.x, target.x, k),
            lerp(self.parallax.y, target.y, k),
        );

        self.intro_elapsed_s += frame.dt_s.max(0.0);
        self.elapsed_s += frame.dt_s.max(0.0);
        self.write_uniforms();
        &self.uniforms
    }

    /// Releases geometry. The renderer stops advancing until a fresh
    /// [`SceneRenderer::init`] replaces it.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.gate = GateMesh::default();
        self.particles = Vec::new();
        self.disposed = true;
        tracing::debug!("scene renderer disposed");
    }

    fn intro_scale(&self) -> f64 {
        let d = self.config.intro_seconds;
        let t = if d <= 0.0 { 1.0 } else { self.intro_elapsed_s / d };
        self.config.intro_ease.apply(t)
    }

    fn write_uniforms(&mut self) {
        self.camera.z = self.pose.camera_z;
        let view_proj = self.camera.view_proj(self.viewport);

        let gate_model = mat4_rotate_xy_scale(
            self.spin.x + self.parallax.x,
            self.spin.y + self.parallax.y,
            self.intro_scale() * self.pose.gate_scale,
        );
        let particles_model = mat4_rotate_xy_scale(self.parallax.x, -self.parallax.y, 1.0);

        self.uniforms = FrameUniforms {
            gate_mvp: mat4_mul(view_proj, gate_model),
            particles_mvp: mat4_mul(view_proj, particles_model),
            params: [
                self.pose.gate_opacity.clamp(0.0, 1.0) as f32,
                self.config.particle_opacity as f32,
                self.config.point_size_px as f32,
                self.elapsed_s as f32,
            ],
        };
    }

    pub fn uniforms(&self) -> &FrameUniforms {
        &self.uniforms
    }

    pub fn gate_mesh(&self) -> &GateMesh {
        &self.gate
    }

    pub fn particles(&self) -> &[ParticleVertex] {
        &self.particles
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn camera(&self) -> CameraState {
        self.camera
    }

    pub fn parallax(&self) -> Vec2 {
        self.parallax
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl SceneRig for SceneRenderer {
    fn scene_pose(&self) -> SceneVisual {
        self.pose
    }

    fn set_scene_pose(&mut self, pose: &SceneVisual) {
        self.pose = *pose;
        self.write_uniforms();
    }
}
