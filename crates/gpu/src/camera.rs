use foundation::math::{Mat4, Vec2, Vec3, mat4_look_at_rh, mat4_mul, mat4_perspective_rh_z0};

/// Upper bound on the device pixel ratio the drawing buffer follows.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Drawable size in pixels. Never smaller than 1x1.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    /// Clamps zero, negative and non-finite sizes to 1.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: clamp_dim(width),
            height: clamp_dim(height),
        }
    }

    /// Drawing-buffer size for a CSS-pixel viewport on a screen with the
    /// given device pixel ratio, capped at [`MAX_PIXEL_RATIO`].
    pub fn backing(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> Self {
        let ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(MAX_PIXEL_RATIO)
        } else {
            1.0
        };
        Self::new((css_width * ratio).round(), (css_height * ratio).round())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Client pixel coordinates to normalized device coordinates, y up.
    pub fn pointer_ndc(&self, x_px: f64, y_px: f64) -> Vec2 {
        Vec2::new(
            (x_px / self.width as f64) * 2.0 - 1.0,
            -((y_px / self.height as f64) * 2.0 - 1.0),
        )
    }
}

fn clamp_dim(v: f64) -> u32 {
    if v.is_finite() && v >= 1.0 {
        v.min(u32::MAX as f64) as u32
    } else {
        1
    }
}

/// Camera looking down -Z from `z`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraState {
    pub z: f64,
    pub fov_y_rad: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            z: 30.0,
            fov_y_rad: 75f64.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraState {
    pub fn eye(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.z)
    }

    pub fn view_proj(&self, viewport: Viewport) -> Mat4 {
        let eye = self.eye();
        let target = eye - Vec3::new(0.0, 0.0, 1.0);
        let view = mat4_look_at_rh(eye, target, Vec3::new(0.0, 1.0, 0.0));
        let proj = mat4_perspective_rh_z0(self.fov_y_rad, viewport.aspect(), self.near, self.far);
        mat4_mul(proj, view)
    }
}

#[cfg(test)]
mod tests {
    use super::{CameraState, Viewport};
    use foundation::math::{Vec2, mat4_transform_point};

    #[test]
    fn degenerate_viewports_clamp() {
        let v = Viewport::new(0.0, -20.0);
        assert_eq!((v.width(), v.height()), (1, 1));
        assert_eq!(v.aspect(), 1.0);
        assert_eq!(Viewport::new(f64::NAN, 10.0).width(), 1);
    }

    #[test]
    fn backing_size_caps_pixel_ratio() {
        assert_eq!(Viewport::backing(1280.0, 720.0, 1.0), Viewport::new(1280.0, 720.0));
        assert_eq!(Viewport::backing(1280.0, 720.0, 1.5), Viewport::new(1920.0, 1080.0));
        assert_eq!(Viewport::backing(1280.0, 720.0, 3.0), Viewport::new(2560.0, 1440.0));
        assert_eq!(Viewport::backing(640.0, 480.0, f64::NAN), Viewport::new(640.0, 480.0));
        assert_eq!(Viewport::backing(0.0, 0.0, 2.0), Viewport::new(1.0, 1.0));
    }

    #[test]
    fn pointer_maps_to_ndc() {
        let v = Viewport::new(200.0, 100.0);
        assert_eq!(v.pointer_ndc(100.0, 50.0), Vec2::new(0.0, 0.0));
        assert_eq!(v.pointer_ndc(0.0, 0.0), Vec2::new(-1.0, 1.0));
        assert_eq!(v.pointer_ndc(200.0, 100.0), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let cam = CameraState::default();
        let clip = mat4_transform_point(cam.view_proj(Viewport::new(1280.0, 720.0)), [0.0, 0.0, 0.0]);
        assert!(clip[3] > 0.0);
        assert!((clip[0] / clip[3]).abs() < 1e-5);
        assert!((clip[1] / clip[3]).abs() < 1e-5);
        let depth = clip[2] / clip[3];
        assert!(depth > 0.0 && depth < 1.0);
    }
}
