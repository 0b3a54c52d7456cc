use super::vec::Vec3;

/// Column-major 4x4 matrix laid out the way WGSL expects it.
pub type Mat4 = [[f32; 4]; 4];

pub const MAT4_IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Column-major matrix multiply: c = a * b
pub fn mat4_mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut c = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            c[col][row] = a[0][row] * b[col][0]
                + a[1][row] * b[col][1]
                + a[2][row] * b[col][2]
                + a[3][row] * b[col][3];
        }
    }
    c
}

/// RH perspective, depth range [0, 1].
pub fn mat4_perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> Mat4 {
    let f = 1.0 / (0.5 * fov_y_rad).tan();
    let m00 = (f / aspect) as f32;
    let m11 = f as f32;
    let m22 = (far / (near - far)) as f32;
    let m23 = ((near * far) / (near - far)) as f32;

    [
        [m00, 0.0, 0.0, 0.0],
        [0.0, m11, 0.0, 0.0],
        [0.0, 0.0, m22, -1.0],
        [0.0, 0.0, m23, 0.0],
    ]
}

pub fn mat4_look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let f = (target - eye).normalize();
    let s = f.cross(up).normalize();
    let u = s.cross(f);

    let ex = -s.dot(eye);
    let ey = -u.dot(eye);
    let ez = f.dot(eye);

    [
        [s.x as f32, u.x as f32, (-f.x) as f32, 0.0],
        [s.y as f32, u.y as f32, (-f.y) as f32, 0.0],
        [s.z as f32, u.z as f32, (-f.z) as f32, 0.0],
        [ex as f32, ey as f32, ez as f32, 1.0],
    ]
}

pub fn mat4_rotation_x(rad: f64) -> Mat4 {
    let (s, c) = (rad.sin() as f32, rad.cos() as f32);
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, c, s, 0.0],
        [0.0, -s, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

pub fn mat4_rotation_y(rad: f64) -> Mat4 {
    let (s, c) = (rad.sin() as f32, rad.cos() as f32);
    [
        [c, 0.0, -s, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [s, 0.0, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

pub fn mat4_uniform_scale(s: f64) -> Mat4 {
    let s = s as f32;
    [
        [s, 0.0, 0.0, 0.0],
        [0.0, s, 0.0, 0.0],
        [0.0, 0.0, s, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Object transform applying scale, then X rotation, then Y rotation.
pub fn mat4_rotate_xy_scale(rot_x: f64, rot_y: f64, scale: f64) -> Mat4 {
    mat4_mul(
        mat4_rotation_y(rot_y),
        mat4_mul(mat4_rotation_x(rot_x), mat4_uniform_scale(scale)),
    )
}

pub fn mat4_transform_point(m: Mat4, p: [f32; 3]) -> [f32; 4] {
    let mut out = [0.0f32; 4];
    for (row, v) in out.iter_mut().enumerate() {
        *v = m[0][row] * p[0] + m[1][row] * p[1] + m[2][row] * p[2] + m[3][row];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn identity_is_neutral() {
        let r = mat4_rotation_x(0.7);
        assert_eq!(mat4_mul(MAT4_IDENTITY, r), r);
        assert_eq!(mat4_mul(r, MAT4_IDENTITY), r);
    }

    #[test]
    fn look_at_moves_eye_to_origin() {
        let view = mat4_look_at_rh(
            Vec3::new(0.0, 0.0, 30.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let p = mat4_transform_point(view, [0.0, 0.0, 0.0]);
        assert!(approx(p, [0.0, 0.0, -30.0, 1.0]));
    }

    #[test]
    fn rotation_y_quarter_turn() {
        let m = mat4_rotation_y(std::f64::consts::FRAC_PI_2);
        let p = mat4_transform_point(m, [1.0, 0.0, 0.0]);
        assert!(approx(p, [0.0, 0.0, -1.0, 1.0]));
    }

    #[test]
    fn perspective_maps_near_plane_to_zero_depth() {
        let proj = mat4_perspective_rh_z0(75f64.to_radians(), 1.5, 0.1, 1000.0);
        let p = mat4_transform_point(proj, [0.0, 0.0, -0.1]);
        assert!((p[2] / p[3]).abs() < 1e-4);
    }
}
