//! The music box itself: a wooden body with its lid thrown open, a spinning
//! disk on top, and the dancing pair riding the disk

use crate::camera::Camera;
use crate::curves::lerp_color;
use sakura_core::{DrawingSurface, Path, Rgba, Vec2, Vec3, Viewport};
use std::f32::consts::{PI, TAU};

const WOOD: u32 = 0x5d4037;
const DISK: u32 = 0x333333;
const GROOVE: u32 = 0x5a5a5a;
const FIGURE: u32 = 0x3e2723;

const BODY_CENTER: Vec3 = Vec3::new(0.0, 1.5, 0.0);
const BODY_HALF: Vec3 = Vec3::new(3.5, 1.5, 2.5);
const LID_CENTER: Vec3 = Vec3::new(0.0, 3.2, -2.5);
const LID_HALF: Vec3 = Vec3::new(3.5, 0.25, 2.5);
/// Rotation of the open lid about the x axis
pub const LID_ANGLE: f32 = -PI / 2.5;

pub const DISK_RADIUS: f32 = 2.5;
const DISK_CENTER_Y: f32 = 3.1;
const DISK_HALF_HEIGHT: f32 = 0.1;
const DISK_SEGMENTS: usize = 32;
/// Disk rotation per tick, radians
pub const DISK_SPIN: f32 = 0.012;

/// The pair stands this far above the disk
const FIGURE_RISE: f32 = 2.8;
pub const BOB_AMPLITUDE: f32 = 0.08;
pub const TILT_AMPLITUDE: f32 = 0.05;

const LIGHT_POSITION: Vec3 = Vec3::new(5.0, 15.0, 10.0);
const LIGHT_INTENSITY: f32 = 1.5;
const LIGHT_RANGE: f32 = 50.0;
const AMBIENT: f32 = 0.7;
/// Fraction of the way the light moves toward the accent each tick
const LIGHT_EASE: f32 = 0.1;

/// Unit cube faces: outward normal and corners
const CUBE_FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
    ([1.0, 0.0, 0.0], [[1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0]]),
    ([-1.0, 0.0, 0.0], [[-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0]]),
    ([0.0, 1.0, 0.0], [[-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0]]),
    ([0.0, -1.0, 0.0], [[-1.0, -1.0, 1.0], [-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0]]),
    ([0.0, 0.0, 1.0], [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]]),
    ([0.0, 0.0, -1.0], [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]]),
];

fn rotate_x(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(v.x, v.y * c - v.z * s, v.y * s + v.z * c)
}

fn rotate_z(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(v.x * c - v.y * s, v.x * s + v.y * c, v.z)
}

/// Slow rocking of the whole box
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tilt {
    pub x: f32,
    pub z: f32,
}

impl Tilt {
    pub fn at(time: f32) -> Self {
        let phase = time * 0.3;
        Self {
            x: phase.sin() * TILT_AMPLITUDE,
            z: phase.cos() * TILT_AMPLITUDE,
        }
    }

    /// Box space to world space (z first, then x)
    pub fn apply(self, v: Vec3) -> Vec3 {
        rotate_x(rotate_z(v, self.z), self.x)
    }
}

/// One flat polygon of the box, already in world space
#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    pub corners: Vec<Vec3>,
    pub normal: Vec3,
    pub color: Rgba,
}

impl Face {
    pub fn centroid(&self) -> Vec3 {
        let sum = self.corners.iter().fold(Vec3::ZERO, |acc, &c| acc + c);
        sum * (1.0 / self.corners.len().max(1) as f32)
    }

    /// Whether the face points toward an eye at `eye`
    pub fn is_facing(&self, eye: Vec3) -> bool {
        self.normal.dot(&(eye - self.centroid())) > 0.0
    }
}

fn cuboid(
    faces: &mut Vec<Face>,
    half: Vec3,
    place: impl Fn(Vec3) -> Vec3,
    orient: impl Fn(Vec3) -> Vec3,
    color: Rgba,
) {
    for (normal, corners) in CUBE_FACES {
        faces.push(Face {
            corners: corners
                .iter()
                .map(|c| place(Vec3::new(c[0] * half.x, c[1] * half.y, c[2] * half.z)))
                .collect(),
            normal: orient(Vec3::new(normal[0], normal[1], normal[2])),
            color,
        });
    }
}

/// Ambient plus a Lambert term from the point light
fn shade(base: Rgba, light: Rgba, normal: Vec3, at: Vec3) -> Rgba {
    let to_light = LIGHT_POSITION - at;
    let falloff = (1.0 - to_light.length() / LIGHT_RANGE).max(0.0);
    let lambert = normal.dot(&to_light.normalized()).max(0.0) * LIGHT_INTENSITY * falloff;
    let channel = |b: f32, l: f32| (b * (AMBIENT + l * lambert)).min(1.0);
    Rgba::new(
        channel(base.r, light.r),
        channel(base.g, light.g),
        channel(base.b, light.b),
        1.0,
    )
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cabinet {
    /// Disk rotation about the vertical axis, wrapped to one turn
    pub disk_angle: f32,
    /// Vertical offset of the pair
    pub bob: f32,
    pub tilt: Tilt,
    /// Point light colour, easing toward the accent
    pub light: Rgba,
}

impl Cabinet {
    pub fn new(light: Rgba) -> Self {
        Self {
            disk_angle: 0.0,
            bob: 0.0,
            tilt: Tilt::default(),
            light,
        }
    }

    pub fn update(&mut self, time: f32, accent: Rgba) {
        self.disk_angle = (self.disk_angle + DISK_SPIN).rem_euclid(TAU);
        self.bob = (time * 1.5).sin() * BOB_AMPLITUDE;
        self.tilt = Tilt::at(time);
        self.light = lerp_color(self.light, accent, LIGHT_EASE);
    }

    /// Every face of the body, lid, and disk in world space
    pub fn faces(&self) -> Vec<Face> {
        let tilt = self.tilt;
        let wood = Rgba::from_hex(WOOD);
        let mut faces = Vec::with_capacity(2 * CUBE_FACES.len() + DISK_SEGMENTS + 1);

        cuboid(
            &mut faces,
            BODY_HALF,
            |v| tilt.apply(BODY_CENTER + v),
            |n| tilt.apply(n),
            wood,
        );
        cuboid(
            &mut faces,
            LID_HALF,
            |v| tilt.apply(LID_CENTER + rotate_x(v, LID_ANGLE)),
            |n| tilt.apply(rotate_x(n, LID_ANGLE)),
            wood,
        );

        let disk = Rgba::from_hex(DISK);
        let top = DISK_CENTER_Y + DISK_HALF_HEIGHT;
        let bottom = DISK_CENTER_Y - DISK_HALF_HEIGHT;
        let rim = |angle: f32, y: f32| {
            tilt.apply(Vec3::new(
                angle.cos() * DISK_RADIUS,
                y,
                angle.sin() * DISK_RADIUS,
            ))
        };
        let step = TAU / DISK_SEGMENTS as f32;
        for i in 0..DISK_SEGMENTS {
            let a0 = self.disk_angle + i as f32 * step;
            let a1 = a0 + step;
            let mid = a0 + step * 0.5;
            faces.push(Face {
                corners: vec![rim(a0, bottom), rim(a1, bottom), rim(a1, top), rim(a0, top)],
                normal: tilt.apply(Vec3::new(mid.cos(), 0.0, mid.sin())),
                color: disk,
            });
        }
        faces.push(Face {
            corners: (0..DISK_SEGMENTS)
                .map(|i| rim(self.disk_angle + i as f32 * step, top))
                .collect(),
            normal: tilt.apply(Vec3::UP),
            color: disk,
        });
        faces
    }

    /// Draw back to front: visible faces, the groove, then the pair
    pub fn draw(&self, surface: &mut dyn DrawingSurface, camera: &Camera, viewport: Viewport) {
        let mut visible: Vec<(f32, Path, Rgba)> = Vec::new();
        for face in self.faces() {
            if !face.is_facing(camera.position) {
                continue;
            }
            let centroid = face.centroid();
            let Some(center) = camera.project(centroid, viewport) else {
                continue;
            };
            let points: Option<Vec<Vec2>> = face
                .corners
                .iter()
                .map(|&c| camera.project(c, viewport).map(|p| p.point))
                .collect();
            let Some(points) = points else {
                continue;
            };

            let mut path = Path::new();
            path.move_to(points[0]);
            for &p in &points[1..] {
                path.line_to(p);
            }
            path.close();
            visible.push((
                center.depth,
                path,
                shade(face.color, self.light, face.normal, centroid),
            ));
        }
        visible.sort_by(|a, b| b.0.total_cmp(&a.0));
        for (_, path, color) in &visible {
            surface.fill_path(path, *color, None);
        }

        let top = DISK_CENTER_Y + DISK_HALF_HEIGHT;
        let hub = camera.project(self.tilt.apply(Vec3::new(0.0, top, 0.0)), viewport);
        let edge = camera.project(
            self.tilt.apply(Vec3::new(
                self.disk_angle.cos() * DISK_RADIUS * 0.9,
                top,
                self.disk_angle.sin() * DISK_RADIUS * 0.9,
            )),
            viewport,
        );
        if let (Some(hub), Some(edge)) = (hub, edge) {
            surface.stroke_path(&Path::line(hub.point, edge.point), Rgba::from_hex(GROOVE), 1.5);
        }

        self.draw_pair(surface, camera, viewport);
    }

    fn draw_pair(&self, surface: &mut dyn DrawingSurface, camera: &Camera, viewport: Viewport) {
        let anchor = self
            .tilt
            .apply(Vec3::new(0.0, DISK_CENTER_Y + FIGURE_RISE + self.bob, 0.0));
        let Some(at) = camera.project(anchor, viewport) else {
            return;
        };
        let color = lerp_color(Rgba::from_hex(FIGURE), self.light, 0.15);
        let unit = at.scale;

        surface.save();
        surface.translate(at.point.x, at.point.y);
        surface.scale(unit, unit);
        // Left figure in a suit, right figure in a flared dress
        figure(surface, -0.65, 0.55, color);
        figure(surface, 0.65, 0.95, color);
        // Joined hands
        surface.stroke_path(
            &Path::line(Vec2::new(-0.3, -0.4), Vec2::new(0.3, -0.4)),
            color,
            0.18,
        );
        surface.restore();
    }
}

/// A standing silhouette centred at `x`, feet at +2.2, head near -1.7
fn figure(surface: &mut dyn DrawingSurface, x: f32, hem: f32, color: Rgba) {
    surface.fill_circle(Vec2::new(x, -1.7), 0.45, color, None);
    let mut body = Path::new();
    body.move_to(Vec2::new(x - 0.45, -1.15))
        .line_to(Vec2::new(x + 0.45, -1.15))
        .line_to(Vec2::new(x + hem, 2.2))
        .line_to(Vec2::new(x - hem, 2.2))
        .close();
    surface.fill_path(&body, color, None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use sakura_core::RecordingSurface;

    fn camera() -> Camera {
        Camera::look_at(Vec3::new(12.0, 10.0, 18.0), Vec3::new(0.0, 2.0, 0.0), 45.0)
    }

    #[test]
    fn disk_turns_each_tick() {
        let mut cabinet = Cabinet::new(Rgba::WHITE);
        cabinet.update(0.0, Rgba::WHITE);
        assert!((cabinet.disk_angle - DISK_SPIN).abs() < 1e-6);
        for _ in 0..9 {
            cabinet.update(0.0, Rgba::WHITE);
        }
        assert!((cabinet.disk_angle - 10.0 * DISK_SPIN).abs() < 1e-5);

        cabinet.disk_angle = TAU - DISK_SPIN * 0.5;
        cabinet.update(0.0, Rgba::WHITE);
        assert!(cabinet.disk_angle < DISK_SPIN);
    }

    #[test]
    fn bob_and_tilt_follow_time() {
        let mut cabinet = Cabinet::new(Rgba::WHITE);
        cabinet.update(0.0, Rgba::WHITE);
        assert_eq!(cabinet.bob, 0.0);
        assert_eq!(cabinet.tilt.x, 0.0);
        assert!((cabinet.tilt.z - TILT_AMPLITUDE).abs() < 1e-6);

        let t = 2.5;
        cabinet.update(t, Rgba::WHITE);
        assert!((cabinet.bob - (1.5 * t).sin() * 0.08).abs() < 1e-6);
        assert!((cabinet.tilt.x - (0.3 * t).sin() * 0.05).abs() < 1e-6);
        assert!((cabinet.tilt.z - (0.3 * t).cos() * 0.05).abs() < 1e-6);
    }

    #[test]
    fn light_eases_a_tenth_toward_accent() {
        let mut cabinet = Cabinet::new(Rgba::BLACK);
        cabinet.update(0.0, Rgba::new(1.0, 0.5, 0.0, 1.0));
        assert!((cabinet.light.r - 0.1).abs() < 1e-6);
        assert!((cabinet.light.g - 0.05).abs() < 1e-6);
    }

    #[test]
    fn geometry_has_body_lid_and_disk() {
        let cabinet = Cabinet::new(Rgba::WHITE);
        let faces = cabinet.faces();
        assert_eq!(faces.len(), 6 + 6 + DISK_SEGMENTS + 1);

        // Body spans 7 x 3 x 5 resting on the ground
        let body = &faces[..6];
        let xs = body.iter().flat_map(|f| f.corners.iter().map(|c| c.x));
        let max_x = xs.fold(f32::MIN, f32::max);
        assert!((max_x - 3.5).abs() < 1e-5);
        let top = body.iter().find(|f| f.normal.y > 0.99).unwrap();
        assert!(top.corners.iter().all(|c| (c.y - 3.0).abs() < 1e-5));

        // The open lid leans back, so its top normal points toward -z
        let lid_top = &faces[8];
        assert!(lid_top.normal.z < -0.9);

        // Disk rim sits at radius 2.5
        let disk_top = faces.last().unwrap();
        assert!(disk_top
            .corners
            .iter()
            .all(|c| ((c.x * c.x + c.z * c.z).sqrt() - DISK_RADIUS).abs() < 1e-4));
    }

    #[test]
    fn back_faces_are_culled() {
        let cabinet = Cabinet::new(Rgba::WHITE);
        let eye = camera().position;
        let faces = cabinet.faces();
        let bottom = faces[..6].iter().find(|f| f.normal.y < -0.99).unwrap();
        let top = faces[..6].iter().find(|f| f.normal.y > 0.99).unwrap();
        assert!(!bottom.is_facing(eye));
        assert!(top.is_facing(eye));
    }

    #[test]
    fn draw_is_balanced_and_fills_faces() {
        let mut cabinet = Cabinet::new(Rgba::WHITE);
        cabinet.update(1.0, Rgba::WHITE);
        let mut surface = RecordingSurface::new();
        cabinet.draw(&mut surface, &camera(), Viewport::new(800.0, 600.0));
        assert_eq!(surface.depth(), 0);
        assert_eq!(surface.unbalanced_restores(), 0);
        assert!(surface.fill_count() > 6);
        assert!(surface.fill_count() < cabinet.faces().len() + 4);
        assert!(surface.stroke_count() >= 2);
    }
}
