//! Sky lanterns: glowing paper lanterns rising through a 3D volume, tinted
//! with the theme accent

use crate::camera::{Camera, Projected};
use crate::config::LanternConfig;
use crate::curves::{lerp_color, lerp_f32};
use crate::palette::Palette;
use crate::pool::FixedPool;
use crate::rand::ParticleRng;
use sakura_core::{DrawingSurface, Glow, Path, Result, Rgba, Vec2, Vec3, Viewport};
use sakura_runtime::{FrameInput, RuntimeSystem};
use std::f32::consts::{FRAC_PI_4, TAU};

/// Lanterns above this height restart below the view
pub const LANTERN_CEILING: f32 = 35.0;
const TOP_RADIUS: f32 = 0.8;
const BOTTOM_RADIUS: f32 = 0.6;
const HALF_HEIGHT: f32 = 0.7;
/// The light sits near the bottom of the body
const LIGHT_OFFSET: f32 = 0.55;
const CORE_RADIUS: f32 = 0.3;
const GLOW_RADIUS: f32 = 0.8;
const BODY_BANDS: usize = 4;
const BODY_ALPHA: f32 = 0.9;

#[derive(Clone, Debug, PartialEq)]
pub struct Lantern {
    pub position: Vec3,
    pub speed_y: f32,
    pub swing: f32,
    pub swing_offset: f32,
    /// Spin about the vertical axis
    pub rotation: f32,
    pub rotation_speed: f32,
    pub color: Rgba,
    pub glow_opacity: f32,
    pub core_opacity: f32,
}

impl Lantern {
    /// `initial` lanterns are scattered through the whole column so the first
    /// frame has no visible spawn wave.
    pub fn spawn(rng: &mut ParticleRng, range_x: f32, initial: bool, accent: Rgba) -> Self {
        let x = (rng.next_f32() - 0.5) * range_x;
        let y = if initial {
            (rng.next_f32() - 0.5) * 60.0
        } else {
            -LANTERN_CEILING - rng.next_f32() * 10.0
        };
        let z = (rng.next_f32() - 0.5) * 20.0;
        Self {
            position: Vec3::new(x, y, z),
            speed_y: rng.range(0.008, 0.023),
            swing: rng.range(0.0, 0.01),
            swing_offset: rng.range(0.0, TAU),
            rotation: 0.0,
            rotation_speed: (rng.next_f32() - 0.5) * 0.003,
            color: accent,
            glow_opacity: 0.4,
            core_opacity: 0.9,
        }
    }

    /// Advance one tick. `index` de-synchronizes the flicker between lanterns.
    pub fn update(
        &mut self,
        index: usize,
        time: f32,
        accent: Rgba,
        rng: &mut ParticleRng,
        range_x: f32,
    ) {
        let phase = index as f32;
        self.position.y += self.speed_y;
        self.position.x += (time + self.swing_offset).sin() * self.swing;
        self.rotation += self.rotation_speed;

        let flicker = 0.95 + (time * 10.0 + phase).sin() * 0.05;
        self.color = lerp_color(self.color, accent, 0.1);
        self.glow_opacity = (0.3 + (time * 8.0 + phase).sin() * 0.1) * flicker;
        self.core_opacity = (0.8 + (time * 12.0 + phase).sin() * 0.1) * flicker;

        if self.position.y > LANTERN_CEILING {
            self.position.y = -LANTERN_CEILING - rng.next_f32() * 15.0;
            self.position.x = (rng.next_f32() - 0.5) * range_x;
        }
    }

    /// Apparent width of the eight-sided body relative to its radius
    pub fn silhouette(&self) -> f32 {
        let phase = self.rotation.rem_euclid(FRAC_PI_4);
        phase.min(FRAC_PI_4 - phase).cos()
    }

    pub fn draw(&self, surface: &mut dyn DrawingSurface, at: Projected) {
        let center = at.point;
        let width = self.silhouette() * at.scale;
        let bottom_y = center.y + HALF_HEIGHT * at.scale;
        let height = 2.0 * HALF_HEIGHT * at.scale;

        // Brightest at the bottom, fading toward the top
        for band in 0..BODY_BANDS {
            let v0 = band as f32 / BODY_BANDS as f32;
            let v1 = (band + 1) as f32 / BODY_BANDS as f32;
            let intensity = lerp_f32(1.0, 0.2, (v0 + v1) * 0.5);
            let shade = 0.6 + intensity * 0.4;
            let fill = Rgba::new(
                self.color.r * shade,
                self.color.g * shade,
                self.color.b * shade,
                BODY_ALPHA,
            );

            let r0 = lerp_f32(BOTTOM_RADIUS, TOP_RADIUS, v0) * width;
            let r1 = lerp_f32(BOTTOM_RADIUS, TOP_RADIUS, v1) * width;
            let y0 = bottom_y - v0 * height;
            let y1 = bottom_y - v1 * height;
            let mut quad = Path::new();
            quad.move_to(Vec2::new(center.x - r0, y0))
                .line_to(Vec2::new(center.x + r0, y0))
                .line_to(Vec2::new(center.x + r1, y1))
                .line_to(Vec2::new(center.x - r1, y1))
                .close();
            surface.fill_path(&quad, fill, None);
        }

        let light = Vec2::new(center.x, center.y + LIGHT_OFFSET * at.scale);
        let glow_color = self.color.with_alpha(self.glow_opacity);
        surface.fill_circle(
            light,
            GLOW_RADIUS * at.scale,
            glow_color,
            Some(Glow::new(GLOW_RADIUS * at.scale, glow_color)),
        );
        surface.fill_circle(
            light,
            CORE_RADIUS * at.scale,
            Rgba::WHITE.with_alpha(self.core_opacity),
            None,
        );
    }
}

pub struct LanternSystem {
    config: LanternConfig,
    rng: ParticleRng,
    camera: Camera,
    lanterns: FixedPool<Lantern>,
}

impl LanternSystem {
    pub fn new(config: LanternConfig, seed: u32) -> Self {
        Self {
            config,
            rng: ParticleRng::new(seed),
            camera: Camera::look_at(Vec3::new(0.0, 0.0, 30.0), Vec3::ZERO, 45.0),
            lanterns: FixedPool::default(),
        }
    }

    fn is_compact(&self, viewport: Viewport) -> bool {
        viewport.width < self.config.compact_width
    }

    /// Horizontal spread of the column in world units
    pub fn range_x(&self, viewport: Viewport) -> f32 {
        if self.is_compact(viewport) {
            20.0
        } else {
            50.0
        }
    }

    pub fn lanterns(&self) -> &FixedPool<Lantern> {
        &self.lanterns
    }

    /// Fill the pool for `viewport` with lanterns in the given accent colour
    pub fn populate(&mut self, viewport: Viewport, accent: Rgba) {
        let count = if self.is_compact(viewport) {
            self.config.compact_count
        } else {
            self.config.count
        };
        let range_x = self.range_x(viewport);
        let rng = &mut self.rng;
        self.lanterns = FixedPool::from_fn(count, || Lantern::spawn(rng, range_x, true, accent));
    }

    pub fn step(
        &mut self,
        surface: &mut dyn DrawingSurface,
        viewport: Viewport,
        accent: Rgba,
        time: f32,
    ) {
        surface.clear_rect(viewport.bounds());

        let range_x = self.range_x(viewport);
        for (i, lantern) in self.lanterns.iter_mut().enumerate() {
            lantern.update(i, time, accent, &mut self.rng, range_x);
        }

        // Far lanterns first so near ones cover them
        let mut visible: Vec<(usize, Projected)> = self
            .lanterns
            .iter()
            .enumerate()
            .filter_map(|(i, l)| self.camera.project(l.position, viewport).map(|p| (i, p)))
            .collect();
        visible.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));

        let lanterns = self.lanterns.as_slice();
        for (i, at) in visible {
            lanterns[i].draw(surface, at);
        }
    }
}

impl RuntimeSystem for LanternSystem {
    fn initialize(&mut self, viewport: Viewport) -> Result<()> {
        self.populate(viewport, Palette::default().accent);
        log::info!("[lanterns] {} lanterns", self.lanterns.len());
        Ok(())
    }

    fn tick(&mut self, surface: &mut dyn DrawingSurface, frame: &FrameInput<'_>) {
        let accent = Palette::resolve(frame.style).accent;
        self.step(surface, frame.viewport, accent, frame.time as f32);
    }

    fn name(&self) -> &str {
        "lanterns"
    }
}
