//! Music-box vignette: notes stream out of the box, grow, drift right, and
//! fade away

use crate::cabinet::Cabinet;
use crate::camera::{Camera, Projected};
use crate::config::MusicBoxConfig;
use crate::palette::Palette;
use crate::pool::{Transient, TransientPool};
use crate::rand::ParticleRng;
use sakura_core::{DrawingSurface, Path, Result, Rgba, Vec2, Vec3, Viewport};
use sakura_runtime::{FrameInput, RuntimeSystem};

/// Notes spawn from the top of the spinning disk
pub const NOTE_ORIGIN: Vec3 = Vec3::new(0.0, 4.0, 0.0);
/// Life above which a note is still growing
const GROW_PHASE: f32 = 0.85;
const WIGGLE: f32 = 0.01;
/// Notes are drawn in a 64-unit sprite box
const SPRITE: f32 = 64.0;
const STEM_WIDTH: f32 = 3.0;
const BEAM_THICKNESS: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteGlyph {
    /// A single flagged note
    Eighth,
    /// Two notes joined by one beam
    BeamedPair,
    /// Two notes joined by two beams
    DoubleBeamedPair,
}

impl NoteGlyph {
    pub const ALL: [NoteGlyph; 3] = [
        NoteGlyph::Eighth,
        NoteGlyph::BeamedPair,
        NoteGlyph::DoubleBeamedPair,
    ];

    fn draw(self, surface: &mut dyn DrawingSurface, color: Rgba) {
        match self {
            NoteGlyph::Eighth => {
                note_head(surface, Vec2::new(26.0, 44.0), color);
                stem(surface, Vec2::new(32.5, 43.0), Vec2::new(32.5, 14.0), color);
                let mut flag = Path::new();
                flag.move_to(Vec2::new(32.5, 14.0)).bezier_curve_to(
                    Vec2::new(36.0, 20.0),
                    Vec2::new(44.0, 24.0),
                    Vec2::new(40.0, 34.0),
                );
                surface.stroke_path(&flag, color, STEM_WIDTH);
            }
            NoteGlyph::BeamedPair | NoteGlyph::DoubleBeamedPair => {
                note_head(surface, Vec2::new(18.0, 46.0), color);
                note_head(surface, Vec2::new(42.0, 42.0), color);
                stem(surface, Vec2::new(24.5, 45.0), Vec2::new(24.5, 16.0), color);
                stem(surface, Vec2::new(48.5, 41.0), Vec2::new(48.5, 12.0), color);
                beam(surface, 0.0, color);
                if self == NoteGlyph::DoubleBeamedPair {
                    beam(surface, 8.0, color);
                }
            }
        }
    }
}

fn note_head(surface: &mut dyn DrawingSurface, center: Vec2, color: Rgba) {
    surface.save();
    surface.translate(center.x, center.y);
    surface.rotate(-0.35);
    surface.scale(1.4, 1.0);
    surface.fill_circle(Vec2::ZERO, 5.0, color, None);
    surface.restore();
}

fn stem(surface: &mut dyn DrawingSurface, from: Vec2, to: Vec2, color: Rgba) {
    surface.stroke_path(&Path::line(from, to), color, STEM_WIDTH);
}

fn beam(surface: &mut dyn DrawingSurface, drop: f32, color: Rgba) {
    let mut path = Path::new();
    path.move_to(Vec2::new(24.5, 16.0 + drop))
        .line_to(Vec2::new(48.5 + STEM_WIDTH * 0.5, 12.0 + drop))
        .line_to(Vec2::new(48.5 + STEM_WIDTH * 0.5, 12.0 + drop + BEAM_THICKNESS))
        .line_to(Vec2::new(24.5, 16.0 + drop + BEAM_THICKNESS))
        .close();
    surface.fill_path(&path, color, None);
}

#[derive(Clone, Debug, PartialEq)]
pub struct Note {
    pub position: Vec3,
    pub velocity: Vec3,
    /// 1 at spawn, removed at 0
    pub life: f32,
    /// Size reached at the end of the growth phase
    pub target_scale: f32,
    pub scale: f32,
    pub opacity: f32,
    pub glyph: NoteGlyph,
    /// Accent colour at the moment the note was spawned
    pub color: Rgba,
}

impl Note {
    pub fn spawn(rng: &mut ParticleRng, color: Rgba) -> Self {
        Self {
            position: NOTE_ORIGIN,
            velocity: Vec3::new(
                rng.range(0.08, 0.13),
                rng.range(0.01, 0.03),
                (rng.next_f32() - 0.5) * 0.05,
            ),
            life: 1.0,
            target_scale: rng.range(1.2, 2.7),
            scale: 0.0,
            opacity: 1.0,
            glyph: NoteGlyph::ALL[rng.index(NoteGlyph::ALL.len())],
            color,
        }
    }

    pub fn update(&mut self, index: usize, time: f32, life_decay: f32) {
        self.position = self.position + self.velocity;
        self.life -= life_decay;

        if self.life > GROW_PHASE {
            self.scale = (1.0 - (self.life - GROW_PHASE) / (1.0 - GROW_PHASE)) * self.target_scale;
        } else {
            self.opacity = (self.life / GROW_PHASE).max(0.0);
        }

        let phase = time * 2.0 + index as f32;
        self.position.y += phase.sin() * WIGGLE;
        self.position.z += phase.cos() * WIGGLE;
    }

    pub fn draw(&self, surface: &mut dyn DrawingSurface, at: Projected) {
        let texel = self.scale * at.scale / SPRITE;
        if texel <= 0.0 {
            return;
        }
        surface.save();
        surface.set_global_alpha(self.opacity);
        surface.translate(at.point.x, at.point.y);
        surface.scale(texel, texel);
        surface.translate(-SPRITE * 0.5, -SPRITE * 0.5);
        self.glyph.draw(surface, self.color);
        surface.restore();
    }
}

impl Transient for Note {
    fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

pub struct MusicBoxSystem {
    config: MusicBoxConfig,
    rng: ParticleRng,
    camera: Camera,
    cabinet: Cabinet,
    notes: TransientPool<Note>,
    elapsed_ms: f64,
    last_note_ms: Option<f64>,
}

impl MusicBoxSystem {
    pub fn new(config: MusicBoxConfig, seed: u32) -> Self {
        let notes = TransientPool::new(config.max_notes);
        Self {
            config,
            rng: ParticleRng::new(seed),
            camera: Camera::look_at(Vec3::new(12.0, 10.0, 18.0), Vec3::new(0.0, 2.0, 0.0), 45.0),
            cabinet: Cabinet::new(Palette::default().accent),
            notes,
            elapsed_ms: 0.0,
            last_note_ms: None,
        }
    }

    pub fn notes(&self) -> &TransientPool<Note> {
        &self.notes
    }

    pub fn cabinet(&self) -> &Cabinet {
        &self.cabinet
    }

    /// One frame `delta_ms` after the previous one
    pub fn step(
        &mut self,
        surface: &mut dyn DrawingSurface,
        viewport: Viewport,
        accent: Rgba,
        time: f32,
        delta_ms: f64,
    ) {
        surface.clear_rect(viewport.bounds());
        self.cabinet.update(time, accent);
        self.cabinet.draw(surface, &self.camera, viewport);

        self.elapsed_ms += delta_ms.max(0.0);
        let due = self
            .last_note_ms
            .map_or(true, |last| self.elapsed_ms - last > self.config.note_interval_ms);
        if due {
            if !self.notes.push(Note::spawn(&mut self.rng, accent)) {
                log::debug!("[music_box] note pool full");
            }
            self.last_note_ms = Some(self.elapsed_ms);
        }

        for (i, note) in self.notes.iter_mut().enumerate() {
            note.update(i, time, self.config.life_decay);
        }
        self.notes.prune();

        let mut visible: Vec<(&Note, Projected)> = self
            .notes
            .iter()
            .filter_map(|n| self.camera.project(n.position, viewport).map(|p| (n, p)))
            .collect();
        visible.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));
        for (note, at) in visible {
            note.draw(surface, at);
        }
    }
}

impl RuntimeSystem for MusicBoxSystem {
    fn initialize(&mut self, _viewport: Viewport) -> Result<()> {
        self.notes.clear();
        self.cabinet = Cabinet::new(Palette::default().accent);
        self.elapsed_ms = 0.0;
        self.last_note_ms = None;
        log::info!(
            "[music_box] one note every {} ms",
            self.config.note_interval_ms
        );
        Ok(())
    }

    fn tick(&mut self, surface: &mut dyn DrawingSurface, frame: &FrameInput<'_>) {
        let accent = Palette::resolve(frame.style).accent;
        self.step(
            surface,
            frame.viewport,
            accent,
            frame.time as f32,
            frame.delta_ms,
        );
    }

    fn name(&self) -> &str {
        "music_box"
    }
}
