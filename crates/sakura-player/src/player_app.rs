//! Player application implementing winit ApplicationHandler
//!
//! Runs the active scene once per redraw (or at a fixed rate), feeds pointer
//! movement into it, and presents the software canvas through wgpu.

use crate::overlay;
use crate::site::SiteConfig;
use anyhow::Context;
use sakura_audio::MusicPlayer;
use sakura_core::{Vec2, Viewport};
use sakura_particles::rand::time_seed;
use sakura_particles::{ButterflyBurst, Palette, SceneKind};
use sakura_render::{Canvas, PresentPipeline, RenderContext};
use sakura_runtime::{
    CursorGlow, FrameClock, FrameInput, InputState, PreferenceStore, Preferences, RuntimeSystem,
};
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, TouchPhase, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

/// Launch settings that do not come from the site file
#[derive(Clone, Debug, Default)]
pub struct PlayerOptions {
    pub scene: SceneKind,
    /// Simulation ticks per second; `None` ticks once per redraw
    pub fixed_hz: Option<f64>,
    pub fullscreen: bool,
    /// RNG seed for every scene built; `None` seeds from the clock
    pub seed: Option<u32>,
}

pub struct PlayerApp {
    // Configuration
    site: SiteConfig,
    options: PlayerOptions,
    store: PreferenceStore,
    prefs: Preferences,

    // Systems
    clock: FrameClock,
    input: InputState,
    scene: SceneKind,
    system: Box<dyn RuntimeSystem>,
    scene_started: f64,
    music: MusicPlayer,
    cursor: CursorGlow,
    butterflies: ButterflyBurst,

    // Rendering
    viewport: Viewport,
    scale_factor: f64,
    canvas: Canvas,
    window: Option<Arc<Window>>,
    render_context: Option<RenderContext>,
    present: Option<PresentPipeline>,
    title: String,

    error: Option<anyhow::Error>,
}

impl PlayerApp {
    pub fn new(site: SiteConfig, store: PreferenceStore, options: PlayerOptions) -> Self {
        let prefs = Preferences::from_store(&store);

        let mut music = MusicPlayer::new(prefs.muted);
        if let Some(path) = &site.music {
            if let Err(e) = music.load(path) {
                log::warn!("[player] {e}");
            }
        }

        let clock = match options.fixed_hz {
            Some(hz) => FrameClock::with_fixed_rate(hz),
            None => FrameClock::new(),
        };
        let viewport = Viewport::default();
        let system = options
            .scene
            .build(&site.scenes, options.seed.unwrap_or_else(time_seed));
        let butterflies = ButterflyBurst::new(options.seed.unwrap_or_else(time_seed));

        Self {
            scene: options.scene,
            site,
            options,
            store,
            prefs,
            clock,
            input: InputState::new(),
            system,
            scene_started: 0.0,
            music,
            cursor: CursorGlow::new(viewport),
            butterflies,
            viewport,
            scale_factor: 1.0,
            canvas: Canvas::for_viewport(viewport, 1.0),
            window: None,
            render_context: None,
            present: None,
            title: String::new(),
            error: None,
        }
    }

    /// The error that stopped the event loop, if any
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title("Sakura")
            .with_inner_size(LogicalSize::new(1280.0, 720.0));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create window")?,
        );

        if self.options.fullscreen {
            window.set_fullscreen(Some(winit::window::Fullscreen::Borderless(None)));
        }

        let render_context = pollster::block_on(RenderContext::new(window.clone()))
            .context("Failed to initialize rendering")?;
        self.present = Some(PresentPipeline::new(
            &render_context.device,
            render_context.format(),
        ));
        self.render_context = Some(render_context);

        self.scale_factor = window.scale_factor();
        self.resize_canvas(window.inner_size());
        self.cursor = CursorGlow::new(self.viewport);
        self.window = Some(window);

        self.system
            .initialize(self.viewport)
            .with_context(|| format!("Failed to start scene '{}'", self.scene))?;
        Ok(())
    }

    /// Track a new physical window size; the scene sees logical pixels
    fn resize_canvas(&mut self, size: PhysicalSize<u32>) {
        if let Some(context) = &mut self.render_context {
            context.resize(size);
        }
        let logical = size.to_logical::<f32>(self.scale_factor);
        self.viewport = Viewport::new(logical.width, logical.height);
        self.canvas.resize(self.viewport, self.scale_factor as f32);
        log::debug!(
            "[player] viewport {}x{} at {:.2}x",
            self.viewport.width,
            self.viewport.height,
            self.scale_factor
        );
    }

    fn pointer_at(&mut self, position: PhysicalPosition<f64>) {
        let logical = position.to_logical::<f32>(self.scale_factor);
        self.input.process_pointer_move(logical.x, logical.y);
    }

    fn switch_scene(&mut self, kind: SceneKind) {
        if kind == self.scene {
            return;
        }
        let mut system = kind.build(&self.site.scenes, self.options.seed.unwrap_or_else(time_seed));
        if let Err(e) = system.initialize(self.viewport) {
            log::warn!("[player] could not start scene '{kind}': {e}");
            return;
        }
        if let Err(e) = self.system.shutdown() {
            log::warn!("[player] scene '{}' shutdown failed: {e}", self.scene);
        }
        log::info!("[player] scene {} -> {kind}", self.scene);
        self.system = system;
        self.scene = kind;
        self.scene_started = self.clock.total_time;
    }

    fn persist_preferences(&mut self) {
        self.prefs.write_to(&mut self.store);
        if let Err(e) = self.store.save() {
            log::warn!("[player] could not save preferences: {e}");
        }
    }

    fn apply_actions(&mut self, event_loop: &ActiveEventLoop) {
        for action in self.input.actions_just_pressed() {
            match action.as_str() {
                "scene_sky" => self.switch_scene(SceneKind::Sky),
                "scene_lanterns" => self.switch_scene(SceneKind::Lanterns),
                "scene_music_box" => self.switch_scene(SceneKind::MusicBox),
                "cycle_theme" => {
                    let theme = self.prefs.cycle_theme(&self.site.themes).to_string();
                    log::info!("[player] theme {theme}");
                    self.persist_preferences();
                }
                "butterflies" => {
                    self.butterflies.trigger(self.viewport);
                }
                "toggle_mute" => {
                    let muted = self.prefs.toggle_mute();
                    self.music.set_muted(muted);
                    self.persist_preferences();
                }
                "quit" => event_loop.exit(),
                _ => {}
            }
        }
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        self.clock.tick();

        for sample in self.input.drain_pointer_moves() {
            self.system.pointer_moved(sample.x, self.viewport);
            self.cursor.set_target(Vec2::new(sample.x, sample.y));
        }
        if self.input.first_interaction() {
            if let Err(e) = self.music.start() {
                log::warn!("[player] {e}");
            }
        }
        self.apply_actions(event_loop);

        let ticks = self.clock.take_ticks();
        let delta_ms = self.clock.fixed_timestep.unwrap_or(self.clock.delta_time) * 1000.0;
        let style = self.site.themes.resolve(&self.prefs.theme);
        let palette = Palette::resolve(style);
        let frame = FrameInput {
            viewport: self.viewport,
            time: self.clock.total_time - self.scene_started,
            delta_ms,
            style,
        };
        for _ in 0..ticks {
            self.system.tick(&mut self.canvas, &frame);
            self.butterflies.update(delta_ms);
        }
        if ticks > 0 {
            overlay::draw_butterflies(&mut self.canvas, &self.butterflies, &palette);
            self.cursor.update();
            overlay::draw_cursor_halo(
                &mut self.canvas,
                &self.cursor,
                self.system.title_glow(),
                &palette,
            );
        }

        if let (Some(context), Some(present)) = (&mut self.render_context, &mut self.present) {
            if let Err(e) = context.present(present, &self.canvas, palette.background) {
                log::error!("[player] {e}");
            }
        }

        let title = overlay::window_title(&self.site.countdown.remaining_now(), self.prefs.muted);
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }

        self.input.end_frame();
    }
}

impl ApplicationHandler for PlayerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.initialize(event_loop) {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                self.resize_canvas(new_size);
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = scale_factor;
                if let Some(size) = self.window.as_ref().map(|w| w.inner_size()) {
                    self.resize_canvas(size);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_at(position);
            }

            WindowEvent::Touch(touch) => match touch.phase {
                TouchPhase::Started => {
                    self.input.process_press();
                    self.pointer_at(touch.location);
                }
                TouchPhase::Moved => self.pointer_at(touch.location),
                TouchPhase::Ended | TouchPhase::Cancelled => {}
            },

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                ..
            } => {
                self.input.process_press();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.input.process_key_down(key_code),
                        ElementState::Released => self.input.process_key_up(key_code),
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Err(e) = self.system.shutdown() {
            log::warn!("[player] {e}");
        }
    }
}
