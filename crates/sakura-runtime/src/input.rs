//! Input state management

use sakura_core::{Vec2, Viewport};
use std::collections::{HashMap, HashSet};
use winit::keyboard::KeyCode;

/// Per-frame smoothing factor of the cursor halo
pub const CURSOR_SMOOTHING: f32 = 0.12;

/// A pointer or touch position reported by the window, in logical pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
}

/// Tracks keyboard, pointer, and touch input per frame
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    keys_just_pressed: HashSet<KeyCode>,

    /// Last known pointer position in logical pixels
    pub pointer_position: Vec2,
    /// Move events received since the last drain, in arrival order
    pointer_moves: Vec<PointerSample>,

    /// Set once on the first click or touch and never cleared
    interacted: bool,
    interacted_this_frame: bool,

    /// Action map: action name -> list of key bindings
    action_map: HashMap<String, Vec<KeyCode>>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            keys_just_pressed: HashSet::new(),
            pointer_position: Vec2::ZERO,
            pointer_moves: Vec::new(),
            interacted: false,
            interacted_this_frame: false,
            action_map: Self::default_action_map(),
        }
    }

    fn default_action_map() -> HashMap<String, Vec<KeyCode>> {
        let mut map = HashMap::new();
        map.insert("scene_sky".into(), vec![KeyCode::Digit1, KeyCode::Numpad1]);
        map.insert("scene_lanterns".into(), vec![KeyCode::Digit2, KeyCode::Numpad2]);
        map.insert("scene_music_box".into(), vec![KeyCode::Digit3, KeyCode::Numpad3]);
        map.insert("cycle_theme".into(), vec![KeyCode::KeyT]);
        map.insert("butterflies".into(), vec![KeyCode::KeyB]);
        map.insert("toggle_mute".into(), vec![KeyCode::KeyM]);
        map.insert("quit".into(), vec![KeyCode::Escape]);
        map
    }

    /// Bind an action to one or more keys
    pub fn bind_action(&mut self, action: impl Into<String>, keys: Vec<KeyCode>) {
        self.action_map.insert(action.into(), keys);
    }

    /// Process a key press event
    pub fn process_key_down(&mut self, key: KeyCode) {
        if !self.keys_down.contains(&key) {
            self.keys_just_pressed.insert(key);
        }
        self.keys_down.insert(key);
    }

    /// Process a key release event
    pub fn process_key_up(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
    }

    /// Process cursor or touch movement
    pub fn process_pointer_move(&mut self, x: f32, y: f32) {
        self.pointer_position = Vec2::new(x, y);
        self.pointer_moves.push(PointerSample { x, y });
    }

    /// Process a click or touch start
    pub fn process_press(&mut self) {
        if !self.interacted {
            self.interacted_this_frame = true;
        }
        self.interacted = true;
    }

    /// Take the move events queued since the last call
    pub fn drain_pointer_moves(&mut self) -> Vec<PointerSample> {
        std::mem::take(&mut self.pointer_moves)
    }

    /// Call at end of frame to clear per-frame state
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.interacted_this_frame = false;
    }

    // --- Query methods ---

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    /// True only during the frame of the very first click or touch
    pub fn first_interaction(&self) -> bool {
        self.interacted_this_frame
    }

    pub fn has_interacted(&self) -> bool {
        self.interacted
    }

    /// Was an action just pressed this frame?
    pub fn is_action_just_pressed(&self, action: &str) -> bool {
        self.action_map
            .get(action)
            .map(|keys| keys.iter().any(|k| self.keys_just_pressed.contains(k)))
            .unwrap_or(false)
    }

    /// Get all actions that were just pressed this frame, sorted by name
    pub fn actions_just_pressed(&self) -> Vec<String> {
        let mut result: Vec<String> = self
            .action_map
            .iter()
            .filter(|(_, keys)| keys.iter().any(|k| self.keys_just_pressed.contains(k)))
            .map(|(action, _)| action.clone())
            .collect();
        result.sort();
        result
    }
}

/// A halo that eases toward the pointer a fixed fraction per frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorGlow {
    pub position: Vec2,
    pub target: Vec2,
}

impl CursorGlow {
    /// Start resting at the viewport center
    pub fn new(viewport: Viewport) -> Self {
        let center = viewport.center();
        Self {
            position: center,
            target: center,
        }
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }

    pub fn update(&mut self) {
        self.position = self.position + (self.target - self.position) * CURSOR_SMOOTHING;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_transitions() {
        let mut input = InputState::new();

        input.process_key_down(KeyCode::KeyT);
        assert!(input.is_key_down(KeyCode::KeyT));
        assert!(input.is_key_just_pressed(KeyCode::KeyT));

        input.end_frame();
        assert!(input.is_key_down(KeyCode::KeyT));
        assert!(!input.is_key_just_pressed(KeyCode::KeyT));

        input.process_key_up(KeyCode::KeyT);
        assert!(!input.is_key_down(KeyCode::KeyT));
    }

    #[test]
    fn test_action_map() {
        let mut input = InputState::new();
        assert!(!input.is_action_just_pressed("toggle_mute"));

        input.process_key_down(KeyCode::KeyM);
        assert!(input.is_action_just_pressed("toggle_mute"));
        assert_eq!(input.actions_just_pressed(), vec!["toggle_mute".to_string()]);

        // Holding the key does not repeat the action
        input.end_frame();
        input.process_key_down(KeyCode::KeyM);
        assert!(!input.is_action_just_pressed("toggle_mute"));
    }

    #[test]
    fn test_butterfly_key() {
        let mut input = InputState::new();
        input.process_key_down(KeyCode::KeyB);
        assert!(input.is_action_just_pressed("butterflies"));
        assert_eq!(input.actions_just_pressed(), vec!["butterflies".to_string()]);
    }

    #[test]
    fn test_custom_binding() {
        let mut input = InputState::new();
        input.bind_action("cycle_theme", vec![KeyCode::KeyC, KeyCode::Tab]);

        input.process_key_down(KeyCode::Tab);
        assert!(input.is_action_just_pressed("cycle_theme"));
        input.end_frame();
        input.process_key_down(KeyCode::KeyT);
        assert!(!input.is_action_just_pressed("cycle_theme"));
    }

    #[test]
    fn test_pointer_moves_drain_in_order() {
        let mut input = InputState::new();
        input.process_pointer_move(10.0, 20.0);
        input.process_pointer_move(30.0, 40.0);
        assert_eq!(input.pointer_position, Vec2::new(30.0, 40.0));

        let moves = input.drain_pointer_moves();
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0].x, 10.0);
        assert!(input.drain_pointer_moves().is_empty());
    }

    #[test]
    fn test_first_interaction_fires_once() {
        let mut input = InputState::new();
        input.process_press();
        assert!(input.first_interaction());
        input.end_frame();
        input.process_press();
        assert!(!input.first_interaction());
        assert!(input.has_interacted());
    }

    #[test]
    fn test_cursor_glow_eases() {
        let mut glow = CursorGlow::new(Viewport::new(200.0, 100.0));
        assert_eq!(glow.position, Vec2::new(100.0, 50.0));

        glow.set_target(Vec2::new(200.0, 50.0));
        glow.update();
        assert!((glow.position.x - 112.0).abs() < 1e-4);

        for _ in 0..200 {
            glow.update();
        }
        assert!((glow.position.x - 200.0).abs() < 1e-3);
    }
}
