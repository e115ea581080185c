/// User-controlled values read by the renderer at draw time
use nalgebra::Point2;

use crate::config::SamplingConfig;

/// Key bindings that move the user point by one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserPointKey {
    Left,
    Right,
    Up,
    Down,
}

impl UserPointKey {
    /// Parse a DOM/terminal key name (`a`, `d`, `w`, `s` or arrow names)
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "a" | "A" | "ArrowLeft" => Some(Self::Left),
            "d" | "D" | "ArrowRight" => Some(Self::Right),
            "w" | "W" | "ArrowUp" => Some(Self::Up),
            "s" | "S" | "ArrowDown" => Some(Self::Down),
            _ => None,
        }
    }

    fn offset(self) -> (f32, f32) {
        match self {
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
            Self::Up => (0.0, 1.0),
            Self::Down => (0.0, -1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlState {
    /// Finer sampling, drawn as a triangle fan
    pub detailed: bool,
    pub light_position: [f32; 3],
    /// Texture rotation in degrees
    pub rotation_angle: f32,
    /// User point `(u, v)` in surface parameter degrees
    pub user_point: Point2<f32>,
}

impl ControlState {
    pub fn new(light_position: [f32; 3]) -> Self {
        Self {
            detailed: false,
            light_position,
            rotation_angle: 0.0,
            user_point: Point2::origin(),
        }
    }

    /// Set the light position from any number of fields; missing
    /// components are zero and extra ones are ignored
    pub fn set_light_fields(&mut self, fields: &[f32]) {
        let mut position = [0.0; 3];
        for (slot, value) in position.iter_mut().zip(fields) {
            *slot = *value;
        }
        self.light_position = position;
    }

    pub fn apply_key(&mut self, key: UserPointKey) {
        let (dx, dy) = key.offset();
        self.user_point.x += dx;
        self.user_point.y += dy;
    }

    /// Sampling step for the current mode
    pub fn step(&self, sampling: &SamplingConfig) -> f64 {
        sampling.step(self.detailed)
    }

    pub fn rotation_radians(&self) -> f32 {
        self.rotation_angle.to_radians()
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new([0.0; 3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_parsing() {
        assert_eq!(UserPointKey::from_key("a"), Some(UserPointKey::Left));
        assert_eq!(UserPointKey::from_key("D"), Some(UserPointKey::Right));
        assert_eq!(UserPointKey::from_key("ArrowUp"), Some(UserPointKey::Up));
        assert_eq!(UserPointKey::from_key("s"), Some(UserPointKey::Down));
        assert_eq!(UserPointKey::from_key("q"), None);
    }

    #[test]
    fn test_keys_step_user_point() {
        let mut controls = ControlState::default();
        controls.apply_key(UserPointKey::Right);
        controls.apply_key(UserPointKey::Right);
        controls.apply_key(UserPointKey::Up);
        assert_eq!(controls.user_point, Point2::new(2.0, 1.0));

        controls.apply_key(UserPointKey::Left);
        controls.apply_key(UserPointKey::Down);
        controls.apply_key(UserPointKey::Down);
        assert_eq!(controls.user_point, Point2::new(1.0, -1.0));
    }

    #[test]
    fn test_light_fields_pad_and_truncate() {
        let mut controls = ControlState::default();
        controls.set_light_fields(&[1.0]);
        assert_eq!(controls.light_position, [1.0, 0.0, 0.0]);

        controls.set_light_fields(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(controls.light_position, [1.0, 2.0, 3.0]);

        controls.set_light_fields(&[]);
        assert_eq!(controls.light_position, [0.0; 3]);
    }

    #[test]
    fn test_step_follows_mode() {
        let sampling = SamplingConfig::default();
        let mut controls = ControlState::default();
        assert_eq!(controls.step(&sampling), 1.0);
        controls.detailed = true;
        assert_eq!(controls.step(&sampling), 0.2);
    }
}
