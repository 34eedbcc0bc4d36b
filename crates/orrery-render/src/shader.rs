//! Shader program interface and a recording implementation.
//!
//! Bodies and the frame update only ever talk to a [`ShaderProgram`]: they
//! activate it and push named uniforms. [`UniformRecorder`] keeps every
//! upload so frame output can be inspected without a GPU.

use std::collections::HashMap;

use glam::{Mat4, Vec3, Vec4};

/// A linked program accepting uniforms by name.
pub trait ShaderProgram {
    /// Called once before the first upload of each frame.
    fn begin_frame(&mut self) {}
    /// Makes this program current for subsequent draws.
    fn activate(&mut self);
    /// Uploads a 4×4 matrix.
    fn set_mat4(&mut self, name: &str, value: Mat4);
    /// Uploads a 3-vector.
    fn set_vec3(&mut self, name: &str, value: Vec3);
    /// Uploads a 4-vector.
    fn set_vec4(&mut self, name: &str, value: Vec4);
    /// Uploads a float.
    fn set_float(&mut self, name: &str, value: f32);
    /// Uploads an integer (also used for sampler units).
    fn set_int(&mut self, name: &str, value: i32);
}

/// A recorded uniform value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Mat4(Mat4),
    Vec3(Vec3),
    Vec4(Vec4),
    Float(f32),
    Int(i32),
}

/// Headless [`ShaderProgram`] that records uploads.
#[derive(Debug, Default, Clone)]
pub struct UniformRecorder {
    name: String,
    current: HashMap<String, UniformValue>,
    history: Vec<(String, UniformValue)>,
    activations: u32,
}

impl UniformRecorder {
    /// Creates a recorder labelled `name` (used in log output only).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Program label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Latest value uploaded under `name`.
    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.current.get(name).copied()
    }

    /// Latest matrix uploaded under `name`, if the last upload was a matrix.
    pub fn mat4(&self, name: &str) -> Option<Mat4> {
        match self.get(name)? {
            UniformValue::Mat4(m) => Some(m),
            _ => None,
        }
    }

    /// Latest integer uploaded under `name`.
    pub fn int(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            UniformValue::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Every upload since the last frame began, in order.
    pub fn history(&self) -> &[(String, UniformValue)] {
        &self.history
    }

    /// All values uploaded under `name`, oldest first.
    pub fn values_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = UniformValue> + 'a {
        self.history
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// How many times [`activate`](ShaderProgram::activate) was called this
    /// frame.
    pub fn activations(&self) -> u32 {
        self.activations
    }

    /// Forgets all recorded uploads (activation count included).
    pub fn clear(&mut self) {
        self.current.clear();
        self.history.clear();
        self.activations = 0;
    }

    fn record(&mut self, name: &str, value: UniformValue) {
        self.current.insert(name.to_string(), value);
        self.history.push((name.to_string(), value));
    }
}

impl ShaderProgram for UniformRecorder {
    /// Drops the previous frame's uploads. Latest values persist, the way
    /// uniforms stay set on a linked program.
    fn begin_frame(&mut self) {
        self.history.clear();
        self.activations = 0;
    }

    fn activate(&mut self) {
        self.activations += 1;
    }

    fn set_mat4(&mut self, name: &str, value: Mat4) {
        self.record(name, UniformValue::Mat4(value));
    }

    fn set_vec3(&mut self, name: &str, value: Vec3) {
        self.record(name, UniformValue::Vec3(value));
    }

    fn set_vec4(&mut self, name: &str, value: Vec4) {
        self.record(name, UniformValue::Vec4(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.record(name, UniformValue::Float(value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.record(name, UniformValue::Int(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_value_wins() {
        let mut shader = UniformRecorder::new("planet");
        shader.set_int("texture_day", 0);
        shader.set_int("texture_day", 2);
        assert_eq!(shader.int("texture_day"), Some(2));
        assert_eq!(shader.values_of("texture_day").count(), 2);
        assert_eq!(shader.history().len(), 2);
    }

    #[test]
    fn test_typed_getters_reject_other_kinds() {
        let mut shader = UniformRecorder::new("glow");
        shader.set_vec4("glowTint", Vec4::ONE);
        assert!(shader.mat4("glowTint").is_none());
        assert!(shader.int("glowTint").is_none());
        assert_eq!(shader.get("glowTint"), Some(UniformValue::Vec4(Vec4::ONE)));
    }

    #[test]
    fn test_begin_frame_keeps_latest_values() {
        let mut shader = UniformRecorder::new("earth");
        shader.activate();
        shader.set_mat4("view", Mat4::IDENTITY);
        shader.set_float("time", 3.0);
        shader.begin_frame();

        assert!(shader.history().is_empty());
        assert_eq!(shader.activations(), 0);
        assert_eq!(shader.mat4("view"), Some(Mat4::IDENTITY));
        assert_eq!(shader.get("time"), Some(UniformValue::Float(3.0)));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut shader = UniformRecorder::new("skybox");
        shader.activate();
        shader.set_mat4("view", Mat4::IDENTITY);
        shader.clear();
        assert_eq!(shader.activations(), 0);
        assert!(shader.get("view").is_none());
        assert!(shader.history().is_empty());
        assert_eq!(shader.name(), "skybox");
    }
}
