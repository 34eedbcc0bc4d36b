//! Frame submission: clear, skybox, bodies grouped by program, then glows.

use glam::{Mat4, Vec3, Vec4};
use orrery_bodies::{Scene, ShaderKind};
use orrery_render::{DrawBackend, ShaderProgram, SkyboxRenderer, strip_translation};
use tracing::trace;

/// Per-frame camera and scene inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameView {
    pub view: Mat4,
    pub projection: Mat4,
    /// Eye position, uploaded as `viewPos`.
    pub eye: Vec3,
    /// Scene time in seconds.
    pub time: f32,
    pub clear_color: Vec4,
    /// Whether glow billboards are drawn at all.
    pub glow: bool,
}

/// The three programs a frame uses.
pub struct Programs<'a> {
    pub planet: &'a mut dyn ShaderProgram,
    pub earth: &'a mut dyn ShaderProgram,
    pub glow: &'a mut dyn ShaderProgram,
}

/// What a frame drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub bodies: usize,
    pub glows: usize,
}

fn set_camera_uniforms(program: &mut dyn ShaderProgram, frame: &FrameView) {
    program.set_mat4("view", frame.view);
    program.set_mat4("projection", frame.projection);
}

/// Submits one frame of `scene` as seen through `frame`.
///
/// Every collaborator gets `begin_frame` first, so per-frame records do not
/// outlive the frame.
pub fn render_frame(
    frame: &FrameView,
    scene: &Scene,
    programs: Programs<'_>,
    backend: &mut dyn DrawBackend,
    skybox: &mut dyn SkyboxRenderer,
) -> FrameStats {
    let mut stats = FrameStats::default();
    let light = scene.light_position(frame.time);

    let Programs {
        planet,
        earth,
        glow,
    } = programs;
    backend.begin_frame();
    planet.begin_frame();
    earth.begin_frame();
    glow.begin_frame();

    backend.clear(frame.clear_color);
    skybox.draw(strip_translation(frame.view), frame.projection);

    for (kind, program) in [(ShaderKind::Planet, planet), (ShaderKind::Earth, earth)] {
        let mut bodies = scene.with_shader(kind).peekable();
        if bodies.peek().is_none() {
            continue;
        }
        program.activate();
        set_camera_uniforms(program, frame);
        program.set_vec3("lightPos", light);
        program.set_vec3("viewPos", frame.eye);
        for body in bodies {
            body.draw(frame.time, program, backend);
            stats.bodies += 1;
        }
    }

    if frame.glow && scene.iter().any(|b| b.has_glow()) {
        glow.activate();
        set_camera_uniforms(glow, frame);
        for body in scene.iter() {
            if body.draw_glow(frame.time, frame.view, glow, backend) {
                stats.glows += 1;
            }
        }
    }

    trace!(
        "Frame at t={:.2}: {} bodies, {} glows",
        frame.time, stats.bodies, stats.glows
    );
    stats
}
