//! Application state and the per-frame update.
//!
//! Everything the viewer mutates lives in [`AppState`]; the window host
//! feeds it events and calls [`AppState::step`] once per redraw.

use std::fmt::Write as _;
use std::path::Path;

use glam::{Vec2, Vec3, Vec4};
use orrery_bodies::Scene;
use orrery_camera::{Camera, Movement, OrbitRig};
use orrery_config::{Config, SceneConfig, TextureConfig};
use orrery_input::{Action, InputMap, KeyboardState, MouseState};
use orrery_render::{
    AssetLibrary, DrawBackend, HeadlessBackend, HeadlessSkybox, ImageDecoder, MeshSource,
    ModelSource, ShaderProgram, SkyboxRenderer, TextureDecoder, TextureKind, TextureRef,
    TextureStore, UniformRecorder,
};
use tracing::{debug, info, warn};

use crate::clock::{FrameClock, FrameTime};
use crate::frame::{FrameStats, FrameView, Programs, render_frame};

/// Registers a one-mesh model for every model path `scene` names.
///
/// Model files are not parsed; a model whose first user binds mesh
/// textures gets a diffuse `<stem>.jpg` next to it.
pub fn register_scene_models<D: TextureDecoder>(
    assets: &mut AssetLibrary<D>,
    scene: &SceneConfig,
) {
    for body in &scene.bodies {
        let path = Path::new(&body.model);
        if assets.has_model(path) {
            continue;
        }
        let stem = path
            .file_stem()
            .map_or_else(|| body.name.to_lowercase(), |s| s.to_string_lossy().into_owned());
        let textures = match body.textures {
            TextureConfig::MeshTextures => {
                vec![TextureRef::new(TextureKind::Diffuse, format!("{stem}.jpg"))]
            }
            _ => Vec::new(),
        };
        assets.register_model(
            path,
            ModelSource {
                meshes: vec![MeshSource {
                    name: stem,
                    textures,
                    ..MeshSource::default()
                }],
                embedded: Vec::new(),
            },
        );
    }
}

fn camera_from_config(config: &Config) -> Camera {
    let c = &config.camera;
    Camera::new(
        Vec3::from_array(c.position),
        Vec3::from_array(c.world_up),
        c.yaw,
        c.pitch,
    )
    .with_zoom(c.zoom)
    .with_movement_speed(c.movement_speed)
    .with_mouse_sensitivity(c.mouse_sensitivity)
}

/// The programs, backend and skybox frames are drawn with.
pub struct Renderer<P, B, S> {
    pub planet: P,
    pub earth: P,
    pub glow: P,
    pub backend: B,
    pub skybox: S,
}

/// Collaborators that record frames instead of drawing them.
pub type HeadlessRenderer = Renderer<UniformRecorder, HeadlessBackend, HeadlessSkybox>;

impl HeadlessRenderer {
    /// Recording programs and backend, plus a skybox whose faces are
    /// loaded through `store`.
    pub fn load<Q: AsRef<Path>>(skybox_faces: &[Q], store: &mut dyn TextureStore) -> Self {
        let skybox = HeadlessSkybox::load(skybox_faces, store);
        if !skybox.is_complete() {
            warn!("Skybox is incomplete; missing faces draw black");
        }
        Self {
            planet: UniformRecorder::new("planet"),
            earth: UniformRecorder::new("earth"),
            glow: UniformRecorder::new("glow"),
            backend: HeadlessBackend::new(),
            skybox,
        }
    }
}

/// Everything the viewer owns between frames.
pub struct AppState<
    D: TextureDecoder = ImageDecoder,
    P = UniformRecorder,
    B = HeadlessBackend,
    S = HeadlessSkybox,
> {
    config: Config,
    camera: Camera,
    rig: OrbitRig,
    scene: Scene,
    assets: AssetLibrary<D>,
    renderer: Renderer<P, B, S>,
    keyboard: KeyboardState,
    mouse: MouseState,
    input_map: InputMap,
    clock: FrameClock,
    size: (u32, u32),
    last_frame: FrameStats,
    exit_requested: bool,
}

impl AppState {
    /// Builds the state, decoding textures from disk.
    pub fn new(config: Config) -> Self {
        Self::with_decoder(config, ImageDecoder)
    }
}

impl<D: TextureDecoder> AppState<D> {
    /// Builds the camera, scene and skybox described by `config`, drawing
    /// through a [`HeadlessRenderer`].
    pub fn with_decoder(config: Config, decoder: D) -> Self {
        Self::with_renderer(config, decoder, |config, store| {
            HeadlessRenderer::load(&config.render.skybox_faces, store)
        })
    }
}

impl<D, P, B, S> AppState<D, P, B, S>
where
    D: TextureDecoder,
    P: ShaderProgram,
    B: DrawBackend,
    S: SkyboxRenderer,
{
    /// Builds the camera and scene described by `config`. `make_renderer`
    /// runs after the scene is loaded and may load its own textures.
    pub fn with_renderer(
        config: Config,
        decoder: D,
        make_renderer: impl FnOnce(&Config, &mut dyn TextureStore) -> Renderer<P, B, S>,
    ) -> Self {
        let mut assets = AssetLibrary::new(decoder);
        register_scene_models(&mut assets, &config.scene);
        let scene = Scene::from_config(&config.scene, &mut assets);
        let renderer = make_renderer(&config, &mut assets);

        let orbit = &config.orbit_camera;
        let rig = OrbitRig {
            radius: orbit.radius,
            speed: orbit.speed,
            height: orbit.height,
        };
        if scene.body(&orbit.target).is_none() {
            warn!("Orbit target '{}' is not in the scene", orbit.target);
        }

        info!(
            "Viewer ready: {} bodies, {} textures",
            scene.len(),
            assets.textures().live_count()
        );

        Self {
            camera: camera_from_config(&config),
            rig,
            scene,
            assets,
            renderer,
            keyboard: KeyboardState::new(),
            mouse: MouseState::new(),
            input_map: InputMap::default(),
            clock: FrameClock::new(config.simulation.time_scale, config.simulation.start_paused),
            size: (config.window.width, config.window.height),
            last_frame: FrameStats::default(),
            exit_requested: false,
            config,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// Settings the state was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The viewer camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Bodies being drawn.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Loaded models and the texture cache behind them.
    pub fn assets(&self) -> &AssetLibrary<D> {
        &self.assets
    }

    /// Programs, backend and skybox frames go to.
    pub fn renderer(&self) -> &Renderer<P, B, S> {
        &self.renderer
    }

    /// Backend the last frame was submitted to.
    pub fn backend(&self) -> &B {
        &self.renderer.backend
    }

    /// Key state, fed by the window host.
    pub fn keyboard_mut(&mut self) -> &mut KeyboardState {
        &mut self.keyboard
    }

    /// Mouse state and capture flag.
    pub fn mouse(&self) -> &MouseState {
        &self.mouse
    }

    /// Mouse state, fed by the window host.
    pub fn mouse_mut(&mut self) -> &mut MouseState {
        &mut self.mouse
    }

    /// Frame clock, ticked once per redraw.
    pub fn clock_mut(&mut self) -> &mut FrameClock {
        &mut self.clock
    }

    /// Counts from the most recent frame.
    pub fn last_frame(&self) -> FrameStats {
        self.last_frame
    }

    /// Whether Escape (or a close request) asked the viewer to quit.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Asks the host to close the window after this frame.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    // ── Window ──────────────────────────────────────────────────────

    /// Records a new framebuffer size. Zero sizes (minimized) are kept so
    /// the aspect ratio falls back to 1.
    pub fn resize(&mut self, width: u32, height: u32) {
        debug!("Resized to {}x{}", width, height);
        self.size = (width, height);
    }

    /// Framebuffer size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Width over height, or 1 while either is zero.
    pub fn aspect_ratio(&self) -> f32 {
        let (w, h) = self.size;
        if w == 0 || h == 0 {
            1.0
        } else {
            w as f32 / h as f32
        }
    }

    // ── Frame ───────────────────────────────────────────────────────

    /// Runs one frame: input, orbit update, submission.
    pub fn step(&mut self, time: FrameTime) -> FrameStats {
        self.apply_input(time);
        self.update_orbit(time.scene_time);
        self.last_frame = self.submit(time.scene_time);
        self.keyboard.clear_transients();
        self.mouse.clear_transients();
        self.last_frame
    }

    fn apply_input(&mut self, time: FrameTime) {
        if self.input_map.triggered(Action::Exit, &self.keyboard) {
            info!("Exit requested");
            self.exit_requested = true;
        }
        if self.input_map.triggered(Action::TogglePause, &self.keyboard) {
            let paused = self.clock.toggle_pause();
            info!("Simulation {}", if paused { "paused" } else { "running" });
        }
        if self.input_map.triggered(Action::ResetCamera, &self.keyboard) {
            self.camera.reset();
        }
        if self.input_map.triggered(Action::Orbit, &self.keyboard) {
            self.start_orbit(time.scene_time);
        }

        for (action, movement) in Action::CONTINUOUS.into_iter().zip([
            Movement::Forward,
            Movement::Backward,
            Movement::Left,
            Movement::Right,
        ]) {
            if self.input_map.is_held(action, &self.keyboard) {
                self.camera.process_movement(movement, time.delta);
            }
        }

        let look = self.mouse.look_offset(self.config.input.invert_y);
        if look != Vec2::ZERO {
            self.camera.process_look(look.x, look.y, true);
        }
        let scroll = self.mouse.scroll();
        if scroll != 0.0 {
            self.camera.process_zoom(scroll);
        }
    }

    fn start_orbit(&mut self, scene_time: f32) {
        let target = &self.config.orbit_camera.target;
        match self.scene.body(target) {
            Some(body) => {
                info!("Orbiting '{}'", target);
                self.camera
                    .orbit(body.world_position(scene_time), scene_time, &self.rig);
            }
            None => warn!("Cannot orbit '{}': no such body", target),
        }
    }

    fn update_orbit(&mut self, scene_time: f32) {
        if !self.camera.is_orbiting() {
            return;
        }
        if let Some(body) = self.scene.body(&self.config.orbit_camera.target) {
            self.camera
                .orbit(body.world_position(scene_time), scene_time, &self.rig);
        }
    }

    fn submit(&mut self, scene_time: f32) -> FrameStats {
        let render = &self.config.render;
        let frame = FrameView {
            view: self.camera.view_matrix(),
            projection: self
                .camera
                .projection_matrix(self.aspect_ratio(), render.near, render.far),
            eye: self.camera.position(),
            time: scene_time,
            clear_color: Vec4::from_array(render.clear_color),
            glow: render.glow,
        };

        let Renderer {
            planet,
            earth,
            glow,
            backend,
            skybox,
        } = &mut self.renderer;
        render_frame(
            &frame,
            &self.scene,
            Programs {
                planet,
                earth,
                glow,
            },
            backend,
            skybox,
        )
    }

    /// One-line status for the window title.
    pub fn status_line(&self) -> String {
        let mut line = self.config.window.title.clone();
        if !self.config.debug.title_status {
            return line;
        }
        let _ = write!(line, " | t={:.1}s", self.clock.scene_time());
        if self.clock.is_paused() {
            line.push_str(" (paused)");
        }
        line.push_str(" | ");
        self.camera.write_status(&mut line);
        line
    }

    /// Releases every texture the scene and skybox hold.
    pub fn shutdown(&mut self) {
        self.scene.release(&mut self.assets);
        self.renderer.skybox.release(&mut self.assets);
        let leaked = self.assets.textures().live_count();
        if leaked > 0 {
            warn!("{} textures still referenced at shutdown", leaked);
        }
        info!("Viewer shut down after {} frames", self.clock.frame_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_input::RawKeyEvent;
    use orrery_render::{DecodedTexture, Mesh, TextureError, TextureHandle, TextureUnits};
    use winit::event::{ElementState, MouseScrollDelta};
    use winit::keyboard::KeyCode;

    /// Decodes every path to a 1×1 texture.
    struct SolidDecoder;

    impl TextureDecoder for SolidDecoder {
        fn decode_file(&mut self, _path: &Path) -> Result<DecodedTexture, TextureError> {
            Ok(DecodedTexture {
                width: 1,
                height: 1,
                channels: 4,
                pixels: vec![255; 4],
            })
        }

        fn decode_bytes(&mut self, name: &str, _bytes: &[u8]) -> Result<DecodedTexture, TextureError> {
            self.decode_file(Path::new(name))
        }
    }

    fn state() -> AppState<SolidDecoder> {
        AppState::with_decoder(Config::default(), SolidDecoder)
    }

    fn frame(delta: f32, scene_time: f32) -> FrameTime {
        FrameTime {
            delta,
            scene_time,
            scene_delta: delta,
        }
    }

    fn key(state: &mut AppState<SolidDecoder>, key: KeyCode, pressed: bool) {
        state.keyboard_mut().process_raw(RawKeyEvent {
            key,
            state: if pressed {
                ElementState::Pressed
            } else {
                ElementState::Released
            },
            repeat: false,
        });
    }

    fn tap(state: &mut AppState<SolidDecoder>, code: KeyCode) {
        key(state, code, true);
        key(state, code, false);
    }

    #[test]
    fn test_default_config_builds_full_scene() {
        let s = state();
        assert_eq!(s.scene().len(), 9);
        assert!(s.scene().light_body().is_some());
        assert!(s.renderer().skybox.is_complete());
        // Mesh-texture planets picked up their placeholder diffuse map.
        let mars = s.scene().body("Mars").unwrap();
        assert!(mars.model().meshes[0].textures[0].handle.is_valid());
    }

    #[test]
    fn test_shared_model_registered_once() {
        let mut assets = AssetLibrary::new(SolidDecoder);
        let scene = SceneConfig::default();
        register_scene_models(&mut assets, &scene);
        assert!(assets.has_model(Path::new("assets/models/sphere.obj")));
        assert!(assets.has_model(Path::new("assets/models/jupiter/jupiter.obj")));
    }

    #[test]
    fn test_held_key_moves_camera_each_frame() {
        let mut s = state();
        let start = s.camera().position();
        key(&mut s, KeyCode::KeyW, true);
        s.step(frame(0.1, 0.1));
        s.step(frame(0.1, 0.2));
        let moved = s.camera().position() - start;
        // 5 units/s for 0.2 s along the initial front.
        assert!((moved.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_mouse_motion_turns_camera() {
        let mut s = state();
        s.mouse_mut().set_captured_flag(true);
        s.mouse_mut().on_raw_motion(100.0, 50.0);
        s.step(frame(0.016, 0.0));
        // Mouse down looks down: pitch -5 - 50 * 0.1.
        assert!((s.camera().yaw() - (-80.0)).abs() < 1e-4);
        assert!((s.camera().pitch() - (-10.0)).abs() < 1e-4);

        // Deltas are consumed by the frame.
        s.step(frame(0.016, 0.0));
        assert!((s.camera().yaw() - (-80.0)).abs() < 1e-4);
    }

    #[test]
    fn test_scroll_zooms() {
        let mut s = state();
        s.mouse_mut().on_scroll(MouseScrollDelta::LineDelta(0.0, 3.0));
        s.step(frame(0.016, 0.0));
        assert!((s.camera().zoom() - 42.0).abs() < 1e-4);
    }

    #[test]
    fn test_orbit_key_follows_target() {
        let mut s = state();
        tap(&mut s, KeyCode::KeyO);
        s.step(frame(0.016, 10.0));
        assert!(s.camera().is_orbiting());

        let earth = s.scene().body("Earth").unwrap().world_position(10.0);
        let expected = earth + s.rig.offset(10.0);
        assert!((s.camera().position() - expected).length() < 1e-3);

        s.step(frame(0.016, 20.0));
        let earth = s.scene().body("Earth").unwrap().world_position(20.0);
        assert!((s.camera().position() - (earth + s.rig.offset(20.0))).length() < 1e-3);
    }

    #[test]
    fn test_movement_ignored_while_orbiting() {
        let mut s = state();
        tap(&mut s, KeyCode::KeyO);
        s.step(frame(0.016, 5.0));
        let orbiting_at = s.camera().position();
        key(&mut s, KeyCode::KeyD, true);
        s.step(frame(0.5, 5.0));
        assert!((s.camera().position() - orbiting_at).length() < 1e-4);
    }

    #[test]
    fn test_reset_leaves_orbit() {
        let mut s = state();
        let initial = s.camera().initial_state();
        tap(&mut s, KeyCode::KeyO);
        s.step(frame(0.016, 5.0));
        tap(&mut s, KeyCode::KeyR);
        s.step(frame(0.016, 5.1));
        assert!(!s.camera().is_orbiting());
        assert_eq!(s.camera().position(), initial.position);
    }

    #[test]
    fn test_unknown_orbit_target_stays_free() {
        let mut config = Config::default();
        config.orbit_camera.target = "Vulcan".to_string();
        let mut s = AppState::with_decoder(config, SolidDecoder);
        tap(&mut s, KeyCode::KeyO);
        s.step(frame(0.016, 1.0));
        assert!(!s.camera().is_orbiting());
    }

    #[test]
    fn test_pause_and_exit_keys() {
        let mut s = state();
        tap(&mut s, KeyCode::KeyP);
        s.step(frame(0.016, 0.0));
        assert!(s.clock_mut().is_paused());
        assert!(s.status_line().contains("(paused)"));

        tap(&mut s, KeyCode::Escape);
        assert!(!s.exit_requested());
        s.step(frame(0.016, 0.0));
        assert!(s.exit_requested());
    }

    #[test]
    fn test_step_submits_frame() {
        let mut s = state();
        let stats = s.step(frame(0.016, 1.0));
        assert_eq!(stats.bodies, 9);
        assert_eq!(stats.glows, 2);
        assert_eq!(s.last_frame(), stats);
        assert_eq!(s.backend().frames(), 1);
        assert_eq!(s.backend().mesh_draws(), 9);
    }

    #[test]
    fn test_recorded_uploads_stay_bounded() {
        fn uploads(s: &AppState<SolidDecoder>) -> [usize; 3] {
            let r = s.renderer();
            [&r.planet, &r.earth, &r.glow].map(|p| p.history().len())
        }

        let mut s = state();
        s.step(frame(0.016, 0.0));
        let first = uploads(&s);
        let calls = s.backend().calls().len();
        assert!(first.iter().all(|&n| n > 0));

        for i in 1..=1000 {
            s.step(frame(0.016, i as f32 * 0.016));
        }
        assert_eq!(uploads(&s), first);
        assert_eq!(s.backend().calls().len(), calls);
        assert_eq!(s.backend().frames(), 1001);
    }

    /// Counts draws without keeping them.
    #[derive(Default)]
    struct CountingBackend {
        frames: u32,
        meshes: u32,
    }

    impl TextureUnits for CountingBackend {
        fn bind_texture(&mut self, _unit: u32, _handle: TextureHandle) {}
    }

    impl DrawBackend for CountingBackend {
        fn begin_frame(&mut self) {
            self.frames += 1;
            self.meshes = 0;
        }

        fn clear(&mut self, _color: Vec4) {}

        fn draw_mesh(&mut self, _mesh: &Mesh) {
            self.meshes += 1;
        }

        fn draw_glow_quad(&mut self) {}
    }

    #[test]
    fn test_injected_renderer_receives_frames() {
        let mut s = AppState::with_renderer(Config::default(), SolidDecoder, |_, _| Renderer {
            planet: UniformRecorder::new("planet"),
            earth: UniformRecorder::new("earth"),
            glow: UniformRecorder::new("glow"),
            backend: CountingBackend::default(),
            skybox: HeadlessSkybox::default(),
        });
        s.step(frame(0.016, 0.0));
        s.step(frame(0.016, 0.5));
        assert_eq!(s.backend().frames, 2);
        assert_eq!(s.backend().meshes, 9);
        assert_eq!(s.renderer().skybox.draws(), 2);

        // Nothing was loaded for the skybox, so only the scene releases.
        s.shutdown();
        assert_eq!(s.assets().textures().live_count(), 0);
    }

    #[test]
    fn test_aspect_ratio_handles_zero_size() {
        let mut s = state();
        s.resize(1600, 800);
        assert_eq!(s.aspect_ratio(), 2.0);
        s.resize(0, 0);
        assert_eq!(s.aspect_ratio(), 1.0);
    }

    #[test]
    fn test_status_line_mentions_mode() {
        let s = state();
        let line = s.status_line();
        assert!(line.starts_with("Solar System"));
        assert!(line.contains("[free]"));

        let mut config = Config::default();
        config.debug.title_status = false;
        let quiet = AppState::with_decoder(config, SolidDecoder);
        assert_eq!(quiet.status_line(), "Solar System");
    }

    #[test]
    fn test_shutdown_releases_everything() {
        let mut s = state();
        assert!(s.assets().textures().live_count() > 0);
        s.shutdown();
        assert_eq!(s.assets().textures().live_count(), 0);
    }
}
